//! Application state and dependency injection.

mod catalog;
mod config;
mod gallery;
mod notification;

use lore_core::chunk::LoreCodec;
use lore_service::{CompletionService, MailService, PaymentService};

pub use crate::service::catalog::{ProductCatalog, ProductVariant};
pub use crate::service::config::{PROFILE_METADATA_KEYS, ServiceConfig, ServiceConfigBuilder};
pub use crate::service::gallery::Gallery;
pub use crate::service::notification::{DeliveryReport, Notifier, Purchase};
// Re-export error types from crate root for convenience
pub use crate::{Error, Result};

/// Origin used for redirect URLs when the request names none.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublicOrigin(pub Option<String>);

impl PublicOrigin {
    pub fn as_deref(&self) -> Option<&str> {
        self.0.as_deref()
    }
}

/// Application state.
///
/// Used for the [`State`] extraction (dependency injection).
///
/// [`State`]: axum::extract::State
#[must_use = "state does nothing unless you use it"]
#[derive(Clone)]
pub struct ServiceState {
    // External services:
    pub payment: PaymentService,
    pub mail: MailService,
    pub completion: CompletionService,

    // Internal services:
    pub codec: LoreCodec,
    pub catalog: ProductCatalog,
    pub notifier: Notifier,
    pub public_origin: PublicOrigin,
    pub gallery: Gallery,
}

impl ServiceState {
    /// Initializes application state from configuration.
    ///
    /// Fails when the fragment limits do not fit the metadata ceilings.
    pub fn new(
        service_config: ServiceConfig,
        payment_service: PaymentService,
        mail_service: MailService,
        completion_service: CompletionService,
    ) -> Result<Self> {
        let notifier = Notifier::new(
            mail_service.clone(),
            &service_config.sender_email,
            &service_config.admin_email,
        )
        .with_fallback_customer(service_config.fallback_customer_email());

        let service_state = Self {
            payment: payment_service,
            mail: mail_service,
            completion: completion_service,

            codec: service_config.codec()?,
            catalog: service_config.catalog(),
            notifier,
            public_origin: PublicOrigin(service_config.public_origin()),
            gallery: Gallery::default(),
        };

        Ok(service_state)
    }
}

macro_rules! impl_di {
    ($($f:ident: $t:ty),+) => {$(
        impl axum::extract::FromRef<ServiceState> for $t {
            fn from_ref(state: &ServiceState) -> Self {
                state.$f.clone()
            }
        }
    )+};
}

// External services:
impl_di!(payment: PaymentService);
impl_di!(mail: MailService);
impl_di!(completion: CompletionService);

// Internal services:
impl_di!(codec: LoreCodec);
impl_di!(catalog: ProductCatalog);
impl_di!(notifier: Notifier);
impl_di!(public_origin: PublicOrigin);
impl_di!(gallery: Gallery);

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
mod mock {
    use lore_service::{MockCompletionProvider, MockMailProvider, MockPaymentProvider};

    use super::*;

    /// In-memory providers behind a [`ServiceState`].
    ///
    /// Each provider is a cheap handle onto shared storage, so tests keep
    /// this value to inspect what the handlers did.
    #[derive(Debug, Clone, Default)]
    pub struct MockProviders {
        pub payment: MockPaymentProvider,
        pub mail: MockMailProvider,
        pub completion: MockCompletionProvider,
    }

    impl MockProviders {
        #[must_use]
        pub fn with_completion(mut self, completion: MockCompletionProvider) -> Self {
            self.completion = completion;
            self
        }

        /// Configuration matching the mocks: test price ids and addresses.
        pub fn config() -> ServiceConfig {
            ServiceConfig {
                bundle_price_id: "price_bundle".to_owned(),
                image_only_price_id: Some("price_image".to_owned()),
                sender_email: "shop@lore.example".to_owned(),
                admin_email: "ops@lore.example".to_owned(),
                fallback_customer_email: None,
                public_origin: Some("https://lore.example".to_owned()),
                fragment_len: lore_core::chunk::DEFAULT_FRAGMENT_LEN,
                fragment_count: lore_core::chunk::DEFAULT_FRAGMENT_COUNT,
                preview_len: lore_core::chunk::DEFAULT_PREVIEW_LEN,
            }
        }

        /// Builds a state over these providers with `config`.
        pub fn state_with_config(&self, config: ServiceConfig) -> Result<ServiceState> {
            ServiceState::new(
                config,
                PaymentService::from_provider(self.payment.clone()),
                MailService::from_provider(self.mail.clone()),
                CompletionService::from_provider(self.completion.clone()),
            )
        }

        /// Builds a state over these providers.
        pub fn state(&self) -> Result<ServiceState> {
            self.state_with_config(Self::config())
        }
    }
}

#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mock::MockProviders;
