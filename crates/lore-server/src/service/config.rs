use derive_builder::Builder;
use lore_core::chunk::{FragmentLimits, KeyScheme, LoreCodec, MetadataCeiling};
use serde::{Deserialize, Serialize};
use validator::ValidateEmail;

use crate::service::{ProductCatalog, Result};

/// Default values for configuration options.
mod defaults {
    pub use lore_core::chunk::{
        DEFAULT_FRAGMENT_COUNT as FRAGMENT_COUNT, DEFAULT_FRAGMENT_LEN as FRAGMENT_LEN,
        DEFAULT_PREVIEW_LEN as PREVIEW_LEN,
    };
}

/// Plain metadata keys written next to the lore: `pseudo`, `genre`, `role`.
pub const PROFILE_METADATA_KEYS: usize = 3;

/// App [`state`] configuration.
///
/// [`state`]: crate::service::ServiceState
#[derive(Debug, Clone, Serialize, Deserialize, Builder)]
#[must_use = "config does nothing unless you use it"]
#[builder(
    pattern = "owned",
    setter(into, strip_option, prefix = "with"),
    build_fn(validate = "Self::validate")
)]
pub struct ServiceConfig {
    /// Price id charged for the lore and image bundle.
    pub bundle_price_id: String,

    /// Price id charged for the image alone.
    #[builder(default)]
    pub image_only_price_id: Option<String>,

    /// Address every notification is sent from.
    pub sender_email: String,

    /// Operator address receiving purchase notifications.
    pub admin_email: String,

    /// Buyer address used when the checkout session carries none.
    #[builder(default)]
    pub fallback_customer_email: Option<String>,

    /// Origin used for redirect URLs when the request has no `Origin`/`Host`.
    #[builder(default)]
    pub public_origin: Option<String>,

    /// Maximum characters per lore fragment.
    #[builder(default = "defaults::FRAGMENT_LEN")]
    pub fragment_len: usize,

    /// Maximum number of lore fragments.
    #[builder(default = "defaults::FRAGMENT_COUNT")]
    pub fragment_count: usize,

    /// Characters kept in the lossy preview key.
    #[builder(default = "defaults::PREVIEW_LEN")]
    pub preview_len: usize,
}

impl ServiceConfig {
    /// Creates a new configuration builder.
    pub fn builder() -> ServiceConfigBuilder {
        ServiceConfigBuilder::default()
    }

    fn limits(&self) -> FragmentLimits {
        FragmentLimits::new(self.fragment_len, self.fragment_count)
            .with_preview_len(self.preview_len)
    }

    /// Builds the lore codec, checked against the Stripe metadata ceilings.
    pub fn codec(&self) -> Result<LoreCodec> {
        let codec = LoreCodec::new(
            self.limits(),
            KeyScheme::default(),
            &MetadataCeiling::STRIPE,
            PROFILE_METADATA_KEYS,
        )?;
        Ok(codec)
    }

    /// Builds the price table.
    pub fn catalog(&self) -> ProductCatalog {
        let catalog = ProductCatalog::new(&self.bundle_price_id);
        match non_blank(self.image_only_price_id.as_deref()) {
            Some(price) => catalog.with_image_only_price(price),
            None => catalog,
        }
    }

    /// Returns the configured public origin without a trailing slash.
    pub fn public_origin(&self) -> Option<String> {
        non_blank(self.public_origin.as_deref()).map(|o| o.trim_end_matches('/').to_owned())
    }

    /// Returns the fallback buyer address, if configured.
    pub fn fallback_customer_email(&self) -> Option<String> {
        non_blank(self.fallback_customer_email.as_deref()).map(str::to_owned)
    }
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

impl ServiceConfigBuilder {
    /// Wrapper for builder validation that returns String errors.
    fn validate(builder: &ServiceConfigBuilder) -> Result<(), String> {
        if let Some(price) = &builder.bundle_price_id
            && price.trim().is_empty()
        {
            return Err("Bundle price id cannot be empty".to_string());
        }

        let addresses = [
            ("Sender", builder.sender_email.as_ref()),
            ("Admin", builder.admin_email.as_ref()),
            (
                "Fallback customer",
                builder.fallback_customer_email.as_ref().and_then(Option::as_ref),
            ),
        ];
        for (label, address) in addresses {
            if let Some(address) = address
                && !address.validate_email()
            {
                return Err(format!("{label} email '{address}' is not a valid address"));
            }
        }

        if let Some(Some(origin)) = &builder.public_origin
            && !origin.starts_with("http://")
            && !origin.starts_with("https://")
        {
            return Err("Public origin must start with 'http://' or 'https://'".to_string());
        }

        let limits = FragmentLimits::new(
            builder.fragment_len.unwrap_or(defaults::FRAGMENT_LEN),
            builder.fragment_count.unwrap_or(defaults::FRAGMENT_COUNT),
        )
        .with_preview_len(builder.preview_len.unwrap_or(defaults::PREVIEW_LEN));

        limits
            .validate(
                &KeyScheme::default(),
                &MetadataCeiling::STRIPE,
                PROFILE_METADATA_KEYS,
            )
            .map_err(|e| format!("Fragment limits do not fit: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn builder() -> ServiceConfigBuilder {
        ServiceConfig::builder()
            .with_bundle_price_id("price_bundle")
            .with_sender_email("shop@lore.example")
            .with_admin_email("ops@lore.example")
    }

    #[test]
    fn defaults_fit_the_stripe_ceiling() -> anyhow::Result<()> {
        let config = builder().build()?;
        assert_eq!(config.fragment_len, 450);
        assert_eq!(config.fragment_count, 30);
        assert_eq!(config.preview_len, 80);

        let codec = config.codec()?;
        assert_eq!(codec.limits().capacity(), 13_500);
        Ok(())
    }

    #[test]
    fn rejects_too_many_fragments() {
        // 45 fragments + 3 auxiliary + 3 profile keys exceeds 50.
        let result = builder().with_fragment_count(45_usize).build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_oversized_fragments() {
        let result = builder().with_fragment_len(501_usize).build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_invalid_addresses() {
        let result = builder().with_admin_email("not-an-address").build();
        assert!(result.is_err());

        let result = builder().with_fallback_customer_email("nope").build();
        assert!(result.is_err());
    }

    #[test]
    fn rejects_empty_price() {
        let result = builder().with_bundle_price_id("  ").build();
        assert!(result.is_err());
    }

    #[test]
    fn requires_mail_addresses() {
        let result = ServiceConfig::builder()
            .with_bundle_price_id("price_bundle")
            .build();
        assert!(result.is_err());
    }

    #[test]
    fn catalog_uses_image_only_price() -> anyhow::Result<()> {
        let config = builder().with_image_only_price_id("price_image").build()?;
        let catalog = config.catalog();
        assert_eq!(
            catalog.price_for(crate::service::ProductVariant::ImageOnly),
            "price_image"
        );
        Ok(())
    }

    #[test]
    fn public_origin_is_normalized() -> anyhow::Result<()> {
        let config = builder().with_public_origin("https://lore.example/").build()?;
        assert_eq!(
            config.public_origin().as_deref(),
            Some("https://lore.example")
        );
        Ok(())
    }
}
