#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

pub mod completion;
pub mod mail;
pub mod payment;

pub use completion::{CompletionProvider, CompletionService};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use completion::MockCompletionProvider;
pub use lore_core::{BoxedError, Error, ErrorKind, Result, ServiceHealth, ServiceStatus};
pub use mail::{MailProvider, MailService};
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use mail::MockMailProvider;
#[cfg(any(test, feature = "test-utils"))]
#[cfg_attr(docsrs, doc(cfg(feature = "test-utils")))]
pub use payment::MockPaymentProvider;
pub use payment::{PaymentProvider, PaymentService};
