//! Request extractors with readable rejections.
//!
//! - [`Json`] and [`ValidateJson`]: JSON bodies, the latter also running
//!   `validator` rules.
//! - [`StripeSignature`]: the raw webhook signature header.
//! - [`LoreHeader`]: base64 copy of the lore sent by the preview page.
//! - [`RequestOrigin`]: origin the buyer is browsing from.
//! - [`CookieLore`]: lore restored from the cache cookies.

mod cookies;
mod headers;
pub mod reject;

pub use crate::extract::cookies::{
    CookieLore, LORE_CACHE_COOKIE, LORE_META_COOKIE, LoreMeta, cache_cookies,
};
pub use crate::extract::headers::{
    LORE_B64_HEADER, LoreHeader, RequestOrigin, STRIPE_SIGNATURE_HEADER, StripeSignature,
};
pub use crate::extract::reject::{Json, ValidateJson};

/// Tracing target for extractors.
pub const TRACING_TARGET: &str = "lore_server::extract";
