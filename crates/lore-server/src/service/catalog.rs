//! Products sold through checkout.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Product sold by a checkout session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductVariant {
    /// Rendered image only.
    ImageOnly,
    /// Lore text plus the rendered image.
    #[default]
    #[serde(other)]
    Bundle,
}

/// Maps each [`ProductVariant`] to a provider price id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductCatalog {
    bundle_price: String,
    image_only_price: Option<String>,
}

impl ProductCatalog {
    pub fn new(bundle_price: impl Into<String>) -> Self {
        Self {
            bundle_price: bundle_price.into(),
            image_only_price: None,
        }
    }

    #[must_use]
    pub fn with_image_only_price(mut self, price: impl Into<String>) -> Self {
        self.image_only_price = Some(price.into());
        self
    }

    /// Returns the price of `variant`, falling back to the bundle price
    /// when no image-only price is configured.
    pub fn price_for(&self, variant: ProductVariant) -> &str {
        match variant {
            ProductVariant::Bundle => &self.bundle_price,
            ProductVariant::ImageOnly => self
                .image_only_price
                .as_deref()
                .unwrap_or(&self.bundle_price),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn image_only_falls_back_to_bundle() {
        let catalog = ProductCatalog::new("price_bundle");
        assert_eq!(catalog.price_for(ProductVariant::ImageOnly), "price_bundle");

        let catalog = catalog.with_image_only_price("price_image");
        assert_eq!(catalog.price_for(ProductVariant::ImageOnly), "price_image");
        assert_eq!(catalog.price_for(ProductVariant::Bundle), "price_bundle");
    }
}
