//! Form encoding of checkout session parameters.
//!
//! The Stripe API takes `application/x-www-form-urlencoded` bodies with
//! bracketed keys for nested values (`metadata[lore_1]`,
//! `line_items[0][price]`).

use lore_service::payment::CheckoutRequest;

/// Flattens `request` into form pairs for `POST /checkout/sessions`.
pub(crate) fn checkout_form(request: &CheckoutRequest) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_owned(), "payment".to_owned()),
        ("payment_method_types[0]".to_owned(), "card".to_owned()),
        ("line_items[0][price]".to_owned(), request.price_id.clone()),
        (
            "line_items[0][quantity]".to_owned(),
            request.quantity.to_string(),
        ),
        ("success_url".to_owned(), request.success_url.clone()),
        ("cancel_url".to_owned(), request.cancel_url.clone()),
    ];

    form.extend(
        request
            .metadata
            .iter()
            .map(|(key, value)| (format!("metadata[{key}]"), value.clone())),
    );

    form
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flattens_line_items_and_metadata() {
        let request = CheckoutRequest::new(
            "price_123",
            "https://lore.example/success?session_id={CHECKOUT_SESSION_ID}",
            "https://lore.example/",
        )
        .with_metadata("pseudo", "Himmel")
        .with_metadata("lore_1", "Tell me lamb");

        let form = checkout_form(&request);
        let get = |key: &str| {
            form.iter()
                .find(|(k, _)| k == key)
                .map(|(_, v)| v.as_str())
        };

        assert_eq!(get("mode"), Some("payment"));
        assert_eq!(get("payment_method_types[0]"), Some("card"));
        assert_eq!(get("line_items[0][price]"), Some("price_123"));
        assert_eq!(get("line_items[0][quantity]"), Some("1"));
        assert_eq!(
            get("success_url"),
            Some("https://lore.example/success?session_id={CHECKOUT_SESSION_ID}")
        );
        assert_eq!(get("metadata[pseudo]"), Some("Himmel"));
        assert_eq!(get("metadata[lore_1]"), Some("Tell me lamb"));
        assert_eq!(form.len(), 8);
    }
}
