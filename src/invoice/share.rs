use crate::models::InvoiceTotals;

use super::format_currency;

/// `INV-` plus the last six digits of a millisecond timestamp.
pub fn invoice_number(timestamp_millis: i64) -> String {
    format!("INV-{:06}", timestamp_millis.rem_euclid(1_000_000))
}

/// The plain-text message handed to the share target.
pub fn share_message(invoice_number: &str, customer_name: &str, totals: &InvoiceTotals) -> String {
    format!(
        "Invoice {}\nCustomer: {}\nAmount: {}\nItems: {}\n\nThank you for your business!",
        invoice_number,
        customer_name,
        format_currency(totals.total),
        totals.item_names().join(", "),
    )
}

/// Appends the URL-encoded message to a share-intent base such as
/// `https://wa.me/?text=`.
pub fn share_url(base_url: &str, message: &str) -> String {
    format!("{}{}", base_url, urlencoding::encode(message))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::{compute_line_item_totals, parse_line_items_text};
    use crate::models::TaxPolicy;

    #[test]
    fn invoice_number_keeps_six_digits() {
        assert_eq!(invoice_number(1_718_000_123_456), "INV-123456");
        assert_eq!(invoice_number(1_718_000_000_042), "INV-000042");
    }

    #[test]
    fn message_lists_amount_and_items() {
        let items = parse_line_items_text("Snickers 5 100\nCoca Cola 3 50\nChips 2 75");
        let totals = compute_line_item_totals(&items, TaxPolicy::Fixed(18.0));

        let message = share_message("INV-000001", "John Doe", &totals);

        assert_eq!(
            message,
            "Invoice INV-000001\nCustomer: John Doe\nAmount: ₹944.00\nItems: Snickers, Coca Cola, Chips\n\nThank you for your business!"
        );
    }

    #[test]
    fn url_encodes_the_message() {
        let url = share_url("https://wa.me/?text=", "Invoice INV-1\nAmount: ₹5.00");

        assert_eq!(
            url,
            "https://wa.me/?text=Invoice%20INV-1%0AAmount%3A%20%E2%82%B95.00"
        );
    }
}
