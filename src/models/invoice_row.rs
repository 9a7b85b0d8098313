/// One row of the item table. Every cell holds the raw text the user typed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InvoiceRow {
    pub item: String,
    pub quantity: String,
    pub price: String,
    pub gst: String,
}

impl InvoiceRow {
    pub fn new(item: &str, quantity: &str, price: &str, gst: &str) -> Self {
        Self {
            item: item.to_string(),
            quantity: quantity.to_string(),
            price: price.to_string(),
            gst: gst.to_string(),
        }
    }

    /// Rows count towards totals once item, quantity and price hold any text at all.
    pub fn contributes(&self) -> bool {
        !self.item.is_empty() && !self.quantity.is_empty() && !self.price.is_empty()
    }
}
