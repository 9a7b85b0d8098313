use super::LineItem;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct InvoiceTotals {
    pub line_items: Vec<LineItem>,
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

impl InvoiceTotals {
    pub fn is_empty(&self) -> bool {
        self.line_items.is_empty()
    }

    pub fn item_names(&self) -> Vec<&str> {
        self.line_items.iter().map(|item| item.name.as_str()).collect()
    }
}
