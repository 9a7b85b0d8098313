#[derive(Debug, Clone, PartialEq)]
pub struct LineItem {
    pub name: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub tax_rate_percent: Option<f64>,
}

impl LineItem {
    pub fn new(name: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        Self {
            name: name.into(),
            quantity,
            unit_price,
            tax_rate_percent: None,
        }
    }

    pub fn with_tax_rate(mut self, rate_percent: f64) -> Self {
        self.tax_rate_percent = Some(rate_percent);
        self
    }

    /// Quantity times unit price, before tax.
    pub fn subtotal(&self) -> f64 {
        self.quantity * self.unit_price
    }
}
