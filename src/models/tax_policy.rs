/// GST rates offered by the rate selector, in percent.
pub const GST_RATE_PRESETS: [f64; 5] = [0.0, 5.0, 12.0, 18.0, 28.0];

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TaxPolicy {
    /// One rate applied to every item.
    Fixed(f64),
    /// Each item carries its own rate.
    PerItem,
}

impl TaxPolicy {
    pub fn is_per_item(&self) -> bool {
        matches!(self, TaxPolicy::PerItem)
    }

    pub fn label(&self) -> String {
        match self {
            TaxPolicy::Fixed(rate) => format!("Fixed {}%", rate),
            TaxPolicy::PerItem => "Per item".to_string(),
        }
    }
}

impl Default for TaxPolicy {
    fn default() -> Self {
        TaxPolicy::Fixed(18.0)
    }
}
