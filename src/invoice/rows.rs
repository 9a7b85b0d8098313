use crate::models::InvoiceRow;

use super::numbers::parse_strict;

/// Per-cell validity of one table row. Validity only drives highlighting;
/// totals are computed from invalid rows as well.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RowValidation {
    pub item: bool,
    pub quantity: bool,
    pub price: bool,
    pub gst: bool,
}

impl RowValidation {
    pub fn is_valid(&self) -> bool {
        self.item && self.quantity && self.price && self.gst
    }
}

pub fn validate_row(row: &InvoiceRow) -> RowValidation {
    RowValidation {
        item: !row.item.trim().is_empty(),
        quantity: parse_strict(&row.quantity).is_some_and(|quantity| quantity > 0.0),
        price: parse_strict(&row.price).is_some_and(|price| price >= 0.0),
        gst: parse_strict(&row.gst).is_some_and(|rate| (0.0..=100.0).contains(&rate)),
    }
}
