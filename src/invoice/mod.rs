//! Invoice computation: line-item parsing, row validation, totals, the
//! keypad calculator and share-message formatting. Nothing here touches the
//! terminal or the filesystem.

pub mod calculator;
mod numbers;
pub mod parser;
pub mod rows;
pub mod share;
pub mod totals;

pub use calculator::{CalcKey, Calculator, Operator, ERROR_MARKER};
pub use parser::{parse_line_items_report, parse_line_items_text, ParsedLine};
pub use rows::{validate_row, RowValidation};
pub use share::{invoice_number, share_message, share_url};
pub use totals::{compute_line_item_totals, compute_totals};

pub const CURRENCY_SYMBOL: &str = "₹";

/// Formats an amount the way every screen shows money: rupee sign, two decimals.
pub fn format_currency(amount: f64) -> String {
    format!("{}{:.2}", CURRENCY_SYMBOL, amount)
}
