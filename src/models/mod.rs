mod line_item;
mod invoice_row;
mod tax_policy;
mod totals;
mod customer;
mod product;
mod history_entry;
mod generated_invoice;

pub use line_item::LineItem;
pub use invoice_row::InvoiceRow;
pub use tax_policy::{TaxPolicy, GST_RATE_PRESETS};
pub use totals::InvoiceTotals;
pub use customer::Customer;
pub use product::Product;
pub use history_entry::{HistoryEntry, InvoiceStatus};
pub use generated_invoice::InvoiceDraft;
