use chrono::NaiveDate;

use super::{Customer, HistoryEntry, InvoiceStatus, InvoiceTotals, TaxPolicy};

/// Everything the review sheet, the share message and the exporter need
/// about one invoice.
#[derive(Debug, Clone)]
pub struct InvoiceDraft {
    pub number: String,
    pub date: NaiveDate,
    pub customer: Option<Customer>,
    pub policy: TaxPolicy,
    pub totals: InvoiceTotals,
}

impl InvoiceDraft {
    /// Generation needs a customer and at least one item.
    pub fn can_generate(&self) -> bool {
        self.customer.is_some() && !self.totals.is_empty()
    }

    /// Rate applied to one item under this draft's policy.
    pub fn rate_for(&self, index: usize) -> f64 {
        match self.policy {
            TaxPolicy::Fixed(rate) => rate,
            TaxPolicy::PerItem => self
                .totals
                .line_items
                .get(index)
                .and_then(|item| item.tax_rate_percent)
                .unwrap_or(0.0),
        }
    }

    /// A freshly generated invoice starts out pending.
    pub fn history_entry(&self) -> HistoryEntry {
        HistoryEntry {
            id: self.number.clone(),
            customer: self
                .customer
                .as_ref()
                .map(|customer| customer.name.clone())
                .unwrap_or_default(),
            amount: self.totals.total,
            status: InvoiceStatus::Pending,
            date: self.date,
            items: self.totals.item_names().iter().map(|name| name.to_string()).collect(),
        }
    }
}
