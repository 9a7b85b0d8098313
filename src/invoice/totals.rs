use crate::models::{InvoiceRow, InvoiceTotals, LineItem, TaxPolicy};

use super::numbers::lenient_number;

/// Totals for the item table. Rows missing an item, quantity or price are
/// skipped; unparseable numbers in the remaining rows count as zero.
pub fn compute_totals(rows: &[InvoiceRow], policy: TaxPolicy) -> InvoiceTotals {
    let items: Vec<LineItem> = rows
        .iter()
        .filter(|row| row.contributes())
        .map(row_to_line_item)
        .collect();

    compute_line_item_totals(&items, policy)
}

pub fn compute_line_item_totals(items: &[LineItem], policy: TaxPolicy) -> InvoiceTotals {
    let mut subtotal = 0.0;
    let mut tax = 0.0;

    for item in items {
        let item_subtotal = item.subtotal();
        let rate = match policy {
            TaxPolicy::Fixed(rate) => rate,
            TaxPolicy::PerItem => item.tax_rate_percent.unwrap_or(0.0),
        };

        subtotal += item_subtotal;
        tax += item_subtotal * rate / 100.0;
    }

    InvoiceTotals {
        line_items: items.to_vec(),
        subtotal,
        tax,
        total: subtotal + tax,
    }
}

fn row_to_line_item(row: &InvoiceRow) -> LineItem {
    LineItem {
        name: row.item.clone(),
        quantity: lenient_number(&row.quantity),
        unit_price: lenient_number(&row.price),
        tax_rate_percent: if row.gst.is_empty() {
            None
        } else {
            Some(lenient_number(&row.gst))
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::invoice::parse_line_items_text;
    use proptest::prelude::*;

    fn example_rows() -> Vec<InvoiceRow> {
        vec![
            InvoiceRow::new("Snickers", "5", "100", "18"),
            InvoiceRow::new("Coca Cola", "3", "50", "12"),
            InvoiceRow::new("Chips", "2", "75", "5"),
        ]
    }

    #[test]
    fn fixed_rate_on_parsed_text() {
        let items = parse_line_items_text("Snickers 5 100\nCoca Cola 3 50\nChips 2 75");
        let totals = compute_line_item_totals(&items, TaxPolicy::Fixed(18.0));

        assert_eq!(totals.subtotal, 800.0);
        assert_eq!(totals.tax, 144.0);
        assert_eq!(totals.total, 944.0);
        assert_eq!(totals.item_names(), vec!["Snickers", "Coca Cola", "Chips"]);
    }

    #[test]
    fn rows_without_an_item_are_excluded() {
        let mut rows = example_rows();
        rows.push(InvoiceRow::new("", "10", "1000", "18"));

        let totals = compute_totals(&rows, TaxPolicy::Fixed(18.0));

        assert_eq!(totals.line_items.len(), 3);
        assert_eq!(totals.subtotal, 800.0);
    }

    #[test]
    fn rows_missing_quantity_or_price_are_excluded() {
        let rows = vec![
            InvoiceRow::new("Tea", "", "10", "0"),
            InvoiceRow::new("Coffee", "1", "", "0"),
        ];

        assert!(compute_totals(&rows, TaxPolicy::Fixed(5.0)).is_empty());
    }

    #[test]
    fn unparseable_price_counts_as_zero() {
        let rows = vec![
            InvoiceRow::new("Tea", "2", "abc", "5"),
            InvoiceRow::new("Coffee", "1", "40", "5"),
        ];

        let totals = compute_totals(&rows, TaxPolicy::Fixed(10.0));

        assert_eq!(totals.line_items.len(), 2);
        assert_eq!(totals.line_items[0].unit_price, 0.0);
        assert_eq!(totals.subtotal, 40.0);
        assert_eq!(totals.tax, 4.0);
    }

    #[test]
    fn switching_to_per_item_uses_each_rows_gst() {
        let rows = example_rows();

        let fixed = compute_totals(&rows, TaxPolicy::Fixed(18.0));
        let per_item = compute_totals(&rows, TaxPolicy::PerItem);

        assert_eq!(fixed.tax, 144.0);
        // 500 * 18% + 150 * 12% + 150 * 5%
        assert_eq!(per_item.tax, 90.0 + 18.0 + 7.5);
        assert_eq!(per_item.subtotal, fixed.subtotal);
        assert_eq!(per_item.total, 800.0 + 115.5);
    }

    #[test]
    fn per_item_line_items_use_their_own_rate() {
        let items = vec![
            LineItem::new("Tea", 2.0, 50.0).with_tax_rate(5.0),
            LineItem::new("Cake", 1.0, 100.0),
        ];

        let totals = compute_line_item_totals(&items, TaxPolicy::PerItem);

        assert_eq!(totals.subtotal, 200.0);
        assert_eq!(totals.tax, 5.0);
        assert_eq!(totals.total, 205.0);
    }

    #[test]
    fn per_item_with_blank_or_bad_gst_is_untaxed() {
        let rows = vec![
            InvoiceRow::new("Tea", "1", "100", ""),
            InvoiceRow::new("Coffee", "1", "100", "ten"),
        ];

        assert_eq!(compute_totals(&rows, TaxPolicy::PerItem).tax, 0.0);
    }

    #[test]
    fn no_rows_means_zero_totals() {
        let totals = compute_totals(&[], TaxPolicy::Fixed(28.0));

        assert_eq!(totals, InvoiceTotals::default());
    }

    fn row_strategy() -> impl Strategy<Value = InvoiceRow> {
        (
            "[A-Za-z ]{0,8}",
            0u32..1_000,
            0u32..100_000,
            0u32..=100,
        )
            .prop_map(|(item, quantity, price_paise, gst)| InvoiceRow {
                item,
                quantity: quantity.to_string(),
                price: format!("{:.2}", price_paise as f64 / 100.0),
                gst: gst.to_string(),
            })
    }

    proptest! {
        #[test]
        fn total_is_subtotal_plus_tax(
            rows in proptest::collection::vec(row_strategy(), 0..20),
            rate in 0u32..=100,
        ) {
            let totals = compute_totals(&rows, TaxPolicy::Fixed(rate as f64));
            prop_assert_eq!(totals.total, totals.subtotal + totals.tax);
        }

        #[test]
        fn computing_twice_is_bit_identical(
            rows in proptest::collection::vec(row_strategy(), 0..20),
            per_item in any::<bool>(),
        ) {
            let policy = if per_item { TaxPolicy::PerItem } else { TaxPolicy::Fixed(18.0) };
            let first = compute_totals(&rows, policy);
            let second = compute_totals(&rows, policy);

            prop_assert_eq!(first.subtotal.to_bits(), second.subtotal.to_bits());
            prop_assert_eq!(first.tax.to_bits(), second.tax.to_bits());
            prop_assert_eq!(first.total.to_bits(), second.total.to_bits());
            prop_assert_eq!(first.line_items, second.line_items);
        }

        #[test]
        fn only_contributing_rows_become_items(
            rows in proptest::collection::vec(row_strategy(), 0..20),
        ) {
            let expected = rows.iter().filter(|row| row.contributes()).count();
            prop_assert_eq!(compute_totals(&rows, TaxPolicy::PerItem).line_items.len(), expected);
        }
    }
}
