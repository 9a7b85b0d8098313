use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::invoice::{compute_line_item_totals, format_currency, parse_line_items_report};
use crate::models::TaxPolicy;

#[derive(Debug, Parser)]
#[command(name = "quick_invoice", version, about = "Create GST invoices from your terminal")]
pub struct Cli {
    /// Show the onboarding screen even if it was completed before
    #[arg(long)]
    pub show_splash: bool,

    /// Forget that onboarding was completed
    #[arg(long)]
    pub reset_onboarding: bool,

    /// GST rate preselected on the home screen, in percent
    #[arg(long, value_parser = parse_gst_rate)]
    pub gst_rate: Option<f64>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Print the totals for line-item text without starting the UI
    Totals {
        /// GST rate in percent; defaults to the configured rate
        #[arg(long, value_parser = parse_gst_rate)]
        gst_rate: Option<f64>,

        /// File with one `<name> <quantity> <price>` per line; reads stdin when omitted
        file: Option<PathBuf>,
    },
}

fn parse_gst_rate(value: &str) -> Result<f64, String> {
    let rate: f64 = value
        .parse()
        .map_err(|_| format!("'{}' is not a number", value))?;
    if !(0.0..=100.0).contains(&rate) {
        return Err(format!("{} is outside 0-100", rate));
    }
    Ok(rate)
}

/// Plain-text report of parsed items, rejected lines and totals.
pub fn render_totals_report(text: &str, policy: TaxPolicy) -> String {
    let mut items = Vec::new();
    let mut report = String::new();

    for parsed in parse_line_items_report(text) {
        match parsed {
            Ok(item) => {
                report.push_str(&format!(
                    "{:<24} {:>8} x {:>12} = {:>12}\n",
                    item.name,
                    item.quantity,
                    format_currency(item.unit_price),
                    format_currency(item.subtotal()),
                ));
                items.push(item);
            }
            Err(rejected) => report.push_str(&format!("skipped {}\n", rejected)),
        }
    }

    let totals = compute_line_item_totals(&items, policy);
    report.push('\n');
    report.push_str(&format!("Subtotal: {}\n", format_currency(totals.subtotal)));
    report.push_str(&format!("GST ({}): {}\n", policy.label(), format_currency(totals.tax)));
    report.push_str(&format!("Total: {}\n", format_currency(totals.total)));

    report
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn totals_subcommand_parses() {
        let cli = Cli::try_parse_from(["quick_invoice", "totals", "--gst-rate", "5", "items.txt"])
            .unwrap();

        match cli.command {
            Some(Command::Totals { gst_rate, file }) => {
                assert_eq!(gst_rate, Some(5.0));
                assert_eq!(file, Some(PathBuf::from("items.txt")));
            }
            None => panic!("expected the totals subcommand"),
        }
    }

    #[test]
    fn out_of_range_rate_is_refused() {
        assert!(Cli::try_parse_from(["quick_invoice", "--gst-rate", "101"]).is_err());
        assert!(Cli::try_parse_from(["quick_invoice", "--gst-rate", "ten"]).is_err());
    }

    #[test]
    fn report_lists_items_rejections_and_totals() {
        let report = render_totals_report(
            "Snickers 5 100\n\nbroken\nCoca Cola 3 50\nChips 2 75",
            TaxPolicy::Fixed(18.0),
        );

        assert!(report.contains("skipped line 3: expected <name> <quantity> <price>, found 1 token(s)"));
        assert!(report.contains("Subtotal: ₹800.00"));
        assert!(report.contains("GST (Fixed 18%): ₹144.00"));
        assert!(report.ends_with("Total: ₹944.00\n"));
    }
}
