use anyhow::Result;
use std::fs::{self, File};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::Command;

use crate::invoice::format_currency;
use crate::models::{InvoiceDraft, TaxPolicy};

/// Service for writing invoice files in Markdown and PDF format
pub struct InvoiceGenerator {
    output_dir: PathBuf,
}

impl InvoiceGenerator {
    pub fn new(output_dir: &Path) -> Result<Self> {
        // Create the output directory if it doesn't exist
        if !output_dir.exists() {
            fs::create_dir_all(output_dir)?;
        }

        Ok(Self {
            output_dir: output_dir.to_path_buf(),
        })
    }

    /// Write a Markdown invoice file and convert it to PDF using pandoc if available
    pub fn generate_invoice(&self, draft: &InvoiceDraft) -> Result<(PathBuf, PathBuf)> {
        let markdown = self.generate_markdown(draft);

        let md_path = self.output_dir.join(format!("{}.md", draft.number));
        let pdf_path = self.output_dir.join(format!("{}.pdf", draft.number));

        let mut file = File::create(&md_path)?;
        file.write_all(markdown.as_bytes())?;

        let pdf_result = Command::new("pandoc")
            .arg(&md_path)
            .arg("-o")
            .arg(&pdf_path)
            .output();

        match pdf_result {
            Ok(output) => {
                if !output.status.success() {
                    let error = String::from_utf8_lossy(&output.stderr);
                    tracing::warn!(%error, "pandoc failed to produce a PDF");
                    self.create_markdown_copy(&md_path, &pdf_path)?;
                }
            }
            Err(e) => {
                tracing::warn!(error = %e, "could not run pandoc");
                self.create_markdown_copy(&md_path, &pdf_path)?;
            }
        }

        Ok((md_path, pdf_path))
    }

    /// Copy the markdown file to the .pdf path so a file is always there to hand over
    fn create_markdown_copy(&self, md_path: &Path, pdf_path: &Path) -> Result<()> {
        fs::copy(md_path, pdf_path)?;
        tracing::info!(path = %pdf_path.display(), "wrote markdown copy in place of PDF");
        Ok(())
    }

    fn generate_markdown(&self, draft: &InvoiceDraft) -> String {
        let mut content = String::new();

        content.push_str(&format!("# Invoice {}\n\n", draft.number));
        content.push_str(&format!("Date: {}\n\n", draft.date.format("%d/%m/%Y")));

        if let Some(customer) = &draft.customer {
            content.push_str("**Bill To:**<br>\n");
            content.push_str(&format!("{}<br>\n", customer.name));
            for detail in [&customer.company, &customer.email, &customer.phone]
                .into_iter()
                .flatten()
            {
                content.push_str(&format!("{}<br>\n", detail));
            }
            content.push('\n');
        }

        content.push_str("| Item | Qty | Price | GST | Amount |\n");
        content.push_str("|:-----|----:|------:|----:|-------:|\n");

        for (index, item) in draft.totals.line_items.iter().enumerate() {
            content.push_str(&format!(
                "| {} | {} | {} | {}% | {} |\n",
                item.name,
                item.quantity,
                format_currency(item.unit_price),
                draft.rate_for(index),
                format_currency(item.subtotal()),
            ));
        }

        let gst_label = match draft.policy {
            TaxPolicy::Fixed(rate) => format!("GST ({}%)", rate),
            TaxPolicy::PerItem => "GST (per item)".to_string(),
        };

        content.push('\n');
        content.push_str(&format!("Subtotal: {}\n\n", format_currency(draft.totals.subtotal)));
        content.push_str(&format!("{}: {}\n\n", gst_label, format_currency(draft.totals.tax)));
        content.push_str(&format!("## Total: {}\n\n", format_currency(draft.totals.total)));
        content.push_str("Thank you for your business!\n");

        content
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::invoice::{compute_line_item_totals, parse_line_items_text};
    use chrono::NaiveDate;

    fn draft() -> InvoiceDraft {
        let items = parse_line_items_text("Snickers 5 100\nCoca Cola 3 50");
        InvoiceDraft {
            number: "INV-000123".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 9).unwrap(),
            customer: Catalog::with_presets().customers().first().cloned(),
            policy: TaxPolicy::Fixed(18.0),
            totals: compute_line_item_totals(&items, TaxPolicy::Fixed(18.0)),
        }
    }

    #[test]
    fn markdown_contains_items_and_totals() {
        let dir = tempfile::tempdir().unwrap();
        let generator = InvoiceGenerator::new(dir.path()).unwrap();

        let markdown = generator.generate_markdown(&draft());

        assert!(markdown.starts_with("# Invoice INV-000123\n"));
        assert!(markdown.contains("Date: 09/03/2024"));
        assert!(markdown.contains("John Doe<br>\nTech Corp<br>"));
        assert!(markdown.contains("| Coca Cola | 3 | ₹50.00 | 18% | ₹150.00 |"));
        assert!(markdown.contains("GST (18%): ₹117.00"));
        assert!(markdown.contains("## Total: ₹767.00"));
    }

    #[test]
    fn writes_both_files_even_without_pandoc() {
        let dir = tempfile::tempdir().unwrap();
        let generator = InvoiceGenerator::new(&dir.path().join("out")).unwrap();

        let (md_path, pdf_path) = generator.generate_invoice(&draft()).unwrap();

        assert!(md_path.ends_with("INV-000123.md"));
        assert!(md_path.exists());
        assert!(pdf_path.exists());
    }
}
