use crate::errors::{LineParseError, LineRejection};
use crate::models::LineItem;

use super::numbers::{parse_leading, parse_leading_integer};

pub type ParsedLine = Result<LineItem, LineParseError>;

/// Parses `<name> <quantity> <price>` lines, dropping every line that does
/// not fit the format.
pub fn parse_line_items_text(text: &str) -> Vec<LineItem> {
    parse_line_items_report(text)
        .into_iter()
        .filter_map(Result::ok)
        .collect()
}

/// Parses every non-blank line and keeps the rejections alongside the items,
/// so the caller can tell the user which lines were ignored and why.
pub fn parse_line_items_report(text: &str) -> Vec<ParsedLine> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| !line.trim().is_empty())
        .map(|(index, line)| {
            parse_line(line).map_err(|reason| LineParseError {
                line_number: index + 1,
                reason,
            })
        })
        .collect()
}

fn parse_line(line: &str) -> Result<LineItem, LineRejection> {
    let tokens: Vec<&str> = line.split_whitespace().collect();
    if tokens.len() < 3 {
        return Err(LineRejection::TooFewTokens(tokens.len()));
    }

    let (name_tokens, numeric_tokens) = tokens.split_at(tokens.len() - 2);
    // Quantities are whole units; prices keep their decimals. Trailing units
    // such as `5pcs` or `40rs` are ignored.
    let quantity = parse_leading_integer(numeric_tokens[0])
        .ok_or_else(|| LineRejection::InvalidQuantity(numeric_tokens[0].to_string()))?;
    let unit_price = parse_leading(numeric_tokens[1])
        .ok_or_else(|| LineRejection::InvalidPrice(numeric_tokens[1].to_string()))?;

    Ok(LineItem::new(name_tokens.join(" "), quantity, unit_price))
}
