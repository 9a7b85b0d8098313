use thiserror::Error;

/// Why a line of free-text input did not become a line item.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LineRejection {
    #[error("expected <name> <quantity> <price>, found {0} token(s)")]
    TooFewTokens(usize),
    #[error("quantity '{0}' is not a number")]
    InvalidQuantity(String),
    #[error("price '{0}' is not a number")]
    InvalidPrice(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
#[error("line {line_number}: {reason}")]
pub struct LineParseError {
    /// 1-based, counted over the raw input including blank lines.
    pub line_number: usize,
    pub reason: LineRejection,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CalcError {
    #[error("empty expression")]
    Empty,
    #[error("malformed number '{0}'")]
    BadNumber(String),
    #[error("unexpected character '{0}'")]
    UnexpectedChar(char),
    #[error("expected a number")]
    ExpectedOperand,
    #[error("unexpected input after the expression")]
    TrailingInput,
    #[error("result is not a finite number")]
    NonFinite,
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum CatalogError {
    #[error("a name is required")]
    MissingName,
    #[error("a price is required")]
    MissingPrice,
    #[error("price '{0}' is not a valid amount")]
    InvalidPrice(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("GST rate {0} is outside 0-100")]
    InvalidGstRate(f64),
}
