use crate::errors::CalcError;

/// Shown in place of a result when the expression cannot be evaluated.
pub const ERROR_MARKER: &str = "Error";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn glyph(&self) -> char {
        match self {
            Operator::Add => '+',
            Operator::Subtract => '-',
            Operator::Multiply => '×',
            Operator::Divide => '÷',
        }
    }

    /// Accepts the keypad glyphs and their ASCII equivalents.
    pub fn from_char(c: char) -> Option<Self> {
        match c {
            '+' => Some(Operator::Add),
            '-' => Some(Operator::Subtract),
            '×' | '*' | 'x' => Some(Operator::Multiply),
            '÷' | '/' => Some(Operator::Divide),
            _ => None,
        }
    }

    fn apply(&self, lhs: f64, rhs: f64) -> f64 {
        match self {
            Operator::Add => lhs + rhs,
            Operator::Subtract => lhs - rhs,
            Operator::Multiply => lhs * rhs,
            Operator::Divide => lhs / rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CalcKey {
    Digit(char),
    Decimal,
    Operator(Operator),
    Clear,
    Backspace,
    Equals,
}

impl CalcKey {
    /// Maps a keypad label (`"7"`, `"."`, `"×"`, `"clear"`, `"backspace"`,
    /// `"="`, ...) to a key.
    pub fn from_token(token: &str) -> Option<Self> {
        match token {
            "clear" => return Some(CalcKey::Clear),
            "backspace" | "⌫" => return Some(CalcKey::Backspace),
            "=" => return Some(CalcKey::Equals),
            "." => return Some(CalcKey::Decimal),
            _ => {}
        }

        let mut chars = token.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) if c.is_ascii_digit() => Some(CalcKey::Digit(c)),
            (Some(c), None) => Operator::from_char(c).map(CalcKey::Operator),
            _ => None,
        }
    }
}

/// Keypad calculator. Keys accumulate into an infix display string that is
/// evaluated on `=`.
#[derive(Debug, Clone)]
pub struct Calculator {
    display: String,
}

impl Calculator {
    pub fn new() -> Self {
        Self {
            display: "0".to_string(),
        }
    }

    pub fn display(&self) -> &str {
        &self.display
    }

    pub fn press(&mut self, key: CalcKey) {
        if self.display == ERROR_MARKER {
            self.display = "0".to_string();
        }

        match key {
            CalcKey::Digit(digit) => {
                if self.display == "0" {
                    self.display.clear();
                }
                self.display.push(digit);
            }
            CalcKey::Decimal => self.display.push('.'),
            CalcKey::Operator(op) => self.push_operator(op),
            CalcKey::Clear => self.display = "0".to_string(),
            CalcKey::Backspace => {
                if self.display.chars().count() > 1 {
                    self.display.pop();
                } else {
                    self.display = "0".to_string();
                }
            }
            CalcKey::Equals => {
                self.display = match evaluate(&self.display) {
                    Ok(value) => format_result(value),
                    Err(_) => ERROR_MARKER.to_string(),
                };
            }
        }
    }

    /// Presses a sequence of keypad labels; unknown labels are ignored.
    pub fn press_tokens<'a>(&mut self, tokens: impl IntoIterator<Item = &'a str>) {
        for token in tokens {
            if let Some(key) = CalcKey::from_token(token) {
                self.press(key);
            }
        }
    }

    fn push_operator(&mut self, op: Operator) {
        let trimmed_len = self.display.trim_end().len();
        let pending = self.display[..trimmed_len]
            .chars()
            .next_back()
            .filter(|c| Operator::from_char(*c).is_some())
            .filter(|_| self.display[..trimmed_len].chars().count() > 1);

        if let Some(previous) = pending {
            let keep = trimmed_len - previous.len_utf8();
            self.display.truncate(keep);
            let kept_len = self.display.trim_end().len();
            self.display.truncate(kept_len);
            if self.display.is_empty() {
                self.display.push('0');
            }
        }

        self.display.push(' ');
        self.display.push(op.glyph());
        self.display.push(' ');
    }
}

impl Default for Calculator {
    fn default() -> Self {
        Self::new()
    }
}

fn format_result(value: f64) -> String {
    if value == 0.0 {
        // Avoids showing "-0".
        "0".to_string()
    } else {
        value.to_string()
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token {
    Number(f64),
    Op(Operator),
}

/// Evaluates `+ - × ÷` over decimal literals with the usual precedence.
/// Unary signs are accepted; parentheses are not.
pub fn evaluate(expression: &str) -> Result<f64, CalcError> {
    let tokens = tokenize(expression)?;
    if tokens.is_empty() {
        return Err(CalcError::Empty);
    }

    let mut parser = ExprParser { tokens: &tokens, pos: 0 };
    let value = parser.expression()?;
    if parser.pos != tokens.len() {
        return Err(CalcError::TrailingInput);
    }

    if value.is_finite() {
        Ok(value)
    } else {
        Err(CalcError::NonFinite)
    }
}

fn tokenize(expression: &str) -> Result<Vec<Token>, CalcError> {
    let mut tokens = Vec::new();
    let mut chars = expression.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
        } else if c.is_ascii_digit() || c == '.' {
            let mut literal = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() || d == '.' {
                    literal.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            tokens.push(Token::Number(parse_literal(&literal)?));
        } else if let Some(op) = Operator::from_char(c) {
            tokens.push(Token::Op(op));
            chars.next();
        } else {
            return Err(CalcError::UnexpectedChar(c));
        }
    }

    Ok(tokens)
}

fn parse_literal(literal: &str) -> Result<f64, CalcError> {
    let dots = literal.chars().filter(|c| *c == '.').count();
    let digits = literal.len() - dots;
    if dots > 1 || digits == 0 {
        return Err(CalcError::BadNumber(literal.to_string()));
    }

    literal
        .parse::<f64>()
        .map_err(|_| CalcError::BadNumber(literal.to_string()))
}

struct ExprParser<'a> {
    tokens: &'a [Token],
    pos: usize,
}

impl ExprParser<'_> {
    fn peek_op(&self) -> Option<Operator> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(op)) => Some(*op),
            _ => None,
        }
    }

    fn expression(&mut self) -> Result<f64, CalcError> {
        let mut value = self.term()?;
        while let Some(op @ (Operator::Add | Operator::Subtract)) = self.peek_op() {
            self.pos += 1;
            let rhs = self.term()?;
            value = op.apply(value, rhs);
        }
        Ok(value)
    }

    fn term(&mut self) -> Result<f64, CalcError> {
        let mut value = self.unary()?;
        while let Some(op @ (Operator::Multiply | Operator::Divide)) = self.peek_op() {
            self.pos += 1;
            let rhs = self.unary()?;
            value = op.apply(value, rhs);
        }
        Ok(value)
    }

    fn unary(&mut self) -> Result<f64, CalcError> {
        match self.tokens.get(self.pos) {
            Some(Token::Op(Operator::Subtract)) => {
                self.pos += 1;
                Ok(-self.unary()?)
            }
            Some(Token::Op(Operator::Add)) => {
                self.pos += 1;
                self.unary()
            }
            Some(Token::Number(value)) => {
                self.pos += 1;
                Ok(*value)
            }
            _ => Err(CalcError::ExpectedOperand),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn run(tokens: &[&str]) -> String {
        let mut calculator = Calculator::new();
        calculator.press_tokens(tokens.iter().copied());
        calculator.display().to_string()
    }

    #[test]
    fn multiplies_with_the_keypad_glyph() {
        assert_eq!(run(&["5", "×", "3", "="]), "15");
    }

    #[test]
    fn division_by_zero_shows_the_error_marker() {
        assert_eq!(run(&["8", "÷", "0", "="]), ERROR_MARKER);
        assert_eq!(run(&["0", "÷", "0", "="]), ERROR_MARKER);
    }

    #[test]
    fn leading_zero_is_replaced_but_decimal_point_extends_it() {
        assert_eq!(run(&["7"]), "7");
        assert_eq!(run(&[".", "5"]), "0.5");
    }

    #[test]
    fn large_and_small_results_print_without_exponents() {
        let mut keys = vec!["1"];
        keys.extend(["0"; 9]);
        keys.push("×");
        keys.push("1");
        keys.extend(["0"; 12]);
        keys.push("=");
        assert_eq!(run(&keys), "1000000000000000000000");

        let mut keys = vec!["1", "÷", "1"];
        keys.extend(["0"; 8]);
        keys.push("=");
        assert_eq!(run(&keys), "0.00000001");
    }

    #[test]
    fn operators_are_spaced() {
        assert_eq!(run(&["1", "2", "+", "3"]), "12 + 3");
    }

    #[test]
    fn repeated_operator_replaces_the_pending_one() {
        assert_eq!(run(&["9", "+", "×"]), "9 × ");
        assert_eq!(run(&["9", "+", "×", "2", "="]), "18");
    }

    #[test]
    fn clear_and_backspace() {
        assert_eq!(run(&["4", "2", "clear"]), "0");
        assert_eq!(run(&["4", "2", "backspace"]), "4");
        assert_eq!(run(&["4", "backspace"]), "0");
        assert_eq!(run(&["backspace"]), "0");
    }

    #[test]
    fn trailing_operator_is_an_error() {
        assert_eq!(run(&["5", "+", "="]), ERROR_MARKER);
    }

    #[test]
    fn input_after_an_error_starts_over() {
        assert_eq!(run(&["1", "÷", "0", "=", "4"]), "4");
    }

    #[test]
    fn negative_results_can_be_continued() {
        assert_eq!(run(&["2", "-", "5", "=", "+", "1", "="]), "-2");
    }

    #[test]
    fn fractional_results_print_shortest_form() {
        assert_eq!(run(&["1", "÷", "4", "="]), "0.25");
        assert_eq!(run(&["5", "-", "5", "="]), "0");
    }

    #[rstest]
    #[case("2 + 3 × 4", 14.0)]
    #[case("10 - 4 - 3", 3.0)]
    #[case("8 ÷ 2 × 3", 12.0)]
    #[case("2 * 3 / 4", 1.5)]
    #[case("-5 + 2", -3.0)]
    #[case("3 × -2", -6.0)]
    #[case(".5 + 5.", 5.5)]
    fn evaluates_with_precedence(#[case] expression: &str, #[case] expected: f64) {
        assert_eq!(evaluate(expression), Ok(expected));
    }

    #[rstest]
    #[case("", CalcError::Empty)]
    #[case("1.2.3 + 1", CalcError::BadNumber("1.2.3".to_string()))]
    #[case("2 + ", CalcError::ExpectedOperand)]
    #[case("2 3", CalcError::TrailingInput)]
    #[case("alert(1)", CalcError::UnexpectedChar('a'))]
    #[case("(1 + 2)", CalcError::UnexpectedChar('('))]
    #[case("1 ÷ 0", CalcError::NonFinite)]
    fn rejects_anything_else(#[case] expression: &str, #[case] expected: CalcError) {
        assert_eq!(evaluate(expression), Err(expected));
    }

    #[test]
    fn key_tokens() {
        assert_eq!(CalcKey::from_token("7"), Some(CalcKey::Digit('7')));
        assert_eq!(CalcKey::from_token("÷"), Some(CalcKey::Operator(Operator::Divide)));
        assert_eq!(CalcKey::from_token("⌫"), Some(CalcKey::Backspace));
        assert_eq!(CalcKey::from_token("12"), None);
    }
}
