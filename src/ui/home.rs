use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::invoice::{
    compute_line_item_totals, format_currency, parse_line_items_report, parse_line_items_text,
    CalcKey, Calculator, Operator,
};
use crate::models::{InvoiceTotals, TaxPolicy, GST_RATE_PRESETS};
use crate::ui::components::layout::{render_error, render_help};
use crate::ui::components::nav_bar::render_nav_bar;
use crate::ui::components::text_input::{InputKind, TextInputState};
use crate::ui::NavTab;

pub const EXAMPLE_TEXT: &str = "Snickers 5 100\nCoca Cola 3 50\nChips 2 75";

const KEYPAD: [[&str; 4]; 4] = [
    ["7", "8", "9", "÷"],
    ["4", "5", "6", "×"],
    ["1", "2", "3", "-"],
    [".", "0", "⌫", "+"],
];

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum HomeField {
    Items,
    GstRate,
    Calculator,
}

pub enum HomeAction {
    Generate(InvoiceTotals, TaxPolicy),
    OpenTable,
    Navigate(NavTab),
    Exit,
}

pub struct HomeState {
    items_input: TextInputState,
    rate_options: Vec<f64>,
    rate_index: usize,
    current_field: HomeField,
    editing: bool,
    show_calculator: bool,
    calculator: Calculator,
    invoice_count: u32,
    show_error: Option<String>,
}

/// The preset rates, plus the configured default when it is not one of them.
pub fn rate_options(default_rate: f64) -> Vec<f64> {
    let mut options = GST_RATE_PRESETS.to_vec();
    if !options.contains(&default_rate) {
        options.push(default_rate);
        options.sort_by(|a, b| a.total_cmp(b));
    }
    options
}

impl HomeState {
    pub fn new(default_rate: f64, invoice_count: u32) -> Self {
        let rate_options = rate_options(default_rate);
        let rate_index = rate_options
            .iter()
            .position(|rate| *rate == default_rate)
            .unwrap_or(0);

        Self {
            items_input: TextInputState::new(InputKind::Multiline),
            rate_options,
            rate_index,
            current_field: HomeField::Items,
            editing: false,
            show_calculator: false,
            calculator: Calculator::new(),
            invoice_count,
            show_error: None,
        }
    }

    pub fn gst_rate(&self) -> f64 {
        self.rate_options[self.rate_index]
    }

    pub fn tax_policy(&self) -> TaxPolicy {
        TaxPolicy::Fixed(self.gst_rate())
    }

    pub fn items_text(&self) -> &str {
        &self.items_input.value
    }

    pub fn invoice_count(&self) -> u32 {
        self.invoice_count
    }

    pub fn calculator_display(&self) -> &str {
        self.calculator.display()
    }

    pub fn totals(&self) -> InvoiceTotals {
        compute_line_item_totals(&parse_line_items_text(self.items_text()), self.tax_policy())
    }

    /// Clears the form and bumps the counter once an invoice has been generated.
    pub fn invoice_generated(&mut self) {
        self.items_input.clear();
        self.editing = false;
        self.count_invoice();
    }

    /// Bumps the counter without touching the form, for invoices generated elsewhere.
    pub fn count_invoice(&mut self) {
        self.invoice_count += 1;
    }

    fn fields(&self) -> Vec<HomeField> {
        let mut fields = vec![HomeField::Items, HomeField::GstRate];
        if self.show_calculator {
            fields.push(HomeField::Calculator);
        }
        fields
    }

    pub fn next_field(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = fields[(index + 1) % fields.len()];
    }

    pub fn previous_field(&mut self) {
        let fields = self.fields();
        let index = fields.iter().position(|f| *f == self.current_field).unwrap_or(0);
        self.current_field = fields[(index + fields.len() - 1) % fields.len()];
    }

    fn next_rate(&mut self) {
        self.rate_index = (self.rate_index + 1) % self.rate_options.len();
    }

    fn previous_rate(&mut self) {
        let len = self.rate_options.len();
        self.rate_index = (self.rate_index + len - 1) % len;
    }

    pub fn toggle_calculator(&mut self) {
        self.show_calculator = !self.show_calculator;
        if self.show_calculator {
            self.current_field = HomeField::Calculator;
        } else if self.current_field == HomeField::Calculator {
            self.current_field = HomeField::Items;
            self.editing = false;
        }
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<HomeAction> {
        // Clear any existing error message
        self.show_error = None;

        if let Some(tab) = NavTab::from_key(key) {
            if tab != NavTab::Home {
                return Some(HomeAction::Navigate(tab));
            }
            return None;
        }

        if self.editing {
            self.edit_current_field(key);
            return None;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => return Some(HomeAction::Exit),
            KeyCode::Up => self.previous_field(),
            KeyCode::Down | KeyCode::Tab => self.next_field(),
            KeyCode::Left if self.current_field == HomeField::GstRate => self.previous_rate(),
            KeyCode::Right if self.current_field == HomeField::GstRate => self.next_rate(),
            KeyCode::Enter => self.editing = true,
            KeyCode::Char('c') => self.toggle_calculator(),
            KeyCode::Char('e') => {
                self.items_input = TextInputState::with_value(InputKind::Multiline, EXAMPLE_TEXT);
            }
            KeyCode::Char('t') => return Some(HomeAction::OpenTable),
            KeyCode::Char('g') => {
                if self.items_input.is_blank() {
                    self.show_error = Some("Enter at least one item before generating.".to_string());
                } else {
                    return Some(HomeAction::Generate(self.totals(), self.tax_policy()));
                }
            }
            _ => {}
        }

        None
    }

    fn edit_current_field(&mut self, key: KeyCode) {
        if key == KeyCode::Esc {
            self.editing = false;
            return;
        }

        match self.current_field {
            HomeField::Items => {
                self.items_input.handle_input(key);
            }
            HomeField::GstRate => match key {
                KeyCode::Left => self.previous_rate(),
                KeyCode::Right => self.next_rate(),
                KeyCode::Enter => self.editing = false,
                _ => {}
            },
            HomeField::Calculator => {
                if let Some(calc_key) = calculator_key(key) {
                    self.calculator.press(calc_key);
                }
            }
        }
    }
}

fn calculator_key(key: KeyCode) -> Option<CalcKey> {
    match key {
        KeyCode::Enter | KeyCode::Char('=') => Some(CalcKey::Equals),
        KeyCode::Backspace => Some(CalcKey::Backspace),
        KeyCode::Delete | KeyCode::Char('c') => Some(CalcKey::Clear),
        KeyCode::Char('.') => Some(CalcKey::Decimal),
        KeyCode::Char(c) if c.is_ascii_digit() => Some(CalcKey::Digit(c)),
        KeyCode::Char(c) => Operator::from_char(c).map(CalcKey::Operator),
        _ => None,
    }
}

fn field_style(state: &HomeState, field: HomeField) -> Style {
    if state.current_field == field {
        if state.editing {
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Yellow)
        }
    } else {
        Style::default()
    }
}

pub fn render_home<B: Backend>(frame: &mut Frame<B>, state: &mut HomeState) {
    let mut constraints = vec![
        Constraint::Length(3), // Header
        Constraint::Length(7), // How it works
        Constraint::Min(6),    // Items
        Constraint::Length(3), // GST rate
        Constraint::Length(6), // Totals
    ];
    if state.show_calculator {
        constraints.push(Constraint::Length(9));
    }
    constraints.push(Constraint::Length(3)); // Help
    constraints.push(Constraint::Length(2)); // Navigation

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(constraints)
        .split(frame.size());

    render_header(frame, state, chunks[0]);
    render_how_it_works(frame, state, chunks[1]);

    let items_editing = state.editing && state.current_field == HomeField::Items;
    let items_text = if state.items_input.value.is_empty() && !items_editing {
        "Enter items like: Snickers 5 100".to_string()
    } else {
        state.items_input.get_display_string(items_editing)
    };
    let items = Paragraph::new(items_text)
        .block(
            Block::default()
                .title("Enter Invoice Items")
                .borders(Borders::ALL)
                .border_style(field_style(state, HomeField::Items)),
        )
        .wrap(Wrap { trim: false });
    frame.render_widget(items, chunks[2]);

    let rate_spans: Vec<Span> = state
        .rate_options
        .iter()
        .enumerate()
        .flat_map(|(index, rate)| {
            let style = if index == state.rate_index {
                Style::default().bg(Color::Blue).fg(Color::White)
            } else {
                Style::default()
            };
            vec![Span::styled(format!(" {}% ", rate), style), Span::raw(" ")]
        })
        .collect();
    let mut rate_line = vec![Span::styled("GST: ", field_style(state, HomeField::GstRate))];
    rate_line.extend(rate_spans);
    let rates = Paragraph::new(Spans::from(rate_line)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(field_style(state, HomeField::GstRate)),
    );
    frame.render_widget(rates, chunks[3]);

    render_totals(frame, state, chunks[4]);

    let mut next = 5;
    if state.show_calculator {
        render_calculator(frame, state, chunks[next]);
        next += 1;
    }

    let help_text = match (state.editing, state.current_field) {
        (false, _) => {
            "Enter - Edit | Up/Down - Navigate | G - Generate | T - Table | E - Example | C - Calculator | Q - Quit"
        }
        (true, HomeField::Items) => "Type items, Enter for a new line | Esc - Done",
        (true, HomeField::GstRate) => "Left/Right - Change rate | Enter - Done",
        (true, HomeField::Calculator) => {
            "0-9 . + - * / - Keys | Enter - Calculate | Backspace - Delete | C - Clear | Esc - Done"
        }
    };
    render_help(frame, chunks[next], help_text);
    render_nav_bar(frame, chunks[next + 1], NavTab::Home);

    if let Some(error) = &state.show_error {
        let size = frame.size();
        render_error(frame, size, error);
    }
}

fn render_header<B: Backend>(frame: &mut Frame<B>, state: &HomeState, area: Rect) {
    let header = Paragraph::new(Spans::from(vec![
        Span::styled("Create Invoice", Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)),
        Span::raw("  Enter items in simple format    "),
        Span::styled(
            format!(" {} invoices ", state.invoice_count),
            Style::default().bg(Color::Blue).fg(Color::White),
        ),
    ]))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn render_how_it_works<B: Backend>(frame: &mut Frame<B>, state: &HomeState, area: Rect) {
    let example = compute_line_item_totals(&parse_line_items_text(EXAMPLE_TEXT), state.tax_policy());

    let content = vec![
        Spans::from("Format: Item Quantity Price"),
        Spans::from(Span::styled(
            EXAMPLE_TEXT.replace('\n', "  |  "),
            Style::default().fg(Color::Gray),
        )),
        Spans::from(format!(
            "Calculation: (5×100) + (3×50) + (2×75) = {}",
            format_currency(example.subtotal)
        )),
        Spans::from(format!("+ GST ({}%): {}", state.gst_rate(), format_currency(example.tax))),
        Spans::from(Span::styled(
            format!("Total: {}", format_currency(example.total)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ];

    let card = Paragraph::new(content).block(Block::default().title("How it works").borders(Borders::ALL));
    frame.render_widget(card, area);
}

fn render_totals<B: Backend>(frame: &mut Frame<B>, state: &HomeState, area: Rect) {
    let report = parse_line_items_report(state.items_text());
    let rejected: Vec<_> = report.iter().filter_map(|line| line.as_ref().err()).collect();
    let totals = state.totals();

    let mut content = vec![Spans::from(format!(
        "{} item(s) | Subtotal {} | GST ({}%) {} | Total {}",
        totals.line_items.len(),
        format_currency(totals.subtotal),
        state.gst_rate(),
        format_currency(totals.tax),
        format_currency(totals.total),
    ))];

    if let Some(first) = rejected.first() {
        content.push(Spans::from(Span::styled(
            format!("{} line(s) ignored", rejected.len()),
            Style::default().fg(Color::Red),
        )));
        content.push(Spans::from(Span::styled(
            first.to_string(),
            Style::default().fg(Color::Red),
        )));
    }

    let summary = Paragraph::new(content)
        .block(Block::default().title("Totals").borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(summary, area);
}

fn render_calculator<B: Backend>(frame: &mut Frame<B>, state: &HomeState, area: Rect) {
    let mut content = vec![Spans::from(Span::styled(
        state.calculator.display().to_string(),
        Style::default().add_modifier(Modifier::BOLD),
    ))];

    for row in KEYPAD.iter() {
        let keys = row.iter().map(|key| format!("[{:^3}]", key)).collect::<Vec<_>>().join(" ");
        content.push(Spans::from(keys));
    }
    content.push(Spans::from("[ Clear ] [ Calculate ]"));

    let calculator = Paragraph::new(content).alignment(Alignment::Right).block(
        Block::default()
            .title("Calculator")
            .borders(Borders::ALL)
            .border_style(field_style(state, HomeField::Calculator)),
    );
    frame.render_widget(calculator, area);
}

pub fn handle_input(state: &mut HomeState) -> Result<Option<HomeAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut HomeState, text: &str) {
        for c in text.chars() {
            let key = if c == '\n' { KeyCode::Enter } else { KeyCode::Char(c) };
            state.handle_key(key);
        }
    }

    #[test]
    fn typed_items_produce_live_totals() {
        let mut state = HomeState::new(18.0, 42);
        state.handle_key(KeyCode::Enter);
        type_text(&mut state, "Snickers 5 100\nCoca Cola 3 50\nChips 2 75");
        state.handle_key(KeyCode::Esc);

        let totals = state.totals();
        assert_eq!(totals.subtotal, 800.0);
        assert_eq!(totals.tax, 144.0);
        assert_eq!(totals.total, 944.0);
    }

    #[test]
    fn changing_the_rate_recomputes() {
        let mut state = HomeState::new(18.0, 42);
        state.handle_key(KeyCode::Char('e'));
        state.handle_key(KeyCode::Down);
        state.handle_key(KeyCode::Right);

        assert_eq!(state.gst_rate(), 28.0);
        assert_eq!(state.totals().tax, 224.0);
    }

    #[test]
    fn generate_is_refused_on_blank_text() {
        let mut state = HomeState::new(18.0, 42);

        assert!(state.handle_key(KeyCode::Char('g')).is_none());
        assert!(state.show_error.is_some());

        state.handle_key(KeyCode::Char('e'));
        match state.handle_key(KeyCode::Char('g')) {
            Some(HomeAction::Generate(totals, policy)) => {
                assert_eq!(totals.line_items.len(), 3);
                assert_eq!(policy, TaxPolicy::Fixed(18.0));
            }
            _ => panic!("expected a generate action"),
        }
    }

    #[test]
    fn generation_resets_the_form_and_counts() {
        let mut state = HomeState::new(18.0, 42);
        state.handle_key(KeyCode::Char('e'));

        state.invoice_generated();

        assert!(state.items_text().is_empty());
        assert_eq!(state.invoice_count(), 43);
    }

    #[test]
    fn counting_an_invoice_keeps_the_typed_items() {
        let mut state = HomeState::new(18.0, 42);
        state.handle_key(KeyCode::Char('e'));

        state.count_invoice();

        assert_eq!(state.items_text(), EXAMPLE_TEXT);
        assert_eq!(state.invoice_count(), 43);
    }

    #[test]
    fn calculator_keys_while_editing() {
        let mut state = HomeState::new(18.0, 42);
        state.handle_key(KeyCode::Char('c'));
        state.handle_key(KeyCode::Enter);
        for key in ['5', '*', '3'] {
            state.handle_key(KeyCode::Char(key));
        }
        state.handle_key(KeyCode::Enter);

        assert_eq!(state.calculator_display(), "15");
    }

    #[test]
    fn non_preset_default_rate_is_offered() {
        assert_eq!(rate_options(7.5), vec![0.0, 5.0, 7.5, 12.0, 18.0, 28.0]);
        assert_eq!(HomeState::new(7.5, 0).gst_rate(), 7.5);
    }
}
