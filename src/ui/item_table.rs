use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState},
    Frame,
};

use crate::invoice::{compute_totals, format_currency, validate_row};
use crate::models::{InvoiceRow, InvoiceTotals, TaxPolicy};
use crate::ui::components::layout::{render_error, render_help};
use crate::ui::components::nav_bar::render_nav_bar;
use crate::ui::components::text_input::{InputKind, TextInputState};
use crate::ui::home::rate_options;
use crate::ui::NavTab;

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum TableColumn {
    Item,
    Quantity,
    Price,
    Gst,
}

impl TableColumn {
    fn next(self) -> Self {
        match self {
            TableColumn::Item => TableColumn::Quantity,
            TableColumn::Quantity => TableColumn::Price,
            TableColumn::Price => TableColumn::Gst,
            TableColumn::Gst => TableColumn::Item,
        }
    }

    fn previous(self) -> Self {
        match self {
            TableColumn::Item => TableColumn::Gst,
            TableColumn::Quantity => TableColumn::Item,
            TableColumn::Price => TableColumn::Quantity,
            TableColumn::Gst => TableColumn::Price,
        }
    }
}

pub enum ItemTableAction {
    Back,
    Generate(InvoiceTotals, TaxPolicy),
    Navigate(NavTab),
}

// Represents the state of the row editor
pub struct ItemTableState {
    rows: Vec<InvoiceRow>,
    table_state: TableState,
    column: TableColumn,
    editing: Option<TextInputState>,
    per_item: bool,
    rate_options: Vec<f64>,
    rate_index: usize,
    show_error: Option<String>,
}

impl ItemTableState {
    pub fn new(default_rate: f64) -> Self {
        let rate_options = rate_options(default_rate);
        let rate_index = rate_options
            .iter()
            .position(|rate| *rate == default_rate)
            .unwrap_or(0);

        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            rows: vec![InvoiceRow::default()],
            table_state,
            column: TableColumn::Item,
            editing: None,
            per_item: false,
            rate_options,
            rate_index,
            show_error: None,
        }
    }

    pub fn rows(&self) -> &[InvoiceRow] {
        &self.rows
    }

    pub fn tax_policy(&self) -> TaxPolicy {
        if self.per_item {
            TaxPolicy::PerItem
        } else {
            TaxPolicy::Fixed(self.rate_options[self.rate_index])
        }
    }

    pub fn totals(&self) -> InvoiceTotals {
        compute_totals(&self.rows, self.tax_policy())
    }

    /// Starts over with a single empty row, keeping the tax settings.
    pub fn reset(&mut self) {
        self.rows = vec![InvoiceRow::default()];
        self.table_state.select(Some(0));
        self.column = TableColumn::Item;
        self.editing = None;
    }

    fn selected(&self) -> Option<usize> {
        self.table_state.selected().filter(|i| *i < self.rows.len())
    }

    pub fn next(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i >= self.rows.len() - 1 {
                    0
                } else {
                    i + 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.rows.is_empty() {
            return;
        }

        let i = match self.table_state.selected() {
            Some(i) => {
                if i == 0 {
                    self.rows.len() - 1
                } else {
                    i - 1
                }
            }
            None => 0,
        };
        self.table_state.select(Some(i));
    }

    pub fn add_row(&mut self) {
        self.rows.push(InvoiceRow::default());
        self.table_state.select(Some(self.rows.len() - 1));
        self.column = TableColumn::Item;
        self.start_editing();
    }

    pub fn delete_row(&mut self) {
        if let Some(selected) = self.selected() {
            self.rows.remove(selected);

            // Adjust selection after deletion
            if !self.rows.is_empty() {
                let new_selection = if selected >= self.rows.len() {
                    self.rows.len() - 1
                } else {
                    selected
                };
                self.table_state.select(Some(new_selection));
            } else {
                self.table_state.select(None);
            }
            self.editing = None;
        }
    }

    fn cell_mut(&mut self, row: usize, column: TableColumn) -> &mut String {
        let row = &mut self.rows[row];
        match column {
            TableColumn::Item => &mut row.item,
            TableColumn::Quantity => &mut row.quantity,
            TableColumn::Price => &mut row.price,
            TableColumn::Gst => &mut row.gst,
        }
    }

    fn start_editing(&mut self) {
        if let Some(selected) = self.selected() {
            let column = self.column;
            let value = self.cell_mut(selected, column).clone();
            self.editing = Some(TextInputState::with_value(InputKind::Text, &value));
        }
    }

    /// Writes the edit buffer back into the selected cell.
    fn commit_edit(&mut self) {
        if let (Some(input), Some(selected)) = (self.editing.take(), self.selected()) {
            let column = self.column;
            *self.cell_mut(selected, column) = input.value;
        }
    }

    pub fn toggle_per_item(&mut self) {
        self.per_item = !self.per_item;
    }

    fn next_rate(&mut self) {
        self.rate_index = (self.rate_index + 1) % self.rate_options.len();
    }

    pub fn handle_key(&mut self, key: KeyCode) -> Option<ItemTableAction> {
        self.show_error = None;

        if let Some(tab) = NavTab::from_key(key) {
            self.commit_edit();
            return Some(ItemTableAction::Navigate(tab));
        }

        if let Some(input) = &mut self.editing {
            match key {
                KeyCode::Esc => self.editing = None,
                KeyCode::Enter | KeyCode::Tab => {
                    self.commit_edit();
                    self.column = self.column.next();
                }
                other => {
                    input.handle_input(other);
                }
            }
            return None;
        }

        match key {
            KeyCode::Esc => return Some(ItemTableAction::Back),
            KeyCode::Up => self.previous(),
            KeyCode::Down => self.next(),
            KeyCode::Left | KeyCode::BackTab => self.column = self.column.previous(),
            KeyCode::Right | KeyCode::Tab => self.column = self.column.next(),
            KeyCode::Enter => self.start_editing(),
            KeyCode::Char('a') => self.add_row(),
            KeyCode::Char('d') => self.delete_row(),
            KeyCode::Char('p') => self.toggle_per_item(),
            KeyCode::Char('r') if !self.per_item => self.next_rate(),
            KeyCode::Char('g') => {
                let totals = self.totals();
                if totals.is_empty() {
                    self.show_error = Some(
                        "Fill in item, quantity and price for at least one row.".to_string(),
                    );
                } else {
                    return Some(ItemTableAction::Generate(totals, self.tax_policy()));
                }
            }
            _ => {}
        }

        None
    }
}

pub fn render_item_table<B: Backend>(frame: &mut Frame<B>, state: &mut ItemTableState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Tax policy
                Constraint::Min(6),    // Rows
                Constraint::Length(5), // Totals
                Constraint::Length(3), // Help
                Constraint::Length(2), // Navigation
            ]
            .as_ref(),
        )
        .split(frame.size());

    let policy_text = match state.tax_policy() {
        TaxPolicy::Fixed(rate) => format!("Fixed GST {}% for every item", rate),
        TaxPolicy::PerItem => "Per-item GST from the GST % column".to_string(),
    };
    let policy = Paragraph::new(Spans::from(vec![
        Span::styled("Tax: ", Style::default().fg(Color::Cyan)),
        Span::raw(policy_text),
    ]))
    .block(Block::default().title("Item Table").borders(Borders::ALL));
    frame.render_widget(policy, chunks[0]);

    let selected = state.selected();
    let tax_policy = state.tax_policy();
    let rows = state.rows.iter().enumerate().map(|(index, row)| {
        let validation = validate_row(row);
        let cell_values = [
            (TableColumn::Item, &row.item, validation.item),
            (TableColumn::Quantity, &row.quantity, validation.quantity),
            (TableColumn::Price, &row.price, validation.price),
            (TableColumn::Gst, &row.gst, validation.gst || !tax_policy.is_per_item()),
        ];

        let mut cells: Vec<Cell> = cell_values
            .iter()
            .map(|(column, value, valid)| {
                let is_cursor = selected == Some(index) && state.column == *column;
                let text = match (&state.editing, is_cursor) {
                    (Some(input), true) => input.get_display_string(true),
                    _ => value.to_string(),
                };

                let mut style = Style::default();
                if !valid && !value.is_empty() {
                    style = style.fg(Color::Red);
                }
                if is_cursor {
                    style = style.add_modifier(Modifier::REVERSED);
                }
                Cell::from(text).style(style)
            })
            .collect();

        let amount = if row.contributes() {
            format_currency(compute_totals(std::slice::from_ref(row), tax_policy).subtotal)
        } else {
            "-".to_string()
        };
        cells.push(Cell::from(amount));

        Row::new(cells)
    });

    let header = Row::new(vec!["Item", "Qty", "Price", "GST %", "Amount"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Percentage(36),
        Constraint::Percentage(12),
        Constraint::Percentage(16),
        Constraint::Percentage(12),
        Constraint::Percentage(24),
    ];
    let table = Table::new(rows.collect::<Vec<_>>())
        .header(header)
        .block(Block::default().borders(Borders::ALL))
        .widths(&widths)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_stateful_widget(table, chunks[1], &mut state.table_state);

    let totals = state.totals();
    let summary = Paragraph::new(vec![
        Spans::from(format!("Subtotal: {}", format_currency(totals.subtotal))),
        Spans::from(format!("GST: {}", format_currency(totals.tax))),
        Spans::from(Span::styled(
            format!("Total: {}", format_currency(totals.total)),
            Style::default().add_modifier(Modifier::BOLD),
        )),
    ])
    .block(Block::default().title("Totals").borders(Borders::ALL));
    frame.render_widget(summary, chunks[2]);

    let help_text = if state.editing.is_some() {
        "Enter/Tab - Save and next cell | Esc - Cancel edit"
    } else {
        "Enter - Edit cell | Arrows - Move | A - Add row | D - Delete row | P - Per-item GST | R - Rate | G - Generate | Esc - Back"
    };
    render_help(frame, chunks[3], help_text);
    render_nav_bar(frame, chunks[4], NavTab::Home);

    if let Some(error) = &state.show_error {
        let size = frame.size();
        render_error(frame, size, error);
    }
}

pub fn handle_input(state: &mut ItemTableState) -> Result<Option<ItemTableAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
