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

use crate::invoice::format_currency;
use crate::models::{HistoryEntry, InvoiceStatus};
use crate::ui::components::layout::render_help;
use crate::ui::components::nav_bar::render_nav_bar;
use crate::ui::components::text_input::{InputKind, TextInputState};
use crate::ui::NavTab;

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct HistorySummary {
    pub count: usize,
    pub paid: f64,
    /// Pending plus overdue amounts.
    pub outstanding: f64,
}

pub fn summarize(entries: &[&HistoryEntry]) -> HistorySummary {
    entries.iter().fold(HistorySummary::default(), |mut summary, entry| {
        summary.count += 1;
        match entry.status {
            InvoiceStatus::Paid => summary.paid += entry.amount,
            InvoiceStatus::Pending | InvoiceStatus::Overdue => summary.outstanding += entry.amount,
        }
        summary
    })
}

pub fn status_color(status: InvoiceStatus) -> Color {
    match status {
        InvoiceStatus::Paid => Color::Green,
        InvoiceStatus::Pending => Color::Yellow,
        InvoiceStatus::Overdue => Color::Red,
    }
}

pub enum HistoryAction {
    Navigate(NavTab),
    Exit,
}

pub struct HistoryState {
    search: TextInputState,
    searching: bool,
    table_state: TableState,
}

impl HistoryState {
    pub fn new() -> Self {
        let mut table_state = TableState::default();
        table_state.select(Some(0));

        Self {
            search: TextInputState::new(InputKind::Text),
            searching: false,
            table_state,
        }
    }

    pub fn query(&self) -> &str {
        &self.search.value
    }

    /// Entries matching the search, newest first.
    pub fn visible<'a>(&self, history: &'a [HistoryEntry]) -> Vec<&'a HistoryEntry> {
        history
            .iter()
            .rev()
            .filter(|entry| entry.matches(self.query()))
            .collect()
    }

    fn clamp_selection(&mut self, len: usize) {
        match self.table_state.selected() {
            _ if len == 0 => self.table_state.select(None),
            Some(i) if i >= len => self.table_state.select(Some(len - 1)),
            None => self.table_state.select(Some(0)),
            _ => {}
        }
    }

    pub fn handle_key(&mut self, key: KeyCode, history: &[HistoryEntry]) -> Option<HistoryAction> {
        if let Some(tab) = NavTab::from_key(key) {
            return Some(HistoryAction::Navigate(tab));
        }

        if self.searching {
            match key {
                KeyCode::Enter | KeyCode::Esc => self.searching = false,
                other => {
                    self.search.handle_input(other);
                }
            }
            let len = self.visible(history).len();
            self.clamp_selection(len);
            return None;
        }

        let len = self.visible(history).len();
        match key {
            KeyCode::Char('q') => return Some(HistoryAction::Exit),
            KeyCode::Esc => return Some(HistoryAction::Navigate(NavTab::Home)),
            KeyCode::Char('/') => self.searching = true,
            KeyCode::Char('x') => {
                self.search.clear();
                self.clamp_selection(history.len());
            }
            KeyCode::Down if len > 0 => {
                let i = self.table_state.selected().map_or(0, |i| (i + 1) % len);
                self.table_state.select(Some(i));
            }
            KeyCode::Up if len > 0 => {
                let i = self.table_state.selected().map_or(0, |i| (i + len - 1) % len);
                self.table_state.select(Some(i));
            }
            _ => {}
        }
        None
    }
}

pub fn render_history<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut HistoryState,
    history: &[HistoryEntry],
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Search
                Constraint::Length(3), // Summary
                Constraint::Min(5),    // Table
                Constraint::Length(3), // Help
                Constraint::Length(2), // Navigation
            ]
            .as_ref(),
        )
        .split(frame.size());

    let search_style = if state.searching {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };
    let search = Paragraph::new(state.search.get_display_string(state.searching))
        .style(search_style)
        .block(Block::default().title("Search").borders(Borders::ALL));
    frame.render_widget(search, chunks[0]);

    let visible = state.visible(history);
    let summary = summarize(&visible);
    let summary_line = Paragraph::new(Spans::from(vec![
        Span::raw(format!("Invoices: {}   ", summary.count)),
        Span::styled(
            format!("Paid: {}   ", format_currency(summary.paid)),
            Style::default().fg(Color::Green),
        ),
        Span::styled(
            format!("Outstanding: {}", format_currency(summary.outstanding)),
            Style::default().fg(Color::Yellow),
        ),
    ]))
    .block(Block::default().title("Summary").borders(Borders::ALL));
    frame.render_widget(summary_line, chunks[1]);

    let rows: Vec<Row> = visible
        .iter()
        .map(|entry| {
            Row::new(vec![
                Cell::from(entry.id.clone()),
                Cell::from(entry.customer.clone()),
                Cell::from(entry.date.format("%d/%m/%Y").to_string()),
                Cell::from(entry.items.join(", ")),
                Cell::from(format_currency(entry.amount)),
                Cell::from(entry.status.label())
                    .style(Style::default().fg(status_color(entry.status))),
            ])
        })
        .collect();

    let header = Row::new(vec!["Invoice", "Customer", "Date", "Items", "Amount", "Status"])
        .style(Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD));
    let widths = [
        Constraint::Percentage(14),
        Constraint::Percentage(18),
        Constraint::Percentage(12),
        Constraint::Percentage(30),
        Constraint::Percentage(14),
        Constraint::Percentage(12),
    ];
    let table = Table::new(rows)
        .header(header)
        .block(Block::default().title("Invoice History").borders(Borders::ALL))
        .widths(&widths)
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    frame.render_stateful_widget(table, chunks[2], &mut state.table_state);

    let help_text = if state.searching {
        "Type to filter | Enter/Esc - Done"
    } else {
        "/ - Search | X - Clear search | Up/Down - Navigate | Esc - Home | Q - Quit"
    };
    render_help(frame, chunks[3], help_text);
    render_nav_bar(frame, chunks[4], NavTab::History);
}

pub fn handle_input(
    state: &mut HistoryState,
    history: &[HistoryEntry],
) -> Result<Option<HistoryAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code, history));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::seed_history;
    use chrono::NaiveDate;

    fn history() -> Vec<HistoryEntry> {
        seed_history(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap())
    }

    #[test]
    fn summary_splits_paid_from_outstanding() {
        let history = history();
        let all: Vec<&HistoryEntry> = history.iter().collect();

        let summary = summarize(&all);

        assert_eq!(summary.count, 3);
        assert_eq!(summary.paid, 1250.0);
        assert_eq!(summary.outstanding, 2850.0);
    }

    #[test]
    fn search_filters_by_item_name() {
        let history = history();
        let mut state = HistoryState::new();

        state.handle_key(KeyCode::Char('/'), &history);
        for c in "seo".chars() {
            state.handle_key(KeyCode::Char(c), &history);
        }
        state.handle_key(KeyCode::Enter, &history);

        let visible = state.visible(&history);
        assert_eq!(visible.len(), 1);
        assert_eq!(visible[0].id, "INV-003");
        assert_eq!(summarize(&visible).outstanding, 2100.0);
    }

    #[test]
    fn newest_entries_come_first() {
        let mut history = history();
        let mut latest = history[0].clone();
        latest.id = "INV-123456".to_string();
        history.push(latest);

        let state = HistoryState::new();
        assert_eq!(state.visible(&history)[0].id, "INV-123456");
    }

    #[test]
    fn selection_stays_inside_the_filtered_list() {
        let history = history();
        let mut state = HistoryState::new();
        state.handle_key(KeyCode::Up, &history);
        assert_eq!(state.table_state.selected(), Some(2));

        state.handle_key(KeyCode::Char('/'), &history);
        state.handle_key(KeyCode::Char('z'), &history);
        assert_eq!(state.table_state.selected(), None);
    }
}
