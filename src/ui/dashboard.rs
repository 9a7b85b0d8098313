use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::catalog::Catalog;
use crate::invoice::format_currency;
use crate::models::{HistoryEntry, InvoiceStatus};
use crate::ui::components::layout::render_help;
use crate::ui::components::nav_bar::render_nav_bar;
use crate::ui::NavTab;

#[derive(Debug, Clone, PartialEq, Default)]
pub struct DashboardStats {
    /// Sum of paid invoices.
    pub revenue: f64,
    pub customers: usize,
    pub products: usize,
    /// Invoices generated since the app started.
    pub invoices_this_session: usize,
    pub total_invoices: usize,
}

/// `seeded` is the number of leading history entries that predate the session.
pub fn dashboard_stats(history: &[HistoryEntry], catalog: &Catalog, seeded: usize) -> DashboardStats {
    DashboardStats {
        revenue: history
            .iter()
            .filter(|entry| entry.status == InvoiceStatus::Paid)
            .map(|entry| entry.amount)
            .sum(),
        customers: catalog.customers().len(),
        products: catalog.products().len(),
        invoices_this_session: history.len().saturating_sub(seeded),
        total_invoices: history.len(),
    }
}

/// Invoice count per catalog customer, matched on the billed name.
pub fn customer_invoice_counts<'a>(
    history: &[HistoryEntry],
    catalog: &'a Catalog,
) -> Vec<(&'a str, usize)> {
    catalog
        .customers()
        .iter()
        .map(|customer| {
            let count = history
                .iter()
                .filter(|entry| entry.customer == customer.name)
                .count();
            (customer.name.as_str(), count)
        })
        .collect()
}

pub enum DashboardAction {
    Navigate(NavTab),
    Exit,
}

pub fn handle_key(key: KeyCode) -> Option<DashboardAction> {
    if let Some(tab) = NavTab::from_key(key) {
        return Some(DashboardAction::Navigate(tab));
    }

    match key {
        KeyCode::Char('q') => Some(DashboardAction::Exit),
        KeyCode::Esc => Some(DashboardAction::Navigate(NavTab::Home)),
        _ => None,
    }
}

pub fn render_dashboard<B: Backend>(
    frame: &mut Frame<B>,
    history: &[HistoryEntry],
    catalog: &Catalog,
    seeded: usize,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(5), // Stats
                Constraint::Min(6),    // Lists
                Constraint::Length(3), // Help
                Constraint::Length(2), // Navigation
            ]
            .as_ref(),
        )
        .split(frame.size());

    render_stats(frame, &dashboard_stats(history, catalog, seeded), chunks[0]);

    let lists = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)].as_ref())
        .split(chunks[1]);

    let customers: Vec<ListItem> = customer_invoice_counts(history, catalog)
        .into_iter()
        .map(|(name, count)| {
            ListItem::new(Spans::from(vec![
                Span::styled(name.to_string(), Style::default().add_modifier(Modifier::BOLD)),
                Span::styled(
                    format!("  {} invoice(s)", count),
                    Style::default().fg(Color::Gray),
                ),
            ]))
        })
        .collect();
    let customers = List::new(customers)
        .block(Block::default().title("Customers").borders(Borders::ALL));
    frame.render_widget(customers, lists[0]);

    let products: Vec<ListItem> = catalog
        .products()
        .iter()
        .map(|product| {
            ListItem::new(Spans::from(vec![
                Span::styled(product.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!("  {}", format_currency(product.price))),
            ]))
        })
        .collect();
    let products = List::new(products)
        .block(Block::default().title("Products").borders(Borders::ALL));
    frame.render_widget(products, lists[1]);

    render_help(frame, chunks[2], "Esc - Home | Q - Quit");
    render_nav_bar(frame, chunks[3], NavTab::Dashboard);
}

fn render_stats<B: Backend>(frame: &mut Frame<B>, stats: &DashboardStats, area: Rect) {
    let cards = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 4); 4].as_ref())
        .split(area);

    let values = [
        ("Revenue", format_currency(stats.revenue), Color::Green),
        ("Customers", stats.customers.to_string(), Color::Cyan),
        ("Products", stats.products.to_string(), Color::Magenta),
        (
            "This Session",
            format!("{} of {}", stats.invoices_this_session, stats.total_invoices),
            Color::Yellow,
        ),
    ];

    for ((title, value, color), area) in values.into_iter().zip(cards.iter()) {
        let card = Paragraph::new(vec![
            Spans::from(""),
            Spans::from(Span::styled(
                value,
                Style::default().fg(color).add_modifier(Modifier::BOLD),
            )),
        ])
        .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(card, *area);
    }
}

pub fn handle_input() -> Result<Option<DashboardAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(handle_key(key.code));
    }
    Ok(None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::catalog::seed_history;

    #[test]
    fn stats_count_paid_revenue_and_session_invoices() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let mut history = seed_history(today);
        let seeded = history.len();
        let mut fresh = history[1].clone();
        fresh.id = "INV-000001".to_string();
        fresh.date = today;
        history.push(fresh);

        let stats = dashboard_stats(&history, &Catalog::with_presets(), seeded);

        assert_eq!(stats.revenue, 1250.0);
        assert_eq!(stats.customers, 3);
        assert_eq!(stats.products, 3);
        assert_eq!(stats.invoices_this_session, 1);
        assert_eq!(stats.total_invoices, 4);
    }

    #[test]
    fn seeded_entries_dated_today_are_not_session_invoices() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 10).unwrap();
        let mut history = seed_history(today);
        for entry in &mut history {
            entry.date = today;
        }

        let stats = dashboard_stats(&history, &Catalog::with_presets(), history.len());

        assert_eq!(stats.invoices_this_session, 0);
        assert_eq!(stats.total_invoices, 3);
    }

    #[test]
    fn invoice_counts_follow_customer_names() {
        let history = seed_history(NaiveDate::from_ymd_opt(2024, 6, 10).unwrap());
        let catalog = Catalog::with_presets();

        let counts = customer_invoice_counts(&history, &catalog);

        assert_eq!(counts, vec![("John Doe", 1), ("Jane Smith", 1), ("Bob Wilson", 0)]);
    }

    #[test]
    fn f_keys_navigate() {
        assert!(matches!(
            handle_key(KeyCode::F(2)),
            Some(DashboardAction::Navigate(NavTab::History))
        ));
        assert!(handle_key(KeyCode::Char('x')).is_none());
    }
}
