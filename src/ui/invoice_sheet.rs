use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Tabs, Wrap},
    Frame,
};

use crate::catalog::Catalog;
use crate::invoice::{compute_line_item_totals, format_currency, share_message, share_url};
use crate::models::{InvoiceDraft, LineItem, TaxPolicy};
use crate::ui::components::layout::render_help;
use crate::ui::selectors::{
    render_customer_selector, render_product_selector, CustomerSelectorState,
    ProductSelectorState, SelectorAction,
};

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum SheetStep {
    Review,
    Share,
    Payment,
}

impl SheetStep {
    const ALL: [SheetStep; 3] = [SheetStep::Review, SheetStep::Share, SheetStep::Payment];

    fn title(&self) -> &'static str {
        match self {
            SheetStep::Review => "Review",
            SheetStep::Share => "Share",
            SheetStep::Payment => "Payment",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Debug)]
pub enum ShareOption {
    WhatsApp,
    Link,
    Pdf,
}

impl ShareOption {
    const ALL: [ShareOption; 3] = [ShareOption::WhatsApp, ShareOption::Link, ShareOption::Pdf];

    fn label(&self) -> &'static str {
        match self {
            ShareOption::WhatsApp => "Send via WhatsApp",
            ShareOption::Link => "Share Link",
            ShareOption::Pdf => "Download PDF",
        }
    }
}

const PAYMENT_METHODS: [&str; 3] = ["UPI (Recommended)", "Bank Transfer", "Cash"];

pub enum SheetAction {
    Close,
    OpenShare(String),
    Export(InvoiceDraft),
    /// Carries the invoice number to flag as paid.
    MarkPaid(String),
}

enum Overlay {
    Customer(CustomerSelectorState),
    Product(ProductSelectorState),
}

pub struct InvoiceSheetState {
    draft: InvoiceDraft,
    share_base_url: String,
    step: SheetStep,
    generating: bool,
    share_list: ListState,
    payment_list: ListState,
    overlay: Option<Overlay>,
    status: Option<String>,
}

impl InvoiceSheetState {
    pub fn new(draft: InvoiceDraft, share_base_url: &str) -> Self {
        let mut share_list = ListState::default();
        share_list.select(Some(0));
        let mut payment_list = ListState::default();
        payment_list.select(Some(0));

        Self {
            draft,
            share_base_url: share_base_url.to_string(),
            step: SheetStep::Review,
            generating: false,
            share_list,
            payment_list,
            overlay: None,
            status: None,
        }
    }

    pub fn draft(&self) -> &InvoiceDraft {
        &self.draft
    }

    pub fn step(&self) -> SheetStep {
        self.step
    }

    pub fn is_generating(&self) -> bool {
        self.generating
    }

    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = Some(status.into());
    }

    /// Holds "Generating..." on screen for `delay`, then moves on to sharing.
    pub async fn generate(&mut self, delay: Duration) {
        tokio::time::sleep(delay).await;
        self.generating = false;
        self.step = SheetStep::Share;
        self.status = None;
    }

    pub fn share_url(&self) -> String {
        let customer_name = self
            .draft
            .customer
            .as_ref()
            .map(|customer| customer.name.as_str())
            .unwrap_or_default();
        let message = share_message(&self.draft.number, customer_name, &self.draft.totals);
        share_url(&self.share_base_url, &message)
    }

    fn add_product(&mut self, name: &str, price: f64) {
        let mut items = self.draft.totals.line_items.clone();
        items.push(LineItem::new(name, 1.0, price));
        self.draft.totals = compute_line_item_totals(&items, self.draft.policy);
    }

    pub fn handle_key(&mut self, key: KeyCode, catalog: &mut Catalog) -> Option<SheetAction> {
        if self.generating {
            return None;
        }

        match &mut self.overlay {
            Some(Overlay::Customer(selector)) => {
                match selector.handle_key(key, catalog) {
                    Some(SelectorAction::Selected(customer)) => {
                        self.draft.customer = Some(customer);
                        self.overlay = None;
                    }
                    Some(SelectorAction::Cancel) => self.overlay = None,
                    None => {}
                }
                return None;
            }
            Some(Overlay::Product(selector)) => {
                match selector.handle_key(key, catalog) {
                    Some(SelectorAction::Selected(product)) => {
                        self.add_product(&product.name, product.price);
                        self.overlay = None;
                    }
                    Some(SelectorAction::Cancel) => self.overlay = None,
                    None => {}
                }
                return None;
            }
            None => {}
        }

        self.status = None;
        match self.step {
            SheetStep::Review => self.handle_review_key(key),
            SheetStep::Share => self.handle_share_key(key),
            SheetStep::Payment => self.handle_payment_key(key),
        }
    }

    fn handle_review_key(&mut self, key: KeyCode) -> Option<SheetAction> {
        match key {
            KeyCode::Esc => return Some(SheetAction::Close),
            KeyCode::Char('c') => {
                self.overlay = Some(Overlay::Customer(CustomerSelectorState::new()));
            }
            KeyCode::Char('p') => {
                self.overlay = Some(Overlay::Product(ProductSelectorState::new()));
            }
            KeyCode::Enter => {
                if self.draft.can_generate() {
                    self.generating = true;
                } else if self.draft.customer.is_none() {
                    self.status = Some("Select a customer first (C).".to_string());
                } else {
                    self.status = Some("Add at least one item (P).".to_string());
                }
            }
            _ => {}
        }
        None
    }

    fn handle_share_key(&mut self, key: KeyCode) -> Option<SheetAction> {
        match key {
            KeyCode::Esc => return Some(SheetAction::Close),
            KeyCode::Down => select_next(&mut self.share_list, ShareOption::ALL.len()),
            KeyCode::Up => select_previous(&mut self.share_list, ShareOption::ALL.len()),
            KeyCode::Char('n') | KeyCode::Tab => self.step = SheetStep::Payment,
            KeyCode::Enter => {
                let index = self.share_list.selected().unwrap_or(0);
                match ShareOption::ALL[index] {
                    ShareOption::WhatsApp => return Some(SheetAction::OpenShare(self.share_url())),
                    ShareOption::Link => self.status = Some(self.share_url()),
                    ShareOption::Pdf => return Some(SheetAction::Export(self.draft.clone())),
                }
            }
            _ => {}
        }
        None
    }

    fn handle_payment_key(&mut self, key: KeyCode) -> Option<SheetAction> {
        match key {
            KeyCode::Esc => return Some(SheetAction::Close),
            KeyCode::BackTab | KeyCode::Char('b') => self.step = SheetStep::Share,
            KeyCode::Down => select_next(&mut self.payment_list, PAYMENT_METHODS.len()),
            KeyCode::Up => select_previous(&mut self.payment_list, PAYMENT_METHODS.len()),
            KeyCode::Enter => {
                let method = PAYMENT_METHODS[self.payment_list.selected().unwrap_or(0)];
                tracing::info!(invoice = %self.draft.number, method, "invoice marked as paid");
                return Some(SheetAction::MarkPaid(self.draft.number.clone()));
            }
            _ => {}
        }
        None
    }
}

fn select_next(list: &mut ListState, len: usize) {
    let i = list.selected().map_or(0, |i| (i + 1) % len);
    list.select(Some(i));
}

fn select_previous(list: &mut ListState, len: usize) {
    let i = list.selected().map_or(0, |i| (i + len - 1) % len);
    list.select(Some(i));
}

pub fn render_invoice_sheet<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut InvoiceSheetState,
    catalog: &Catalog,
) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints(
            [
                Constraint::Length(3), // Steps
                Constraint::Min(10),   // Body
                Constraint::Length(3), // Status
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let titles = SheetStep::ALL
        .iter()
        .map(|step| Spans::from(step.title()))
        .collect::<Vec<_>>();
    let selected = SheetStep::ALL
        .iter()
        .position(|step| *step == state.step)
        .unwrap_or(0);
    let steps = Tabs::new(titles)
        .block(
            Block::default()
                .title(format!("Invoice {}", state.draft.number))
                .borders(Borders::ALL),
        )
        .select(selected)
        .highlight_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD));
    frame.render_widget(steps, chunks[0]);

    if state.generating {
        let generating = Paragraph::new(vec![
            Spans::from(""),
            Spans::from(Span::styled(
                "Generating invoice...",
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
        ])
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::ALL));
        frame.render_widget(generating, chunks[1]);
    } else {
        match state.step {
            SheetStep::Review => render_review(frame, &state.draft, chunks[1]),
            SheetStep::Share => render_options(
                frame,
                "Share Invoice",
                ShareOption::ALL.iter().map(|option| option.label()).collect(),
                &mut state.share_list,
                chunks[1],
            ),
            SheetStep::Payment => render_options(
                frame,
                "Payment Method",
                PAYMENT_METHODS.to_vec(),
                &mut state.payment_list,
                chunks[1],
            ),
        }
    }

    let status = Paragraph::new(state.status.clone().unwrap_or_default())
        .style(Style::default().fg(Color::Yellow))
        .block(Block::default().borders(Borders::ALL))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, chunks[2]);

    let help_text = match state.step {
        SheetStep::Review => "C - Customer | P - Add product | Enter - Generate | Esc - Close",
        SheetStep::Share => "Enter - Share | N - Continue to payment | Esc - Close",
        SheetStep::Payment => "Enter - Mark as Paid | B - Back | Esc - Close",
    };
    render_help(frame, chunks[3], help_text);

    match &mut state.overlay {
        Some(Overlay::Customer(selector)) => render_customer_selector(frame, selector, catalog),
        Some(Overlay::Product(selector)) => render_product_selector(frame, selector, catalog),
        None => {}
    }
}

fn render_review<B: Backend>(frame: &mut Frame<B>, draft: &InvoiceDraft, area: Rect) {
    let mut lines = vec![
        Spans::from(format!("Date: {}", draft.date.format("%d/%m/%Y"))),
        Spans::from(""),
    ];

    match &draft.customer {
        Some(customer) => {
            lines.push(Spans::from(vec![
                Span::styled("Bill To: ", Style::default().fg(Color::Cyan)),
                Span::styled(customer.name.clone(), Style::default().add_modifier(Modifier::BOLD)),
            ]));
            for detail in [&customer.company, &customer.email, &customer.phone]
                .into_iter()
                .flatten()
            {
                lines.push(Spans::from(format!("         {}", detail)));
            }
        }
        None => lines.push(Spans::from(Span::styled(
            "Bill To: no customer selected",
            Style::default().fg(Color::Red),
        ))),
    }
    lines.push(Spans::from(""));

    for (index, item) in draft.totals.line_items.iter().enumerate() {
        lines.push(Spans::from(format!(
            "{} x{} @ {} ({}% GST)  {}",
            item.name,
            item.quantity,
            format_currency(item.unit_price),
            draft.rate_for(index),
            format_currency(item.subtotal()),
        )));
    }
    if draft.totals.is_empty() {
        lines.push(Spans::from(Span::styled("No items", Style::default().fg(Color::Gray))));
    }

    let gst_label = match draft.policy {
        TaxPolicy::Fixed(rate) => format!("GST ({}%)", rate),
        TaxPolicy::PerItem => "GST (per item)".to_string(),
    };
    lines.push(Spans::from(""));
    lines.push(Spans::from(format!("Subtotal: {}", format_currency(draft.totals.subtotal))));
    lines.push(Spans::from(format!("{}: {}", gst_label, format_currency(draft.totals.tax))));
    lines.push(Spans::from(Span::styled(
        format!("Total: {}", format_currency(draft.totals.total)),
        Style::default().add_modifier(Modifier::BOLD),
    )));

    let review = Paragraph::new(lines)
        .block(Block::default().title("Review").borders(Borders::ALL))
        .wrap(Wrap { trim: false });
    frame.render_widget(review, area);
}

fn render_options<B: Backend>(
    frame: &mut Frame<B>,
    title: &str,
    labels: Vec<&str>,
    list_state: &mut ListState,
    area: Rect,
) {
    let items: Vec<ListItem> = labels
        .into_iter()
        .map(|label| ListItem::new(label.to_string()))
        .collect();

    let list = List::new(items)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White))
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, list_state);
}

pub fn handle_input(
    state: &mut InvoiceSheetState,
    catalog: &mut Catalog,
) -> Result<Option<SheetAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code, catalog));
    }
    Ok(None)
}
