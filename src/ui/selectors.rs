use tui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};
use crossterm::event::KeyCode;

use crate::catalog::{is_preset, Catalog, NewCustomer, NewProduct};
use crate::invoice::format_currency;
use crate::models::{Customer, Product};
use crate::ui::components::layout::centered_rect;
use crate::ui::components::text_input::{InputKind, TextInputState};

pub enum SelectorAction<T> {
    Selected(T),
    Cancel,
}

/// Labelled inputs of an "add new" form. The first field is focused first.
struct Form {
    labels: &'static [&'static str],
    fields: Vec<TextInputState>,
    current: usize,
}

impl Form {
    fn new(labels: &'static [&'static str], kinds: &[InputKind]) -> Self {
        Self {
            labels,
            fields: kinds.iter().map(|kind| TextInputState::new(*kind)).collect(),
            current: 0,
        }
    }

    fn value(&self, index: usize) -> String {
        self.fields[index].value.clone()
    }

    fn next_field(&mut self) {
        self.current = (self.current + 1) % self.fields.len();
    }

    fn previous_field(&mut self) {
        self.current = (self.current + self.fields.len() - 1) % self.fields.len();
    }

    /// Routes a key to the focused field. Returns the key back if it is a form command.
    fn handle_key(&mut self, key: KeyCode) -> Option<KeyCode> {
        match key {
            KeyCode::Tab | KeyCode::Down => self.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.previous_field(),
            KeyCode::Enter | KeyCode::Esc => return Some(key),
            other => {
                self.fields[self.current].handle_input(other);
            }
        }
        None
    }

    fn lines(&self) -> Vec<Spans<'static>> {
        self.labels
            .iter()
            .zip(&self.fields)
            .enumerate()
            .map(|(index, (label, field))| {
                let focused = index == self.current;
                let style = if focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default()
                };
                Spans::from(vec![
                    Span::styled(format!("{:<12}", label), style),
                    Span::raw(field.get_display_string(focused)),
                ])
            })
            .collect()
    }
}

fn move_selection(list_state: &mut ListState, len: usize, forward: bool) {
    let i = match list_state.selected() {
        Some(i) if forward => (i + 1) % len,
        Some(i) => (i + len - 1) % len,
        None => 0,
    };
    list_state.select(Some(i));
}

fn render_list<B: Backend>(
    frame: &mut Frame<B>,
    title: &str,
    items: Vec<ListItem>,
    list_state: &mut ListState,
) -> Rect {
    let area = centered_rect(60, 60, frame.size());
    frame.render_widget(Clear, area);

    let list = List::new(items)
        .block(Block::default().title(title.to_string()).borders(Borders::ALL))
        .highlight_style(
            Style::default()
                .bg(Color::Blue)
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )
        .highlight_symbol("> ");
    frame.render_stateful_widget(list, area, list_state);
    area
}

fn render_form<B: Backend>(frame: &mut Frame<B>, title: &str, form: &Form, error: Option<&str>) {
    let area = centered_rect(60, 40, frame.size());
    frame.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(4), Constraint::Length(2)].as_ref())
        .split(area);

    let fields = Paragraph::new(form.lines())
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(fields, chunks[0]);

    let footer = match error {
        Some(error) => Paragraph::new(error.to_string()).style(Style::default().fg(Color::Red)),
        None => Paragraph::new("Tab - Next field | Enter - Save | Esc - Cancel")
            .style(Style::default().fg(Color::Gray)),
    };
    frame.render_widget(footer, chunks[1]);
}

fn preset_tag(id: &str) -> Span<'static> {
    if is_preset(id) {
        Span::styled(" [preset]", Style::default().fg(Color::DarkGray))
    } else {
        Span::raw("")
    }
}

const CUSTOMER_FIELDS: [&str; 4] = ["Name *", "Email", "Phone", "Company"];

pub struct CustomerSelectorState {
    list_state: ListState,
    adding: Option<Form>,
    error: Option<String>,
}

impl CustomerSelectorState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            adding: None,
            error: None,
        }
    }

    pub fn is_adding(&self) -> bool {
        self.adding.is_some()
    }

    /// The list holds every customer followed by an "add new" entry.
    pub fn handle_key(
        &mut self,
        key: KeyCode,
        catalog: &mut Catalog,
    ) -> Option<SelectorAction<Customer>> {
        if let Some(form) = &mut self.adding {
            match form.handle_key(key) {
                Some(KeyCode::Esc) => {
                    self.adding = None;
                    self.error = None;
                }
                Some(KeyCode::Enter) => {
                    let new_customer = NewCustomer {
                        name: form.value(0),
                        email: form.value(1),
                        phone: form.value(2),
                        company: form.value(3),
                    };
                    match catalog.add_customer(&new_customer) {
                        Ok(customer) => {
                            tracing::info!(id = %customer.id, "customer added");
                            self.adding = None;
                            self.error = None;
                            return Some(SelectorAction::Selected(customer));
                        }
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
                _ => {}
            }
            return None;
        }

        let len = catalog.customers().len() + 1;
        match key {
            KeyCode::Esc => return Some(SelectorAction::Cancel),
            KeyCode::Down => move_selection(&mut self.list_state, len, true),
            KeyCode::Up => move_selection(&mut self.list_state, len, false),
            KeyCode::Enter => {
                let selected = self.list_state.selected().unwrap_or(0);
                match catalog.customers().get(selected) {
                    Some(customer) => return Some(SelectorAction::Selected(customer.clone())),
                    None => {
                        self.adding = Some(Form::new(&CUSTOMER_FIELDS, &[InputKind::Text; 4]));
                    }
                }
            }
            _ => {}
        }
        None
    }
}

pub fn render_customer_selector<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut CustomerSelectorState,
    catalog: &Catalog,
) {
    if let Some(form) = &state.adding {
        render_form(frame, "Add New Customer", form, state.error.as_deref());
        return;
    }

    let mut items: Vec<ListItem> = catalog
        .customers()
        .iter()
        .map(|customer| {
            let company = customer.company.clone().unwrap_or_default();
            ListItem::new(vec![
                Spans::from(vec![
                    Span::styled(
                        customer.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    preset_tag(&customer.id),
                ]),
                Spans::from(Span::styled(company, Style::default().fg(Color::Gray))),
            ])
        })
        .collect();
    items.push(ListItem::new(Spans::from(Span::styled(
        "+ Add New Customer",
        Style::default().fg(Color::Green),
    ))));

    render_list(frame, "Select Customer", items, &mut state.list_state);
}

const PRODUCT_FIELDS: [&str; 3] = ["Name *", "Price *", "Description"];

pub struct ProductSelectorState {
    list_state: ListState,
    adding: Option<Form>,
    error: Option<String>,
}

impl ProductSelectorState {
    pub fn new() -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            list_state,
            adding: None,
            error: None,
        }
    }

    pub fn is_adding(&self) -> bool {
        self.adding.is_some()
    }

    pub fn handle_key(
        &mut self,
        key: KeyCode,
        catalog: &mut Catalog,
    ) -> Option<SelectorAction<Product>> {
        if let Some(form) = &mut self.adding {
            match form.handle_key(key) {
                Some(KeyCode::Esc) => {
                    self.adding = None;
                    self.error = None;
                }
                Some(KeyCode::Enter) => {
                    let new_product = NewProduct {
                        name: form.value(0),
                        price: form.value(1),
                        description: form.value(2),
                    };
                    match catalog.add_product(&new_product) {
                        Ok(product) => {
                            tracing::info!(id = %product.id, "product added");
                            self.adding = None;
                            self.error = None;
                            return Some(SelectorAction::Selected(product));
                        }
                        Err(e) => self.error = Some(e.to_string()),
                    }
                }
                _ => {}
            }
            return None;
        }

        let len = catalog.products().len() + 1;
        match key {
            KeyCode::Esc => return Some(SelectorAction::Cancel),
            KeyCode::Down => move_selection(&mut self.list_state, len, true),
            KeyCode::Up => move_selection(&mut self.list_state, len, false),
            KeyCode::Enter => {
                let selected = self.list_state.selected().unwrap_or(0);
                match catalog.products().get(selected) {
                    Some(product) => return Some(SelectorAction::Selected(product.clone())),
                    None => {
                        self.adding = Some(Form::new(
                            &PRODUCT_FIELDS,
                            &[InputKind::Text, InputKind::Number, InputKind::Text],
                        ));
                    }
                }
            }
            _ => {}
        }
        None
    }
}

pub fn render_product_selector<B: Backend>(
    frame: &mut Frame<B>,
    state: &mut ProductSelectorState,
    catalog: &Catalog,
) {
    if let Some(form) = &state.adding {
        render_form(frame, "Add New Product", form, state.error.as_deref());
        return;
    }

    let mut items: Vec<ListItem> = catalog
        .products()
        .iter()
        .map(|product| {
            ListItem::new(vec![
                Spans::from(vec![
                    Span::styled(
                        product.name.clone(),
                        Style::default().add_modifier(Modifier::BOLD),
                    ),
                    Span::raw(format!("  {}", format_currency(product.price))),
                    preset_tag(&product.id),
                ]),
                Spans::from(Span::styled(
                    product.description.clone().unwrap_or_default(),
                    Style::default().fg(Color::Gray),
                )),
            ])
        })
        .collect();
    items.push(ListItem::new(Spans::from(Span::styled(
        "+ Add New Product",
        Style::default().fg(Color::Green),
    ))));

    render_list(frame, "Select Product", items, &mut state.list_state);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_text(state: &mut CustomerSelectorState, catalog: &mut Catalog, text: &str) {
        for c in text.chars() {
            state.handle_key(KeyCode::Char(c), catalog);
        }
    }

    #[test]
    fn enter_selects_the_highlighted_customer() {
        let mut catalog = Catalog::with_presets();
        let mut state = CustomerSelectorState::new();

        state.handle_key(KeyCode::Down, &mut catalog);
        match state.handle_key(KeyCode::Enter, &mut catalog) {
            Some(SelectorAction::Selected(customer)) => assert_eq!(customer.name, "Jane Smith"),
            _ => panic!("expected a selection"),
        }
    }

    #[test]
    fn last_entry_opens_the_add_form() {
        let mut catalog = Catalog::with_presets();
        let mut state = CustomerSelectorState::new();

        state.handle_key(KeyCode::Up, &mut catalog);
        assert!(state.handle_key(KeyCode::Enter, &mut catalog).is_none());
        assert!(state.is_adding());

        // A nameless customer is refused and the form stays open
        assert!(state.handle_key(KeyCode::Enter, &mut catalog).is_none());
        assert!(state.error.is_some());

        type_text(&mut state, &mut catalog, "Asha");
        state.handle_key(KeyCode::Tab, &mut catalog);
        state.handle_key(KeyCode::Tab, &mut catalog);
        type_text(&mut state, &mut catalog, "12345");
        match state.handle_key(KeyCode::Enter, &mut catalog) {
            Some(SelectorAction::Selected(customer)) => {
                assert_eq!(customer.name, "Asha");
                assert_eq!(customer.phone.as_deref(), Some("12345"));
                assert_eq!(customer.email, None);
            }
            _ => panic!("expected the new customer"),
        }
        assert_eq!(catalog.customers().len(), 4);
        assert!(!state.is_adding());
    }

    #[test]
    fn product_form_needs_a_price() {
        let mut catalog = Catalog::with_presets();
        let mut state = ProductSelectorState::new();

        state.handle_key(KeyCode::Up, &mut catalog);
        state.handle_key(KeyCode::Enter, &mut catalog);
        for c in "Hosting".chars() {
            state.handle_key(KeyCode::Char(c), &mut catalog);
        }
        assert!(state.handle_key(KeyCode::Enter, &mut catalog).is_none());
        assert_eq!(state.error.as_deref(), Some("a price is required"));

        state.handle_key(KeyCode::Tab, &mut catalog);
        for c in "999".chars() {
            state.handle_key(KeyCode::Char(c), &mut catalog);
        }
        match state.handle_key(KeyCode::Enter, &mut catalog) {
            Some(SelectorAction::Selected(product)) => assert_eq!(product.price, 999.0),
            _ => panic!("expected the new product"),
        }
    }

    #[test]
    fn escape_cancels() {
        let mut catalog = Catalog::with_presets();
        let mut state = ProductSelectorState::new();

        assert!(matches!(
            state.handle_key(KeyCode::Esc, &mut catalog),
            Some(SelectorAction::Cancel)
        ));
    }
}
