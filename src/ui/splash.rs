use anyhow::Result;
use crossterm::event::{self, Event, KeyCode};
use tui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::ui::components::layout::render_help;

const QUICK_START_STEPS: [(&str, &str); 3] = [
    ("Add Products", "Build your inventory"),
    ("Add Customer", "Manage your clients"),
    ("Share & Get Paid", "Send and track invoices"),
];

pub enum SplashAction {
    GetStarted,
    Exit,
}

pub struct SplashState {
    show_quick_start: bool,
}

impl SplashState {
    pub fn new() -> Self {
        Self {
            show_quick_start: false,
        }
    }

    /// Any key other than Enter reveals the quick start guide first.
    pub fn handle_key(&mut self, key: KeyCode) -> Option<SplashAction> {
        match key {
            KeyCode::Enter => Some(SplashAction::GetStarted),
            KeyCode::Esc | KeyCode::Char('q') => Some(SplashAction::Exit),
            _ => {
                self.show_quick_start = true;
                None
            }
        }
    }
}

pub fn render_splash<B: Backend>(frame: &mut Frame<B>, state: &mut SplashState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(2)
        .constraints(
            [
                Constraint::Length(6), // Hero
                Constraint::Min(7),    // Quick start
                Constraint::Length(3), // Help
            ]
            .as_ref(),
        )
        .split(frame.size());

    let hero = Paragraph::new(vec![
        Spans::from(""),
        Spans::from(Span::styled(
            "Create invoices",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        )),
        Spans::from("in seconds, right from your terminal"),
    ])
    .alignment(Alignment::Center)
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(hero, chunks[0]);

    let mut lines = vec![Spans::from("")];
    if state.show_quick_start {
        for (index, (title, description)) in QUICK_START_STEPS.iter().enumerate() {
            lines.push(Spans::from(vec![
                Span::styled(
                    format!(" {} ", index + 1),
                    Style::default().bg(Color::Blue).fg(Color::White),
                ),
                Span::raw("  "),
                Span::styled(*title, Style::default().add_modifier(Modifier::BOLD)),
                Span::raw(format!(" - {}", description)),
            ]));
            lines.push(Spans::from(""));
        }
    } else {
        lines.push(Spans::from("Press any key for the quick start guide"));
    }
    lines.push(Spans::from(Span::styled(
        "Join thousands of freelancers and small businesses",
        Style::default().fg(Color::Gray),
    )));

    let quick_start = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .block(Block::default().title("Quick Start").borders(Borders::ALL));
    frame.render_widget(quick_start, chunks[1]);

    render_help(frame, chunks[2], "Enter - Get Started | Esc - Quit");
}

pub fn handle_input(state: &mut SplashState) -> Result<Option<SplashAction>> {
    if let Event::Key(key) = event::read()? {
        return Ok(state.handle_key(key.code));
    }
    Ok(None)
}
