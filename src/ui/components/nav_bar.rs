use tui::{
    backend::Backend,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Span, Spans},
    widgets::{Block, Borders, Tabs},
    Frame,
};

use crate::ui::NavTab;

pub fn render_nav_bar<B: Backend>(frame: &mut Frame<B>, area: Rect, active: NavTab) {
    let titles = NavTab::ALL
        .iter()
        .enumerate()
        .map(|(i, tab)| Spans::from(Span::raw(format!("F{} {}", i + 1, tab.title()))))
        .collect::<Vec<_>>();
    let selected = NavTab::ALL.iter().position(|tab| *tab == active).unwrap_or(0);

    let tabs = Tabs::new(titles)
        .block(Block::default().borders(Borders::TOP))
        .select(selected)
        .style(Style::default().fg(Color::White))
        .highlight_style(
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        );

    frame.render_widget(tabs, area);
}
