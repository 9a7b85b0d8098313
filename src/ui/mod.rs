pub mod components;
pub mod dashboard;
pub mod history;
pub mod home;
pub mod invoice_sheet;
pub mod item_table;
pub mod selectors;
pub mod splash;

use crossterm::event::KeyCode;

/// Destinations on the bottom navigation bar.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum NavTab {
    Home,
    History,
    Dashboard,
}

impl NavTab {
    pub const ALL: [NavTab; 3] = [NavTab::Home, NavTab::History, NavTab::Dashboard];

    pub fn title(&self) -> &'static str {
        match self {
            NavTab::Home => "Home",
            NavTab::History => "History",
            NavTab::Dashboard => "Dashboard",
        }
    }

    pub fn from_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::F(1) => Some(NavTab::Home),
            KeyCode::F(2) => Some(NavTab::History),
            KeyCode::F(3) => Some(NavTab::Dashboard),
            _ => None,
        }
    }
}
