mod catalog;
mod cli;
mod config;
mod errors;
mod invoice;
mod invoice_gen;
mod logging;
mod models;
mod share_target;
mod store;
mod ui;

use std::fs;
use std::io::{self, Read};
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use clap::Parser;
use crossterm::{
    terminal::{self, EnterAlternateScreen, LeaveAlternateScreen},
    event::{DisableMouseCapture, EnableMouseCapture},
    execute,
};
use tui::{
    backend::{Backend, CrosstermBackend},
    Terminal,
};

use crate::catalog::{seed_history, today, Catalog};
use crate::cli::{render_totals_report, Cli, Command};
use crate::config::Config;
use crate::invoice::invoice_number;
use crate::invoice_gen::InvoiceGenerator;
use crate::models::{HistoryEntry, InvoiceDraft, InvoiceStatus, InvoiceTotals, TaxPolicy};
use crate::store::{FileOnboardingStore, OnboardingStore};
use crate::ui::{
    NavTab,
    splash::{SplashState, SplashAction, render_splash, handle_input as handle_splash_input},
    home::{HomeState, HomeAction, render_home, handle_input as handle_home_input},
    item_table::{ItemTableState, ItemTableAction, render_item_table, handle_input as handle_item_table_input},
    invoice_sheet::{InvoiceSheetState, SheetAction, render_invoice_sheet, handle_input as handle_invoice_sheet_input},
    history::{HistoryState, HistoryAction, render_history, handle_input as handle_history_input},
    dashboard::{DashboardAction, render_dashboard, handle_input as handle_dashboard_input},
};

// Represents the current screen in the app
#[derive(Clone, Copy, PartialEq, Debug)]
enum AppScreen {
    Splash,
    Home,
    ItemTable,
    InvoiceSheet,
    History,
    Dashboard,
}

// Main application state
struct AppState {
    config: Config,
    store: FileOnboardingStore,
    catalog: Catalog,
    history: Vec<HistoryEntry>,
    // History entries loaded before this session started
    seeded_invoices: usize,
    screen: AppScreen,
    splash_state: Option<SplashState>,
    home_state: HomeState,
    item_table_state: ItemTableState,
    invoice_sheet_state: Option<InvoiceSheetState>,
    history_state: HistoryState,
    // Screen the invoice sheet returns to when closed
    return_to: AppScreen,
}

impl AppState {
    fn new(config: Config, store: FileOnboardingStore, show_splash: bool) -> Self {
        let home_state = HomeState::new(config.default_gst_rate, config.starting_invoice_count);
        let item_table_state = ItemTableState::new(config.default_gst_rate);
        let history = seed_history(today());

        Self {
            config,
            store,
            catalog: Catalog::with_presets(),
            seeded_invoices: history.len(),
            history,
            screen: if show_splash { AppScreen::Splash } else { AppScreen::Home },
            splash_state: show_splash.then(SplashState::new),
            home_state,
            item_table_state,
            invoice_sheet_state: None,
            history_state: HistoryState::new(),
            return_to: AppScreen::Home,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let mut config = config::init()?;
    if let Some(rate) = cli.gst_rate {
        config.default_gst_rate = rate;
    }

    logging::init(&config.log_file)?;

    if let Some(Command::Totals { gst_rate, file }) = &cli.command {
        let rate = gst_rate.unwrap_or(config.default_gst_rate);
        return print_totals(file.as_deref(), TaxPolicy::Fixed(rate));
    }

    let mut store = store::init(&config);
    if cli.reset_onboarding {
        store.reset()?;
    }
    let show_splash = cli.show_splash || !store.has_seen_splash()?;
    tracing::info!(show_splash, "quick_invoice started");

    // Setup terminal
    terminal::enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app_state = AppState::new(config, store, show_splash);

    // Run the main app loop
    let result = run_app(&mut terminal, &mut app_state).await;

    // Restore terminal
    terminal::disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    // Show any error message
    if let Err(err) = &result {
        tracing::error!(error = %err, "quick_invoice stopped with an error");
        println!("Error: {}", err);
    }

    tracing::info!("quick_invoice exited");
    println!("Thanks for using Quick Invoice!");

    Ok(())
}

fn print_totals(file: Option<&Path>, policy: TaxPolicy) -> Result<()> {
    let text = match file {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin().read_to_string(&mut text)?;
            text
        }
    };

    print!("{}", render_totals_report(&text, policy));
    Ok(())
}

async fn run_app<B: Backend>(terminal: &mut Terminal<B>, app_state: &mut AppState) -> Result<()> {
    loop {
        // Render current screen
        terminal.draw(|f| {
            match app_state.screen {
                AppScreen::Splash => {
                    if let Some(state) = &mut app_state.splash_state {
                        render_splash(f, state);
                    }
                }
                AppScreen::Home => render_home(f, &mut app_state.home_state),
                AppScreen::ItemTable => render_item_table(f, &mut app_state.item_table_state),
                AppScreen::InvoiceSheet => {
                    if let Some(state) = &mut app_state.invoice_sheet_state {
                        render_invoice_sheet(f, state, &app_state.catalog);
                    }
                }
                AppScreen::History => {
                    render_history(f, &mut app_state.history_state, &app_state.history)
                }
                AppScreen::Dashboard => {
                    render_dashboard(f, &app_state.history, &app_state.catalog, app_state.seeded_invoices)
                }
            }
        })?;

        // The sheet shows "Generating..." for one frame before the delay runs
        if matches!(&app_state.invoice_sheet_state, Some(state) if state.is_generating()) {
            finish_generation(app_state).await;
            continue;
        }

        // Handle input for current screen
        let should_quit = match app_state.screen {
            AppScreen::Splash => handle_splash_screen(app_state)?,
            AppScreen::Home => handle_home_screen(app_state)?,
            AppScreen::ItemTable => handle_item_table_screen(app_state)?,
            AppScreen::InvoiceSheet => handle_invoice_sheet_screen(app_state)?,
            AppScreen::History => handle_history_screen(app_state)?,
            AppScreen::Dashboard => handle_dashboard_screen(app_state)?,
        };

        if should_quit {
            break;
        }
    }

    Ok(())
}

fn show_screen(app_state: &mut AppState, screen: AppScreen) {
    tracing::debug!(from = ?app_state.screen, to = ?screen, "screen change");
    app_state.screen = screen;
}

fn navigate(app_state: &mut AppState, tab: NavTab) {
    let screen = match tab {
        NavTab::Home => AppScreen::Home,
        NavTab::History => AppScreen::History,
        NavTab::Dashboard => AppScreen::Dashboard,
    };
    show_screen(app_state, screen);
}

fn open_invoice_sheet(
    app_state: &mut AppState,
    totals: InvoiceTotals,
    policy: TaxPolicy,
    from: AppScreen,
) {
    let draft = InvoiceDraft {
        number: invoice_number(Local::now().timestamp_millis()),
        date: today(),
        customer: None,
        policy,
        totals,
    };

    app_state.invoice_sheet_state = Some(InvoiceSheetState::new(draft, &app_state.config.share_base_url));
    app_state.return_to = from;
    show_screen(app_state, AppScreen::InvoiceSheet);
}

fn close_invoice_sheet(app_state: &mut AppState) {
    app_state.invoice_sheet_state = None;
    let screen = app_state.return_to;
    show_screen(app_state, screen);
}

async fn finish_generation(app_state: &mut AppState) {
    let delay = app_state.config.generation_delay();
    if let Some(state) = &mut app_state.invoice_sheet_state {
        state.generate(delay).await;

        let entry = state.draft().history_entry();
        tracing::info!(
            invoice = %entry.id,
            total = entry.amount,
            items = ?entry.items,
            "invoice generated"
        );
        app_state.history.push(entry);

        // Only the form the invoice came from is cleared
        match app_state.return_to {
            AppScreen::ItemTable => {
                app_state.item_table_state.reset();
                app_state.home_state.count_invoice();
            }
            _ => app_state.home_state.invoice_generated(),
        }
    }
}

fn handle_splash_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.splash_state {
        match handle_splash_input(state)? {
            Some(SplashAction::GetStarted) => {
                app_state.store.mark_seen()?;
                app_state.splash_state = None;
                show_screen(app_state, AppScreen::Home);
            }
            Some(SplashAction::Exit) => return Ok(true),
            None => {}
        }
    }

    Ok(false)
}

fn handle_home_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_home_input(&mut app_state.home_state)? {
        Some(HomeAction::Generate(totals, policy)) => {
            open_invoice_sheet(app_state, totals, policy, AppScreen::Home);
        }
        Some(HomeAction::OpenTable) => show_screen(app_state, AppScreen::ItemTable),
        Some(HomeAction::Navigate(tab)) => navigate(app_state, tab),
        Some(HomeAction::Exit) => return Ok(true),
        None => {}
    }

    Ok(false)
}

fn handle_item_table_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_item_table_input(&mut app_state.item_table_state)? {
        Some(ItemTableAction::Back) => show_screen(app_state, AppScreen::Home),
        Some(ItemTableAction::Generate(totals, policy)) => {
            open_invoice_sheet(app_state, totals, policy, AppScreen::ItemTable);
        }
        Some(ItemTableAction::Navigate(tab)) => navigate(app_state, tab),
        None => {}
    }

    Ok(false)
}

fn handle_invoice_sheet_screen(app_state: &mut AppState) -> Result<bool> {
    if let Some(state) = &mut app_state.invoice_sheet_state {
        match handle_invoice_sheet_input(state, &mut app_state.catalog)? {
            Some(SheetAction::Close) => close_invoice_sheet(app_state),
            Some(SheetAction::OpenShare(url)) => match share_target::open_url(&url) {
                Ok(()) => state.set_status("Opened the share target."),
                Err(e) => {
                    tracing::warn!(error = %e, "could not open share target");
                    state.set_status(format!("Could not open a browser. Share this link: {}", url));
                }
            },
            Some(SheetAction::Export(draft)) => {
                let exported = InvoiceGenerator::new(app_state.config.output_dir())
                    .and_then(|generator| generator.generate_invoice(&draft));
                match exported {
                    Ok((_, pdf_path)) => {
                        state.set_status(format!("Saved {}", pdf_path.display()));
                    }
                    Err(e) => {
                        tracing::warn!(error = %e, invoice = %draft.number, "export failed");
                        state.set_status(format!("Export failed: {}", e));
                    }
                }
            }
            Some(SheetAction::MarkPaid(number)) => {
                if let Some(entry) = app_state.history.iter_mut().find(|entry| entry.id == number) {
                    entry.status = InvoiceStatus::Paid;
                }
                close_invoice_sheet(app_state);
            }
            None => {}
        }
    }

    Ok(false)
}

fn handle_history_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_history_input(&mut app_state.history_state, &app_state.history)? {
        Some(HistoryAction::Navigate(tab)) => navigate(app_state, tab),
        Some(HistoryAction::Exit) => return Ok(true),
        None => {}
    }

    Ok(false)
}

fn handle_dashboard_screen(app_state: &mut AppState) -> Result<bool> {
    match handle_dashboard_input()? {
        Some(DashboardAction::Navigate(tab)) => navigate(app_state, tab),
        Some(DashboardAction::Exit) => return Ok(true),
        None => {}
    }

    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::KeyCode;
    use tempfile::TempDir;

    fn test_app(dir: &TempDir) -> AppState {
        let mut config = Config::from_pairs(Vec::new()).unwrap();
        config.generation_delay_ms = 0;
        let store = FileOnboardingStore::new(dir.path().join("seen_splash"));
        AppState::new(config, store, false)
    }

    fn fill_table_row(app: &mut AppState, cells: [&str; 3]) {
        for cell in cells {
            app.item_table_state.handle_key(KeyCode::Enter);
            for c in cell.chars() {
                app.item_table_state.handle_key(KeyCode::Char(c));
            }
            app.item_table_state.handle_key(KeyCode::Enter);
        }
    }

    #[tokio::test]
    async fn generating_from_home_leaves_the_table_alone() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        fill_table_row(&mut app, ["Tea", "2", "9"]);
        app.home_state.handle_key(KeyCode::Char('e'));
        let count = app.home_state.invoice_count();
        let history_len = app.history.len();

        let (totals, policy) = (app.item_table_state.totals(), app.item_table_state.tax_policy());
        open_invoice_sheet(&mut app, totals, policy, AppScreen::Home);
        finish_generation(&mut app).await;

        assert_eq!(app.home_state.items_text(), "");
        assert_eq!(app.item_table_state.rows()[0].item, "Tea");
        assert_eq!(app.home_state.invoice_count(), count + 1);
        assert_eq!(app.history.len(), history_len + 1);
    }

    #[tokio::test]
    async fn generating_from_the_table_keeps_the_home_text() {
        let dir = TempDir::new().unwrap();
        let mut app = test_app(&dir);
        fill_table_row(&mut app, ["Tea", "2", "9"]);
        app.home_state.handle_key(KeyCode::Char('e'));
        let home_text = app.home_state.items_text().to_string();
        let count = app.home_state.invoice_count();

        let (totals, policy) = (app.item_table_state.totals(), app.item_table_state.tax_policy());
        open_invoice_sheet(&mut app, totals, policy, AppScreen::ItemTable);
        finish_generation(&mut app).await;

        assert_eq!(app.home_state.items_text(), home_text);
        assert_eq!(app.item_table_state.rows().len(), 1);
        assert_eq!(app.item_table_state.rows()[0].item, "");
        assert_eq!(app.home_state.invoice_count(), count + 1);
        assert_eq!(app.history.len(), app.seeded_invoices + 1);
    }
}
