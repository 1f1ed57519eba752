//! Terminal User Interface using ratatui

mod picker;
mod ui;

pub use picker::TerminalPicker;

use crate::app::{App, InputError, InputMode, SelectionMode};
use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

/// How often the loop wakes to pick up bulk-check results
const TICK: Duration = Duration::from_millis(100);

/// TUI application wrapper
pub struct Tui {
    terminal: Terminal<CrosstermBackend<io::Stdout>>,
}

impl Tui {
    /// Create a new TUI instance
    pub fn new() -> Result<Self> {
        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;
        Ok(Self { terminal })
    }

    /// Set up the terminal
    fn setup(&mut self) -> Result<()> {
        enable_raw_mode()?;
        execute!(self.terminal.backend_mut(), EnterAlternateScreen)?;
        self.terminal.hide_cursor()?;
        Ok(())
    }

    /// Restore the terminal
    fn restore(&mut self) -> Result<()> {
        disable_raw_mode()?;
        execute!(self.terminal.backend_mut(), LeaveAlternateScreen)?;
        self.terminal.show_cursor()?;
        Ok(())
    }

    /// Run the TUI main loop
    pub async fn run(&mut self, app: &mut App) -> Result<()> {
        self.setup()?;

        // Initial scan; a missing folder is reported like any other notice
        if let Err(e) = app.load_mods() {
            show_input_error(app, &e);
        }

        let result = self.event_loop(app).await;

        self.restore()?;
        result
    }

    async fn event_loop(&mut self, app: &mut App) -> Result<()> {
        loop {
            app.poll_update_check();

            self.terminal.draw(|f| ui::draw(f, &app.state))?;

            if app.state.should_quit {
                break;
            }

            if event::poll(TICK)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(app, key.code).await;
                    }
                }
            }
        }

        Ok(())
    }

    /// Handle keyboard input
    async fn handle_key(&mut self, app: &mut App, key: KeyCode) {
        // Notice is modal
        if app.state.notice.is_some() {
            if matches!(key, KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ')) {
                app.state.notice = None;
            }
            return;
        }

        if app.state.input_mode != InputMode::Normal {
            self.handle_input_key(app, key);
            return;
        }

        match key {
            KeyCode::Char('q') | KeyCode::Esc => app.state.should_quit = true,
            KeyCode::Up | KeyCode::Char('k') => app.state.move_cursor(-1),
            KeyCode::Down | KeyCode::Char('j') => app.state.move_cursor(1),
            KeyCode::PageUp => app.state.move_cursor(-10),
            KeyCode::PageDown => app.state.move_cursor(10),
            KeyCode::Char(' ') => app.state.toggle_selected(),
            KeyCode::Char('a') => app.state.toggle_select_all(),
            KeyCode::Char('r') => {
                if let Err(e) = app.load_mods() {
                    show_input_error(app, &e);
                }
            }
            KeyCode::Char('c') => {
                if let Err(e) = app.start_update_check() {
                    show_input_error(app, &e);
                }
            }
            KeyCode::Char('u') => self.select_versions(app, SelectionMode::Update).await,
            KeyCode::Char('d') => self.select_versions(app, SelectionMode::Downgrade).await,
            KeyCode::Char('o') => {
                app.state.input_buffer = app.state.mods_dir.display().to_string();
                app.state.input_mode = InputMode::ModsDirectoryInput;
            }
            KeyCode::Char('v') => {
                app.state.input_buffer = app.state.game_version.clone();
                app.state.input_mode = InputMode::GameVersionInput;
            }
            KeyCode::Char('x') => app.clear_log(),
            _ => {}
        }
    }

    fn handle_input_key(&mut self, app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                let mode = app.state.input_mode;
                let value = std::mem::take(&mut app.state.input_buffer);
                app.state.input_mode = InputMode::Normal;

                match mode {
                    InputMode::ModsDirectoryInput => {
                        if let Err(e) = app.set_mods_dir(&expand_home(&value)) {
                            show_input_error(app, &e);
                        }
                    }
                    InputMode::GameVersionInput => app.set_game_version(&value),
                    InputMode::Normal => {}
                }
            }
            KeyCode::Esc => {
                app.state.input_buffer.clear();
                app.state.input_mode = InputMode::Normal;
            }
            KeyCode::Backspace => {
                app.state.input_buffer.pop();
            }
            KeyCode::Char(c) => app.state.input_buffer.push(c),
            _ => {}
        }
    }

    async fn select_versions(&mut self, app: &mut App, mode: SelectionMode) {
        let mut picker = TerminalPicker::new(&mut self.terminal);
        match app.select_versions(mode, &mut picker).await {
            Ok(outcome) => tracing::debug!("Selection finished: {:?}", outcome),
            Err(e) => show_input_error(app, &e),
        }
    }
}

impl Drop for Tui {
    fn drop(&mut self) {
        let _ = self.restore();
    }
}

fn show_input_error(app: &mut App, error: &InputError) {
    app.state.show_notice("Info", error.to_string());
}

/// Expand a leading `~/` to the home directory
fn expand_home(path: &str) -> String {
    let path = path.trim();
    match path.strip_prefix("~/") {
        Some(rest) => directories::BaseDirs::new()
            .map(|b| b.home_dir().join(rest).display().to_string())
            .unwrap_or_else(|| path.to_string()),
        None => path.to_string(),
    }
}
