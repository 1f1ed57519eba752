//! Modal release picker
//!
//! Runs its own draw/read loop and returns only when the user confirms or
//! cancels, blocking the main loop like a modal dialog.

use super::ui::centered_rect;
use crate::app::VersionPicker;
use crate::modrinth::RemoteRelease;
use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, Paragraph, Row, Table, TableState},
    Terminal,
};

/// Cursor over a release list
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
struct PickerCursor {
    index: usize,
    len: usize,
}

/// What a key press means to the picker
#[derive(Debug, PartialEq, Eq)]
enum PickerStep {
    Continue,
    Chosen(usize),
    Cancelled,
}

impl PickerCursor {
    fn handle_key(&mut self, key: KeyCode) -> PickerStep {
        let last = self.len.saturating_sub(1);
        match key {
            KeyCode::Up | KeyCode::Char('k') => self.index = self.index.saturating_sub(1),
            KeyCode::Down | KeyCode::Char('j') => self.index = (self.index + 1).min(last),
            KeyCode::PageUp => self.index = self.index.saturating_sub(10),
            KeyCode::PageDown => self.index = (self.index + 10).min(last),
            KeyCode::Home => self.index = 0,
            KeyCode::End => self.index = last,
            KeyCode::Enter if self.len > 0 => return PickerStep::Chosen(self.index),
            KeyCode::Esc | KeyCode::Char('q') => return PickerStep::Cancelled,
            _ => {}
        }
        PickerStep::Continue
    }
}

/// Version picker drawn on the application terminal
pub struct TerminalPicker<'a, B: Backend> {
    terminal: &'a mut Terminal<B>,
}

impl<'a, B: Backend> TerminalPicker<'a, B> {
    pub fn new(terminal: &'a mut Terminal<B>) -> Self {
        Self { terminal }
    }

    fn run(&mut self, title: &str, releases: &[RemoteRelease]) -> Result<Option<usize>> {
        let mut cursor = PickerCursor {
            index: 0,
            len: releases.len(),
        };

        loop {
            self.terminal.draw(|f| {
                let area = centered_rect(80, 80, f.area());
                f.render_widget(Clear, area);

                let chunks = Layout::default()
                    .direction(Direction::Vertical)
                    .constraints([Constraint::Min(3), Constraint::Length(1)])
                    .split(area);

                let rows: Vec<Row> = releases
                    .iter()
                    .map(|r| {
                        Row::new(vec![
                            r.version_number.clone(),
                            r.platform_versions_label(),
                            r.published_date().to_string(),
                        ])
                    })
                    .collect();

                let table = Table::new(
                    rows,
                    [
                        Constraint::Percentage(40),
                        Constraint::Percentage(40),
                        Constraint::Percentage(20),
                    ],
                )
                .header(
                    Row::new(["Version", "Minecraft Version", "Release Date"])
                        .style(Style::default().add_modifier(Modifier::BOLD)),
                )
                .block(
                    Block::default()
                        .title(format!(" {} ", title))
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Cyan)),
                )
                .row_highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

                let mut state = TableState::default().with_selected(Some(cursor.index));
                f.render_stateful_widget(table, chunks[0], &mut state);

                let help = Paragraph::new(" [Enter] select  [Esc] cancel")
                    .style(Style::default().fg(Color::DarkGray));
                f.render_widget(help, chunks[1]);
            })?;

            if let Event::Key(key) = event::read()? {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                match cursor.handle_key(key.code) {
                    PickerStep::Continue => {}
                    PickerStep::Chosen(index) => return Ok(Some(index)),
                    PickerStep::Cancelled => return Ok(None),
                }
            }
        }
    }
}

impl<B: Backend> VersionPicker for TerminalPicker<'_, B> {
    fn pick(&mut self, title: &str, releases: &[RemoteRelease]) -> Option<usize> {
        match self.run(title, releases) {
            Ok(choice) => choice,
            Err(e) => {
                tracing::error!("Version picker failed: {}", e);
                None
            }
        }
    }
}
