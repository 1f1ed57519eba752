//! Main UI rendering

use crate::app::{AppState, InputMode, Notice};
use crate::updates::UpdateStatus;
use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame,
};

const LOG_PANE_HEIGHT: u16 = 10;

/// Draw the main UI
pub fn draw(f: &mut Frame, state: &AppState) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),               // Header
            Constraint::Min(6),                  // Mod table
            Constraint::Length(LOG_PANE_HEIGHT), // Activity log
            Constraint::Length(1),               // Key help
        ])
        .split(f.area());

    draw_header(f, state, chunks[0]);
    draw_mod_table(f, state, chunks[1]);
    draw_log(f, state, chunks[2]);
    draw_help_bar(f, chunks[3]);

    if state.input_mode != InputMode::Normal {
        draw_input_dialog(f, state);
    }

    if let Some(notice) = &state.notice {
        draw_notice(f, notice);
    }
}

fn draw_header(f: &mut Frame, state: &AppState, area: Rect) {
    let mut spans = vec![
        Span::styled(
            " Minecraft Mod Manager ",
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" Folder: {} ", state.mods_dir.display())),
        Span::styled(
            format!(" MC {} ", state.game_version),
            Style::default().fg(Color::Magenta),
        ),
    ];
    if state.is_checking() {
        spans.push(Span::styled(
            " Checking for updates... ",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    f.render_widget(header, area);
}

fn status_style(status: UpdateStatus) -> Style {
    match status {
        UpdateStatus::NotChecked => Style::default(),
        UpdateStatus::UpToDate => Style::default().fg(Color::Green),
        UpdateStatus::UpdateAvailable => Style::default().fg(Color::Yellow),
        UpdateStatus::Unknown => Style::default().fg(Color::DarkGray),
        UpdateStatus::Downgraded => Style::default().fg(Color::Magenta),
    }
}

fn draw_mod_table(f: &mut Frame, state: &AppState, area: Rect) {
    let title = format!(
        " Installed Mods ({}, {} selected) ",
        state.rows.len(),
        state.selected.len()
    );

    if state.rows.is_empty() {
        let empty = Paragraph::new(vec![
            Line::from(""),
            Line::from("No mods loaded"),
            Line::from(""),
            Line::from("Press 'r' to scan the mods folder"),
            Line::from("Press 'o' to choose another folder"),
        ])
        .block(Block::default().title(title).borders(Borders::ALL))
        .style(Style::default().fg(Color::DarkGray))
        .alignment(Alignment::Center);

        f.render_widget(empty, area);
        return;
    }

    let header = Row::new(["", "Mod Name", "Current Version", "Latest Version", "Status"])
        .style(Style::default().add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = state
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let marker = if state.selected.contains(&i) { "[*]" } else { "[ ]" };
            let [name, current, latest, status] = row.cells();
            Row::new(vec![
                Cell::from(marker),
                Cell::from(name.to_string()),
                Cell::from(current.to_string()),
                Cell::from(latest.to_string()),
                Cell::from(status.to_string()).style(status_style(row.status)),
            ])
        })
        .collect();

    let table = Table::new(
        rows,
        [
            Constraint::Length(4),
            Constraint::Percentage(40),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
            Constraint::Percentage(20),
        ],
    )
    .header(header)
    .block(Block::default().title(title).borders(Borders::ALL))
    .row_highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    );

    let mut table_state = TableState::default().with_selected(Some(state.cursor));
    f.render_stateful_widget(table, area, &mut table_state);
}

fn draw_log(f: &mut Frame, state: &AppState, area: Rect) {
    let visible = area.height.saturating_sub(2) as usize;
    let start = state.log_lines.len().saturating_sub(visible);
    let lines: Vec<Line> = state.log_lines[start..]
        .iter()
        .map(|l| Line::from(l.as_str()))
        .collect();

    let log = Paragraph::new(lines)
        .block(Block::default().title(" Activity Log ").borders(Borders::ALL))
        .style(Style::default().fg(Color::Gray));
    f.render_widget(log, area);
}

fn draw_help_bar(f: &mut Frame, area: Rect) {
    let help = Paragraph::new(
        " [Space] select  [a] all  [r] refresh  [c] check updates  [u] update  [d] downgrade  \
         [o] folder  [v] MC version  [x] clear log  [q] quit",
    )
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(help, area);
}

fn draw_input_dialog(f: &mut Frame, state: &AppState) {
    let area = centered_rect(60, 20, f.area());
    f.render_widget(Clear, area);

    let title = match state.input_mode {
        InputMode::ModsDirectoryInput => " Mods Folder ",
        InputMode::GameVersionInput => " Minecraft Version ",
        InputMode::Normal => "",
    };

    let text = vec![
        Line::from(""),
        Line::from(format!("{}_", state.input_buffer)),
        Line::from(""),
        Line::from(Span::styled(
            "[Enter] apply  [Esc] cancel",
            Style::default().fg(Color::DarkGray),
        )),
    ];

    let popup = Paragraph::new(text).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan)),
    );
    f.render_widget(popup, area);
}

fn draw_notice(f: &mut Frame, notice: &Notice) {
    let area = centered_rect(50, 25, f.area());

    f.render_widget(Clear, area);

    let text = vec![
        Line::from(""),
        Line::from(Span::styled(
            notice.message.as_str(),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from("[Enter] OK"),
    ];

    let popup = Paragraph::new(text)
        .block(
            Block::default()
                .title(format!(" {} ", notice.title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    f.render_widget(popup, area);
}

pub(super) fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::ActivityLog;
    use crate::mods::{LoaderKind, ModRecord};
    use ratatui::{backend::TestBackend, Terminal};
    use std::path::{Path, PathBuf};

    fn buffer_text(terminal: &Terminal<TestBackend>) -> String {
        terminal
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn test_draw_rows_and_notice() {
        let dir = tempfile::tempdir().unwrap();
        let mut state = AppState::new(
            PathBuf::from("/mods"),
            "1.21.5".to_string(),
            ActivityLog::new(dir.path().join("activity.log")),
        );
        let mut record = ModRecord::from_file(Path::new("examplemod-1.0.jar"), LoaderKind::Fabric);
        record.display_name = "Example Mod".to_string();
        state.set_rows(vec![record]);
        state.log("Finished loading mods.");

        let mut terminal = Terminal::new(TestBackend::new(120, 30)).unwrap();
        terminal.draw(|f| draw(f, &state)).unwrap();
        let text = buffer_text(&terminal);
        assert!(text.contains("Example Mod"));
        assert!(text.contains("Not checked"));
        assert!(text.contains("Finished loading mods."));

        state.show_notice("Info", "No mods selected");
        terminal.draw(|f| draw(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("No mods selected"));
    }

    #[test]
    fn test_draw_empty_table() {
        let dir = tempfile::tempdir().unwrap();
        let state = AppState::new(
            PathBuf::from("/mods"),
            "1.21.5".to_string(),
            ActivityLog::new(dir.path().join("activity.log")),
        );
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| draw(f, &state)).unwrap();
        assert!(buffer_text(&terminal).contains("No mods loaded"));
    }
}
