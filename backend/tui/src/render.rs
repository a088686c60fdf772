//! TUI Rendering
//!
//! Translates the `ViewModel` into Ratatui widgets and draws to the frame.

use ratatui::{
    layout::{Constraint, Direction, Layout},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::view::ViewModel;

pub fn draw_ui(f: &mut Frame, view: &ViewModel) {
    let banner_height = if view.demo_banner.is_some() { 1 } else { 0 };
    let error_height = if view.error.is_some() { 3 } else { 0 };
    let input_height = if view.input_visible { 3 } else { 0 };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(banner_height),
            Constraint::Length(error_height),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(input_height),
        ])
        .split(f.size());

    if let Some(banner) = view.demo_banner {
        let widget = Paragraph::new(banner).style(Style::default().fg(Color::Yellow));
        f.render_widget(widget, chunks[0]);
    }

    if let Some(error) = &view.error {
        let widget = Paragraph::new(error.as_str())
            .style(Style::default().fg(Color::Red))
            .block(Block::default().title("Error").borders(Borders::ALL));
        f.render_widget(widget, chunks[1]);
    }

    let lines: Vec<Line> = view
        .transcript
        .iter()
        .map(|entry| {
            Line::from(vec![
                Span::styled(
                    format!("[{}] ", entry.time),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::raw(entry.text.as_str()),
            ])
        })
        .collect();
    // Keep the newest lines in view.
    let visible = chunks[2].height.saturating_sub(2) as usize;
    let scroll = lines.len().saturating_sub(visible) as u16;
    let transcript = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(Block::default().title("Interview").borders(Borders::ALL));
    f.render_widget(transcript, chunks[2]);

    f.render_widget(controls(view), chunks[3]);

    if view.input_visible {
        let style = if view.send_enabled {
            Style::default().fg(Color::Yellow)
        } else {
            Style::default().fg(Color::Gray)
        };
        let input = Paragraph::new(view.draft.as_str())
            .style(style)
            .block(Block::default().title("Your answer (Enter to send)").borders(Borders::ALL));
        f.render_widget(input, chunks[4]);
    }
}

fn controls(view: &ViewModel) -> Paragraph<'_> {
    let button_style = match (view.call_pending, view.call_active) {
        (true, _) => Style::default().fg(Color::DarkGray),
        (false, true) => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        (false, false) => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
    };

    let mut spans = vec![
        Span::styled(format!("[Ctrl+T] {}", view.call_button), button_style),
        Span::raw("  "),
        Span::styled(
            format!("[Tab] {}", view.mode_label),
            Style::default().fg(Color::Cyan),
        ),
    ];
    if let Some(status) = view.status {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(status, Style::default().add_modifier(Modifier::ITALIC)));
    }

    Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL))
}
