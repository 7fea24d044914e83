use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::ui::helpers::{centered_rect, key_hints};

/// Confirmation modal; each entry of `message` is its own line.
pub fn render_confirm_modal(
    frame: &mut Frame,
    title: &str,
    message: &[String],
    confirm_key: &str,
    cancel_key: &str,
) {
    let height = (20 + message.len() as u16 * 4).min(60);
    let area = centered_rect(50, height, frame.area());
    frame.render_widget(Clear, area);

    let mut lines = vec![Line::from("")];
    lines.extend(
        message
            .iter()
            .map(|m| Line::from(Span::styled(m.clone(), Style::default().fg(Color::White)))),
    );
    lines.push(Line::from(""));
    lines.push(Line::from(vec![
        Span::styled(
            format!("[{}] ", confirm_key),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("Yes  "),
        Span::styled(
            format!("[{}] ", cancel_key),
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ),
        Span::raw("Cancel"),
    ]));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Yellow)),
        )
        .wrap(Wrap { trim: false })
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}

/// Single-line text entry.
pub fn render_input_modal(frame: &mut Frame, title: &str, prompt: &str, input: &str) {
    let area = centered_rect(60, 20, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(prompt, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(vec![
            Span::styled("> ", Style::default().fg(Color::Cyan)),
            Span::styled(
                input,
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("█", Style::default().fg(Color::White)),
        ]),
        Line::from(""),
        key_hints(&[("Enter", "Save"), ("Esc", "Cancel")]),
    ];

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .title(format!(" {} ", title))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        )
        .alignment(Alignment::Center);

    frame.render_widget(paragraph, area);
}
