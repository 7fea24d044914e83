use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::ui::helpers::centered_rect;

const SECTIONS: &[(&str, &[(&str, &str)])] = &[
    (
        "Navigation",
        &[
            ("Tab", "Switch between actor and task tables"),
            ("j/k", "Move down / up"),
            ("h/l", "Move left / right"),
        ],
    ),
    (
        "Editing",
        &[
            ("Enter", "Edit selected cell"),
            ("Space", "Toggle remark or checkbox cell"),
            ("a", "Add row"),
            ("d", "Delete row"),
            ("c", "Show, hide and add columns"),
            ("t", "Set field type of a custom column cell"),
            ("x", "Add a custom cell to the task"),
        ],
    ),
    (
        "Workflow",
        &[
            ("p", "Publish checklist"),
            ("r", "Reload actors, entities and saved step"),
        ],
    ),
    (
        "Other",
        &[
            ("L", "Toggle log panel"),
            ("?", "Toggle this help"),
            ("q", "Quit"),
            ("Esc", "Cancel/close"),
        ],
    ),
];

pub struct HelpOverlay<'a> {
    title: &'a str,
}

impl<'a> HelpOverlay<'a> {
    pub fn new(title: &'a str) -> Self {
        Self { title }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let popup_area = centered_rect(60, 70, area);
        frame.render_widget(Clear, popup_area);

        let mut help_text = vec![
            Line::from(Span::styled(
                self.title.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(""),
        ];

        for (heading, keys) in SECTIONS {
            help_text.push(Line::from(Span::styled(
                *heading,
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )));
            help_text.extend(
                keys.iter()
                    .map(|(key, desc)| Line::from(format!("  {:8} {}", key, desc))),
            );
            help_text.push(Line::from(""));
        }

        help_text.push(Line::from(Span::styled(
            "Press any key to close",
            Style::default().fg(Color::DarkGray),
        )));

        let paragraph = Paragraph::new(help_text).block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );

        frame.render_widget(paragraph, popup_area);
    }
}
