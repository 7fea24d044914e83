use ratatui::{
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{FieldTypeDialogState, FieldTypeFocus};
use crate::checklist::CellType;
use crate::ui::helpers::{
    centered_rect, key_hints, render_field_line, CursorType, FieldLineOptions, STYLE_HIGHLIGHT,
};

/// Type and option editor for one custom column cell.
pub struct FieldTypeDialog<'a> {
    state: &'a FieldTypeDialogState,
}

impl<'a> FieldTypeDialog<'a> {
    pub fn new(state: &'a FieldTypeDialogState) -> Self {
        Self { state }
    }

    pub fn render(self, frame: &mut Frame) {
        let area = centered_rect(50, 60, frame.area());
        frame.render_widget(Clear, area);

        let state = self.state;
        let on_type = state.focus == FieldTypeFocus::Type;
        let mut lines = vec![
            Line::from(Span::styled(
                format!("  Column: {}", state.column),
                Style::default().fg(Color::DarkGray),
            )),
            Line::from(""),
        ];

        for (i, cell_type) in CellType::selectable().iter().enumerate() {
            let marker = if i == state.type_index { "(•)" } else { "( )" };
            let text = format!("    {} {}", marker, cell_type.display_name());
            let style = if on_type && i == state.type_index {
                STYLE_HIGHLIGHT
            } else {
                Style::default().fg(Color::White)
            };
            lines.push(Line::from(Span::styled(text, style)));
        }

        if state.cell_type().has_options() {
            lines.push(Line::from(""));
            let options = if state.options.is_empty() {
                "(none)".to_string()
            } else {
                state.options.join(", ")
            };
            lines.push(render_field_line(
                "Options",
                &options,
                false,
                FieldLineOptions::new().label_width(8),
            ));
            lines.push(render_field_line(
                "New",
                &state.option_buffer,
                !on_type,
                FieldLineOptions::new().label_width(8).cursor(CursorType::Edit),
            ));
        }

        lines.push(Line::from(""));
        lines.push(if on_type {
            key_hints(&[("j/k", "Type"), ("Tab", "Options"), ("Enter", "Save"), ("Esc", "Cancel")])
        } else {
            key_hints(&[("Enter", "Add option"), ("Bksp", "Remove"), ("Tab", "Type"), ("Esc", "Back")])
        });

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" FIELD TYPE ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }
}
