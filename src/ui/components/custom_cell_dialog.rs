use ratatui::{
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::CustomCellDialogState;
use crate::checklist::TaskRow;
use crate::ui::helpers::{
    centered_rect, key_hints, render_field_line, CursorType, FieldLineOptions,
};

pub struct CustomCellDialog<'a> {
    state: &'a CustomCellDialogState,
    task: Option<&'a TaskRow>,
}

impl<'a> CustomCellDialog<'a> {
    pub fn new(state: &'a CustomCellDialogState, task: Option<&'a TaskRow>) -> Self {
        Self { state, task }
    }

    pub fn render(self, frame: &mut Frame) {
        let area = centered_rect(50, 30, frame.area());
        frame.render_widget(Clear, area);

        let task_label = self
            .task
            .map(|t| format!("{} {}", t.task_number, t.task_name))
            .unwrap_or_default();

        let lines = vec![
            Line::styled(format!("  Task {}", task_label), Style::default().fg(Color::DarkGray)),
            Line::from(""),
            render_field_line(
                "Tag",
                &self.state.tag_buffer,
                true,
                FieldLineOptions::new().label_width(6).cursor(CursorType::Edit),
            ),
            render_field_line(
                "Type",
                self.state.cell_type().display_name(),
                false,
                FieldLineOptions::new().label_width(6).is_toggle(true),
            ),
            Line::from(""),
            key_hints(&[("Tab", "Type"), ("Enter", "Add"), ("Esc", "Cancel")]),
        ];

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" ADD CUSTOM CELL ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Cyan)),
        );
        frame.render_widget(paragraph, area);
    }
}
