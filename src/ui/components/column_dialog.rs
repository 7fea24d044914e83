use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph},
    Frame,
};

use crate::app::ColumnDialogState;
use crate::checklist::Column;
use crate::ui::helpers::{
    centered_rect, key_hints, render_field_line, CursorType, FieldLineOptions, STYLE_HIGHLIGHT,
};

pub struct ColumnDialog<'a> {
    columns: &'a [Column],
    state: &'a ColumnDialogState,
}

impl<'a> ColumnDialog<'a> {
    pub fn new(columns: &'a [Column], state: &'a ColumnDialogState) -> Self {
        Self { columns, state }
    }

    pub fn render(self, frame: &mut Frame) {
        let area = centered_rect(50, 60, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" COLUMNS ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));

        let inner = block.inner(area);
        frame.render_widget(block, area);

        let form_height = if self.state.editing_name { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Min(3),
                Constraint::Length(form_height),
                Constraint::Length(2),
            ])
            .split(inner);

        let header = Paragraph::new(Line::from("  Toggle columns of the task table"))
            .style(Style::default().fg(Color::DarkGray));
        frame.render_widget(header, chunks[0]);

        self.render_list(frame, chunks[1]);
        if self.state.editing_name {
            self.render_new_column(frame, chunks[2]);
        }
        self.render_footer(frame, chunks[3]);
    }

    fn render_list(&self, frame: &mut Frame, area: Rect) {
        let items: Vec<ListItem> = self
            .columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let checkbox = if col.visible { "[x]" } else { "[ ]" };
                let kind = if col.builtin {
                    String::new()
                } else {
                    let type_name = col.cell_type.map(|t| t.display_name()).unwrap_or("Blank");
                    format!("  ({})", type_name)
                };
                let text = format!("  {}  {}{}", checkbox, col.name, kind);
                let style = if i == self.state.selected && !self.state.editing_name {
                    STYLE_HIGHLIGHT
                } else if col.builtin {
                    Style::default().fg(Color::White)
                } else {
                    Style::default().fg(Color::Magenta)
                };
                ListItem::new(text).style(style)
            })
            .collect();

        frame.render_widget(List::new(items), area);
    }

    fn render_new_column(&self, frame: &mut Frame, area: Rect) {
        let type_label = self
            .state
            .new_column_type()
            .map(|t| t.display_name())
            .unwrap_or("Blank (per cell)");
        let lines = vec![
            Line::from(""),
            render_field_line(
                "Name",
                &self.state.name_buffer,
                true,
                FieldLineOptions::new().label_width(6).cursor(CursorType::Edit),
            ),
            render_field_line(
                "Type",
                type_label,
                false,
                FieldLineOptions::new().label_width(6),
            ),
        ];
        frame.render_widget(Paragraph::new(lines), area);
    }

    fn render_footer(&self, frame: &mut Frame, area: Rect) {
        let hints = if self.state.editing_name {
            key_hints(&[("Tab", "Type"), ("Enter", "Add"), ("Esc", "Back")])
        } else {
            key_hints(&[("Space", "Toggle"), ("a", "Add column"), ("Esc", "Close")])
        };
        frame.render_widget(Paragraph::new(hints), area);
    }
}
