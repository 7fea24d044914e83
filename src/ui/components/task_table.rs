use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::Cursor;
use crate::checklist::{
    CellType, ChecklistModel, TaskRow, COLUMN_ACTIONS, COLUMN_ENTITY_OBJECT, COLUMN_ENTITY_TYPE,
    COLUMN_REMARK, COLUMN_ROUTE, COLUMN_TASK_NAME, COLUMN_TASK_NUMBER, CUSTOM_CELLS_COLUMN,
};
use crate::ui::helpers::{truncate, STYLE_HIGHLIGHT, STYLE_SELECTED_ROW};

const CELL_WIDTH: usize = 24;

pub struct TaskTableWidget<'a> {
    model: &'a ChecklistModel,
    columns: &'a [String],
    cursor: Cursor,
    focused: bool,
}

impl<'a> TaskTableWidget<'a> {
    pub fn new(
        model: &'a ChecklistModel,
        columns: &'a [String],
        cursor: Cursor,
        focused: bool,
    ) -> Self {
        Self {
            model,
            columns,
            cursor,
            focused,
        }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let header_cells = std::iter::once(Cell::from("")).chain(self.columns.iter().map(|name| {
            let style = if self.model.column(name).is_ok_and(|c| !c.builtin) {
                Style::default().fg(Color::Magenta)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            Cell::from(name.as_str()).style(style)
        }));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .model
            .tasks
            .iter()
            .enumerate()
            .map(|(i, task)| {
                let is_selected = self.focused && i == self.cursor.row;
                let row = self.render_task_row(task, is_selected);
                if is_selected {
                    row.style(STYLE_SELECTED_ROW)
                } else {
                    row
                }
            })
            .collect();

        let widths: Vec<Constraint> = std::iter::once(Constraint::Length(2))
            .chain(self.columns.iter().map(|name| column_width(name)))
            .collect();

        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::White
        };

        let table = Table::new(rows, widths).header(header).block(
            Block::default()
                .title(format!(" TASKS ({}) ", self.model.tasks.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );

        frame.render_widget(table, area);
    }

    fn render_task_row(&self, task: &TaskRow, selected: bool) -> Row<'a> {
        let selector = if selected { "▶" } else { "" };
        let mut cells = vec![Cell::from(selector).style(Style::default().fg(Color::Cyan))];

        for (col, name) in self.columns.iter().enumerate() {
            let (text, style) = self.cell_text(task, name);
            let style = if selected && col == self.cursor.col {
                STYLE_HIGHLIGHT
            } else {
                style
            };
            cells.push(Cell::from(truncate(&text, CELL_WIDTH)).style(style));
        }

        Row::new(cells)
    }

    fn cell_text(&self, task: &TaskRow, column: &str) -> (String, Style) {
        let plain = Style::default().fg(Color::White);
        let dim = Style::default().fg(Color::DarkGray);
        let or_dot = |s: String| if s.is_empty() { ("·".to_string(), dim) } else { (s, plain) };

        match column {
            COLUMN_TASK_NUMBER => (task.task_number.clone(), dim),
            COLUMN_TASK_NAME => or_dot(task.task_name.clone()),
            COLUMN_ACTIONS => or_dot(
                task.action_actor
                    .and_then(|id| self.model.actor(id))
                    .map(|a| a.actions.clone())
                    .unwrap_or_default(),
            ),
            COLUMN_REMARK => {
                if task.remark {
                    ("[x]".to_string(), Style::default().fg(Color::Green))
                } else {
                    ("[ ]".to_string(), dim)
                }
            }
            COLUMN_ENTITY_TYPE => or_dot(task.entity_types.join(", ")),
            COLUMN_ENTITY_OBJECT => {
                if task.entity_types.is_empty() {
                    ("·".to_string(), dim)
                } else if task.entity_objects.is_empty() {
                    ("All".to_string(), Style::default().fg(Color::Cyan))
                } else {
                    (task.entity_objects.join(", "), plain)
                }
            }
            COLUMN_ROUTE => or_dot(task.route.clone()),
            CUSTOM_CELLS_COLUMN => {
                let tags: Vec<&str> = task.custom_cells.iter().map(|c| c.tag.as_str()).collect();
                or_dot(tags.join(", "))
            }
            _ => self.custom_cell_text(task, column),
        }
    }

    fn custom_cell_text(&self, task: &TaskRow, column: &str) -> (String, Style) {
        let Ok(col) = self.model.column(column) else {
            return (String::new(), Style::default());
        };
        match self.model.effective_cell_type(task, col) {
            CellType::Blank => (
                "Set Field Type".to_string(),
                Style::default()
                    .fg(Color::DarkGray)
                    .add_modifier(Modifier::ITALIC),
            ),
            cell_type => {
                let value = self
                    .model
                    .cell_value(task, col)
                    .map(|v| v.display())
                    .unwrap_or_default();
                if value.is_empty() {
                    (
                        format!("<{}>", cell_type.display_name()),
                        Style::default().fg(Color::DarkGray),
                    )
                } else {
                    (value, Style::default().fg(Color::Magenta))
                }
            }
        }
    }
}

fn column_width(name: &str) -> Constraint {
    match name {
        COLUMN_TASK_NUMBER => Constraint::Length(6),
        COLUMN_REMARK => Constraint::Length(7),
        COLUMN_TASK_NAME => Constraint::Min(16),
        _ => Constraint::Length((name.chars().count().max(10) + 2).min(CELL_WIDTH) as u16),
    }
}
