use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

use crate::app::{Cursor, ACTOR_COLUMNS};
use crate::checklist::ActorRow;
use crate::ui::helpers::{truncate, STYLE_HIGHLIGHT, STYLE_SELECTED_ROW};

/// Main actor table: who performs which action.
pub struct ActorTableWidget<'a> {
    actors: &'a [ActorRow],
    cursor: Cursor,
    focused: bool,
}

impl<'a> ActorTableWidget<'a> {
    pub fn new(actors: &'a [ActorRow], cursor: Cursor, focused: bool) -> Self {
        Self {
            actors,
            cursor,
            focused,
        }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let header_cells = std::iter::once("")
            .chain(ACTOR_COLUMNS.iter().copied())
            .map(|h| Cell::from(h).style(Style::default().fg(Color::DarkGray)));
        let header = Row::new(header_cells).height(1);

        let rows: Vec<Row> = self
            .actors
            .iter()
            .enumerate()
            .map(|(i, actor)| {
                let is_selected = self.focused && i == self.cursor.row;
                let row = self.render_actor_row(actor, is_selected);
                if is_selected {
                    row.style(STYLE_SELECTED_ROW)
                } else {
                    row
                }
            })
            .collect();

        let border_color = if self.focused {
            Color::Cyan
        } else {
            Color::White
        };

        let table = Table::new(
            rows,
            [
                Constraint::Length(2),
                Constraint::Percentage(30),
                Constraint::Percentage(25),
                Constraint::Percentage(20),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(
            Block::default()
                .title(format!(" MAIN ACTORS ({}) ", self.actors.len()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(border_color)),
        );

        frame.render_widget(table, area);
    }

    fn render_actor_row(&self, actor: &ActorRow, selected: bool) -> Row<'a> {
        let selector = if selected { "▶" } else { "" };
        let realtime = actor.is_realtime();

        let values = [
            actor.actions.clone(),
            if realtime {
                "⚡ Realtime".to_string()
            } else {
                actor.main_actor.clone()
            },
            if realtime { "—".to_string() } else { actor.team.clone() },
            if realtime {
                "—".to_string()
            } else {
                actor.designation.clone()
            },
        ];

        let mut cells = vec![Cell::from(selector).style(Style::default().fg(Color::Cyan))];
        cells.extend(values.into_iter().enumerate().map(|(col, value)| {
            let style = if selected && col == self.cursor.col {
                STYLE_HIGHLIGHT
            } else if realtime && col > 0 {
                Style::default()
                    .fg(Color::Magenta)
                    .add_modifier(Modifier::ITALIC)
            } else if value.is_empty() {
                Style::default().fg(Color::DarkGray)
            } else {
                Style::default().fg(Color::White)
            };
            let text = if value.is_empty() {
                "·".to_string()
            } else {
                truncate(&value, 32)
            };
            Cell::from(text).style(style)
        }));

        Row::new(cells)
    }
}
