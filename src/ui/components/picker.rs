use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::app::{MultiPickerState, PickerState};
use crate::ui::helpers::{centered_rect, key_hints, STYLE_HIGHLIGHT};

pub struct PickerWidget<'a> {
    state: &'a PickerState,
}

impl<'a> PickerWidget<'a> {
    pub fn new(state: &'a PickerState) -> Self {
        Self { state }
    }

    pub fn render(self, frame: &mut Frame) {
        let items: Vec<ListItem> = self
            .state
            .options
            .iter()
            .enumerate()
            .map(|(i, option)| {
                let style = if i == self.state.selected {
                    STYLE_HIGHLIGHT
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(Line::from(Span::styled(format!("  {}  ", option.label), style)))
            })
            .collect();

        render_list_popup(
            frame,
            &self.state.title,
            items,
            self.state.selected,
            key_hints(&[("j/k", "Navigate"), ("Enter", "Select"), ("Esc", "Cancel")]),
        );
    }
}

/// Checkbox list; nothing checked is a valid answer.
pub struct MultiPickerWidget<'a> {
    state: &'a MultiPickerState,
}

impl<'a> MultiPickerWidget<'a> {
    pub fn new(state: &'a MultiPickerState) -> Self {
        Self { state }
    }

    pub fn render(self, frame: &mut Frame) {
        let items: Vec<ListItem> = self
            .state
            .options
            .iter()
            .zip(&self.state.checked)
            .enumerate()
            .map(|(i, (option, checked))| {
                let checkbox = if *checked { "[x]" } else { "[ ]" };
                let style = if i == self.state.selected {
                    STYLE_HIGHLIGHT
                } else if *checked {
                    Style::default().fg(Color::Green)
                } else {
                    Style::default().fg(Color::White)
                };
                ListItem::new(format!("  {}  {}", checkbox, option.label)).style(style)
            })
            .collect();

        render_list_popup(
            frame,
            &self.state.title,
            items,
            self.state.selected,
            key_hints(&[("Space", "Toggle"), ("Enter", "Save"), ("Esc", "Cancel")]),
        );
    }
}

fn render_list_popup(
    frame: &mut Frame,
    title: &str,
    items: Vec<ListItem>,
    selected: usize,
    footer: Line<'static>,
) {
    let area = centered_rect(50, 60, frame.area());
    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    if items.is_empty() {
        let empty = Paragraph::new("Nothing to choose from")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, inner);
        return;
    }

    let [list_area, footer_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(2)])
        .areas(inner);

    // Stateful render keeps the highlighted option scrolled into view.
    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(List::new(items), list_area, &mut list_state);
    frame.render_widget(Paragraph::new(footer).alignment(Alignment::Center), footer_area);
}
