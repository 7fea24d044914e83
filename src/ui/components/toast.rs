use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{Toast, ToastLevel};
use crate::ui::helpers::{bottom_rect, wrap_text};

/// Long messages wrap up to this many lines.
const MAX_LINES: usize = 3;
const MIN_WIDTH: u16 = 24;
/// Keeps the toast clear of the status bar.
const BOTTOM_GAP: u16 = 2;

pub struct ToastWidget<'a> {
    toast: &'a Toast,
}

impl<'a> ToastWidget<'a> {
    pub fn new(toast: &'a Toast) -> Self {
        Self { toast }
    }

    fn look(&self) -> (Color, &'static str, &'static str) {
        match self.toast.level {
            ToastLevel::Success => (Color::Green, "✓", " Done "),
            ToastLevel::Info => (Color::Cyan, "ℹ", " Info "),
            ToastLevel::Warning => (Color::Yellow, "⚠", " Warning "),
            ToastLevel::Error => (Color::Red, "✗", " Error "),
        }
    }

    pub fn render(self, frame: &mut Frame) {
        let screen = frame.area();
        let (color, icon, title) = self.look();

        // Border plus the icon column.
        let max_text = screen.width.saturating_sub(10).max(1) as usize;
        let lines = wrap_text(&self.toast.message, max_text, MAX_LINES);
        let text_width = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0);

        let width = (text_width as u16 + 6).max(MIN_WIDTH);
        let height = lines.len().max(1) as u16 + 2;
        let area = bottom_rect(screen, width, height, BOTTOM_GAP);

        let text_style = Style::default().fg(color);
        let content: Vec<Line> = lines
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let lead = if i == 0 {
                    Span::styled(format!(" {} ", icon), text_style.add_modifier(Modifier::BOLD))
                } else {
                    Span::raw("   ")
                };
                Line::from(vec![lead, Span::styled(line, text_style)])
            })
            .collect();

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(text_style)
            .title(Span::styled(title, text_style.add_modifier(Modifier::BOLD)));

        frame.render_widget(Clear, area);
        frame.render_widget(Paragraph::new(content).block(block), area);
    }
}
