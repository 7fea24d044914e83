use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
};

pub const STYLE_LABEL: Style = Style::new().fg(Color::White);
pub const STYLE_LABEL_SELECTED: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const STYLE_VALUE: Style = Style::new().fg(Color::Gray);
pub const STYLE_VALUE_SELECTED: Style = Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD);
pub const STYLE_TOGGLE: Style = Style::new().fg(Color::Green);
pub const STYLE_TOGGLE_SELECTED: Style = Style::new().fg(Color::Green).add_modifier(Modifier::BOLD);
pub const STYLE_SEPARATOR: Style = Style::new().fg(Color::DarkGray);
pub const STYLE_INDENT: Style = Style::new();
pub const STYLE_CURSOR: Style = Style::new().fg(Color::White);
pub const STYLE_FOOTER: Style = Style::new().fg(Color::DarkGray);
pub const STYLE_KEY: Style = Style::new().fg(Color::Yellow).add_modifier(Modifier::BOLD);
pub const STYLE_HIGHLIGHT: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Cyan)
    .add_modifier(Modifier::BOLD);
pub const STYLE_SELECTED_ROW: Style = Style::new().bg(Color::Rgb(40, 44, 52));

/// Braille spinner frames
pub const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

#[derive(Debug, Clone, Copy, Default)]
pub enum CursorType {
    #[default]
    None,
    Arrow,
    Dropdown,
    Edit,
}

#[derive(Debug, Clone)]
pub struct FieldLineOptions {
    pub label_width: usize,
    pub value_width: Option<usize>,
    pub cursor: CursorType,
    pub is_toggle: bool,
}

impl Default for FieldLineOptions {
    fn default() -> Self {
        Self {
            label_width: 12,
            value_width: None,
            cursor: CursorType::None,
            is_toggle: false,
        }
    }
}

impl FieldLineOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn label_width(mut self, width: usize) -> Self {
        self.label_width = width;
        self
    }

    pub fn value_width(mut self, width: usize) -> Self {
        self.value_width = Some(width);
        self
    }

    pub fn cursor(mut self, cursor: CursorType) -> Self {
        self.cursor = cursor;
        self
    }

    pub fn is_toggle(mut self, is_toggle: bool) -> Self {
        self.is_toggle = is_toggle;
        self
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Shorten to `max_len` characters, ending in an ellipsis when cut.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(1)).collect();
        format!("{}…", truncated)
    }
}

/// Word-wrap into at most `max_lines` lines of `width` characters. Words
/// longer than a line are split, and overflow ends the last line in "…".
pub fn wrap_text(s: &str, width: usize, max_lines: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();

    for word in s.split_whitespace() {
        let mut word: Vec<char> = word.chars().collect();
        while !word.is_empty() {
            let used = current.chars().count();
            let gap = usize::from(used > 0);
            if used + gap + word.len() <= width {
                if gap == 1 {
                    current.push(' ');
                }
                current.extend(word.drain(..));
            } else if used > 0 {
                lines.push(std::mem::take(&mut current));
            } else {
                lines.push(word.drain(..width).collect());
            }
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines && max_lines > 0 {
        lines.truncate(max_lines);
        let last = &mut lines[max_lines - 1];
        *last = truncate(&format!("{} …", last), width);
    }
    lines
}

/// Box of `width` x `height` centered horizontally, `bottom` rows above the
/// lower edge of `area`. Clamped to fit.
pub fn bottom_rect(area: Rect, width: u16, height: u16, bottom: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    let x = area.x + (area.width - width) / 2;
    let y = area.y + area.height.saturating_sub(height + bottom);
    Rect::new(x, y, width, height)
}

/// `Key Label  Key Label` footer line.
pub fn key_hints(hints: &[(&str, &str)]) -> Line<'static> {
    let mut spans = Vec::with_capacity(hints.len() * 2);
    for (key, label) in hints {
        spans.push(Span::styled(key.to_string(), STYLE_KEY));
        spans.push(Span::styled(format!(" {}  ", label), STYLE_FOOTER));
    }
    Line::from(spans)
}

pub fn render_field_line(
    label: &str,
    value: &str,
    is_selected: bool,
    options: FieldLineOptions,
) -> Line<'static> {
    let label_style = if is_selected {
        STYLE_LABEL_SELECTED
    } else {
        STYLE_LABEL
    };

    let value_style = if options.is_toggle {
        if is_selected {
            STYLE_TOGGLE_SELECTED
        } else {
            STYLE_TOGGLE
        }
    } else if is_selected {
        STYLE_VALUE_SELECTED
    } else {
        STYLE_VALUE
    };

    let cursor = match options.cursor {
        CursorType::None => "",
        CursorType::Arrow => " ◀",
        CursorType::Dropdown => " ▼",
        CursorType::Edit => "█",
    };

    let display_cursor = if is_selected { cursor } else { "" };

    let display_value = match options.value_width {
        Some(width) => format!("{:width$}", truncate(value, width), width = width),
        None => value.to_string(),
    };

    Line::from(vec![
        Span::styled("    ", STYLE_INDENT),
        Span::styled(
            format!("{:width$}", label, width = options.label_width),
            label_style,
        ),
        Span::styled(": ", STYLE_SEPARATOR),
        Span::styled(display_value, value_style),
        Span::styled(display_cursor.to_string(), STYLE_CURSOR),
    ])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("Inspect", 10), "Inspect");
        assert_eq!(truncate("Inspection report", 8), "Inspect…");
        assert_eq!(truncate("Prüfprotokoll", 4), "Prü…");
    }

    #[test]
    fn test_wrap_text() {
        assert_eq!(wrap_text("Loaded 3 tasks", 20, 3), vec!["Loaded 3 tasks"]);
        assert_eq!(
            wrap_text("Workflow API error: 500 - upstream down", 16, 3),
            vec!["Workflow API", "error: 500 -", "upstream down"]
        );
        assert_eq!(wrap_text("abcdefghij", 4, 5), vec!["abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_text_marks_overflow() {
        let lines = wrap_text("one two three four five six", 9, 2);
        assert_eq!(lines.len(), 2);
        assert_eq!(lines[0], "one two");
        assert!(lines[1].ends_with('…'));
        assert!(lines[1].chars().count() <= 9);
    }

    #[test]
    fn test_bottom_rect() {
        let area = Rect::new(0, 0, 80, 24);
        assert_eq!(bottom_rect(area, 30, 3, 2), Rect::new(25, 19, 30, 3));
        assert_eq!(bottom_rect(area, 200, 40, 2), Rect::new(0, 0, 80, 24));
    }

    #[test]
    fn test_centered_rect_stays_inside() {
        let outer = Rect::new(0, 0, 100, 50);
        let inner = centered_rect(60, 40, outer);
        assert_eq!(inner.width, 60);
        assert_eq!(inner.height, 20);
        assert_eq!(inner.x, 20);
        assert_eq!(inner.y, 15);
    }

    #[test]
    fn test_field_line_pads_value() {
        let line = render_field_line(
            "Type",
            "Multi Select",
            true,
            FieldLineOptions::new().value_width(6).cursor(CursorType::Dropdown),
        );
        assert_eq!(line.spans[3].content, "Multi…");
        assert_eq!(line.spans[4].content, " ▼");
    }
}
