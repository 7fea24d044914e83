use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{LoadingState, Section};
use crate::ui::helpers::SPINNER_FRAMES;

pub struct StatusBarWidget {
    section: Section,
    loading: LoadingState,
    publishing: bool,
    animation_frame: usize,
}

impl StatusBarWidget {
    pub fn new(section: Section, loading: LoadingState, publishing: bool) -> Self {
        Self {
            section,
            loading,
            publishing,
            animation_frame: 0,
        }
    }

    pub fn with_animation_frame(mut self, frame: usize) -> Self {
        self.animation_frame = frame;
        self
    }

    fn busy_message(&self) -> Option<String> {
        if self.publishing {
            return Some("Publishing...".to_string());
        }
        let pending: Vec<&str> = [
            (self.loading.actors, "actors"),
            (self.loading.entities, "entities"),
            (self.loading.step, "saved step"),
        ]
        .iter()
        .filter(|(loading, _)| *loading)
        .map(|(_, name)| *name)
        .collect();
        if pending.is_empty() {
            None
        } else {
            Some(format!("Loading {}...", pending.join(", ")))
        }
    }

    pub fn render(self, frame: &mut Frame, area: Rect) {
        let mut shortcuts = vec![("Tab", "switch"), ("Enter", "edit"), ("a", "add"), ("d", "delete")];
        if self.section == Section::Tasks {
            shortcuts.extend([("c", "columns"), ("t", "type"), ("x", "cell")]);
        }
        shortcuts.extend([("p", "publish"), ("?", "help"), ("q", "quit")]);

        let mut spans: Vec<Span> = Vec::new();

        if let Some(message) = self.busy_message() {
            let spinner = SPINNER_FRAMES[self.animation_frame % SPINNER_FRAMES.len()];
            spans.push(Span::styled(
                format!("{} {}  ", spinner, message),
                Style::default().fg(Color::Yellow),
            ));
        }

        for (i, (key, action)) in shortcuts.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(
                format!("[{}]", key),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ));
            spans.push(Span::styled(
                action.to_string(),
                Style::default().fg(Color::White),
            ));
        }

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_busy_message() {
        let idle = StatusBarWidget::new(Section::Actors, LoadingState::default(), false);
        assert_eq!(idle.busy_message(), None);

        let loading = LoadingState {
            actors: true,
            entities: false,
            step: true,
        };
        let bar = StatusBarWidget::new(Section::Tasks, loading, false);
        assert_eq!(bar.busy_message().as_deref(), Some("Loading actors, saved step..."));

        let publishing = StatusBarWidget::new(Section::Tasks, loading, true);
        assert_eq!(publishing.busy_message().as_deref(), Some("Publishing..."));
    }
}
