use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::{AppState, Dialog, LogLevel, Section};

use super::components::{
    render_confirm_modal, render_input_modal, ActorTableWidget, ColumnDialog, CustomCellDialog,
    FieldTypeDialog, HelpOverlay, MultiPickerWidget, PickerWidget, StatusBarWidget,
    TaskTableWidget, ToastWidget,
};

const BANNER: &[&str] = &[
    "",
    "  ██████╗██╗  ██╗███████╗ ██████╗██╗  ██╗██╗    ██╗██████╗ ██╗ ██████╗ ██╗  ██╗████████╗",
    " ██╔════╝██║  ██║██╔════╝██╔════╝██║ ██╔╝██║    ██║██╔══██╗██║██╔════╝ ██║  ██║╚══██╔══╝",
    " ██║     ███████║█████╗  ██║     █████╔╝ ██║ █╗ ██║██████╔╝██║██║  ███╗███████║   ██║",
    " ██║     ██╔══██║██╔══╝  ██║     ██╔═██╗ ██║███╗██║██╔══██╗██║██║   ██║██╔══██║   ██║",
    " ╚██████╗██║  ██║███████╗╚██████╗██║  ██╗╚███╔███╔╝██║  ██║██║╚██████╔╝██║  ██║   ██║",
    "  ╚═════╝╚═╝  ╚═╝╚══════╝ ╚═════╝╚═╝  ╚═╝ ╚══╝╚══╝ ╚═╝  ╚═╝╚═╝ ╚═════╝ ╚═╝  ╚═╝   ╚═╝",
    "",
];

pub struct AppWidget<'a> {
    state: &'a AppState,
}

impl<'a> AppWidget<'a> {
    pub fn new(state: &'a AppState) -> Self {
        Self { state }
    }

    pub fn render(self, frame: &mut Frame) {
        let size = frame.area();

        let show_banner = self.state.config.ui.show_banner;
        let show_logs = self.state.show_logs;

        let actor_rows = self.state.model.actors.len().max(1);
        let actor_table_height = (actor_rows + 3).min(size.height as usize / 3) as u16;

        let mut constraints: Vec<Constraint> = Vec::new();
        if show_banner {
            constraints.push(Constraint::Length(BANNER.len() as u16));
        }
        constraints.push(Constraint::Length(1));
        constraints.push(Constraint::Length(actor_table_height.max(4)));
        constraints.push(Constraint::Min(6));
        if show_logs {
            constraints.push(Constraint::Length(6));
        }
        constraints.push(Constraint::Length(1));

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints(constraints)
            .split(size);

        let mut chunk_idx = 0;

        if show_banner {
            self.render_banner(frame, chunks[chunk_idx]);
            chunk_idx += 1;
        }

        self.render_header(frame, chunks[chunk_idx]);
        chunk_idx += 1;

        ActorTableWidget::new(
            &self.state.model.actors,
            self.state.actor_cursor,
            self.state.section == Section::Actors,
        )
        .render(frame, chunks[chunk_idx]);
        chunk_idx += 1;

        let columns = self.state.task_columns();
        TaskTableWidget::new(
            &self.state.model,
            &columns,
            self.state.task_cursor,
            self.state.section == Section::Tasks,
        )
        .render(frame, chunks[chunk_idx]);
        chunk_idx += 1;

        if show_logs {
            self.render_logs(frame, chunks[chunk_idx]);
            chunk_idx += 1;
        }

        StatusBarWidget::new(self.state.section, self.state.loading, self.state.publishing)
            .with_animation_frame(self.state.animation_frame)
            .render(frame, chunks[chunk_idx]);

        if let Some(dialog) = &self.state.dialog {
            self.render_dialog(frame, dialog);
        }

        if self.state.show_help {
            HelpOverlay::new(&self.state.kind.checklist_name()).render(frame, size);
        }

        if let Some(toast) = &self.state.toast {
            ToastWidget::new(toast).render(frame);
        }
    }

    fn render_dialog(&self, frame: &mut Frame, dialog: &Dialog) {
        match dialog {
            Dialog::Picker(picker) => PickerWidget::new(picker).render(frame),
            Dialog::MultiPicker(picker) => MultiPickerWidget::new(picker).render(frame),
            Dialog::TextInput(input) => {
                render_input_modal(frame, &input.title, &input.prompt, &input.buffer)
            }
            Dialog::Columns(state) => ColumnDialog::new(&self.state.model.columns, state).render(frame),
            Dialog::FieldType(state) => FieldTypeDialog::new(state).render(frame),
            Dialog::CustomCell(state) => {
                let task = self.state.model.task(state.row).ok();
                CustomCellDialog::new(state, task).render(frame)
            }
            Dialog::ConfirmPublish => {
                let model = &self.state.model;
                let message = vec![
                    format!(
                        "Publish {} to workflow '{}'?",
                        self.state.kind.checklist_name(),
                        self.state.workflow_id
                    ),
                    format!(
                        "{} actor(s), {} task(s)",
                        model.emitted_actor_keys().len(),
                        model.tasks.len()
                    ),
                    "The saved step will be overwritten.".to_string(),
                ];
                render_confirm_modal(frame, "Publish", &message, "y", "Esc");
            }
        }
    }

    fn render_banner(&self, frame: &mut Frame, area: Rect) {
        let lines: Vec<Line> = BANNER
            .iter()
            .map(|&line| Line::from(Span::styled(line, Style::default().fg(Color::White))))
            .collect();

        let banner = Paragraph::new(lines).alignment(Alignment::Left);
        frame.render_widget(banner, area);
    }

    fn render_header(&self, frame: &mut Frame, area: Rect) {
        let taxonomy = if self.state.taxonomy.is_empty() {
            Span::styled("no entities", Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                format!("{} entity type(s)", self.state.taxonomy.types.len()),
                Style::default().fg(Color::Green),
            )
        };

        let line = Line::from(vec![
            Span::styled(
                format!(" {} ", self.state.kind.checklist_name()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled("│ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("workflow {} ", self.state.workflow_id),
                Style::default().fg(Color::White),
            ),
            Span::styled("│ ", Style::default().fg(Color::DarkGray)),
            Span::styled(
                format!("{} directory actor(s) ", self.state.directory.len()),
                Style::default().fg(Color::White),
            ),
            Span::styled("│ ", Style::default().fg(Color::DarkGray)),
            taxonomy,
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }

    fn render_logs(&self, frame: &mut Frame, area: Rect) {
        let visible_lines = (area.height.saturating_sub(2)) as usize;
        let skip = self.state.logs.len().saturating_sub(visible_lines);

        let lines: Vec<Line> = self
            .state
            .logs
            .iter()
            .skip(skip)
            .map(|entry| {
                let time = entry.timestamp.format("%H:%M:%S");
                let (level_str, level_color) = match entry.level {
                    LogLevel::Info => ("INFO", Color::Green),
                    LogLevel::Warn => ("WARN", Color::Yellow),
                    LogLevel::Error => ("ERR ", Color::Red),
                    LogLevel::Debug => ("DBG ", Color::DarkGray),
                };

                Line::from(vec![
                    Span::styled(format!("{} ", time), Style::default().fg(Color::DarkGray)),
                    Span::styled(
                        format!("[{}] ", level_str),
                        Style::default().fg(level_color),
                    ),
                    Span::raw(entry.message.clone()),
                ])
            })
            .collect();

        let paragraph = Paragraph::new(lines).block(
            Block::default()
                .title(" LOGS ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::DarkGray)),
        );

        frame.render_widget(paragraph, area);
    }
}
