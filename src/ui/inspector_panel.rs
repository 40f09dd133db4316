use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::inspector::{HistoryEntry, InspectionView, RenderModel, StageDetail, StepMark};

/// Panel drawing the flow inspector render model.
///
/// Purely presentational: it consumes the projection and never touches
/// the view state itself.
pub struct InspectorPanel {
    pub title: String,
    pub history_state: ListState,
}

impl InspectorPanel {
    pub fn new(title: String) -> Self {
        Self {
            title,
            history_state: ListState::default(),
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, model: &RenderModel) {
        match model {
            RenderModel::Loading => self.render_loading(frame, area),
            RenderModel::Denied { status_text } => self.render_denied(frame, area, status_text),
            RenderModel::Populated(view) => self.render_populated(frame, area, view),
        }
    }

    fn outer_block(&self) -> Block<'_> {
        Block::default()
            .title(self.title.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray))
    }

    fn render_loading(&self, frame: &mut Frame, area: Rect) {
        let body = Paragraph::new(Line::from(Span::styled(
            "Loading",
            Style::default().fg(Color::DarkGray),
        )))
        .block(self.outer_block());
        frame.render_widget(body, area);
    }

    fn render_denied(&self, frame: &mut Frame, area: Rect, status_text: &str) {
        let body = Paragraph::new(vec![
            Line::from(Span::styled(
                "Access denied",
                Style::default()
                    .fg(Color::Red)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::raw(""),
            Line::from(Span::styled(
                status_text.to_string(),
                Style::default().fg(Color::Red),
            )),
        ])
        .wrap(Wrap { trim: false })
        .block(self.outer_block());
        frame.render_widget(body, area);
    }

    fn render_populated(&mut self, frame: &mut Frame, area: Rect, view: &InspectionView) {
        let inner = self.outer_block().inner(area);
        frame.render_widget(self.outer_block(), area);

        let history_height = (view.history.len() as u16).saturating_add(2).min(10);
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(8),                  // Next stage
                Constraint::Length(history_height),  // Plan history
                Constraint::Min(4),                  // Plan context
                Constraint::Length(4),               // Session ID
            ])
            .split(inner);

        self.render_next_stage(frame, chunks[0], view);
        self.render_history(frame, chunks[1], &view.history);
        self.render_context(frame, chunks[2], view);
        self.render_session_id(frame, chunks[3], view);
    }

    fn render_next_stage(&self, frame: &mut Frame, area: Rect, view: &InspectionView) {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Stage name: ", Style::default().fg(Color::Gray)),
                Span::styled(
                    view.next_stage.name.clone(),
                    Style::default().add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::from(vec![
                Span::styled("Stage kind: ", Style::default().fg(Color::Gray)),
                Span::raw(view.next_stage.verbose_name.clone()),
            ]),
            Line::raw(""),
        ];

        match &view.next_stage.detail {
            StageDetail::FlowCompleted => lines.push(Line::from(Span::styled(
                "This flow is completed.",
                Style::default().fg(Color::Green),
            ))),
            StageDetail::Object(body) => {
                for raw in body.lines() {
                    lines.push(Line::from(Span::styled(
                        raw.to_string(),
                        Style::default().fg(Color::DarkGray),
                    )));
                }
            }
        }

        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Next stage").borders(Borders::ALL));
        frame.render_widget(widget, area);
    }

    fn render_history(&mut self, frame: &mut Frame, area: Rect, history: &[HistoryEntry]) {
        let items: Vec<ListItem> = history.iter().map(Self::history_item).collect();

        let list = List::new(items)
            .block(Block::default().title("Plan history").borders(Borders::ALL))
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED));
        frame.render_stateful_widget(list, area, &mut self.history_state);
    }

    fn history_item(entry: &HistoryEntry) -> ListItem<'static> {
        let (glyph, color) = match entry.mark {
            StepMark::Completed => ("✓", Color::Green),
            StepMark::Current => ("▶", Color::Cyan),
            StepMark::Pending => ("○", Color::DarkGray),
        };

        ListItem::new(Line::from(vec![
            Span::styled(format!("{} ", glyph), Style::default().fg(color)),
            Span::styled(
                entry.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::raw(" "),
            Span::styled(
                entry.verbose_name.clone(),
                Style::default().fg(Color::Gray),
            ),
        ]))
    }

    fn render_context(&self, frame: &mut Frame, area: Rect, view: &InspectionView) {
        let lines: Vec<Line> = view
            .plan_context
            .lines()
            .map(|l| Line::raw(l.to_string()))
            .collect();
        let widget = Paragraph::new(lines)
            .wrap(Wrap { trim: false })
            .block(Block::default().title("Plan context").borders(Borders::ALL));
        frame.render_widget(widget, area);
    }

    fn render_session_id(&self, frame: &mut Frame, area: Rect, view: &InspectionView) {
        // Session tokens can be arbitrarily long; wrapping keeps the layout intact
        let widget = Paragraph::new(Line::from(Span::styled(
            view.session_id.clone(),
            Style::default().fg(Color::Yellow),
        )))
        .wrap(Wrap { trim: false })
        .block(Block::default().title("Session ID").borders(Borders::ALL));
        frame.render_widget(widget, area);
    }
}
