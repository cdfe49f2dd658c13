//! Console state and rendering.
//!
//! The console shows the banner and the live connection flag read from
//! [`SessionState`]; every diagnostic beyond connected yes/no belongs
//! in the log file.

use std::sync::Arc;

use ptz_core::SessionState;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Paragraph},
};

use crate::theme::Theme;

/// Events forwarded from the input task to the UI loop.
#[derive(Debug, Clone)]
pub enum UiEvent {
    Key(crossterm::event::KeyEvent),
    Resize(u16, u16),
}

/// The console application.
pub struct App {
    session: Arc<SessionState>,
    theme: Theme,
}

impl App {
    pub fn new(session: Arc<SessionState>, theme: Theme) -> Self {
        Self { session, theme }
    }

    pub fn draw(&self, frame: &mut Frame) {
        let area = frame.area();
        frame.render_widget(
            Block::default().style(Style::default().bg(self.theme.background)),
            area,
        );

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(1),
                Constraint::Length(1),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        let header = Paragraph::new("## Pautzke Bait Co., Inc. - Client")
            .style(Style::default().fg(self.theme.menu_header).bg(self.theme.background));
        frame.render_widget(header, rows[0]);

        let connected = self.session.is_connected();
        let status_color = if connected {
            self.theme.success
        } else {
            self.theme.warning
        };
        let status = Paragraph::new(format!(
            "# Connected: {connected} ({})",
            self.session.endpoint()
        ))
        .style(Style::default().fg(status_color).bg(self.theme.background));
        frame.render_widget(status, rows[1]);

        let footer = Paragraph::new(Line::from(vec![
            Span::styled("q", Style::default().fg(self.theme.action_key)),
            Span::styled(" quit", Style::default().fg(self.theme.std_text)),
        ]))
        .style(Style::default().bg(self.theme.background));
        frame.render_widget(footer, rows[3]);
    }
}
