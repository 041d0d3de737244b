//! Fixed chrome around the listing: header, overview sidebar, status bar.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::types::{EntityKind, EntitySummary};

/// Top line: application name, version and the connected server.
pub struct HeaderBar {
    server_label: String,
    authed: bool,
}

impl HeaderBar {
    pub fn new(server_label: String, authed: bool) -> Self {
        Self {
            server_label,
            authed,
        }
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let (token_glyph, token_style) = if self.authed {
            ("●", Style::default().fg(Color::Green))
        } else {
            ("○", Style::default().fg(Color::Red))
        };

        let line = Line::from(vec![
            Span::styled(
                " assetdesk ",
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("v{}", env!("CARGO_PKG_VERSION")),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(" │ ", Style::default().fg(Color::DarkGray)),
            Span::styled(self.server_label.clone(), Style::default().fg(Color::Gray)),
            Span::styled(" │ token ", Style::default().fg(Color::DarkGray)),
            Span::styled(token_glyph, token_style),
        ]);

        frame.render_widget(Paragraph::new(line), area);
    }
}

/// Sidebar with record counts per section, from the summary endpoint.
#[derive(Default)]
pub struct OverviewPanel {
    summaries: Vec<EntitySummary>,
    loaded: bool,
}

impl OverviewPanel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, summaries: Vec<EntitySummary>) {
        self.summaries = summaries;
        self.loaded = true;
    }

    pub fn total_for(&self, kind: EntityKind) -> Option<u64> {
        self.summaries
            .iter()
            .find(|s| s.kind == kind)
            .map(|s| s.total)
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, active: EntityKind) {
        let block = Block::default()
            .title(" Overview ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Gray));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        if !self.loaded {
            let msg = Paragraph::new(Line::from(Span::styled(
                "Loading...",
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(msg, inner);
            return;
        }

        let items: Vec<ListItem> = EntityKind::all()
            .iter()
            .map(|kind| {
                let total = self.total_for(*kind);
                let name_style = if *kind == active {
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let count = total.map(|t| t.to_string()).unwrap_or_else(|| "-".into());
                ListItem::new(Line::from(vec![
                    Span::styled(format!("{:<12}", kind.display_name()), name_style),
                    Span::styled(format!("{count:>6}"), Style::default().fg(Color::White)),
                ]))
            })
            .collect();

        frame.render_widget(List::new(items), inner);
    }
}

/// Colour class of the status message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Info,
    Error,
    Busy,
}

/// Bottom line: transient messages, falling back to key hints.
#[derive(Default)]
pub struct StatusBar {
    message: Option<(String, StatusTone)>,
}

impl StatusBar {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), StatusTone::Info));
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), StatusTone::Error));
    }

    pub fn busy(&mut self, message: impl Into<String>) {
        self.message = Some((message.into(), StatusTone::Busy));
    }

    pub fn clear(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_ref().map(|(m, _)| m.as_str())
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let line = match &self.message {
            Some((message, tone)) => {
                let style = match tone {
                    StatusTone::Info => Style::default().fg(Color::Green),
                    StatusTone::Error => Style::default().fg(Color::Red),
                    StatusTone::Busy => Style::default().fg(Color::Yellow),
                };
                Line::from(vec![
                    Span::raw(" "),
                    Span::styled(message.clone(), style),
                ])
            }
            None => {
                // Idle hints for the browse context.
                let hints = [
                    ("c", " create  "),
                    ("e", " edit  "),
                    ("d", " delete  "),
                    ("x", " duplicate  "),
                    ("/", " search  "),
                    ("m", " sections  "),
                    ("?", " help  "),
                    ("q", " quit"),
                ];
                let mut spans = vec![Span::raw(" ")];
                for (key, action) in hints {
                    spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
                    spans.push(Span::styled(action, Style::default().fg(Color::Gray)));
                }
                Line::from(spans)
            }
        };

        frame.render_widget(Paragraph::new(line), area);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overview_lookup() {
        let mut panel = OverviewPanel::new();
        assert_eq!(panel.total_for(EntityKind::Assets), None);

        panel.set(vec![
            EntitySummary {
                kind: EntityKind::Assets,
                total: 42,
            },
            EntitySummary {
                kind: EntityKind::Users,
                total: 7,
            },
        ]);

        assert_eq!(panel.total_for(EntityKind::Assets), Some(42));
        assert_eq!(panel.total_for(EntityKind::Users), Some(7));
        assert_eq!(panel.total_for(EntityKind::Repairs), None);
    }

    #[test]
    fn test_status_bar_message_lifecycle() {
        let mut bar = StatusBar::new();
        assert_eq!(bar.message(), None);

        bar.info("Product created");
        assert_eq!(bar.message(), Some("Product created"));

        bar.error("Connection refused");
        assert_eq!(bar.message(), Some("Connection refused"));

        bar.clear();
        assert_eq!(bar.message(), None);
    }
}
