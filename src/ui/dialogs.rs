//! Modal dialogs: delete confirmation and the help overlay.

use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::types::EntityKind;
use crate::ui::keybindings::{shortcuts_for, ShortcutContext};

/// Record a confirm dialog is about to delete.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PendingDelete {
    pub kind: EntityKind,
    pub id: i64,
    pub name: String,
}

/// Which button is highlighted in the confirm dialog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConfirmSelection {
    Yes,
    #[default]
    No,
}

impl ConfirmSelection {
    pub fn toggle(self) -> Self {
        match self {
            ConfirmSelection::Yes => ConfirmSelection::No,
            ConfirmSelection::No => ConfirmSelection::Yes,
        }
    }
}

/// Yes/No modal gating record deletion.
#[derive(Default)]
pub struct ConfirmDialog {
    pub visible: bool,
    pending: Option<PendingDelete>,
    pub selection: ConfirmSelection,
}

impl ConfirmDialog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Open the dialog for `pending`. Deletion defaults to No.
    pub fn show(&mut self, pending: PendingDelete) {
        self.pending = Some(pending);
        self.selection = ConfirmSelection::No;
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
        self.pending = None;
    }

    pub fn toggle_selection(&mut self) {
        self.selection = self.selection.toggle();
    }

    /// Resolve the dialog. Returns the pending delete only when Yes is
    /// selected; the dialog closes either way.
    pub fn confirm(&mut self) -> Option<PendingDelete> {
        let confirmed = self.selection == ConfirmSelection::Yes;
        let pending = self.pending.take();
        self.visible = false;
        if confirmed {
            pending
        } else {
            None
        }
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }
        let Some(ref pending) = self.pending else {
            return;
        };

        let area = centered_rect(50, 35, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Delete record? ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Red));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [record_area, note_area, buttons_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(2),
            Constraint::Length(1),
        ])
        .margin(1)
        .areas(inner);

        let record_line = Line::from(vec![
            Span::styled(
                format!("{}: ", pending.kind.singular()),
                Style::default().fg(Color::DarkGray),
            ),
            Span::styled(
                pending.name.clone(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
            Span::styled(
                format!("  (#{})", pending.id),
                Style::default().fg(Color::DarkGray),
            ),
        ]);
        frame.render_widget(Paragraph::new(record_line), record_area);

        let note = Paragraph::new("The record is removed from the server. This cannot be undone.")
            .style(Style::default().fg(Color::Gray))
            .wrap(Wrap { trim: true });
        frame.render_widget(note, note_area);

        let button = |label: &'static str, active: bool| {
            let style = if active {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Red)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            Span::styled(label, style)
        };
        let buttons = Line::from(vec![
            button(" [Y]es ", self.selection == ConfirmSelection::Yes),
            Span::raw("   "),
            button(" [N]o ", self.selection == ConfirmSelection::No),
        ]);
        frame.render_widget(
            Paragraph::new(buttons).alignment(Alignment::Center),
            buttons_area,
        );
    }
}

/// Overlay listing every shortcut from the registry, grouped by context.
#[derive(Default)]
pub struct HelpDialog {
    pub visible: bool,
}

impl HelpDialog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn toggle(&mut self) {
        self.visible = !self.visible;
    }

    pub fn render(&self, frame: &mut Frame) {
        if !self.visible {
            return;
        }

        let area = centered_rect(60, 80, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(" Keyboard Shortcuts ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let paragraph = Paragraph::new(help_lines()).wrap(Wrap { trim: false });
        frame.render_widget(paragraph, inner);
    }
}

/// Help text from the shortcut registry. Browse keys come first without a
/// heading; the other contexts get an `In <context>:` heading.
fn help_lines() -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for context in ShortcutContext::ALL {
        if context != ShortcutContext::Browse {
            lines.push(Line::raw(""));
            lines.push(Line::from(Span::styled(
                format!("In {}:", context.title()),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )));
        }
        for shortcut in shortcuts_for(context) {
            lines.push(Line::from(vec![
                Span::styled(
                    format!("  {:<10}", shortcut.label()),
                    Style::default().fg(Color::Yellow),
                ),
                Span::raw(shortcut.action),
            ]));
        }
    }
    lines.push(Line::raw(""));
    lines.push(Line::from(Span::styled(
        "Press any key to close",
        Style::default().fg(Color::DarkGray),
    )));
    lines
}

/// A rect of the given percentage size, centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let [mid] = Layout::vertical([Constraint::Percentage(percent_y)])
        .flex(Flex::Center)
        .areas(area);
    let [mid] = Layout::horizontal([Constraint::Percentage(percent_x)])
        .flex(Flex::Center)
        .areas(mid);
    mid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pending() -> PendingDelete {
        PendingDelete {
            kind: EntityKind::Categories,
            id: 9,
            name: "Peripherals".to_string(),
        }
    }

    #[test]
    fn test_delete_defaults_to_no() {
        let mut dialog = ConfirmDialog::new();
        dialog.show(pending());

        assert!(dialog.visible);
        assert_eq!(dialog.selection, ConfirmSelection::No);

        // Confirming with No selected resolves to nothing.
        assert_eq!(dialog.confirm(), None);
        assert!(!dialog.visible);
    }

    #[test]
    fn test_toggle_then_confirm_returns_pending() {
        let mut dialog = ConfirmDialog::new();
        dialog.show(pending());
        dialog.toggle_selection();

        let resolved = dialog.confirm().unwrap();
        assert_eq!(resolved.id, 9);
        assert_eq!(resolved.name, "Peripherals");
        assert!(!dialog.visible);
    }

    #[test]
    fn test_hide_discards_pending() {
        let mut dialog = ConfirmDialog::new();
        dialog.show(pending());
        dialog.hide();

        assert!(!dialog.visible);
        dialog.selection = ConfirmSelection::Yes;
        assert_eq!(dialog.confirm(), None);
    }

    #[test]
    fn test_help_toggles() {
        let mut dialog = HelpDialog::new();
        assert!(!dialog.visible);
        dialog.toggle();
        assert!(dialog.visible);
        dialog.toggle();
        assert!(!dialog.visible);
    }

    #[test]
    fn test_help_lines_cover_every_context() {
        let text: Vec<String> = help_lines()
            .iter()
            .map(|line| {
                line.spans
                    .iter()
                    .map(|span| span.content.as_ref())
                    .collect::<String>()
            })
            .collect();
        let joined = text.join("\n");

        assert!(joined.contains("Quit"));
        assert!(joined.contains("In Section menu:"));
        assert!(joined.contains("In Form:"));
        assert!(joined.contains("In Confirm dialog:"));
    }
}
