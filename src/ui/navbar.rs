//! Top navigation bar with grouped sections.
//!
//! The eight sections are arranged into three groups. Tab cycles sections
//! flat, `m` drops a group menu down under the bar for direct jumps.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::types::EntityKind;

/// Menu group in the navigation bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SectionGroup {
    Inventory,
    Operations,
    Directory,
}

impl SectionGroup {
    pub fn all() -> &'static [SectionGroup] {
        &[
            SectionGroup::Inventory,
            SectionGroup::Operations,
            SectionGroup::Directory,
        ]
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            SectionGroup::Inventory => "Inventory",
            SectionGroup::Operations => "Operations",
            SectionGroup::Directory => "Directory",
        }
    }

    pub fn members(&self) -> &'static [EntityKind] {
        match self {
            SectionGroup::Inventory => &[
                EntityKind::Assets,
                EntityKind::Products,
                EntityKind::Components,
            ],
            SectionGroup::Operations => &[EntityKind::Audits, EntityKind::Repairs],
            SectionGroup::Directory => &[
                EntityKind::Suppliers,
                EntityKind::Categories,
                EntityKind::Users,
            ],
        }
    }

    /// The group a section belongs to.
    pub fn containing(kind: EntityKind) -> SectionGroup {
        for group in SectionGroup::all() {
            if group.members().contains(&kind) {
                return *group;
            }
        }
        SectionGroup::Inventory
    }

    fn next(self) -> Self {
        match self {
            SectionGroup::Inventory => SectionGroup::Operations,
            SectionGroup::Operations => SectionGroup::Directory,
            SectionGroup::Directory => SectionGroup::Inventory,
        }
    }

    fn prev(self) -> Self {
        match self {
            SectionGroup::Inventory => SectionGroup::Directory,
            SectionGroup::Operations => SectionGroup::Inventory,
            SectionGroup::Directory => SectionGroup::Operations,
        }
    }
}

struct MenuState {
    group: SectionGroup,
    highlight: usize,
    list_state: ListState,
}

/// Navigation bar state: the active section plus an optional open menu.
pub struct NavBar {
    active: EntityKind,
    menu: Option<MenuState>,
}

impl NavBar {
    pub fn new(active: EntityKind) -> Self {
        Self { active, menu: None }
    }

    pub fn active(&self) -> EntityKind {
        self.active
    }

    /// Jump directly to a section, closing any open menu.
    pub fn set_active(&mut self, kind: EntityKind) {
        self.active = kind;
        self.menu = None;
    }

    pub fn next_section(&mut self) -> EntityKind {
        let all = EntityKind::all();
        let pos = all.iter().position(|k| *k == self.active).unwrap_or(0);
        self.active = all[(pos + 1) % all.len()];
        self.active
    }

    pub fn prev_section(&mut self) -> EntityKind {
        let all = EntityKind::all();
        let pos = all.iter().position(|k| *k == self.active).unwrap_or(0);
        self.active = all[(pos + all.len() - 1) % all.len()];
        self.active
    }

    pub fn is_menu_open(&self) -> bool {
        self.menu.is_some()
    }

    /// Open the menu on the group holding the active section, with the
    /// active section highlighted.
    pub fn open_menu(&mut self) {
        let group = SectionGroup::containing(self.active);
        let highlight = group
            .members()
            .iter()
            .position(|k| *k == self.active)
            .unwrap_or(0);
        let mut list_state = ListState::default();
        list_state.select(Some(highlight));
        self.menu = Some(MenuState {
            group,
            highlight,
            list_state,
        });
    }

    pub fn close_menu(&mut self) {
        self.menu = None;
    }

    pub fn menu_next_group(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            menu.group = menu.group.next();
            menu.highlight = 0;
            menu.list_state.select(Some(0));
        }
    }

    pub fn menu_prev_group(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            menu.group = menu.group.prev();
            menu.highlight = 0;
            menu.list_state.select(Some(0));
        }
    }

    pub fn menu_next_item(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            let len = menu.group.members().len();
            menu.highlight = (menu.highlight + 1) % len;
            menu.list_state.select(Some(menu.highlight));
        }
    }

    pub fn menu_prev_item(&mut self) {
        if let Some(menu) = self.menu.as_mut() {
            let len = menu.group.members().len();
            menu.highlight = (menu.highlight + len - 1) % len;
            menu.list_state.select(Some(menu.highlight));
        }
    }

    /// Confirm the highlighted entry. Returns the newly active section.
    pub fn menu_select(&mut self) -> Option<EntityKind> {
        let menu = self.menu.take()?;
        let kind = *menu.group.members().get(menu.highlight)?;
        self.active = kind;
        Some(kind)
    }

    /// Column where a group label starts in the bar.
    fn group_offset(index: usize) -> u16 {
        let mut x = 1u16;
        for group in SectionGroup::all().iter().take(index) {
            x += group.display_name().len() as u16 + 4;
        }
        x
    }

    pub fn render(&self, frame: &mut Frame, area: Rect) {
        let open_group = self.menu.as_ref().map(|m| m.group);
        let active_group = SectionGroup::containing(self.active);

        let mut spans = vec![Span::raw(" ")];
        for group in SectionGroup::all() {
            let label = group.display_name();
            let style = if Some(*group) == open_group {
                Style::default()
                    .fg(Color::Black)
                    .bg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else if *group == active_group {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };
            spans.push(Span::styled(format!(" {label} "), style));
            spans.push(Span::raw("  "));
        }

        spans.push(Span::styled("· ", Style::default().fg(Color::DarkGray)));
        spans.push(Span::styled(
            self.active.display_name(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ));

        frame.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    /// Draw the open group menu over whatever sits below the bar. Called
    /// after the main layout so the dropdown is not painted over.
    pub fn render_dropdown(&mut self, frame: &mut Frame, bar_area: Rect) {
        let active = self.active;
        let Some(menu) = self.menu.as_mut() else {
            return;
        };

        let group_index = SectionGroup::all()
            .iter()
            .position(|g| *g == menu.group)
            .unwrap_or(0);
        let members = menu.group.members();

        let width = 20u16.min(frame.area().width);
        let height = (members.len() as u16 + 2).min(frame.area().height.saturating_sub(1));
        let dropdown = Rect {
            x: Self::group_offset(group_index).min(frame.area().width.saturating_sub(width)),
            y: bar_area.y + 1,
            width,
            height,
        };

        frame.render_widget(Clear, dropdown);

        let items: Vec<ListItem> = members
            .iter()
            .map(|kind| {
                let marker = if *kind == active { "● " } else { "  " };
                ListItem::new(Line::from(vec![
                    Span::styled(marker, Style::default().fg(Color::Cyan)),
                    Span::raw(kind.display_name()),
                ]))
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title(format!(" {} ", menu.group.display_name()))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, dropdown, &mut menu.list_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_groups_cover_every_section_once() {
        let mut seen = Vec::new();
        for group in SectionGroup::all() {
            for kind in group.members() {
                assert!(!seen.contains(kind), "{kind:?} listed twice");
                seen.push(*kind);
            }
        }
        assert_eq!(seen.len(), EntityKind::all().len());
    }

    #[test]
    fn test_containing_finds_the_right_group() {
        assert_eq!(
            SectionGroup::containing(EntityKind::Components),
            SectionGroup::Inventory
        );
        assert_eq!(
            SectionGroup::containing(EntityKind::Repairs),
            SectionGroup::Operations
        );
        assert_eq!(
            SectionGroup::containing(EntityKind::Users),
            SectionGroup::Directory
        );
    }

    #[test]
    fn test_flat_cycle_wraps() {
        let mut navbar = NavBar::new(EntityKind::Users);
        assert_eq!(navbar.next_section(), EntityKind::Assets);
        assert_eq!(navbar.prev_section(), EntityKind::Users);
    }

    #[test]
    fn test_menu_opens_on_active_section() {
        let mut navbar = NavBar::new(EntityKind::Products);
        navbar.open_menu();
        assert!(navbar.is_menu_open());

        // Highlight starts on Products, one step down reaches Components.
        navbar.menu_next_item();
        assert_eq!(navbar.menu_select(), Some(EntityKind::Components));
        assert!(!navbar.is_menu_open());
        assert_eq!(navbar.active(), EntityKind::Components);
    }

    #[test]
    fn test_menu_group_switch_resets_highlight() {
        let mut navbar = NavBar::new(EntityKind::Components);
        navbar.open_menu();
        navbar.menu_next_group();
        assert_eq!(navbar.menu_select(), Some(EntityKind::Audits));
    }

    #[test]
    fn test_menu_item_wraps_within_group() {
        let mut navbar = NavBar::new(EntityKind::Audits);
        navbar.open_menu();
        navbar.menu_prev_item();
        assert_eq!(navbar.menu_select(), Some(EntityKind::Repairs));
    }
}
