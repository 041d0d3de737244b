//! The record listing: one server page of whichever kind is selected.
//!
//! Pagination is server-side. The listing only ever holds the fetched page
//! plus the total row count, so selection moves within the page and the app
//! fetches a neighbouring page when the cursor runs off either end.

use std::time::{Duration, Instant};

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
    Frame,
};

use crate::api::RecordPage;
use crate::types::{AssetStatus, AuditStatus, EntityKind, Records, RepairStatus};

pub struct Listing {
    records: Records,
    total: u64,
    /// Server page currently shown, 1-based.
    page: usize,
    page_size: usize,
    /// Selection within the fetched page.
    selected: usize,
    list_state: ListState,
    /// Active name filter, empty when browsing unfiltered.
    search: String,
    fetched_at: Option<Instant>,
}

impl Listing {
    pub fn new(kind: EntityKind, page_size: usize) -> Self {
        let mut list_state = ListState::default();
        list_state.select(Some(0));
        Self {
            records: Records::empty(kind),
            total: 0,
            page: 1,
            page_size,
            selected: 0,
            list_state,
            search: String::new(),
            fetched_at: None,
        }
    }

    pub fn kind(&self) -> EntityKind {
        self.records.kind()
    }

    /// Install a freshly fetched page. Re-fetching the page currently shown
    /// keeps the cursor where it was, clamped to the new row count; moving
    /// to a different page starts at the top.
    pub fn set_page(&mut self, page: RecordPage, page_number: usize) {
        let page_number = page_number.max(1);
        if page_number != self.page {
            self.selected = 0;
        }
        self.records = page.records;
        self.total = page.total;
        self.page = page_number;
        self.selected = self.selected.min(self.records.len().saturating_sub(1));
        self.list_state.select(Some(self.selected));
        self.fetched_at = Some(Instant::now());
    }

    /// Drop data when switching section; the kind shows as loading until
    /// the fetch lands.
    pub fn reset(&mut self, kind: EntityKind) {
        self.records = Records::empty(kind);
        self.total = 0;
        self.page = 1;
        self.selected = 0;
        self.list_state.select(Some(0));
        self.search.clear();
        self.fetched_at = None;
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, search: String) {
        self.search = search;
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn total(&self) -> u64 {
        self.total
    }

    pub fn current_page(&self) -> usize {
        self.page
    }

    pub fn total_pages(&self) -> usize {
        if self.total == 0 {
            1
        } else {
            (self.total as usize).div_ceil(self.page_size)
        }
    }

    pub fn next_page_number(&self) -> Option<usize> {
        (self.page < self.total_pages()).then(|| self.page + 1)
    }

    pub fn prev_page_number(&self) -> Option<usize> {
        (self.page > 1).then(|| self.page - 1)
    }

    pub fn at_last_row(&self) -> bool {
        self.records.is_empty() || self.selected + 1 >= self.records.len()
    }

    pub fn at_first_row(&self) -> bool {
        self.selected == 0
    }

    pub fn select_next(&mut self) {
        if self.records.is_empty() {
            return;
        }
        if self.selected + 1 < self.records.len() {
            self.selected += 1;
        } else {
            self.selected = 0;
        }
        self.list_state.select(Some(self.selected));
    }

    pub fn select_prev(&mut self) {
        if self.records.is_empty() {
            return;
        }
        if self.selected > 0 {
            self.selected -= 1;
        } else {
            self.selected = self.records.len() - 1;
        }
        self.list_state.select(Some(self.selected));
    }

    pub fn select_first(&mut self) {
        self.selected = 0;
        self.list_state.select(Some(0));
    }

    pub fn select_last(&mut self) {
        self.selected = self.records.len().saturating_sub(1);
        self.list_state.select(Some(self.selected));
    }

    pub fn selected_id(&self) -> Option<i64> {
        self.records.id_at(self.selected)
    }

    pub fn selected_name(&self) -> Option<&str> {
        self.records.name_at(self.selected)
    }

    pub fn selected_json(&self) -> Option<serde_json::Value> {
        self.records.json_at(self.selected)
    }

    /// Whether the page is older than `max_age` (or never fetched).
    pub fn is_stale(&self, max_age: Duration) -> bool {
        match self.fetched_at {
            Some(at) => at.elapsed() >= max_age,
            None => true,
        }
    }

    /// Footer with page position and navigation hints.
    pub fn footer_line(&self) -> Line<'static> {
        let mut spans = vec![Span::styled(
            format!(
                "Page {}/{} · {} {}",
                self.current_page(),
                self.total_pages(),
                self.total,
                self.kind().api_path()
            ),
            Style::default().fg(Color::Cyan),
        )];
        if !self.search.is_empty() {
            spans.push(Span::styled(
                format!("  filter: '{}'", self.search),
                Style::default().fg(Color::Yellow),
            ));
        }
        spans.push(Span::styled(
            "  [n] next  [p] prev  [/] search  [r] refresh",
            Style::default().fg(Color::DarkGray),
        ));
        Line::from(spans)
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool, date_format: &str) {
        let border_style = if focused {
            Style::default().fg(Color::Cyan)
        } else {
            Style::default().fg(Color::Gray)
        };

        let title = format!(" {} ({}) ", self.kind().display_name(), self.total);
        let block = Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(1), Constraint::Min(1)])
            .split(inner);

        let header = Paragraph::new(Line::from(Span::styled(
            header_text(self.kind()),
            Style::default()
                .fg(Color::Gray)
                .add_modifier(Modifier::BOLD),
        )));
        frame.render_widget(header, chunks[0]);

        if self.records.is_empty() {
            let message = if self.fetched_at.is_none() {
                "Loading..."
            } else if self.search.is_empty() {
                "No records"
            } else {
                "No matches"
            };
            let empty = Paragraph::new(Line::from(Span::styled(
                message,
                Style::default().fg(Color::DarkGray),
            )));
            frame.render_widget(empty, chunks[1]);
            return;
        }

        let items: Vec<ListItem> = (0..self.records.len())
            .map(|i| ListItem::new(row_line(&self.records, i, date_format)))
            .collect();

        let list = List::new(items)
            .highlight_style(Style::default().add_modifier(Modifier::REVERSED))
            .highlight_symbol("> ");

        frame.render_stateful_widget(list, chunks[1], &mut self.list_state);
    }
}

// ─── Row Formatting ─────────────────────────────────────────────────────────

/// Pad or truncate to a fixed column width. Truncation is by characters,
/// not bytes, so multibyte names cannot split a codepoint.
fn col(text: &str, width: usize) -> String {
    let count = text.chars().count();
    if count > width {
        let truncated: String = text.chars().take(width.saturating_sub(1)).collect();
        format!("{truncated}… ")
    } else {
        format!("{text}{} ", " ".repeat(width - count))
    }
}

fn header_text(kind: EntityKind) -> String {
    match kind {
        EntityKind::Assets => format!(
            "  {}{}{}{}{}",
            col("Tag", 16),
            col("Status", 12),
            col("Product", 20),
            col("Assigned", 14),
            col("Location", 12)
        ),
        EntityKind::Products => format!(
            "  {}{}{}{}",
            col("Name", 26),
            col("Category", 16),
            col("Supplier", 16),
            col("Price", 10)
        ),
        EntityKind::Components => format!(
            "  {}{}{}{}{}",
            col("Name", 24),
            col("Serial", 14),
            col("Product", 18),
            col("Qty", 5),
            col("Price", 10)
        ),
        EntityKind::Audits => format!(
            "  {}{}{}{}",
            col("Asset", 20),
            col("Status", 11),
            col("Auditor", 16),
            col("Scheduled", 12)
        ),
        EntityKind::Repairs => format!(
            "  {}{}{}{}{}",
            col("Title", 26),
            col("Asset", 16),
            col("Status", 12),
            col("Cost", 10),
            col("Opened", 12)
        ),
        EntityKind::Suppliers => format!(
            "  {}{}{}{}",
            col("Name", 22),
            col("Contact", 16),
            col("Email", 24),
            col("Phone", 14)
        ),
        EntityKind::Categories => format!("  {}{}", col("Name", 22), col("Description", 40)),
        EntityKind::Users => format!(
            "  {}{}{}{}",
            col("Name", 20),
            col("Email", 26),
            col("Role", 12),
            col("Active", 6)
        ),
    }
}

fn money(amount: Option<f64>) -> String {
    amount.map(|a| format!("{a:.2}")).unwrap_or_default()
}

fn date(value: Option<chrono::NaiveDate>, format: &str) -> String {
    value.map(|d| d.format(format).to_string()).unwrap_or_default()
}

fn dash(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("-")
}

fn row_line(records: &Records, index: usize, date_format: &str) -> Line<'static> {
    match records {
        Records::Assets(rows) => {
            let a = &rows[index];
            Line::from(vec![
                Span::raw(col(&a.name, 16)),
                Span::styled(
                    col(a.status.display_name(), 12),
                    Style::default().fg(asset_status_color(a.status)),
                ),
                Span::raw(col(dash(&a.product_name), 20)),
                Span::raw(col(dash(&a.assigned_to), 14)),
                Span::styled(
                    col(dash(&a.location), 12),
                    Style::default().fg(Color::Gray),
                ),
            ])
        }
        Records::Products(rows) => {
            let p = &rows[index];
            Line::from(vec![
                Span::raw(col(&p.name, 26)),
                Span::raw(col(dash(&p.category_name), 16)),
                Span::raw(col(dash(&p.supplier_name), 16)),
                Span::styled(
                    col(&money(p.price), 10),
                    Style::default().fg(Color::Gray),
                ),
            ])
        }
        Records::Components(rows) => {
            let c = &rows[index];
            Line::from(vec![
                Span::raw(col(&c.name, 24)),
                Span::styled(
                    col(dash(&c.serial_number), 14),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(col(dash(&c.product_name), 18)),
                Span::raw(col(
                    &c.quantity.map(|q| q.to_string()).unwrap_or_default(),
                    5,
                )),
                Span::styled(
                    col(&money(c.price), 10),
                    Style::default().fg(Color::Gray),
                ),
            ])
        }
        Records::Audits(rows) => {
            let a = &rows[index];
            Line::from(vec![
                Span::raw(col(&a.asset_name, 20)),
                Span::styled(
                    col(a.status.display_name(), 11),
                    Style::default().fg(audit_status_color(a.status)),
                ),
                Span::raw(col(dash(&a.auditor), 16)),
                Span::styled(
                    col(&date(a.scheduled_for, date_format), 12),
                    Style::default().fg(Color::Gray),
                ),
            ])
        }
        Records::Repairs(rows) => {
            let r = &rows[index];
            Line::from(vec![
                Span::raw(col(&r.title, 26)),
                Span::raw(col(dash(&r.asset_name), 16)),
                Span::styled(
                    col(r.status.display_name(), 12),
                    Style::default().fg(repair_status_color(r.status)),
                ),
                Span::styled(col(&money(r.cost), 10), Style::default().fg(Color::Gray)),
                Span::styled(
                    col(&date(r.opened_on, date_format), 12),
                    Style::default().fg(Color::Gray),
                ),
            ])
        }
        Records::Suppliers(rows) => {
            let s = &rows[index];
            Line::from(vec![
                Span::raw(col(&s.name, 22)),
                Span::raw(col(dash(&s.contact_name), 16)),
                Span::styled(
                    col(dash(&s.email), 24),
                    Style::default().fg(Color::Gray),
                ),
                Span::styled(
                    col(dash(&s.phone), 14),
                    Style::default().fg(Color::Gray),
                ),
            ])
        }
        Records::Categories(rows) => {
            let c = &rows[index];
            Line::from(vec![
                Span::raw(col(&c.name, 22)),
                Span::styled(
                    col(dash(&c.description), 40),
                    Style::default().fg(Color::Gray),
                ),
            ])
        }
        Records::Users(rows) => {
            let u = &rows[index];
            let active = if u.active { "yes" } else { "no" };
            Line::from(vec![
                Span::raw(col(&u.name, 20)),
                Span::styled(
                    col(dash(&u.email), 26),
                    Style::default().fg(Color::Gray),
                ),
                Span::raw(col(u.role.display_name(), 12)),
                Span::styled(
                    col(active, 6),
                    Style::default().fg(if u.active { Color::Green } else { Color::DarkGray }),
                ),
            ])
        }
    }
}

fn asset_status_color(status: AssetStatus) -> Color {
    match status {
        AssetStatus::InUse => Color::Green,
        AssetStatus::InStorage => Color::Cyan,
        AssetStatus::UnderRepair => Color::Yellow,
        AssetStatus::Retired => Color::DarkGray,
        AssetStatus::Lost => Color::Red,
    }
}

fn audit_status_color(status: AuditStatus) -> Color {
    match status {
        AuditStatus::Scheduled => Color::Cyan,
        AuditStatus::Passed => Color::Green,
        AuditStatus::Failed => Color::Red,
    }
}

fn repair_status_color(status: RepairStatus) -> Color {
    match status {
        RepairStatus::Open => Color::Yellow,
        RepairStatus::InProgress => Color::Cyan,
        RepairStatus::Resolved => Color::Green,
        RepairStatus::Cancelled => Color::DarkGray,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Category;
    use chrono::{TimeZone, Utc};

    fn category(id: i64, name: &str) -> Category {
        let stamp = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Category {
            id,
            name: name.to_string(),
            description: None,
            created_at: stamp,
            updated_at: stamp,
        }
    }

    fn page(names: &[&str], total: u64) -> RecordPage {
        RecordPage {
            records: Records::Categories(
                names
                    .iter()
                    .enumerate()
                    .map(|(i, n)| category(i as i64 + 1, n))
                    .collect(),
            ),
            total,
        }
    }

    #[test]
    fn test_empty_listing() {
        let listing = Listing::new(EntityKind::Categories, 10);
        assert!(listing.is_empty());
        assert_eq!(listing.total_pages(), 1);
        assert_eq!(listing.selected_id(), None);
        assert!(listing.is_stale(Duration::from_secs(60)));
    }

    #[test]
    fn test_total_pages_rounds_up() {
        let mut listing = Listing::new(EntityKind::Categories, 10);
        listing.set_page(page(&["a"], 21), 1);
        assert_eq!(listing.total_pages(), 3);

        listing.set_page(page(&["a"], 20), 1);
        assert_eq!(listing.total_pages(), 2);
    }

    #[test]
    fn test_selection_wraps_within_page() {
        let mut listing = Listing::new(EntityKind::Categories, 10);
        listing.set_page(page(&["a", "b", "c"], 3), 1);

        assert_eq!(listing.selected_name(), Some("a"));
        listing.select_prev();
        assert_eq!(listing.selected_name(), Some("c"));
        listing.select_next();
        assert_eq!(listing.selected_name(), Some("a"));
        listing.select_next();
        assert_eq!(listing.selected_name(), Some("b"));
    }

    #[test]
    fn test_page_neighbours() {
        let mut listing = Listing::new(EntityKind::Categories, 10);
        listing.set_page(page(&["a"], 25), 2);

        assert_eq!(listing.next_page_number(), Some(3));
        assert_eq!(listing.prev_page_number(), Some(1));

        listing.set_page(page(&["a"], 25), 3);
        assert_eq!(listing.next_page_number(), None);
    }

    #[test]
    fn test_refresh_keeps_cursor_clamped() {
        let mut listing = Listing::new(EntityKind::Categories, 10);
        listing.set_page(page(&["a", "b", "c"], 3), 1);
        listing.select_last();
        assert_eq!(listing.selected_name(), Some("c"));

        // Same page re-fetched with a row gone: cursor clamps to the end.
        listing.set_page(page(&["a", "b"], 2), 1);
        assert_eq!(listing.selected_name(), Some("b"));

        // A different page starts back at the top.
        listing.set_page(page(&["x", "y"], 12), 2);
        assert_eq!(listing.selected_name(), Some("x"));
    }

    #[test]
    fn test_set_page_marks_fresh() {
        let mut listing = Listing::new(EntityKind::Categories, 10);
        listing.set_page(page(&["a", "b"], 2), 1);
        assert!(!listing.is_stale(Duration::from_secs(3600)));
        assert!(listing.is_stale(Duration::ZERO));
    }

    #[test]
    fn test_set_search_resets_cursor() {
        let mut listing = Listing::new(EntityKind::Categories, 10);
        listing.set_page(page(&["a", "b", "c"], 3), 1);
        listing.select_last();

        listing.set_search("b".to_string());
        assert_eq!(listing.search(), "b");
        assert!(listing.at_first_row());
    }

    #[test]
    fn test_col_truncates_by_characters() {
        assert_eq!(col("abc", 5), "abc   ");
        let truncated = col("Siège Café Déluxe", 8);
        assert!(truncated.chars().count() <= 9);
        assert!(truncated.contains('…'));
    }
}
