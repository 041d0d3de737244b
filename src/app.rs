use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{
    layout::{Constraint, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};
use std::time::Duration;

use crate::api::ApiClient;
use crate::config::Config;
use crate::registration::{build_payload, duplicate_values, fields_for, values_from_record};
use crate::types::EntityKind;
use crate::ui::{
    ConfirmDialog, FormMode, HeaderBar, HelpDialog, Listing, NavBar, OverviewPanel, PendingDelete,
    RegistrationForm, StatusBar,
};

pub struct App {
    config: Config,
    client: ApiClient,
    header: HeaderBar,
    navbar: NavBar,
    listing: Listing,
    overview: OverviewPanel,
    status: StatusBar,
    confirm_dialog: ConfirmDialog,
    help_dialog: HelpDialog,
    /// Open create/edit form, browse mode otherwise.
    form: Option<RegistrationForm>,
    /// Filter text being typed after `/`, applied on Enter.
    search_input: Option<String>,
    should_quit: bool,
}

impl App {
    pub fn new(config: Config) -> Result<Self> {
        let client = ApiClient::from_config(&config)?;
        let header = HeaderBar::new(config.server.base_url.clone(), client.has_token());
        let kind = EntityKind::default();

        Ok(Self {
            header,
            navbar: NavBar::new(kind),
            listing: Listing::new(kind, config.ui.page_size),
            overview: OverviewPanel::new(),
            status: StatusBar::new(),
            confirm_dialog: ConfirmDialog::new(),
            help_dialog: HelpDialog::new(),
            form: None,
            search_input: None,
            should_quit: false,
            config,
            client,
        })
    }

    pub async fn run(&mut self) -> Result<()> {
        let mut terminal = ratatui::try_init()?;

        // The first paint should already show data.
        self.load_page(1).await;
        self.refresh_summaries().await;

        let tick_rate = Duration::from_millis(500);
        while !self.should_quit {
            terminal.draw(|frame| self.draw(frame))?;

            if event::poll(tick_rate)? {
                match event::read()? {
                    Event::Key(key) if key.kind == KeyEventKind::Press => {
                        self.handle_key(key.code).await;
                    }
                    _ => {}
                }
            }

            self.refresh_if_stale().await;
        }

        ratatui::restore();
        Ok(())
    }

    fn draw(&mut self, frame: &mut Frame) {
        let [header_area, nav_area, body_area, footer_area, status_area] = Layout::vertical([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(5),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        self.header.render(frame, header_area);
        self.navbar.render(frame, nav_area);

        let [list_area, side_area] =
            Layout::horizontal([Constraint::Min(40), Constraint::Length(22)]).areas(body_area);

        let listing_focused = self.form.is_none()
            && !self.confirm_dialog.visible
            && !self.help_dialog.visible
            && !self.navbar.is_menu_open();
        self.listing
            .render(frame, list_area, listing_focused, &self.config.ui.date_format);
        self.overview.render(frame, side_area, self.navbar.active());

        frame.render_widget(Paragraph::new(self.listing.footer_line()), footer_area);

        if let Some(ref input) = self.search_input {
            let search_line = Line::from(vec![
                Span::styled(" Filter: ", Style::default().fg(Color::Yellow)),
                Span::raw(format!("{input}|")),
                Span::styled(
                    "  (Enter apply, Esc cancel)",
                    Style::default().fg(Color::DarkGray),
                ),
            ]);
            frame.render_widget(Paragraph::new(search_line), status_area);
        } else {
            self.status.render(frame, status_area);
        }

        // Overlays, in stacking order.
        self.navbar.render_dropdown(frame, nav_area);
        if let Some(ref mut form) = self.form {
            form.render(frame);
        }
        self.confirm_dialog.render(frame);
        self.help_dialog.render(frame);
    }

    async fn handle_key(&mut self, key: KeyCode) {
        // Help closes on any key
        if self.help_dialog.visible {
            self.help_dialog.visible = false;
            return;
        }

        if self.form.is_some() {
            self.handle_form_key(key).await;
            return;
        }

        if self.search_input.is_some() {
            self.handle_search_key(key).await;
            return;
        }

        if self.confirm_dialog.visible {
            self.handle_confirm_key(key).await;
            return;
        }

        if self.navbar.is_menu_open() {
            self.handle_menu_key(key).await;
            return;
        }

        self.handle_browse_key(key).await;
    }

    async fn handle_browse_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Char('?') => self.help_dialog.toggle(),
            KeyCode::Char('m') => self.navbar.open_menu(),
            KeyCode::Tab => {
                let kind = self.navbar.next_section();
                self.switch_section(kind).await;
            }
            KeyCode::BackTab => {
                let kind = self.navbar.prev_section();
                self.switch_section(kind).await;
            }
            KeyCode::Char(c @ '1'..='8') => {
                let kind = EntityKind::all()[c as usize - '1' as usize];
                self.navbar.set_active(kind);
                self.switch_section(kind).await;
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.listing.at_last_row() {
                    if let Some(next) = self.listing.next_page_number() {
                        self.load_page(next).await;
                    } else {
                        self.listing.select_next();
                    }
                } else {
                    self.listing.select_next();
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if self.listing.at_first_row() {
                    if let Some(prev) = self.listing.prev_page_number() {
                        if self.load_page(prev).await {
                            self.listing.select_last();
                        }
                    } else {
                        self.listing.select_prev();
                    }
                } else {
                    self.listing.select_prev();
                }
            }
            KeyCode::Char('g') | KeyCode::Home => {
                self.listing.select_first();
            }
            KeyCode::Char('G') | KeyCode::End => {
                self.listing.select_last();
            }
            KeyCode::Char('n') | KeyCode::PageDown => {
                if let Some(next) = self.listing.next_page_number() {
                    self.load_page(next).await;
                }
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                if let Some(prev) = self.listing.prev_page_number() {
                    self.load_page(prev).await;
                }
            }
            KeyCode::Char('r') => {
                self.status.busy("Refreshing...");
                let page = self.listing.current_page();
                if self.load_page(page).await {
                    self.status.clear();
                }
                self.refresh_summaries().await;
            }
            KeyCode::Char('/') => {
                self.search_input = Some(self.listing.search().to_string());
            }
            KeyCode::Esc => {
                if !self.listing.search().is_empty() {
                    self.listing.set_search(String::new());
                    self.load_page(1).await;
                }
            }
            KeyCode::Char('c') => {
                self.open_create_form();
            }
            KeyCode::Char('e') | KeyCode::Enter => {
                self.open_edit_form();
            }
            KeyCode::Char('d') => {
                self.request_delete();
            }
            KeyCode::Char('x') => {
                self.open_duplicate_form().await;
            }
            _ => {}
        }
    }

    async fn handle_form_key(&mut self, key: KeyCode) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        match key {
            KeyCode::Esc => {
                self.form = None;
            }
            KeyCode::Tab => {
                form.clear_error();
                form.next_field();
            }
            KeyCode::BackTab => {
                form.clear_error();
                form.prev_field();
            }
            KeyCode::Enter => {
                if form.is_last_field() {
                    self.submit_form().await;
                } else {
                    form.next_field();
                }
            }
            other => {
                form.clear_error();
                if let Some(field) = form.focused_field_mut() {
                    field.handle_key(other);
                }
            }
        }
    }

    async fn handle_search_key(&mut self, key: KeyCode) {
        let Some(input) = self.search_input.as_mut() else {
            return;
        };

        match key {
            KeyCode::Esc => {
                self.search_input = None;
            }
            KeyCode::Enter => {
                let search = self.search_input.take().unwrap_or_default();
                self.listing.set_search(search.trim().to_string());
                self.load_page(1).await;
            }
            KeyCode::Char(c) => {
                input.push(c);
            }
            KeyCode::Backspace => {
                input.pop();
            }
            _ => {}
        }
    }

    async fn handle_confirm_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') => {
                self.confirm_dialog.selection = crate::ui::dialogs::ConfirmSelection::Yes;
                if let Some(pending) = self.confirm_dialog.confirm() {
                    self.execute_pending(pending).await;
                }
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_dialog.hide();
            }
            KeyCode::Tab | KeyCode::Left | KeyCode::Right | KeyCode::Char('h')
            | KeyCode::Char('l') => {
                self.confirm_dialog.toggle_selection();
            }
            KeyCode::Enter => {
                if let Some(pending) = self.confirm_dialog.confirm() {
                    self.execute_pending(pending).await;
                }
            }
            _ => {}
        }
    }

    async fn handle_menu_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::Char('m') => {
                self.navbar.close_menu();
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.navbar.menu_prev_group();
            }
            KeyCode::Right | KeyCode::Char('l') => {
                self.navbar.menu_next_group();
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.navbar.menu_next_item();
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.navbar.menu_prev_item();
            }
            KeyCode::Enter => {
                if let Some(kind) = self.navbar.menu_select() {
                    self.switch_section(kind).await;
                }
            }
            _ => {}
        }
    }

    // =========================================================================
    // Data loading
    // =========================================================================

    /// Fetch one listing page. Errors land in the status bar, not the caller.
    async fn load_page(&mut self, page: usize) -> bool {
        let kind = self.navbar.active();
        let search = self.listing.search().to_string();
        let search = (!search.is_empty()).then_some(search);

        match self
            .client
            .list(kind, search.as_deref(), page, self.config.ui.page_size)
            .await
        {
            Ok(result) => {
                self.listing.set_page(result, page);
                true
            }
            Err(err) => {
                tracing::warn!(kind = kind.api_path(), error = %err, "Page load failed");
                self.status.error(err.to_string());
                false
            }
        }
    }

    async fn refresh_summaries(&mut self) {
        match self.client.summaries().await {
            Ok(summaries) => self.overview.set(summaries),
            Err(err) => {
                tracing::debug!(error = %err, "Summary refresh failed");
            }
        }
    }

    async fn switch_section(&mut self, kind: EntityKind) {
        self.listing.reset(kind);
        self.status.clear();
        self.load_page(1).await;
    }

    async fn refresh_if_stale(&mut self) {
        if self.config.ui.refresh_secs == 0 {
            return;
        }
        let overlay_open = self.form.is_some()
            || self.confirm_dialog.visible
            || self.help_dialog.visible
            || self.search_input.is_some()
            || self.navbar.is_menu_open();
        if overlay_open {
            return;
        }
        if self
            .listing
            .is_stale(Duration::from_secs(self.config.ui.refresh_secs))
        {
            let page = self.listing.current_page();
            self.load_page(page).await;
            self.refresh_summaries().await;
        }
    }

    // =========================================================================
    // Record actions
    // =========================================================================

    fn open_create_form(&mut self) {
        self.form = Some(RegistrationForm::new(
            self.navbar.active(),
            FormMode::Create,
        ));
    }

    fn open_edit_form(&mut self) {
        let Some(id) = self.listing.selected_id() else {
            return;
        };
        let Some(record) = self.listing.selected_json() else {
            return;
        };

        let kind = self.navbar.active();
        let mut form = RegistrationForm::new(kind, FormMode::Edit { id });
        form.set_values(&values_from_record(&fields_for(kind), &record));
        self.form = Some(form);
    }

    async fn submit_form(&mut self) {
        let Some(form) = self.form.as_mut() else {
            return;
        };

        let kind = form.kind;
        let mode = form.mode;
        let payload = match build_payload(&fields_for(kind), &form.values()) {
            Ok(payload) => payload,
            Err(err) => {
                form.set_error(err.to_string());
                return;
            }
        };

        let outcome = match mode {
            FormMode::Create => self
                .client
                .create(kind, &payload)
                .await
                .map(|id| format!("Created {} #{id}", kind.singular())),
            FormMode::Edit { id } => self
                .client
                .update(kind, id, &payload)
                .await
                .map(|()| format!("Updated {} #{id}", kind.singular())),
        };

        match outcome {
            Ok(message) => {
                self.form = None;
                self.status.info(message);
                let page = self.listing.current_page();
                self.load_page(page).await;
                self.refresh_summaries().await;
            }
            Err(err) => {
                if let Some(form) = self.form.as_mut() {
                    form.set_error(err.to_string());
                }
            }
        }
    }

    /// Open a create form prefilled from the selected record, with the next
    /// free clone name already in the name field. Nothing is sent until the
    /// user reviews and saves the form.
    async fn open_duplicate_form(&mut self) {
        let kind = self.navbar.active();
        if !kind.supports_duplicate() {
            self.status
                .error(format!("{} cannot be duplicated", kind.display_name()));
            return;
        }
        let Some(record) = self.listing.selected_json() else {
            return;
        };

        let base = self.listing.selected_name().unwrap_or_default().to_string();
        self.status
            .busy(format!("Looking up clone name for '{base}'..."));
        match duplicate_values(&self.client, kind, &record).await {
            Ok(values) => {
                let mut form = RegistrationForm::new(kind, FormMode::Create);
                form.set_values(&values);
                self.form = Some(form);
                self.status.clear();
            }
            Err(err) => {
                self.status.error(err.to_string());
            }
        }
    }

    fn request_delete(&mut self) {
        let Some(id) = self.listing.selected_id() else {
            return;
        };
        let name = self.listing.selected_name().unwrap_or_default().to_string();
        self.confirm_dialog.show(PendingDelete {
            kind: self.navbar.active(),
            id,
            name,
        });
    }

    async fn execute_pending(&mut self, pending: PendingDelete) {
        match self.client.delete(pending.kind, pending.id).await {
            Ok(()) => {
                self.status
                    .info(format!("Deleted {} #{}", pending.kind.singular(), pending.id));
            }
            Err(err) => {
                self.status.error(err.to_string());
            }
        }

        let page = self.listing.current_page();
        self.load_page(page).await;
        self.refresh_summaries().await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::RecordPage;
    use crate::types::{Product, Records, User, UserRole};
    use chrono::{TimeZone, Utc};

    fn test_config() -> Config {
        let mut config = Config::default();
        config.server.base_url = "http://localhost:9".to_string();
        config.server.retry_attempts = 0;
        config.ui.refresh_secs = 0;
        config
    }

    fn user_page() -> RecordPage {
        let stamp = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        RecordPage {
            records: Records::Users(vec![User {
                id: 1,
                name: "R. Waters".to_string(),
                email: Some("rw@example.com".to_string()),
                role: UserRole::Viewer,
                active: true,
                created_at: stamp,
                updated_at: stamp,
            }]),
            total: 1,
        }
    }

    fn product_page() -> RecordPage {
        let stamp = Utc.with_ymd_and_hms(2024, 6, 1, 8, 0, 0).unwrap();
        RecordPage {
            records: Records::Products(vec![Product {
                id: 7,
                name: "Laser Mouse".to_string(),
                category_id: Some(3),
                category_name: Some("Peripherals".to_string()),
                supplier_id: None,
                supplier_name: None,
                price: Some(24.9),
                description: None,
                created_at: stamp,
                updated_at: stamp,
            }]),
            total: 1,
        }
    }

    #[test]
    fn test_new_requires_base_url() {
        let config = Config::default();
        assert!(App::new(config).is_err());
    }

    #[tokio::test]
    async fn test_quit_and_help_keys() {
        let mut app = App::new(test_config()).unwrap();

        app.handle_key(KeyCode::Char('?')).await;
        assert!(app.help_dialog.visible);

        // Any key closes help without acting on the listing.
        app.handle_key(KeyCode::Char('q')).await;
        assert!(!app.help_dialog.visible);
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Char('q')).await;
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_create_form_opens_and_discards() {
        let mut app = App::new(test_config()).unwrap();

        app.handle_key(KeyCode::Char('c')).await;
        assert!(app.form.is_some());
        assert_eq!(app.form.as_ref().map(|f| f.kind), Some(EntityKind::Assets));

        app.handle_key(KeyCode::Esc).await;
        assert!(app.form.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_rejected_for_directory_kinds() {
        let mut app = App::new(test_config()).unwrap();
        app.navbar.set_active(EntityKind::Users);
        app.listing.reset(EntityKind::Users);
        app.listing.set_page(user_page(), 1);

        app.handle_key(KeyCode::Char('x')).await;
        assert!(app.form.is_none());
        assert_eq!(app.status.message(), Some("Users cannot be duplicated"));
    }

    #[tokio::test]
    async fn test_duplicate_opens_prefilled_form_for_review() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/products/names")
            .match_query(mockito::Matcher::UrlEncoded(
                "search".into(),
                "Laser Mouse (clone)".into(),
            ))
            .with_status(200)
            .with_header("content-type", "application/json")
            .with_body("[]")
            .create_async()
            .await;

        let mut config = test_config();
        config.server.base_url = server.url();
        let mut app = App::new(config).unwrap();
        app.navbar.set_active(EntityKind::Products);
        app.listing.reset(EntityKind::Products);
        app.listing.set_page(product_page(), 1);

        app.handle_key(KeyCode::Char('x')).await;
        mock.assert_async().await;

        // The copy is staged in a form, not created on the spot.
        let form = app.form.as_ref().unwrap();
        assert_eq!(form.kind, EntityKind::Products);
        assert_eq!(form.mode, FormMode::Create);
        let values = form.values();
        assert_eq!(values.get("name").map(String::as_str), Some("Laser Mouse (clone)"));
        assert_eq!(values.get("category_id").map(String::as_str), Some("3"));
        assert!(!app.confirm_dialog.visible);
    }

    #[tokio::test]
    async fn test_delete_asks_for_confirmation() {
        let mut app = App::new(test_config()).unwrap();
        app.navbar.set_active(EntityKind::Users);
        app.listing.reset(EntityKind::Users);
        app.listing.set_page(user_page(), 1);

        app.handle_key(KeyCode::Char('d')).await;
        assert!(app.confirm_dialog.visible);

        // Backing out leaves the record alone.
        app.handle_key(KeyCode::Esc).await;
        assert!(!app.confirm_dialog.visible);
    }

    #[tokio::test]
    async fn test_search_input_lifecycle() {
        let mut app = App::new(test_config()).unwrap();

        app.handle_key(KeyCode::Char('/')).await;
        assert!(app.search_input.is_some());

        app.handle_key(KeyCode::Char('l')).await;
        app.handle_key(KeyCode::Char('t')).await;
        app.handle_key(KeyCode::Backspace).await;
        assert_eq!(app.search_input.as_deref(), Some("l"));

        app.handle_key(KeyCode::Esc).await;
        assert!(app.search_input.is_none());
        assert_eq!(app.listing.search(), "");
    }

    #[tokio::test]
    async fn test_menu_navigation_keys() {
        let mut app = App::new(test_config()).unwrap();

        app.handle_key(KeyCode::Char('m')).await;
        assert!(app.navbar.is_menu_open());

        app.handle_key(KeyCode::Esc).await;
        assert!(!app.navbar.is_menu_open());
        // Active section is untouched by closing the menu.
        assert_eq!(app.navbar.active(), EntityKind::Assets);
    }
}
