//! Form widgets for creating and editing records.
//!
//! Each entity kind declares its fields in `registration::fields_for`; this
//! module turns those declarations into interactive widgets and hosts them in
//! a centered dialog. Submission parsing lives in `registration::build_payload`,
//! the widgets only capture raw strings.

use std::collections::HashMap;

use crossterm::event::KeyCode;
use ratatui::{
    layout::{Alignment, Constraint, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};
use tui_textarea::TextArea;

use crate::registration::{fields_for, FieldKind, FieldSchema, SelectOption};
use crate::types::EntityKind;

/// Single-line edit buffer. The cursor is a byte offset kept on char
/// boundaries so multibyte input survives editing.
#[derive(Debug, Default)]
pub struct LineBuffer {
    text: String,
    cursor: usize,
}

impl LineBuffer {
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn char_count(&self) -> usize {
        self.text.chars().count()
    }

    pub fn at_start(&self) -> bool {
        self.cursor == 0
    }

    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.len();
    }

    pub fn insert(&mut self, c: char) {
        self.text.insert(self.cursor, c);
        self.cursor += c.len_utf8();
    }

    /// Movement and deletion keys. Returns false for keys the buffer does
    /// not handle, including character input.
    pub fn edit(&mut self, key: KeyCode) -> bool {
        match key {
            KeyCode::Backspace => {
                if self.cursor > 0 {
                    self.cursor = self.prev_boundary();
                    self.text.remove(self.cursor);
                }
                true
            }
            KeyCode::Delete => {
                if self.cursor < self.text.len() {
                    self.text.remove(self.cursor);
                }
                true
            }
            KeyCode::Left => {
                if self.cursor > 0 {
                    self.cursor = self.prev_boundary();
                }
                true
            }
            KeyCode::Right => {
                if self.cursor < self.text.len() {
                    self.cursor = self.next_boundary();
                }
                true
            }
            KeyCode::Home => {
                self.cursor = 0;
                true
            }
            KeyCode::End => {
                self.cursor = self.text.len();
                true
            }
            _ => false,
        }
    }

    fn prev_boundary(&self) -> usize {
        let mut pos = self.cursor - 1;
        while pos > 0 && !self.text.is_char_boundary(pos) {
            pos -= 1;
        }
        pos
    }

    fn next_boundary(&self) -> usize {
        let mut pos = self.cursor + 1;
        while pos < self.text.len() && !self.text.is_char_boundary(pos) {
            pos += 1;
        }
        pos
    }

    /// Display text with a `|` cursor bar while focused.
    fn display(&self, focused: bool) -> String {
        let mut shown = self.text.clone();
        if focused {
            if self.cursor < shown.len() {
                shown.insert(self.cursor, '|');
            } else {
                shown.push('|');
            }
        }
        shown
    }
}

/// A single input widget, mapped from a field declaration.
pub enum FormField {
    /// Single-line text input
    TextInput {
        buf: LineBuffer,
        hint: String,
        max_length: Option<usize>,
    },
    /// Multi-line text input backed by tui-textarea
    TextArea {
        textarea: Box<TextArea<'static>>,
        hint: String,
    },
    /// Numeric input; decimal inputs additionally accept a dot
    NumberInput { buf: LineBuffer, decimal: bool },
    /// One-line option cycler for select fields
    Select {
        options: Vec<SelectOption>,
        selected: usize,
    },
    /// Boolean toggle
    Toggle { value: bool },
    /// Date input in `YYYY-MM-DD` form
    DateInput { buf: LineBuffer },
}

impl FormField {
    pub fn from_schema(schema: &FieldSchema) -> Self {
        match schema.kind {
            FieldKind::Text => FormField::TextInput {
                buf: LineBuffer::default(),
                hint: schema.placeholder.clone().unwrap_or_default(),
                max_length: schema.max_length,
            },
            FieldKind::LongText => FormField::TextArea {
                textarea: Box::new(TextArea::default()),
                hint: schema.placeholder.clone().unwrap_or_default(),
            },
            FieldKind::Number => FormField::NumberInput {
                buf: LineBuffer::default(),
                decimal: false,
            },
            FieldKind::Money => FormField::NumberInput {
                buf: LineBuffer::default(),
                decimal: true,
            },
            FieldKind::Date => FormField::DateInput {
                buf: LineBuffer::default(),
            },
            FieldKind::Select => FormField::Select {
                options: schema.options.clone(),
                selected: 0,
            },
            FieldKind::Flag => FormField::Toggle { value: false },
        }
    }

    /// Current raw value; selects report the wire value of the chosen option.
    pub fn value(&self) -> String {
        match self {
            FormField::TextInput { buf, .. }
            | FormField::NumberInput { buf, .. }
            | FormField::DateInput { buf } => buf.text().to_string(),
            FormField::TextArea { textarea, .. } => textarea.lines().join("\n"),
            FormField::Select { options, selected } => options
                .get(*selected)
                .map(|o| o.value.clone())
                .unwrap_or_default(),
            FormField::Toggle { value } => value.to_string(),
        }
    }

    pub fn set_value(&mut self, new_value: &str) {
        match self {
            FormField::TextInput { buf, .. }
            | FormField::NumberInput { buf, .. }
            | FormField::DateInput { buf } => buf.set(new_value),
            FormField::TextArea { textarea, .. } => {
                textarea.select_all();
                textarea.cut();
                textarea.insert_str(new_value);
            }
            FormField::Select { options, selected } => {
                if let Some(idx) = options
                    .iter()
                    .position(|o| o.value == new_value || o.label == new_value)
                {
                    *selected = idx;
                }
            }
            FormField::Toggle { value } => {
                *value = new_value == "true" || new_value == "yes";
            }
        }
    }

    /// Non-empty check for required fields; real parsing happens on submit.
    pub fn is_valid(&self, required: bool) -> bool {
        if !required {
            return true;
        }
        match self {
            FormField::TextInput { buf, .. }
            | FormField::NumberInput { buf, .. }
            | FormField::DateInput { buf } => !buf.text().trim().is_empty(),
            FormField::TextArea { textarea, .. } => {
                !textarea.lines().iter().all(|l| l.trim().is_empty())
            }
            FormField::Select { options, .. } => !options.is_empty(),
            FormField::Toggle { .. } => true,
        }
    }

    /// Handle a key event, returns true if the key was consumed
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        match self {
            FormField::TextInput {
                buf, max_length, ..
            } => match key {
                KeyCode::Char(c) => {
                    if max_length.is_none_or(|max| buf.char_count() < max) {
                        buf.insert(c);
                    }
                    true
                }
                other => buf.edit(other),
            },
            FormField::TextArea { textarea, .. } => {
                textarea.input(crossterm::event::KeyEvent::new(
                    key,
                    crossterm::event::KeyModifiers::NONE,
                ));
                true
            }
            FormField::NumberInput { buf, decimal } => match key {
                KeyCode::Char(c)
                    if c.is_ascii_digit()
                        || (c == '-' && buf.at_start())
                        || (c == '.' && *decimal && !buf.text().contains('.')) =>
                {
                    buf.insert(c);
                    true
                }
                other => buf.edit(other),
            },
            FormField::DateInput { buf } => match key {
                KeyCode::Char(c) if c.is_ascii_digit() || c == '-' => {
                    if buf.text().len() < 10 {
                        buf.insert(c);
                    }
                    true
                }
                other => buf.edit(other),
            },
            FormField::Select { options, selected } => match key {
                KeyCode::Up | KeyCode::Left | KeyCode::Char('k') => {
                    if !options.is_empty() {
                        *selected = selected.checked_sub(1).unwrap_or(options.len() - 1);
                    }
                    true
                }
                KeyCode::Down | KeyCode::Right | KeyCode::Char('j') => {
                    if !options.is_empty() {
                        *selected = (*selected + 1) % options.len();
                    }
                    true
                }
                _ => false,
            },
            FormField::Toggle { value } => match key {
                KeyCode::Char(' ') => {
                    *value = !*value;
                    true
                }
                KeyCode::Left | KeyCode::Right | KeyCode::Char('h') | KeyCode::Char('l') => {
                    *value = matches!(key, KeyCode::Right | KeyCode::Char('l'));
                    true
                }
                _ => false,
            },
        }
    }

    /// Get the height needed to render this field
    pub fn render_height(&self) -> u16 {
        match self {
            FormField::TextArea { .. } => 4,
            _ => 1,
        }
    }

    pub fn render(&mut self, frame: &mut Frame, area: Rect, focused: bool) {
        match self {
            FormField::TextInput {
                buf,
                hint,
                max_length,
            } => {
                let counter = max_length.map(|max| format!(" ({}/{})", buf.char_count(), max));
                frame.render_widget(single_line(buf, hint, counter, focused), area);
            }
            FormField::NumberInput { buf, decimal } => {
                let hint = if *decimal { "0.00" } else { "0" };
                frame.render_widget(single_line(buf, hint, None, focused), area);
            }
            FormField::DateInput { buf } => {
                frame.render_widget(single_line(buf, "YYYY-MM-DD", None, focused), area);
            }
            FormField::TextArea { textarea, hint } => {
                let border = if focused { Color::Cyan } else { Color::Gray };
                textarea.set_block(
                    Block::default()
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(border)),
                );
                textarea.set_cursor_line_style(Style::default());
                textarea.set_cursor_style(if focused {
                    Style::default().add_modifier(Modifier::REVERSED)
                } else {
                    Style::default()
                });
                if !focused && textarea.lines().iter().all(|line| line.is_empty()) {
                    textarea.set_placeholder_text(hint.clone());
                    textarea.set_placeholder_style(Style::default().fg(Color::DarkGray));
                }
                frame.render_widget(&**textarea, area);
            }
            FormField::Select { options, selected } => {
                let label = options
                    .get(*selected)
                    .map(|o| o.label.as_str())
                    .unwrap_or("(no options)");
                let arrows = if focused {
                    Style::default().fg(Color::Yellow)
                } else {
                    Style::default().fg(Color::DarkGray)
                };
                let chosen = if focused {
                    Style::default()
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                let line = Line::from(vec![
                    Span::styled("◂ ", arrows),
                    Span::styled(label.to_string(), chosen),
                    Span::styled(" ▸", arrows),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
            FormField::Toggle { value } => {
                let lit = |label: &'static str, on: bool, color: Color| {
                    if on {
                        Span::styled(label, Style::default().fg(color).add_modifier(Modifier::BOLD))
                    } else {
                        Span::styled(label, Style::default().fg(Color::DarkGray))
                    }
                };
                let line = Line::from(vec![
                    lit("[Yes]", *value, Color::Green),
                    Span::raw(" / "),
                    lit("[No]", !*value, Color::Red),
                ]);
                frame.render_widget(Paragraph::new(line), area);
            }
        }
    }
}

/// Shared renderer for the single-line variants: hint text while empty and
/// unfocused, optional dimmed suffix (the `(n/max)` counter).
fn single_line(
    buf: &LineBuffer,
    hint: &str,
    suffix: Option<String>,
    focused: bool,
) -> Paragraph<'static> {
    let muted = Style::default().fg(Color::DarkGray);
    let line = if buf.text().is_empty() && !focused {
        Line::from(Span::styled(hint.to_string(), muted))
    } else {
        let mut spans = vec![Span::raw(buf.display(focused))];
        if let Some(suffix) = suffix {
            spans.push(Span::styled(suffix, muted));
        }
        Line::from(spans)
    };
    let body = if focused { Color::White } else { Color::Gray };
    Paragraph::new(line).style(Style::default().fg(body))
}

/// Whether the form creates a record or edits an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormMode {
    Create,
    Edit { id: i64 },
}

/// A complete create/edit form for one entity kind.
pub struct RegistrationForm {
    pub kind: EntityKind,
    pub mode: FormMode,
    /// Field keys in display order.
    pub field_order: Vec<String>,
    pub schemas: HashMap<String, FieldSchema>,
    pub fields: HashMap<String, FormField>,
    pub focused_index: usize,
    /// Submission error shown under the fields until the next keypress.
    pub error: Option<String>,
}

impl RegistrationForm {
    pub fn new(kind: EntityKind, mode: FormMode) -> Self {
        let mut field_order = Vec::new();
        let mut schema_map = HashMap::new();
        let mut fields = HashMap::new();

        for schema in fields_for(kind) {
            let key = schema.key.clone();
            let field = FormField::from_schema(&schema);
            field_order.push(key.clone());
            schema_map.insert(key.clone(), schema);
            fields.insert(key, field);
        }

        Self {
            kind,
            mode,
            field_order,
            schemas: schema_map,
            fields,
            focused_index: 0,
            error: None,
        }
    }

    /// Pre-fill fields from an existing record, for edit mode.
    pub fn set_values(&mut self, values: &HashMap<String, String>) {
        for (key, value) in values {
            if let Some(field) = self.fields.get_mut(key) {
                field.set_value(value);
            }
        }
    }

    pub fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        let key = self.field_order.get(self.focused_index)?;
        self.fields.get_mut(key)
    }

    pub fn next_field(&mut self) {
        if self.focused_index < self.field_order.len().saturating_sub(1) {
            self.focused_index += 1;
        }
    }

    pub fn prev_field(&mut self) {
        if self.focused_index > 0 {
            self.focused_index -= 1;
        }
    }

    pub fn is_last_field(&self) -> bool {
        self.focused_index >= self.field_order.len().saturating_sub(1)
    }

    pub fn is_valid(&self) -> bool {
        for key in &self.field_order {
            if let (Some(schema), Some(field)) = (self.schemas.get(key), self.fields.get(key)) {
                if !field.is_valid(schema.required) {
                    return false;
                }
            }
        }
        true
    }

    pub fn values(&self) -> HashMap<String, String> {
        self.fields
            .iter()
            .map(|(k, v)| (k.clone(), v.value()))
            .collect()
    }

    pub fn set_error(&mut self, message: String) {
        self.error = Some(message);
    }

    pub fn clear_error(&mut self) {
        self.error = None;
    }

    pub fn title(&self) -> String {
        match self.mode {
            FormMode::Create => format!(" New {} ", self.kind.singular()),
            FormMode::Edit { id } => format!(" Edit {} #{} ", self.kind.singular(), id),
        }
    }

    pub fn render(&mut self, frame: &mut Frame) {
        let area = centered_rect(60, 85, frame.area());
        frame.render_widget(Clear, area);

        let block = Block::default()
            .title(self.title())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Cyan));
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [fields_area, error_area, footer_area] = Layout::vertical([
            Constraint::Min(4),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .margin(1)
        .areas(inner);

        let heights: Vec<Constraint> = self
            .field_order
            .iter()
            .filter_map(|key| self.fields.get(key))
            .map(|field| Constraint::Length(field.render_height() + 1))
            .collect();
        let field_areas = Layout::vertical(heights).split(fields_area);

        const LABEL_WIDTH: u16 = 16;
        for (idx, key) in self.field_order.clone().iter().enumerate() {
            let Some(area) = field_areas.get(idx).copied() else {
                break;
            };
            let is_focused = idx == self.focused_index;
            let Some(schema) = self.schemas.get(key) else {
                continue;
            };
            let label = if schema.required {
                format!("{}*", schema.label)
            } else {
                schema.label.clone()
            };
            let label_style = if is_focused {
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::Gray)
            };

            let row = Layout::horizontal([Constraint::Length(LABEL_WIDTH), Constraint::Min(10)])
                .split(Rect {
                    height: area.height.saturating_sub(1).max(1),
                    ..area
                });

            frame.render_widget(
                Paragraph::new(Line::from(Span::styled(label, label_style))),
                Rect {
                    height: 1,
                    ..row[0]
                },
            );

            if let Some(field) = self.fields.get_mut(key) {
                field.render(frame, row[1], is_focused);
            }
        }

        if let Some(ref error) = self.error {
            let error_line = Paragraph::new(Line::from(Span::styled(
                error.clone(),
                Style::default().fg(Color::Red),
            )));
            frame.render_widget(error_line, error_area);
        }

        let key_hint = |key: &'static str| Span::styled(key, Style::default().fg(Color::Yellow));
        let footer = Paragraph::new(Line::from(vec![
            key_hint("Tab"),
            Span::raw(" next  "),
            key_hint("Shift+Tab"),
            Span::raw(" prev  "),
            key_hint("Enter"),
            Span::raw(" save  "),
            key_hint("Esc"),
            Span::raw(" cancel"),
        ]))
        .alignment(Alignment::Center);
        frame.render_widget(footer, footer_area);
    }
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
    use crate::registration::build_payload;

    fn text_input(max_length: Option<usize>) -> FormField {
        FormField::TextInput {
            buf: LineBuffer::default(),
            hint: String::new(),
            max_length,
        }
    }

    #[test]
    fn test_line_buffer_edits_at_cursor() {
        let mut buf = LineBuffer::default();
        for c in "adc".chars() {
            buf.insert(c);
        }
        buf.edit(KeyCode::Left);
        buf.edit(KeyCode::Backspace);
        buf.insert('b');
        assert_eq!(buf.text(), "abc");
    }

    #[test]
    fn test_text_input_handles_chars() {
        let mut field = text_input(None);

        assert!(field.handle_key(KeyCode::Char('h')));
        assert!(field.handle_key(KeyCode::Char('i')));
        assert_eq!(field.value(), "hi");
    }

    #[test]
    fn test_text_input_respects_max_length() {
        let mut field = text_input(Some(3));

        field.handle_key(KeyCode::Char('a'));
        field.handle_key(KeyCode::Char('b'));
        field.handle_key(KeyCode::Char('c'));
        field.handle_key(KeyCode::Char('d'));
        assert_eq!(field.value(), "abc");
    }

    #[test]
    fn test_text_input_backspace_handles_multibyte() {
        let mut field = text_input(None);

        field.handle_key(KeyCode::Char('é'));
        field.handle_key(KeyCode::Char('x'));
        field.handle_key(KeyCode::Backspace);
        field.handle_key(KeyCode::Backspace);
        assert_eq!(field.value(), "");
    }

    #[test]
    fn test_number_input_rejects_letters() {
        let mut field = FormField::NumberInput {
            buf: LineBuffer::default(),
            decimal: false,
        };

        field.handle_key(KeyCode::Char('4'));
        field.handle_key(KeyCode::Char('a'));
        field.handle_key(KeyCode::Char('2'));
        assert_eq!(field.value(), "42");
    }

    #[test]
    fn test_money_input_allows_single_dot() {
        let mut field = FormField::NumberInput {
            buf: LineBuffer::default(),
            decimal: true,
        };

        field.handle_key(KeyCode::Char('9'));
        field.handle_key(KeyCode::Char('.'));
        field.handle_key(KeyCode::Char('.'));
        field.handle_key(KeyCode::Char('5'));
        assert_eq!(field.value(), "9.5");
    }

    #[test]
    fn test_select_cycles_and_wraps() {
        let mut field = FormField::Select {
            options: vec![
                SelectOption::new("in_use", "In Use"),
                SelectOption::new("retired", "Retired"),
            ],
            selected: 0,
        };

        assert_eq!(field.value(), "in_use");
        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "retired");
        field.handle_key(KeyCode::Down);
        assert_eq!(field.value(), "in_use");
        field.handle_key(KeyCode::Up);
        assert_eq!(field.value(), "retired");
    }

    #[test]
    fn test_select_set_value_accepts_label_or_value() {
        let mut field = FormField::Select {
            options: vec![
                SelectOption::new("in_use", "In Use"),
                SelectOption::new("retired", "Retired"),
            ],
            selected: 0,
        };

        field.set_value("Retired");
        assert_eq!(field.value(), "retired");
        field.set_value("in_use");
        assert_eq!(field.value(), "in_use");
    }

    #[test]
    fn test_form_validation_requires_name() {
        let mut form = RegistrationForm::new(EntityKind::Suppliers, FormMode::Create);
        assert!(!form.is_valid());

        if let Some(field) = form.fields.get_mut("name") {
            field.set_value("Initech GmbH");
        }
        assert!(form.is_valid());
    }

    #[test]
    fn test_form_values_build_a_payload() {
        let mut form = RegistrationForm::new(EntityKind::Products, FormMode::Create);
        if let Some(field) = form.fields.get_mut("name") {
            field.set_value("ThinkPad X1");
        }
        if let Some(field) = form.fields.get_mut("price") {
            field.set_value("1499.99");
        }

        let schemas = fields_for(EntityKind::Products);
        let payload = build_payload(&schemas, &form.values()).unwrap();
        assert_eq!(payload["name"], "ThinkPad X1");
        assert_eq!(payload["price"], 1499.99);
    }

    #[test]
    fn test_form_prefill_for_edit() {
        let mut form = RegistrationForm::new(EntityKind::Categories, FormMode::Edit { id: 7 });
        let mut values = HashMap::new();
        values.insert("name".to_string(), "Laptops".to_string());
        values.insert("description".to_string(), "Portable machines".to_string());
        form.set_values(&values);

        assert_eq!(form.values().get("name"), Some(&"Laptops".to_string()));
        assert_eq!(form.title(), " Edit category #7 ");
    }

    #[test]
    fn test_field_traversal_stops_at_ends() {
        let mut form = RegistrationForm::new(EntityKind::Categories, FormMode::Create);
        assert_eq!(form.focused_index, 0);
        form.prev_field();
        assert_eq!(form.focused_index, 0);

        form.next_field();
        assert!(form.is_last_field());
        form.next_field();
        assert_eq!(form.focused_index, form.field_order.len() - 1);
    }
}
