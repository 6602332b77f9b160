pub mod event;
pub mod ui;

use chrono::{DateTime, Utc};
use ratatui::layout::Rect;
use ratatui::widgets::TableState;

use crate::dates::parse_due_date;
use crate::models::Homework;
use crate::store::Store;

// ─── Focus ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Table,
    Name,
    DueDate,
    AddButton,
}

impl Focus {
    pub const ALL: [Focus; 4] = [Focus::Table, Focus::Name, Focus::DueDate, Focus::AddButton];

    pub fn next(self) -> Focus {
        let idx = Focus::ALL.iter().position(|f| *f == self).unwrap_or(0);
        Focus::ALL[(idx + 1) % Focus::ALL.len()]
    }

    pub fn prev(self) -> Focus {
        let idx = Focus::ALL.iter().position(|f| *f == self).unwrap_or(0);
        if idx == 0 {
            Focus::ALL[Focus::ALL.len() - 1]
        } else {
            Focus::ALL[idx - 1]
        }
    }
}

// ─── Text input ──────────────────────────────────────────────────────────────

/// Single-line text field with a byte-offset caret on char boundaries.
#[derive(Debug, Clone, Default)]
pub struct InputField {
    pub value: String,
    pub cursor: usize,
}

impl InputField {
    pub fn insert_char(&mut self, ch: char) {
        self.value.insert(self.cursor, ch);
        self.cursor += ch.len_utf8();
    }

    pub fn backspace(&mut self) {
        if let Some(ch) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
            self.value.remove(self.cursor);
        }
    }

    pub fn delete(&mut self) {
        if self.cursor < self.value.len() {
            self.value.remove(self.cursor);
        }
    }

    pub fn move_left(&mut self) {
        if let Some(ch) = self.value[..self.cursor].chars().next_back() {
            self.cursor -= ch.len_utf8();
        }
    }

    pub fn move_right(&mut self) {
        if let Some(ch) = self.value[self.cursor..].chars().next() {
            self.cursor += ch.len_utf8();
        }
    }

    pub fn home(&mut self) {
        self.cursor = 0;
    }

    pub fn end(&mut self) {
        self.cursor = self.value.len();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor = 0;
    }
}

// ─── Hit areas ───────────────────────────────────────────────────────────────

/// Screen regions from the last frame, used to route mouse clicks.
#[derive(Debug, Clone, Copy, Default)]
pub struct HitAreas {
    /// Table body (rows only, header excluded).
    pub table_rows: Rect,
    /// Horizontal span of the Delete column inside the table.
    pub delete_column: Rect,
    pub name_field: Rect,
    pub due_field: Rect,
    pub add_button: Rect,
}

// ─── App State ───────────────────────────────────────────────────────────────

pub struct App {
    pub store: Store,
    pub running: bool,
    pub focus: Focus,

    pub name_input: InputField,
    pub due_input: InputField,

    /// `selected() == None` means no row is selected.
    pub table_state: TableState,

    /// Modal validation message; blocks other input until dismissed.
    pub dialog: Option<String>,
    pub status_message: String,

    pub hit_areas: HitAreas,
}

impl App {
    pub fn new(store: Store) -> Self {
        let status_message = format!(
            "{} homework item(s) loaded from {}",
            store.len(),
            store.path().display()
        );
        Self {
            store,
            running: true,
            focus: Focus::Name,
            name_input: InputField::default(),
            due_input: InputField::default(),
            table_state: TableState::default(),
            dialog: None,
            status_message,
            hit_areas: HitAreas::default(),
        }
    }

    pub fn selected(&self) -> Option<usize> {
        self.table_state.selected()
    }

    pub fn select(&mut self, index: Option<usize>) {
        let index = index.filter(|i| *i < self.store.len());
        self.table_state.select(index);
    }

    pub fn select_next(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let next = match self.selected() {
            Some(i) if i + 1 < len => i + 1,
            Some(i) => i,
            None => 0,
        };
        self.select(Some(next));
    }

    pub fn select_prev(&mut self) {
        let len = self.store.len();
        if len == 0 {
            return;
        }
        let prev = match self.selected() {
            Some(i) => i.saturating_sub(1),
            None => len - 1,
        };
        self.select(Some(prev));
    }

    pub fn active_input_mut(&mut self) -> Option<&mut InputField> {
        match self.focus {
            Focus::Name => Some(&mut self.name_input),
            Focus::DueDate => Some(&mut self.due_input),
            Focus::Table | Focus::AddButton => None,
        }
    }

    /// Add a homework entry from the input fields, timestamped now.
    pub fn submit(&mut self) {
        self.submit_at(Utc::now());
    }

    /// Parse the inputs, add the record, clear the fields and persist.
    /// An unparseable due date opens the error dialog and changes nothing.
    pub fn submit_at(&mut self, now: DateTime<Utc>) {
        let due_at = match parse_due_date(&self.due_input.value) {
            Ok(d) => d,
            Err(e) => {
                tracing::warn!(input = %e.input, "rejected due date");
                self.dialog = Some(e.to_string());
                return;
            }
        };

        let hw = Homework::new(self.name_input.value.clone(), due_at, now);
        self.status_message = format!(
            "Added \"{}\" due {} ({} days left)",
            hw.name,
            hw.due_label(),
            hw.days_left
        );
        self.store.transact(|s| s.add(hw));

        self.name_input.clear();
        self.due_input.clear();
    }

    /// Delete the selected row and persist. No-op without a selection.
    pub fn delete_selected(&mut self) {
        let Some(index) = self.selected() else {
            return;
        };
        let Some(removed) = self.store.transact(|s| s.remove_at(index)) else {
            return;
        };
        self.status_message = format!("Deleted \"{}\"", removed.name);

        let len = self.store.len();
        self.select(if len == 0 { None } else { Some(index.min(len - 1)) });
    }

    pub fn dismiss_dialog(&mut self) {
        self.dialog = None;
    }
}
