use crossterm::event::{
    self, Event, KeyCode, KeyModifiers, MouseButton, MouseEvent, MouseEventKind,
};
use ratatui::layout::Position;
use std::time::Duration;

use super::{App, Focus};

pub fn poll_event(timeout: Duration) -> anyhow::Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

pub fn handle_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if (code, modifiers) == (KeyCode::Char('c'), KeyModifiers::CONTROL) {
        app.running = false;
        return;
    }

    // ── Error dialog swallows the next key ───────────────────────────────
    if app.dialog.is_some() {
        app.dismiss_dialog();
        return;
    }

    match (code, modifiers) {
        (KeyCode::Tab, _) => {
            app.focus = app.focus.next();
            return;
        }
        (KeyCode::BackTab, _) => {
            app.focus = app.focus.prev();
            return;
        }
        _ => {}
    }

    match app.focus {
        Focus::Table => handle_table_key(app, code),
        Focus::Name | Focus::DueDate => handle_input_key(app, code, modifiers),
        Focus::AddButton => match code {
            KeyCode::Enter | KeyCode::Char(' ') => app.submit(),
            KeyCode::Esc => app.focus = Focus::Table,
            _ => {}
        },
    }
}

fn handle_table_key(app: &mut App, code: KeyCode) {
    match code {
        KeyCode::Char('q') => app.running = false,
        KeyCode::Down | KeyCode::Char('j') => app.select_next(),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev(),
        KeyCode::Home | KeyCode::Char('g') => app.select(Some(0)),
        KeyCode::End | KeyCode::Char('G') => app.select(app.store.len().checked_sub(1)),
        KeyCode::Esc => app.select(None),
        KeyCode::Backspace | KeyCode::Delete => app.delete_selected(),
        KeyCode::Char('a') | KeyCode::Enter => app.focus = Focus::Name,
        _ => {}
    }
}

fn handle_input_key(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    match code {
        KeyCode::Esc => {
            app.focus = Focus::Table;
            return;
        }
        KeyCode::Enter => {
            if app.focus == Focus::Name {
                app.focus = Focus::DueDate;
            } else {
                app.submit();
            }
            return;
        }
        _ => {}
    }

    let Some(field) = app.active_input_mut() else {
        return;
    };
    match code {
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            field.insert_char(c)
        }
        KeyCode::Backspace => field.backspace(),
        KeyCode::Delete => field.delete(),
        KeyCode::Left => field.move_left(),
        KeyCode::Right => field.move_right(),
        KeyCode::Home => field.home(),
        KeyCode::End => field.end(),
        _ => {}
    }
}

pub fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    let pos = Position::new(mouse.column, mouse.row);
    let areas = app.hit_areas;

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if app.dialog.is_some() {
                app.dismiss_dialog();
                return;
            }

            if areas.table_rows.contains(pos) {
                app.focus = Focus::Table;
                let row = (pos.y - areas.table_rows.y) as usize + app.table_state.offset();
                if row >= app.store.len() {
                    app.select(None);
                    return;
                }
                app.select(Some(row));
                if pos.x >= areas.delete_column.x && pos.x < areas.delete_column.right() {
                    app.delete_selected();
                }
            } else if areas.name_field.contains(pos) {
                app.focus = Focus::Name;
            } else if areas.due_field.contains(pos) {
                app.focus = Focus::DueDate;
            } else if areas.add_button.contains(pos) {
                app.focus = Focus::AddButton;
                app.submit();
            }
        }
        MouseEventKind::ScrollDown if areas.table_rows.contains(pos) => app.select_next(),
        MouseEventKind::ScrollUp if areas.table_rows.contains(pos) => app.select_prev(),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Store;
    use crate::tui::HitAreas;
    use ratatui::layout::Rect;

    fn press(app: &mut App, code: KeyCode) {
        handle_key(app, code, KeyModifiers::NONE);
    }

    fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn click(app: &mut App, column: u16, row: u16) {
        handle_mouse(
            app,
            MouseEvent {
                kind: MouseEventKind::Down(MouseButton::Left),
                column,
                row,
                modifiers: KeyModifiers::NONE,
            },
        );
    }

    fn new_app(dir: &tempfile::TempDir) -> App {
        let mut app = App::new(Store::new(dir.path().join("homework.txt")));
        app.hit_areas = HitAreas {
            table_rows: Rect::new(1, 2, 60, 10),
            delete_column: Rect::new(51, 2, 10, 10),
            name_field: Rect::new(0, 14, 30, 3),
            due_field: Rect::new(30, 14, 30, 3),
            add_button: Rect::new(60, 14, 20, 3),
        };
        app
    }

    /// Enter name, Enter, due date, Enter: the keyboard add flow.
    fn add_by_keys(app: &mut App, name: &str, due: &str) {
        app.focus = Focus::Name;
        type_text(app, name);
        press(app, KeyCode::Enter);
        type_text(app, due);
        press(app, KeyCode::Enter);
    }

    fn names(app: &App) -> Vec<&str> {
        app.store.records().iter().map(|h| h.name.as_str()).collect()
    }

    #[test]
    fn test_keyboard_add_flow() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        add_by_keys(&mut app, "Essay", "12/25/2030");
        add_by_keys(&mut app, "Quiz", "11.01.2030");
        assert_eq!(names(&app), vec!["Quiz", "Essay"]);
        assert!(dir.path().join("homework.txt").exists());
    }

    #[test]
    fn test_invalid_date_dialog_swallows_next_key() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        add_by_keys(&mut app, "Essay", "2030-12-25");
        assert!(app.dialog.is_some());
        assert!(app.store.is_empty());

        press(&mut app, KeyCode::Char('x'));
        assert!(app.dialog.is_none());
        assert_eq!(app.due_input.value, "2030-12-25");
    }

    #[test]
    fn test_typing_q_in_field_does_not_quit() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        app.focus = Focus::Name;
        type_text(&mut app, "quiz");
        assert!(app.running);
        assert_eq!(app.name_input.value, "quiz");

        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('q'));
        assert!(!app.running);
    }

    #[test]
    fn test_ctrl_c_quits_anywhere() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        app.focus = Focus::DueDate;
        handle_key(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!app.running);
        assert!(app.due_input.value.is_empty());
    }

    #[test]
    fn test_ctrl_c_quits_while_dialog_open() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        add_by_keys(&mut app, "Essay", "not a date");
        assert!(app.dialog.is_some());

        handle_key(&mut app, KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(!app.running);
    }

    #[test]
    fn test_backspace_in_table_deletes_selected() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        add_by_keys(&mut app, "A", "01/01/2030");
        add_by_keys(&mut app, "B", "01/02/2030");

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.focus, Focus::Table);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(app.store.len(), 2, "nothing selected yet");

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Backspace);
        assert_eq!(names(&app), vec!["A"]);
    }

    #[test]
    fn test_tab_cycles_focus() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        app.focus = Focus::Table;
        press(&mut app, KeyCode::Tab);
        assert_eq!(app.focus, Focus::Name);
        press(&mut app, KeyCode::BackTab);
        press(&mut app, KeyCode::BackTab);
        assert_eq!(app.focus, Focus::AddButton);
    }

    #[test]
    fn test_click_row_selects_and_delete_column_deletes() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        add_by_keys(&mut app, "A", "01/01/2030");
        add_by_keys(&mut app, "B", "01/02/2030");
        add_by_keys(&mut app, "C", "01/03/2030");

        click(&mut app, 5, 3);
        assert_eq!(app.selected(), Some(1));
        assert_eq!(app.focus, Focus::Table);

        click(&mut app, 55, 4);
        assert_eq!(names(&app), vec!["A", "B"]);

        // Below the last row: clears selection, deletes nothing.
        click(&mut app, 55, 9);
        assert_eq!(app.selected(), None);
        assert_eq!(app.store.len(), 2);
    }

    #[test]
    fn test_click_fields_and_add_button() {
        let dir = tempfile::tempdir().unwrap();
        let mut app = new_app(&dir);
        app.focus = Focus::Table;

        click(&mut app, 5, 15);
        assert_eq!(app.focus, Focus::Name);
        type_text(&mut app, "Lab");

        click(&mut app, 35, 15);
        assert_eq!(app.focus, Focus::DueDate);
        type_text(&mut app, "03/04/2030");

        click(&mut app, 65, 15);
        assert_eq!(names(&app), vec!["Lab"]);
    }
}
