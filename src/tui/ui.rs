use ratatui::{
    layout::{Constraint, Direction, Flex, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::{App, Focus, HitAreas, InputField};
use chrono::Local;

const ACCENT: Color = Color::Cyan;
const HEADER_BG: Color = Color::DarkGray;
const SELECTED_BG: Color = Color::Rgb(40, 40, 60);
const DIM: Color = Color::DarkGray;
const BAD: Color = Color::Red;

const DUE_COL_WIDTH: u16 = 16;
const DAYS_COL_WIDTH: u16 = 9;
const DELETE_COL_WIDTH: u16 = 8;
const DELETE_LABEL: &str = "[Delete]";

// ─── Main render ────────────────────────────────────────────────────────────

pub fn render(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    render_title(f, chunks[0]);
    render_clock(f, chunks[0]);
    render_table(f, app, chunks[1]);
    render_inputs(f, app, chunks[2]);
    render_status_bar(f, app, chunks[3]);

    if let Some(message) = app.dialog.clone() {
        render_dialog(f, &message);
    }
}

// ─── Title / Clock ──────────────────────────────────────────────────────────

fn render_title(f: &mut Frame, area: Rect) {
    let title = Paragraph::new(Line::from(Span::styled(
        " Homework Organizer ",
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD),
    )))
    .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(title, area);
}

fn render_clock(f: &mut Frame, title_area: Rect) {
    let time_str = format!(" {} ", Local::now().format("%a %b %d  %H:%M:%S"));
    let clock_width = time_str.width() as u16;
    let clock_area = Rect {
        x: title_area.right().saturating_sub(clock_width),
        y: title_area.y,
        width: clock_width.min(title_area.width),
        height: 1,
    };
    f.render_widget(
        Paragraph::new(time_str).style(Style::default().fg(ACCENT)),
        clock_area,
    );
}

// ─── Homework table ─────────────────────────────────────────────────────────

fn render_table(f: &mut Frame, app: &mut App, area: Rect) {
    let focused = app.focus == Focus::Table;
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(format!(" Homework ({}) ", app.store.len()))
        .title_style(Style::default().fg(ACCENT));

    let inner = block.inner(area);
    let body = Rect {
        y: inner.y.saturating_add(1),
        height: inner.height.saturating_sub(1),
        ..inner
    };
    let delete_width = DELETE_COL_WIDTH.min(inner.width);
    app.hit_areas.table_rows = body;
    app.hit_areas.delete_column = Rect {
        x: inner.right().saturating_sub(delete_width),
        width: delete_width,
        ..body
    };

    let header = Row::new(vec!["Name", "Due Date", "Days Left", "Delete"])
        .style(Style::default().fg(ACCENT).add_modifier(Modifier::BOLD));

    let rows: Vec<Row> = app
        .store
        .records()
        .iter()
        .map(|hw| {
            Row::new(vec![
                Cell::from(hw.name.clone()).style(Style::default().fg(Color::White)),
                Cell::from(hw.due_label()).style(Style::default().fg(DIM)),
                Cell::from(hw.days_left.to_string()),
                Cell::from(DELETE_LABEL).style(Style::default().fg(BAD)),
            ])
        })
        .collect();

    if rows.is_empty() {
        let msg = Paragraph::new(vec![
            Line::from(""),
            Line::from(Span::styled(
                "  No homework yet. Fill in a name and due date below.",
                Style::default().fg(DIM),
            )),
        ])
        .block(block);
        f.render_widget(msg, area);
        return;
    }

    let table = Table::new(
        rows,
        [
            Constraint::Fill(1),
            Constraint::Length(DUE_COL_WIDTH),
            Constraint::Length(DAYS_COL_WIDTH),
            Constraint::Length(DELETE_COL_WIDTH),
        ],
    )
    .header(header)
    .row_highlight_style(Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD))
    .block(block);

    f.render_stateful_widget(table, area, &mut app.table_state);
}

// ─── Input panel ────────────────────────────────────────────────────────────

fn render_inputs(f: &mut Frame, app: &mut App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Percentage(35),
            Constraint::Percentage(20),
        ])
        .split(area);

    app.hit_areas = HitAreas {
        name_field: chunks[0],
        due_field: chunks[1],
        add_button: chunks[2],
        ..app.hit_areas
    };

    render_field(f, &app.name_input, " Name ", app.focus == Focus::Name, chunks[0]);
    render_field(
        f,
        &app.due_input,
        " Due Date (MM/DD/YYYY) ",
        app.focus == Focus::DueDate,
        chunks[1],
    );

    let button_focused = app.focus == Focus::AddButton;
    let label_style = if button_focused {
        Style::default().fg(Color::Black).bg(ACCENT).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(ACCENT).add_modifier(Modifier::BOLD)
    };
    let button = Paragraph::new(Line::from(Span::styled(" Add Homework ", label_style)))
        .centered()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style(button_focused)),
        );
    f.render_widget(button, chunks[2]);
}

fn render_field(f: &mut Frame, field: &InputField, title: &str, focused: bool, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style(focused))
        .title(title.to_string())
        .title_style(Style::default().fg(if focused { ACCENT } else { DIM }));
    let inner = block.inner(area);

    // Scroll horizontally so the caret stays visible in narrow fields.
    let caret_col = field.value[..field.cursor].width() as u16;
    let visible = inner.width.saturating_sub(1);
    let scroll = caret_col.saturating_sub(visible);

    let paragraph = Paragraph::new(field.value.as_str())
        .style(Style::default().fg(Color::White))
        .scroll((0, scroll))
        .block(block);
    f.render_widget(paragraph, area);

    if focused && inner.width > 0 && inner.height > 0 {
        f.set_cursor_position((inner.x + caret_col - scroll, inner.y));
    }
}

fn border_style(focused: bool) -> Style {
    if focused {
        Style::default().fg(ACCENT)
    } else {
        Style::default().fg(DIM)
    }
}

// ─── Status Bar ─────────────────────────────────────────────────────────────

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let hints = match app.focus {
        Focus::Table => "  q:quit  Tab:focus  j/k:select  Bksp/Del:delete  a:add  ",
        Focus::Name => "  Enter:next field  Tab:focus  Esc:table  ",
        Focus::DueDate | Focus::AddButton => "  Enter:add  Tab:focus  Esc:table  ",
    };

    let status = Paragraph::new(Line::from(vec![
        Span::styled(" ", Style::default()),
        Span::styled(&app.status_message, Style::default().fg(Color::White)),
        Span::styled(hints, Style::default().fg(DIM)),
    ]))
    .style(Style::default().bg(HEADER_BG));

    f.render_widget(status, area);
}

// ─── Dialog ─────────────────────────────────────────────────────────────────

fn render_dialog(f: &mut Frame, message: &str) {
    let area = centered_rect(f.area(), 50, 7);
    let dialog = Paragraph::new(vec![
        Line::from(Span::styled(message, Style::default().fg(Color::White))),
        Line::from(""),
        Line::from(Span::styled("Press any key to continue", Style::default().fg(DIM))),
    ])
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(BAD))
            .title(" Invalid input ")
            .title_style(Style::default().fg(BAD).add_modifier(Modifier::BOLD)),
    );
    f.render_widget(Clear, area);
    f.render_widget(dialog, area);
}

fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let [row] = Layout::vertical([Constraint::Length(height.min(area.height))])
        .flex(Flex::Center)
        .areas(area);
    let [rect] = Layout::horizontal([Constraint::Length(width.min(area.width))])
        .flex(Flex::Center)
        .areas(row);
    rect
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Homework;
    use crate::store::Store;
    use chrono::{Duration, Utc};
    use ratatui::{backend::TestBackend, Terminal};

    fn draw(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(90, 20)).unwrap();
        terminal.draw(|f| render(f, app)).unwrap();
        terminal
            .backend()
            .buffer()
            .content
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    fn app_with(names: &[(&str, i64)]) -> App {
        let now = Utc::now();
        let mut store = Store::new("unused.txt");
        for (name, days) in names {
            store.add(Homework::new(*name, now + Duration::days(*days), now));
        }
        App::new(store)
    }

    #[test]
    fn test_renders_columns_and_rows_in_due_order() {
        let mut app = app_with(&[("Essay", 30), ("Quiz", 5), ("Overdue", -3)]);
        let screen = draw(&mut app);

        for header in ["Name", "Due Date", "Days Left", "Delete"] {
            assert!(screen.contains(header), "missing header {header}");
        }
        assert!(screen.contains(DELETE_LABEL));
        assert!(screen.contains("-3"));

        let pos = |s: &str| screen.find(s).unwrap();
        assert!(pos("Overdue") < pos("Quiz"));
        assert!(pos("Quiz") < pos("Essay"));
    }

    #[test]
    fn test_empty_table_placeholder() {
        let mut app = app_with(&[]);
        let screen = draw(&mut app);
        assert!(screen.contains("No homework yet"));
        assert!(screen.contains("Add Homework"));
    }

    #[test]
    fn test_dialog_is_drawn() {
        let mut app = app_with(&[]);
        app.dialog = Some("Invalid due date format.".into());
        let screen = draw(&mut app);
        assert!(screen.contains("Invalid input"));
        assert!(screen.contains("Invalid due date format."));
    }

    #[test]
    fn test_hit_areas_follow_layout() {
        let mut app = app_with(&[("Essay", 3)]);
        draw(&mut app);
        let areas = app.hit_areas;

        // Border + header row above the first body row.
        assert_eq!(areas.table_rows.y, 2 + 1 + 1);
        assert_eq!(areas.delete_column.width, DELETE_COL_WIDTH);
        assert_eq!(areas.delete_column.right(), 90 - 1);
        assert_eq!(areas.name_field.y, areas.add_button.y);
        assert!(areas.due_field.x > areas.name_field.x);
    }
}
