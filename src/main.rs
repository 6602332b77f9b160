mod config;
mod dates;
mod models;
mod store;
mod tui;

use anyhow::{Context, Result};
use chrono::Utc;
use crossterm::{
    event::{DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use std::time::Duration;

use config::Config;
use store::Store;
use tui::App;

fn main() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    if args.iter().any(|a| a == "--init") {
        let path = Config::generate_default()?;
        println!("Generated config file at: {}", path.display());
        return Ok(());
    }

    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    let mut config = Config::load().with_context(|| {
        "Failed to load configuration.\n\
         Run `homework-tui --init` to regenerate a config file."
    })?;
    if let Some(file) = flag_value(&args, "--file") {
        config.data_file = PathBuf::from(file);
    }

    init_logging(config.log_file.as_deref());
    tracing::info!(data_file = %config.data_file.display(), "starting homework-tui");

    let store = Store::open(&config.data_file, Utc::now());

    if args.iter().any(|a| a == "--list") {
        print_list(&store);
        return Ok(());
    }

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, App::new(store));

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "homework-tui exited with an error");
        eprintln!("Error: {e:#}");
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, mut app: App) -> Result<()> {
    while app.running {
        terminal.draw(|f| tui::ui::render(f, &mut app))?;

        // The timeout keeps the clock ticking when no input arrives.
        match tui::event::poll_event(Duration::from_millis(250))? {
            Some(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                tui::event::handle_key(&mut app, key.code, key.modifiers);
            }
            Some(Event::Mouse(mouse)) => tui::event::handle_mouse(&mut app, mouse),
            _ => {}
        }
    }

    Ok(())
}

/// Route `tracing` output to a file; the terminal belongs to the UI.
fn init_logging(path: Option<&Path>) {
    let Some(path) = path else {
        return;
    };
    if let Some(parent) = path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            eprintln!("Cannot create log directory {}: {e}", parent.display());
        }
    }
    let file = match std::fs::OpenOptions::new().create(true).append(true).open(path) {
        Ok(f) => f,
        Err(e) => {
            eprintln!("Logging disabled: cannot open {}: {e}", path.display());
            return;
        }
    };
    if let Err(e) = tracing_subscriber::fmt()
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_max_level(tracing::Level::INFO)
        .try_init()
    {
        eprintln!("Logging disabled: {e}");
    }
}

fn flag_value<'a>(args: &'a [String], flag: &str) -> Option<&'a str> {
    args.iter()
        .position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .map(String::as_str)
}

fn print_list(store: &Store) {
    if store.is_empty() {
        println!("No homework in {}", store.path().display());
        return;
    }
    println!("{:<32} {:<16} {:>9}", "Name", "Due Date", "Days Left");
    for hw in store.records() {
        println!("{:<32} {:<16} {:>9}", hw.name, hw.due_label(), hw.days_left);
    }
}

fn print_help() {
    println!("homework-tui — A terminal homework organizer");
    println!();
    println!("USAGE:");
    println!("  homework-tui                 Start the TUI");
    println!("  homework-tui --list          Print stored homework and exit");
    println!("  homework-tui --file <path>   Use a different homework file");
    println!("  homework-tui --init          Generate a default config file");
    println!();
    println!("CONFIG:");
    println!("  File: ~/.config/homework-tui/config.toml");
    println!("  Or set HOMEWORK_FILE to choose the homework file");
    println!();
    println!("KEYBINDINGS:");
    println!("  Tab / Shift+Tab         Move focus (table, name, due date, add)");
    println!("  Enter                   Next field / add homework");
    println!("  j / k / Up / Down       Select a row");
    println!("  Backspace / Delete      Delete the selected row");
    println!("  Esc                     Back to the table / clear selection");
    println!("  q / Ctrl+C              Quit");
    println!();
    println!("Due dates are MM/DD/YYYY or MM.DD.YYYY.");
}
