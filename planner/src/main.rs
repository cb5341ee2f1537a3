//! Sprint planning board TUI application.
//!
//! A vim-style terminal board that turns requirements into epics, user
//! stories and tasks with the help of a language model.
//!
//! # Headless Mode
//!
//! Run with `--headless` for a line-oriented interface on stdin/stdout:
//!
//! ```bash
//! printf 'Customers can pay by card\n#epic 1\n#show\n' | cargo run -p planner -- --headless
//! ```

mod app;
mod editor;
mod events;
mod headless;
mod logging;
mod ui;

use claude::Claude;
use crossterm::{
    event,
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use planner_core::{Board, BoardConfig, CompletionBackend};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io::{self, stdout};
use std::time::Duration;

use app::App;
use events::{handle_event, EventResult};
use logging::LogTarget;
use ui::render::render;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Parse command line arguments
    let args: Vec<String> = std::env::args().collect();

    // Check for --help
    if args.iter().any(|a| a == "--help" || a == "-h") {
        print_help();
        return Ok(());
    }

    // Check for API key
    if std::env::var("ANTHROPIC_API_KEY").is_err() {
        eprintln!("Error: ANTHROPIC_API_KEY environment variable not set.");
        eprintln!("Please set it in .env file or with: export ANTHROPIC_API_KEY=your_key_here");
        std::process::exit(1);
    }

    let headless = args.iter().any(|a| a == "--headless");
    logging::init(if headless {
        LogTarget::Stderr
    } else {
        LogTarget::default_file()
    })?;

    let config = BoardConfig::from_env()?;
    let client = Claude::from_env()?;
    tracing::info!(model = %config.model, headless, "starting planning board");
    let board = Board::new(client, config);

    // Check for --headless mode
    if headless {
        return headless::run_headless(board).await.map_err(|e| e.into());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, App::new(board)).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        tracing::error!(error = %e, "terminal loop failed");
        eprintln!("Error: {e}");
    }

    Ok(())
}

async fn run_app<T, B>(terminal: &mut Terminal<T>, mut app: App<B>) -> io::Result<()>
where
    T: ratatui::backend::Backend,
    B: CompletionBackend,
{
    loop {
        // Render
        terminal.draw(|f| render(f, &app))?;

        // Process any pending generation; the status line already says so
        if app.has_pending() {
            if let Some(intent) = app.take_pending() {
                app.run_intent(intent).await;
            }
            continue;
        }

        if event::poll(Duration::from_millis(100))? {
            let ev = event::read()?;
            if handle_event(&mut app, ev) == EventResult::Quit {
                return Ok(());
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn print_help() {
    println!("Agile Sprint Planning board");
    println!();
    println!("USAGE:");
    println!("    planner [OPTIONS]");
    println!();
    println!("OPTIONS:");
    println!("    -h, --help        Print this help");
    println!("    --headless        Line-oriented mode on stdin/stdout (type #help)");
    println!();
    println!("ENVIRONMENT:");
    println!("    ANTHROPIC_API_KEY     API key (required)");
    println!("    ANTHROPIC_BASE_URL    Override the API endpoint");
    println!("    PLANNER_MODEL         Model id (default {})", planner_core::DEFAULT_MODEL);
    println!("    PLANNER_MAX_TOKENS    Tokens per completion (default 2048)");
    println!("    PLANNER_TEMPERATURE   Sampling temperature (default 0.7)");
    println!("    PLANNER_TIMEOUT_SECS  Per-call timeout in seconds (default 90)");
    println!("    PLANNER_LOG           Log filter, e.g. debug (logs go to planner.log)");
    println!();
    println!("KEYS:");
    println!("    a add   g generate   Enter details   d delete   s select   ? help   q quit");
}
