mod app;
mod clock;
mod domain;
mod input;
mod logging;
mod notifications;
mod persistence;
mod report;
mod ticker;
mod ui;

use anyhow::Result;
use app::AppState;
use clap::{Parser, Subcommand};
use clock::SystemClock;
use crossterm::{
    event::{self, DisableFocusChange, EnableFocusChange, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use notifications::TerminalNotifier;
use persistence::{ensure_data_dir, get_data_dir, init_local_data_dir, log_file, Store};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "pomotask")]
#[command(about = "A terminal Pomodoro timer with a task list and session log", long_about = None)]
struct Cli {
    /// Data directory. Defaults to the nearest .pomotask, then ~/.pomotask
    #[arg(long, global = true)]
    dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .pomotask directory in the current directory
    Init,
    /// Print the current timer state and today's counts
    Status,
    /// Generate a daily report with statistics
    Report {
        /// Date to generate report for (YYYY-MM-DD format). Defaults to today.
        #[arg(short, long)]
        date: Option<String>,
        /// Output file path. Defaults to <data dir>/report-YYYY-MM-DD.md
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let data_dir = init_local_data_dir()?;
            println!("Initialized pomotask directory: {}", data_dir.display());
            println!();
            println!("Pomotask will now keep its state in this directory.");
            println!("Run 'pomotask' to start.");
            Ok(())
        }
        Some(Commands::Status) => {
            let data_dir = get_data_dir(cli.dir.as_deref())?;
            print!("{}", report::status_from_store(&Store::new(data_dir)));
            Ok(())
        }
        Some(Commands::Report { date, output }) => {
            let report_date = date
                .map(|date_str| {
                    chrono::NaiveDate::parse_from_str(&date_str, "%Y-%m-%d")
                        .map_err(|e| anyhow::anyhow!("Invalid date format. Use YYYY-MM-DD: {}", e))
                })
                .transpose()?;

            let data_dir = ensure_data_dir(cli.dir.as_deref())?;
            let report_path = report::generate_report(&Store::new(data_dir), report_date, output)?;
            println!("Report generated: {}", report_path.display());
            Ok(())
        }
        None => run_tui(cli.dir),
    }
}

fn run_tui(dir: Option<PathBuf>) -> Result<()> {
    let data_dir = ensure_data_dir(dir.as_deref())?;
    logging::init(&log_file(&data_dir))?;
    info!(dir = %data_dir.display(), "starting");

    let mut app = AppState::new(
        Store::new(data_dir),
        Box::new(SystemClock),
        Box::new(TerminalNotifier),
    );

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableFocusChange)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), DisableFocusChange, LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = &result {
        error!(error = %err, "event loop failed");
        eprintln!("Error: {}", err);
    }
    info!("exiting");

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            match event::read()? {
                // Only process key press events (ignore key release)
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    if input::handle_key(app, key)? {
                        return Ok(());
                    }
                }
                // Time may have jumped while the terminal was in the background
                Event::FocusGained => app.on_focus_gained(),
                _ => {}
            }
        }

        app.tick();
    }
}
