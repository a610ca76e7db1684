mod app;
mod audio;
mod clock;
mod domain;
mod input;
mod notifications;
mod persistence;
mod ticker;
mod ui;

use anyhow::Result;
use app::AppState;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use persistence::{ensure_gridpad_dir, get_gridpad_dir, init_local_gridpad};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "gridpad")]
#[command(about = "A terminal widget dashboard: sticky notes, clocks with alarms, and an auto-clicker panel", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Initialize a local .gridpad directory in the current directory
    Init,
    /// Export the dashboard and ringtones to a zip archive
    Export {
        /// Archive path. Defaults to ./gridpad-data.zip
        #[arg(short, long)]
        output: Option<String>,
    },
    /// Import a previously exported archive, replacing current data
    Import {
        /// Archive to import
        input: String,
    },
}

fn main() -> Result<()> {
    simple_file_logger::init_logger!("gridpad").expect("couldn't initialize logger");

    let cli = Cli::parse();

    match cli.command {
        Some(Commands::Init) => {
            let gridpad_dir = init_local_gridpad()?;
            println!("Initialized gridpad directory: {}", gridpad_dir.display());
            println!();
            println!("Gridpad will now use this local directory for dashboard storage.");
            println!("Run 'gridpad' to open the dashboard.");
            Ok(())
        }
        Some(Commands::Export { output }) => {
            let data_dir = ensure_gridpad_dir()?;
            let dst = output
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from("gridpad-data.zip"));

            persistence::export_data(&data_dir, &dst)?;
            println!("Exported dashboard to {}", dst.display());
            Ok(())
        }
        Some(Commands::Import { input }) => {
            let data_dir = ensure_gridpad_dir()?;
            let src = PathBuf::from(input);

            persistence::import_data(&src, &data_dir)?;
            println!("Imported dashboard into {}", data_dir.display());
            Ok(())
        }
        None => run_tui(),
    }
}

fn run_tui() -> Result<()> {
    // Ensure gridpad directory exists
    ensure_gridpad_dir()?;

    let gridpad_dir = get_gridpad_dir()?;
    eprintln!("Using gridpad directory: {}", gridpad_dir.display());

    let mut app = AppState::load()?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run app
    let result = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    // Silence any looping ringtone
    app.player.stop();

    // Save on exit
    if let Err(e) = app.save() {
        eprintln!("Error saving dashboard: {}", e);
    }

    if let Err(err) = result {
        eprintln!("Error: {}", err);
    }

    Ok(())
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<io::Stdout>>, app: &mut AppState) -> Result<()> {
    let tick_rate = ticker::tick_duration();

    loop {
        // Render
        terminal.draw(|f| ui::render(f, app))?;

        // Handle events with timeout for ticking
        if event::poll(tick_rate)? {
            if let Event::Key(key) = event::read()? {
                // Only process key press events (ignore key release)
                if key.kind == KeyEventKind::Press {
                    let should_quit = input::handle_key(app, key)?;
                    if should_quit {
                        return Ok(());
                    }
                }
            }
        }

        // Advance alarms and timers
        app.tick();

        // Autosave if needed
        if app.needs_save {
            app.save()?;
        }
    }
}
