mod app;
mod config;
mod flash;
mod form;
mod relay;
mod theme;
mod ui;

use anyhow::Result;
use clap::Parser;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use app::App;
use flash::{BannerKind, DismissStrategy};

#[derive(clap::ValueEnum, Debug, Clone, Copy)]
enum StrategyArg {
    /// Fade the banner out before removing it
    Fade,
    /// Clear the banner outright when the timer fires
    Clear,
}

impl From<StrategyArg> for DismissStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::Fade => DismissStrategy::Fade,
            StrategyArg::Clear => DismissStrategy::Clear,
        }
    }
}

#[derive(Parser, Debug)]
#[command(name = "linepad")]
#[command(version = "0.1.0")]
#[command(about = "A terminal-friendly scratchpad for drafting invoice line items")]
struct Args {
    /// Override how banners dismiss themselves
    #[arg(short, long, value_enum)]
    strategy: Option<StrategyArg>,

    /// Override the banner dismissal delay in milliseconds
    #[arg(long)]
    delay_ms: Option<u64>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer())
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    let mut config = config::AppConfig::load().unwrap_or_default();
    if let Some(strategy) = args.strategy {
        config.dismiss_strategy = strategy.into();
    }
    if let Some(delay_ms) = args.delay_ms {
        config.dismiss_delay_ms = delay_ms;
    }

    run_tui(config).await
}

async fn run_tui(config: config::AppConfig) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Create app state
    let mut app = App::new(config);

    // Main loop
    let result = run_app(&mut terminal, &mut app).await;

    // Release the relay binding and any pending banner timers
    app.teardown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    result
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        if event::poll(std::time::Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match key.code {
                        KeyCode::Char('c')
                            if key.modifiers.contains(event::KeyModifiers::CONTROL) =>
                        {
                            return Ok(())
                        }
                        _ => {
                            // Handle key and catch any errors to prevent crashes
                            if let Err(e) = app.handle_key(key) {
                                app.flash(BannerKind::Error, format!("Error: {}", e));
                            }
                        }
                    }
                }
            }
        }

        // Periodic refresh
        let _ = app.tick();

        if app.should_quit {
            return Ok(());
        }
    }
}

fn notify(summary: &str, body: &str) -> Result<()> {
    notify_rust::Notification::new()
        .summary(summary)
        .body(body)
        .icon("accessories-text-editor")
        .show()?;
    Ok(())
}
