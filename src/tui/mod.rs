pub mod app;
pub mod input;
mod message;
mod ui;

use crate::config::Config;
use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::time::Duration;

pub use app::{App, ModalState, Tab};
pub use message::Message;

pub async fn run(config: Config) -> Result<()> {
    if !std::io::IsTerminal::is_terminal(&io::stdout()) {
        anyhow::bail!("jira-dashboard requires an interactive terminal");
    }

    let tick_rate = Duration::from_millis(config.ui.tick_ms.max(16));
    // Build the app before touching the terminal so config errors print normally
    let mut app = App::new(config)?;

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // UI shows immediately with loading state
    app.start_loading();

    let result = run_app(&mut terminal, &mut app, tick_rate).await;

    // Destroy the rendered graph before leaving
    app.graph.release();

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
    tick_rate: Duration,
) -> Result<()> {
    let mut last_tick = std::time::Instant::now();
    let mut input_state = input::InputState::new();

    loop {
        terminal.draw(|f| ui::draw(f, app))?;

        let timeout = tick_rate.saturating_sub(last_tick.elapsed());

        if event::poll(timeout)? {
            let msg = match event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    input::dispatch(app, &mut input_state, key)
                }
                Event::Mouse(mouse) => input::dispatch_mouse(mouse),
                _ => Message::None,
            };
            if app.update(msg)? {
                return Ok(());
            }
        }

        if input_state.has_timed_out() {
            input_state.clear();
        }

        if last_tick.elapsed() >= tick_rate {
            app.tick_spinner();
            app.poll_loads();
            last_tick = std::time::Instant::now();
        }

        // Let spawned fetches make progress between frames
        tokio::task::yield_now().await;
    }
}
