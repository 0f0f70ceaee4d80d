//! Interactive dashboard console.
//!
//! Wires the [`App`] state to a crossterm terminal: fetch results arrive on a
//! channel, the live activity stream runs in its own task, and the screen is
//! redrawn every tick.

use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use crossterm::event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use katalyst_client::{spawn_live_feed, Config, KatalystClient, Notifier};
use ratatui::backend::CrosstermBackend;
use ratatui::layout::Rect;
use ratatui::Terminal;
use tokio::sync::mpsc;

use crate::app::{App, ConsoleNotifier};
use crate::render;

fn setup_terminal() -> io::Result<Terminal<CrosstermBackend<Stdout>>> {
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    Terminal::new(backend)
}

fn restore_terminal(terminal: &mut Terminal<CrosstermBackend<Stdout>>) -> io::Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

/// Run the dashboard console until the user quits.
pub async fn run(config: Config) -> anyhow::Result<()> {
    use std::io::IsTerminal;
    if !io::stdin().is_terminal() || !io::stdout().is_terminal() {
        anyhow::bail!("The dashboard console requires a terminal (TTY). Use a subcommand instead.");
    }

    let client = KatalystClient::new(&config)?;
    let (tx, mut rx) = mpsc::unbounded_channel();

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen, DisableMouseCapture);
        original_hook(panic_info);
    }));

    let mut terminal = setup_terminal()?;
    let mut app = App::new(config, client, tx.clone());

    let notifier: Option<Arc<dyn Notifier>> = app
        .config
        .notifications
        .then(|| Arc::new(ConsoleNotifier::new(tx, app.config.bell)) as Arc<dyn Notifier>);
    let _feed = spawn_live_feed(app.client().clone(), app.feed.clone(), notifier);

    let size = terminal.size()?;
    app.on_resize(Rect::new(0, 0, size.width, size.height));
    app.refresh();
    tracing::info!(api = %app.client().base_url(), "dashboard console started");

    let tick_rate = Duration::from_millis(100);
    let result: anyhow::Result<()> = loop {
        while let Ok(update) = rx.try_recv() {
            app.apply(update);
        }

        let feed = app.feed.read().await.clone();
        if let Err(e) = terminal.draw(|frame| render::draw(frame, &app, &feed)) {
            break Err(e.into());
        }

        match event::poll(tick_rate) {
            Ok(true) => {}
            Ok(false) => continue,
            Err(e) => break Err(e.into()),
        }
        match event::read() {
            Ok(Event::Key(key)) if key.kind == KeyEventKind::Press => {
                if app.handle_key(key.code, key.modifiers) {
                    break Ok(());
                }
            }
            Ok(Event::Mouse(mouse)) => app.handle_mouse(mouse),
            Ok(Event::Resize(width, height)) => app.on_resize(Rect::new(0, 0, width, height)),
            Ok(_) => {}
            Err(e) => break Err(e.into()),
        }
    };

    restore_terminal(&mut terminal)?;
    tracing::info!("dashboard console closed");
    result
}
