//! Runtime: terminal lifecycle and the event loop.
//!
//! - A dedicated OS thread blocks on `crossterm::event::read()` and forwards
//!   terminal events over a channel.
//! - The push hub forwards notifications through a subscriber callback into
//!   a second channel.
//! - Effects returned by the app run as tasks; their outcomes come back as
//!   messages.
//! - Ticking is fast (100 ms) while something on screen animates and slow
//!   (5 s) when idle.
use std::io::Stdout;
use std::thread;
use std::time::Duration;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use paydesk_api::{EventHub, PaydeskClient};
use paydesk_types::PushEvent;
use paydesk_util::PaydeskConfig;
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, warn};

use crate::app::{App, Msg};
use crate::cmd;
use crate::ui::components::Component;
use crate::ui::main_component::MainView;
use crate::ui::theme::{self, Theme};

/// Name under which the screen subscribes to the push hub.
const SUBSCRIBER: &str = "paydesk-tui";

const FAST_TICK: Duration = Duration::from_millis(100);
const IDLE_TICK: Duration = Duration::from_secs(5);

type TerminalBackend = CrosstermBackend<Stdout>;

/// Spawn a thread that blocks on terminal input and forwards events.
///
/// The thread ends when the receiver is dropped or reading fails.
fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    thread::spawn(move || {
        loop {
            match event::read() {
                Ok(event) => {
                    if sender.blocking_send(event).is_err() {
                        break;
                    }
                }
                Err(error) => {
                    warn!("Failed to read terminal event: {}", error);
                    break;
                }
            }
        }
    });
    receiver
}

/// Subscribe to the push hub and open its stream.
fn subscribe_push_events(hub: &std::sync::Arc<EventHub>, client: &PaydeskClient) -> mpsc::UnboundedReceiver<PushEvent> {
    let (sender, receiver) = mpsc::unbounded_channel();
    hub.subscribe(SUBSCRIBER, move |event: &PushEvent| {
        if sender.send(event.clone()).is_err() {
            debug!("push event arrived after the screen closed");
        }
    });
    hub.connect(client);
    receiver
}

fn setup_terminal() -> Result<Terminal<TerminalBackend>> {
    enable_raw_mode()?;
    let entered = (|| -> Result<Terminal<TerminalBackend>> {
        let mut stdout = std::io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        Ok(Terminal::new(CrosstermBackend::new(stdout))?)
    })();
    restore_on_error(entered, || {
        if let Err(error) = disable_raw_mode() {
            warn!("Failed to leave raw mode: {}", error);
        }
    })
}

/// Run `restore` when `result` is an error, then hand the result back.
fn restore_on_error<T>(result: Result<T>, restore: impl FnOnce()) -> Result<T> {
    if result.is_err() {
        restore();
    }
    result
}

fn cleanup_terminal(terminal: &mut Terminal<TerminalBackend>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<TerminalBackend>, app: &App, main_view: &mut MainView, theme: &dyn Theme) -> Result<()> {
    terminal.draw(|frame| main_view.render(frame, frame.area(), app, theme))?;
    Ok(())
}

/// Set up the terminal, run the loop and always restore the terminal.
pub async fn run_app(config: PaydeskConfig, client: PaydeskClient) -> Result<()> {
    let app = App::new(config, client.base_url())?;
    let mut terminal = setup_terminal().context("failed to prepare the terminal")?;

    let hub = EventHub::global();
    let push_receiver = subscribe_push_events(&hub, &client);
    let result = event_loop(&mut terminal, app, &client, push_receiver).await;

    hub.unsubscribe(SUBSCRIBER);
    hub.shutdown();
    cleanup_terminal(&mut terminal)?;
    result
}

fn ticker_every(period: Duration) -> time::Interval {
    let mut ticker = time::interval(period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    ticker
}

async fn event_loop(
    terminal: &mut Terminal<TerminalBackend>,
    mut app: App,
    client: &PaydeskClient,
    mut push_receiver: mpsc::UnboundedReceiver<PushEvent>,
) -> Result<()> {
    let mut input_receiver = spawn_input_thread();
    let mut main_view = MainView::new();
    let theme = theme::load();
    let mut pending: FuturesUnordered<JoinHandle<Option<Msg>>> = FuturesUnordered::new();

    let mut tick_period = IDLE_TICK;
    let mut ticker = ticker_every(tick_period);

    render(terminal, &app, &mut main_view, theme.as_ref())?;

    loop {
        let wanted = if app.is_animating() { FAST_TICK } else { IDLE_TICK };
        if wanted != tick_period {
            tick_period = wanted;
            ticker = ticker_every(tick_period);
        }

        let effects = tokio::select! {
            maybe_event = input_receiver.recv() => match maybe_event {
                Some(Event::Key(key)) => main_view.handle_key_events(&mut app, key),
                Some(Event::Resize(width, height)) => app.update(Msg::Resize(width, height)),
                Some(_) => Vec::new(),
                // Input thread gone; shut down cleanly.
                None => break,
            },

            Some(event) = push_receiver.recv() => app.update(Msg::Push(event)),

            Some(joined) = pending.next(), if !pending.is_empty() => match joined {
                Ok(Some(msg)) => app.update(msg),
                Ok(None) => Vec::new(),
                Err(error) => {
                    warn!("Effect task failed: {}", error);
                    Vec::new()
                }
            },

            _ = ticker.tick() => app.update(Msg::Tick),

            _ = signal::ctrl_c() => break,
        };

        pending.extend(cmd::spawn_effects(client, effects));
        if app.should_quit {
            break;
        }
        render(terminal, &app, &mut main_view, theme.as_ref())?;
    }

    Ok(())
}
