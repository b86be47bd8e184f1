//! Runtime: unified event loop and input routing for the uploader UI.
//!
//! Responsibilities
//! - Own the terminal lifecycle (enter/leave alternate screen, raw mode).
//! - Route keys and mouse events to the main view and execute returned `Effect`s.
//! - Collect background results (directory listings, file inspection,
//!   deferred upload acknowledgements) and host callback events.
//!
//! Ticking strategy
//! - Fast interval (100 ms) while effects are queued or work is pending; long
//!   interval (5 s) when idle.
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use asset_uploader_types::{Effect, ExecOutcome, Msg};
use crossterm::event::MouseEventKind;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use futures_util::{StreamExt, stream::FuturesUnordered};
use rat_focus::FocusBuilder;
use ratatui::{Terminal, prelude::*};
use tokio::task::JoinHandle;
use tokio::{
    signal,
    sync::mpsc,
    time::{self, MissedTickBehavior},
};
use tracing::{debug, info, warn};

use crate::app::App;
use crate::cmd;
use crate::host::HostEvent;
use crate::ui::components::component::Component;
use crate::ui::main_component::MainView;

/// Spawn a task that polls terminal input and forwards `crossterm` events
/// over a Tokio channel.
async fn spawn_input_thread() -> mpsc::Receiver<Event> {
    let (sender, receiver) = mpsc::channel(500);
    let mut last_mouse_event: Option<Instant> = Some(Instant::now());

    tokio::spawn(async move {
        let sixteen_ms = Duration::from_millis(16);
        loop {
            if event::poll(sixteen_ms).is_ok_and(|ready| ready) {
                match event::read() {
                    Ok(event) => {
                        // Throttle mouse moves events to once per 16 ms.
                        let is_mouse_move = event.as_mouse_event().is_some_and(|e| e.kind == MouseEventKind::Moved);
                        let should_send = !is_mouse_move || last_mouse_event.is_some_and(|last| last.elapsed() >= sixteen_ms);
                        if is_mouse_move && should_send {
                            last_mouse_event = Some(Instant::now());
                        }

                        if should_send && let Err(e) = sender.send(event).await {
                            warn!("Failed to send event: {}", e);
                            break;
                        }
                    }
                    Err(e) => {
                        warn!("Failed to read event: {}", e);
                        break;
                    }
                }
            } else {
                tokio::task::yield_now().await;
            }
        }
    });
    receiver
}

/// Put the terminal into raw mode and enter the alternate screen.
fn setup_terminal() -> Result<Terminal<CrosstermBackend<std::io::Stdout>>> {
    enable_raw_mode().context("enable raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture).context("enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let terminal = Terminal::new(backend)?;
    Ok(terminal)
}

/// Restore terminal settings and leave the alternate screen.
fn cleanup_terminal(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>) -> Result<()> {
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    Ok(())
}

fn render(terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>, app: &mut App, main_view: &mut MainView) -> Result<()> {
    // Rebuild focus just before rendering so structure changes are reflected
    let old_focus = std::mem::take(&mut app.focus);
    app.focus = FocusBuilder::rebuild_for(app, Some(old_focus));
    if app.focus.focused().is_none() {
        main_view.restore_focus(app);
    }
    terminal.draw(|frame| main_view.render(frame, frame.area(), app))?;
    Ok(())
}

fn handle_input_event(app: &mut App, main_view: &mut MainView, input_event: Event) -> Vec<Effect> {
    match input_event {
        Event::Key(key_event) => main_view.handle_key_events(app, key_event),
        Event::Mouse(mouse_event) => main_view.handle_mouse_events(app, mouse_event),
        Event::Resize(width, height) => main_view.handle_message(app, Msg::Resize(width, height)),
        Event::FocusGained | Event::FocusLost | Event::Paste(_) => Vec::new(),
    }
}

/// Entry point for the UI runtime: sets up the terminal, runs the event loop
/// until Ctrl+C, and restores the terminal on exit.
///
/// `host_events` carries what the host page's callbacks observed; it is
/// drained into the activity panel.
pub async fn run_app(mut app: App, mut host_events: mpsc::UnboundedReceiver<HostEvent>) -> Result<()> {
    let mut input_receiver = spawn_input_thread().await;
    let mut main_view = MainView::for_host_page(&app);
    let mut terminal = setup_terminal()?;
    info!(uploaders = app.uploaders.len(), "uploader page started");

    let mut pending_execs: FuturesUnordered<JoinHandle<ExecOutcome>> = FuturesUnordered::new();
    let mut effects: Vec<Effect> = Vec::with_capacity(5);
    let mut host_events_open = true;

    let fast_interval = Duration::from_millis(100);
    let idle_interval = Duration::from_millis(5000);
    let mut current_interval = idle_interval;
    let mut ticker = time::interval(current_interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    render(&mut terminal, &mut app, &mut main_view)?;

    // Track the last known terminal size to synthesize Resize messages when
    // some terminals fail to emit them reliably.
    let mut last_size: Option<(u16, u16)> = crossterm::terminal::size().ok();

    loop {
        let needs_fast_ticks = !effects.is_empty() || !pending_execs.is_empty();
        let target_interval = if needs_fast_ticks { fast_interval } else { idle_interval };
        if target_interval != current_interval {
            current_interval = target_interval;
            ticker = time::interval(current_interval);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        }
        let mut needs_render = false;
        tokio::select! {
            // Terminal input events
            maybe_event = input_receiver.recv() => {
                if let Some(event) = maybe_event {
                    if let Event::Key(key_event) = event
                        && key_event.code == KeyCode::Char('c') && key_event.modifiers.contains(KeyModifiers::CONTROL) {
                            break;
                        }
                    effects.extend(handle_input_event(&mut app, &mut main_view, event));
                } else {
                    // Input channel closed; break out to shut down cleanly.
                    break;
                }
                needs_render = true;
            }

            _ = ticker.tick() => {
                effects.extend(main_view.handle_message(&mut app, Msg::Tick));
                needs_render = !effects.is_empty();
                if !effects.is_empty() {
                    // move effects out of their Vec to avoid processing new effects while processing current ones
                    let mut effects_to_process = Vec::with_capacity(effects.len());
                    effects_to_process.append(&mut effects);

                    handle_navigation_effects(&mut app, &mut main_view, &mut effects_to_process, &mut effects);
                    pending_execs.extend(cmd::run_from_effects(effects_to_process));
                }
            }

            Some(joined) = pending_execs.next(), if !pending_execs.is_empty() => {
                let outcome = joined.unwrap_or_else(|error| ExecOutcome::Log(format!("Execution task failed: {error}")));
                effects.extend(main_view.handle_message(&mut app, Msg::ExecCompleted(Box::new(outcome))));
                needs_render = true;
            }

            maybe_host_event = host_events.recv(), if host_events_open => {
                match maybe_host_event {
                    Some(event) => {
                        app.apply_host_event(event);
                        needs_render = true;
                    }
                    None => {
                        debug!("host event channel closed");
                        host_events_open = false;
                    }
                }
            }
            // Handle Ctrl+C
            _ = signal::ctrl_c() => { break; }
        }

        // Deferred acknowledgements returned by upload callbacks in this pass
        pending_execs.extend(cmd::spawn_pending_uploads(&mut app));

        // Fallback: detect terminal size changes even if no explicit Resize
        // event was received.
        if let Ok((w, h)) = crossterm::terminal::size()
            && last_size != Some((w, h))
        {
            last_size = Some((w, h));
            needs_render = true;
        }

        if needs_render {
            render(&mut terminal, &mut app, &mut main_view)?;
        }
    }

    info!("uploader page closed");
    cleanup_terminal(&mut terminal)?;
    Ok(())
}

fn handle_navigation_effects(app: &mut App, main_view: &mut MainView, effects: &mut Vec<Effect>, queued_effects: &mut Vec<Effect>) {
    let navigation_effects = effects
        .extract_if(0.., |effect| matches!(effect, Effect::ShowModal(_) | Effect::CloseModal))
        .collect::<Vec<Effect>>();

    for effect in navigation_effects {
        match effect {
            Effect::ShowModal(modal) => {
                main_view.set_open_modal_kind(app, Some(modal));
                if let Some((view, _)) = main_view.modal_view.as_mut() {
                    queued_effects.extend(view.on_route_enter(app));
                }
            }
            Effect::CloseModal => {
                main_view.set_open_modal_kind(app, None);
                app.focus = FocusBuilder::build_for(app);
                main_view.restore_focus(app);
            }
            _ => {}
        }
    }
}
