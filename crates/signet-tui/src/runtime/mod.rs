//! TUI runtime - owns terminal, runs event loop, executes effects.
//!
//! This is the "Elm runtime" boundary: all side effects happen here.
//! The reducer stays pure and produces effects; this module executes them.
//!
//! ## Inbox Pattern
//!
//! - Spawned tasks send `UiEvent`s directly to `inbox_tx`
//! - Runtime drains `inbox_rx` each frame to collect results

mod handlers;

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use crossterm::event;
use signet_core::flow::ViewState;
use signet_core::session::SessionFlag;
use signet_core::store::UserStore;
use tokio::sync::mpsc;

use crate::common::{TaskCompleted, TaskId, TaskKind, TaskStarted};
use crate::effects::UiEffect;
use crate::events::UiEvent;
use crate::state::AppState;
use crate::{render, terminal, update};

/// Sender for the runtime's event inbox.
type UiEventSender = mpsc::UnboundedSender<UiEvent>;

/// Receiver for the runtime's event inbox.
type UiEventReceiver = mpsc::UnboundedReceiver<UiEvent>;

/// Tick interval while a store task is running (spinner animation).
pub const FRAME_DURATION: Duration = Duration::from_millis(80);

/// Poll duration when idle.
pub const IDLE_POLL_DURATION: Duration = Duration::from_millis(250);

/// How long quitting waits for in-flight store tasks.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(2);

/// Full-screen TUI runtime.
///
/// Owns the terminal and state. Runs the event loop and executes effects.
/// Terminal state is guaranteed to be restored on drop or panic.
pub struct TuiRuntime {
    terminal: terminal::ScreenTerminal,
    pub state: AppState,
    users: Arc<dyn UserStore>,
    session: SessionFlag,
    /// Inbox sender - spawned tasks send events here.
    inbox_tx: UiEventSender,
    /// Inbox receiver - runtime drains this each frame.
    inbox_rx: UiEventReceiver,
    last_tick: Instant,
}

impl TuiRuntime {
    /// Creates a new TUI runtime starting from the restored view state.
    ///
    /// # Errors
    /// Returns an error if the terminal cannot be set up.
    pub fn new(users: Arc<dyn UserStore>, session: SessionFlag, view: ViewState) -> Result<Self> {
        terminal::restore_on_panic();
        let terminal = terminal::enter()
            .inspect_err(|_| {
                let _ = terminal::leave();
            })
            .context("Failed to set up terminal")?;
        let (inbox_tx, inbox_rx) = mpsc::unbounded_channel();

        Ok(Self {
            terminal,
            state: AppState::new(view),
            users,
            session,
            inbox_tx,
            inbox_rx,
            last_tick: Instant::now(),
        })
    }

    /// Runs the main event loop.
    ///
    /// # Errors
    /// Returns an error if terminal I/O fails.
    pub fn run(&mut self) -> Result<()> {
        let mut dirty = true; // Start dirty to ensure initial render

        while !self.state.tui.should_quit {
            let mut events = self.collect_events()?;

            // Prepend Frame event with current terminal size
            let size = self.terminal.size()?;
            events.insert(
                0,
                UiEvent::Frame {
                    width: size.width,
                    height: size.height,
                },
            );

            for event in events {
                // Frame alone never changes what is drawn
                if !matches!(&event, UiEvent::Frame { .. }) {
                    dirty = true;
                }
                let effects = update::update(&mut self.state, event);
                self.execute_effects(effects);
            }

            if dirty {
                self.terminal.draw(|frame| {
                    render::render(&self.state, frame);
                })?;
                dirty = false;
            }
        }

        self.drain_pending_tasks();
        Ok(())
    }

    /// Lets a pending logout or sign-in finish writing the session flag
    /// before the process exits.
    fn drain_pending_tasks(&mut self) {
        let deadline = Instant::now() + SHUTDOWN_GRACE;
        while self.state.tui.tasks.is_any_running() && Instant::now() < deadline {
            match self.inbox_rx.try_recv() {
                Ok(event) => {
                    // Effects are dropped: the UI is shutting down.
                    let _ = update::update(&mut self.state, event);
                }
                Err(_) => std::thread::sleep(Duration::from_millis(10)),
            }
        }
        if self.state.tui.tasks.is_any_running() {
            tracing::warn!("Exiting with a store task still running");
        }
    }

    // ========================================================================
    // Event Collection
    // ========================================================================

    /// Collects events from the inbox and the terminal.
    fn collect_events(&mut self) -> Result<Vec<UiEvent>> {
        let mut events = Vec::new();

        let tick_interval = if self.state.tui.tasks.is_any_running() {
            FRAME_DURATION
        } else {
            IDLE_POLL_DURATION
        };

        while let Ok(ev) = self.inbox_rx.try_recv() {
            events.push(ev);
        }

        let time_until_tick = tick_interval.saturating_sub(self.last_tick.elapsed());

        // Don't delay already-collected events.
        let poll_duration = if events.is_empty() {
            time_until_tick
        } else {
            Duration::ZERO
        };

        if event::poll(poll_duration)? {
            events.push(UiEvent::Terminal(event::read()?));
            while event::poll(Duration::ZERO)? {
                events.push(UiEvent::Terminal(event::read()?));
            }
        }

        if self.last_tick.elapsed() >= tick_interval {
            events.push(UiEvent::Tick);
            self.last_tick = Instant::now();
        }

        Ok(events)
    }

    // ========================================================================
    // Effect Dispatch
    // ========================================================================

    fn execute_effects(&mut self, effects: Vec<UiEffect>) {
        for effect in effects {
            self.execute_effect(effect);
        }
    }

    /// Spawns an async task with a uniform TaskStarted/TaskCompleted lifecycle.
    fn spawn_task<F, Fut>(&self, kind: TaskKind, id: TaskId, f: F)
    where
        F: FnOnce() -> Fut + Send + 'static,
        Fut: Future<Output = UiEvent> + Send + 'static,
    {
        let tx = self.inbox_tx.clone();
        let _ = tx.send(UiEvent::TaskStarted {
            kind,
            started: TaskStarted { id },
        });
        tokio::spawn(async move {
            let inner = f().await;
            let completed = TaskCompleted {
                id,
                result: Box::new(inner),
            };
            let _ = tx.send(UiEvent::TaskCompleted { kind, completed });
        });
    }

    fn execute_effect(&mut self, effect: UiEffect) {
        match effect {
            UiEffect::Quit => {
                self.state.tui.should_quit = true;
            }
            UiEffect::Submit { task, request } => {
                let users = Arc::clone(&self.users);
                let session = self.session.clone();
                self.spawn_task(TaskKind::Submit, task, move || {
                    handlers::submit(users, session, request)
                });
            }
            UiEffect::ClearSession { task } => {
                let session = self.session.clone();
                self.spawn_task(TaskKind::Logout, task, move || {
                    handlers::clear_session(session)
                });
            }
        }
    }
}

impl Drop for TuiRuntime {
    fn drop(&mut self) {
        let _ = terminal::leave();
    }
}
