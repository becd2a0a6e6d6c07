//! App — event loop for the identity card.
//!
//! Architecture:
//! - `App` owns the components and `AppState` (shared read-only data for components).
//! - Terminal input arrives through a `tokio::mpsc` channel fed by a blocking reader.
//! - Clock strings and presence snapshots arrive on `watch` receivers; the
//!   App copies them into `AppState` and redraws.
//! - A frame tick runs only while the card's tilt springs are moving.
//! - Components return `Vec<Action>`; App dispatches each Action.

use std::io;
use std::time::Duration;

use ratatui::crossterm::{
    event::{
        self, DisableFocusChange, DisableMouseCapture, EnableFocusChange, EnableMouseCapture,
        Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEvent,
    },
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    widgets::Block,
    Frame, Terminal,
};
use tokio::sync::{mpsc, watch};
use tokio::time::MissedTickBehavior;
use tracing::{debug, info, warn};

use card_proto::config::Config;
use card_proto::platform;
use card_proto::poller::SnapshotReceiver;

use crate::{
    action::{Action, LinkTarget},
    app_state::AppState,
    component::Component,
    components::{card::Card, help_overlay::HelpOverlay},
    theme::C_BG,
    widgets::{status_bar, toast::ToastManager},
};

enum AppMessage {
    Event(Event),
}

/// How long the input reader waits for an event before checking whether the
/// event loop is still listening.
const INPUT_POLL: Duration = Duration::from_millis(100);

/// Blocking input reader. Forwards terminal events into `tx` and returns once
/// the receiver is gone or the terminal reports an error. Never parks in
/// `read` without a pending event, so runtime shutdown is not held up.
fn forward_events<P, R>(tx: mpsc::Sender<AppMessage>, every: Duration, mut poll: P, mut read: R)
where
    P: FnMut(Duration) -> io::Result<bool>,
    R: FnMut() -> io::Result<Event>,
{
    while !tx.is_closed() {
        match poll(every) {
            Ok(false) => continue,
            Ok(true) => {}
            Err(e) => {
                warn!("terminal poll failed: {}", e);
                break;
            }
        }
        match read() {
            Ok(ev) => {
                if tx.blocking_send(AppMessage::Event(ev)).is_err() {
                    break;
                }
            }
            Err(e) => {
                warn!("terminal read failed: {}", e);
                break;
            }
        }
    }
    debug!("input reader stopped");
}

pub struct App {
    state: AppState,
    card: Card,
    help_overlay: HelpOverlay,
    toasts: ToastManager,
    show_keys: bool,
    should_quit: bool,
    frame_interval: Duration,
    /// Full frame area from the last draw.
    last_area: Rect,
}

impl App {
    pub fn new(config: &Config) -> Self {
        Self {
            state: AppState::new(config),
            card: Card::new(&config.tilt),
            help_overlay: HelpOverlay::new(),
            toasts: ToastManager::new(),
            show_keys: true,
            should_quit: false,
            frame_interval: config.tilt.frame_interval(),
            last_area: Rect::default(),
        }
    }

    // ── Main run loop ─────────────────────────────────────────────────────────

    pub async fn run(
        mut self,
        clock_rx: watch::Receiver<String>,
        presence_rx: SnapshotReceiver,
    ) -> anyhow::Result<()> {
        debug!("run(): enabling raw mode");
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(
            stdout,
            EnterAlternateScreen,
            EnableMouseCapture,
            EnableFocusChange
        )?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;
        debug!("run(): terminal created, size={:?}", terminal.size());

        let result = self.event_loop(&mut terminal, clock_rx, presence_rx).await;

        // ── Teardown ──────────────────────────────────────────────────────────
        disable_raw_mode()?;
        execute!(
            terminal.backend_mut(),
            LeaveAlternateScreen,
            DisableMouseCapture,
            DisableFocusChange
        )?;
        terminal.show_cursor()?;

        result
    }

    async fn event_loop(
        &mut self,
        terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
        mut clock_rx: watch::Receiver<String>,
        mut presence_rx: SnapshotReceiver,
    ) -> anyhow::Result<()> {
        let (tx, mut rx) = mpsc::channel::<AppMessage>(256);

        // ── Background task: keyboard/mouse events ────────────────────────────
        tokio::task::spawn_blocking(move || {
            forward_events(tx, INPUT_POLL, event::poll, event::read);
        });

        // The producers may have published before the loop started.
        self.state.clock = clock_rx.borrow_and_update().clone();
        self.state.presence = presence_rx.borrow_and_update().clone();

        let mut frame_tick = tokio::time::interval(self.frame_interval);
        frame_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);
        let mut toast_tick = tokio::time::interval(Duration::from_millis(250));
        toast_tick.set_missed_tick_behavior(MissedTickBehavior::Skip);

        let mut clock_open = true;
        let mut presence_open = true;
        let mut needs_redraw = true;

        loop {
            if needs_redraw {
                terminal.draw(|f| self.draw(f))?;
            }
            needs_redraw = false;

            if self.should_quit {
                break;
            }

            tokio::select! {
                msg = rx.recv() => match msg {
                    Some(AppMessage::Event(ev)) => {
                        needs_redraw = self.handle_event(ev);
                    }
                    None => {
                        warn!("terminal event reader stopped");
                        self.should_quit = true;
                    }
                },
                res = clock_rx.changed(), if clock_open => match res {
                    Ok(()) => {
                        self.state.clock = clock_rx.borrow_and_update().clone();
                        needs_redraw = true;
                    }
                    Err(_) => {
                        debug!("[clock] producer closed");
                        clock_open = false;
                    }
                },
                res = presence_rx.changed(), if presence_open => match res {
                    Ok(()) => {
                        self.state.presence = presence_rx.borrow_and_update().clone();
                        self.state.presence_updated_at = Some(chrono::Local::now());
                        debug!("[presence] snapshot applied: {}", self.state.view().status.label());
                        needs_redraw = true;
                    }
                    Err(_) => {
                        warn!("[presence] poller closed");
                        self.toasts.warning("presence updates stopped");
                        presence_open = false;
                        needs_redraw = true;
                    }
                },
                _ = frame_tick.tick(), if self.card.is_animating() => {
                    self.card.animate();
                    needs_redraw = true;
                }
                _ = toast_tick.tick(), if !self.toasts.is_empty() => {
                    self.toasts.tick();
                    needs_redraw = true;
                }
            }
        }

        Ok(())
    }

    // ── Input ─────────────────────────────────────────────────────────────────

    /// Returns `true` if the event requires a redraw.
    fn handle_event(&mut self, ev: Event) -> bool {
        match ev {
            Event::Key(key) => {
                if key.kind == KeyEventKind::Release {
                    return false;
                }
                let actions = self.handle_key(key);
                for a in actions {
                    self.dispatch(a);
                }
                true
            }
            Event::Mouse(mouse) => {
                let actions = self.handle_mouse(mouse);
                for a in actions {
                    self.dispatch(a);
                }
                true
            }
            Event::FocusLost => {
                self.card.pointer_leave();
                true
            }
            Event::Resize(_, _) => true,
            _ => false,
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> Vec<Action> {
        if key.code == KeyCode::Char('c') && key.modifiers == KeyModifiers::CONTROL {
            return vec![Action::Quit];
        }

        // Help overlay captures all keys when visible
        if self.help_overlay.visible {
            return self.help_overlay.handle_key(key, &self.state);
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => vec![Action::Quit],
            KeyCode::Char('?') => vec![Action::ToggleHelp],
            KeyCode::Char('K') => vec![Action::ToggleKeys],
            KeyCode::Char('p') => vec![Action::OpenLink(LinkTarget::Portfolio)],
            KeyCode::Char('d') => vec![Action::OpenLink(LinkTarget::Profile)],
            KeyCode::Char('r') => vec![Action::ResetTilt],
            _ => self.card.handle_key(key, &self.state),
        }
    }

    fn handle_mouse(&mut self, mouse: MouseEvent) -> Vec<Action> {
        if self.help_overlay.visible {
            return vec![];
        }
        self.card.handle_mouse(mouse, self.last_area, &self.state)
    }

    // ── Dispatch ──────────────────────────────────────────────────────────────

    fn dispatch(&mut self, action: Action) {
        match action {
            Action::Quit => {
                info!("quit requested");
                self.should_quit = true;
            }
            Action::ToggleKeys => {
                self.show_keys = !self.show_keys;
            }
            Action::ToggleHelp => {
                self.help_overlay.on_action(&action, &self.state);
            }
            Action::ResetTilt => {
                self.card.on_action(&action, &self.state);
                self.toasts.info("tilt reset");
            }
            Action::OpenLink(target) => {
                let url = self.link_url(target).to_string();
                match platform::open_url(&url) {
                    Ok(()) => {
                        info!("[link] opened {}", url);
                        self.toasts.success(format!("opening {url}"));
                    }
                    Err(e) => {
                        warn!("[link] failed to open {}: {}", url, e);
                        self.toasts.error(format!("could not open link: {e}"));
                    }
                }
            }
        }
    }

    fn link_url(&self, target: LinkTarget) -> &str {
        match target {
            LinkTarget::Portfolio => &self.state.profile.portfolio_url,
            LinkTarget::Profile => &self.state.profile_url,
        }
    }

    // ── Draw ──────────────────────────────────────────────────────────────────

    fn draw(&mut self, frame: &mut Frame) {
        let area = frame.area();
        self.last_area = area;
        frame.render_widget(Block::default().style(Style::default().bg(C_BG)), area);

        let (main, keys) = if self.show_keys && area.height > 1 {
            let rows = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Min(0), Constraint::Length(1)])
                .split(area);
            (rows[0], Some(rows[1]))
        } else {
            (area, None)
        };

        self.card.draw(frame, main, &self.state);
        if let Some(keys) = keys {
            status_bar::draw_keys_bar(frame, keys, &self.state);
        }
        self.help_overlay.draw(frame, area, &self.state);
        self.toasts.draw(frame, area);
    }
}
