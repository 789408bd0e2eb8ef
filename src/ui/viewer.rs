use std::io::{self, Stdout};
use std::sync::Arc;
use std::time::Duration;

use arboard::Clipboard;
use crossterm::event::{Event, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Layout},
    style::Color,
};
use tracing::{info, warn};

use crate::models::WindowType;
use crate::remote::HttpRemote;
use crate::settings::Settings;
use crate::ui::board;
use crate::ui::state::{ApplicationState, Effect, MessageType};
use crate::ui::windows::{help::HelpWindow, prompt::PromptWindow, time_nav::TimeNavWindow};
use crate::worker::Worker;

/// Terminal front end: owns the screen, the request worker and the state.
pub struct Viewer {
    state: ApplicationState,
    terminal: Terminal<CrosstermBackend<Stdout>>,
    worker: Worker,
    exit_remote: HttpRemote,
    clipboard: Option<Clipboard>,
}

impl Viewer {
    pub fn new(settings: Settings) -> eyre::Result<Self> {
        let remote = HttpRemote::new(
            &settings.server_url,
            Duration::from_secs(settings.request_timeout_secs),
        )?;
        let exit_remote =
            remote.with_request_timeout(Duration::from_secs(settings.exit_timeout_secs));

        let backend = CrosstermBackend::new(io::stdout());
        let terminal = Terminal::new(backend)?;

        Ok(Self {
            state: ApplicationState::new(settings),
            terminal,
            worker: Worker::new(Arc::new(remote)),
            exit_remote,
            clipboard: None,
        })
    }

    /// Run the main application loop
    pub fn run(&mut self, zoom_index: Option<usize>) -> eyre::Result<()> {
        crossterm::terminal::enable_raw_mode()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::EnterAlternateScreen)?;

        self.terminal.clear()?;
        self.terminal.hide_cursor()?;

        let result = self.event_loop(zoom_index);

        self.terminal.clear()?;
        self.terminal.show_cursor()?;
        crossterm::execute!(io::stdout(), crossterm::terminal::LeaveAlternateScreen)?;
        crossterm::terminal::disable_raw_mode()?;

        result
    }

    fn event_loop(&mut self, zoom_index: Option<usize>) -> eyre::Result<()> {
        if let Ok((width, _)) = crossterm::terminal::size() {
            self.state.controller.set_text_width(width.saturating_sub(2) as usize);
        }
        self.state.start(zoom_index);
        info!(server = %self.exit_remote.base_url(), "Viewer started");

        loop {
            for completion in self.worker.poll() {
                self.state.handle_completion(completion);
            }
            self.worker.dispatch_all(self.state.take_requests());

            if self.state.ui_state.message_expired() {
                self.state.ui_state.clear_message();
            }

            {
                let state = &self.state;
                self.terminal.draw(|f| Self::render_static(f, state))?;
            }

            // Poll quickly while responses are outstanding so they show up promptly.
            let poll_timeout = if self.worker.in_flight() > 0 {
                Duration::from_millis(50)
            } else {
                match self.state.ui_state.message_time {
                    Some(t) => Duration::from_secs(3)
                        .saturating_sub(t.elapsed())
                        .max(Duration::from_millis(100)),
                    None => Duration::from_secs(60),
                }
            };

            if !crossterm::event::poll(poll_timeout)? {
                continue;
            }

            match crossterm::event::read()? {
                Event::Key(key) if key.kind == KeyEventKind::Press => {
                    match self.state.handle_key(key, &self.exit_remote) {
                        Some(Effect::Quit) => break,
                        Some(Effect::CopyToClipboard(url)) => self.copy_to_clipboard(url),
                        None => {}
                    }
                }
                Event::Resize(width, _) => {
                    self.state.controller.set_text_width(width.saturating_sub(2) as usize)
                }
                _ => {}
            }
        }

        info!("Viewer stopped");
        Ok(())
    }

    fn copy_to_clipboard(&mut self, text: String) {
        if self.clipboard.is_none() {
            match Clipboard::new() {
                Ok(clipboard) => self.clipboard = Some(clipboard),
                Err(err) => {
                    warn!(error = %err, "Clipboard unavailable");
                    self.state
                        .ui_state
                        .set_message(format!("Clipboard unavailable: {err}"), MessageType::Error);
                    return;
                }
            }
        }
        let Some(clipboard) = self.clipboard.as_mut() else {
            return;
        };
        match clipboard.set_text(text.clone()) {
            Ok(()) => self
                .state
                .ui_state
                .set_message(format!("Copied {text}"), MessageType::Info),
            Err(err) => self
                .state
                .ui_state
                .set_message(format!("Copy failed: {err}"), MessageType::Error),
        }
    }

    fn render_static(frame: &mut Frame, state: &ApplicationState) {
        let [nav_area, body_area, status_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .areas(frame.area());

        board::render_nav_strip(frame, nav_area, &state.controller);
        match &state.zoom {
            Some(zoom) => board::render_zoom(frame, body_area, zoom),
            None => board::render_gallery(
                frame,
                body_area,
                state.controller.gallery(),
                state.ui_state.selected,
            ),
        }

        let message = state.ui_state.message.as_deref().map(|text| {
            let color = match state.ui_state.message_type {
                MessageType::Info => Color::Blue,
                MessageType::Warning => Color::Yellow,
                MessageType::Error => Color::Red,
            };
            (text, color)
        });
        board::render_status(frame, status_area, &state.controller, message);

        let area = frame.area();
        match state.ui_state.active_window {
            WindowType::Help => HelpWindow::render(frame, area, state.ui_state.help_scroll_offset),
            WindowType::TimeNav => TimeNavWindow::render(
                frame,
                area,
                &state.time_nav_entries(),
                state.ui_state.time_nav_selected,
            ),
            WindowType::GoToPage => {
                PromptWindow::render(frame, area, "Go to page", &state.ui_state.input, false)
            }
            WindowType::Search => {
                PromptWindow::render(frame, area, "Search", &state.ui_state.input, false)
            }
            WindowType::Notes => {
                PromptWindow::render(frame, area, "Notes", &state.ui_state.input, true)
            }
            WindowType::Gallery | WindowType::Zoom => {}
        }
    }
}
