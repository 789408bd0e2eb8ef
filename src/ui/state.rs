use std::time::{Duration, Instant};

use crossterm::event::{KeyCode, KeyEvent};
use tracing::{debug, info};

use crate::controller::PageWindowController;
use crate::keys::{KeyAction, NavKey, route_key};
use crate::models::{NavMode, Step, WindowType};
use crate::protocol::{Completion, Outcome, Pending, Request};
use crate::remote::RemoteSource;
use crate::settings::Settings;
use crate::zoom::ZoomNavigator;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageType {
    Info,
    Warning,
    Error,
}

/// Side effects the terminal layer has to carry out for a key press.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    Quit,
    CopyToClipboard(String),
}

/// UI-only state: which window is open, the selection and prompt input.
#[derive(Debug, Clone)]
pub struct UiState {
    pub active_window: WindowType,
    pub selected: usize,
    pub input: String,
    pub time_nav_selected: usize,
    pub help_scroll_offset: u16,
    pub message: Option<String>,
    pub message_type: MessageType,
    pub message_time: Option<Instant>,
}

impl Default for UiState {
    fn default() -> Self {
        Self::new()
    }
}

impl UiState {
    pub fn new() -> Self {
        Self {
            active_window: WindowType::Gallery,
            selected: 0,
            input: String::new(),
            time_nav_selected: 0,
            help_scroll_offset: 0,
            message: None,
            message_type: MessageType::Info,
            message_time: None,
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>, message_type: MessageType) {
        self.message = Some(message.into());
        self.message_type = message_type;
        self.message_time = Some(Instant::now());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
        self.message_time = None;
    }

    /// Returns true if the current message has expired (older than 3 seconds).
    pub fn message_expired(&self) -> bool {
        self.message_time
            .is_some_and(|t| t.elapsed() >= Duration::from_secs(3))
    }

    pub fn open_window(&mut self, window_type: WindowType) {
        if matches!(
            window_type,
            WindowType::GoToPage | WindowType::Search | WindowType::Notes
        ) {
            self.input.clear();
        }
        self.active_window = window_type;
    }
}

/// Everything the viewer knows apart from the terminal itself.
#[derive(Debug, Clone)]
pub struct ApplicationState {
    pub settings: Settings,
    pub controller: PageWindowController,
    pub zoom: Option<ZoomNavigator>,
    pub ui_state: UiState,
    pending: Vec<Pending>,
}

impl ApplicationState {
    pub fn new(settings: Settings) -> Self {
        let controller = PageWindowController::new(settings.max_display_pages)
            .with_time_nav(settings.show_time_nav);
        Self {
            settings,
            controller,
            zoom: None,
            ui_state: UiState::new(),
            pending: Vec::new(),
        }
    }

    /// Initial load: either the gallery resync or the zoom view of `zoom_index`.
    pub fn start(&mut self, zoom_index: Option<usize>) {
        match zoom_index {
            Some(index) => {
                self.controller.update_nav();
                self.enter_zoom(index);
            }
            None => self.controller.update_nav(),
        }
    }

    pub fn mode(&self) -> NavMode {
        self.controller.mode()
    }

    /// All requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<Pending> {
        let mut requests = std::mem::take(&mut self.pending);
        requests.extend(self.controller.take_requests());
        requests
    }

    pub fn handle_completion(&mut self, completion: Completion) {
        let request = completion.request.clone();
        let outcome = match (&request, self.zoom.as_mut()) {
            (Request::Zoom { .. }, Some(zoom)) => zoom.handle_completion(completion),
            (Request::Zoom { .. }, None) => Outcome::Stale,
            _ => self.controller.handle_completion(completion),
        };

        match outcome {
            Outcome::Applied => match request {
                Request::PageContent { .. } => self.clamp_selection(),
                Request::NumPics => {
                    let num_photos = self.controller.page_set().num_photos as usize;
                    if let Some(zoom) = self.zoom.as_mut() {
                        zoom.set_num_photos(num_photos);
                    }
                }
                Request::SaveNotes { .. } => {
                    self.ui_state.set_message("Notes saved", MessageType::Info)
                }
                Request::ToggleDateless => self
                    .ui_state
                    .set_message(self.controller.dateless_label(), MessageType::Info),
                _ => {}
            },
            Outcome::Failed(_) if request == Request::PicsPerPage => {}
            Outcome::Failed(err) => self.ui_state.set_message(err.to_string(), MessageType::Error),
            Outcome::Stale | Outcome::Ignored => {}
        }
    }

    /// Handle a key press. `exit_remote` is used for the blocking notification
    /// sent when leaving the zoom view.
    pub fn handle_key(&mut self, key: KeyEvent, exit_remote: &dyn RemoteSource) -> Option<Effect> {
        if self.ui_state.message.is_some() {
            self.ui_state.clear_message();
        }

        match self.ui_state.active_window {
            WindowType::GoToPage | WindowType::Search | WindowType::Notes => {
                self.handle_prompt_key(key);
                None
            }
            WindowType::Help => {
                match key.code {
                    KeyCode::Char('j') | KeyCode::Down => {
                        self.ui_state.help_scroll_offset =
                            self.ui_state.help_scroll_offset.saturating_add(1)
                    }
                    KeyCode::Char('k') | KeyCode::Up => {
                        self.ui_state.help_scroll_offset =
                            self.ui_state.help_scroll_offset.saturating_sub(1)
                    }
                    _ => self.close_popup(),
                }
                None
            }
            WindowType::TimeNav => {
                self.handle_time_nav_key(key);
                None
            }
            WindowType::Gallery | WindowType::Zoom => {
                let action = route_key(self.mode(), NavKey::from(key))?;
                self.apply_action(action, exit_remote)
            }
        }
    }

    pub fn apply_action(&mut self, action: KeyAction, exit_remote: &dyn RemoteSource) -> Option<Effect> {
        debug!(?action, "Key action");
        match action {
            KeyAction::PagePrev => self.after_navigation(|c| c.page_prev()),
            KeyAction::PageNext => self.after_navigation(|c| c.page_next()),
            KeyAction::PageFirst => self.after_navigation(|c| c.page_first()),
            KeyAction::PageLast => self.after_navigation(|c| c.page_last()),
            KeyAction::Refresh => {
                self.controller.invalidate();
                self.controller.refresh();
            }
            KeyAction::ToggleDateless => self.controller.toggle_dateless_filter(),
            KeyAction::SelectPrev => {
                self.ui_state.selected = self.ui_state.selected.saturating_sub(1);
            }
            KeyAction::SelectNext => {
                self.ui_state.selected += 1;
                self.clamp_selection();
            }
            KeyAction::OpenZoom => {
                let index = self
                    .controller
                    .gallery()
                    .and_then(|g| g.thumbnails.get(self.ui_state.selected))
                    .map(|t| t.index);
                if let Some(index) = index {
                    self.enter_zoom(index);
                }
            }
            KeyAction::ZoomPrev => self.advance_zoom(Step::Backward),
            KeyAction::ZoomNext => self.advance_zoom(Step::Forward),
            KeyAction::ExitZoom => self.exit_zoom(exit_remote),
            KeyAction::EditNotes => {
                let notes = self
                    .zoom
                    .as_ref()
                    .and_then(|z| z.item())
                    .map(|item| item.notes.clone());
                if let Some(notes) = notes {
                    self.ui_state.open_window(WindowType::Notes);
                    self.ui_state.input = notes;
                }
            }
            KeyAction::CopyOriginalLink => {
                let path = self
                    .zoom
                    .as_ref()
                    .and_then(|z| z.item())
                    .map(|item| item.path.clone())
                    .filter(|path| !path.is_empty());
                if let Some(path) = path {
                    return Some(Effect::CopyToClipboard(
                        exit_remote.url(&format!("/piclib/orig/{path}")),
                    ));
                }
            }
            KeyAction::GoToPagePrompt => self.ui_state.open_window(WindowType::GoToPage),
            KeyAction::SearchPrompt => self.ui_state.open_window(WindowType::Search),
            KeyAction::TimeNav => {
                if self.controller.time_nav().is_empty() {
                    self.ui_state
                        .set_message("No time navigation available", MessageType::Warning);
                } else {
                    self.ui_state.time_nav_selected = 0;
                    self.ui_state.open_window(WindowType::TimeNav);
                }
            }
            KeyAction::Help => {
                self.ui_state.help_scroll_offset = 0;
                self.ui_state.open_window(WindowType::Help);
            }
            KeyAction::Quit => return Some(Effect::Quit),
        }
        None
    }

    fn after_navigation(&mut self, navigate: impl FnOnce(&mut PageWindowController) -> bool) {
        if navigate(&mut self.controller) {
            self.ui_state.selected = 0;
        }
    }

    fn enter_zoom(&mut self, index: usize) {
        let num_photos = self.controller.page_set().num_photos as usize;
        let mut zoom = ZoomNavigator::new(index, num_photos);
        self.pending.push(zoom.open());
        self.zoom = Some(zoom);
        self.controller.set_mode(NavMode::Zoom);
        self.ui_state.open_window(WindowType::Zoom);
        info!(index, "Entered zoom view");
    }

    fn advance_zoom(&mut self, step: Step) {
        let num_photos = self.controller.page_set().num_photos as usize;
        if let Some(zoom) = self.zoom.as_mut() {
            zoom.set_num_photos(num_photos);
            if let Some(pending) = zoom.advance(step) {
                self.pending.push(pending);
            }
        }
    }

    fn exit_zoom(&mut self, exit_remote: &dyn RemoteSource) {
        if let Some(zoom) = self.zoom.take() {
            let pics_per_page = self.controller.page_set().effective_pics_per_page();
            zoom.exit(exit_remote, pics_per_page);
        }
        self.controller.set_mode(NavMode::Gallery);
        self.ui_state.open_window(WindowType::Gallery);
        self.controller.update_nav();
    }

    fn close_popup(&mut self) {
        let window = match self.mode() {
            NavMode::Gallery => WindowType::Gallery,
            NavMode::Zoom => WindowType::Zoom,
        };
        self.ui_state.open_window(window);
    }

    fn handle_prompt_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc => self.close_popup(),
            KeyCode::Backspace => {
                self.ui_state.input.pop();
            }
            KeyCode::Enter => {
                let input = std::mem::take(&mut self.ui_state.input);
                let window = self.ui_state.active_window.clone();
                self.close_popup();
                self.submit_prompt(window, input);
            }
            KeyCode::Char(c) => self.ui_state.input.push(c),
            _ => {}
        }
    }

    fn submit_prompt(&mut self, window: WindowType, input: String) {
        match window {
            WindowType::GoToPage => match input.trim().parse::<u32>() {
                Ok(page) => self.after_navigation(|c| c.go_to_page(page)),
                Err(_) => self
                    .ui_state
                    .set_message(format!("Not a page number: {input}"), MessageType::Warning),
            },
            WindowType::Search => {
                let query = input.trim();
                self.controller.search(
                    &self.settings.search_path,
                    &self.settings.search_field,
                    query,
                );
            }
            WindowType::Notes => {
                let index = self.zoom.as_ref().map(|z| z.curr_pic());
                if let Some(index) = index {
                    self.controller.save_notes(index, &input);
                }
            }
            _ => {}
        }
    }

    fn handle_time_nav_key(&mut self, key: KeyEvent) {
        let entries = self.time_nav_entries();
        match key.code {
            KeyCode::Char('j') | KeyCode::Down => {
                if !entries.is_empty() {
                    self.ui_state.time_nav_selected =
                        (self.ui_state.time_nav_selected + 1).min(entries.len() - 1);
                }
            }
            KeyCode::Char('k') | KeyCode::Up => {
                self.ui_state.time_nav_selected = self.ui_state.time_nav_selected.saturating_sub(1);
            }
            KeyCode::Enter => {
                let target = entries.get(self.ui_state.time_nav_selected).map(|(_, page)| *page);
                self.close_popup();
                if let Some(page) = target {
                    self.after_navigation(|c| c.go_to_page(page));
                }
            }
            _ => self.close_popup(),
        }
    }

    /// Flattened time navigation: each year followed by its months.
    pub fn time_nav_entries(&self) -> Vec<(String, u32)> {
        let mut entries = Vec::new();
        for year in self.controller.time_nav() {
            entries.push((year.year.to_string(), year.start_page));
            for month in &year.months {
                entries.push((format!("  {} {}", month.name, year.year), month.page));
            }
        }
        entries
    }

    fn clamp_selection(&mut self) {
        let count = self
            .controller
            .gallery()
            .map(|g| g.thumbnails.len())
            .unwrap_or(0);
        self.ui_state.selected = self.ui_state.selected.min(count.saturating_sub(1));
    }
}
