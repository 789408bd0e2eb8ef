use chrono::Local;
use tracing::{debug, info, warn};

use crate::markup;
use crate::models::{GalleryPage, NavMode, PageSet, TimeNavYear};
use crate::protocol::{Completion, FetchError, Lane, Outcome, Pending, Request, Response};
use crate::window::PageWindow;

const DEFAULT_TEXT_WIDTH: usize = 80;

/// Owns the current page and the sliding window of page links, and decides
/// which requests to issue against the gallery server.
///
/// The controller performs no I/O. Operations queue [`Pending`] requests that
/// the caller drains with [`take_requests`](Self::take_requests) and
/// dispatches however it likes; results come back through
/// [`handle_completion`](Self::handle_completion) in any order. Each request
/// is stamped with the generation of its lane so completions of superseded
/// requests are dropped instead of overwriting newer state.
#[derive(Debug, Clone)]
pub struct PageWindowController {
    window: PageWindow,
    curr_page: Option<u32>,
    loaded_page: Option<u32>,
    needs_refresh: bool,
    page_set: PageSet,
    mode: NavMode,
    hiding_dateless: Option<bool>,
    gallery: Option<GalleryPage>,
    time_nav: Vec<TimeNavYear>,
    last_error: Option<String>,
    fetch_time_nav: bool,
    text_width: usize,
    nav_generation: u64,
    resync_generation: u64,
    /// `nav_generation` when the last resync was issued. A user navigation
    /// since then outranks the server's idea of the current page.
    resync_nav_generation: u64,
    stats_generation: u64,
    outbox: Vec<Pending>,
}

impl PageWindowController {
    pub fn new(max_display_pages: u32) -> Self {
        Self {
            window: PageWindow::new(max_display_pages),
            curr_page: None,
            loaded_page: None,
            needs_refresh: false,
            page_set: PageSet::default(),
            mode: NavMode::Gallery,
            hiding_dateless: None,
            gallery: None,
            time_nav: Vec::new(),
            last_error: None,
            fetch_time_nav: true,
            text_width: DEFAULT_TEXT_WIDTH,
            nav_generation: 0,
            resync_generation: 0,
            resync_nav_generation: 0,
            stats_generation: 0,
            outbox: Vec::new(),
        }
    }

    pub fn with_time_nav(mut self, enabled: bool) -> Self {
        self.fetch_time_nav = enabled;
        self
    }

    /// Wrap width for pages that come back without thumbnails.
    pub fn set_text_width(&mut self, width: usize) {
        self.text_width = width.max(1);
    }

    pub fn curr_page(&self) -> Option<u32> {
        self.curr_page
    }

    pub fn loaded_page(&self) -> Option<u32> {
        self.loaded_page
    }

    pub fn needs_refresh(&self) -> bool {
        self.needs_refresh
    }

    pub fn window(&self) -> &PageWindow {
        &self.window
    }

    pub fn page_set(&self) -> &PageSet {
        &self.page_set
    }

    pub fn mode(&self) -> NavMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: NavMode) {
        self.mode = mode;
    }

    pub fn hiding_dateless(&self) -> Option<bool> {
        self.hiding_dateless
    }

    pub fn gallery(&self) -> Option<&GalleryPage> {
        self.gallery.as_ref()
    }

    pub fn time_nav(&self) -> &[TimeNavYear] {
        &self.time_nav
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn num_pages_label(&self) -> String {
        format!("{} pages", self.page_set.num_pages)
    }

    pub fn num_photos_label(&self) -> String {
        format!("{} photos", self.page_set.num_photos)
    }

    pub fn dateless_label(&self) -> &'static str {
        match self.hiding_dateless {
            Some(true) => "Show dateless",
            Some(false) => "Hide dateless",
            None => "Dateless: ?",
        }
    }

    /// Drain the requests queued since the last call.
    pub fn take_requests(&mut self) -> Vec<Pending> {
        std::mem::take(&mut self.outbox)
    }

    /// Mark the current page dirty so the next navigation to it reloads.
    pub fn invalidate(&mut self) {
        self.needs_refresh = true;
    }

    /// Navigate to `target`, clamped to the known page range. Returns true
    /// when a page load was issued.
    pub fn go_to_page(&mut self, target: u32) -> bool {
        let target = self.clamp_page(target);
        if !self.needs_refresh && self.curr_page == Some(target) {
            return false;
        }

        if self.window.slide_to(target) {
            debug!(
                target,
                start = self.window.start(),
                end = self.window.end(),
                "Page window slid"
            );
        }
        self.slide_page_nav();

        self.curr_page = Some(target);
        self.needs_refresh = false;
        self.nav_generation += 1;
        self.issue(Request::PageContent { page: target });
        true
    }

    pub fn page_prev(&mut self) -> bool {
        match self.curr_page {
            Some(curr) if curr > 1 => self.go_to_page(curr - 1),
            _ => false,
        }
    }

    pub fn page_next(&mut self) -> bool {
        match self.curr_page {
            Some(curr) if curr < self.page_set.num_pages => self.go_to_page(curr + 1),
            _ => false,
        }
    }

    pub fn page_first(&mut self) -> bool {
        self.go_to_page(1)
    }

    pub fn page_last(&mut self) -> bool {
        if self.page_set.num_pages == 0 {
            return false;
        }
        self.go_to_page(self.page_set.num_pages)
    }

    /// Re-navigate to the current page. Only reloads after [`invalidate`](Self::invalidate).
    /// Without a current page, falls back to a full resync.
    pub fn refresh(&mut self) -> bool {
        match self.curr_page {
            Some(curr) => self.go_to_page(curr),
            None => {
                self.update_nav();
                true
            }
        }
    }

    /// Full resync with the server: reload the link strip, the time
    /// navigation, the authoritative current page and the dateless label.
    pub fn update_nav(&mut self) {
        self.invalidate();
        self.resync_generation += 1;
        self.resync_nav_generation = self.nav_generation;
        info!(generation = self.resync_generation, "Resyncing navigation");

        self.issue(Request::PageNav);
        if self.fetch_time_nav {
            self.issue(Request::TimeNav);
        }
        self.issue(Request::CurrentPage);
        self.issue(Request::HidingDateless);
        self.issue(Request::PicsPerPage);
    }

    pub fn toggle_dateless_filter(&mut self) {
        self.issue(Request::ToggleDateless);
    }

    pub fn search(&mut self, path: &str, field: &str, query: &str) {
        self.issue(Request::Search {
            path: path.to_string(),
            field: field.to_string(),
            query: query.to_string(),
        });
    }

    pub fn save_notes(&mut self, index: usize, notes: &str) {
        self.issue(Request::SaveNotes {
            index,
            notes: notes.to_string(),
        });
    }

    /// Apply the result of a dispatched request.
    pub fn handle_completion(&mut self, completion: Completion) -> Outcome {
        let Completion {
            generation,
            request,
            result,
        } = completion;

        if matches!(request, Request::Zoom { .. }) {
            return Outcome::Ignored;
        }
        if !self.is_current(request.lane(), generation) {
            debug!(?request, generation, "Discarding stale response");
            return Outcome::Stale;
        }
        if request == Request::CurrentPage && self.resync_nav_generation != self.nav_generation {
            debug!(generation, "Discarding current page, navigated since resync");
            return Outcome::Stale;
        }

        let response = match result {
            Ok(response) => response,
            Err(err) => return self.fail(&request, err),
        };

        match self.apply(&request, response) {
            Ok(()) => Outcome::Applied,
            Err(err) => self.fail(&request, err),
        }
    }

    fn apply(&mut self, request: &Request, response: Response) -> Result<(), FetchError> {
        let path = request.path();
        let unexpected = |response: &Response| FetchError::Parse {
            path: path.clone(),
            body: format!("{response:?}"),
        };

        match (request, response) {
            (Request::PageContent { page }, Response::Markup(html)) => {
                let gallery = markup::parse_gallery_page(*page, &html, self.text_width)
                    .map_err(|e| FetchError::Parse {
                        path: path.clone(),
                        body: e.to_string(),
                    })?;
                self.gallery = Some(gallery);
                self.loaded_page = Some(*page);
                self.window.mark_active(self.loaded_page);
                self.last_error = None;
                debug!(page, "Page content loaded");
            }
            (Request::PageNav, Response::Markup(html)) => {
                let pages = markup::parse_page_nav(&html).map_err(|e| FetchError::Parse {
                    path: path.clone(),
                    body: e.to_string(),
                })?;
                debug!(links = pages.len(), "Page links loaded");
                self.window.replace_links(pages);
                self.slide_page_nav();
                self.window.mark_active(self.loaded_page);
            }
            (Request::TimeNav, Response::Markup(html)) => {
                self.time_nav = markup::parse_time_nav(&html).map_err(|e| FetchError::Parse {
                    path: path.clone(),
                    body: e.to_string(),
                })?;
            }
            (Request::CurrentPage, Response::Count(page)) => {
                self.go_to_page(page);
            }
            (Request::NumPages, Response::Count(n)) => {
                self.page_set.num_pages = n;
                self.page_set.refreshed_at = Some(Local::now());
            }
            (Request::NumPics, Response::Count(n)) => {
                self.page_set.num_photos = n;
                self.page_set.refreshed_at = Some(Local::now());
            }
            (Request::PicsPerPage, Response::Count(n)) => {
                self.page_set.pics_per_page = n;
            }
            (Request::HidingDateless, Response::Flag(hiding)) => {
                self.hiding_dateless = Some(hiding);
            }
            (Request::ToggleDateless, response) => {
                match response {
                    Response::Flag(hiding) => self.hiding_dateless = Some(hiding),
                    Response::Empty => self.hiding_dateless = self.hiding_dateless.map(|h| !h),
                    other => return Err(unexpected(&other)),
                }
                info!(hiding = ?self.hiding_dateless, "Dateless filter toggled");
                self.update_nav();
            }
            (Request::Search { query, .. }, _) => {
                info!(%query, "Search filter applied");
                self.update_nav();
            }
            (Request::SaveNotes { index, .. }, _) => {
                info!(index, "Notes saved");
            }
            (Request::SetPage { .. }, _) => {}
            (_, other) => return Err(unexpected(&other)),
        }
        Ok(())
    }

    fn fail(&mut self, request: &Request, err: FetchError) -> Outcome {
        if *request == Request::PicsPerPage {
            // Older servers reject this stat. The derived value stands in.
            debug!(error = %err, "Pics per page unavailable");
            return Outcome::Failed(err);
        }
        warn!(?request, error = %err, "Request failed");
        if let Request::PageContent { page } = request
            && self.curr_page == Some(*page)
        {
            // Keep the page retryable by navigating to it again.
            self.needs_refresh = true;
        }
        self.last_error = Some(err.to_string());
        Outcome::Failed(err)
    }

    /// Recompute link visibility from the window bounds, then refresh the
    /// counters since the set of pages may have changed underneath us.
    fn slide_page_nav(&mut self) {
        self.window.recompute_visibility();
        self.refresh_stats();
    }

    fn refresh_stats(&mut self) {
        self.stats_generation += 1;
        self.issue(Request::NumPages);
        self.issue(Request::NumPics);
    }

    fn clamp_page(&self, target: u32) -> u32 {
        let target = target.max(1);
        if self.page_set.num_pages > 0 {
            target.min(self.page_set.num_pages)
        } else {
            target
        }
    }

    fn is_current(&self, lane: Lane, generation: u64) -> bool {
        match lane {
            Lane::Navigation => generation == self.nav_generation,
            Lane::Resync => generation == self.resync_generation,
            Lane::Stats => generation == self.stats_generation,
            Lane::Zoom | Lane::Untracked => true,
        }
    }

    fn issue(&mut self, request: Request) {
        let generation = match request.lane() {
            Lane::Navigation => self.nav_generation,
            Lane::Resync => self.resync_generation,
            Lane::Stats => self.stats_generation,
            Lane::Zoom | Lane::Untracked => 0,
        };
        self.outbox.push(Pending {
            generation,
            request,
        });
    }
}
