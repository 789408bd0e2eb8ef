use chrono::{DateTime, Local};

/// Direction of a single-step move through the zoomed item set.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Backward,
    Forward,
}

impl Step {
    pub fn delta(self) -> i64 {
        match self {
            Step::Backward => -1,
            Step::Forward => 1,
        }
    }
}

/// Which view currently owns keyboard navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NavMode {
    #[default]
    Gallery,
    Zoom,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WindowType {
    Gallery,
    Zoom,
    Help,
    TimeNav,
    GoToPage,
    Search,
    Notes,
}

impl Default for WindowType {
    fn default() -> Self {
        WindowType::Gallery
    }
}

/// Counts reported by the server for the current (filtered) item set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PageSet {
    pub num_pages: u32,
    pub num_photos: u32,
    pub pics_per_page: u32,
    pub refreshed_at: Option<DateTime<Local>>,
}

impl PageSet {
    /// Items per page as reported, or derived from the counts when the
    /// server value is missing.
    pub fn effective_pics_per_page(&self) -> Option<u32> {
        if self.pics_per_page > 0 {
            return Some(self.pics_per_page);
        }
        if self.num_pages == 0 || self.num_photos == 0 {
            return None;
        }
        Some(self.num_photos.div_ceil(self.num_pages))
    }
}

/// One ordinal entry of the page-link strip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLink {
    pub page: u32,
    pub visible: bool,
    pub active: bool,
}

impl PageLink {
    pub fn new(page: u32) -> Self {
        Self {
            page,
            visible: false,
            active: false,
        }
    }
}

/// A thumbnail entry of a gallery page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Thumbnail {
    pub index: usize,
    pub path: String,
    pub date: String,
}

/// The item shown by the zoom view.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZoomItem {
    pub index: usize,
    pub path: String,
    pub date: String,
    pub notes: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeNavMonth {
    pub name: String,
    pub page: u32,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimeNavYear {
    pub year: i32,
    pub start_page: u32,
    pub months: Vec<TimeNavMonth>,
}

/// Content of the gallery pane for the currently loaded page.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct GalleryPage {
    pub page: u32,
    pub thumbnails: Vec<Thumbnail>,
    /// Plain-text rendering used when the fragment has no recognisable grid.
    pub fallback_text: Vec<String>,
}
