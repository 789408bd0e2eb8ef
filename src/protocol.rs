use thiserror::Error;

/// HTTP method used for a request against the gallery server.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

/// Every call the client makes against the `/dynamic` surface of the server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Request {
    PageContent { page: u32 },
    CurrentPage,
    PageNav,
    TimeNav,
    NumPages,
    NumPics,
    PicsPerPage,
    HidingDateless,
    ToggleDateless,
    SetPage { page: u32 },
    SaveNotes { index: usize, notes: String },
    Search { path: String, field: String, query: String },
    Zoom { index: usize },
}

impl Request {
    pub fn method(&self) -> Method {
        match self {
            Request::HidingDateless
            | Request::ToggleDateless
            | Request::SaveNotes { .. }
            | Request::Search { .. } => Method::Post,
            _ => Method::Get,
        }
    }

    pub fn path(&self) -> String {
        match self {
            Request::PageContent { page } => format!("/dynamic/pg{page}"),
            Request::CurrentPage => "/dynamic/pg".to_string(),
            Request::PageNav => "/dynamic/page-nav".to_string(),
            Request::TimeNav => "/dynamic/time-nav".to_string(),
            Request::NumPages => "/dynamic/stat/num-pages".to_string(),
            Request::NumPics => "/dynamic/stat/num-pics".to_string(),
            Request::PicsPerPage => "/dynamic/stat/pics-per-page".to_string(),
            Request::HidingDateless => "/dynamic/stat/hiding-dateless".to_string(),
            Request::ToggleDateless => "/dynamic/toggle-dateless".to_string(),
            Request::SetPage { page } => format!("/dynamic/set-page/{page}"),
            Request::SaveNotes { index, .. } => format!("/dynamic/save-notes/{index}"),
            Request::Search { path, .. } => path.clone(),
            Request::Zoom { index } => format!("/dynamic/zoom/{index}"),
        }
    }

    /// Which staleness counter guards completions of this request.
    pub fn lane(&self) -> Lane {
        match self {
            Request::PageContent { .. } => Lane::Navigation,
            Request::CurrentPage
            | Request::PageNav
            | Request::TimeNav
            | Request::HidingDateless => Lane::Resync,
            Request::NumPages | Request::NumPics => Lane::Stats,
            Request::Zoom { .. } => Lane::Zoom,
            _ => Lane::Untracked,
        }
    }
}

/// Staleness lanes. A completion is applied only if its generation still
/// matches the controller's counter for that lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lane {
    Navigation,
    Resync,
    Stats,
    Zoom,
    Untracked,
}

/// Parsed body of a successful response.
#[derive(Debug, Clone, PartialEq)]
pub enum Response {
    Markup(String),
    Count(u32),
    Flag(bool),
    Json(serde_json::Value),
    Empty,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FetchError {
    #[error("request to {path} failed: {message}")]
    Transport { path: String, message: String },
    #[error("request to {path} returned HTTP {status}")]
    Status { path: String, status: u16 },
    #[error("could not parse response from {path}: {body:?}")]
    Parse { path: String, body: String },
}

/// A request waiting to be dispatched, stamped with the generation of its lane
/// at issue time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Pending {
    pub generation: u64,
    pub request: Request,
}

/// The outcome of a dispatched [`Pending`] request.
#[derive(Debug, Clone, PartialEq)]
pub struct Completion {
    pub generation: u64,
    pub request: Request,
    pub result: Result<Response, FetchError>,
}

impl Completion {
    pub fn ok(pending: &Pending, response: Response) -> Self {
        Self {
            generation: pending.generation,
            request: pending.request.clone(),
            result: Ok(response),
        }
    }

    pub fn failed(pending: &Pending, error: FetchError) -> Self {
        Self {
            generation: pending.generation,
            request: pending.request.clone(),
            result: Err(error),
        }
    }
}

/// What a component did with a completion handed to it.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Applied,
    /// The completion belonged to a superseded request and was dropped.
    Stale,
    /// The request failed; prior state is unchanged.
    Failed(FetchError),
    /// Not addressed to this component.
    Ignored,
}
