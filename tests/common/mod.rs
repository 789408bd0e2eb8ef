#![allow(dead_code)]

use std::sync::Mutex;

use picnav::controller::PageWindowController;
use picnav::protocol::{Completion, FetchError, Method, Request, Response};
use picnav::remote::{Body, RemoteSource};
use picnav::ui::state::ApplicationState;

/// In-memory stand-in for the gallery server's `/dynamic` endpoints.
pub struct FakeServer {
    pub num_pages: u32,
    pub pics_per_page: u32,
    pub current: u32,
    pub hiding_dateless: bool,
    /// Page count after the dateless filter is switched on.
    pub pages_when_hiding: u32,
}

impl FakeServer {
    pub fn new(num_pages: u32, pics_per_page: u32) -> Self {
        Self {
            num_pages,
            pics_per_page,
            current: 1,
            hiding_dateless: false,
            pages_when_hiding: num_pages,
        }
    }

    pub fn respond(&mut self, request: &Request) -> Response {
        match request {
            Request::PageContent { page } => Response::Markup(gallery_html(*page, self.pics_per_page)),
            Request::CurrentPage => Response::Count(self.current),
            Request::PageNav => Response::Markup(page_nav_html(self.num_pages)),
            Request::TimeNav => Response::Markup(
                r#"<ul><li><a onclick="pageTo(1)">2021</a></li><li><a onclick="pageTo(4)">March</a></li></ul>"#
                    .to_string(),
            ),
            Request::NumPages => Response::Count(self.num_pages),
            Request::NumPics => Response::Count(self.num_pages * self.pics_per_page),
            Request::PicsPerPage => Response::Count(self.pics_per_page),
            Request::HidingDateless => Response::Flag(self.hiding_dateless),
            Request::ToggleDateless => {
                self.hiding_dateless = !self.hiding_dateless;
                if self.hiding_dateless {
                    self.num_pages = self.pages_when_hiding;
                    self.current = self.current.min(self.num_pages);
                }
                Response::Flag(self.hiding_dateless)
            }
            Request::Zoom { index } => Response::Markup(zoom_html(*index)),
            Request::SetPage { page } => {
                self.current = *page;
                Response::Empty
            }
            Request::SaveNotes { .. } | Request::Search { .. } => Response::Empty,
        }
    }
}

pub fn page_nav_html(num_pages: u32) -> String {
    let mut html = String::from(r#"<ul><li id="pgprev"><a onclick="pagePrev()">Newer</a></li>"#);
    for page in 1..=num_pages {
        html.push_str(&format!(
            r#"<li id="pg{page}" class="pglink"><a onclick="pageTo({page})">{page}</a></li>"#
        ));
    }
    html.push_str(r#"<li id="pgnext"><a onclick="pageNext()">Older</a></li></ul>"#);
    html
}

/// Two thumbnails per page, numbered from the first item of that page.
pub fn gallery_html(page: u32, pics_per_page: u32) -> String {
    let first = (page.saturating_sub(1) * pics_per_page) as usize;
    let mut html = String::from("<ul>");
    for index in [first, first + 1] {
        html.push_str(&format!(
            r#"<li><a href="/dynamic/zoom/{index}"><img src="/piclib/thumb1/p{page}/{index}.jpg"></a><span class="caption">2021-03-0{}</span></li>"#,
            index % 9 + 1
        ));
    }
    html.push_str("</ul>");
    html
}

pub fn zoom_html(index: usize) -> String {
    format!(
        r#"<html><body><img src="/piclib/thumb2/full/{index}.jpg"><a href="/dynamic/time">Taken 2021-03-04</a><textarea>old note</textarea></body></html>"#
    )
}

/// Answer every queued request until the controller stops issuing new ones.
/// Returns the requests in the order they were answered.
pub fn settle(controller: &mut PageWindowController, server: &mut FakeServer) -> Vec<Request> {
    let mut answered = Vec::new();
    for _ in 0..16 {
        let pending = controller.take_requests();
        if pending.is_empty() {
            break;
        }
        for p in pending {
            let response = server.respond(&p.request);
            answered.push(p.request.clone());
            controller.handle_completion(Completion::ok(&p, response));
        }
    }
    answered
}

pub fn settle_app(state: &mut ApplicationState, server: &mut FakeServer) -> Vec<Request> {
    let mut answered = Vec::new();
    for _ in 0..16 {
        let pending = state.take_requests();
        if pending.is_empty() {
            break;
        }
        for p in pending {
            let response = server.respond(&p.request);
            answered.push(p.request.clone());
            state.handle_completion(Completion::ok(&p, response));
        }
    }
    answered
}

/// Remote used for the blocking zoom-exit call: records paths, optionally fails.
pub struct RecordingRemote {
    pub calls: Mutex<Vec<String>>,
    pub fail: bool,
}

impl RecordingRemote {
    pub fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    pub fn failing() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

impl RemoteSource for RecordingRemote {
    fn send(&self, _method: Method, path: &str, _body: Body<'_>) -> Result<String, FetchError> {
        self.calls.lock().unwrap().push(path.to_string());
        if self.fail {
            return Err(FetchError::Transport {
                path: path.to_string(),
                message: "operation timed out".to_string(),
            });
        }
        Ok(String::new())
    }

    fn url(&self, path: &str) -> String {
        format!("http://gallery.test{path}")
    }
}
