use std::time::Duration;

use tracing::debug;

use crate::protocol::{FetchError, Method, Request, Response};

/// Body attached to an outgoing request.
#[derive(Debug, Clone, Copy)]
pub enum Body<'a> {
    None,
    Text(&'a str),
    Form(&'a [(&'a str, &'a str)]),
}

/// Transport to the gallery server. Implementations return the raw response
/// body; interpretation happens in [`execute`].
pub trait RemoteSource: Send + Sync {
    fn send(&self, method: Method, path: &str, body: Body<'_>) -> Result<String, FetchError>;

    /// Absolute URL of a server path, used for links handed to the user.
    fn url(&self, path: &str) -> String;
}

/// Blocking HTTP client for the gallery server.
///
/// Keeps a cookie store because the server tracks the current page and the
/// active filters in a per-session context keyed by cookie.
#[derive(Debug, Clone)]
pub struct HttpRemote {
    client: reqwest::blocking::Client,
    base_url: String,
    request_timeout: Option<Duration>,
}

impl HttpRemote {
    pub fn new(base_url: &str, timeout: Duration) -> eyre::Result<Self> {
        let base_url = base_url.trim_end_matches('/').to_string();
        let mut builder = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .cookie_store(true)
            .user_agent(concat!("picnav/", env!("CARGO_PKG_VERSION")));
        if base_url.starts_with("http://127.0.0.1") || base_url.starts_with("http://localhost") {
            builder = builder.no_proxy();
        }
        let client = builder.build()?;
        Ok(Self {
            client,
            base_url,
            request_timeout: None,
        })
    }

    /// A handle on the same session (cookies included) whose requests give up
    /// after `timeout` instead of the client-wide limit.
    pub fn with_request_timeout(&self, timeout: Duration) -> Self {
        Self {
            client: self.client.clone(),
            base_url: self.base_url.clone(),
            request_timeout: Some(timeout),
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

impl RemoteSource for HttpRemote {
    fn send(&self, method: Method, path: &str, body: Body<'_>) -> Result<String, FetchError> {
        let url = self.url(path);
        let builder = match method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        let builder = match body {
            Body::None => builder,
            Body::Text(text) => builder.body(text.to_string()),
            Body::Form(fields) => builder.form(fields),
        };
        let builder = match self.request_timeout {
            Some(timeout) => builder.timeout(timeout),
            None => builder,
        };

        let transport = |e: reqwest::Error| FetchError::Transport {
            path: path.to_string(),
            message: e.to_string(),
        };
        let response = builder.send().map_err(transport)?;
        let status = response.status();
        debug!(%url, status = status.as_u16(), "Response received");
        if !status.is_success() {
            return Err(FetchError::Status {
                path: path.to_string(),
                status: status.as_u16(),
            });
        }
        response.text().map_err(transport)
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

/// Parse a decimal count. The server writes bare integers, possibly with
/// surrounding whitespace.
pub fn parse_count(path: &str, body: &str) -> Result<u32, FetchError> {
    body.trim().parse().map_err(|_| FetchError::Parse {
        path: path.to_string(),
        body: body.to_string(),
    })
}

pub fn parse_flag(path: &str, body: &str) -> Result<bool, FetchError> {
    match body.trim() {
        "true" => Ok(true),
        "false" => Ok(false),
        _ => Err(FetchError::Parse {
            path: path.to_string(),
            body: body.to_string(),
        }),
    }
}

/// Perform `request` against `remote` and interpret the body.
pub fn execute(remote: &dyn RemoteSource, request: &Request) -> Result<Response, FetchError> {
    let path = request.path();
    let method = request.method();

    match request {
        Request::PageContent { .. } | Request::PageNav | Request::TimeNav | Request::Zoom { .. } => {
            remote.send(method, &path, Body::None).map(Response::Markup)
        }
        Request::CurrentPage | Request::NumPages | Request::NumPics | Request::PicsPerPage => {
            let body = remote.send(method, &path, Body::None)?;
            parse_count(&path, &body).map(Response::Count)
        }
        Request::HidingDateless => {
            let body = remote.send(method, &path, Body::None)?;
            parse_flag(&path, &body).map(Response::Flag)
        }
        Request::ToggleDateless => {
            let body = remote.send(method, &path, Body::None)?;
            if body.trim().is_empty() {
                Ok(Response::Empty)
            } else {
                parse_flag(&path, &body).map(Response::Flag)
            }
        }
        Request::SetPage { .. } => remote
            .send(method, &path, Body::None)
            .map(|_| Response::Empty),
        Request::SaveNotes { notes, .. } => remote
            .send(method, &path, Body::Text(notes))
            .map(|_| Response::Empty),
        Request::Search { field, query, .. } => {
            let fields = [(field.as_str(), query.as_str())];
            let body = remote.send(method, &path, Body::Form(&fields))?;
            if body.trim().is_empty() {
                return Ok(Response::Empty);
            }
            match serde_json::from_str::<serde_json::Value>(&body) {
                Ok(value) => Ok(Response::Json(value)),
                Err(_) => Err(FetchError::Parse { path, body }),
            }
        }
    }
}
