use serde::{Deserialize, Serialize};

pub const DEFAULT_SERVER_URL: &str = "http://localhost:7777";
pub const DEFAULT_MAX_DISPLAY_PAGES: u32 = 20;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub server_url: String,
    pub max_display_pages: u32,
    pub request_timeout_secs: u64,
    pub exit_timeout_secs: u64,
    pub search_path: String,
    pub search_field: String,
    pub show_time_nav: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server_url: DEFAULT_SERVER_URL.to_string(),
            max_display_pages: DEFAULT_MAX_DISPLAY_PAGES,
            request_timeout_secs: 10,
            exit_timeout_secs: 3,
            search_path: "/dynamic/search".to_string(),
            search_field: "query".to_string(),
            show_time_nav: true,
        }
    }
}
