use tracing::{debug, info, warn};

use crate::markup;
use crate::models::{Step, ZoomItem};
use crate::protocol::{Completion, FetchError, Outcome, Pending, Request, Response};
use crate::remote::{RemoteSource, execute};

const ZOOM_PREFIX: &str = "/dynamic/zoom/";

/// Tracks the zoomed item by its ordinal in the full (filtered) item set.
///
/// Moving between items is a full view transition: every move issues a fresh
/// load of the zoom page for the new ordinal.
#[derive(Debug, Clone)]
pub struct ZoomNavigator {
    curr_pic: usize,
    num_photos: usize,
    item: Option<ZoomItem>,
    generation: u64,
}

impl ZoomNavigator {
    pub fn new(curr_pic: usize, num_photos: usize) -> Self {
        Self {
            curr_pic,
            num_photos,
            item: None,
            generation: 0,
        }
    }

    /// Build from a zoom location such as `/dynamic/zoom/17`; the ordinal is
    /// the trailing path segment.
    pub fn from_location(location: &str, num_photos: usize) -> Option<Self> {
        let index = location
            .trim_end_matches('/')
            .rsplit('/')
            .next()?
            .parse()
            .ok()?;
        Some(Self::new(index, num_photos))
    }

    pub fn location_for(index: usize) -> String {
        format!("{ZOOM_PREFIX}{index}")
    }

    pub fn location(&self) -> String {
        Self::location_for(self.curr_pic)
    }

    pub fn curr_pic(&self) -> usize {
        self.curr_pic
    }

    pub fn num_photos(&self) -> usize {
        self.num_photos
    }

    pub fn set_num_photos(&mut self, num_photos: usize) {
        self.num_photos = num_photos;
    }

    pub fn item(&self) -> Option<&ZoomItem> {
        self.item.as_ref()
    }

    /// Load the zoom view for the current ordinal.
    pub fn open(&mut self) -> Pending {
        self.generation += 1;
        self.item = None;
        Pending {
            generation: self.generation,
            request: Request::Zoom {
                index: self.curr_pic,
            },
        }
    }

    /// Step one item in `step` direction. Saturates at both ends, so a move
    /// past the boundary re-displays the boundary item. Nothing happens while
    /// the item count is unknown.
    pub fn advance(&mut self, step: Step) -> Option<Pending> {
        if self.num_photos == 0 {
            return None;
        }
        let last = (self.num_photos - 1) as i64;
        let next = (self.curr_pic as i64 + step.delta()).clamp(0, last);
        self.curr_pic = next as usize;
        debug!(curr_pic = self.curr_pic, "Zoom advanced");
        Some(self.open())
    }

    pub fn handle_completion(&mut self, completion: Completion) -> Outcome {
        let Completion {
            generation,
            request,
            result,
        } = completion;
        let Request::Zoom { index } = request else {
            return Outcome::Ignored;
        };
        if generation != self.generation {
            return Outcome::Stale;
        }

        let parsed = result.and_then(|response| match response {
            Response::Markup(html) => {
                markup::parse_zoom_page(index, &html).map_err(|e| FetchError::Parse {
                    path: Self::location_for(index),
                    body: e.to_string(),
                })
            }
            other => Err(FetchError::Parse {
                path: Self::location_for(index),
                body: format!("{other:?}"),
            }),
        });

        match parsed {
            Ok(item) => {
                self.item = Some(item);
                Outcome::Applied
            }
            Err(err) => {
                warn!(index, error = %err, "Zoom view failed to load");
                Outcome::Failed(err)
            }
        }
    }

    /// The gallery page holding the current item:
    /// `max(ceil(curr_pic / pics_per_page), 1)`.
    pub fn owning_page(&self, pics_per_page: Option<u32>) -> u32 {
        match pics_per_page {
            Some(per_page) if per_page > 0 => {
                let curr = u64::try_from(self.curr_pic).unwrap_or(u64::MAX);
                let page = curr.div_ceil(u64::from(per_page));
                u32::try_from(page).unwrap_or(u32::MAX).max(1)
            }
            _ => 1,
        }
    }

    /// Tell the server which page to land on before leaving the zoom view.
    ///
    /// Blocks until the notification completes. A failure is logged and the
    /// exit proceeds anyway.
    pub fn exit(&self, remote: &dyn RemoteSource, pics_per_page: Option<u32>) -> u32 {
        let page = self.owning_page(pics_per_page);
        match execute(remote, &Request::SetPage { page }) {
            Ok(_) => info!(page, curr_pic = self.curr_pic, "Zoom exit reconciled"),
            Err(err) => warn!(page, error = %err, "Could not report page on zoom exit"),
        }
        page
    }
}
