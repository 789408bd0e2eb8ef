use std::io::Write;

use eyre::{Result, eyre};
use tracing::info;

use crate::markup;
use crate::protocol::{Request, Response};
use crate::remote::{RemoteSource, execute};

const DUMP_TEXT_WIDTH: usize = 100;

fn fetch_count(remote: &dyn RemoteSource, request: Request) -> Result<u32> {
    match execute(remote, &request)? {
        Response::Count(n) => Ok(n),
        other => Err(eyre!("unexpected response to {}: {other:?}", request.path())),
    }
}

/// Print one gallery page to `out`: a header with the page stats followed by
/// one tab-separated line per thumbnail. Page `0` means the page the server
/// currently considers current.
pub fn dump_page(remote: &dyn RemoteSource, page: u32, out: &mut impl Write) -> Result<()> {
    let page = match page {
        0 => fetch_count(remote, Request::CurrentPage)?.max(1),
        n => n,
    };
    let num_pages = fetch_count(remote, Request::NumPages)?;
    let num_photos = fetch_count(remote, Request::NumPics)?;

    let html = match execute(remote, &Request::PageContent { page })? {
        Response::Markup(html) => html,
        other => return Err(eyre!("unexpected page content response: {other:?}")),
    };
    let gallery = markup::parse_gallery_page(page, &html, DUMP_TEXT_WIDTH)?;
    info!(page, thumbnails = gallery.thumbnails.len(), "Dumping page");

    writeln!(out, "Page {page} of {num_pages} ({num_photos} photos)")?;
    if gallery.thumbnails.is_empty() {
        for line in &gallery.fallback_text {
            writeln!(out, "{line}")?;
        }
    } else {
        for thumb in &gallery.thumbnails {
            writeln!(out, "{}\t{}\t{}", thumb.index, thumb.date, thumb.path)?;
        }
    }
    Ok(())
}
