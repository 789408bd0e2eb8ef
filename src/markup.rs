//! Parsing of the HTML fragments served under `/dynamic`.
//!
//! The server renders its navigation aids and gallery pages as markup meant
//! for a browser. These helpers pull out the pieces the terminal client needs
//! and fall back to a plain-text rendering when a fragment does not have the
//! expected shape.

use eyre::{Result, eyre};
use html2text::config;
use regex::Regex;
use scraper::{ElementRef, Html, Selector};

use crate::models::{GalleryPage, Thumbnail, TimeNavMonth, TimeNavYear, ZoomItem};

const THUMB_PREFIX: &str = "/piclib/thumb1/";
const ZOOM_IMAGE_PREFIX: &str = "/piclib/thumb2/";
const ZOOM_LINK_PREFIX: &str = "/dynamic/zoom/";

fn selector(css: &str) -> Result<Selector> {
    Selector::parse(css).map_err(|e| eyre!("invalid selector {css:?}: {e}"))
}

fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .collect::<Vec<_>>()
        .join(" ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Extract the `pageTo(n)` target from an `onclick` handler.
fn page_to_target(onclick: &str) -> Result<Option<u32>> {
    let re = Regex::new(r"pageTo\(\s*(\d+)\s*\)")?;
    Ok(re
        .captures(onclick)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok()))
}

/// Convert markup to wrapped plain-text lines.
pub fn plain_text(html: &str, width: usize) -> Result<Vec<String>> {
    let text = config::plain()
        .link_footnotes(false)
        .string_from_read(html.as_bytes(), width.max(10))?;
    Ok(text.lines().map(str::to_string).collect())
}

/// Page ordinals listed by the `/dynamic/page-nav` fragment, in document order.
pub fn parse_page_nav(html: &str) -> Result<Vec<u32>> {
    let fragment = Html::parse_fragment(html);
    let link_selector = selector("li.pglink")?;
    let id_re = Regex::new(r"^pg(\d+)$")?;

    let mut pages = Vec::new();
    for item in fragment.select(&link_selector) {
        let from_id = item
            .value()
            .id()
            .and_then(|id| id_re.captures(id))
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse::<u32>().ok());
        let page = match from_id {
            Some(page) => Some(page),
            None => {
                let text = element_text(item);
                text.parse::<u32>().ok()
            }
        };
        if let Some(page) = page {
            pages.push(page);
        }
    }
    Ok(pages)
}

/// Thumbnails of a `/dynamic/pg{n}` fragment.
pub fn parse_gallery_page(page: u32, html: &str, width: usize) -> Result<GalleryPage> {
    let fragment = Html::parse_fragment(html);
    let item_selector = selector("li")?;
    let link_selector = selector("a[href]")?;
    let img_selector = selector("img[src]")?;
    let caption_selector = selector(".caption")?;

    let mut thumbnails = Vec::new();
    for item in fragment.select(&item_selector) {
        let Some(index) = item
            .select(&link_selector)
            .filter_map(|a| a.value().attr("href"))
            .find_map(|href| href.strip_prefix(ZOOM_LINK_PREFIX))
            .and_then(|rest| rest.trim_end_matches('/').parse::<usize>().ok())
        else {
            continue;
        };

        let path = item
            .select(&img_selector)
            .filter_map(|img| img.value().attr("src"))
            .find_map(|src| src.strip_prefix(THUMB_PREFIX))
            .unwrap_or_default()
            .to_string();
        let date = item
            .select(&caption_selector)
            .next()
            .map(element_text)
            .unwrap_or_default();

        thumbnails.push(Thumbnail { index, path, date });
    }

    let fallback_text = if thumbnails.is_empty() {
        plain_text(html, width)?
    } else {
        Vec::new()
    };

    Ok(GalleryPage {
        page,
        thumbnails,
        fallback_text,
    })
}

/// Years and months of the `/dynamic/time-nav` fragment. The first link of
/// each group names the year, the rest name its months.
pub fn parse_time_nav(html: &str) -> Result<Vec<TimeNavYear>> {
    let fragment = Html::parse_fragment(html);
    let group_selector = selector("ul")?;
    let link_selector = selector("a")?;

    let mut years = Vec::new();
    for group in fragment.select(&group_selector) {
        let mut links = group.select(&link_selector).filter_map(|a| {
            let page = page_to_target(a.value().attr("onclick").unwrap_or_default()).ok()??;
            Some((element_text(a), page))
        });

        let Some((year_label, start_page)) = links.next() else {
            continue;
        };
        let Ok(year) = year_label.parse::<i32>() else {
            continue;
        };
        let months = links
            .map(|(name, page)| TimeNavMonth { name, page })
            .collect();

        years.push(TimeNavYear {
            year,
            start_page,
            months,
        });
    }
    Ok(years)
}

/// Item details from a `/dynamic/zoom/{index}` page.
pub fn parse_zoom_page(index: usize, html: &str) -> Result<ZoomItem> {
    let document = Html::parse_document(html);
    let img_selector = selector("img[src]")?;
    let notes_selector = selector("textarea")?;
    let link_selector = selector("a")?;

    let path = document
        .select(&img_selector)
        .filter_map(|img| img.value().attr("src"))
        .find_map(|src| src.strip_prefix(ZOOM_IMAGE_PREFIX))
        .unwrap_or_default()
        .to_string();
    let notes = document
        .select(&notes_selector)
        .next()
        .map(|area| area.text().collect::<String>())
        .unwrap_or_default();
    let date = document
        .select(&link_selector)
        .map(element_text)
        .find_map(|text| text.strip_prefix("Taken ").map(str::to_string))
        .unwrap_or_default();

    Ok(ZoomItem {
        index,
        path,
        date,
        notes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const PAGE_NAV: &str = r##"
<div class="pagination pagination-centered">
<ul>
  <li id="pgprev" ><a href="#" onclick="pagePrev()">Newer</a></li>
  <li id="pg1" class="pglink"><a class="pga" href="#" onclick="pageTo(1)"><p class="pgp">1</p></a></li>
  <li id="pg2" class="pglink"><a class="pga" href="#" onclick="pageTo(2)"><p class="pgp">2</p></a></li>
  <li id="pg3" class="pglink"><a class="pga" href="#" onclick="pageTo(3)"><p class="pgp">3</p></a></li>
  <li id="pgnext"><a href="#" onclick="pageNext()">Older</a></li>
</ul>
</div>"##;

    #[test]
    fn page_nav_lists_only_page_links() {
        assert_eq!(parse_page_nav(PAGE_NAV).unwrap(), vec![1, 2, 3]);
    }

    #[test]
    fn gallery_page_extracts_thumbnails() {
        let html = r#"
<ul class="thumb-grid group">
<li>
  <div style="">
    <a href="/dynamic/zoom/24"><img class="img-rounded" src="/piclib/thumb1/abc.jpg"></a>
    <div class="caption"><p class="pagination-centered">Jan 2, 2006</p></div>
  </div>
</li>
<li>
  <div style="">
    <a href="/dynamic/zoom/25"><img class="img-rounded" src="/piclib/thumb1/def.jpg"></a>
    <div class="caption"><p class="pagination-centered">Feb 3, 2007</p></div>
  </div>
</li>
</ul>"#;
        let page = parse_gallery_page(2, html, 80).unwrap();
        assert_eq!(page.page, 2);
        assert_eq!(page.thumbnails.len(), 2);
        assert_eq!(page.thumbnails[0].index, 24);
        assert_eq!(page.thumbnails[0].path, "abc.jpg");
        assert_eq!(page.thumbnails[1].date, "Feb 3, 2007");
        assert!(page.fallback_text.is_empty());
    }

    #[test]
    fn gallery_page_without_grid_falls_back_to_text() {
        let page = parse_gallery_page(1, "<p>No photos here</p>", 80).unwrap();
        assert!(page.thumbnails.is_empty());
        assert!(page.fallback_text.iter().any(|l| l.contains("No photos here")));
    }

    #[test]
    fn time_nav_groups_months_under_years() {
        let html = r##"
<li>
  <div class="pagination pagination-centered">
    <ul class="dropdown-wide">
      <li class="dropdown-page"><a class="dropdown-link" href="#" onclick="pageTo(1)">2013</a></li>
      <li class="dropdown-page"><a class="dropdown-link float-left" href="#" onclick="pageTo(1)">Jan</a></li>
      <li class="dropdown-page"><a class="dropdown-link float-left" href="#" onclick="pageTo(4)">Feb</a></li>
    </ul>
  </div>
</li>
<li>
  <div class="pagination pagination-centered">
    <ul class="dropdown-wide">
      <li class="dropdown-page"><a class="dropdown-link" href="#" onclick="pageTo(9)">2012</a></li>
      <li class="dropdown-page"><a class="dropdown-link float-left" href="#" onclick="pageTo(9)">Dec</a></li>
    </ul>
  </div>
</li>"##;
        let years = parse_time_nav(html).unwrap();
        assert_eq!(years.len(), 2);
        assert_eq!(years[0].year, 2013);
        assert_eq!(years[0].months.len(), 2);
        assert_eq!(years[0].months[1].page, 4);
        assert_eq!(years[1].start_page, 9);
    }

    #[test]
    fn zoom_page_reads_path_notes_and_date() {
        let html = r##"<!DOCTYPE html><html><body>
<a href="/"><img class="zoom-img" src="/piclib/thumb2/xyz.jpg"></a>
<textarea id="pic-notes5">beach trip</textarea>
<a href="#" disabled>Taken Mar 4, 2010</a>
</body></html>"##;
        let item = parse_zoom_page(5, html).unwrap();
        assert_eq!(item.path, "xyz.jpg");
        assert_eq!(item.notes, "beach trip");
        assert_eq!(item.date, "Mar 4, 2010");
    }
}
