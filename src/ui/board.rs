use ratatui::{
    Frame,
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::controller::PageWindowController;
use crate::models::{GalleryPage, ZoomItem};
use crate::zoom::ZoomNavigator;

/// Page-link strip: only the links inside the window are drawn; the active
/// link is highlighted.
pub fn render_nav_strip(frame: &mut Frame, area: Rect, controller: &PageWindowController) {
    let mut spans = vec![Span::styled("« Newer ", Style::default().fg(Color::DarkGray))];
    for link in controller.window().visible_links() {
        let style = if link.active {
            Style::default().bg(Color::Blue).fg(Color::White).add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", link.page), style));
    }
    spans.push(Span::styled(" Older »", Style::default().fg(Color::DarkGray)));

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(paragraph, area);
}

/// Thumbnail list of the loaded gallery page.
pub fn render_gallery(frame: &mut Frame, area: Rect, gallery: Option<&GalleryPage>, selected: usize) {
    let Some(gallery) = gallery else {
        render_empty(frame, area, "Loading gallery…");
        return;
    };
    let title = format!("Page {}", gallery.page);

    if gallery.thumbnails.is_empty() {
        let lines: Vec<Line> = gallery
            .fallback_text
            .iter()
            .map(|l| Line::from(l.as_str()))
            .collect();
        let paragraph = Paragraph::new(lines)
            .wrap(Wrap { trim: true })
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(paragraph, area);
        return;
    }

    let items: Vec<ListItem> = gallery
        .thumbnails
        .iter()
        .map(|thumb| {
            ListItem::new(Line::from(vec![
                Span::styled(format!("#{:<6}", thumb.index), Style::default().fg(Color::DarkGray)),
                Span::raw(format!("{:<14}", thumb.date)),
                Span::raw(thumb.path.clone()),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(Block::default().title(title).borders(Borders::ALL))
        .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
    let mut list_state = ListState::default().with_selected(Some(selected));
    frame.render_stateful_widget(list, area, &mut list_state);
}

pub fn render_zoom(frame: &mut Frame, area: Rect, zoom: &ZoomNavigator) {
    let title = format!(
        "Item {} of {}",
        zoom.curr_pic() + 1,
        zoom.num_photos().max(zoom.curr_pic() + 1)
    );
    let Some(item) = zoom.item() else {
        render_empty(frame, area, "Loading item…");
        return;
    };

    let paragraph = Paragraph::new(zoom_lines(item))
        .wrap(Wrap { trim: false })
        .block(Block::default().title(title).borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}

fn zoom_lines(item: &ZoomItem) -> Vec<Line<'_>> {
    let label = Style::default().fg(Color::DarkGray);
    let mut lines = vec![
        Line::from(vec![Span::styled("Path   ", label), Span::raw(item.path.as_str())]),
        Line::from(vec![Span::styled("Taken  ", label), Span::raw(item.date.as_str())]),
        Line::from(""),
        Line::from(Span::styled("Notes", label)),
    ];
    if item.notes.is_empty() {
        lines.push(Line::from(Span::styled(
            "(none)",
            Style::default().add_modifier(Modifier::ITALIC),
        )));
    } else {
        lines.extend(item.notes.lines().map(Line::from));
    }
    lines
}

/// Counters, dateless label, window position and the transient message.
pub fn render_status(
    frame: &mut Frame,
    area: Rect,
    controller: &PageWindowController,
    message: Option<(&str, Color)>,
) {
    let page = controller
        .curr_page()
        .map(|p| format!("page {p}"))
        .unwrap_or_else(|| "page -".to_string());
    let window = controller.window();
    let mut spans = vec![
        Span::raw(controller.num_pages_label()),
        Span::raw(" | "),
        Span::raw(controller.num_photos_label()),
        Span::raw(" | "),
        Span::raw(controller.dateless_label()),
        Span::raw(" | "),
        Span::raw(page),
        Span::styled(
            format!(" [{}-{}]", window.start(), window.end()),
            Style::default().fg(Color::DarkGray),
        ),
    ];
    if let Some(at) = controller.page_set().refreshed_at {
        spans.push(Span::styled(
            format!(" {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    match (message, controller.last_error()) {
        (Some((text, color)), _) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(text.to_string(), Style::default().fg(color)));
        }
        (None, Some(err)) => {
            spans.push(Span::raw("  "));
            spans.push(Span::styled(format!("! {err}"), Style::default().fg(Color::Red)));
        }
        (None, None) => {}
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_empty(frame: &mut Frame, area: Rect, text: &str) {
    let paragraph = Paragraph::new(Line::from(text.to_string()))
        .style(Style::default().fg(Color::DarkGray).add_modifier(Modifier::ITALIC))
        .block(Block::default().borders(Borders::ALL));
    frame.render_widget(paragraph, area);
}
