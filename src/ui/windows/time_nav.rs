use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, List, ListItem, ListState},
    Frame,
};

use super::centered_popup_area;

/// Year/month picker built from the server's time navigation.
pub struct TimeNavWindow;

impl TimeNavWindow {
    pub fn render(frame: &mut Frame, area: Rect, entries: &[(String, u32)], selected_index: usize) {
        let popup_area = centered_popup_area(area, 40, 70);
        frame.render_widget(Clear, popup_area);

        let items: Vec<ListItem> = entries
            .iter()
            .map(|(label, page)| {
                let style = if label.starts_with(' ') {
                    Style::default()
                } else {
                    Style::default().add_modifier(Modifier::BOLD)
                };
                ListItem::new(Line::from(format!("{label:<16} p.{page}"))).style(style)
            })
            .collect();

        let list = List::new(items)
            .block(Block::default().title("Jump By Date").borders(Borders::ALL))
            .highlight_style(Style::default().bg(Color::Blue).fg(Color::White));
        let mut state = ListState::default().with_selected(Some(selected_index));
        frame.render_stateful_widget(list, popup_area, &mut state);
    }
}
