use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

/// Single text-entry popup used for the page number, search and notes prompts.
pub struct PromptWindow;

impl PromptWindow {
    pub fn render(frame: &mut Frame, area: Rect, title: &str, input: &str, multiline: bool) {
        let height = if multiline { area.height / 3 } else { 3 };
        let popup_area = Rect::new(
            area.x + area.width / 8,
            area.y + area.height / 3,
            area.width * 3 / 4,
            height.max(3).min(area.height),
        );

        frame.render_widget(Clear, popup_area);

        let paragraph = Paragraph::new(Line::from(format!("{input}_")))
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(format!("{title} (Enter: ok, Esc: cancel)"))
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Blue)),
            )
            .style(Style::default().add_modifier(Modifier::BOLD));

        frame.render_widget(paragraph, popup_area);
    }
}
