use ratatui::{
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub struct HelpWindow;

const HELP_TEXT: &[&str] = &[
    " Gallery:",
    "   h / Left          Newer Page",
    "   l / Right         Older Page",
    "   g / Home          First Page",
    "   G / End           Last Page",
    "   :                 Go To Page",
    "   k / j             Select Photo",
    "   Enter             Zoom Selected Photo",
    "   t                 Jump By Date",
    "   d                 Toggle Dateless Photos",
    "   /                 Search Notes",
    "   r                 Reload Page",
    "",
    " Zoom:",
    "   Left / Right      Previous / Next Photo",
    "   n                 Edit Notes",
    "   y                 Copy Original Link",
    "   Esc / q           Back To Gallery",
    "",
    "   q                 Quit",
    "   ?                 Help",
];

impl HelpWindow {
    pub fn render(frame: &mut Frame, area: Rect, scroll_offset: u16) {
        let help_content: Vec<Line> = HELP_TEXT.iter().map(|&s| Line::from(s)).collect();

        let max_width = help_content.iter().map(|l| l.width()).max().unwrap_or(0) as u16;
        let width = (max_width + 4).min(area.width);
        let height = (help_content.len() as u16 + 2).min(area.height);

        let x = area.x + (area.width - width) / 2;
        let y = area.y + (area.height - height) / 2;
        let popup_area = Rect::new(x, y, width, height);

        frame.render_widget(Clear, popup_area);

        let help_paragraph = Paragraph::new(help_content)
            .block(Block::default().title("Help").borders(Borders::ALL))
            .scroll((scroll_offset, 0));

        frame.render_widget(help_paragraph, popup_area);
    }
}
