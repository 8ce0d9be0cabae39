use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::app::PendingDelete;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;
use crate::Config;

pub fn render_confirm_delete(f: &mut Frame, area: Rect, pending: &PendingDelete, selection: usize, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let danger = parse_color(&active_theme.danger);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let popup = popup_area(area, 50, 35);
    f.render_widget(Clear, popup);

    let base = Style::default().fg(fg_color).bg(bg_color);
    let mut lines = vec![
        Line::from(Span::styled(format!("Delete this {}?", pending.kind()), base)),
        Line::from(""),
        Line::from(Span::styled(pending.label().to_string(), base)),
    ];
    if matches!(pending, PendingDelete::Block { .. }) {
        lines.push(Line::from(Span::styled("All notes in this block will be removed.", Style::default().fg(danger))));
    }
    lines.push(Line::from(""));

    for (index, option) in ["Delete", "Cancel"].iter().enumerate() {
        let is_selected = index == selection;
        let prefix = if is_selected { "> " } else { "  " };
        let style = if is_selected {
            Style::default().fg(highlight_fg).bg(highlight_bg)
        } else {
            base
        };
        lines.push(Line::from(Span::styled(format!("{}{}", prefix, option), style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("↑↓ to choose, Enter to confirm, y/n, Esc to cancel", base)));

    let paragraph = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Confirm delete")
                .title_alignment(Alignment::Center)
                .style(base),
        )
        .style(base)
        .wrap(ratatui::widgets::Wrap { trim: true })
        .alignment(Alignment::Center);

    f.render_widget(paragraph, popup);
}
