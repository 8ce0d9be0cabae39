use ratatui::layout::Rect;
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::editor::Editor;
use crate::tui::widgets::popup_area_fixed;
use crate::Config;

/// Bordered text field backed by an editor. Places the terminal cursor
/// when `focused`.
pub fn render_text_field(
    f: &mut Frame,
    area: Rect,
    title: &str,
    editor: &mut Editor,
    focused: bool,
    config: &Config,
) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let border_color = if focused {
        parse_color(&active_theme.accent)
    } else {
        fg_color
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color))
        .title(title.to_string());
    let inner = block.inner(area);

    editor.update_scroll(inner.height as usize, inner.width as usize);
    let visible = editor.get_visible_lines(inner.height as usize, inner.width as usize);
    let paragraph = Paragraph::new(visible.join("\n"))
        .block(block)
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(paragraph, area);

    if focused {
        if let Some((x, y)) = editor.get_cursor_screen_pos(inner) {
            f.set_cursor_position((x, y));
        }
    }
}

/// Single-line popup prompt (block title, jump to date)
pub fn render_prompt(f: &mut Frame, area: Rect, title: &str, editor: &mut Editor, config: &Config) {
    let popup = popup_area_fixed(area, 50, 3);
    f.render_widget(Clear, popup);
    render_text_field(f, popup, title, editor, true, config);
}
