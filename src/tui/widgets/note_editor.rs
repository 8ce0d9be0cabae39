use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear};
use ratatui::Frame;

use crate::tui::app::{NoteEditor, NoteField};
use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::tui::widgets::prompt::render_text_field;
use crate::Config;

pub fn render_note_editor(f: &mut Frame, area: Rect, note: &mut NoteEditor, words_per_line: usize, config: &Config) {
    let active_theme = config.get_active_theme();
    let popup = popup_area(area, 70, 70);
    f.render_widget(Clear, popup);

    let title = if note.note_id.is_some() { "Edit note" } else { "New note" };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(format!("{} ({} words per line)", title, words_per_line))
        .style(
            Style::default()
                .fg(parse_color(&active_theme.fg))
                .bg(parse_color(&active_theme.bg)),
        );
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let current = note.current_field;
    if note.note_id.is_some() {
        let [title_area, text_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Min(3)]).areas(inner);
        render_text_field(f, title_area, "Title", &mut note.title, current == NoteField::Title, config);
        render_text_field(f, text_area, "Text", &mut note.text, current == NoteField::Text, config);
    } else {
        render_text_field(f, inner, "Text", &mut note.text, true, config);
    }
}
