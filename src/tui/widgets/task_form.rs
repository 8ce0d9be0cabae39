use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::models::Priority;
use crate::tui::app::{TaskField, TaskForm};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::popup_area;
use crate::tui::widgets::prompt::render_text_field;
use crate::Config;

pub fn render_task_form(f: &mut Frame, area: Rect, form: &mut TaskForm, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup = popup_area(area, 70, 80);
    f.render_widget(Clear, popup);

    let title = if form.editing_id.is_some() { "Edit task" } else { "New task" };
    let outer = Block::default()
        .borders(Borders::ALL)
        .title(title)
        .style(Style::default().fg(fg_color).bg(bg_color));
    let inner = outer.inner(popup);
    f.render_widget(outer, popup);

    let [title_area, when_area, priority_area, notes_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Length(3),
        Constraint::Min(3),
    ])
    .areas(inner);
    let [date_area, time_area] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(when_area);

    let current = form.current_field;
    render_text_field(f, title_area, "Title", &mut form.title, current == TaskField::Title, config);
    render_text_field(f, date_area, "Date (YYYY-MM-DD)", &mut form.date, current == TaskField::Date, config);
    render_text_field(f, time_area, "Time (HH:MM)", &mut form.time, current == TaskField::Time, config);
    render_priority(f, priority_area, form.priority, current == TaskField::Priority, config);
    render_text_field(f, notes_area, "Notes", &mut form.notes, current == TaskField::Notes, config);
}

fn render_priority(f: &mut Frame, area: Rect, priority: Priority, focused: bool, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let border_color = if focused {
        parse_color(&active_theme.accent)
    } else {
        fg_color
    };

    let mut spans = Vec::new();
    for option in Priority::ALL {
        let style = if option == priority {
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(fg_color)
        };
        spans.push(Span::styled(format!(" {} ", option.label()), style));
        spans.push(Span::raw(" "));
    }

    let paragraph = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color))
            .title("Priority (←/→)"),
    );
    f.render_widget(paragraph, area);
}
