use chrono::{Local, NaiveDateTime};
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use crate::models::Task;
use crate::tasks::is_overdue;
use crate::tui::app::{App, Mode};
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::tui::widgets::completed_list::render_completed_list;
use crate::week;

/// Rows given to the completed panel under the grid
const COMPLETED_PANEL_HEIGHT: u16 = 6;

pub fn render_week_view(f: &mut Frame, area: Rect, app: &App) {
    let [header_area, grid_area, completed_area] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(4),
        Constraint::Length(COMPLETED_PANEL_HEIGHT),
    ])
    .areas(area);

    render_header(f, header_area, app);
    render_grid(f, grid_area, app);
    render_completed_list(f, completed_area, &app.completed(), app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let count = app.week_task_count();
    let mut spans = vec![
        Span::styled(app.week_label(), Style::default().fg(accent).add_modifier(Modifier::BOLD)),
        Span::raw(format!("   {} task{}", count, if count == 1 { "" } else { "s" })),
    ];
    if app.ui.mode == Mode::Search || !app.week.search.is_empty() {
        spans.push(Span::raw("   Search: "));
        spans.push(Span::styled(app.week.search.clone(), Style::default().add_modifier(Modifier::BOLD)));
        if app.ui.mode == Mode::Search {
            spans.push(Span::raw("_"));
        }
    }

    let paragraph = Paragraph::new(Line::from(spans))
        .block(Block::default().borders(Borders::ALL).title("Week"))
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(paragraph, area);
}

fn render_grid(f: &mut Frame, area: Rect, app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);
    let danger = parse_color(&active_theme.danger);
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let highlight_fg = get_contrast_text_color(highlight_bg);

    let today = week::today();
    let now = Local::now().naive_local();
    let columns = app.columns();
    let areas = Layout::horizontal([Constraint::Ratio(1, 7); 7]).split(area);

    for (idx, column) in columns.iter().enumerate() {
        let selected = idx == app.week.selected_day;
        let mut title_style = Style::default().fg(fg_color);
        if column.date == today {
            title_style = title_style.fg(accent).add_modifier(Modifier::BOLD);
        }
        let border_style = if selected {
            Style::default().fg(accent)
        } else {
            Style::default().fg(fg_color)
        };
        let title = format!(
            "{} {}",
            week::weekday_label(column.date, app.locale),
            week::format_day_month(column.date, app.locale)
        );

        let items: Vec<ListItem> = column
            .tasks
            .iter()
            .map(|task| {
                let mut style = Style::default().fg(fg_color);
                if task.completed {
                    style = style.add_modifier(Modifier::CROSSED_OUT | Modifier::DIM);
                } else if is_overdue(task, now) {
                    style = style.fg(danger);
                }
                let mut lines = vec![
                    Line::from(Span::styled(task_summary(task, now, app.locale), style)),
                    Line::from(Span::styled(task.title.clone(), style.add_modifier(Modifier::BOLD))),
                ];
                if let Some(notes) = notes_preview(task) {
                    lines.push(Line::from(Span::styled(notes, style.add_modifier(Modifier::DIM))));
                }
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(border_style)
                    .title(Span::styled(title, title_style)),
            )
            .style(Style::default().fg(fg_color).bg(bg_color))
            .highlight_style(Style::default().fg(highlight_fg).bg(highlight_bg));

        let mut state = ListState::default();
        if selected && !column.tasks.is_empty() {
            state.select(Some(app.week.selected_task));
        }
        f.render_stateful_widget(list, areas[idx], &mut state);
    }
}

/// Marker shown on open tasks whose date and time have passed
pub fn overdue_label(locale: week::Locale) -> &'static str {
    match locale {
        week::Locale::PtBr => "Não atualizado",
        week::Locale::EnUs => "Overdue",
    }
}

/// First line of a task card: checkbox, time, priority and overdue marker
pub fn task_summary(task: &Task, now: NaiveDateTime, locale: week::Locale) -> String {
    let check = if task.completed { "[x]" } else { "[ ]" };
    let mut summary = match &task.time {
        Some(time) => format!("{} {} {}", check, time, task.priority.label()),
        None => format!("{} {}", check, task.priority.label()),
    };
    if !task.completed && is_overdue(task, now) {
        summary.push_str(" ! ");
        summary.push_str(overdue_label(locale));
    }
    summary
}

/// Dimmed preview of the task notes, first line only
pub fn notes_preview(task: &Task) -> Option<String> {
    task.notes
        .lines()
        .map(str::trim)
        .find(|line| !line.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Priority;
    use chrono::NaiveDate;

    fn now() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 3, 14)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap()
    }

    #[test]
    fn summary_shows_time_priority_and_overdue_marker() {
        let mut task = Task::new("Reunião".into(), "2024-03-14".into());
        task.time = Some("09:00".into());
        task.priority = Priority::High;
        assert_eq!(task_summary(&task, now(), week::Locale::PtBr), "[ ] 09:00 Alta ! Não atualizado");
        assert_eq!(task_summary(&task, now(), week::Locale::EnUs), "[ ] 09:00 Alta ! Overdue");

        task.completed = true;
        assert_eq!(task_summary(&task, now(), week::Locale::PtBr), "[x] 09:00 Alta");
    }

    #[test]
    fn untimed_task_is_not_overdue_on_its_day() {
        let task = Task::new("Mercado".into(), "2024-03-14".into());
        assert_eq!(task_summary(&task, now(), week::Locale::PtBr), "[ ] Baixa");
    }

    #[test]
    fn notes_preview_skips_blank_lines() {
        let mut task = Task::new("Dentista".into(), "2024-03-14".into());
        assert_eq!(notes_preview(&task), None);
        task.notes = "\n  levar exames \nchegar cedo".into();
        assert_eq!(notes_preview(&task).as_deref(), Some("levar exames"));
    }
}
