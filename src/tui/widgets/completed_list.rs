use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, List, ListItem};
use ratatui::Frame;

use crate::models::Task;
use crate::tui::app::App;
use crate::tui::widgets::color::parse_color;
use crate::week;

pub fn render_completed_list(f: &mut Frame, area: Rect, completed: &[Task], app: &App) {
    let active_theme = app.config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let accent = parse_color(&active_theme.accent);

    let items: Vec<ListItem> = completed
        .iter()
        .map(|task| {
            let date = week::parse_ymd(&task.date)
                .map(|d| week::format_task_date(d, app.locale))
                .unwrap_or_default();
            ListItem::new(Line::from(vec![
                Span::styled("✓ ", Style::default().fg(accent)),
                Span::styled(task.title.clone(), Style::default().add_modifier(Modifier::CROSSED_OUT)),
                Span::raw(format!("  {}", date)),
            ]))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Completed ({})", completed.len())),
        )
        .style(Style::default().fg(fg_color).bg(bg_color));
    f.render_widget(list, area);
}
