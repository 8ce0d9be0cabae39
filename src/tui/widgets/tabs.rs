use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Tabs;
use ratatui::Frame;

use crate::tui::app::Tab;
use crate::tui::widgets::color::{get_contrast_text_color, parse_color};
use crate::utils::format_key_binding_for_display;
use crate::Config;

pub fn render_tabs(f: &mut Frame, area: Rect, current_tab: Tab, config: &Config) {
    let active_theme = config.get_active_theme();
    let highlight_bg = parse_color(&active_theme.highlight_bg);
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);
    let tab_bg = parse_color(&active_theme.tab_bg);
    let tab_fg = get_contrast_text_color(tab_bg);

    // Each tab is a padded box on tab_bg, prefixed with its shortcut
    let tab_box = |key: &str, name: &str| {
        Line::from(vec![
            Span::styled("  ", Style::default().bg(tab_bg)),
            Span::styled(
                format!("{} {}", format_key_binding_for_display(key), name),
                Style::default().fg(tab_fg).bg(tab_bg),
            ),
            Span::styled("  ", Style::default().bg(tab_bg)),
        ])
    };
    let titles = vec![
        tab_box(&config.key_bindings.tab_1, "Week"),
        tab_box(&config.key_bindings.tab_2, "Notes"),
    ];

    let tab_index = match current_tab {
        Tab::Week => 0,
        Tab::Notes => 1,
    };

    let tabs = Tabs::new(titles)
        .select(tab_index)
        .style(Style::default().fg(fg_color).bg(bg_color))
        .highlight_style(
            Style::default()
                .fg(get_contrast_text_color(highlight_bg))
                .bg(highlight_bg)
                .add_modifier(Modifier::BOLD),
        )
        .divider("  ")
        .padding("", "");

    f.render_widget(tabs, area);
}
