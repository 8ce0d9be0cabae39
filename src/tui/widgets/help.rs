use ratatui::layout::{Alignment, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use ratatui::Frame;

use crate::tui::widgets::color::parse_color;
use crate::tui::widgets::popup_area;
use crate::utils::format_key_binding_for_display as key;
use crate::Config;

pub fn render_help(f: &mut Frame, area: Rect, config: &Config) {
    let active_theme = config.get_active_theme();
    let fg_color = parse_color(&active_theme.fg);
    let bg_color = parse_color(&active_theme.bg);

    let popup = popup_area(area, 60, 80);
    f.render_widget(Clear, popup);

    let paragraph = Paragraph::new(build_help_text(config))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Help - Key Bindings")
                .title_alignment(Alignment::Center)
                .style(Style::default().fg(fg_color).bg(bg_color)),
        )
        .style(Style::default().fg(fg_color).bg(bg_color))
        .wrap(ratatui::widgets::Wrap { trim: false });

    f.render_widget(paragraph, popup);
}

fn build_help_text(config: &Config) -> String {
    let kb = &config.key_bindings;
    let mut text = String::new();

    text.push_str("General:\n");
    text.push_str(&format!("  {} / {}: Week / Notes tab\n", key(&kb.tab_1), key(&kb.tab_2)));
    text.push_str(&format!("  {}: Delete selected (asks first)\n", key(&kb.delete)));
    text.push_str(&format!("  {}: Show/hide help\n", key(&kb.help)));
    text.push_str(&format!("  {}: Quit\n", key(&kb.quit)));
    text.push('\n');

    text.push_str("Week:\n");
    text.push_str("  ←/→: Select day   ↑/↓: Select task\n");
    text.push_str(&format!("  {} / {}: Previous / next week\n", key(&kb.prev_week), key(&kb.next_week)));
    text.push_str(&format!("  {}: This week   {}: Jump to date\n", key(&kb.today), key(&kb.jump_to_date)));
    text.push_str(&format!("  {}: Search title and notes\n", key(&kb.search)));
    text.push_str(&format!("  {}: New task on selected day\n", key(&kb.new)));
    text.push_str(&format!("  {} / Enter: Edit task\n", key(&kb.edit)));
    text.push_str(&format!("  {}: Toggle completed\n", key(&kb.toggle_complete)));
    text.push('\n');

    text.push_str("Notes:\n");
    text.push_str("  Tab / ←/→: Switch between blocks and notes\n");
    text.push_str(&format!("  {}: New block   {}: Rename block\n", key(&kb.new_block), key(&kb.rename_block)));
    text.push_str(&format!("  {}: New note in block\n", key(&kb.new)));
    text.push_str(&format!("  {} / Enter: Open note\n", key(&kb.edit)));
    text.push('\n');

    text.push_str("Editing:\n");
    text.push_str(&format!("  {}: Save   Esc: Cancel\n", key(&kb.save)));
    text.push_str("  Tab / Shift+Tab: Next / previous field\n");
    text.push_str(&format!(
        "  Note text wraps every {} words as you type\n",
        config.words_per_line
    ));

    text
}
