use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub mod color;
pub mod completed_list;
pub mod confirm_delete;
pub mod editor;
pub mod help;
pub mod note_blocks;
pub mod note_editor;
pub mod prompt;
pub mod status_bar;
pub mod tabs;
pub mod task_form;
pub mod week_grid;

/// Centered rect using a percentage of the available rect.
/// Based on the ratatui popup example: https://ratatui.rs/examples/apps/popup/
pub fn popup_area(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Percentage(percent_y)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}

/// Centered rect with a fixed height in rows
pub fn popup_area_fixed(area: Rect, percent_x: u16, height: u16) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)]).flex(Flex::Center);
    let horizontal = Layout::horizontal([Constraint::Percentage(percent_x)]).flex(Flex::Center);
    let [area] = vertical.areas(area);
    let [area] = horizontal.areas(area);
    area
}
