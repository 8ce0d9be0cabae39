use ratatui::layout::Rect;
use std::cmp;

/// Multi-line text buffer with a character-based cursor, used by every
/// input field in the TUI.
#[derive(Debug, Clone)]
pub struct Editor {
    pub lines: Vec<String>,
    pub cursor_line: usize,
    pub cursor_col: usize,
    pub scroll_offset: usize, // Vertical scroll (line offset)
    pub scroll_col: usize,    // Horizontal scroll (column offset)
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

impl Editor {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor_line: 0,
            cursor_col: 0,
            scroll_offset: 0,
            scroll_col: 0,
        }
    }

    /// Editor holding `content` with the cursor at the end
    pub fn from_string(content: &str) -> Self {
        let mut editor = Self::new();
        editor.set_text(content);
        editor.move_to_end();
        editor
    }

    /// Replace the whole buffer. The cursor is clamped to the new content.
    pub fn set_text(&mut self, content: &str) {
        self.lines = content.split('\n').map(str::to_string).collect();
        self.ensure_cursor_valid();
    }

    fn ensure_cursor_valid(&mut self) {
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        if self.cursor_line >= self.lines.len() {
            self.cursor_line = self.lines.len() - 1;
        }
        self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
    }

    fn line_len(&self, line: usize) -> usize {
        self.lines.get(line).map(|l| l.chars().count()).unwrap_or(0)
    }

    pub fn insert_char(&mut self, ch: char) {
        if ch == '\n' {
            self.insert_newline();
            return;
        }
        self.ensure_cursor_valid();
        let line = &mut self.lines[self.cursor_line];
        let byte_idx = char_to_byte(line, self.cursor_col);
        line.insert(byte_idx, ch);
        self.cursor_col += 1;
    }

    pub fn insert_newline(&mut self) {
        self.ensure_cursor_valid();
        let line = &mut self.lines[self.cursor_line];
        let byte_idx = char_to_byte(line, self.cursor_col);
        let remainder = line.split_off(byte_idx);
        self.lines.insert(self.cursor_line + 1, remainder);
        self.cursor_line += 1;
        self.cursor_col = 0;
    }

    /// Backspace: delete the character before the cursor, joining lines at column 0
    pub fn delete_char(&mut self) {
        self.ensure_cursor_valid();
        if self.cursor_col > 0 {
            let line = &mut self.lines[self.cursor_line];
            let byte_idx = char_to_byte(line, self.cursor_col - 1);
            line.remove(byte_idx);
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            let current = self.lines.remove(self.cursor_line);
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.lines[self.cursor_line].push_str(&current);
        }
    }

    /// Delete: remove the character under the cursor
    pub fn delete_forward(&mut self) {
        self.ensure_cursor_valid();
        if self.cursor_col < self.line_len(self.cursor_line) {
            let line = &mut self.lines[self.cursor_line];
            let byte_idx = char_to_byte(line, self.cursor_col);
            line.remove(byte_idx);
        } else if self.cursor_line + 1 < self.lines.len() {
            let next = self.lines.remove(self.cursor_line + 1);
            self.lines[self.cursor_line].push_str(&next);
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.lines.len() {
            self.cursor_line += 1;
            self.cursor_col = 0;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    pub fn move_to_end(&mut self) {
        self.cursor_line = self.lines.len().saturating_sub(1);
        self.cursor_col = self.line_len(self.cursor_line);
    }

    /// Cursor as a character offset into `to_string()`
    pub fn cursor_offset(&self) -> usize {
        let before: usize = self.lines[..self.cursor_line]
            .iter()
            .map(|l| l.chars().count() + 1)
            .sum();
        before + self.cursor_col
    }

    /// Place the cursor at a character offset into `to_string()`, clamped to the end
    pub fn set_cursor_offset(&mut self, offset: usize) {
        let mut remaining = offset;
        for (idx, line) in self.lines.iter().enumerate() {
            let len = line.chars().count();
            if remaining <= len {
                self.cursor_line = idx;
                self.cursor_col = remaining;
                return;
            }
            remaining -= len + 1;
        }
        self.move_to_end();
    }

    pub fn to_string(&self) -> String {
        self.lines.join("\n")
    }

    /// Visible slice of the buffer for a viewport, with horizontal scroll applied
    pub fn get_visible_lines(&self, viewport_height: usize, viewport_width: usize) -> Vec<String> {
        let start = cmp::min(self.scroll_offset, self.lines.len());
        let end = cmp::min(start + viewport_height, self.lines.len());
        self.lines[start..end]
            .iter()
            .map(|line| line.chars().skip(self.scroll_col).take(viewport_width).collect())
            .collect()
    }

    /// Adjust scrolling so the cursor stays inside the viewport
    pub fn update_scroll(&mut self, viewport_height: usize, viewport_width: usize) {
        let viewport_height = viewport_height.max(1);
        let viewport_width = viewport_width.max(1);
        if self.cursor_line < self.scroll_offset {
            self.scroll_offset = self.cursor_line;
        } else if self.cursor_line >= self.scroll_offset + viewport_height {
            self.scroll_offset = self.cursor_line + 1 - viewport_height;
        }
        if self.cursor_col < self.scroll_col {
            self.scroll_col = self.cursor_col;
        } else if self.cursor_col >= self.scroll_col + viewport_width {
            self.scroll_col = self.cursor_col + 1 - viewport_width;
        }
    }

    /// Screen position of the cursor inside `inner` (an area without borders)
    pub fn get_cursor_screen_pos(&self, inner: Rect) -> Option<(u16, u16)> {
        let row = self.cursor_line.checked_sub(self.scroll_offset)?;
        let col = self.cursor_col.checked_sub(self.scroll_col)?;
        if row >= inner.height as usize || col >= inner.width as usize {
            return None;
        }
        Some((inner.x + col as u16, inner.y + row as u16))
    }
}

fn char_to_byte(s: &str, char_idx: usize) -> usize {
    s.char_indices().nth(char_idx).map(|(i, _)| i).unwrap_or(s.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn typing_and_backspace_handle_multibyte_chars() {
        let mut e = Editor::new();
        for ch in "pão".chars() {
            e.insert_char(ch);
        }
        assert_eq!(e.to_string(), "pão");
        e.move_cursor_left();
        e.delete_char();
        assert_eq!(e.to_string(), "po");
        assert_eq!(e.cursor_col, 1);
    }

    #[test]
    fn newline_splits_and_backspace_joins() {
        let mut e = Editor::from_string("abcd");
        e.move_cursor_left();
        e.move_cursor_left();
        e.insert_newline();
        assert_eq!(e.lines, vec!["ab", "cd"]);
        e.delete_char();
        assert_eq!(e.to_string(), "abcd");
        assert_eq!((e.cursor_line, e.cursor_col), (0, 2));
    }

    #[test]
    fn cursor_offset_round_trips_across_lines() {
        let mut e = Editor::from_string("a b\ncd\ne");
        assert_eq!(e.cursor_offset(), 8);
        e.set_cursor_offset(5);
        assert_eq!((e.cursor_line, e.cursor_col), (1, 1));
        assert_eq!(e.cursor_offset(), 5);
        e.set_cursor_offset(3);
        assert_eq!((e.cursor_line, e.cursor_col), (0, 3));
        e.set_cursor_offset(100);
        assert_eq!((e.cursor_line, e.cursor_col), (2, 1));
    }

    #[test]
    fn set_text_clamps_cursor() {
        let mut e = Editor::from_string("long line here");
        e.set_text("ab");
        assert_eq!((e.cursor_line, e.cursor_col), (0, 2));
    }

    #[test]
    fn scroll_follows_cursor() {
        let mut e = Editor::from_string("1\n2\n3\n4\n5");
        e.update_scroll(2, 10);
        assert_eq!(e.scroll_offset, 3);
        assert_eq!(e.get_visible_lines(2, 10), vec!["4", "5"]);
        let inner = Rect::new(10, 5, 10, 2);
        assert_eq!(e.get_cursor_screen_pos(inner), Some((11, 6)));
    }
}
