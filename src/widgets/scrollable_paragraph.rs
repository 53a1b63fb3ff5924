use unicode_width::UnicodeWidthChar;

/// Scroll position over a block of wrapped text that may be taller than its panel.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ScrollableParagraphState {
    pub content: String,
    pub scroll_offset_vertical: u16,
    pub panel_width: u16,  // inner width, used to count wrapped rows
    pub panel_height: u16, // inner height; 0 until the first layout pass
}

impl ScrollableParagraphState {
    pub fn new(content: String) -> Self {
        Self { content, scroll_offset_vertical: 0, panel_width: 0, panel_height: 0 }
    }

    /// Replaces the text. Scroll resets only when the text actually changed.
    pub fn set_content(&mut self, content: &str) {
        if self.content != content {
            self.content = content.to_string();
            self.scroll_offset_vertical = 0;
        }
    }

    /// Records the inner panel size from the latest layout and re-caps the scroll.
    pub fn set_panel_size(&mut self, width: u16, height: u16) {
        self.panel_width = width;
        self.panel_height = height;
        self.scroll_offset_vertical = self.scroll_offset_vertical.min(self.max_scroll());
    }

    pub fn scroll_up(&mut self, amount: u16) {
        self.scroll_offset_vertical = self.scroll_offset_vertical.saturating_sub(amount);
    }

    pub fn scroll_down(&mut self, amount: u16) {
        self.scroll_offset_vertical =
            self.scroll_offset_vertical.saturating_add(amount).min(self.max_scroll());
    }

    /// Number of terminal rows the content takes once wrapped to `panel_width`.
    pub fn wrapped_row_count(&self) -> usize {
        self.content.lines().map(|line| wrapped_rows(line, self.panel_width)).sum()
    }

    fn max_scroll(&self) -> u16 {
        let rows = u16::try_from(self.wrapped_row_count()).unwrap_or(u16::MAX);
        rows.saturating_sub(self.panel_height)
    }
}

/// Rows a single hard line occupies under greedy word wrapping without trimming.
///
/// Words that fit move to the next row whole; words wider than the panel
/// (and runs of whitespace) are broken at character boundaries. A wide CJK
/// char never straddles two rows.
fn wrapped_rows(line: &str, width: u16) -> usize {
    let width = usize::from(width);
    if width == 0 {
        return 1;
    }

    let mut rows = 1;
    let mut used = 0;
    for token in split_words(line) {
        let token_width: usize = token.chars().filter_map(|c| c.width()).sum();
        let is_word = !token.starts_with(char::is_whitespace);

        if used + token_width <= width {
            used += token_width;
        } else if is_word && token_width <= width && used > 0 {
            // Word doesn't fit on this row but fits on a fresh one
            rows += 1;
            used = token_width;
        } else {
            for ch in token.chars() {
                let ch_width = ch.width().unwrap_or(0);
                if used + ch_width > width {
                    rows += 1;
                    used = 0;
                }
                used += ch_width;
            }
        }
    }
    rows
}

/// Splits into alternating runs of whitespace and non-whitespace.
fn split_words(line: &str) -> Vec<&str> {
    let mut tokens = Vec::new();
    let mut start = 0;
    let mut in_space: Option<bool> = None;
    for (i, ch) in line.char_indices() {
        let space = ch.is_whitespace();
        if in_space.is_some_and(|s| s != space) {
            tokens.push(&line[start..i]);
            start = i;
        }
        in_space = Some(space);
    }
    if start < line.len() {
        tokens.push(&line[start..]);
    }
    tokens
}
