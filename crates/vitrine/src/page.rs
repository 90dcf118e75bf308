//! Vertical layout of the showcase page.

use ratatui::text::Span;
use vitrine_config::SectionConfig;
use vitrine_effects::SectionBounds;

/// Blank rows around the title and below the body of a text section.
const PADDING: u32 = 1;
/// Columns kept free on either side of wrapped text.
pub const MARGIN: u16 = 4;

/// Where one section sits on the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectionLayout {
    /// Index into the configured sections.
    pub index: usize,
    pub top: u32,
    pub height: u32,
    /// Body text wrapped to the page width.
    pub lines: Vec<String>,
}

/// The whole page laid out for a terminal size.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PageLayout {
    pub sections: Vec<SectionLayout>,
    pub height: u32,
}

impl PageLayout {
    /// Stack `sections` top to bottom. Hero sections fill one screen, text
    /// sections take their title, wrapped body and padding.
    pub fn new(sections: &[SectionConfig], columns: u16, rows: u16) -> Self {
        let width = text_width(columns);
        let mut top = 0;
        let sections = sections
            .iter()
            .enumerate()
            .map(|(index, section)| {
                let lines = wrap(&section.body, width);
                let height = if section.hero {
                    u32::from(rows.max(1))
                } else {
                    // title, gap, body, trailing gap
                    PADDING + 1 + PADDING + lines.len() as u32 + PADDING
                };
                let layout = SectionLayout {
                    index,
                    top,
                    height,
                    lines,
                };
                top += height;
                layout
            })
            .collect();
        Self {
            sections,
            height: top,
        }
    }

    /// Reveal bounds for every section, by id.
    pub fn bounds<'a>(
        &'a self,
        sections: &'a [SectionConfig],
    ) -> impl Iterator<Item = SectionBounds> + 'a {
        self.sections
            .iter()
            .map(|layout| SectionBounds::new(&sections[layout.index].id, layout.top, layout.height))
    }

    /// Largest scroll offset that still fills the screen.
    pub fn max_scroll(&self, rows: u16) -> u32 {
        self.height.saturating_sub(u32::from(rows))
    }
}

/// Usable text width for a terminal `columns` wide.
pub fn text_width(columns: u16) -> usize {
    let width = columns.saturating_sub(MARGIN * 2);
    usize::from(width.max(1))
}

/// Greedy word wrap by terminal display width. Words wider than `width`
/// are split.
pub fn wrap(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut lines = Vec::new();
    let mut line = String::new();
    let mut line_width = 0;
    for word in text.split_whitespace() {
        let mut word = word;
        while display_width(word) > width {
            if !line.is_empty() {
                lines.push(std::mem::take(&mut line));
                line_width = 0;
            }
            let split = split_at_width(word, width);
            lines.push(word[..split].to_string());
            word = &word[split..];
        }
        if word.is_empty() {
            continue;
        }
        let word_width = display_width(word);
        if !line.is_empty() && line_width + 1 + word_width > width {
            lines.push(std::mem::take(&mut line));
            line_width = 0;
        }
        if !line.is_empty() {
            line.push(' ');
            line_width += 1;
        }
        line.push_str(word);
        line_width += word_width;
    }
    if !line.is_empty() {
        lines.push(line);
    }
    lines
}

/// Columns `text` takes in the terminal, measured the way ratatui lays it
/// out.
fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

/// Byte index ending the widest prefix of `word` that fits in `width`
/// columns. Always keeps at least one character.
fn split_at_width(word: &str, width: usize) -> usize {
    let mut used = 0;
    for (i, ch) in word.char_indices() {
        let ch_width = display_width(&word[i..i + ch.len_utf8()]);
        if i > 0 && used + ch_width > width {
            return i;
        }
        used += ch_width;
    }
    word.len()
}
