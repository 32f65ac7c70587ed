/// Default number of words shown per visible line.
pub const DEFAULT_WORDS_PER_LINE: usize = 18;

/// Fixed-size paging of the word list into visible lines.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LineWindow {
    page_size: usize,
    line: usize,
}

impl LineWindow {
    pub fn new(page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            line: 0,
        }
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Index of the visible line.
    pub fn line(&self) -> usize {
        self.line
    }

    pub fn line_for(&self, word_index: usize) -> usize {
        word_index / self.page_size
    }

    /// Move the window to the page containing `word_index`.
    /// Returns true if the visible line changed.
    pub fn sync(&mut self, word_index: usize) -> bool {
        let line = self.line_for(word_index);
        let changed = line != self.line;
        self.line = line;
        changed
    }

    /// Range of word indices currently visible, clamped to `len` words.
    pub fn range(&self, len: usize) -> std::ops::Range<usize> {
        let start = (self.line * self.page_size).min(len);
        let end = (start + self.page_size).min(len);
        start..end
    }

    pub fn visible<'a>(&self, words: &'a [String]) -> &'a [String] {
        &words[self.range(words.len())]
    }
}
