use std::ops::ControlFlow;

/// Reveals `text` one character per tick.
#[derive(Debug, Clone)]
pub struct Typewriter {
    text: String,
    shown: usize,
}

impl Typewriter {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            shown: 0,
        }
    }

    /// Characters revealed so far.
    pub fn visible(&self) -> &str {
        match self.text.char_indices().nth(self.shown) {
            Some((end, _)) => &self.text[..end],
            None => &self.text,
        }
    }

    pub fn is_done(&self) -> bool {
        self.shown >= self.text.chars().count()
    }

    /// Reveal one more character. Breaks once nothing is left to reveal.
    pub fn tick(&mut self) -> ControlFlow<()> {
        if self.is_done() {
            return ControlFlow::Break(());
        }
        self.shown += 1;
        ControlFlow::Continue(())
    }
}
