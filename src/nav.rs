//! Scroll spy for the header navigation.

/// Page sections in document order, by element id.
pub const SECTIONS: [&str; 5] = ["home", "about", "skills", "projects", "contact"];

/// Scroll offset in CSS pixels past which the header switches to its compact style.
pub const SCROLLED_AFTER: f64 = 50.0;

/// Distance from the top of the viewport at which a section counts as current.
pub const ACTIVE_LINE: f64 = 100.0;

/// Vertical extent of a section relative to the viewport.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SectionBounds {
    pub id: &'static str,
    pub top: f64,
    pub bottom: f64,
}

impl SectionBounds {
    pub fn spans_active_line(&self) -> bool {
        self.top <= ACTIVE_LINE && self.bottom >= ACTIVE_LINE
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavState {
    pub scrolled: bool,
    pub active: &'static str,
}

impl Default for NavState {
    fn default() -> Self {
        Self {
            scrolled: false,
            active: SECTIONS[0],
        }
    }
}

impl NavState {
    /// Recompute from the current scroll offset. The first section crossing the
    /// active line wins; when none does the previous section stays active.
    pub fn update(&mut self, scroll_y: f64, sections: &[SectionBounds]) -> bool {
        let next = Self {
            scrolled: scroll_y > SCROLLED_AFTER,
            active: active_section(sections).unwrap_or(self.active),
        };
        let changed = next != *self;
        *self = next;
        changed
    }
}

pub fn active_section(sections: &[SectionBounds]) -> Option<&'static str> {
    sections
        .iter()
        .find(|s| s.spans_active_line())
        .map(|s| s.id)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(id: &'static str, top: f64, height: f64) -> SectionBounds {
        SectionBounds {
            id,
            top,
            bottom: top + height,
        }
    }

    #[test]
    fn first_section_across_the_line_wins() {
        let sections = [
            bounds("home", -900.0, 1000.0),
            bounds("about", 100.0, 600.0),
        ];
        assert_eq!(active_section(&sections), Some("home"));
    }

    #[test]
    fn keeps_previous_section_between_sections() {
        let mut nav = NavState {
            scrolled: true,
            active: "skills",
        };
        let sections = [bounds("projects", 150.0, 500.0)];
        assert!(!nav.update(800.0, &sections));
        assert_eq!(nav.active, "skills");
    }

    #[test]
    fn header_compacts_past_threshold() {
        let mut nav = NavState::default();
        assert!(!nav.update(SCROLLED_AFTER, &[]));
        assert!(nav.update(SCROLLED_AFTER + 1.0, &[]));
        assert!(nav.scrolled);
        assert_eq!(nav.active, "home");
    }
}
