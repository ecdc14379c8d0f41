//! Pointer-following glow over the hero section.

use crate::paint::Viewport;

/// CSS custom properties the glow overlay reads its centre from.
pub const POINTER_X_VAR: &str = "--pointer-x";
pub const POINTER_Y_VAR: &str = "--pointer-y";

/// Pointer position as percentages of the window, clamped to `[0, 100]`.
///
/// Returns `None` for an empty window, where no position is meaningful.
pub fn pointer_percent(client_x: f64, client_y: f64, window: Viewport) -> Option<(f64, f64)> {
    if window.is_empty() {
        return None;
    }
    let pct = |v: f64, extent: f64| (v / extent * 100.0).clamp(0.0, 100.0);
    Some((pct(client_x, window.width), pct(client_y, window.height)))
}

/// Format a percentage as a CSS value.
pub fn css_percent(value: f64) -> String {
    format!("{value:.2}%")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn maps_pointer_to_window_percentages() {
        let window = Viewport::new(800.0, 400.0);
        assert_eq!(pointer_percent(200.0, 100.0, window), Some((25.0, 25.0)));
        assert_eq!(pointer_percent(-5.0, 900.0, window), Some((0.0, 100.0)));
        assert_eq!(css_percent(12.3456), "12.35%");
    }

    #[test]
    fn empty_window_has_no_position() {
        let collapsed = Viewport::new(0.0, 400.0);
        assert_eq!(pointer_percent(10.0, 10.0, collapsed), None);
    }
}
