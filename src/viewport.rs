//! Pan/zoom transform between screen pixels and world units.

use crate::config::ViewportConfig;

/// Pan offset (screen pixels) and zoom factor of the canvas.
///
/// `screen = world * zoom + pan`, so the world origin sits at `pan` on screen.
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pan: (f32, f32),
    zoom: f32,
    config: ViewportConfig,
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(ViewportConfig::default())
    }
}

impl Viewport {
    /// An invalid zoom range or step falls back to the defaults
    pub fn new(config: ViewportConfig) -> Self {
        Self { pan: (0.0, 0.0), zoom: 1.0, config: config.sanitized() }
    }

    pub fn pan_offset(&self) -> (f32, f32) {
        self.pan
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn to_world(&self, screen: (f32, f32)) -> (f32, f32) {
        ((screen.0 - self.pan.0) / self.zoom, (screen.1 - self.pan.1) / self.zoom)
    }

    pub fn to_screen(&self, world: (f32, f32)) -> (f32, f32) {
        (world.0 * self.zoom + self.pan.0, world.1 * self.zoom + self.pan.1)
    }

    /// Shift the pan offset by a screen-space delta
    pub fn pan(&mut self, delta: (f32, f32)) {
        self.pan.0 += delta.0;
        self.pan.1 += delta.1;
    }

    /// Step the zoom by one notch: in for `notch > 0`, out otherwise.
    ///
    /// Returns `false` when the clamped result equals the current zoom, i.e. nothing
    /// needs to be redrawn.
    pub fn zoom_by(&mut self, notch: i32) -> bool {
        let step = if notch > 0 { self.config.zoom_step } else { -self.config.zoom_step };
        let zoom = (self.zoom + step).clamp(self.config.min_zoom, self.config.max_zoom);
        if zoom == self.zoom {
            return false;
        }
        log::trace!("zoom {} -> {}", self.zoom, zoom);
        self.zoom = zoom;
        true
    }

    /// Back to no pan and 1:1 zoom. Returns whether anything changed.
    pub fn reset(&mut self) -> bool {
        let changed = self.pan != (0.0, 0.0) || self.zoom != 1.0;
        self.pan = (0.0, 0.0);
        self.zoom = 1.0;
        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: (f32, f32), b: (f32, f32)) -> bool {
        (a.0 - b.0).abs() < 1e-4 && (a.1 - b.1).abs() < 1e-4
    }

    #[test]
    fn test_identity_by_default() {
        let viewport = Viewport::default();
        assert_eq!(viewport.to_world((123.0, 45.0)), (123.0, 45.0));
        assert_eq!(viewport.to_screen((123.0, 45.0)), (123.0, 45.0));
    }

    #[test]
    fn test_round_trip_with_pan_and_zoom() {
        let mut viewport = Viewport::default();
        viewport.pan((40.0, -25.0));
        viewport.zoom_by(1);
        viewport.zoom_by(1);

        let world = viewport.to_world((300.0, 200.0));
        assert!(approx(viewport.to_screen(world), (300.0, 200.0)));
        assert!(approx(world, ((300.0 - 40.0) / 1.2, (200.0 + 25.0) / 1.2)));
    }

    #[test]
    fn test_pan_accumulates() {
        let mut viewport = Viewport::default();
        viewport.pan((10.0, 5.0));
        viewport.pan((-3.0, 2.0));
        assert_eq!(viewport.pan_offset(), (7.0, 7.0));
        assert_eq!(viewport.to_screen((0.0, 0.0)), (7.0, 7.0));
    }

    #[test]
    fn test_zoom_direction() {
        let mut viewport = Viewport::default();
        assert!(viewport.zoom_by(1));
        assert!((viewport.zoom() - 1.1).abs() < 1e-6);
        assert!(viewport.zoom_by(-1));
        assert!(viewport.zoom_by(0));
        assert!((viewport.zoom() - 0.9).abs() < 1e-6);
    }

    #[test]
    fn test_zoom_floors_at_exactly_min() {
        let mut viewport = Viewport::default();
        for _ in 0..50 {
            viewport.zoom_by(-1);
        }
        assert_eq!(viewport.zoom(), 0.1);
        assert!(!viewport.zoom_by(-1));
        assert_eq!(viewport.zoom(), 0.1);
    }

    #[test]
    fn test_zoom_caps_at_max() {
        let mut viewport = Viewport::default();
        for _ in 0..50 {
            viewport.zoom_by(1);
        }
        assert_eq!(viewport.zoom(), 3.0);
        assert!(!viewport.zoom_by(1));
    }

    #[test]
    fn test_zoom_stays_in_range_under_mixed_input() {
        let mut viewport = Viewport::default();
        for notch in [1, 1, -1, -1, -1, 3, -7, 1, -1, -1, -1, -1, -1, -1, -1, -1, -1, -1] {
            viewport.zoom_by(notch);
            assert!(viewport.zoom() >= 0.1 && viewport.zoom() <= 3.0);
        }
    }

    #[test]
    fn test_reset() {
        let mut viewport = Viewport::default();
        assert!(!viewport.reset());
        viewport.pan((5.0, 5.0));
        viewport.zoom_by(1);
        assert!(viewport.reset());
        assert_eq!(viewport.pan_offset(), (0.0, 0.0));
        assert_eq!(viewport.zoom(), 1.0);
    }

    #[test]
    fn test_inverted_range_uses_default_limits() {
        let mut viewport = Viewport::new(ViewportConfig { min_zoom: 2.0, max_zoom: 1.0, zoom_step: 0.1 });

        assert!(viewport.zoom_by(1));
        assert!((viewport.zoom() - 1.1).abs() < 1e-6);
        while viewport.zoom_by(1) {}
        assert_eq!(viewport.zoom(), 3.0);
    }

    #[test]
    fn test_non_positive_step_uses_default_step() {
        let mut viewport = Viewport::new(ViewportConfig { zoom_step: 0.0, ..ViewportConfig::default() });
        assert!(viewport.zoom_by(-1));
        assert!((viewport.zoom() - 0.9).abs() < 1e-6);
    }
}
