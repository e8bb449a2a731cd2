use crate::config::GridConfig;
use crate::viewport::Viewport;

/// Generate SVG path commands for the background grid
///
/// The grid is anchored to the world origin: lines are `spacing * zoom` apart and shifted
/// by the pan offset (modulo the spacing), so panning slides the grid along with the
/// nodes.
///
/// # Arguments
/// * `width` - Canvas width in pixels
/// * `height` - Canvas height in pixels
/// * `viewport` - Current pan/zoom
/// * `config` - Base grid spacing (before zoom)
///
/// # Returns
/// SVG path commands string (e.g., "M 20 0 L 20 600 M 40 0 L 40 600...")
pub fn generate_grid_commands(
    width: f32,
    height: f32,
    viewport: &Viewport,
    config: &GridConfig,
) -> String {
    let effective_spacing = config.spacing * viewport.zoom();

    // Too dense to be useful
    if effective_spacing < 2.0 {
        return String::new();
    }

    let (pan_x, pan_y) = viewport.pan_offset();
    let offset_x = pan_x.rem_euclid(effective_spacing);
    let offset_y = pan_y.rem_euclid(effective_spacing);

    let mut commands = String::with_capacity(4096);

    let mut x = offset_x;
    while x < width {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!("M {} 0 L {} {}", x, x, height));
        x += effective_spacing;
    }

    let mut y = offset_y;
    while y < height {
        if !commands.is_empty() {
            commands.push(' ');
        }
        commands.push_str(&format!("M 0 {} L {} {}", y, width, y));
        y += effective_spacing;
    }

    commands
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(width: f32, height: f32, viewport: &Viewport) -> String {
        generate_grid_commands(width, height, viewport, &GridConfig::default())
    }

    // ========================================================================
    // Basic Grid Generation
    // ========================================================================

    #[test]
    fn test_grid_lines_every_20_units() {
        let commands = grid(100.0, 60.0, &Viewport::default());
        assert!(commands.starts_with("M 0 0 L 0 60"));
        assert!(commands.contains("M 20 0 L 20 60"));
        assert!(commands.contains("M 80 0 L 80 60"));
        assert!(commands.contains("M 0 40 L 100 40"));
        // Lines stop before the far edge
        assert!(!commands.contains("M 100 0"));
        assert!(!commands.contains("M 0 60 L"));
    }

    #[test]
    fn test_grid_line_count() {
        let commands = grid(100.0, 60.0, &Viewport::default());
        // 5 vertical + 3 horizontal
        assert_eq!(commands.matches("M ").count(), 8);
    }

    #[test]
    fn test_grid_no_trailing_space() {
        let commands = grid(100.0, 100.0, &Viewport::default());
        assert!(!commands.ends_with(' '));
        assert!(!commands.starts_with(' '));
    }

    // ========================================================================
    // Pan / Zoom Behavior
    // ========================================================================

    #[test]
    fn test_grid_follows_pan() {
        let mut viewport = Viewport::default();
        viewport.pan((7.0, -3.0));
        let commands = grid(100.0, 100.0, &viewport);
        assert!(commands.starts_with("M 7 0 L 7 100"));
        assert!(commands.contains("M 0 17 L 100 17"));
    }

    #[test]
    fn test_grid_pan_wraps_with_modulo() {
        let mut viewport = Viewport::default();
        viewport.pan((40.0, 20.0));
        assert_eq!(grid(100.0, 100.0, &viewport), grid(100.0, 100.0, &Viewport::default()));
    }

    #[test]
    fn test_grid_zoom_affects_spacing() {
        let mut zoomed = Viewport::default();
        for _ in 0..10 {
            zoomed.zoom_by(1);
        }
        let normal = grid(200.0, 200.0, &Viewport::default());
        let zoomed = grid(200.0, 200.0, &zoomed);
        assert!(normal.matches("M ").count() > zoomed.matches("M ").count());
    }

    #[test]
    fn test_grid_empty_when_too_dense() {
        let config = GridConfig { spacing: 1.0 };
        assert!(generate_grid_commands(100.0, 100.0, &Viewport::default(), &config).is_empty());
    }

    #[test]
    fn test_grid_zero_dimensions() {
        assert!(grid(0.0, 0.0, &Viewport::default()).is_empty());
    }
}
