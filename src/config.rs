//! Tunable constants of the canvas, loadable from JSON5.
//!
//! Every field has a default matching the stock editor, so a config file only needs to
//! mention what it overrides:
//!
//! ```ignore
//! let config = CanvasConfig::from_json5_str("{ hit_test: { threshold: 14 } }")?;
//! assert_eq!(config.hit_test.segments, 20);
//! ```

use crate::error::ConfigError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Sizing of node boxes and their ports, in world units.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutConfig {
    pub min_node_width: f32,
    pub base_node_height: f32,
    /// Horizontal padding added to the image columns.
    pub horizontal_padding: f32,
    /// Width consumed by one image column.
    pub column_width: f32,
    pub images_per_row: usize,
    pub row_height: f32,
    /// Extra height for the "INPUT"/"OUTPUT" label of each non-empty side.
    pub label_allowance: f32,
    /// Edge length of the square port hit box.
    pub port_size: f32,
    /// Distance from the node's bottom edge to the port centre line.
    pub port_bottom_inset: f32,
    /// Ports sit this far left of the node edge they are attached to.
    pub port_edge_offset: f32,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            min_node_width: 250.0,
            base_node_height: 80.0,
            horizontal_padding: 20.0,
            column_width: 70.0,
            images_per_row: 4,
            row_height: 80.0,
            label_allowance: 30.0,
            port_size: 16.0,
            port_bottom_inset: 30.0,
            port_edge_offset: 8.0,
        }
    }
}

/// Connection picking parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HitTestConfig {
    /// Uniform parameter steps along a connection curve (samples = segments + 1).
    pub segments: usize,
    /// Maximum distance, in world units, between the cursor and a curve sample.
    pub threshold: f32,
}

impl Default for HitTestConfig {
    fn default() -> Self {
        Self { segments: 20, threshold: 10.0 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    pub min_zoom: f32,
    pub max_zoom: f32,
    pub zoom_step: f32,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self { min_zoom: 0.1, max_zoom: 3.0, zoom_step: 0.1 }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    /// Extensions (lower case, with the dot) that are never handed to the provider.
    pub animated_extensions: Vec<String>,
    /// The output the Origin node starts with and returns to on reset.
    pub origin_default: String,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            animated_extensions: vec![".gif".to_string()],
            origin_default: "images/input.png".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Grid spacing in screen pixels.
    pub spacing: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self { spacing: 20.0 }
    }
}

/// All canvas settings.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasConfig {
    pub layout: LayoutConfig,
    pub hit_test: HitTestConfig,
    pub viewport: ViewportConfig,
    pub images: ImageConfig,
    pub grid: GridConfig,
}

impl CanvasConfig {
    /// Parse a JSON5 document. Missing sections and fields keep their defaults.
    pub fn from_json5_str(text: &str) -> Result<Self, ConfigError> {
        let config: CanvasConfig = json5::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Read and parse a JSON5 file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path)?;
        let config = Self::from_json5_str(&text)?;
        log::debug!("loaded canvas config from {}", path.display());
        Ok(config)
    }

    /// Like [`load`](Self::load), but falls back to the defaults when the file is
    /// missing or broken.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        match Self::load(path) {
            Ok(config) => config,
            Err(err) => {
                log::warn!("using default canvas config ({}): {err}", path.display());
                Self::default()
            }
        }
    }

    /// Check the constraints the engine relies on. [`from_json5_str`](Self::from_json5_str)
    /// runs this; configs built in code are [`sanitized`](Self::sanitized) on use instead.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.viewport.validate()?;
        if self.layout.images_per_row == 0 {
            return Err(ConfigError::Invalid("images_per_row must be at least 1".into()));
        }
        if self.hit_test.segments == 0 {
            return Err(ConfigError::Invalid("hit_test.segments must be at least 1".into()));
        }
        Ok(())
    }

    /// Replace every value that fails [`validate`](Self::validate) with its default.
    pub fn sanitized(mut self) -> Self {
        self.viewport = self.viewport.sanitized();
        if self.layout.images_per_row == 0 {
            log::warn!("images_per_row is 0, using {}", LayoutConfig::default().images_per_row);
            self.layout.images_per_row = LayoutConfig::default().images_per_row;
        }
        if self.hit_test.segments == 0 {
            log::warn!("hit_test.segments is 0, using {}", HitTestConfig::default().segments);
            self.hit_test.segments = HitTestConfig::default().segments;
        }
        self
    }
}

impl ViewportConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        // Negated so NaN fails too
        if !(self.min_zoom > 0.0 && self.min_zoom <= self.max_zoom) {
            return Err(ConfigError::Invalid(format!(
                "zoom range [{}, {}] is empty or not positive",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step > 0.0) {
            return Err(ConfigError::Invalid("zoom_step must be positive".into()));
        }
        Ok(())
    }

    /// Fall back to the default range and step when they fail [`validate`](Self::validate).
    pub fn sanitized(self) -> Self {
        match self.validate() {
            Ok(()) => self,
            Err(err) => {
                log::warn!("{err}, using the default zoom settings");
                Self::default()
            }
        }
    }
}
