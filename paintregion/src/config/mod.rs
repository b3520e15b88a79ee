//! Brush configuration.
//!
//! [`BrushConfig`] carries everything the brush pipeline needs at
//! construction: radius bounds, the default radius, stamp resolution, and
//! the style options handed through to the rendering collaborator. It is
//! immutable once a control has been built from it.
//!
//! Configuration can be loaded from an INI file:
//!
//! ```ini
//! [brush]
//! radius = 30
//! min_radius = 10
//! max_radius = 50
//! steps = 64
//!
//! [draw]
//! color = #3388ff
//! weight = 1
//!
//! [erase]
//! color = #ff324a
//! weight = 1
//!
//! [layer]
//! color = #3388ff
//! weight = 3
//! ```
//!
//! Missing sections and keys fall back to defaults.

use std::path::{Path, PathBuf};
use std::str::FromStr;

use ini::{Ini, Properties};
use thiserror::Error;

use crate::stamp::{DEFAULT_STAMP_STEPS, MIN_STAMP_STEPS};

/// Default brush radius in pixels.
pub const DEFAULT_RADIUS: f64 = 30.0;

/// Default smallest selectable radius in pixels.
pub const DEFAULT_MIN_RADIUS: f64 = 10.0;

/// Default largest selectable radius in pixels.
pub const DEFAULT_MAX_RADIUS: f64 = 50.0;

/// Default stroke color for the painted layer and the draw cursor.
pub const DEFAULT_COLOR: &str = "#3388ff";

/// Default stroke color for the erase cursor.
pub const DEFAULT_ERASE_COLOR: &str = "#ff324a";

/// Name of the configuration file inside the config directory.
pub const CONFIG_FILE_NAME: &str = "config.ini";

/// Errors loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read or parsed.
    #[error("Failed to read config file {}: {source}", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: ini::Error,
    },

    /// The file could not be written.
    #[error("Failed to write config file {}: {source}", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A value could not be parsed.
    #[error("Invalid value '{value}' for {section}.{key}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
    },

    /// Radius bounds are inconsistent.
    #[error("Invalid radius bounds: min {min} > max {max}")]
    InvalidRadiusBounds { min: f64, max: f64 },

    /// A radius is not a positive finite number.
    #[error("Radius must be positive, got {0}")]
    NonPositiveRadius(f64),

    /// Too few stamp vertices.
    #[error("Stamp steps must be at least {min}, got {steps}")]
    TooFewSteps { steps: usize, min: usize },

    /// Stroke weight is negative or not finite.
    #[error("Stroke weight must be non-negative, got {0}")]
    InvalidWeight(f64),
}

/// Stroke style forwarded to the rendering collaborator.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleOptions {
    /// CSS color string.
    pub color: String,
    /// Stroke width in pixels.
    pub weight: f64,
}

impl StyleOptions {
    /// Create a style.
    pub fn new(color: impl Into<String>, weight: f64) -> Self {
        Self {
            color: color.into(),
            weight,
        }
    }
}

/// Configuration for a brush control.
#[derive(Debug, Clone, PartialEq)]
pub struct BrushConfig {
    /// Initial brush radius in pixels, clamped into the bounds.
    pub radius: f64,

    /// Smallest radius `set_radius` will accept.
    pub min_radius: f64,

    /// Largest radius `set_radius` will accept.
    pub max_radius: f64,

    /// Vertices per stamp polygon.
    pub steps: usize,

    /// Cursor style while drawing.
    pub draw_style: StyleOptions,

    /// Cursor style while erasing.
    pub erase_style: StyleOptions,

    /// Style of the published region layer.
    pub layer_style: StyleOptions,
}

impl Default for BrushConfig {
    fn default() -> Self {
        Self {
            radius: DEFAULT_RADIUS,
            min_radius: DEFAULT_MIN_RADIUS,
            max_radius: DEFAULT_MAX_RADIUS,
            steps: DEFAULT_STAMP_STEPS,
            draw_style: StyleOptions::new(DEFAULT_COLOR, 1.0),
            erase_style: StyleOptions::new(DEFAULT_ERASE_COLOR, 1.0),
            layer_style: StyleOptions::new(DEFAULT_COLOR, 3.0),
        }
    }
}

impl BrushConfig {
    /// Set the initial radius.
    pub fn with_radius(mut self, radius: f64) -> Self {
        self.radius = radius;
        self
    }

    /// Set the radius bounds.
    pub fn with_radius_bounds(mut self, min: f64, max: f64) -> Self {
        self.min_radius = min;
        self.max_radius = max;
        self
    }

    /// Set the number of stamp vertices.
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = steps;
        self
    }

    /// Set the draw cursor style.
    pub fn with_draw_style(mut self, style: StyleOptions) -> Self {
        self.draw_style = style;
        self
    }

    /// Set the erase cursor style.
    pub fn with_erase_style(mut self, style: StyleOptions) -> Self {
        self.erase_style = style;
        self
    }

    /// Set the region layer style.
    pub fn with_layer_style(mut self, style: StyleOptions) -> Self {
        self.layer_style = style;
        self
    }

    /// Clamp `radius` into `[min_radius, max_radius]`.
    pub fn clamp_radius(&self, radius: f64) -> f64 {
        if radius < self.min_radius {
            self.min_radius
        } else if radius > self.max_radius {
            self.max_radius
        } else {
            radius
        }
    }

    /// Check bounds, steps and weights.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for radius in [self.min_radius, self.max_radius] {
            if !radius.is_finite() || radius <= 0.0 {
                return Err(ConfigError::NonPositiveRadius(radius));
            }
        }
        if self.min_radius > self.max_radius {
            return Err(ConfigError::InvalidRadiusBounds {
                min: self.min_radius,
                max: self.max_radius,
            });
        }
        if !self.radius.is_finite() {
            return Err(ConfigError::NonPositiveRadius(self.radius));
        }
        if self.steps < MIN_STAMP_STEPS {
            return Err(ConfigError::TooFewSteps {
                steps: self.steps,
                min: MIN_STAMP_STEPS,
            });
        }
        for style in [&self.draw_style, &self.erase_style, &self.layer_style] {
            if !style.weight.is_finite() || style.weight < 0.0 {
                return Err(ConfigError::InvalidWeight(style.weight));
            }
        }
        Ok(())
    }

    /// Load and validate configuration from an INI file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_file(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_ini(&ini)
    }

    /// Load from `path` if it exists, otherwise return defaults.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            Ok(Self::default())
        }
    }

    /// Parse and validate configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigError> {
        let ini = Ini::load_from_str(text).map_err(|e| ConfigError::Read {
            path: PathBuf::from("<string>"),
            source: ini::Error::Parse(e),
        })?;
        Self::from_ini(&ini)
    }

    fn from_ini(ini: &Ini) -> Result<Self, ConfigError> {
        let mut config = Self::default();

        if let Some(brush) = ini.section(Some("brush")) {
            read_value(brush, "brush", "radius", &mut config.radius)?;
            read_value(brush, "brush", "min_radius", &mut config.min_radius)?;
            read_value(brush, "brush", "max_radius", &mut config.max_radius)?;
            read_value(brush, "brush", "steps", &mut config.steps)?;
        }
        for (name, style) in [
            ("draw", &mut config.draw_style),
            ("erase", &mut config.erase_style),
            ("layer", &mut config.layer_style),
        ] {
            if let Some(section) = ini.section(Some(name)) {
                if let Some(color) = section.get("color") {
                    style.color = color.to_string();
                }
                read_value(section, name, "weight", &mut style.weight)?;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Write the configuration as INI.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let mut ini = Ini::new();
        ini.with_section(Some("brush"))
            .set("radius", self.radius.to_string())
            .set("min_radius", self.min_radius.to_string())
            .set("max_radius", self.max_radius.to_string())
            .set("steps", self.steps.to_string());
        for (name, style) in [
            ("draw", &self.draw_style),
            ("erase", &self.erase_style),
            ("layer", &self.layer_style),
        ] {
            ini.with_section(Some(name))
                .set("color", style.color.as_str())
                .set("weight", style.weight.to_string());
        }

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|source| ConfigError::Write {
                path: path.to_path_buf(),
                source,
            })?;
        }
        ini.write_to_file(path).map_err(|source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// Default location of the configuration file
/// (`~/.config/paintregion/config.ini` on Linux).
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("paintregion").join(CONFIG_FILE_NAME))
}

fn read_value<T: FromStr>(
    props: &Properties,
    section: &str,
    key: &str,
    target: &mut T,
) -> Result<(), ConfigError> {
    if let Some(raw) = props.get(key) {
        *target = raw
            .trim()
            .parse()
            .map_err(|_| ConfigError::InvalidValue {
                section: section.to_string(),
                key: key.to_string(),
                value: raw.to_string(),
            })?;
    }
    Ok(())
}
