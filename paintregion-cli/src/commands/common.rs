//! Common helpers shared across CLI commands.

use std::fs;
use std::path::{Path, PathBuf};

use paintregion::config::{default_config_path, BrushConfig};
use paintregion::geojson::GeoJson;
use tracing::debug;

use crate::error::CliError;

/// Resolve the brush configuration.
///
/// An explicit `--config` file must exist. Without one, the default config
/// file is used if present, otherwise built-in defaults.
pub fn load_brush_config(explicit: Option<&Path>) -> Result<BrushConfig, CliError> {
    match explicit {
        Some(path) => {
            debug!(path = %path.display(), "Loading configuration");
            Ok(BrushConfig::load(path)?)
        }
        None => match default_config_path() {
            Some(path) => Ok(BrushConfig::load_or_default(&path)?),
            None => Ok(BrushConfig::default()),
        },
    }
}

/// The default config path, or an error explaining why there is none.
pub fn require_config_path() -> Result<PathBuf, CliError> {
    default_config_path().ok_or_else(|| {
        CliError::Config("Could not determine the user configuration directory".to_string())
    })
}

/// Write GeoJSON to `output`, or to stdout when no file is given.
pub fn write_geojson(geojson: &GeoJson, output: Option<&Path>) -> Result<(), CliError> {
    let json = geojson.to_json_pretty()?;
    match output {
        Some(path) => fs::write(path, json + "\n").map_err(|source| CliError::Output {
            path: path.to_path_buf(),
            source,
        }),
        None => {
            println!("{}", json);
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_config_must_exist() {
        let temp = tempfile::TempDir::new().unwrap();
        let result = load_brush_config(Some(&temp.path().join("nope.ini")));
        assert!(matches!(result, Err(CliError::ConfigFile(_))));
    }

    #[test]
    fn test_explicit_config_is_loaded() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("brush.ini");
        fs::write(&path, "[brush]\nradius = 12\n").unwrap();

        let config = load_brush_config(Some(&path)).unwrap();
        assert_eq!(config.radius, 12.0);
    }

    #[test]
    fn test_write_geojson_to_file() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("out.geojson");

        write_geojson(&GeoJson::empty_collection(), Some(&path)).unwrap();

        let written = fs::read_to_string(&path).unwrap();
        assert_eq!(GeoJson::from_json(&written).unwrap(), GeoJson::empty_collection());
    }

    #[test]
    fn test_write_geojson_reports_path() {
        let temp = tempfile::TempDir::new().unwrap();
        let path = temp.path().join("missing-dir").join("out.geojson");

        let err = write_geojson(&GeoJson::empty_collection(), Some(&path)).unwrap_err();
        assert!(err.to_string().contains("out.geojson"));
    }
}
