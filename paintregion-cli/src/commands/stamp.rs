//! `stamp` command: print one brush stamp as GeoJSON.

use std::path::PathBuf;

use clap::Args;
use paintregion::coord::GeoPoint;
use paintregion::distance::DistanceCorrector;
use paintregion::geojson::GeoJson;
use paintregion::stamp::StampBuilder;

use super::common::{load_brush_config, write_geojson};
use crate::error::CliError;

/// Arguments for `stamp`.
#[derive(Debug, Args)]
pub struct StampArgs {
    /// Center longitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lng: f64,

    /// Center latitude in degrees
    #[arg(long, allow_hyphen_values = true)]
    pub lat: f64,

    /// Map zoom level
    #[arg(long, default_value_t = 15)]
    pub zoom: u8,

    /// Brush radius in pixels (defaults to the configured radius, clamped to its bounds)
    #[arg(long)]
    pub radius: Option<f64>,

    /// Write the GeoJSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Brush configuration file (INI)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Run the `stamp` command.
pub fn run(args: StampArgs) -> Result<(), CliError> {
    let geojson = build(&args)?;
    write_geojson(&geojson.into_feature(), args.output.as_deref())
}

/// Build the stamp described by `args`.
pub fn build(args: &StampArgs) -> Result<GeoJson, CliError> {
    let config = load_brush_config(args.config.as_deref())?;
    let center = GeoPoint::try_new(args.lng, args.lat)
        .map_err(|e| CliError::InvalidArgument(e.to_string()))?;
    let radius = config.clamp_radius(args.radius.unwrap_or(config.radius));

    let stamp = StampBuilder::new(config.steps).build(
        &mut DistanceCorrector::new(),
        center,
        args.zoom,
        radius,
    );

    GeoJson::from_region(&stamp).ok_or_else(|| {
        CliError::InvalidArgument(format!("radius {} px produces an empty stamp", radius))
    })
}
