//! `replay` command: run a recorded session headlessly and export the region.

use std::cell::Cell;
use std::path::PathBuf;
use std::rc::Rc;

use clap::Args;
use paintregion::config::BrushConfig;
use paintregion::control::PaintControl;
use paintregion::geojson::GeoJson;
use paintregion::recording::{Recording, ReplaySummary};
use paintregion::region::Region;
use tracing::info;

use super::common::{load_brush_config, write_geojson};
use crate::error::CliError;

/// Arguments for `replay`.
#[derive(Debug, Args)]
pub struct ReplayArgs {
    /// Recording file (JSON)
    pub recording: PathBuf,

    /// Write the resulting GeoJSON here instead of stdout
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Brush configuration file (INI)
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Outcome of a replay.
#[derive(Debug)]
pub struct ReplayOutcome {
    pub summary: ReplaySummary,
    pub region: Region,
    /// Number of region updates the control published.
    pub updates: usize,
}

impl ReplayOutcome {
    /// The region as GeoJSON; an empty region exports as an empty collection.
    pub fn geojson(&self) -> GeoJson {
        GeoJson::from_region(&self.region).unwrap_or_else(GeoJson::empty_collection)
    }
}

/// Run the `replay` command.
pub fn run(args: ReplayArgs) -> Result<(), CliError> {
    let config = load_brush_config(args.config.as_deref())?;
    let recording = Recording::load(&args.recording)?;

    let outcome = replay(&recording, config)?;
    write_geojson(&outcome.geojson(), args.output.as_deref())?;

    eprintln!(
        "Replayed {} inputs ({} queued, {} updates): {} polygon(s), {} vertices",
        outcome.summary.inputs,
        outcome.summary.queued,
        outcome.updates,
        outcome.region.polygon_count(),
        outcome.region.vertex_count()
    );
    Ok(())
}

/// Replay `recording` through a fresh control.
pub fn replay(recording: &Recording, config: BrushConfig) -> Result<ReplayOutcome, CliError> {
    let updates = Rc::new(Cell::new(0usize));
    let counter = Rc::clone(&updates);
    let mut control = PaintControl::new(config, move |_region: &Region| {
        counter.set(counter.get() + 1);
    })?;

    let summary = recording.replay(&mut control)?;
    let stats = control.sequencer().stats();
    info!(
        applied = stats.applied,
        rejected = stats.rejected,
        "Replay finished"
    );

    Ok(ReplayOutcome {
        summary,
        region: control.region(),
        updates: updates.get(),
    })
}
