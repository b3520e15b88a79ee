//! PaintRegion - brush painting of geographic regions
//!
//! This library turns a stream of brush applications on a web-mercator map
//! into one accumulated polygonal region. Each application stamps a circle
//! whose on-screen radius is constant, so its ground radius depends on
//! latitude and zoom. Draw stamps are unioned into the region, erase stamps
//! are subtracted from it.
//!
//! # Architecture
//!
//! ```text
//! PaintControl ──► UpdateSequencer ──► DistanceCorrector ──► StampBuilder
//!  (pointer, mode,    (FIFO, single        (m/px per zoom)      (circle ring)
//!   radius)            drain loop)                                   │
//!                                                                    ▼
//!                          RegionPublisher ◄── RegionAccumulator (union / difference)
//! ```
//!
//! # Example
//!
//! ```
//! use paintregion::{BrushConfig, GeoPoint, NullPublisher, PaintControl};
//!
//! let mut control = PaintControl::new(BrushConfig::default(), NullPublisher).unwrap();
//! control.start_draw();
//! control.pointer_down(GeoPoint::new(13.40, 52.52), 14);
//! control.pointer_move(GeoPoint::new(13.402, 52.52), 14);
//! control.pointer_up();
//!
//! assert_eq!(control.region().polygon_count(), 1);
//! ```

pub mod accumulator;
pub mod config;
pub mod control;
pub mod coord;
pub mod distance;
pub mod geojson;
pub mod logging;
pub mod recording;
pub mod region;
pub mod sequencer;
pub mod stamp;

pub use accumulator::{AccumulatorError, NullPublisher, RegionAccumulator, RegionPublisher};
pub use config::{BrushConfig, ConfigError, StyleOptions};
pub use control::{ControlError, PaintControl};
pub use coord::{CoordError, GeoPoint};
pub use distance::DistanceCorrector;
pub use geojson::{GeoJson, GeoJsonError};
pub use region::{GeometryError, Region};
pub use sequencer::{BrushEvent, BrushMode, EventId, SequencerStats, UpdateSequencer};
pub use stamp::StampBuilder;

/// Crate version, from Cargo metadata.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
