//! Brush control boundary.
//!
//! [`PaintControl`] is the surface the host map UI talks to. It holds the
//! interaction state (active mode, brush radius, pointer pressed, cursor
//! position) and turns pointer notifications into brush events for the
//! [`UpdateSequencer`].
//!
//! Pointer movement only produces events while the pointer is pressed and a
//! mode is active. The mode and radius are copied into each event, so
//! switching mode or resizing the brush affects only later events.
//!
//! While [`PaintControl::is_painting`] is true the host should suspend map
//! panning so the drag paints instead of moving the map.

use thiserror::Error;
use tracing::{debug, info};

use crate::accumulator::{AccumulatorError, RegionPublisher};
use crate::config::{BrushConfig, ConfigError, StyleOptions};
use crate::coord::GeoPoint;
use crate::geojson::{GeoJson, GeoJsonError};
use crate::region::Region;
use crate::sequencer::{BrushEvent, BrushMode, EventId, UpdateSequencer};
use crate::stamp::StampBuilder;

/// Errors surfaced by the brush control.
#[derive(Debug, Error)]
pub enum ControlError {
    /// The configuration is invalid.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Supplied region data could not be parsed.
    #[error(transparent)]
    GeoJson(#[from] GeoJsonError),

    /// Supplied region data was rejected by the accumulator.
    #[error(transparent)]
    Region(#[from] AccumulatorError),
}

/// Interactive brush state feeding an [`UpdateSequencer`].
#[derive(Debug)]
pub struct PaintControl {
    config: BrushConfig,
    sequencer: UpdateSequencer,
    mode: Option<BrushMode>,
    radius: f64,
    cursor: GeoPoint,
    pressed: bool,
}

impl PaintControl {
    /// Create a control from a validated configuration.
    pub fn new(
        config: BrushConfig,
        publisher: impl RegionPublisher + 'static,
    ) -> Result<Self, ControlError> {
        config.validate()?;
        let radius = config.clamp_radius(config.radius);
        let sequencer = UpdateSequencer::new(StampBuilder::new(config.steps), publisher);

        Ok(Self {
            config,
            sequencer,
            mode: None,
            radius,
            cursor: GeoPoint::new(0.0, 0.0),
            pressed: false,
        })
    }

    /// The configuration this control was built with.
    pub fn config(&self) -> &BrushConfig {
        &self.config
    }

    /// The sequencer applying this control's events.
    pub fn sequencer(&self) -> &UpdateSequencer {
        &self.sequencer
    }

    /// Current brush radius in pixels.
    pub fn radius(&self) -> f64 {
        self.radius
    }

    /// Set the brush radius, clamped into the configured bounds.
    ///
    /// Non-finite values are ignored. Returns the effective radius.
    pub fn set_radius(&mut self, radius: f64) -> f64 {
        if radius.is_finite() {
            self.radius = self.config.clamp_radius(radius);
        }
        self.radius
    }

    /// The active mode, if any.
    pub fn active_mode(&self) -> Option<BrushMode> {
        self.mode
    }

    /// Select draw, erase, or neither.
    ///
    /// Changing mode always releases the pointer: a stroke never continues
    /// across a mode switch.
    pub fn set_active_mode(&mut self, mode: Option<BrushMode>) {
        if self.mode != mode {
            debug!(from = ?self.mode, to = ?mode, "Brush mode changed");
        }
        self.mode = mode;
        self.pressed = false;
    }

    /// Enter draw mode.
    pub fn start_draw(&mut self) {
        self.set_active_mode(Some(BrushMode::Draw));
    }

    /// Enter erase mode.
    pub fn start_erase(&mut self) {
        self.set_active_mode(Some(BrushMode::Erase));
    }

    /// Leave any mode.
    pub fn stop(&mut self) {
        self.set_active_mode(None);
    }

    /// Toggle draw mode, as a toolbar button would.
    pub fn toggle_draw(&mut self) {
        match self.mode {
            Some(BrushMode::Draw) => self.stop(),
            _ => self.start_draw(),
        }
    }

    /// Toggle erase mode, as a toolbar button would.
    pub fn toggle_erase(&mut self) {
        match self.mode {
            Some(BrushMode::Erase) => self.stop(),
            _ => self.start_erase(),
        }
    }

    /// Last known pointer position, where the brush cursor is drawn.
    pub fn cursor(&self) -> GeoPoint {
        self.cursor
    }

    /// Style of the brush cursor for the active mode.
    pub fn cursor_style(&self) -> Option<&StyleOptions> {
        match self.mode? {
            BrushMode::Draw => Some(&self.config.draw_style),
            BrushMode::Erase => Some(&self.config.erase_style),
        }
    }

    /// Whether a drag is currently painting.
    pub fn is_painting(&self) -> bool {
        self.pressed && self.mode.is_some()
    }

    /// Pointer pressed at `position`. Stamps immediately when a mode is active.
    ///
    /// Ignored while no mode is active.
    pub fn pointer_down(&mut self, position: GeoPoint, zoom: u8) -> Option<EventId> {
        if self.mode.is_none() {
            self.cursor = position;
            return None;
        }
        self.pressed = true;
        self.pointer_move(position, zoom)
    }

    /// Pointer moved to `position`.
    ///
    /// Always updates the cursor; enqueues a brush event only while painting.
    pub fn pointer_move(&mut self, position: GeoPoint, zoom: u8) -> Option<EventId> {
        self.cursor = position;
        if !self.pressed {
            return None;
        }
        let mode = self.mode?;
        let event = BrushEvent::new(position, zoom, self.radius, mode);
        Some(self.sequencer.enqueue(event))
    }

    /// Pointer released.
    pub fn pointer_up(&mut self) {
        self.pressed = false;
    }

    /// Remove the whole region.
    pub fn erase_all(&mut self) -> EventId {
        info!("Erasing region");
        self.sequencer.clear()
    }

    /// Replace the region with externally supplied GeoJSON.
    ///
    /// On error the region is left as it was.
    pub fn set_data(&mut self, data: &GeoJson) -> Result<EventId, ControlError> {
        let region = data.to_region()?;
        let id = self.sequencer.replace(region)?;
        info!(id = id.0, "Region data loaded");
        Ok(id)
    }

    /// The region as GeoJSON, `None` while nothing is painted.
    pub fn data(&self) -> Option<GeoJson> {
        GeoJson::from_region(&self.sequencer.snapshot())
    }

    /// Copy of the current region.
    pub fn region(&self) -> Region {
        self.sequencer.snapshot()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::accumulator::NullPublisher;

    fn control() -> PaintControl {
        PaintControl::new(BrushConfig::default(), NullPublisher).unwrap()
    }

    fn at(lng: f64, lat: f64) -> GeoPoint {
        GeoPoint::new(lng, lat)
    }

    #[test]
    fn test_new_clamps_initial_radius() {
        let config = BrushConfig::default().with_radius(500.0);
        let control = PaintControl::new(config, NullPublisher).unwrap();
        assert_eq!(control.radius(), 50.0);
    }

    #[test]
    fn test_new_rejects_invalid_config() {
        let config = BrushConfig::default().with_radius_bounds(40.0, 20.0);
        assert!(matches!(
            PaintControl::new(config, NullPublisher),
            Err(ControlError::Config(_))
        ));
    }

    #[test]
    fn test_set_radius_clamps() {
        let mut control = control();
        assert_eq!(control.set_radius(1.0), 10.0);
        assert_eq!(control.set_radius(35.0), 35.0);
        assert_eq!(control.set_radius(99.0), 50.0);
        assert_eq!(control.set_radius(f64::NAN), 50.0);
    }

    #[test]
    fn test_movement_without_mode_does_nothing() {
        let mut control = control();

        assert_eq!(control.pointer_down(at(0.0, 0.0), 10), None);
        assert_eq!(control.pointer_move(at(0.001, 0.0), 10), None);

        assert!(!control.is_painting());
        assert!(control.region().is_empty());
        assert_eq!(control.cursor(), at(0.001, 0.0));
    }

    #[test]
    fn test_movement_without_press_only_moves_cursor() {
        let mut control = control();
        control.start_draw();

        assert_eq!(control.pointer_move(at(1.0, 1.0), 10), None);
        assert_eq!(control.cursor(), at(1.0, 1.0));
        assert!(control.region().is_empty());
    }

    #[test]
    fn test_drag_draws_stroke() {
        let mut control = control();
        control.start_draw();

        assert!(control.pointer_down(at(0.0, 0.0), 10).is_some());
        assert!(control.is_painting());
        for i in 1..=10 {
            control.pointer_move(at(i as f64 * 0.005, 0.0), 10);
        }
        control.pointer_up();
        assert!(!control.is_painting());

        let region = control.region();
        assert_eq!(region.polygon_count(), 1);
        assert!(region.contains(at(0.0, 0.0)));
        assert!(region.contains(at(0.05, 0.0)));
        assert_eq!(control.sequencer().stats().applied, 11);

        // Moves after release are not painted
        assert_eq!(control.pointer_move(at(1.0, 0.0), 10), None);
    }

    #[test]
    fn test_erase_stroke_removes_area() {
        let mut control = control();
        control.start_draw();
        control.pointer_down(at(0.0, 0.0), 10);
        control.pointer_up();
        let drawn = control.region().area();

        control.start_erase();
        control.pointer_down(at(0.02, 0.0), 10);
        control.pointer_up();

        let remaining = control.region();
        assert!(remaining.area() < drawn);
        assert!(!remaining.contains(at(0.02, 0.0)));
    }

    #[test]
    fn test_mode_switch_releases_pointer() {
        let mut control = control();
        control.start_draw();
        control.pointer_down(at(0.0, 0.0), 10);

        control.start_erase();
        assert!(!control.is_painting());
        assert_eq!(control.pointer_move(at(0.01, 0.0), 10), None);
    }

    #[test]
    fn test_toggle_buttons() {
        let mut control = control();
        control.toggle_draw();
        assert_eq!(control.active_mode(), Some(BrushMode::Draw));
        assert_eq!(control.cursor_style(), Some(&control.config().draw_style));

        control.toggle_erase();
        assert_eq!(control.active_mode(), Some(BrushMode::Erase));
        assert_eq!(control.cursor_style().unwrap().color, "#ff324a");

        control.toggle_erase();
        assert_eq!(control.active_mode(), None);
        assert_eq!(control.cursor_style(), None);
    }

    #[test]
    fn test_radius_captured_per_event() {
        let mut control = control();
        control.start_draw();
        control.set_radius(10.0);
        control.pointer_down(at(0.0, 0.0), 10);
        let small = control.region().area();

        control.erase_all();
        control.set_radius(50.0);
        control.pointer_move(at(0.0, 0.0), 10);
        let large = control.region().area();

        assert!(large > small * 20.0);
    }

    #[test]
    fn test_erase_all_and_data() {
        let mut control = control();
        assert_eq!(control.data(), None);

        control.start_draw();
        control.pointer_down(at(0.0, 0.0), 10);
        control.pointer_up();
        assert!(matches!(control.data(), Some(GeoJson::Polygon { .. })));

        control.erase_all();
        assert_eq!(control.data(), None);
    }

    #[test]
    fn test_set_data_roundtrip() {
        let mut source = control();
        source.start_draw();
        source.pointer_down(at(0.0, 0.0), 10);
        source.pointer_move(at(1.0, 0.0), 10);
        let exported = source.data().unwrap();

        let mut target = control();
        target.set_data(&exported).unwrap();

        assert_eq!(target.region(), source.region());
        assert_eq!(target.region().polygon_count(), 2);
    }

    #[test]
    fn test_set_data_invalid_keeps_region() {
        let mut control = control();
        control.start_draw();
        control.pointer_down(at(0.0, 0.0), 10);
        let before = control.region();

        let bad = GeoJson::Polygon {
            coordinates: vec![vec![vec![0.0, 0.0], vec![1.0, 0.0], vec![0.0, 0.0]]],
        };
        assert!(matches!(
            control.set_data(&bad),
            Err(ControlError::GeoJson(_))
        ));
        assert_eq!(control.region(), before);
    }
}
