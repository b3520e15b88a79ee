//! Serialized application of brush events.
//!
//! Pointer movement produces brush events faster than, and sometimes from
//! inside, their own processing: a publisher reacting to a region update may
//! synchronously feed more input. The [`UpdateSequencer`] turns this into a
//! plain FIFO with a single drain loop:
//!
//! ```text
//! enqueue(e) ──► queue.push_back(e) ──► draining? ──yes──► return
//!                                          │
//!                                          no
//!                                          ▼
//!                      ┌──► pop_front ──► corrector ─► stamp ─► accumulator ─► publish
//!                      │                                                        │
//!                      └──────────────── until queue empty ◄────────────────────┘
//! ```
//!
//! The publisher runs after the pipeline is released, so it may read the
//! sequencer (`snapshot`, `stats`, `cached_meters_per_pixel`) as well as
//! enqueue.
//!
//! An `enqueue` that arrives while the loop is running only appends; the
//! running loop picks it up after the current item. Every item is applied
//! exactly once, in arrival order, and the loop is iterative so bursts of
//! input cannot grow the call stack.
//!
//! The sequencer is single-threaded (`!Sync`) and uses `Cell`/`RefCell` for
//! interior mutability so that re-entrant calls only need `&self`.

mod event;

pub use event::{BrushEvent, BrushMode, EventId};

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;

use tracing::{trace, warn};

use crate::accumulator::{AccumulatorError, RegionAccumulator, RegionPublisher};
use crate::distance::DistanceCorrector;
use crate::region::Region;
use crate::stamp::StampBuilder;

/// Counters describing sequencer activity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SequencerStats {
    /// Items accepted by `enqueue`, `clear` or `replace`.
    pub enqueued: u64,
    /// Items applied successfully.
    pub applied: u64,
    /// Items whose stamp the accumulator rejected.
    pub rejected: u64,
    /// Most recently processed item.
    pub last_processed: Option<EventId>,
}

/// Work waiting in the queue.
#[derive(Debug)]
enum Command {
    Brush(BrushEvent),
    Clear,
    Replace(Region),
}

#[derive(Debug)]
struct Queued {
    id: EventId,
    command: Command,
}

/// Corrector, builder and accumulator, borrowed together while one item is
/// processed. The accumulator publishes to nothing; changed regions are
/// handed back to the sequencer.
#[derive(Debug)]
struct Pipeline {
    corrector: DistanceCorrector,
    builder: StampBuilder,
    accumulator: RegionAccumulator,
}

impl Pipeline {
    /// Apply one item. Returns the region when the accumulator committed it.
    fn process(&mut self, command: Command) -> Result<Option<Region>, AccumulatorError> {
        let revision = self.accumulator.revision();
        match command {
            Command::Brush(event) => {
                let stamp = self.builder.build(
                    &mut self.corrector,
                    event.position,
                    event.zoom,
                    event.radius_pixels,
                );
                match event.mode {
                    BrushMode::Draw => self.accumulator.apply_draw(&stamp)?,
                    BrushMode::Erase => self.accumulator.apply_erase(&stamp)?,
                };
            }
            Command::Clear => {
                self.accumulator.clear();
            }
            Command::Replace(region) => {
                self.accumulator.replace(region)?;
            }
        }
        let changed = self.accumulator.revision() != revision;
        Ok(changed.then(|| self.accumulator.region().clone()))
    }
}

/// Resets the in-progress flag when a drain ends, including by unwinding.
struct DrainGuard<'a>(&'a Cell<bool>);

impl<'a> DrainGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for DrainGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// FIFO of brush events feeding a [`RegionAccumulator`].
pub struct UpdateSequencer {
    queue: RefCell<VecDeque<Queued>>,
    draining: Cell<bool>,
    next_id: Cell<u64>,
    stats: Cell<SequencerStats>,
    pipeline: RefCell<Pipeline>,
    publisher: RefCell<Box<dyn RegionPublisher>>,
}

impl std::fmt::Debug for UpdateSequencer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateSequencer")
            .field("queue", &self.queue)
            .field("draining", &self.draining)
            .field("next_id", &self.next_id)
            .field("stats", &self.stats)
            .field("pipeline", &self.pipeline)
            .finish_non_exhaustive()
    }
}

impl UpdateSequencer {
    /// Create a sequencer that publishes every region change to `publisher`.
    pub fn new(builder: StampBuilder, publisher: impl RegionPublisher + 'static) -> Self {
        Self {
            queue: RefCell::new(VecDeque::new()),
            draining: Cell::new(false),
            next_id: Cell::new(0),
            stats: Cell::new(SequencerStats::default()),
            pipeline: RefCell::new(Pipeline {
                corrector: DistanceCorrector::new(),
                builder,
                accumulator: RegionAccumulator::default(),
            }),
            publisher: RefCell::new(Box::new(publisher)),
        }
    }

    /// Create a sequencer with the default stamp resolution.
    pub fn with_publisher(publisher: impl RegionPublisher + 'static) -> Self {
        Self::new(StampBuilder::default(), publisher)
    }

    /// Append a brush event and drain the queue unless a drain is running.
    pub fn enqueue(&self, event: BrushEvent) -> EventId {
        self.submit(Command::Brush(event))
    }

    /// Queue an erase-all. It runs after every item already queued.
    pub fn clear(&self) -> EventId {
        self.submit(Command::Clear)
    }

    /// Queue replacement of the region with external data.
    ///
    /// The data is validated before queueing; malformed data is rejected here
    /// and never reaches the accumulator.
    pub fn replace(&self, region: Region) -> Result<EventId, AccumulatorError> {
        region
            .validate()
            .map_err(AccumulatorError::InvalidGeometry)?;
        Ok(self.submit(Command::Replace(region)))
    }

    /// Process queued items until the queue is empty.
    ///
    /// Returns immediately when called from inside a running drain; the
    /// running loop will reach any newly queued items.
    pub fn drain(&self) {
        if self.draining.get() {
            return;
        }
        let _guard = DrainGuard::enter(&self.draining);

        loop {
            // Release the queue borrow before processing so publishers can enqueue.
            let next = self.queue.borrow_mut().pop_front();
            let Some(Queued { id, command }) = next else {
                break;
            };

            trace!(id = id.0, "Processing queued item");
            let outcome = self.pipeline.borrow_mut().process(command);

            let mut stats = self.stats.get();
            stats.last_processed = Some(id);
            let changed = match outcome {
                Ok(changed) => {
                    stats.applied += 1;
                    changed
                }
                Err(e) => {
                    stats.rejected += 1;
                    warn!(id = id.0, error = %e, "Queued item rejected");
                    None
                }
            };
            self.stats.set(stats);

            if let Some(region) = changed {
                self.publisher.borrow_mut().publish(&region);
            }
        }
    }

    /// Whether a drain loop is currently running.
    pub fn is_draining(&self) -> bool {
        self.draining.get()
    }

    /// Number of items waiting to be processed.
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    /// Activity counters.
    pub fn stats(&self) -> SequencerStats {
        self.stats.get()
    }

    /// Copy of the current region.
    pub fn snapshot(&self) -> Region {
        self.pipeline.borrow().accumulator.region().clone()
    }

    /// The cached meters-per-pixel factor for `zoom`, if any stamp has used it.
    pub fn cached_meters_per_pixel(&self, zoom: u8) -> Option<f64> {
        self.pipeline.borrow().corrector.cached(zoom)
    }

    fn submit(&self, command: Command) -> EventId {
        let id = EventId(self.next_id.get());
        self.next_id.set(id.0 + 1);

        self.queue.borrow_mut().push_back(Queued { id, command });

        let mut stats = self.stats.get();
        stats.enqueued += 1;
        self.stats.set(stats);

        self.drain();
        id
    }
}
