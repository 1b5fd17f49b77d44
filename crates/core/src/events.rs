//! Event sinks
//!
//! The engine reports every board change as a [`GameEvent`], in the order the
//! changes happen. Front ends pick how to consume them by choosing a sink.

use crate::types::GameEvent;

/// Receiver for engine events
pub trait EventSink {
    fn emit(&mut self, event: GameEvent);
}

/// Collect events for later draining
impl EventSink for Vec<GameEvent> {
    fn emit(&mut self, event: GameEvent) {
        self.push(event);
    }
}

impl<S: EventSink + ?Sized> EventSink for &mut S {
    fn emit(&mut self, event: GameEvent) {
        (**self).emit(event);
    }
}

/// Discard everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&mut self, _event: GameEvent) {}
}

/// Count events by kind without keeping them
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EventCounts {
    pub destroyed: u32,
    pub spawned: u32,
    pub moved: u32,
    pub other: u32,
}

impl EventSink for EventCounts {
    fn emit(&mut self, event: GameEvent) {
        match event {
            GameEvent::TileDestroyed { .. } => self.destroyed += 1,
            GameEvent::TileSpawned { .. } => self.spawned += 1,
            GameEvent::TileMoved { .. } => self.moved += 1,
            _ => self.other += 1,
        }
    }
}
