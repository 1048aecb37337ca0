//! Collected side effects of one room transition.

use sketchline_protocol::{PlayerId, Recipient, ServerEvent};

use crate::StoreRecord;

/// Notifications and store records produced while handling one event.
///
/// The state machine only appends; the room actor drains the outbox after
/// each event and performs the actual sends and writes. Tests inspect it
/// directly.
#[derive(Debug, Default)]
pub struct Outbox {
    events: Vec<(Recipient, ServerEvent)>,
    records: Vec<StoreRecord>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `event` for `to`.
    pub fn send(&mut self, to: Recipient, event: ServerEvent) {
        self.events.push((to, event));
    }

    /// Queues `event` for every player in the room.
    pub fn broadcast(&mut self, event: ServerEvent) {
        self.send(Recipient::All, event);
    }

    /// Queues `event` for one player.
    pub fn send_to(&mut self, player_id: PlayerId, event: ServerEvent) {
        self.send(Recipient::Player(player_id), event);
    }

    /// Queues a store write.
    pub fn record(&mut self, record: StoreRecord) {
        self.records.push(record);
    }

    pub fn events(&self) -> &[(Recipient, ServerEvent)] {
        &self.events
    }

    pub fn records(&self) -> &[StoreRecord] {
        &self.records
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty() && self.records.is_empty()
    }

    /// Splits the outbox into its events and records, in queue order.
    pub fn into_parts(self) -> (Vec<(Recipient, ServerEvent)>, Vec<StoreRecord>) {
        (self.events, self.records)
    }
}
