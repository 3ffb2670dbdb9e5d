use crossbeam_channel::{unbounded, Receiver, Sender};
use parking_lot::Mutex;
use std::path::PathBuf;

use crate::store::{CategorySet, Totals};

/// Change notifications for presentation layers.
///
/// Structural changes come in started/finished pairs so an observer can
/// drop row references before the rows move.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    BusyChanged { busy: bool },
    ResettingChanged { resetting: bool },
    /// All rows are about to be replaced
    ResetStarted,
    ResetFinished,
    RowRemovalStarted { row: usize },
    RowRemovalFinished { row: usize },
    /// Size fields of a row changed; `fields` names the categories
    RowChanged { row: usize, fields: CategorySet },
    TotalsChanged(Totals),
    DataDeleted { bytes_freed: u64 },
    DeletionError { path: PathBuf },
}

/// Fan-out of events to any number of subscribers.
///
/// Sends never block: each subscriber gets an unbounded channel, and a
/// subscriber whose receiver was dropped is forgotten on the next emit.
#[derive(Debug, Default)]
pub struct Notifier {
    subscribers: Mutex<Vec<Sender<StoreEvent>>>,
}

impl Notifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        let (tx, rx) = unbounded();
        self.subscribers.lock().push(tx);
        rx
    }

    pub fn emit(&self, event: StoreEvent) {
        self.subscribers
            .lock()
            .retain(|tx| tx.send(event.clone()).is_ok());
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}
