//! Serialized scan and deletion jobs against a shared [`EntryStore`].
//!
//! Every public operation is queued to a single worker thread, so at most one
//! operation mutates the store at a time. Readers take the store's read lock
//! only for as long as a lookup takes; the worker scans and deletes outside
//! the lock and holds the write lock just for the swap or patch.

pub mod events;

pub use events::{Notifier, StoreEvent};

use crossbeam_channel::{bounded, unbounded, Receiver, Sender};
use parking_lot::RwLock;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use tracing::{debug, info, warn};

use crate::cleaner::PathRemover;
use crate::common::errors::{CleanerError, Result};
use crate::scanner::Scanner;
use crate::store::{CategorySet, Entry, EntryStore, Row, Totals};

/// What a finished operation did
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct OperationOutcome {
    /// Bytes freed by fully cleared categories
    pub bytes_freed: u64,
    /// Entries dropped from the store because nothing was left on disk
    pub removed_entries: Vec<String>,
    /// Paths that could not be removed
    pub failed_paths: Vec<PathBuf>,
    /// Store size after the operation
    pub entries: usize,
}

/// Completion ticket for a queued operation
pub struct OperationHandle {
    done: Receiver<OperationOutcome>,
}

impl OperationHandle {
    /// Block until the operation has run
    pub fn wait(self) -> Result<OperationOutcome> {
        self.done.recv().map_err(|_| CleanerError::WorkerGone)
    }

    /// Outcome if the operation already finished
    pub fn try_outcome(&self) -> Option<OperationOutcome> {
        self.done.try_recv().ok()
    }
}

#[derive(Debug, Clone)]
enum Operation {
    Reset,
    DeleteData { name: String, categories: CategorySet },
    DeleteUnusedData { categories: CategorySet },
}

struct Job {
    operation: Operation,
    done: Sender<OperationOutcome>,
}

struct Shared {
    store: RwLock<EntryStore>,
    busy: AtomicBool,
    resetting: AtomicBool,
    notifier: Notifier,
}

#[derive(Clone, Copy)]
enum Flag {
    Busy,
    Resetting,
}

/// Raises a status flag for its lifetime, so the flag drops back even if a job panics
struct FlagGuard<'a> {
    shared: &'a Shared,
    flag: Flag,
}

impl<'a> FlagGuard<'a> {
    fn raise(shared: &'a Shared, flag: Flag) -> Self {
        shared.set_flag(flag, true);
        FlagGuard { shared, flag }
    }
}

impl Drop for FlagGuard<'_> {
    fn drop(&mut self) {
        self.shared.set_flag(self.flag, false);
    }
}

impl Shared {
    fn set_flag(&self, flag: Flag, value: bool) {
        match flag {
            Flag::Busy => {
                self.busy.store(value, Ordering::SeqCst);
                self.notifier.emit(StoreEvent::BusyChanged { busy: value });
            }
            Flag::Resetting => {
                self.resetting.store(value, Ordering::SeqCst);
                self.notifier
                    .emit(StoreEvent::ResettingChanged { resetting: value });
            }
        }
    }
}

/// Owns the store and runs operations on a dedicated worker thread
pub struct Coordinator {
    shared: Arc<Shared>,
    jobs: Option<Sender<Job>>,
    worker: Option<thread::JoinHandle<()>>,
}

impl Coordinator {
    /// Start the worker with an empty store
    pub fn spawn(scanner: Scanner, remover: PathRemover) -> Result<Self> {
        let shared = Arc::new(Shared {
            store: RwLock::new(EntryStore::new()),
            busy: AtomicBool::new(false),
            resetting: AtomicBool::new(false),
            notifier: Notifier::new(),
        });
        let (tx, rx) = unbounded::<Job>();

        let engine = Engine {
            scanner,
            remover,
            shared: Arc::clone(&shared),
        };
        let worker = thread::Builder::new()
            .name("appdata-worker".to_string())
            .spawn(move || worker_main(engine, rx))
            .map_err(|e| CleanerError::Runtime {
                details: format!("failed to spawn coordinator worker: {e}"),
            })?;

        Ok(Coordinator {
            shared,
            jobs: Some(tx),
            worker: Some(worker),
        })
    }

    /// Start the worker and queue the first scan straight away
    pub fn spawn_with_initial_reset(scanner: Scanner, remover: PathRemover) -> Result<Self> {
        let coordinator = Self::spawn(scanner, remover)?;
        coordinator.reset();
        Ok(coordinator)
    }

    /// Rescan everything and replace the store contents
    pub fn reset(&self) -> OperationHandle {
        self.submit(Operation::Reset)
    }

    /// Delete the selected categories of one entry
    pub fn delete_data(&self, name: &str, categories: CategorySet) -> OperationHandle {
        self.submit(Operation::DeleteData {
            name: name.to_string(),
            categories,
        })
    }

    /// Delete the selected categories of every entry that is not installed
    pub fn delete_unused_data(&self, categories: CategorySet) -> OperationHandle {
        self.submit(Operation::DeleteUnusedData { categories })
    }

    pub fn subscribe(&self) -> Receiver<StoreEvent> {
        self.shared.notifier.subscribe()
    }

    pub fn is_busy(&self) -> bool {
        self.shared.busy.load(Ordering::SeqCst)
    }

    pub fn is_resetting(&self) -> bool {
        self.shared.resetting.load(Ordering::SeqCst)
    }

    pub fn row_count(&self) -> usize {
        self.shared.store.read().len()
    }

    pub fn row(&self, index: usize) -> Option<Row> {
        self.shared.store.read().row(index)
    }

    pub fn rows(&self) -> Vec<Row> {
        self.shared.store.read().rows()
    }

    pub fn entry(&self, name: &str) -> Option<Entry> {
        self.shared.store.read().get(name).cloned()
    }

    pub fn totals(&self) -> Totals {
        self.shared.store.read().totals()
    }

    /// Consistent copy of the whole store
    pub fn snapshot(&self) -> EntryStore {
        self.shared.store.read().clone()
    }

    /// Let queued operations finish, then stop the worker
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn submit(&self, operation: Operation) -> OperationHandle {
        let (done, rx) = bounded(1);
        let job = Job { operation, done };
        match &self.jobs {
            Some(jobs) => {
                if jobs.send(job).is_err() {
                    warn!("Coordinator worker is gone, operation dropped");
                }
            }
            None => warn!("Coordinator is shut down, operation dropped"),
        }
        OperationHandle { done: rx }
    }

    fn stop(&mut self) {
        // Closing the queue ends the worker loop after pending jobs
        self.jobs.take();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!("Coordinator worker panicked");
            }
        }
    }
}

impl Drop for Coordinator {
    fn drop(&mut self) {
        self.stop();
    }
}

fn worker_main(engine: Engine, jobs: Receiver<Job>) {
    for job in jobs.iter() {
        debug!("Running {:?}", job.operation);
        let outcome = engine.run(&job.operation);
        // Nobody waiting is fine
        let _ = job.done.send(outcome);
    }
    debug!("Coordinator worker stopped");
}

/// The worker side: the only code that mutates the store
struct Engine {
    scanner: Scanner,
    remover: PathRemover,
    shared: Arc<Shared>,
}

impl Engine {
    fn run(&self, operation: &Operation) -> OperationOutcome {
        let _busy = FlagGuard::raise(&self.shared, Flag::Busy);
        match operation {
            Operation::Reset => self.reset(),
            Operation::DeleteData { name, categories } => self.delete_data(name, *categories),
            Operation::DeleteUnusedData { categories } => self.delete_unused_data(*categories),
        }
    }

    fn reset(&self) -> OperationOutcome {
        let _resetting = FlagGuard::raise(&self.shared, Flag::Resetting);

        let mut fresh = self.scanner.scan();
        let totals = fresh.recalculate_totals();
        let entries = fresh.len();

        self.shared.notifier.emit(StoreEvent::ResetStarted);
        *self.shared.store.write() = fresh;
        self.shared.notifier.emit(StoreEvent::ResetFinished);
        self.shared.notifier.emit(StoreEvent::TotalsChanged(totals));

        OperationOutcome {
            entries,
            ..Default::default()
        }
    }

    fn delete_data(&self, name: &str, categories: CategorySet) -> OperationOutcome {
        let mut outcome = OperationOutcome::default();

        let entry = self.shared.store.read().get(name).cloned();
        let Some(mut entry) = entry else {
            warn!("Store doesn't contain the '{}' entry", name);
            outcome.entries = self.shared.store.read().len();
            return outcome;
        };

        let changed = self.clear_entry(&mut entry, categories, &mut outcome);
        let touched = self.commit_entry(name, entry, changed, &mut outcome);
        self.finish_deletion(touched, &mut outcome);
        outcome
    }

    fn delete_unused_data(&self, categories: CategorySet) -> OperationOutcome {
        let mut outcome = OperationOutcome::default();
        let mut touched = false;

        let names = self.shared.store.read().unused_names();
        for name in names {
            let entry = self.shared.store.read().get(&name).cloned();
            let Some(mut entry) = entry else {
                continue;
            };
            if entry.installed {
                continue;
            }
            let changed = self.clear_entry(&mut entry, categories, &mut outcome);
            touched |= self.commit_entry(&name, entry, changed, &mut outcome);
        }

        self.finish_deletion(touched, &mut outcome);
        outcome
    }

    /// Remove the requested categories from disk.
    ///
    /// A category is all-or-nothing: it is zeroed only when every one of its
    /// paths went away; otherwise it keeps its size and paths, and its bytes
    /// are not counted as freed.
    fn clear_entry(
        &self,
        entry: &mut Entry,
        categories: CategorySet,
        outcome: &mut OperationOutcome,
    ) -> CategorySet {
        let mut changed = CategorySet::EMPTY;

        for category in categories.iter() {
            let data = entry.category_mut(category);
            if data.size == 0 {
                continue;
            }

            let report = self.remover.remove(&data.paths);
            for failure in &report.failures {
                self.shared.notifier.emit(StoreEvent::DeletionError {
                    path: failure.path.clone(),
                });
                outcome.failed_paths.push(failure.path.clone());
            }

            if report.fully_removed() {
                data.clear();
                outcome.bytes_freed += report.bytes_freed;
                changed.insert(category);
            }
        }

        changed
    }

    /// Write a cleared entry back, or drop its row when nothing is left.
    /// Returns whether the store changed.
    fn commit_entry(
        &self,
        name: &str,
        entry: Entry,
        changed: CategorySet,
        outcome: &mut OperationOutcome,
    ) -> bool {
        let row = self.shared.store.read().index_of(name);
        let Some(row) = row else {
            return false;
        };

        if !entry.exists() {
            self.shared
                .notifier
                .emit(StoreEvent::RowRemovalStarted { row });
            self.shared.store.write().remove(name);
            self.shared
                .notifier
                .emit(StoreEvent::RowRemovalFinished { row });
            outcome.removed_entries.push(name.to_string());
            true
        } else if !changed.is_empty() {
            self.shared.store.write().replace(name, entry);
            self.shared.notifier.emit(StoreEvent::RowChanged {
                row,
                fields: changed,
            });
            true
        } else {
            false
        }
    }

    fn finish_deletion(&self, touched: bool, outcome: &mut OperationOutcome) {
        if touched {
            let totals = self.shared.store.write().recalculate_totals();
            self.shared.notifier.emit(StoreEvent::TotalsChanged(totals));
        }
        if outcome.bytes_freed > 0 {
            info!(bytes = outcome.bytes_freed, "data deleted");
            self.shared.notifier.emit(StoreEvent::DataDeleted {
                bytes_freed: outcome.bytes_freed,
            });
        }
        outcome.entries = self.shared.store.read().len();
    }
}
