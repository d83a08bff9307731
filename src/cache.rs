//! Query/mutation cache over the remote store.
//!
//! Single source of truth for list state. Reads go through [`QueryCache::query`],
//! which serves the cached snapshot and schedules a background fetch when the
//! entry is stale. Writes go through [`QueryCache::mutate`]; a successful
//! mutation invalidates its key, which schedules a refetch — cached data is
//! never patched in place.
//!
//! All I/O runs on one worker thread that processes jobs in FIFO order, so
//! "mutate, invalidate, refetch" is serialized per key. Completions cross back
//! over an mpsc channel and are applied by [`QueryCache::poll`], which the
//! event loop drains every tick. Each invalidation bumps the entry's epoch;
//! a fetch result tagged with an older epoch lost the race and is discarded.

use std::collections::HashMap;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;

use crate::api::{RemoteStore, UserDraft, UserRecord};
use crate::error::ApiError;

/// Logical key for the user list. The cache is keyed for generality but the
/// application only ever uses this one.
pub const USERS_KEY: &str = "users";

/// A write operation routed through the cache.
#[derive(Debug, Clone)]
pub enum Mutation {
    Create { draft: UserDraft },
    Update { id: String, draft: UserDraft },
    Delete { id: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationKind {
    Create,
    Update,
    Delete,
}

impl Mutation {
    pub fn kind(&self) -> MutationKind {
        match self {
            Mutation::Create { .. } => MutationKind::Create,
            Mutation::Update { .. } => MutationKind::Update,
            Mutation::Delete { .. } => MutationKind::Delete,
        }
    }
}

enum Job {
    Fetch { key: String, epoch: u64 },
    Mutate { key: String, mutation: Mutation },
}

enum WorkerEvent {
    FetchDone {
        key: String,
        epoch: u64,
        result: Result<Vec<UserRecord>, ApiError>,
    },
    MutationDone {
        key: String,
        kind: MutationKind,
        result: Result<(), ApiError>,
    },
}

/// Completed work reported to the event loop by [`QueryCache::poll`].
#[derive(Debug, Clone)]
pub enum CacheNotification {
    /// The cached snapshot for `key` was replaced with fresh server state.
    Refetched { key: String },
    /// A fetch failed; the previous snapshot (if any) is still being served.
    FetchFailed { key: String, error: ApiError },
    MutationSucceeded { kind: MutationKind },
    MutationFailed { kind: MutationKind, error: ApiError },
}

#[derive(Default)]
struct QueryEntry {
    data: Option<Vec<UserRecord>>,
    error: Option<ApiError>,
    /// Bumped on every invalidation.
    epoch: u64,
    /// Epoch at which the last fetch settled (success or failure). A settled
    /// failure is not retried until the next invalidation.
    settled_epoch: Option<u64>,
    /// Epoch of the most recently enqueued fetch, if one is outstanding.
    inflight_epoch: Option<u64>,
}

/// Borrowed view of one cached query.
pub struct QueryView<'a> {
    pub data: Option<&'a [UserRecord]>,
    pub is_fetching: bool,
    pub is_error: bool,
}

/// Keyed cache plus the handle to its worker thread.
///
/// Dropping the cache drops the job channel; the worker finishes its current
/// call and exits. No cancellation of in-flight requests is attempted.
pub struct QueryCache {
    entries: HashMap<String, QueryEntry>,
    jobs: Sender<Job>,
    events: Receiver<WorkerEvent>,
    pending_mutations: usize,
}

impl QueryCache {
    pub fn new(store: impl RemoteStore + 'static) -> Self {
        let (jobs_tx, jobs_rx) = mpsc::channel();
        let (events_tx, events_rx) = mpsc::channel();
        thread::spawn(move || worker_loop(store, jobs_rx, events_tx));
        Self {
            entries: HashMap::new(),
            jobs: jobs_tx,
            events: events_rx,
            pending_mutations: 0,
        }
    }

    /// Current view of `key`. Triggers a background fetch on first use and
    /// after invalidation; otherwise the cached snapshot is served as-is.
    pub fn query(&mut self, key: &str) -> QueryView<'_> {
        self.ensure_fetch_scheduled(key);
        let entry = self.entries.entry(key.to_string()).or_default();
        QueryView {
            data: entry.data.as_deref(),
            is_fetching: entry.inflight_epoch.is_some(),
            is_error: entry.error.is_some(),
        }
    }

    /// Mark `key` stale and schedule the refetch.
    pub fn invalidate(&mut self, key: &str) {
        let entry = self.entries.entry(key.to_string()).or_default();
        entry.epoch += 1;
        entry.inflight_epoch = Some(entry.epoch);
        tracing::debug!(key = %key, epoch = entry.epoch, "invalidate");
        let _ = self.jobs.send(Job::Fetch {
            key: key.to_string(),
            epoch: entry.epoch,
        });
    }

    /// Queue a write. The outcome arrives through [`QueryCache::poll`]; on
    /// success the key is invalidated there, on failure cached data is left
    /// untouched and the error is reported.
    pub fn mutate(&mut self, key: &str, mutation: Mutation) {
        self.pending_mutations += 1;
        let _ = self.jobs.send(Job::Mutate {
            key: key.to_string(),
            mutation,
        });
    }

    /// Whether any mutation is still being processed by the worker.
    pub fn mutation_in_flight(&self) -> bool {
        self.pending_mutations > 0
    }

    /// Drain worker completions and fold them into the cache. Returns the
    /// notifications the page controller reacts to (notices, form reset).
    pub fn poll(&mut self) -> Vec<CacheNotification> {
        let mut out = Vec::new();
        while let Ok(event) = self.events.try_recv() {
            match event {
                WorkerEvent::FetchDone { key, epoch, result } => {
                    let entry = self.entries.entry(key.clone()).or_default();
                    if epoch != entry.epoch {
                        // A later invalidation superseded this fetch.
                        tracing::debug!(key = %key, epoch, current = entry.epoch, "stale fetch discarded");
                        continue;
                    }
                    entry.inflight_epoch = None;
                    entry.settled_epoch = Some(epoch);
                    match result {
                        Ok(records) => {
                            entry.data = Some(records);
                            entry.error = None;
                            out.push(CacheNotification::Refetched { key });
                        }
                        Err(error) => {
                            // Previous snapshot stays visible.
                            tracing::warn!(key = %key, %error, "fetch failed");
                            entry.error = Some(error.clone());
                            out.push(CacheNotification::FetchFailed { key, error });
                        }
                    }
                }
                WorkerEvent::MutationDone { key, kind, result } => {
                    self.pending_mutations = self.pending_mutations.saturating_sub(1);
                    match result {
                        Ok(()) => {
                            self.invalidate(&key);
                            out.push(CacheNotification::MutationSucceeded { kind });
                        }
                        Err(error) => {
                            tracing::warn!(key = %key, ?kind, %error, "mutation failed");
                            out.push(CacheNotification::MutationFailed { kind, error });
                        }
                    }
                }
            }
        }
        out
    }

    fn ensure_fetch_scheduled(&mut self, key: &str) {
        let entry = self.entries.entry(key.to_string()).or_default();
        let stale = entry.settled_epoch != Some(entry.epoch);
        if stale && entry.inflight_epoch != Some(entry.epoch) {
            entry.inflight_epoch = Some(entry.epoch);
            let _ = self.jobs.send(Job::Fetch {
                key: key.to_string(),
                epoch: entry.epoch,
            });
        }
    }
}

fn worker_loop(store: impl RemoteStore, jobs: Receiver<Job>, events: Sender<WorkerEvent>) {
    while let Ok(job) = jobs.recv() {
        let event = match job {
            Job::Fetch { key, epoch } => WorkerEvent::FetchDone {
                result: store.list(),
                key,
                epoch,
            },
            Job::Mutate { key, mutation } => {
                let kind = mutation.kind();
                let result = match mutation {
                    Mutation::Create { draft } => store.create(&draft).map(|_| ()),
                    Mutation::Update { id, draft } => store.update(&id, &draft).map(|_| ()),
                    Mutation::Delete { id } => store.delete(&id),
                };
                WorkerEvent::MutationDone { key, kind, result }
            }
        };
        if events.send(event).is_err() {
            break;
        }
    }
}
