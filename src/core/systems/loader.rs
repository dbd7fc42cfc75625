//=========================================================================
// Loader Boundary
//=========================================================================
//
// Per-state resource loader. A state's `preload` hook queues requests;
// the state manager then starts the loader and suspends the state until
// the loader reports completion.
//
// Completion protocol:
//   StateManager ── start(LoadCompletion) ──> Loader
//                                               │ (any thread)
//   StateManager <── LoadTicket (channel) ──────┘ completion.complete()
//
// `LoadCompletion::complete` consumes the handle, so a loader can report
// at most once per load cycle.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError};
use std::thread::{self, JoinHandle};

use crossbeam_channel::Sender;
use log::{debug, warn};

//=== AssetRequest ========================================================

/// A single resource queued by a `preload` hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRequest {
    /// Cache key the loaded bytes are stored under.
    pub key: String,

    /// Path relative to the loader's asset root.
    pub path: PathBuf,
}

impl AssetRequest {
    pub fn new(key: impl Into<String>, path: impl Into<PathBuf>) -> Self {
        Self {
            key: key.into(),
            path: path.into(),
        }
    }
}

//=== LoadTicket ==========================================================

/// Identifies one load cycle of one state.
///
/// Deliberately not `Clone`: the ticket that reaches the state manager is
/// the one minted when the load started.
#[derive(Debug, PartialEq, Eq)]
pub struct LoadTicket {
    key: String,
    cycle: u64,
}

impl LoadTicket {
    pub(crate) fn new(key: impl Into<String>, cycle: u64) -> Self {
        Self {
            key: key.into(),
            cycle,
        }
    }

    /// Key of the state that started the load.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Load cycle number, unique per manager.
    pub fn cycle(&self) -> u64 {
        self.cycle
    }

    pub(crate) fn into_key(self) -> String {
        self.key
    }
}

//=== LoadCompletion ======================================================

/// One-shot completion handle handed to [`Loader::start`].
#[derive(Debug)]
pub struct LoadCompletion {
    ticket: LoadTicket,
    sender: Sender<LoadTicket>,
}

impl LoadCompletion {
    pub(crate) fn new(ticket: LoadTicket, sender: Sender<LoadTicket>) -> Self {
        Self { ticket, sender }
    }

    /// Key of the state waiting on this load.
    pub fn key(&self) -> &str {
        self.ticket.key()
    }

    /// Gives up the handle for its ticket.
    ///
    /// For hosts that collect completions themselves and hand them to
    /// `StateManager::load_complete` instead of the manager's channel.
    pub fn into_ticket(self) -> LoadTicket {
        self.ticket
    }

    /// Reports the load as finished. Safe to call from any thread.
    pub fn complete(self) {
        if let Err(err) = self.sender.send(self.ticket) {
            warn!(
                target: "states",
                "Dropping load completion for {:?}: state manager is gone",
                err.0.key()
            );
        }
    }
}

//=== Loader Trait ========================================================

/// Resource loader owned by a single state.
pub trait Loader {
    /// Discards anything queued by a previous cycle.
    fn reset(&mut self);

    /// Queues one resource for the next [`Loader::start`].
    fn enqueue(&mut self, request: AssetRequest);

    /// Number of queued, not yet started requests.
    fn queue_size(&self) -> usize;

    /// Starts loading everything queued and reports through `completion`
    /// when done.
    fn start(&mut self, completion: LoadCompletion);

    /// Abandons the load in progress. A completion that still arrives is
    /// ignored by the state manager.
    fn cancel(&mut self) {}

    /// Bytes previously loaded under `key`, if the loader keeps them.
    fn get(&self, _key: &str) -> Option<Arc<[u8]>> {
        None
    }
}

//=== FileLoader ==========================================================

/// Shared byte cache filled by [`FileLoader`] worker threads.
pub type AssetCache = Arc<Mutex<HashMap<String, Arc<[u8]>>>>;

/// Loader that reads queued files into raw bytes on a worker thread.
///
/// Nothing is decoded; a missing or unreadable file is logged and skipped
/// so the load still completes. A cancelled worker stops before its next
/// file and never completes; files it already read stay cached.
#[derive(Debug)]
pub struct FileLoader {
    root: PathBuf,
    queue: Vec<AssetRequest>,
    cache: AssetCache,

    /// Cancellation flag of the current load. Each `start` gets a fresh one.
    cancelled: Arc<AtomicBool>,
    worker: Option<JoinHandle<()>>,
}

impl FileLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            queue: Vec::new(),
            cache: AssetCache::default(),
            cancelled: Arc::new(AtomicBool::new(false)),
            worker: None,
        }
    }

    /// Handle to the cache, shared with in-flight workers.
    pub fn cache(&self) -> AssetCache {
        Arc::clone(&self.cache)
    }

    /// Whether the latest worker is still reading.
    pub fn is_loading(&self) -> bool {
        self.worker.as_ref().is_some_and(|worker| !worker.is_finished())
    }
}

/// Reads `requests` into `cache`, checking `cancelled` before each file.
///
/// Returns `false` if the load was cancelled.
fn read_assets(
    root: &Path,
    requests: Vec<AssetRequest>,
    cache: &AssetCache,
    cancelled: &AtomicBool,
) -> bool {
    for request in requests {
        if cancelled.load(Ordering::Acquire) {
            return false;
        }

        let path = root.join(&request.path);
        match fs::read(&path) {
            Ok(bytes) => {
                cache
                    .lock()
                    .unwrap_or_else(PoisonError::into_inner)
                    .insert(request.key, bytes.into());
            }
            Err(e) => {
                warn!(target: "states", "Failed to load {}: {}", path.display(), e);
            }
        }
    }

    !cancelled.load(Ordering::Acquire)
}

impl Loader for FileLoader {
    fn reset(&mut self) {
        self.queue.clear();
    }

    fn enqueue(&mut self, request: AssetRequest) {
        self.queue.push(request);
    }

    fn queue_size(&self) -> usize {
        self.queue.len()
    }

    fn start(&mut self, completion: LoadCompletion) {
        let requests = std::mem::take(&mut self.queue);
        let root = self.root.clone();
        let cache = self.cache();
        self.cancelled = Arc::new(AtomicBool::new(false));
        let cancelled = Arc::clone(&self.cancelled);

        debug!(
            target: "states",
            "Loading {} assets for {:?} from {}",
            requests.len(),
            completion.key(),
            root.display()
        );

        self.worker = Some(thread::spawn(move || {
            if read_assets(&root, requests, &cache, &cancelled) {
                completion.complete();
            } else {
                debug!(target: "states", "Load for {:?} cancelled", completion.key());
            }
        }));
    }

    fn cancel(&mut self) {
        self.cancelled.store(true, Ordering::Release);
    }

    fn get(&self, key: &str) -> Option<Arc<[u8]>> {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl Drop for FileLoader {
    fn drop(&mut self) {
        self.cancel();
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                warn!(target: "states", "Asset worker panicked");
            }
        }
    }
}

//=== Tests ===============================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use std::time::Duration;

    #[test]
    fn completion_delivers_its_ticket_once() {
        let (tx, rx) = unbounded();
        let completion = LoadCompletion::new(LoadTicket::new("title", 7), tx);

        completion.complete();

        let ticket = rx.try_recv().unwrap();
        assert_eq!(ticket.key(), "title");
        assert_eq!(ticket.cycle(), 7);
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn completion_survives_disconnected_manager() {
        let (tx, rx) = unbounded();
        drop(rx);

        // Should log and return, not panic
        LoadCompletion::new(LoadTicket::new("title", 1), tx).complete();
    }

    #[test]
    fn reset_discards_queued_requests() {
        let mut loader = FileLoader::new("assets");
        loader.enqueue(AssetRequest::new("logo", "logo.png"));
        loader.enqueue(AssetRequest::new("font", "font.ttf"));
        assert_eq!(loader.queue_size(), 2);

        loader.reset();
        assert_eq!(loader.queue_size(), 0);
    }

    #[test]
    fn file_loader_reads_bytes_and_completes() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("level.txt"), b"level one").unwrap();

        let (tx, rx) = unbounded();
        let mut loader = FileLoader::new(dir.path());
        loader.enqueue(AssetRequest::new("level", "level.txt"));
        loader.enqueue(AssetRequest::new("missing", "missing.txt"));

        loader.start(LoadCompletion::new(LoadTicket::new("game", 3), tx));
        assert_eq!(loader.queue_size(), 0, "start drains the queue");

        let ticket = rx.recv_timeout(Duration::from_secs(5)).unwrap();
        assert_eq!(ticket.key(), "game");
        assert_eq!(loader.get("level").as_deref(), Some(&b"level one"[..]));
        assert!(loader.get("missing").is_none());
    }

    #[test]
    fn into_ticket_hands_over_the_ticket() {
        let (tx, rx) = unbounded();
        let completion = LoadCompletion::new(LoadTicket::new("menu", 2), tx);

        let ticket = completion.into_ticket();

        assert_eq!(ticket, LoadTicket::new("menu", 2));
        assert!(rx.try_recv().is_err(), "nothing is sent on the channel");
    }

    #[test]
    fn cancelled_read_stops_before_next_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("a.txt"), b"a").unwrap();
        let cache = AssetCache::default();
        let cancelled = AtomicBool::new(true);

        let finished = read_assets(
            dir.path(),
            vec![AssetRequest::new("a", "a.txt")],
            &cache,
            &cancelled,
        );

        assert!(!finished);
        assert!(cache.lock().unwrap().is_empty());
    }

    #[test]
    fn worker_is_joined_once_finished() {
        let dir = tempfile::tempdir().unwrap();
        let (tx, rx) = unbounded();
        let mut loader = FileLoader::new(dir.path());

        loader.start(LoadCompletion::new(LoadTicket::new("empty", 1), tx));
        rx.recv_timeout(Duration::from_secs(5)).unwrap();

        while loader.is_loading() {
            std::thread::yield_now();
        }
        assert!(!loader.is_loading());
    }
}
