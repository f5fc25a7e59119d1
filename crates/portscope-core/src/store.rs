//! View state store — the single source of truth for what the surface shows.
//!
//! The store holds the current [`ResultSet`], the [`CameraState`] and the
//! [`SearchStatus`]. It is an explicit, cloneable handle: every component
//! that needs it is given a clone at construction time.
//!
//! # Notifications
//!
//! Every committed mutation produces exactly one [`Notification`], delivered
//! synchronously to all subscribers before the mutating call returns.
//! Mutate-then-notify is serialized by a commit lock, so observers always see
//! notifications in commit order and never see half of a multi-field
//! [`ViewStore::update`].
//!
//! Subscriber callbacks run while the commit lock is held. They may read the
//! store, but must not mutate it or subscribe from inside the callback. Use
//! [`ViewStore::subscribe_channel`] to hand notifications to another loop.
//!
//! The store trusts its caller. Recency of results is enforced by the
//! [`SearchCoordinator`](crate::search::SearchCoordinator), not here.

use crate::types::{CameraState, ResultSet, SearchStatus};
use parking_lot::{Mutex, RwLock};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::mpsc;

// ---------------------------------------------------------------------------
// State + change types
// ---------------------------------------------------------------------------

/// Snapshot of everything the surface renders from.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    pub results: ResultSet,
    pub camera: CameraState,
    pub status: SearchStatus,
}

/// Which fields a commit touched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Changes {
    pub results: bool,
    pub camera: bool,
    pub status: bool,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        !(self.results || self.camera || self.status)
    }
}

/// Delivered to subscribers after each commit.
#[derive(Debug, Clone, PartialEq)]
pub struct Notification {
    /// Monotonic commit counter, starting at 1 for the first commit.
    pub revision: u64,
    pub changes: Changes,
    /// State as of this commit.
    pub state: ViewState,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Mutable view of the state inside [`ViewStore::update`].
///
/// Setters record what changed; the commit notifies once for all of them.
pub struct Draft<'a> {
    state: &'a mut ViewState,
    changes: Changes,
}

impl Draft<'_> {
    pub fn state(&self) -> &ViewState {
        self.state
    }

    /// Replace the result set wholesale. Always counts as a change.
    pub fn set_results(&mut self, results: ResultSet) {
        self.state.results = results;
        self.changes.results = true;
    }

    /// Replace the camera. An identical camera is not a change.
    pub fn set_camera(&mut self, camera: CameraState) {
        if self.state.camera != camera {
            self.state.camera = camera;
            self.changes.camera = true;
        }
    }

    /// Replace the search status. An identical status is not a change.
    pub fn set_status(&mut self, status: SearchStatus) {
        if self.state.status != status {
            self.state.status = status;
            self.changes.status = true;
        }
    }
}

// ---------------------------------------------------------------------------
// Store
// ---------------------------------------------------------------------------

enum Subscriber {
    Callback(Box<dyn Fn(&Notification) + Send + Sync>),
    Channel(mpsc::UnboundedSender<Notification>),
}

struct Inner {
    state: RwLock<(u64, ViewState)>,
    commit: Mutex<()>,
    subscribers: Mutex<Vec<(SubscriptionId, Subscriber)>>,
    next_id: AtomicU64,
}

/// Cloneable handle to the shared view state.
#[derive(Clone)]
pub struct ViewStore {
    inner: Arc<Inner>,
}

impl std::fmt::Debug for ViewStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let (revision, state) = &*self.inner.state.read();
        f.debug_struct("ViewStore")
            .field("revision", revision)
            .field("state", state)
            .finish()
    }
}

impl ViewStore {
    /// Create a store with no results, idle status and the given camera.
    pub fn new(camera: CameraState) -> Self {
        Self {
            inner: Arc::new(Inner {
                state: RwLock::new((
                    0,
                    ViewState {
                        results: Vec::new(),
                        camera,
                        status: SearchStatus::Idle,
                    },
                )),
                commit: Mutex::new(()),
                subscribers: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
            }),
        }
    }

    /// Synchronous snapshot of the current state.
    pub fn state(&self) -> ViewState {
        self.inner.state.read().1.clone()
    }

    /// Number of commits so far.
    pub fn revision(&self) -> u64 {
        self.inner.state.read().0
    }

    pub fn set_results(&self, results: ResultSet) -> Changes {
        self.update(|d| d.set_results(results))
    }

    pub fn set_camera(&self, camera: CameraState) -> Changes {
        self.update(|d| d.set_camera(camera))
    }

    pub fn set_status(&self, status: SearchStatus) -> Changes {
        self.update(|d| d.set_status(status))
    }

    /// Apply several mutations as one commit with a single notification.
    ///
    /// Returns what changed. If nothing did, no notification is sent and the
    /// revision is not advanced.
    pub fn update(&self, f: impl FnOnce(&mut Draft<'_>)) -> Changes {
        let _commit = self.inner.commit.lock();

        let notification = {
            let mut guard = self.inner.state.write();
            let (revision, state) = &mut *guard;
            let mut draft = Draft {
                state,
                changes: Changes::default(),
            };
            f(&mut draft);
            let changes = draft.changes;
            if changes.is_empty() {
                return changes;
            }
            *revision += 1;
            Notification {
                revision: *revision,
                changes,
                state: state.clone(),
            }
        };

        tracing::trace!(
            revision = notification.revision,
            changes = ?notification.changes,
            "store: committed"
        );
        self.notify(&notification);
        notification.changes
    }

    /// Register a callback invoked after every commit.
    pub fn subscribe(
        &self,
        callback: impl Fn(&Notification) + Send + Sync + 'static,
    ) -> SubscriptionId {
        self.add(Subscriber::Callback(Box::new(callback)))
    }

    /// Register a channel that receives every notification.
    ///
    /// The channel is unbounded so no notification is ever dropped. It is
    /// unsubscribed automatically once the receiver is dropped.
    pub fn subscribe_channel(&self) -> mpsc::UnboundedReceiver<Notification> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.add(Subscriber::Channel(tx));
        rx
    }

    /// Remove a subscription. Returns `false` if it was not registered.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subs = self.inner.subscribers.lock();
        let before = subs.len();
        subs.retain(|(sid, _)| *sid != id);
        subs.len() != before
    }

    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.lock().len()
    }

    fn add(&self, subscriber: Subscriber) -> SubscriptionId {
        let id = SubscriptionId(self.inner.next_id.fetch_add(1, Ordering::Relaxed));
        self.inner.subscribers.lock().push((id, subscriber));
        id
    }

    fn notify(&self, notification: &Notification) {
        let mut subs = self.inner.subscribers.lock();
        subs.retain(|(_, sub)| match sub {
            Subscriber::Callback(cb) => {
                cb(notification);
                true
            }
            Subscriber::Channel(tx) => tx.send(notification.clone()).is_ok(),
        });
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
