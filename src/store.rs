//! Owner of the last-known authoritative snapshot.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info, instrument, warn};

use crate::api::GameApi;
use crate::game::GameSnapshot;

/// Result of a resync attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resync {
    /// The fetched snapshot replaced the local one.
    Applied(GameSnapshot),
    /// The fetch succeeded but the store moved to a newer epoch meanwhile;
    /// the fetched snapshot was dropped.
    Discarded,
    /// The fetch failed; the previous snapshot is kept (possibly stale).
    Failed,
}

impl Resync {
    /// The applied snapshot, if any.
    pub fn applied(&self) -> Option<&GameSnapshot> {
        match self {
            Resync::Applied(snapshot) => Some(snapshot),
            _ => None,
        }
    }
}

#[derive(Debug, Default)]
struct StoreState {
    snapshot: Option<GameSnapshot>,
    epoch: u64,
}

/// Holds the single local copy of the game state.
///
/// Readers get clones; the only way to change the state is to replace it
/// wholesale with a snapshot fetched from the server. The epoch counter is
/// bumped on reset so that work started against an older game can detect
/// that its results no longer apply.
#[derive(Debug, Default)]
pub struct SnapshotStore {
    state: Mutex<StoreState>,
}

impl SnapshotStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        // Every write is a single assignment, so a poisoned lock still
        // holds a whole snapshot.
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Copy of the current snapshot, if one has been fetched.
    pub fn snapshot(&self) -> Option<GameSnapshot> {
        self.lock().snapshot.clone()
    }

    /// Current epoch.
    pub fn epoch(&self) -> u64 {
        self.lock().epoch
    }

    /// Starts a new epoch. Resyncs begun under an older epoch will be discarded.
    #[instrument(skip(self))]
    pub fn advance_epoch(&self) -> u64 {
        let mut state = self.lock();
        state.epoch += 1;
        info!(epoch = state.epoch, "Snapshot store advanced epoch");
        state.epoch
    }

    /// Fetches the board and replaces the local snapshot.
    ///
    /// Failures are logged and otherwise swallowed.
    #[instrument(skip(self, api))]
    pub async fn resync(&self, api: &dyn GameApi) -> Resync {
        let epoch = self.epoch();
        self.resync_in_epoch(api, epoch).await
    }

    /// Like [`SnapshotStore::resync`], but only applies the result if the
    /// store is still in `epoch` when the fetch returns.
    #[instrument(skip(self, api))]
    pub async fn resync_in_epoch(&self, api: &dyn GameApi, epoch: u64) -> Resync {
        let snapshot = match api.fetch_board().await {
            Ok(snapshot) => snapshot,
            Err(e) => {
                warn!(error = %e, "Resync failed, keeping previous snapshot");
                return Resync::Failed;
            }
        };

        let mut state = self.lock();
        if state.epoch != epoch {
            warn!(
                expected = epoch,
                current = state.epoch,
                "Discarding snapshot fetched for an older game"
            );
            return Resync::Discarded;
        }

        debug!(
            mover = %snapshot.current_mover(),
            black = snapshot.black_count(),
            white = snapshot.white_count(),
            game_over = snapshot.game_over(),
            "Snapshot replaced"
        );
        state.snapshot = Some(snapshot.clone());
        Resync::Applied(snapshot)
    }
}
