//! Polling tasks
//!
//! Server-side state changes without us asking (bot execution, webhook
//! delivery), so mounted screens poll. Each task is tied to a handle that
//! aborts it on drop: navigating away from a screen drops the handle and
//! the timer stops. Responses racing a dropped handle are simply ignored.

use std::sync::Arc;

use tokio::task::JoinHandle;
use tracing::debug;
use uuid::Uuid;

use crate::api::types::RecordingsQuery;
use crate::query::{policy, QueryClient, QueryEvent, QueryKey};

/// Owner of one background polling task. Dropping it stops the task.
#[derive(Debug)]
pub struct PollHandle {
    handle: JoinHandle<()>,
}

impl PollHandle {
    /// Whether the task stopped on its own (terminal status reached).
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for PollHandle {
    fn drop(&mut self) {
        self.handle.abort();
    }
}

impl QueryClient {
    /// Refetch a mounted recordings list on a fixed timer, regardless of
    /// staleness, for as long as the handle lives.
    pub fn spawn_list_poller(self: &Arc<Self>, query: RecordingsQuery) -> PollHandle {
        let client = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut interval = tokio::time::interval(policy::RECORDINGS_LIST_REFRESH);
            interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // The screen does its own initial fetch; skip the immediate tick.
            interval.tick().await;
            loop {
                interval.tick().await;
                match client.refetch_recordings(&query).await {
                    Ok(_) => client.emit(QueryEvent::Refreshed(QueryKey::Recordings)),
                    Err(err) if err.is_unauthorized() => break,
                    Err(err) => {
                        debug!(%err, "recordings list refresh failed");
                        client.emit(QueryEvent::RefreshFailed {
                            key: QueryKey::Recordings,
                            message: err.display_message(),
                        });
                    }
                }
            }
        });
        PollHandle { handle }
    }

    /// Poll one recording's detail while it is still in progress. The task
    /// exits on its own once the status turns terminal (and any transcript
    /// work finishes), or when the recording disappears.
    pub fn spawn_detail_poller(self: &Arc<Self>, id: Uuid) -> PollHandle {
        let client = Arc::clone(self);
        let handle = tokio::spawn(async move {
            let mut in_progress = match client.recording(id).await {
                Ok(detail) => detail.is_in_progress(),
                Err(err) if err.is_not_found() || err.is_unauthorized() => return,
                // Status unknown; the poll timer doubles as the retry.
                Err(_) => true,
            };
            while in_progress {
                tokio::time::sleep(policy::RECORDING_DETAIL_POLL).await;
                match client.refetch_recording(id).await {
                    Ok(detail) => {
                        client.emit(QueryEvent::Refreshed(QueryKey::Recording(id)));
                        in_progress = detail.is_in_progress();
                    }
                    Err(err) if err.is_not_found() || err.is_unauthorized() => break,
                    Err(err) => {
                        debug!(%id, %err, "recording detail refresh failed");
                    }
                }
            }
            debug!(%id, "detail polling stopped");
        });
        PollHandle { handle }
    }
}
