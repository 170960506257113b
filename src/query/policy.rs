//! Cache and polling policy
//!
//! The backend mutates recordings and subscriptions asynchronously (bot
//! execution, payment webhooks), outside any request the client initiates,
//! so list and detail data is polled on fixed timers rather than trusting
//! request/response causality. These constants define the contract and are
//! referenced by tests; changing one changes observable behavior.

use std::time::Duration;

/// Current user profile: stable, revalidated occasionally.
pub const CURRENT_USER_STALE: Duration = Duration::from_secs(5 * 60);

/// Recordings list staleness window for on-access refetch.
pub const RECORDINGS_LIST_STALE: Duration = Duration::from_secs(10);

/// Fixed timer for the mounted recordings list, regardless of staleness,
/// so server-side status changes surface without user interaction.
pub const RECORDINGS_LIST_REFRESH: Duration = Duration::from_secs(15);

/// Recording detail poll period while the recording (or its transcript)
/// is still in progress. Polling stops at a terminal status.
pub const RECORDING_DETAIL_POLL: Duration = Duration::from_secs(10);

/// Usage snapshot gates the launch button; keep it reasonably current.
pub const USAGE_STALE: Duration = Duration::from_secs(60);

pub const SUBSCRIPTION_STALE: Duration = Duration::from_secs(5 * 60);

/// The plan catalog changes on the backend's release cadence, not ours.
pub const PLANS_STALE: Duration = Duration::from_secs(60 * 60);

pub const PAYMENTS_STALE: Duration = Duration::from_secs(5 * 60);

pub const STATS_STALE: Duration = Duration::from_secs(60);

/// Checkout settle schedule: subscription and usage are invalidated
/// immediately on payment completion, then again at each of these offsets
/// to absorb asynchronous webhook processing.
pub const CHECKOUT_SETTLE_STEP: Duration = Duration::from_secs(2);

/// Number of delayed settle passes after the immediate one (2 s and 4 s).
pub const CHECKOUT_SETTLE_PASSES: u32 = 2;

/// One final full invalidate-and-reload at this point guarantees
/// consistency (6 s).
pub const CHECKOUT_FULL_RELOAD_AFTER: Duration = Duration::from_secs(6);
