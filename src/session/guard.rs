//! Route guard
//!
//! Gates protected screens on the session state. Checking is the only
//! transient state: a token is present and the current-user fetch is still
//! in flight. The terminal states either render the protected content or
//! redirect to login, preserving the originally requested route so the
//! login flow can return there.

use crate::query::QuerySnapshot;
use crate::session::router::Route;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GuardState {
    /// Token present, current-user fetch in flight.
    Checking,
    /// Token present and the current-user fetch succeeded.
    Authenticated,
    /// No token, or the current-user fetch failed.
    Unauthenticated,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Render,
    Loading,
    RedirectToLogin { from: Route },
}

/// Classify the session from token presence and the user query snapshot.
pub fn guard_state<T>(has_token: bool, user: &QuerySnapshot<T>) -> GuardState {
    if !has_token {
        return GuardState::Unauthenticated;
    }
    if user.data.is_some() {
        return GuardState::Authenticated;
    }
    if user.error.is_some() {
        return GuardState::Unauthenticated;
    }
    GuardState::Checking
}

/// Decide what to do with a navigation request.
pub fn decide<T>(has_token: bool, user: &QuerySnapshot<T>, requested: &Route) -> GuardDecision {
    if !requested.is_protected() {
        return GuardDecision::Render;
    }
    match guard_state(has_token, user) {
        GuardState::Authenticated => GuardDecision::Render,
        GuardState::Checking => GuardDecision::Loading,
        GuardState::Unauthenticated => GuardDecision::RedirectToLogin {
            from: requested.clone(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot(data: Option<u8>, error: Option<&str>, is_loading: bool) -> QuerySnapshot<u8> {
        QuerySnapshot {
            data,
            error: error.map(str::to_string),
            is_loading,
            is_fetched: data.is_some(),
        }
    }

    #[test]
    fn test_no_token_is_unauthenticated() {
        let user = snapshot(None, None, false);
        assert_eq!(guard_state(false, &user), GuardState::Unauthenticated);
    }

    #[test]
    fn test_token_with_pending_fetch_is_checking() {
        let user = snapshot(None, None, true);
        assert_eq!(guard_state(true, &user), GuardState::Checking);
    }

    #[test]
    fn test_token_with_user_is_authenticated() {
        let user = snapshot(Some(1), None, false);
        assert_eq!(guard_state(true, &user), GuardState::Authenticated);
    }

    #[test]
    fn test_failed_fetch_is_unauthenticated() {
        let user = snapshot(None, Some("network error"), false);
        assert_eq!(guard_state(true, &user), GuardState::Unauthenticated);
    }

    #[test]
    fn test_redirect_preserves_requested_route() {
        let user = snapshot(None, None, false);
        let decision = decide(false, &user, &Route::Meetings);
        assert_eq!(
            decision,
            GuardDecision::RedirectToLogin {
                from: Route::Meetings
            }
        );
    }

    #[test]
    fn test_public_routes_always_render() {
        let user = snapshot(None, None, false);
        assert_eq!(decide(false, &user, &Route::Landing), GuardDecision::Render);
        assert_eq!(decide(false, &user, &Route::Login), GuardDecision::Render);
    }

    #[test]
    fn test_checking_renders_loading_for_protected_route() {
        let user = snapshot(None, None, true);
        assert_eq!(decide(true, &user, &Route::Dashboard), GuardDecision::Loading);
    }
}
