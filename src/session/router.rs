//! Route model
//!
//! The application's navigable locations, with parse/format for the path
//! form the backend and OAuth provider use in redirects. The OAuth success
//! location carries the issued token as a URL parameter.

use uuid::Uuid;

/// A navigable location in the application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Marketing landing page.
    Landing,
    Login,
    Register,
    ForgotPassword,
    ResetPassword { token: Option<String> },
    /// OAuth callback target; the provider appends the issued token.
    OAuthSuccess { token: Option<String> },
    Dashboard,
    Meetings,
    MeetingDetail(Uuid),
    NewMeeting,
    Settings,
    Billing,
}

impl Route {
    /// Parse a location string, including any query parameters.
    pub fn parse(location: &str) -> Option<Route> {
        let (path, query) = match location.split_once('?') {
            Some((path, query)) => (path, Some(query)),
            None => (location, None),
        };
        let trimmed = path.trim_end_matches('/');
        let path = if trimmed.is_empty() { "/" } else { trimmed };

        match path {
            "/" => Some(Route::Landing),
            "/auth/login" => Some(Route::Login),
            "/auth/register" => Some(Route::Register),
            "/auth/forgot-password" => Some(Route::ForgotPassword),
            "/auth/reset-password" => Some(Route::ResetPassword {
                token: query_param(query, "token"),
            }),
            "/auth/oauth-success" => Some(Route::OAuthSuccess {
                token: query_param(query, "token"),
            }),
            "/dashboard" => Some(Route::Dashboard),
            "/dashboard/meetings" => Some(Route::Meetings),
            "/dashboard/new-meeting" => Some(Route::NewMeeting),
            "/dashboard/settings" => Some(Route::Settings),
            "/dashboard/billing" => Some(Route::Billing),
            other => other
                .strip_prefix("/dashboard/meetings/")
                .and_then(|id| Uuid::parse_str(id).ok())
                .map(Route::MeetingDetail),
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Landing => "/".to_string(),
            Route::Login => "/auth/login".to_string(),
            Route::Register => "/auth/register".to_string(),
            Route::ForgotPassword => "/auth/forgot-password".to_string(),
            Route::ResetPassword { token } => match token {
                Some(token) => format!("/auth/reset-password?token={token}"),
                None => "/auth/reset-password".to_string(),
            },
            Route::OAuthSuccess { token } => match token {
                Some(token) => format!("/auth/oauth-success?token={token}"),
                None => "/auth/oauth-success".to_string(),
            },
            Route::Dashboard => "/dashboard".to_string(),
            Route::Meetings => "/dashboard/meetings".to_string(),
            Route::MeetingDetail(id) => format!("/dashboard/meetings/{id}"),
            Route::NewMeeting => "/dashboard/new-meeting".to_string(),
            Route::Settings => "/dashboard/settings".to_string(),
            Route::Billing => "/dashboard/billing".to_string(),
        }
    }

    /// Auth screens are exempt from the login redirect on authorization
    /// failure.
    pub fn is_auth_screen(&self) -> bool {
        matches!(
            self,
            Route::Login
                | Route::Register
                | Route::ForgotPassword
                | Route::ResetPassword { .. }
                | Route::OAuthSuccess { .. }
        )
    }

    /// Screens behind the route guard.
    pub fn is_protected(&self) -> bool {
        matches!(
            self,
            Route::Dashboard
                | Route::Meetings
                | Route::MeetingDetail(_)
                | Route::NewMeeting
                | Route::Settings
                | Route::Billing
        )
    }
}

fn query_param(query: Option<&str>, name: &str) -> Option<String> {
    let query = query?;
    query.split('&').find_map(|pair| {
        let (key, value) = pair.split_once('=')?;
        (key == name && !value.is_empty()).then(|| value.to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_static_routes() {
        assert_eq!(Route::parse("/"), Some(Route::Landing));
        assert_eq!(Route::parse("/auth/login"), Some(Route::Login));
        assert_eq!(Route::parse("/dashboard"), Some(Route::Dashboard));
        assert_eq!(Route::parse("/dashboard/meetings"), Some(Route::Meetings));
        assert_eq!(Route::parse("/dashboard/billing"), Some(Route::Billing));
    }

    #[test]
    fn test_parse_meeting_detail() {
        let id = Uuid::new_v4();
        let route = Route::parse(&format!("/dashboard/meetings/{id}"));
        assert_eq!(route, Some(Route::MeetingDetail(id)));
    }

    #[test]
    fn test_parse_rejects_bad_meeting_id() {
        assert_eq!(Route::parse("/dashboard/meetings/not-a-uuid"), None);
    }

    #[test]
    fn test_parse_oauth_token_param() {
        let route = Route::parse("/auth/oauth-success?token=abc123");
        assert_eq!(
            route,
            Some(Route::OAuthSuccess {
                token: Some("abc123".to_string())
            })
        );
    }

    #[test]
    fn test_parse_oauth_without_token() {
        assert_eq!(
            Route::parse("/auth/oauth-success"),
            Some(Route::OAuthSuccess { token: None })
        );
        assert_eq!(
            Route::parse("/auth/oauth-success?token="),
            Some(Route::OAuthSuccess { token: None })
        );
    }

    #[test]
    fn test_path_round_trip() {
        let id = Uuid::new_v4();
        let routes = [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::ForgotPassword,
            Route::OAuthSuccess {
                token: Some("tok".to_string()),
            },
            Route::Dashboard,
            Route::Meetings,
            Route::MeetingDetail(id),
            Route::NewMeeting,
            Route::Settings,
            Route::Billing,
        ];
        for route in routes {
            assert_eq!(Route::parse(&route.path()), Some(route));
        }
    }

    #[test]
    fn test_protected_and_auth_screen_sets_are_disjoint() {
        let all = [
            Route::Landing,
            Route::Login,
            Route::Register,
            Route::ForgotPassword,
            Route::ResetPassword { token: None },
            Route::OAuthSuccess { token: None },
            Route::Dashboard,
            Route::Meetings,
            Route::MeetingDetail(Uuid::new_v4()),
            Route::NewMeeting,
            Route::Settings,
            Route::Billing,
        ];
        for route in &all {
            assert!(
                !(route.is_protected() && route.is_auth_screen()),
                "{route:?} cannot be both protected and an auth screen"
            );
        }
    }
}
