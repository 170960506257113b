//! Query/cache layer behavior against a mock backend
//!
//! Deduplication, the placeholder page, mutation invalidation rules, the
//! polling timers, and the checkout settle schedule.

mod common;

use std::time::Duration;

use pretty_assertions::assert_eq;
use serde_json::json;
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

use skriber::api::types::RecordingsQuery;
use skriber::query::{QueryEvent, QueryKey};

use common::{
    delete_body, detail_body, launch_body, page_body, recording_body, subscription_body,
    usage_body, TestBackend,
};

#[tokio::test]
async fn test_list_placeholder_before_first_load() {
    let backend = TestBackend::start().await;
    let query = backend.query();

    let page = query
        .recordings_or_placeholder(&RecordingsQuery::default())
        .await;
    assert_eq!(page.total, 0);
    assert!(page.recordings.is_empty());
}

#[tokio::test]
async fn test_concurrent_list_reads_share_one_request() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");

    Mock::given(method("GET"))
        .and(path("/api/v1/recordings"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(page_body(vec![]))
                .set_delay(Duration::from_millis(100)),
        )
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let filters = RecordingsQuery::default();
    let (first, second) = tokio::join!(query.recordings(&filters), query.recordings(&filters));
    assert!(first.is_ok());
    assert!(second.is_ok());

    let requests = backend.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
}

#[tokio::test]
async fn test_launch_invalidates_list_so_next_read_sees_new_entry() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");
    let new_id = Uuid::new_v4();

    // First read: empty page. After the launch the list is stale and the
    // next read hits the backend again, which now returns the new entry.
    Mock::given(method("GET"))
        .and(path("/api/v1/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![])))
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![recording_body(
            new_id,
            "https://meet.example.com/new",
            "pending",
        )])))
        .mount(&backend.server)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/v1/meetings/launch"))
        .respond_with(ResponseTemplate::new(200).set_body_json(launch_body(new_id)))
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/subscriptions/usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(usage_body(1, 10)))
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let filters = RecordingsQuery::default();
    let before = query.recordings(&filters).await.unwrap();
    assert!(before.recordings.is_empty());

    // Cached and fresh: a second read does not refetch.
    let cached = query.recordings(&filters).await.unwrap();
    assert!(cached.recordings.is_empty());

    let urls = vec!["https://meet.example.com/new".to_string()];
    let launched = query.launch_recordings(&urls, 60).await.unwrap();
    assert_eq!(launched.count, 1);

    let after = query.recordings(&filters).await.unwrap();
    assert_eq!(after.recordings.len(), 1);
    assert_eq!(after.recordings[0].id, new_id);
}

#[tokio::test]
async fn test_delete_invalidates_list_and_detail() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");
    let id = Uuid::new_v4();

    Mock::given(method("GET"))
        .and(path("/api/v1/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![recording_body(
            id,
            "https://meet.example.com/gone",
            "completed",
        )])))
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/v1/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![])))
        .mount(&backend.server)
        .await;
    Mock::given(method("DELETE"))
        .and(path(format!("/api/v1/recordings/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(delete_body(id)))
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let filters = RecordingsQuery::default();
    assert_eq!(query.recordings(&filters).await.unwrap().recordings.len(), 1);

    query.delete_recording(id).await.unwrap();

    let after = query.recordings(&filters).await.unwrap();
    assert!(after.recordings.is_empty());
}

#[tokio::test]
async fn test_usage_is_cached_between_reads() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");

    Mock::given(method("GET"))
        .and(path("/api/v1/subscriptions/usage"))
        .respond_with(ResponseTemplate::new(200).set_body_json(usage_body(5, 5)))
        .expect(1)
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let first = query.usage().await.unwrap();
    let second = query.usage().await.unwrap();
    assert_eq!(first, second);
    // Exhausted quota gates the launch action.
    assert!(!first.can_record);
    assert_eq!(first.meetings_remaining, 0);
}

#[tokio::test(start_paused = true)]
async fn test_checkout_settle_schedule() {
    let backend = TestBackend::start().await;
    let query = backend.query();
    let mut events = query.subscribe();

    query.checkout_completed().await.unwrap();

    let mut subscription_invalidations = 0;
    let mut usage_invalidations = 0;
    let mut full_reloads = 0;
    while let Ok(event) = events.try_recv() {
        match event {
            QueryEvent::Invalidated(QueryKey::Subscription) => subscription_invalidations += 1,
            QueryEvent::Invalidated(QueryKey::Usage) => usage_invalidations += 1,
            QueryEvent::FullReload => full_reloads += 1,
            _ => {}
        }
    }
    // Immediately, then after 2 s and 4 s; the 6 s pass is the full
    // invalidate-and-reload.
    assert_eq!(subscription_invalidations, 3);
    assert_eq!(usage_invalidations, 3);
    assert_eq!(full_reloads, 1);
}

#[tokio::test(start_paused = true)]
async fn test_mounted_list_poller_refreshes_without_interaction() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");

    Mock::given(method("GET"))
        .and(path("/api/v1/recordings"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![])))
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let mut events = query.subscribe();
    let _handle = query.spawn_list_poller(RecordingsQuery::default());

    // Two timer-driven refreshes with no reads from our side.
    for _ in 0..2 {
        loop {
            match events.recv().await.unwrap() {
                QueryEvent::Refreshed(QueryKey::Recordings) => break,
                _ => continue,
            }
        }
    }

    let requests = backend.server.received_requests().await.unwrap();
    assert!(requests.len() >= 2);
}

#[tokio::test(start_paused = true)]
async fn test_detail_poller_stops_at_terminal_status() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");
    let id = Uuid::new_v4();

    // Still working on the first fetch, terminal on the next poll.
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/recordings/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(id, "recording")))
        .up_to_n_times(1)
        .mount(&backend.server)
        .await;
    Mock::given(method("GET"))
        .and(path(format!("/api/v1/recordings/{id}")))
        .respond_with(ResponseTemplate::new(200).set_body_json(detail_body(id, "completed")))
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let mut events = query.subscribe();
    let handle = query.spawn_detail_poller(id);

    loop {
        match events.recv().await.unwrap() {
            QueryEvent::Refreshed(QueryKey::Recording(refreshed)) if refreshed == id => break,
            _ => continue,
        }
    }

    // The task exits on its own once the status turns terminal.
    let mut finished = false;
    for _ in 0..100 {
        if handle.is_finished() {
            finished = true;
            break;
        }
        tokio::time::sleep(Duration::from_millis(1)).await;
    }
    assert!(finished, "poller should stop after a terminal status");

    let requests = backend.server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 2);
}

#[tokio::test]
async fn test_current_user_requires_token() {
    let backend = TestBackend::start().await;
    let query = backend.query();

    // No token: no fetch, no error.
    let user = query.current_user().await.unwrap();
    assert!(user.is_none());
    assert!(backend.server.received_requests().await.unwrap().is_empty());

    backend.tokens().set("tok");
    Mock::given(method("GET"))
        .and(path("/api/v1/auth/me"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_body("alice")))
        .mount(&backend.server)
        .await;

    let user = query.current_user().await.unwrap().unwrap();
    assert_eq!(user.username, "alice");
}

#[tokio::test]
async fn test_subscription_is_cached_between_reads() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");

    Mock::given(method("GET"))
        .and(path("/api/v1/subscriptions/current"))
        .respond_with(ResponseTemplate::new(200).set_body_json(subscription_body(false)))
        .expect(1)
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let first = query.subscription().await.unwrap();
    let second = query.subscription().await.unwrap();
    assert_eq!(first, second);
    assert!(!first.cancel_at_period_end);
}

#[tokio::test]
async fn test_cancel_invalidates_subscription_and_usage() {
    let backend = TestBackend::start().await;
    backend.tokens().set("tok");

    Mock::given(method("POST"))
        .and(path("/api/v1/subscriptions/cancel"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"message": "subscription will cancel at period end"})),
        )
        .mount(&backend.server)
        .await;

    let query = backend.query();
    let mut events = query.subscribe();
    let message = query.cancel_subscription().await.unwrap();
    assert_eq!(message, "subscription will cancel at period end");

    let mut keys = Vec::new();
    while let Ok(event) = events.try_recv() {
        if let QueryEvent::Invalidated(key) = event {
            keys.push(key);
        }
    }
    assert!(keys.contains(&QueryKey::Subscription));
    assert!(keys.contains(&QueryKey::Usage));
}
