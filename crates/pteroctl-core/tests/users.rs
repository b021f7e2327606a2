//! User operations against a mock panel.
//!
//! Each test stands up an `httpmock` server, points a `PanelClient` at it
//! and checks both the request the client sends and how the response is
//! classified.

use std::time::Duration;

use httpmock::prelude::*;
use pteroctl_core::{ApiError, NewUser, PanelClient, UserUpdate};
use serde_json::{json, Value};

const TOKEN: &str = "ptla_integration";
const ACCEPT: &str = "application/vnd.pterodactyl.v1+json";
const USERS_PATH: &str = "/api/application/users";

fn client(server: &MockServer) -> PanelClient {
    PanelClient::new(server.base_url(), TOKEN).unwrap()
}

fn user_json(id: u64, username: &str) -> Value {
    json!({
        "object": "user",
        "attributes": {
            "id": id,
            "external_id": null,
            "uuid": format!("00000000-0000-0000-0000-{:012}", id),
            "username": username,
            "email": format!("{}@example.com", username),
            "first_name": "Test",
            "last_name": "User",
            "language": "en",
            "root_admin": false,
            "2fa": false,
            "created_at": "2024-01-02T03:04:05+00:00",
            "updated_at": "2024-01-02T03:04:05+00:00"
        }
    })
}

fn not_found_body() -> Value {
    json!({
        "errors": [{
            "code": "NotFoundHttpException",
            "status": "404",
            "detail": "The requested resource could not be found on the server."
        }]
    })
}

// ---------------------------------------------------------------------------
// list
// ---------------------------------------------------------------------------

#[tokio::test]
async fn list_users_sends_auth_and_accept_headers() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(USERS_PATH)
            .header("authorization", format!("Bearer {}", TOKEN))
            .header("accept", ACCEPT);
        then.status(200)
            .json_body(json!({"object": "list", "data": [user_json(2, "b"), user_json(1, "a")]}));
    });

    let users = client(&server).list_users().await.unwrap();

    mock.assert();
    // Server order, not re-sorted
    assert_eq!(users.iter().map(|u| u.id()).collect::<Vec<_>>(), vec![2, 1]);
    assert_eq!(users[0].attributes.username, "b");
}

#[tokio::test]
async fn list_users_error_envelope_on_200_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS_PATH);
        then.status(200).json_body(json!({"error": "API key revoked"}));
    });

    let err = client(&server).list_users().await.unwrap_err();
    match err {
        ApiError::Api { status, errors, .. } => {
            assert_eq!(status, 200);
            assert_eq!(errors[0].detail.as_deref(), Some("API key revoked"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn list_users_unexpected_status_is_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS_PATH);
        then.status(502).body("bad gateway");
    });

    let err = client(&server).list_users().await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 502, ref body } if body == "bad gateway"));
}

#[tokio::test]
async fn list_users_malformed_body_is_invalid_response() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS_PATH);
        then.status(200).body("<html>maintenance</html>");
    });

    let err = client(&server).list_users().await.unwrap_err();
    assert!(matches!(err, ApiError::InvalidResponse { status: 200, .. }));
}

// ---------------------------------------------------------------------------
// get
// ---------------------------------------------------------------------------

#[tokio::test]
async fn get_user_returns_record() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET)
            .path(format!("{}/5", USERS_PATH))
            .header("authorization", format!("Bearer {}", TOKEN));
        then.status(200).json_body(user_json(5, "five"));
    });

    let user = client(&server).get_user(5).await.unwrap().unwrap();

    mock.assert();
    assert_eq!(user.id(), 5);
    assert_eq!(user.attributes.email, "five@example.com");
}

#[tokio::test]
async fn get_user_404_is_none() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("{}/404", USERS_PATH));
        then.status(404).json_body(not_found_body());
    });

    let user = client(&server).get_user(404).await.unwrap();
    assert!(user.is_none());
}

#[tokio::test]
async fn get_user_unexpected_status_is_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("{}/1", USERS_PATH));
        then.status(500).body("Server Error");
    });

    let err = client(&server).get_user(1).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500, .. }));
}

#[tokio::test]
async fn get_user_403_with_envelope_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(format!("{}/1", USERS_PATH));
        then.status(403).json_body(json!({
            "errors": [{
                "code": "AccessDeniedHttpException",
                "status": "403",
                "detail": "This action is unauthorized."
            }]
        }));
    });

    let err = client(&server).get_user(1).await.unwrap_err();
    match err {
        ApiError::Api { status, errors, .. } => {
            assert_eq!(status, 403);
            assert_eq!(errors[0].code.as_deref(), Some("AccessDeniedHttpException"));
        }
        other => panic!("expected Api error, got {:?}", other),
    }
}

#[tokio::test]
async fn get_user_by_external_id_uses_external_path() {
    let server = MockServer::start();
    let found = server.mock(|when, then| {
        when.method(GET).path(format!("{}/external/crm-7", USERS_PATH));
        then.status(200).json_body(user_json(7, "seven"));
    });
    let missing = server.mock(|when, then| {
        when.method(GET).path(format!("{}/external/crm-8", USERS_PATH));
        then.status(404).json_body(not_found_body());
    });

    let c = client(&server);
    let user = c.get_user_by_external_id("crm-7").await.unwrap().unwrap();
    assert_eq!(user.id(), 7);
    assert!(c.get_user_by_external_id("crm-8").await.unwrap().is_none());

    found.assert();
    missing.assert();
}

#[tokio::test]
async fn get_user_by_blank_external_id_fails_without_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200);
    });

    for id in ["", "   "] {
        let err = client(&server).get_user_by_external_id(id).await.unwrap_err();
        assert!(matches!(err, ApiError::Validation { body: None, .. }));
    }
    mock.assert_calls(0);
}

// ---------------------------------------------------------------------------
// create
// ---------------------------------------------------------------------------

#[tokio::test]
async fn create_user_returns_assigned_id() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST)
            .path(USERS_PATH)
            .header("authorization", format!("Bearer {}", TOKEN))
            .header("accept", ACCEPT)
            .header("content-type", "application/json")
            .json_body(json!({
                "email": "ada@example.com",
                "username": "ada",
                "first_name": "Ada",
                "last_name": "Lovelace",
                "root_admin": false
            }));
        then.status(201).json_body(json!({"id": 42}));
    });

    let id = client(&server)
        .create_user(&NewUser::new("ada@example.com", "ada", "Ada", "Lovelace"))
        .await
        .unwrap();

    mock.assert();
    assert_eq!(id, 42);
}

#[tokio::test]
async fn create_user_reads_id_from_echoed_record() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(USERS_PATH);
        then.status(201).json_body(user_json(13, "ada"));
    });

    let draft = NewUser::new("ada@example.com", "ada", "Ada", "Lovelace")
        .password("hunter22")
        .language("en")
        .external_id("crm-13")
        .root_admin(true);
    let id = client(&server).create_user(&draft).await.unwrap();
    assert_eq!(id, 13);
}

#[tokio::test]
async fn create_user_missing_required_field_sends_nothing() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(POST).path(USERS_PATH);
        then.status(201).json_body(json!({"id": 1}));
    });

    let drafts = [
        NewUser::new("", "ada", "Ada", "Lovelace"),
        NewUser::new("ada@example.com", "", "Ada", "Lovelace"),
        NewUser::new("ada@example.com", "ada", "", "Lovelace"),
        NewUser::new("ada@example.com", "ada", "Ada", ""),
    ];
    let c = client(&server);
    for draft in &drafts {
        let err = c.create_user(draft).await.unwrap_err();
        assert!(
            matches!(err, ApiError::Validation { body: None, .. }),
            "got {:?}",
            err
        );
    }

    mock.assert_calls(0);
}

#[tokio::test]
async fn create_user_422_is_validation_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(USERS_PATH);
        then.status(422).json_body(json!({
            "errors": [{
                "code": "ValidationException",
                "status": "422",
                "detail": "The email has already been taken.",
                "meta": {"source_field": "email", "rule": "unique"}
            }]
        }));
    });

    let err = client(&server)
        .create_user(&NewUser::new("ada@example.com", "ada", "Ada", "Lovelace"))
        .await
        .unwrap_err();

    assert_eq!(err.status(), Some(422));
    match err {
        ApiError::Validation { message, body } => {
            assert!(message.contains("The email has already been taken."));
            assert!(body.unwrap().contains("ValidationException"));
        }
        other => panic!("expected Validation error, got {:?}", other),
    }
}

#[tokio::test]
async fn create_user_503_is_service_unavailable() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(USERS_PATH);
        then.status(503).body("down for maintenance");
    });

    let err = client(&server)
        .create_user(&NewUser::new("ada@example.com", "ada", "Ada", "Lovelace"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::ServiceUnavailable(ref body) if body == "down for maintenance"));
}

#[tokio::test]
async fn create_user_error_envelope_is_api_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(POST).path(USERS_PATH);
        then.status(201).json_body(json!({"errors": [{"code": "Oops", "detail": "nope"}]}));
    });

    let err = client(&server)
        .create_user(&NewUser::new("ada@example.com", "ada", "Ada", "Lovelace"))
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Api { status: 201, .. }));
}

// ---------------------------------------------------------------------------
// update
// ---------------------------------------------------------------------------

#[tokio::test]
async fn update_user_sends_only_set_fields() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH)
            .path(format!("{}/3", USERS_PATH))
            .header("authorization", format!("Bearer {}", TOKEN))
            .header("content-type", "application/json")
            .json_body(json!({"first_name": "Renamed"}));
        then.status(200).json_body(user_json(3, "three"));
    });

    let update = UserUpdate {
        first_name: Some("Renamed".into()),
        ..Default::default()
    };
    let user = client(&server).update_user(3, &update).await.unwrap();

    mock.assert();
    assert_eq!(user.id(), 3);
}

#[tokio::test]
async fn update_user_allows_empty_draft() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(PATCH).path(format!("{}/3", USERS_PATH)).json_body(json!({}));
        then.status(200).json_body(user_json(3, "three"));
    });

    client(&server)
        .update_user(3, &UserUpdate::default())
        .await
        .unwrap();
    mock.assert();
}

#[tokio::test]
async fn update_user_404_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH).path(format!("{}/99", USERS_PATH));
        then.status(404).json_body(not_found_body());
    });

    let err = client(&server)
        .update_user(99, &UserUpdate::default())
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    match err {
        ApiError::NotFound { message, body } => {
            assert_eq!(message, "user 99");
            assert!(body.contains("NotFoundHttpException"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

#[tokio::test]
async fn update_user_unexpected_status_is_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(PATCH).path(format!("{}/3", USERS_PATH));
        then.status(500).body("");
    });

    let err = client(&server)
        .update_user(3, &UserUpdate::default())
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 500, .. }));
}

// ---------------------------------------------------------------------------
// delete
// ---------------------------------------------------------------------------

#[tokio::test]
async fn delete_user_204_is_success() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(DELETE)
            .path(format!("{}/8", USERS_PATH))
            .header("authorization", format!("Bearer {}", TOKEN))
            .header("accept", ACCEPT);
        then.status(204);
    });

    client(&server).delete_user(8).await.unwrap();
    mock.assert();
}

#[tokio::test]
async fn delete_user_200_is_http_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path(format!("{}/8", USERS_PATH));
        then.status(200).json_body(json!({}));
    });

    let err = client(&server).delete_user(8).await.unwrap_err();
    assert!(matches!(err, ApiError::Http { status: 200, .. }));
}

#[tokio::test]
async fn delete_user_404_is_not_found() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(DELETE).path(format!("{}/8", USERS_PATH));
        then.status(404).json_body(not_found_body());
    });

    let err = client(&server).delete_user(8).await.unwrap_err();
    assert_eq!(err.status(), Some(404));
    match err {
        ApiError::NotFound { message, body } => {
            assert_eq!(message, "user 8");
            assert!(body.contains("NotFoundHttpException"));
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
}

// ---------------------------------------------------------------------------
// cross-cutting
// ---------------------------------------------------------------------------

#[tokio::test]
async fn listed_user_matches_individual_fetch() {
    let server = MockServer::start();
    let records = [user_json(1, "one"), user_json(2, "two")];
    server.mock(|when, then| {
        when.method(GET).path(USERS_PATH);
        then.status(200).json_body(json!({"data": records.clone()}));
    });
    for (id, record) in [(1u64, &records[0]), (2, &records[1])] {
        server.mock(|when, then| {
            when.method(GET).path(format!("{}/{}", USERS_PATH, id));
            then.status(200).json_body(record.clone());
        });
    }

    let c = client(&server);
    for listed in c.list_users().await.unwrap() {
        let fetched = c.get_user(listed.id()).await.unwrap().unwrap();
        assert_eq!(fetched, listed);
    }
}

#[tokio::test]
async fn concurrent_calls_share_one_client() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.method(GET).path(format!("{}/1", USERS_PATH));
        then.status(200).json_body(user_json(1, "one"));
    });

    let c = client(&server);
    let results = futures::future::join_all((0..8).map(|_| c.get_user(1))).await;

    assert!(results.iter().all(|r| matches!(r, Ok(Some(u)) if u.id() == 1)));
    mock.assert_calls(8);
}

#[tokio::test]
async fn nests_are_refused_without_request() {
    let server = MockServer::start();
    let mock = server.mock(|when, then| {
        when.any_request();
        then.status(200).json_body(json!({"data": []}));
    });

    let err = client(&server).nests().await.unwrap_err();
    assert!(matches!(err, ApiError::Unsupported(ref msg) if msg.contains("nests")));
    mock.assert_calls(0);
}

#[tokio::test]
async fn success_body_with_false_error_flag_is_not_an_error() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS_PATH);
        then.status(200)
            .json_body(json!({"error": false, "data": [user_json(1, "one")]}));
    });

    let users = client(&server).list_users().await.unwrap();
    assert_eq!(users.len(), 1);
}

#[tokio::test]
async fn connection_failure_is_transport_error() {
    // Nothing listens on port 1
    let c = PanelClient::new("http://127.0.0.1:1", TOKEN).unwrap();
    let err = c.list_users().await.unwrap_err();
    assert!(matches!(err, ApiError::Transport(_)));
}

#[tokio::test]
async fn slow_panel_hits_timeout() {
    let server = MockServer::start();
    server.mock(|when, then| {
        when.method(GET).path(USERS_PATH);
        then.status(200)
            .delay(Duration::from_millis(500))
            .json_body(json!({"data": []}));
    });

    let c = PanelClient::with_timeout(server.base_url(), TOKEN, Duration::from_millis(50)).unwrap();
    match c.list_users().await.unwrap_err() {
        ApiError::Transport(e) => assert!(e.is_timeout()),
        other => panic!("expected Transport error, got {:?}", other),
    }
}

#[tokio::test]
async fn malformed_base_url_fails_at_call_time() {
    let c = PanelClient::new("panel.example.com", TOKEN).unwrap();
    let err = c.list_users().await.unwrap_err();
    assert!(matches!(err, ApiError::Configuration(_)));
}
