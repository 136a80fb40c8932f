#![allow(clippy::unwrap_used)]

use axum::http::{Method, StatusCode};
use helpdesk_core::Role;
use serde_json::json;

use super::test_helpers::test_app;

#[tokio::test]
async fn ticket_lifecycle_over_http() {
    let app = test_app();
    let owner = app.seed_user("a@x.com", Role::User).await;
    let admin = app.seed_user("b@x.com", Role::Admin).await;
    let owner_token = app.access_token(&owner);
    let admin_token = app.access_token(&admin);

    let (status, ticket) = app
        .send(
            Method::POST,
            "/api/v1/support/ticket/create",
            Some(&owner_token),
            Some(json!({
                "title": "VPN",
                "description": "Cannot connect",
                "section": "network"
            })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ticket["status"], "opened");
    assert_eq!(ticket["helper"], -1);
    assert_eq!(ticket["from"], owner.id);
    let id = ticket["id"].as_i64().unwrap();

    let (status, _) = app
        .send(
            Method::POST,
            &format!("/api/v1/support/ticket/accept?id={id}"),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, accepted) = app
        .send(
            Method::POST,
            &format!("/api/v1/support/ticket/accept?id={id}"),
            Some(&admin_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(accepted["status"], "in_process");
    assert_eq!(accepted["helper"], admin.id);

    let (status, body) = app
        .send(
            Method::GET,
            &format!("/api/v1/support/ticket/status?id={id}&st=closed"),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "status changed to closed" }));

    let (status, _) = app
        .send(
            Method::GET,
            &format!("/api/v1/support/ticket/status?id={id}&st=finished"),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, stored) = app
        .send(
            Method::GET,
            &format!("/api/v1/support/ticket?id={id}"),
            Some(&owner_token),
            None,
        )
        .await;
    assert_eq!(stored["status"], "closed");
}

#[tokio::test]
async fn unknown_ticket_is_not_found() {
    let app = test_app();
    let admin = app.seed_user("b@x.com", Role::Admin).await;
    let token = app.access_token(&admin);

    for (method, uri) in [
        (Method::GET, "/api/v1/support/ticket?id=77"),
        (Method::POST, "/api/v1/support/ticket/accept?id=77"),
        (Method::GET, "/api/v1/support/ticket/status?id=77&st=closed"),
    ] {
        let (status, _) = app.send(method, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{uri}");
    }
}

#[tokio::test]
async fn missing_query_params_are_bad_request() {
    let app = test_app();
    let user = app.seed_user("a@x.com", Role::User).await;
    let token = app.access_token(&user);

    for uri in [
        "/api/v1/support/ticket",
        "/api/v1/support/ticket?id=x",
        "/api/v1/support/ticket/status?id=1",
        "/api/v1/support/messages",
    ] {
        let (status, _) = app.send(Method::GET, uri, Some(&token), None).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
    }
}

#[tokio::test]
async fn tickets_lists_only_callers_tickets() {
    let app = test_app();
    let a = app.seed_user("a@x.com", Role::User).await;
    let b = app.seed_user("b@x.com", Role::User).await;
    let draft = json!({ "title": "t", "description": "d", "section": "s" });

    for user in [&a, &b, &a] {
        app.send(
            Method::POST,
            "/api/v1/support/ticket/create",
            Some(&app.access_token(user)),
            Some(draft.clone()),
        )
        .await;
    }

    let (status, tickets) = app
        .send(
            Method::GET,
            "/api/v1/support/tickets",
            Some(&app.access_token(&a)),
            None,
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    let tickets = tickets.as_array().unwrap();
    assert_eq!(tickets.len(), 2);
    assert!(tickets.iter().all(|t| t["from"] == a.id));
}

#[tokio::test]
async fn messages_round_trip() {
    let app = test_app();
    let user = app.seed_user("a@x.com", Role::User).await;
    let token = app.access_token(&user);

    let (status, message) = app
        .send(
            Method::POST,
            "/api/v1/support/message/add",
            Some(&token),
            Some(json!({ "message": "any news?", "ticket_id": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(message["who"], user.id);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/support/message/add",
            Some(&token),
            Some(json!({ "message": "", "ticket_id": 5 })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (_, messages) = app
        .send(Method::GET, "/api/v1/support/messages?id=5", Some(&token), None)
        .await;
    assert_eq!(messages, json!([message]));
}

#[tokio::test]
async fn notifications_flow() {
    let app = test_app();
    let admin = app.seed_user("admin@x.com", Role::Admin).await;
    let user = app.seed_user("a@x.com", Role::User).await;
    let other = app.seed_user("b@x.com", Role::User).await;
    let admin_token = app.access_token(&admin);
    let user_token = app.access_token(&user);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/notif/create",
            Some(&user_token),
            Some(json!({ "message": "hi", "status": "info", "for": user.id })),
        )
        .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = app
        .send(
            Method::POST,
            "/api/v1/notif/create",
            Some(&admin_token),
            Some(json!({ "message": "hi", "status": "urgent", "for": user.id })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, mine) = app
        .send(
            Method::POST,
            "/api/v1/notif/create",
            Some(&admin_token),
            Some(json!({ "message": "hi", "status": "info", "for": user.id })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(mine["checked"], false);

    let (_, theirs) = app
        .send(
            Method::POST,
            "/api/v1/notif/create",
            Some(&admin_token),
            Some(json!({ "message": "yo", "status": "warning", "for": other.id })),
        )
        .await;

    let (_, unread) = app
        .send(Method::GET, "/api/v1/notif/update", Some(&user_token), None)
        .await;
    assert_eq!(unread, json!([mine.clone()]));

    let (status, body) = app
        .send(
            Method::POST,
            "/api/v1/notif/check",
            Some(&user_token),
            Some(json!({ "indexes": [mine["id"], theirs["id"]] })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "notifications updated" }));

    let (_, unread) = app
        .send(Method::GET, "/api/v1/notif/update", Some(&user_token), None)
        .await;
    assert_eq!(unread, json!([]));

    let (_, unread) = app
        .send(
            Method::GET,
            "/api/v1/notif/update",
            Some(&app.access_token(&other)),
            None,
        )
        .await;
    assert_eq!(unread, json!([theirs]));
}
