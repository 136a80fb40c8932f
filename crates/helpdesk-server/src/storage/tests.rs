//! Storage layer tests for Helpdesk server.
#![allow(clippy::unwrap_used)]

use std::sync::Arc;

use helpdesk_core::db::unix_timestamp;
use helpdesk_core::notification::{NewNotification, NotificationStatus};
use helpdesk_core::ticket::{NO_HELPER, NewTicket, NewTicketMessage, TicketDraft, TicketStatus};
use helpdesk_core::user::{NewUser, Registration, Role};
use helpdesk_core::{Error, NotificationTracker, TicketManager};

use super::db::{DatabaseError, HelpdeskDatabase};

async fn test_db() -> HelpdeskDatabase {
    HelpdeskDatabase::open_in_memory().await.unwrap()
}

fn new_user(email: &str) -> NewUser {
    NewUser::register(
        Registration {
            login: "alice".into(),
            email: email.into(),
            password: "123456".into(),
        },
        "hash123".into(),
        "api-token".into(),
        unix_timestamp(),
    )
}

fn new_ticket(owner: i64) -> NewTicket {
    NewTicket::open(
        TicketDraft {
            title: "Printer".into(),
            description: "Out of toner".into(),
            section: "hardware".into(),
        },
        owner,
        unix_timestamp(),
    )
}

fn new_notification(for_user: i64) -> NewNotification {
    NewNotification {
        message: "Maintenance".into(),
        date: unix_timestamp(),
        status: NotificationStatus::Info,
        for_user,
    }
}

// === User tests ===

#[tokio::test]
async fn insert_and_get_user() {
    let db = test_db().await;
    let user = db.insert_user(&new_user("alice@example.com")).await.unwrap();

    assert!(user.id > 0);
    assert_eq!(user.role, Role::User);
    assert!(user.is_active);
    assert_eq!(db.get_user(user.id).await.unwrap(), user);
    assert_eq!(db.get_user_by_email("alice@example.com").await.unwrap(), user);
}

#[tokio::test]
async fn duplicate_email_is_conflict() {
    let db = test_db().await;
    db.insert_user(&new_user("alice@example.com")).await.unwrap();

    let err = db.insert_user(&new_user("alice@example.com")).await.unwrap_err();
    assert!(matches!(err, DatabaseError::Conflict(_)));
    assert!(matches!(Error::from(err), Error::AlreadyExists(_)));
}

#[tokio::test]
async fn missing_user_is_not_found() {
    let db = test_db().await;
    assert!(matches!(db.get_user(42).await, Err(DatabaseError::NotFound(_))));
    assert!(matches!(
        db.get_user_by_email("bob@example.com").await,
        Err(DatabaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn save_user_overwrites_fields() {
    let db = test_db().await;
    let mut user = db.insert_user(&new_user("alice@example.com")).await.unwrap();
    user.role = Role::Admin;
    user.contacts = "ext. 42".into();
    user.is_active = false;
    db.save_user(&user).await.unwrap();

    assert_eq!(db.get_user(user.id).await.unwrap(), user);

    user.id = 999;
    assert!(matches!(
        db.save_user(&user).await,
        Err(DatabaseError::NotFound(_))
    ));
}

// === Ticket tests ===

#[tokio::test]
async fn insert_ticket_keeps_initial_state() {
    let db = test_db().await;
    let ticket = db.insert_ticket(&new_ticket(3)).await.unwrap();

    assert_eq!(ticket.status, TicketStatus::Opened);
    assert_eq!(ticket.helper, NO_HELPER);
    assert_eq!(ticket.from, 3);
}

#[tokio::test]
async fn assign_and_change_status() {
    let db = test_db().await;
    let ticket = db.insert_ticket(&new_ticket(3)).await.unwrap();

    let accepted = db
        .assign_ticket(ticket.id, 8, TicketStatus::InProcess)
        .await
        .unwrap();
    assert_eq!(accepted.helper, 8);
    assert_eq!(accepted.status, TicketStatus::InProcess);

    let closed = db
        .set_ticket_status(ticket.id, TicketStatus::Closed)
        .await
        .unwrap();
    assert_eq!(closed.status, TicketStatus::Closed);
    assert_eq!(closed.helper, 8);
}

#[tokio::test]
async fn updates_on_missing_ticket_are_not_found() {
    let db = test_db().await;
    assert!(matches!(
        db.assign_ticket(5, 8, TicketStatus::InProcess).await,
        Err(DatabaseError::NotFound(_))
    ));
    assert!(matches!(
        db.set_ticket_status(5, TicketStatus::Closed).await,
        Err(DatabaseError::NotFound(_))
    ));
}

#[tokio::test]
async fn tickets_are_listed_per_owner() {
    let db = test_db().await;
    let first = db.insert_ticket(&new_ticket(1)).await.unwrap();
    db.insert_ticket(&new_ticket(2)).await.unwrap();
    let second = db.insert_ticket(&new_ticket(1)).await.unwrap();

    assert_eq!(db.list_tickets_for_owner(1).await.unwrap(), vec![first, second]);
    assert!(db.list_tickets_for_owner(9).await.unwrap().is_empty());
}

#[tokio::test]
async fn messages_do_not_require_a_ticket() {
    let db = test_db().await;
    let message = db
        .insert_ticket_message(&NewTicketMessage {
            who: 1,
            ticket_id: 404,
            message: "anyone?".into(),
            date: unix_timestamp(),
        })
        .await
        .unwrap();

    assert_eq!(db.list_ticket_messages(404).await.unwrap(), vec![message]);
    assert!(db.list_ticket_messages(405).await.unwrap().is_empty());
}

// === Notification tests ===

#[tokio::test]
async fn unread_excludes_checked_and_foreign() {
    let db = test_db().await;
    let a = db.insert_notification(&new_notification(1)).await.unwrap();
    let b = db.insert_notification(&new_notification(1)).await.unwrap();
    db.insert_notification(&new_notification(2)).await.unwrap();

    assert_eq!(db.mark_notifications_checked(&[a.id], 1).await.unwrap(), 1);
    assert_eq!(db.list_unread_notifications(1).await.unwrap(), vec![b]);
}

#[tokio::test]
async fn check_enforces_ownership() {
    let db = test_db().await;
    let theirs = db.insert_notification(&new_notification(2)).await.unwrap();

    assert_eq!(db.mark_notifications_checked(&[theirs.id], 1).await.unwrap(), 0);
    assert_eq!(db.list_unread_notifications(2).await.unwrap(), vec![theirs]);
}

#[tokio::test]
async fn check_accepts_more_ids_than_sqlite_variables() {
    let db = test_db().await;
    let mine = db.insert_notification(&new_notification(1)).await.unwrap();
    let other = db.insert_notification(&new_notification(1)).await.unwrap();

    let mut ids: Vec<i64> = (100_000..140_000).collect();
    ids.push(mine.id);
    ids.push(mine.id);

    assert_eq!(db.mark_notifications_checked(&ids, 1).await.unwrap(), 1);
    assert_eq!(db.list_unread_notifications(1).await.unwrap(), vec![other]);
}

#[tokio::test]
async fn check_with_no_ids_is_noop() {
    let db = test_db().await;
    assert_eq!(db.mark_notifications_checked(&[], 1).await.unwrap(), 0);
}

// === Repository traits ===

#[tokio::test]
async fn ticket_manager_over_sqlite() {
    let tickets = TicketManager::new(Arc::new(test_db().await));
    let ticket = tickets
        .create(
            1,
            TicketDraft {
                title: "t".into(),
                description: "d".into(),
                section: "s".into(),
            },
        )
        .await
        .unwrap();

    assert!(matches!(
        tickets.change_status(ticket.id, "in progress").await,
        Err(Error::InvalidStatus(_))
    ));
    assert_eq!(
        tickets.find(ticket.id).await.unwrap().status,
        TicketStatus::Opened
    );
    assert!(matches!(tickets.find(99).await, Err(Error::NotFound(_))));
}

#[tokio::test]
async fn notification_tracker_over_sqlite() {
    let notifications = NotificationTracker::new(Arc::new(test_db().await));
    let created = notifications
        .create(helpdesk_core::notification::NotificationDraft {
            message: "hello".into(),
            status: "error".into(),
            for_user: 4,
        })
        .await
        .unwrap();

    assert_eq!(notifications.check(&[created.id], 5).await.unwrap(), 0);
    assert_eq!(notifications.check(&[created.id], 4).await.unwrap(), 1);
    assert!(notifications.find_unread_for(4).await.unwrap().is_empty());
}
