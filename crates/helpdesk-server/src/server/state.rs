//! Shared state handed to every handler.

use std::sync::Arc;
use std::time::Duration;

use helpdesk_core::store::{CredentialStore, NotificationRepository, TicketRepository};
use helpdesk_core::{NotificationTracker, TicketManager};

use crate::auth::TokenService;

pub struct AppState {
    pub tokens: TokenService,
    pub credentials: Arc<dyn CredentialStore>,
    pub tickets: TicketManager,
    pub notifications: NotificationTracker,
    pub min_password_len: usize,
    pub request_timeout: Duration,
}

impl AppState {
    /// Wire every service onto one store implementing all repositories.
    pub fn new<S>(
        store: Arc<S>,
        tokens: TokenService,
        min_password_len: usize,
        request_timeout: Duration,
    ) -> Self
    where
        S: CredentialStore + TicketRepository + NotificationRepository + 'static,
    {
        Self {
            tokens,
            credentials: Arc::clone(&store) as Arc<dyn CredentialStore>,
            tickets: TicketManager::new(Arc::clone(&store) as Arc<dyn TicketRepository>),
            notifications: NotificationTracker::new(store),
            min_password_len,
            request_timeout,
        }
    }
}
