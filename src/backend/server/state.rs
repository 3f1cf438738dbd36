/**
 * Application State Management
 *
 * `AppState` is the central state container shared by every handler. Each
 * component is cheap to clone (`Arc` inside) and is extracted on its own
 * through the `FromRef` implementations below, so handlers only name what
 * they use:
 *
 * ```rust,ignore
 * async fn handler(State(messages): State<MessageService>) { /* ... */ }
 * ```
 *
 * There is no other process-wide mutable state: the hub and the shutdown
 * signal are created here and handed to whoever needs them.
 */

use std::sync::Arc;

use axum::extract::FromRef;

use crate::backend::messaging::{
    ContactService, LongPollCoordinator, MessageService, PersistSignal, UserService,
};
use crate::backend::realtime::NotificationHub;
use crate::backend::server::config::ServerConfig;
use crate::backend::server::shutdown::Shutdown;
use crate::backend::store::Stores;

#[derive(Clone)]
pub struct AppState {
    /// Persist-then-publish message operations
    pub messages: MessageService,

    /// Long-poll waits over the same message store
    pub long_poll: LongPollCoordinator,

    /// Contact request workflow
    pub contacts: ContactService,

    /// User profile registration and lookup
    pub users: UserService,

    /// Per-user push topics
    pub hub: NotificationHub,

    /// Triggered once at shutdown
    pub shutdown: Shutdown,
}

impl AppState {
    /// Wire every component over one set of stores
    pub fn new(config: &ServerConfig, stores: Stores) -> Self {
        let hub = NotificationHub::new(config.topic_capacity);
        let signal = PersistSignal::new();
        let shutdown = Shutdown::new();

        let messages = MessageService::new(
            stores.messages.clone(),
            Arc::new(hub.clone()),
            signal.clone(),
        );
        let long_poll = LongPollCoordinator::new(
            stores.messages,
            signal,
            shutdown.clone(),
            config.poll_settings(),
        );
        let contacts = ContactService::new(stores.contacts, stores.users.clone());
        let users = UserService::new(stores.users);

        Self {
            messages,
            long_poll,
            contacts,
            users,
            hub,
            shutdown,
        }
    }

    /// Trigger shutdown: interrupt waiting polls and close every topic
    pub fn begin_shutdown(&self) {
        tracing::info!("Shutdown requested");
        self.shutdown.trigger();
        self.hub.drain();
    }
}

impl FromRef<AppState> for MessageService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.messages.clone()
    }
}

impl FromRef<AppState> for LongPollCoordinator {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.long_poll.clone()
    }
}

impl FromRef<AppState> for ContactService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.contacts.clone()
    }
}

impl FromRef<AppState> for UserService {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.users.clone()
    }
}

impl FromRef<AppState> for NotificationHub {
    fn from_ref(app_state: &AppState) -> Self {
        app_state.hub.clone()
    }
}
