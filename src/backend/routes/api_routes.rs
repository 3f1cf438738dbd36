/**
 * API Routes
 *
 * ## Messages
 * - `GET /api/messages/conversation?user1&user2[&include_deleted]`
 * - `GET /api/messages/poll?user1&user2&since` - long poll
 * - `POST /api/messages` - 201 with the persisted message
 * - `GET /api/messages/{id}`
 * - `PUT /api/messages/{id}/delete` - soft delete
 * - `DELETE /api/messages/{id}` - administrative purge
 * - `GET /api/messages/sender/{id}`, `GET /api/messages/receiver/{id}`
 *
 * ## Contacts
 * - `POST /api/contacts/sendRequest`
 * - `POST /api/contacts/acceptRequest/{userId}/{requesterId}`
 * - `POST /api/contacts/rejectRequest/{userId}/{requesterId}`
 * - `GET /api/contacts/user/{userId}`
 * - `GET /api/contacts/requests/{userId}`
 * - `DELETE /api/contacts/{userId}/{otherId}`
 *
 * ## Users
 * - `POST /api/users` - 201 with the registered profile
 * - `GET /api/users/{userId}`
 *
 * ## Topics
 * - `GET /api/topics/{userId}` - SSE stream of deliveries
 */

use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::backend::messaging::contact_handlers::{
    accept_contact_request, list_contacts, list_incoming_requests, reject_contact_request,
    remove_contact, send_contact_request,
};
use crate::backend::messaging::handlers::{
    get_conversation, get_message, get_messages_by_receiver, get_messages_by_sender,
    poll_messages, purge_message, send_message, soft_delete_message,
};
use crate::backend::messaging::user_handlers::{create_user, get_user};
use crate::backend::realtime::handle_topic_subscription;
use crate::backend::server::state::AppState;

pub fn configure_api_routes(router: Router<AppState>) -> Router<AppState> {
    router
        // Messages
        .route("/api/messages", post(send_message))
        .route("/api/messages/conversation", get(get_conversation))
        .route("/api/messages/poll", get(poll_messages))
        .route("/api/messages/sender/{sender_id}", get(get_messages_by_sender))
        .route("/api/messages/receiver/{receiver_id}", get(get_messages_by_receiver))
        .route(
            "/api/messages/{message_id}",
            get(get_message).delete(purge_message),
        )
        .route("/api/messages/{message_id}/delete", put(soft_delete_message))
        // Contacts
        .route("/api/contacts/sendRequest", post(send_contact_request))
        .route(
            "/api/contacts/acceptRequest/{user_id}/{requester_id}",
            post(accept_contact_request),
        )
        .route(
            "/api/contacts/rejectRequest/{user_id}/{requester_id}",
            post(reject_contact_request),
        )
        .route("/api/contacts/user/{user_id}", get(list_contacts))
        .route("/api/contacts/requests/{user_id}", get(list_incoming_requests))
        .route("/api/contacts/{user_id}/{other_id}", delete(remove_contact))
        // Users
        .route("/api/users", post(create_user))
        .route("/api/users/{user_id}", get(get_user))
        // Push topics
        .route("/api/topics/{user_id}", get(handle_topic_subscription))
}
