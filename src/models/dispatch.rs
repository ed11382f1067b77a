use serde::{Deserialize, Serialize};

use crate::models::notification::Notification;

/// Body of a GitHub `repository_dispatch` request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DispatchPayload {
    pub event_type: String,
    pub client_payload: ClientPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClientPayload {
    pub entity: String,
    pub action: String,
    pub uid: String,
}

impl DispatchPayload {
    pub fn from_notification(event_type: &str, notification: &Notification) -> Self {
        Self {
            event_type: event_type.to_string(),
            client_payload: ClientPayload {
                entity: notification.entity_key.clone(),
                action: notification.action.clone(),
                uid: notification.model_uid.clone(),
            },
        }
    }
}
