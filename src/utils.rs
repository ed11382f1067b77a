use tracing::info;

use crate::{
    clients::github::DispatchClient,
    dedup::DedupTracker,
    error::RelayError,
    models::{dispatch::DispatchPayload, notification::Notification},
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayOutcome {
    Dispatched,
    Suppressed,
}

/// Parses an authenticated body and forwards it unless it is a duplicate.
pub async fn process_message(
    body: &[u8],
    event_type: &str,
    dedup: &DedupTracker,
    dispatch_client: &DispatchClient,
) -> Result<RelayOutcome, RelayError> {
    let notification = Notification::from_body(body)?;

    info!(
        entity = %notification.entity_key,
        action = %notification.action,
        uid = %notification.model_uid,
        "Processing webhook"
    );

    if dedup.should_suppress(&notification.entity_key) {
        info!(
            entity = %notification.entity_key,
            "Duplicate webhook, ignoring"
        );
        return Ok(RelayOutcome::Suppressed);
    }

    let payload = DispatchPayload::from_notification(event_type, &notification);

    info!(event_type = %payload.event_type, "Sending to GitHub");
    dispatch_client.dispatch(&payload).await?;

    Ok(RelayOutcome::Dispatched)
}
