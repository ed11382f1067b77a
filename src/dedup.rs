//! In-memory suppression of repeated notifications for the same entity.
//!
//! The tracker keeps one timestamp per entity key for the life of the
//! process. Keys are never evicted; their number is bounded by the content
//! types defined in the CMS.

use std::{collections::HashMap, sync::Mutex, time::Duration};

use serde::Deserialize;
use tokio::time::Instant;
use tracing::debug;

/// How a suppressed duplicate affects the stored window start.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DedupPolicy {
    /// The window starts at the first unsuppressed notification of a burst
    /// and is not extended by duplicates.
    #[default]
    Anchored,
    /// Every duplicate restarts the window (classic debounce).
    Sliding,
}

pub struct DedupTracker {
    window: Duration,
    policy: DedupPolicy,
    last_seen: Mutex<HashMap<String, Instant>>,
}

impl DedupTracker {
    pub fn new(window: Duration, policy: DedupPolicy) -> Self {
        Self {
            window,
            policy,
            last_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Returns `true` when `key` was accepted less than one window ago.
    ///
    /// Lookup and write happen under a single guard with no await point in
    /// between, so two concurrent calls for the same key cannot both be
    /// accepted.
    pub fn should_suppress(&self, key: &str) -> bool {
        let now = Instant::now();
        let mut last_seen = self
            .last_seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());

        match last_seen.get_mut(key) {
            Some(stored) if now.duration_since(*stored) < self.window => {
                debug!(
                    key,
                    elapsed_ms = now.duration_since(*stored).as_millis() as u64,
                    policy = ?self.policy,
                    "Notification inside dedup window"
                );
                if self.policy == DedupPolicy::Sliding {
                    *stored = now;
                }
                true
            }
            Some(stored) => {
                *stored = now;
                false
            }
            None => {
                last_seen.insert(key.to_string(), now);
                false
            }
        }
    }

    pub fn tracked_keys(&self) -> usize {
        self.last_seen
            .lock()
            .map(|map| map.len())
            .unwrap_or_else(|poisoned| poisoned.into_inner().len())
    }
}
