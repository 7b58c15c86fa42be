use std::collections::VecDeque;
use std::sync::{Arc, Mutex, PoisonError};

use log::{info, warn, Logger};
use serde::{Deserialize, Serialize};

/// The default number of undelivered notifications to keep.
pub const DEFAULT_CAPACITY: usize = 20;

#[derive(Clone, Copy, Debug, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    Destructive,
}

/// A transient, user-facing message.
#[derive(Clone, Debug, Deserialize, Eq, PartialEq, Serialize)]
pub struct Notification {
    pub title: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant: Option<Variant>,
}

impl Notification {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            title: title.into(),
            description: description.into(),
            variant: None,
        }
    }

    pub fn destructive(title: impl Into<String>, description: impl Into<String>) -> Self {
        Notification {
            variant: Some(Variant::Destructive),
            ..Notification::new(title, description)
        }
    }

    pub fn is_destructive(&self) -> bool {
        self.variant == Some(Variant::Destructive)
    }
}

/// Fire-and-forget delivery of notifications.
pub trait Notifier: Send + Sync {
    fn notify(&self, notification: Notification);
}

/// Logs every notification and queues it until a client drains the queue.
/// Once `capacity` notifications are waiting, the oldest is dropped.
pub struct Outbox {
    logger: Arc<Logger>,
    capacity: usize,
    queue: Mutex<VecDeque<Notification>>,
}

impl Outbox {
    pub fn new(logger: Arc<Logger>, capacity: usize) -> Self {
        Outbox {
            logger,
            capacity: capacity.max(1),
            queue: Mutex::new(VecDeque::new()),
        }
    }

    /// Removes and returns every waiting notification, oldest first.
    pub fn drain(&self) -> Vec<Notification> {
        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        queue.drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.queue.lock().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Notifier for Outbox {
    fn notify(&self, notification: Notification) {
        if notification.is_destructive() {
            warn!(self.logger, "{}", notification.title; "description" => &notification.description);
        } else {
            info!(self.logger, "{}", notification.title; "description" => &notification.description);
        }

        let mut queue = self.queue.lock().unwrap_or_else(PoisonError::into_inner);

        if queue.len() >= self.capacity {
            queue.pop_front();
        }

        queue.push_back(notification);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::{Notification, Notifier, Outbox};

    fn outbox(capacity: usize) -> Outbox {
        Outbox::new(Arc::new(log::discard_logger()), capacity)
    }

    #[test]
    fn draining_empties_the_queue_in_order() {
        let outbox = outbox(4);
        outbox.notify(Notification::new("one", "1"));
        outbox.notify(Notification::destructive("two", "2"));

        let drained = outbox.drain();

        assert_eq!(drained.len(), 2);
        assert_eq!(drained[0].title, "one");
        assert!(drained[1].is_destructive());
        assert!(outbox.is_empty());
    }

    #[test]
    fn the_oldest_notifications_are_dropped_beyond_capacity() {
        let outbox = outbox(2);

        for i in 0..5 {
            outbox.notify(Notification::new(format!("n{}", i), ""));
        }

        let titles = outbox
            .drain()
            .into_iter()
            .map(|n| n.title)
            .collect::<Vec<_>>();

        assert_eq!(titles, vec!["n3", "n4"]);
    }

    #[test]
    fn plain_notifications_omit_the_variant() {
        let value = serde_json::to_value(Notification::new("Location Recorded", "Reference: T1"))
            .expect("serialize notification");

        assert!(value.get("variant").is_none());

        let value = serde_json::to_value(Notification::destructive("Error", "boom"))
            .expect("serialize notification");

        assert_eq!(value["variant"], "destructive");
    }
}
