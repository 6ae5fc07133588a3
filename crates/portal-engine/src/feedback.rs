//! The notification slot and its auto-dismiss timer.
//!
//! There is exactly one slot. [`Feedback::notify`] replaces whatever is in it
//! and restarts the timer; the previous timer is aborted, and each timer only
//! clears the notification it was started for. The timer task never outlives
//! the [`Feedback`] that spawned it.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, TimeDelta, Utc};
use tokio::{runtime::Handle, sync::watch, task::JoinHandle};

/// How long a notification stays visible.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(4);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
  Success,
  Error,
  Info,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
  /// Monotonic per-[`Feedback`] sequence number.
  pub id:         u64,
  pub message:    String,
  pub severity:   Severity,
  pub expires_at: DateTime<Utc>,
}

pub struct Feedback {
  slot:    Arc<watch::Sender<Option<Notification>>>,
  timer:   Option<JoinHandle<()>>,
  next_id: u64,
}

impl Feedback {
  pub fn new() -> Self {
    let (slot, _) = watch::channel(None);
    Self { slot: Arc::new(slot), timer: None, next_id: 0 }
  }

  /// Show `message`, replacing any live notification.
  ///
  /// The dismiss timer runs on the current tokio runtime. Without one the
  /// notification stays until it is replaced or cleared.
  pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
    self.cancel_timer();

    self.next_id += 1;
    let id = self.next_id;
    let expires_at =
      Utc::now() + TimeDelta::from_std(NOTIFICATION_TTL).unwrap_or_else(|_| TimeDelta::zero());
    let notification = Notification { id, message: message.into(), severity, expires_at };
    tracing::debug!(id, ?severity, message = %notification.message, "notify");
    self.slot.send_replace(Some(notification));

    let Ok(runtime) = Handle::try_current() else {
      tracing::debug!(id, "no runtime, notification will not auto-dismiss");
      return;
    };
    let slot = Arc::clone(&self.slot);
    self.timer = Some(runtime.spawn(async move {
      tokio::time::sleep(NOTIFICATION_TTL).await;
      slot.send_if_modified(|current| {
        if current.as_ref().is_some_and(|n| n.id == id) {
          *current = None;
          true
        } else {
          false
        }
      });
    }));
  }

  /// Drop the live notification, if any, and its timer.
  pub fn clear(&mut self) {
    self.cancel_timer();
    self.slot.send_replace(None);
  }

  pub fn current(&self) -> Option<Notification> { self.slot.borrow().clone() }

  fn cancel_timer(&mut self) {
    if let Some(timer) = self.timer.take() {
      timer.abort();
    }
  }
}

impl Default for Feedback {
  fn default() -> Self { Self::new() }
}

impl Drop for Feedback {
  fn drop(&mut self) { self.cancel_timer(); }
}

#[cfg(test)]
mod tests {
  use super::*;

  async fn sleep_ms(ms: u64) {
    tokio::time::sleep(Duration::from_millis(ms)).await;
    tokio::task::yield_now().await;
  }

  fn message(f: &Feedback) -> Option<String> { f.current().map(|n| n.message) }

  #[tokio::test(start_paused = true)]
  async fn notification_expires_after_ttl() {
    let mut f = Feedback::new();
    f.notify("saved", Severity::Success);
    sleep_ms(3_900).await;
    assert_eq!(message(&f).as_deref(), Some("saved"));
    sleep_ms(200).await;
    assert_eq!(message(&f), None);
  }

  #[tokio::test(start_paused = true)]
  async fn newer_notification_survives_older_deadline() {
    let mut f = Feedback::new();
    f.notify("A", Severity::Info);
    sleep_ms(1_000).await;
    f.notify("B", Severity::Info);

    sleep_ms(1_000).await;
    assert_eq!(message(&f).as_deref(), Some("B"));

    // A's original deadline (t=4s) passes without clearing B.
    sleep_ms(2_500).await;
    assert_eq!(message(&f).as_deref(), Some("B"));

    // B's own deadline is t=5s.
    sleep_ms(1_000).await;
    assert_eq!(message(&f), None);
  }

  #[tokio::test(start_paused = true)]
  async fn clear_empties_slot_and_stops_timer() {
    let mut f = Feedback::new();
    f.notify("A", Severity::Error);
    f.clear();
    assert_eq!(f.current(), None);
    f.notify("B", Severity::Info);
    sleep_ms(4_100).await;
    assert_eq!(f.current(), None);
  }

  #[test]
  fn notify_outside_a_runtime_keeps_the_notification() {
    let mut f = Feedback::new();
    f.notify("offline", Severity::Info);
    assert_eq!(message(&f).as_deref(), Some("offline"));
    f.notify("replaced", Severity::Error);
    assert_eq!(message(&f).as_deref(), Some("replaced"));
    f.clear();
    assert_eq!(f.current(), None);
  }

  #[tokio::test(start_paused = true)]
  async fn ids_increase_per_notification() {
    let mut f = Feedback::new();
    f.notify("one", Severity::Info);
    let first = f.current().unwrap().id;
    f.notify("two", Severity::Info);
    assert!(f.current().unwrap().id > first);
  }
}
