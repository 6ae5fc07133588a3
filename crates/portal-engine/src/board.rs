//! [`Board`], the session/board controller.
//!
//! Owns the session, the suggestion cache, the detail selection, the filter
//! controls and the notification slot. Each async operation completes a
//! round-trip through [`PortalApi`] and then applies its result to the cache
//! in one step. Success and failure are both reported through the
//! notification slot, and the outcome is returned to the caller.
//!
//! The detail selection holds the record last fetched by [`Board::view`]. It
//! never adds to the cache, so the list only ever shows what the last listing
//! returned. Operations that change cache membership drop the selection if
//! its record is gone, and operations that replace a cached record refresh
//! the selection too.
//!
//! The notification slot arms its dismiss timer on the ambient tokio runtime.
//! Outside one, notifications still appear but stay until replaced.

use std::collections::HashSet;

use portal_core::{
  api::PortalApi,
  filter::{self, FilterControls},
  session::Session,
  suggestion::{Category, NewSuggestion, StatusUpdate, Suggestion, SuggestionId},
  workflow::Status,
};
use strum::IntoEnumIterator;
use tracing::{error, info, warn};

use crate::{
  Error, Result,
  feedback::{Feedback, Notification, Severity},
  profile::Profile,
};

pub struct Board<A> {
  api:      A,
  session:  Session,
  cache:    Vec<Suggestion>,
  detail:   Option<Suggestion>,
  controls: FilterControls,
  feedback: Feedback,
  busy:     bool,
}

impl<A: PortalApi> Board<A> {
  pub fn new(api: A) -> Self {
    Self {
      api,
      session: Session::default(),
      cache: Vec::new(),
      detail: None,
      controls: FilterControls::default(),
      feedback: Feedback::new(),
      busy: false,
    }
  }

  // ── Read side ─────────────────────────────────────────────────────────────

  pub fn api(&self) -> &A { &self.api }

  pub fn session(&self) -> &Session { &self.session }

  /// The signed-in user's capability profile.
  pub fn profile(&self) -> Option<Profile> {
    self
      .session
      .is_authenticated()
      .then(|| Profile::from_role(self.session.role()))
  }

  /// The cached collection in server order.
  pub fn suggestions(&self) -> &[Suggestion] { &self.cache }

  /// The cache run through the filter pipeline.
  pub fn visible(&self) -> Vec<&Suggestion> { filter::apply(&self.cache, &self.controls) }

  pub fn controls(&self) -> &FilterControls { &self.controls }

  pub fn controls_mut(&mut self) -> &mut FilterControls { &mut self.controls }

  /// The record in the detail view.
  pub fn selected(&self) -> Option<&Suggestion> { self.detail.as_ref() }

  pub fn selected_id(&self) -> Option<&SuggestionId> { self.detail.as_ref().map(|s| &s.id) }

  pub fn notification(&self) -> Option<Notification> { self.feedback.current() }

  pub fn is_busy(&self) -> bool { self.busy }

  /// Forward transitions the current user may apply to `id`.
  pub fn available_transitions(&self, id: &SuggestionId) -> &'static [Status] {
    match (self.profile(), self.find(id)) {
      (Some(profile), Some(s)) => profile.transitions(s.status),
      _ => &[],
    }
  }

  /// Number of cached records per status, in workflow order.
  pub fn status_counts(&self) -> Vec<(Status, usize)> {
    Status::iter()
      .map(|status| (status, self.cache.iter().filter(|s| s.status == status).count()))
      .collect()
  }

  /// The cached record for `id`, falling back to the detail record.
  fn find(&self, id: &SuggestionId) -> Option<&Suggestion> {
    self
      .cache
      .iter()
      .chain(self.detail.as_ref())
      .find(|s| &s.id == id)
  }

  // ── Feedback ──────────────────────────────────────────────────────────────

  pub fn notify(&mut self, message: impl Into<String>, severity: Severity) {
    self.feedback.notify(message, severity);
  }

  /// Report `err` to the user and hand it back for `?`/`Err(..)`.
  fn fail(&mut self, err: Error) -> Error {
    match &err {
      Error::Api(portal_core::ApiError::Transport(detail)) => error!(%detail, "request failed"),
      other => warn!(error = %other, "operation failed"),
    }
    self.feedback.notify(err.user_message(), Severity::Error);
    err
  }

  /// The signed-in email and profile, or a reported `NotSignedIn`.
  fn identity(&mut self) -> Result<(String, Profile)> {
    match self.profile() {
      Some(profile) => Ok((self.session.email().to_owned(), profile)),
      None => Err(self.fail(Error::NotSignedIn)),
    }
  }

  // ── Session ───────────────────────────────────────────────────────────────

  /// Exchange an identity-provider token for a session, then load the
  /// collection.
  ///
  /// The session is only populated once the exchange has succeeded. A
  /// rejected exchange signs out whoever was signed in before. A failed
  /// follow-up load does not undo the login.
  pub async fn complete_login(&mut self, token: &str) -> Result<()> {
    let identity = match self.api.exchange_token(token).await {
      Ok(identity) => identity,
      Err(e) => {
        self.reset();
        return Err(self.fail(e.into()));
      }
    };

    self.session = Session::from_identity(identity);
    let profile = Profile::from_role(self.session.role());
    info!(email = self.session.email(), role = profile.label(), "signed in");

    // A failed load leaves its own error on screen.
    match self.sync().await {
      Ok(_) => self.notify(format!("Signed in as {}", self.session.email()), Severity::Success),
      Err(e) => warn!(error = %e, "initial load after sign-in failed"),
    }
    Ok(())
  }

  /// Forget the session and everything fetched under it. Idempotent.
  pub fn logout(&mut self) {
    if self.session.is_authenticated() {
      info!(email = self.session.email(), "signed out");
    }
    self.reset();
    self.feedback.clear();
    self.notify("Signed out", Severity::Info);
  }

  /// Drop everything tied to an identity.
  fn reset(&mut self) {
    self.session.clear();
    self.cache.clear();
    self.detail = None;
  }

  // ── Collection ────────────────────────────────────────────────────────────

  /// Replace the cache with the role-appropriate listing.
  ///
  /// On failure the cache is emptied.
  pub async fn load(&mut self) -> Result<()> {
    let count = self.sync().await?;
    self.notify(format!("Loaded {count} suggestions"), Severity::Info);
    Ok(())
  }

  /// [`load`](Self::load) with the busy flag raised for its duration.
  ///
  /// Once signed in, always ends with a refresh confirmation, which replaces
  /// any load error on screen. The error is still logged and returned.
  pub async fn refresh(&mut self) -> Result<()> {
    self.busy = true;
    let result = self.sync().await.map(drop);
    self.busy = false;
    if !matches!(result, Err(Error::NotSignedIn)) {
      self.notify("Suggestions refreshed", Severity::Info);
    }
    result
  }

  /// Fetch the listing into the cache, reporting only failures. Returns the
  /// number of cached records.
  async fn sync(&mut self) -> Result<usize> {
    let (email, profile) = self.identity()?;

    match self.api.list_suggestions(profile.scope(), &email).await {
      Ok(items) => {
        self.cache = dedup_by_id(items);
        self.reconcile_detail();
        info!(count = self.cache.len(), "loaded suggestions");
        Ok(self.cache.len())
      }
      Err(e) => {
        self.cache.clear();
        self.detail = None;
        Err(self.fail(e.into()))
      }
    }
  }

  /// Submit a new suggestion under the signed-in email and reload.
  pub async fn create(&mut self, category: Category, title: &str, description: &str) -> Result<()> {
    let (email, _) = self.identity()?;

    let body = NewSuggestion::new(email, category, title.trim(), description.trim());
    if let Err(e) = body.validate() {
      return Err(self.fail(e.into()));
    }

    if let Err(e) = self.api.create_suggestion(&body).await {
      return Err(self.fail(e.into()));
    }
    info!(%category, "suggestion submitted");

    // A failed resync keeps its own error on screen.
    if self.sync().await.is_ok() {
      self.notify("Suggestion submitted", Severity::Success);
    }
    Ok(())
  }

  /// Delete `id` after `confirm` agrees.
  ///
  /// Returns `Ok(false)` without any network traffic or notification when
  /// `confirm` declines.
  pub async fn remove<F>(&mut self, id: &SuggestionId, confirm: F) -> Result<bool>
  where
    F: FnOnce(&SuggestionId) -> bool,
  {
    let (_, profile) = self.identity()?;
    if !profile.can_delete() {
      return Err(self.fail(Error::NotPermitted("delete suggestions")));
    }
    if !confirm(id) {
      return Ok(false);
    }

    if let Err(e) = self.api.delete_suggestion(id).await {
      return Err(self.fail(e.into()));
    }

    self.cache.retain(|s| &s.id != id);
    if self.selected_id() == Some(id) {
      self.detail = None;
    }
    info!(%id, "suggestion deleted");
    self.notify("Suggestion deleted", Severity::Success);
    Ok(true)
  }

  /// Move `id` to `status`, stamping the change with the admin's role.
  ///
  /// Forward-only movement is the backend's rule; the client sends whatever
  /// it is asked to and mirrors the record that comes back.
  pub async fn change_status(&mut self, id: &SuggestionId, status: Status) -> Result<()> {
    let (_, profile) = self.identity()?;
    let Some(updated_by) = profile.updated_by() else {
      return Err(self.fail(Error::NotPermitted("change suggestion status")));
    };

    let body = StatusUpdate { status, updated_by: updated_by.to_owned() };
    let record = match self.api.update_status(id, &body).await {
      Ok(record) => record,
      Err(e) => return Err(self.fail(e.into())),
    };

    if let Some(slot) = self.cache.iter_mut().find(|s| &s.id == id) {
      *slot = record.clone();
    }
    if let Some(detail) = self.detail.as_mut().filter(|d| &d.id == id) {
      *detail = record;
    }
    info!(%id, %status, updated_by, "status changed");
    self.notify(format!("Status updated to {status}"), Severity::Success);
    Ok(())
  }

  /// Fetch the full record for `id` and show it in the detail view.
  ///
  /// A cached copy of the record is brought up to date; the cache never
  /// gains records this way.
  pub async fn view(&mut self, id: &SuggestionId) -> Result<()> {
    let (email, profile) = self.identity()?;

    let record = match self.api.view_suggestion(profile.scope(), id, &email).await {
      Ok(record) => record,
      Err(e) => return Err(self.fail(e.into())),
    };

    if let Some(slot) = self.cache.iter_mut().find(|s| s.id == record.id) {
      *slot = record.clone();
    }
    self.notify(format!("Viewing \"{}\"", record.title), Severity::Info);
    self.detail = Some(record);
    Ok(())
  }

  pub fn close_view(&mut self) { self.detail = None; }

  /// Point the detail record at its fresh cache copy, or drop it if the
  /// listing no longer has it.
  fn reconcile_detail(&mut self) {
    if let Some(id) = self.selected_id().cloned() {
      self.detail = self.cache.iter().find(|s| s.id == id).cloned();
    }
  }
}

/// Keep the first record for each id.
fn dedup_by_id(items: Vec<Suggestion>) -> Vec<Suggestion> {
  let mut seen = HashSet::new();
  let before = items.len();
  let out: Vec<_> = items.into_iter().filter(|s| seen.insert(s.id.clone())).collect();
  if out.len() != before {
    warn!(dropped = before - out.len(), "listing contained duplicate ids");
  }
  out
}
