//! Application state machine and event dispatcher.

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use portal_core::{
  api::PortalApi,
  filter::{FilterControls, Selector},
  suggestion::{Category, SuggestionId},
  workflow::Status,
};
use portal_engine::Board;
use strum::IntoEnumIterator;

// ─── Screen ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Screen {
  /// Focus on the suggestion list.
  List,
  /// Focus on the detail pane.
  Detail,
}

/// What keystrokes currently mean.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Mode {
  Normal,
  /// Typing into the search box.
  Search,
  /// Filling in a new suggestion.
  Compose(ComposeForm),
  /// Waiting for `y`/`n` before deleting.
  ConfirmDelete(SuggestionId),
}

/// Work that should run after the next frame is drawn, so the UI can show
/// that it is busy first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Deferred {
  Refresh,
}

// ─── Compose form ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComposeField {
  Category,
  Title,
  Description,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeForm {
  pub category:    Category,
  pub title:       String,
  pub description: String,
  pub field:       ComposeField,
}

impl Default for ComposeForm {
  fn default() -> Self {
    Self {
      category:    Category::Academics,
      title:       String::new(),
      description: String::new(),
      field:       ComposeField::Title,
    }
  }
}

impl ComposeForm {
  pub fn next_field(&mut self) {
    self.field = match self.field {
      ComposeField::Category => ComposeField::Title,
      ComposeField::Title => ComposeField::Description,
      ComposeField::Description => ComposeField::Category,
    };
  }

  /// Step the category forwards (`forward`) or backwards, wrapping.
  pub fn cycle_category(&mut self, forward: bool) {
    let all: Vec<Category> = Category::iter().collect();
    let pos = all.iter().position(|c| *c == self.category).unwrap_or(0);
    let next = if forward { pos + 1 } else { pos + all.len() - 1 };
    self.category = all[next % all.len()];
  }

  pub fn push(&mut self, c: char) {
    match self.field {
      ComposeField::Category => {}
      ComposeField::Title => self.title.push(c),
      ComposeField::Description => self.description.push(c),
    }
  }

  pub fn pop(&mut self) {
    match self.field {
      ComposeField::Category => {}
      ComposeField::Title => {
        self.title.pop();
      }
      ComposeField::Description => {
        self.description.pop();
      }
    }
  }
}

// ─── Startup filters ──────────────────────────────────────────────────────────

/// Filter controls narrowed to the configured `status` and `category`, given
/// in their wire spelling (`in-progress`, `student-life`).
pub fn initial_controls(
  status: Option<&str>,
  category: Option<&str>,
) -> portal_core::Result<FilterControls> {
  let mut controls = FilterControls::default();
  if let Some(s) = status {
    controls.status = Selector::Only(Status::parse(s)?);
  }
  if let Some(c) = category {
    controls.category = Selector::Only(Category::parse(c)?);
  }
  Ok(controls)
}

// ─── App ──────────────────────────────────────────────────────────────────────

/// Top-level application state.
pub struct App<A> {
  /// Session, collection, filters and notifications.
  pub board: Board<A>,

  /// Current screen / keyboard focus.
  pub screen: Screen,

  pub mode: Mode,

  /// Cursor position within the *visible* list.
  pub list_cursor: usize,

  /// Scroll offset within the detail pane.
  pub detail_scroll: u16,

  pub deferred: Option<Deferred>,

  /// Identity-provider token used for (re-)signing in.
  token: String,
}

impl<A: PortalApi> App<A> {
  pub fn new(board: Board<A>, token: String) -> Self {
    Self {
      board,
      screen: Screen::List,
      mode: Mode::Normal,
      list_cursor: 0,
      detail_scroll: 0,
      deferred: None,
      token,
    }
  }

  /// Exchange the configured token for a session. Failures are already on
  /// screen as a notification; the user retries with `i`.
  pub async fn sign_in(&mut self) {
    let token = self.token.clone();
    if let Err(e) = self.board.complete_login(&token).await {
      tracing::debug!(error = %e, "sign-in failed");
    }
    self.list_cursor = 0;
  }

  /// The suggestion id under the list cursor, if any.
  pub fn cursor_id(&self) -> Option<SuggestionId> {
    self.board.visible().get(self.list_cursor).map(|s| s.id.clone())
  }

  /// Keep the cursor inside the visible list after it shrinks.
  fn clamp_cursor(&mut self) {
    let len = self.board.visible().len();
    self.list_cursor = self.list_cursor.min(len.saturating_sub(1));
  }

  /// Whether a busy marker should be shown.
  pub fn is_busy(&self) -> bool { self.board.is_busy() || self.deferred.is_some() }

  /// Run work queued by [`handle_key`](Self::handle_key).
  pub async fn run_deferred(&mut self) {
    if let Some(Deferred::Refresh) = self.deferred.take() {
      if let Err(e) = self.board.refresh().await {
        tracing::debug!(error = %e, "refresh failed");
      }
      self.clamp_cursor();
    }
  }

  // ── Key handling ──────────────────────────────────────────────────────────

  /// Process a key event. Returns `true` to continue, `false` to quit.
  pub async fn handle_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    // Global: Ctrl-C quits from anywhere.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
      return Ok(false);
    }

    match self.mode.clone() {
      Mode::Search => self.handle_search_key(key),
      Mode::Compose(form) => self.handle_compose_key(key, form).await,
      Mode::ConfirmDelete(id) => self.handle_confirm_key(key, id).await,
      Mode::Normal => {
        return match self.screen {
          Screen::List => self.handle_list_key(key).await,
          Screen::Detail => self.handle_detail_key(key).await,
        };
      }
    }
    Ok(true)
  }

  fn handle_search_key(&mut self, key: KeyEvent) {
    let controls = self.board.controls_mut();
    match key.code {
      KeyCode::Esc => {
        controls.search.clear();
        self.mode = Mode::Normal;
      }
      KeyCode::Enter => self.mode = Mode::Normal,
      KeyCode::Backspace => {
        controls.search.pop();
      }
      KeyCode::Char(c) => controls.search.push(c),
      _ => {}
    }
    self.list_cursor = 0;
  }

  async fn handle_compose_key(&mut self, key: KeyEvent, mut form: ComposeForm) {
    match key.code {
      KeyCode::Esc => {
        self.mode = Mode::Normal;
        return;
      }
      KeyCode::Tab => form.next_field(),
      KeyCode::Left if form.field == ComposeField::Category => form.cycle_category(false),
      KeyCode::Right if form.field == ComposeField::Category => form.cycle_category(true),
      KeyCode::Enter if form.field == ComposeField::Description => {
        let result = self
          .board
          .create(form.category, &form.title, &form.description)
          .await;
        if result.is_ok() {
          self.mode = Mode::Normal;
          self.clamp_cursor();
          return;
        }
      }
      KeyCode::Enter => form.next_field(),
      KeyCode::Backspace => form.pop(),
      KeyCode::Char(c) => form.push(c),
      _ => {}
    }
    self.mode = Mode::Compose(form);
  }

  async fn handle_confirm_key(&mut self, key: KeyEvent, id: SuggestionId) {
    let confirmed = match key.code {
      KeyCode::Char('y') | KeyCode::Char('Y') => true,
      KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => false,
      _ => return,
    };
    self.mode = Mode::Normal;
    if let Ok(true) = self.board.remove(&id, |_| confirmed).await {
      if self.board.selected().is_none() {
        self.screen = Screen::List;
      }
      self.clamp_cursor();
    }
  }

  /// Keys shared by both screens. Returns `None` when `key` is not one of
  /// them.
  async fn handle_common_key(&mut self, key: KeyEvent) -> Option<bool> {
    match key.code {
      KeyCode::Char('q') => return Some(false),
      KeyCode::Char('i') if !self.board.session().is_authenticated() => self.sign_in().await,
      KeyCode::Char('/') => {
        self.mode = Mode::Search;
        self.list_cursor = 0;
      }
      KeyCode::Char('s') => {
        let controls = self.board.controls_mut();
        controls.status = controls.status.cycle();
        self.list_cursor = 0;
      }
      KeyCode::Char('c') => {
        let controls = self.board.controls_mut();
        controls.category = controls.category.cycle();
        self.list_cursor = 0;
      }
      KeyCode::Char('o') => {
        let controls = self.board.controls_mut();
        controls.sort = controls.sort.toggle();
      }
      KeyCode::Char('r') => self.deferred = Some(Deferred::Refresh),
      KeyCode::Char('n') if self.board.profile().is_some_and(|p| p.can_submit()) => {
        self.mode = Mode::Compose(ComposeForm::default());
      }
      KeyCode::Char('L') => {
        self.board.logout();
        self.screen = Screen::List;
        self.list_cursor = 0;
      }
      _ => return None,
    }
    Some(true)
  }

  async fn handle_list_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if let Some(cont) = self.handle_common_key(key).await {
      return Ok(cont);
    }
    match key.code {
      // Navigation
      KeyCode::Down | KeyCode::Char('j') => {
        let len = self.board.visible().len();
        if len > 0 && self.list_cursor + 1 < len {
          self.list_cursor += 1;
        }
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.list_cursor = self.list_cursor.saturating_sub(1);
      }

      // Open detail
      KeyCode::Enter | KeyCode::Right | KeyCode::Char('l') => {
        if let Some(id) = self.cursor_id() {
          self.open_detail(&id).await;
        }
      }

      KeyCode::Char('d') => self.ask_delete(self.cursor_id()),

      _ => {}
    }
    Ok(true)
  }

  async fn handle_detail_key(&mut self, key: KeyEvent) -> anyhow::Result<bool> {
    if let Some(cont) = self.handle_common_key(key).await {
      return Ok(cont);
    }
    match key.code {
      // Back to list
      KeyCode::Esc | KeyCode::Left | KeyCode::Char('h') => {
        self.board.close_view();
        self.screen = Screen::List;
      }

      // Scroll detail
      KeyCode::Down | KeyCode::Char('j') => {
        self.detail_scroll = self.detail_scroll.saturating_add(1);
      }
      KeyCode::Up | KeyCode::Char('k') => {
        self.detail_scroll = self.detail_scroll.saturating_sub(1);
      }

      KeyCode::Char('d') => self.ask_delete(self.board.selected_id().cloned()),

      // Forward status transitions, numbered as shown in the detail pane.
      KeyCode::Char(c @ '1'..='3') => {
        let Some(id) = self.board.selected_id().cloned() else {
          return Ok(true);
        };
        let idx = (c as usize) - ('1' as usize);
        if let Some(&next) = self.board.available_transitions(&id).get(idx)
          && let Err(e) = self.board.change_status(&id, next).await
        {
          tracing::debug!(error = %e, "status change failed");
        }
      }

      _ => {}
    }
    Ok(true)
  }

  fn ask_delete(&mut self, id: Option<SuggestionId>) {
    let can_delete = self.board.profile().is_some_and(|p| p.can_delete());
    if let (true, Some(id)) = (can_delete, id) {
      self.mode = Mode::ConfirmDelete(id);
    }
  }

  /// Fetch `id` and switch to the detail screen if that worked.
  async fn open_detail(&mut self, id: &SuggestionId) {
    if self.board.view(id).await.is_ok() {
      self.detail_scroll = 0;
      self.screen = Screen::Detail;
    }
  }
}
