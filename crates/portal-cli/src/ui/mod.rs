//! TUI rendering for all panes.

pub mod compose;
pub mod suggestion_detail;
pub mod suggestion_list;

use chrono::Local;
use portal_core::{
  api::PortalApi,
  filter::{Selector, SortOrder},
  workflow::Status,
};
use portal_engine::Severity;
use ratatui::{
  Frame,
  layout::{Constraint, Direction, Layout, Rect},
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph},
};

use crate::app::{App, Mode, Screen};

// ─── Root draw ────────────────────────────────────────────────────────────────

/// Main draw function called each frame.
pub fn draw<A: PortalApi>(f: &mut Frame, app: &App<A>) {
  let area = f.area();

  // Vertical stack: header, filter summary, body, status bar.
  let rows = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // header
      Constraint::Length(1), // filters
      Constraint::Min(0),    // body
      Constraint::Length(1), // status bar
    ])
    .split(area);

  draw_header(f, rows[0], app);
  draw_filters(f, rows[1], app);
  draw_body(f, rows[2], app);
  draw_status(f, rows[3], app);

  if let Mode::Compose(form) = &app.mode {
    compose::draw(f, area, form);
  }
}

/// Colour used for a status everywhere in the UI.
pub fn status_color(status: Status) -> Color {
  match status {
    Status::Pending => Color::Yellow,
    Status::InProgress => Color::Cyan,
    Status::Resolved => Color::Green,
    Status::Invalid => Color::Red,
  }
}

// ─── Header ───────────────────────────────────────────────────────────────────

fn draw_header<A: PortalApi>(f: &mut Frame, area: Rect, app: &App<A>) {
  let date = Local::now().format("%Y-%m-%d").to_string();
  let session = app.board.session();

  let who = match app.board.profile() {
    Some(profile) => {
      let dept = session
        .department()
        .map(|d| format!(" · {d}"))
        .unwrap_or_default();
      format!(" portal  {} ({}{dept})", session.email(), profile.label())
    }
    None => " portal  signed out".to_string(),
  };

  let mut spans = vec![Span::styled(
    who,
    Style::default()
      .fg(Color::White)
      .add_modifier(Modifier::BOLD),
  )];

  for (status, count) in app.board.status_counts() {
    spans.push(Span::raw("  "));
    spans.push(Span::styled(
      format!("{} {count}", status.label()),
      Style::default().fg(status_color(status)),
    ));
  }

  if app.is_busy() {
    spans.push(Span::styled(
      "  ⟳ refreshing…",
      Style::default().fg(Color::Yellow),
    ));
  }

  let left_width: usize = spans.iter().map(|s| s.content.chars().count()).sum();
  let right = format!("{date} ");
  let pad = (area.width as usize)
    .saturating_sub(left_width)
    .saturating_sub(right.len());
  spans.push(Span::raw(" ".repeat(pad)));
  spans.push(Span::styled(right, Style::default().fg(Color::Gray)));

  let block = Block::default().style(Style::default().bg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(Paragraph::new(Line::from(spans)), inner);
}

// ─── Filter summary ───────────────────────────────────────────────────────────

fn draw_filters<A: PortalApi>(f: &mut Frame, area: Rect, app: &App<A>) {
  let controls = app.board.controls();
  let status = match controls.status {
    Selector::All => "all",
    Selector::Only(s) => s.label(),
  };
  let category = match controls.category {
    Selector::All => "all",
    Selector::Only(c) => c.label(),
  };
  let sort = match controls.sort {
    SortOrder::Newest => "newest",
    SortOrder::Oldest => "oldest",
  };

  let key = Style::default().fg(Color::DarkGray);
  let value = Style::default().fg(Color::White);
  let line = Line::from(vec![
    Span::styled(" status ", key),
    Span::styled(status, value),
    Span::styled("  category ", key),
    Span::styled(category, value),
    Span::styled("  sort ", key),
    Span::styled(sort, value),
  ]);
  f.render_widget(Paragraph::new(line), area);
}

// ─── Body ─────────────────────────────────────────────────────────────────────

fn draw_body<A: PortalApi>(f: &mut Frame, area: Rect, app: &App<A>) {
  // Split into left list pane (40%) and right detail pane (60%).
  let cols = Layout::default()
    .direction(Direction::Horizontal)
    .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
    .split(area);

  suggestion_list::draw(f, cols[0], app);

  if app.board.selected().is_some() {
    suggestion_detail::draw(f, cols[1], app);
  } else {
    draw_empty_detail(f, cols[1]);
  }
}

fn draw_empty_detail(f: &mut Frame, area: Rect) {
  let block = Block::default()
    .title(" Detail ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);
  f.render_widget(
    Paragraph::new(Line::from(vec![Span::styled(
      "Select a suggestion and press Enter.",
      Style::default().fg(Color::DarkGray),
    )])),
    inner,
  );
}

// ─── Status bar ───────────────────────────────────────────────────────────────

fn draw_status<A: PortalApi>(f: &mut Frame, area: Rect, app: &App<A>) {
  let can_submit = app.board.profile().is_some_and(|p| p.can_submit());
  let (mode_label, hints) = match (&app.mode, &app.screen) {
    (Mode::Search, _) => ("SEARCH", "Type to filter  Esc clear  Enter done"),
    (Mode::Compose(_), _) => (
      "COMPOSE",
      "Tab next field  ←→ category  Enter submit  Esc cancel",
    ),
    (Mode::ConfirmDelete(_), _) => ("DELETE", "Delete this suggestion? y/n"),
    (Mode::Normal, _) if app.board.profile().is_none() => ("SIGNED OUT", "i sign in  q quit"),
    (Mode::Normal, Screen::List) if can_submit => (
      "LIST",
      "jk move  Enter view  / search  s/c filter  o sort  r refresh  n new  d delete  L logout  q quit",
    ),
    (Mode::Normal, Screen::List) => (
      "LIST",
      "jk move  Enter view  / search  s/c filter  o sort  r refresh  L logout  q quit",
    ),
    (Mode::Normal, Screen::Detail) => ("DETAIL", "jk scroll  1-3 set status  Esc back  q quit"),
  };

  // A live notification takes the place of the hints.
  let (text, text_style) = match app.board.notification() {
    Some(n) => {
      let color = match n.severity {
        Severity::Success => Color::Green,
        Severity::Error => Color::Red,
        Severity::Info => Color::Cyan,
      };
      (n.message, Style::default().fg(color).add_modifier(Modifier::BOLD))
    }
    None => (hints.to_string(), Style::default().fg(Color::DarkGray)),
  };

  let mode_span = Span::styled(
    format!(" {mode_label} "),
    Style::default()
      .fg(Color::Black)
      .bg(Color::Cyan)
      .add_modifier(Modifier::BOLD),
  );
  let text_span = Span::styled(format!("  {text}"), text_style);

  let line = Line::from(vec![mode_span, text_span]);
  f.render_widget(
    Paragraph::new(line).style(Style::default().bg(Color::Black)),
    area,
  );
}
