//! Suggestion detail pane (right panel).

use portal_core::api::PortalApi;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Paragraph, Wrap},
};

use super::status_color;
use crate::app::{App, Mode};

/// Render the selected suggestion into `area`.
pub fn draw<A: PortalApi>(f: &mut Frame, area: Rect, app: &App<A>) {
  let Some(s) = app.board.selected() else {
    return;
  };

  let block = Block::default()
    .title(format!(" {} ", s.title))
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));
  let inner = block.inner(area);
  f.render_widget(block, area);

  let label = |text: &'static str| {
    Span::styled(
      format!("{text:<12}"),
      Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD),
    )
  };

  let mut lines = vec![
    Line::from(vec![
      label("status"),
      Span::styled(s.status.label(), Style::default().fg(status_color(s.status))),
    ]),
    Line::from(vec![label("category"), Span::raw(s.category.label())]),
    Line::from(vec![label("from"), Span::raw(s.email.clone())]),
  ];
  if let Some(dept) = &s.department {
    lines.push(Line::from(vec![label("department"), Span::raw(dept.clone())]));
  }
  lines.push(Line::from(vec![
    label("submitted"),
    Span::raw(s.created_at.format("%Y-%m-%d %H:%M").to_string()),
  ]));
  if let Some(updated) = s.updated_at {
    let by = s.updated_by.as_deref().map(|b| format!(" by {b}")).unwrap_or_default();
    lines.push(Line::from(vec![
      label("updated"),
      Span::raw(format!("{}{by}", updated.format("%Y-%m-%d %H:%M"))),
    ]));
  }

  lines.push(Line::from(""));
  for para in s.description.lines() {
    lines.push(Line::from(para.to_string()));
  }

  // Actions.
  lines.push(Line::from(""));
  let transitions = app.board.available_transitions(&s.id);
  if !transitions.is_empty() {
    let mut spans = vec![Span::styled("set status  ", Style::default().fg(Color::DarkGray))];
    for (i, next) in transitions.iter().enumerate() {
      spans.push(Span::styled(
        format!("[{}] {}  ", i + 1, next.label()),
        Style::default().fg(status_color(*next)),
      ));
    }
    lines.push(Line::from(spans));
  } else if s.status.is_terminal() {
    lines.push(Line::from(Span::styled(
      "This suggestion is closed.",
      Style::default().fg(Color::DarkGray),
    )));
  }

  if matches!(&app.mode, Mode::ConfirmDelete(id) if *id == s.id) {
    lines.push(Line::from(Span::styled(
      "Delete this suggestion? [y/n]",
      Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    )));
  }

  let para = Paragraph::new(lines)
    .wrap(Wrap { trim: false })
    .scroll((app.detail_scroll, 0));
  f.render_widget(para, inner);
}
