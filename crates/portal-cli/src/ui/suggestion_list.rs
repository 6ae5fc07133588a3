//! Suggestion list pane (left panel).

use portal_core::api::PortalApi;
use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, List, ListItem, ListState, Paragraph},
};

use super::status_color;
use crate::app::{App, Mode};

/// Render the filtered suggestion list into `area`.
pub fn draw<A: PortalApi>(f: &mut Frame, area: Rect, app: &App<A>) {
  let visible = app.board.visible();
  let total = app.board.suggestions().len();
  let searching = app.mode == Mode::Search;
  let search = &app.board.controls().search;

  // Title with count.
  let title = if visible.len() != total {
    format!(" Suggestions ({}/{}) ", visible.len(), total)
  } else {
    format!(" Suggestions ({total}) ")
  };

  let block = Block::default()
    .title(title)
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::DarkGray));

  let items: Vec<ListItem> = visible
    .iter()
    .map(|s| {
      ListItem::new(Line::from(vec![
        Span::styled(
          format!("{:<12}", s.status.label()),
          Style::default().fg(status_color(s.status)),
        ),
        Span::styled(
          format!("{} ", s.created_at.format("%m-%d")),
          Style::default().fg(Color::DarkGray),
        ),
        Span::raw(s.title.clone()),
      ]))
    })
    .collect();

  let mut inner_area = block.inner(area);
  f.render_widget(block, area);

  // Search bar along the bottom of the pane while typing or when a term is set.
  if (searching || !search.is_empty()) && inner_area.height > 2 {
    let search_area = Rect {
      x:      inner_area.x,
      y:      inner_area.y + inner_area.height - 1,
      width:  inner_area.width,
      height: 1,
    };
    inner_area.height = inner_area.height.saturating_sub(1);

    let text = if searching { format!("/{search}_") } else { format!("/{search}") };
    f.render_widget(
      Paragraph::new(text).style(Style::default().fg(Color::Yellow)),
      search_area,
    );
  }

  if visible.is_empty() {
    let hint = if total == 0 { "No suggestions yet." } else { "Nothing matches the filters." };
    f.render_widget(
      Paragraph::new(hint).style(Style::default().fg(Color::DarkGray)),
      inner_area,
    );
    return;
  }

  // Scrollable list with cursor tracking.
  let mut state = ListState::default();
  state.select(Some(app.list_cursor));

  f.render_stateful_widget(
    List::new(items).highlight_style(
      Style::default()
        .bg(Color::Blue)
        .fg(Color::White)
        .add_modifier(Modifier::BOLD),
    ),
    inner_area,
    &mut state,
  );
}
