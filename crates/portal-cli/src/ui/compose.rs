//! New-suggestion form, drawn as a centred overlay.

use ratatui::{
  Frame,
  layout::Rect,
  style::{Color, Modifier, Style},
  text::{Line, Span},
  widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

use crate::app::{ComposeField, ComposeForm};

pub fn draw(f: &mut Frame, area: Rect, form: &ComposeForm) {
  let popup = centered(area, 70, 12);
  f.render_widget(Clear, popup);

  let block = Block::default()
    .title(" New suggestion ")
    .borders(Borders::ALL)
    .border_style(Style::default().fg(Color::Cyan));
  let inner = block.inner(popup);
  f.render_widget(block, popup);

  let row = |name: &'static str, value: String, field: ComposeField| {
    let focused = form.field == field;
    let name_style = if focused {
      Style::default().fg(Color::Black).bg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
      Style::default().fg(Color::Cyan)
    };
    let cursor = if focused && field != ComposeField::Category { "_" } else { "" };
    Line::from(vec![
      Span::styled(format!(" {name:<11} "), name_style),
      Span::raw(format!(" {value}{cursor}")),
    ])
  };

  let lines = vec![
    row("category", format!("‹ {} ›", form.category.label()), ComposeField::Category),
    Line::from(""),
    row("title", form.title.clone(), ComposeField::Title),
    Line::from(""),
    row("description", form.description.clone(), ComposeField::Description),
  ];

  f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// A `width`% wide, `height`-row tall rect centred in `area`.
fn centered(area: Rect, width: u16, height: u16) -> Rect {
  let w = (u32::from(area.width) * u32::from(width) / 100) as u16;
  let h = height.min(area.height);
  Rect {
    x:      area.x + (area.width - w) / 2,
    y:      area.y + (area.height - h) / 2,
    width:  w,
    height: h,
  }
}
