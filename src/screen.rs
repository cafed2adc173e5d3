use crate::app::App;
use multiselect::ItemAccessor;
use ratatui::layout::Margin;
use ratatui::prelude::*;
use ratatui::widgets::Paragraph;

/// Main draw function
pub fn draw<T, A>(frame: &mut Frame, app: &App<T, A>)
where
  T: Clone + 'static,
  A: ItemAccessor<T> + Clone + 'static,
{
  let chunks = Layout::default()
    .direction(Direction::Vertical)
    .constraints([
      Constraint::Length(1), // Header
      Constraint::Min(1),    // Main content
      Constraint::Length(1), // Status bar
    ])
    .split(frame.area());

  draw_header(frame, chunks[0], app.count(), app.select().controller().is_open());

  let content = chunks[1].inner(Margin::new(1, 1));
  app.select().render(frame, content);

  draw_status_bar(frame, chunks[2], app.selected(), app.status());
}

/// Draw the header bar with the counter and shortcuts
fn draw_header(frame: &mut Frame, area: Rect, count: u32, open: bool) {
  let mut spans = vec![
    Span::styled(" multiselect ", Style::default().fg(Color::Cyan).bold()),
    Span::styled("│", Style::default().fg(Color::DarkGray)),
    Span::styled(
      format!(" Count: {} ", count),
      Style::default().fg(Color::Yellow).bold(),
    ),
    Span::raw("  "),
  ];

  let shortcuts: &[(&str, &str)] = if open {
    &[
      ("<↑↓>", " move"),
      ("<Enter>", " toggle"),
      ("<Esc>", " clear/close"),
    ]
  } else {
    &[
      ("<Enter>", " open"),
      ("<←→>", " focus"),
      ("<Del>", " remove"),
      ("<+>", " count"),
      ("<q>", " quit"),
    ]
  };

  // Shortcuts - keys highlighted, descriptions dimmed
  for (key, label) in shortcuts {
    spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
    spans.push(Span::styled(*label, Style::default().fg(Color::DarkGray)));
    spans.push(Span::raw("   "));
  }

  let paragraph = Paragraph::new(Line::from(spans)).style(Style::default().bg(Color::Black));
  frame.render_widget(paragraph, area);
}

fn draw_status_bar(frame: &mut Frame, area: Rect, selected: &[String], status: Option<&str>) {
  let summary = if selected.is_empty() {
    "Selected: none".to_string()
  } else {
    format!("Selected: {}", selected.join(", "))
  };

  let mut spans = vec![Span::styled(
    format!(" {}", summary),
    Style::default().fg(Color::White),
  )];
  if let Some(status) = status {
    spans.push(Span::styled("  │ ", Style::default().fg(Color::DarkGray)));
    spans.push(Span::styled(status, Style::default().fg(Color::DarkGray)));
  }

  frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
