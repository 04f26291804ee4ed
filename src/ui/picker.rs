//! Category and sort selector popups

use ratatui::{
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::app::{App, Picker};
use crate::data::SortOrder;

use super::centered_rect;

const POPUP_WIDTH: u16 = 34;

/// Renders the open selector popup over the current view
pub fn render(frame: &mut Frame, app: &App, picker: Picker) {
    let (title, options): (&str, Vec<String>) = match picker {
        Picker::Category(_) => (
            " Category ",
            app.category_options()
                .into_iter()
                .map(|(_, label)| label)
                .collect(),
        ),
        Picker::Sort(_) => (
            " Sort ",
            SortOrder::ALL
                .iter()
                .map(|sort| sort.label().to_string())
                .collect(),
        ),
    };

    let height = options.len() as u16 + 2;
    let area = centered_rect(POPUP_WIDTH, height, frame.area());
    frame.render_widget(Clear, area);

    let highlighted = picker.index();
    let lines: Vec<Line> = options
        .into_iter()
        .enumerate()
        .map(|(i, label)| {
            if i == highlighted {
                Line::from(Span::styled(
                    format!("\u{25B8} {label}"),
                    Style::default()
                        .fg(Color::Yellow)
                        .add_modifier(Modifier::BOLD),
                ))
            } else {
                Line::from(format!("  {label}"))
            }
        })
        .collect();

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
