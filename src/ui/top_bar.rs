//! Filter bar rendering
//!
//! Shows the category and sort selectors with their hotkeys.

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::app::App;

/// Text shown in place of the category selector until categories load
const CATEGORIES_LOADING: &str = "loading...";

/// Builds a `[ value ▾ ]` selector span
fn selector(value: String) -> Span<'static> {
    Span::styled(
        format!("[ {value} \u{25BE} ]"),
        Style::default()
            .fg(Color::White)
            .add_modifier(Modifier::BOLD),
    )
}

fn hotkey(key: &'static str) -> Span<'static> {
    Span::styled(format!(" ({key})"), Style::default().fg(Color::DarkGray))
}

/// Renders the filter bar into `area`
pub fn render(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled("Category: ", Style::default().fg(Color::Gray))];
    if app.store.has_loaded_categories() {
        spans.push(selector(app.category_label()));
        spans.push(hotkey("c"));
    } else {
        spans.push(Span::styled(
            CATEGORIES_LOADING,
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::raw("   "));
    spans.push(Span::styled("Sort: ", Style::default().fg(Color::Gray)));
    spans.push(selector(app.store.sort_order().label().to_string()));
    spans.push(hotkey("s"));

    let block = Block::default()
        .title(Span::styled(
            " STOREVIEW ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    frame.render_widget(Paragraph::new(Line::from(spans)).block(block), area);
}
