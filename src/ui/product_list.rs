//! Product list screen rendering
//!
//! Renders the loading and error placeholders, or the filter bar above a
//! responsive grid of product cards and a status line.

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::App;
use crate::cache::QueryState;
use crate::data::FetchError;

use super::product_card::{self, CARD_HEIGHT};

/// Minimum terminal width for each extra grid column
const COLUMN_BREAKPOINTS: [u16; 3] = [60, 90, 120];

/// Number of card columns for a terminal `width`
pub fn grid_columns(width: u16) -> usize {
    1 + COLUMN_BREAKPOINTS.iter().filter(|&&bp| width >= bp).count()
}

/// First grid row to draw so that `selected_row` is visible
fn first_visible_row(selected_row: usize, visible_rows: usize) -> usize {
    selected_row.saturating_sub(visible_rows.saturating_sub(1))
}

/// Renders the product list screen
///
/// Branches on the products query: a placeholder while loading, an error
/// message on failure, otherwise the filter bar and the card grid.
pub fn render(frame: &mut Frame, app: &App) {
    match &app.products {
        QueryState::Idle | QueryState::Loading => render_loading(frame),
        QueryState::Error(err) => render_error(frame, err),
        QueryState::Success(_) => render_products(frame, app),
    }
}

/// Vertically centers a few lines of text
fn render_centered(frame: &mut Frame, lines: Vec<Line<'static>>) {
    let area = frame.area();
    let height = lines.len() as u16;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage(45),
            Constraint::Length(height),
            Constraint::Percentage(45),
        ])
        .split(area);

    frame.render_widget(Paragraph::new(lines).alignment(Alignment::Center), chunks[1]);
}

/// Renders a loading message while products are being fetched
fn render_loading(frame: &mut Frame) {
    render_centered(
        frame,
        vec![Line::from(Span::styled(
            "Loading products...",
            Style::default().fg(Color::Cyan),
        ))],
    );
}

/// Renders the error message for a failed products fetch
fn render_error(frame: &mut Frame, err: &FetchError) {
    render_centered(
        frame,
        vec![
            Line::from(Span::styled(
                "Error loading products",
                Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(err.to_string(), Style::default().fg(Color::DarkGray))),
            Line::from(Span::styled(
                "r Retry  q Quit",
                Style::default().fg(Color::DarkGray),
            )),
        ],
    );
}

fn render_products(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Filter bar
            Constraint::Min(3),    // Card grid
            Constraint::Length(1), // Status line
        ])
        .split(area);

    super::top_bar::render(frame, app, chunks[0]);
    render_grid(frame, app, chunks[1]);
    render_status(frame, app, chunks[2]);
}

fn render_grid(frame: &mut Frame, app: &App, area: Rect) {
    let products = app.product_list();
    if products.is_empty() {
        let empty = Paragraph::new("No products found")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty, area);
        return;
    }

    let columns = grid_columns(area.width);
    let visible_rows = (area.height / CARD_HEIGHT).max(1) as usize;
    let first_row = first_visible_row(app.selected_index / columns, visible_rows);

    let row_areas = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![Constraint::Length(CARD_HEIGHT); visible_rows])
        .split(area);

    for (row_offset, row_area) in row_areas.iter().enumerate() {
        let row = first_row + row_offset;
        let start = row * columns;
        if start >= products.len() {
            break;
        }

        let cells = Layout::default()
            .direction(Direction::Horizontal)
            .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
            .split(*row_area);

        for (col, cell) in cells.iter().enumerate() {
            let index = start + col;
            let Some(product) = products.get(index) else {
                break;
            };
            product_card::render(frame, product, index == app.selected_index, *cell);
        }
    }
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let mut spans = vec![Span::styled(
        format!(" {} products", app.product_count()),
        Style::default().fg(Color::White),
    )];

    let sort = app.store.sort_order();
    spans.push(Span::styled(
        format!(" \u{00B7} {}", app.category_label()),
        Style::default().fg(Color::Gray),
    ));
    if sort.as_param().is_some() {
        spans.push(Span::styled(
            format!(" \u{00B7} {}", sort.label()),
            Style::default().fg(Color::Gray),
        ));
    }
    if let Some(updated) = app.last_updated {
        spans.push(Span::styled(
            format!(" \u{00B7} Updated {}", updated.format("%H:%M")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    spans.push(Span::styled(
        "   \u{2190}\u{2191}\u{2193}\u{2192} Move  c Category  s Sort  r Refresh  ? Help  q Quit",
        Style::default().fg(Color::DarkGray),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
