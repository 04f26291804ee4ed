//! UI rendering module for storeview
//!
//! This module contains all the rendering logic for the terminal user interface,
//! using the ratatui library for TUI components.

pub mod help_overlay;
pub mod picker;
pub mod product_card;
pub mod product_list;
pub mod top_bar;

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    Frame,
};

use crate::app::App;

pub use product_list::grid_columns;

/// Renders the whole screen for the current app state
pub fn render(frame: &mut Frame, app: &App) {
    product_list::render(frame, app);

    if let Some(open) = app.picker {
        picker::render(frame, app, open);
    }
    if app.show_help {
        help_overlay::render(frame);
    }
}

/// Helper function to create a centered rect
pub(crate) fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length((area.height.saturating_sub(height)) / 2),
            Constraint::Length(height),
            Constraint::Length((area.height.saturating_sub(height)) / 2),
        ])
        .split(area);

    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Length((area.width.saturating_sub(width)) / 2),
            Constraint::Length(width),
            Constraint::Length((area.width.saturating_sub(width)) / 2),
        ])
        .split(vertical[1]);

    horizontal[1]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::Picker;
    use crate::cache::QueryState;
    use crate::store::FilterState;
    use crate::testing::{self, MockCatalog};
    use ratatui::{backend::TestBackend, Terminal};
    use std::sync::Arc;

    fn draw(app: &App) -> String {
        let backend = TestBackend::new(100, 30);
        let mut terminal = Terminal::new(backend).unwrap();
        terminal.draw(|frame| render(frame, app)).unwrap();

        let buffer = terminal.backend().buffer();
        buffer.content().iter().map(|cell| cell.symbol()).collect()
    }

    fn loaded_app() -> App {
        let catalog = Arc::new(MockCatalog::new());
        let (fetcher, _rx) = testing::fetcher(&catalog);
        let mut app = App::new(FilterState::default(), fetcher);
        app.products = QueryState::Success(Arc::new(testing::sample_products()));
        app
    }

    #[test]
    fn test_centered_rect_fits_inside_area() {
        let area = Rect::new(0, 0, 100, 30);
        let rect = centered_rect(40, 10, area);

        assert_eq!(rect.width, 40);
        assert_eq!(rect.height, 10);
        assert_eq!(rect.x, 30);
        assert_eq!(rect.y, 10);
    }

    #[test]
    fn test_render_draws_help_over_grid() {
        let mut app = loaded_app();
        app.show_help = true;

        let content = draw(&app);

        assert!(content.contains("Keyboard Shortcuts"));
    }

    #[test]
    fn test_render_draws_open_picker() {
        let mut app = loaded_app();
        app.picker = Some(Picker::Sort(0));

        let content = draw(&app);

        assert!(content.contains("\u{25B8} Sort By"));
    }

    #[tokio::test]
    async fn test_server_error_renders_error_view() {
        let catalog = Arc::new(MockCatalog::new().failing_products(500));
        let (fetcher, mut rx) = testing::fetcher(&catalog);
        let mut app = App::new(FilterState::default(), fetcher);

        app.mount();
        let message = rx.recv().await.unwrap();
        app.apply(message);

        let content = draw(&app);
        assert!(content.contains("Error loading products"));
        assert!(!content.contains("Add to Cart"));
    }
}
