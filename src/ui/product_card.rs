//! Product card widget
//!
//! A bordered card showing the image link, title, category, price, a
//! two-line description and an "Add to Cart" button that does nothing.

use ratatui::{
    layout::{Alignment, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::data::Product;

/// Rows a card occupies, borders included
pub const CARD_HEIGHT: u16 = 10;

/// Lines of description shown before it is cut off
const DESCRIPTION_LINES: usize = 2;

const ELLIPSIS: char = '…';

/// Terminal columns `text` occupies
fn display_width(text: &str) -> usize {
    Span::raw(text).width()
}

fn char_width(c: char) -> usize {
    let mut buf = [0u8; 4];
    display_width(c.encode_utf8(&mut buf))
}

/// Byte length of the longest prefix of `text` that fits in `width` columns
fn fit_prefix(text: &str, width: usize) -> usize {
    let mut used = 0;
    for (i, c) in text.char_indices() {
        used += char_width(c);
        if used > width {
            return i;
        }
    }
    text.len()
}

/// Cuts `text` to at most `width` columns, ending in an ellipsis if cut
pub fn truncate(text: &str, width: usize) -> String {
    if display_width(text) <= width {
        return text.to_string();
    }
    if width == 0 {
        return String::new();
    }
    let end = fit_prefix(text, width - 1);
    format!("{}{ELLIPSIS}", &text[..end])
}

/// Word-wraps `text` to `width` columns and keeps at most `max_lines` lines
///
/// The last kept line ends in an ellipsis when text was dropped.
pub fn clamp_lines(text: &str, width: usize, max_lines: usize) -> Vec<String> {
    if width == 0 || max_lines == 0 {
        return Vec::new();
    }

    let mut lines: Vec<String> = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            display_width(word)
        } else {
            display_width(&current) + 1 + display_width(word)
        };
        if needed <= width {
            if !current.is_empty() {
                current.push(' ');
            }
            current.push_str(word);
        } else {
            if !current.is_empty() {
                lines.push(std::mem::take(&mut current));
            }
            // A word wider than the line is hard-split
            let mut rest = word;
            while display_width(rest) > width {
                let mut split = fit_prefix(rest, width);
                if split == 0 {
                    // A single character wider than the line
                    split = rest.chars().next().map_or(rest.len(), char::len_utf8);
                }
                lines.push(rest[..split].to_string());
                rest = &rest[split..];
            }
            current.push_str(rest);
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }

    if lines.len() > max_lines {
        lines.truncate(max_lines);
        if let Some(last) = lines.last_mut() {
            let end = fit_prefix(last, width.saturating_sub(1));
            *last = format!("{}{ELLIPSIS}", &last[..end]);
        }
    }
    lines
}

/// Renders one product card into `area`
pub fn render(frame: &mut Frame, product: &Product, selected: bool, area: Rect) {
    let border_color = if selected { Color::Yellow } else { Color::DarkGray };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(border_color));

    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines = vec![
        Line::from(Span::styled(
            truncate(&product.image, inner_width),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(Span::styled(
            truncate(&product.title, inner_width),
            Style::default()
                .fg(if selected { Color::Cyan } else { Color::White })
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate(&format!("Category: {}", product.category), inner_width),
            Style::default().fg(Color::Gray),
        )),
        Line::from(Span::styled(
            format!("${}", product.price),
            Style::default()
                .fg(Color::Green)
                .add_modifier(Modifier::BOLD),
        )),
    ];

    let description = clamp_lines(&product.description, inner_width, DESCRIPTION_LINES);
    let padding = DESCRIPTION_LINES - description.len();
    lines.extend(description.into_iter().map(|l| {
        Line::from(Span::styled(l, Style::default().fg(Color::Gray)))
    }));
    lines.extend(std::iter::repeat(Line::from("")).take(padding + 1));

    lines.push(
        Line::from(Span::styled(
            " Add to Cart ",
            Style::default()
                .fg(Color::White)
                .bg(Color::Blue)
                .add_modifier(Modifier::BOLD),
        ))
        .alignment(Alignment::Center),
    );

    frame.render_widget(Paragraph::new(lines).block(block), area);
}
