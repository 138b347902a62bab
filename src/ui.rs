use ratatui::{prelude::*, widgets::*};

use crate::app::state::NoticeKind;
use crate::query::{SortDir, SortKey};

/// Neutralize record text before it reaches the terminal
///
/// Control characters (ESC in particular) would let a product title carry
/// terminal escape sequences; they are replaced with U+FFFD. Newlines and
/// tabs become spaces so a row stays on one line.
pub fn sanitize(text: &str) -> String {
    text.chars()
        .map(|c| match c {
            '\n' | '\r' | '\t' => ' ',
            c if c.is_control() => '\u{FFFD}',
            c => c,
        })
        .collect()
}

/// Clip to `max` characters, marking the cut with an ellipsis
pub fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let keep = max.saturating_sub(1);
    let mut out: String = text.chars().take(keep).collect();
    out.push('…');
    out
}

pub fn price_text(price: f64) -> String {
    if price.fract() == 0.0 {
        format!("{:.0}", price)
    } else {
        format!("{:.2}", price)
    }
}

/// Column header label with the sort arrow when active
pub fn sort_header(label: &str, key: SortKey, sort_by: Option<SortKey>, dir: SortDir) -> String {
    if sort_by == Some(key) {
        format!("{} {}", label, dir.arrow())
    } else {
        label.to_string()
    }
}

/// Previous / numbered pages / Next, with disabled ends dimmed
pub fn pagination_line(page: usize, page_count: usize) -> Line<'static> {
    let enabled = Style::default().fg(Color::Cyan);
    let disabled = Style::default().fg(Color::DarkGray);

    let mut spans = vec![Span::styled(
        "‹ Previous ",
        if page <= 1 { disabled } else { enabled },
    )];
    for n in 1..=page_count {
        let style = if n == page {
            Style::default().fg(Color::Black).bg(Color::Cyan).bold()
        } else {
            Style::default()
        };
        spans.push(Span::styled(format!(" {} ", n), style));
    }
    spans.push(Span::styled(
        " Next ›",
        if page >= page_count { disabled } else { enabled },
    ));
    Line::from(spans)
}

/// Renders a labelled single-line input field
pub fn render_input<'a>(content: &'a str, title: &'a str, is_focused: bool) -> Paragraph<'a> {
    let style = if is_focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::DarkGray)
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(style)
        .title(title);

    Paragraph::new(content).block(block)
}

pub fn notice_color(kind: NoticeKind) -> Color {
    match kind {
        NoticeKind::Info => Color::Green,
        NoticeKind::Error => Color::Red,
    }
}

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_escape_sequences() {
        assert_eq!(sanitize("Bag\u{1b}[31mRED"), "Bag\u{FFFD}[31mRED");
        assert_eq!(sanitize("two\nlines"), "two lines");
        assert_eq!(sanitize("<b>plain</b> & co"), "<b>plain</b> & co");
    }

    #[test]
    fn test_truncate() {
        assert_eq!(truncate("short", 10), "short");
        assert_eq!(truncate("abcdefgh", 5), "abcd…");
    }

    #[test]
    fn test_price_text() {
        assert_eq!(price_text(10.0), "10");
        assert_eq!(price_text(9.5), "9.50");
    }

    #[test]
    fn test_pagination_line_disables_ends() {
        let first = pagination_line(1, 3);
        assert_eq!(first.spans.len(), 5);
        assert_eq!(first.spans[0].style.fg, Some(Color::DarkGray));
        assert_eq!(first.spans[4].style.fg, Some(Color::Cyan));

        let last = pagination_line(3, 3);
        assert_eq!(last.spans[0].style.fg, Some(Color::Cyan));
        assert_eq!(last.spans[4].style.fg, Some(Color::DarkGray));
        assert_eq!(last.spans[3].style.bg, Some(Color::Cyan));
    }

    #[test]
    fn test_sort_header_arrow() {
        assert_eq!(sort_header("Title", SortKey::Title, Some(SortKey::Title), SortDir::Descending), "Title ▼");
        assert_eq!(sort_header("Price", SortKey::Price, Some(SortKey::Title), SortDir::Ascending), "Price");
    }
}
