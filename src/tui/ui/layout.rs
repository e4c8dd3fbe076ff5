//! Layout calculations and text utilities for the TUI.

use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Widest a table column grows before the rest of the row gets the space.
pub const MAX_COLUMN_WIDTH: usize = 48;
/// Columns are never squeezed below this.
pub const MIN_COLUMN_WIDTH: usize = 4;
pub const COLUMN_SPACING: u16 = 1;

pub fn display_width(text: &str) -> usize {
    UnicodeWidthStr::width(text)
}

/// Truncate text to a maximum display width.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let ch_width = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + ch_width > max_width {
            break;
        }
        out.push(ch);
        used += ch_width;
    }
    out
}

/// Truncate text with an ellipsis if it exceeds max width.
pub fn truncate_with_ellipsis(text: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if display_width(text) <= max_width {
        return text.to_string();
    }
    let truncated = truncate_to_width(text, max_width - 1);
    format!("{truncated}…")
}

/// Shrink natural column widths until the row fits `available` cells.
///
/// Widths start capped at [`MAX_COLUMN_WIDTH`]; the widest column gives up
/// space first and nothing drops below [`MIN_COLUMN_WIDTH`].
pub fn fit_column_widths(natural: &[usize], available: usize) -> Vec<u16> {
    let mut widths: Vec<usize> = natural
        .iter()
        .map(|w| (*w).clamp(MIN_COLUMN_WIDTH, MAX_COLUMN_WIDTH))
        .collect();
    let spacing = natural.len().saturating_sub(1) * COLUMN_SPACING as usize;

    let mut total: usize = widths.iter().sum::<usize>() + spacing;
    while total > available {
        let Some((idx, widest)) = widths
            .iter()
            .copied()
            .enumerate()
            .max_by_key(|(i, w)| (*w, std::cmp::Reverse(*i)))
        else {
            break;
        };
        if widest <= MIN_COLUMN_WIDTH {
            break;
        }
        widths[idx] -= 1;
        total -= 1;
    }

    widths.into_iter().map(|w| w as u16).collect()
}

/// Fit a Line to a maximum width by truncating spans.
pub fn fit_line_to_width<'a>(line: Line<'a>, max_width: usize) -> Line<'a> {
    let Line {
        spans,
        alignment,
        style,
    } = line;
    let mut out: Vec<Span<'a>> = Vec::new();
    let mut used = 0usize;

    for span in spans {
        if used >= max_width {
            break;
        }
        let span_width = display_width(span.content.as_ref());
        if used + span_width <= max_width {
            used += span_width;
            out.push(span);
        } else {
            let truncated = truncate_to_width(span.content.as_ref(), max_width - used);
            if !truncated.is_empty() {
                out.push(Span::styled(truncated, span.style));
            }
            break;
        }
    }

    Line {
        spans: out,
        alignment,
        style,
    }
}

/// Fit lines to an area, replacing the overflow with an ellipsis line.
pub fn fit_lines_to_area<'a>(lines: Vec<Line<'a>>, inner: Rect) -> Vec<Line<'a>> {
    let width = inner.width as usize;
    let height = inner.height as usize;
    if height == 0 || width == 0 {
        return Vec::new();
    }

    let overflow = lines.len() > height;
    let take = if overflow { height - 1 } else { height };
    let mut out: Vec<Line<'a>> = lines
        .into_iter()
        .take(take)
        .map(|line| fit_line_to_width(line, width))
        .collect();
    if overflow {
        out.push(Line::styled("…", Style::default().fg(Color::DarkGray)).centered());
    }
    out
}

/// Calculate a centered popup rectangle within a container.
pub fn popup_rect(percent_x: u16, percent_y: u16, min_width: u16, min_height: u16, r: Rect) -> Rect {
    let max_width = r.width.saturating_sub(2).max(1);
    let max_height = r.height.saturating_sub(2).max(1);

    let width = (r.width.saturating_mul(percent_x) / 100)
        .max(min_width)
        .min(max_width);
    let height = (r.height.saturating_mul(percent_y) / 100)
        .max(min_height)
        .min(max_height);

    Rect {
        x: r.x + (r.width - width) / 2,
        y: r.y + (r.height - height) / 2,
        width,
        height,
    }
}

/// Rectangle of `width` x `height` next to a pointer, flipped to stay inside `bounds`.
pub fn tooltip_rect(pointer: (u16, u16), width: u16, height: u16, bounds: Rect) -> Rect {
    let width = width.min(bounds.width);
    let height = height.min(bounds.height);
    let (px, py) = pointer;

    let x = if px + 2 + width <= bounds.right() {
        px + 2
    } else {
        px.saturating_sub(width + 1).max(bounds.x)
    };
    let y = if py + 1 + height <= bounds.bottom() {
        py + 1
    } else {
        py.saturating_sub(height).max(bounds.y)
    };

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Parse a `#rrggbb` colour; anything else falls back to the terminal default.
pub fn hex_color(hex: &str) -> Color {
    hex.parse().unwrap_or(Color::Reset)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_with_ellipsis_counts_wide_chars() {
        assert_eq!(truncate_with_ellipsis("Задача", 10), "Задача");
        assert_eq!(truncate_with_ellipsis("Задача", 4), "Зад…");
        assert_eq!(truncate_with_ellipsis("日本語", 4), "日…");
    }

    #[test]
    fn test_fit_column_widths_shrinks_widest_first() {
        // 4 (min) + 20 + 10 + 2 spacing = 36
        assert_eq!(fit_column_widths(&[3, 20, 10], 35), vec![4, 19, 10]);
        assert_eq!(fit_column_widths(&[4, 20, 10], 30), vec![4, 14, 10]);
        // Never below the minimum
        assert_eq!(fit_column_widths(&[10, 10], 5), vec![4, 4]);
        // Capped at the maximum
        assert_eq!(fit_column_widths(&[200], 500), vec![MAX_COLUMN_WIDTH as u16]);
    }

    #[test]
    fn test_fit_lines_to_area_adds_ellipsis() {
        let lines = (0..5).map(|i| Line::from(i.to_string())).collect();
        let out = fit_lines_to_area(lines, Rect::new(0, 0, 10, 3));
        assert_eq!(out.len(), 3);
        assert_eq!(out[2].to_string(), "…");
    }

    #[test]
    fn test_tooltip_rect_stays_inside() {
        let bounds = Rect::new(0, 0, 80, 24);
        assert_eq!(tooltip_rect((10, 5), 20, 6, bounds), Rect::new(12, 6, 20, 6));
        let flipped = tooltip_rect((75, 22), 20, 6, bounds);
        assert!(flipped.right() <= bounds.right());
        assert!(flipped.bottom() <= bounds.bottom());
    }

    #[test]
    fn test_hex_color() {
        assert_eq!(hex_color("#e74c3c"), Color::Rgb(0xe7, 0x4c, 0x3c));
        assert_eq!(hex_color("nope"), Color::Reset);
    }

    #[test]
    fn test_popup_rect_centered() {
        let r = popup_rect(50, 50, 10, 5, Rect::new(0, 0, 100, 40));
        assert_eq!(r, Rect::new(25, 10, 50, 20));
    }
}
