//! Layout and hit-testing helpers shared by the UI components.

use ratatui::prelude::*;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// Creates a centered rectangle sized as a percentage of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(r);
    Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(popup_layout[1])[1]
}

/// Like [`centered_rect`] but clamps the result between `min` and `max` sizes.
///
/// The result never exceeds `area`.
pub fn centered_min_max(percent_x: u16, percent_y: u16, min: Rect, max: Rect, area: Rect) -> Rect {
    let width = (area.width as u32 * percent_x as u32 / 100) as u16;
    let height = (area.height as u32 * percent_y as u32 / 100) as u16;
    let width = width.clamp(min.width, max.width.max(min.width)).min(area.width);
    let height = height.clamp(min.height, max.height.max(min.height)).min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Returns the index of the rect in `targets` containing `(x, y)`.
///
/// `container` is checked first so callers can skip the scan for misses.
pub fn find_target_index_by_mouse_position(container: &Rect, targets: &[Rect], x: u16, y: u16) -> Option<usize> {
    let position = Position::new(x, y);
    if !container.contains(position) {
        return None;
    }
    targets.iter().position(|rect| rect.contains(position))
}

/// Truncates `text` to `max_width` display columns, appending an ellipsis when cut.
pub fn truncate_to_width(text: &str, max_width: usize) -> String {
    if text.width() <= max_width {
        return text.to_string();
    }
    if max_width == 0 {
        return String::new();
    }
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w + 1 > max_width {
            break;
        }
        out.push(ch);
        used += w;
    }
    out.push('…');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn centered_min_max_respects_bounds() {
        let area = Rect::new(0, 0, 200, 60);
        let rect = centered_min_max(50, 50, Rect::new(0, 0, 80, 15), Rect::new(0, 0, 90, 20), area);
        assert_eq!((rect.width, rect.height), (90, 20));
        assert_eq!((rect.x, rect.y), (55, 20));

        let tiny = Rect::new(0, 0, 40, 10);
        let rect = centered_min_max(50, 50, Rect::new(0, 0, 80, 15), Rect::new(0, 0, 90, 20), tiny);
        assert_eq!(rect, tiny);
    }

    #[test]
    fn mouse_hits_resolve_to_target_index() {
        let container = Rect::new(0, 0, 30, 3);
        let targets = [Rect::new(0, 0, 10, 3), Rect::new(10, 0, 10, 3)];
        assert_eq!(find_target_index_by_mouse_position(&container, &targets, 12, 1), Some(1));
        assert_eq!(find_target_index_by_mouse_position(&container, &targets, 25, 1), None);
        assert_eq!(find_target_index_by_mouse_position(&container, &targets, 40, 1), None);
    }

    #[test]
    fn truncation_counts_display_columns() {
        assert_eq!(truncate_to_width("photo.png", 20), "photo.png");
        assert_eq!(truncate_to_width("holiday-photo.png", 8), "holiday…");
        assert_eq!(truncate_to_width("写真写真.png", 5), "写真…");
    }
}
