use ratatui::layout::{Constraint, Direction, Layout, Rect};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LayoutTier {
    Wide,   // ≥100 cols: panels side by side
    Narrow, // <100 cols: panels stacked
}

impl LayoutTier {
    pub fn from_area(area: Rect) -> Self {
        if area.width >= 100 {
            LayoutTier::Wide
        } else {
            LayoutTier::Narrow
        }
    }

    pub fn side_by_side(&self) -> bool {
        *self == LayoutTier::Wide
    }
}

pub struct AppLayout {
    pub header: Rect,
    pub main: Rect,
    pub footer: Rect,
    pub tier: LayoutTier,
}

impl AppLayout {
    pub fn new(area: Rect) -> Self {
        let tier = LayoutTier::from_area(area);

        let vertical = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(10),
                Constraint::Length(2),
            ])
            .split(area);

        Self {
            header: vertical[0],
            main: vertical[1],
            footer: vertical[2],
            tier,
        }
    }

    /// Two panels, side by side when wide or stacked when narrow.
    pub fn panels(&self, area: Rect, first_percent: u16) -> (Rect, Rect) {
        let direction = if self.tier.side_by_side() {
            Direction::Horizontal
        } else {
            Direction::Vertical
        };
        let first = first_percent.min(100);
        let split = Layout::default()
            .direction(direction)
            .constraints([
                Constraint::Percentage(first),
                Constraint::Percentage(100 - first),
            ])
            .split(area);
        (split[0], split[1])
    }
}

pub fn pack_hint_lines(hints: &[&str], width: usize) -> Vec<String> {
    if width == 0 || hints.is_empty() {
        return Vec::new();
    }

    let prefix = "  ";
    let separator = "  ";
    let mut out: Vec<String> = Vec::new();
    let mut current = prefix.to_string();
    let mut has_hint = false;

    for hint in hints {
        if hint.is_empty() {
            continue;
        }
        let candidate = if has_hint {
            format!("{current}{separator}{hint}")
        } else {
            format!("{current}{hint}")
        };
        if candidate.chars().count() <= width {
            current = candidate;
            has_hint = true;
        } else {
            if has_hint {
                out.push(current);
            }
            current = format!("{prefix}{hint}");
            has_hint = true;
        }
    }

    if has_hint {
        out.push(current);
    }
    out
}

/// A popup rect of at least `min_w` x `min_h`, capped to the area.
pub fn centered_rect(percent_x: u16, percent_y: u16, min_w: u16, min_h: u16, area: Rect) -> Rect {
    let requested_w = area.width.saturating_mul(percent_x.min(100)) / 100;
    let requested_h = area.height.saturating_mul(percent_y.min(100)) / 100;

    let target_w = requested_w.max(min_w).min(area.width);
    let target_h = requested_h.max(min_h).min(area.height);

    let left = area
        .x
        .saturating_add((area.width.saturating_sub(target_w)) / 2);
    let top = area
        .y
        .saturating_add((area.height.saturating_sub(target_h)) / 2);

    Rect::new(left, top, target_w, target_h)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_hint_lines_wraps() {
        let lines = pack_hint_lines(&["[Enter] 확인", "[Esc] 메뉴", "[q] 종료"], 25);
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("  [Enter]"));
        assert!(pack_hint_lines(&[], 30).is_empty());
    }

    #[test]
    fn test_centered_rect_respects_minimum_and_area() {
        let area = Rect::new(0, 0, 80, 24);
        let r = centered_rect(10, 10, 40, 8, area);
        assert_eq!((r.width, r.height), (40, 8));
        assert_eq!((r.x, r.y), (20, 8));

        let tiny = Rect::new(0, 0, 20, 5);
        let r = centered_rect(50, 50, 40, 8, tiny);
        assert_eq!((r.width, r.height), (20, 5));
    }

    #[test]
    fn test_panels_stack_when_narrow() {
        let wide = AppLayout::new(Rect::new(0, 0, 120, 40));
        let (a, b) = wide.panels(wide.main, 50);
        assert_eq!(a.y, b.y);

        let narrow = AppLayout::new(Rect::new(0, 0, 80, 40));
        let (a, b) = narrow.panels(narrow.main, 50);
        assert_eq!(a.x, b.x);
        assert!(b.y > a.y);
    }
}
