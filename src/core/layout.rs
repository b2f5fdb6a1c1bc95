use crate::constants::{CONTROL_BAR_MARGIN, CONTROL_BAR_WIDTH_RATIO};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

/// Place the floating control bar over a host surface.
///
/// The bar is centred horizontally and sits `CONTROL_BAR_MARGIN` above the
/// bottom edge. Its width is 40% of the host, never narrower than the bar's
/// minimum content width and never wider than the host minus both margins.
/// The margin cap wins when the host is too small for the content.
pub fn control_bar_geometry(host_width: i32, host_height: i32, bar_height: i32, min_width: i32) -> Rect {
    let available = (host_width - 2 * CONTROL_BAR_MARGIN).max(0);
    let desired = (f64::from(host_width) * CONTROL_BAR_WIDTH_RATIO) as i32;
    let width = desired.max(min_width).min(available);

    Rect {
        x: (host_width - width) / 2,
        y: host_height - bar_height - CONTROL_BAR_MARGIN,
        width,
        height: bar_height,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_width_follows_ratio_on_wide_hosts() {
        let rect = control_bar_geometry(1920, 1080, 60, 400);
        assert_eq!(rect.width, 768);
        assert_eq!(rect.x, (1920 - 768) / 2);
        assert_eq!(rect.y, 1080 - 60 - 40);
        assert_eq!(rect.height, 60);
    }

    #[test]
    fn test_minimum_content_width_wins_over_ratio() {
        let rect = control_bar_geometry(800, 600, 50, 500);
        assert_eq!(rect.width, 500);
        assert_eq!(rect.x, 150);
    }

    #[test]
    fn test_margin_caps_width_on_narrow_hosts() {
        let rect = control_bar_geometry(400, 300, 50, 500);
        assert_eq!(rect.width, 320);
        assert_eq!(rect.x, 40);

        let tiny = control_bar_geometry(60, 100, 50, 500);
        assert_eq!(tiny.width, 0);
    }
}
