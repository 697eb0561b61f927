//! Window split into the elevation pane (top) and the plan pane (bottom).
//!
//! All rectangles are in logical window pixels with the origin at the
//! top-left corner and y growing downwards, matching `Window::cursor_position`.

use bevy_math::Vec2;

use crate::config::LayoutConfig;

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportRect {
    pub min: Vec2,
    pub size: Vec2,
}

impl ViewportRect {
    pub fn new(min: Vec2, size: Vec2) -> Self {
        Self {
            min,
            size: size.max(Vec2::ZERO),
        }
    }

    #[inline]
    pub fn width(&self) -> f32 {
        self.size.x
    }

    #[inline]
    pub fn height(&self) -> f32 {
        self.size.y
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    /// Width over height, or 1 for a degenerate rectangle.
    pub fn aspect(&self) -> f32 {
        if self.size.y > 0.0 && self.size.x > 0.0 {
            self.size.x / self.size.y
        } else {
            1.0
        }
    }

    /// Less than one pixel along either axis.
    pub fn is_empty(&self) -> bool {
        self.size.x < 1.0 || self.size.y < 1.0
    }

    pub fn contains(&self, point: Vec2) -> bool {
        let max = self.max();
        point.x >= self.min.x && point.x < max.x && point.y >= self.min.y && point.y < max.y
    }

    /// Normalized device coordinates: `[-1, 1]` on both axes, y up.
    pub fn to_ndc(&self, point: Vec2) -> Vec2 {
        if self.is_empty() {
            return Vec2::ZERO;
        }
        let local = (point - self.min) / self.size;
        Vec2::new(local.x * 2.0 - 1.0, 1.0 - local.y * 2.0)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SplitPanes {
    pub top: ViewportRect,
    pub divider: ViewportRect,
    pub bottom: ViewportRect,
}

/// Draggable horizontal divider between the two views.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitLayout {
    ratio: f32,
    min_top_px: f32,
    min_bottom_px: f32,
    divider_px: f32,
}

impl Default for SplitLayout {
    fn default() -> Self {
        Self::from_config(&LayoutConfig::default())
    }
}

impl SplitLayout {
    pub fn from_config(config: &LayoutConfig) -> Self {
        let ratio = if config.split_ratio.is_finite() && (0.0..=1.0).contains(&config.split_ratio) {
            config.split_ratio
        } else {
            0.5
        };
        Self {
            ratio,
            min_top_px: config.min_top_px.max(0.0),
            min_bottom_px: config.min_bottom_px.max(0.0),
            divider_px: config.divider_px.max(0.0),
        }
    }

    #[inline]
    pub fn ratio(&self) -> f32 {
        self.ratio
    }

    #[inline]
    pub fn divider_px(&self) -> f32 {
        self.divider_px
    }

    /// Move the divider under the pointer. A zero-height container keeps
    /// the current ratio. Returns whether the ratio changed.
    pub fn drag_to(&mut self, pointer_y: f32, container_height: f32) -> bool {
        if !(container_height > 0.0) || !pointer_y.is_finite() {
            return false;
        }
        let lo = self.min_top_px / container_height;
        let hi = 1.0 - self.min_bottom_px / container_height;
        // When both minimums cannot fit, the bottom pane wins.
        let ratio = (pointer_y / container_height).max(lo).min(hi).clamp(0.0, 1.0);

        if ratio != self.ratio {
            self.ratio = ratio;
            true
        } else {
            false
        }
    }

    pub fn panes(&self, window: Vec2) -> SplitPanes {
        let half = self.divider_px * 0.5;
        let split_y = self.ratio * window.y;

        let top_h = (split_y - half).max(0.0);
        let bottom_h = ((1.0 - self.ratio) * window.y - half).max(0.0);

        SplitPanes {
            top: ViewportRect::new(Vec2::ZERO, Vec2::new(window.x, top_h)),
            divider: ViewportRect::new(
                Vec2::new(0.0, top_h),
                Vec2::new(window.x, self.divider_px),
            ),
            bottom: ViewportRect::new(
                Vec2::new(0.0, window.y - bottom_h),
                Vec2::new(window.x, bottom_h),
            ),
        }
    }

    /// Whether `point` lies on the divider for a window of size `window`.
    pub fn divider_hit(&self, point: Vec2, window: Vec2) -> bool {
        self.panes(window).divider.contains(point)
    }
}
