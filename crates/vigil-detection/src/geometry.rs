//! Bounding boxes in normalized image coordinates.

use vigil_core::models::Landmark;

/// Axis-aligned box `{x, y, w, h}` in [0,1] coordinates. Never persisted.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub x: f64,
    pub y: f64,
    pub w: f64,
    pub h: f64,
}

impl BoundingBox {
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Box spanning the min/max extents of `landmarks`.
    ///
    /// Extents start at min=1, max=0, so an empty set collapses to a
    /// zero-area box at (1,1).
    pub fn from_landmarks(landmarks: &[Landmark]) -> Self {
        let (mut min_x, mut min_y, mut max_x, mut max_y) = (1.0_f64, 1.0_f64, 0.0_f64, 0.0_f64);
        for p in landmarks {
            min_x = min_x.min(p.x);
            min_y = min_y.min(p.y);
            max_x = max_x.max(p.x);
            max_y = max_y.max(p.y);
        }
        Self {
            x: min_x,
            y: min_y,
            w: (max_x - min_x).max(0.0),
            h: (max_y - min_y).max(0.0),
        }
    }

    pub fn area(&self) -> f64 {
        self.w * self.h
    }

    pub fn is_empty(&self) -> bool {
        self.area() <= 0.0
    }
}

/// Intersection-over-Union of two boxes. Missing or empty boxes score 0.
pub fn iou(a: Option<&BoundingBox>, b: Option<&BoundingBox>) -> f64 {
    let (Some(a), Some(b)) = (a, b) else {
        return 0.0;
    };
    if a.is_empty() || b.is_empty() {
        return 0.0;
    }
    let x1 = a.x.max(b.x);
    let y1 = a.y.max(b.y);
    let x2 = (a.x + a.w).min(b.x + b.w);
    let y2 = (a.y + a.h).min(b.y + b.h);
    let inter = (x2 - x1).max(0.0) * (y2 - y1).max(0.0);
    let union = a.area() + b.area() - inter;
    if union <= 0.0 {
        return 0.0;
    }
    inter / union
}
