use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Width/height pair, used for both the viewport and control footprints
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    pub width: f64,
    pub height: f64,
}

impl Size {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

/// Bounding box of a selection, in viewport coordinates
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rect {
    pub left: f64,
    pub top: f64,
    pub right: f64,
    pub bottom: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(left: f64, top: f64, width: f64, height: f64) -> Self {
        Self {
            left,
            top,
            right: left + width,
            bottom: top + height,
            width,
            height,
        }
    }

    /// Same box shifted by the given offset
    pub fn offset(&self, dx: f64, dy: f64) -> Self {
        Self::new(self.left + dx, self.top + dy, self.width, self.height)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rect_derives_edges() {
        let rect = Rect::new(10.0, 20.0, 30.0, 5.0);
        assert_eq!(rect.right, 40.0);
        assert_eq!(rect.bottom, 25.0);
    }

    #[test]
    fn offset_keeps_size() {
        let rect = Rect::new(10.0, 20.0, 30.0, 5.0).offset(-15.0, 100.0);
        assert_eq!(rect.left, -5.0);
        assert_eq!(rect.top, 120.0);
        assert_eq!(rect.width, 30.0);
        assert_eq!(rect.bottom, 125.0);
    }
}
