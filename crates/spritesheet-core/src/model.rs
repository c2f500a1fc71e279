use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    pub fn area(&self) -> u64 {
        self.w as u64 * self.h as u64
    }
    /// Inclusive right edge coordinate (`x + w - 1`).
    pub fn right(&self) -> u32 {
        self.x + self.w.saturating_sub(1)
    }
    /// Inclusive bottom edge coordinate (`y + h - 1`).
    pub fn bottom(&self) -> u32 {
        self.y + self.h.saturating_sub(1)
    }
    pub fn is_empty(&self) -> bool {
        self.w == 0 || self.h == 0
    }
    /// Returns true if `r` is fully inside `self`. Empty rects are contained
    /// when their origin lies within `self`'s span.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x
            && r.y >= self.y
            && r.x as u64 + r.w as u64 <= self.x as u64 + self.w as u64
            && r.y as u64 + r.h as u64 <= self.y as u64 + self.h as u64
    }
    /// True if the two rectangles share at least one pixel.
    pub fn intersects(&self, r: &Rect) -> bool {
        if self.is_empty() || r.is_empty() {
            return false;
        }
        let ax2 = self.x as u64 + self.w as u64;
        let ay2 = self.y as u64 + self.h as u64;
        let bx2 = r.x as u64 + r.w as u64;
        let by2 = r.y as u64 + r.h as u64;
        (self.x as u64) < bx2 && (r.x as u64) < ax2 && (self.y as u64) < by2 && (r.y as u64) < ay2
    }
    /// Shrinks the rectangle by `n` pixels on every side.
    pub fn inset(&self, n: u32) -> Rect {
        Rect::new(
            self.x + n,
            self.y + n,
            self.w.saturating_sub(n.saturating_mul(2)),
            self.h.saturating_sub(n.saturating_mul(2)),
        )
    }
}

/// Where one sprite landed on the sheet.
///
/// `x,y,w,h` is the interior rectangle (padding excluded); the `norm_*`
/// fields are the same values divided by the canvas width/height.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpriteRecord {
    pub name: String,
    #[serde(rename = "X")]
    pub x: u32,
    #[serde(rename = "Y")]
    pub y: u32,
    #[serde(rename = "W")]
    pub w: u32,
    #[serde(rename = "H")]
    pub h: u32,
    #[serde(rename = "normX")]
    pub norm_x: f32,
    #[serde(rename = "normY")]
    pub norm_y: f32,
    #[serde(rename = "normW")]
    pub norm_w: f32,
    #[serde(rename = "normH")]
    pub norm_h: f32,
}

impl SpriteRecord {
    pub fn new(name: impl Into<String>, interior: Rect, canvas_w: u32, canvas_h: u32) -> Self {
        let cw = canvas_w as f32;
        let ch = canvas_h as f32;
        Self {
            name: name.into(),
            x: interior.x,
            y: interior.y,
            w: interior.w,
            h: interior.h,
            norm_x: interior.x as f32 / cw,
            norm_y: interior.y as f32 / ch,
            norm_w: interior.w as f32 / cw,
            norm_h: interior.h as f32 / ch,
        }
    }

    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.w, self.h)
    }
}

/// Coordinate map for a packed sheet: one record per sprite, ordered by name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetMetadata {
    pub app: String,
    pub version: String,
    pub width: u32,
    pub height: u32,
    pub padding: u32,
    pub sprites: Vec<SpriteRecord>,
}

impl SheetMetadata {
    pub fn get(&self, name: &str) -> Option<&SpriteRecord> {
        self.sprites
            .binary_search_by(|r| r.name.as_str().cmp(name))
            .ok()
            .map(|i| &self.sprites[i])
    }

    pub fn len(&self) -> usize {
        self.sprites.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sprites.is_empty()
    }
}

/// Statistics about how well a sheet was packed.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SheetStats {
    pub width: u32,
    pub height: u32,
    /// Number of sprites placed.
    pub sprites: usize,
    /// Sum of padded sprite footprints.
    pub used_area: u64,
    /// `width * height`.
    pub canvas_area: u64,
    /// used_area / canvas_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
    /// Number of trees built before every sprite fit.
    pub attempts: u32,
}

impl SheetStats {
    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Canvas: {}x{}, Sprites: {}, Occupancy: {:.2}%, Canvas Area: {} px², Used Area: {} px², Attempts: {}",
            self.width,
            self.height,
            self.sprites,
            self.occupancy * 100.0,
            self.canvas_area,
            self.used_area,
            self.attempts,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.canvas_area.saturating_sub(self.used_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.canvas_area > 0 {
            (self.wasted_area() as f64 / self.canvas_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
