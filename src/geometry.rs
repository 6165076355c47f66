/// Axis-aligned rectangle in PDF user space (origin bottom-left, y grows up).
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Rect {
            x,
            y,
            width,
            height,
        }
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn offset(&self, dx: f32, dy: f32) -> Rect {
        Rect::new(self.x + dx, self.y + dy, self.width, self.height)
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PageSize {
    pub width: f32,
    pub height: f32,
}

impl PageSize {
    pub const A4: PageSize = PageSize {
        width: 595.2756,
        height: 841.8898,
    };

    pub fn rect(&self) -> Rect {
        Rect::new(0.0, 0.0, self.width, self.height)
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::A4
    }
}

/// Aspect-preserving placement of an image inside a target box.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FitMode {
    /// Whole image visible, letterboxed on one axis.
    Contain,
    /// Target fully covered, overflow on one axis.
    Cover,
}

/// Place an image of pixel size `image` into `target`, centered.
///
/// Unknown (or degenerate) image dimensions are treated as having the target's
/// own aspect ratio, so the result is exactly `target`.
pub fn fit(mode: FitMode, image: Option<(u32, u32)>, target: Rect) -> Rect {
    if target.width <= 0.0 || target.height <= 0.0 {
        return target;
    }
    let target_aspect = target.width / target.height;
    let image_aspect = match image {
        Some((w, h)) if w > 0 && h > 0 => w as f32 / h as f32,
        _ => target_aspect,
    };

    let (width, height) = match mode {
        FitMode::Contain => {
            if image_aspect > target_aspect {
                (target.width, target.width / image_aspect)
            } else {
                (target.height * image_aspect, target.height)
            }
        }
        FitMode::Cover => {
            if image_aspect > target_aspect {
                (image_aspect * target.height, target.height)
            } else {
                (target.width, target.width / image_aspect)
            }
        }
    };

    Rect::new(
        target.x + (target.width - width) / 2.0,
        target.y + (target.height - height) / 2.0,
        width,
        height,
    )
}

pub fn contain(image: Option<(u32, u32)>, target: Rect) -> Rect {
    fit(FitMode::Contain, image, target)
}

pub fn cover(image: Option<(u32, u32)>, target: Rect) -> Rect {
    fit(FitMode::Cover, image, target)
}
