pub use kurbo::{Point, Rect};

/// Output canvas dimensions in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct Canvas {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl Canvas {
    /// Construct a canvas size.
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Length of the longer axis.
    pub fn long_edge(self) -> u32 {
        self.width.max(self.height)
    }

    /// Pixel count, or `None` if it overflows `usize`.
    pub fn pixel_count(self) -> Option<usize> {
        (self.width as usize).checked_mul(self.height as usize)
    }
}

/// Straight (non-premultiplied) RGB color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgb8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
}

impl Rgb8 {
    /// Opaque black, the fallback for unparseable colors.
    pub const BLACK: Self = Self { r: 0, g: 0, b: 0 };
    /// White.
    pub const WHITE: Self = Self {
        r: 255,
        g: 255,
        b: 255,
    };

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Attach a `[0, 1]` alpha, rounded to 8 bits.
    pub fn with_alpha(self, alpha: f64) -> Rgba8 {
        Rgba8 {
            r: self.r,
            g: self.g,
            b: self.b,
            a: crate::foundation::math::unit_to_u8(alpha),
        }
    }
}

/// Straight (non-premultiplied) RGBA8 color.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel.
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self {
        r: 0,
        g: 0,
        b: 0,
        a: 0,
    };

    /// Construct from channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Convert to premultiplied channel order `[r, g, b, a]`.
    pub fn to_premul(self) -> [u8; 4] {
        let a = u16::from(self.a);
        [
            crate::foundation::math::mul_div255_u8(u16::from(self.r), a),
            crate::foundation::math::mul_div255_u8(u16::from(self.g), a),
            crate::foundation::math::mul_div255_u8(u16::from(self.b), a),
            self.a,
        ]
    }
}

/// Axis-aligned box of a placed layer, in output pixels.
///
/// `(x, y)` is the top-left corner of the text's glyph box.
#[derive(Clone, Copy, Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct LayerBox {
    /// Left edge.
    pub x: f64,
    /// Top edge.
    pub y: f64,
    /// Measured width.
    pub w: f64,
    /// Measured height.
    pub h: f64,
}

impl LayerBox {
    /// Construct a box from origin and size.
    pub fn new(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self { x, y, w, h }
    }

    /// Bottom edge (`y + h`).
    pub fn bottom(&self) -> f64 {
        self.y + self.h
    }

    /// Top-left corner.
    pub fn origin(&self) -> Point {
        Point::new(self.x, self.y)
    }

    /// As a `kurbo` rectangle.
    pub fn to_rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.x + self.w, self.y + self.h)
    }
}
