use crate::error::{Result, SpriteSheetError};
use image::{DynamicImage, RgbaImage};

/// Default transparent border around every sprite, in pixels.
pub const DEFAULT_PADDING: u32 = 2;

/// One input image: its name, size, padding and (optionally) decoded pixels.
///
/// A sprite is immutable once built. Sprites created with [`Sprite::new`]
/// carry only dimensions and can be packed and exported as metadata, but not
/// composed into a canvas.
#[derive(Debug, Clone)]
pub struct Sprite {
    name: String,
    width: u32,
    height: u32,
    padding: u32,
    image: Option<RgbaImage>,
}

impl Sprite {
    /// Layout-only sprite.
    pub fn new(name: impl Into<String>, width: u32, height: u32, padding: u32) -> Result<Self> {
        let name = name.into();
        Self::check(&name, width, height, padding)?;
        Ok(Self {
            name,
            width,
            height,
            padding,
            image: None,
        })
    }

    /// Sprite backed by decoded pixels; dimensions come from the image.
    pub fn from_image(name: impl Into<String>, image: DynamicImage, padding: u32) -> Result<Self> {
        Self::from_rgba(name, image.to_rgba8(), padding)
    }

    pub fn from_rgba(name: impl Into<String>, image: RgbaImage, padding: u32) -> Result<Self> {
        let name = name.into();
        let (width, height) = image.dimensions();
        Self::check(&name, width, height, padding)?;
        Ok(Self {
            name,
            width,
            height,
            padding,
            image: Some(image),
        })
    }

    fn check(name: &str, width: u32, height: u32, padding: u32) -> Result<()> {
        let invalid = |reason: String| SpriteSheetError::InvalidSprite {
            name: name.to_string(),
            reason,
        };
        if name.is_empty() {
            return Err(invalid("name is empty".into()));
        }
        if width == 0 || height == 0 {
            return Err(invalid(format!("dimensions must be positive, got {width}x{height}")));
        }
        let border = padding
            .checked_mul(2)
            .ok_or_else(|| invalid(format!("padding {padding} is too large")))?;
        if width.checked_add(border).is_none() || height.checked_add(border).is_none() {
            return Err(invalid(format!(
                "padded size of {width}x{height} with padding {padding} overflows"
            )));
        }
        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.name
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    pub fn padding(&self) -> u32 {
        self.padding
    }
    pub fn image(&self) -> Option<&RgbaImage> {
        self.image.as_ref()
    }

    /// `width + 2 * padding`
    pub fn padded_width(&self) -> u32 {
        self.width + self.padding * 2
    }
    /// `height + 2 * padding`
    pub fn padded_height(&self) -> u32 {
        self.height + self.padding * 2
    }
    /// Unpadded area; this is the sort key for insertion order.
    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
    pub fn padded_area(&self) -> u64 {
        self.padded_width() as u64 * self.padded_height() as u64
    }
}
