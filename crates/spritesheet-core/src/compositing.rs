use image::RgbaImage;
use tracing::instrument;

use crate::error::{Result, SpriteSheetError};
use crate::packer::{Space, SpritePacker};
use crate::sprite::Sprite;

/// Copy `src` into `canvas` with its top-left corner at (dx, dy).
///
/// Pixels are replaced, not blended; anything falling outside the canvas is
/// clipped.
pub fn blit_rgba(src: &RgbaImage, canvas: &mut RgbaImage, dx: u32, dy: u32) {
    let (cw, ch) = canvas.dimensions();
    let (sw, sh) = src.dimensions();
    for yy in 0..sh {
        let ty = dy as u64 + yy as u64;
        if ty >= ch as u64 {
            break;
        }
        for xx in 0..sw {
            let tx = dx as u64 + xx as u64;
            if tx >= cw as u64 {
                break;
            }
            canvas.put_pixel(tx as u32, ty as u32, *src.get_pixel(xx, yy));
        }
    }
}

impl Space {
    /// Draws every occupied node of this subtree into `canvas`.
    ///
    /// A sprite is drawn inside its footprint, inset by its padding, so the
    /// padding border stays transparent.
    pub fn render(&self, sprites: &[Sprite], canvas: &mut RgbaImage) -> Result<()> {
        match self {
            Space::Empty(_) => Ok(()),
            Space::Split { children, .. } => {
                for child in children {
                    child.render(sprites, canvas)?;
                }
                Ok(())
            }
            Space::Occupied { extent, sprite } => {
                let sprite = &sprites[*sprite];
                let src = sprite
                    .image()
                    .ok_or_else(|| SpriteSheetError::MissingImage(sprite.name().to_string()))?;
                let interior = extent.inset(sprite.padding());
                blit_rgba(src, canvas, interior.x, interior.y);
                Ok(())
            }
        }
    }
}

impl SpritePacker {
    /// Composes the packed sprites onto a transparent RGBA canvas of the
    /// sheet's final size.
    #[instrument(skip_all)]
    pub fn compose(&self) -> Result<RgbaImage> {
        let root = self.root().ok_or(SpriteSheetError::NotPacked)?;
        let mut canvas = RgbaImage::new(self.width(), self.height());
        root.render(self.sprites(), &mut canvas)?;
        Ok(canvas)
    }
}
