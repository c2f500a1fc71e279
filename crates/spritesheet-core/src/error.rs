use thiserror::Error;

#[derive(Debug, Error)]
pub enum SpriteSheetError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),
    #[error("Invalid sprite '{name}': {reason}")]
    InvalidSprite { name: String, reason: String },
    #[error("Duplicate sprite name: {0}")]
    DuplicateName(String),
    #[error("Invalid canvas dimensions: {width}x{height}")]
    InvalidDimensions { width: u32, height: u32 },
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("Nothing to pack")]
    Empty,
    /// A fixed-size pack could not place every sprite.
    #[error("Sprites do not fit in {width}x{height} (placed {placed}/{total})")]
    DoesNotFit {
        width: u32,
        height: u32,
        placed: usize,
        total: usize,
    },
    #[error("Canvas {width}x{height} cannot grow any further")]
    CanvasOverflow { width: u32, height: u32 },
    #[error("Sprite sheet has not been packed yet")]
    NotPacked,
    #[error("Sprite '{0}' has no image data to draw")]
    MissingImage(String),
    #[error("Encoding error: {0}")]
    Encode(String),
}

pub type Result<T> = std::result::Result<T, SpriteSheetError>;
