//! Core library for packing sprites into a single sprite sheet.
//!
//! - Placement: a recursive partition tree ([`Space`]) filled largest sprite
//!   first, preferring the largest free region at every level
//! - Sizing: the canvas starts from an area estimate and doubles its smaller
//!   side until every sprite fits, or stays fixed when a size is requested
//! - Output: an RGBA canvas plus per-sprite coordinates (absolute and
//!   normalized), exportable as a Lua table or a JSON hash
//!
//! Quick example:
//! ```ignore
//! use image::ImageReader;
//! use spritesheet_core::{SheetConfig, Sprite, SpritePacker, to_lua};
//! # fn main() -> anyhow::Result<()> {
//! let cfg = SheetConfig::default();
//! let sprites = vec![
//!     Sprite::from_image("a", ImageReader::open("a.png")?.decode()?, cfg.padding)?,
//!     Sprite::from_image("b", ImageReader::open("b.png")?.decode()?, cfg.padding)?,
//! ];
//! let mut packer = SpritePacker::new(sprites, cfg)?;
//! packer.pack()?;
//! packer.compose()?.save("sheet.png")?;
//! std::fs::write("sheet.lua", to_lua(&packer.metadata()?))?;
//! # Ok(()) }
//! ```

pub mod compositing;
pub mod config;
pub mod error;
pub mod export;
pub mod model;
pub mod packer;
pub mod sprite;

pub use config::*;
pub use error::*;
pub use export::*;
pub use model::*;
pub use packer::*;
pub use sprite::*;

/// Convenience prelude for common types and functions.
/// Importing `spritesheet_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{MetadataFormat, SheetConfig, SheetConfigBuilder, SortOrder};
    pub use crate::error::{Result, SpriteSheetError};
    pub use crate::export::{to_json_hash, to_json_string, to_lua};
    pub use crate::model::{Rect, SheetMetadata, SheetStats, SpriteRecord};
    pub use crate::packer::{Space, SpaceState, SpritePacker};
    pub use crate::sprite::{DEFAULT_PADDING, Sprite};
}
