use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::sprite::DEFAULT_PADDING;

/// Insertion orders. The packer is a first-fit-decreasing heuristic, so the
/// default (`AreaDesc`) is the one the placement tree is tuned for.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    AreaDesc,
    MaxSideDesc,
    HeightDesc,
    WidthDesc,
    NameAsc,
    None,
}

impl FromStr for SortOrder {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "area_desc" => Ok(Self::AreaDesc),
            "max_side_desc" => Ok(Self::MaxSideDesc),
            "height_desc" => Ok(Self::HeightDesc),
            "width_desc" => Ok(Self::WidthDesc),
            "name_asc" => Ok(Self::NameAsc),
            "none" => Ok(Self::None),
            _ => Err(()),
        }
    }
}

/// Text format of the coordinate file written next to the sheet image.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MetadataFormat {
    /// Lua table keyed by sprite name (`<name>.lua`).
    Lua,
    /// JSON hash keyed by sprite name (`<name>.json`).
    Json,
}

impl MetadataFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Lua => "lua",
            Self::Json => "json",
        }
    }
}

impl FromStr for MetadataFormat {
    type Err = ();
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "lua" => Ok(Self::Lua),
            "json" | "json-hash" => Ok(Self::Json),
            _ => Err(()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SheetConfig {
    /// Transparent pixels on every side of each sprite.
    #[serde(default = "default_padding")]
    pub padding: u32,
    /// Fixed canvas width. Must be set together with `height`.
    #[serde(default)]
    pub width: Option<u32>,
    /// Fixed canvas height. Must be set together with `width`.
    #[serde(default)]
    pub height: Option<u32>,
    #[serde(default = "default_sort_order")]
    pub sort_order: SortOrder,
    #[serde(default = "default_metadata_format")]
    pub metadata_format: MetadataFormat,
    /// Evaluate growth candidates in parallel when feature "parallel" is on.
    #[serde(default)]
    pub parallel: bool,
}

impl Default for SheetConfig {
    fn default() -> Self {
        Self {
            padding: default_padding(),
            width: None,
            height: None,
            sort_order: default_sort_order(),
            metadata_format: default_metadata_format(),
            parallel: false,
        }
    }
}

impl SheetConfig {
    /// Fixed canvas size, if both dimensions were given.
    pub fn fixed_size(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) => Some((w, h)),
            _ => None,
        }
    }

    /// Validates the configuration parameters.
    ///
    /// Returns an error if only one of `width`/`height` is set, or if a fixed
    /// dimension is zero.
    pub fn validate(&self) -> crate::error::Result<()> {
        use crate::error::SpriteSheetError;

        match (self.width, self.height) {
            (None, None) => Ok(()),
            (Some(_), None) => Err(SpriteSheetError::InvalidConfig(
                "if you set width you also have to set height".into(),
            )),
            (None, Some(_)) => Err(SpriteSheetError::InvalidConfig(
                "if you set height you also have to set width".into(),
            )),
            (Some(w), Some(h)) if w == 0 || h == 0 => {
                Err(SpriteSheetError::InvalidDimensions { width: w, height: h })
            }
            (Some(_), Some(_)) => Ok(()),
        }
    }

    /// Create a fluent builder for `SheetConfig`.
    pub fn builder() -> SheetConfigBuilder {
        SheetConfigBuilder::new()
    }
}

fn default_padding() -> u32 {
    DEFAULT_PADDING
}
fn default_sort_order() -> SortOrder {
    SortOrder::AreaDesc
}
fn default_metadata_format() -> MetadataFormat {
    MetadataFormat::Lua
}

/// Builder for `SheetConfig`.
#[derive(Debug, Default, Clone)]
pub struct SheetConfigBuilder {
    cfg: SheetConfig,
}

impl SheetConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: SheetConfig::default(),
        }
    }
    pub fn padding(mut self, v: u32) -> Self {
        self.cfg.padding = v;
        self
    }
    pub fn fixed_size(mut self, w: u32, h: u32) -> Self {
        self.cfg.width = Some(w);
        self.cfg.height = Some(h);
        self
    }
    pub fn sort_order(mut self, v: SortOrder) -> Self {
        self.cfg.sort_order = v;
        self
    }
    pub fn metadata_format(mut self, v: MetadataFormat) -> Self {
        self.cfg.metadata_format = v;
        self
    }
    pub fn parallel(mut self, v: bool) -> Self {
        self.cfg.parallel = v;
        self
    }
    pub fn build(self) -> SheetConfig {
        self.cfg
    }
}
