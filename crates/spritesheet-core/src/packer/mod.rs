use std::collections::HashSet;

use tracing::{debug, info, instrument};

use crate::config::{SheetConfig, SortOrder};
use crate::error::{Result, SpriteSheetError};
use crate::model::{SheetStats, Rect};
use crate::sprite::Sprite;

pub mod space;

pub use space::{Space, SpaceState};

/// Side length of the first canvas guess.
pub const INITIAL_SIZE: u32 = 32;
/// Headroom over the summed padded sprite area when guessing the canvas size.
pub const AREA_SLACK: f64 = 1.1;

/// Packs a set of sprites into one sheet.
///
/// The packer owns the sprites (sorted into insertion order) and, once a pack
/// succeeds, the placement tree. Occupied nodes refer to sprites by their
/// index in [`SpritePacker::sprites`].
#[derive(Debug, Clone)]
pub struct SpritePacker {
    config: SheetConfig,
    sprites: Vec<Sprite>,
    estimated: (u32, u32),
    width: u32,
    height: u32,
    root: Option<Space>,
    attempts: u32,
}

impl SpritePacker {
    /// Validates the inputs, guesses an initial canvas size and sorts the
    /// sprites into insertion order. Nothing is placed until a `pack*` call.
    ///
    /// Every sprite must carry the configured padding.
    pub fn new(mut sprites: Vec<Sprite>, config: SheetConfig) -> Result<Self> {
        config.validate()?;
        if sprites.is_empty() {
            return Err(SpriteSheetError::Empty);
        }
        let mut seen = HashSet::with_capacity(sprites.len());
        for s in &sprites {
            if s.padding() != config.padding {
                return Err(SpriteSheetError::InvalidSprite {
                    name: s.name().to_string(),
                    reason: format!(
                        "padding {} differs from configured {}",
                        s.padding(),
                        config.padding
                    ),
                });
            }
            if !seen.insert(s.name()) {
                return Err(SpriteSheetError::DuplicateName(s.name().to_string()));
            }
        }
        let (width, height) = estimate_size(&sprites);
        sort_sprites(&mut sprites, config.sort_order);
        debug!(
            sprites = sprites.len(),
            width, height, "estimated initial canvas"
        );
        Ok(Self {
            config,
            sprites,
            estimated: (width, height),
            width,
            height,
            root: None,
            attempts: 0,
        })
    }

    /// Layout-only packer from `(name, width, height)` triples, padded with
    /// `config.padding`.
    pub fn from_layout<K: Into<String>>(inputs: Vec<(K, u32, u32)>, config: SheetConfig) -> Result<Self> {
        let sprites = inputs
            .into_iter()
            .map(|(k, w, h)| Sprite::new(k, w, h, config.padding))
            .collect::<Result<Vec<_>>>()?;
        Self::new(sprites, config)
    }

    pub fn config(&self) -> &SheetConfig {
        &self.config
    }
    /// Sprites in insertion order.
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }
    pub fn width(&self) -> u32 {
        self.width
    }
    pub fn height(&self) -> u32 {
        self.height
    }
    /// Canvas size guessed from the summed sprite area.
    pub fn estimated_size(&self) -> (u32, u32) {
        self.estimated
    }
    /// Placement tree of the last successful pack.
    pub fn root(&self) -> Option<&Space> {
        self.root.as_ref()
    }
    pub fn is_packed(&self) -> bool {
        self.root.is_some()
    }
    /// Trees built by the last successful pack.
    pub fn attempts(&self) -> u32 {
        self.attempts
    }

    /// Packs according to the configuration: fixed size when one was given,
    /// otherwise grow until everything fits.
    pub fn pack_configured(&mut self) -> Result<()> {
        if let Some((w, h)) = self.config.fixed_size() {
            return self.pack_fixed(w, h);
        }
        #[cfg(feature = "parallel")]
        {
            if self.config.parallel {
                return self.pack_parallel(rayon::current_num_threads().max(2));
            }
        }
        self.pack()
    }

    /// Packs every sprite, growing the canvas until a full pass succeeds.
    ///
    /// Each pass starts from an empty tree. Between passes the smaller side
    /// is doubled (width when square).
    #[instrument(skip_all)]
    pub fn pack(&mut self) -> Result<()> {
        let (mut w, mut h) = self.estimated;
        let mut attempts = 1;
        loop {
            match self.attempt(w, h) {
                Ok(tree) => {
                    self.adopt(w, h, tree, attempts);
                    return Ok(());
                }
                Err(placed) => {
                    debug!(width = w, height = h, placed, total = self.sprites.len(), "canvas too small");
                    (w, h) = grow(w, h)?;
                    attempts += 1;
                }
            }
        }
    }

    /// Packs every sprite into exactly `width x height`, without growing.
    ///
    /// On failure the packer keeps its previous size and tree.
    #[instrument(skip(self))]
    pub fn pack_fixed(&mut self, width: u32, height: u32) -> Result<()> {
        if width == 0 || height == 0 {
            return Err(SpriteSheetError::InvalidDimensions { width, height });
        }
        match self.attempt(width, height) {
            Ok(tree) => {
                self.adopt(width, height, tree, 1);
                Ok(())
            }
            Err(placed) => Err(SpriteSheetError::DoesNotFit {
                width,
                height,
                placed,
                total: self.sprites.len(),
            }),
        }
    }

    /// Like [`SpritePacker::pack`], but tries `batch` consecutive sizes of the
    /// growth sequence at once and keeps the earliest that fits, so the
    /// resulting layout is the same as the sequential one.
    #[cfg(feature = "parallel")]
    #[instrument(skip(self))]
    pub fn pack_parallel(&mut self, batch: usize) -> Result<()> {
        use rayon::prelude::*;

        let batch = batch.max(1);
        let (mut w, mut h) = self.estimated;
        let mut tried = 0u32;
        loop {
            let mut sizes = Vec::with_capacity(batch);
            sizes.push((w, h));
            while sizes.len() < batch {
                match grow(w, h) {
                    Ok(next) => {
                        (w, h) = next;
                        sizes.push(next);
                    }
                    Err(_) => break,
                }
            }
            let results: Vec<Option<Space>> = sizes
                .par_iter()
                .map(|&(cw, ch)| self.attempt(cw, ch).ok())
                .collect();
            let first = results
                .into_iter()
                .enumerate()
                .find_map(|(i, tree)| tree.map(|t| (i, t)));
            if let Some((pos, tree)) = first {
                let (cw, ch) = sizes[pos];
                self.adopt(cw, ch, tree, tried + pos as u32 + 1);
                return Ok(());
            }
            tried += sizes.len() as u32;
            debug!(width = w, height = h, tried, "candidate batch failed");
            (w, h) = grow(w, h)?;
        }
    }

    /// One pass at a fixed size: a complete tree, or how many sprites were
    /// placed before the first one that did not fit.
    fn attempt(&self, width: u32, height: u32) -> std::result::Result<Space, usize> {
        let mut root = Space::root(width, height);
        for (index, sprite) in self.sprites.iter().enumerate() {
            if !root.try_place(index, sprite) {
                return Err(index);
            }
        }
        Ok(root)
    }

    fn adopt(&mut self, width: u32, height: u32, tree: Space, attempts: u32) {
        self.width = width;
        self.height = height;
        self.root = Some(tree);
        self.attempts = attempts;
        info!(width, height, sprites = self.sprites.len(), attempts, "sprites packed");
    }

    /// Padded footprint and sprite of every placement.
    pub fn placements(&self) -> Result<Vec<(Rect, &Sprite)>> {
        let root = self.root.as_ref().ok_or(SpriteSheetError::NotPacked)?;
        Ok(root
            .placements()
            .into_iter()
            .map(|(extent, i)| (extent, &self.sprites[i]))
            .collect())
    }

    /// Computes packing statistics for the current sheet.
    pub fn stats(&self) -> Result<SheetStats> {
        let placed = self.placements()?;
        let used_area: u64 = placed.iter().map(|(r, _)| r.area()).sum();
        let canvas_area = self.width as u64 * self.height as u64;
        let occupancy = if canvas_area > 0 {
            used_area as f64 / canvas_area as f64
        } else {
            0.0
        };
        Ok(SheetStats {
            width: self.width,
            height: self.height,
            sprites: placed.len(),
            used_area,
            canvas_area,
            occupancy,
            attempts: self.attempts,
        })
    }
}

/// Guesses a canvas size: starting at 32x32, doubles width and height in
/// turn until the canvas holds the summed padded area plus 10%.
pub fn estimate_size(sprites: &[Sprite]) -> (u32, u32) {
    let area: u64 = sprites.iter().map(Sprite::padded_area).sum();
    let needed = area as f64 * AREA_SLACK;
    let mut w = INITIAL_SIZE as u64;
    let mut h = INITIAL_SIZE as u64;
    let mut grow_width = true;
    while needed > (w * h) as f64 {
        if grow_width {
            w *= 2;
        } else {
            h *= 2;
        }
        grow_width = !grow_width;
        if w > u32::MAX as u64 / 2 || h > u32::MAX as u64 / 2 {
            break;
        }
    }
    (w as u32, h as u32)
}

/// Next canvas in the growth sequence: the smaller side doubles, width first
/// when square.
pub fn grow(width: u32, height: u32) -> Result<(u32, u32)> {
    let overflow = SpriteSheetError::CanvasOverflow { width, height };
    if height < width {
        Ok((width, height.checked_mul(2).ok_or(overflow)?))
    } else {
        Ok((width.checked_mul(2).ok_or(overflow)?, height))
    }
}

/// Stable sort into insertion order; ties fall back to the name.
pub fn sort_sprites(sprites: &mut [Sprite], order: SortOrder) {
    match order {
        SortOrder::None => {}
        SortOrder::NameAsc => sprites.sort_by(|a, b| a.name().cmp(b.name())),
        SortOrder::AreaDesc => sprites.sort_by(|a, b| {
            b.area()
                .cmp(&a.area())
                .then_with(|| a.name().cmp(b.name()))
        }),
        SortOrder::MaxSideDesc => sprites.sort_by(|a, b| {
            b.width()
                .max(b.height())
                .cmp(&a.width().max(a.height()))
                .then_with(|| a.name().cmp(b.name()))
        }),
        SortOrder::HeightDesc => {
            sprites.sort_by(|a, b| b.height().cmp(&a.height()).then_with(|| a.name().cmp(b.name())))
        }
        SortOrder::WidthDesc => {
            sprites.sort_by(|a, b| b.width().cmp(&a.width()).then_with(|| a.name().cmp(b.name())))
        }
    }
}
