use crate::model::Rect;
use crate::sprite::Sprite;

/// Discriminant of a [`Space`] node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpaceState {
    Empty,
    Split,
    Occupied,
}

/// A node of the partition tree laid over the canvas.
///
/// - `Empty` nodes are free and are the only ones that accept a sprite.
/// - `Split` nodes keep their original extent and own the sub-spaces carved
///   out of it when a sprite was placed.
/// - `Occupied` nodes hold one sprite (by index into the packer's sprite list)
///   and cover its padded footprint.
///
/// A node never goes back to `Empty` once it has been split.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Space {
    Empty(Rect),
    Split { extent: Rect, children: Vec<Space> },
    Occupied { extent: Rect, sprite: usize },
}

impl Space {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Space::Empty(Rect::new(x, y, w, h))
    }

    /// Empty tree covering a whole `width x height` canvas.
    pub fn root(width: u32, height: u32) -> Self {
        Self::new(0, 0, width, height)
    }

    pub fn extent(&self) -> Rect {
        match self {
            Space::Empty(extent)
            | Space::Split { extent, .. }
            | Space::Occupied { extent, .. } => *extent,
        }
    }

    pub fn state(&self) -> SpaceState {
        match self {
            Space::Empty(_) => SpaceState::Empty,
            Space::Split { .. } => SpaceState::Split,
            Space::Occupied { .. } => SpaceState::Occupied,
        }
    }

    pub fn children(&self) -> &[Space] {
        match self {
            Space::Split { children, .. } => children,
            _ => &[],
        }
    }

    /// Index of the sprite held by an `Occupied` node.
    pub fn sprite(&self) -> Option<usize> {
        match self {
            Space::Occupied { sprite, .. } => Some(*sprite),
            _ => None,
        }
    }

    /// Tries to place `sprite` (stored at `index` by the caller) somewhere in
    /// this subtree. Returns false when it does not fit; the tree is left
    /// unchanged in that case.
    pub fn try_place(&mut self, index: usize, sprite: &Sprite) -> bool {
        match self {
            Space::Occupied { .. } => false,
            Space::Split { children, .. } => {
                // Largest free region first; ties keep creation order.
                let mut order: Vec<usize> = (0..children.len()).collect();
                order.sort_by(|&a, &b| {
                    children[b]
                        .extent()
                        .area()
                        .cmp(&children[a].extent().area())
                });
                order
                    .into_iter()
                    .any(|i| children[i].try_place(index, sprite))
            }
            Space::Empty(extent) => {
                let extent = *extent;
                match carve(extent, index, sprite) {
                    Some(children) => {
                        *self = Space::Split { extent, children };
                        true
                    }
                    None => false,
                }
            }
        }
    }

    /// Visits every occupied node (depth first, children in creation order).
    pub fn for_each_occupied<F: FnMut(&Rect, usize)>(&self, f: &mut F) {
        match self {
            Space::Empty(_) => {}
            Space::Split { children, .. } => {
                for child in children {
                    child.for_each_occupied(f);
                }
            }
            Space::Occupied { extent, sprite } => f(extent, *sprite),
        }
    }

    /// `(padded extent, sprite index)` of every occupied node.
    pub fn placements(&self) -> Vec<(Rect, usize)> {
        let mut out = Vec::new();
        self.for_each_occupied(&mut |extent, sprite| out.push((*extent, sprite)));
        out
    }

    pub fn occupied_count(&self) -> usize {
        let mut n = 0;
        self.for_each_occupied(&mut |_, _| n += 1);
        n
    }
}

/// Splits a free `extent` around a sprite placed in its top-left corner.
///
/// Children, in order: the occupied footprint, the right remainder (full
/// height of `extent`) and the bottom remainder. The bottom remainder is only
/// as wide as the sprite's footprint, so the area below-right of the sprite
/// belongs to the right remainder alone. Zero-sized remainders are omitted.
fn carve(extent: Rect, index: usize, sprite: &Sprite) -> Option<Vec<Space>> {
    let pw = sprite.padded_width();
    let ph = sprite.padded_height();
    if extent.w < pw || extent.h < ph {
        return None;
    }
    let mut children = Vec::with_capacity(3);
    children.push(Space::Occupied {
        extent: Rect::new(extent.x, extent.y, pw, ph),
        sprite: index,
    });
    if extent.w > pw {
        children.push(Space::new(extent.x + pw, extent.y, extent.w - pw, extent.h));
    }
    if extent.h > ph {
        children.push(Space::new(extent.x, extent.y + ph, pw, extent.h - ph));
    }
    Some(children)
}
