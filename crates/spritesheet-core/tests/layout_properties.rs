use rand::{Rng, SeedableRng};
use spritesheet_core::prelude::*;
use std::collections::HashMap;

fn random_items(seed: u64, count: usize, max_side: u32) -> Vec<(String, u32, u32)> {
    let mut rng = rand::rngs::StdRng::seed_from_u64(seed);
    (0..count)
        .map(|i| {
            (
                format!("s{i}"),
                rng.gen_range(1..=max_side),
                rng.gen_range(1..=max_side),
            )
        })
        .collect()
}

/// Structural checks on the whole tree: children inside their parent and
/// pairwise disjoint, split nodes non-empty, occupied nodes sized to their
/// sprite.
fn check_tree(space: &Space, sprites: &[Sprite]) {
    match space {
        Space::Empty(_) => {}
        Space::Occupied { extent, sprite } => {
            let s = &sprites[*sprite];
            assert_eq!(extent.w, s.padded_width());
            assert_eq!(extent.h, s.padded_height());
        }
        Space::Split { extent, children } => {
            assert!(!children.is_empty(), "split node without children");
            assert_eq!(children[0].state(), SpaceState::Occupied);
            for (i, a) in children.iter().enumerate() {
                assert!(extent.contains(&a.extent()), "child escapes parent");
                assert!(!a.extent().is_empty(), "zero-sized child");
                for b in &children[i + 1..] {
                    assert!(!a.extent().intersects(&b.extent()), "siblings overlap");
                }
                check_tree(a, sprites);
            }
        }
    }
}

fn check_layout(p: &SpritePacker, padding: u32) {
    let canvas = Rect::new(0, 0, p.width(), p.height());
    let placed = p.placements().expect("packed");
    assert_eq!(placed.len(), p.sprites().len(), "every sprite placed once");

    for (i, (a, _)) in placed.iter().enumerate() {
        assert!(canvas.contains(a));
        assert!(a.right() < p.width() && a.bottom() < p.height(), "{a:?} past canvas edge");
        for (b, _) in &placed[i + 1..] {
            assert!(!a.intersects(b), "footprints overlap: {a:?} {b:?}");
        }
    }

    let by_name: HashMap<&str, &Sprite> = p.sprites().iter().map(|s| (s.name(), s)).collect();
    let meta = p.metadata().expect("metadata");
    assert_eq!(meta.len(), p.sprites().len());
    for r in &meta.sprites {
        let s = by_name[r.name.as_str()];
        assert!(r.w >= s.width() && r.h >= s.height());
        assert_eq!((r.w, r.h), (s.width(), s.height()));
        assert!(r.x >= padding && r.y >= padding);
        assert_eq!(r.norm_x, r.x as f32 / p.width() as f32);
        assert_eq!(r.norm_y, r.y as f32 / p.height() as f32);
        assert_eq!(r.norm_w, r.w as f32 / p.width() as f32);
        assert_eq!(r.norm_h, r.h as f32 / p.height() as f32);
    }
    check_tree(p.root().expect("tree"), p.sprites());
}

#[test]
fn rect_edges_and_overlap() {
    let a = Rect::new(2, 3, 10, 4);
    assert_eq!((a.right(), a.bottom()), (11, 6));
    // touching edges share no pixel
    assert!(!a.intersects(&Rect::new(a.right() + 1, 3, 5, 5)));
    assert!(!a.intersects(&Rect::new(2, a.bottom() + 1, 5, 5)));
    assert!(a.intersects(&Rect::new(a.right(), a.bottom(), 1, 1)));
    assert!(!a.intersects(&Rect::new(4, 4, 0, 3)));
    assert_eq!(a.inset(1), Rect::new(3, 4, 8, 2));
}

#[test]
fn random_sets_pack_without_overlap() {
    for (seed, padding) in [(1u64, 0u32), (2, 1), (3, 2), (4, 5)] {
        let items = random_items(seed, 120, 48);
        let cfg = SheetConfig::builder().padding(padding).build();
        let mut p = SpritePacker::from_layout(items, cfg).expect("packer");
        p.pack().expect("pack");
        check_layout(&p, padding);
    }
}

#[test]
fn skewed_sizes_pack_without_overlap() {
    let mut items = random_items(9, 60, 12);
    items.push(("banner".into(), 300, 6));
    items.push(("pillar".into(), 6, 200));
    let mut p = SpritePacker::from_layout(items, SheetConfig::default()).expect("packer");
    p.pack().expect("pack");
    check_layout(&p, 2);
    assert!(p.width() >= 304);
    assert!(p.height() >= 204);
}

#[test]
fn canvas_stays_power_of_two_when_growing() {
    let items = random_items(17, 80, 64);
    let mut p = SpritePacker::from_layout(items, SheetConfig::default()).expect("packer");
    p.pack().expect("pack");
    assert!(p.width().is_power_of_two());
    assert!(p.height().is_power_of_two());
    let (ew, eh) = p.estimated_size();
    assert!(p.width() >= ew && p.height() >= eh);
}

#[test]
fn stats_reflect_layout() {
    let mut p = SpritePacker::from_layout(random_items(23, 50, 30), SheetConfig::default())
        .expect("packer");
    p.pack().expect("pack");
    let stats = p.stats().expect("stats");
    let padded: u64 = p.sprites().iter().map(Sprite::padded_area).sum();
    assert_eq!(stats.sprites, 50);
    assert_eq!(stats.used_area, padded);
    assert_eq!(stats.canvas_area, p.width() as u64 * p.height() as u64);
    assert!(stats.occupancy > 0.0 && stats.occupancy <= 1.0);
    assert!(stats.waste_percentage() >= 0.0 && stats.waste_percentage() < 100.0);
    assert_eq!(stats.attempts, p.attempts());
    assert!(stats.summary().contains("Sprites: 50"));
}
