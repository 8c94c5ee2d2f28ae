//! Background decoration sampling
//!
//! Everything here is a pure function of integer grid coordinates, so the
//! same patch of space always shows the same stars and celestial bodies no
//! matter when or how often it is drawn. Renderers usually go through
//! `Snapshot::stars` and `Snapshot::celestials`, which pick the cells
//! around the current camera.

use glam::Vec2;

/// Side of a star cell in world units
pub const STAR_CELL: f32 = 50.0;
/// Stars per square unit of world space
pub const STAR_DENSITY: f32 = 0.0005;
/// Side of a celestial-object cell in world units
pub const CELESTIAL_CELL: f32 = 1000.0;
/// Fraction of celestial cells that hold an object
pub const CELESTIAL_OCCUPANCY: f32 = 0.1;

/// Offset between the occupancy roll and the type roll of a celestial cell
const TYPE_ROLL_OFFSET: i32 = 1000;
const ASTEROID_VERTICES: usize = 6;

/// Deterministic hash of a cell coordinate into `[0, 1)` with 1/1000 resolution
pub fn pseudo_random(x: i32, y: i32) -> f32 {
    let seed = x
        .wrapping_mul(374_761_393)
        .wrapping_add(y.wrapping_mul(668_265_263));
    let seed = (seed ^ (seed >> 13)).wrapping_mul(1_274_126_177);
    ((seed & 0x7fff_ffff) % 1000) as f32 / 1000.0
}

/// A large background object occupying one celestial cell
#[derive(Debug, Clone, PartialEq)]
pub enum Decoration {
    Planet { radius: f32, hue: f32 },
    /// Irregular polygon; vertex radii in outline order
    Asteroid { outline: [f32; ASTEROID_VERTICES] },
    /// Radial glow with the given outer size
    Nebula { size: f32, hue: f32 },
}

/// Celestial object in cell `(i, j)` and its world-space center
pub fn celestial_at(i: i32, j: i32) -> Option<(Vec2, Decoration)> {
    let roll = pseudo_random(i, j);
    if roll >= CELESTIAL_OCCUPANCY {
        return None;
    }

    let center = Vec2::new(
        i as f32 * CELESTIAL_CELL + CELESTIAL_CELL / 2.0,
        j as f32 * CELESTIAL_CELL + CELESTIAL_CELL / 2.0,
    );
    let kind = pseudo_random(i.wrapping_add(TYPE_ROLL_OFFSET), j.wrapping_add(TYPE_ROLL_OFFSET));
    let decoration = if kind < 0.33 {
        Decoration::Planet {
            radius: 50.0 + roll * 50.0,
            hue: roll * 360.0,
        }
    } else if kind < 0.66 {
        let size = 20.0 + roll * 30.0;
        let mut outline = [0.0; ASTEROID_VERTICES];
        for (v, r) in outline.iter_mut().enumerate() {
            let jitter = pseudo_random(i.wrapping_add(v as i32), j.wrapping_add(v as i32));
            *r = size * (0.7 + jitter * 0.3);
        }
        Decoration::Asteroid { outline }
    } else {
        Decoration::Nebula {
            size: 200.0 + roll * 200.0,
            hue: roll * 360.0,
        }
    };
    Some((center, decoration))
}

/// World position of the star in star cell `(x, y)`, if it has one
pub fn star_at(x: i32, y: i32) -> Option<Vec2> {
    let roll = pseudo_random(x, y);
    if roll >= STAR_DENSITY * STAR_CELL * STAR_CELL {
        return None;
    }
    let origin = Vec2::new(x as f32, y as f32) * STAR_CELL;
    Some(origin + Vec2::splat(roll * STAR_CELL))
}

/// Indices of the cells that intersect `[min, max)` along one axis
pub fn cells_covering(min: f32, max: f32, cell: f32) -> std::ops::Range<i32> {
    let first = (min / cell).floor() as i32;
    let last = (max / cell).ceil() as i32;
    first..last
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_known_values_are_stable() {
        assert_eq!(pseudo_random(0, 0), 0.0);
        let a = pseudo_random(17, -42);
        assert_eq!(a, pseudo_random(17, -42));
        assert_ne!(pseudo_random(1, 0), pseudo_random(0, 1));
    }

    #[test]
    fn test_some_cells_hold_objects() {
        let occupied = (-20..20)
            .flat_map(|i| (-20..20).map(move |j| (i, j)))
            .filter(|&(i, j)| celestial_at(i, j).is_some())
            .count();
        // Roughly 10% of 1600 cells
        assert!(occupied > 40 && occupied < 400, "occupied = {}", occupied);
    }

    #[test]
    fn test_celestial_center_in_cell() {
        for i in -10..10 {
            for j in -10..10 {
                if let Some((center, _)) = celestial_at(i, j) {
                    assert_eq!(center.x, i as f32 * 1000.0 + 500.0);
                    assert_eq!(center.y, j as f32 * 1000.0 + 500.0);
                }
            }
        }
    }

    #[test]
    fn test_cells_covering_viewport() {
        assert_eq!(cells_covering(-75.0, 120.0, 50.0), -2..3);
        assert_eq!(cells_covering(0.0, 100.0, 50.0), 0..2);
    }

    proptest! {
        #[test]
        fn prop_sampling_is_pure(x in any::<i32>(), y in any::<i32>()) {
            let r = pseudo_random(x, y);
            prop_assert!((0.0..1.0).contains(&r));
            prop_assert_eq!(r, pseudo_random(x, y));
            prop_assert_eq!(celestial_at(x, y), celestial_at(x, y));
        }

        #[test]
        fn prop_star_stays_in_cell(x in -10_000i32..10_000, y in -10_000i32..10_000) {
            if let Some(star) = star_at(x, y) {
                let origin = Vec2::new(x as f32, y as f32) * STAR_CELL;
                prop_assert!(star.x >= origin.x && star.x < origin.x + STAR_CELL);
                prop_assert!(star.y >= origin.y && star.y < origin.y + STAR_CELL);
            }
        }
    }
}
