//! Demo billboard spawning.
//!
//! Scatters ships, enemies, projectiles and particles around the level's start
//! position so there is something to line up against the floor.

use crate::components::{Billboard, BillboardKind, Drift, Elevation, FloorPosition};
use crate::constants::*;
use crate::level::SpriteScatter;
use glam::{Vec2, Vec3};
use hecs::World;
use rand::Rng;
use tracing::debug;

/// Spawn template for one billboard kind
struct BillboardSpec {
    kind: BillboardKind,
    size: Vec2,
    color: Vec3,
    /// Share of the scatter count (weights are relative)
    weight: u32,
    flies: bool,
    drifts: bool,
}

const SPECS: &[BillboardSpec] = &[
    BillboardSpec {
        kind: BillboardKind::Ship,
        size: Vec2::new(SHIP_SPRITE_SIZE, SHIP_SPRITE_SIZE * 0.6),
        color: Vec3::new(0.9, 0.85, 0.2),
        weight: 2,
        flies: false,
        drifts: true,
    },
    BillboardSpec {
        kind: BillboardKind::Enemy,
        size: Vec2::new(ENEMY_SPRITE_SIZE, ENEMY_SPRITE_SIZE),
        color: Vec3::new(0.85, 0.2, 0.25),
        weight: 3,
        flies: true,
        drifts: false,
    },
    BillboardSpec {
        kind: BillboardKind::Projectile,
        size: Vec2::new(PARTICLE_SPRITE_SIZE * 1.5, PARTICLE_SPRITE_SIZE),
        color: Vec3::new(0.4, 0.9, 1.0),
        weight: 1,
        flies: true,
        drifts: true,
    },
    BillboardSpec {
        kind: BillboardKind::Particle,
        size: Vec2::new(PARTICLE_SPRITE_SIZE, PARTICLE_SPRITE_SIZE),
        color: Vec3::new(1.0, 1.0, 1.0),
        weight: 2,
        flies: true,
        drifts: false,
    },
];

fn pick_spec(rng: &mut impl Rng) -> &'static BillboardSpec {
    let total: u32 = SPECS.iter().map(|spec| spec.weight).sum();
    let mut roll = rng.gen_range(0..total);
    for spec in SPECS {
        if roll < spec.weight {
            return spec;
        }
        roll -= spec.weight;
    }
    &SPECS[0]
}

/// Scatter `scatter.count` billboards in a disc around `center`.
/// Returns the number spawned.
pub fn scatter_billboards(world: &mut World, scatter: &SpriteScatter, center: Vec2, rng: &mut impl Rng) -> usize {
    for _ in 0..scatter.count {
        let spec = pick_spec(rng);
        let angle = rng.gen_range(0.0..std::f32::consts::TAU);
        // sqrt keeps the disc evenly filled
        let radius = scatter.radius * rng.gen::<f32>().sqrt();
        let position = center + Vec2::from_angle(angle) * radius;

        let entity = world.spawn((
            FloorPosition::from(position),
            Billboard::new(spec.kind, spec.size, spec.color),
        ));
        if spec.flies {
            let _ = world.insert_one(entity, Elevation(rng.gen_range(0.0..MAX_SPRITE_ELEVATION)));
        }
        if spec.drifts {
            let heading = rng.gen_range(0.0..std::f32::consts::TAU);
            let speed = rng.gen_range(0.0..MAX_DRIFT_SPEED);
            let _ = world.insert_one(entity, Drift { velocity: Vec2::from_angle(heading) * speed });
        }
    }

    debug!(count = scatter.count, radius = scatter.radius, "scattered billboards");
    scatter.count
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_scatter_stays_in_radius() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(42);
        let scatter = SpriteScatter { count: 100, radius: 50.0, seed: 42 };
        let center = Vec2::new(256.0, 256.0);

        let spawned = scatter_billboards(&mut world, &scatter, center, &mut rng);
        assert_eq!(spawned, 100);

        let mut count = 0;
        for (_, pos) in world.query::<&FloorPosition>().iter() {
            assert!(Vec2::new(pos.x, pos.y).distance(center) <= 50.0 + 1e-3);
            count += 1;
        }
        assert_eq!(count, 100);
    }

    #[test]
    fn test_only_flyers_get_elevation() {
        let mut world = World::new();
        let mut rng = StdRng::seed_from_u64(9);
        let scatter = SpriteScatter { count: 60, radius: 80.0, seed: 9 };
        scatter_billboards(&mut world, &scatter, Vec2::ZERO, &mut rng);

        for (_, (billboard, elevation)) in world.query::<(&Billboard, Option<&Elevation>)>().iter() {
            if billboard.kind == BillboardKind::Ship {
                assert!(elevation.is_none());
            }
        }
    }
}
