//! Billboard placement: turns floor-world entities into screen quads.

use crate::camera::CameraState;
use crate::components::{Billboard, BillboardKind, Drift, Elevation, FloorPosition};
use crate::constants::MIN_SPRITE_EXTENT;
use crate::projection::{project_world_to_screen, ScreenProjection};
use glam::{Vec2, Vec3};
use hecs::World;

/// Screen-space quad ready for the sprite batcher
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpriteQuad {
    /// Top-left corner in pixels
    pub position: Vec2,
    pub size: Vec2,
    pub color: Vec3,
    pub kind: BillboardKind,
    /// Screen row where the sprite touches the floor; larger is nearer
    pub depth: f32,
}

/// Size and lift a billboard by its projection's distance scale.
///
/// The sprite stands on its floor contact point (bottom centre), raised by
/// `elevation` scaled the same way as its size.
pub fn sprite_quad(projection: &ScreenProjection, billboard: &Billboard, elevation: f32) -> Option<SpriteQuad> {
    let scale = projection.distance_scale;
    let size = billboard.size * scale;
    // Inside the clip margin the scale goes negative; nothing sensible to draw
    if scale <= 0.0 || size.x < MIN_SPRITE_EXTENT || size.y < MIN_SPRITE_EXTENT {
        return None;
    }

    let anchor_y = projection.screen_y - elevation * scale;
    Some(SpriteQuad {
        position: Vec2::new(projection.screen_x - size.x * 0.5, anchor_y - size.y),
        size,
        color: billboard.color,
        kind: billboard.kind,
        depth: projection.screen_y,
    })
}

fn on_screen(quad: &SpriteQuad, camera: &CameraState) -> bool {
    let max = quad.position + quad.size;
    max.x >= 0.0
        && max.y >= 0.0
        && quad.position.x <= camera.viewport_width
        && quad.position.y <= camera.viewport_height
}

/// Project every billboard for this frame, back to front.
///
/// Anything culled simply isn't in the list; next frame re-evaluates it from
/// scratch.
pub fn collect_sprites(world: &World, camera: &CameraState) -> Vec<SpriteQuad> {
    puffin::profile_function!();

    let mut quads: Vec<SpriteQuad> = world
        .query::<(&FloorPosition, &Billboard, Option<&Elevation>)>()
        .iter()
        .filter_map(|(_, (pos, billboard, elevation))| {
            let projection = project_world_to_screen(camera, pos.x, pos.y)?;
            let elevation = elevation.map_or(0.0, |e| e.0);
            sprite_quad(&projection, billboard, elevation)
        })
        .filter(|quad| on_screen(quad, camera))
        .collect();

    // Horizon first so nearer sprites paint over farther ones
    quads.sort_by(|a, b| a.depth.total_cmp(&b.depth));
    quads
}

/// Move drifting entities across the floor.
pub fn update_drift(world: &mut World, dt: f32) {
    for (_, (pos, drift)) in world.query_mut::<(&mut FloorPosition, &Drift)>() {
        pos.x += drift.velocity.x * dt;
        pos.y += drift.velocity.y * dt;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn camera() -> CameraState {
        CameraState::new(Vec2::new(256.0, 256.0), 15.0, 90.0, 45.0, 48.0, Vec2::new(320.0, 270.0)).unwrap()
    }

    fn ship() -> Billboard {
        Billboard::new(BillboardKind::Ship, Vec2::new(40.0, 20.0), Vec3::ONE)
    }

    #[test]
    fn test_quad_stands_on_contact_point() {
        let projection = ScreenProjection { screen_x: 100.0, screen_y: 200.0, distance_scale: 0.5 };
        let quad = sprite_quad(&projection, &ship(), 0.0).unwrap();

        assert_eq!(quad.size, Vec2::new(20.0, 10.0));
        assert_eq!(quad.position, Vec2::new(90.0, 190.0));
        assert_eq!(quad.depth, 200.0);
    }

    #[test]
    fn test_elevation_scales_with_distance() {
        let near = ScreenProjection { screen_x: 100.0, screen_y: 250.0, distance_scale: 1.0 };
        let far = ScreenProjection { screen_x: 100.0, screen_y: 60.0, distance_scale: 0.25 };

        let grounded = sprite_quad(&near, &ship(), 0.0).unwrap();
        let lifted = sprite_quad(&near, &ship(), 20.0).unwrap();
        assert_eq!(grounded.position.y - lifted.position.y, 20.0);

        let grounded = sprite_quad(&far, &ship(), 0.0).unwrap();
        let lifted = sprite_quad(&far, &ship(), 20.0).unwrap();
        assert_eq!(grounded.position.y - lifted.position.y, 5.0);
    }

    #[test]
    fn test_non_positive_scale_draws_nothing() {
        let at_horizon = ScreenProjection { screen_x: 100.0, screen_y: 48.0, distance_scale: 0.0 };
        let in_margin = ScreenProjection { screen_x: 100.0, screen_y: 30.0, distance_scale: -0.08 };
        assert_eq!(sprite_quad(&at_horizon, &ship(), 0.0), None);
        assert_eq!(sprite_quad(&in_margin, &ship(), 0.0), None);
    }

    #[test]
    fn test_collect_sorts_far_to_near_and_culls() {
        let camera = camera();
        let mut world = World::new();
        // Straight ahead is -y for facing 90
        world.spawn((FloorPosition::new(256.0, 226.0), ship()));
        world.spawn((FloorPosition::new(256.0, 136.0), ship()));
        // Behind the camera
        world.spawn((FloorPosition::new(256.0, 300.0), ship()));
        // No billboard, never drawn
        world.spawn((FloorPosition::new(256.0, 200.0),));

        let quads = collect_sprites(&world, &camera);
        assert_eq!(quads.len(), 2);
        assert!(quads[0].depth < quads[1].depth);
        assert!(quads[0].size.x < quads[1].size.x);
    }

    #[test]
    fn test_collect_applies_elevation() {
        let camera = camera();
        let mut world = World::new();
        world.spawn((FloorPosition::new(256.0, 206.0), ship()));
        world.spawn((FloorPosition::new(256.0, 206.0), ship(), Elevation(30.0)));

        let quads = collect_sprites(&world, &camera);
        assert_eq!(quads.len(), 2);
        let (low, high) = if quads[0].position.y > quads[1].position.y {
            (quads[0], quads[1])
        } else {
            (quads[1], quads[0])
        };
        assert_eq!(low.depth, high.depth);
        assert!(high.position.y < low.position.y);
    }

    #[test]
    fn test_drift_moves_entities() {
        let mut world = World::new();
        let e = world.spawn((FloorPosition::new(0.0, 0.0), Drift { velocity: Vec2::new(10.0, -4.0) }));
        update_drift(&mut world, 0.5);

        let pos = *world.get::<&FloorPosition>(e).unwrap();
        assert_eq!(pos, FloorPosition::new(5.0, -2.0));
    }
}
