//! The fixed match arena: ground, perimeter walls, cover, spawns, routes.

use engine_core::Vec3;
use physics::PhysicsWorld;
use rand::rngs::StdRng;
use rand::Rng;

use crate::entity::Team;

/// Arena half-width. The playfield spans -50..50 on both axes.
pub const ARENA_HALF: f32 = 50.0;
pub const WALL_HEIGHT: f32 = 10.0;
pub const WALL_THICKNESS: f32 = 2.0;
/// Cover boxes scattered around the mid field.
pub const COVER_COUNT: usize = 25;
/// The plant zone sits at the arena center.
pub const PLANT_RADIUS: f32 = 8.0;
/// Spawn height; bodies drop onto the ground on the first steps.
pub const SPAWN_HEIGHT: f32 = 3.0;

/// Static layout of the arena, built once per match.
pub struct Arena {
    pub plant_center: Vec3,
}

impl Arena {
    /// Build the arena geometry into the physics world. Cover placement
    /// uses the match RNG, so a fixed seed reproduces the layout.
    pub fn build(physics: &mut PhysicsWorld, rng: &mut StdRng) -> Self {
        // Ground slab, top surface at y = 0.
        physics.add_static_cuboid(
            Vec3::new(0.0, -0.5, 0.0),
            Vec3::new(ARENA_HALF, 0.5, ARENA_HALF),
        );

        // Perimeter walls.
        let wall_y = WALL_HEIGHT / 2.0;
        let long = Vec3::new(ARENA_HALF, WALL_HEIGHT / 2.0, WALL_THICKNESS / 2.0);
        let tall = Vec3::new(WALL_THICKNESS / 2.0, WALL_HEIGHT / 2.0, ARENA_HALF);
        physics.add_static_cuboid(Vec3::new(0.0, wall_y, -ARENA_HALF), long);
        physics.add_static_cuboid(Vec3::new(0.0, wall_y, ARENA_HALF), long);
        physics.add_static_cuboid(Vec3::new(-ARENA_HALF, wall_y, 0.0), tall);
        physics.add_static_cuboid(Vec3::new(ARENA_HALF, wall_y, 0.0), tall);

        // Cover boxes, keeping the plant zone and both spawn lines clear.
        for _ in 0..COVER_COUNT {
            let (x, z) = loop {
                let x = (rng.gen::<f32>() - 0.5) * 80.0;
                let z = (rng.gen::<f32>() - 0.5) * 80.0;
                let in_plant_zone = x.abs() < 12.0 && z.abs() < 12.0;
                let in_defense_spawn = x < -30.0 && z.abs() < 15.0;
                let in_attack_spawn = x > 30.0 && z.abs() < 15.0;
                if !(in_plant_zone || in_defense_spawn || in_attack_spawn) {
                    break (x, z);
                }
            };
            let size = 2.0 + rng.gen::<f32>() * 3.0;
            let height = 3.0 + rng.gen::<f32>() * 4.0;
            physics.add_static_cuboid(
                Vec3::new(x, height / 2.0, z),
                Vec3::new(size / 2.0, height / 2.0, size / 2.0),
            );
        }

        Self {
            plant_center: Vec3::ZERO,
        }
    }

    /// Is this position inside the plant zone? Horizontal distance only,
    /// so jumping does not leave the site.
    pub fn in_plant_zone(&self, position: Vec3) -> bool {
        let dx = position.x - self.plant_center.x;
        let dz = position.z - self.plant_center.z;
        (dx * dx + dz * dz).sqrt() <= PLANT_RADIUS
    }

    /// Fixed spawn for the human: center of the team's spawn line.
    pub fn player_spawn(team: Team) -> Vec3 {
        Vec3::new(side_x(team) * 40.0, SPAWN_HEIGHT, 0.0)
    }

    /// Scattered spawn for a bot along the team's back line.
    pub fn bot_spawn(team: Team, rng: &mut StdRng) -> Vec3 {
        let x = side_x(team) * (40.0 - rng.gen::<f32>() * 10.0);
        let z = -15.0 + rng.gen::<f32>() * 30.0;
        Vec3::new(x, SPAWN_HEIGHT, z)
    }

    /// Patrol route for a team: push toward the center, sweep the flanks.
    pub fn patrol_route(team: Team) -> [Vec3; 5] {
        let sx = side_x(team);
        [
            Vec3::new(sx * 40.0, 2.0, 0.0),
            Vec3::new(sx * 20.0, 2.0, 0.0),
            Vec3::new(sx * 20.0, 2.0, 20.0),
            Vec3::new(sx * 20.0, 2.0, -20.0),
            Vec3::new(0.0, 2.0, 0.0),
        ]
    }
}

/// Defense owns the -x half, Attack the +x half.
fn side_x(team: Team) -> f32 {
    match team {
        Team::Defense => -1.0,
        Team::Attack => 1.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn plant_zone_is_centered_and_bounded() {
        let mut physics = PhysicsWorld::new(-30.0, 1.0 / 60.0);
        let mut rng = StdRng::seed_from_u64(1);
        let arena = Arena::build(&mut physics, &mut rng);

        assert!(arena.in_plant_zone(Vec3::new(0.0, 1.5, 0.0)));
        assert!(arena.in_plant_zone(Vec3::new(7.9, 0.0, 0.0)));
        assert!(!arena.in_plant_zone(Vec3::new(8.1, 0.0, 0.0)));
        // Height never matters.
        assert!(arena.in_plant_zone(Vec3::new(0.0, 50.0, 5.0)));
    }

    #[test]
    fn spawns_sit_on_opposite_sides() {
        assert!(Arena::player_spawn(Team::Defense).x < 0.0);
        assert!(Arena::player_spawn(Team::Attack).x > 0.0);

        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..20 {
            let d = Arena::bot_spawn(Team::Defense, &mut rng);
            assert!(d.x <= -30.0 && d.x >= -40.0);
            assert!(d.z.abs() <= 15.0);

            let a = Arena::bot_spawn(Team::Attack, &mut rng);
            assert!(a.x >= 30.0 && a.x <= 40.0);
        }
    }

    #[test]
    fn patrol_routes_mirror_and_converge_on_the_site() {
        let defense = Arena::patrol_route(Team::Defense);
        let attack = Arena::patrol_route(Team::Attack);
        assert_eq!(defense.len(), attack.len());
        for (d, a) in defense.iter().zip(attack.iter()) {
            assert_eq!(d.x, -a.x);
            assert_eq!(d.z, a.z);
        }
        // Both routes end at the plant site.
        assert_eq!(defense[4], Vec3::new(0.0, 2.0, 0.0));
    }

    #[test]
    fn cover_keeps_the_plant_zone_clear() {
        let mut physics = PhysicsWorld::new(-30.0, 1.0 / 60.0);
        let mut rng = StdRng::seed_from_u64(99);
        let arena = Arena::build(&mut physics, &mut rng);
        physics.update_query_pipeline();

        // A ray straight down over the site center must hit the ground,
        // not a cover box (their tops sit between 3 and 7 units up).
        let hit = physics
            .raycast(arena.plant_center + Vec3::new(0.0, 20.0, 0.0), Vec3::new(0.0, -1.0, 0.0), 30.0)
            .unwrap();
        assert!((hit.point.y - 0.0).abs() < 1e-3);
    }
}
