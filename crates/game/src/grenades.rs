//! Thrown grenades: lobbed physics bodies on a fixed fuse.

use engine_core::{Countdown, Entity, Vec3};
use physics::{PhysicsWorld, RigidBodyHandle};

use crate::weapons::WeaponKind;

pub const THROW_SPEED: f32 = 30.0;
/// Upward kick added to every throw so grenades arc over cover.
pub const THROW_LIFT: f32 = 5.0;
pub const GRENADE_RADIUS: f32 = 0.12;
pub const GRENADE_MASS: f32 = 0.4;
pub const FUSE_SECONDS: f32 = 2.0;

/// A grenade in flight.
struct Grenade {
    kind: WeaponKind,
    thrower: Entity,
    body: RigidBodyHandle,
    fuse: Countdown,
}

/// A fuse that ran out this tick. Damage and effects are resolved by
/// the combat pass.
#[derive(Debug, Clone, Copy)]
pub struct Detonation {
    pub kind: WeaponKind,
    pub position: Vec3,
    pub thrower: Entity,
}

/// All grenades currently in the air or rolling on the ground.
#[derive(Default)]
pub struct GrenadeField {
    live: Vec<Grenade>,
}

impl GrenadeField {
    /// Launch a grenade from `origin` along `direction`.
    pub fn throw(
        &mut self,
        physics: &mut PhysicsWorld,
        kind: WeaponKind,
        thrower: Entity,
        origin: Vec3,
        direction: Vec3,
    ) {
        let dir = direction.normalize_or_zero();
        let velocity = dir * THROW_SPEED + Vec3::new(0.0, THROW_LIFT, 0.0);
        let (body, _collider) =
            physics.add_projectile_body(origin, velocity, GRENADE_RADIUS, GRENADE_MASS);
        self.live.push(Grenade {
            kind,
            thrower,
            body,
            fuse: Countdown::new(FUSE_SECONDS),
        });
    }

    /// Tick every fuse. Expired grenades are pulled out of the physics
    /// world and reported as detonations at their final resting position.
    pub fn update(&mut self, physics: &mut PhysicsWorld, dt: f32) -> Vec<Detonation> {
        let mut detonations = Vec::new();
        let mut i = 0;
        while i < self.live.len() {
            let grenade = &mut self.live[i];
            if grenade.fuse.tick(dt) {
                let position = physics.body_position(grenade.body).unwrap_or(Vec3::ZERO);
                detonations.push(Detonation {
                    kind: grenade.kind,
                    position,
                    thrower: grenade.thrower,
                });
                physics.remove_body(grenade.body);
                self.live.swap_remove(i);
            } else {
                i += 1;
            }
        }
        detonations
    }

    pub fn count(&self) -> usize {
        self.live.len()
    }
}
