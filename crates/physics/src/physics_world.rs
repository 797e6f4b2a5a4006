//! Physics world management with Rapier3D.

use engine_core::Vec3;
use rapier3d::prelude::*;

/// Main physics world containing all simulation state.
///
/// Owns position and velocity truth for every body; gameplay code holds
/// handles and reads transforms back after stepping.
pub struct PhysicsWorld {
    pub rigid_body_set: RigidBodySet,
    pub collider_set: ColliderSet,
    pub gravity: Vector<Real>,
    pub integration_parameters: IntegrationParameters,
    pub physics_pipeline: PhysicsPipeline,
    pub island_manager: IslandManager,
    pub broad_phase: DefaultBroadPhase,
    pub narrow_phase: NarrowPhase,
    pub impulse_joint_set: ImpulseJointSet,
    pub multibody_joint_set: MultibodyJointSet,
    pub ccd_solver: CCDSolver,
    pub query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a physics world with the given downward gravity and a fixed
    /// integration timestep.
    pub fn new(gravity_y: f32, fixed_dt: f32) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = fixed_dt;
        Self {
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            gravity: vector![0.0, gravity_y, 0.0],
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Advance the simulation by one fixed timestep.
    pub fn step(&mut self) {
        self.physics_pipeline.step(
            &self.gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            Some(&mut self.query_pipeline),
            &(),
            &(),
        );
    }

    /// Refresh the query pipeline for raycasting outside the step cycle
    /// (after building static geometry or teleporting bodies).
    pub fn update_query_pipeline(&mut self) {
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a character body: dynamic, rotation-locked, damped, capsule
    /// collider. Facing is gameplay state, never physics torque.
    pub fn add_character_body(
        &mut self,
        position: Vec3,
        capsule_half_height: f32,
        capsule_radius: f32,
        mass: f32,
        linear_damping: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .lock_rotations()
            .linear_damping(linear_damping)
            .build();
        let body = self.rigid_body_set.insert(rigid_body);
        let collider = ColliderBuilder::capsule_y(capsule_half_height, capsule_radius)
            .mass(mass)
            .build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);
        (body, collider)
    }

    /// Add a thrown projectile body: small ball with CCD so it cannot
    /// tunnel through walls at throw speed.
    pub fn add_projectile_body(
        &mut self,
        position: Vec3,
        velocity: Vec3,
        radius: f32,
        mass: f32,
    ) -> (RigidBodyHandle, ColliderHandle) {
        let rigid_body = RigidBodyBuilder::dynamic()
            .translation(vector![position.x, position.y, position.z])
            .linvel(vector![velocity.x, velocity.y, velocity.z])
            .ccd_enabled(true)
            .build();
        let body = self.rigid_body_set.insert(rigid_body);
        let collider = ColliderBuilder::ball(radius)
            .mass(mass)
            .restitution(0.4)
            .build();
        let collider = self
            .collider_set
            .insert_with_parent(collider, body, &mut self.rigid_body_set);
        (body, collider)
    }

    /// Add a static cuboid collider. No parent body; collider is fixed in
    /// world. `translation` is the center, `half_extents` the half sizes.
    pub fn add_static_cuboid(&mut self, translation: Vec3, half_extents: Vec3) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extents.x, half_extents.y, half_extents.z)
            .translation(vector![translation.x, translation.y, translation.z])
            .build();
        self.collider_set.insert(collider)
    }

    /// World position of a body's center.
    pub fn body_position(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let pos = body.translation();
            Vec3::new(pos.x, pos.y, pos.z)
        })
    }

    /// Current linear velocity of a body.
    pub fn body_velocity(&self, handle: RigidBodyHandle) -> Option<Vec3> {
        self.rigid_body_set.get(handle).map(|body| {
            let vel = body.linvel();
            Vec3::new(vel.x, vel.y, vel.z)
        })
    }

    /// Set the horizontal velocity components, preserving vertical motion
    /// so gravity and jumps are unaffected.
    pub fn set_planar_velocity(&mut self, handle: RigidBodyHandle, x: f32, z: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let vy = body.linvel().y;
            body.set_linvel(vector![x, vy, z], true);
        }
    }

    /// Set the vertical velocity component only (jumps).
    pub fn set_vertical_velocity(&mut self, handle: RigidBodyHandle, y: f32) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            let vel = *body.linvel();
            body.set_linvel(vector![vel.x, y, vel.z], true);
        }
    }

    pub fn set_velocity(&mut self, handle: RigidBodyHandle, velocity: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_linvel(vector![velocity.x, velocity.y, velocity.z], true);
        }
    }

    /// Move a body to a new position and zero its velocity (round resets).
    pub fn teleport(&mut self, handle: RigidBodyHandle, position: Vec3) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_translation(vector![position.x, position.y, position.z], true);
            body.set_linvel(vector![0.0, 0.0, 0.0], true);
        }
    }

    /// Enable or disable a body. Disabled bodies are skipped by the
    /// simulation and by raycast queries, which is how dead entities stop
    /// colliding and soaking hits.
    pub fn set_body_enabled(&mut self, handle: RigidBodyHandle, enabled: bool) {
        if let Some(body) = self.rigid_body_set.get_mut(handle) {
            body.set_enabled(enabled);
        }
    }

    /// Resolve a collider back to the rigid body it is attached to.
    pub fn collider_parent(&self, handle: ColliderHandle) -> Option<RigidBodyHandle> {
        self.collider_set.get(handle).and_then(|c| c.parent())
    }

    /// Remove a rigid body and its colliders.
    pub fn remove_body(&mut self, handle: RigidBodyHandle) {
        self.rigid_body_set.remove(
            handle,
            &mut self.island_manager,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            true,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_world() -> PhysicsWorld {
        PhysicsWorld::new(-30.0, 1.0 / 60.0)
    }

    #[test]
    fn character_body_falls_under_gravity() {
        let mut world = test_world();
        let (body, _) = world.add_character_body(Vec3::new(0.0, 10.0, 0.0), 0.4, 0.5, 80.0, 0.9);
        for _ in 0..30 {
            world.step();
        }
        let pos = world.body_position(body).unwrap();
        assert!(pos.y < 10.0, "body should have fallen, y = {}", pos.y);
    }

    #[test]
    fn planar_velocity_preserves_vertical_motion() {
        let mut world = test_world();
        let (body, _) = world.add_character_body(Vec3::new(0.0, 5.0, 0.0), 0.4, 0.5, 80.0, 0.0);
        world.set_vertical_velocity(body, -7.0);
        world.set_planar_velocity(body, 3.0, 0.0);
        let vel = world.body_velocity(body).unwrap();
        assert_eq!(vel.x, 3.0);
        assert_eq!(vel.y, -7.0);
    }

    #[test]
    fn teleport_zeroes_velocity() {
        let mut world = test_world();
        let (body, _) = world.add_character_body(Vec3::ZERO, 0.4, 0.5, 80.0, 0.9);
        world.set_velocity(body, Vec3::new(5.0, 5.0, 5.0));
        world.teleport(body, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.body_position(body).unwrap(), Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(world.body_velocity(body).unwrap(), Vec3::ZERO);
    }

    #[test]
    fn collider_parent_resolves_to_owning_body() {
        let mut world = test_world();
        let (body, collider) = world.add_character_body(Vec3::ZERO, 0.4, 0.5, 80.0, 0.9);
        assert_eq!(world.collider_parent(collider), Some(body));
    }
}
