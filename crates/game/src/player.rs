//! Human-controlled entity: movement, look, firing, weapon handling.

use std::f32::consts::FRAC_PI_2;

use engine_core::{Countdown, Vec3, World};
use input::ActionState;
use physics::PhysicsWorld;
use rand::rngs::StdRng;

use crate::combat::{self, Shot};
use crate::effects::{EffectQueue, SoundCue};
use crate::entity::{BodyHandle, Controller, Team, Vitals};
use crate::grenades::GrenadeField;
use crate::weapons::{Loadout, WeaponClass, WeaponSlot};

pub const MOVE_SPEED: f32 = 30.0;
pub const SPRINT_SPEED: f32 = 45.0;
/// Backpedaling is slower than running forward.
pub const BACKPEDAL_FACTOR: f32 = 0.7;
pub const STRAFE_FACTOR: f32 = 0.8;
/// Per-tick horizontal velocity retention with no movement input.
pub const IDLE_DAMPING: f32 = 0.85;
pub const JUMP_SPEED: f32 = 12.0;
/// Vertical speeds under this magnitude count as standing on ground.
pub const GROUND_EPSILON: f32 = 0.5;
/// Camera height above the capsule center.
pub const EYE_HEIGHT: f32 = 0.9;
const FOOTSTEP_INTERVAL: f32 = 0.3;
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;
const HOLSTER_DELAY: f32 = 0.6;

/// View and cadence state for the human entity.
#[derive(Debug, Clone)]
pub struct PlayerState {
    pub yaw: f32,
    pub pitch: f32,
    footsteps: Countdown,
}

impl PlayerState {
    /// Spawn facing the enemy side of the arena.
    pub fn new(team: Team) -> Self {
        let yaw = match team {
            Team::Defense => -FRAC_PI_2,
            Team::Attack => FRAC_PI_2,
        };
        Self {
            yaw,
            pitch: 0.0,
            footsteps: Countdown::new(FOOTSTEP_INTERVAL),
        }
    }

    /// Unit view direction from the current yaw/pitch.
    pub fn view_direction(&self) -> Vec3 {
        view_direction(self.yaw, self.pitch)
    }
}

/// Yaw 0 looks down -z; positive pitch looks up.
pub fn view_direction(yaw: f32, pitch: f32) -> Vec3 {
    let (sin_yaw, cos_yaw) = yaw.sin_cos();
    let (sin_pitch, cos_pitch) = pitch.sin_cos();
    Vec3::new(-sin_yaw * cos_pitch, sin_pitch, -cos_yaw * cos_pitch)
}

/// Apply this tick's action state to the human entity. Firing can be
/// gated off (round already decided) while movement stays live.
pub fn update_player(
    world: &mut World,
    physics: &mut PhysicsWorld,
    actions: &ActionState,
    rng: &mut StdRng,
    effects: &mut EffectQueue,
    shots: &mut Vec<Shot>,
    grenades: &mut GrenadeField,
    fire_allowed: bool,
    dt: f32,
) {
    let mut query = world.query::<(
        &Controller,
        &mut PlayerState,
        &mut Loadout,
        &Vitals,
        &BodyHandle,
    )>();
    let Some((entity, (_, state, loadout, vitals, handle))) = query
        .iter()
        .find(|(_, (controller, ..))| matches!(controller, Controller::Human))
    else {
        return;
    };

    // Look stays live even while dead, so the death camera can pan.
    let look = actions.look_delta();
    state.yaw -= look.x;
    state.pitch = (state.pitch - look.y).clamp(-PITCH_LIMIT, PITCH_LIMIT);

    if !vitals.alive {
        return;
    }

    let Some(velocity) = physics.body_velocity(handle.body) else {
        return;
    };
    let grounded = velocity.y.abs() < GROUND_EPSILON;

    // Movement relative to facing. Forward and strafe components carry
    // their own speed factors and are not re-normalized together, so the
    // diagonal comes out slightly faster.
    let axes = actions.movement();
    if axes.length_squared() > 1e-6 {
        let (sin_yaw, cos_yaw) = state.yaw.sin_cos();
        let forward = Vec3::new(-sin_yaw, 0.0, -cos_yaw);
        let right = Vec3::new(cos_yaw, 0.0, -sin_yaw);

        let forward_speed = if axes.y < 0.0 {
            MOVE_SPEED * BACKPEDAL_FACTOR
        } else if actions.is_sprint_held() {
            SPRINT_SPEED
        } else {
            MOVE_SPEED
        };
        let wish = forward * axes.y * forward_speed + right * axes.x * MOVE_SPEED * STRAFE_FACTOR;
        physics.set_planar_velocity(handle.body, wish.x, wish.z);

        if grounded && state.footsteps.tick(dt) {
            effects.sound(SoundCue::Footstep);
            state.footsteps.reset(FOOTSTEP_INTERVAL);
        }
    } else {
        physics.set_planar_velocity(
            handle.body,
            velocity.x * IDLE_DAMPING,
            velocity.z * IDLE_DAMPING,
        );
        state.footsteps.reset(FOOTSTEP_INTERVAL);
    }

    if actions.is_jump_pressed() && grounded {
        physics.set_vertical_velocity(handle.body, JUMP_SPEED);
    }

    if let Some(key) = actions.selected_slot() {
        if let Some(slot) = WeaponSlot::from_key(key) {
            loadout.select(slot);
        }
    }

    if actions.is_reload_pressed() {
        if let Some(weapon) = loadout.active_weapon_mut() {
            if weapon.start_reload() {
                effects.sound(SoundCue::Reload);
            }
        }
    }

    if fire_allowed && actions.is_fire_held() {
        if let Some(kind) = combat::try_fire(loadout) {
            let Some(center) = physics.body_position(handle.body) else {
                return;
            };
            let eye = center + Vec3::new(0.0, EYE_HEIGHT, 0.0);
            let view = state.view_direction();
            let stats = kind.stats();

            if stats.class == WeaponClass::Grenade {
                grenades.throw(physics, kind, entity, eye, view);
                loadout.remove(stats.slot);
                loadout.schedule_holster_swap(HOLSTER_DELAY);
            } else {
                let direction = combat::perturb(view, stats.spread, rng);
                shots.push(Shot {
                    shooter: entity,
                    shooter_body: handle.body,
                    origin: eye,
                    direction,
                    kind,
                });
                effects.sound(SoundCue::GunShot);
            }
        }
    }
}
