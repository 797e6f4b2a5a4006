//! Hitscan and area-damage resolution, armor math, and kill bookkeeping.

use engine_core::{Entity, Vec3, World};
use physics::{PhysicsWorld, RigidBodyHandle};
use rand::rngs::StdRng;
use rand::Rng;

use crate::config::PayoutTable;
use crate::effects::{palette, EffectQueue, SoundCue};
use crate::entity::{BodyHandle, Combatant, CombatRecord, Controller, Vitals, Wallet};
use crate::grenades::Detonation;
use crate::weapons::{Loadout, WeaponClass, WeaponKind};

/// Hit points this far above the victim's body center count as the head.
pub const HEADSHOT_OFFSET: f32 = 0.8;
pub const HEADSHOT_MULTIPLIER: f32 = 4.0;
/// Distance falloff never drops damage below this fraction.
pub const FALLOFF_FLOOR: f32 = 0.4;
/// Reference distance for the AI marksmanship penalty. Bot damage decays
/// toward the floor much sooner than the weapon's own falloff.
pub const BOT_REACH: f32 = 150.0;
pub const HE_RADIUS: f32 = 8.0;
pub const HE_DAMAGE: f32 = 100.0;

const IMPACT_PARTICLES: u32 = 15;
const DEATH_PARTICLES: u32 = 30;
const EXPLOSION_PARTICLES: u32 = 60;
const FLASH_PARTICLES: u32 = 30;
const SMOKE_PARTICLES: u32 = 50;

/// A shot committed this tick. Producers perturb the aim direction with
/// their own spread before queueing; the resolver only casts the ray.
#[derive(Debug, Clone, Copy)]
pub struct Shot {
    pub shooter: Entity,
    /// Excluded from the ray; shots start inside the shooter's capsule.
    pub shooter_body: RigidBodyHandle,
    pub origin: Vec3,
    pub direction: Vec3,
    pub kind: WeaponKind,
}

/// What a resolved shot struck.
#[derive(Debug, Clone, Copy)]
pub struct HitReport {
    /// Set when a living opponent took damage.
    pub victim: Option<Entity>,
    pub lethal: bool,
    pub point: Vec3,
}

/// Gate a trigger pull on the active weapon. Returns the kind actually
/// fired, or None when the pull was absorbed (cooldown, reload, dry).
pub fn try_fire(loadout: &mut Loadout) -> Option<WeaponKind> {
    let weapon = loadout.active_weapon_mut()?;
    let kind = weapon.kind;
    if weapon.fire() {
        Some(kind)
    } else {
        None
    }
}

/// Jitter an aim direction by a spread value, one uniform offset per axis.
pub fn perturb(direction: Vec3, spread: f32, rng: &mut StdRng) -> Vec3 {
    let jitter = Vec3::new(
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
        (rng.gen::<f32>() - 0.5) * spread,
    );
    (direction + jitter).normalize_or_zero()
}

/// Cast a queued shot and apply its damage.
pub fn resolve_shot(
    world: &mut World,
    physics: &mut PhysicsWorld,
    effects: &mut EffectQueue,
    payouts: &PayoutTable,
    shot: &Shot,
) -> Option<HitReport> {
    let stats = shot.kind.stats();
    let hit = physics.raycast_excluding(shot.origin, shot.direction, stats.range, shot.shooter_body)?;

    effects.particles(hit.point, palette::IMPACT, IMPACT_PARTICLES);

    let mut report = HitReport {
        victim: None,
        lethal: false,
        point: hit.point,
    };

    let victim = match hit.body.and_then(|body| entity_for_body(world, body)) {
        Some(victim) => victim,
        None => return Some(report),
    };

    // Friendly fire is off: only opposing entities take hitscan damage.
    let shooter_team = match world.get::<&Combatant>(shot.shooter) {
        Ok(combatant) => combatant.team,
        Err(_) => return Some(report),
    };
    let victim_team = match world.get::<&Combatant>(victim) {
        Ok(combatant) => combatant.team,
        Err(_) => return Some(report),
    };
    if shooter_team == victim_team {
        return Some(report);
    }

    // Melee lands full damage anywhere inside its reach; gunfire decays
    // linearly with travel distance down to the floor.
    let falloff = match stats.class {
        WeaponClass::Melee => 1.0,
        _ => (1.0 - hit.distance / stats.range).max(FALLOFF_FLOOR),
    };
    let mut damage = stats.damage * falloff;

    let bot_shooter = world
        .get::<&Controller>(shot.shooter)
        .map_or(false, |c| matches!(*c, Controller::Ai));
    if bot_shooter {
        damage *= (1.0 - hit.distance / BOT_REACH).max(FALLOFF_FLOOR);
    }

    if let Some(center) = hit.body.and_then(|body| physics.body_position(body)) {
        if hit.point.y > center.y + HEADSHOT_OFFSET {
            damage *= HEADSHOT_MULTIPLIER;
        }
    }

    let lethal = apply_damage(world, physics, effects, payouts, victim, Some(shot.shooter), damage);
    report.victim = Some(victim);
    report.lethal = lethal;
    Some(report)
}

/// Resolve an expired grenade fuse. HE damages every living entity in its
/// radius, friend and thrower included; flash and smoke are effects only.
pub fn resolve_detonation(
    world: &mut World,
    physics: &mut PhysicsWorld,
    effects: &mut EffectQueue,
    payouts: &PayoutTable,
    detonation: &Detonation,
) {
    match detonation.kind {
        WeaponKind::HeGrenade => {
            effects.particles(detonation.position, palette::EXPLOSION, EXPLOSION_PARTICLES);
            effects.sound(SoundCue::Explosion);

            let mut victims = Vec::new();
            for (entity, (vitals, handle)) in world.query::<(&Vitals, &BodyHandle)>().iter() {
                if !vitals.alive {
                    continue;
                }
                let Some(position) = physics.body_position(handle.body) else {
                    continue;
                };
                let distance = position.distance(detonation.position);
                if distance <= HE_RADIUS {
                    victims.push((entity, HE_DAMAGE * (1.0 - distance / HE_RADIUS)));
                }
            }
            for (victim, damage) in victims {
                apply_damage(
                    world,
                    physics,
                    effects,
                    payouts,
                    victim,
                    Some(detonation.thrower),
                    damage,
                );
            }
        }
        WeaponKind::Flashbang => {
            effects.particles(detonation.position, palette::FLASH, FLASH_PARTICLES);
            effects.sound(SoundCue::Explosion);
        }
        WeaponKind::SmokeGrenade => {
            effects.particles(detonation.position, palette::SMOKE, SMOKE_PARTICLES);
        }
        _ => {}
    }
}

/// Push raw damage through a victim's armor and handle death bookkeeping.
/// Kill credit and the kill reward go to an opposing attacker only; a
/// suicide or team grenade still counts the victim's death.
pub fn apply_damage(
    world: &mut World,
    physics: &mut PhysicsWorld,
    effects: &mut EffectQueue,
    payouts: &PayoutTable,
    victim: Entity,
    attacker: Option<Entity>,
    damage: f32,
) -> bool {
    let outcome = match world.get::<&mut Vitals>(victim) {
        Ok(mut vitals) => {
            if !vitals.alive {
                return false;
            }
            vitals.apply_damage(damage)
        }
        Err(_) => return false,
    };

    if let Some(attacker) = attacker {
        let human_attacker = world
            .get::<&Controller>(attacker)
            .map_or(false, |c| matches!(*c, Controller::Human));
        if human_attacker && attacker != victim {
            effects.sound(SoundCue::HitMarker);
        }
    }

    if !outcome.lethal {
        return false;
    }

    if let Ok(mut record) = world.get::<&mut CombatRecord>(victim) {
        record.deaths += 1;
    }
    if let Ok(handle) = world.get::<&BodyHandle>(victim) {
        let position = physics.body_position(handle.body).unwrap_or(Vec3::ZERO);
        effects.particles(position, palette::DEATH, DEATH_PARTICLES);
        physics.set_body_enabled(handle.body, false);
    }

    if let Some(attacker) = attacker {
        if attacker != victim && opposing(world, attacker, victim) {
            if let Ok(mut record) = world.get::<&mut CombatRecord>(attacker) {
                record.kills += 1;
            }
            if let Ok(mut wallet) = world.get::<&mut Wallet>(attacker) {
                wallet.earn(payouts.kill_reward);
            }
        }
    }

    true
}

fn opposing(world: &World, a: Entity, b: Entity) -> bool {
    let team_a = world.get::<&Combatant>(a).map(|c| c.team);
    let team_b = world.get::<&Combatant>(b).map(|c| c.team);
    match (team_a, team_b) {
        (Ok(a), Ok(b)) => a != b,
        _ => false,
    }
}

fn entity_for_body(world: &World, body: RigidBodyHandle) -> Option<Entity> {
    world
        .query::<&BodyHandle>()
        .iter()
        .find(|(_, handle)| handle.body == body)
        .map(|(entity, _)| entity)
}
