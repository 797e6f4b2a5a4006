//! Immutable per-tick view of the match.
//!
//! A [`Snapshot`] is built once per simulation tick, after every system
//! has run, and holds plain values only. Whatever consumes it (a HUD, a
//! replay dump, a test) can keep it around without touching the world.

use engine_core::{Vec3, World};
use physics::PhysicsWorld;

use crate::entity::{BodyHandle, CombatRecord, Combatant, Controller, Team, Vitals, Wallet};
use crate::rounds::{RoundPhase, RoundState};
use crate::weapons::Loadout;

/// Everything a frontend needs to present one tick.
#[derive(Debug, Clone)]
pub struct Snapshot {
    pub tick: u64,

    // Player vitals. Health and armor are floored to whole points.
    pub health: u32,
    pub armor: u32,
    pub alive: bool,
    pub position: Vec3,
    pub yaw: f32,

    // Active weapon.
    pub weapon_name: String,
    pub ammo: u32,
    pub reserve_ammo: u32,
    pub is_reloading: bool,
    /// 0..=1 while a reload is running.
    pub reload_progress: f32,

    // Economy and record.
    pub money: u32,
    pub kills: u32,
    pub deaths: u32,

    // Round state.
    pub round_number: u32,
    pub phase: RoundPhase,
    /// Whole seconds left on the round clock.
    pub round_seconds_left: u32,
    /// Whole seconds left in the buy window, zero outside it.
    pub buy_seconds_left: u32,
    pub score_attack: u32,
    pub score_defense: u32,
    pub message: String,
    pub bomb: Option<BombView>,

    /// Alive teammates, planar coordinates. The player is not included.
    pub radar: Vec<RadarBlip>,
    /// Every combatant, sorted by team then kills.
    pub scoreboard: Vec<ScoreRow>,
    pub scoreboard_open: bool,
    pub map_open: bool,
}

/// Which fullscreen overlays the player has toggled on. Latched by the
/// simulation across ticks, not per-tick key state.
#[derive(Debug, Clone, Copy, Default)]
pub struct OverlayState {
    pub scoreboard: bool,
    pub map: bool,
}

/// Planted bomb as shown on the HUD.
#[derive(Debug, Clone, Copy)]
pub struct BombView {
    pub x: f32,
    pub z: f32,
    pub fuse_seconds_left: u32,
    /// 0..=1 fraction of a completed defuse.
    pub defuse_fraction: f32,
}

#[derive(Debug, Clone, Copy)]
pub struct RadarBlip {
    pub x: f32,
    pub z: f32,
}

#[derive(Debug, Clone)]
pub struct ScoreRow {
    pub name: String,
    pub team: Team,
    pub kills: u32,
    pub deaths: u32,
    pub alive: bool,
}

/// Build the snapshot for this tick.
pub fn capture(
    world: &World,
    physics: &PhysicsWorld,
    round: &RoundState,
    overlays: OverlayState,
    tick: u64,
) -> Snapshot {
    let mut health = 0;
    let mut armor = 0;
    let mut alive = false;
    let mut position = Vec3::ZERO;
    let mut yaw = 0.0;
    let mut weapon_name = String::new();
    let mut ammo = 0;
    let mut reserve_ammo = 0;
    let mut is_reloading = false;
    let mut reload_progress = 0.0;
    let mut money = 0;
    let mut kills = 0;
    let mut deaths = 0;
    let mut player = None;

    {
        let mut query = world.query::<(
            &Controller,
            &Combatant,
            &Vitals,
            &CombatRecord,
            &Wallet,
            &Loadout,
            &BodyHandle,
        )>();
        if let Some((entity, (_, combatant, vitals, record, wallet, loadout, handle))) = query
            .iter()
            .find(|(_, (controller, ..))| matches!(controller, Controller::Human))
        {
            health = vitals.health.current.floor() as u32;
            armor = vitals.armor.floor() as u32;
            alive = vitals.alive;
            if let Some(body_position) = physics.body_position(handle.body) {
                position = body_position;
            }
            if let Ok(state) = world.get::<&crate::player::PlayerState>(entity) {
                yaw = state.yaw;
            }
            match loadout.active_weapon() {
                Some(weapon) => {
                    let stats = weapon.stats();
                    weapon_name = stats.name.to_string();
                    ammo = weapon.ammo;
                    reserve_ammo = weapon.reserve;
                    is_reloading = weapon.is_reloading;
                    if weapon.is_reloading && stats.reload_time > 0.0 {
                        reload_progress = 1.0 - weapon.reload_timer / stats.reload_time;
                    }
                }
                // Empty hands during the post-throw holster gap.
                None => weapon_name = "Holstered".to_string(),
            }
            money = wallet.money;
            kills = record.kills;
            deaths = record.deaths;
            player = Some((entity, combatant.team));
        }
    }

    let bomb = round.bomb.as_ref().map(|bomb| BombView {
        x: bomb.position.x,
        z: bomb.position.z,
        fuse_seconds_left: bomb.fuse.remaining.floor() as u32,
        defuse_fraction: (bomb.defuse_progress / crate::rounds::DEFUSE_TIME).min(1.0),
    });

    let mut radar = Vec::new();
    let mut scoreboard = Vec::new();
    for (entity, (combatant, vitals, record, handle)) in world
        .query::<(&Combatant, &Vitals, &CombatRecord, &BodyHandle)>()
        .iter()
    {
        scoreboard.push(ScoreRow {
            name: combatant.name.clone(),
            team: combatant.team,
            kills: record.kills,
            deaths: record.deaths,
            alive: vitals.alive,
        });
        if let Some((player_entity, player_team)) = player {
            if entity != player_entity && combatant.team == player_team && vitals.alive {
                if let Some(body_position) = physics.body_position(handle.body) {
                    radar.push(RadarBlip {
                        x: body_position.x,
                        z: body_position.z,
                    });
                }
            }
        }
    }
    scoreboard.sort_by(|a, b| {
        (a.team == Team::Defense)
            .cmp(&(b.team == Team::Defense))
            .then(b.kills.cmp(&a.kills))
            .then(a.name.cmp(&b.name))
    });

    Snapshot {
        tick,
        health,
        armor,
        alive,
        position,
        yaw,
        weapon_name,
        ammo,
        reserve_ammo,
        is_reloading,
        reload_progress,
        money,
        kills,
        deaths,
        round_number: round.round_number,
        phase: round.phase,
        round_seconds_left: round.round_time_remaining().floor() as u32,
        buy_seconds_left: round.buy_time_remaining().floor() as u32,
        score_attack: round.score_attack,
        score_defense: round.score_defense,
        message: round.message.clone(),
        bomb,
        radar,
        scoreboard,
        scoreboard_open: overlays.scoreboard,
        map_open: overlays.map,
    }
}
