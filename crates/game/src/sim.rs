//! The headless match simulation.
//!
//! [`Simulation`] owns the world, the physics state, and every gameplay
//! system, and advances them in a fixed order each tick. The host feeds
//! in [`ActionEvent`]s and gets back a [`Snapshot`] plus a queue of
//! effect requests; nothing in here draws or plays anything.

use engine_core::{Entity, SimClock, Vec3, World};
use input::{ActionEvent, ActionState};
use physics::PhysicsWorld;
use rand::rngs::StdRng;
use rand::SeedableRng;
use thiserror::Error;

use crate::arena::Arena;
use crate::bots::{self, BotBrain};
use crate::combat::{self, Shot};
use crate::config::{MatchConfig, PayoutTable};
use crate::economy;
use crate::effects::{EffectQueue, EffectRequest};
use crate::entity::{BodyHandle, CombatRecord, Combatant, Controller, Team, Vitals, Wallet};
use crate::grenades::GrenadeField;
use crate::player::{self, PlayerState};
use crate::rounds::{RoundState, BOT_ARMOR};
use crate::snapshot::{self, OverlayState, Snapshot};
use crate::weapons::Loadout;

const GRAVITY_Y: f32 = -30.0;
const CAPSULE_HALF_HEIGHT: f32 = 0.6;
const CAPSULE_RADIUS: f32 = 0.4;
const BODY_MASS: f32 = 80.0;
const BODY_DAMPING: f32 = 0.0;
/// Per-side bot cap; also bounds the callsign pool below.
const MAX_TEAM_BOTS: u32 = 9;

const BOT_CALLSIGNS: [&str; 18] = [
    "Viper", "Rook", "Saber", "Ghost", "Drift", "Falcon", "Onyx", "Piston", "Echo", "Jackal",
    "Mantis", "Crow", "Havoc", "Lynx", "Tracer", "Brick", "Shade", "Vandal",
];

#[derive(Debug, Error)]
pub enum SetupError {
    #[error("teammate bot count {0} is outside 0..=9")]
    TeammateCount(u32),
    #[error("enemy bot count {0} is outside 1..=9")]
    EnemyCount(u32),
}

pub struct Simulation {
    world: World,
    physics: PhysicsWorld,
    arena: Arena,
    actions: ActionState,
    effects: EffectQueue,
    grenades: GrenadeField,
    round: RoundState,
    payouts: PayoutTable,
    overlays: OverlayState,
    clock: SimClock,
    rng: StdRng,
    player: Entity,
    player_was_alive: bool,
    tick_number: u64,
}

impl Simulation {
    /// Build the arena, spawn both teams, and open round one.
    pub fn new(config: &MatchConfig) -> Result<Self, SetupError> {
        if config.teammate_bots > MAX_TEAM_BOTS {
            return Err(SetupError::TeammateCount(config.teammate_bots));
        }
        if config.enemy_bots < 1 || config.enemy_bots > MAX_TEAM_BOTS {
            return Err(SetupError::EnemyCount(config.enemy_bots));
        }

        let seed = config.seed.unwrap_or_else(rand::random);
        log::info!("match seed {}", seed);
        let mut rng = StdRng::seed_from_u64(seed);

        let clock = SimClock::default();
        let mut physics = PhysicsWorld::new(GRAVITY_Y, clock.fixed_dt());
        let arena = Arena::build(&mut physics, &mut rng);
        let mut world = World::new();

        let player_team = config.player_team;
        let player = spawn_combatant(
            &mut world,
            &mut physics,
            "You",
            player_team,
            Controller::Human,
            Arena::player_spawn(player_team),
            config.payouts.start_money,
        );
        let _ = world.insert_one(player, PlayerState::new(player_team));

        let mut callsigns = BOT_CALLSIGNS.iter();
        let sides = [
            (player_team, config.teammate_bots),
            (player_team.opponent(), config.enemy_bots),
        ];
        for (team, count) in sides {
            for _ in 0..count {
                let name = callsigns.next().copied().unwrap_or("Bot");
                let bot = spawn_combatant(
                    &mut world,
                    &mut physics,
                    name,
                    team,
                    Controller::Ai,
                    Arena::bot_spawn(team, &mut rng),
                    config.payouts.start_money,
                );
                let brain = BotBrain::new(Arena::patrol_route(team), &mut rng);
                let _ = world.insert_one(bot, brain);
            }
        }
        log::info!(
            "match ready: you on {}, {} vs {} combatants",
            player_team.display_name(),
            1 + config.teammate_bots,
            config.enemy_bots
        );

        let mut sim = Self {
            world,
            physics,
            arena,
            actions: ActionState::new(),
            effects: EffectQueue::new(),
            grenades: GrenadeField::default(),
            round: RoundState::new(),
            payouts: config.payouts,
            overlays: OverlayState::default(),
            clock,
            rng,
            player,
            player_was_alive: true,
            tick_number: 0,
        };
        sim.round
            .begin_round(&mut sim.world, &mut sim.physics, &mut sim.rng);
        Ok(sim)
    }

    /// Advance the match by one frame. Gameplay runs at the fixed step;
    /// a slow frame is caught up with extra sub-steps, a fast one may
    /// run none.
    pub fn tick(&mut self, frame_dt: f32, events: &[ActionEvent]) -> Snapshot {
        self.actions.begin_tick();
        for event in events {
            self.actions.process(event.clone());
        }
        if self.actions.was_scoreboard_toggled() {
            self.overlays.scoreboard = !self.overlays.scoreboard;
        }
        if self.actions.was_map_toggled() {
            self.overlays.map = !self.overlays.map;
        }

        // Purchases settle once per frame, not per sub-step.
        if self.round.buying_open() {
            for item in self.actions.buy_requests() {
                economy::try_buy(&mut self.world, &mut self.effects, self.player, item);
            }
        }

        self.clock.advance(frame_dt);
        let substeps = self.clock.take_substeps();
        for _ in 0..substeps {
            self.step();
        }

        let alive = self
            .world
            .get::<&Vitals>(self.player)
            .map_or(false, |vitals| vitals.alive);
        if self.player_was_alive && !alive {
            self.actions.release_held();
        }
        self.player_was_alive = alive;

        self.tick_number += 1;
        snapshot::capture(
            &self.world,
            &self.physics,
            &self.round,
            self.overlays,
            self.tick_number,
        )
    }

    /// One fixed sub-step: physics, intents, resolution, round logic.
    fn step(&mut self) {
        let dt = self.clock.fixed_dt();

        self.physics.step();
        self.physics.update_query_pipeline();

        for (_, loadout) in self.world.query::<&mut Loadout>().iter() {
            loadout.update(dt);
        }

        // Intents: bots only while the round is live, the player always
        // (movement stays live through buy and resolve phases).
        let mut shots: Vec<Shot> = Vec::new();
        if self.round.combat_live() {
            bots::update_bots(
                &mut self.world,
                &mut self.physics,
                &mut self.rng,
                &mut self.effects,
                &mut shots,
                dt,
            );
        }
        player::update_player(
            &mut self.world,
            &mut self.physics,
            &self.actions,
            &mut self.rng,
            &mut self.effects,
            &mut shots,
            &mut self.grenades,
            self.round.fire_allowed(),
            dt,
        );

        if self.actions.is_plant_pressed() {
            self.round.try_plant(
                &self.world,
                &self.physics,
                &mut self.effects,
                &self.arena,
                self.player,
            );
        }

        let detonations = self.grenades.update(&mut self.physics, dt);

        // Everyone's intents are queued; resolve them against the same
        // post-movement positions.
        for shot in &shots {
            combat::resolve_shot(
                &mut self.world,
                &mut self.physics,
                &mut self.effects,
                &self.payouts,
                shot,
            );
        }
        for detonation in &detonations {
            combat::resolve_detonation(
                &mut self.world,
                &mut self.physics,
                &mut self.effects,
                &self.payouts,
                detonation,
            );
        }

        self.round.update(
            &mut self.world,
            &mut self.physics,
            &mut self.rng,
            &mut self.effects,
            &self.payouts,
            self.actions.is_defuse_held(),
            dt,
        );
    }

    /// Buffered effect requests since the last drain.
    pub fn drain_effects(&mut self) -> Vec<EffectRequest> {
        self.effects.drain()
    }

    pub fn elapsed_seconds(&self) -> f32 {
        self.clock.elapsed_seconds()
    }
}

fn spawn_combatant(
    world: &mut World,
    physics: &mut PhysicsWorld,
    name: &str,
    team: Team,
    controller: Controller,
    position: Vec3,
    start_money: u32,
) -> Entity {
    let (body, collider) = physics.add_character_body(
        position,
        CAPSULE_HALF_HEIGHT,
        CAPSULE_RADIUS,
        BODY_MASS,
        BODY_DAMPING,
    );
    let (loadout, armor) = match controller {
        Controller::Human => (Loadout::human_default(team.pistol()), 0.0),
        Controller::Ai => (Loadout::bot_default(team.rifle()), BOT_ARMOR),
    };
    world.spawn((
        Combatant {
            name: name.to_string(),
            team,
        },
        controller,
        Vitals::new(armor),
        CombatRecord::default(),
        Wallet::new(start_money),
        loadout,
        BodyHandle { body, collider },
    ))
}
