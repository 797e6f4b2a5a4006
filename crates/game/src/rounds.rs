//! Round lifecycle: buy phase, the live round, the planted bomb, payouts.

use engine_core::{Countdown, Entity, Vec3, World};
use physics::PhysicsWorld;
use rand::rngs::StdRng;

use crate::arena::Arena;
use crate::bots::BotBrain;
use crate::config::PayoutTable;
use crate::effects::{palette, EffectQueue, SoundCue};
use crate::entity::{BodyHandle, Combatant, Controller, Team, Vitals, Wallet};
use crate::weapons::Loadout;

pub const BUY_TIME: f32 = 15.0;
pub const ROUND_TIME: f32 = 105.0;
pub const BOMB_FUSE: f32 = 45.0;
/// Seconds of sustained, in-range defusing needed to disarm.
pub const DEFUSE_TIME: f32 = 10.0;
/// 3D distance to the bomb within which defusing counts.
pub const DEFUSE_RANGE: f32 = 3.0;
/// Pause between the round decision and the next buy phase.
pub const RESOLVE_DELAY: f32 = 5.0;
/// Bots respawn with free armor; the human starts bare and buys.
pub const BOT_ARMOR: f32 = 50.0;
const BOMB_HEIGHT: f32 = 0.15;
const BOMB_PARTICLES: u32 = 120;
/// How long a round banner stays up before fading.
const BANNER_SECONDS: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundPhase {
    BuyPhase,
    Active,
    BombPlanted,
    Resolving,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOutcome {
    TimeOut,
    Elimination,
    Detonation,
    Defused,
}

/// The planted bomb. Created and destroyed only by [`RoundState`], so no
/// stale bomb can survive a round reset.
#[derive(Debug, Clone)]
pub struct BombState {
    pub position: Vec3,
    pub fuse: Countdown,
    pub defuse_progress: f32,
    /// Who is on the kit right now. `None` whenever nobody is defusing.
    pub defuser: Option<Entity>,
}

/// State machine owning the round clock, the bomb, scores, and streaks.
#[derive(Debug, Clone)]
pub struct RoundState {
    pub phase: RoundPhase,
    pub round_number: u32,
    pub score_attack: u32,
    pub score_defense: u32,
    pub bomb: Option<BombState>,
    pub message: String,
    pub last_outcome: Option<(Team, RoundOutcome)>,

    buy_window: Countdown,
    clock: Countdown,
    resolve_delay: Countdown,
    banner: Countdown,
    loss_streak_attack: u32,
    loss_streak_defense: u32,
}

impl RoundState {
    /// A fresh scoreboard. Call [`RoundState::begin_round`] to start
    /// round one.
    pub fn new() -> Self {
        Self {
            phase: RoundPhase::Resolving,
            round_number: 0,
            score_attack: 0,
            score_defense: 0,
            bomb: None,
            message: String::new(),
            last_outcome: None,
            buy_window: Countdown::ready(),
            clock: Countdown::ready(),
            resolve_delay: Countdown::ready(),
            banner: Countdown::ready(),
            loss_streak_attack: 0,
            loss_streak_defense: 0,
        }
    }

    /// Reset the world for the next round: everyone revived and back at
    /// spawn with default gear, bomb cleared, buy window open.
    pub fn begin_round(&mut self, world: &mut World, physics: &mut PhysicsWorld, rng: &mut StdRng) {
        self.round_number += 1;
        self.phase = RoundPhase::BuyPhase;
        self.buy_window.reset(BUY_TIME);
        self.clock.reset(ROUND_TIME);
        self.bomb = None;
        self.message = format!("Round {}", self.round_number);
        self.banner.reset(BANNER_SECONDS);

        for (_, (combatant, controller, vitals, loadout, handle)) in world
            .query::<(&Combatant, &Controller, &mut Vitals, &mut Loadout, &BodyHandle)>()
            .iter()
        {
            match controller {
                Controller::Human => {
                    vitals.revive(0.0);
                    *loadout = Loadout::human_default(combatant.team.pistol());
                    physics.teleport(handle.body, Arena::player_spawn(combatant.team));
                }
                Controller::Ai => {
                    vitals.revive(BOT_ARMOR);
                    *loadout = Loadout::bot_default(combatant.team.rifle());
                    physics.teleport(handle.body, Arena::bot_spawn(combatant.team, rng));
                }
            }
            physics.set_body_enabled(handle.body, true);
        }
        for (_, brain) in world.query::<&mut BotBrain>().iter() {
            brain.reset();
        }
    }

    /// Advance the phase timers and evaluate win conditions. Call after
    /// the combat pass so this tick's deaths are already applied.
    pub fn update(
        &mut self,
        world: &mut World,
        physics: &mut PhysicsWorld,
        rng: &mut StdRng,
        effects: &mut EffectQueue,
        payouts: &PayoutTable,
        defuse_held: bool,
        dt: f32,
    ) {
        if self.banner.tick(dt) {
            self.message.clear();
        }
        match self.phase {
            RoundPhase::BuyPhase => {
                if self.buy_window.tick(dt) {
                    self.phase = RoundPhase::Active;
                }
            }
            RoundPhase::Active => {
                // Checked in strict order: clock, attacker wipe, defender
                // wipe. The clock clamps at zero on its final tick.
                if self.clock.tick(dt) {
                    self.conclude(world, payouts, Team::Defense, RoundOutcome::TimeOut);
                } else if alive_count(world, Team::Attack) == 0 {
                    self.conclude(world, payouts, Team::Defense, RoundOutcome::Elimination);
                } else if alive_count(world, Team::Defense) == 0 {
                    self.conclude(world, payouts, Team::Attack, RoundOutcome::Elimination);
                }
            }
            RoundPhase::BombPlanted => {
                // The round clock is frozen; only the fuse runs. A wiped
                // attacking team does not end the phase, the bomb can
                // still win it for them.
                let fuse_expired = match &mut self.bomb {
                    Some(bomb) => bomb.fuse.tick(dt),
                    None => false,
                };
                if fuse_expired {
                    if let Some(bomb) = &self.bomb {
                        effects.particles(bomb.position, palette::BOMB, BOMB_PARTICLES);
                        effects.sound(SoundCue::Explosion);
                    }
                    self.bomb = None;
                    self.conclude(world, payouts, Team::Attack, RoundOutcome::Detonation);
                    return;
                }
                if alive_count(world, Team::Defense) == 0 {
                    self.conclude(world, payouts, Team::Attack, RoundOutcome::Elimination);
                    return;
                }

                let defuser = if defuse_held {
                    self.eligible_defuser(world, physics)
                } else {
                    None
                };
                let mut defused = false;
                if let Some(bomb) = &mut self.bomb {
                    if let Some(entity) = defuser {
                        bomb.defuser = Some(entity);
                        bomb.defuse_progress += dt;
                        defused = bomb.defuse_progress >= DEFUSE_TIME;
                    } else {
                        // Interruption throws away all progress.
                        bomb.defuser = None;
                        bomb.defuse_progress = 0.0;
                    }
                }
                if defused {
                    self.bomb = None;
                    self.conclude(world, payouts, Team::Defense, RoundOutcome::Defused);
                }
            }
            RoundPhase::Resolving => {
                if self.resolve_delay.tick(dt) {
                    self.begin_round(world, physics, rng);
                }
            }
        }
    }

    /// Plant attempt by `planter`. Silently rejected outside the live
    /// round, from the wrong team, while dead, or outside the site.
    pub fn try_plant(
        &mut self,
        world: &World,
        physics: &PhysicsWorld,
        effects: &mut EffectQueue,
        arena: &Arena,
        planter: Entity,
    ) -> bool {
        if self.phase != RoundPhase::Active {
            return false;
        }
        let eligible = world
            .get::<&Combatant>(planter)
            .map_or(false, |c| c.team == Team::Attack)
            && world
                .get::<&Vitals>(planter)
                .map_or(false, |v| v.alive);
        if !eligible {
            return false;
        }
        let Some(position) = world
            .get::<&BodyHandle>(planter)
            .ok()
            .and_then(|handle| physics.body_position(handle.body))
        else {
            return false;
        };
        if !arena.in_plant_zone(position) {
            return false;
        }

        self.bomb = Some(BombState {
            position: Vec3::new(position.x, BOMB_HEIGHT, position.z),
            fuse: Countdown::new(BOMB_FUSE),
            defuse_progress: 0.0,
            defuser: None,
        });
        self.phase = RoundPhase::BombPlanted;
        self.message = "The bomb has been planted".to_string();
        self.banner.reset(BANNER_SECONDS);
        effects.sound(SoundCue::BombPlant);
        true
    }

    /// Bots patrol and engage only while the round is live.
    pub fn combat_live(&self) -> bool {
        matches!(self.phase, RoundPhase::Active | RoundPhase::BombPlanted)
    }

    /// The trigger works everywhere except after the round is decided.
    pub fn fire_allowed(&self) -> bool {
        self.phase != RoundPhase::Resolving
    }

    pub fn buying_open(&self) -> bool {
        self.phase == RoundPhase::BuyPhase
    }

    /// Round clock as shown on the HUD. Frozen during buy and while the
    /// bomb is planted.
    pub fn round_time_remaining(&self) -> f32 {
        self.clock.remaining
    }

    pub fn buy_time_remaining(&self) -> f32 {
        self.buy_window.remaining
    }

    pub fn loss_streak(&self, team: Team) -> u32 {
        match team {
            Team::Attack => self.loss_streak_attack,
            Team::Defense => self.loss_streak_defense,
        }
    }

    /// The living human defender close enough to work the bomb, if any.
    fn eligible_defuser(&self, world: &World, physics: &PhysicsWorld) -> Option<Entity> {
        let bomb = self.bomb.as_ref()?;
        for (entity, (controller, combatant, vitals, handle)) in world
            .query::<(&Controller, &Combatant, &Vitals, &BodyHandle)>()
            .iter()
        {
            if !matches!(controller, Controller::Human) {
                continue;
            }
            if combatant.team != Team::Defense || !vitals.alive {
                return None;
            }
            return physics
                .body_position(handle.body)
                .filter(|position| position.distance(bomb.position) <= DEFUSE_RANGE)
                .map(|_| entity);
        }
        None
    }

    /// Score the round, pay both teams, and enter the resolve delay.
    /// The loser's streak bonus is paid at its current depth, then the
    /// streak counters move.
    fn conclude(
        &mut self,
        world: &mut World,
        payouts: &PayoutTable,
        winner: Team,
        outcome: RoundOutcome,
    ) {
        self.phase = RoundPhase::Resolving;
        self.resolve_delay.reset(RESOLVE_DELAY);
        self.last_outcome = Some((winner, outcome));

        match winner {
            Team::Attack => self.score_attack += 1,
            Team::Defense => self.score_defense += 1,
        }
        let reason = match outcome {
            RoundOutcome::TimeOut => "time ran out",
            RoundOutcome::Elimination => "enemies eliminated",
            RoundOutcome::Detonation => "the bomb detonated",
            RoundOutcome::Defused => "bomb defused",
        };
        self.message = format!("{} WIN: {}", winner.display_name(), reason);
        self.banner.reset(BANNER_SECONDS);
        log::info!(
            "round {} to {:?} ({}), score {}:{}",
            self.round_number,
            winner,
            reason,
            self.score_attack,
            self.score_defense
        );

        let loser = winner.opponent();
        let loss_bonus = payouts.loss_bonus(self.loss_streak(loser));
        for (_, (combatant, wallet)) in world.query::<(&Combatant, &mut Wallet)>().iter() {
            if combatant.team == winner {
                wallet.earn(payouts.win_bonus);
            } else {
                wallet.earn(loss_bonus);
            }
        }
        match winner {
            Team::Attack => {
                self.loss_streak_attack = 0;
                self.loss_streak_defense += 1;
            }
            Team::Defense => {
                self.loss_streak_defense = 0;
                self.loss_streak_attack += 1;
            }
        }
    }
}

impl Default for RoundState {
    fn default() -> Self {
        Self::new()
    }
}

fn alive_count(world: &World, team: Team) -> u32 {
    world
        .query::<(&Combatant, &Vitals)>()
        .iter()
        .filter(|(_, (combatant, vitals))| combatant.team == team && vitals.alive)
        .count() as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::CombatRecord;
    use crate::player::PlayerState;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    struct Match {
        world: World,
        physics: PhysicsWorld,
        arena: Arena,
        effects: EffectQueue,
        payouts: PayoutTable,
        rng: StdRng,
        round: RoundState,
    }

    impl Match {
        fn new() -> Self {
            let mut physics = PhysicsWorld::new(-30.0, DT);
            let mut rng = StdRng::seed_from_u64(21);
            let arena = Arena::build(&mut physics, &mut rng);
            Self {
                world: World::new(),
                physics,
                arena,
                effects: EffectQueue::default(),
                payouts: PayoutTable::default(),
                rng,
                round: RoundState::new(),
            }
        }

        fn spawn(&mut self, team: Team, controller: Controller, at: Vec3) -> Entity {
            let (body, collider) = self.physics.add_character_body(at, 0.6, 0.4, 80.0, 0.0);
            let loadout = match controller {
                Controller::Human => Loadout::human_default(team.pistol()),
                Controller::Ai => Loadout::bot_default(team.rifle()),
            };
            let entity = self.world.spawn((
                Combatant {
                    name: "x".to_string(),
                    team,
                },
                controller,
                Vitals::new(0.0),
                CombatRecord::default(),
                Wallet::new(self.payouts.start_money),
                loadout,
                BodyHandle { body, collider },
            ));
            if matches!(controller, Controller::Human) {
                let _ = self.world.insert_one(entity, PlayerState::new(team));
            } else {
                let brain = BotBrain::new(Arena::patrol_route(team), &mut self.rng);
                let _ = self.world.insert_one(entity, brain);
            }
            entity
        }

        fn update(&mut self, defuse_held: bool, dt: f32) {
            self.round.update(
                &mut self.world,
                &mut self.physics,
                &mut self.rng,
                &mut self.effects,
                &self.payouts,
                defuse_held,
                dt,
            );
        }

        fn kill(&mut self, entity: Entity) {
            self.world.get::<&mut Vitals>(entity).unwrap().alive = false;
        }

        fn money(&self, entity: Entity) -> u32 {
            self.world.get::<&Wallet>(entity).unwrap().money
        }
    }

    fn standard_match() -> (Match, Entity, Entity) {
        let mut m = Match::new();
        let defender = m.spawn(Team::Defense, Controller::Human, Vec3::new(-40.0, 1.0, 0.0));
        let attacker = m.spawn(Team::Attack, Controller::Ai, Vec3::new(40.0, 1.0, 0.0));
        m.round
            .begin_round(&mut m.world, &mut m.physics, &mut m.rng);
        (m, defender, attacker)
    }

    #[test]
    fn buy_phase_opens_each_round_then_goes_live() {
        let (mut m, _, _) = standard_match();
        assert_eq!(m.round.phase, RoundPhase::BuyPhase);
        assert_eq!(m.round.round_number, 1);
        assert!((m.round.round_time_remaining() - ROUND_TIME).abs() < 1e-3);

        m.update(false, BUY_TIME + 0.1);
        assert_eq!(m.round.phase, RoundPhase::Active);
        // The round clock did not run during the buy window.
        assert!((m.round.round_time_remaining() - ROUND_TIME).abs() < 1e-3);

        m.update(false, 1.0);
        assert!((m.round.round_time_remaining() - (ROUND_TIME - 1.0)).abs() < 1e-3);
    }

    #[test]
    fn clock_expiry_hands_the_round_to_defense() {
        let (mut m, _, _) = standard_match();
        m.update(false, BUY_TIME + 0.1);

        // Clock at 1.0s: a 0.5s tick leaves the round running.
        m.round.clock.remaining = 1.0;
        m.update(false, 0.5);
        assert_eq!(m.round.phase, RoundPhase::Active);
        assert!((m.round.round_time_remaining() - 0.5).abs() < 1e-3);

        // The next 0.6s tick clamps to zero and ends it.
        m.update(false, 0.6);
        assert_eq!(m.round.phase, RoundPhase::Resolving);
        assert_eq!(m.round.round_time_remaining(), 0.0);
        assert_eq!(m.round.score_defense, 1);
        assert_eq!(
            m.round.last_outcome,
            Some((Team::Defense, RoundOutcome::TimeOut))
        );
    }

    #[test]
    fn eliminations_end_the_round_for_the_survivors() {
        let (mut m, defender, attacker) = standard_match();
        m.update(false, BUY_TIME + 0.1);

        m.kill(attacker);
        m.update(false, DT);
        assert_eq!(m.round.score_defense, 1);

        // Next round, the other way around.
        m.update(false, RESOLVE_DELAY + 0.1);
        assert_eq!(m.round.phase, RoundPhase::BuyPhase);
        m.update(false, BUY_TIME + 0.1);
        m.kill(defender);
        m.update(false, DT);
        assert_eq!(m.round.score_attack, 1);
    }

    #[test]
    fn planting_needs_the_site_the_team_and_a_live_round() {
        let (mut m, defender, attacker) = standard_match();

        // Move the attacker onto the site.
        let body = m.world.get::<&BodyHandle>(attacker).unwrap().body;
        m.physics.teleport(body, Vec3::new(0.0, 1.0, 0.0));

        // Not during the buy phase.
        assert!(!m
            .round
            .try_plant(&m.world, &m.physics, &mut m.effects, &m.arena, attacker));

        m.update(false, BUY_TIME + 0.1);

        // Defenders cannot plant.
        assert!(!m
            .round
            .try_plant(&m.world, &m.physics, &mut m.effects, &m.arena, defender));

        // Outside the site radius it fails.
        m.physics.teleport(body, Vec3::new(20.0, 1.0, 0.0));
        assert!(!m
            .round
            .try_plant(&m.world, &m.physics, &mut m.effects, &m.arena, attacker));

        m.physics.teleport(body, Vec3::new(2.0, 1.0, 0.0));
        assert!(m
            .round
            .try_plant(&m.world, &m.physics, &mut m.effects, &m.arena, attacker));
        assert_eq!(m.round.phase, RoundPhase::BombPlanted);
        let bomb = m.round.bomb.as_ref().unwrap();
        assert!((bomb.position.y - 0.15).abs() < 1e-3);
        assert!((bomb.fuse.remaining - BOMB_FUSE).abs() < 1e-3);
    }

    fn plant_at_site(m: &mut Match, attacker: Entity) {
        let body = m.world.get::<&BodyHandle>(attacker).unwrap().body;
        m.physics.teleport(body, Vec3::new(0.0, 1.0, 0.0));
        m.update(false, BUY_TIME + 0.1);
        assert!(m
            .round
            .try_plant(&m.world, &m.physics, &mut m.effects, &m.arena, attacker));
    }

    #[test]
    fn fuse_expiry_wins_for_the_attackers() {
        let (mut m, _, attacker) = standard_match();
        plant_at_site(&mut m, attacker);

        let clock_before = m.round.round_time_remaining();
        m.update(false, BOMB_FUSE + 0.1);
        assert_eq!(m.round.phase, RoundPhase::Resolving);
        assert_eq!(m.round.score_attack, 1);
        assert_eq!(
            m.round.last_outcome,
            Some((Team::Attack, RoundOutcome::Detonation))
        );
        assert!(m.round.bomb.is_none());
        // The round clock stayed frozen the whole time.
        assert_eq!(m.round.round_time_remaining(), clock_before);
    }

    #[test]
    fn attacker_wipe_after_the_plant_does_not_end_the_round() {
        let (mut m, _, attacker) = standard_match();
        plant_at_site(&mut m, attacker);
        m.kill(attacker);

        m.update(false, 1.0);
        assert_eq!(m.round.phase, RoundPhase::BombPlanted);

        // The fuse still decides it.
        m.update(false, BOMB_FUSE);
        assert_eq!(m.round.score_attack, 1);
    }

    #[test]
    fn defender_wipe_after_the_plant_ends_it_immediately() {
        let (mut m, defender, attacker) = standard_match();
        plant_at_site(&mut m, attacker);
        m.kill(defender);

        m.update(false, DT);
        assert_eq!(m.round.phase, RoundPhase::Resolving);
        assert_eq!(
            m.round.last_outcome,
            Some((Team::Attack, RoundOutcome::Elimination))
        );
    }

    #[test]
    fn defusing_needs_sustained_uninterrupted_proximity() {
        let (mut m, defender, attacker) = standard_match();
        plant_at_site(&mut m, attacker);

        // Walk the defender onto the bomb.
        let body = m.world.get::<&BodyHandle>(defender).unwrap().body;
        m.physics.teleport(body, Vec3::new(0.5, 1.0, 0.0));

        m.update(true, 5.0);
        let bomb = m.round.bomb.as_ref().unwrap();
        assert!((bomb.defuse_progress - 5.0).abs() < 1e-3);
        assert_eq!(bomb.defuser, Some(defender));

        // Letting go resets everything.
        m.update(false, DT);
        let bomb = m.round.bomb.as_ref().unwrap();
        assert_eq!(bomb.defuse_progress, 0.0);
        assert_eq!(bomb.defuser, None);

        // Hold it through: defense wins and the bomb is gone.
        m.update(true, DEFUSE_TIME + 0.1);
        assert_eq!(m.round.phase, RoundPhase::Resolving);
        assert_eq!(m.round.score_defense, 1);
        assert_eq!(
            m.round.last_outcome,
            Some((Team::Defense, RoundOutcome::Defused))
        );
        assert!(m.round.bomb.is_none());
    }

    #[test]
    fn round_banner_fades_after_its_window() {
        let (mut m, _, _) = standard_match();
        assert_eq!(m.round.message, "Round 1");

        m.update(false, BANNER_SECONDS / 2.0);
        assert_eq!(m.round.message, "Round 1");

        // Fades well inside the buy window.
        m.update(false, BANNER_SECONDS / 2.0 + 0.1);
        assert!(m.round.message.is_empty());
        assert_eq!(m.round.phase, RoundPhase::BuyPhase);
    }

    #[test]
    fn defusing_out_of_range_makes_no_progress() {
        let (mut m, defender, attacker) = standard_match();
        plant_at_site(&mut m, attacker);

        let body = m.world.get::<&BodyHandle>(defender).unwrap().body;
        m.physics.teleport(body, Vec3::new(10.0, 1.0, 0.0));
        m.update(true, 5.0);
        assert_eq!(m.round.bomb.as_ref().unwrap().defuse_progress, 0.0);
    }

    #[test]
    fn payouts_follow_the_streak_then_reset_on_a_win() {
        let (mut m, defender, attacker) = standard_match();
        m.update(false, BUY_TIME + 0.1);

        // Round 1: attack loses at full time.
        let attacker_before = m.money(attacker);
        let defender_before = m.money(defender);
        m.round.clock.remaining = DT / 2.0;
        m.update(false, DT);
        assert_eq!(
            m.money(defender) - defender_before,
            m.payouts.win_bonus
        );
        // First loss pays the base bonus.
        assert_eq!(
            m.money(attacker) - attacker_before,
            m.payouts.loss_bonus_base
        );
        assert_eq!(m.round.loss_streak(Team::Attack), 1);

        // Round 2: attack loses again, one step deeper.
        m.update(false, RESOLVE_DELAY + 0.1);
        m.update(false, BUY_TIME + 0.1);
        let attacker_before = m.money(attacker);
        m.round.clock.remaining = DT / 2.0;
        m.update(false, DT);
        assert_eq!(
            m.money(attacker) - attacker_before,
            m.payouts.loss_bonus_base + m.payouts.loss_bonus_step
        );
        assert_eq!(m.round.loss_streak(Team::Attack), 2);

        // Round 3: attack finally wins; their streak clears, and the
        // defense streak starts.
        m.update(false, RESOLVE_DELAY + 0.1);
        m.update(false, BUY_TIME + 0.1);
        m.kill(defender);
        m.update(false, DT);
        assert_eq!(m.round.loss_streak(Team::Attack), 0);
        assert_eq!(m.round.loss_streak(Team::Defense), 1);
    }

    #[test]
    fn round_reset_revives_rearms_and_clears_the_bomb() {
        let (mut m, defender, attacker) = standard_match();
        plant_at_site(&mut m, attacker);

        // Give the human a rifle and some damage, then let the fuse blow.
        {
            let mut loadout = m.world.get::<&mut Loadout>(defender).unwrap();
            loadout.give(crate::weapons::Weapon::new(crate::weapons::WeaponKind::Ak47));
        }
        m.world
            .get::<&mut Vitals>(defender)
            .unwrap()
            .health
            .current = 30.0;
        m.update(false, BOMB_FUSE + 0.1);
        assert_eq!(m.round.phase, RoundPhase::Resolving);

        m.update(false, RESOLVE_DELAY + 0.1);
        assert_eq!(m.round.phase, RoundPhase::BuyPhase);
        assert_eq!(m.round.round_number, 2);
        assert!(m.round.bomb.is_none());

        // Revived at full health; the bought primary did not carry over.
        let vitals = *m.world.get::<&Vitals>(defender).unwrap();
        assert!(vitals.alive);
        assert_eq!(vitals.health.current, 100.0);
        let loadout = m.world.get::<&Loadout>(defender).unwrap();
        assert!(loadout
            .weapon_in(crate::weapons::WeaponSlot::Primary)
            .is_none());

        // Bot armor refreshed, human starts bare.
        assert_eq!(vitals.armor, 0.0);
        let bot_vitals = *m.world.get::<&Vitals>(attacker).unwrap();
        assert_eq!(bot_vitals.armor, BOT_ARMOR);

        // Both bodies teleported back to their own halves.
        let defender_body = m.world.get::<&BodyHandle>(defender).unwrap().body;
        let attacker_body = m.world.get::<&BodyHandle>(attacker).unwrap().body;
        assert!(m.physics.body_position(defender_body).unwrap().x < -30.0);
        assert!(m.physics.body_position(attacker_body).unwrap().x > 30.0);
    }
}
