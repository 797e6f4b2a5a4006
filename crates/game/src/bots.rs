//! Per-bot finite-state AI: patrol, attack, search.

use engine_core::{Entity, Vec3, World};
use physics::PhysicsWorld;
use rand::rngs::StdRng;
use rand::Rng;

use crate::combat::{self, Shot, BOT_REACH};
use crate::effects::{EffectQueue, SoundCue};
use crate::entity::{BodyHandle, Combatant, Team, Vitals};
use crate::weapons::Loadout;

/// Enemies inside this radius are noticed. There is no line-of-sight
/// occlusion test; detection is distance only.
pub const PERCEPTION_RADIUS: f32 = 60.0;
/// Alertness drains at this rate once the target is lost.
pub const ALERTNESS_DECAY: f32 = 0.2;
/// Seconds spent searching a last-known position before giving up.
pub const SEARCH_TIMEOUT: f32 = 5.0;
/// A patrol waypoint counts as reached inside this radius.
pub const WAYPOINT_RADIUS: f32 = 3.0;

pub const PATROL_SPEED: f32 = 25.0;
pub const CHASE_SPEED: f32 = 27.5;
pub const RETREAT_SPEED: f32 = 15.0;
pub const STRAFE_SPEED: f32 = 17.5;
/// Engagement band: close in beyond the far edge, back off inside the
/// near edge, strafe in between.
pub const BAND_FAR: f32 = 25.0;
pub const BAND_NEAR: f32 = 12.0;

/// Widest possible bot aim cone, radians. A bot's accuracy stat narrows
/// it at close range.
const SPREAD_BASE: f32 = 0.6;
/// Muzzle height above the capsule center.
const MUZZLE_RISE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotState {
    Patrol,
    Attack,
    Search,
}

/// AI fields for one bot, attached alongside the shared combatant
/// components.
#[derive(Debug, Clone)]
pub struct BotBrain {
    pub state: BotState,
    pub patrol_index: usize,
    pub target: Option<Entity>,
    pub last_known: Option<Vec3>,
    pub alertness: f32,
    pub search_timer: f32,
    /// Rolled once at creation, 0.35..0.55. Persists across rounds.
    pub accuracy: f32,
    pub route: [Vec3; 5],
}

impl BotBrain {
    pub fn new(route: [Vec3; 5], rng: &mut StdRng) -> Self {
        Self {
            state: BotState::Patrol,
            patrol_index: 0,
            target: None,
            last_known: None,
            alertness: 0.0,
            search_timer: 0.0,
            accuracy: 0.35 + rng.gen::<f32>() * 0.2,
            route,
        }
    }

    /// Round reset: back to the start of the route, memory wiped.
    /// Accuracy is the bot's identity and stays.
    pub fn reset(&mut self) {
        self.state = BotState::Patrol;
        self.patrol_index = 0;
        self.target = None;
        self.last_known = None;
        self.alertness = 0.0;
        self.search_timer = 0.0;
    }
}

/// Advance every living bot one think step. Movement goes straight to the
/// physics bodies; trigger pulls are queued as shots for the combat pass.
pub fn update_bots(
    world: &mut World,
    physics: &mut PhysicsWorld,
    rng: &mut StdRng,
    effects: &mut EffectQueue,
    shots: &mut Vec<Shot>,
    dt: f32,
) {
    // One read of every living combatant's position, shared by all bots
    // this tick, so think order does not change what anyone sees.
    let mut living: Vec<(Entity, Team, Vec3)> = Vec::new();
    for (entity, (combatant, vitals, handle)) in
        world.query::<(&Combatant, &Vitals, &BodyHandle)>().iter()
    {
        if vitals.alive {
            if let Some(position) = physics.body_position(handle.body) {
                living.push((entity, combatant.team, position));
            }
        }
    }

    for (entity, (brain, combatant, vitals, loadout, handle)) in world
        .query::<(&mut BotBrain, &Combatant, &Vitals, &mut Loadout, &BodyHandle)>()
        .iter()
    {
        if !vitals.alive {
            continue;
        }
        let Some(position) = physics.body_position(handle.body) else {
            continue;
        };

        match nearest_enemy(&living, combatant.team, position) {
            Some((target, target_pos, distance)) => {
                brain.state = BotState::Attack;
                brain.target = Some(target);
                brain.last_known = Some(target_pos);
                brain.alertness = 1.0;
                brain.search_timer = 0.0;

                attack_movement(physics, handle, position, target_pos, distance);

                if let Some(kind) = combat::try_fire(loadout) {
                    let muzzle = position + Vec3::new(0.0, MUZZLE_RISE, 0.0);
                    let aim = (target_pos - muzzle).normalize_or_zero();
                    let focus = brain.accuracy * (1.0 - distance / BOT_REACH).max(0.0);
                    let direction = combat::perturb(aim, (1.0 - focus) * SPREAD_BASE, rng);
                    shots.push(Shot {
                        shooter: entity,
                        shooter_body: handle.body,
                        origin: muzzle,
                        direction,
                        kind,
                    });
                    effects.sound(SoundCue::GunShot);
                }
            }
            None => {
                brain.target = None;
                brain.alertness = (brain.alertness - ALERTNESS_DECAY * dt).max(0.0);
                if brain.state == BotState::Attack {
                    brain.state = BotState::Search;
                }
                if brain.state == BotState::Search {
                    brain.search_timer += dt;
                    if brain.search_timer > SEARCH_TIMEOUT || brain.alertness <= 0.0 {
                        brain.last_known = None;
                        brain.search_timer = 0.0;
                        brain.state = BotState::Patrol;
                    }
                }

                match brain.state {
                    BotState::Search => {
                        if let Some(goal) = brain.last_known {
                            if planar_distance(position, goal) < WAYPOINT_RADIUS {
                                // Arrived and found nothing; stand and listen
                                // until alertness drains.
                                brain.last_known = None;
                                physics.set_planar_velocity(handle.body, 0.0, 0.0);
                            } else {
                                walk_toward(physics, handle, position, goal, PATROL_SPEED);
                            }
                        } else {
                            physics.set_planar_velocity(handle.body, 0.0, 0.0);
                        }
                    }
                    _ => {
                        let goal = brain.route[brain.patrol_index];
                        if planar_distance(position, goal) < WAYPOINT_RADIUS {
                            brain.patrol_index = (brain.patrol_index + 1) % brain.route.len();
                        }
                        let goal = brain.route[brain.patrol_index];
                        walk_toward(physics, handle, position, goal, PATROL_SPEED);
                    }
                }
            }
        }

        // Never walk around with an empty magazine.
        if let Some(weapon) = loadout.active_weapon_mut() {
            if weapon.ammo == 0 && !weapon.is_reloading && weapon.reserve > 0 {
                weapon.start_reload();
            }
        }
    }
}

fn nearest_enemy(
    living: &[(Entity, Team, Vec3)],
    team: Team,
    position: Vec3,
) -> Option<(Entity, Vec3, f32)> {
    let mut best: Option<(Entity, Vec3, f32)> = None;
    for (entity, other_team, other_pos) in living {
        if *other_team == team {
            continue;
        }
        let distance = position.distance(*other_pos);
        if distance > PERCEPTION_RADIUS {
            continue;
        }
        if best.map_or(true, |(_, _, d)| distance < d) {
            best = Some((*entity, *other_pos, distance));
        }
    }
    best
}

fn attack_movement(
    physics: &mut PhysicsWorld,
    handle: &BodyHandle,
    position: Vec3,
    target_pos: Vec3,
    distance: f32,
) {
    let dir = planar_direction(position, target_pos);
    let velocity = if distance > BAND_FAR {
        dir * CHASE_SPEED
    } else if distance < BAND_NEAR {
        dir * -RETREAT_SPEED
    } else {
        Vec3::new(-dir.z, 0.0, dir.x) * STRAFE_SPEED
    };
    physics.set_planar_velocity(handle.body, velocity.x, velocity.z);
}

fn walk_toward(
    physics: &mut PhysicsWorld,
    handle: &BodyHandle,
    position: Vec3,
    goal: Vec3,
    speed: f32,
) {
    let dir = planar_direction(position, goal);
    physics.set_planar_velocity(handle.body, dir.x * speed, dir.z * speed);
}

fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    Vec3::new(to.x - from.x, 0.0, to.z - from.z).normalize_or_zero()
}

fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    let dx = a.x - b.x;
    let dz = a.z - b.z;
    (dx * dx + dz * dz).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::Arena;
    use crate::entity::{CombatRecord, Controller, Wallet};
    use crate::weapons::WeaponKind;
    use rand::SeedableRng;

    const DT: f32 = 1.0 / 60.0;

    struct Field {
        world: World,
        physics: PhysicsWorld,
        effects: EffectQueue,
        rng: StdRng,
        shots: Vec<Shot>,
    }

    impl Field {
        fn new() -> Self {
            let mut physics = PhysicsWorld::new(-30.0, DT);
            physics.add_static_cuboid(Vec3::new(0.0, -0.5, 0.0), Vec3::new(50.0, 0.5, 50.0));
            Self {
                world: World::new(),
                physics,
                effects: EffectQueue::default(),
                rng: StdRng::seed_from_u64(11),
                shots: Vec::new(),
            }
        }

        fn spawn_bot(&mut self, team: Team, at: Vec3) -> Entity {
            let (body, collider) = self.physics.add_character_body(at, 0.6, 0.4, 80.0, 0.0);
            let brain = BotBrain::new(Arena::patrol_route(team), &mut self.rng);
            self.world.spawn((
                Combatant {
                    name: "bot".to_string(),
                    team,
                },
                Controller::Ai,
                Vitals::new(50.0),
                CombatRecord::default(),
                Wallet::new(800),
                Loadout::bot_default(team.rifle()),
                brain,
                BodyHandle { body, collider },
            ))
        }

        fn spawn_target(&mut self, team: Team, at: Vec3) -> Entity {
            let (body, collider) = self.physics.add_character_body(at, 0.6, 0.4, 80.0, 0.0);
            self.world.spawn((
                Combatant {
                    name: "target".to_string(),
                    team,
                },
                Controller::Human,
                Vitals::new(0.0),
                CombatRecord::default(),
                Wallet::new(800),
                BodyHandle { body, collider },
            ))
        }

        fn think(&mut self, dt: f32) {
            update_bots(
                &mut self.world,
                &mut self.physics,
                &mut self.rng,
                &mut self.effects,
                &mut self.shots,
                dt,
            );
        }

        fn brain(&self, bot: Entity) -> BotBrain {
            (*self.world.get::<&BotBrain>(bot).unwrap()).clone()
        }

        fn velocity(&self, bot: Entity) -> Vec3 {
            let handle = self.world.get::<&BodyHandle>(bot).unwrap();
            self.physics.body_velocity(handle.body).unwrap()
        }
    }

    #[test]
    fn lone_bot_patrols_its_route() {
        let mut field = Field::new();
        let bot = field.spawn_bot(Team::Defense, Vec3::new(-40.0, 1.0, 10.0));

        field.think(DT);
        let brain = field.brain(bot);
        assert_eq!(brain.state, BotState::Patrol);

        // First waypoint is (-40, 2, 0): from z=10 the bot walks -z.
        let velocity = field.velocity(bot);
        assert!(velocity.z < 0.0);
        let planar_speed = Vec3::new(velocity.x, 0.0, velocity.z).length();
        assert!((planar_speed - PATROL_SPEED).abs() < 0.1);
        assert!(field.shots.is_empty());
    }

    #[test]
    fn waypoint_advances_when_reached() {
        let mut field = Field::new();
        // Right on top of the first waypoint.
        let bot = field.spawn_bot(Team::Defense, Vec3::new(-40.0, 1.0, 0.0));
        field.think(DT);
        assert_eq!(field.brain(bot).patrol_index, 1);
        // Now heading for (-20, 2, 0), which is +x.
        assert!(field.velocity(bot).x > 0.0);
    }

    #[test]
    fn enemy_inside_perception_triggers_attack_and_a_shot() {
        let mut field = Field::new();
        let bot = field.spawn_bot(Team::Defense, Vec3::new(0.0, 1.0, 0.0));
        let enemy = field.spawn_target(Team::Attack, Vec3::new(30.0, 1.0, 0.0));

        field.think(DT);
        let brain = field.brain(bot);
        assert_eq!(brain.state, BotState::Attack);
        assert_eq!(brain.target, Some(enemy));
        assert!(brain.last_known.is_some());
        assert_eq!(field.shots.len(), 1);
        assert_eq!(field.shots[0].shooter, bot);
        assert_eq!(field.shots[0].kind, WeaponKind::M4a1);
    }

    #[test]
    fn enemy_beyond_perception_is_ignored() {
        let mut field = Field::new();
        let bot = field.spawn_bot(Team::Defense, Vec3::new(-40.0, 1.0, 0.0));
        field.spawn_target(Team::Attack, Vec3::new(40.0, 1.0, 0.0));

        field.think(DT);
        assert_eq!(field.brain(bot).state, BotState::Patrol);
        assert!(field.shots.is_empty());
    }

    #[test]
    fn dead_enemies_are_invisible() {
        let mut field = Field::new();
        let bot = field.spawn_bot(Team::Defense, Vec3::new(0.0, 1.0, 0.0));
        let enemy = field.spawn_target(Team::Attack, Vec3::new(20.0, 1.0, 0.0));
        field.world.get::<&mut Vitals>(enemy).unwrap().alive = false;

        field.think(DT);
        assert_eq!(field.brain(bot).state, BotState::Patrol);
    }

    #[test]
    fn losing_the_target_searches_then_gives_up() {
        let mut field = Field::new();
        let bot = field.spawn_bot(Team::Defense, Vec3::new(0.0, 1.0, 0.0));
        let enemy = field.spawn_target(Team::Attack, Vec3::new(30.0, 1.0, 0.0));

        field.think(DT);
        assert_eq!(field.brain(bot).state, BotState::Attack);

        field.world.get::<&mut Vitals>(enemy).unwrap().alive = false;
        field.think(DT);
        let brain = field.brain(bot);
        assert_eq!(brain.state, BotState::Search);
        assert!(brain.last_known.is_some());

        // Exhaust the search window in one long think.
        field.think(SEARCH_TIMEOUT + 0.1);
        assert_eq!(field.brain(bot).state, BotState::Patrol);
        assert!(field.brain(bot).last_known.is_none());
    }

    #[test]
    fn engagement_band_controls_spacing() {
        let mut field = Field::new();
        let far_bot = field.spawn_bot(Team::Defense, Vec3::new(0.0, 1.0, 0.0));
        let near_bot = field.spawn_bot(Team::Defense, Vec3::new(0.0, 1.0, 30.0));
        let mid_bot = field.spawn_bot(Team::Defense, Vec3::new(0.0, 1.0, -30.0));
        field.spawn_target(Team::Attack, Vec3::new(40.0, 1.0, 0.0));
        field.spawn_target(Team::Attack, Vec3::new(5.0, 1.0, 30.0));
        field.spawn_target(Team::Attack, Vec3::new(18.0, 1.0, -30.0));

        field.think(DT);

        // Beyond the band: close in (+x toward the target).
        assert!(field.velocity(far_bot).x > 0.0);
        // Inside the band: back away (-x).
        assert!(field.velocity(near_bot).x < 0.0);
        // In the band: strafe, no closing component.
        let strafe = field.velocity(mid_bot);
        assert!(strafe.x.abs() < 0.1);
        assert!(strafe.z.abs() > 1.0);
    }

    #[test]
    fn dry_magazine_starts_a_reload() {
        let mut field = Field::new();
        let bot = field.spawn_bot(Team::Defense, Vec3::new(0.0, 1.0, 0.0));
        field.spawn_target(Team::Attack, Vec3::new(30.0, 1.0, 0.0));
        {
            let mut loadout = field.world.get::<&mut Loadout>(bot).unwrap();
            let weapon = loadout.active_weapon_mut().unwrap();
            weapon.ammo = 0;
        }

        field.think(DT);
        let loadout = field.world.get::<&Loadout>(bot).unwrap();
        let weapon = loadout.active_weapon().unwrap();
        assert!(weapon.is_reloading);
        // The dry pull produced no shot.
        assert!(field.shots.is_empty());
    }
}
