//! openstrike - round-based team shooter simulation, played out headless.

mod arena;
mod bots;
mod combat;
mod config;
mod economy;
mod effects;
mod entity;
mod grenades;
mod player;
mod rounds;
mod sim;
mod snapshot;
mod weapons;

use anyhow::Result;
use glam::Vec2;
use input::ActionEvent;

use config::MatchConfig;
use effects::{EffectRequest, SoundCue};
use entity::Team;
use rounds::RoundPhase;
use sim::Simulation;
use snapshot::Snapshot;

const FRAME_DT: f32 = 1.0 / 60.0;
/// First team to this many round wins takes the match.
const ROUNDS_TO_WIN: u32 = 3;
/// Hard stop for the demo, in simulated seconds.
const MATCH_TIME_CAP: f32 = 900.0;

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    println!("╔══════════════════════════════════════════════════════════════════╗");
    println!("║                            openstrike                            ║");
    println!("╠══════════════════════════════════════════════════════════════════╣");
    println!("║  Headless bomb-defusal match. Two bot teams fight over the       ║");
    println!("║  center plant site; a scripted player tags along on your side.   ║");
    println!("║                                                                  ║");
    println!("║  Rounds: buy phase, live round, bomb plant/defuse, payouts.      ║");
    println!("║  Configure via match.ron (written next to the binary):           ║");
    println!("║    player_team, teammate_bots, enemy_bots, seed, payouts         ║");
    println!("╚══════════════════════════════════════════════════════════════════╝");

    let config = MatchConfig::load();
    if !std::path::Path::new("match.ron").exists() {
        config.save();
    }

    log::info!("Starting openstrike");
    let mut sim = Simulation::new(&config)?;

    let mut events: Vec<ActionEvent> = Vec::new();
    let mut last_message = String::new();
    let mut shots_heard: u64 = 0;
    let mut explosions: u64 = 0;
    let mut particles_spawned: u64 = 0;

    let final_snapshot = loop {
        let snapshot = sim.tick(FRAME_DT, &events);

        for effect in sim.drain_effects() {
            match effect {
                EffectRequest::PlaySound {
                    cue: SoundCue::GunShot,
                } => shots_heard += 1,
                EffectRequest::PlaySound {
                    cue: SoundCue::Explosion,
                } => explosions += 1,
                EffectRequest::PlaySound { .. } => {}
                EffectRequest::SpawnParticles { count, .. } => {
                    particles_spawned += u64::from(count)
                }
            }
        }

        if snapshot.message != last_message {
            if !snapshot.message.is_empty() {
                log::info!(
                    "DEF {} : {} ATK | {}",
                    snapshot.score_defense,
                    snapshot.score_attack,
                    snapshot.message
                );
            }
            last_message = snapshot.message.clone();
        }

        let decided = snapshot.score_attack >= ROUNDS_TO_WIN
            || snapshot.score_defense >= ROUNDS_TO_WIN;
        if decided || sim.elapsed_seconds() >= MATCH_TIME_CAP {
            break snapshot;
        }
        events = script_player(&snapshot);
    };

    println!();
    println!(
        "Final score: DEFENDERS {} - {} ATTACKERS",
        final_snapshot.score_defense, final_snapshot.score_attack
    );
    println!("{:<12} {:>4} {:>6} {:>7} {:>6}", "NAME", "TEAM", "KILLS", "DEATHS", "ALIVE");
    for row in &final_snapshot.scoreboard {
        let side = match row.team {
            Team::Attack => "ATK",
            Team::Defense => "DEF",
        };
        println!(
            "{:<12} {:>4} {:>6} {:>7} {:>6}",
            row.name, side, row.kills, row.deaths, row.alive
        );
    }
    println!(
        "Simulated {:.0}s: {} shots, {} explosions, {} particles requested",
        sim.elapsed_seconds(),
        shots_heard,
        explosions,
        particles_spawned
    );

    Ok(())
}

/// Scripted stand-in for a human: buys armor, pushes mid with the
/// trigger held, reloads dry magazines, and leans on the bomb when one
/// is down.
fn script_player(snapshot: &Snapshot) -> Vec<ActionEvent> {
    let mut events = Vec::new();
    match snapshot.phase {
        RoundPhase::BuyPhase => {
            events.push(ActionEvent::Move(Vec2::ZERO));
            events.push(ActionEvent::Fire { held: false });
            events.push(ActionEvent::Defuse { held: false });
            if snapshot.armor == 0 && snapshot.money >= 650 {
                events.push(ActionEvent::Buy {
                    item: "Armor".to_string(),
                });
            }
        }
        RoundPhase::Active | RoundPhase::BombPlanted => {
            if snapshot.alive {
                events.push(ActionEvent::Move(Vec2::new(0.0, 1.0)));
                events.push(ActionEvent::Fire { held: true });
                if snapshot.ammo == 0 && snapshot.reserve_ammo > 0 {
                    events.push(ActionEvent::Reload);
                }
                if snapshot.bomb.is_some() {
                    events.push(ActionEvent::Defuse { held: true });
                }
            }
        }
        RoundPhase::Resolving => {
            events.push(ActionEvent::Move(Vec2::ZERO));
            events.push(ActionEvent::Fire { held: false });
            events.push(ActionEvent::Defuse { held: false });
        }
    }
    events
}
