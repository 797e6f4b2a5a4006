//! Match configuration. Loaded from match.ron at startup.

use serde::{Deserialize, Serialize};

use crate::entity::Team;

/// Economy constants. The exact numbers are tuning, not rules, so they
/// ride in the config rather than the code.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PayoutTable {
    /// Money every entity starts the match with.
    #[serde(default = "default_start_money")]
    pub start_money: u32,
    /// Paid to the shooter per kill.
    #[serde(default = "default_kill_reward")]
    pub kill_reward: u32,
    /// Paid to every member of the winning team.
    #[serde(default = "default_win_bonus")]
    pub win_bonus: u32,
    /// Loss bonus floor.
    #[serde(default = "default_loss_bonus_base")]
    pub loss_bonus_base: u32,
    /// Added per consecutive loss.
    #[serde(default = "default_loss_bonus_step")]
    pub loss_bonus_step: u32,
    /// Cap on the scaling part of the loss bonus.
    #[serde(default = "default_loss_bonus_max_extra")]
    pub loss_bonus_max_extra: u32,
}

fn default_start_money() -> u32 {
    800
}
fn default_kill_reward() -> u32 {
    300
}
fn default_win_bonus() -> u32 {
    3500
}
fn default_loss_bonus_base() -> u32 {
    1400
}
fn default_loss_bonus_step() -> u32 {
    500
}
fn default_loss_bonus_max_extra() -> u32 {
    3400
}

impl Default for PayoutTable {
    fn default() -> Self {
        Self {
            start_money: default_start_money(),
            kill_reward: default_kill_reward(),
            win_bonus: default_win_bonus(),
            loss_bonus_base: default_loss_bonus_base(),
            loss_bonus_step: default_loss_bonus_step(),
            loss_bonus_max_extra: default_loss_bonus_max_extra(),
        }
    }
}

impl PayoutTable {
    /// Loss payout for a team that had `streak` consecutive losses before
    /// this one. The first loss after a win pays exactly the base.
    pub fn loss_bonus(&self, streak: u32) -> u32 {
        self.loss_bonus_base + (streak * self.loss_bonus_step).min(self.loss_bonus_max_extra)
    }
}

/// Match settings. Loaded from `match.ron` in the current directory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchConfig {
    /// Side the human plays on.
    #[serde(default = "default_player_team")]
    pub player_team: Team,
    /// Bots on the human's team, 0..=9.
    #[serde(default = "default_teammate_bots")]
    pub teammate_bots: u32,
    /// Bots on the opposing team, 1..=9.
    #[serde(default = "default_enemy_bots")]
    pub enemy_bots: u32,
    /// RNG seed. Omit for a fresh seed each match.
    #[serde(default)]
    pub seed: Option<u64>,
    #[serde(default)]
    pub payouts: PayoutTable,
}

fn default_player_team() -> Team {
    Team::Defense
}
fn default_teammate_bots() -> u32 {
    4
}
fn default_enemy_bots() -> u32 {
    5
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            player_team: default_player_team(),
            teammate_bots: default_teammate_bots(),
            enemy_bots: default_enemy_bots(),
            seed: None,
            payouts: PayoutTable::default(),
        }
    }
}

impl MatchConfig {
    /// Load config from `match.ron`. If the file is missing or invalid,
    /// returns the defaults.
    pub fn load() -> Self {
        let path = config_path();
        if let Ok(data) = std::fs::read_to_string(&path) {
            match ron::from_str(&data) {
                Ok(c) => return c,
                Err(e) => log::warn!("Invalid config at {:?}: {}, using defaults", path, e),
            }
        }
        Self::default()
    }

    /// Save current config to `match.ron`. Logs on error.
    pub fn save(&self) {
        let path = config_path();
        if let Ok(s) = ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default()) {
            if let Err(e) = std::fs::write(&path, s) {
                log::warn!("Could not write config to {:?}: {}", path, e);
            }
        }
    }
}

fn config_path() -> std::path::PathBuf {
    std::env::current_dir()
        .unwrap_or_else(|_| std::path::PathBuf::from("."))
        .join("match.ron")
}
