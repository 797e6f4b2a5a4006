//! Combatant components shared by the human player and bots.

use engine_core::Health;
use physics::{ColliderHandle, RigidBodyHandle};
use serde::{Deserialize, Serialize};

use crate::weapons::WeaponKind;

/// Which side of the match an entity fights for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Team {
    Attack,
    Defense,
}

impl Team {
    pub fn opponent(self) -> Team {
        match self {
            Team::Attack => Team::Defense,
            Team::Defense => Team::Attack,
        }
    }

    /// Banner-style display name.
    pub fn display_name(self) -> &'static str {
        match self {
            Team::Attack => "ATTACKERS",
            Team::Defense => "DEFENDERS",
        }
    }

    /// Sidearm issued at round start.
    pub fn pistol(self) -> WeaponKind {
        match self {
            Team::Attack => WeaponKind::Glock,
            Team::Defense => WeaponKind::Usp,
        }
    }

    /// Rifle bots carry.
    pub fn rifle(self) -> WeaponKind {
        match self {
            Team::Attack => WeaponKind::Ak47,
            Team::Defense => WeaponKind::M4a1,
        }
    }
}

/// Who drives this entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Controller {
    Human,
    Ai,
}

/// Identity: callsign plus team.
#[derive(Debug, Clone)]
pub struct Combatant {
    pub name: String,
    pub team: Team,
}

/// Result of applying raw damage through armor.
#[derive(Debug, Clone, Copy)]
pub struct DamageOutcome {
    pub absorbed: f32,
    pub dealt: f32,
    /// True only on the application that dropped the entity.
    pub lethal: bool,
}

/// Health, armor, and the alive flag.
#[derive(Debug, Clone, Copy)]
pub struct Vitals {
    pub health: Health,
    pub armor: f32,
    pub alive: bool,
}

impl Vitals {
    pub fn new(armor: f32) -> Self {
        Self {
            health: Health::new(100.0),
            armor,
            alive: true,
        }
    }

    /// Apply raw damage: armor soaks half of it, capped by the armor left.
    /// Health clamps at zero and the entity dies exactly once.
    pub fn apply_damage(&mut self, damage: f32) -> DamageOutcome {
        let absorbed = self.armor.min(damage * 0.5);
        self.armor -= absorbed;
        let dealt = damage - absorbed;
        let was_alive = self.alive;
        let remaining = self.health.take_damage(dealt);
        if remaining <= 0.0 {
            self.alive = false;
        }
        DamageOutcome {
            absorbed,
            dealt,
            lethal: was_alive && !self.alive,
        }
    }

    /// Round reset: full health, fresh armor value, back among the living.
    pub fn revive(&mut self, armor: f32) {
        self.health.restore();
        self.armor = armor;
        self.alive = true;
    }
}

/// Lifetime kill/death tally. Never reset between rounds.
#[derive(Debug, Clone, Copy, Default)]
pub struct CombatRecord {
    pub kills: u32,
    pub deaths: u32,
}

/// Per-entity money balance.
#[derive(Debug, Clone, Copy)]
pub struct Wallet {
    pub money: u32,
}

impl Wallet {
    pub fn new(money: u32) -> Self {
        Self { money }
    }

    /// Deduct `cost` if affordable. Returns whether the purchase went
    /// through.
    pub fn spend(&mut self, cost: u32) -> bool {
        if self.money < cost {
            return false;
        }
        self.money -= cost;
        true
    }

    pub fn earn(&mut self, amount: u32) {
        self.money += amount;
    }
}

/// Handles into the physics world for this entity's capsule.
#[derive(Debug, Clone, Copy)]
pub struct BodyHandle {
    pub body: RigidBodyHandle,
    pub collider: ColliderHandle,
}
