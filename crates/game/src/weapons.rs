//! Weapon catalog and per-weapon firing/reload state.

use engine_core::Countdown;

/// Every weapon in the match catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeaponKind {
    Knife,
    Glock,
    Usp,
    Ak47,
    M4a1,
    Awp,
    HeGrenade,
    Flashbang,
    SmokeGrenade,
}

/// Broad class, which decides raycast range and how firing behaves.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponClass {
    Melee,
    Pistol,
    Rifle,
    Sniper,
    Grenade,
}

/// Loadout slot, matching the 1..=6 selection keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WeaponSlot {
    Pistol,
    Primary,
    Knife,
    He,
    Flash,
    Smoke,
}

impl WeaponSlot {
    pub const COUNT: usize = 6;

    pub fn index(self) -> usize {
        match self {
            WeaponSlot::Pistol => 0,
            WeaponSlot::Primary => 1,
            WeaponSlot::Knife => 2,
            WeaponSlot::He => 3,
            WeaponSlot::Flash => 4,
            WeaponSlot::Smoke => 5,
        }
    }

    /// Map a selection key (1..=6) to a slot.
    pub fn from_key(key: u8) -> Option<Self> {
        match key {
            1 => Some(WeaponSlot::Pistol),
            2 => Some(WeaponSlot::Primary),
            3 => Some(WeaponSlot::Knife),
            4 => Some(WeaponSlot::He),
            5 => Some(WeaponSlot::Flash),
            6 => Some(WeaponSlot::Smoke),
            _ => None,
        }
    }
}

/// Static stats for one catalog entry.
#[derive(Debug, Clone, Copy)]
pub struct WeaponStats {
    pub name: &'static str,
    pub class: WeaponClass,
    pub slot: WeaponSlot,
    pub damage: f32,
    /// Seconds between shots.
    pub fire_interval: f32,
    pub magazine: u32,
    pub reserve: u32,
    pub reload_time: f32,
    /// Aim perturbation scale, radians.
    pub spread: f32,
    /// Maximum hitscan distance; damage falloff floors at this range.
    pub range: f32,
    pub price: u32,
}

impl WeaponKind {
    pub fn stats(self) -> WeaponStats {
        // name, class, slot, damage, interval, mag, reserve, reload, spread, range, price
        let (name, class, slot, damage, fire_interval, magazine, reserve, reload_time, spread, range, price) =
            match self {
                WeaponKind::Knife => ("Knife", WeaponClass::Melee, WeaponSlot::Knife, 65.0, 0.6, 0, 0, 0.0, 0.0, 2.5, 0),
                WeaponKind::Glock => ("Glock", WeaponClass::Pistol, WeaponSlot::Pistol, 28.0, 0.12, 20, 120, 2.2, 0.018, 250.0, 0),
                WeaponKind::Usp => ("USP", WeaponClass::Pistol, WeaponSlot::Pistol, 35.0, 0.18, 12, 100, 2.2, 0.012, 250.0, 0),
                WeaponKind::Ak47 => ("AK-47", WeaponClass::Rifle, WeaponSlot::Primary, 36.0, 0.10, 30, 90, 2.5, 0.022, 300.0, 2700),
                WeaponKind::M4a1 => ("M4A1", WeaponClass::Rifle, WeaponSlot::Primary, 33.0, 0.09, 30, 90, 2.5, 0.018, 300.0, 3100),
                WeaponKind::Awp => ("AWP", WeaponClass::Sniper, WeaponSlot::Primary, 115.0, 1.5, 10, 30, 3.0, 0.001, 400.0, 4750),
                WeaponKind::HeGrenade => ("HE Grenade", WeaponClass::Grenade, WeaponSlot::He, 100.0, 1.0, 1, 0, 0.0, 0.0, 0.0, 300),
                WeaponKind::Flashbang => ("Flashbang", WeaponClass::Grenade, WeaponSlot::Flash, 0.0, 1.0, 1, 0, 0.0, 0.0, 0.0, 200),
                WeaponKind::SmokeGrenade => ("Smoke", WeaponClass::Grenade, WeaponSlot::Smoke, 0.0, 1.0, 1, 0, 0.0, 0.0, 0.0, 300),
            };
        WeaponStats {
            name,
            class,
            slot,
            damage,
            fire_interval,
            magazine,
            reserve,
            reload_time,
            spread,
            range,
            price,
        }
    }

    pub fn name(self) -> &'static str {
        self.stats().name
    }

    /// Resolve a purchase-request name against the catalog.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Knife" => Some(WeaponKind::Knife),
            "Glock" => Some(WeaponKind::Glock),
            "USP" => Some(WeaponKind::Usp),
            "AK-47" => Some(WeaponKind::Ak47),
            "M4A1" => Some(WeaponKind::M4a1),
            "AWP" => Some(WeaponKind::Awp),
            "HE" | "HE Grenade" => Some(WeaponKind::HeGrenade),
            "Flash" | "Flashbang" => Some(WeaponKind::Flashbang),
            "Smoke" => Some(WeaponKind::SmokeGrenade),
            _ => None,
        }
    }
}

/// Weapon instance with current state.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub kind: WeaponKind,
    pub ammo: u32,
    pub reserve: u32,

    // State
    pub fire_cooldown: f32,
    pub reload_timer: f32,
    pub is_reloading: bool,
}

impl Weapon {
    pub fn new(kind: WeaponKind) -> Self {
        let stats = kind.stats();
        Self {
            kind,
            ammo: stats.magazine,
            reserve: stats.reserve,
            fire_cooldown: 0.0,
            reload_timer: 0.0,
            is_reloading: false,
        }
    }

    pub fn stats(&self) -> WeaponStats {
        self.kind.stats()
    }

    /// Tick cooldown and reload timers.
    pub fn update(&mut self, dt: f32) {
        if self.fire_cooldown > 0.0 {
            self.fire_cooldown -= dt;
        }

        if self.is_reloading {
            self.reload_timer -= dt;
            if self.reload_timer <= 0.0 {
                self.finish_reload();
            }
        }
    }

    /// True when a trigger pull would actually fire.
    pub fn can_fire(&self) -> bool {
        if self.fire_cooldown > 0.0 || self.is_reloading {
            return false;
        }
        // Melee has no ammo to consume.
        self.stats().class == WeaponClass::Melee || self.ammo > 0
    }

    /// Consume a shot. Returns false (no state change) when gated.
    pub fn fire(&mut self) -> bool {
        if !self.can_fire() {
            return false;
        }
        if self.stats().class != WeaponClass::Melee {
            self.ammo -= 1;
        }
        self.fire_cooldown = self.stats().fire_interval;
        true
    }

    /// Begin a reload. No-op if already reloading, the reserve is empty, or
    /// the magazine is full. Returns whether a reload actually started.
    pub fn start_reload(&mut self) -> bool {
        if self.is_reloading || self.reserve == 0 || self.ammo == self.stats().magazine {
            return false;
        }
        self.is_reloading = true;
        self.reload_timer = self.stats().reload_time;
        true
    }

    fn finish_reload(&mut self) {
        let needed = self.stats().magazine - self.ammo;
        let available = needed.min(self.reserve);

        self.ammo += available;
        self.reserve -= available;
        self.is_reloading = false;
        self.reload_timer = 0.0;
    }
}

/// Per-entity weapon inventory keyed by slot.
#[derive(Debug, Clone)]
pub struct Loadout {
    slots: [Option<Weapon>; WeaponSlot::COUNT],
    active: WeaponSlot,
    /// Counts down after a grenade throw, then swaps back to a gun.
    holster_swap: Countdown,
}

impl Loadout {
    /// Round-start loadout for a human: knife plus the team pistol.
    pub fn human_default(pistol: WeaponKind) -> Self {
        let mut loadout = Self::empty(WeaponSlot::Pistol);
        loadout.give(Weapon::new(WeaponKind::Knife));
        loadout.give(Weapon::new(pistol));
        loadout
    }

    /// Round-start loadout for a bot: knife plus the team rifle.
    pub fn bot_default(rifle: WeaponKind) -> Self {
        let mut loadout = Self::empty(WeaponSlot::Primary);
        loadout.give(Weapon::new(WeaponKind::Knife));
        loadout.give(Weapon::new(rifle));
        loadout
    }

    fn empty(active: WeaponSlot) -> Self {
        Self {
            slots: Default::default(),
            active,
            holster_swap: Countdown::ready(),
        }
    }

    /// Insert a weapon into its natural slot, replacing any previous
    /// occupant (buying a second rifle swaps the old one out).
    pub fn give(&mut self, weapon: Weapon) {
        let slot = weapon.stats().slot;
        self.slots[slot.index()] = Some(weapon);
    }

    /// Switch to a slot if it holds a weapon. Returns whether it did.
    pub fn select(&mut self, slot: WeaponSlot) -> bool {
        if self.slots[slot.index()].is_none() {
            return false;
        }
        self.active = slot;
        self.holster_swap = Countdown::ready();
        true
    }

    pub fn active_slot(&self) -> WeaponSlot {
        self.active
    }

    pub fn active_weapon(&self) -> Option<&Weapon> {
        self.slots[self.active.index()].as_ref()
    }

    pub fn active_weapon_mut(&mut self) -> Option<&mut Weapon> {
        self.slots[self.active.index()].as_mut()
    }

    pub fn weapon_in(&self, slot: WeaponSlot) -> Option<&Weapon> {
        self.slots[slot.index()].as_ref()
    }

    /// Pull a weapon out of its slot. A thrown grenade leaves the slot
    /// empty until another one is bought.
    pub fn remove(&mut self, slot: WeaponSlot) -> Option<Weapon> {
        self.slots[slot.index()].take()
    }

    /// Arm the post-throw swap delay.
    pub fn schedule_holster_swap(&mut self, delay: f32) {
        self.holster_swap.reset(delay);
    }

    /// Tick every weapon's timers plus the holster swap.
    pub fn update(&mut self, dt: f32) {
        for weapon in self.slots.iter_mut().flatten() {
            weapon.update(dt);
        }
        if self.holster_swap.tick(dt) {
            let fallback = if self.slots[WeaponSlot::Primary.index()].is_some() {
                WeaponSlot::Primary
            } else {
                WeaponSlot::Pistol
            };
            self.select(fallback);
        }
    }
}
