//! The buy menu: turning money into weapons and armor.

use engine_core::{Entity, World};

use crate::effects::{EffectQueue, SoundCue};
use crate::entity::{Vitals, Wallet};
use crate::weapons::{Loadout, Weapon, WeaponKind};

pub const ARMOR_PRICE: u32 = 650;
/// Buying armor always sets this value, it does not stack.
pub const ARMOR_VALUE: f32 = 100.0;

/// Something the buy menu can sell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ShopItem {
    Weapon(WeaponKind),
    Armor,
}

impl ShopItem {
    /// Resolve a purchase-request name. Unknown names are not an error,
    /// the request is simply dropped.
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "Armor" | "Kevlar" => Some(ShopItem::Armor),
            _ => WeaponKind::from_name(name).map(ShopItem::Weapon),
        }
    }

    pub fn price(self) -> u32 {
        match self {
            ShopItem::Weapon(kind) => kind.stats().price,
            ShopItem::Armor => ARMOR_PRICE,
        }
    }
}

/// Attempt one purchase for `buyer`. Every rejection (unknown item, item
/// not for sale, dead buyer, not enough money) is a silent no-op.
pub fn try_buy(world: &mut World, effects: &mut EffectQueue, buyer: Entity, item: &str) -> bool {
    let Some(item) = ShopItem::from_name(item) else {
        return false;
    };
    let price = item.price();
    // Starter gear has no price tag and is not for sale.
    if price == 0 {
        return false;
    }

    let alive = world
        .get::<&Vitals>(buyer)
        .map_or(false, |vitals| vitals.alive);
    if !alive {
        return false;
    }

    let paid = world
        .get::<&mut Wallet>(buyer)
        .map_or(false, |mut wallet| wallet.spend(price));
    if !paid {
        return false;
    }

    match item {
        ShopItem::Weapon(kind) => {
            if let Ok(mut loadout) = world.get::<&mut Loadout>(buyer) {
                loadout.give(Weapon::new(kind));
            }
        }
        ShopItem::Armor => {
            if let Ok(mut vitals) = world.get::<&mut Vitals>(buyer) {
                vitals.armor = ARMOR_VALUE;
            }
        }
    }
    effects.sound(SoundCue::Purchase);
    true
}
