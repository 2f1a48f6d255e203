//! Weapon registry, cooldown and ammo bookkeeping.
//!
//! The manager decides whether a shot happens and where it starts; turning
//! a `ProjectileRequest` into a bullet is the director's job.

use glam::Vec3;
use tracing::{debug, warn};

use arena_core::config::WeaponConfig;
use arena_core::constants::MUZZLE_OFFSET;
use arena_core::enums::Owner;
use arena_core::state::WeaponView;

/// Rounds available to a weapon.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Ammo {
    Infinite,
    Finite { current: u32, max: u32 },
}

impl Ammo {
    fn from_config(config: &WeaponConfig) -> Self {
        match config.max_ammo {
            Some(max) => Ammo::Finite { current: max, max },
            None => Ammo::Infinite,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Ammo::Finite { current: 0, .. })
    }

    fn current(&self) -> Option<u32> {
        match self {
            Ammo::Infinite => None,
            Ammo::Finite { current, .. } => Some(*current),
        }
    }

    fn max(&self) -> Option<u32> {
        match self {
            Ammo::Infinite => None,
            Ammo::Finite { max, .. } => Some(*max),
        }
    }
}

/// A registered weapon and its remaining ammo.
#[derive(Debug, Clone)]
pub struct Weapon {
    pub config: WeaponConfig,
    pub ammo: Ammo,
}

/// Where a shot starts and which way it goes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aim {
    pub origin: Vec3,
    pub direction: Vec3,
}

/// Request for the director to spawn a projectile.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectileRequest {
    pub origin: Vec3,
    pub direction: Vec3,
    pub damage: f32,
    pub owner: Owner,
}

/// Weapon registry in insertion order with exactly one equipped weapon
/// while any are registered.
#[derive(Debug, Clone, Default)]
pub struct WeaponManager {
    weapons: Vec<Weapon>,
    equipped: Option<usize>,
    cooldown_remaining: f32,
}

impl WeaponManager {
    /// Register `configs` in order and equip the first, ready to fire.
    pub fn new(configs: &[WeaponConfig]) -> Self {
        let mut manager = Self::default();
        for config in configs {
            manager.register(config.clone());
        }
        manager
    }

    /// Add a weapon. Duplicate ids are rejected. The first weapon
    /// registered is equipped.
    pub fn register(&mut self, config: WeaponConfig) -> bool {
        if self.weapons.iter().any(|w| w.config.id == config.id) {
            warn!(id = %config.id, "duplicate weapon id ignored");
            return false;
        }
        let ammo = Ammo::from_config(&config);
        self.weapons.push(Weapon { config, ammo });
        if self.equipped.is_none() {
            self.equipped = Some(0);
        }
        true
    }

    /// Refill every weapon and equip the first, ready to fire.
    pub fn reset(&mut self) {
        for weapon in &mut self.weapons {
            weapon.ammo = Ammo::from_config(&weapon.config);
        }
        self.equipped = if self.weapons.is_empty() { None } else { Some(0) };
        self.cooldown_remaining = 0.0;
    }

    pub fn update(&mut self, dt: f32) {
        self.cooldown_remaining = (self.cooldown_remaining - dt).max(0.0);
    }

    /// Equip weapon `id`. Equipping restarts the cooldown.
    pub fn equip(&mut self, id: &str) -> bool {
        match self.weapons.iter().position(|w| w.config.id == id) {
            Some(index) => {
                self.equip_index(index);
                true
            }
            None => {
                warn!(id, "cannot equip unknown weapon");
                false
            }
        }
    }

    pub fn switch_to_next(&mut self) -> bool {
        self.cycle(1)
    }

    pub fn switch_to_previous(&mut self) -> bool {
        self.cycle(self.weapons.len().saturating_sub(1))
    }

    fn cycle(&mut self, step: usize) -> bool {
        let count = self.weapons.len();
        if count <= 1 {
            return false;
        }
        let current = self.equipped.unwrap_or(0);
        self.equip_index((current + step) % count);
        true
    }

    fn equip_index(&mut self, index: usize) {
        self.equipped = Some(index);
        self.cooldown_remaining = self.weapons[index].config.cooldown;
        debug!(id = %self.weapons[index].config.id, "weapon equipped");
    }

    pub fn equipped(&self) -> Option<&Weapon> {
        self.equipped.and_then(|i| self.weapons.get(i))
    }

    pub fn equipped_id(&self) -> Option<&str> {
        self.equipped().map(|w| w.config.id.as_str())
    }

    pub fn weapon(&self, id: &str) -> Option<&Weapon> {
        self.weapons.iter().find(|w| w.config.id == id)
    }

    pub fn weapons(&self) -> &[Weapon] {
        &self.weapons
    }

    pub fn cooldown_remaining(&self) -> f32 {
        self.cooldown_remaining
    }

    /// Whether `fire` would succeed now.
    pub fn can_fire(&self) -> bool {
        match self.equipped() {
            Some(weapon) => self.cooldown_remaining <= 0.0 && !weapon.ammo.is_empty(),
            None => false,
        }
    }

    /// Fire the equipped weapon along `aim`, pushing a projectile request.
    pub fn fire(&mut self, aim: Aim, requests: &mut Vec<ProjectileRequest>) -> bool {
        if !self.can_fire() {
            return false;
        }
        let Some(weapon) = self.equipped.and_then(|i| self.weapons.get_mut(i)) else {
            return false;
        };

        self.cooldown_remaining = weapon.config.cooldown;
        if let Ammo::Finite { current, .. } = &mut weapon.ammo {
            *current -= 1;
        }

        let direction = aim.direction.normalize_or_zero();
        requests.push(ProjectileRequest {
            origin: aim.origin + direction * MUZZLE_OFFSET,
            direction,
            damage: weapon.config.damage,
            owner: Owner::Player,
        });
        true
    }

    /// Trigger input: automatic weapons fire while held, others only on the
    /// press edge.
    pub fn trigger(
        &mut self,
        pressed: bool,
        held: bool,
        aim: Aim,
        requests: &mut Vec<ProjectileRequest>,
    ) -> bool {
        let automatic = self.equipped().is_some_and(|w| w.config.automatic);
        let wants = pressed || (automatic && held);
        wants && self.fire(aim, requests)
    }

    /// Refill the equipped weapon.
    pub fn reload(&mut self) -> bool {
        let Some(weapon) = self.equipped.and_then(|i| self.weapons.get_mut(i)) else {
            return false;
        };
        match &mut weapon.ammo {
            Ammo::Finite { current, max } if *current < *max => {
                *current = *max;
                true
            }
            _ => false,
        }
    }

    /// Add `amount` rounds to weapon `id`, clamped to its capacity.
    pub fn add_ammo(&mut self, id: &str, amount: u32) -> bool {
        let Some(weapon) = self.weapons.iter_mut().find(|w| w.config.id == id) else {
            warn!(id, "cannot add ammo to unknown weapon");
            return false;
        };
        match &mut weapon.ammo {
            Ammo::Finite { current, max } => {
                *current = current.saturating_add(amount).min(*max);
                true
            }
            Ammo::Infinite => false,
        }
    }

    pub fn view(&self) -> Option<WeaponView> {
        let ready = self.can_fire();
        self.equipped().map(|w| WeaponView {
            id: w.config.id.clone(),
            name: w.config.name.clone(),
            ammo: w.ammo.current(),
            max_ammo: w.ammo.max(),
            ready,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arena_core::config::GameConfig;
    use arena_core::constants::DT;

    fn manager() -> WeaponManager {
        WeaponManager::new(&GameConfig::default().weapons)
    }

    fn aim() -> Aim {
        Aim {
            origin: Vec3::new(0.0, 1.1, 0.0),
            direction: Vec3::NEG_Z,
        }
    }

    #[test]
    fn test_first_weapon_equipped_and_ready() {
        let m = manager();
        assert_eq!(m.equipped_id(), Some("pistol"));
        assert!(m.can_fire());
    }

    #[test]
    fn test_at_most_one_shot_per_cooldown_window() {
        let mut m = manager();
        let mut requests = Vec::new();
        let mut fired = 0;
        // 0.35s pistol cooldown, one second of hammering the trigger
        for _ in 0..60 {
            if m.fire(aim(), &mut requests) {
                fired += 1;
            }
            m.update(DT);
        }
        assert_eq!(fired, 3);
        assert_eq!(requests.len(), 3);
    }

    #[test]
    fn test_request_starts_at_muzzle() {
        let mut m = manager();
        let mut requests = Vec::new();
        assert!(m.fire(aim(), &mut requests));
        let r = requests[0];
        assert!((r.origin - Vec3::new(0.0, 1.1, -MUZZLE_OFFSET)).length() < 1e-6);
        assert_eq!(r.damage, 8.0);
        assert_eq!(r.owner, Owner::Player);
    }

    #[test]
    fn test_ammo_never_goes_negative() {
        let mut m = manager();
        assert!(m.equip("slug"));
        let mut requests = Vec::new();
        let mut fired = 0;
        for _ in 0..100 {
            m.update(10.0);
            if m.fire(aim(), &mut requests) {
                fired += 1;
            }
        }
        assert_eq!(fired, 24);
        assert_eq!(m.equipped().unwrap().ammo, Ammo::Finite { current: 0, max: 24 });
        assert!(!m.can_fire());

        assert!(m.reload());
        assert!(m.can_fire());
    }

    #[test]
    fn test_cycling_wraps_in_insertion_order() {
        let mut m = manager();
        assert!(m.switch_to_next());
        assert_eq!(m.equipped_id(), Some("rifle"));
        m.switch_to_next();
        assert_eq!(m.equipped_id(), Some("slug"));
        m.switch_to_next();
        assert_eq!(m.equipped_id(), Some("pistol"));
        m.switch_to_previous();
        assert_eq!(m.equipped_id(), Some("slug"));
    }

    #[test]
    fn test_cycling_with_one_weapon_is_noop() {
        let config = GameConfig::default();
        let mut m = WeaponManager::new(&config.weapons[..1]);
        assert!(!m.switch_to_next());
        assert!(!m.switch_to_previous());
        assert_eq!(m.equipped_id(), Some("pistol"));
        assert!(m.can_fire(), "no-op switch must not restart the cooldown");
    }

    #[test]
    fn test_equip_restarts_cooldown() {
        let mut m = manager();
        m.switch_to_next();
        assert!(!m.can_fire());
        m.update(0.1);
        assert!(m.can_fire());
    }

    #[test]
    fn test_no_weapons_cannot_fire() {
        let mut m = WeaponManager::default();
        let mut requests = Vec::new();
        assert!(!m.fire(aim(), &mut requests));
        assert!(m.view().is_none());
    }

    #[test]
    fn test_trigger_semi_vs_automatic() {
        let mut m = manager();
        let mut requests = Vec::new();
        m.update(1.0);
        assert!(!m.trigger(false, true, aim(), &mut requests), "pistol ignores hold");
        assert!(m.trigger(true, true, aim(), &mut requests));

        m.equip("rifle");
        m.update(1.0);
        assert!(m.trigger(false, true, aim(), &mut requests), "rifle fires while held");
    }

    #[test]
    fn test_add_ammo_clamps() {
        let mut m = manager();
        m.equip("rifle");
        let mut requests = Vec::new();
        m.update(1.0);
        m.fire(aim(), &mut requests);
        assert!(m.add_ammo("rifle", 50));
        assert_eq!(m.weapon("rifle").unwrap().ammo, Ammo::Finite { current: 120, max: 120 });
        assert!(!m.add_ammo("pistol", 5));
        assert!(!m.add_ammo("missing", 5));
    }
}
