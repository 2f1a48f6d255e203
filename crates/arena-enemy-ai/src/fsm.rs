//! Enemy behavior finite state machine.
//!
//! Pure functions that compute state transitions from an enemy's current
//! state, distance to the player and timers. Entry actions and per-state
//! behavior are applied by the caller.

use glam::Vec3;

use arena_core::enums::EnemyState;

use crate::profiles::BehaviorProfile;

/// Input to the FSM for a single enemy.
#[derive(Debug, Clone, Copy)]
pub struct EnemyContext {
    pub state: EnemyState,
    pub profile: BehaviorProfile,
    pub position: Vec3,
    /// Player position, `None` when there is no live player.
    pub target: Option<Vec3>,
    pub health: f32,
    /// Seconds left in the current idle period.
    pub idle_remaining: f32,
    /// Seconds left in the death sequence.
    pub death_remaining: f32,
}

impl EnemyContext {
    /// Squared distance to the target, if there is one.
    pub fn distance_sq(&self) -> Option<f32> {
        self.target.map(|t| self.position.distance_squared(t))
    }
}

/// Output from the FSM.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EnemyTransition {
    pub new_state: EnemyState,
    /// True when the caller must run the entry action for `new_state`.
    /// An elapsed idle timer re-enters Idle, so this can be set with an
    /// unchanged state.
    pub state_changed: bool,
}

impl EnemyTransition {
    fn stay(state: EnemyState) -> Self {
        Self {
            new_state: state,
            state_changed: false,
        }
    }

    fn enter(state: EnemyState) -> Self {
        Self {
            new_state: state,
            state_changed: true,
        }
    }
}

/// Evaluate one transition for one enemy.
///
/// Distance-based transitions pre-empt timer-based ones.
pub fn evaluate(ctx: &EnemyContext) -> EnemyTransition {
    match ctx.state {
        EnemyState::Inactive => EnemyTransition::stay(EnemyState::Inactive),
        EnemyState::Dying => evaluate_dying(ctx),
        _ if ctx.health <= 0.0 => EnemyTransition::enter(EnemyState::Dying),
        EnemyState::Idle => evaluate_idle(ctx),
        EnemyState::Chasing => evaluate_chasing(ctx),
        EnemyState::Attacking => evaluate_attacking(ctx),
    }
}

/// Maximum transitions applied within one tick. Idle → Chasing → Attacking
/// is the longest chain.
pub const MAX_TRANSITIONS_PER_TICK: usize = 3;

fn evaluate_dying(ctx: &EnemyContext) -> EnemyTransition {
    if ctx.death_remaining <= 0.0 {
        EnemyTransition::enter(EnemyState::Inactive)
    } else {
        EnemyTransition::stay(EnemyState::Dying)
    }
}

fn evaluate_idle(ctx: &EnemyContext) -> EnemyTransition {
    if let Some(dist_sq) = ctx.distance_sq() {
        if dist_sq <= ctx.profile.chase_distance_sq() {
            return EnemyTransition::enter(EnemyState::Chasing);
        }
    }

    if ctx.idle_remaining <= 0.0 {
        // Pick a new idle period (and wander heading).
        return EnemyTransition::enter(EnemyState::Idle);
    }

    EnemyTransition::stay(EnemyState::Idle)
}

fn evaluate_chasing(ctx: &EnemyContext) -> EnemyTransition {
    let Some(dist_sq) = ctx.distance_sq() else {
        return EnemyTransition::enter(EnemyState::Idle);
    };

    if dist_sq <= ctx.profile.attack_distance_sq() {
        return EnemyTransition::enter(EnemyState::Attacking);
    }
    if dist_sq > ctx.profile.chase_distance_sq() {
        return EnemyTransition::enter(EnemyState::Idle);
    }

    EnemyTransition::stay(EnemyState::Chasing)
}

fn evaluate_attacking(ctx: &EnemyContext) -> EnemyTransition {
    let Some(dist_sq) = ctx.distance_sq() else {
        return EnemyTransition::enter(EnemyState::Idle);
    };

    if dist_sq > ctx.profile.attack_distance_sq() {
        return EnemyTransition::enter(EnemyState::Chasing);
    }

    EnemyTransition::stay(EnemyState::Attacking)
}

/// Fixed-interval trigger for enemy attacks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AttackClock {
    interval: f32,
    remaining: f32,
}

impl AttackClock {
    pub fn new(interval: f32) -> Self {
        Self {
            interval,
            remaining: interval,
        }
    }

    /// Restart a full interval.
    pub fn reset(&mut self) {
        self.remaining = self.interval;
    }

    /// Shorten the wait so the first attack comes after at most
    /// `fraction` of an interval.
    pub fn prearm(&mut self, fraction: f32) {
        self.remaining = self.remaining.min(self.interval * fraction);
    }

    /// Advance by `dt`. Returns true when an attack is due, and restarts
    /// the interval.
    pub fn tick(&mut self, dt: f32) -> bool {
        self.remaining -= dt;
        if self.remaining <= 0.0 {
            self.remaining = self.interval;
            true
        } else {
            false
        }
    }

    pub fn remaining(&self) -> f32 {
        self.remaining
    }
}
