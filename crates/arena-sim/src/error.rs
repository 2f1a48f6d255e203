//! Lifecycle invariant violations reported by `SimulationEngine::check_invariants`.

use thiserror::Error;

use arena_core::types::EntityRef;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("{0} is destroyed but still in an active list")]
    DestroyedButActive(EntityRef),

    #[error("{0} is active but its body is out of the world")]
    ActiveBodyDisabled(EntityRef),

    #[error("{0} is pooled but not destroyed")]
    PooledButLive(EntityRef),

    #[error("{0} is pooled but its body is still in the world")]
    PooledBodyEnabled(EntityRef),
}
