//! Manager lifecycle contract
//!
//! Every subsystem exposes the same three-operation surface:
//! `is_initialized`, `initialize`, `shutdown`. Both transitions are
//! idempotent; setup and teardown hooks run at most once per
//! transition, and there are no error conditions.

/// Uniform lifecycle surface implemented by every subsystem.
///
/// Calling `initialize` while initialized, or `shutdown` while
/// uninitialized, is a silent no-op. The orchestrator relies on this
/// to sequence subsystems generically.
pub trait Manager {
    /// Whether the manager has completed its one-time setup
    fn is_initialized(&self) -> bool;

    /// Perform one-time setup and flip to the initialized state
    fn initialize(&mut self);

    /// Perform one-time teardown and flip back to uninitialized
    fn shutdown(&mut self);
}

/// Embedded idempotency flag backing [`Manager`] implementations.
///
/// Subsystems hold one of these and gate their setup/teardown hooks on
/// [`LifecycleState::enter`] / [`LifecycleState::exit`], which report
/// whether the transition actually happened.
#[derive(Debug, Clone, Copy, Default)]
pub struct LifecycleState {
    initialized: bool,
}

impl LifecycleState {
    /// Create a new uninitialized state
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the owning manager is initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Transition to initialized. Returns `true` only when the state
    /// actually changed; the setup hook must be gated on this.
    pub fn enter(&mut self) -> bool {
        if self.initialized {
            return false;
        }
        self.initialized = true;
        true
    }

    /// Transition to uninitialized. Returns `true` only when the state
    /// actually changed; the teardown hook must be gated on this.
    pub fn exit(&mut self) -> bool {
        if !self.initialized {
            return false;
        }
        self.initialized = false;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn enter_transitions_once() {
        let mut state = LifecycleState::new();
        assert!(!state.is_initialized());
        assert!(state.enter());
        assert!(state.is_initialized());
        assert!(!state.enter());
        assert!(state.is_initialized());
    }

    #[test]
    fn exit_transitions_once() {
        let mut state = LifecycleState::new();
        assert!(!state.exit());
        state.enter();
        assert!(state.exit());
        assert!(!state.exit());
        assert!(!state.is_initialized());
    }

    #[test]
    fn reentry_after_exit_is_allowed() {
        let mut state = LifecycleState::new();
        state.enter();
        state.exit();
        assert!(state.enter());
        assert!(state.is_initialized());
    }
}
