//! Re-entrancy guard for a single form.
//!
//! The guard is a scoped context object owned by one form, not process-wide
//! state: two open vouchers never block each other. Forms are single-threaded
//! and event-driven; the flag is a plain `Cell<bool>`, which keeps the guard
//! `!Sync`.

use std::cell::Cell;

/// "A balancing pass is in progress" flag.
#[derive(Debug, Default)]
pub struct ReentrancyGuard {
    active: Cell<bool>,
}

impl ReentrancyGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enter a pass, or `None` if one is already running.
    ///
    /// The flag is released when the returned scope is dropped, on every exit
    /// path including early returns and unwinding.
    pub fn try_enter(&self) -> Option<GuardScope<'_>> {
        if self.active.replace(true) {
            return None;
        }
        Some(GuardScope { guard: self })
    }

    pub fn is_active(&self) -> bool {
        self.active.get()
    }
}

/// Proof that the holder owns the current pass.
#[derive(Debug)]
pub struct GuardScope<'a> {
    guard: &'a ReentrancyGuard,
}

impl Drop for GuardScope<'_> {
    fn drop(&mut self) {
        self.guard.active.set(false);
    }
}
