//! # Fault Reporting Module
//!
//! Process-level failure policy for the application shell. There is no
//! global mutable error state: failures are routed through an explicit
//! `FaultPolicy` value owned by the caller, with an allow-list of fault
//! kinds the process survives. Everything else is logged and terminates
//! the process.

use std::panic;

/// Classification of a reported failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FaultKind {
    /// A broken internal assumption. Logged and swallowed so one bad
    /// event cannot take the whole session down.
    Invariant,
    /// A failed best-effort side effect, such as an export or settings
    /// write. Logged and swallowed.
    BestEffort,
    /// Any other uncaught failure. Logged, then the process exits.
    Fatal,
}

/// Decides which reported faults the process survives.
#[derive(Debug, Default)]
pub struct FaultPolicy;

impl FaultPolicy {
    pub fn report(&self, kind: FaultKind, err: &anyhow::Error) {
        eprintln!("[FAULT] {kind:?}: {err:#}");
        if !survivable(kind) {
            std::process::exit(1);
        }
    }
}

fn survivable(kind: FaultKind) -> bool {
    matches!(kind, FaultKind::Invariant | FaultKind::BestEffort)
}

/// Logs uncaught panics before the default hook runs. Installed once
/// from `main`.
pub fn install_panic_hook() {
    let default_hook = panic::take_hook();
    panic::set_hook(Box::new(move |info| {
        eprintln!("[FAULT] Uncaught panic: {info}");
        default_hook(info);
    }));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn allow_list_swallows_invariant_and_best_effort_only() {
        assert!(survivable(FaultKind::Invariant));
        assert!(survivable(FaultKind::BestEffort));
        assert!(!survivable(FaultKind::Fatal));
    }
}
