//! Search bounds for chain exploration.
//!
//! Termination of a ruleset is not guaranteed; every consumer of the
//! driver supplies a maximum chain length and a maximum term size.
//! Hitting a bound prunes the branch and is reported on the chain
//! itself, never as an error.

/// Bounds applied while exploring reduction chains.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Limits {
    /// Maximum number of rewrite steps along one chain.
    pub max_steps: usize,
    /// Successors larger than this many AST nodes prune their branch.
    pub max_term_size: usize,
}

impl Limits {
    pub const DEFAULT_MAX_STEPS: usize = 256;
    pub const DEFAULT_MAX_TERM_SIZE: usize = 10_000;

    pub fn new(max_steps: usize, max_term_size: usize) -> Self {
        Self {
            max_steps,
            max_term_size,
        }
    }
}

impl Default for Limits {
    fn default() -> Self {
        Self {
            max_steps: Self::DEFAULT_MAX_STEPS,
            max_term_size: Self::DEFAULT_MAX_TERM_SIZE,
        }
    }
}
