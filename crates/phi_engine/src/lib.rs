pub mod builtins;
pub mod confluence;
pub mod dataize;
pub mod engine;
pub mod error;
pub mod limits;
pub mod matcher;
pub mod rule;
pub mod ruleset;
pub mod step;
pub mod substitute;

pub use builtins::{bytes_to_i64, delta_formation, i64_to_bytes, Builtin, BuiltinRegistry};
pub use confluence::{check as check_confluence, critical_pairs, join, Divergence, JoinLimits};
pub use dataize::{DataizeState, Dataized, Dataizer};
pub use engine::{step, Chains, Normalizer, ReductionChain, StepContext};
pub use error::RulesetError;
pub use limits::Limits;
pub use matcher::match_term;
pub use rule::{Condition, Rule, RuleContext, RuleTest};
pub use ruleset::Ruleset;
pub use step::Step;
pub use substitute::{apply, meta_function, Subst, SubstError};
