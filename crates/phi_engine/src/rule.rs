//! The compiled form of a rewrite rule.

use phi_ast::{Attribute, MetaId, Term};

/// Optional contextual bindings a rule receives before matching: the
/// root of the enclosing path and the innermost enclosing formation.
#[derive(Debug, Clone, Default)]
pub struct RuleContext {
    pub global_object: Option<MetaId>,
    pub current_object: Option<MetaId>,
}

/// A side condition attached to a rule.
///
/// Attributes listed in `PresentAttrs`/`AbsentAttrs` may be attribute
/// meta-variables; they are resolved through the substitution before the
/// containment test.
#[derive(Debug, Clone)]
pub enum Condition {
    /// Each named subterm must be in normal form under the current
    /// ruleset.
    Nf(Vec<MetaId>),
    /// Every listed attribute occurs in the bound bindings-sequence.
    PresentAttrs {
        attrs: Vec<Attribute>,
        bindings: MetaId,
    },
    /// No listed attribute occurs in the bound bindings-sequence.
    AbsentAttrs {
        attrs: Vec<Attribute>,
        bindings: MetaId,
    },
}

/// A test vector carried by a rule in its declarative source.
#[derive(Debug, Clone)]
pub struct RuleTest {
    pub name: String,
    pub input: Term,
    pub output: Option<Term>,
    /// Whether the rule is expected to fire on the input at all.
    pub matches: bool,
}

/// A rewrite rule compiled from its YAML source.
#[derive(Debug, Clone)]
pub struct Rule {
    pub name: String,
    pub description: String,
    pub context: RuleContext,
    pub pattern: Term,
    pub result: Term,
    pub when: Vec<Condition>,
    pub tests: Vec<RuleTest>,
}
