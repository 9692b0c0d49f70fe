//! The dataization interpreter: normalize, then reduce known built-ins
//! on byte literals, recursively.

use phi_ast::{Attribute, Binding, Bytes, Term};
use tracing::debug;

use crate::builtins::{delta_formation, BuiltinRegistry};
use crate::engine::Normalizer;
use crate::limits::Limits;
use crate::ruleset::Ruleset;

/// What dataization produced: final bytes, or a term it could not
/// reduce further. ⊥ and stuck terms are both residuals; neither is an
/// error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dataized {
    Bytes(Bytes),
    Residual(Term),
}

/// Interpreter state threaded through recursive dataization: the
/// dataize-package flag and the path of enclosing formations (rules
/// that look up σ/ρ see it through the rewrite context).
#[derive(Debug, Clone)]
pub struct DataizeState {
    pub package: bool,
    pub path: Vec<Term>,
    depth: usize,
}

impl DataizeState {
    fn new(package: bool) -> Self {
        Self {
            package,
            path: Vec::new(),
            depth: 0,
        }
    }
}

/// Recursion cap; reaching it returns the term residual.
const MAX_DEPTH: usize = 64;

/// What one inspection round decided to do next.
enum Outcome {
    Done(Dataized),
    Continue(Term),
}

pub struct Dataizer<'r> {
    normalizer: Normalizer<'r>,
    builtins: BuiltinRegistry,
    dataize_package: bool,
}

impl<'r> Dataizer<'r> {
    pub fn new(ruleset: &'r Ruleset) -> Self {
        Self {
            normalizer: Normalizer::new(ruleset),
            builtins: BuiltinRegistry::default(),
            dataize_package: true,
        }
    }

    pub fn with_limits(ruleset: &'r Ruleset, limits: Limits) -> Self {
        Self {
            normalizer: Normalizer::with_limits(ruleset, limits),
            builtins: BuiltinRegistry::default(),
            dataize_package: true,
        }
    }

    /// Swap in a custom built-in registry.
    pub fn with_builtins(mut self, builtins: BuiltinRegistry) -> Self {
        self.builtins = builtins;
        self
    }

    /// Control the ambient dataize-package flag at the root.
    pub fn package_mode(mut self, enabled: bool) -> Self {
        self.dataize_package = enabled;
        self
    }

    pub fn dataize(&self, term: &Term) -> Dataized {
        let mut state = DataizeState::new(self.dataize_package);
        self.dataize_under(term.clone(), &mut state)
    }

    /// Dataize below the root, keeping the caller's state; built-ins
    /// re-enter the interpreter through this.
    pub fn dataize_under(&self, term: Term, state: &mut DataizeState) -> Dataized {
        if state.depth >= MAX_DEPTH {
            return Dataized::Residual(term);
        }
        state.depth += 1;
        let out = self.eval(term, state);
        state.depth -= 1;
        out
    }

    fn eval(&self, mut term: Term, state: &mut DataizeState) -> Dataized {
        let mut prev: Option<Term> = None;
        loop {
            term = self.normalizer.normalize_with_path(&term, &state.path);
            // Fixpoint: a full round that changed nothing ends in a
            // residual.
            if prev.as_ref() == Some(&term) {
                return Dataized::Residual(term);
            }
            prev = Some(term.clone());

            match self.inspect(term, state) {
                Outcome::Done(result) => return result,
                Outcome::Continue(next) => term = next,
            }
        }
    }

    fn inspect(&self, term: Term, state: &mut DataizeState) -> Outcome {
        match term {
            Term::Termination => Outcome::Done(Dataized::Residual(Term::Termination)),
            Term::Formation(_) => self.inspect_formation(term, state),
            Term::Application(head, args) => {
                let head_term = self.eval_head(*head, state);
                if head_term == Term::Termination {
                    return Outcome::Continue(Term::Termination);
                }
                Outcome::Continue(Term::Application(Box::new(head_term), args))
            }
            Term::Dispatch(head, attr) => {
                let head_term = self.eval_head(*head, state);
                if head_term == Term::Termination {
                    return Outcome::Continue(Term::Termination);
                }
                Outcome::Continue(Term::Dispatch(Box::new(head_term), attr))
            }
            other => Outcome::Done(Dataized::Residual(other)),
        }
    }

    fn inspect_formation(&self, term: Term, state: &mut DataizeState) -> Outcome {
        let Term::Formation(ref bindings) = term else {
            unreachable!("inspect_formation is called on formations only");
        };
        if has_empty(bindings) {
            return Outcome::Done(Dataized::Residual(term));
        }
        if let Some(bytes) = find_delta(bindings) {
            return Outcome::Done(Dataized::Bytes(bytes.clone()));
        }
        if let Some(name) = find_lambda(bindings) {
            if name == "Package" {
                return if state.package {
                    let bindings = bindings.clone();
                    Outcome::Done(self.eval_package(&bindings, state))
                } else {
                    Outcome::Done(Dataized::Residual(term))
                };
            }
            let Some(builtin) = self.builtins.get(name) else {
                // Unknown built-in: not reducible.
                return Outcome::Done(Dataized::Residual(term));
            };
            debug!(builtin = %name, "invoking built-in");
            let next = builtin(self, &term, state);
            if next == term {
                return Outcome::Done(Dataized::Residual(term));
            }
            return Outcome::Continue(next);
        }
        if let Some(inner) = find_phi(bindings) {
            let inner = inner.clone();
            state.path.push(term);
            let out = self.dataize_under(inner, state);
            state.path.pop();
            return Outcome::Done(out);
        }
        Outcome::Done(Dataized::Residual(term))
    }

    /// Reduce the head of an application or dispatch with the
    /// dataize-package flag scoped off; the flag is restored on every
    /// exit path.
    fn eval_head(&self, head: Term, state: &mut DataizeState) -> Term {
        let saved = state.package;
        state.package = false;
        let out = self.dataize_under(head, state);
        state.package = saved;
        match out {
            Dataized::Bytes(bytes) => delta_formation(bytes),
            Dataized::Residual(t) => t,
        }
    }

    /// λ ⤍ Package under the ambient flag: dataize every attached
    /// sibling in place; whatever stays residual is left untouched.
    fn eval_package(&self, bindings: &[Binding], state: &mut DataizeState) -> Dataized {
        let mut out = Vec::with_capacity(bindings.len());
        for b in bindings {
            match b {
                Binding::Alpha(attr, payload) => {
                    match self.dataize_under(payload.clone(), state) {
                        Dataized::Bytes(bytes) => {
                            out.push(Binding::Alpha(attr.clone(), delta_formation(bytes)))
                        }
                        Dataized::Residual(_) => out.push(b.clone()),
                    }
                }
                other => out.push(other.clone()),
            }
        }
        Dataized::Residual(Term::Formation(out))
    }
}

fn has_empty(bindings: &[Binding]) -> bool {
    bindings.iter().any(|b| matches!(b, Binding::Empty(_)))
}

fn find_delta(bindings: &[Binding]) -> Option<&Bytes> {
    bindings.iter().find_map(|b| match b {
        Binding::Delta(bytes) => Some(bytes),
        _ => None,
    })
}

fn find_lambda(bindings: &[Binding]) -> Option<&str> {
    bindings.iter().find_map(|b| match b {
        Binding::Lambda(name) => Some(name.as_str()),
        _ => None,
    })
}

fn find_phi(bindings: &[Binding]) -> Option<&Term> {
    bindings.iter().find_map(|b| match b {
        Binding::Alpha(Attribute::Phi, t) => Some(t),
        _ => None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use phi_parser::parse;

    fn empty_ruleset() -> Ruleset {
        Ruleset::from_yaml("rules: []").unwrap()
    }

    fn dataize(src: &str) -> Dataized {
        let rs = empty_ruleset();
        let dz = Dataizer::new(&rs);
        dz.dataize(&parse(src).unwrap())
    }

    #[test]
    fn delta_formation_yields_bytes() {
        assert_eq!(
            dataize("⟦ Δ ⤍ 2a- ⟧"),
            Dataized::Bytes(Bytes::new(vec![0x2A]))
        );
    }

    #[test]
    fn empty_binding_blocks_dataization() {
        let out = dataize("⟦ Δ ⤍ 2a-, x ↦ ∅ ⟧");
        assert!(matches!(out, Dataized::Residual(_)));
    }

    #[test]
    fn phi_binding_is_followed() {
        assert_eq!(
            dataize("⟦ φ ↦ ⟦ Δ ⤍ 07- ⟧ ⟧"),
            Dataized::Bytes(Bytes::new(vec![0x07]))
        );
    }

    #[test]
    fn unknown_builtin_is_residual() {
        let out = dataize("⟦ λ ⤍ Lorg_eolang_mystery ⟧");
        assert!(matches!(out, Dataized::Residual(Term::Formation(_))));
    }

    #[test]
    fn termination_is_residual_bottom() {
        assert_eq!(dataize("⊥"), Dataized::Residual(Term::Termination));
    }

    #[test]
    fn package_dataizes_attached_siblings_in_place() {
        // a reduces to bytes and is replaced by a bare Δ-formation;
        // b stays residual and is left exactly as it was.
        let out = dataize("⟦ λ ⤍ Package, a ↦ ⟦ φ ↦ ⟦ Δ ⤍ 01- ⟧ ⟧, b ↦ ξ.miss ⟧");
        match out {
            Dataized::Residual(t) => {
                assert_eq!(
                    t.to_string(),
                    "⟦ λ ⤍ Package, a ↦ ⟦ Δ ⤍ 01- ⟧, b ↦ ξ.miss ⟧"
                );
            }
            other => panic!("expected residual, got {:?}", other),
        }
    }

    #[test]
    fn package_flag_is_scoped_off_in_heads() {
        // The package formation sits in a dispatch head: the flag is
        // cleared there, so Package does not rewrite its siblings and
        // the whole dispatch stays residual under an empty ruleset.
        let src = "⟦ λ ⤍ Package, a ↦ ⟦ φ ↦ ⟦ Δ ⤍ 01- ⟧ ⟧ ⟧.a";
        let out = dataize(src);
        assert_eq!(out, Dataized::Residual(parse(src).unwrap()));
    }
}
