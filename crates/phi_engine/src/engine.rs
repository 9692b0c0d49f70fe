//! The rewrite driver: one-step successors, normal-form detection, and
//! the tree of reduction chains.

use phi_ast::{size, Attribute, Binding, Term};
use tracing::debug;

use crate::limits::Limits;
use crate::matcher::match_term;
use crate::rule::{Condition, Rule};
use crate::ruleset::Ruleset;
use crate::step::Step;
use crate::substitute::{self, Subst};

/// What the matcher sees of the world around the current subterm: the
/// compiled ruleset, the enclosing terms from the root down, and the
/// attribute under which the innermost enclosing formation was entered.
#[derive(Debug, Clone)]
pub struct StepContext<'r> {
    pub ruleset: &'r Ruleset,
    pub path: Vec<Term>,
    pub current_attr: Option<Attribute>,
}

impl<'r> StepContext<'r> {
    pub fn new(ruleset: &'r Ruleset) -> Self {
        Self {
            ruleset,
            path: Vec::new(),
            current_attr: None,
        }
    }

    pub fn with_path(ruleset: &'r Ruleset, path: Vec<Term>) -> Self {
        Self {
            ruleset,
            path,
            current_attr: None,
        }
    }

    fn descend(&self, enclosing: &Term, attr: Option<&Attribute>) -> Self {
        let mut path = self.path.clone();
        path.push(enclosing.clone());
        Self {
            ruleset: self.ruleset,
            path,
            current_attr: attr.cloned().or_else(|| self.current_attr.clone()),
        }
    }

    /// The root of the enclosing path, or the term itself at the root.
    fn global_object(&self, term: &Term) -> Term {
        self.path.first().cloned().unwrap_or_else(|| term.clone())
    }

    /// The innermost enclosing formation, falling back to the global
    /// object.
    fn current_object(&self, term: &Term) -> Term {
        self.path
            .iter()
            .rev()
            .find(|t| matches!(t, Term::Formation(_)))
            .cloned()
            .unwrap_or_else(|| self.global_object(term))
    }
}

/// All one-step successors of `term`: every rule at every position, in
/// the deterministic traversal order (root first, then the Application
/// function, the Dispatch receiver, and Formation bindings
/// left-to-right).
pub fn step(term: &Term, ctx: &StepContext<'_>) -> Vec<Step> {
    let mut out = Vec::new();

    for rule in &ctx.ruleset.rules {
        for subst in seeded_matches(rule, term, ctx) {
            if !conditions_hold(rule, &subst, term, ctx) {
                continue;
            }
            match substitute::apply(&rule.result, &subst) {
                Ok(new_term) => {
                    debug!(rule = %rule.name, "rule fired");
                    out.push(Step::new(&rule.name, new_term));
                }
                // A failed substitution (a meta-function met an
                // impossible shape) just discards this match.
                Err(_) => {}
            }
        }
    }

    match term {
        Term::Application(f, args) => {
            let child_ctx = ctx.descend(term, None);
            for s in step(f, &child_ctx) {
                out.push(Step {
                    rule: s.rule,
                    term: Term::Application(Box::new(s.term), args.clone()),
                });
            }
            for (i, patched, s) in step_bindings(args, term, ctx) {
                let mut new_args = args.clone();
                new_args[i] = patched;
                out.push(Step {
                    rule: s,
                    term: Term::Application(f.clone(), new_args),
                });
            }
        }
        Term::Dispatch(o, attr) => {
            let child_ctx = ctx.descend(term, None);
            for s in step(o, &child_ctx) {
                out.push(Step {
                    rule: s.rule,
                    term: Term::Dispatch(Box::new(s.term), attr.clone()),
                });
            }
        }
        Term::Formation(bindings) => {
            for (i, patched, s) in step_bindings(bindings, term, ctx) {
                let mut new_bindings = bindings.clone();
                new_bindings[i] = patched;
                out.push(Step {
                    rule: s,
                    term: Term::Formation(new_bindings),
                });
            }
        }
        _ => {}
    }

    out
}

/// Successors inside a bindings-sequence: each `Alpha` payload is a
/// position, visited left-to-right.
fn step_bindings(
    bindings: &[Binding],
    enclosing: &Term,
    ctx: &StepContext<'_>,
) -> Vec<(usize, Binding, String)> {
    let mut out = Vec::new();
    for (i, b) in bindings.iter().enumerate() {
        if let Binding::Alpha(attr, payload) = b {
            let child_ctx = ctx.descend(enclosing, Some(attr));
            for s in step(payload, &child_ctx) {
                out.push((i, Binding::Alpha(attr.clone(), s.term), s.rule));
            }
        }
    }
    out
}

fn seeded_matches(rule: &Rule, term: &Term, ctx: &StepContext<'_>) -> Vec<Subst> {
    let mut matches = match_term(&rule.pattern, term);
    if rule.context.global_object.is_none() && rule.context.current_object.is_none() {
        return matches;
    }
    matches.retain_mut(|subst| {
        if let Some(id) = &rule.context.global_object {
            if !subst.bind_object(id, &ctx.global_object(term)) {
                return false;
            }
        }
        if let Some(id) = &rule.context.current_object {
            if !subst.bind_object(id, &ctx.current_object(term)) {
                return false;
            }
        }
        true
    });
    matches
}

fn conditions_hold(rule: &Rule, subst: &Subst, term: &Term, ctx: &StepContext<'_>) -> bool {
    rule.when.iter().all(|cond| match cond {
        Condition::Nf(ids) => ids.iter().all(|id| match subst.object(id) {
            // The fixpoint coupling is intentional: the bound subterm is
            // checked under the same ruleset this rule belongs to.
            Some(sub) => step(sub, &ctx.descend(term, None)).is_empty(),
            None => false,
        }),
        Condition::PresentAttrs { attrs, bindings } => {
            check_attrs(subst, attrs, bindings, true)
        }
        Condition::AbsentAttrs { attrs, bindings } => {
            check_attrs(subst, attrs, bindings, false)
        }
    })
}

fn check_attrs(
    subst: &Subst,
    attrs: &[Attribute],
    bindings: &phi_ast::MetaId,
    want_present: bool,
) -> bool {
    let Some(run) = subst.bindings_run(bindings) else {
        return false;
    };
    attrs.iter().all(|attr| {
        let Some(resolved) = subst.resolve_attribute(attr) else {
            return false;
        };
        let present = run.iter().any(|b| b.attribute() == Some(&resolved));
        present == want_present
    })
}

/// One maximal (or pruned) reduction sequence.
///
/// `terms` always starts with the initial term and holds one more entry
/// than `rules`. `complete` is false when a search bound pruned the
/// branch.
#[derive(Debug, Clone)]
pub struct ReductionChain {
    pub terms: Vec<Term>,
    pub rules: Vec<String>,
    pub complete: bool,
}

impl ReductionChain {
    pub fn result(&self) -> &Term {
        self.terms.last().expect("chain holds the initial term")
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Depth-first iterator over every maximal reduction chain,
/// leftmost-first, pruned by the driver's limits.
pub struct Chains<'a, 'r> {
    norm: &'a Normalizer<'r>,
    stack: Vec<(Vec<Term>, Vec<String>)>,
}

impl Iterator for Chains<'_, '_> {
    type Item = ReductionChain;

    fn next(&mut self) -> Option<ReductionChain> {
        let limits = self.norm.limits;
        while let Some((terms, rules)) = self.stack.pop() {
            let current = terms.last().expect("chain holds the initial term");
            let successors = self.norm.step(current);
            if successors.is_empty() {
                return Some(ReductionChain {
                    terms,
                    rules,
                    complete: true,
                });
            }
            if rules.len() >= limits.max_steps {
                return Some(ReductionChain {
                    terms,
                    rules,
                    complete: false,
                });
            }
            let kept: Vec<Step> = successors
                .into_iter()
                .filter(|s| size(&s.term) <= limits.max_term_size)
                .collect();
            if kept.is_empty() {
                return Some(ReductionChain {
                    terms,
                    rules,
                    complete: false,
                });
            }
            for s in kept.into_iter().rev() {
                let mut t = terms.clone();
                let mut r = rules.clone();
                t.push(s.term);
                r.push(s.rule);
                self.stack.push((t, r));
            }
        }
        None
    }
}

/// The public face of the rewrite driver: a ruleset plus search limits.
pub struct Normalizer<'r> {
    pub ruleset: &'r Ruleset,
    pub limits: Limits,
}

impl<'r> Normalizer<'r> {
    pub fn new(ruleset: &'r Ruleset) -> Self {
        Self {
            ruleset,
            limits: Limits::default(),
        }
    }

    pub fn with_limits(ruleset: &'r Ruleset, limits: Limits) -> Self {
        Self { ruleset, limits }
    }

    pub fn step(&self, term: &Term) -> Vec<Step> {
        step(term, &StepContext::new(self.ruleset))
    }

    pub fn step_terms(&self, term: &Term) -> Vec<Term> {
        self.step(term).into_iter().map(|s| s.term).collect()
    }

    /// A term is in normal form iff it has no successors.
    pub fn is_normal(&self, term: &Term) -> bool {
        self.step(term).is_empty()
    }

    pub fn chains(&self, term: &Term) -> Chains<'_, 'r> {
        Chains {
            norm: self,
            stack: vec![(vec![term.clone()], Vec::new())],
        }
    }

    /// Follow the leftmost chain to its end.
    pub fn normalize(&self, term: &Term) -> Term {
        self.normalize_with_path(term, &[])
    }

    /// Leftmost normalization under an ambient path of enclosing terms;
    /// the dataizer threads its formation path through here.
    pub fn normalize_with_path(&self, term: &Term, path: &[Term]) -> Term {
        let ctx = StepContext::with_path(self.ruleset, path.to_vec());
        let mut current = term.clone();
        for _ in 0..self.limits.max_steps {
            let mut successors = step(&current, &ctx);
            if successors.is_empty() {
                break;
            }
            let first = successors.remove(0).term;
            if size(&first) > self.limits.max_term_size {
                break;
            }
            if first == current {
                break;
            }
            current = first;
        }
        current
    }
}
