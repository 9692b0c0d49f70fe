//! Structural pattern matching with non-linear meta-variables.
//!
//! A single pattern may match one subterm several ways: every
//! `MetaBindings` occurrence splits the bindings-sequence
//! nondeterministically. Matches are returned in a deterministic order,
//! enumerating splits by ascending prefix length, so rule application
//! order is stable.

use phi_ast::{Attribute, Binding, Term};

use crate::substitute::Subst;

/// All ways `pattern` matches `term`, in enumeration order.
pub fn match_term(pattern: &Term, term: &Term) -> Vec<Subst> {
    let mut out = Vec::new();
    match_into(pattern, term, Subst::default(), &mut out);
    out
}

fn match_into(pattern: &Term, term: &Term, subst: Subst, out: &mut Vec<Subst>) {
    match (pattern, term) {
        (Term::MetaObject(id), _) => {
            let mut s = subst;
            if s.bind_object(id, term) {
                out.push(s);
            }
        }
        (Term::Formation(pb), Term::Formation(tb)) => {
            match_bindings(pb, tb, subst, out);
        }
        (Term::Application(pf, pa), Term::Application(tf, ta)) => {
            let mut heads = Vec::new();
            match_into(pf, tf, subst, &mut heads);
            for s in heads {
                match_bindings(pa, ta, s, out);
            }
        }
        (Term::Dispatch(po, pa), Term::Dispatch(to, ta)) => {
            if let Some(s) = unify_attribute(pa, ta, subst) {
                match_into(po, to, s, out);
            }
        }
        (Term::Global, Term::Global)
        | (Term::This, Term::This)
        | (Term::Termination, Term::Termination) => out.push(subst),
        // Meta-functions execute at substitution time; in match position
        // nothing matches them.
        _ => {}
    }
}

fn unify_attribute(pattern: &Attribute, attr: &Attribute, subst: Subst) -> Option<Subst> {
    match pattern {
        Attribute::Meta(id) => {
            let mut s = subst;
            if s.bind_attribute(id, attr) {
                Some(s)
            } else {
                None
            }
        }
        concrete => {
            if concrete == attr {
                Some(subst)
            } else {
                None
            }
        }
    }
}

fn match_bindings(pats: &[Binding], terms: &[Binding], subst: Subst, out: &mut Vec<Subst>) {
    match pats.split_first() {
        None => {
            if terms.is_empty() {
                out.push(subst);
            }
        }
        Some((Binding::MetaBindings(id), rest)) => {
            // Every split: the captured run keeps its original order.
            for k in 0..=terms.len() {
                let mut s = subst.clone();
                if s.bind_bindings(id, &terms[..k]) {
                    match_bindings(rest, &terms[k..], s, out);
                }
            }
        }
        Some((pat, rest)) => {
            let Some((first, tail)) = terms.split_first() else {
                return;
            };
            let mut partial = Vec::new();
            match_binding(pat, first, subst, &mut partial);
            for s in partial {
                match_bindings(rest, tail, s, out);
            }
        }
    }
}

fn match_binding(pat: &Binding, binding: &Binding, subst: Subst, out: &mut Vec<Subst>) {
    match (pat, binding) {
        (Binding::Alpha(pa, pt), Binding::Alpha(ta, tt)) => {
            if let Some(s) = unify_attribute(pa, ta, subst) {
                match_into(pt, tt, s, out);
            }
        }
        (Binding::Empty(pa), Binding::Empty(ta)) => {
            if let Some(s) = unify_attribute(pa, ta, subst) {
                out.push(s);
            }
        }
        (Binding::Delta(x), Binding::Delta(y)) => {
            if x == y {
                out.push(subst);
            }
        }
        (Binding::Lambda(x), Binding::Lambda(y)) => {
            if x == y {
                out.push(subst);
            }
        }
        _ => {}
    }
}
