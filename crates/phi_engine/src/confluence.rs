//! Critical pairs and bounded joinability.
//!
//! Used as a property check over a ruleset: every pair of distinct
//! one-step successors should meet again within a bounded number of
//! further steps. The descendant search is breadth-layered on purpose —
//! level by level on both sides, pairing in lexicographic level order —
//! so the bound is on depth, not on list position.

use phi_ast::{equal, size, Binding, Term};
use std::fmt;

use crate::engine::Normalizer;

/// Bounds for the joinability search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct JoinLimits {
    /// Descendant levels explored on each side.
    pub depth: usize,
    /// Descendants larger than this are pruned.
    pub max_term_size: usize,
}

impl Default for JoinLimits {
    fn default() -> Self {
        Self {
            depth: 7,
            max_term_size: 30,
        }
    }
}

/// A critical pair whose sides never met within the bounds, reported
/// together with the (shrunk) source term that produced it.
#[derive(Debug, Clone)]
pub struct Divergence {
    pub source: Term,
    pub left: Term,
    pub right: Term,
}

impl fmt::Display for Divergence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} diverges: {} vs {}",
            self.source, self.left, self.right
        )
    }
}

/// All unordered pairs of distinct one-step successors of `term`.
pub fn critical_pairs(norm: &Normalizer<'_>, term: &Term) -> Vec<(Term, Term)> {
    let successors = norm.step_terms(term);
    let mut pairs = Vec::new();
    for i in 0..successors.len() {
        for j in (i + 1)..successors.len() {
            if !equal(&successors[i], &successors[j]) {
                pairs.push((successors[i].clone(), successors[j].clone()));
            }
        }
    }
    pairs
}

fn expand(
    norm: &Normalizer<'_>,
    frontier: &[Term],
    seen: &[Term],
    limits: JoinLimits,
) -> Vec<Term> {
    let mut out: Vec<Term> = Vec::new();
    for t in frontier {
        for s in norm.step_terms(t) {
            if size(&s) > limits.max_term_size {
                continue;
            }
            if seen.iter().chain(out.iter()).any(|u| equal(u, &s)) {
                continue;
            }
            out.push(s);
        }
    }
    out
}

/// Search for a common descendant of `x` and `y`, level by level, up to
/// `limits.depth` levels per side. Returns the first overlap found.
pub fn join(norm: &Normalizer<'_>, x: &Term, y: &Term, limits: JoinLimits) -> Option<Term> {
    if equal(x, y) {
        return Some(x.clone());
    }
    let mut all_x = vec![x.clone()];
    let mut all_y = vec![y.clone()];
    let mut frontier_x = vec![x.clone()];
    let mut frontier_y = vec![y.clone()];

    for _ in 0..limits.depth {
        frontier_x = expand(norm, &frontier_x, &all_x, limits);
        for t in &frontier_x {
            if all_y.iter().any(|u| equal(t, u)) {
                return Some(t.clone());
            }
        }
        all_x.extend(frontier_x.iter().cloned());

        frontier_y = expand(norm, &frontier_y, &all_y, limits);
        for t in &frontier_y {
            if all_x.iter().any(|u| equal(t, u)) {
                return Some(t.clone());
            }
        }
        all_y.extend(frontier_y.iter().cloned());

        if frontier_x.is_empty() && frontier_y.is_empty() {
            break;
        }
    }
    None
}

fn diverging_pair(
    norm: &Normalizer<'_>,
    term: &Term,
    limits: JoinLimits,
) -> Option<(Term, Term)> {
    critical_pairs(norm, term)
        .into_iter()
        .find(|(x, y)| join(norm, x, y, limits).is_none())
}

/// Check every critical pair of `term` for joinability; on failure the
/// source is shrunk before reporting.
pub fn check(norm: &Normalizer<'_>, term: &Term, limits: JoinLimits) -> Result<(), Divergence> {
    match diverging_pair(norm, term, limits) {
        None => Ok(()),
        Some(pair) => {
            let (source, (left, right)) = shrink(norm, term.clone(), pair, limits);
            Err(Divergence {
                source,
                left,
                right,
            })
        }
    }
}

/// Greedy shrink: try dropping bindings and flattening payloads while
/// the candidate still produces at least two successors and still
/// diverges.
fn shrink(
    norm: &Normalizer<'_>,
    source: Term,
    pair: (Term, Term),
    limits: JoinLimits,
) -> (Term, (Term, Term)) {
    let mut current = source;
    let mut pair = pair;
    loop {
        let mut advanced = false;
        for candidate in shrink_candidates(&current) {
            if norm.step_terms(&candidate).len() < 2 {
                continue;
            }
            if let Some(p) = diverging_pair(norm, &candidate, limits) {
                current = candidate;
                pair = p;
                advanced = true;
                break;
            }
        }
        if !advanced {
            return (current, pair);
        }
    }
}

fn shrink_candidates(term: &Term) -> Vec<Term> {
    let Term::Formation(bindings) = term else {
        return Vec::new();
    };
    let mut out = Vec::new();
    // Shorter binding lists first.
    for i in 0..bindings.len() {
        let mut v = bindings.clone();
        v.remove(i);
        out.push(Term::Formation(v));
    }
    // Then shallower payloads.
    for (i, b) in bindings.iter().enumerate() {
        if let Binding::Alpha(attr, payload) = b {
            if matches!(payload, Term::Formation(inner) if !inner.is_empty()) {
                let mut v = bindings.clone();
                v[i] = Binding::Alpha(attr.clone(), Term::Formation(Vec::new()));
                out.push(Term::Formation(v));
            }
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ruleset::Ruleset;
    use phi_parser::parse;

    #[test]
    fn joinable_pair_is_found_level_by_level() {
        let rs = Ruleset::from_yaml(
            r#"
rules:
  - name: left
    pattern: "ξ.a"
    result: "ξ.b"
  - name: right
    pattern: "ξ.a"
    result: "ξ.c"
  - name: close-left
    pattern: "ξ.b"
    result: "Φ"
  - name: close-right
    pattern: "ξ.c"
    result: "Φ"
"#,
        )
        .unwrap();
        let norm = Normalizer::new(&rs);
        let term = parse("ξ.a").unwrap();
        let pairs = critical_pairs(&norm, &term);
        assert_eq!(pairs.len(), 1);
        let z = join(&norm, &pairs[0].0, &pairs[0].1, JoinLimits::default());
        assert_eq!(z, Some(Term::Global));
        assert!(check(&norm, &term, JoinLimits::default()).is_ok());
    }

    #[test]
    fn divergence_is_reported_with_both_sides() {
        let rs = Ruleset::from_yaml(
            r#"
rules:
  - name: left
    pattern: "ξ.a"
    result: "Φ"
  - name: right
    pattern: "ξ.a"
    result: "⊥"
"#,
        )
        .unwrap();
        let norm = Normalizer::new(&rs);
        let term = parse("ξ.a").unwrap();
        let err = check(&norm, &term, JoinLimits::default()).unwrap_err();
        assert_eq!(err.source.to_string(), "ξ.a");
        assert_eq!(err.left, Term::Global);
        assert_eq!(err.right, Term::Termination);
        assert!(err.to_string().contains("diverges"));
    }

    #[test]
    fn shrinking_drops_irrelevant_bindings() {
        let rs = Ruleset::from_yaml(
            r#"
rules:
  - name: left
    pattern: "ξ.a"
    result: "Φ"
  - name: right
    pattern: "ξ.a"
    result: "⊥"
"#,
        )
        .unwrap();
        let norm = Normalizer::new(&rs);
        // The diverging redex appears twice; the padding binding can go.
        let term = parse("⟦ x ↦ ξ.a, y ↦ ξ.a, pad ↦ Φ ⟧").unwrap();
        let err = check(&norm, &term, JoinLimits::default()).unwrap_err();
        assert!(phi_ast::size(&err.source) < phi_ast::size(&term));
        assert!(norm.step_terms(&err.source).len() >= 2);
    }
}
