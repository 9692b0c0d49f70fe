//! Structural equality up to binding order.

use crate::ordering::compare_bindings;
use crate::term::{Binding, Term};

/// Rebuild a term with every formation's bindings sorted canonically.
///
/// Application arguments keep their order: application is positional and
/// the order of its bindings is observable.
pub fn canonical(term: &Term) -> Term {
    match term {
        Term::Formation(bs) => {
            let mut sorted: Vec<Binding> = bs.iter().map(canonical_binding).collect();
            sorted.sort_by(compare_bindings);
            Term::Formation(sorted)
        }
        Term::Application(f, bs) => Term::Application(
            Box::new(canonical(f)),
            bs.iter().map(canonical_binding).collect(),
        ),
        Term::Dispatch(o, a) => Term::Dispatch(Box::new(canonical(o)), a.clone()),
        other => other.clone(),
    }
}

fn canonical_binding(binding: &Binding) -> Binding {
    match binding {
        Binding::Alpha(a, t) => Binding::Alpha(a.clone(), canonical(t)),
        other => other.clone(),
    }
}

/// Structural equality after canonicalization: binding order inside
/// formations is unobservable, byte literals compare exactly.
pub fn equal(a: &Term, b: &Term) -> bool {
    canonical(a) == canonical(b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Attribute, Binding, Bytes, Term};

    fn ab_formation(first: &str, second: &str) -> Term {
        Term::Formation(vec![
            Binding::Alpha(Attribute::label(first), Term::Formation(vec![])),
            Binding::Alpha(Attribute::label(second), Term::Formation(vec![])),
        ])
    }

    #[test]
    fn binding_order_is_unobservable() {
        assert!(equal(&ab_formation("a", "b"), &ab_formation("b", "a")));
    }

    #[test]
    fn reordering_is_recursive() {
        let wrap = |t: Term| Term::Formation(vec![Binding::Alpha(Attribute::label("x"), t)]);
        assert!(equal(
            &wrap(ab_formation("a", "b")),
            &wrap(ab_formation("b", "a"))
        ));
    }

    #[test]
    fn application_argument_order_is_observable() {
        let app = |first: &str, second: &str| {
            Term::application(
                Term::This,
                vec![
                    Binding::Alpha(Attribute::label(first), Term::Formation(vec![])),
                    Binding::Alpha(Attribute::label(second), Term::Formation(vec![])),
                ],
            )
        };
        assert!(!equal(&app("a", "b"), &app("b", "a")));
    }

    #[test]
    fn delta_bytes_compare_exactly() {
        let d = |bytes: Vec<u8>| Term::Formation(vec![Binding::Delta(Bytes::new(bytes))]);
        assert!(equal(&d(vec![1, 2]), &d(vec![1, 2])));
        assert!(!equal(&d(vec![1, 2]), &d(vec![1])));
    }
}
