//! Proptest generators for φ-terms.
//!
//! Generated terms respect the formation invariant (no attribute occurs
//! twice in one bindings-sequence) and stay small enough for the
//! bounded joinability search: the driver properties assume successor
//! sizes comfortably below the confluence size cap.

use phi_ast::{Attribute, Binding, Bytes, Term};
use proptest::prelude::*;

const DEPTH: u32 = 3;
const SIZE: u32 = 10;
const ITEMS: u32 = 3;

fn arb_label() -> impl Strategy<Value = Attribute> {
    "[a-d]".prop_map(|s| Attribute::label(&s))
}

fn dedup_attrs(bindings: Vec<Binding>) -> Vec<Binding> {
    let mut seen: Vec<String> = Vec::new();
    let mut has_delta = false;
    let mut out = Vec::new();
    for b in bindings {
        match &b {
            Binding::Delta(_) => {
                if has_delta {
                    continue;
                }
                has_delta = true;
            }
            Binding::Alpha(attr, _) | Binding::Empty(attr) => {
                let key = attr.to_string();
                if seen.contains(&key) {
                    continue;
                }
                seen.push(key);
            }
            _ => {}
        }
        out.push(b);
    }
    // Δ never coexists with a void binding in a well-formed formation.
    if out.iter().any(|b| matches!(b, Binding::Empty(_))) {
        out.retain(|b| !matches!(b, Binding::Delta(_)));
    }
    out
}

fn arb_bindings(
    payload: impl Strategy<Value = Term> + Clone + 'static,
) -> impl Strategy<Value = Vec<Binding>> {
    proptest::collection::vec(
        prop_oneof![
            4 => (arb_label(), payload.clone()).prop_map(|(a, t)| Binding::Alpha(a, t)),
            1 => arb_label().prop_map(Binding::Empty),
            1 => Just(Binding::Delta(Bytes::new(vec![0x2A]))),
        ],
        0..(ITEMS as usize),
    )
    .prop_map(dedup_attrs)
}

/// Arbitrary concrete terms, for syntax-level properties.
pub fn arb_term() -> impl Strategy<Value = Term> {
    let leaf = prop_oneof![
        Just(Term::This),
        Just(Term::Global),
        Just(Term::Termination),
        Just(Term::Formation(vec![])),
    ];
    leaf.prop_recursive(DEPTH, SIZE, ITEMS, |inner| {
        prop_oneof![
            arb_bindings(inner.clone()).prop_map(Term::Formation),
            (inner.clone(), arb_label()).prop_map(|(t, a)| Term::dispatch(t, a)),
            (inner.clone(), arb_bindings(inner)).prop_map(|(t, bs)| Term::application(t, bs)),
        ]
    })
}

/// Small formations whose payloads are biased towards redexes of the
/// standard ruleset, for driver and confluence properties.
pub fn arb_formation() -> impl Strategy<Value = Term> {
    let redex = prop_oneof![
        Just(Term::This),
        Just(Term::Global),
        Just(Term::Formation(vec![])),
        // ⟦ x ↦ Φ ⟧.x — a dot redex
        Just(Term::dispatch(
            Term::Formation(vec![Binding::Alpha(Attribute::label("x"), Term::Global)]),
            Attribute::label("x"),
        )),
        // ξ() — a stay redex
        Just(Term::application(Term::This, vec![])),
        // ⟦ φ ↦ ξ ⟧.y — a phi redex
        Just(Term::dispatch(
            Term::Formation(vec![Binding::Alpha(Attribute::Phi, Term::This)]),
            Attribute::label("y"),
        )),
    ];
    arb_bindings(redex).prop_map(Term::Formation)
}
