//! Canonical order on attributes and bindings.
//!
//! Binding order inside a formation is unobservable: equality sorts every
//! formation's bindings by this order before comparing. Distinguished
//! attributes come first in a fixed order, then Δ and λ, then labels
//! lexicographically, then α-indices numerically.

use crate::term::{Attribute, Binding};
use std::cmp::Ordering;

fn attribute_rank(attr: &Attribute) -> u8 {
    match attr {
        Attribute::Phi => 0,
        Attribute::Rho => 1,
        Attribute::Sigma => 2,
        Attribute::Vertex => 3,
        Attribute::Label(_) => 6,
        Attribute::Alpha(_) => 7,
        Attribute::Meta(_) => 8,
    }
}

pub fn compare_attributes(a: &Attribute, b: &Attribute) -> Ordering {
    let ra = attribute_rank(a);
    let rb = attribute_rank(b);
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Attribute::Label(x), Attribute::Label(y)) => x.cmp(y),
        (Attribute::Alpha(x), Attribute::Alpha(y)) => x.cmp(y),
        (Attribute::Meta(x), Attribute::Meta(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}

fn binding_rank(b: &Binding) -> u8 {
    match b {
        Binding::Alpha(a, _) | Binding::Empty(a) => attribute_rank(a),
        Binding::Delta(_) => 4,
        Binding::Lambda(_) => 5,
        Binding::MetaBindings(_) => 9,
    }
}

/// Total order on bindings used by canonicalization.
///
/// Two attribute-carrying bindings compare by their attribute; a concrete
/// bindings-sequence never holds the same attribute twice, so the order
/// is total in practice.
pub fn compare_bindings(a: &Binding, b: &Binding) -> Ordering {
    let ra = binding_rank(a);
    let rb = binding_rank(b);
    if ra != rb {
        return ra.cmp(&rb);
    }
    match (a, b) {
        (Binding::Alpha(x, _), Binding::Alpha(y, _))
        | (Binding::Alpha(x, _), Binding::Empty(y))
        | (Binding::Empty(x), Binding::Alpha(y, _))
        | (Binding::Empty(x), Binding::Empty(y)) => compare_attributes(x, y),
        (Binding::Lambda(x), Binding::Lambda(y)) => x.cmp(y),
        (Binding::Delta(x), Binding::Delta(y)) => x.0.cmp(&y.0),
        (Binding::MetaBindings(x), Binding::MetaBindings(y)) => x.cmp(y),
        _ => Ordering::Equal,
    }
}
