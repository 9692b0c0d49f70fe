//! Built-in λ-functions evaluated during dataization.
//!
//! The arithmetic built-ins read their operands from the surrounding
//! formation (ρ and α0), dataize each to bytes, and interpret the bytes
//! as 8-byte big-endian two's-complement integers. An operand of an
//! impossible shape yields ⊥; an operand that stays residual leaves the
//! formation untouched.

use phi_ast::{Attribute, Binding, Bytes, Term};
use rustc_hash::FxHashMap;

use crate::dataize::{DataizeState, Dataized, Dataizer};

/// A built-in evaluator: receives the formation that carries the λ
/// binding and returns its replacement. Returning the input unchanged
/// signals "no progress" and ends dataization with a residual.
pub type Builtin = fn(&Dataizer<'_>, &Term, &mut DataizeState) -> Term;

/// Width of the integers the arithmetic built-ins operate on.
pub const INT_WIDTH: usize = 8;

/// Decode exactly [`INT_WIDTH`] big-endian two's-complement bytes.
pub fn bytes_to_i64(bytes: &Bytes) -> Option<i64> {
    let arr: [u8; INT_WIDTH] = bytes.as_slice().try_into().ok()?;
    Some(i64::from_be_bytes(arr))
}

/// Encode an integer back into its [`INT_WIDTH`]-byte form.
pub fn i64_to_bytes(value: i64) -> Bytes {
    Bytes::new(value.to_be_bytes().to_vec())
}

/// A formation carrying nothing but the given byte literal.
pub fn delta_formation(bytes: Bytes) -> Term {
    Term::Formation(vec![Binding::Delta(bytes)])
}

/// Registry of known built-ins, keyed by the opaque λ name.
///
/// `Package` is not listed here: the interpreter special-cases it
/// because it rewrites sibling bindings rather than the formation's own
/// value.
pub struct BuiltinRegistry {
    map: FxHashMap<String, Builtin>,
}

impl BuiltinRegistry {
    pub fn empty() -> Self {
        Self {
            map: FxHashMap::default(),
        }
    }

    pub fn register(&mut self, name: &str, builtin: Builtin) {
        self.map.insert(name.to_string(), builtin);
    }

    pub fn get(&self, name: &str) -> Option<Builtin> {
        self.map.get(name).copied()
    }
}

impl Default for BuiltinRegistry {
    fn default() -> Self {
        let mut reg = Self::empty();
        reg.register("Lorg_eolang_int_plus", int_plus);
        reg.register("Lorg_eolang_int_times", int_times);
        reg.register("Lorg_eolang_int_div", int_div);
        reg.register("Lorg_eolang_int_gt", int_gt);
        reg
    }
}

/// Fetch one operand attribute and dataize it to an integer.
///
/// `Err` carries the term the built-in must answer with: ⊥ for an
/// impossible shape, the untouched formation for a residual operand.
fn operand(
    dz: &Dataizer<'_>,
    formation: &Term,
    state: &mut DataizeState,
    attr: Attribute,
) -> Result<i64, Term> {
    let Term::Formation(bindings) = formation else {
        return Err(Term::Termination);
    };
    let payload = bindings.iter().find_map(|b| match b {
        Binding::Alpha(a, t) if *a == attr => Some(t),
        _ => None,
    });
    let Some(payload) = payload else {
        return Err(Term::Termination);
    };
    match dz.dataize_under(payload.clone(), state) {
        Dataized::Bytes(bytes) => bytes_to_i64(&bytes).ok_or(Term::Termination),
        Dataized::Residual(Term::Termination) => Err(Term::Termination),
        Dataized::Residual(_) => Err(formation.clone()),
    }
}

fn operands(
    dz: &Dataizer<'_>,
    formation: &Term,
    state: &mut DataizeState,
) -> Result<(i64, i64), Term> {
    let lhs = operand(dz, formation, state, Attribute::Rho)?;
    let rhs = operand(dz, formation, state, Attribute::Alpha(0))?;
    Ok((lhs, rhs))
}

fn int_binary(
    dz: &Dataizer<'_>,
    formation: &Term,
    state: &mut DataizeState,
    op: fn(i64, i64) -> Option<i64>,
) -> Term {
    match operands(dz, formation, state) {
        Ok((a, b)) => match op(a, b) {
            Some(v) => delta_formation(i64_to_bytes(v)),
            None => Term::Termination,
        },
        Err(answer) => answer,
    }
}

fn int_plus(dz: &Dataizer<'_>, formation: &Term, state: &mut DataizeState) -> Term {
    int_binary(dz, formation, state, |a, b| Some(a.wrapping_add(b)))
}

fn int_times(dz: &Dataizer<'_>, formation: &Term, state: &mut DataizeState) -> Term {
    int_binary(dz, formation, state, |a, b| Some(a.wrapping_mul(b)))
}

fn int_div(dz: &Dataizer<'_>, formation: &Term, state: &mut DataizeState) -> Term {
    int_binary(dz, formation, state, i64::checked_div)
}

fn int_gt(dz: &Dataizer<'_>, formation: &Term, state: &mut DataizeState) -> Term {
    match operands(dz, formation, state) {
        Ok((a, b)) => delta_formation(Bytes::new(vec![u8::from(a > b)])),
        Err(answer) => answer,
    }
}
