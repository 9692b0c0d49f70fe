//! Canonical printer for the concrete φ-syntax.
//!
//! The printed form round-trips through the parser. φ-syntax needs no
//! precedence handling: every construct is self-delimiting.

use crate::term::{Attribute, Binding, Program, Term};
use std::fmt;

impl fmt::Display for Attribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Attribute::Phi => write!(f, "φ"),
            Attribute::Rho => write!(f, "ρ"),
            Attribute::Sigma => write!(f, "σ"),
            Attribute::Vertex => write!(f, "ν"),
            Attribute::Label(name) => write!(f, "{}", name),
            Attribute::Alpha(i) => write!(f, "α{}", i),
            Attribute::Meta(id) => write!(f, "{}", id),
        }
    }
}

impl fmt::Display for Binding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Binding::Alpha(attr, obj) => write!(f, "{} ↦ {}", attr, obj),
            Binding::Empty(attr) => write!(f, "{} ↦ ∅", attr),
            Binding::Delta(bytes) => write!(f, "Δ ⤍ {}", bytes),
            Binding::Lambda(name) => write!(f, "λ ⤍ {}", name),
            Binding::MetaBindings(id) => write!(f, "{}", id),
        }
    }
}

fn write_bindings(f: &mut fmt::Formatter<'_>, bindings: &[Binding]) -> fmt::Result {
    for (i, b) in bindings.iter().enumerate() {
        if i > 0 {
            write!(f, ", ")?;
        }
        write!(f, "{}", b)?;
    }
    Ok(())
}

impl fmt::Display for Term {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Term::Formation(bs) => {
                if bs.is_empty() {
                    write!(f, "⟦ ⟧")
                } else {
                    write!(f, "⟦ ")?;
                    write_bindings(f, bs)?;
                    write!(f, " ⟧")
                }
            }
            Term::Application(head, args) => {
                write!(f, "{}(", head)?;
                write_bindings(f, args)?;
                write!(f, ")")
            }
            Term::Dispatch(obj, attr) => write!(f, "{}.{}", obj, attr),
            Term::Global => write!(f, "Φ"),
            Term::This => write!(f, "ξ"),
            Term::Termination => write!(f, "⊥"),
            Term::MetaObject(id) => write!(f, "{}", id),
            Term::MetaFunction(name, arg) => write!(f, "@{}({})", name, arg),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{{ {} }}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Bytes, MetaId};

    #[test]
    fn prints_formations_and_bindings() {
        let t = Term::Formation(vec![
            Binding::Alpha(Attribute::label("a"), Term::Formation(vec![])),
            Binding::Empty(Attribute::label("c")),
            Binding::Delta(Bytes::new(vec![0x00])),
            Binding::Lambda("Lorg_eolang_int_plus".to_string()),
        ]);
        assert_eq!(
            t.to_string(),
            "⟦ a ↦ ⟦ ⟧, c ↦ ∅, Δ ⤍ 00-, λ ⤍ Lorg_eolang_int_plus ⟧"
        );
    }

    #[test]
    fn prints_dispatch_chains_and_applications() {
        // ξ.b(c ↦ ⟦ ⟧).d
        let t = Term::dispatch(
            Term::application(
                Term::dispatch(Term::This, Attribute::label("b")),
                vec![Binding::Alpha(Attribute::label("c"), Term::Formation(vec![]))],
            ),
            Attribute::label("d"),
        );
        assert_eq!(t.to_string(), "ξ.b(c ↦ ⟦ ⟧).d");
    }

    #[test]
    fn prints_distinguished_attributes_and_alpha_indices() {
        let t = Term::dispatch(
            Term::dispatch(Term::This, Attribute::Rho),
            Attribute::Alpha(0),
        );
        assert_eq!(t.to_string(), "ξ.ρ.α0");
        assert_eq!(Attribute::Phi.to_string(), "φ");
        assert_eq!(Attribute::Vertex.to_string(), "ν");
    }

    #[test]
    fn prints_meta_syntax() {
        let t = Term::dispatch(
            Term::Formation(vec![Binding::MetaBindings(MetaId::new("B"))]),
            Attribute::Meta(MetaId::new("a")),
        );
        assert_eq!(t.to_string(), "⟦ !B ⟧.!a");

        let mf = Term::MetaFunction("decoratee".to_string(), Box::new(Term::MetaObject(MetaId::new("b"))));
        assert_eq!(mf.to_string(), "@decoratee(!b)");
    }

    #[test]
    fn prints_program_braces() {
        let p = Program(Term::Formation(vec![]));
        assert_eq!(p.to_string(), "{ ⟦ ⟧ }");
    }
}
