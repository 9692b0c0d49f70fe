use std::fmt;

/// Identifier of a meta-variable (`!a`, `!B1`), without the leading `!`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MetaId(pub String);

impl MetaId {
    pub fn new(name: &str) -> Self {
        MetaId(name.to_string())
    }
}

impl fmt::Display for MetaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "!{}", self.0)
    }
}

/// An attribute name inside a binding or a dispatch.
///
/// The distinguished names φ, ρ, σ and ν come first in the canonical
/// order, then labels, then α-indices. `Meta` stands for an attribute
/// meta-variable and appears in patterns only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Attribute {
    /// φ — the decoratee.
    Phi,
    /// ρ — the parent object.
    Rho,
    /// σ — the home object.
    Sigma,
    /// ν — the vertex identity tag.
    Vertex,
    /// A named attribute.
    Label(String),
    /// αn — a positional argument.
    Alpha(u32),
    /// `!a` — pattern-only attribute meta-variable.
    Meta(MetaId),
}

impl Attribute {
    pub fn label(name: &str) -> Self {
        Attribute::Label(name.to_string())
    }

    /// True for φ, ρ, σ and ν.
    pub fn is_distinguished(&self) -> bool {
        matches!(
            self,
            Attribute::Phi | Attribute::Rho | Attribute::Sigma | Attribute::Vertex
        )
    }
}

/// A byte literal carried by a `Δ ⤍ …` binding.
///
/// Prints as dash-separated lowercase hex pairs; the empty sequence
/// prints as `--` and a single byte keeps a trailing dash (`00-`), so
/// that every byte literal is self-delimiting in the concrete syntax.
/// The parser accepts either case; the printer always emits lowercase.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct Bytes(pub Vec<u8>);

impl Bytes {
    pub fn new(bytes: Vec<u8>) -> Self {
        Bytes(bytes)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Display for Bytes {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "--"),
            [b] => write!(f, "{:02x}-", b),
            bytes => {
                for (i, b) in bytes.iter().enumerate() {
                    if i > 0 {
                        write!(f, "-")?;
                    }
                    write!(f, "{:02x}", b)?;
                }
                Ok(())
            }
        }
    }
}

/// One entry of a bindings-sequence.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Binding {
    /// `attr ↦ obj` — an attached object.
    Alpha(Attribute, Term),
    /// `attr ↦ ∅` — declared but absent.
    Empty(Attribute),
    /// `Δ ⤍ bytes` — byte-literal data.
    Delta(Bytes),
    /// `λ ⤍ Name` — an opaque built-in.
    Lambda(String),
    /// `!B` — pattern-only meta-variable matching a run of bindings.
    MetaBindings(MetaId),
}

impl Binding {
    /// The attribute this binding declares, if it declares one.
    pub fn attribute(&self) -> Option<&Attribute> {
        match self {
            Binding::Alpha(a, _) | Binding::Empty(a) => Some(a),
            _ => None,
        }
    }
}

/// A φ-term.
///
/// Terms own their children outright; rewrites rebuild the spine and
/// clone whatever subtrees they keep.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Term {
    /// `⟦ b₁, b₂, … ⟧` — an object literal.
    Formation(Vec<Binding>),
    /// `obj(b₁, …)` — application of arguments.
    Application(Box<Term>, Vec<Binding>),
    /// `obj.attr` — attribute access.
    Dispatch(Box<Term>, Attribute),
    /// `Φ` — the outermost object.
    Global,
    /// `ξ` — self-reference inside a formation.
    This,
    /// `⊥` — the stuck term.
    Termination,
    /// `!b` — pattern-only object meta-variable.
    MetaObject(MetaId),
    /// `@fn(obj)` — pattern-only meta-level transformation.
    MetaFunction(String, Box<Term>),
}

impl Term {
    pub fn formation(bindings: Vec<Binding>) -> Self {
        Term::Formation(bindings)
    }

    pub fn application(head: Term, args: Vec<Binding>) -> Self {
        Term::Application(Box::new(head), args)
    }

    pub fn dispatch(obj: Term, attr: Attribute) -> Self {
        Term::Dispatch(Box::new(obj), attr)
    }

    /// True when the term contains no meta-variant anywhere, i.e. it is
    /// an ordinary term rather than a pattern.
    pub fn is_concrete(&self) -> bool {
        fn bindings_concrete(bs: &[Binding]) -> bool {
            bs.iter().all(|b| match b {
                Binding::Alpha(a, t) => !matches!(a, Attribute::Meta(_)) && t.is_concrete(),
                Binding::Empty(a) => !matches!(a, Attribute::Meta(_)),
                Binding::Delta(_) | Binding::Lambda(_) => true,
                Binding::MetaBindings(_) => false,
            })
        }
        match self {
            Term::Formation(bs) => bindings_concrete(bs),
            Term::Application(f, bs) => f.is_concrete() && bindings_concrete(bs),
            Term::Dispatch(o, a) => o.is_concrete() && !matches!(a, Attribute::Meta(_)),
            Term::Global | Term::This | Term::Termination => true,
            Term::MetaObject(_) | Term::MetaFunction(_, _) => false,
        }
    }
}

/// A whole program: the global-object formation wrapped in `{ … }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program(pub Term);

impl Program {
    pub fn term(&self) -> &Term {
        &self.0
    }

    pub fn into_term(self) -> Term {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bytes_display_shapes() {
        assert_eq!(Bytes::new(vec![]).to_string(), "--");
        assert_eq!(Bytes::new(vec![0x00]).to_string(), "00-");
        assert_eq!(Bytes::new(vec![0x01]).to_string(), "01-");
        // Hex pairs come out lowercase.
        assert_eq!(Bytes::new(vec![0xDE, 0xAD]).to_string(), "de-ad");
        assert_eq!(Bytes::new(vec![0x2A]).to_string(), "2a-");
        assert_eq!(
            Bytes::new(vec![0, 0, 0, 0, 0, 0, 0, 5]).to_string(),
            "00-00-00-00-00-00-00-05"
        );
    }

    #[test]
    fn concrete_detects_meta_variants() {
        let plain = Term::formation(vec![Binding::Alpha(
            Attribute::label("a"),
            Term::Formation(vec![]),
        )]);
        assert!(plain.is_concrete());

        let pattern = Term::formation(vec![Binding::MetaBindings(MetaId::new("B"))]);
        assert!(!pattern.is_concrete());

        let meta_attr = Term::dispatch(Term::This, Attribute::Meta(MetaId::new("a")));
        assert!(!meta_attr.is_concrete());
    }
}
