//! Meta-variable substitutions and their application to rule results.

use phi_ast::{equal, Attribute, Binding, Bytes, MetaId, Term};
use rustc_hash::FxHashMap;
use thiserror::Error;

/// A binding of meta-variables produced by one successful match.
///
/// Lives only for the duration of a single match/substitute round.
/// Non-linear occurrences are enforced here: re-binding a meta-variable
/// succeeds only when the new value is α-equal to the old one.
#[derive(Debug, Clone, Default)]
pub struct Subst {
    objects: FxHashMap<String, Term>,
    attributes: FxHashMap<String, Attribute>,
    bindings: FxHashMap<String, Vec<Binding>>,
}

fn bindings_equal(a: &[Binding], b: &[Binding]) -> bool {
    a.len() == b.len()
        && a.iter().zip(b).all(|(x, y)| match (x, y) {
            (Binding::Alpha(ax, tx), Binding::Alpha(ay, ty)) => ax == ay && equal(tx, ty),
            _ => x == y,
        })
}

impl Subst {
    /// Bind an object meta-variable; `false` on a conflicting re-bind.
    pub fn bind_object(&mut self, id: &MetaId, term: &Term) -> bool {
        match self.objects.get(&id.0) {
            Some(existing) => equal(existing, term),
            None => {
                self.objects.insert(id.0.clone(), term.clone());
                true
            }
        }
    }

    pub fn bind_attribute(&mut self, id: &MetaId, attr: &Attribute) -> bool {
        match self.attributes.get(&id.0) {
            Some(existing) => existing == attr,
            None => {
                self.attributes.insert(id.0.clone(), attr.clone());
                true
            }
        }
    }

    pub fn bind_bindings(&mut self, id: &MetaId, run: &[Binding]) -> bool {
        match self.bindings.get(&id.0) {
            Some(existing) => bindings_equal(existing, run),
            None => {
                self.bindings.insert(id.0.clone(), run.to_vec());
                true
            }
        }
    }

    pub fn object(&self, id: &MetaId) -> Option<&Term> {
        self.objects.get(&id.0)
    }

    pub fn attribute(&self, id: &MetaId) -> Option<&Attribute> {
        self.attributes.get(&id.0)
    }

    pub fn bindings_run(&self, id: &MetaId) -> Option<&[Binding]> {
        self.bindings.get(&id.0).map(Vec::as_slice)
    }

    /// Resolve an attribute through the substitution: meta attributes
    /// map to their binding, concrete attributes pass through.
    pub fn resolve_attribute(&self, attr: &Attribute) -> Option<Attribute> {
        match attr {
            Attribute::Meta(id) => self.attribute(id).cloned(),
            concrete => Some(concrete.clone()),
        }
    }
}

/// Failure while instantiating a rule result.
///
/// Compilation rules out unbound meta-variables and unknown
/// meta-function names, so at rewrite time these only arise from
/// meta-function arguments of an impossible shape; the match in question
/// simply yields no successor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SubstError {
    #[error("unbound object meta-variable !{0}")]
    UnboundObject(String),
    #[error("unbound attribute meta-variable !{0}")]
    UnboundAttribute(String),
    #[error("unbound bindings meta-variable !{0}")]
    UnboundBindings(String),
    #[error("unknown meta-function @{0}")]
    UnknownMetaFunction(String),
    #[error("meta-function @{name} cannot digest its argument")]
    Inapplicable { name: String },
}

/// The fixed registry of meta-functions usable in rule results.
pub fn meta_function(name: &str) -> Option<fn(&Term) -> Result<Term, SubstError>> {
    match name {
        "decoratee" => Some(decoratee),
        "parent" => Some(parent),
        "vertex" => Some(vertex),
        _ => None,
    }
}

fn fetch(name: &str, attr: Attribute, term: &Term) -> Result<Term, SubstError> {
    if let Term::Formation(bs) = term {
        for b in bs {
            if let Binding::Alpha(a, payload) = b {
                if *a == attr {
                    return Ok(payload.clone());
                }
            }
        }
    }
    Err(SubstError::Inapplicable {
        name: name.to_string(),
    })
}

/// `@decoratee(⟦ …, φ ↦ t, … ⟧)` yields `t`.
fn decoratee(term: &Term) -> Result<Term, SubstError> {
    fetch("decoratee", Attribute::Phi, term)
}

/// `@parent(⟦ …, ρ ↦ t, … ⟧)` yields `t`.
fn parent(term: &Term) -> Result<Term, SubstError> {
    fetch("parent", Attribute::Rho, term)
}

/// `@vertex(⟦ … ⟧)` appends a fresh `ν ↦ ⟦ Δ ⤍ 00- ⟧` identity tag.
///
/// Applies to object formations only: a formation that already carries
/// ν, or that holds data (Δ) or an atom (λ), is left to fail the
/// substitution.
fn vertex(term: &Term) -> Result<Term, SubstError> {
    let Term::Formation(bindings) = term else {
        return Err(SubstError::Inapplicable {
            name: "vertex".to_string(),
        });
    };
    let untaggable = bindings.iter().any(|b| {
        matches!(b, Binding::Delta(_) | Binding::Lambda(_))
            || b.attribute() == Some(&Attribute::Vertex)
    });
    if untaggable {
        return Err(SubstError::Inapplicable {
            name: "vertex".to_string(),
        });
    }
    let mut out = bindings.clone();
    out.push(Binding::Alpha(
        Attribute::Vertex,
        Term::Formation(vec![Binding::Delta(Bytes::new(vec![0x00]))]),
    ));
    Ok(Term::Formation(out))
}

fn apply_attribute(attr: &Attribute, subst: &Subst) -> Result<Attribute, SubstError> {
    match attr {
        Attribute::Meta(id) => subst
            .attribute(id)
            .cloned()
            .ok_or_else(|| SubstError::UnboundAttribute(id.0.clone())),
        concrete => Ok(concrete.clone()),
    }
}

fn apply_bindings(bindings: &[Binding], subst: &Subst) -> Result<Vec<Binding>, SubstError> {
    let mut out = Vec::with_capacity(bindings.len());
    for b in bindings {
        match b {
            Binding::Alpha(attr, payload) => out.push(Binding::Alpha(
                apply_attribute(attr, subst)?,
                apply(payload, subst)?,
            )),
            Binding::Empty(attr) => out.push(Binding::Empty(apply_attribute(attr, subst)?)),
            Binding::Delta(_) | Binding::Lambda(_) => out.push(b.clone()),
            Binding::MetaBindings(id) => {
                let run = subst
                    .bindings_run(id)
                    .ok_or_else(|| SubstError::UnboundBindings(id.0.clone()))?;
                out.extend(run.iter().cloned());
            }
        }
    }
    Ok(out)
}

/// Instantiate a rule result (or any template) under a substitution.
pub fn apply(template: &Term, subst: &Subst) -> Result<Term, SubstError> {
    match template {
        Term::MetaObject(id) => subst
            .object(id)
            .cloned()
            .ok_or_else(|| SubstError::UnboundObject(id.0.clone())),
        Term::MetaFunction(name, arg) => {
            let f = meta_function(name)
                .ok_or_else(|| SubstError::UnknownMetaFunction(name.clone()))?;
            let arg = apply(arg, subst)?;
            f(&arg)
        }
        Term::Formation(bs) => Ok(Term::Formation(apply_bindings(bs, subst)?)),
        Term::Application(f, bs) => Ok(Term::Application(
            Box::new(apply(f, subst)?),
            apply_bindings(bs, subst)?,
        )),
        Term::Dispatch(o, a) => Ok(Term::Dispatch(
            Box::new(apply(o, subst)?),
            apply_attribute(a, subst)?,
        )),
        Term::Global | Term::This | Term::Termination => Ok(template.clone()),
    }
}
