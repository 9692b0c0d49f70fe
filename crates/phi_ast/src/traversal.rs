//! Stack-safe traversal metrics.
//!
//! `size` and `depth` use explicit stacks so deeply nested terms cannot
//! overflow the call stack. The size metric has no semantic role; it
//! feeds search bounds and shrink heuristics.

use crate::term::{Binding, Term};

fn push_children<'a>(term: &'a Term, stack: &mut Vec<&'a Term>) {
    match term {
        Term::Formation(bs) => push_binding_payloads(bs, stack),
        Term::Application(f, bs) => {
            stack.push(f);
            push_binding_payloads(bs, stack);
        }
        Term::Dispatch(o, _) => stack.push(o),
        Term::MetaFunction(_, arg) => stack.push(arg),
        Term::Global | Term::This | Term::Termination | Term::MetaObject(_) => {}
    }
}

fn push_binding_payloads<'a>(bindings: &'a [Binding], stack: &mut Vec<&'a Term>) {
    for b in bindings {
        if let Binding::Alpha(_, t) = b {
            stack.push(t);
        }
    }
}

/// Number of term nodes, bindings included as their payloads.
pub fn size(root: &Term) -> usize {
    let mut count = 0;
    let mut stack = vec![root];
    while let Some(t) = stack.pop() {
        count += 1;
        push_children(t, &mut stack);
    }
    count
}

/// Longest root-to-leaf distance; a leaf has depth 0.
pub fn depth(root: &Term) -> usize {
    let mut max_depth = 0;
    let mut stack: Vec<(&Term, usize)> = vec![(root, 0)];
    while let Some((t, d)) = stack.pop() {
        max_depth = max_depth.max(d);
        let mut children = Vec::new();
        push_children(t, &mut children);
        for c in children {
            stack.push((c, d + 1));
        }
    }
    max_depth
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::term::{Attribute, Binding, Term};

    #[test]
    fn size_counts_every_term_node() {
        // ⟦ a ↦ ξ.b ⟧ : formation + dispatch + ξ
        let t = Term::Formation(vec![Binding::Alpha(
            Attribute::label("a"),
            Term::dispatch(Term::This, Attribute::label("b")),
        )]);
        assert_eq!(size(&t), 3);
    }

    #[test]
    fn depth_of_leaf_is_zero() {
        assert_eq!(depth(&Term::Global), 0);
        assert_eq!(depth(&Term::Formation(vec![])), 0);
    }

    #[test]
    fn nested_formations_grow_depth() {
        let inner = Term::Formation(vec![]);
        let mid = Term::Formation(vec![Binding::Alpha(Attribute::label("a"), inner)]);
        let outer = Term::Formation(vec![Binding::Alpha(Attribute::label("b"), mid)]);
        assert_eq!(depth(&outer), 2);
        assert_eq!(size(&outer), 3);
    }
}
