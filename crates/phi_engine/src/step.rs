use phi_ast::Term;

/// One successful rewrite: the rule that fired and the whole rewritten
/// term with the patched subterm re-inserted.
#[derive(Debug, Clone)]
pub struct Step {
    pub rule: String,
    pub term: Term,
}

impl Step {
    pub fn new(rule: &str, term: Term) -> Self {
        Self {
            rule: rule.to_string(),
            term,
        }
    }
}
