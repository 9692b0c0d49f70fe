use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("syntax error at byte {offset} near `{near}`")]
    Syntax { offset: usize, near: String },
    #[error("unconsumed input at byte {offset}: `{near}`")]
    UnconsumedInput { offset: usize, near: String },
}

impl ParseError {
    pub(crate) fn syntax(full: &str, rest: &str) -> Self {
        ParseError::Syntax {
            offset: full.len() - rest.len(),
            near: snippet(rest),
        }
    }

    pub(crate) fn unconsumed(full: &str, rest: &str) -> Self {
        ParseError::UnconsumedInput {
            offset: full.len() - rest.len(),
            near: snippet(rest),
        }
    }
}

fn snippet(rest: &str) -> String {
    let mut s: String = rest.chars().take(24).collect();
    if rest.chars().count() > 24 {
        s.push('…');
    }
    s
}
