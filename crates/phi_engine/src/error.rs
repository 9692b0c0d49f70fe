use phi_parser::ParseError;
use thiserror::Error;

/// Fatal ruleset compilation errors.
///
/// Everything else the engine can run into — unknown built-ins, stuck
/// dataization, exceeded search bounds, the ⊥ term — is a normal return
/// value, not an error.
#[derive(Error, Debug)]
pub enum RulesetError {
    #[error("ruleset YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("rule `{rule}`, {field}: {source}")]
    Phi {
        rule: String,
        field: &'static str,
        source: ParseError,
    },

    #[error("rule `{rule}`: meta-variable !{var} used in the {place} but not bound by the pattern")]
    UnboundMeta {
        rule: String,
        var: String,
        place: &'static str,
    },

    #[error("rule `{rule}`: nf condition names !{var}, which the pattern does not bind as an object")]
    MalformedNf { rule: String, var: String },

    #[error("rule `{rule}`: unknown meta-function @{name}")]
    UnknownMetaFunction { rule: String, name: String },

    #[error("rule `{rule}`: meta-functions may appear in the result only")]
    MetaFunctionInPattern { rule: String },

    #[error("rule `{rule}`: a `when` entry must set exactly one of nf / present_attrs / absent_attrs")]
    MalformedCondition { rule: String },

    #[error("rule `{rule}`: bad attribute `{attr}` in a condition")]
    BadAttribute { rule: String, attr: String },

    #[error("rule `{rule}`, test `{test}`: test vectors must be meta-free terms")]
    MetaInTestVector { rule: String, test: String },
}
