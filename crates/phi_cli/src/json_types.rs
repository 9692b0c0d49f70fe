//! Serde shapes for `--json` output.

use serde::Serialize;

pub const SCHEMA_VERSION: u32 = 1;

#[derive(Serialize, Debug)]
pub struct TransformJson {
    pub schema_version: u32,
    pub input: String,
    pub ruleset: String,
    /// Distinct final terms over all explored chains.
    pub results: Vec<String>,
    /// Present with `--chain` only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chains: Option<Vec<ChainJson>>,
}

#[derive(Serialize, Debug)]
pub struct ChainJson {
    pub complete: bool,
    pub start: String,
    pub steps: Vec<ChainStepJson>,
}

#[derive(Serialize, Debug)]
pub struct ChainStepJson {
    pub rule: String,
    pub term: String,
}

#[derive(Serialize, Debug)]
pub struct DataizeJson {
    pub schema_version: u32,
    pub input: String,
    pub ruleset: String,
    /// "bytes" or "residual".
    pub kind: &'static str,
    pub output: String,
}
