//! `transform` subcommand: rewrite a program under a ruleset and print
//! results, one chosen result, or every reduction chain.

use std::path::PathBuf;

use clap::Args;
use phi_ast::{equal, Program, Term};
use phi_engine::{Limits, Normalizer, ReductionChain};

use crate::error::CliError;
use crate::json_types::{ChainJson, ChainStepJson, TransformJson, SCHEMA_VERSION};
use crate::session_io::{load_program, load_ruleset, write_output};

#[derive(Args, Debug)]
pub struct TransformArgs {
    /// Ruleset YAML file
    #[arg(long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Program in concrete φ-syntax
    pub program: Option<String>,

    /// Read the program from a file instead
    #[arg(long, value_name = "FILE", conflicts_with = "program")]
    pub input_file: Option<PathBuf>,

    /// Print every reduction chain with the rules applied
    #[arg(long, conflicts_with = "single")]
    pub chain: bool,

    /// Print one chosen result (the leftmost chain's end)
    #[arg(long)]
    pub single: bool,

    /// Machine-readable output
    #[arg(long)]
    pub json: bool,

    /// Write here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Bound on the length of any reduction chain
    #[arg(long, default_value_t = Limits::DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Successors above this many nodes prune their branch
    #[arg(long, default_value_t = Limits::DEFAULT_MAX_TERM_SIZE)]
    pub max_term_size: usize,
}

pub fn run(args: TransformArgs) -> Result<(), CliError> {
    let ruleset = load_ruleset(&args.rules)?;
    let term = load_program(args.program.as_deref(), args.input_file.as_deref())?;
    let limits = Limits::new(args.max_steps, args.max_term_size);
    let norm = Normalizer::with_limits(&ruleset, limits);

    let chains: Vec<ReductionChain> = if args.single {
        norm.chains(&term).take(1).collect()
    } else {
        norm.chains(&term).collect()
    };

    let mut results: Vec<Term> = Vec::new();
    for chain in &chains {
        if !results.iter().any(|r| equal(r, chain.result())) {
            results.push(chain.result().clone());
        }
    }

    let text = if args.json {
        let payload = TransformJson {
            schema_version: SCHEMA_VERSION,
            input: Program(term.clone()).to_string(),
            ruleset: ruleset.title.clone(),
            results: results
                .iter()
                .map(|t| Program(t.clone()).to_string())
                .collect(),
            chains: args.chain.then(|| chains.iter().map(chain_json).collect()),
        };
        let mut s = serde_json::to_string_pretty(&payload)
            .expect("output schema serializes");
        s.push('\n');
        s
    } else if args.chain {
        render_chains(&chains)
    } else {
        let mut s = String::new();
        for t in &results {
            s.push_str(&Program(t.clone()).to_string());
            s.push('\n');
        }
        s
    };
    write_output(args.output_file.as_deref(), &text)
}

fn chain_json(chain: &ReductionChain) -> ChainJson {
    ChainJson {
        complete: chain.complete,
        start: Program(chain.terms[0].clone()).to_string(),
        steps: chain
            .rules
            .iter()
            .zip(chain.terms.iter().skip(1))
            .map(|(rule, term)| ChainStepJson {
                rule: rule.clone(),
                term: Program(term.clone()).to_string(),
            })
            .collect(),
    }
}

fn render_chains(chains: &[ReductionChain]) -> String {
    let mut out = String::new();
    for (i, chain) in chains.iter().enumerate() {
        let status = if chain.complete { "complete" } else { "pruned" };
        out.push_str(&format!(
            "chain {} ({}, {} steps):\n",
            i + 1,
            status,
            chain.len()
        ));
        out.push_str(&format!("  {}\n", Program(chain.terms[0].clone())));
        for (rule, term) in chain.rules.iter().zip(chain.terms.iter().skip(1)) {
            out.push_str(&format!("  {} → {}\n", rule, Program(term.clone())));
        }
    }
    out
}
