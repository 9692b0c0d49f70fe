//! `dataize` subcommand: normalize and reduce built-ins, printing final
//! bytes or the residual program.

use std::path::PathBuf;

use clap::Args;
use phi_ast::Program;
use phi_engine::{Dataized, Dataizer, Limits};

use crate::error::CliError;
use crate::json_types::{DataizeJson, SCHEMA_VERSION};
use crate::session_io::{load_program, load_ruleset, write_output};

#[derive(Args, Debug)]
pub struct DataizeArgs {
    /// Ruleset YAML file
    #[arg(long, value_name = "FILE")]
    pub rules: PathBuf,

    /// Program in concrete φ-syntax
    pub program: Option<String>,

    /// Read the program from a file instead
    #[arg(long, value_name = "FILE", conflicts_with = "program")]
    pub input_file: Option<PathBuf>,

    /// Machine-readable output
    #[arg(long)]
    pub json: bool,

    /// Write here instead of stdout
    #[arg(long, value_name = "FILE")]
    pub output_file: Option<PathBuf>,

    /// Leave λ ⤍ Package formations alone
    #[arg(long)]
    pub no_package: bool,

    /// Bound on the length of any reduction chain
    #[arg(long, default_value_t = Limits::DEFAULT_MAX_STEPS)]
    pub max_steps: usize,

    /// Successors above this many nodes prune their branch
    #[arg(long, default_value_t = Limits::DEFAULT_MAX_TERM_SIZE)]
    pub max_term_size: usize,
}

pub fn run(args: DataizeArgs) -> Result<(), CliError> {
    let ruleset = load_ruleset(&args.rules)?;
    let term = load_program(args.program.as_deref(), args.input_file.as_deref())?;
    let limits = Limits::new(args.max_steps, args.max_term_size);
    let dz = Dataizer::with_limits(&ruleset, limits).package_mode(!args.no_package);

    let (kind, output) = match dz.dataize(&term) {
        Dataized::Bytes(bytes) => ("bytes", bytes.to_string()),
        Dataized::Residual(t) => ("residual", Program(t).to_string()),
    };

    let text = if args.json {
        let payload = DataizeJson {
            schema_version: SCHEMA_VERSION,
            input: Program(term).to_string(),
            ruleset: ruleset.title.clone(),
            kind,
            output,
        };
        let mut s = serde_json::to_string_pretty(&payload)
            .expect("output schema serializes");
        s.push('\n');
        s
    } else {
        format!("{}\n", output)
    };
    write_output(args.output_file.as_deref(), &text)
}
