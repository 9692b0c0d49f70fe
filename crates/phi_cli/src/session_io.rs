//! File plumbing shared by the subcommands.

use std::fs;
use std::io::Write;
use std::path::Path;

use phi_ast::Term;
use phi_engine::Ruleset;
use phi_parser::parse_program;

use crate::error::CliError;

pub fn load_ruleset(path: &Path) -> Result<Ruleset, CliError> {
    let src = fs::read_to_string(path).map_err(|e| CliError::io(path, e))?;
    Ruleset::from_yaml(&src)
        .map_err(|e| CliError::Parse(format!("{}: {}", path.display(), e)))
}

/// The program comes either inline or from `--input-file`.
pub fn load_program(
    inline: Option<&str>,
    input_file: Option<&Path>,
) -> Result<Term, CliError> {
    let src = match (inline, input_file) {
        (Some(s), None) => s.to_string(),
        (None, Some(path)) => {
            fs::read_to_string(path).map_err(|e| CliError::io(path, e))?
        }
        (None, None) => {
            return Err(CliError::Parse(
                "no program given: pass a PROGRAM argument or --input-file".to_string(),
            ))
        }
        (Some(_), Some(_)) => {
            return Err(CliError::Parse(
                "both a PROGRAM argument and --input-file given: pass exactly one".to_string(),
            ))
        }
    };
    let term = parse_program(&src)
        .map(|p| p.into_term())
        .map_err(|e| CliError::Parse(e.to_string()))?;
    if !term.is_concrete() {
        return Err(CliError::Parse(
            "meta-variables belong in rule patterns, not in programs".to_string(),
        ));
    }
    Ok(term)
}

/// Write to `--output-file`, or stdout when none was given.
pub fn write_output(output_file: Option<&Path>, text: &str) -> Result<(), CliError> {
    match output_file {
        Some(path) => {
            let mut f = fs::File::create(path).map_err(|e| CliError::io(path, e))?;
            f.write_all(text.as_bytes())
                .map_err(|e| CliError::io(path, e))
        }
        None => {
            print!("{}", text);
            Ok(())
        }
    }
}
