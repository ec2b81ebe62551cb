//! `rivet check` — Parse binding and value files and list their entries.

use std::collections::BTreeMap;
use std::path::PathBuf;

use clap::Args;
use rivet_common::constants::{DEFAULT_BINDINGS_FILE, DEFAULT_VALUES_FILE};
use rivet_config::{BindingRegistry, ValueStore};
use serde::Serialize;

use crate::output::format_table;

/// Arguments for the `check` command.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Path to the binding file (abstract type = concrete type).
    #[arg(long, default_value = DEFAULT_BINDINGS_FILE)]
    pub bindings: PathBuf,

    /// Path to the value file (key = raw value).
    #[arg(long, default_value = DEFAULT_VALUES_FILE)]
    pub values: PathBuf,
}

#[derive(Serialize)]
struct Report<'a> {
    bindings: BTreeMap<&'a str, &'a str>,
    values: BTreeMap<&'a str, &'a str>,
}

/// Executes the `check` command.
///
/// Loads both files the way an injector would and prints their entries
/// sorted by key.
///
/// # Errors
///
/// Returns an error if either file cannot be read or parsed.
pub fn execute(args: &CheckArgs, json: bool) -> anyhow::Result<()> {
    let bindings = BindingRegistry::from_file(&args.bindings)?;
    let mut values = ValueStore::new();
    let _ = values.load_file(&args.values)?;
    tracing::debug!(
        bindings = bindings.len(),
        values = values.len(),
        "configuration files parsed"
    );

    let binding_rows: Vec<(&str, &str)> = bindings
        .sorted_entries()
        .into_iter()
        .map(|(a, c)| (a.as_str(), c.as_str()))
        .collect();
    let value_rows = values.sorted_entries();

    if json {
        let report = Report {
            bindings: binding_rows.iter().copied().collect(),
            values: value_rows.iter().copied().collect(),
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("Bindings: {}", args.bindings.display());
    print!("{}", format_table(("ABSTRACT", "CONCRETE"), &binding_rows));
    println!();
    println!("Values: {}", args.values.display());
    print!("{}", format_table(("KEY", "VALUE"), &value_rows));
    println!();
    println!(
        "  {} binding(s), {} value(s) loaded.",
        binding_rows.len(),
        value_rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn file(content: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        file.write_all(content.as_bytes()).expect("write");
        file
    }

    #[test]
    fn valid_files_pass() {
        let bindings = file("app.Engine=app.V8\n");
        let values = file("car.seats=4\n");
        let args = CheckArgs {
            bindings: bindings.path().to_path_buf(),
            values: values.path().to_path_buf(),
        };
        execute(&args, false).expect("check");
        execute(&args, true).expect("check json");
    }

    #[test]
    fn invalid_binding_fails() {
        let bindings = file("app.Engine=\n");
        let values = file("");
        let args = CheckArgs {
            bindings: bindings.path().to_path_buf(),
            values: values.path().to_path_buf(),
        };
        let err = execute(&args, false).unwrap_err();
        assert!(err.to_string().contains("failed to load bindings"), "got: {err}");
    }

    #[test]
    fn missing_value_file_fails() {
        let bindings = file("");
        let dir = tempfile::tempdir().expect("tempdir");
        let args = CheckArgs {
            bindings: bindings.path().to_path_buf(),
            values: dir.path().join("value.properties"),
        };
        assert!(execute(&args, false).is_err());
    }
}
