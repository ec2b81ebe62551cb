//! `rivet coerce` — Preview the coercion of a value directive.

use std::path::PathBuf;

use clap::Args;
use rivet_coerce::{Coerced, InjectableShape, ValueDirective};
use rivet_common::constants::DEFAULT_DELIMITER;
use rivet_config::ValueStore;

use crate::output::value_to_json;

/// Arguments for the `coerce` command.
#[derive(Args, Debug)]
pub struct CoerceArgs {
    /// Target shape: bool, int, string, array<K>, list<K>, set<K> or map<K,V>.
    #[arg(long)]
    pub shape: InjectableShape,

    /// Value file consulted when the expression names a key.
    #[arg(long)]
    pub values: Option<PathBuf>,

    /// Token delimiter.
    #[arg(long, default_value = DEFAULT_DELIMITER)]
    pub delimiter: String,

    /// Configuration key or literal to coerce.
    pub expression: String,
}

/// Executes the `coerce` command.
///
/// Resolves the expression against the value file, if any, and prints the
/// candidate string, the coerced value and the number of rejected tokens.
/// Composite shapes also report how many elements were kept.
///
/// # Errors
///
/// Returns an error if the value file cannot be loaded or a composite
/// candidate is malformed.
pub fn execute(args: &CoerceArgs, json: bool) -> anyhow::Result<()> {
    let mut store = ValueStore::new();
    if let Some(path) = &args.values {
        let _ = store.load_file(path)?;
    }
    let directive = ValueDirective::new(args.expression.as_str()).with_delimiter(args.delimiter.as_str());
    let candidate = rivet_coerce::resolve::candidate(&directive, &store);
    let coerced = rivet_coerce::resolve(&directive, args.shape, &store)?;

    if json {
        let mut report = serde_json::json!({
            "shape": args.shape.to_string(),
            "candidate": candidate,
            "value": value_to_json(&coerced.value),
            "dropped": coerced.dropped,
        });
        if let Some(elements) = element_count(args.shape, &coerced) {
            report["elements"] = elements.into();
        }
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    println!("  shape:     {}", args.shape);
    println!("  candidate: {candidate}");
    println!("  value:     {}", coerced.value);
    if let Some(elements) = element_count(args.shape, &coerced) {
        println!("  elements:  {elements}");
    }
    println!("  dropped:   {}", coerced.dropped);
    Ok(())
}

fn element_count(shape: InjectableShape, coerced: &Coerced) -> Option<usize> {
    shape.is_composite().then(|| coerced.value.len())
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    fn args(shape: &str, expression: &str) -> CoerceArgs {
        CoerceArgs {
            shape: shape.parse().expect("shape"),
            values: None,
            delimiter: DEFAULT_DELIMITER.to_owned(),
            expression: expression.to_owned(),
        }
    }

    #[test]
    fn literal_list() {
        execute(&args("list<int>", "[1,2,x,3]"), false).expect("coerce");
        execute(&args("map<string,int>", "[a:1,b:x,c:3]"), true).expect("coerce json");
    }

    #[test]
    fn key_from_value_file() {
        let mut file = tempfile::NamedTempFile::new().expect("tempfile");
        writeln!(file, "flags=true,false").expect("write");
        let mut args = args("bool", "flags");
        args.values = Some(file.path().to_path_buf());
        execute(&args, false).expect("coerce");
    }

    #[test]
    fn element_count_only_for_composites() {
        let store = ValueStore::new();
        let set: InjectableShape = "set<int>".parse().expect("shape");
        let coerced = rivet_coerce::resolve(&ValueDirective::new("[1,1,x,2]"), set, &store)
            .expect("coerce");
        assert_eq!(element_count(set, &coerced), Some(2));

        let scalar: InjectableShape = "int".parse().expect("shape");
        let coerced =
            rivet_coerce::resolve(&ValueDirective::new("x,7"), scalar, &store).expect("coerce");
        assert_eq!(element_count(scalar, &coerced), None);
    }

    #[test]
    fn unbracketed_composite_fails() {
        assert!(execute(&args("set<int>", "x"), false).is_err());
    }
}
