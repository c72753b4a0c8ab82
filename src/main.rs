//! CLI entry point for `rules2sql`.

use std::io::Read;
use std::path::PathBuf;
use std::process;

use clap::Parser;
use rules2sql::output::{formatter, Rendered};
use rules2sql::parser::json_rules::{self, ParseLimits};
use rules2sql::render::{ConditionPolicy, Placeholder, RenderConfig, ValidatorRegistry};

const ENV_LOG: &str = "RULES2SQL_LOG";

#[derive(Parser)]
#[command(
    name = "rules2sql",
    about = "Translate query-builder rule trees into SQL WHERE fragments"
)]
struct Cli {
    /// Input JSON rule file (reads stdin when omitted or `-`)
    input: Option<PathBuf>,

    /// JSON file of per-field validators
    #[arg(long)]
    validators: Option<PathBuf>,

    /// Emit placeholders and a parameter list instead of literal values
    #[arg(long)]
    parameterized: bool,

    /// Placeholder style for --parameterized: question or dollar
    #[arg(long, default_value = "question")]
    placeholder: Placeholder,

    /// Join groups with an unknown condition using no separator instead of failing
    #[arg(long)]
    legacy_conditions: bool,

    /// Maximum rule tree depth
    #[arg(long, default_value_t = json_rules::MAX_TREE_DEPTH)]
    max_depth: usize,

    /// Write `<name>.sql` (and `<name>_params.json`) here instead of stdout
    #[arg(long)]
    output_dir: Option<PathBuf>,

    /// Base name for output files (defaults to the input file stem)
    #[arg(long)]
    name: Option<String>,

    /// Print verbose diagnostics
    #[arg(long)]
    verbose: bool,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    // Read input
    let json = match read_input(cli.input.as_ref()) {
        Ok(json) => json,
        Err(e) => {
            eprintln!("Error reading input: {e}");
            process::exit(2);
        }
    };

    // Decode
    let limits = ParseLimits {
        max_depth: cli.max_depth,
        ..ParseLimits::default()
    };
    let tree = match json_rules::parse_rules(&json, &limits) {
        Ok(tree) => tree,
        Err(e) => {
            eprintln!("Rule parse error: {e}");
            process::exit(2);
        }
    };

    // Build render configuration
    let mut validators = ValidatorRegistry::new();
    if let Some(path) = &cli.validators {
        match std::fs::read_to_string(path) {
            Ok(content) => {
                if let Err(e) = validators.load_from_json(&content) {
                    eprintln!("{e}");
                    process::exit(2);
                }
            }
            Err(e) => {
                eprintln!("Error reading validators {}: {e}", path.display());
                process::exit(2);
            }
        }
    }
    tracing::debug!(fields = validators.len(), "validators loaded");

    let policy = if cli.legacy_conditions {
        ConditionPolicy::Legacy
    } else {
        ConditionPolicy::Strict
    };
    let config = RenderConfig::new()
        .with_validators(validators)
        .with_condition_policy(policy);

    // Render
    let result = if cli.parameterized {
        tree.to_parameterized_sql(&config, cli.placeholder)
            .map(Rendered::Parameterized)
    } else {
        tree.to_sql(&config).map(Rendered::Literal)
    };
    let rendered = match result {
        Ok(rendered) => rendered,
        Err(e) => {
            eprintln!("Render error: {e}");
            process::exit(2);
        }
    };

    // Write output
    let Some(output_dir) = &cli.output_dir else {
        print_rendered(&rendered);
        return;
    };

    let name = cli.name.as_deref().unwrap_or_else(|| {
        cli.input
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .filter(|s| *s != "-")
            .unwrap_or("rules")
    });

    match formatter::write_output(output_dir, name, &rendered) {
        Ok(paths) => {
            for path in paths {
                tracing::info!(path = %path.display(), "wrote output");
            }
        }
        Err(e) => {
            eprintln!("Error writing output: {e}");
            process::exit(2);
        }
    }
}

fn init_tracing(verbose: bool) {
    let default_filter = if verbose { "debug" } else { "warn" };
    let filter = std::env::var(ENV_LOG)
        .or_else(|_| std::env::var("RUST_LOG"))
        .unwrap_or_else(|_| default_filter.to_string());

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_level(true)
        .compact()
        .with_env_filter(filter)
        .init();
}

fn read_input(path: Option<&PathBuf>) -> std::io::Result<String> {
    match path {
        Some(path) if path.as_os_str() != "-" => std::fs::read_to_string(path),
        _ => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            Ok(buf)
        }
    }
}

fn print_rendered(rendered: &Rendered) {
    match rendered {
        Rendered::Literal(sql) => println!("{sql}"),
        Rendered::Parameterized(out) => {
            println!("{}", out.sql);
            match serde_json::to_string(&out.params) {
                Ok(params) => println!("{params}"),
                Err(e) => {
                    eprintln!("Error encoding parameters: {e}");
                    process::exit(2);
                }
            }
        }
    }
}
