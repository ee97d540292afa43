use clap::Parser;
use miette::{Diagnostic, IntoDiagnostic, NamedSource, Result, SourceSpan, WrapErr};
use sprig::{EvaluatorOptions, ParseNode, builder, evaluator};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

/// Sprig - a tiny integer scripting language
#[derive(Parser, Debug)]
#[command(name = "sprig")]
#[command(about = "Run Sprig programs", long_about = None)]
struct Args {
    /// Program source to run (`-` or omitted reads from stdin)
    #[arg(conflicts_with = "parse_tree")]
    file: Option<PathBuf>,

    /// Run a JSON parse-tree dump instead of source text
    #[arg(long, value_name = "FILE")]
    parse_tree: Option<PathBuf>,

    /// Write the parse tree as pretty JSON before running
    #[arg(long, value_name = "FILE")]
    dump_parse_tree: Option<PathBuf>,

    /// Print the lowered AST (for debugging)
    #[arg(long)]
    debug_ast: bool,

    /// Maximum evaluation depth
    #[arg(long, value_name = "N")]
    max_depth: Option<usize>,
}

/// A syntax error rendered against its source.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(sprig::syntax))]
struct SourceError {
    message: String,
    #[source_code]
    src: NamedSource<String>,
    #[label("here")]
    span: SourceSpan,
}

impl SourceError {
    fn new(name: &str, source: String, err: &sprig::SyntaxError) -> Self {
        let (start, end) = err.span();
        Self {
            message: err.message(),
            src: NamedSource::new(name, source),
            span: (start, end - start).into(),
        }
    }
}

fn read_input(path: Option<&Path>) -> Result<(String, String)> {
    match path {
        Some(path) if path != Path::new("-") => {
            let source = std::fs::read_to_string(path)
                .into_diagnostic()
                .wrap_err_with(|| format!("cannot read {}", path.display()))?;
            Ok((path.display().to_string(), source))
        }
        _ => {
            let mut source = String::new();
            std::io::stdin()
                .read_to_string(&mut source)
                .into_diagnostic()
                .wrap_err("cannot read stdin")?;
            Ok(("<stdin>".to_string(), source))
        }
    }
}

/// Load the program as one parse-tree document.
fn load_program(args: &Args) -> Result<ParseNode> {
    if let Some(path) = &args.parse_tree {
        let (name, json) = read_input(Some(path))?;
        return serde_json::from_str(&json)
            .into_diagnostic()
            .wrap_err_with(|| format!("{name} is not a valid parse tree"));
    }

    let (name, source) = read_input(args.file.as_deref())?;
    debug!(name = name.as_str(), bytes = source.len(), "parsing source");
    match sprig::parse(&source) {
        Ok(statements) => Ok(ParseNode::Seq(statements)),
        Err(err) => Err(SourceError::new(&name, source, &err).into()),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    // Initialize logging subscriber
    use tracing_subscriber::{EnvFilter, fmt};

    // Use the RUST_LOG environment variable to control log level
    // Default to WARN if not set
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let tree = load_program(&args)?;

    if let Some(path) = &args.dump_parse_tree {
        let json = serde_json::to_string_pretty(&tree).into_diagnostic()?;
        std::fs::write(path, json + "\n")
            .into_diagnostic()
            .wrap_err_with(|| format!("cannot write {}", path.display()))?;
    }

    let lowered = builder::lower_tree(&tree);

    if args.debug_ast {
        println!("=== Lowered AST ===");
        print!("{}", lowered.ast);
        println!();
    }

    let mut options = EvaluatorOptions::default();
    if let Some(max_depth) = args.max_depth {
        options.max_depth = max_depth;
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let result = evaluator::run_with_options(options, &lowered.ast, &mut out);
    out.flush().into_diagnostic()?;
    let env = result.into_diagnostic()?;

    for (name, value) in env.globals() {
        debug!(name, value, "final binding");
    }
    Ok(())
}
