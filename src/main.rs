mod analyzer;
mod config;
mod detectors;
mod error;
mod logger;
mod testgen;

use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{error::ErrorKind, Args, Parser, Subcommand};
use tracing::{info, warn};

use crate::analyzer::{analyze_file, CodeAnalysis};
use crate::config::Config;
use crate::detectors::{detect_framework, TestFramework};
use crate::error::{Error, Result};

#[derive(Parser)]
#[command(
    name = "test-architect",
    version,
    about = "Scaffold test files for TypeScript, JavaScript and Python sources.",
    arg_required_else_help = true
)]
struct Cli {
    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: CliCommand,
}

#[derive(Subcommand)]
enum CliCommand {
    /// Analyze a source file and write a test skeleton next to it
    Generate(GenerateArgs),
}

#[derive(Args, Debug)]
struct GenerateArgs {
    /// Source file to analyze
    source: PathBuf,

    /// Test framework (detected from the project when omitted)
    #[arg(long, value_enum)]
    framework: Option<TestFramework>,

    /// Where to write the test file
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// Config file to use instead of ./.test-architect.toml
    #[arg(long)]
    config: Option<PathBuf>,

    /// Include an integration section in every function group
    #[arg(long)]
    integration: bool,

    /// Print the generated file instead of writing it
    #[arg(long)]
    dry_run: bool,

    /// Print the extracted structure as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => ExitCode::SUCCESS,
                _ => ExitCode::from(1),
            };
        }
    };

    logger::init(cli.verbose);

    let result = match cli.command {
        CliCommand::Generate(args) => generate(&args),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            ExitCode::from(1)
        }
    }
}

/* ============================================================
   generate
   ============================================================ */

fn generate(args: &GenerateArgs) -> Result<()> {
    if !args.source.is_file() {
        return Err(Error::SourceNotFound {
            path: args.source.clone(),
        });
    }

    let project_root = std::env::current_dir()
        .map_err(|e| Error::Usage(format!("cannot determine working directory: {e}")))?;

    let analysis = analyze_file(&args.source)?;
    let cfg = Config::load(&project_root, args.config.as_deref())?;

    let framework = resolve_framework(args, &cfg, &project_root, &analysis);
    if framework.family() != analysis.family() {
        warn!(
            %framework,
            language = %analysis.language,
            "framework does not match the source language"
        );
    }
    let output = args
        .output
        .clone()
        .unwrap_or_else(|| testgen::resolve_test_path(&args.source, framework));

    let mut coverage = cfg.coverage;
    if args.integration {
        coverage.integration = true;
    }

    print!("{}", report(&args.source, &analysis, framework, &output));
    if args.json {
        let json = serde_json::to_string_pretty(&analysis)
            .map_err(|e| Error::Usage(format!("cannot serialize analysis: {e}")))?;
        println!("{json}");
    }

    let rendered = testgen::render(&analysis, &args.source, framework, coverage);

    if args.dry_run {
        println!();
        print!("{rendered}");
        return Ok(());
    }

    testgen::write_test_file(&output, &rendered).map_err(|source| Error::WriteOutput {
        path: output.clone(),
        source,
    })?;
    info!(path = %output.display(), "test file written");

    print!("{}", next_steps(framework, &output));
    Ok(())
}

/// `--framework`, then config, then project detection.
fn resolve_framework(
    args: &GenerateArgs,
    cfg: &Config,
    project_root: &Path,
    analysis: &CodeAnalysis,
) -> TestFramework {
    if let Some(fw) = args.framework {
        info!(framework = %fw, "framework from command line");
        return fw;
    }
    if let Some(fw) = cfg.framework {
        info!(framework = %fw, "framework from config");
        return fw;
    }

    detect_framework(project_root, analysis.family())
}

/* ---------- stdout report ---------- */

fn report(source: &Path, analysis: &CodeAnalysis, framework: TestFramework, output: &Path) -> String {
    let mut out = String::new();
    out.push_str(&format!("Analyzing: {}\n", source.display()));
    out.push_str(&format!(
        "Language: {} ({} family)\n",
        analysis.language,
        analysis.family()
    ));
    out.push_str(&format!("Functions found: {}\n", analysis.functions.len()));
    out.push_str(&format!("Classes found: {}\n", analysis.classes.len()));
    out.push_str(&format!("Exports: {}\n", analysis.exports.join(", ")));
    out.push_str(&format!("Test framework: {framework}\n"));
    out.push_str(&format!("Output path: {}\n", output.display()));
    out
}

fn next_steps(framework: TestFramework, output: &Path) -> String {
    let run = match framework {
        TestFramework::Jest => format!("npx jest {}", output.display()),
        TestFramework::Vitest => format!("npx vitest run {}", output.display()),
        TestFramework::Pytest => format!("pytest {}", output.display()),
    };

    let mut out = format!("\nTest file generated: {}\n\n", output.display());
    out.push_str("Next steps:\n");
    out.push_str("  1. Replace the TODO comments with real inputs and assertions\n");
    out.push_str("  2. Delete the cases that do not apply\n");
    out.push_str(&format!("  3. Run: {run}\n"));
    out
}
