use std::fs;
use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use pyaudit::cli::Cli;
use pyaudit::io::output::{create_writer, FileReport};
use pyaudit::{parse_module, Analysis, Analyzer};

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbosity);

    match run(&cli) {
        Ok(code) => code,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: &Cli) -> Result<ExitCode> {
    let analyzer = Analyzer::with_rules(cli.rule_set());
    let mut results: Vec<(std::path::PathBuf, Analysis)> = Vec::new();
    let mut failed = false;

    for path in &cli.files {
        let source = match fs::read_to_string(path) {
            Ok(source) => source,
            Err(err) => {
                eprintln!("error: failed to read {}: {err}", path.display());
                failed = true;
                continue;
            }
        };
        let parsed = match parse_module(&source, path) {
            Ok(parsed) => parsed,
            Err(err) => {
                eprintln!("error: {err}");
                failed = true;
                continue;
            }
        };
        let analysis = analyzer.analyze_parsed(&parsed);
        info!(
            "{}: {} diagnostic(s)",
            path.display(),
            analysis.diagnostics.len()
        );
        for fault in &analysis.faults {
            eprintln!("warning: rule {} failed: {}", fault.rule, fault.message);
        }
        results.push((path.clone(), analysis));
    }

    let reports: Vec<FileReport> = results
        .iter()
        .map(|(path, analysis)| FileReport { path, analysis })
        .collect();

    let sink: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            fs::File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(std::io::stdout()),
    };
    create_writer(cli.format, sink).write_reports(&reports)?;

    let total: usize = results
        .iter()
        .map(|(_, analysis)| analysis.diagnostics.len())
        .sum();
    Ok(if failed {
        ExitCode::from(2)
    } else if total > 0 {
        ExitCode::from(1)
    } else {
        ExitCode::SUCCESS
    })
}

fn init_logging(verbosity: u8) {
    let default_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}
