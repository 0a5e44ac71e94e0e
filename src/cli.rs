use clap::Parser;
use std::path::PathBuf;

use crate::io::output::OutputFormat;
use crate::rules::RuleSet;

#[derive(Parser, Debug)]
#[command(name = "pyaudit")]
#[command(about = "Security and performance linter for Python source files", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Python source files to analyze
    #[arg(required = true)]
    pub files: Vec<PathBuf>,

    /// Run only security rules
    #[arg(short = 's', long = "security-only", conflicts_with = "optimize_only")]
    pub security_only: bool,

    /// Run only optimization rules
    #[arg(short = 'o', long = "optimize-only")]
    pub optimize_only: bool,

    /// Output format
    #[arg(short = 'f', long, value_enum, default_value = "terminal")]
    pub format: OutputFormat,

    /// Output file (defaults to stdout)
    #[arg(long)]
    pub output: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    pub verbosity: u8,
}

impl Cli {
    pub fn rule_set(&self) -> RuleSet {
        if self.security_only {
            RuleSet::security_only()
        } else if self.optimize_only {
            RuleSet::optimization_only()
        } else {
            RuleSet::all()
        }
    }
}
