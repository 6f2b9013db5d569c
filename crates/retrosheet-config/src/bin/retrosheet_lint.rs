use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use retrosheet_config::{Declaration, DeclarationIssue, schema_json};
use serde::Serialize;

#[derive(Parser, Debug)]
#[command(
    name = "retrosheet-lint",
    about = "Validate Retrosheet declaration files (YAML or JSON)"
)]
struct Cli {
    /// Declaration files to check. `.json` files are read as JSON, anything else as YAML.
    #[arg(required_unless_present = "print_schema")]
    files: Vec<PathBuf>,

    /// Emit a machine-readable JSON report instead of text.
    #[arg(long)]
    json: bool,

    /// Print the declaration JSON Schema and exit.
    #[arg(long)]
    print_schema: bool,
}

#[derive(Serialize, Debug)]
struct FileReport {
    file: String,
    ok: bool,
    issues: Vec<DeclarationIssue>,
}

fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    if cli.print_schema {
        println!("{}", schema_json());
        return Ok(ExitCode::SUCCESS);
    }

    let mut reports = Vec::with_capacity(cli.files.len());
    for path in &cli.files {
        reports.push(lint_file(path)?);
    }

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&reports)?);
    } else {
        for report in &reports {
            if report.ok {
                println!("ok: {}", report.file);
            }
            for issue in &report.issues {
                println!("{}: {}", report.file, issue);
            }
        }
    }

    if reports.iter().all(|report| report.ok) {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}

fn lint_file(path: &Path) -> Result<FileReport> {
    let text =
        fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))?;
    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    let parsed = if is_json {
        Declaration::from_json_str(&text).map_err(|err| err.to_string())
    } else {
        Declaration::from_yaml_str(&text).map_err(|err| err.to_string())
    };

    let issues = match parsed {
        Ok(declaration) => match declaration.validate() {
            Ok(()) => Vec::new(),
            Err(err) => err.into_issues(),
        },
        Err(message) => vec![DeclarationIssue::new("$", format!("parse error: {message}"))],
    };

    Ok(FileReport {
        file: path.display().to_string(),
        ok: issues.is_empty(),
        issues,
    })
}
