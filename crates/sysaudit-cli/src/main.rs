//! sysaudit - Model Corpus Audit CLI
//!
//! The `sysaudit` command checks a generated model corpus against the
//! repository it documents.
//!
//! ## Commands
//!
//! - `validate`: Full structural validation of the model tree
//! - `coverage`: Manifest coverage check and acceptance gate
//! - `cycle`: Back-reference coverage for one generation cycle
//! - `diagrams`: Extract Mermaid diagram specifications from the corpus

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::{info, Level};

use sysaudit_core::{
    check_manifest_coverage, cycle_coverage, scan_model_tree, validate_model, AcceptanceConfig,
    CoverageResult, CycleKey, Manifest, ManifestCoverageResult, ModelLayout, SyntaxValidatorConfig,
    ValidationResult, ValidatorOptions,
};
use sysaudit_diagram::{extract_diagrams, Diagram, DiagramKind};

#[derive(Parser)]
#[command(name = "sysaudit")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Audit toolkit for generated model corpora", long_about = None)]
struct Cli {
    /// Repository root containing the model directory
    #[arg(short, long, global = true, default_value = ".")]
    repo: PathBuf,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Emit results (and log lines) as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the full structural validation pass over the model tree
    Validate {
        /// Skip the external grammar validator subprocess
        #[arg(long)]
        no_syntax: bool,

        /// Grammar validator binary to delegate syntax checking to
        #[arg(long)]
        validator_bin: Option<String>,
    },

    /// Check how much of the repository the manifest's patterns cover
    Coverage {
        /// Minimum coverage percentage for the manifest to be accepted
        #[arg(long, default_value = "95")]
        min_coverage: u32,
    },

    /// Show back-reference coverage for one generation cycle
    Cycle {
        /// Cycle to evaluate ("cycle3" or plain "3")
        cycle: String,
    },

    /// Extract Mermaid diagram specifications from the corpus
    Diagrams {
        /// Write one .mmd file per diagram into this directory
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    sysaudit_core::init_tracing(cli.json, level);

    let layout = ModelLayout::default();

    let passed = match cli.command {
        Commands::Validate {
            no_syntax,
            validator_bin,
        } => cmd_validate(&cli.repo, &layout, no_syntax, validator_bin, cli.json)?,
        Commands::Coverage { min_coverage } => {
            cmd_coverage(&cli.repo, &layout, min_coverage, cli.json)?
        }
        Commands::Cycle { cycle } => cmd_cycle(&cli.repo, &layout, &cycle, cli.json)?,
        Commands::Diagrams { out } => cmd_diagrams(&cli.repo, &layout, out.as_deref(), cli.json)?,
    };

    if !passed {
        std::process::exit(1);
    }
    Ok(())
}

/// Run the structural validator and render its result.
fn cmd_validate(
    repo: &Path,
    layout: &ModelLayout,
    no_syntax: bool,
    validator_bin: Option<String>,
    json: bool,
) -> Result<bool> {
    let syntax = if no_syntax {
        None
    } else {
        let mut config = SyntaxValidatorConfig::default();
        if let Some(bin) = validator_bin {
            config.binary_path = bin;
        }
        Some(config)
    };
    let options = ValidatorOptions {
        layout: layout.clone(),
        syntax,
    };

    info!(repo = %repo.display(), "running structural validation");
    let result = validate_model(repo, &options);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_validation_text(&result));
    }

    Ok(result.is_clean())
}

/// Run the manifest acceptance gate and render its result.
fn cmd_coverage(repo: &Path, layout: &ModelLayout, min_coverage: u32, json: bool) -> Result<bool> {
    let manifest_path = layout.manifest_path(repo);
    let manifest = Manifest::load(&manifest_path)
        .with_context(|| format!("Failed to load manifest: {:?}", manifest_path))?;

    let config = AcceptanceConfig {
        min_coverage_percent: min_coverage,
    };
    let result = check_manifest_coverage(repo, layout, &manifest, config);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_manifest_coverage_text(&result, min_coverage));
    }

    Ok(result.accepted)
}

/// Evaluate back-reference coverage for one cycle and render its result.
fn cmd_cycle(repo: &Path, layout: &ModelLayout, raw_key: &str, json: bool) -> Result<bool> {
    let key = CycleKey::parse(raw_key)
        .with_context(|| format!("Invalid cycle reference: '{}'", raw_key))?;

    let manifest = Manifest::load(&layout.manifest_path(repo)).ok();
    let corpus = scan_model_tree(&layout.model_root(repo));
    let result = cycle_coverage(repo, layout, manifest.as_ref(), key, &corpus);

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", render_cycle_coverage_text(key, &result));
    }

    Ok(result.missing_files.is_empty())
}

/// Extract diagrams and print them or write one .mmd file per diagram.
fn cmd_diagrams(repo: &Path, layout: &ModelLayout, out: Option<&Path>, json: bool) -> Result<bool> {
    let corpus = scan_model_tree(&layout.model_root(repo));
    let diagrams = extract_diagrams(&corpus);

    if let Some(dir) = out {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("Failed to create output directory: {:?}", dir))?;
        for (i, diagram) in diagrams.iter().enumerate() {
            let path = dir.join(diagram_file_name(i, diagram));
            std::fs::write(&path, &diagram.body)
                .with_context(|| format!("Failed to write diagram: {:?}", path))?;
            println!("Wrote {:?}", path);
        }
        println!("{} diagram(s) extracted", diagrams.len());
        return Ok(true);
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&diagrams)?);
    } else {
        for diagram in &diagrams {
            println!("--- {} ({}) ---", diagram.title, kind_slug(diagram.kind));
            println!("{}", diagram.body);
            println!();
        }
        println!("{} diagram(s) extracted", diagrams.len());
    }

    Ok(true)
}

fn kind_slug(kind: DiagramKind) -> &'static str {
    match kind {
        DiagramKind::Entity => "entity",
        DiagramKind::State => "state",
        DiagramKind::Flow => "flow",
        DiagramKind::Architecture => "architecture",
    }
}

/// File name for a written diagram: index, pass, then the sanitized title.
fn diagram_file_name(index: usize, diagram: &Diagram) -> String {
    let slug: String = diagram
        .title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() {
                c.to_ascii_lowercase()
            } else {
                '_'
            }
        })
        .collect();
    format!("{:02}_{}_{}.mmd", index, kind_slug(diagram.kind), slug)
}

fn render_validation_text(result: &ValidationResult) -> String {
    let mut out = String::new();
    out.push_str("Model Validation\n");
    out.push_str("================\n");

    if !result.manifest_errors.is_empty() {
        out.push_str("\nManifest errors:\n");
        for err in &result.manifest_errors {
            out.push_str(&format!("  - {}\n", err));
        }
    }
    if !result.missing_outputs.is_empty() {
        out.push_str("\nMissing expected outputs:\n");
        for path in &result.missing_outputs {
            out.push_str(&format!("  - {}\n", path));
        }
    }
    if !result.orphaned_files.is_empty() {
        out.push_str("\nOrphaned corpus files:\n");
        for path in &result.orphaned_files {
            out.push_str(&format!("  - {}\n", path));
        }
    }
    if !result.coverage_issues.is_empty() {
        out.push_str("\nManifest targets out of sync with the repository:\n");
        for issue in &result.coverage_issues {
            out.push_str(&format!(
                "  - {}\n",
                serde_json::to_string(issue).unwrap_or_default()
            ));
        }
    }
    if !result.missing_references.is_empty() {
        out.push_str("\nUnresolved references:\n");
        for missing in &result.missing_references {
            out.push_str(&format!(
                "  - {} in {} ({:?})\n",
                missing.symbol, missing.file, missing.kind
            ));
        }
    }
    if !result.index_mismatches.is_empty() {
        out.push_str("\nMaster index mismatches:\n");
        for mismatch in &result.index_mismatches {
            out.push_str(&format!(
                "  - {}\n",
                serde_json::to_string(mismatch).unwrap_or_default()
            ));
        }
    }
    if !result.syntax_diagnostics.is_empty() {
        out.push_str("\nSyntax diagnostics:\n");
        for diag in &result.syntax_diagnostics {
            let location = match (&diag.file, diag.line) {
                (Some(file), Some(line)) => format!("{}:{}", file, line),
                (Some(file), None) => file.clone(),
                _ => "<corpus>".to_string(),
            };
            out.push_str(&format!(
                "  [{:?}] {} ({})\n",
                diag.severity, diag.message, location
            ));
        }
    }
    if !result.cycle_coverage.is_empty() {
        out.push_str("\nCycle coverage:\n");
        for entry in &result.cycle_coverage {
            out.push_str(&format!(
                "  {}: {}% ({}/{} covered)\n",
                entry.cycle,
                entry.result.coverage_percent,
                entry.result.covered_files.len(),
                entry.result.expected_files.len()
            ));
        }
    }

    let total = result.total_issues();
    if total == 0 {
        out.push_str("\nNo issues found.");
    } else {
        out.push_str(&format!("\n{} issue(s) found.", total));
    }
    out
}

fn render_manifest_coverage_text(result: &ManifestCoverageResult, threshold: u32) -> String {
    let mut out = String::new();
    out.push_str("Manifest Coverage\n");
    out.push_str("=================\n");
    out.push_str(&format!("discovered: {}\n", result.discovered_files.len()));
    out.push_str(&format!(
        "not covered: {}\n",
        result.not_covered_files.len()
    ));
    out.push_str(&format!(
        "coverage: {}% (threshold {}%)\n",
        result.coverage_percent, threshold
    ));

    if !result.not_covered_files.is_empty() {
        out.push_str("\nNot covered:\n");
        for path in &result.not_covered_files {
            out.push_str(&format!("  - {}\n", path));
        }
    }
    if !result.suggestions.is_empty() {
        out.push_str("\nSuggested patterns:\n");
        for suggestion in &result.suggestions {
            out.push_str(&format!(
                "  {} ({} file(s))\n",
                suggestion.pattern, suggestion.file_count
            ));
        }
    }

    if result.accepted {
        out.push_str("\nManifest ACCEPTED");
    } else {
        out.push_str("\nManifest REJECTED");
    }
    out
}

fn render_cycle_coverage_text(key: CycleKey, result: &CoverageResult) -> String {
    let mut out = String::new();
    out.push_str(&format!("Coverage for {}\n", key));
    out.push_str("==================\n");
    out.push_str(&format!("expected: {}\n", result.expected_files.len()));
    out.push_str(&format!("covered:  {}\n", result.covered_files.len()));
    out.push_str(&format!("coverage: {}%\n", result.coverage_percent));

    if !result.missing_files.is_empty() {
        out.push_str("\nMissing back-references:\n");
        for path in &result.missing_files {
            out.push_str(&format!("  - {}\n", path));
        }
    }
    out.trim_end().to_string()
}
