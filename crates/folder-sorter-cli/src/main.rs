mod commands;
mod logging;
mod report;

use std::fs::{self, File};
use std::io::BufWriter;
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use colored::*;
use commands::{Cli, Commands, GroupArgs, InputArgs};
use dotenv::dotenv;
use folder_sorter_core::{
    aggregate, export_file_name, files_in_bucket, load_configuration, sort_by_name, write_csv,
    AppConfig, BucketClassifier, Criterion, DuplicateCache, FileRecord, OrganizationPlan,
    PreviewTree, RuleSet,
};
use tracing::{debug, error, info, warn};

fn main() {
    dotenv().ok();

    let _guard = logging::init_logger();

    let args = Cli::parse();

    let config = match load_configuration(args.config.as_deref()) {
        Ok(config) => config,
        Err(err) => {
            error!("Error loading configuration: {}", err);
            process::exit(1);
        }
    };

    let result = match args.command {
        Some(Commands::Filter { input }) => run_filter(&config, &input),
        Some(Commands::Aggregate { input, by }) => run_aggregate(&config, &input, &by),
        Some(Commands::Preview { input, group, json }) => {
            run_preview(&config, &input, &group, json)
        }
        Some(Commands::Plan { input, group, json }) => run_plan(&config, &input, &group, json),
        Some(Commands::Export {
            input,
            by,
            label,
            out,
        }) => run_export(&config, &input, &by, &label, out),
        Some(Commands::PrintConfig) => {
            println!("Configuration: {:#?}", config);
            Ok(())
        }
        None => {
            let _ = Cli::command().print_long_help();
            Ok(())
        }
    };

    if let Err(err) = result {
        error!("Error: {:#}", err);
        process::exit(1);
    }
}

/// File list after duplicate flags are applied, plus the rules to filter it.
struct Selection {
    files: Vec<FileRecord>,
    rules: RuleSet,
    duplicates_scanned: bool,
}

impl Selection {
    fn load(config: &AppConfig, input: &InputArgs) -> Result<Self> {
        let text = fs::read_to_string(&input.files)
            .with_context(|| format!("reading file list {}", input.files.display()))?;
        let mut files: Vec<FileRecord> = serde_json::from_str(&text)
            .with_context(|| format!("parsing file list {}", input.files.display()))?;

        let rules = match &input.rules {
            Some(path) => load_rules(path, config)?,
            None => RuleSet::new(config.operator),
        };
        for rule in &rules.rules {
            debug!(
                "Rule {}: {} {} '{}' ({})",
                rule.id,
                rule.property,
                rule.condition.label(),
                rule.value,
                rules.operator
            );
        }

        let mut duplicates_scanned = input.duplicates_scanned;
        if let Some(path) = &input.duplicates_cache {
            let text = fs::read_to_string(path)
                .with_context(|| format!("reading duplicate cache {}", path.display()))?;
            let cache = DuplicateCache::from_json(&text)
                .with_context(|| format!("parsing duplicate cache {}", path.display()))?;
            let applied = cache.overlay(&mut files);
            info!(
                "Duplicate cache: {} of {} cached paths found in the file list",
                applied,
                cache.len()
            );
            duplicates_scanned = true;
        }

        info!(
            "Loaded {} files and {} rule(s)",
            format!("{}", files.len()).cyan(),
            format!("{}", rules.len()).cyan(),
        );
        Ok(Self {
            files,
            rules,
            duplicates_scanned,
        })
    }

    fn filtered(&self, config: &AppConfig) -> Vec<&FileRecord> {
        config
            .evaluator(self.duplicates_scanned)
            .filter(&self.files, &self.rules)
    }

    fn classifier(&self, config: &AppConfig) -> BucketClassifier {
        BucketClassifier::new(config.classifier_options(self.duplicates_scanned))
    }
}

/// Rule files that do not name an operator fall back to the configured one.
fn load_rules(path: &Path, config: &AppConfig) -> Result<RuleSet> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("reading rules {}", path.display()))?;
    let value: serde_json::Value =
        serde_json::from_str(&text).with_context(|| format!("parsing rules {}", path.display()))?;
    let has_operator = value.get("operator").is_some();
    let mut rules: RuleSet = serde_json::from_value(value)
        .with_context(|| format!("parsing rules {}", path.display()))?;
    if !has_operator {
        rules.operator = config.operator;
    }
    Ok(rules)
}

fn run_filter(config: &AppConfig, input: &InputArgs) -> Result<()> {
    let selection = Selection::load(config, input)?;
    let kept = selection.filtered(config);
    print!("{}", report::render_files(&kept));
    info!(
        "{} of {} files match",
        format!("{}", kept.len()).green(),
        selection.files.len()
    );
    Ok(())
}

fn run_aggregate(config: &AppConfig, input: &InputArgs, by: &Criterion) -> Result<()> {
    let selection = Selection::load(config, input)?;
    let kept = selection.filtered(config);
    let ranked = sort_by_name(kept.iter().copied());
    let classifier = selection.classifier(config);
    match by {
        Criterion::FilesPerFolder => {
            info!("Ranges of {} files", classifier.options().batch_size)
        }
        Criterion::FirstNChars => {
            info!("First {} characters", classifier.options().prefix_length)
        }
        _ => {}
    }
    let buckets = aggregate(&classifier, ranked, by);
    print!("{}", report::render_buckets(&buckets));
    info!("{} bucket(s) by {}", buckets.len(), by);
    Ok(())
}

fn build_plan(config: &AppConfig, input: &InputArgs, group: &GroupArgs) -> Result<OrganizationPlan> {
    let selection = Selection::load(config, input)?;
    if group.secondary().is_some() && group.by.is_positional() {
        warn!(
            "Secondary criterion ignored: {} already decides the whole layout",
            group.by
        );
    }
    let kept = selection.filtered(config);
    Ok(OrganizationPlan::build(
        &selection.classifier(config),
        kept,
        &group.by,
        group.secondary(),
        &config.naming,
    ))
}

fn run_preview(config: &AppConfig, input: &InputArgs, group: &GroupArgs, json: bool) -> Result<()> {
    let plan = build_plan(config, input, group)?;
    let tree = PreviewTree::from_plan(&plan);
    if json {
        println!("{}", serde_json::to_string_pretty(&tree)?);
    } else if tree.is_empty() {
        warn!("No files match the current rules");
    } else {
        print!("{}", report::render_tree(&tree));
    }
    Ok(())
}

fn run_plan(config: &AppConfig, input: &InputArgs, group: &GroupArgs, json: bool) -> Result<()> {
    let plan = build_plan(config, input, group)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&plan)?);
    } else {
        print!("{}", report::render_plan(&plan));
    }
    info!("{} file(s) planned", format!("{}", plan.len()).green());
    Ok(())
}

fn run_export(
    config: &AppConfig,
    input: &InputArgs,
    by: &Criterion,
    label: &str,
    out: Option<PathBuf>,
) -> Result<()> {
    let selection = Selection::load(config, input)?;
    let kept = selection.filtered(config);
    let members = files_in_bucket(&selection.classifier(config), &kept, by, label);
    if members.is_empty() {
        warn!("Bucket '{}' is empty under {}; nothing exported", label, by);
        return Ok(());
    }

    let out = out.unwrap_or_else(|| PathBuf::from(export_file_name(label)));
    let file = File::create(&out).with_context(|| format!("creating {}", out.display()))?;
    let rows = write_csv(BufWriter::new(file), members)
        .with_context(|| format!("writing {}", out.display()))?;
    info!(
        "Exported {} file(s) to {}",
        format!("{}", rows).green(),
        out.display()
    );
    Ok(())
}
