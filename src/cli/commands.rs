//! Command dispatch: load datasets, run the index, print results

use std::io;
use std::path::Path;

use clap::CommandFactory;
use clap_complete::generate;
use tracing::{debug, instrument};

use crate::application::{LoadReport, TreeIndex};
use crate::cli::args::{Cli, Commands, ConfigCommands};
use crate::cli::error::{CliError, CliResult};
use crate::cli::{output, render};
use crate::config::{global_config_path, local_config_path, Settings};
use crate::domain::{self, to_flat, SearchField};
use crate::infrastructure::dataset::{forest_to_json, read_dataset, to_json, write_json};

pub fn execute_command(cli: &Cli) -> CliResult<()> {
    let settings = Settings::load()?;
    debug!(?settings, "settings loaded");

    match &cli.command {
        Some(Commands::Tree { file, json }) => cmd_tree(&settings, file.as_deref(), *json),
        Some(Commands::Search {
            query,
            file,
            fields,
            json,
        }) => cmd_search(&settings, query, file.as_deref(), fields.as_deref(), *json),
        Some(Commands::Flatten { file }) => cmd_flatten(&settings, file.as_deref()),
        Some(Commands::Check { file }) => cmd_check(&settings, file.as_deref()),
        Some(Commands::Generate {
            count,
            children,
            output,
        }) => cmd_generate(*count, *children, output.as_deref()),
        Some(Commands::Config { command }) => cmd_config(&settings, command),
        Some(Commands::Completion { shell }) => {
            let mut cmd = Cli::command();
            let name = cmd.get_name().to_string();
            generate(*shell, &mut cmd, name, &mut io::stdout());
            Ok(())
        }
        None => Ok(()),
    }
}

/// Read the dataset and build an index over it.
fn load_index(
    settings: &Settings,
    file: Option<&Path>,
    fields: Option<&[SearchField]>,
) -> CliResult<(TreeIndex, LoadReport)> {
    let path = settings.dataset_path(file).ok_or_else(|| {
        CliError::InvalidArgs("no dataset file given and none configured".to_string())
    })?;
    let dataset = read_dataset(&path)?;
    debug!(format = ?dataset.format, path = %path.display(), "dataset format");

    let mut options = settings.index.clone();
    if let Some(fields) = fields {
        options.search_fields = fields.to_vec();
    }
    let mut index = TreeIndex::new(options);
    let report = index.load(dataset.records)?;
    Ok((index, report))
}

#[instrument(skip(settings))]
fn cmd_tree(settings: &Settings, file: Option<&Path>, json: bool) -> CliResult<()> {
    let (index, report) = load_index(settings, file, None)?;
    if json {
        output::info(&forest_to_json(index.tree_data())?);
    } else {
        output::header(&format!(
            "{} nodes, {} roots",
            report.nodes, report.roots
        ));
        render::print_forest(index.tree_data())?;
    }
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_search(
    settings: &Settings,
    query: &str,
    file: Option<&Path>,
    fields: Option<&[SearchField]>,
    json: bool,
) -> CliResult<()> {
    let (index, _) = load_index(settings, file, fields)?;
    let forest = index.search(query);

    if json {
        output::info(&forest_to_json(&forest)?);
        return Ok(());
    }
    if forest.is_empty() {
        output::warning(&format!("no nodes match '{query}'"));
        return Ok(());
    }
    if !query.trim().is_empty() && !index.options().search_fields.is_empty() {
        output::header(&format!(
            "{} matches, {} nodes shown",
            index.search_hits(query).len(),
            domain::forest_iter(&forest).count()
        ));
    }
    render::print_forest(&forest)
}

#[instrument(skip(settings))]
fn cmd_flatten(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let (index, report) = load_index(settings, file, Some(&[]))?;
    for anomaly in &report.anomalies {
        output::warning(anomaly);
    }
    output::info(&to_json(&to_flat(index.tree_data()))?);
    Ok(())
}

#[instrument(skip(settings))]
fn cmd_check(settings: &Settings, file: Option<&Path>) -> CliResult<()> {
    let (_, report) = load_index(settings, file, Some(&[]))?;
    if report.is_clean() {
        output::success(&format!(
            "{} records, {} nodes, {} roots, no anomalies",
            report.records, report.nodes, report.roots
        ));
        return Ok(());
    }
    output::header(&format!("{} anomalies", report.anomalies.len()));
    for anomaly in &report.anomalies {
        output::failure(anomaly);
    }
    Err(CliError::Anomalies(report.anomalies.len()))
}

#[instrument]
fn cmd_generate(count: usize, children: usize, output: Option<&Path>) -> CliResult<()> {
    let records = domain::generate(count, children);
    match output {
        Some(path) => {
            write_json(path, &records)?;
            output::action(
                "Generated",
                &format!("{} nodes -> {}", records.len(), path.display()),
            );
        }
        None => output::info(&to_json(&records)?),
    }
    Ok(())
}

fn cmd_config(settings: &Settings, command: &ConfigCommands) -> CliResult<()> {
    match command {
        ConfigCommands::Show => output::info(&settings.to_toml()?),
        ConfigCommands::Template => output::info(&Settings::template()),
        ConfigCommands::Path => {
            match global_config_path() {
                Some(path) => output::action("Global", &path.display()),
                None => output::warning("no global config directory on this platform"),
            }
            match std::env::current_dir() {
                Ok(dir) => output::action("Local", &local_config_path(&dir).display()),
                Err(e) => output::warning(&format!("cannot determine current directory: {e}")),
            }
        }
    }
    Ok(())
}
