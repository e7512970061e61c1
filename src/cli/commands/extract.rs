use std::{
    env, fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use rayon::prelude::*;

use super::super::{args::ExtractCommand, exit_status::ExitStatus};
use super::{CommandResult, CommandSummary, ExtractSummary, OutputTarget};
use crate::catalog::{Catalog, PotHeader};
use crate::config::{CONFIG_FILE_NAME, Config, load_config};
use crate::files::{logical_path, scan_files};
use crate::scan::{ExtractorConfig, FileExtraction, extract_file};

/// Apply command line options on top of the config file.
fn apply_overrides(config: &mut Config, cmd: &ExtractCommand) {
    config.keywords.extend(cmd.keywords.iter().cloned());
    if cmd.no_default_keywords {
        config.default_keywords = false;
    }
    config.extract_all |= cmd.extract_all;
    config.flags.extend(cmd.flags.iter().cloned());
    if cmd.add_comments.is_some() {
        config.add_comments = cmd.add_comments.clone();
    }
    if let Some(output) = &cmd.output {
        config.output = output.clone();
    }
}

fn extract_files(
    base_dir: &Path,
    files: &[PathBuf],
    config: &ExtractorConfig,
) -> Result<Vec<FileExtraction>> {
    files
        .par_iter()
        .map(|path| -> Result<FileExtraction> {
            let mut extraction = FileExtraction::default();
            extract_file(path, &logical_path(base_dir, path), config, &mut extraction)?;
            Ok(extraction)
        })
        .collect()
}

fn write_catalog<W: Write>(
    writer: &mut W,
    catalog: &Catalog,
    config: &Config,
    json: bool,
) -> Result<()> {
    if json {
        let json = catalog.to_json().context("Failed to serialize catalog")?;
        writeln!(writer, "{}", json)?;
    } else {
        let header = PotHeader {
            package_name: config.package_name.clone(),
        };
        catalog.write_pot(writer, &header)?;
    }
    Ok(())
}

pub fn extract(cmd: ExtractCommand) -> Result<CommandResult> {
    let cwd = env::current_dir().context("Failed to get current directory")?;
    let loaded = load_config(&cwd)?;
    if cmd.verbose && loaded.from_file {
        eprintln!("Using {} in {}", CONFIG_FILE_NAME, loaded.root.display());
    }
    let mut config = loaded.config;
    apply_overrides(&mut config, &cmd);
    config.validate()?;

    // Paths on the command line are relative to where the command runs,
    // paths in the config file to the file itself.
    let (base_dir, includes) = if cmd.paths.is_empty() {
        (loaded.root, config.includes.clone())
    } else {
        let includes = cmd
            .paths
            .iter()
            .map(|p| p.to_string_lossy().into_owned())
            .collect();
        (cwd, includes)
    };

    let scan = scan_files(&base_dir, &includes, &config.ignores, cmd.verbose);
    let files: Vec<PathBuf> = scan.files.into_iter().collect();
    if cmd.verbose {
        for file in &files {
            eprintln!("Scanning {}", logical_path(&base_dir, file));
        }
    }

    let extractor_config = config.extractor_config()?;
    let extractions = extract_files(&base_dir, &files, &extractor_config)?;

    let mut catalog = Catalog::new(config.add_comments.clone());
    for extraction in extractions {
        catalog.merge(extraction);
    }

    let output = if config.output == "-" {
        write_catalog(&mut io::stdout().lock(), &catalog, &config, cmd.json)?;
        OutputTarget::Stdout
    } else {
        let path = base_dir.join(&config.output);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }
        let mut buffer = Vec::new();
        write_catalog(&mut buffer, &catalog, &config, cmd.json)?;
        fs::write(&path, buffer)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        OutputTarget::File(PathBuf::from(&config.output))
    };

    Ok(CommandResult {
        summary: CommandSummary::Extract(ExtractSummary {
            files_scanned: files.len(),
            skipped_count: scan.skipped_count,
            message_count: catalog.messages().iter().filter(|m| !m.is_header()).count(),
            output,
            warnings: catalog.warnings().to_vec(),
        }),
        status: ExitStatus::Success,
    })
}
