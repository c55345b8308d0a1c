use anyhow::{Context, Result};
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info_span};

use super::args::CliArgs;
use super::config::resolve_config;
use crate::pipeline::{GenerationResult, generate};
use bridgegen_emitter::Artifact;
use bridgegen_emitter::doc_id::method_doc_id;
use bridgegen_symbols::{GraphDocument, SymbolGraph, load_documents};

/// Outcome of one CLI run.
#[derive(Debug)]
pub struct RunResult {
    pub generation: GenerationResult,
    /// Files written, in artifact order. Empty for `--stdout` and `--list-plans`.
    pub written: Vec<PathBuf>,
    /// `--list-plans` output, one line per plan.
    pub plan_lines: Vec<String>,
}

impl RunResult {
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.generation.has_errors()
    }
}

pub fn run(args: &CliArgs, cwd: &Path) -> Result<RunResult> {
    let _span = info_span!("run", inputs = args.inputs.len()).entered();

    let config = resolve_config(args, cwd)?;
    let options = config.generator_options();

    let documents = read_documents(&args.inputs, cwd)?;
    let graph = load_documents(&documents).context("failed to load symbol graph")?;
    let generation = generate(&graph, &options);

    if args.list_plans {
        let plan_lines = plan_lines(&graph, &generation);
        return Ok(RunResult {
            generation,
            written: Vec::new(),
            plan_lines,
        });
    }

    let written = if args.stdout {
        Vec::new()
    } else {
        let out_dir = match &args.out_dir {
            Some(dir) if dir.is_absolute() => dir.clone(),
            Some(dir) => cwd.join(dir),
            None => cwd.to_path_buf(),
        };
        let artifacts: Vec<&Artifact> = generation.artifacts().collect();
        write_outputs(&out_dir, &artifacts)?
    };

    Ok(RunResult {
        generation,
        written,
        plan_lines: Vec::new(),
    })
}

fn read_documents(inputs: &[PathBuf], cwd: &Path) -> Result<Vec<GraphDocument>> {
    inputs
        .iter()
        .map(|input| {
            let path = if input.is_absolute() {
                input.clone()
            } else {
                cwd.join(input)
            };
            let text = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            let document = GraphDocument::from_json(&text)
                .with_context(|| format!("failed to parse graph document {}", path.display()))?;
            debug!(path = %path.display(), types = document.types.len(), "read graph document");
            Ok(document)
        })
        .collect()
}

/// `M:Demo.Host.Get``1(Demo.IContainer) -> _Get_PrivateBridgeTarget`
fn plan_lines(graph: &SymbolGraph, generation: &GenerationResult) -> Vec<String> {
    generation
        .plans()
        .map(|plan| format!("{} -> {}", method_doc_id(graph, plan.method), plan.target_name))
        .collect()
}

fn write_outputs(out_dir: &Path, artifacts: &[&Artifact]) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .with_context(|| format!("failed to create directory {}", out_dir.display()))?;

    artifacts.par_iter().try_for_each(|artifact| -> Result<()> {
        let path = out_dir.join(&artifact.file_name);
        std::fs::write(&path, &artifact.text)
            .with_context(|| format!("failed to write {}", path.display()))?;
        Ok(())
    })?;

    Ok(artifacts
        .iter()
        .map(|artifact| out_dir.join(&artifact.file_name))
        .collect())
}
