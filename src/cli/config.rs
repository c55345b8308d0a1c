use anyhow::{Context, Result};
use serde::{Deserialize, Deserializer, Serialize};
use std::path::{Path, PathBuf};

use super::args::CliArgs;
use crate::pipeline::GeneratorOptions;
use bridgegen_emitter::EmitOptions;
use bridgegen_solver::SolverOptions;

pub const CONFIG_FILE_NAME: &str = "bridgegen.json";

/// Boolean options also accept the strings `"true"`/`"false"` (and the
/// usual `yes`/`no`, `on`/`off`, `1`/`0` spellings).
fn deserialize_bool_or_string<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    use serde::de::Error;

    #[derive(Deserialize)]
    #[serde(untagged)]
    enum BoolOrString {
        Bool(bool),
        String(String),
    }

    match BoolOrString::deserialize(deserializer)? {
        BoolOrString::Bool(b) => Ok(b),
        BoolOrString::String(s) => match s.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::custom(format!(
                "invalid boolean value: '{s}'. Expected true, false, 'true', or 'false'"
            ))),
        },
    }
}

/// Contents of `bridgegen.json`. Every field is optional.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct BridgegenConfig {
    pub marker_attribute: String,
    pub method_marker_attribute: String,
    pub indent: usize,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub hide_targets: bool,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub trimming_attributes: bool,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub parallel: bool,
    #[serde(deserialize_with = "deserialize_bool_or_string")]
    pub nullable_directive: bool,
}

impl Default for BridgegenConfig {
    fn default() -> Self {
        let solver = SolverOptions::default();
        let emit = EmitOptions::default();
        Self {
            marker_attribute: solver.marker_attribute,
            method_marker_attribute: solver.method_marker_attribute,
            indent: emit.indent,
            hide_targets: emit.hide_targets,
            trimming_attributes: emit.trimming_attributes,
            parallel: true,
            nullable_directive: emit.nullable_directive,
        }
    }
}

impl BridgegenConfig {
    pub fn parse(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("invalid bridgegen configuration")
    }

    /// Command-line flags win over the file.
    pub fn apply_args(&mut self, args: &CliArgs) {
        if let Some(marker) = &args.marker_attribute {
            self.marker_attribute.clone_from(marker);
        }
        if let Some(marker) = &args.method_marker_attribute {
            self.method_marker_attribute.clone_from(marker);
        }
        if let Some(indent) = args.indent {
            self.indent = indent;
        }
        if args.no_hide_targets {
            self.hide_targets = false;
        }
        if args.no_trimming_attributes {
            self.trimming_attributes = false;
        }
        if args.no_nullable_directive {
            self.nullable_directive = false;
        }
        if args.single_threaded {
            self.parallel = false;
        }
    }

    #[must_use]
    pub fn generator_options(&self) -> GeneratorOptions {
        GeneratorOptions {
            solver: SolverOptions {
                marker_attribute: self.marker_attribute.clone(),
                method_marker_attribute: self.method_marker_attribute.clone(),
            },
            emit: EmitOptions {
                indent: self.indent,
                hide_targets: self.hide_targets,
                trimming_attributes: self.trimming_attributes,
                nullable_directive: self.nullable_directive,
            },
            parallel: self.parallel,
        }
    }
}

pub fn load_config(path: &Path) -> Result<BridgegenConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    BridgegenConfig::parse(&text).with_context(|| format!("in {}", path.display()))
}

/// The config file to use: `--config` (a file, or a directory holding
/// `bridgegen.json`), else `bridgegen.json` in `cwd` if present.
pub fn find_config(explicit: Option<&Path>, cwd: &Path) -> Option<PathBuf> {
    match explicit {
        Some(path) => {
            let path = if path.is_absolute() {
                path.to_path_buf()
            } else {
                cwd.join(path)
            };
            if path.is_dir() {
                Some(path.join(CONFIG_FILE_NAME))
            } else {
                Some(path)
            }
        }
        None => {
            let candidate = cwd.join(CONFIG_FILE_NAME);
            candidate.is_file().then_some(candidate)
        }
    }
}

/// Effective configuration for a run.
pub fn resolve_config(args: &CliArgs, cwd: &Path) -> Result<BridgegenConfig> {
    let mut config = match find_config(args.config.as_deref(), cwd) {
        Some(path) => load_config(&path)?,
        None => BridgegenConfig::default(),
    };
    config.apply_args(args);
    Ok(config)
}
