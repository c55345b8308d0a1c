use clap::Parser;
use std::path::PathBuf;

/// CLI arguments for the bridgegen binary.
#[derive(Parser, Debug)]
#[command(
    name = "bridgegen",
    version,
    about = "Generate late-bound bridge methods for generic methods with runtime-resolved type parameters"
)]
pub struct CliArgs {
    /// Symbol graph documents (JSON) describing the host program.
    #[arg(required = true, value_name = "GRAPH")]
    pub inputs: Vec<PathBuf>,

    /// Directory for generated sources (defaults to the current directory).
    #[arg(short = 'o', long = "out-dir")]
    pub out_dir: Option<PathBuf>,

    /// Path to bridgegen.json or a directory containing it.
    #[arg(short = 'p', long = "config")]
    pub config: Option<PathBuf>,

    /// Print generated sources to stdout instead of writing files.
    #[arg(long)]
    pub stdout: bool,

    /// Print one line per planned bridge instead of generating sources.
    #[arg(long = "list-plans")]
    pub list_plans: bool,

    /// Enable color and formatting in diagnostics.
    #[arg(long, overrides_with = "no_pretty")]
    pub pretty: bool,

    /// Disable color and formatting in diagnostics.
    #[arg(long = "no-pretty", overrides_with = "pretty")]
    pub no_pretty: bool,

    // ==================== Configuration Overrides ====================
    /// Metadata name of the type-parameter marker attribute.
    #[arg(long = "marker-attribute")]
    pub marker_attribute: Option<String>,

    /// Metadata name of the method marker attribute.
    #[arg(long = "method-marker-attribute")]
    pub method_marker_attribute: Option<String>,

    /// Spaces per indentation level in generated sources; 0 uses tabs.
    #[arg(long)]
    pub indent: Option<usize>,

    /// Do not hide bridge targets from editors and debuggers.
    #[arg(long = "no-hide-targets")]
    pub no_hide_targets: bool,

    /// Do not emit trimming attributes on wrappers.
    #[arg(long = "no-trimming-attributes")]
    pub no_trimming_attributes: bool,

    /// Do not start generated sources with `#nullable disable`.
    #[arg(long = "no-nullable-directive")]
    pub no_nullable_directive: bool,

    /// Process namespace groups one at a time.
    #[arg(long = "single-threaded")]
    pub single_threaded: bool,
}

impl CliArgs {
    /// Explicit `--pretty`/`--no-pretty`, else colors only on a terminal.
    #[must_use]
    pub const fn pretty_output(&self, is_terminal: bool) -> bool {
        if self.pretty {
            true
        } else if self.no_pretty {
            false
        } else {
            is_terminal
        }
    }
}
