use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Args, Debug, Clone, Default)]
pub struct ProjectConfigOpts {
    #[arg(
        long,
        help = "Path of the TOML config file (default: <PROJECT_PATH>/.repoexport.toml).",
        value_name = "CONFIG_FILE",
        conflicts_with = "no_config",
        help_heading = "Project Setup"
    )]
    pub config: Option<PathBuf>,

    #[arg(
        long,
        help = "Disable loading any TOML config file.",
        conflicts_with = "config",
        help_heading = "Project Setup"
    )]
    pub no_config: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExclusionOpts {
    #[arg(
        short = 'e',
        long = "exclusion-patterns",
        visible_alias = "exclusionPatterns",
        value_name = "FILE",
        help = "Additional exclusion pattern file merged into the exclusion set.",
        help_heading = "Exclusions"
    )]
    pub exclusion_patterns: Option<PathBuf>,

    #[arg(
        long,
        value_name = "FILE",
        help = "Ignore file consulted when the project has no .gitignore.",
        help_heading = "Exclusions"
    )]
    pub fallback_ignore: Option<PathBuf>,

    #[arg(
        long,
        help = "Do not read patterns from the project's .gitignore.",
        help_heading = "Exclusions"
    )]
    pub no_gitignore: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct OutputOpts {
    #[arg(
        short = 'p',
        long,
        value_name = "FILE",
        help = "Custom preamble text file (default: built-in preamble).",
        help_heading = "Output Control"
    )]
    pub preamble: Option<PathBuf>,

    #[arg(
        short = 'o',
        long,
        value_name = "FILE",
        help = "Output file path [default: output.txt].",
        help_heading = "Output Control"
    )]
    pub output: Option<PathBuf>,

    #[arg(
        short = 'l',
        long = "large-files",
        visible_alias = "largeFiles",
        value_name = "FILE",
        help = "Large file report path [default: large_files_output.txt].",
        help_heading = "Output Control"
    )]
    pub large_files: Option<PathBuf>,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ExportArgs {
    #[clap(flatten)]
    pub project_config: ProjectConfigOpts,
    #[clap(flatten)]
    pub exclusion: ExclusionOpts,
    #[clap(flatten)]
    pub output: OutputOpts,
}

#[derive(Parser, Debug)]
#[command(
    name = "repoexport",
    author,
    version,
    about = "Concatenate a project's text files into a single annotated export.",
    long_about = "repoexport walks a project directory and writes every text file into one \nfile, each preceded by a ---- delimiter and its relative path. Binary and media \nfiles are skipped, .gitignore / .exclusionListConfig / extra patterns are honored, \nand files over 250 lines or 2500 characters are listed in a separate report.",
    help_template = "{about-section}\nUsage: {usage}\n\n{all-args}{after-help}",
    after_help = "EXAMPLES:\n  repoexport ./my-project\n  repoexport ./my-project -o out/context.txt -e extra_patterns.txt\n  repoexport plan ./my-project -f json",
    arg_required_else_help = true,
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    #[arg(value_name = "PROJECT_PATH", help = "Project directory to export.")]
    pub project_path: Option<PathBuf>,

    #[clap(flatten)]
    pub export: ExportArgs,

    #[arg(short, long, action = clap::ArgAction::Count, global = true, help = "Increase message verbosity (-v, -vv).")]
    pub verbose: u8,

    #[arg(
        short,
        long,
        global = true,
        help = "Silence informational messages and warnings."
    )]
    pub quiet: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Commands {
    #[command(about = "Show how every file would be classified, without writing anything.")]
    Plan(PlanArgs),

    #[command(about = "Print a shell completion script.")]
    Completion(CompletionArgs),
}

#[derive(Args, Debug, Clone)]
pub struct PlanArgs {
    #[arg(value_name = "PROJECT_PATH", help = "Project directory to inspect.")]
    pub project_path: PathBuf,

    #[clap(flatten)]
    pub export: ExportArgs,

    #[arg(short = 'f', long, help = "Report format [default: table].", value_name = "FORMAT", value_parser = ["table", "json", "yaml"])]
    pub format: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct CompletionArgs {
    #[arg(
        long,
        value_name = "SHELL",
        help = "Shell to generate completions for (fish, bash, zsh) [default: fish]"
    )]
    pub shell: Option<String>,
}
