use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "docstack")]
#[command(author = "Alberto Cavalcante")]
#[command(version)]
#[command(about = "CLI for the document intelligence stack", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Verbosity level
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-essential output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to a config file (defaults to ./docstack.toml)
    #[arg(short, long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Reconcile leftover cloud state and deploy the template
    Deploy(DeployArgs),

    /// Show resource group and deployment state
    Status,

    /// Print declared outputs of the last deployment
    Outputs {
        /// Print raw JSON instead of key-value lines
        #[arg(long)]
        json: bool,
    },

    /// Purge soft-deleted accounts that block name reuse
    Purge(PurgeArgs),

    /// Extract text from a document and build a store record
    Process(ProcessArgs),

    /// Count people in an image via Content Understanding
    People(PeopleArgs),

    /// Manage extraction schemas
    #[command(subcommand)]
    Schemas(SchemasCommand),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

// ============================================================================
// Deploy
// ============================================================================

#[derive(Parser)]
pub struct DeployArgs {
    /// Dry run - report what would be done without touching the provider
    #[arg(short, long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,

    /// Leave existing resources in place when a prior deployment is found
    #[arg(long)]
    pub keep_resources: bool,
}

// ============================================================================
// Purge
// ============================================================================

#[derive(Parser)]
pub struct PurgeArgs {
    /// List matching accounts without purging them
    #[arg(short, long)]
    pub dry_run: bool,

    /// Skip the confirmation prompt
    #[arg(short, long)]
    pub yes: bool,
}

// ============================================================================
// Process
// ============================================================================

#[derive(Parser)]
pub struct ProcessArgs {
    /// File to extract text from
    pub file: PathBuf,

    /// Write the record JSON to a file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

// ============================================================================
// People
// ============================================================================

#[derive(Parser)]
pub struct PeopleArgs {
    /// Publicly reachable image URL
    pub url: String,

    /// Content Understanding endpoint (overrides config)
    #[arg(short, long, env = "CONTENT_UNDERSTANDING_ENDPOINT")]
    pub endpoint: Option<String>,

    /// Write the raw analysis result to a JSON file
    #[arg(short, long, value_name = "PATH")]
    pub save: Option<PathBuf>,
}

// ============================================================================
// Schemas
// ============================================================================

#[derive(Subcommand)]
pub enum SchemasCommand {
    /// List schema files in the schemas directory
    List,

    /// Validate a schema file's shape
    Validate {
        /// Schema name
        #[arg(default_value = "document_schema")]
        name: String,

        /// Schema version
        #[arg(default_value = "v1")]
        version: String,
    },
}
