//! CLI argument definitions.

use clap::{Parser, Subcommand};

use crate::config::{DEFAULT_SERVER_HOST, DEFAULT_SERVER_PORT};

/// Blog API server and maintenance commands
#[derive(Parser, Debug)]
#[command(name = "blog-api")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server
    Serve(ServeArgs),

    /// Run database migrations
    Migrate(MigrateArgs),

    /// Manage the email job queue
    Jobs(JobsArgs),
}

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Host to bind to
    #[arg(short = 'H', long, default_value = DEFAULT_SERVER_HOST, env = "SERVER_HOST")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_SERVER_PORT, env = "SERVER_PORT")]
    pub port: u16,
}

#[derive(Parser, Debug)]
pub struct MigrateArgs {
    #[command(subcommand)]
    pub action: MigrateAction,
}

#[derive(Subcommand, Debug)]
pub enum MigrateAction {
    /// Run pending migrations
    Up,
    /// Rollback last migration
    Down,
    /// Show migration status
    Status,
    /// Drop all tables and re-run every migration
    Fresh,
}

#[derive(Parser, Debug)]
pub struct JobsArgs {
    #[command(subcommand)]
    pub action: JobsAction,
}

#[derive(Subcommand, Debug)]
pub enum JobsAction {
    /// Start the email worker
    Work,
    /// Show queue counts by status
    List,
    /// Remove failed jobs
    Clear,
}
