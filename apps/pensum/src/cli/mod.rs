//! # Pensum CLI Module
//!
//! This module implements the CLI interface for Pensum.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `status` - Show board status
//! - `board` - Show the semester columns (with search)
//! - `subject` - Create, save, move, and delete subjects
//! - `axis` - Manage thematic axes (ejes)
//! - `semester` - Add and remove semester columns
//! - `program` - Show or edit program metadata
//! - `export` / `import` - Snapshot interchange files
//! - `audit` - Report dangling references
//! - `sync` - Push/pull snapshots to remote storage
//! - `init` - Initialize a new board database
//! - `reset` - Wipe the database back to the bundled dataset

mod commands;

use clap::{Parser, Subcommand};
use pensum_core::BoardError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Pensum - Curriculum Board
///
/// A planning board for academic programs: subjects arranged in semester
/// columns, linked by prerequisites and corequisites, grouped into
/// thematic axes.
#[derive(Parser, Debug)]
#[command(name = "pensum")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Path to the board database
    #[arg(short = 'D', long, global = true, default_value = "pensum.db")]
    pub database: PathBuf,

    /// Path to an optional configuration file
    #[arg(short = 'c', long, global = true)]
    pub config: Option<PathBuf>,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Show board status
    Status,

    /// Show the semester columns
    Board {
        /// Filter subjects by name or id (case-insensitive substring)
        #[arg(short, long, default_value = "")]
        search: String,

        /// Include empty semesters beyond the always-visible ones
        #[arg(long)]
        show_empty: bool,
    },

    /// Manage subjects
    #[command(subcommand)]
    Subject(SubjectCommands),

    /// Manage thematic axes (ejes)
    #[command(subcommand)]
    Axis(AxisCommands),

    /// Manage semester columns
    #[command(subcommand)]
    Semester(SemesterCommands),

    /// Show or edit program metadata
    Program {
        /// Program/career name
        #[arg(long)]
        name: Option<String>,

        /// Program version
        #[arg(long)]
        version: Option<String>,

        /// Institution name
        #[arg(long)]
        institution: Option<String>,

        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },

    /// Complete onboarding: set program metadata and mark the board started
    Start {
        /// Institution name
        #[arg(long)]
        institution: String,

        /// Program/career name
        #[arg(long)]
        name: String,

        /// Contact email
        #[arg(long)]
        email: Option<String>,
    },

    /// Show or set the display theme
    Theme {
        /// New theme (light or dark); omit to show the current one
        value: Option<String>,
    },

    /// Export the board to a snapshot file
    Export {
        /// Output file path (defaults to pensum_data_<date>.json)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Import a snapshot file, replacing the whole board
    Import {
        /// Input file path
        #[arg(short, long)]
        input: PathBuf,
    },

    /// Report dangling requisites and unresolved axes
    Audit,

    /// Push/pull snapshots to remote storage
    #[command(subcommand)]
    Sync(SyncCommands),

    /// Initialize a new board database
    Init {
        /// Force initialization even if the database exists
        #[arg(short, long)]
        force: bool,
    },

    /// Wipe the database back to the bundled dataset
    Reset {
        /// Confirm the wipe
        #[arg(long)]
        yes: bool,
    },
}

/// Subject subcommands.
#[derive(Subcommand, Debug)]
pub enum SubjectCommands {
    /// Print a staged draft for the given semester (edit it, then `save`)
    New {
        /// Target semester
        #[arg(short, long, default_value = "1")]
        semester: u32,
    },

    /// Save a subject from a JSON file (create, or replace with --original-id)
    Save {
        /// Path to the subject JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Id of the stored subject being replaced (enables id renames)
        #[arg(long)]
        original_id: Option<String>,
    },

    /// Delete a subject by id
    Rm {
        /// Subject id
        id: String,
    },

    /// Move a subject to another semester
    Move {
        /// Subject id
        id: String,

        /// Target semester
        semester: u32,
    },
}

/// Axis subcommands.
#[derive(Subcommand, Debug)]
pub enum AxisCommands {
    /// List axes
    List,

    /// Create an axis from a JSON file
    Add {
        /// Path to the axis JSON
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Update an axis from a JSON file (matched by id)
    Update {
        /// Path to the axis JSON
        #[arg(short, long)]
        file: PathBuf,

        /// Previous axis name, for rebinding subjects across a rename
        #[arg(long)]
        old_name: Option<String>,
    },

    /// Delete an axis by id
    Rm {
        /// Axis id
        id: String,
    },
}

/// Semester subcommands.
#[derive(Subcommand, Debug)]
pub enum SemesterCommands {
    /// Append a semester column
    Add,

    /// Remove an empty semester column, shifting higher ones down
    Rm {
        /// Semester number
        number: u32,
    },
}

/// Sync subcommands.
#[derive(Subcommand, Debug)]
pub enum SyncCommands {
    /// Upload the current board keyed by email (requires a token)
    Push {
        /// User email the snapshot is keyed by
        #[arg(short, long)]
        email: String,

        /// Access token (or set PENSUM_SYNC_TOKEN)
        #[arg(short, long)]
        token: Option<String>,
    },

    /// Download and import the snapshot stored for an email
    Pull {
        /// User email the snapshot is keyed by
        #[arg(short, long)]
        email: String,
    },
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), BoardError> {
    let json_mode = cli.json_mode;
    let config = crate::config::load(cli.config.as_deref())?;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            cmd_server(&cli.database, &config, host, port).await
        }
        Some(Commands::Status) => cmd_status(&cli.database, json_mode),
        Some(Commands::Board { search, show_empty }) => {
            cmd_board(&cli.database, json_mode, &search, show_empty)
        }
        Some(Commands::Subject(SubjectCommands::New { semester })) => {
            cmd_subject_new(&cli.database, semester)
        }
        Some(Commands::Subject(SubjectCommands::Save { file, original_id })) => {
            cmd_subject_save(&cli.database, &file, original_id.as_deref())
        }
        Some(Commands::Subject(SubjectCommands::Rm { id })) => cmd_subject_rm(&cli.database, &id),
        Some(Commands::Subject(SubjectCommands::Move { id, semester })) => {
            cmd_subject_move(&cli.database, &id, semester)
        }
        Some(Commands::Axis(AxisCommands::List)) => cmd_axis_list(&cli.database, json_mode),
        Some(Commands::Axis(AxisCommands::Add { file })) => cmd_axis_add(&cli.database, &file),
        Some(Commands::Axis(AxisCommands::Update { file, old_name })) => {
            cmd_axis_update(&cli.database, &file, old_name.as_deref())
        }
        Some(Commands::Axis(AxisCommands::Rm { id })) => cmd_axis_rm(&cli.database, &id),
        Some(Commands::Semester(SemesterCommands::Add)) => cmd_semester_add(&cli.database),
        Some(Commands::Semester(SemesterCommands::Rm { number })) => {
            cmd_semester_rm(&cli.database, number)
        }
        Some(Commands::Program {
            name,
            version,
            institution,
            email,
        }) => cmd_program(&cli.database, json_mode, name, version, institution, email),
        Some(Commands::Start {
            institution,
            name,
            email,
        }) => cmd_start(&cli.database, institution, name, email),
        Some(Commands::Theme { value }) => cmd_theme(&cli.database, value),
        Some(Commands::Export { output }) => cmd_export(&cli.database, output),
        Some(Commands::Import { input }) => cmd_import(&cli.database, &input),
        Some(Commands::Audit) => cmd_audit(&cli.database, json_mode),
        Some(Commands::Sync(SyncCommands::Push { email, token })) => {
            cmd_sync_push(&cli.database, &config, &email, token).await
        }
        Some(Commands::Sync(SyncCommands::Pull { email })) => {
            cmd_sync_pull(&cli.database, &config, &email).await
        }
        Some(Commands::Init { force }) => cmd_init(&cli.database, force),
        Some(Commands::Reset { yes }) => cmd_reset(&cli.database, yes),
        None => {
            // No subcommand - show status by default
            cmd_status(&cli.database, json_mode)
        }
    }
}
