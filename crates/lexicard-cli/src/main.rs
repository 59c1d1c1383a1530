//! lexicard CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "lexicard", version, about = "Vocabulary flashcards and quizzes")]
struct Cli {
    #[command(flatten)]
    global: GlobalOpts,

    #[command(subcommand)]
    command: Commands,
}

/// Options shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalOpts {
    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Data directory (overrides the config file and LEXICARD_DATA_DIR)
    #[arg(long, global = true)]
    pub data_dir: Option<PathBuf>,
}

/// Fields of a word entry given on the command line.
#[derive(Args, Debug, Clone, Default)]
pub struct EntryArgs {
    /// The English word or phrase
    #[arg(long)]
    pub word: Option<String>,

    /// Part of speech, e.g. "n." or "v."
    #[arg(long = "pos")]
    pub part_of_speech: Option<String>,

    /// Chinese gloss
    #[arg(long)]
    pub chinese: Option<String>,

    /// English definition
    #[arg(long)]
    pub english: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter lexicard.toml
    Init,

    /// List categories with their word counts
    Categories,

    /// List the words of a category
    List {
        category: String,

        /// Print JSON instead of a table
        #[arg(long)]
        json: bool,
    },

    /// Add a word to a category (created if missing)
    Add {
        category: String,

        #[command(flatten)]
        entry: EntryArgs,
    },

    /// Remove a word from a category
    Remove { category: String, word: String },

    /// Edit a word; omitted fields keep their current value
    Update {
        category: String,

        /// The word to edit
        old_word: String,

        #[command(flatten)]
        entry: EntryArgs,
    },

    /// Create an empty category
    CreateCategory { name: String },

    /// Delete a category and its words
    DeleteCategory { name: String },

    /// Remove every word from a category
    ClearCategory { name: String },

    /// Move a word to another category
    Move {
        word: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },

    /// Copy a word to another category
    Copy {
        word: String,

        #[arg(long)]
        from: String,

        #[arg(long)]
        to: String,
    },

    /// Search words across all fields
    Search {
        query: String,

        /// Only search this category
        #[arg(long)]
        category: Option<String>,
    },

    /// Import words from a JSON or CSV file
    Import {
        file: PathBuf,

        /// Target category
        #[arg(long)]
        category: String,

        /// json or csv (default: from the file extension)
        #[arg(long)]
        format: Option<String>,
    },

    /// Export a category to JSON or CSV
    Export {
        category: String,

        /// json or csv
        #[arg(long, default_value = "json")]
        format: String,

        /// Output file, or "-" for stdout (default: <category>_words.<format>)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Run an interactive quiz over stdin
    Quiz {
        /// Category to quiz (default: the last one used)
        #[arg(long)]
        category: Option<String>,

        /// en-to-zh, zh-to-en or en-definition
        #[arg(long)]
        mode: Option<String>,

        /// Add incorrectly answered words to wrongWords when done
        #[arg(long)]
        save_wrong: bool,
    },

    /// Show recent quiz results
    History {
        /// Number of records to show
        #[arg(long, default_value = "10")]
        limit: usize,
    },

    /// Show library statistics
    Stats,

    /// Write a backup of all data
    Backup {
        /// Output file (default: lexicard_backup_<date>.json)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Replace all data with a backup
    Restore { file: PathBuf },

    /// Delete all data and reseed the library
    Reset {
        /// Confirm the reset
        #[arg(long)]
        yes: bool,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let cli = Cli::parse();
    let global = cli.global;

    let result = match cli.command {
        Commands::Init => commands::init::execute(),
        Commands::Categories => commands::categories::execute(&global),
        Commands::List { category, json } => commands::list::execute(&global, &category, json),
        Commands::Add { category, entry } => commands::words::add(&global, &category, entry),
        Commands::Remove { category, word } => commands::words::remove(&global, &category, &word),
        Commands::Update {
            category,
            old_word,
            entry,
        } => commands::words::update(&global, &category, &old_word, entry),
        Commands::CreateCategory { name } => commands::categories::create(&global, &name),
        Commands::DeleteCategory { name } => commands::categories::delete(&global, &name),
        Commands::ClearCategory { name } => commands::categories::clear(&global, &name),
        Commands::Move { word, from, to } => {
            commands::words::transfer(&global, &word, &from, &to, false)
        }
        Commands::Copy { word, from, to } => {
            commands::words::transfer(&global, &word, &from, &to, true)
        }
        Commands::Search { query, category } => {
            commands::search::execute(&global, &query, category.as_deref())
        }
        Commands::Import {
            file,
            category,
            format,
        } => commands::transfer::import(&global, &file, &category, format.as_deref()),
        Commands::Export {
            category,
            format,
            output,
        } => commands::transfer::export(&global, &category, &format, output),
        Commands::Quiz {
            category,
            mode,
            save_wrong,
        } => commands::quiz::execute(&global, category, mode, save_wrong),
        Commands::History { limit } => commands::history::execute(&global, limit),
        Commands::Stats => commands::stats::execute(&global),
        Commands::Backup { output } => commands::backup::backup(&global, output),
        Commands::Restore { file } => commands::backup::restore(&global, &file),
        Commands::Reset { yes } => commands::backup::reset(&global, yes),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
