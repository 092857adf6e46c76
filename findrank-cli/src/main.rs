mod corpus;
mod diff_utils;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use findrank::{
    apply_edits, compile, flatten, search_documents, FileNode, FindConfig, FuzzyMatcher,
    Navigator, RankedCandidate, Ranker, ReplacementIntent, SearchResultSet,
};
use itertools::Itertools;
use std::{fs, num::NonZeroUsize, path::PathBuf};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

use corpus::{collect_files, read_documents, Document};
use diff_utils::print_unified_diff;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Configuration file layered over the global and local ones
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Args)]
struct CliSearchArgs {
    /// Root directory to search in
    #[arg(short = 'd', long, default_value = ".")]
    root: PathBuf,

    /// Treat the query as a regular expression
    #[arg(short = 'r', long)]
    regex: bool,

    /// Match whole words only
    #[arg(short = 'w', long = "word-boundary")]
    word_boundary: bool,

    /// Match case exactly
    #[arg(short = 'c', long)]
    case_sensitive: bool,

    /// Comma-separated globs a file must match
    #[arg(short = 'i', long)]
    include: Option<String>,

    /// Comma-separated globs that remove files from the search
    #[arg(short = 'x', long)]
    exclude: Option<String>,

    /// Number of threads used to read files
    #[arg(short = 'j', long)]
    threads: Option<NonZeroUsize>,

    /// Print machine-readable JSON
    #[arg(long)]
    json: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rank the files under a directory against a fuzzy query
    Open {
        /// Query to rank by; empty lists recent files first
        #[arg(default_value = "")]
        query: String,

        /// Root directory to list
        #[arg(short = 'd', long, default_value = ".")]
        root: PathBuf,

        /// Recently used file, most recent first (repeatable)
        #[arg(long = "recent")]
        recent: Vec<String>,

        /// Match case exactly
        #[arg(short = 'c', long)]
        case_sensitive: bool,

        /// Show scores next to the paths
        #[arg(short = 's', long)]
        scores: bool,
    },

    /// Search for a pattern in files
    Find {
        query: String,

        #[command(flatten)]
        search: CliSearchArgs,

        /// Show only statistics, not matches
        #[arg(long)]
        stats: bool,
    },

    /// Replace a pattern in files
    Replace {
        query: String,

        /// Text to replace matches with; `$1`/`${name}` expand in regex mode
        replacement: String,

        #[command(flatten)]
        search: CliSearchArgs,

        /// Only replace within this file (path relative to the root)
        #[arg(long)]
        file: Option<String>,

        /// Dry run - show what would be changed without making changes
        #[arg(short = 'n', long)]
        dry_run: bool,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = FindConfig::load_from(cli.config.as_deref()).context("Failed to load config")?;
    init_logging(cli.log_level.as_deref().unwrap_or(&config.log_level));
    run(cli.command, config)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn run(command: Commands, config: FindConfig) -> Result<()> {
    match command {
        Commands::Open {
            query,
            root,
            recent,
            case_sensitive,
            scores,
        } => {
            let config = config.merge_with_cli(FindConfig {
                case_sensitive,
                recent_files: recent,
                ..FindConfig::default()
            });
            let files = collect_files(&root);
            let candidates = flatten(&FileNode::from_paths(&files));
            let ranker = Ranker::new(FuzzyMatcher::new(config.case_sensitive));
            let ranked = ranker.rank(&candidates, &query, &config.recent_files);
            print_ranked(&ranked, scores);
            Ok(())
        }
        Commands::Find {
            query,
            search,
            stats,
        } => {
            let config = config.merge_with_cli(cli_config(&search));
            let documents = load_documents(&search, &config)?;
            let result = run_search(&query, &config, &documents)?;

            if search.json {
                println!("{}", serde_json::to_string_pretty(&result)?);
            } else {
                print_search_results(&result, stats);
            }
            Ok(())
        }
        Commands::Replace {
            query,
            replacement,
            search,
            file,
            dry_run,
        } => {
            let config = config.merge_with_cli(cli_config(&search));
            let documents = load_documents(&search, &config)?;
            let result = run_search(&query, &config, &documents)?;

            let mut navigator = Navigator::with_results(result);
            let intent = match &file {
                Some(file) => navigator.replace_all_in_file(file, &replacement)?,
                None => navigator.replace_all(&replacement)?,
            };

            let changed = render_replacements(&intent, &documents, search.json)?;
            if search.json {
                println!("{}", serde_json::to_string_pretty(&intent)?);
            }

            if dry_run {
                if !search.json {
                    println!("Dry run - no changes will be made");
                }
            } else {
                for (path, text) in &changed {
                    fs::write(search.root.join(path), text)
                        .with_context(|| format!("Failed to write {}", path))?;
                    debug!("Wrote {}", path);
                }
            }

            if !search.json {
                println!(
                    "\n{} {} matches in {} files",
                    if dry_run { "Would replace" } else { "Replaced" },
                    intent.edits().len(),
                    changed.len()
                );
            }
            Ok(())
        }
    }
}

fn cli_config(args: &CliSearchArgs) -> FindConfig {
    let mut cli = FindConfig {
        case_sensitive: args.case_sensitive,
        whole_word: args.word_boundary,
        use_regex: args.regex,
        include_glob: args.include.clone().unwrap_or_default(),
        exclude_glob: args.exclude.clone().unwrap_or_default(),
        ..FindConfig::default()
    };
    if let Some(threads) = args.threads {
        cli.thread_count = threads;
    }
    cli
}

fn load_documents(args: &CliSearchArgs, config: &FindConfig) -> Result<Vec<Document>> {
    let files = collect_files(&args.root);
    read_documents(&args.root, &files, config.thread_count)
}

fn run_search(query: &str, config: &FindConfig, documents: &[Document]) -> Result<SearchResultSet> {
    let options = config.to_search_options();
    let pattern = compile(query, &options)?;
    let result = search_documents(
        &pattern,
        documents.iter().map(|d| (d.path.as_str(), d.text.as_str())),
    );
    info!(
        "{} matches for '{}' in {} files",
        result.total_matches(),
        query,
        result.files_with_matches()
    );
    Ok(result)
}

/// Applies the intent to each touched document, printing a diff per file
/// unless JSON output was requested. Returns the new text of every file
/// that changed.
fn render_replacements(
    intent: &ReplacementIntent,
    documents: &[Document],
    json: bool,
) -> Result<Vec<(String, String)>> {
    let mut changed = Vec::new();
    for path in intent.files() {
        let Some(document) = documents.iter().find(|d| d.path == path) else {
            continue;
        };
        let new_text = apply_edits(path, &document.text, intent.edits())?;
        if new_text == document.text {
            continue;
        }
        if !json {
            print_unified_diff(path, &document.text, &new_text);
        }
        changed.push((path.to_string(), new_text));
    }
    Ok(changed)
}

fn print_ranked(ranked: &[RankedCandidate], scores: bool) {
    for candidate in ranked {
        if scores {
            println!("{:>5} {}", candidate.score.score, candidate.path());
        } else {
            println!("{}", candidate.path());
        }
    }
}

fn print_search_results(result: &SearchResultSet, stats_only: bool) {
    if stats_only {
        println!(
            "Found {} matches in {} files",
            result.total_matches(),
            result.files_with_matches()
        );
        println!(
            "Searched {} files, skipped {}",
            result.files_searched, result.files_skipped
        );
        if !result.is_empty() {
            println!(
                "Files: {}",
                result.groups().iter().map(|g| g.file.as_str()).join(", ")
            );
        }
        return;
    }

    for group in result.groups() {
        println!("\n{}", group.file.blue());
        for m in &result.matches()[group.range.clone()] {
            let (before, rest) = m.line_text.split_at(m.match_start);
            let (hit, after) = rest.split_at(m.match_end - m.match_start);
            println!(
                "{}:{}: {}{}{}",
                m.line.to_string().green(),
                m.column,
                before,
                hit.red().bold(),
                after
            );
        }
    }

    println!(
        "\nFound {} matches in {} files",
        result.total_matches(),
        result.files_with_matches()
    );
}
