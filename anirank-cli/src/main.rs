mod catalog;
mod config;
mod output;
mod session;

use clap::Parser;
use std::io::{self, BufRead, IsTerminal};
use std::path::PathBuf;

use anirank_core::{
    build_results, fit_normal, solve_percentile_shift, BlendParams, CatalogEntry, ResultOptions,
    DEFAULT_K_FACTOR,
};

use crate::output::OutputMeta;
use crate::session::{is_dropped, run_session, SessionConfig};

pub fn bail(msg: impl std::fmt::Display) -> ! {
    eprintln!("Error: {msg}");
    std::process::exit(1);
}

#[derive(Parser)]
#[command(name = "anirank", version, about = "Rank a personal anime catalog through pairwise comparisons")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Run a pairwise ranking session over a catalog
    Rank(RankArgs),
    /// Create a default config file at ~/.config/anirank/config.toml
    Init,
}

#[derive(Parser)]
struct RankArgs {
    /// Catalog file: JSON array or one item per line (title[TAB]score[TAB]status)
    #[arg(long)]
    items: Option<PathBuf>,

    /// Elo k-factor (typically 1-200)
    #[arg(long)]
    k_factor: Option<f64>,

    /// RNG seed — the same seed replays the same pair sequence
    #[arg(long)]
    seed: Option<i64>,

    /// Total comparison target (overrides the planner's "optimal" suggestion)
    #[arg(long)]
    target: Option<u32>,

    /// Allow a pair to be compared more than once
    #[arg(long)]
    allow_repeats: bool,

    /// Keep dropped items below everything else; never compare across the boundary
    #[arg(long)]
    assume_dropped_lower: bool,

    /// Resolve every comparison automatically from external scores
    #[arg(long)]
    auto: bool,

    /// Fixed percentile shift applied to every item before scoring
    #[arg(long)]
    shift: Option<f64>,

    /// Solve for the shift that brings the mean final score to this value
    #[arg(long)]
    target_mean: Option<f64>,

    /// Output JSON instead of a table
    #[arg(long)]
    json: bool,

    /// Also write results to a CSV file
    #[arg(long)]
    csv: Option<PathBuf>,

    /// Show progress during execution
    #[arg(short, long)]
    verbose: bool,

    /// Path to config file (default: ~/.config/anirank/config.toml)
    #[arg(long)]
    config: Option<PathBuf>,
}

/// Load the catalog from --items or stdin.
fn load_catalog(args: &RankArgs) -> Vec<CatalogEntry> {
    let content = if let Some(ref path) = args.items {
        std::fs::read_to_string(path)
            .unwrap_or_else(|e| bail(format!("Failed to read items file {}: {e}", path.display())))
    } else {
        let stdin = io::stdin();
        if stdin.is_terminal() {
            bail("No items provided. Use --items <file> or pipe the catalog via stdin.");
        }
        stdin
            .lock()
            .lines()
            .map(|l| l.unwrap_or_else(|e| bail(format!("Failed to read from stdin: {e}"))))
            .collect::<Vec<_>>()
            .join("\n")
    };

    let entries = catalog::parse_catalog(&content);
    if entries.len() < 2 {
        bail(format!("Need at least 2 items to rank, got {}", entries.len()));
    }
    entries
}

fn main() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Rank(args) => run_rank(args),
        Commands::Init => {
            let path = config::create_default_config();
            println!("Created config at {}", path.display());
            println!("Edit it to set your default k-factor, seed, etc.");
        }
    }
}

fn run_rank(args: RankArgs) {
    // Load config file, merge with CLI args (CLI wins)
    let config_path = args.config.clone().unwrap_or_else(config::config_path);
    let cfg = config::load_config(&config_path);

    if args.shift.is_some() && args.target_mean.is_some() {
        bail("--shift and --target-mean are mutually exclusive");
    }

    let k_factor = args.k_factor.or(cfg.k_factor).unwrap_or(DEFAULT_K_FACTOR);
    if k_factor <= 0.0 {
        bail(format!("k-factor must be positive, got {k_factor}"));
    }
    let seed = args.seed.or(cfg.seed).unwrap_or(42);
    let target_mean = args.target_mean.or(cfg.target_mean);

    let entries = load_catalog(&args);

    let session_config = SessionConfig {
        k_factor,
        seed,
        target_override: args.target.or(cfg.target),
        allow_repeats: args.allow_repeats || cfg.allow_repeats.unwrap_or(false),
        assume_dropped_lower: args.assume_dropped_lower
            || cfg.assume_dropped_lower.unwrap_or(false),
        auto: args.auto,
        verbose: args.verbose,
    };

    if args.verbose {
        eprintln!(
            "Ranking {} items (k-factor {}, seed {})",
            entries.len(),
            k_factor,
            seed,
        );
    }

    let result = run_session(&entries, &session_config);
    let state = &result.state;

    if state.comparisons == 0 {
        bail("No comparisons recorded. Nothing to rank.");
    }

    // Fit the final ratings and blend against external scores where present.
    let item_ids: Vec<i64> = entries.iter().map(|e| e.id).collect();
    let final_fit = fit_normal(&state.rating_values(&item_ids));

    let score_values: Vec<f64> = entries
        .iter()
        .filter_map(|e| e.valid_score().map(f64::from))
        .collect();
    let blending = (!score_values.is_empty()).then(|| BlendParams {
        normality: result.normality,
        completion_ratio: if result.target > 0 {
            (state.comparisons as f64 / result.target as f64).clamp(0.0, 1.0)
        } else {
            1.0
        },
        external_fit: fit_normal(&score_values),
        total_comparisons: state.comparisons,
        item_count: entries.len(),
    });

    let percentile_shift = match target_mean {
        Some(mean) => {
            let shift =
                solve_percentile_shift(&entries, state, &final_fit, blending.as_ref(), mean);
            if args.verbose {
                eprintln!("Solved percentile shift {:.4} for target mean {}", shift, mean);
            }
            shift
        }
        None => args.shift.unwrap_or(0.0),
    };

    let tier = |e: &CatalogEntry| u32::from(is_dropped(e));
    let tier_of: Option<&dyn Fn(&CatalogEntry) -> u32> = if session_config.assume_dropped_lower {
        Some(&tier)
    } else {
        None
    };
    let result_options = ResultOptions {
        percentile_shift,
        blending,
        tier_of,
    };
    let rows = build_results(&entries, state, &final_fit, &result_options);

    let meta = OutputMeta {
        comparisons: state.comparisons,
        skips: state.skips,
        target: result.target,
        k_factor,
        seed,
        normality: result.normality,
    };

    if let Some(ref path) = args.csv {
        output::write_csv(path, &rows);
        if args.verbose {
            eprintln!("Wrote CSV to {}", path.display());
        }
    }

    if args.json {
        output::print_json(&rows, &meta);
    } else {
        output::print_table(&rows, &meta);
    }
}
