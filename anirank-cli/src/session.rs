/// The comparison loop: draw pairs, resolve outcomes, update state.
///
/// Outcomes come either from the user at the terminal or, with `--auto`,
/// from the external scores (higher score wins, equal scores tie, pairs
/// with an unscored side tie as well so the loop always progresses).
use std::collections::HashMap;
use std::io::{self, BufRead, Write};

use anirank_core::{
    bucket_priorities, comparison_targets, estimate_normality, normality_multiplier,
    pair_exclusion_scale, select_pair, CatalogEntry, EloState, ItemId, PairOptions, SeededRng,
};

use crate::bail;

pub struct SessionConfig {
    pub k_factor: f64,
    pub seed: i64,
    /// Overrides the planner's "optimal" suggestion when set.
    pub target_override: Option<u32>,
    pub allow_repeats: bool,
    pub assume_dropped_lower: bool,
    pub auto: bool,
    pub verbose: bool,
}

pub struct SessionResult {
    pub state: EloState,
    /// The comparison target the session ran against.
    pub target: u32,
    pub normality: f64,
}

pub fn is_dropped(entry: &CatalogEntry) -> bool {
    entry
        .status
        .as_deref()
        .is_some_and(|s| s.eq_ignore_ascii_case("dropped"))
}

/// Run a full comparison session over the catalog.
pub fn run_session(entries: &[CatalogEntry], config: &SessionConfig) -> SessionResult {
    let item_ids: Vec<ItemId> = entries.iter().map(|e| e.id).collect();
    let titles: HashMap<ItemId, &str> = entries.iter().map(|e| (e.id, e.title.as_str())).collect();
    let scores: HashMap<ItemId, u8> = entries
        .iter()
        .filter_map(|e| e.valid_score().map(|s| (e.id, s)))
        .collect();
    let score_list: Vec<u8> = entries.iter().filter_map(|e| e.valid_score()).collect();

    // Priority: items in under-sampled score buckets get boosted attention.
    let by_bucket = bucket_priorities(&score_list);
    let priority: HashMap<ItemId, f64> = entries
        .iter()
        .filter_map(|e| e.valid_score().map(|s| (e.id, by_bucket[s as usize - 1])))
        .collect();

    // Ordering assumption: dropped items never meet the rest.
    let dropped: HashMap<ItemId, bool> = entries.iter().map(|e| (e.id, is_dropped(e))).collect();
    let same_tier = |a: ItemId, b: ItemId| dropped[&a] == dropped[&b];
    let allowed: Option<&dyn Fn(ItemId, ItemId) -> bool> = if config.assume_dropped_lower {
        Some(&same_tier)
    } else {
        None
    };

    let normality = estimate_normality(&score_list);
    let scale = if config.assume_dropped_lower {
        pair_exclusion_scale(&item_ids, &same_tier) * normality_multiplier(normality)
    } else {
        normality_multiplier(normality)
    };
    let targets = comparison_targets(item_ids.len(), scale);
    let target = config.target_override.unwrap_or(targets.optimal);

    if config.verbose {
        eprintln!(
            "Planner: minimum {} / optimal {} / excessive {} comparisons (normality {:.2})",
            targets.minimum, targets.optimal, targets.excessive, normality,
        );
        eprintln!("Running to {} comparisons", target);
    }

    let mut state = EloState::new(&item_ids, config.k_factor);
    let mut rng = SeededRng::new(config.seed);
    let options = PairOptions {
        avoid_repeats: !config.allow_repeats,
        priority: Some(&priority),
        priority_boost: 2.0,
        external_scores: Some(&scores),
        same_score_boost: 2.0,
        allowed,
        ..PairOptions::default()
    };

    let stdin = io::stdin();
    let mut input = stdin.lock();

    while state.comparisons < target {
        let pair = select_pair(&state, &item_ids, &mut rng, &options)
            .unwrap_or_else(|e| bail(e));
        let (a, b) = match pair {
            Some(pair) => pair,
            None => {
                eprintln!("No valid pairs available under the current settings.");
                break;
            }
        };

        let answer = if config.auto {
            auto_outcome(scores.get(&a), scores.get(&b))
        } else {
            prompt_outcome(&mut input, titles[&a], titles[&b], state.comparisons, target)
        };

        match answer {
            Answer::Outcome(outcome) => {
                state = state
                    .record_outcome(a, b, outcome)
                    .unwrap_or_else(|e| bail(e));
            }
            Answer::Skip => state = state.record_skip(),
            Answer::Quit => break,
        }
    }

    if config.verbose {
        eprintln!(
            "Session done: {} comparisons, {} skips",
            state.comparisons, state.skips,
        );
    }

    SessionResult { state, target, normality }
}

enum Answer {
    /// Outcome for the first item: 1.0 win, 0.5 tie, 0.0 loss.
    Outcome(f64),
    Skip,
    Quit,
}

/// Resolve from external scores. Unscored sides tie so the loop progresses.
fn auto_outcome(score_a: Option<&u8>, score_b: Option<&u8>) -> Answer {
    match (score_a, score_b) {
        (Some(a), Some(b)) if a > b => Answer::Outcome(1.0),
        (Some(a), Some(b)) if a < b => Answer::Outcome(0.0),
        _ => Answer::Outcome(0.5),
    }
}

fn prompt_outcome(
    input: &mut impl BufRead,
    title_a: &str,
    title_b: &str,
    done: u32,
    target: u32,
) -> Answer {
    loop {
        println!("\n[{}/{}] Which is better?", done + 1, target);
        println!("  1) {}", title_a);
        println!("  2) {}", title_b);
        print!("1/2, (t)ie, (s)kip, (q)uit > ");
        let _ = io::stdout().flush();

        let mut line = String::new();
        match input.read_line(&mut line) {
            Ok(0) => return Answer::Quit, // EOF
            Ok(_) => {}
            Err(e) => bail(format!("Failed to read from stdin: {e}")),
        }
        match line.trim().to_lowercase().as_str() {
            "1" => return Answer::Outcome(1.0),
            "2" => return Answer::Outcome(0.0),
            "t" | "tie" => return Answer::Outcome(0.5),
            "s" | "skip" => return Answer::Skip,
            "q" | "quit" => return Answer::Quit,
            other => println!("Unrecognized answer \"{other}\""),
        }
    }
}
