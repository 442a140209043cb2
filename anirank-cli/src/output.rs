/// Output formatting: terminal table, JSON, and CSV export.
///
/// Numeric precision is contractual: Elo values to 4 decimal places,
/// percentiles to 8.
use std::io::Write;
use std::path::Path;

use anirank_core::ResultRow;
use serde::Serialize;

use crate::bail;

#[derive(Serialize)]
struct JsonMetadata {
    item_count: usize,
    comparisons: u32,
    skips: u32,
    target: u32,
    k_factor: f64,
    seed: i64,
    normality: f64,
}

#[derive(Serialize)]
struct JsonOutput<'a> {
    metadata: JsonMetadata,
    items: &'a [ResultRow],
}

pub struct OutputMeta {
    pub comparisons: u32,
    pub skips: u32,
    pub target: u32,
    pub k_factor: f64,
    pub seed: i64,
    pub normality: f64,
}

/// Print results as a formatted terminal table.
pub fn print_table(rows: &[ResultRow], meta: &OutputMeta) {
    let title_width = rows.iter().map(|r| r.title.len()).max().unwrap_or(5).max(5);

    println!(
        "  # | {:<title_width$} | Score |      Elo | W-L-T    | Ext | Status",
        "Title"
    );
    println!(
        "----|-{}-|-------|----------|----------|-----|-------",
        "-".repeat(title_width)
    );

    for row in rows {
        let ext = row
            .external_score
            .map_or_else(|| "-".to_string(), |s| s.to_string());
        let record = format!("{}-{}-{}", row.wins, row.losses, row.ties);
        println!(
            "{:>3} | {:<title_width$} | {:>5} | {:>8.1} | {:<8} | {:>3} | {}",
            row.rank,
            row.title,
            row.score,
            row.elo_value,
            record,
            ext,
            row.status.as_deref().unwrap_or("-"),
        );
    }

    println!(
        "\n{} items ranked from {} comparisons ({} skipped, target {})",
        rows.len(),
        meta.comparisons,
        meta.skips,
        meta.target,
    );
}

/// Print results as JSON: a metadata object plus one row per item.
pub fn print_json(rows: &[ResultRow], meta: &OutputMeta) {
    let output = JsonOutput {
        metadata: JsonMetadata {
            item_count: rows.len(),
            comparisons: meta.comparisons,
            skips: meta.skips,
            target: meta.target,
            k_factor: meta.k_factor,
            seed: meta.seed,
            normality: meta.normality,
        },
        items: rows,
    };
    println!(
        "{}",
        serde_json::to_string_pretty(&output)
            .unwrap_or_else(|e| bail(format!("Failed to serialize results: {e}")))
    );
}

/// Write results as CSV: one row per item.
pub fn write_csv(path: &Path, rows: &[ResultRow]) {
    let mut out = String::new();
    out.push_str("rank,id,title,status,external_score,elo,games,wins,losses,ties,percentile,score\n");
    for row in rows {
        let ext = row
            .external_score
            .map_or_else(String::new, |s| s.to_string());
        out.push_str(&format!(
            "{},{},{},{},{},{:.4},{},{},{},{},{:.8},{}\n",
            row.rank,
            row.id,
            csv_field(&row.title),
            csv_field(row.status.as_deref().unwrap_or("")),
            ext,
            row.elo_value,
            row.games,
            row.wins,
            row.losses,
            row.ties,
            row.percentile,
            row.score,
        ));
    }

    let mut file = std::fs::File::create(path)
        .unwrap_or_else(|e| bail(format!("Failed to create {}: {e}", path.display())));
    file.write_all(out.as_bytes())
        .unwrap_or_else(|e| bail(format!("Failed to write {}: {e}", path.display())));
}

/// Quote a CSV field when it contains a delimiter, quote, or newline.
fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}
