/// Catalog file parsing.
///
/// Two input formats, auto-detected: a JSON array (of bare title strings or
/// `{title, status, score}` objects) or plain text with one item per line,
/// optionally followed by tab-separated score and status fields:
///
///   Mushishi<TAB>9<TAB>completed
///
/// Items get sequential IDs in input order; score 0 means "no score".
use anirank_core::CatalogEntry;
use serde::Deserialize;

use crate::bail;

#[derive(Deserialize)]
#[serde(untagged)]
enum RawEntry {
    Title(String),
    Full {
        title: String,
        #[serde(default)]
        status: Option<String>,
        #[serde(default)]
        score: Option<u8>,
    },
}

/// Parse catalog content: JSON array or tab-separated lines.
pub fn parse_catalog(content: &str) -> Vec<CatalogEntry> {
    let trimmed = content.trim();
    let entries = if trimmed.starts_with('[') {
        let raw: Vec<RawEntry> = serde_json::from_str(trimmed)
            .unwrap_or_else(|e| bail(format!("Catalog looks like JSON but failed to parse: {e}")));
        raw.into_iter()
            .enumerate()
            .map(|(i, entry)| match entry {
                RawEntry::Title(title) => CatalogEntry::new(i as i64, title),
                RawEntry::Full { title, status, score } => CatalogEntry {
                    id: i as i64,
                    title,
                    status,
                    external_score: score,
                },
            })
            .collect::<Vec<_>>()
    } else {
        trimmed
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| parse_line(i as i64, line))
            .collect()
    };

    entries
        .into_iter()
        .filter(|e| !e.title.trim().is_empty())
        .collect()
}

fn parse_line(id: i64, line: &str) -> CatalogEntry {
    let mut fields = line.split('\t');
    let title = fields.next().unwrap_or_default().trim().to_string();
    let mut entry = CatalogEntry::new(id, title);

    if let Some(score_field) = fields.next() {
        let score_field = score_field.trim();
        if !score_field.is_empty() {
            let score: u8 = score_field.parse().unwrap_or_else(|_| {
                bail(format!("Invalid score \"{score_field}\" for \"{}\"", entry.title))
            });
            if score > 10 {
                bail(format!("Score {score} for \"{}\" is out of range 1-10", entry.title));
            }
            // 0 means unscored.
            entry.external_score = Some(score).filter(|&s| s > 0);
        }
    }
    if let Some(status_field) = fields.next() {
        let status_field = status_field.trim();
        if !status_field.is_empty() {
            entry.status = Some(status_field.to_string());
        }
    }
    entry
}
