use std::path::Path;

use sqlx::PgPool;
use walkdir::WalkDir;

/// Walks `root` (a downloaded file or its extracted tree) for XML/JSON
/// documents and parses+upserts each with the extractor its filename
/// suggests. Unrecognized files are
/// skipped; a parse or store failure is logged and does not stop the
/// walk — the postprocess phase never fails the run as a whole.
pub async fn parse_and_upsert_tree(pool: &PgPool, root: &Path) {
    if root.is_file() {
        parse_and_upsert_file(pool, root).await;
        return;
    }
    for entry in WalkDir::new(root).into_iter().filter_map(|e| e.ok()) {
        if entry.file_type().is_file() {
            parse_and_upsert_file(pool, entry.path()).await;
        }
    }
}

async fn parse_and_upsert_file(pool: &PgPool, path: &Path) {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else { return };
    let lower = name.to_ascii_lowercase();
    let source_file = name.to_string();

    let Ok(contents) = tokio::fs::read_to_string(path).await else {
        return;
    };

    if lower.ends_with(".xml") && lower.contains("rollcall") {
        if let Some(vote) = govdata_parse::parse_rollcall(&contents, &source_file) {
            if let Err(err) = govdata_store::upsert_vote(pool, &vote).await {
                tracing::warn!(file = source_file, error = %err, "failed to upsert vote");
            }
        }
    } else if lower.ends_with(".xml") {
        if let Some(bill) = govdata_parse::parse_bill_status(&contents, &source_file) {
            if let Err(err) = govdata_store::upsert_bill(pool, &bill).await {
                tracing::warn!(file = source_file, error = %err, "failed to upsert bill");
            }
        }
    } else if lower.ends_with(".json") && lower.contains("legislator") {
        for legislator in govdata_parse::parse_legislators(&contents, &source_file) {
            if let Err(err) = govdata_store::upsert_legislator(pool, &legislator).await {
                tracing::warn!(file = source_file, error = %err, "failed to upsert legislator");
            }
        }
    }
}
