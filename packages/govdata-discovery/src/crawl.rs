use indexmap::IndexSet;
use scraper::{Html, Selector};
use url::Url;

const BULK_LIKE_SUFFIXES: &[&str] = &[".xml", ".zip", ".tar.gz", ".tgz"];
const BULK_LIKE_PATH_PREFIXES: &[&str] = &["/bulkdata/", "/data/congress/"];

/// Does `href` "look like bulk data"'s index-crawl heuristic?
pub fn looks_like_bulk_data(href: &str) -> bool {
    let lower = href.to_ascii_lowercase();
    BULK_LIKE_SUFFIXES.iter().any(|suffix| lower.ends_with(suffix))
        || BULK_LIKE_PATH_PREFIXES.iter().any(|prefix| lower.contains(prefix))
}

/// Extracts every `href` from `html` that looks like bulk data,
/// resolved against `page_url`, deduplicated in first-seen order.
pub fn extract_bulk_links(html: &str, page_url: &str) -> anyhow::Result<IndexSet<String>> {
    let base = Url::parse(page_url)?;
    let document = Html::parse_document(html);
    let selector = Selector::parse("a[href]").expect("static selector is valid");

    let mut found = IndexSet::new();
    for element in document.select(&selector) {
        let Some(href) = element.value().attr("href") else {
            continue;
        };
        if !looks_like_bulk_data(href) {
            continue;
        }
        match base.join(href) {
            Ok(resolved) => {
                found.insert(resolved.to_string());
            }
            Err(err) => {
                tracing::debug!(href, error = %err, "could not resolve href against page url");
            }
        }
    }
    Ok(found)
}

/// Extracts only `.zip` archive links (the aggregator crawl is stricter
/// than the general bulk-data heuristic).
pub fn extract_zip_links(html: &str, page_url: &str) -> anyhow::Result<IndexSet<String>> {
    let all = extract_bulk_links(html, page_url)?;
    Ok(all.into_iter().filter(|u| u.to_ascii_lowercase().ends_with(".zip")).collect())
}
