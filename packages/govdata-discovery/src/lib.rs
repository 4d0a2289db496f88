//! Discovery: produces the URL inventory by combining
//! pure template expansion with best-effort crawls of several
//! publishers. No single crawl failure fails discovery as a whole.

pub mod crawl;
pub mod templates;

use std::future::Future;
use std::time::Duration;

use govdata_transport::HttpTransport;
use govdata_types::{ChamberCode, Config, UrlInventory};
use indexmap::IndexSet;

const CRAWL_TIMEOUT: Duration = Duration::from_secs(20);

async fn isolate<Fut>(label: &str, fut: Fut) -> IndexSet<String>
where
    Fut: Future<Output = anyhow::Result<IndexSet<String>>>,
{
    match fut.await {
        Ok(set) => set,
        Err(err) => {
            tracing::warn!(target: "govdata_discovery", crawl = label, error = %err, "crawl failed, contributing empty list");
            IndexSet::new()
        }
    }
}

async fn fetch_and_extract(transport: &dyn HttpTransport, url: &str) -> anyhow::Result<IndexSet<String>> {
    let html = transport.get_text(url, CRAWL_TIMEOUT).await?;
    crawl::extract_bulk_links(&html, url)
}

fn expand_templates(config: &Config) -> IndexSet<String> {
    let mut out = IndexSet::new();
    for collection in &config.collections {
        for congress in config.start_congress..=config.end_congress {
            for chamber in ChamberCode::ALL {
                out.insert(templates::expand(*collection, congress, chamber.as_str()));
            }
        }
    }
    out
}

async fn crawl_govinfo_index(transport: &dyn HttpTransport) -> IndexSet<String> {
    isolate("govinfo_index", fetch_and_extract(transport, templates::GOVINFO_INDEX_URL)).await
}

async fn crawl_govtrack(transport: &dyn HttpTransport) -> IndexSet<String> {
    let mut union = IndexSet::new();
    for &page in templates::GOVTRACK_DIRECTORY_URLS {
        let found = isolate("govtrack", fetch_and_extract(transport, page)).await;
        union.extend(found);
    }
    union
}

async fn crawl_openstates(transport: &dyn HttpTransport) -> IndexSet<String> {
    let mut union = isolate(
        "openstates",
        async {
            let html = transport.get_text(templates::OPENSTATES_AGGREGATOR_URL, CRAWL_TIMEOUT).await?;
            crawl::extract_zip_links(&html, templates::OPENSTATES_AGGREGATOR_URL)
        },
    )
    .await;
    union.insert(templates::OPENSTATES_MIRROR_URL.to_string());
    union
}

fn legislator_reference_urls() -> IndexSet<String> {
    templates::LEGISLATOR_REFERENCE_URLS.iter().map(|s| s.to_string()).collect()
}

/// Runs every subfield of discovery and returns the combined inventory.
/// Discovery as a whole never fails; `aggregate_urls` is the union over
/// whatever subfields succeeded.
pub async fn discover(config: &Config, transport: &dyn HttpTransport) -> UrlInventory {
    let mut inventory = UrlInventory {
        govinfo_templates_expanded: expand_templates(config),
        govinfo_index_discovered: crawl_govinfo_index(transport).await,
        govtrack: crawl_govtrack(transport).await,
        openstates: crawl_openstates(transport).await,
        legislators_reference: legislator_reference_urls(),
        aggregate_urls: IndexSet::new(),
    };
    inventory.recompute_aggregate();
    inventory
}
