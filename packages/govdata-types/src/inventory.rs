use indexmap::IndexSet;
use serde::{Deserialize, Serialize};

/// The URL inventory document produced by discovery. Each field
/// is order-preserving-deduplicated independently; `aggregate_urls` is
/// recomputed as the union of the other five, in the field order below.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UrlInventory {
    #[serde(default)]
    pub govinfo_templates_expanded: IndexSet<String>,
    #[serde(default)]
    pub govinfo_index_discovered: IndexSet<String>,
    #[serde(default)]
    pub govtrack: IndexSet<String>,
    #[serde(default)]
    pub openstates: IndexSet<String>,
    #[serde(default)]
    pub legislators_reference: IndexSet<String>,
    #[serde(default)]
    pub aggregate_urls: IndexSet<String>,
}

impl UrlInventory {
    /// Recomputes `aggregate_urls` as the union of the other fields, in
    /// their declared order, each field itself in first-seen order.
    pub fn recompute_aggregate(&mut self) {
        let mut union = IndexSet::new();
        for field in [
            &self.govinfo_templates_expanded,
            &self.govinfo_index_discovered,
            &self.govtrack,
            &self.openstates,
            &self.legislators_reference,
        ] {
            for url in field {
                union.insert(url.clone());
            }
        }
        self.aggregate_urls = union;
    }

    /// True iff `aggregate_urls` is exactly the set-union of the other
    /// fields, ignoring order.
    pub fn aggregate_is_consistent(&self) -> bool {
        let mut union = std::collections::HashSet::new();
        for field in [
            &self.govinfo_templates_expanded,
            &self.govinfo_index_discovered,
            &self.govtrack,
            &self.openstates,
            &self.legislators_reference,
        ] {
            union.extend(field.iter().cloned());
        }
        let aggregate: std::collections::HashSet<_> = self.aggregate_urls.iter().cloned().collect();
        union == aggregate
    }

    pub fn total_len(&self) -> usize {
        self.aggregate_urls.len()
    }
}
