use govdata_types::CollectionCode;

/// Per-collection URL template for the primary bulk publisher. Fixed
/// constants of the component — `{congress}` and `{chamber}`
/// are substituted by [`expand`].
pub fn template_for(collection: CollectionCode) -> &'static str {
    match collection {
        CollectionCode::BillStatus => {
            "https://www.govinfo.gov/bulkdata/BILLSTATUS/{congress}/{chamber}/BILLSTATUS-{congress}{chamber}.zip"
        }
        CollectionCode::Bills => "https://www.govinfo.gov/bulkdata/BILLS/{congress}/{chamber}/BILLS-{congress}{chamber}.zip",
        CollectionCode::Rollcalls => {
            "https://www.govinfo.gov/bulkdata/ROLLCALLS/{congress}/{chamber}/ROLLCALLS-{congress}{chamber}.zip"
        }
        CollectionCode::Plaw => "https://www.govinfo.gov/bulkdata/PLAW/{congress}/PLAW-{congress}.zip",
    }
}

/// Substitutes `congress` and `chamber` into a collection's template.
pub fn expand(collection: CollectionCode, congress: i32, chamber: &str) -> String {
    template_for(collection)
        .replace("{congress}", &congress.to_string())
        .replace("{chamber}", chamber)
}

/// The primary bulk publisher's index page, crawled separately from
/// template expansion to catch collections the templates miss.
pub const GOVINFO_INDEX_URL: &str = "https://www.govinfo.gov/bulkdata/";

/// Secondary-publisher (govtrack) directory listings.
pub const GOVTRACK_DIRECTORY_URLS: &[&str] = &[
    "https://www.govtrack.us/data/congress/",
];

/// The state-data aggregator's download page and its fixed mirror.
pub const OPENSTATES_AGGREGATOR_URL: &str = "https://open.pluralpolicy.com/data/session-csv/";
pub const OPENSTATES_MIRROR_URL: &str = "https://data.openstates.org/legislators/current.zip";

/// Canonical legislator reference JSON files, fixed
pub const LEGISLATOR_REFERENCE_URLS: &[&str] = &[
    "https://theunitedstates.io/congress-legislators/legislators-current.json",
    "https://theunitedstates.io/congress-legislators/legislators-historical.json",
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn expand_substitutes_both_placeholders() {
        let url = expand(CollectionCode::BillStatus, 118, "hr");
        assert_eq!(
            url,
            "https://www.govinfo.gov/bulkdata/BILLSTATUS/118/hr/BILLSTATUS-118hr.zip"
        );
    }
}
