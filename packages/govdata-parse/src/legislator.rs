use govdata_types::Legislator;
use serde::Deserialize;
use serde_json::Value;

/// Loose mirror of the canonical `legislators-current.json` shape —
/// only the fields the legislator record actually needs, everything else is ignored
/// rather than rejected (forward-compatible with upstream schema drift).
#[derive(Debug, Deserialize)]
struct RawLegislator {
    id: Option<RawId>,
    name: Option<RawName>,
    #[serde(default)]
    terms: Vec<RawTerm>,
}

#[derive(Debug, Deserialize)]
struct RawId {
    bioguide: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawName {
    first: Option<String>,
    last: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RawTerm {
    party: Option<String>,
    state: Option<String>,
}

/// Extracts zero or more `Legislator` records from the canonical
/// legislator JSON. Malformed JSON (not a top-level array, or
/// not valid JSON at all) produces zero records and a warning rather
/// than a fatal error; individual entries missing a bioguide id are
/// skipped since they cannot form the natural key.
pub fn parse_legislators(json: &str, source_file: &str) -> Vec<Legislator> {
    let raw: Value = match serde_json::from_str(json) {
        Ok(value) => value,
        Err(err) => {
            tracing::warn!(source_file, error = %err, "legislator document is not valid JSON");
            return Vec::new();
        }
    };

    let Some(entries) = raw.as_array() else {
        tracing::warn!(source_file, "legislator document is not a JSON array, skipping");
        return Vec::new();
    };

    entries
        .iter()
        .filter_map(|entry| serde_json::from_value::<RawLegislator>(entry.clone()).ok())
        .filter_map(|raw| to_legislator(raw, source_file))
        .collect()
}

fn to_legislator(raw: RawLegislator, source_file: &str) -> Option<Legislator> {
    let bioguide = raw.id.and_then(|id| id.bioguide)?;

    let name = raw
        .name
        .map(|n| {
            let first = n.first.unwrap_or_default();
            let last = n.last.unwrap_or_default();
            format!("{first} {last}").trim().to_string()
        })
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| bioguide.clone());

    let current_term = raw.terms.last();
    Some(Legislator {
        name,
        bioguide,
        current_party: current_term.and_then(|t| t.party.clone()),
        state: current_term.and_then(|t| t.state.clone()),
        source_file: source_file.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"
        [
            {
                "id": {"bioguide": "D000123"},
                "name": {"first": "Jane", "last": "Doe"},
                "terms": [
                    {"party": "Democrat", "state": "MN"},
                    {"party": "Democrat", "state": "MN"}
                ]
            },
            {
                "id": {},
                "name": {"first": "No", "last": "Bioguide"},
                "terms": []
            }
        ]
    "#;

    #[test]
    fn parses_array_and_skips_entries_without_bioguide() {
        let legislators = parse_legislators(SAMPLE, "legislators-current.json");
        assert_eq!(legislators.len(), 1);
        let jane = &legislators[0];
        assert_eq!(jane.bioguide, "D000123");
        assert_eq!(jane.name, "Jane Doe");
        assert_eq!(jane.current_party.as_deref(), Some("Democrat"));
        assert_eq!(jane.state.as_deref(), Some("MN"));
    }

    #[test]
    fn non_array_document_yields_zero_records() {
        assert!(parse_legislators(r#"{"not": "an array"}"#, "f.json").is_empty());
    }

    #[test]
    fn invalid_json_yields_zero_records_not_panic() {
        assert!(parse_legislators("not json at all", "f.json").is_empty());
    }
}
