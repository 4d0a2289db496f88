use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// A known bulk-data collection code accepted by `--collections`/the
/// collection filter. Any code outside this set is a fatal config error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CollectionCode {
    BillStatus,
    Bills,
    Rollcalls,
    Plaw,
}

impl CollectionCode {
    pub const ALL: [CollectionCode; 4] = [
        CollectionCode::BillStatus,
        CollectionCode::Bills,
        CollectionCode::Rollcalls,
        CollectionCode::Plaw,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CollectionCode::BillStatus => "billstatus",
            CollectionCode::Bills => "bills",
            CollectionCode::Rollcalls => "rollcalls",
            CollectionCode::Plaw => "plaw",
        }
    }
}

impl fmt::Display for CollectionCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CollectionCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "billstatus" | "bill-status" => Ok(CollectionCode::BillStatus),
            "bills" => Ok(CollectionCode::Bills),
            "rollcalls" | "rollcall" => Ok(CollectionCode::Rollcalls),
            "plaw" => Ok(CollectionCode::Plaw),
            other => Err(format!("unknown collection code: {other}")),
        }
    }
}

/// Parses a `--collections CSV` flag/env value into the filter set.
/// Empty input means "all known collections".
pub fn parse_collection_filter(csv: &str) -> Result<Vec<CollectionCode>, String> {
    let trimmed = csv.trim();
    if trimmed.is_empty() {
        return Ok(CollectionCode::ALL.to_vec());
    }
    trimmed
        .split(',')
        .map(|part| part.trim().parse::<CollectionCode>())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for code in CollectionCode::ALL {
            let parsed: CollectionCode = code.as_str().parse().unwrap();
            assert_eq!(parsed, code);
        }
    }

    #[test]
    fn empty_filter_means_all() {
        assert_eq!(parse_collection_filter("").unwrap(), CollectionCode::ALL.to_vec());
    }

    #[test]
    fn unknown_code_is_an_error() {
        assert!(parse_collection_filter("billstatus,nonsense").is_err());
    }
}
