use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::chamber::ChamberCode;

/// A parsed bill record. Natural key: `(congress, chamber, bill_number)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub source_file: String,
    pub congress: i32,
    pub chamber: ChamberCode,
    pub bill_number: String,
    pub title: Option<String>,
    pub sponsor_name: Option<String>,
    pub introduced_date: Option<DateTime<Utc>>,
}

impl Bill {
    pub fn natural_key(&self) -> (i32, ChamberCode, &str) {
        (self.congress, self.chamber, self.bill_number.as_str())
    }
}

/// A parsed rollcall vote record. Natural key:
/// `(congress, chamber, vote_id)`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vote {
    pub source_file: String,
    pub congress: i32,
    pub chamber: ChamberCode,
    pub vote_id: String,
    pub vote_date: Option<DateTime<Utc>>,
    pub result: Option<String>,
}

impl Vote {
    pub fn natural_key(&self) -> (i32, ChamberCode, &str) {
        (self.congress, self.chamber, self.vote_id.as_str())
    }
}

/// A parsed legislator record. Natural key: `bioguide`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Legislator {
    pub name: String,
    pub bioguide: String,
    pub current_party: Option<String>,
    pub state: Option<String>,
    pub source_file: String,
}

impl Legislator {
    /// Bioguide ids are a stable 7-character code (letter + 6 digits in
    /// practice, but the parser only enforces the length here — the
    /// publisher is the source of truth for the exact alphabet).
    pub fn has_well_formed_bioguide(&self) -> bool {
        self.bioguide.chars().count() == 7
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bill_natural_key_uses_declared_fields() {
        let bill = Bill {
            source_file: "BILLSTATUS-118hr1234.xml".into(),
            congress: 118,
            chamber: ChamberCode::Hr,
            bill_number: "1234".into(),
            title: Some("An Act".into()),
            sponsor_name: None,
            introduced_date: None,
        };
        assert_eq!(bill.natural_key(), (118, ChamberCode::Hr, "1234"));
    }

    #[test]
    fn legislator_bioguide_length_check() {
        let legislator = Legislator {
            name: "Jane Doe".into(),
            bioguide: "D000123".into(),
            current_party: Some("D".into()),
            state: Some("MN".into()),
            source_file: "legislators-current.json".into(),
        };
        assert!(legislator.has_well_formed_bioguide());
    }
}
