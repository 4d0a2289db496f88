use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the four chamber codes publishers use in URL templates and
/// in the `chamber` column of the parsed records. `Hr` and `House` are
/// distinct codes (different publishers spell the lower chamber
/// differently) rather than aliases of one value — a record's natural
/// key is defined over whichever code the source document carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChamberCode {
    Hr,
    House,
    Senate,
    S,
}

impl ChamberCode {
    pub const ALL: [ChamberCode; 4] = [
        ChamberCode::Hr,
        ChamberCode::House,
        ChamberCode::Senate,
        ChamberCode::S,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ChamberCode::Hr => "hr",
            ChamberCode::House => "house",
            ChamberCode::Senate => "senate",
            ChamberCode::S => "s",
        }
    }

    pub fn is_lower(&self) -> bool {
        matches!(self, ChamberCode::Hr | ChamberCode::House)
    }
}

impl fmt::Display for ChamberCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChamberCode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "hr" => Ok(ChamberCode::Hr),
            "house" => Ok(ChamberCode::House),
            "senate" => Ok(ChamberCode::Senate),
            "s" => Ok(ChamberCode::S),
            other => Err(format!("unknown chamber code: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_str() {
        for code in ChamberCode::ALL {
            let parsed: ChamberCode = code.as_str().parse().unwrap();
            assert_eq!(parsed, code);
        }
    }

    #[test]
    fn rejects_unknown_code() {
        assert!("assembly".parse::<ChamberCode>().is_err());
    }
}
