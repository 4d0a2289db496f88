use govdata_types::{ChamberCode, Vote};

use crate::dates::parse_lenient_date;
use crate::xml_scan::scan_first_text;

const TARGETS: &[&str] =
    &["congress", "chamber", "voteId", "rollcallNum", "voteDate", "date", "result", "voteResult"];

/// Extracts a single `Vote` record from the publisher's rollcall XML
///. The per-member breakdown is deliberately not extracted here —
/// it hangs off the `rollcall_votes` table and is populated separately
/// once that table exists.
pub fn parse_rollcall(xml: &str, source_file: &str) -> Option<Vote> {
    let found = scan_first_text(xml, TARGETS);

    let vote_id = found.get("voteid").or_else(|| found.get("rollcallnum")).cloned();
    let Some(vote_id) = vote_id else {
        tracing::warn!(source_file, "rollcall document has no vote id, skipping");
        return None;
    };

    let congress = found.get("congress").and_then(|v| v.parse::<i32>().ok()).unwrap_or_else(|| {
        tracing::warn!(source_file, "rollcall document has no usable congress number");
        0
    });

    let chamber = found.get("chamber").and_then(|v| v.parse::<ChamberCode>().ok()).unwrap_or(ChamberCode::House);

    let vote_date = found.get("votedate").or_else(|| found.get("date")).and_then(|v| parse_lenient_date(v));
    let result = found.get("result").or_else(|| found.get("voteresult")).cloned();

    Some(Vote { source_file: source_file.to_string(), congress, chamber, vote_id, vote_date, result })
}
