use govdata_types::{Bill, ChamberCode};

use crate::dates::parse_lenient_date;
use crate::xml_scan::scan_first_text;

const TARGETS: &[&str] =
    &["billNumber", "title", "congress", "originChamber", "billType", "fullName", "introducedDate"];

/// Extracts a single `Bill` record from the publisher's bill-status XML
///. Returns `None` (with a warning) if the document carries no
/// recognizable bill number — that is the one field without which a
/// natural key cannot be formed.
pub fn parse_bill_status(xml: &str, source_file: &str) -> Option<Bill> {
    let found = scan_first_text(xml, TARGETS);

    let Some(bill_number) = found.get("billnumber").cloned() else {
        tracing::warn!(source_file, "bill-status document has no billNumber, skipping");
        return None;
    };

    let congress = found.get("congress").and_then(|v| v.parse::<i32>().ok()).unwrap_or_else(|| {
        tracing::warn!(source_file, "bill-status document has no usable congress number");
        0
    });

    let chamber = found
        .get("originchamber")
        .and_then(|v| v.parse::<ChamberCode>().ok())
        .or_else(|| found.get("billtype").and_then(|v| chamber_from_bill_type(v)))
        .unwrap_or(ChamberCode::Hr);

    Some(Bill {
        source_file: source_file.to_string(),
        congress,
        chamber,
        bill_number,
        title: found.get("title").cloned(),
        sponsor_name: found.get("fullname").cloned(),
        introduced_date: found.get("introduceddate").and_then(|v| parse_lenient_date(v)),
    })
}

fn chamber_from_bill_type(bill_type: &str) -> Option<ChamberCode> {
    let prefix: String = bill_type.chars().take_while(|c| c.is_alphabetic()).collect();
    match prefix.to_ascii_uppercase().as_str() {
        "HR" | "HJRES" | "HCONRES" | "HRES" => Some(ChamberCode::Hr),
        "S" | "SJRES" | "SCONRES" | "SRES" => Some(ChamberCode::S),
        _ => None,
    }
}
