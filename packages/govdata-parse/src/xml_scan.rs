use std::collections::HashMap;

use quick_xml::events::Event;
use quick_xml::reader::Reader;

/// Scans an XML document for the *first* text content under each of
/// `targets` (bare local element names, case-insensitive), ignoring
/// namespace prefixes and attributes. Built for the publisher's flat
/// bill-status/rollcall schemas rather than as a general XML toolkit —
/// deeply nested or repeated elements return only their first
/// occurrence — the first matching element, not an aggregate.
///
/// Returns an empty map (never an error) on malformed XML, so callers
/// can treat "nothing found" and "couldn't parse" identically per the
/// parser's resilience contract.
pub fn scan_first_text(xml: &str, targets: &[&str]) -> HashMap<String, String> {
    let mut found = HashMap::new();
    let mut reader = Reader::from_str(xml);
    reader.config_mut().trim_text(true);

    let mut current: Option<String> = None;
    let mut buf = Vec::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Eof) => break,
            Ok(Event::Start(tag)) => {
                let name = local_name(tag.name().as_ref());
                current = targets
                    .iter()
                    .find(|t| t.eq_ignore_ascii_case(&name) && !found.contains_key(&t.to_lowercase()))
                    .map(|t| t.to_lowercase());
            }
            Ok(Event::Text(text)) => {
                if let Some(key) = current.take() {
                    if let Ok(decoded) = text.decode() {
                        let value = decoded.trim();
                        if !value.is_empty() {
                            found.insert(key, value.to_string());
                        }
                    }
                }
            }
            Ok(Event::End(_)) => {
                current = None;
            }
            Err(err) => {
                tracing::warn!(error = %err, "xml parse error, stopping scan early");
                break;
            }
            _ => {}
        }
        buf.clear();
    }

    found
}

fn local_name(qualified: &[u8]) -> String {
    let text = String::from_utf8_lossy(qualified);
    text.rsplit(':').next().unwrap_or(&text).to_string()
}
