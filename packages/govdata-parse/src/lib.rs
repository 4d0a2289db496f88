//! The parser: three conservative record extractors, each given
//! a document's text and source file name, each resilient to malformed
//! input — zero records plus a warning, never a fatal error.

mod bill_status;
mod dates;
mod legislator;
mod rollcall;
mod xml_scan;

pub use bill_status::parse_bill_status;
pub use legislator::parse_legislators;
pub use rollcall::parse_rollcall;
