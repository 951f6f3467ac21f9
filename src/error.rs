//! Typed, fatal failure modes of the parser (spec.md §7).
//!
//! Everything else spec.md §7 names — a party missing `FixedRef`, an
//! unresolved reference ID, an alias with no non-empty name parts — is
//! explicitly non-fatal and never surfaces as a `ParseError`; it's handled
//! inline with a `tracing::warn!` or a silent fallback where it occurs.

use thiserror::Error;

use crate::xml_dom::XmlError;

#[derive(Debug, Error)]
pub enum ParseError {
    #[error("malformed XML")]
    MalformedXml(#[from] XmlError),

    #[error("DistinctParty@FixedRef {raw:?} is not a base-10 integer")]
    BadFixedRef {
        raw: String,
        #[source]
        source: std::num::ParseIntError,
    },
}
