//! Top-level orchestration: `bytes → (publication_date, [PartyRecord])`
//! (spec.md §2/§5).

use chrono::{DateTime, NaiveDate, Utc};
use rayon::prelude::*;
use tracing::warn;

use crate::error::ParseError;
use crate::features::fold_features;
use crate::id_docs::build_id_docs_map;
use crate::identity::fold_identity;
use crate::locations::build_locations_map;
use crate::reference::build_reference_maps;
use crate::record::PartyRecord;
use crate::sanctions::build_sanctions_map;
use crate::xml_dom::{self, Element};

/// Output of a single parse: the document's publication date plus every
/// successfully assembled party record, in document order.
#[derive(Debug)]
pub struct ParseOutput {
    pub publication_date: Option<NaiveDate>,
    pub records: Vec<PartyRecord>,
    pub stats: ParseStats,
}

/// Summary counts for the CLI's `info`/`warn` logging (SPEC_FULL.md §6.1).
#[derive(Debug, Default, Clone, Copy)]
pub struct ParseStats {
    pub locations_resolved: usize,
    pub id_docs_resolved: usize,
    pub sanctions_profiles_resolved: usize,
    pub parties_emitted: usize,
    pub parties_skipped: usize,
}

/// Parse a complete SDN Advanced XML document, stamping each record's
/// `source_url` with the spec.md §6 constant.
///
/// Dependency order: build the reference resolver first, then the
/// locations/id-docs/sanctions maps that lean on it, then emit one record
/// per `DistinctParty`. Once the lookup maps are frozen they're shared
/// read-only across a rayon fan-out (spec.md §5); party order is restored
/// afterward by sorting on each party's position in the document.
pub fn parse(bytes: &[u8]) -> Result<ParseOutput, ParseError> {
    parse_with_source_url(bytes, crate::constants::OFAC_SOURCE_URL)
}

/// As [`parse`], but stamps each record's `source_url` with `source_url`
/// instead of the default constant (SPEC_FULL.md §10's `OFAC_SOURCE_URL`
/// override).
pub fn parse_with_source_url(bytes: &[u8], source_url: &str) -> Result<ParseOutput, ParseError> {
    let root = xml_dom::parse(bytes)?;

    let refs = build_reference_maps(&root);
    let locations = build_locations_map(&root, &refs);
    let id_docs = build_id_docs_map(&root, &refs);
    let sanctions = build_sanctions_map(&root, &refs);

    let publication_date = root
        .child("DateOfIssue")
        .map(|e| e.text_trimmed())
        .and_then(parse_date_of_issue);
    let ingestion_timestamp: DateTime<Utc> = Utc::now();

    let parties: Vec<&Element> = root
        .child("DistinctParties")
        .map(|dp| dp.children_named("DistinctParty").collect())
        .unwrap_or_default();

    let mut indexed_records: Vec<(usize, Result<PartyRecord, ParseError>)> = parties
        .into_par_iter()
        .enumerate()
        .map(|(index, party)| {
            (
                index,
                assemble_party(party, &refs, &locations, &id_docs, &sanctions, publication_date, ingestion_timestamp, source_url),
            )
        })
        .collect();

    indexed_records.sort_by_key(|(index, _)| *index);

    let mut records = Vec::with_capacity(indexed_records.len());
    let mut parties_skipped = 0usize;
    for (_, result) in indexed_records {
        match result {
            Ok(Some(record)) => records.push(record),
            Ok(None) => parties_skipped += 1,
            Err(err) => return Err(err),
        }
    }

    let stats = ParseStats {
        locations_resolved: locations.len(),
        id_docs_resolved: id_docs.len(),
        sanctions_profiles_resolved: sanctions.len(),
        parties_emitted: records.len(),
        parties_skipped,
    };

    Ok(ParseOutput { publication_date, records, stats })
}

/// Assemble one `PartyRecord` from a `DistinctParty` element. Returns
/// `Ok(None)` if the party is missing `@FixedRef` (skip with a warning,
/// per spec.md §7's `MissingFixedRef`), and `Err` only for a malformed
/// `@FixedRef` (`BadFixedRef`, fatal).
fn assemble_party(
    party: &Element,
    refs: &crate::reference::ReferenceMaps,
    locations: &std::collections::HashMap<String, crate::record::Address>,
    id_docs: &std::collections::HashMap<String, crate::record::IdDoc>,
    sanctions: &std::collections::HashMap<String, crate::sanctions::SanctionsAccum>,
    publication_date: Option<NaiveDate>,
    ingestion_timestamp: DateTime<Utc>,
    source_url: &str,
) -> Result<Option<PartyRecord>, ParseError> {
    let Some(raw_fixed_ref) = party.attr("FixedRef") else {
        warn!("DistinctParty missing FixedRef, skipping");
        return Ok(None);
    };

    let sdn_entry_id: i64 = raw_fixed_ref
        .trim()
        .parse()
        .map_err(|source| ParseError::BadFixedRef {
            raw: raw_fixed_ref.to_string(),
            source,
        })?;

    let mut record = PartyRecord::new(sdn_entry_id, publication_date, ingestion_timestamp, source_url);

    if let Some(profile) = party.child("Profile") {
        record.sdn_type = profile
            .attr("PartySubTypeID")
            .map(|id| refs.resolve("PartySubTypeValues", id))
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        if let Some(profile_id) = profile.attr("ID") {
            if let Some(accum) = sanctions.get(profile_id) {
                record.programs = accum.programs.clone();
                record.legal_authorities = accum.legal_authorities.clone();
                record.remarks = accum.remarks.clone();
            }
        }

        for identity in profile.children_named("Identity") {
            fold_identity(identity, refs, &mut record);
        }

        fold_features(profile, refs, locations, id_docs, &mut record);
    }

    record.collapse_empty_structs();
    Ok(Some(record))
}

/// `DateOfIssue` is a plain `YYYY-MM-DD` string at the document root.
fn parse_date_of_issue(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL_PARTY: &str = r#"
        <Sanctions>
          <DateOfIssue>2026-07-20</DateOfIssue>
          <ReferenceValueSets>
            <PartyTypeValues><PartyType ID="4">Individual</PartyType></PartyTypeValues>
            <PartySubTypeValues><PartySubType ID="4" PartyTypeID="4">Individual</PartySubType></PartySubTypeValues>
            <NamePartTypeValues><NamePartType ID="1">Last Name</NamePartType></NamePartTypeValues>
          </ReferenceValueSets>
          <DistinctParties>
            <DistinctParty FixedRef="42">
              <Profile ID="9" PartySubTypeID="4">
                <Identity>
                  <NamePartGroups>
                    <MasterNamePartGroup><NamePartGroup ID="g1" NamePartTypeID="1"/></MasterNamePartGroup>
                  </NamePartGroups>
                  <Alias Primary="true">
                    <DocumentedName>
                      <DocumentedNamePart><NamePartValue NamePartGroupID="g1">SMITH</NamePartValue></DocumentedNamePart>
                    </DocumentedName>
                  </Alias>
                </Identity>
              </Profile>
            </DistinctParty>
          </DistinctParties>
        </Sanctions>
    "#;

    #[test]
    fn parses_minimal_party() {
        let output = parse(MINIMAL_PARTY.as_bytes()).unwrap();
        assert_eq!(output.publication_date, NaiveDate::from_ymd_opt(2026, 7, 20));
        assert_eq!(output.records.len(), 1);
        let record = &output.records[0];
        assert_eq!(record.sdn_entry_id, 42);
        assert_eq!(record.sdn_type.as_deref(), Some("Individual"));
        assert_eq!(record.primary_name.as_ref().unwrap().full_name, "SMITH");
        assert!(record.aliases.is_empty());
        assert!(record.vessel_info.is_none());
        assert!(record.aircraft_info.is_none());
    }

    #[test]
    fn party_without_fixed_ref_is_skipped() {
        let xml = r#"
            <Sanctions>
              <DistinctParties>
                <DistinctParty>
                  <Profile ID="1"/>
                </DistinctParty>
                <DistinctParty FixedRef="5">
                  <Profile ID="2"/>
                </DistinctParty>
              </DistinctParties>
            </Sanctions>
        "#;
        let output = parse(xml.as_bytes()).unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].sdn_entry_id, 5);
    }

    #[test]
    fn non_integer_fixed_ref_is_fatal() {
        let xml = r#"
            <Sanctions>
              <DistinctParties>
                <DistinctParty FixedRef="not-a-number">
                  <Profile ID="1"/>
                </DistinctParty>
              </DistinctParties>
            </Sanctions>
        "#;
        let err = parse(xml.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::BadFixedRef { .. }));
    }

    #[test]
    fn malformed_xml_is_fatal() {
        let err = parse(b"<Unclosed>").unwrap_err();
        assert!(matches!(err, ParseError::MalformedXml(_)));
    }

    #[test]
    fn parse_stamps_default_source_url() {
        let output = parse(MINIMAL_PARTY.as_bytes()).unwrap();
        assert_eq!(output.records[0].source_url, crate::constants::OFAC_SOURCE_URL);
    }

    #[test]
    fn parse_with_source_url_overrides_default() {
        let override_url = "https://example.test/sanctions/sdn_advanced.xml";
        let output = parse_with_source_url(MINIMAL_PARTY.as_bytes(), override_url).unwrap();
        assert_eq!(output.records.len(), 1);
        assert_eq!(output.records[0].source_url, override_url);
        assert_ne!(output.records[0].source_url, crate::constants::OFAC_SOURCE_URL);
    }
}
