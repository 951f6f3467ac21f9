use chrono::NaiveDate;
use ofac_sdn::matcher;
use ofac_sdn::parser;

fn fixture(name: &str) -> Vec<u8> {
    std::fs::read(format!("tests/fixtures/sdn/{name}")).expect("fixture should exist")
}

#[test]
fn full_document_resolves_cross_references_and_skips_missing_fixed_ref() {
    let bytes = fixture("full_document.xml");
    let output = parser::parse(&bytes).expect("well-formed fixture should parse");

    assert_eq!(output.publication_date, NaiveDate::from_ymd_opt(2026, 7, 20));
    assert_eq!(output.stats.parties_skipped, 1);
    assert_eq!(output.records.len(), 2);

    let usama = output
        .records
        .iter()
        .find(|r| r.sdn_entry_id == 42)
        .expect("party 42 present");

    assert_eq!(usama.sdn_type.as_deref(), Some("Individual"));
    assert_eq!(usama.primary_name.as_ref().unwrap().full_name, "BIN LADIN USAMA");
    assert_eq!(usama.programs, vec!["SDGT".to_string(), "IFSR".to_string()]);
    assert_eq!(usama.legal_authorities, vec!["E.O. 13224".to_string()]);
    assert_eq!(usama.remarks.as_deref(), Some("Linked to designated network."));
    assert_eq!(usama.addresses.len(), 1);
    assert_eq!(usama.addresses[0].city, "Beirut");
    assert_eq!(usama.dates_of_birth, vec!["1957-07-30".to_string()]);
    assert!(usama.vessel_info.is_none(), "blank vessel comment should collapse to null");

    let smith = output
        .records
        .iter()
        .find(|r| r.sdn_entry_id == 100)
        .expect("party 100 present");
    assert_eq!(smith.places_of_birth, vec!["Beirut, Lebanon".to_string()]);
    assert!(smith.addresses.is_empty());
    assert!(smith.programs.is_empty());

    // publication_date and ingestion_timestamp are identical across records
    // from a single parse.
    assert_eq!(usama.publication_date, smith.publication_date);
    assert_eq!(usama.ingestion_timestamp, smith.ingestion_timestamp);
}

#[test]
fn parsing_same_bytes_twice_is_stable_except_ingestion_timestamp() {
    let bytes = fixture("full_document.xml");
    let first = parser::parse(&bytes).unwrap();
    let second = parser::parse(&bytes).unwrap();

    assert_eq!(first.records.len(), second.records.len());
    for (a, b) in first.records.iter().zip(second.records.iter()) {
        assert_eq!(a.sdn_entry_id, b.sdn_entry_id);
        assert_eq!(a.primary_name, b.primary_name);
        assert_eq!(a.programs, b.programs);
    }
}

#[test]
fn malformed_xml_aborts_with_typed_error() {
    let err = parser::parse(b"<Sanctions><Broken></Sanctions>").unwrap_err();
    assert!(matches!(err, ofac_sdn::error::ParseError::MalformedXml(_)));
}

#[test]
fn parsed_corpus_is_screenable() {
    let bytes = fixture("full_document.xml");
    let output = parser::parse(&bytes).unwrap();

    let hits = matcher::screen(&output.records, "usama bin ladin", 2, 5);
    assert_eq!(hits.len(), 1);
    assert_eq!(hits[0].sdn_entry_id, 42);
    assert_eq!(hits[0].match_score, 1);
}
