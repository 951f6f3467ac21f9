//! §4.6 Feature Folder, §4.7 Location Apply, §4.8 Date Period Decoder.

use std::collections::HashMap;

use crate::constants::{AIRCRAFT_FEATURES, VESSEL_FEATURES};
use crate::record::{Address, Aircraft, IdDoc, PartyRecord, Vessel};
use crate::reference::ReferenceMaps;
use crate::xml_dom::Element;

/// §4.8 — extract the earliest representable date from a `DatePeriod`
/// element. Boundaries are walked in document order; the first with a
/// non-empty `Year` wins. Returns `None` if no boundary has a year.
pub fn parse_date_period(date_period: &Element) -> Option<String> {
    for boundary in &date_period.children {
        if boundary.tag != "Start" && boundary.tag != "End" {
            continue;
        }
        let Some(from) = boundary.child("From") else { continue };

        let year = from.child("Year").map(|e| e.text_trimmed()).unwrap_or("");
        if year.is_empty() {
            continue;
        }
        let month = from
            .child("Month")
            .map(|e| e.text_trimmed())
            .filter(|s| !s.is_empty());
        let day = from
            .child("Day")
            .map(|e| e.text_trimmed())
            .filter(|s| !s.is_empty());

        return Some(match (month, day) {
            (Some(m), Some(d)) => format!("{year}-{m:0>2}-{d:0>2}"),
            (Some(m), None) => format!("{year}-{m:0>2}"),
            _ => year.to_string(),
        });
    }
    None
}

/// §4.7 — route a resolved location to either `places_of_birth` or
/// `addresses`, depending on the referencing feature's type name.
fn apply_location(loc: &Address, ft_name: &str, record: &mut PartyRecord) {
    if ft_name.contains("birth") && ft_name.contains("place") {
        let pieces: Vec<&str> = [loc.city.as_str(), loc.state_province.as_str(), loc.country.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect();
        let pob = pieces.join(", ");
        if !pob.is_empty() {
            record.push_place_of_birth(&pob);
        }
    } else if !loc.is_empty() {
        record.addresses.push(loc.clone());
    }
}

/// §4.6 — fold every `Feature`/`FeatureVersion` on a `Profile` element into
/// `record`.
pub fn fold_features(
    profile: &Element,
    refs: &ReferenceMaps,
    locations: &HashMap<String, Address>,
    id_docs: &HashMap<String, IdDoc>,
    record: &mut PartyRecord,
) {
    let mut vessel_acc: HashMap<&'static str, String> = HashMap::new();
    let mut aircraft_acc: HashMap<&'static str, String> = HashMap::new();
    let mut additional_sanctions: Vec<String> = Vec::new();

    for feature in profile.children_named("Feature") {
        let ft_name = feature
            .attr("FeatureTypeID")
            .map(|id| refs.resolve("FeatureTypeValues", id).to_lowercase())
            .unwrap_or_default();

        for feature_version in feature.children_named("FeatureVersion") {
            let mut comment = String::new();

            for child in &feature_version.children {
                match child.tag.as_str() {
                    "Comment" => comment = child.text_trimmed().to_string(),
                    "DatePeriod" => {
                        if let Some(date_val) = parse_date_period(child) {
                            if ft_name.contains("birth") && ft_name.contains("date") {
                                record.push_date_of_birth(&date_val);
                            }
                        }
                    }
                    "VersionDetail" => {
                        apply_version_detail(child, &ft_name, refs, locations, id_docs, record);
                    }
                    "VersionLocation" => {
                        if let Some(loc_id) = child.attr("LocationID") {
                            if let Some(loc) = locations.get(loc_id) {
                                apply_location(loc, &ft_name, record);
                            }
                        }
                    }
                    _ => {}
                }
            }

            if ft_name.contains("gender") && !comment.is_empty() {
                record.gender = Some(comment.clone());
            }
            if ft_name.contains("title") && !comment.is_empty() {
                record.title = Some(comment.clone());
            }
            if ft_name.contains("additional sanctions") && !comment.is_empty() {
                additional_sanctions.push(comment.clone());
            }

            if !comment.is_empty() {
                for (key, field) in VESSEL_FEATURES {
                    if ft_name.contains(key) {
                        vessel_acc.insert(field, comment.clone());
                        break;
                    }
                }
                for (key, field) in AIRCRAFT_FEATURES {
                    if ft_name.contains(key) {
                        aircraft_acc.insert(field, comment.clone());
                        break;
                    }
                }
            }
        }
    }

    if !vessel_acc.is_empty() {
        record.vessel_info = Some(Vessel {
            vessel_type: vessel_acc.get("vessel_type").cloned(),
            vessel_flag: vessel_acc.get("vessel_flag").cloned(),
            vessel_owner: vessel_acc.get("vessel_owner").cloned(),
            vessel_tonnage: vessel_acc.get("vessel_tonnage").cloned(),
            vessel_grt: vessel_acc.get("vessel_grt").cloned(),
            vessel_call_sign: vessel_acc.get("vessel_call_sign").cloned(),
            vessel_mmsi: vessel_acc.get("vessel_mmsi").cloned(),
            vessel_imo: vessel_acc.get("vessel_imo").cloned(),
        });
    }

    if !aircraft_acc.is_empty() {
        record.aircraft_info = Some(Aircraft {
            aircraft_type: aircraft_acc.get("aircraft_type").cloned(),
            aircraft_manufacturer: aircraft_acc.get("aircraft_manufacturer").cloned(),
            aircraft_serial: aircraft_acc.get("aircraft_serial").cloned(),
            aircraft_tail_number: aircraft_acc.get("aircraft_tail_number").cloned(),
            aircraft_operator: aircraft_acc.get("aircraft_operator").cloned(),
        });
    }

    if !additional_sanctions.is_empty() {
        record.additional_sanctions_info = Some(additional_sanctions.join("; "));
    }
}

fn apply_version_detail(
    version_detail: &Element,
    ft_name: &str,
    refs: &ReferenceMaps,
    locations: &HashMap<String, Address>,
    id_docs: &HashMap<String, IdDoc>,
    record: &mut PartyRecord,
) {
    if let Some(country_id) = version_detail.attr("CountryID") {
        let country_name = refs.resolve("CountryValues", country_id);
        if !country_name.is_empty() {
            if ft_name.contains("national") {
                record.push_nationality(country_name);
            } else if ft_name.contains("citizen") {
                record.push_citizenship(country_name);
            }
        }
    }

    for child in &version_detail.children {
        match child.tag.as_str() {
            "LocationID" => {
                let loc_id = child.text_trimmed();
                if !loc_id.is_empty() {
                    if let Some(loc) = locations.get(loc_id) {
                        apply_location(loc, ft_name, record);
                    }
                }
            }
            "IDRegDocumentReference" => {
                if let Some(doc_id) = child.attr("DocumentID") {
                    if let Some(doc) = id_docs.get(doc_id) {
                        record.id_documents.push(doc.clone());
                    }
                }
            }
            _ => {}
        }
    }
}
