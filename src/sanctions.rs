//! §4.4 Sanctions Map — `SanctionsEntries/SanctionsEntry` → per-profile
//! accumulated programs, legal authorities, and remarks.
//!
//! Follows spec.md's adopted redesign rather than the two competing
//! extraction paths in the original source: programs come from
//! `SanctionsMeasure/Comment`, legal authorities from `EntryEvent`'s
//! `LegalBasisID` attribute, and remarks from a top-level `Remarks` child
//! (last write wins across entries sharing a `ProfileID`).

use std::collections::HashMap;

use crate::reference::ReferenceMaps;
use crate::xml_dom::Element;

#[derive(Debug, Default, Clone)]
pub struct SanctionsAccum {
    pub programs: Vec<String>,
    pub legal_authorities: Vec<String>,
    pub remarks: Option<String>,
}

fn push_deduped(list: &mut Vec<String>, value: &str) {
    if value.is_empty() {
        return;
    }
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}

/// Build the `Profile ID → SanctionsAccum` lookup table. Entries sharing a
/// `ProfileID` are merged additively (deduped lists, last-write-wins
/// remarks); only the first `SanctionsEntries` block is processed.
pub fn build_sanctions_map(root: &Element, refs: &ReferenceMaps) -> HashMap<String, SanctionsAccum> {
    let mut map: HashMap<String, SanctionsAccum> = HashMap::new();

    let Some(entries_elem) = root.child("SanctionsEntries") else {
        return map;
    };

    for entry in entries_elem.children_named("SanctionsEntry") {
        let Some(profile_id) = entry.attr("ProfileID") else { continue };
        let accum = map.entry(profile_id.to_string()).or_default();

        for child in &entry.children {
            match child.tag.as_str() {
                "SanctionsMeasure" => {
                    if let Some(comment) = child.child("Comment") {
                        push_deduped(&mut accum.programs, comment.text_trimmed());
                    }
                }
                "EntryEvent" => {
                    if let Some(legal_basis_id) = child.attr("LegalBasisID") {
                        let authority = refs.resolve("LegalBasisValues", legal_basis_id);
                        push_deduped(&mut accum.legal_authorities, authority);
                    }
                }
                "Remarks" => {
                    let remark = child.text_trimmed();
                    if !remark.is_empty() {
                        accum.remarks = Some(remark.to_string());
                    }
                }
                _ => {}
            }
        }
    }

    map
}
