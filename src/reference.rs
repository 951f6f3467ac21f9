//! §4.1 Reference Resolver — `ReferenceValueSets/*` → `{id: text}` lookup
//! tables, keyed by set name.

use std::collections::HashMap;

use crate::xml_dom::Element;

/// `set name → (id → resolved text)` for every enumeration declared under
/// the document's first `ReferenceValueSets` block.
#[derive(Debug, Default)]
pub struct ReferenceMaps {
    sets: HashMap<String, HashMap<String, String>>,
}

impl ReferenceMaps {
    /// Resolve `id` within `set_name`, or the empty string if either the
    /// set or the id within it is unknown (spec.md §7's `UnknownReference`:
    /// silently treated as empty).
    pub fn resolve<'a>(&'a self, set_name: &str, id: &str) -> &'a str {
        self.sets
            .get(set_name)
            .and_then(|m| m.get(id))
            .map(|s| s.as_str())
            .unwrap_or("")
    }

    pub fn set_len(&self, set_name: &str) -> usize {
        self.sets.get(set_name).map_or(0, |m| m.len())
    }
}

/// Build the reference maps from the document root. Only the first
/// `ReferenceValueSets` block is processed, per spec.md §4.1.
pub fn build_reference_maps(root: &Element) -> ReferenceMaps {
    let mut maps = ReferenceMaps::default();

    let Some(ref_value_sets) = root.child("ReferenceValueSets") else {
        return maps;
    };

    // PartySubTypeValues needs each item's PartyTypeID attribute preserved
    // past the generic pass, to run the Unknown/empty cross-reference after
    // PartyTypeValues itself is known. Collect the raw items here.
    let mut party_subtype_raw: Vec<(String, String, String)> = Vec::new(); // (id, text, party_type_id)

    for set_elem in &ref_value_sets.children {
        let set_name = set_elem.tag.clone();
        let mut mapping = HashMap::new();

        if set_name == "LegalBasisValues" {
            for item in &set_elem.children {
                let Some(id) = item.attr("ID") else { continue };
                let text = item
                    .child("LegalBasisShortRef")
                    .map(|c| c.text_trimmed().to_string())
                    .unwrap_or_default();
                mapping.insert(id.to_string(), text);
            }
        } else if set_name == "PartySubTypeValues" {
            for item in &set_elem.children {
                let Some(id) = item.attr("ID") else { continue };
                let text = item.text_trimmed().to_string();
                let party_type_id = item.attr("PartyTypeID").unwrap_or("").to_string();
                party_subtype_raw.push((id.to_string(), text.clone(), party_type_id));
                mapping.insert(id.to_string(), text);
            }
        } else {
            for item in &set_elem.children {
                let Some(id) = item.attr("ID") else { continue };
                mapping.insert(id.to_string(), item.text_trimmed().to_string());
            }
        }

        maps.sets.insert(set_name, mapping);
    }

    // Cross-reference: a subtype whose text is empty or "Unknown" is
    // replaced by its parent PartyType's text.
    if !party_subtype_raw.is_empty() {
        let party_types = maps.sets.get("PartyTypeValues").cloned().unwrap_or_default();
        let subtype_map = maps
            .sets
            .entry("PartySubTypeValues".to_string())
            .or_default();
        for (id, text, party_type_id) in party_subtype_raw {
            if text.is_empty() || text == "Unknown" {
                let resolved = party_types.get(&party_type_id).cloned().unwrap_or_default();
                subtype_map.insert(id, resolved);
            }
        }
    }

    maps
}
