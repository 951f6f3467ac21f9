//! §4.2 Locations Map — `Locations/Location` → `Address`.

use std::collections::HashMap;

use crate::record::Address;
use crate::reference::ReferenceMaps;
use crate::xml_dom::Element;

/// Build the `location id → Address` lookup table. Only the first
/// `Locations` block is processed.
pub fn build_locations_map(root: &Element, refs: &ReferenceMaps) -> HashMap<String, Address> {
    let mut locations = HashMap::new();

    let Some(locations_elem) = root.child("Locations") else {
        return locations;
    };

    for loc in locations_elem.children_named("Location") {
        let Some(loc_id) = loc.attr("ID") else { continue };
        let mut addr = Address::default();

        for child in &loc.children {
            match child.tag.as_str() {
                "LocationCountry" => {
                    if let Some(country_id) = child.attr("CountryID") {
                        addr.country = refs.resolve("CountryValues", country_id).to_string();
                    }
                }
                "LocationPart" => {
                    apply_location_part(child, refs, &mut addr);
                }
                _ => {}
            }
        }

        locations.insert(loc_id.to_string(), addr);
    }

    locations
}

fn apply_location_part(loc_part: &Element, refs: &ReferenceMaps, addr: &mut Address) {
    let Some(part_type_id) = loc_part.attr("LocPartTypeID") else { return };
    let part_type_name = refs.resolve("LocPartTypeValues", part_type_id).to_lowercase();

    let part_value = loc_part
        .child("LocationPartValue")
        .map(|v| v.text_trimmed())
        .unwrap_or("");

    if part_value.is_empty() {
        return;
    }

    if part_type_name.contains("city") {
        addr.city = part_value.to_string();
    } else if part_type_name.contains("address") {
        addr.address = part_value.to_string();
    } else if part_type_name.contains("state") || part_type_name.contains("province") {
        addr.state_province = part_value.to_string();
    } else if part_type_name.contains("postal") || part_type_name.contains("zip") {
        addr.postal_code = part_value.to_string();
    } else if part_type_name.contains("region") {
        addr.region = part_value.to_string();
    } else if addr.address.is_empty() {
        addr.address = part_value.to_string();
    } else {
        addr.address = format!("{}, {}", addr.address, part_value);
    }
}
