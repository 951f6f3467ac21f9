//! Module-level constants shared by the parser: the fixed source URL and
//! the ordered lookup tables spec.md §9 calls out as associative lists
//! rather than hash maps, because first-match ordering is load-bearing
//! (e.g. "vessel type" must be tested before a bare "type" would match).

/// Recorded verbatim on every emitted record.
pub const OFAC_SOURCE_URL: &str =
    "https://sanctionslistservice.ofac.treas.gov/api/PublicationPreview/exports/SDN_ADVANCED.XML";

/// Lowercased name-part type → sort key used to order name parts before
/// joining them into `full_name` (spec.md §4.5). Anything not listed here
/// sorts last (key 99).
pub const NAME_PART_ORDER: &[(&str, u8)] = &[
    ("last name", 0),
    ("last", 0),
    ("entity name", 0),
    ("vessel name", 0),
    ("aircraft name", 0),
    ("first name", 1),
    ("first", 1),
    ("middle name", 2),
    ("middle", 2),
    ("patronymic", 3),
    ("matronymic", 4),
];

pub const NAME_PART_ORDER_DEFAULT: u8 = 99;

/// Substrings of a lowercased feature-type name → vessel record field.
/// Tested in order; the first match wins (spec.md §4.6).
pub const VESSEL_FEATURES: &[(&str, &str)] = &[
    ("vessel call sign", "vessel_call_sign"),
    ("vessel type", "vessel_type"),
    ("vessel tonnage", "vessel_tonnage"),
    ("gross registered tonnage", "vessel_grt"),
    ("vessel flag", "vessel_flag"),
    ("vessel owner", "vessel_owner"),
    ("mmsi", "vessel_mmsi"),
    ("imo", "vessel_imo"),
];

/// Substrings of a lowercased feature-type name → aircraft record field.
/// Tested in order; the first match wins (spec.md §4.6).
pub const AIRCRAFT_FEATURES: &[(&str, &str)] = &[
    ("aircraft construction number", "aircraft_serial"),
    ("aircraft manufacturer's serial number", "aircraft_serial"),
    ("aircraft model", "aircraft_type"),
    ("aircraft operator", "aircraft_operator"),
    ("aircraft tail number", "aircraft_tail_number"),
    ("aircraft type", "aircraft_type"),
    ("aircraft manufacturer", "aircraft_manufacturer"),
];

/// Look up a name-part sort key by (lowercased) part type.
pub fn name_part_sort_key(part_type_lower: &str) -> u8 {
    NAME_PART_ORDER
        .iter()
        .find(|(key, _)| *key == part_type_lower)
        .map(|(_, rank)| *rank)
        .unwrap_or(NAME_PART_ORDER_DEFAULT)
}
