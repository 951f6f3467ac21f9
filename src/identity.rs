//! §4.5 Identity Parser — `Identity` → one primary `Name` plus any number
//! of `Alias`es.

use std::collections::HashMap;

use crate::constants::name_part_sort_key;
use crate::record::{Alias, AliasQuality, Name, NamePart, PartyRecord};
use crate::reference::ReferenceMaps;
use crate::xml_dom::Element;

/// Build the `NamePartGroup@ID → resolved type name` lookup, scoped to a
/// single `Identity` element. Unknown group IDs (referenced by a
/// `NamePartValue` but never declared) fall back to the literal `"Name"`
/// at lookup time, not here.
fn build_name_part_group_map(identity: &Element, refs: &ReferenceMaps) -> HashMap<String, String> {
    let mut map = HashMap::new();
    let Some(groups) = identity.child("NamePartGroups") else {
        return map;
    };
    for master in groups.children_named("MasterNamePartGroup") {
        for ng in master.children_named("NamePartGroup") {
            let (Some(id), Some(type_id)) = (ng.attr("ID"), ng.attr("NamePartTypeID")) else {
                continue;
            };
            let resolved = refs.resolve("NamePartTypeValues", type_id);
            let type_name = if resolved.is_empty() {
                format!("part_{type_id}")
            } else {
                resolved.to_string()
            };
            map.insert(id.to_string(), type_name);
        }
    }
    map
}

fn is_flag_true(value: Option<&str>) -> bool {
    value.map(|v| v.trim().eq_ignore_ascii_case("true")).unwrap_or(false)
}

/// Run the identity parser on a single `Identity` element, folding any
/// primary name and aliases it carries into `record`.
pub fn fold_identity(identity: &Element, refs: &ReferenceMaps, record: &mut PartyRecord) {
    let npg_map = build_name_part_group_map(identity, refs);

    for alias in identity.children_named("Alias") {
        let alias_type = alias
            .attr("AliasTypeID")
            .map(|id| refs.resolve("AliasTypeValues", id))
            .filter(|s| !s.is_empty())
            .unwrap_or("a.k.a.")
            .to_string();
        let is_primary = is_flag_true(alias.attr("Primary"));
        let alias_quality = if is_flag_true(alias.attr("LowQuality")) {
            AliasQuality::Weak
        } else {
            AliasQuality::Strong
        };

        for doc_name in alias.children_named("DocumentedName") {
            let mut parts_raw: Vec<(u8, NamePart)> = Vec::new();

            for dnp in doc_name.children_named("DocumentedNamePart") {
                for npv in dnp.children_named("NamePartValue") {
                    let value = npv.text_trimmed();
                    if value.is_empty() {
                        continue;
                    }
                    let part_type = npv
                        .attr("NamePartGroupID")
                        .and_then(|gid| npg_map.get(gid))
                        .cloned()
                        .unwrap_or_else(|| "Name".to_string());
                    let script = npv
                        .attr("ScriptID")
                        .map(|id| refs.resolve("ScriptValues", id))
                        .unwrap_or("")
                        .to_string();
                    let sort_key = name_part_sort_key(&part_type.to_lowercase());
                    parts_raw.push((
                        sort_key,
                        NamePart {
                            part_type,
                            part_value: value.to_string(),
                            script,
                        },
                    ));
                }
            }

            parts_raw.sort_by_key(|(key, _)| *key);
            let full_name = parts_raw
                .iter()
                .map(|(_, p)| p.part_value.as_str())
                .collect::<Vec<_>>()
                .join(" ");

            if full_name.is_empty() {
                continue;
            }

            let name_parts: Vec<NamePart> = parts_raw.into_iter().map(|(_, p)| p).collect();

            if is_primary && record.primary_name.is_none() {
                record.primary_name = Some(Name { full_name, name_parts });
            } else {
                record.aliases.push(Alias {
                    alias_type: alias_type.clone(),
                    alias_quality,
                    full_name,
                    name_parts,
                });
            }
        }
    }
}
