//! §4.3 ID Documents Map — `IDRegDocuments/IDRegDocument` → `IdDoc`.

use std::collections::HashMap;

use crate::features::parse_date_period;
use crate::record::IdDoc;
use crate::reference::ReferenceMaps;
use crate::xml_dom::Element;

/// Build the `document id → IdDoc` lookup table. Only the first
/// `IDRegDocuments` block is processed.
pub fn build_id_docs_map(root: &Element, refs: &ReferenceMaps) -> HashMap<String, IdDoc> {
    let mut docs = HashMap::new();

    let Some(docs_elem) = root.child("IDRegDocuments") else {
        return docs;
    };

    for doc in docs_elem.children_named("IDRegDocument") {
        let Some(doc_id) = doc.attr("ID") else { continue };

        let mut id_doc = IdDoc {
            id_type: doc
                .attr("IDRegDocTypeID")
                .map(|id| refs.resolve("IDRegDocTypeValues", id).to_string())
                .unwrap_or_default(),
            ..Default::default()
        };

        for child in &doc.children {
            match child.tag.as_str() {
                "IDRegDocType" => {
                    id_doc.id_type = match child.attr("IDRegDocTypeID") {
                        Some(type_id) => refs.resolve("IDRegDocTypeValues", type_id).to_string(),
                        None => child.text_trimmed().to_string(),
                    };
                }
                "IDRegDocumentID" => {
                    id_doc.id_number = child.text_trimmed().to_string();
                }
                "IssuingCountry" => {
                    if let Some(country_id) = child.attr("CountryID") {
                        id_doc.country = refs.resolve("CountryValues", country_id).to_string();
                    }
                }
                "IDRegDocDateOfIssuance" => {
                    id_doc.issue_date = parse_date_period(child);
                }
                "IDRegDocExpirationDate" => {
                    id_doc.expiry_date = parse_date_period(child);
                }
                _ => {}
            }
        }

        docs.insert(doc_id.to_string(), id_doc);
    }

    docs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reference::build_reference_maps;
    use crate::xml_dom;

    #[test]
    fn refines_type_via_child_element() {
        let xml = br#"
            <Root>
              <ReferenceValueSets>
                <IDRegDocTypeValues>
                  <IDRegDocType ID="1">Passport</IDRegDocType>
                  <IDRegDocType ID="2">National ID</IDRegDocType>
                </IDRegDocTypeValues>
                <CountryValues><Country ID="RU">Russia</Country></CountryValues>
              </ReferenceValueSets>
              <IDRegDocuments>
                <IDRegDocument ID="D1" IDRegDocTypeID="1">
                  <IDRegDocType IDRegDocTypeID="2"/>
                  <IDRegDocumentID>123456</IDRegDocumentID>
                  <IssuingCountry CountryID="RU"/>
                  <IDRegDocDateOfIssuance><Start><From><Year>2001</Year></From></Start></IDRegDocDateOfIssuance>
                </IDRegDocument>
              </IDRegDocuments>
            </Root>
        "#;
        let root = xml_dom::parse(xml).unwrap();
        let refs = build_reference_maps(&root);
        let docs = build_id_docs_map(&root, &refs);
        let d = docs.get("D1").unwrap();
        assert_eq!(d.id_type, "National ID");
        assert_eq!(d.id_number, "123456");
        assert_eq!(d.country, "Russia");
        assert_eq!(d.issue_date, Some("2001".to_string()));
        assert!(!d.is_fraudulent);
    }
}
