//! Label document validation
//!
//! Checks run in a fixed order and the first failure wins:
//!
//! 1. `document` and `labels` are present
//! 2. `labels` is not empty
//! 3. no label name is empty or whitespace
//! 4. no two labels share a name
//! 5. every value of a label is on the same page as its first value
//! 6. no `(page, bounding box)` pair appears twice in the document

use labelmeta_core::{find_duplicate_by, LabelData, MetadataError, Result};
use serde_json::Value;
use tracing::debug;

/// Structural validator for label documents
#[derive(Debug, Clone, Copy, Default)]
pub struct LabelValidator;

impl LabelValidator {
    /// Create a validator
    pub fn new() -> Self {
        Self
    }

    /// Validate a parsed label document and decode it
    pub fn validate(&self, document: &Value) -> Result<LabelData> {
        let present = |key: &str| document.get(key).map_or(false, |v| !v.is_null());
        if !present("document") || !present("labels") {
            return Err(MetadataError::InvalidStructure(
                "label document must contain document and labels".to_string(),
            ));
        }

        let data: LabelData = serde_json::from_value(document.clone())
            .map_err(|e| MetadataError::InvalidStructure(e.to_string()))?;

        if data.labels.is_empty() {
            return Err(MetadataError::EmptyLabelFile(data.document));
        }

        self.validate_labels(&data)?;
        debug!(document = %data.document, labels = data.labels.len(), "Label document accepted");
        Ok(data)
    }

    /// Checks 3 to 6 on an already decoded document
    pub fn validate_labels(&self, data: &LabelData) -> Result<()> {
        if data.labels.iter().any(|l| l.label.trim().is_empty()) {
            return Err(MetadataError::InvalidStructure(
                "label name cannot be empty".to_string(),
            ));
        }

        if let Some(dup) = find_duplicate_by(&data.labels, |l| l.label.clone()) {
            return Err(MetadataError::DuplicateLabel(dup.label.clone()));
        }

        for label in &data.labels {
            let Some(first) = label.value.first() else {
                continue;
            };
            if let Some(stray) = label.value.iter().find(|v| v.page != first.page) {
                return Err(MetadataError::CrossPageLabel {
                    label: label.label.clone(),
                    expected: first.page,
                    found: stray.page,
                });
            }
        }

        let boxes: Vec<(&str, u32, &Vec<f64>)> = data
            .labels
            .iter()
            .flat_map(|label| {
                label.value.iter().flat_map(move |value| {
                    value
                        .bounding_boxes
                        .iter()
                        .map(move |bbox| (label.label.as_str(), value.page, bbox))
                })
            })
            .collect();
        if let Some((label, page, _)) = find_duplicate_by(&boxes, |(_, page, bbox)| (*page, *bbox)) {
            return Err(MetadataError::DuplicateBox {
                label: label.to_string(),
                page: *page,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn validate(doc: Value) -> Result<LabelData> {
        LabelValidator::new().validate(&doc)
    }

    #[test]
    fn test_valid_document() {
        let data = validate(json!({
            "document": "receipt.jpg",
            "labels": [
                {"label": "Merchant", "value": [{"page": 1, "boundingBoxes": [[0.1, 0.1, 0.3, 0.1, 0.3, 0.2, 0.1, 0.2]]}]},
                {"label": "Total", "value": [
                    {"page": 1, "boundingBoxes": [[0.5, 0.8, 0.6, 0.8, 0.6, 0.9, 0.5, 0.9]]},
                    {"page": 1, "boundingBoxes": [[0.6, 0.8, 0.7, 0.8, 0.7, 0.9, 0.6, 0.9]]}
                ]}
            ]
        }))
        .unwrap();
        assert_eq!(data.labels.len(), 2);
    }

    #[test]
    fn test_missing_fields() {
        assert!(matches!(
            validate(json!({"labels": []})),
            Err(MetadataError::InvalidStructure(_))
        ));
        assert!(matches!(
            validate(json!({"document": "a.png"})),
            Err(MetadataError::InvalidStructure(_))
        ));
        assert!(matches!(
            validate(json!({"document": "a.png", "labels": null})),
            Err(MetadataError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_wrong_shape_is_invalid_structure() {
        assert!(matches!(
            validate(json!({"document": "a.png", "labels": {"label": "x"}})),
            Err(MetadataError::InvalidStructure(_))
        ));
    }

    #[test]
    fn test_empty_labels() {
        assert_eq!(
            validate(json!({"document": "a.png", "labels": []})).unwrap_err(),
            MetadataError::EmptyLabelFile("a.png".to_string())
        );
    }

    #[test]
    fn test_blank_label_name() {
        for name in ["", "   "] {
            let result = validate(json!({
                "document": "a.png",
                "labels": [{"label": name, "value": []}]
            }));
            assert!(matches!(result, Err(MetadataError::InvalidStructure(_))));
        }
    }

    #[test]
    fn test_duplicate_label_name() {
        let result = validate(json!({
            "document": "a.png",
            "labels": [
                {"label": "Total", "value": []},
                {"label": "Date", "value": []},
                {"label": "Total", "value": []}
            ]
        }));
        assert_eq!(result.unwrap_err(), MetadataError::DuplicateLabel("Total".to_string()));
    }

    #[test]
    fn test_cross_page_label() {
        let result = validate(json!({
            "document": "a.pdf",
            "labels": [{"label": "Total", "value": [
                {"page": 1, "boundingBoxes": [[0, 0, 1, 1]]},
                {"page": 2, "boundingBoxes": [[0, 0, 1, 1]]}
            ]}]
        }));
        assert_eq!(
            result.unwrap_err(),
            MetadataError::CrossPageLabel {
                label: "Total".to_string(),
                expected: 1,
                found: 2
            }
        );
    }

    #[test]
    fn test_duplicate_box_across_labels() {
        let result = validate(json!({
            "document": "a.png",
            "labels": [
                {"label": "A", "value": [{"page": 1, "boundingBoxes": [[0, 0, 1, 1]]}]},
                {"label": "B", "value": [{"page": 1, "boundingBoxes": [[0, 0, 1, 1]]}]}
            ]
        }));
        assert_eq!(
            result.unwrap_err(),
            MetadataError::DuplicateBox {
                label: "A".to_string(),
                page: 1
            }
        );
    }

    #[test]
    fn test_same_box_on_different_pages_is_allowed() {
        let result = validate(json!({
            "document": "a.pdf",
            "labels": [
                {"label": "A", "value": [{"page": 1, "boundingBoxes": [[0, 0, 1, 1]]}]},
                {"label": "B", "value": [{"page": 2, "boundingBoxes": [[0, 0, 1, 1]]}]}
            ]
        }));
        assert!(result.is_ok());
    }

    #[test]
    fn test_order_duplicate_name_before_cross_page() {
        let result = validate(json!({
            "document": "a.pdf",
            "labels": [
                {"label": "A", "value": [{"page": 1, "boundingBoxes": []}, {"page": 3, "boundingBoxes": []}]},
                {"label": "A", "value": []}
            ]
        }));
        assert!(matches!(result, Err(MetadataError::DuplicateLabel(_))));
    }
}
