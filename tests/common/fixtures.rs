//! Test fixtures

use serde_json::{json, Value};

/// First bytes of a PNG file
pub const PNG: &[u8] = &[0x89, 0x50, 0x4e, 0x47, 0x0d, 0x0a, 0x1a, 0x0a];

/// First bytes of a JPEG file
pub const JPEG: &[u8] = &[0xff, 0xd8, 0xff, 0xe0, 0x00, 0x10];

/// First bytes of a PDF file
pub const PDF: &[u8] = b"%PDF-1.7\n";

/// A label on page 1 with a single box starting at `x`
pub fn label(name: &str, x: f64) -> Value {
    json!({
        "label": name,
        "key": null,
        "value": [{
            "page": 1,
            "text": name.to_lowercase(),
            "boundingBoxes": [[x, 0.1, x + 0.1, 0.1, x + 0.1, 0.2, x, 0.2]]
        }]
    })
}

/// A label document
pub fn label_document(document: &str, labels: Vec<Value>) -> String {
    json!({
        "$schema": "https://schema.example/labels.json",
        "document": document,
        "labels": labels
    })
    .to_string()
}

/// A generator document in the current shape
pub fn generator_document(tags: &[&str], generate_count: u32) -> String {
    let generators: Vec<Value> = tags
        .iter()
        .enumerate()
        .map(|(i, tag)| {
            json!({
                "id": format!("gen-{}", i),
                "tag": {"name": tag, "color": "#00ff00", "type": "string", "format": "alphanumeric"},
                "regionIds": [format!("region-{}", i)]
            })
        })
        .collect();
    json!({
        "generators": generators,
        "generatorSettings": {"generateCount": generate_count}
    })
    .to_string()
}
