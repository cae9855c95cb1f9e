//! JSON snapshots of the shape list.
//!
//! A plain data round-trip for the demo binary and external collaborators —
//! not durable persistence (no versioning or migration).

use std::path::Path;

use sketchkit_core::error::ExportError;

use crate::model::Shape;
use crate::store::ShapeStore;

/// Serializes the store's shapes, in insertion order, as a JSON array.
pub fn to_json(store: &ShapeStore) -> Result<String, ExportError> {
    let shapes: Vec<&Shape> = store.iter().collect();
    serde_json::to_string_pretty(&shapes).map_err(|e| ExportError::Serialization {
        reason: e.to_string(),
    })
}

/// Rebuilds a store from a JSON shape array. Ids are taken verbatim; the
/// store's id generator resumes past the highest id present.
pub fn from_json(json: &str) -> Result<ShapeStore, ExportError> {
    let shapes: Vec<Shape> = serde_json::from_str(json).map_err(|e| ExportError::Serialization {
        reason: e.to_string(),
    })?;
    let mut store = ShapeStore::new();
    for shape in shapes {
        store.insert(shape).map_err(|e| ExportError::Serialization {
            reason: e.to_string(),
        })?;
    }
    Ok(store)
}

/// Writes the store snapshot to a file.
pub fn save_to_file(store: &ShapeStore, path: impl AsRef<Path>) -> Result<(), ExportError> {
    let json = to_json(store)?;
    std::fs::write(path, json)?;
    Ok(())
}

/// Reads a store snapshot from a file.
pub fn load_from_file(path: impl AsRef<Path>) -> Result<ShapeStore, ExportError> {
    let json = std::fs::read_to_string(path)?;
    from_json(&json)
}
