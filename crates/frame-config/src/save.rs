use std::path::Path;

use frame_types::ParameterSet;
use serde::Serialize;

use crate::errors::SaveError;
use crate::metadata::PresetMetadata;

/// Format identifier written into every preset.
pub const FORMAT_NAME: &str = "plygen-preset";

/// Current preset format version.
///
/// Version 1 stored the joint type as its dialog label; version 2 stores
/// the tagged enum form.
pub const FORMAT_VERSION: u32 = 2;

#[derive(Debug, Serialize)]
struct PresetFile<'a> {
    format: &'static str,
    version: u32,
    metadata: &'a PresetMetadata,
    parameters: &'a ParameterSet,
}

/// Serialize a preset to pretty-printed JSON.
pub fn save_preset(params: &ParameterSet, metadata: &PresetMetadata) -> Result<String, SaveError> {
    let file = PresetFile {
        format: FORMAT_NAME,
        version: FORMAT_VERSION,
        metadata,
        parameters: params,
    };
    Ok(serde_json::to_string_pretty(&file)?)
}

pub fn save_preset_file(
    path: &Path,
    params: &ParameterSet,
    metadata: &PresetMetadata,
) -> Result<(), SaveError> {
    let json = save_preset(params, metadata)?;
    std::fs::write(path, json)?;
    tracing::debug!(path = %path.display(), name = %metadata.name, "preset saved");
    Ok(())
}
