use std::path::Path;

use frame_types::ParameterSet;
use serde::Deserialize;

use crate::errors::LoadError;
use crate::metadata::PresetMetadata;
use crate::save::{FORMAT_NAME, FORMAT_VERSION};

/// Top-level preset layout. Parameters stay untyped until migrated.
#[derive(Debug, Clone, Deserialize)]
struct PresetFileRaw {
    format: String,
    version: u32,
    metadata: PresetMetadata,
    parameters: serde_json::Value,
}

/// Deserialize a preset from a JSON string.
///
/// Checks the format identifier and version, then migrates older
/// parameter layouts to the current one. The parameters are returned
/// as stored; validating them is left to the caller.
pub fn load_preset(json: &str) -> Result<(ParameterSet, PresetMetadata), LoadError> {
    let raw: PresetFileRaw =
        serde_json::from_str(json).map_err(|e| LoadError::ParseError(e.to_string()))?;

    if raw.format != FORMAT_NAME {
        return Err(LoadError::UnknownFormat(raw.format));
    }

    if raw.version > FORMAT_VERSION {
        return Err(LoadError::FutureVersion {
            file_version: raw.version,
            supported_version: FORMAT_VERSION,
        });
    }

    let parameters = if raw.version < FORMAT_VERSION {
        tracing::info!(from = raw.version, to = FORMAT_VERSION, "migrating preset");
        crate::migrate::migrate(raw.parameters, raw.version, FORMAT_VERSION)?
    } else {
        raw.parameters
    };

    let params: ParameterSet =
        serde_json::from_value(parameters).map_err(|e| LoadError::ParseError(e.to_string()))?;
    Ok((params, raw.metadata))
}

pub fn load_preset_file(path: &Path) -> Result<(ParameterSet, PresetMetadata), LoadError> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| LoadError::Io(format!("{}: {e}", path.display())))?;
    load_preset(&json)
}
