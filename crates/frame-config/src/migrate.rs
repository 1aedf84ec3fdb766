use frame_types::JointType;
use serde_json::Value;

use crate::errors::LoadError;

/// Apply format migrations from `from_version` to `to_version`.
///
/// Migrations run one step at a time: v1 to v2, v2 to v3, and so on.
pub fn migrate(mut parameters: Value, from_version: u32, to_version: u32) -> Result<Value, LoadError> {
    let mut version = from_version;
    while version < to_version {
        parameters = match version {
            1 => migrate_v1_to_v2(parameters)?,
            _ => {
                return Err(LoadError::MigrationFailed {
                    from: version,
                    to: to_version,
                    reason: format!("no migration path from v{version}"),
                })
            }
        };
        version += 1;
    }
    Ok(parameters)
}

/// v1 stored `joint_type` as the dialog label string.
fn migrate_v1_to_v2(mut parameters: Value) -> Result<Value, LoadError> {
    let failed = |reason: String| LoadError::MigrationFailed {
        from: 1,
        to: 2,
        reason,
    };

    let Some(fields) = parameters.as_object_mut() else {
        return Err(failed("parameters are not an object".to_string()));
    };

    if let Some(Value::String(label)) = fields.get("joint_type") {
        let joint = JointType::from_label(label)
            .ok_or_else(|| failed(format!("unknown joint label {label:?}")))?;
        let migrated = serde_json::to_value(joint).map_err(|e| failed(e.to_string()))?;
        fields.insert("joint_type".to_string(), migrated);
    }

    Ok(parameters)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn v1_label_becomes_tagged_joint() {
        let migrated = migrate(json!({ "joint_type": "Mortise & Tenon" }), 1, 2).unwrap();
        assert_eq!(migrated["joint_type"], json!({ "type": "MortiseTenon" }));
    }

    #[test]
    fn missing_joint_field_is_left_alone() {
        let migrated = migrate(json!({ "height": 40.0 }), 1, 2).unwrap();
        assert_eq!(migrated, json!({ "height": 40.0 }));
    }

    #[test]
    fn unknown_label_fails() {
        let err = migrate(json!({ "joint_type": "Dovetail" }), 1, 2).unwrap_err();
        assert!(matches!(err, LoadError::MigrationFailed { from: 1, to: 2, .. }));
    }

    #[test]
    fn version_zero_has_no_path() {
        assert!(migrate(json!({}), 0, 2).is_err());
    }
}
