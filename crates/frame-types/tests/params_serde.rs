use frame_types::{JointType, MemberRole, ParameterSet};

#[test]
fn partial_json_fills_dialog_defaults() {
    let params: ParameterSet =
        serde_json::from_str(r#"{ "height": 60.0, "rail_count": 3 }"#).unwrap();
    assert_eq!(params.height, 60.0);
    assert_eq!(params.rail_count, 3);
    assert_eq!(params.width, 47.0);
    assert_eq!(params.joint_type, JointType::Butt);
    assert_eq!(params.finger_count, 5);
}

#[test]
fn joint_type_uses_tagged_form() {
    let params = ParameterSet {
        joint_type: JointType::MortiseTenon,
        ..ParameterSet::default()
    };
    let json = serde_json::to_value(&params).unwrap();
    assert_eq!(json["joint_type"]["type"], "MortiseTenon");

    let back: ParameterSet = serde_json::from_value(json).unwrap();
    assert_eq!(back, params);
}

#[test]
fn middle_rail_role_carries_index() {
    let json = serde_json::to_string(&MemberRole::MiddleRail { index: 1 }).unwrap();
    assert_eq!(json, r#"{"type":"MiddleRail","index":1}"#);
}
