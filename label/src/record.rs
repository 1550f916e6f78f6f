//! Raw per-frame records as written by the perception pipeline.

use crate::{common::*, ObjectClass, ObjectObservation, RelationKind, RelationObservation, Vocabulary};

/// An object entry of a `3d_objects/frame_{i}.json` file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectRecord {
    pub certainty: f64,
    pub class_index: i64,
    pub class_name: String,
    pub instance_name: String,
    pub bounding_box: Cuboid_<f64>,
    pub past_bounding_box: Cuboid_<f64>,
}

/// A relation entry of a `spatial_relations/frame_{i}.json` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelationRecord {
    pub subject_index: i64,
    pub object_index: i64,
    pub relation_name: String,
}

impl TryFrom<ObjectRecord> for ObjectObservation {
    type Error = Error;

    fn try_from(from: ObjectRecord) -> Result<Self, Self::Error> {
        let ObjectRecord {
            certainty,
            class_index,
            class_name,
            instance_name,
            bounding_box,
            past_bounding_box,
        } = from;

        let class = match ObjectClass::from_legacy_tag(&class_name) {
            Some(class) => class,
            None => usize::try_from(class_index)
                .ok()
                .and_then(ObjectClass::from_index)
                .ok_or_else(|| {
                    format_err!(
                        "object '{}' has invalid class index {}",
                        instance_name,
                        class_index
                    )
                })?,
        };
        let certainty = R64::try_new(certainty)
            .ok_or_else(|| format_err!("object '{}' has NaN certainty", instance_name))?;
        let bbox: Cuboid<f64> = bounding_box
            .try_into()
            .with_context(|| format!("invalid bounding box of object '{}'", instance_name))?;
        let past_bbox: Cuboid<f64> = past_bounding_box.try_into().with_context(|| {
            format!("invalid past bounding box of object '{}'", instance_name)
        })?;

        Ok(Self {
            certainty,
            class,
            instance_name,
            bbox,
            past_bbox,
        })
    }
}

impl TryFrom<RelationRecord> for RelationObservation {
    type Error = Error;

    fn try_from(from: RelationRecord) -> Result<Self, Self::Error> {
        let RelationRecord {
            subject_index,
            object_index,
            relation_name,
        } = from;
        let subject = usize::try_from(subject_index)
            .with_context(|| format!("invalid subject index {}", subject_index))?;
        let object = usize::try_from(object_index)
            .with_context(|| format!("invalid object index {}", object_index))?;
        let relation = RelationKind::try_from_name(&relation_name)?;
        RelationObservation::new(subject, object, relation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const OBJECT_JSON: &str = r#"{
        "certainty": 0.9,
        "class_index": 3,
        "class_name": "RightHand",
        "instance_name": "RightHand_0",
        "bounding_box": {"x0": 0.0, "x1": 1.0, "y0": 0.0, "y1": 2.0, "z0": 0.0, "z1": 3.0},
        "past_bounding_box": {"x0": 0.0, "x1": 0.0, "y0": 0.0, "y1": 0.0, "z0": 0.0, "z1": 0.0}
    }"#;

    #[test]
    fn hand_tag_overrides_class_index() {
        let record: ObjectRecord = serde_json::from_str(OBJECT_JSON).unwrap();
        let obj: ObjectObservation = record.try_into().unwrap();
        assert_eq!(obj.class, ObjectClass::RightHand);
        assert_eq!(obj.bbox.bounds(), [0.0, 1.0, 0.0, 2.0, 0.0, 3.0]);
    }

    #[test]
    fn class_index_is_used_for_regular_objects() {
        let mut record: ObjectRecord = serde_json::from_str(OBJECT_JSON).unwrap();
        record.class_name = "cup".into();
        record.class_index = 7;
        let obj: ObjectObservation = record.clone().try_into().unwrap();
        assert_eq!(obj.class, ObjectClass::Cup);

        record.class_index = 16;
        assert!(ObjectObservation::try_from(record.clone()).is_err());
        record.class_index = -1;
        assert!(ObjectObservation::try_from(record).is_err());
    }

    #[test]
    fn unordered_bounding_box_is_rejected() {
        let mut record: ObjectRecord = serde_json::from_str(OBJECT_JSON).unwrap();
        record.bounding_box.x0 = 5.0;
        assert!(ObjectObservation::try_from(record).is_err());
    }

    #[test]
    fn relation_record_conversion() {
        let json = r#"{"subject_index": 0, "object_index": 2, "relation_name": "moving together"}"#;
        let record: RelationRecord = serde_json::from_str(json).unwrap();
        let rel: RelationObservation = record.try_into().unwrap();
        assert_eq!(rel.pair(), (0, 2));
        assert_eq!(rel.relation(), RelationKind::MovingTogether);

        let unknown = RelationRecord {
            subject_index: 0,
            object_index: 1,
            relation_name: "next to".into(),
        };
        assert!(RelationObservation::try_from(unknown).is_err());

        let reflexive = RelationRecord {
            subject_index: 1,
            object_index: 1,
            relation_name: "contact".into(),
        };
        assert!(RelationObservation::try_from(reflexive).is_err());
    }
}
