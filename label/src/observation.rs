use crate::{common::*, ObjectClass, RelationKind};

/// One detected object in one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectObservation {
    pub certainty: R64,
    pub class: ObjectClass,
    /// Instance name, unique within a frame and stable across a take.
    pub instance_name: String,
    pub bbox: Cuboid<f64>,
    /// Bounding box in the previous frame. Degenerate if unknown.
    pub past_bbox: Cuboid<f64>,
}

impl ObjectObservation {
    /// Creates an observation with unit certainty and degenerate boxes.
    pub fn new(class: ObjectClass, instance_name: impl Into<String>) -> Self {
        Self {
            certainty: r64(1.0),
            class,
            instance_name: instance_name.into(),
            bbox: Cuboid::default(),
            past_bbox: Cuboid::default(),
        }
    }

    pub fn with_bbox(self, bbox: Cuboid<f64>) -> Self {
        Self { bbox, ..self }
    }
}

/// A directed relation between two objects of the same frame.
///
/// The endpoints are positions in the frame's object list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationObservation {
    subject: usize,
    object: usize,
    relation: RelationKind,
}

impl RelationObservation {
    pub fn new(subject: usize, object: usize, relation: RelationKind) -> Result<Self> {
        ensure!(
            subject != object,
            "relation '{}' must connect two distinct objects, but both ends are {}",
            relation.as_ref(),
            subject
        );
        Ok(Self {
            subject,
            object,
            relation,
        })
    }

    pub fn subject(&self) -> usize {
        self.subject
    }

    pub fn object(&self) -> usize {
        self.object
    }

    pub fn relation(&self) -> RelationKind {
        self.relation
    }

    /// The ordered `(subject, object)` pair.
    pub fn pair(&self) -> (usize, usize) {
        (self.subject, self.object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn self_relation_is_rejected() {
        assert!(RelationObservation::new(0, 1, RelationKind::Contact).is_ok());
        assert!(RelationObservation::new(2, 2, RelationKind::Contact).is_err());
    }

    #[test]
    fn object_observation_defaults() {
        let obj = ObjectObservation::new(ObjectClass::Cup, "cup_2");
        assert_eq!(obj.instance_name, "cup_2");
        assert_eq!(obj.bbox.bounds(), [0.0; 6]);
        assert!(obj.past_bbox.is_degenerate());
    }
}
