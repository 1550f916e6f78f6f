//! Closed vocabularies of object classes, relations, actions and hand sides.
//!
//! The variant order defines the index used in one-hot encodings and must
//! not be changed once datasets are generated.

use crate::common::*;

/// Index and name lookups shared by every vocabulary.
pub trait Vocabulary
where
    Self: 'static + Sized + Copy + PartialEq + Debug + IntoEnumIterator + EnumCount + AsRef<str>,
{
    /// Position of the entry in the vocabulary.
    fn index(self) -> usize {
        Self::iter().take_while(|entry| *entry != self).count()
    }

    fn from_index(index: usize) -> Option<Self> {
        Self::iter().nth(index)
    }

    fn name(&self) -> &str {
        self.as_ref()
    }

    fn from_name(name: &str) -> Option<Self> {
        Self::iter().find(|entry| entry.as_ref() == name)
    }

    fn try_from_index(index: usize) -> Result<Self> {
        Self::from_index(index).ok_or_else(|| {
            format_err!(
                "index {} is out of range for a vocabulary of size {}",
                index,
                Self::COUNT
            )
        })
    }

    fn try_from_name(name: &str) -> Result<Self> {
        Self::from_name(name).ok_or_else(|| format_err!("unknown vocabulary entry '{}'", name))
    }
}

/// Detected object classes.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum ObjectClass {
    #[strum(serialize = "bowl")]
    Bowl,
    #[strum(serialize = "knife")]
    Knife,
    #[strum(serialize = "screwdriver")]
    Screwdriver,
    #[strum(serialize = "cuttingboard")]
    CuttingBoard,
    #[strum(serialize = "whisk")]
    Whisk,
    #[strum(serialize = "hammer")]
    Hammer,
    #[strum(serialize = "bottle")]
    Bottle,
    #[strum(serialize = "cup")]
    Cup,
    #[strum(serialize = "banana")]
    Banana,
    #[strum(serialize = "cereals")]
    Cereals,
    #[strum(serialize = "sponge")]
    Sponge,
    #[strum(serialize = "woodenwedge")]
    WoodenWedge,
    #[strum(serialize = "saw")]
    Saw,
    #[strum(serialize = "harddrive")]
    HardDrive,
    #[strum(serialize = "left_hand")]
    LeftHand,
    #[strum(serialize = "right_hand")]
    RightHand,
}

impl Vocabulary for ObjectClass {}

impl ObjectClass {
    /// Resolves the reserved class-name tags emitted by the hand tracker.
    ///
    /// Records carrying these tags are assigned the hand classes regardless
    /// of their class index.
    pub fn from_legacy_tag(class_name: &str) -> Option<Self> {
        match class_name {
            "RightHand" => Some(Self::RightHand),
            "LeftHand" => Some(Self::LeftHand),
            _ => None,
        }
    }

    /// Swaps the left and right hand classes.
    pub fn mirrored(self) -> Self {
        match self {
            Self::LeftHand => Self::RightHand,
            Self::RightHand => Self::LeftHand,
            other => other,
        }
    }
}

/// Pairwise relation types, including the synthetic temporal relation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
pub enum RelationKind {
    #[strum(serialize = "contact")]
    Contact,
    #[strum(serialize = "above")]
    Above,
    #[strum(serialize = "below")]
    Below,
    #[strum(serialize = "left of")]
    LeftOf,
    #[strum(serialize = "right of")]
    RightOf,
    #[strum(serialize = "behind of")]
    BehindOf,
    #[strum(serialize = "in front of")]
    InFrontOf,
    #[strum(serialize = "inside")]
    Inside,
    #[strum(serialize = "surround")]
    Surround,
    #[strum(serialize = "moving together")]
    MovingTogether,
    #[strum(serialize = "halting together")]
    HaltingTogether,
    #[strum(serialize = "fixed moving together")]
    FixedMovingTogether,
    #[strum(serialize = "getting close")]
    GettingClose,
    #[strum(serialize = "moving apart")]
    MovingApart,
    #[strum(serialize = "stable")]
    Stable,
    #[strum(serialize = "temporal")]
    Temporal,
}

impl Vocabulary for RelationKind {}

impl RelationKind {
    /// Swaps "left of" and "right of".
    pub fn mirrored(self) -> Self {
        match self {
            Self::LeftOf => Self::RightOf,
            Self::RightOf => Self::LeftOf,
            other => other,
        }
    }
}

/// Hand actions annotated in the ground truth segmentation.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[strum(serialize_all = "lowercase")]
pub enum Action {
    Idle,
    Approach,
    Retreat,
    Lift,
    Place,
    Hold,
    Pour,
    Cut,
    Hammer,
    Saw,
    Stir,
    Screw,
    Drink,
    Wipe,
}

impl Vocabulary for Action {}

/// The hand a graph is labelled for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    PartialOrd,
    Ord,
    Serialize,
    Deserialize,
    AsRefStr,
    EnumString,
    EnumIter,
    EnumCount,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum HandSide {
    Left,
    Right,
}

impl Vocabulary for HandSide {}
