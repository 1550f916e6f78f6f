use crate::{common::*, Cuboid};

/// Unchecked cuboid bounds, as they appear in serialized annotations.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
pub struct Cuboid_<T> {
    pub x0: T,
    pub x1: T,
    pub y0: T,
    pub y1: T,
    pub z0: T,
    pub z1: T,
}

impl<T> TryFrom<Cuboid_<T>> for Cuboid<T>
where
    T: Copy + Num + PartialOrd,
{
    type Error = anyhow::Error;

    fn try_from(from: Cuboid_<T>) -> Result<Self, Self::Error> {
        (&from).try_into()
    }
}

impl<T> TryFrom<&Cuboid_<T>> for Cuboid<T>
where
    T: Copy + Num + PartialOrd,
{
    type Error = anyhow::Error;

    fn try_from(from: &Cuboid_<T>) -> Result<Self, Self::Error> {
        let Cuboid_ {
            x0,
            x1,
            y0,
            y1,
            z0,
            z1,
        } = *from;
        Cuboid::try_from_bounds([x0, x1, y0, y1, z0, z1])
    }
}

impl<T> From<Cuboid<T>> for Cuboid_<T> {
    fn from(from: Cuboid<T>) -> Self {
        let Cuboid {
            x0,
            x1,
            y0,
            y1,
            z0,
            z1,
        } = from;
        Self {
            x0,
            x1,
            y0,
            y1,
            z0,
            z1,
        }
    }
}
