use crate::common::*;

/// Side lengths of a 3D box along the x, y and z axes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "with-serde", derive(Serialize, Deserialize))]
pub struct Extent<T> {
    pub(crate) dx: T,
    pub(crate) dy: T,
    pub(crate) dz: T,
}

impl<T> Extent<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn dx(&self) -> T {
        self.dx
    }

    pub fn dy(&self) -> T {
        self.dy
    }

    pub fn dz(&self) -> T {
        self.dz
    }
}

