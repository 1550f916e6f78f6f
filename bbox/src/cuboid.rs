use crate::{common::*, Extent};
#[cfg(feature = "with-serde")]
use crate::Cuboid_;

/// Axis-aligned 3D bounding box.
///
/// The bounds are stored in `x0, x1, y0, y1, z0, z1` order and every
/// maximum is no less than its minimum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(
    feature = "with-serde",
    derive(Serialize, Deserialize),
    serde(
        try_from = "Cuboid_<T>",
        into = "Cuboid_<T>",
        bound(
            serialize = "T: Serialize + Clone",
            deserialize = "T: Deserialize<'de> + Copy + Num + PartialOrd"
        )
    )
)]
pub struct Cuboid<T> {
    pub(crate) x0: T,
    pub(crate) x1: T,
    pub(crate) y0: T,
    pub(crate) y1: T,
    pub(crate) z0: T,
    pub(crate) z1: T,
}

impl<T> Cuboid<T>
where
    T: Copy + Num + PartialOrd,
{
    pub fn try_from_bounds(bounds: [T; 6]) -> Result<Self> {
        let [x0, x1, y0, y1, z0, z1] = bounds;
        ensure!(x1 >= x0, "x1 >= x0 must hold");
        ensure!(y1 >= y0, "y1 >= y0 must hold");
        ensure!(z1 >= z0, "z1 >= z0 must hold");
        Ok(Self {
            x0,
            x1,
            y0,
            y1,
            z0,
            z1,
        })
    }

    pub fn x0(&self) -> T {
        self.x0
    }

    pub fn x1(&self) -> T {
        self.x1
    }

    pub fn y0(&self) -> T {
        self.y0
    }

    pub fn y1(&self) -> T {
        self.y1
    }

    pub fn z0(&self) -> T {
        self.z0
    }

    pub fn z1(&self) -> T {
        self.z1
    }

    /// The bounds in `[x0, x1, y0, y1, z0, z1]` order.
    pub fn bounds(&self) -> [T; 6] {
        [self.x0, self.x1, self.y0, self.y1, self.z0, self.z1]
    }

    /// Side lengths along each axis.
    pub fn extent(&self) -> Extent<T> {
        Extent {
            dx: self.x1 - self.x0,
            dy: self.y1 - self.y0,
            dz: self.z1 - self.z0,
        }
    }

    pub fn centroid(&self) -> [T; 3] {
        let two = T::one() + T::one();
        [
            self.x0 + (self.x1 - self.x0) / two,
            self.y0 + (self.y1 - self.y0) / two,
            self.z0 + (self.z1 - self.z0) / two,
        ]
    }

    pub fn is_degenerate(&self) -> bool {
        let zero = T::zero();
        let Extent { dx, dy, dz } = self.extent();
        dx == zero || dy == zero || dz == zero
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn cuboid_rejects_unordered_bounds() {
        assert!(Cuboid::try_from_bounds([0.0, 1.0, 0.0, 1.0, 0.0, 1.0]).is_ok());
        assert!(Cuboid::try_from_bounds([1.0, 0.0, 0.0, 1.0, 0.0, 1.0]).is_err());
        assert!(Cuboid::try_from_bounds([0.0, 1.0, 2.0, 1.0, 0.0, 1.0]).is_err());
        assert!(Cuboid::try_from_bounds([0.0, 1.0, 0.0, 1.0, 0.5, 0.4]).is_err());
    }

    #[test]
    fn cuboid_extent_and_centroid() {
        let cuboid = Cuboid::try_from_bounds([1.0, 4.0, -2.0, 2.0, 0.0, 10.0]).unwrap();
        let extent = cuboid.extent();
        assert_abs_diff_eq!(extent.dx(), 3.0);
        assert_abs_diff_eq!(extent.dy(), 4.0);
        assert_abs_diff_eq!(extent.dz(), 10.0);

        let [cx, cy, cz] = cuboid.centroid();
        assert_abs_diff_eq!(cx, 2.5);
        assert_abs_diff_eq!(cy, 0.0);
        assert_abs_diff_eq!(cz, 5.0);
    }

    #[test]
    fn default_cuboid_is_degenerate() {
        let cuboid: Cuboid<f64> = Default::default();
        assert!(cuboid.is_degenerate());
        assert_eq!(cuboid.bounds(), [0.0; 6]);
    }

    #[cfg(feature = "with-serde")]
    #[test]
    fn cuboid_deserialization_checks_bounds() {
        let good = r#"{"x0": 0.0, "x1": 1.0, "y0": 0.0, "y1": 1.0, "z0": 0.0, "z1": 1.0}"#;
        let cuboid: Cuboid<f64> = serde_json::from_str(good).unwrap();
        assert_eq!(cuboid.bounds(), [0.0, 1.0, 0.0, 1.0, 0.0, 1.0]);

        let bad = r#"{"x0": 2.0, "x1": 1.0, "y0": 0.0, "y1": 1.0, "z0": 0.0, "z1": 1.0}"#;
        assert!(serde_json::from_str::<Cuboid<f64>>(bad).is_err());
    }
}
