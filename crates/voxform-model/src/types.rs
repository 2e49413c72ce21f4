use serde::Deserialize;

/// Index into the ordered base-material catalog.
#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub struct MaterialId(pub u16);

/// Which side of a face is rendered.
///
/// The output format has no native back-face render mode, so `Back` is
/// realized at emission time by swapping two opposite corners.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
    Double,
}

/// Lighting interpolation mode of a base material.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Lighting {
    /// Two triangle normals per quad, creased along the diagonal.
    #[default]
    Flat,
    /// Per-corner normals used verbatim (pre-averaged upstream).
    Smooth,
    /// Per-face choice: smooth-flagged faces render smooth, others flat.
    Both,
    /// One blended normal for the whole quad (no diagonal crease).
    Quad,
}

/// Per-axis boolean flags, used for clamp/flatten vertex constraints.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub struct AxisFlags {
    pub x: bool,
    pub y: bool,
    pub z: bool,
}

impl AxisFlags {
    #[inline]
    pub fn any(self) -> bool {
        self.x || self.y || self.z
    }

    #[inline]
    pub fn or(self, rhs: AxisFlags) -> AxisFlags {
        AxisFlags {
            x: self.x || rhs.x,
            y: self.y || rhs.y,
            z: self.z || rhs.z,
        }
    }
}
