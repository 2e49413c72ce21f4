//! Planar descriptors: axis-sign flag sets like `"-x +z"` used to pin
//! deformation on grid boundary planes.

use std::fmt;

use thiserror::Error;
use voxform_geom::{GridBounds, Vec3};

use crate::types::AxisFlags;

/// Distance from a boundary plane within which a vertex counts as on it.
/// Shared with the tile-edge suppression tolerance in the deform engine.
pub const PLANE_EPSILON: f32 = 0.1;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("planar expression '{raw}' is only allowed to be 'none' or contain -x x +x -y y +y -z z +z")]
pub struct PlanarError {
    pub raw: String,
}

/// One flag per boundary plane: negative, center, and positive per axis.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Planar {
    pub nx: bool,
    pub x: bool,
    pub px: bool,
    pub ny: bool,
    pub y: bool,
    pub py: bool,
    pub nz: bool,
    pub z: bool,
    pub pz: bool,
}

impl Planar {
    pub const NONE: Planar = Planar {
        nx: false,
        x: false,
        px: false,
        ny: false,
        y: false,
        py: false,
        nz: false,
        z: false,
        pz: false,
    };

    /// Parses a whitespace-separated planar expression.
    ///
    /// `none` anywhere clears every flag; any token outside the nine
    /// axis-sign tokens is a configuration error carrying the raw input.
    pub fn parse(raw: &str) -> Result<Planar, PlanarError> {
        let mut p = Planar::NONE;
        let mut none = false;
        for token in raw.to_lowercase().split_whitespace() {
            match token {
                "none" => none = true,
                "-x" => p.nx = true,
                "x" => p.x = true,
                "+x" => p.px = true,
                "-y" => p.ny = true,
                "y" => p.y = true,
                "+y" => p.py = true,
                "-z" => p.nz = true,
                "z" => p.z = true,
                "+z" => p.pz = true,
                _ => {
                    return Err(PlanarError {
                        raw: raw.to_string(),
                    });
                }
            }
        }
        if none { Ok(Planar::NONE) } else { Ok(p) }
    }

    #[inline]
    pub fn any(self) -> bool {
        self != Planar::NONE
    }

    /// Field-wise OR of two planars.
    #[inline]
    pub fn or(self, rhs: Planar) -> Planar {
        Planar {
            nx: self.nx || rhs.nx,
            x: self.x || rhs.x,
            px: self.px || rhs.px,
            ny: self.ny || rhs.ny,
            y: self.y || rhs.y,
            py: self.py || rhs.py,
            nz: self.nz || rhs.nz,
            z: self.z || rhs.z,
            pz: self.pz || rhs.pz,
        }
    }

    /// Combines two optional planars, falling back to `default` when both
    /// are absent.
    pub fn combine(a: Option<Planar>, b: Option<Planar>, default: Option<Planar>) -> Option<Planar> {
        match (a, b) {
            (None, None) => default,
            (Some(p), None) | (None, Some(p)) => Some(p),
            (Some(p1), Some(p2)) => Some(p1.or(p2)),
        }
    }

    /// Which axes of `pos` lie on a plane selected by this planar, given
    /// the grid's vertex-space extents.
    pub fn boundary_flags(self, pos: Vec3, bounds: &GridBounds) -> AxisFlags {
        let lo = bounds.vertex_min();
        let hi = bounds.vertex_max();
        let mid = bounds.center();
        let on = |flag_lo: bool, flag_mid: bool, flag_hi: bool, p: f32, l: f32, m: f32, h: f32| {
            (flag_lo && (p - l).abs() < PLANE_EPSILON)
                || (flag_mid && (p - m).abs() < PLANE_EPSILON)
                || (flag_hi && (h - p).abs() < PLANE_EPSILON)
        };
        AxisFlags {
            x: on(self.nx, self.x, self.px, pos.x, lo.x, mid.x, hi.x),
            y: on(self.ny, self.y, self.py, pos.y, lo.y, mid.y, hi.y),
            z: on(self.nz, self.z, self.pz, pos.z, lo.z, mid.z, hi.z),
        }
    }
}

impl fmt::Display for Planar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts: Vec<&str> = Vec::new();
        if self.nx {
            parts.push("-x");
        }
        if self.x {
            parts.push("x");
        }
        if self.px {
            parts.push("+x");
        }
        if self.ny {
            parts.push("-y");
        }
        if self.y {
            parts.push("y");
        }
        if self.py {
            parts.push("+y");
        }
        if self.nz {
            parts.push("-z");
        }
        if self.z {
            parts.push("z");
        }
        if self.pz {
            parts.push("+z");
        }
        write!(f, "{}", parts.join(" "))
    }
}
