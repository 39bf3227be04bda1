use crate::{Domain, PathInfo};

/// Result of moving a path into another domain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Shift {
    /// The path as seen from the target domain
    pub path: PathInfo,

    /// Jacobian determinant of the shift
    pub jacobian: f32,
}

impl Shift {
    pub fn identity(path: PathInfo) -> Self {
        Self {
            path,
            jacobian: 1.0,
        }
    }

    pub fn p_hat(&self) -> f32 {
        self.path.p_hat()
    }
}

/// Moves paths between sampling domains.
pub trait ShiftMapping {
    /// Shifts `path`, generated in domain `from`, into domain `into`; returns
    /// `None` if the path cannot be generated there.
    fn shift(&self, path: &PathInfo, from: &Domain, into: &Domain)
        -> Option<Shift>;
}
