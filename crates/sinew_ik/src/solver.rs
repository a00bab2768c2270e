use sinew_rig::Skeleton;

use crate::fabrik::FabrikIk;
use crate::foot::FootIk;
use crate::look_at::LookAtIk;
use crate::two_bone::TwoBoneIk;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IkSolverKind {
    Foot,
    TwoBone,
    Fabrik,
    LookAt,
}

/// Any one of the four solvers, for callers that want a single type.
///
/// Solvers are plain data plus a `solve` routine; this enum only dispatches.
#[derive(Debug, Clone, PartialEq)]
pub enum IkSolver {
    Foot(FootIk),
    TwoBone(TwoBoneIk),
    Fabrik(FabrikIk),
    LookAt(LookAtIk),
}

impl IkSolver {
    pub fn solve(&self, skeleton: &mut Skeleton) {
        match self {
            Self::Foot(s) => s.solve(skeleton),
            Self::TwoBone(s) => s.solve(skeleton),
            Self::Fabrik(s) => s.solve(skeleton),
            Self::LookAt(s) => s.solve(skeleton),
        }
    }

    #[must_use]
    pub fn kind(&self) -> IkSolverKind {
        match self {
            Self::Foot(_) => IkSolverKind::Foot,
            Self::TwoBone(_) => IkSolverKind::TwoBone,
            Self::Fabrik(_) => IkSolverKind::Fabrik,
            Self::LookAt(_) => IkSolverKind::LookAt,
        }
    }

    #[must_use]
    pub fn weight(&self) -> f32 {
        match self {
            Self::Foot(s) => s.weight,
            Self::TwoBone(s) => s.weight,
            Self::Fabrik(s) => s.weight,
            Self::LookAt(s) => s.weight,
        }
    }

    pub fn set_weight(&mut self, weight: f32) {
        match self {
            Self::Foot(s) => s.weight = weight,
            Self::TwoBone(s) => s.weight = weight,
            Self::Fabrik(s) => s.weight = weight,
            Self::LookAt(s) => s.weight = weight,
        }
    }
}

impl From<FootIk> for IkSolver {
    fn from(solver: FootIk) -> Self {
        Self::Foot(solver)
    }
}

impl From<TwoBoneIk> for IkSolver {
    fn from(solver: TwoBoneIk) -> Self {
        Self::TwoBone(solver)
    }
}

impl From<FabrikIk> for IkSolver {
    fn from(solver: FabrikIk) -> Self {
        Self::Fabrik(solver)
    }
}

impl From<LookAtIk> for IkSolver {
    fn from(solver: LookAtIk) -> Self {
        Self::LookAt(solver)
    }
}
