use sinew_rig::{BlendShapeWeights, Skeleton};

use crate::fabrik::FabrikIk;
use crate::foot::FootIk;
use crate::look_at::LookAtIk;
use crate::solver::{IkSolver, IkSolverKind};
use crate::two_bone::TwoBoneIk;

/// Owns every IK solver of a character and runs them in a fixed order:
/// foot placement, two-bone, FABRIK, then look-at.
///
/// Feet go first because they move the pelvis; look-at goes last so heads
/// and eyes aim from wherever the body ended up.
///
/// `global_weight` scales every solver's weight for the duration of one
/// [`IkManager::solve`] call. The stored weights are left untouched.
#[derive(Debug, Clone)]
pub struct IkManager {
    pub enabled: bool,
    pub global_weight: f32,

    pub foot: Vec<FootIk>,
    pub two_bone: Vec<TwoBoneIk>,
    pub fabrik: Vec<FabrikIk>,
    pub look_at: Vec<LookAtIk>,
}

impl Default for IkManager {
    fn default() -> Self {
        Self::new()
    }
}

impl IkManager {
    #[must_use]
    pub fn new() -> Self {
        Self {
            enabled: true,
            global_weight: 1.0,
            foot: Vec::new(),
            two_bone: Vec::new(),
            fabrik: Vec::new(),
            look_at: Vec::new(),
        }
    }

    /// Registers a solver and returns its kind and index within that kind.
    pub fn add(&mut self, solver: impl Into<IkSolver>) -> (IkSolverKind, usize) {
        match solver.into() {
            IkSolver::Foot(s) => push(&mut self.foot, s, IkSolverKind::Foot),
            IkSolver::TwoBone(s) => push(&mut self.two_bone, s, IkSolverKind::TwoBone),
            IkSolver::Fabrik(s) => push(&mut self.fabrik, s, IkSolverKind::Fabrik),
            IkSolver::LookAt(s) => push(&mut self.look_at, s, IkSolverKind::LookAt),
        }
    }

    #[must_use]
    pub fn solver_count(&self) -> usize {
        self.foot.len() + self.two_bone.len() + self.fabrik.len() + self.look_at.len()
    }

    pub fn clear(&mut self) {
        self.foot.clear();
        self.two_bone.clear();
        self.fabrik.clear();
        self.look_at.clear();
    }

    pub fn solve(&mut self, skeleton: &mut Skeleton) {
        self.solve_with_blend_shapes(skeleton, None);
    }

    /// Like [`IkManager::solve`], and additionally writes eye blend shapes
    /// for every look-at solver tagged with an eye side.
    pub fn solve_with_blend_shapes(
        &mut self,
        skeleton: &mut Skeleton,
        mut blend_shapes: Option<&mut BlendShapeWeights>,
    ) {
        if !self.enabled {
            return;
        }
        let global = self.global_weight;

        solve_scaled(&mut self.foot, global, |s| s.solve(skeleton));
        solve_scaled(&mut self.two_bone, global, |s| s.solve(skeleton));
        solve_scaled(&mut self.fabrik, global, |s| s.solve(skeleton));
        solve_scaled(&mut self.look_at, global, |s| {
            if let Some(weights) = blend_shapes.as_deref_mut() {
                s.write_blend_shapes(skeleton, weights);
            }
            s.solve(skeleton);
        });
    }
}

fn push<S>(solvers: &mut Vec<S>, solver: S, kind: IkSolverKind) -> (IkSolverKind, usize) {
    solvers.push(solver);
    (kind, solvers.len() - 1)
}

trait Weighted {
    fn weight_mut(&mut self) -> &mut f32;
}

impl Weighted for FootIk {
    fn weight_mut(&mut self) -> &mut f32 {
        &mut self.weight
    }
}

impl Weighted for TwoBoneIk {
    fn weight_mut(&mut self) -> &mut f32 {
        &mut self.weight
    }
}

impl Weighted for FabrikIk {
    fn weight_mut(&mut self) -> &mut f32 {
        &mut self.weight
    }
}

impl Weighted for LookAtIk {
    fn weight_mut(&mut self) -> &mut f32 {
        &mut self.weight
    }
}

/// Runs each solver with its weight temporarily multiplied by `global`.
fn solve_scaled<S: Weighted>(solvers: &mut [S], global: f32, mut solve: impl FnMut(&S)) {
    for solver in solvers {
        let stored = *solver.weight_mut();
        *solver.weight_mut() = stored * global;
        solve(&*solver);
        *solver.weight_mut() = stored;
    }
}
