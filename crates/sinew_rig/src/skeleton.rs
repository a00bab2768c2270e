use glam::{Mat4, Quat, Vec3};
use rustc_hash::FxHashMap;
use sinew_core::{Result, SinewError};

use crate::transform::Transform;

/// Compile-time bone limit, sized for the GPU skinning buffer.
pub const MAX_BONES: usize = 256;

#[derive(Debug, Clone)]
pub struct Bone {
    pub name: String,
    /// Parent bone index. Always smaller than this bone's own index.
    pub parent: Option<usize>,
    /// Transforms mesh-space vertices into this bone's bind-pose space.
    pub inverse_bind_matrix: Mat4,
    pub local: Transform,
}

/// An ordered bone hierarchy with a lazily recomputed model-space cache.
///
/// Bones are stored in topological order (`parent < index`), so one forward
/// pass over the array is enough to compose every model-space matrix: a
/// bone's parent has always been computed before the bone itself.
///
/// # Caching
///
/// Every local-transform write marks the cache dirty. [`Skeleton::update_matrices`]
/// recomputes only when dirty, so repeated queries within one frame cost a
/// single O(n) pass. Queries on the cache (`model_matrix`, `model_position`,
/// ...) read whatever was last computed; call `update_matrices` first when
/// freshness matters.
///
/// Missing bones are never fatal: out-of-range indices make writes a no-op
/// and reads return `None`.
#[derive(Debug, Clone)]
pub struct Skeleton {
    pub name: String,

    bones: Vec<Bone>,
    name_to_index: FxHashMap<String, usize>,
    capacity: usize,

    // === Runtime Data ===
    model_matrices: Vec<Mat4>,
    dirty: bool,
}

impl Skeleton {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self::with_capacity_limit(name, MAX_BONES)
    }

    /// Creates a skeleton holding at most `capacity` bones (never more than [`MAX_BONES`]).
    #[must_use]
    pub fn with_capacity_limit(name: &str, capacity: usize) -> Self {
        let capacity = capacity.min(MAX_BONES);
        Self {
            name: name.to_string(),
            bones: Vec::with_capacity(capacity),
            name_to_index: FxHashMap::default(),
            capacity,
            model_matrices: Vec::with_capacity(capacity),
            dirty: true,
        }
    }

    // ========================================================================
    // Construction
    // ========================================================================

    /// Appends a bone with an identity local transform and inverse bind matrix.
    ///
    /// Fails when the skeleton is full or when `parent` does not refer to an
    /// already stored bone.
    pub fn add_bone(&mut self, name: &str, parent: Option<usize>) -> Result<usize> {
        self.add_bone_with_bind(name, parent, Mat4::IDENTITY)
    }

    pub fn add_bone_with_bind(
        &mut self,
        name: &str,
        parent: Option<usize>,
        inverse_bind_matrix: Mat4,
    ) -> Result<usize> {
        let index = self.bones.len();

        if index >= self.capacity {
            log::warn!(
                "Skeleton '{}' is full ({} bones), rejecting bone '{name}'",
                self.name,
                self.capacity
            );
            return Err(SinewError::SkeletonFull {
                capacity: self.capacity,
            });
        }

        if let Some(parent) = parent
            && parent >= index
        {
            log::warn!(
                "Skeleton '{}': bone '{name}' names parent {parent}, which does not precede it",
                self.name
            );
            return Err(SinewError::InvalidParent { parent, index });
        }

        // First registration keeps the name.
        self.name_to_index.entry(name.to_string()).or_insert(index);
        self.bones.push(Bone {
            name: name.to_string(),
            parent,
            inverse_bind_matrix,
            local: Transform::IDENTITY,
        });
        self.dirty = true;

        Ok(index)
    }

    pub fn set_inverse_bind_matrix(&mut self, index: usize, matrix: Mat4) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.inverse_bind_matrix = matrix;
        }
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn bone(&self, index: usize) -> Option<&Bone> {
        self.bones.get(index)
    }

    #[inline]
    #[must_use]
    pub fn bones(&self) -> &[Bone] {
        &self.bones
    }

    #[inline]
    #[must_use]
    pub fn find_bone_by_name(&self, name: &str) -> Option<usize> {
        self.name_to_index.get(name).copied()
    }

    /// Name-based lookup for callers that treat a missing bone as an error.
    pub fn require_bone(&self, name: &str) -> Result<usize> {
        self.find_bone_by_name(name)
            .ok_or_else(|| SinewError::BoneNotFound(name.to_string()))
    }

    #[inline]
    #[must_use]
    pub fn bone_count(&self) -> usize {
        self.bones.len()
    }

    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline]
    #[must_use]
    pub fn parent_of(&self, index: usize) -> Option<usize> {
        self.bones.get(index).and_then(|b| b.parent)
    }

    /// Direct children of `index`, in storage order.
    pub fn children(&self, index: usize) -> impl Iterator<Item = usize> + '_ {
        self.bones
            .iter()
            .enumerate()
            .skip(index.saturating_add(1))
            .filter(move |(_, b)| b.parent == Some(index))
            .map(|(i, _)| i)
    }

    // ========================================================================
    // Local Transform Writes
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn local_transform(&self, index: usize) -> Option<&Transform> {
        self.bones.get(index).map(|b| &b.local)
    }

    pub fn set_bone_local_transform(&mut self, index: usize, position: Vec3, rotation: Quat, scale: Vec3) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.local = Transform::new(position, rotation, scale);
            self.dirty = true;
        }
    }

    pub fn set_bone_local(&mut self, index: usize, local: Transform) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.local = local;
            self.dirty = true;
        }
    }

    pub fn set_bone_local_position(&mut self, index: usize, position: Vec3) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.local.position = position;
            self.dirty = true;
        }
    }

    pub fn set_bone_local_rotation(&mut self, index: usize, rotation: Quat) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.local.rotation = rotation;
            self.dirty = true;
        }
    }

    pub fn set_bone_local_scale(&mut self, index: usize, scale: Vec3) {
        if let Some(bone) = self.bones.get_mut(index) {
            bone.local.scale = scale;
            self.dirty = true;
        }
    }

    /// Clears all animation-driven offsets.
    ///
    /// The bind pose lives entirely in the inverse bind matrices, so this
    /// only resets every local transform to identity.
    pub fn reset_to_bind_pose(&mut self) {
        for bone in &mut self.bones {
            bone.local = Transform::IDENTITY;
        }
        self.dirty = true;
    }

    // ========================================================================
    // Model-Space Cache
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    #[inline]
    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Recomputes the model-space cache if any local transform changed.
    ///
    /// Returns `true` when a recompute actually happened.
    pub fn update_matrices(&mut self) -> bool {
        if !self.dirty {
            return false;
        }
        self.recompute();
        true
    }

    /// Unconditional forward pass over the hierarchy.
    pub fn recompute(&mut self) {
        self.model_matrices.clear();
        for bone in &self.bones {
            let local = bone.local.to_matrix();
            let model = match bone.parent {
                Some(parent) => self.model_matrices[parent] * local,
                None => local,
            };
            self.model_matrices.push(model);
        }
        self.dirty = false;
    }

    /// Up-to-date model-space matrices, one per bone.
    pub fn model_matrices(&mut self) -> &[Mat4] {
        self.update_matrices();
        &self.model_matrices
    }

    /// Writes model-space bone matrices into `out` (resized to the bone count).
    pub fn compute_bone_matrices(&mut self, out: &mut Vec<Mat4>) {
        self.update_matrices();
        out.clear();
        out.extend_from_slice(&self.model_matrices);
    }

    /// Writes skinning matrices (`model * inverse_bind`) into `out`.
    pub fn compute_skinning_matrices(&mut self, out: &mut Vec<Mat4>) {
        self.update_matrices();
        out.clear();
        out.extend(
            self.model_matrices
                .iter()
                .zip(&self.bones)
                .map(|(model, bone)| *model * bone.inverse_bind_matrix),
        );
    }

    /// Cached model-space matrix of a bone.
    #[inline]
    #[must_use]
    pub fn model_matrix(&self, index: usize) -> Option<Mat4> {
        self.model_matrices.get(index).copied()
    }

    #[inline]
    #[must_use]
    pub fn model_position(&self, index: usize) -> Option<Vec3> {
        self.model_matrices
            .get(index)
            .map(|m| m.w_axis.truncate())
    }

    #[must_use]
    pub fn model_rotation(&self, index: usize) -> Option<Quat> {
        self.model_matrices
            .get(index)
            .map(|m| m.to_scale_rotation_translation().1)
    }

    // ========================================================================
    // Model-Space Edits (used by IK)
    // ========================================================================

    /// Applies a model-space rotation `delta` to a bone, pivoting at the
    /// bone's own origin. Descendants follow.
    ///
    /// The delta is re-expressed in the parent's frame and folded into the
    /// local rotation, so `new_model_rotation = delta * old_model_rotation`.
    pub fn rotate_bone_in_model_space(&mut self, index: usize, delta: Quat) {
        if index >= self.bones.len() {
            return;
        }
        self.update_matrices();

        let parent_rotation = self.bones[index]
            .parent
            .and_then(|p| self.model_rotation(p))
            .unwrap_or(Quat::IDENTITY);

        let bone = &mut self.bones[index];
        bone.local.rotation =
            (parent_rotation.inverse() * delta * parent_rotation * bone.local.rotation).normalize();
        self.dirty = true;
    }

    /// Moves a bone by a model-space offset. Descendants follow.
    pub fn translate_bone_in_model_space(&mut self, index: usize, offset: Vec3) {
        if index >= self.bones.len() {
            return;
        }
        self.update_matrices();

        let local_offset = match self.bones[index].parent.and_then(|p| self.model_matrix(p)) {
            Some(parent) => parent.inverse().transform_vector3(offset),
            None => offset,
        };

        self.bones[index].local.position += local_offset;
        self.dirty = true;
    }
}

impl Default for Skeleton {
    fn default() -> Self {
        Self::new("Skeleton")
    }
}
