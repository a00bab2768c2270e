use crate::skeleton::Skeleton;
use crate::transform::Transform;

/// A snapshot of every bone's local transform, indexed like the skeleton.
///
/// Poses are the blender's scratch space: layers are evaluated into poses,
/// combined, and the result is written back with [`Pose::apply_to`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Pose {
    transforms: Vec<Transform>,
}

impl Pose {
    /// All-identity pose for `bone_count` bones.
    #[must_use]
    pub fn rest(bone_count: usize) -> Self {
        Self {
            transforms: vec![Transform::IDENTITY; bone_count],
        }
    }

    /// Copies the skeleton's current local transforms.
    #[must_use]
    pub fn from_skeleton(skeleton: &Skeleton) -> Self {
        Self {
            transforms: skeleton.bones().iter().map(|b| b.local).collect(),
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.transforms.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.transforms.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&Transform> {
        self.transforms.get(index)
    }

    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut Transform> {
        self.transforms.get_mut(index)
    }

    #[inline]
    #[must_use]
    pub fn transforms(&self) -> &[Transform] {
        &self.transforms
    }

    /// Writes the pose into the skeleton's local transforms.
    ///
    /// Marks the skeleton dirty but does not recompute; callers batch the
    /// recompute after all writes.
    pub fn apply_to(&self, skeleton: &mut Skeleton) {
        for (index, transform) in self.transforms.iter().enumerate() {
            skeleton.set_bone_local(index, *transform);
        }
    }
}
