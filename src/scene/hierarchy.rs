//! Bone Hierarchy Evaluation
//!
//! Composes global bone poses from local poses along the parent chain:
//!
//! ```text
//! global[b] = global[parent(b)] * local[b]      (parent present)
//! global[b] = world * local[b]                  (root)
//! ```
//!
//! Bones may be stored in any order (importers do not sort them
//! topologically). Evaluation is a memoized depth-first walk driven by an
//! explicit stack instead of recursion, so deep chains cannot overflow the
//! call stack. A per-bone `computed` flag, cleared at the start of every
//! pass, guarantees each bone is composed exactly once.
//!
//! Parent links are validated for range and cycles when a skeleton is
//! built ([`validate_parents`]); [`evaluate`] still guards against a cycle
//! and breaks it by treating the offending bone as a root.

use glam::Mat4;

use crate::errors::{HayloftError, Result};
use crate::scene::skeleton::Bone;

/// Checks that every parent index is in range and the graph is acyclic.
pub fn validate_parents(bones: &[Bone]) -> Result<()> {
    let count = bones.len();

    for (bone, b) in bones.iter().enumerate() {
        if let Some(parent) = b.parent {
            if parent >= count {
                return Err(HayloftError::InvalidParent {
                    bone,
                    parent: parent as i64,
                    count,
                });
            }
        }
    }

    // Walking up from any bone must reach a root within `count` hops.
    for start in 0..count {
        let mut current = bones[start].parent;
        let mut hops = 0;
        while let Some(parent) = current {
            hops += 1;
            if hops > count {
                return Err(HayloftError::CyclicHierarchy { bone: start });
            }
            current = bones[parent].parent;
        }
    }

    Ok(())
}

/// Computes `global` from `local` for every bone.
///
/// `computed` and `stack` are caller-owned scratch buffers so repeated
/// evaluation does not allocate; `computed` must have one entry per bone.
pub fn evaluate(
    bones: &[Bone],
    local: &[Mat4],
    world: Mat4,
    global: &mut [Mat4],
    computed: &mut [bool],
    stack: &mut Vec<usize>,
) {
    let count = bones.len();
    debug_assert_eq!(local.len(), count);
    debug_assert_eq!(global.len(), count);
    debug_assert_eq!(computed.len(), count);

    computed.fill(false);
    stack.clear();

    for start in 0..count {
        if computed[start] {
            continue;
        }

        stack.push(start);

        while let Some(&bone) = stack.last() {
            let parent_matrix = match bones[bone].parent {
                None => world,
                Some(parent) if computed[parent] => global[parent],
                Some(parent) if stack.contains(&parent) => {
                    log::error!(
                        "Bone hierarchy cycle at bone {bone} (parent {parent}); treating it as a root"
                    );
                    world
                }
                Some(parent) => {
                    // Resolve the parent first, then revisit this bone.
                    stack.push(parent);
                    continue;
                }
            };

            global[bone] = parent_matrix * local[bone];
            computed[bone] = true;
            stack.pop();
        }
    }
}
