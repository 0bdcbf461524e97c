//! Reactions - restraint conditions at nodes

use serde::{Deserialize, Serialize};

use super::NodeId;

/// Restraint flags at a node, in DOF order [DX, DY, DZ, RX, RY, RZ]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reaction {
    /// Restrained node
    pub node: NodeId,
    /// Restrained in X translation
    pub dx: bool,
    /// Restrained in Y translation
    pub dy: bool,
    /// Restrained in Z translation
    pub dz: bool,
    /// Restrained in X rotation
    pub rx: bool,
    /// Restrained in Y rotation
    pub ry: bool,
    /// Restrained in Z rotation
    pub rz: bool,
}

impl Reaction {
    /// Create a reaction with specific restraints
    pub fn new(node: NodeId, dx: bool, dy: bool, dz: bool, rx: bool, ry: bool, rz: bool) -> Self {
        Self {
            node,
            dx,
            dy,
            dz,
            rx,
            ry,
            rz,
        }
    }

    /// Create a reaction from a flag array
    pub fn from_array(node: NodeId, flags: [bool; 6]) -> Self {
        Self::new(node, flags[0], flags[1], flags[2], flags[3], flags[4], flags[5])
    }

    /// Fully fixed node (all DOFs restrained)
    pub fn fixed(node: NodeId) -> Self {
        Self::from_array(node, [true; 6])
    }

    /// Pinned node (translations restrained, rotations free)
    pub fn pinned(node: NodeId) -> Self {
        Self::from_array(node, [true, true, true, false, false, false])
    }

    /// Get the restraint flags as an array
    pub fn as_array(&self) -> [bool; 6] {
        [self.dx, self.dy, self.dz, self.rx, self.ry, self.rz]
    }

    /// Count number of restrained DOFs
    pub fn num_restrained(&self) -> usize {
        self.as_array().iter().filter(|&&r| r).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_reaction() {
        let reaction = Reaction::fixed(1);
        assert_eq!(reaction.num_restrained(), 6);
    }

    #[test]
    fn test_pinned_reaction() {
        let reaction = Reaction::pinned(3);
        assert_eq!(reaction.as_array(), [true, true, true, false, false, false]);
        assert_eq!(reaction.num_restrained(), 3);
    }
}
