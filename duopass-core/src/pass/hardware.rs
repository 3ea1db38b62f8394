//! Hardware bundles injected into the pass controller

use crate::state::PassDirection;

/// Drive motors and their encoders
pub struct Drivetrain<M, E> {
    pub left: M,
    pub right: M,
    pub left_encoder: E,
    pub right_encoder: E,
}

/// Sensors and valve owned by one travel direction
pub struct PassSide<L, P, V> {
    /// End-of-travel switch at the far end of this pass
    pub limit: L,
    /// Proximity sensor at the far end of this pass
    pub proximity: P,
    /// Valve feeding the brush during this pass
    pub valve: V,
}

/// Everything the pass controller drives or reads
pub struct PassHardware<M, B, E, L, P, V> {
    pub drivetrain: Drivetrain<M, E>,
    pub brush: B,
    /// Side used by forward passes (sensors/valve 1)
    pub forward: PassSide<L, P, V>,
    /// Side used by backward passes (sensors/valve 2)
    pub backward: PassSide<L, P, V>,
}

impl<M, B, E, L, P, V> PassHardware<M, B, E, L, P, V> {
    /// Get the side used by `direction`, mutably
    pub fn side_mut(&mut self, direction: PassDirection) -> &mut PassSide<L, P, V> {
        match direction {
            PassDirection::Forward => &mut self.forward,
            PassDirection::Backward => &mut self.backward,
        }
    }

    /// Split into the pass side for `direction` and the opposite side
    pub fn sides_mut(
        &mut self,
        direction: PassDirection,
    ) -> (&mut PassSide<L, P, V>, &mut PassSide<L, P, V>) {
        match direction {
            PassDirection::Forward => (&mut self.forward, &mut self.backward),
            PassDirection::Backward => (&mut self.backward, &mut self.forward),
        }
    }
}
