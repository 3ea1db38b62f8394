//! Fluid valve trait

/// Trait for an on/off fluid valve
///
/// Both operations are idempotent: turning on an open valve is a no-op.
pub trait Valve {
    /// Open the valve (start water flow)
    fn turn_on(&mut self);

    /// Close the valve
    fn turn_off(&mut self);

    /// Check if the valve is currently open
    fn is_on(&self) -> bool;
}
