use croft_geom::Vec3;

/// Confirmation widget boundary. The core decides when the confirm/cancel
/// affordance appears and where it anchors; layout and input belong to the
/// collaborator.
pub trait ConfirmUi {
    fn show(&mut self, world_pos: Vec3);
    fn hide(&mut self);
    /// The placement flow ended (committed out or canceled); collaborators
    /// re-enable whatever the flow suppressed.
    fn done(&mut self);
}

/// Headless default.
#[derive(Default)]
pub struct NullConfirmUi;

impl ConfirmUi for NullConfirmUi {
    fn show(&mut self, _world_pos: Vec3) {}
    fn hide(&mut self) {}
    fn done(&mut self) {}
}
