//! Hover and click-to-lock selection.
//!
//! Hovering shows a body until something is locked. Clicking a body locks
//! it, clicking it again unlocks, clicking empty space clears the lock.

use crate::api::types::BodyId;
use crate::input::picking::Pick;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    hovered: Option<BodyId>,
    locked: Option<BodyId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record what is under the pointer (`None` for empty space).
    pub fn hover(&mut self, pick: Option<Pick>) {
        self.hovered = pick.map(|p| p.body);
    }

    /// Apply a click. Returns the locked body afterwards.
    pub fn click(&mut self, pick: Option<Pick>) -> Option<BodyId> {
        self.locked = match pick {
            Some(p) if self.locked == Some(p.body) => None,
            Some(p) => Some(p.body),
            None => None,
        };
        self.locked
    }

    /// A double-click names the body to fly to, if any. The lock follows it.
    pub fn double_click(&mut self, pick: Option<Pick>) -> Option<BodyId> {
        let body = pick.map(|p| p.body)?;
        self.locked = Some(body);
        Some(body)
    }

    pub fn hovered(&self) -> Option<BodyId> {
        self.hovered
    }

    pub fn locked(&self) -> Option<BodyId> {
        self.locked
    }

    pub fn is_locked(&self) -> bool {
        self.locked.is_some()
    }

    /// The body whose info should be on screen: the lock wins over hover.
    pub fn displayed(&self) -> Option<BodyId> {
        self.locked.or(self.hovered)
    }

    pub fn clear(&mut self) {
        self.hovered = None;
        self.locked = None;
    }
}
