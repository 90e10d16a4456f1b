//! Named slots in local storage.

/// Slots that can be stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    /// Cached record list, newest first.
    History,
    /// Last submitter's identity fields.
    Profile,
}

impl Slot {
    /// Returns the filename for this slot.
    pub fn filename(&self) -> &'static str {
        match self {
            Slot::History => "history.json",
            Slot::Profile => "profile.json",
        }
    }
}
