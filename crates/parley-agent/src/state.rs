//! What the agent remembers between turns.

/// Per-session memory. Written by SetName, read by QueryName.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversationState {
    user_name: Option<String>,
}

impl ConversationState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn user_name(&self) -> Option<&str> {
        self.user_name.as_deref()
    }

    pub fn set_user_name(&mut self, name: impl Into<String>) {
        self.user_name = Some(name.into());
    }
}
