//! Inline, dismissible action feedback

/// The error/success pair each view shows above its content.
///
/// Starting an action clears both; a finished action sets exactly one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Flash {
    error: Option<String>,
    success: Option<String>,
}

impl Flash {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn success(&self) -> Option<&str> {
        self.success.as_deref()
    }

    pub fn set_error(&mut self, message: impl Into<String>) {
        self.success = None;
        self.error = Some(message.into());
    }

    pub fn set_success(&mut self, message: impl Into<String>) {
        self.error = None;
        self.success = Some(message.into());
    }

    /// Clear both messages
    pub fn clear(&mut self) {
        self.error = None;
        self.success = None;
    }

    pub fn dismiss_error(&mut self) {
        self.error = None;
    }

    pub fn dismiss_success(&mut self) {
        self.success = None;
    }

    pub fn is_empty(&self) -> bool {
        self.error.is_none() && self.success.is_none()
    }
}
