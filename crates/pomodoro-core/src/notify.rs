//! Notification port.
//!
//! The engine calls the sink once per completed session. Delivery failures
//! come back as [`NotifyError`] and are logged by the engine; they never
//! interrupt a transition.

use crate::error::NotifyError;

/// Capability invoked at every session completion.
pub trait NotificationSink {
    /// Short audible cue.
    fn chime(&mut self) -> Result<(), NotifyError> {
        Ok(())
    }

    /// System notification.
    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError>;
}

impl<T: NotificationSink + ?Sized> NotificationSink for Box<T> {
    fn chime(&mut self) -> Result<(), NotifyError> {
        (**self).chime()
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        (**self).notify(title, body)
    }
}

/// Sink that drops everything.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&mut self, _title: &str, _body: &str) -> Result<(), NotifyError> {
        Ok(())
    }
}

/// Sink that remembers what it was asked to deliver.
///
/// `fail_with` makes every call return that error after recording it.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub chimes: usize,
    pub notifications: Vec<(String, String)>,
    pub fail_with: Option<fn() -> NotifyError>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A sink that records calls but reports every delivery as denied.
    pub fn denied() -> Self {
        Self {
            fail_with: Some(|| NotifyError::PermissionDenied),
            ..Self::default()
        }
    }

    fn outcome(&self) -> Result<(), NotifyError> {
        match self.fail_with {
            Some(make) => Err(make()),
            None => Ok(()),
        }
    }
}

impl NotificationSink for RecordingSink {
    fn chime(&mut self) -> Result<(), NotifyError> {
        self.chimes += 1;
        self.outcome()
    }

    fn notify(&mut self, title: &str, body: &str) -> Result<(), NotifyError> {
        self.notifications.push((title.to_string(), body.to_string()));
        self.outcome()
    }
}
