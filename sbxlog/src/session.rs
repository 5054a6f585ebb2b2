//! Session state for a device connection
//!
//! The driver enforces at most one active connection per process; this tracks
//! which side of that line we are on so call sequencing can be checked before
//! touching the driver.

use crate::error::{Error, Result};

/// Session state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Not connected
    Disconnected,

    /// Connected and ready for commands
    Connected,
}

/// Session tracker owned by the device
#[derive(Debug)]
pub struct Session {
    state: SessionState,
}

impl Session {
    /// Create a new disconnected session
    pub fn new() -> Self {
        Self {
            state: SessionState::Disconnected,
        }
    }

    /// Get current state
    pub fn state(&self) -> SessionState {
        self.state
    }

    /// Check if connected
    pub fn is_connected(&self) -> bool {
        matches!(self.state, SessionState::Connected)
    }

    /// Mark the session open after a successful driver connect
    pub fn open(&mut self) -> Result<()> {
        if self.state != SessionState::Disconnected {
            return Err(Error::AlreadyConnected);
        }

        self.state = SessionState::Connected;
        Ok(())
    }

    /// Close the session; safe to call in any state
    pub fn close(&mut self) {
        self.state = SessionState::Disconnected;
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_new() {
        let session = Session::new();
        assert_eq!(session.state(), SessionState::Disconnected);
        assert!(!session.is_connected());
    }

    #[test]
    fn test_session_open() {
        let mut session = Session::new();
        session.open().unwrap();

        assert_eq!(session.state(), SessionState::Connected);
        assert!(session.is_connected());
    }

    #[test]
    fn test_session_open_twice() {
        let mut session = Session::new();
        session.open().unwrap();

        assert!(session.open().is_err());
    }

    #[test]
    fn test_session_close() {
        let mut session = Session::new();
        session.open().unwrap();

        session.close();
        assert!(!session.is_connected());

        // Close is idempotent
        session.close();
        assert!(!session.is_connected());
    }
}
