//! X11 connection — scoped display handle and selection-owner query.
//!
//! Wraps `x11rb::rust_connection::RustConnection`. The context is the
//! single connection point; dropping it closes the display.

use x11rb::protocol::xproto::{self, Atom, AtomEnum, Window};
use x11rb::rust_connection::RustConnection;

use super::SelectionError;

/// X11 connection context for the selection query.
pub struct X11Context {
    conn: RustConnection,
    screen_num: usize,
}

impl X11Context {
    /// Connect to the default X11 display (`$DISPLAY`).
    pub fn connect() -> Result<Self, SelectionError> {
        let (conn, screen_num) = RustConnection::connect(None)
            .map_err(|e| SelectionError::Connect(format!("connect failed: {e}")))?;

        Ok(Self { conn, screen_num })
    }

    pub fn conn(&self) -> &RustConnection {
        &self.conn
    }

    pub fn screen_num(&self) -> usize {
        self.screen_num
    }

    /// Query the owner of the PRIMARY selection.
    ///
    /// Returns `Ok(None)` when no window currently owns the selection
    /// (the server reports the zero window).
    pub fn primary_owner(&self) -> Result<Option<Window>, SelectionError> {
        let reply = xproto::get_selection_owner(&self.conn, Atom::from(AtomEnum::PRIMARY))
            .map_err(|e| SelectionError::Owner(format!("get_selection_owner: {e}")))?
            .reply()
            .map_err(|e| SelectionError::Owner(format!("get_selection_owner reply: {e}")))?;

        if reply.owner == 0 {
            return Ok(None);
        }

        Ok(Some(reply.owner))
    }
}
