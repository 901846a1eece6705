//! PRIMARY selection query — owner lookup and window-name printing.
//!
//! One-shot flow: connect to the display, ask who owns the PRIMARY
//! selection, fetch that window's `WM_NAME`, print it to stdout. The
//! connection lives inside [`x11::X11Context`] and is dropped on every
//! exit path.

mod property;
mod x11;

use std::io::{self, Write};

use x11rb::protocol::xproto::AtomEnum;

use x11::X11Context;

/// Selection query errors.
///
/// Fetch failures and type mismatches are not represented here — they
/// are [`property::PropertyError`] values absorbed inside [`run`] with
/// a diagnostic, since the tool still exits 0 on those paths.
#[derive(Debug, thiserror::Error)]
pub enum SelectionError {
    #[error("X11 connect failed: {0}")]
    Connect(String),
    #[error("selection owner query failed: {0}")]
    Owner(String),
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
}

/// Run the selection query.
///
/// This is the entry point called from `main.rs`. Returns `Ok(())` on
/// every path except connection-class failures:
///
/// - no PRIMARY owner → no output
/// - `WM_NAME` fetch failed or had the wrong type → stderr diagnostic,
///   no output
/// - otherwise → the owner's name and a newline on stdout
pub fn run() -> Result<(), SelectionError> {
    let x11 = X11Context::connect()?;
    tracing::debug!(screen = x11.screen_num(), "connected to X11 display");

    let Some(owner) = x11.primary_owner()? else {
        tracing::debug!("PRIMARY selection has no owner");
        return Ok(());
    };
    tracing::debug!(window = owner, "resolved PRIMARY selection owner");

    match property::get_property(x11.conn(), owner, AtomEnum::STRING.into(), "WM_NAME") {
        Ok(name) => {
            let mut stdout = io::stdout().lock();
            stdout.write_all(name.as_bytes())?;
            stdout.write_all(b"\n")?;
            stdout.flush()?;
        }
        Err(e) => {
            tracing::warn!(error = %e, window = owner, "window name unavailable");
            eprintln!("xselowner: {e}");
        }
    }

    Ok(())
}
