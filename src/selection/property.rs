//! Window property fetch — atom resolution, capped read, native-width
//! copy.
//!
//! Reads one named property from a window, capped at
//! [`MAX_PROPERTY_VALUE_LEN`] bytes. The returned buffer is
//! NUL-terminated, and format-32 data is widened to native `c_ulong`
//! width to match the Xlib storage convention on 64-bit hosts.

use std::ffi::c_ulong;

use x11rb::protocol::xproto::{self, Atom, Window};
use x11rb::rust_connection::RustConnection;

/// Hard cap on fetched property values, in bytes. Larger properties
/// are silently truncated.
pub const MAX_PROPERTY_VALUE_LEN: u32 = 4096;

/// Property fetch errors. Both variants name the property so the
/// diagnostic is self-contained.
#[derive(Debug, thiserror::Error)]
pub enum PropertyError {
    #[error("cannot get {property} property: {reason}")]
    Fetch { property: String, reason: String },
    #[error("invalid type of {property} property: got atom {actual}, expected {expected}")]
    TypeMismatch {
        property: String,
        expected: Atom,
        actual: Atom,
    },
}

/// A fetched property value: payload bytes plus one trailing NUL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyValue {
    buf: Vec<u8>,
    len: usize,
}

impl PropertyValue {
    /// Payload length in bytes, excluding the terminator.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Payload bytes, without the terminator.
    pub fn as_bytes(&self) -> &[u8] {
        &self.buf[..self.len]
    }

    /// Full buffer including the trailing NUL.
    pub fn as_bytes_with_nul(&self) -> &[u8] {
        &self.buf
    }
}

/// Fetch `prop_name` from `window`, expecting `prop_type`.
///
/// The property name is interned with create-if-missing semantics, then
/// read with a [`MAX_PROPERTY_VALUE_LEN`]-byte ceiling; anything beyond
/// the ceiling is truncated without error. A reply whose type differs
/// from `prop_type` (including type `None` when the property is absent)
/// is a [`PropertyError::TypeMismatch`]; a failed intern or read is a
/// [`PropertyError::Fetch`]. Fetching the same property twice yields
/// identical results — the only server-side effect is atom interning,
/// which is itself idempotent.
pub fn get_property(
    conn: &RustConnection,
    window: Window,
    prop_type: Atom,
    prop_name: &str,
) -> Result<PropertyValue, PropertyError> {
    let fetch_err = |reason: String| PropertyError::Fetch {
        property: prop_name.to_string(),
        reason,
    };

    let atom = xproto::intern_atom(conn, false, prop_name.as_bytes())
        .map_err(|e| fetch_err(format!("intern_atom: {e}")))?
        .reply()
        .map_err(|e| fetch_err(format!("intern_atom reply: {e}")))?
        .atom;

    // long_length is in 4-byte units.
    let reply = xproto::get_property(
        conn,
        false,
        window,
        atom,
        prop_type,
        0,
        MAX_PROPERTY_VALUE_LEN / 4,
    )
    .map_err(|e| fetch_err(format!("get_property: {e}")))?
    .reply()
    .map_err(|e| fetch_err(format!("get_property reply: {e}")))?;

    if reply.type_ != prop_type {
        return Err(PropertyError::TypeMismatch {
            property: prop_name.to_string(),
            expected: prop_type,
            actual: reply.type_,
        });
    }

    if reply.bytes_after > 0 {
        tracing::debug!(
            property = prop_name,
            bytes_after = reply.bytes_after,
            "property truncated at {MAX_PROPERTY_VALUE_LEN} bytes"
        );
    }

    Ok(copy_terminated(reply.format, &reply.value))
}

/// Copy raw property data into a fresh NUL-terminated buffer.
///
/// The server reports format-32 data as 4-byte units, but Xlib-style
/// consumers store each such unit in a native `unsigned long`, so the
/// byte length of format-32 data scales by `size_of::<c_ulong>() / 4`
/// on hosts where long is wider than 4 bytes. Format 8 and 16 copy
/// verbatim.
fn copy_terminated(format: u8, value: &[u8]) -> PropertyValue {
    let mut buf = if format == 32 && size_of::<c_ulong>() != 4 {
        let mut widened = Vec::with_capacity(value.len() / 4 * size_of::<c_ulong>() + 1);
        for unit in value.chunks_exact(4) {
            let unit = u32::from_ne_bytes([unit[0], unit[1], unit[2], unit[3]]);
            widened.extend_from_slice(&c_ulong::from(unit).to_ne_bytes());
        }
        widened
    } else {
        let mut bytes = Vec::with_capacity(value.len() + 1);
        bytes.extend_from_slice(value);
        bytes
    };

    let len = buf.len();
    buf.push(0);

    PropertyValue { buf, len }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn format8_copies_bytes_verbatim() {
        let prop = copy_terminated(8, b"xterm");

        assert_eq!(prop.len(), 5);
        assert_eq!(prop.as_bytes(), b"xterm");
        assert_eq!(prop.as_bytes_with_nul(), b"xterm\0");
    }

    #[test]
    fn format8_empty_value_is_just_a_terminator() {
        let prop = copy_terminated(8, b"");

        assert!(prop.is_empty());
        assert_eq!(prop.as_bytes_with_nul(), b"\0");
    }

    #[test]
    fn format16_length_is_two_bytes_per_unit() {
        let value = [0x12u8, 0x34, 0x56, 0x78];
        let prop = copy_terminated(16, &value);

        assert_eq!(prop.len(), 4);
        assert_eq!(prop.as_bytes(), &value[..]);
    }

    #[test]
    fn format32_units_widen_to_native_long_width() {
        let units = [0xdead_beefu32, 0x0000_0001];
        let mut value = Vec::new();
        for u in units {
            value.extend_from_slice(&u.to_ne_bytes());
        }

        let prop = copy_terminated(32, &value);

        assert_eq!(prop.len(), units.len() * size_of::<c_ulong>());
        let mut expected = Vec::new();
        for u in units {
            expected.extend_from_slice(&c_ulong::from(u).to_ne_bytes());
        }
        assert_eq!(prop.as_bytes(), expected);
        assert_eq!(prop.as_bytes_with_nul().last(), Some(&0));
    }

    #[cfg(all(unix, target_pointer_width = "64"))]
    #[test]
    fn format32_zero_extends_each_unit() {
        let prop = copy_terminated(32, &u32::MAX.to_ne_bytes());

        assert_eq!(prop.len(), 8);
        assert_eq!(prop.as_bytes(), 0xffff_ffffu64.to_ne_bytes());
    }

    #[test]
    fn cap_sized_property_keeps_all_bytes_plus_terminator() {
        let value = vec![0x61u8; MAX_PROPERTY_VALUE_LEN as usize];
        let prop = copy_terminated(8, &value);

        assert_eq!(prop.len(), 4096);
        assert_eq!(prop.as_bytes_with_nul().len(), 4097);
    }

    #[test]
    fn copy_is_pure_and_repeatable() {
        assert_eq!(copy_terminated(8, b"owner"), copy_terminated(8, b"owner"));
    }

    #[test]
    fn fetch_error_names_the_property() {
        let e = PropertyError::Fetch {
            property: "WM_NAME".into(),
            reason: "connection reset".into(),
        };

        assert_eq!(e.to_string(), "cannot get WM_NAME property: connection reset");
    }

    #[test]
    fn type_mismatch_names_the_property() {
        let e = PropertyError::TypeMismatch {
            property: "WM_NAME".into(),
            expected: 31,
            actual: 0,
        };

        assert_eq!(
            e.to_string(),
            "invalid type of WM_NAME property: got atom 0, expected 31"
        );
    }
}
