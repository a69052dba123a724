//! Length-prefixed UTF-16BE strings as used by the Adobe binary formats.
//!
//! Both ACB and ACO store strings as a big-endian u32 count of UTF-16 code
//! units followed by that many big-endian u16 units. The only difference is
//! the terminator: ACO strings carry a trailing u16 0 that is counted in
//! the stored length, ACB strings have none.

use crate::{PaletteError, Result};
use byteorder::{BigEndian, ReadBytesExt, WriteBytesExt};
use std::io::{Read, Write};

/// Reads an ACB-style string: `length` code units, no terminator.
pub fn read_string<R: Read + ?Sized>(r: &mut R) -> Result<String> {
    let len = r.read_u32::<BigEndian>()?;
    decode_units(r, len, false)
}

/// Reads an ACO-style string: the stored length counts a trailing u16 0.
pub fn read_string_nul<R: Read + ?Sized>(r: &mut R) -> Result<String> {
    let len = r.read_u32::<BigEndian>()?;
    decode_units(r, len, true)
}

/// Writes an ACB-style string.
pub fn write_string<W: Write + ?Sized>(w: &mut W, s: &str) -> Result<()> {
    let units: Vec<u16> = s.encode_utf16().collect();
    w.write_u32::<BigEndian>(units.len() as u32)?;
    for unit in units {
        w.write_u16::<BigEndian>(unit)?;
    }
    Ok(())
}

/// Writes an ACO-style string with its counted null terminator.
pub fn write_string_nul<W: Write + ?Sized>(w: &mut W, s: &str) -> Result<()> {
    let units: Vec<u16> = s.encode_utf16().collect();
    w.write_u32::<BigEndian>(units.len() as u32 + 1)?;
    for unit in units {
        w.write_u16::<BigEndian>(unit)?;
    }
    w.write_u16::<BigEndian>(0)?;
    Ok(())
}

fn decode_units<R: Read + ?Sized>(r: &mut R, len: u32, counted_nul: bool) -> Result<String> {
    let mut units = Vec::with_capacity(len as usize);
    for _ in 0..len {
        units.push(r.read_u16::<BigEndian>()?);
    }

    if counted_nul {
        // The terminator is part of the stored length; stop at the first
        // null unit like Photoshop does.
        if let Some(end) = units.iter().position(|&u| u == 0) {
            units.truncate(end);
        }
    }

    char::decode_utf16(units)
        .collect::<std::result::Result<String, _>>()
        .map_err(|e| PaletteError::Format(format!("bad UTF-16 string: {e}")))
}
