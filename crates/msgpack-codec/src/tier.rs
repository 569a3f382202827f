//! Length tiers for strings, binary blobs, arrays and maps.
//!
//! Each family has its own table; the smallest tier that fits the length
//! wins. Binary blobs have no embedded tier, arrays and maps have no 8-bit
//! tier.

use crate::constants::*;
use crate::error::{Error, Result};

/// One of the discrete length representations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tier {
    /// Length packed into the low bits of the control byte.
    Embedded,
    Prefix8,
    Prefix16,
    Prefix32,
}

/// Control bytes for every tier of one container family.
#[derive(Debug, Clone, Copy)]
pub struct TierTable {
    pub what: &'static str,
    /// Base byte and largest embeddable length.
    pub embedded: Option<(u8, usize)>,
    pub prefix8: Option<u8>,
    pub prefix16: u8,
    pub prefix32: u8,
}

pub const STR_TIERS: TierTable = TierTable {
    what: "string",
    embedded: Some((FIXSTR, FIXSTR_MASK as usize)),
    prefix8: Some(STR8),
    prefix16: STR16,
    prefix32: STR32,
};

pub const BIN_TIERS: TierTable = TierTable {
    what: "binary",
    embedded: None,
    prefix8: Some(BIN8),
    prefix16: BIN16,
    prefix32: BIN32,
};

pub const ARRAY_TIERS: TierTable = TierTable {
    what: "array",
    embedded: Some((FIXARRAY, FIXARRAY_MASK as usize)),
    prefix8: None,
    prefix16: ARRAY16,
    prefix32: ARRAY32,
};

pub const MAP_TIERS: TierTable = TierTable {
    what: "map",
    embedded: Some((FIXMAP, FIXMAP_MASK as usize)),
    prefix8: None,
    prefix16: MAP16,
    prefix32: MAP32,
};

/// An encoded header: control byte plus up to four length bytes.
#[derive(Debug, Clone, Copy)]
pub struct Header {
    bytes: [u8; 5],
    len: usize,
}

impl Header {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes[..self.len]
    }
}

impl TierTable {
    /// Picks the smallest tier able to represent `len`.
    pub fn select(&self, len: usize) -> Result<Tier> {
        self.pick(len).map(|(tier, _)| tier)
    }

    /// Tier plus the control byte (or embedded base byte) it uses.
    fn pick(&self, len: usize) -> Result<(Tier, u8)> {
        if let Some((base, max)) = self.embedded {
            if len <= max {
                return Ok((Tier::Embedded, base));
            }
        }
        match self.prefix8 {
            Some(marker) if len <= u8::MAX as usize => return Ok((Tier::Prefix8, marker)),
            _ => {}
        }
        if len <= u16::MAX as usize {
            Ok((Tier::Prefix16, self.prefix16))
        } else if len <= u32::MAX as usize {
            Ok((Tier::Prefix32, self.prefix32))
        } else {
            Err(Error::LengthOverflow {
                what: self.what,
                len,
            })
        }
    }

    /// Builds the header announcing `len` bytes, elements or pairs.
    pub fn header(&self, len: usize) -> Result<Header> {
        let mut bytes = [0u8; 5];
        let (tier, marker) = self.pick(len)?;
        let n = match tier {
            Tier::Embedded => {
                bytes[0] = marker | len as u8;
                1
            }
            Tier::Prefix8 => {
                bytes[0] = marker;
                bytes[1] = len as u8;
                2
            }
            Tier::Prefix16 => {
                bytes[0] = marker;
                bytes[1..3].copy_from_slice(&(len as u16).to_be_bytes());
                3
            }
            Tier::Prefix32 => {
                bytes[0] = marker;
                bytes[1..5].copy_from_slice(&(len as u32).to_be_bytes());
                5
            }
        };
        Ok(Header { bytes, len: n })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn str_tier_boundaries() {
        assert_eq!(STR_TIERS.select(0).unwrap(), Tier::Embedded);
        assert_eq!(STR_TIERS.select(31).unwrap(), Tier::Embedded);
        assert_eq!(STR_TIERS.select(32).unwrap(), Tier::Prefix8);
        assert_eq!(STR_TIERS.select(255).unwrap(), Tier::Prefix8);
        assert_eq!(STR_TIERS.select(256).unwrap(), Tier::Prefix16);
        assert_eq!(STR_TIERS.select(65535).unwrap(), Tier::Prefix16);
        assert_eq!(STR_TIERS.select(65536).unwrap(), Tier::Prefix32);
    }

    #[test]
    fn bin_has_no_embedded_tier() {
        assert_eq!(BIN_TIERS.select(0).unwrap(), Tier::Prefix8);
        assert_eq!(BIN_TIERS.header(0).unwrap().as_bytes(), &[0xc4, 0x00]);
    }

    #[test]
    fn array_and_map_skip_prefix8() {
        assert_eq!(ARRAY_TIERS.select(15).unwrap(), Tier::Embedded);
        assert_eq!(ARRAY_TIERS.select(16).unwrap(), Tier::Prefix16);
        assert_eq!(MAP_TIERS.select(255).unwrap(), Tier::Prefix16);
        assert_eq!(ARRAY_TIERS.header(16).unwrap().as_bytes(), &[0xdc, 0x00, 0x10]);
        assert_eq!(MAP_TIERS.header(15).unwrap().as_bytes(), &[0x8f]);
    }

    #[test]
    fn prefix32_is_big_endian() {
        assert_eq!(
            MAP_TIERS.header(0x0001_0203).unwrap().as_bytes(),
            &[0xdf, 0x00, 0x01, 0x02, 0x03]
        );
        assert_eq!(
            STR_TIERS.header(0x0001_0000).unwrap().as_bytes(),
            &[0xdb, 0x00, 0x01, 0x00, 0x00]
        );
    }

    #[cfg(target_pointer_width = "64")]
    #[test]
    fn oversized_length_is_a_range_error() {
        let err = ARRAY_TIERS.select(u32::MAX as usize + 1).unwrap_err();
        assert!(matches!(
            err,
            Error::LengthOverflow { what: "array", .. }
        ));
        assert_eq!(ARRAY_TIERS.select(u32::MAX as usize).unwrap(), Tier::Prefix32);
    }
}
