//! Packed tile-code codec.
//!
//! Bit 31 of a Tiled gid is the horizontal-flip flag; bits 0-30 hold the raw
//! global id. A raw id of 0 means "no tile" and belongs to no tileset.

/// Horizontal-flip flag bit.
pub const FLIP_H: u32 = 0x8000_0000;

/// Splits a packed code into (raw id, flipped).
pub fn decode(code: u32) -> (u32, bool) {
    (code & !FLIP_H, code & FLIP_H != 0)
}

/// Packs a raw id and flip flag back into a tile code.
pub fn encode(raw: u32, flipped: bool) -> u32 {
    if flipped { raw | FLIP_H } else { raw }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_plain_and_flipped() {
        assert_eq!(decode(70), (70, false));
        assert_eq!(decode(70 | FLIP_H), (70, true));
        assert_eq!(decode(0), (0, false));
    }

    #[test]
    fn test_round_trip() {
        for raw in [0, 1, 30, 70, 1000, 0x7FFF_FFFE, 0x7FFF_FFFF] {
            for flipped in [false, true] {
                assert_eq!(decode(encode(raw, flipped)), (raw, flipped));
            }
        }
    }

    #[test]
    fn test_encode_is_identity_on_decoded_code() {
        for code in [0u32, 5, FLIP_H | 5, FLIP_H, u32::MAX] {
            let (raw, flipped) = decode(code);
            assert_eq!(encode(raw, flipped), code);
        }
    }
}
