//! Low-level bit manipulation on packed 64-bit identifiers.
//!
//! Bits are addressed LSB-first: bit 0 is the least significant bit of the identifier.

/// Width of the leading system tag shared by every readout.
pub const SYSTEM_BITS: u32 = 5;

/// Returns a mask with the low `width` bits set. `width` may be 0..=64.
pub fn mask(width: u32) -> u64 {
    if width >= 64 {
        u64::MAX
    } else {
        (1u64 << width) - 1
    }
}

/// Reads `width` bits starting at `offset` as an unsigned value.
pub fn extract_bits(id: u64, offset: u32, width: u32) -> u64 {
    if offset >= 64 {
        return 0;
    }
    (id >> offset) & mask(width)
}

/// Replaces `width` bits at `offset` with the low bits of `value`.
pub fn insert_bits(id: u64, offset: u32, width: u32, value: u64) -> u64 {
    if offset >= 64 {
        return id;
    }
    let field_mask = mask(width) << offset;
    (id & !field_mask) | ((value & mask(width)) << offset)
}

/// Sign-extends the low `bits` of `value` to a full `i64`.
pub fn sign_extend(value: u64, bits: u32) -> i64 {
    let shift = 64 - bits;
    ((value << shift) as i64) >> shift
}

/// Reads the system tag (bits 0..5) without going through a codec.
pub fn system_tag(id: u64) -> u64 {
    id & mask(SYSTEM_BITS)
}
