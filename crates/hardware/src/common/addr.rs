//! Address and tag types.
//!
//! Entries, extractors and indexing policies all speak the same raw 64-bit
//! address type. A tag is an address that has been reduced by a
//! [`TagExtractor`](crate::cache::TagExtractor), so it shares the same type.

/// A raw 64-bit simulated address.
pub type Addr = u64;

/// Returns `floor(log2(value))`, or `None` when `value` is zero.
///
/// # Arguments
///
/// * `value` - The value to take the logarithm of.
#[inline]
pub const fn floor_log2(value: u64) -> Option<u32> {
    if value == 0 {
        None
    } else {
        Some(u64::BITS - 1 - value.leading_zeros())
    }
}

/// Shifts `addr` right by `shift` bits, yielding zero instead of overflowing
/// when `shift` is 64 or more.
#[inline(always)]
pub const fn shift_right(addr: Addr, shift: u32) -> Addr {
    if shift >= u64::BITS { 0 } else { addr >> shift }
}
