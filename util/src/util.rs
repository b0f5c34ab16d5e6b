//! Byte classes shared by the scanner and its users.

/// Space or horizontal tab.
#[inline(always)]
pub fn is_space(c: u8) -> bool {
    matches!(c, b' ' | b'\t')
}
