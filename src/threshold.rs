pub const DEFAULT_LUMINANCE_CUTOFF: u8 = 128;

/// A pixel is lit when its intensity is strictly above the cutoff.
#[inline]
pub fn is_lit(
    intensity: u8,
    cutoff: u8,
) -> bool
{
    intensity > cutoff
}
