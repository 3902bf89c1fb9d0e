//! Seven-segment patterns.
//!
//! One byte per digit, one bit per segment.  Bit 0 is always the decimal point and bit 7 the
//! middle bar, which doubles as the minus sign.

pub const BLANK: u8 = 0x00;
pub const DECIMAL_POINT: u8 = 0x01;
pub const DASH: u8 = 0x80;
pub const ALL_ON: u8 = 0xff;

const DIGITS: [u8; 10] = [0x7e, 0x0c, 0xb6, 0x9e, 0xcc, 0xda, 0xfa, 0x0e, 0xfe, 0xde];

const ERROR: [u8; 3] = [0xa0, 0xa0, 0xf2];
const FOUL: [u8; 4] = [0x0c, 0x38, 0xb8, 0xe2];

/// Frames of the figure-eight animation.
pub const CHASE8: [u8; 8] = [0x02, 0x04, 0x80, 0x20, 0x10, 0x08, 0x80, 0x40];

/// Pattern for a single decimal digit.  Values above 9 give [`BLANK`].
pub const fn digit(value: u8) -> u8 {
    if value < 10 {
        DIGITS[value as usize]
    } else {
        BLANK
    }
}

/// Frame `pos` of the spinning animation around the outer segments (six frames).
pub const fn chase(pos: u8) -> u8 {
    1 << ((pos % 6) + 1)
}

/// Frame `pos` of the figure-eight animation (eight frames).
pub const fn chase8(pos: u8) -> u8 {
    CHASE8[(pos % 8) as usize]
}

/// Fixed messages a digit group can show.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Symbol {
    Blank,
    /// "Err"
    Error,
    /// "FoUL"
    Foul,
    /// A dash on every digit.
    Dash,
    /// Every segment lit.
    Test,
}

/// Write `value` into `out`, least significant digit first, blanking unused positions.
///
/// Digits that do not fit are dropped.  Returns the number of digits written, at least one for
/// zero.
pub(crate) fn write_number(value: u32, out: &mut [u8]) -> usize {
    let Some((first, rest)) = out.split_first_mut() else {
        return 0;
    };
    if value == 0 {
        *first = digit(0);
        rest.fill(BLANK);
        return 1;
    }

    let mut remaining = value;
    let mut used = 0;
    for seg in out.iter_mut() {
        if remaining != 0 {
            *seg = digit((remaining % 10) as u8);
            remaining /= 10;
            used += 1;
        } else {
            *seg = BLANK;
        }
    }
    used
}

/// Write `value` with a decimal point at `dp_pos` (1 is the rightmost digit, 0 is none).
///
/// Blank positions from the second digit up to the decimal point are filled with zeros, so `5`
/// with the point on the third digit reads `0.05`.  A `dp_pos` past the end of `out` places no
/// point.  Returns the number of positions in use, which is at least `dp_pos`.
pub(crate) fn write_decimal(value: u32, dp_pos: u8, out: &mut [u8]) -> u8 {
    // a u32 has at most ten decimal digits
    let used = write_number(value, out) as u8;
    let dp = usize::from(dp_pos);
    if dp != 0 && dp <= out.len() {
        for seg in out[1..dp].iter_mut() {
            if *seg == BLANK {
                *seg = digit(0);
            }
        }
        out[dp - 1] |= DECIMAL_POINT;
    }
    used.max(dp_pos)
}

/// Like [`write_decimal`], with a minus sign on the position after the last digit.
///
/// Returns `true` when the number is negative but the sign does not fit.
pub(crate) fn write_signed(value: i32, dp_pos: u8, out: &mut [u8]) -> bool {
    let sign_pos = write_decimal(value.unsigned_abs(), dp_pos, out);
    if value < 0 {
        match out.get_mut(usize::from(sign_pos)) {
            Some(seg) => *seg |= DASH,
            None => return true,
        }
    }
    false
}

pub(crate) fn write_symbol(symbol: Symbol, out: &mut [u8]) {
    out.fill(BLANK);
    match symbol {
        Symbol::Blank => (),
        Symbol::Error => write_centered(&ERROR, out),
        Symbol::Foul => write_centered(&FOUL, out),
        Symbol::Dash => out.fill(DASH),
        Symbol::Test => out.fill(ALL_ON),
    }
}

/// Centre `pattern` in `out`, or keep its first `out.len()` bytes if it does not fit.
fn write_centered(pattern: &[u8], out: &mut [u8]) {
    if pattern.len() < out.len() {
        let start = (out.len() - pattern.len()) / 2;
        out[start..start + pattern.len()].copy_from_slice(pattern);
    } else {
        out.copy_from_slice(&pattern[..out.len()]);
    }
}
