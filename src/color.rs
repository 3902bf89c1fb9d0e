//! Colour channel ordering.
//!
//! Colours are handled as `0x00RRGGBB` words.  WS2801 strips are wired with the three channels in
//! any order, so the strip driver rearranges each word into wire order before storing it.

/// Pack three channels into a `0x00RRGGBB` word.
pub const fn rgb(r: u8, g: u8, b: u8) -> u32 {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

/// Split a `0x00RRGGBB` word into its three lanes, highest first.
pub const fn lanes(color: u32) -> [u8; 3] {
    [(color >> 16) as u8, (color >> 8) as u8, color as u8]
}

/// Byte lane permutation applied before a colour is written to the strip.
///
/// The name of each standard variant is the wire order: with [`ColorOrder::Grb`] the first byte
/// shifted out for a pixel is the green channel.
#[derive(Debug, Clone, Copy, Default)]
pub enum ColorOrder {
    #[default]
    Rgb,
    Grb,
    Rbg,
    Gbr,
    Brg,
    Bgr,
    /// Caller supplied transform.  Nothing checks that it is a permutation.
    Custom(fn(u32) -> u32),
}

impl ColorOrder {
    pub fn apply(self, color: u32) -> u32 {
        let [r, g, b] = lanes(color);
        match self {
            ColorOrder::Rgb => color & 0x00ff_ffff,
            ColorOrder::Grb => rgb(g, r, b),
            ColorOrder::Rbg => rgb(r, b, g),
            ColorOrder::Gbr => rgb(g, b, r),
            ColorOrder::Brg => rgb(b, r, g),
            ColorOrder::Bgr => rgb(b, g, r),
            ColorOrder::Custom(f) => f(color),
        }
    }

    /// The ordering that undoes this one, `None` for [`ColorOrder::Custom`].
    pub fn inverse(self) -> Option<ColorOrder> {
        match self {
            ColorOrder::Rgb => Some(ColorOrder::Rgb),
            ColorOrder::Grb => Some(ColorOrder::Grb),
            ColorOrder::Rbg => Some(ColorOrder::Rbg),
            ColorOrder::Gbr => Some(ColorOrder::Brg),
            ColorOrder::Brg => Some(ColorOrder::Gbr),
            ColorOrder::Bgr => Some(ColorOrder::Bgr),
            ColorOrder::Custom(_) => None,
        }
    }

    pub const STANDARD: [ColorOrder; 6] = [
        ColorOrder::Rgb,
        ColorOrder::Grb,
        ColorOrder::Rbg,
        ColorOrder::Gbr,
        ColorOrder::Brg,
        ColorOrder::Bgr,
    ];
}

#[cfg(feature = "defmt")]
impl defmt::Format for ColorOrder {
    fn format(&self, f: defmt::Formatter<'_>) {
        match self {
            ColorOrder::Rgb => defmt::write!(f, "Rgb"),
            ColorOrder::Grb => defmt::write!(f, "Grb"),
            ColorOrder::Rbg => defmt::write!(f, "Rbg"),
            ColorOrder::Gbr => defmt::write!(f, "Gbr"),
            ColorOrder::Brg => defmt::write!(f, "Brg"),
            ColorOrder::Bgr => defmt::write!(f, "Bgr"),
            ColorOrder::Custom(_) => defmt::write!(f, "Custom"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{lanes, rgb, ColorOrder};

    const SAMPLES: [u32; 4] = [0x00_12_34_56, 0x00_ff_00_80, 0x00_00_00_01, 0x00_ab_cd_ef];

    #[test]
    fn wire_order_matches_name() {
        let c = rgb(0x11, 0x22, 0x33);
        assert_eq!(ColorOrder::Rgb.apply(c), 0x11_22_33);
        assert_eq!(ColorOrder::Grb.apply(c), 0x22_11_33);
        assert_eq!(ColorOrder::Rbg.apply(c), 0x11_33_22);
        assert_eq!(ColorOrder::Gbr.apply(c), 0x22_33_11);
        assert_eq!(ColorOrder::Brg.apply(c), 0x33_11_22);
        assert_eq!(ColorOrder::Bgr.apply(c), 0x33_22_11);
    }

    #[test]
    fn standard_orders_are_bijections() {
        for order in ColorOrder::STANDARD {
            let inverse = order.inverse().unwrap();
            for c in SAMPLES {
                let permuted = order.apply(c);
                assert_eq!(inverse.apply(permuted), c);

                let mut before = lanes(c);
                let mut after = lanes(permuted);
                before.sort_unstable();
                after.sort_unstable();
                assert_eq!(before, after);
            }
        }
    }

    #[test]
    fn custom_order_has_no_inverse() {
        fn swap_rb(c: u32) -> u32 {
            let [r, g, b] = lanes(c);
            rgb(b, g, r)
        }
        let order = ColorOrder::Custom(swap_rb);
        assert_eq!(order.apply(0x01_02_03), 0x03_02_01);
        assert!(order.inverse().is_none());
    }
}
