use std::fmt;
use thiserror::Error;

/// Bounds of the alpha channel that a transparency percentage is mapped into
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) enum TransparencyRange {
    Complete,
    Moderate,
    Low,
}

impl TransparencyRange {
    pub(crate) fn bounds(self) -> (u8, u8) {
        match self {
            TransparencyRange::Complete => (0x00, 0xFF),
            TransparencyRange::Moderate => (0x00, 0x50),
            TransparencyRange::Low => (0x00, 0x1E),
        }
    }
}

/// Transparency as a percentage.  Values outside `0..=100` are accepted and
/// clamped when an alpha value is computed.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Transparency(pub(crate) i64);

impl Transparency {
    pub(crate) fn alpha(self, range: TransparencyRange) -> u8 {
        let (min, max) = range.bounds();
        let opacity = 100 - self.0.clamp(0, 100);
        let span = i64::from(max - min);
        u8::try_from(i64::from(min) + span * opacity / 100).unwrap_or(max)
    }

    pub(crate) fn alpha_hex(self, range: TransparencyRange) -> String {
        format!("{:02X}", self.alpha(range))
    }
}

#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub(crate) enum ColourError {
    #[error("invalid colour string {0:?}")]
    Invalid(String),
}

/// A colour with an alpha channel, packed as `0xAARRGGBB`
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub(crate) struct Argb(pub(crate) u32);

impl Argb {
    /// Parses `#RRGGBB` (fully opaque) or `#AARRGGBB`
    pub(crate) fn parse(s: &str) -> Result<Argb, ColourError> {
        let invalid = || ColourError::Invalid(s.to_owned());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(invalid());
        }
        let value = u32::from_str_radix(hex, 16).map_err(|_| invalid())?;
        match hex.len() {
            6 => Ok(Argb(0xFF00_0000 | value)),
            8 => Ok(Argb(value)),
            _ => Err(invalid()),
        }
    }

    pub(crate) fn alpha(self) -> u8 {
        self.0.to_be_bytes()[0]
    }

    pub(crate) fn red(self) -> u8 {
        self.0.to_be_bytes()[1]
    }

    pub(crate) fn green(self) -> u8 {
        self.0.to_be_bytes()[2]
    }

    pub(crate) fn blue(self) -> u8 {
        self.0.to_be_bytes()[3]
    }
}

impl fmt::Display for Argb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:08X}", self.0)
    }
}

/// Applies `transparency` to the `#RRGGBB`/`#AARRGGBB` colour `colour` by
/// replacing its alpha channel
pub(crate) fn with_transparency(
    colour: &str,
    transparency: Transparency,
    range: TransparencyRange,
) -> Result<Argb, ColourError> {
    Argb::parse(colour)?;
    let rgb = colour
        .get(colour.len() - 6..)
        .ok_or_else(|| ColourError::Invalid(colour.to_owned()))?;
    Argb::parse(&format!("#{}{rgb}", transparency.alpha_hex(range)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complete_range_endpoints() {
        assert_eq!(Transparency(0).alpha(TransparencyRange::Complete), 0xFF);
        assert_eq!(Transparency(100).alpha(TransparencyRange::Complete), 0x00);
        assert_eq!(
            with_transparency("#FFFFFF", Transparency(0), TransparencyRange::Complete),
            Ok(Argb(0xFFFF_FFFF))
        );
        assert_eq!(
            with_transparency("#FFFFFF", Transparency(100), TransparencyRange::Complete),
            Ok(Argb(0x00FF_FFFF))
        );
    }

    #[test]
    fn test_alpha_values() {
        for (p, range, expected) in [
            (20, TransparencyRange::Complete, "CC"),
            (50, TransparencyRange::Complete, "7F"),
            (0, TransparencyRange::Moderate, "50"),
            (100, TransparencyRange::Moderate, "00"),
            (50, TransparencyRange::Moderate, "28"),
            (0, TransparencyRange::Low, "1E"),
            (100, TransparencyRange::Low, "00"),
        ] {
            assert_eq!(Transparency(p).alpha_hex(range), expected, "{p}% {range:?}");
        }
    }

    #[test]
    fn test_out_of_range_is_clamped() {
        assert_eq!(
            Transparency(-40).alpha(TransparencyRange::Complete),
            Transparency(0).alpha(TransparencyRange::Complete)
        );
        assert_eq!(
            Transparency(250).alpha(TransparencyRange::Moderate),
            Transparency(100).alpha(TransparencyRange::Moderate)
        );
    }

    #[test]
    fn test_existing_alpha_is_replaced() {
        assert_eq!(
            with_transparency("#80123456", Transparency(0), TransparencyRange::Complete),
            Ok(Argb(0xFF12_3456))
        );
        assert_eq!(
            with_transparency("#123456", Transparency(100), TransparencyRange::Low),
            Ok(Argb(0x0012_3456))
        );
    }

    #[test]
    fn test_deterministic() {
        for p in 0..=100 {
            for range in [
                TransparencyRange::Complete,
                TransparencyRange::Moderate,
                TransparencyRange::Low,
            ] {
                assert_eq!(
                    with_transparency("#5A6D94", Transparency(p), range),
                    with_transparency("#5A6D94", Transparency(p), range)
                );
            }
        }
    }

    #[test]
    fn test_malformed_colours() {
        for s in ["", "FFFFFF", "#FFF", "#GGGGGG", "#+1234567", "#é12345"] {
            assert!(
                with_transparency(s, Transparency(0), TransparencyRange::Complete).is_err(),
                "{s:?}"
            );
        }
    }

    #[test]
    fn test_parse_and_channels() {
        let c = Argb::parse("#CC5A6D94").unwrap();
        assert_eq!(c.alpha(), 0xCC);
        assert_eq!(c.red(), 0x5A);
        assert_eq!(c.green(), 0x6D);
        assert_eq!(c.blue(), 0x94);
        assert_eq!(c.to_string(), "#CC5A6D94");
        assert_eq!(Argb::parse("#000000"), Ok(Argb(0xFF00_0000)));
    }
}
