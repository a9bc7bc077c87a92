use std::{cmp::Ordering, fmt, str::FromStr};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Pitch interval represented as an exact fraction of the root frequency.
/// Always stored in lowest terms, so structural equality is numeric equality.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ratio {
    numerator: u32,
    denominator: u32,
}

impl Ratio {
    // Common intervals
    pub const UNISON: Ratio = Ratio::reduced(1, 1);
    pub const OCTAVE: Ratio = Ratio::reduced(2, 1);
    pub const FIFTH: Ratio = Ratio::reduced(3, 2);
    pub const FOURTH: Ratio = Ratio::reduced(4, 3);
    pub const MAJOR_THIRD: Ratio = Ratio::reduced(5, 4);
    pub const MINOR_THIRD: Ratio = Ratio::reduced(6, 5);
    pub const HARMONIC_SEVENTH: Ratio = Ratio::reduced(7, 4);

    /// Build a ratio, reducing it to lowest terms.
    ///
    /// Fails with [`Error::InvalidRatio`] if either term is zero.
    pub fn new(numerator: u32, denominator: u32) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(Error::InvalidRatio {
                numerator: numerator as i64,
                denominator: denominator as i64,
            });
        }
        Ok(Self::reduced(numerator, denominator))
    }

    /// Const constructor for catalog data. Both terms must be non-zero.
    pub(crate) const fn reduced(numerator: u32, denominator: u32) -> Self {
        let gcd = const_gcd(numerator as u64, denominator as u64) as u32;
        Ratio {
            numerator: numerator / gcd,
            denominator: denominator / gcd,
        }
    }

    fn from_wide(numerator: u64, denominator: u64) -> Result<Self> {
        if numerator == 0 || denominator == 0 {
            return Err(Error::InvalidRatio {
                numerator: i64::try_from(numerator).unwrap_or(i64::MAX),
                denominator: i64::try_from(denominator).unwrap_or(i64::MAX),
            });
        }
        let gcd = const_gcd(numerator, denominator);
        let (n, d) = (numerator / gcd, denominator / gcd);
        match (u32::try_from(n), u32::try_from(d)) {
            (Ok(numerator), Ok(denominator)) => Ok(Ratio {
                numerator,
                denominator,
            }),
            _ => Err(Error::RatioOverflow(format!("{n}/{d}"))),
        }
    }

    pub const fn numerator(&self) -> u32 {
        self.numerator
    }

    pub const fn denominator(&self) -> u32 {
        self.denominator
    }

    /// Ratio as a floating point multiplier.
    pub fn value(&self) -> f64 {
        self.numerator as f64 / self.denominator as f64
    }

    /// Interval size in cents (1200 per octave).
    pub fn cents(&self) -> f64 {
        1200.0 * self.value().log2()
    }

    /// Frequency of this interval above `root` Hz.
    pub fn frequency(&self, root: f64) -> f64 {
        to_frequency(root, *self)
    }

    /// Raise the ratio to a non-negative integer power.
    pub fn pow(self, exponent: u32) -> Result<Self> {
        let mut acc = Ratio::UNISON;
        for _ in 0..exponent {
            acc = compose(acc, self)?;
        }
        Ok(acc)
    }
}

/// Frequency in Hz of ratio `r` above `root`.
///
/// Multiplication happens before division so that integer-valued results
/// (220 Hz x 3/2) come out exact.
pub fn to_frequency(root: f64, r: Ratio) -> f64 {
    root * r.numerator as f64 / r.denominator as f64
}

/// Stack two intervals: multiply the ratios and reduce to lowest terms.
pub fn compose(a: Ratio, b: Ratio) -> Result<Ratio> {
    // u32 x u32 always fits in u64
    let numerator = a.numerator as u64 * b.numerator as u64;
    let denominator = a.denominator as u64 * b.denominator as u64;
    Ratio::from_wide(numerator, denominator)
}

/// Fold a ratio into the octave [1, 2) by halving or doubling.
pub fn octave_reduce(r: Ratio) -> Result<Ratio> {
    let mut numerator = r.numerator as u64;
    let mut denominator = r.denominator as u64;

    // Lowest terms on entry: at most one of the two is even at any step,
    // so prefer halving the even term over doubling the other.
    while numerator >= 2 * denominator {
        if numerator % 2 == 0 {
            numerator /= 2;
        } else {
            denominator *= 2;
        }
    }
    while numerator < denominator {
        if denominator % 2 == 0 {
            denominator /= 2;
        } else {
            numerator *= 2;
        }
    }

    Ratio::from_wide(numerator, denominator)
}

impl Ord for Ratio {
    fn cmp(&self, other: &Self) -> Ordering {
        let lhs = self.numerator as u64 * other.denominator as u64;
        let rhs = other.numerator as u64 * self.denominator as u64;
        lhs.cmp(&rhs)
    }
}

impl PartialOrd for Ratio {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Ratio {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.numerator, self.denominator)
    }
}

/// Parses `3/2` or a bare integer such as `5` (read as `5/1`).
impl FromStr for Ratio {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let (numerator, denominator) = parse_terms(s)?;
        Ratio::new(numerator, denominator)
    }
}

/// Split `3/2` or `5` into raw terms without reducing.
///
/// Zero terms pass through for the caller to reject; negative terms fail
/// with [`Error::InvalidRatio`] since they can never name a pitch.
pub(crate) fn parse_terms(s: &str) -> Result<(u32, u32)> {
    let (num, den) = match s.trim().split_once('/') {
        Some((num, den)) => (num, den),
        None => (s, "1"),
    };
    let term = |word: &str| {
        word.trim()
            .parse::<i64>()
            .map_err(|_| Error::InvalidCommand(format!("cannot parse ratio '{}'", s.trim())))
    };
    let (numerator, denominator) = (term(num)?, term(den)?);

    if numerator < 0 || denominator < 0 {
        return Err(Error::InvalidRatio {
            numerator,
            denominator,
        });
    }
    match (u32::try_from(numerator), u32::try_from(denominator)) {
        (Ok(numerator), Ok(denominator)) => Ok((numerator, denominator)),
        _ => Err(Error::RatioOverflow(format!("{numerator}/{denominator}"))),
    }
}

/// Greatest common divisor (Euclidean algorithm)
const fn const_gcd(mut a: u64, mut b: u64) -> u64 {
    while b != 0 {
        let temp = b;
        b = a % b;
        a = temp;
    }
    a
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u32, d: u32) -> Ratio {
        Ratio::new(n, d).unwrap()
    }

    #[test]
    fn new_reduces_to_lowest_terms() {
        let ratio = r(6, 4);
        assert_eq!(ratio.numerator(), 3);
        assert_eq!(ratio.denominator(), 2);
        assert_eq!(ratio, Ratio::FIFTH);
    }

    #[test]
    fn zero_terms_are_rejected() {
        assert!(matches!(Ratio::new(3, 0), Err(Error::InvalidRatio { .. })));
        assert!(matches!(Ratio::new(0, 2), Err(Error::InvalidRatio { .. })));
    }

    #[test]
    fn frequency_is_exact() {
        assert_eq!(to_frequency(220.0, Ratio::FIFTH), 330.0);
        assert_eq!(to_frequency(100.0, r(5, 4)), 125.0);
        assert_eq!(to_frequency(440.0, r(1, 16)), 27.5);
        for (root, ratio) in [(261.63, r(7, 4)), (55.0, r(11, 9)), (1999.0, r(13, 8))] {
            let expected = root * ratio.numerator() as f64 / ratio.denominator() as f64;
            assert_eq!(to_frequency(root, ratio), expected);
        }
    }

    #[test]
    fn compose_multiplies_and_reduces() {
        // fifth + fourth = octave
        assert_eq!(compose(Ratio::FIFTH, Ratio::FOURTH).unwrap(), Ratio::OCTAVE);
        // major third + minor third = fifth
        assert_eq!(
            compose(Ratio::MAJOR_THIRD, Ratio::MINOR_THIRD).unwrap(),
            Ratio::FIFTH
        );
    }

    #[test]
    fn compose_is_commutative_and_associative() {
        let samples = [r(3, 2), r(5, 4), r(7, 6), r(11, 8), r(1, 3), r(16, 15)];
        for &a in &samples {
            for &b in &samples {
                assert_eq!(compose(a, b).unwrap(), compose(b, a).unwrap());
                for &c in &samples {
                    let left = compose(compose(a, b).unwrap(), c).unwrap();
                    let right = compose(a, compose(b, c).unwrap()).unwrap();
                    assert_eq!(left, right);
                }
            }
        }
    }

    #[test]
    fn compose_reports_overflow() {
        let wide = r(u32::MAX, 1);
        assert!(matches!(compose(wide, wide), Err(Error::RatioOverflow(_))));
    }

    #[test]
    fn octave_reduce_lands_in_first_octave() {
        assert_eq!(octave_reduce(r(3, 1)).unwrap(), r(3, 2));
        assert_eq!(octave_reduce(r(1, 3)).unwrap(), r(4, 3));
        assert_eq!(octave_reduce(r(2, 1)).unwrap(), Ratio::UNISON);
        assert_eq!(octave_reduce(r(9, 4)).unwrap(), r(9, 8));
        assert_eq!(octave_reduce(r(1, 16)).unwrap(), Ratio::UNISON);
    }

    #[test]
    fn octave_reduce_is_idempotent() {
        for n in 1..40 {
            for d in 1..40 {
                let once = octave_reduce(r(n, d)).unwrap();
                let twice = octave_reduce(once).unwrap();
                assert_eq!(once, twice);
                assert!(once.value() >= 1.0 && once.value() < 2.0, "{once} out of octave");
            }
        }
    }

    #[test]
    fn ordering_follows_value() {
        let mut ratios = vec![r(3, 2), r(9, 8), r(5, 4), r(1, 1), r(15, 8)];
        ratios.sort();
        assert_eq!(ratios, vec![r(1, 1), r(9, 8), r(5, 4), r(3, 2), r(15, 8)]);
    }

    #[test]
    fn parse_and_display() {
        assert_eq!("3/2".parse::<Ratio>().unwrap(), Ratio::FIFTH);
        assert_eq!(" 10 / 8 ".parse::<Ratio>().unwrap(), Ratio::MAJOR_THIRD);
        assert_eq!("5".parse::<Ratio>().unwrap(), r(5, 1));
        assert!("3/x".parse::<Ratio>().is_err());
        assert!("3/0".parse::<Ratio>().is_err());
        assert_eq!(r(7, 4).to_string(), "7/4");
    }

    #[test]
    fn negative_terms_are_invalid_ratios() {
        assert_eq!(
            "3/-2".parse::<Ratio>(),
            Err(Error::InvalidRatio {
                numerator: 3,
                denominator: -2
            })
        );
        assert!(matches!(
            "-5".parse::<Ratio>(),
            Err(Error::InvalidRatio { numerator: -5, .. })
        ));
        assert_eq!(parse_terms("7/0").unwrap(), (7, 0));
        assert!(matches!(
            parse_terms("4294967296/1"),
            Err(Error::RatioOverflow(_))
        ));
    }

    #[test]
    fn cents_of_octave_and_pow() {
        assert!((Ratio::OCTAVE.cents() - 1200.0).abs() < 1e-9);
        assert_eq!(Ratio::FIFTH.pow(2).unwrap(), r(9, 4));
        assert_eq!(Ratio::FIFTH.pow(0).unwrap(), Ratio::UNISON);
    }
}
