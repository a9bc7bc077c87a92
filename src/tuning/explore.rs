//! Free exploration: the lattice of ratios reachable from a seed interval.
//!
//! Every candidate is `seed^m * base^n`, a point on a two-dimensional grid in
//! log-frequency space (m steps of the seed plus n steps of the base). Each
//! point is folded into the first octave so the results are directly
//! comparable, then duplicates are removed and the set is sorted by pitch.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use super::ratio::{compose, octave_reduce, Ratio};
use crate::error::{Error, Result};

/// Upper bound on `(m_max + 1) * (n_max + 1)` for a single call.
pub const MAX_COMBINATIONS: usize = 256;

/// Largest term a lattice point may need, so every step fits a [`Ratio`].
const MAX_TERM: u128 = u32::MAX as u128;

/// Grid bounds for [`explore`].
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExploreBounds {
    pub m_max: u32,
    pub n_max: u32,
    /// Second generator of the lattice.
    pub base: Ratio,
}

impl Default for ExploreBounds {
    fn default() -> Self {
        Self {
            m_max: 3,
            n_max: 3,
            base: Ratio::MAJOR_THIRD,
        }
    }
}

impl ExploreBounds {
    pub fn new(m_max: u32, n_max: u32) -> Self {
        Self {
            m_max,
            n_max,
            ..Self::default()
        }
    }

    pub fn with_base(mut self, base: Ratio) -> Self {
        self.base = base;
        self
    }

    /// Number of grid points before deduplication.
    pub fn combinations(&self) -> usize {
        (self.m_max as usize + 1).saturating_mul(self.n_max as usize + 1)
    }
}

/// Result of one exploration call, ascending by frequency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExplorationSet {
    seed: Ratio,
    ratios: Vec<Ratio>,
}

impl ExplorationSet {
    pub fn seed(&self) -> Ratio {
        self.seed
    }

    pub fn ratios(&self) -> &[Ratio] {
        &self.ratios
    }

    pub fn len(&self) -> usize {
        self.ratios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ratios.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Ratio> {
        self.ratios.iter()
    }
}

impl IntoIterator for ExplorationSet {
    type Item = Ratio;
    type IntoIter = std::vec::IntoIter<Ratio>;

    fn into_iter(self) -> Self::IntoIter {
        self.ratios.into_iter()
    }
}

impl<'a> IntoIterator for &'a ExplorationSet {
    type Item = &'a Ratio;
    type IntoIter = std::slice::Iter<'a, Ratio>;

    fn into_iter(self) -> Self::IntoIter {
        self.ratios.iter()
    }
}

/// Worst-case term of any lattice point, or `None` past `u128`.
///
/// With `M` and `Q` the larger terms of seed and base, every product along
/// the walk stays below `M^m * Q^n`, and octave folding at most doubles the
/// smaller side, so `2 * M^m_max * Q^n_max` bounds every intermediate term.
fn term_bound(seed: Ratio, bounds: ExploreBounds) -> Option<u128> {
    let widest = |r: Ratio| r.numerator().max(r.denominator()) as u128;
    let seed_part = widest(seed).checked_pow(bounds.m_max)?;
    let base_part = widest(bounds.base).checked_pow(bounds.n_max)?;
    seed_part.checked_mul(base_part)?.checked_mul(2)
}

/// Enumerate the octave-reduced lattice spanned by `seed` and `bounds.base`.
///
/// Fails with [`Error::ExplorationTooLarge`] before doing any work if the
/// grid has more than [`MAX_COMBINATIONS`] points or its terms could outgrow
/// 32 bits; an admitted request always succeeds. Nothing is cached between
/// calls.
pub fn explore(seed: Ratio, bounds: ExploreBounds) -> Result<ExplorationSet> {
    let combinations = bounds.combinations();
    if combinations > MAX_COMBINATIONS {
        return Err(Error::ExplorationTooLarge {
            combinations,
            reason: format!("more than {MAX_COMBINATIONS} grid points"),
        });
    }
    if term_bound(seed, bounds).map_or(true, |bound| bound > MAX_TERM) {
        return Err(Error::ExplorationTooLarge {
            combinations,
            reason: format!(
                "{seed}^{} x {}^{} outgrows 32-bit terms",
                bounds.m_max, bounds.base, bounds.n_max
            ),
        });
    }

    // Reducing after every step keeps the terms small; the octave factor
    // never changes the reduced result.
    let mut ratios = Vec::with_capacity(combinations);
    let mut seed_power = Ratio::UNISON;
    for m in 0..=bounds.m_max {
        if m > 0 {
            seed_power = octave_reduce(compose(seed_power, seed)?)?;
        }
        let mut point = seed_power;
        for n in 0..=bounds.n_max {
            if n > 0 {
                point = octave_reduce(compose(point, bounds.base)?)?;
            }
            ratios.push(point);
        }
    }

    ratios.sort_unstable();
    ratios.dedup();

    Ok(ExplorationSet { seed, ratios })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn r(n: u32, d: u32) -> Ratio {
        Ratio::new(n, d).unwrap()
    }

    #[test]
    fn fifth_seed_with_small_bounds() {
        let set = explore(Ratio::FIFTH, ExploreBounds::new(2, 2)).unwrap();
        assert!(set.len() <= 9);
        assert!(set.ratios().windows(2).all(|w| w[0] < w[1]));
        for ratio in &set {
            assert!(ratio.value() >= 1.0 && ratio.value() < 2.0);
        }
        // 1, 3/2, 9/8 along the seed axis
        assert!(set.ratios().contains(&Ratio::UNISON));
        assert!(set.ratios().contains(&r(3, 2)));
        assert!(set.ratios().contains(&r(9, 8)));
        // 5/4 and 25/16 along the base axis, 15/8 on the diagonal
        assert!(set.ratios().contains(&r(5, 4)));
        assert!(set.ratios().contains(&r(25, 16)));
        assert!(set.ratios().contains(&r(15, 8)));
    }

    #[test]
    fn duplicates_are_removed() {
        // Seed equal to base folds the grid onto its diagonal sums
        let set = explore(Ratio::MAJOR_THIRD, ExploreBounds::new(2, 2)).unwrap();
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn octave_seed_collapses_to_unison() {
        let set = explore(Ratio::OCTAVE, ExploreBounds::new(3, 0)).unwrap();
        assert_eq!(set.ratios(), &[Ratio::UNISON]);
    }

    #[test]
    fn restartable() {
        let bounds = ExploreBounds::default();
        let first = explore(r(7, 4), bounds).unwrap();
        let second = explore(r(7, 4), bounds).unwrap();
        assert_eq!(first, second);
        assert_eq!(first.seed(), r(7, 4));
    }

    #[test]
    fn bound_cap_is_enforced() {
        let err = explore(Ratio::FIFTH, ExploreBounds::new(20, 20)).unwrap_err();
        assert!(matches!(err, Error::ExplorationTooLarge { combinations: 441, .. }));
    }

    #[test]
    fn term_width_limits_depth() {
        // 2 * 3^7 * 5^7 fits in 32 bits, 2 * 3^8 * 5^8 does not
        let widest = explore(Ratio::FIFTH, ExploreBounds::new(7, 7)).unwrap();
        assert!(widest.len() <= 64);
        assert!(widest.iter().all(|r| (1.0..2.0).contains(&r.value())));
        assert!(matches!(
            explore(Ratio::FIFTH, ExploreBounds::new(8, 8)),
            Err(Error::ExplorationTooLarge { combinations: 81, .. })
        ));
    }

    #[test]
    fn single_axis_runs_to_the_last_admitted_power() {
        // Pythagorean chain: 3^19 is the last power under the bound
        let chain = explore(Ratio::FIFTH, ExploreBounds::new(19, 0)).unwrap();
        assert_eq!(chain.len(), 20);
        assert!(chain.ratios().contains(&r(1_162_261_467, 1_073_741_824)));
        assert!(explore(Ratio::FIFTH, ExploreBounds::new(20, 0)).is_err());
        assert!(explore(Ratio::FIFTH, ExploreBounds::new(255, 0)).is_err());

        let septimal = explore(r(7, 4), ExploreBounds::new(11, 0)).unwrap();
        assert_eq!(septimal.len(), 12);
        assert!(matches!(
            explore(r(7, 4), ExploreBounds::new(12, 0)),
            Err(Error::ExplorationTooLarge { .. })
        ));
    }

    #[test]
    fn custom_base() {
        let bounds = ExploreBounds::new(1, 1).with_base(Ratio::HARMONIC_SEVENTH);
        let set = explore(Ratio::FIFTH, bounds).unwrap();
        assert_eq!(
            set.into_iter().collect::<Vec<_>>(),
            vec![Ratio::UNISON, r(21, 16), r(3, 2), r(7, 4)]
        );
    }
}
