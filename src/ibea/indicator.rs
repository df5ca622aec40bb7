//! Binary quality indicators.
//!
//! An indicator `I(a, b)` measures how much `b` is worse than `a`; smaller
//! values mean `a` is comparatively better. Indicators are asymmetric and
//! deterministic in the objective vectors.
//!
//! - [`AdditiveEpsilon`]: smallest shift that makes `a` weakly dominate `b`
//! - [`Hypervolume`]: signed volume difference in a reference box derived
//!   from the working set
//!
//! # References
//!
//! - Zitzler & Künzli (2004), "Indicator-Based Selection in Multiobjective Search"
//! - Zitzler et al. (2003), "Performance Assessment of Multiobjective Optimizers"

use super::multi_objective::dominates;

/// A binary quality indicator over objective vectors (minimization).
pub trait Indicator {
    /// Calibrates the indicator against the working set.
    ///
    /// Called once by fitness assignment before any pairwise
    /// [`value`](Indicator::value) call on that set. The default is a no-op.
    fn prepare(&mut self, _objectives: &[&[f64]]) {}

    /// Indicator value `I(a, b)`.
    fn value(&self, a: &[f64], b: &[f64]) -> f64;
}

impl<I: Indicator + ?Sized> Indicator for Box<I> {
    fn prepare(&mut self, objectives: &[&[f64]]) {
        (**self).prepare(objectives);
    }

    fn value(&self, a: &[f64], b: &[f64]) -> f64 {
        (**self).value(a, b)
    }
}

/// Additive epsilon indicator: `I(a, b) = max_k (a_k - b_k)`.
///
/// # Example
///
/// ```
/// use u_ibea::ibea::indicator::{AdditiveEpsilon, Indicator};
///
/// let eps = AdditiveEpsilon;
/// // a already dominates b, so the required shift is negative
/// assert_eq!(eps.value(&[1.0, 1.0], &[2.0, 3.0]), -1.0);
/// assert_eq!(eps.value(&[2.0, 3.0], &[1.0, 1.0]), 2.0);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AdditiveEpsilon;

impl Indicator for AdditiveEpsilon {
    fn value(&self, a: &[f64], b: &[f64]) -> f64 {
        debug_assert_eq!(a.len(), b.len(), "objective counts differ");
        a.iter()
            .zip(b)
            .map(|(&ak, &bk)| ak - bk)
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

/// Hypervolume-difference indicator.
///
/// `I(a, b) = -HV(a \ b)` if `a` dominates `b`, otherwise `HV(b \ a)`, where
/// `HV(x \ y)` is the volume dominated by `x` but not by `y`, normalized by
/// a reference box spanning `rho` times the objective ranges of the working
/// set. [`prepare`](Indicator::prepare) recomputes the ranges.
#[derive(Debug, Clone, PartialEq)]
pub struct Hypervolume {
    rho: f64,
    min: Vec<f64>,
    max: Vec<f64>,
}

impl Default for Hypervolume {
    fn default() -> Self {
        Self::new(2.0)
    }
}

impl Hypervolume {
    /// Creates an uncalibrated indicator with reference-box factor `rho`.
    pub fn new(rho: f64) -> Self {
        Self {
            rho,
            min: Vec::new(),
            max: Vec::new(),
        }
    }

    /// Creates an indicator with fixed per-objective ranges.
    pub fn with_ranges(rho: f64, min: Vec<f64>, max: Vec<f64>) -> Self {
        debug_assert_eq!(min.len(), max.len());
        Self { rho, min, max }
    }

    /// Reference-box extent along objective `k`.
    fn extent(&self, k: usize) -> f64 {
        let span = self.max[k] - self.min[k];
        self.rho * if span > 0.0 { span } else { 1.0 }
    }

    /// Volume dominated by `a` but not by `b` over the first `d` objectives.
    ///
    /// `b = None` stands for the reference point. Zero objectives enclose
    /// no volume.
    fn volume(&self, a: &[f64], b: Option<&[f64]>, d: usize) -> f64 {
        let Some(k) = d.checked_sub(1) else {
            return 0.0;
        };
        let r = self.extent(k);
        let upper = self.min[k] + r;
        let ak = a[k];
        let bk = b.map_or(upper, |b| b[k]);

        if d == 1 {
            return if ak < bk { (bk - ak) / r } else { 0.0 };
        }

        if ak < bk {
            self.volume(a, None, k) * (bk - ak) / r + self.volume(a, b, k) * (upper - bk) / r
        } else {
            self.volume(a, b, k) * (upper - ak) / r
        }
    }
}

impl Indicator for Hypervolume {
    fn prepare(&mut self, objectives: &[&[f64]]) {
        let m = objectives.first().map_or(0, |o| o.len());
        self.min = vec![f64::INFINITY; m];
        self.max = vec![f64::NEG_INFINITY; m];
        for obj in objectives {
            for (k, &v) in obj.iter().enumerate() {
                self.min[k] = self.min[k].min(v);
                self.max[k] = self.max[k].max(v);
            }
        }
    }

    /// Requires calibration by [`prepare`](Indicator::prepare) or
    /// [`with_ranges`](Hypervolume::with_ranges) for the same objective
    /// count; an uncalibrated indicator scores every pair 0.
    fn value(&self, a: &[f64], b: &[f64]) -> f64 {
        let d = a.len();
        if self.min.len() < d || self.max.len() < d || b.len() < d {
            return 0.0;
        }
        if dominates(a, b) {
            -self.volume(a, Some(b), d)
        } else {
            self.volume(b, Some(a), d)
        }
    }
}

/// Built-in indicator choice for [`IbeaConfig`](super::IbeaConfig).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum IndicatorKind {
    /// [`AdditiveEpsilon`].
    #[default]
    AdditiveEpsilon,

    /// [`Hypervolume`] with `rho = 2`.
    Hypervolume,
}

impl IndicatorKind {
    /// Instantiates the indicator.
    pub fn build(self) -> Box<dyn Indicator + Send> {
        match self {
            IndicatorKind::AdditiveEpsilon => Box::new(AdditiveEpsilon),
            IndicatorKind::Hypervolume => Box::new(Hypervolume::default()),
        }
    }
}
