use std::cmp::Ordering;
use std::collections::HashSet;
use std::fmt;

use num_rational::BigRational;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::label::Label;
use crate::lengths::Lengths;
use crate::ring::Ring;

/// The outcome of a bounded run of induction steps, see
/// [`IntervalExchangeTransformation::induce`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Induction {
    /// The limit was reached without finding anything of interest.
    LimitReached,
    /// The transformation is now a cylinder, i.e., a single pair of
    /// intervals.
    Cylinder,
    /// A connection was found that separates the transformation into two
    /// independent ones.
    SeparatingConnection,
    /// A connection was found; the two intervals bounding it were merged
    /// into one.
    NonSeparatingConnection,
    /// Boshernitzan's criterion certified that there is no periodic
    /// trajectory, so no connection will ever show up.
    WithoutPeriodicTrajectory,
}

/// What a call to [`IntervalExchangeTransformation::induce`] did.
#[derive(Debug, Clone, PartialEq)]
pub struct InductionStep<R: Ring> {
    pub result: Induction,
    /// The saddle connection that was found, as a pair of a bottom and a top
    /// label.
    pub connection: Option<(Label, Label)>,
    /// The independent transformation split off by a separating connection.
    pub additional: Option<IntervalExchangeTransformation<R>>,
}

impl<R: Ring> InductionStep<R> {
    fn result(result: Induction) -> Self {
        InductionStep {
            result,
            connection: None,
            additional: None,
        }
    }
}

/// Detects when repeated induction is caught in a loop, i.e., when the
/// transformation has returned to a scaled copy of an earlier state.
///
/// Snapshots are taken at exponentially growing intervals so that a
/// self-similarity of any period is eventually noticed. A positive answer
/// certifies that induction will never terminate, so the transformation has
/// no periodic trajectory; this catches self-similar cases that
/// Boshernitzan's criterion misses, in particular when the SAF invariant
/// vanishes.
#[derive(Debug, Clone)]
struct SimilarityTracker<R: Ring> {
    period_bound: usize,
    ttl: usize,
    top: Vec<Label>,
    pattern: Vec<usize>,
    lengths: Option<Lengths<R>>,
}

impl<R: Ring> Default for SimilarityTracker<R> {
    fn default() -> Self {
        SimilarityTracker {
            period_bound: 1,
            ttl: 0,
            top: Vec::new(),
            pattern: Vec::new(),
            lengths: None,
        }
    }
}

impl<R: Ring> SimilarityTracker<R> {
    fn loop_detected(
        &mut self,
        lengths: &Lengths<R>,
        top: &[Label],
        bottom: &[Label],
    ) -> Result<bool> {
        if self.ttl == 0 {
            self.reset(lengths, top, bottom)?;
            return Ok(false);
        }
        self.ttl -= 1;

        if top.len() != self.top.len() || top != &self.top[..] {
            return Ok(false);
        }
        for (i, &label) in bottom.iter().enumerate() {
            if label != self.top[self.pattern[i]] {
                return Ok(false);
            }
        }

        let saved = match &self.lengths {
            Some(saved) => saved,
            None => return Ok(false),
        };
        for pair in self.top.windows(2) {
            if !saved.same_ratio(pair[0], pair[1], lengths, pair[0], pair[1])? {
                return Ok(false);
            }
        }
        Ok(true)
    }

    fn reset(&mut self, lengths: &Lengths<R>, top: &[Label], bottom: &[Label]) -> Result<()> {
        self.top = top.to_vec();
        self.pattern = bottom
            .iter()
            .map(|&b| {
                top.iter()
                    .position(|&t| t == b)
                    .ok_or(Error::UnknownLabel(b))
            })
            .collect::<Result<_>>()?;
        self.lengths = Some(lengths.only(top)?);
        self.ttl = self.period_bound;
        self.period_bound *= 2;
        Ok(())
    }
}

/// An interval exchange transformation, i.e., a permutation of labeled
/// intervals together with their lengths.
///
/// The same labels appear in the `top` and in the `bottom` sequence; the
/// transformation maps the intervals laid out in top order to the intervals
/// laid out in bottom order.
#[derive(Debug, Clone)]
pub struct IntervalExchangeTransformation<R: Ring> {
    pub(crate) lengths: Lengths<R>,
    pub(crate) top: Vec<Label>,
    pub(crate) bottom: Vec<Label>,
    pub(crate) swapped: bool,
    pub(crate) degree: usize,
    similarity: SimilarityTracker<R>,
}

impl<R: Ring> IntervalExchangeTransformation<R> {
    /// A transformation exchanging the intervals of `lengths` according to
    /// the given top and bottom orders.
    pub fn new(lengths: Lengths<R>, top: Vec<Label>, bottom: Vec<Label>) -> Result<Self> {
        if top.is_empty() {
            return Err(Error::InvalidLengths(
                "an interval exchange transformation cannot be empty".to_string(),
            ));
        }
        if top.len() != bottom.len() {
            return Err(Error::InvalidLengths(format!(
                "top and bottom must have the same size, got {} and {}",
                top.len(),
                bottom.len()
            )));
        }
        let top_set: HashSet<Label> = top.iter().copied().collect();
        let bottom_set: HashSet<Label> = bottom.iter().copied().collect();
        if top_set.len() != top.len() || top_set != bottom_set {
            return Err(Error::InvalidLengths(
                "top and bottom must consist of the same labels without duplicates".to_string(),
            ));
        }

        let degree = lengths.get(top[0])?.coefficients().len();
        for &label in &top {
            if lengths.get(label)?.coefficients().len() != degree {
                return Err(Error::RingMismatch(format!(
                    "all lengths must have the same degree over the rationals, {:?} disagrees",
                    label
                )));
            }
        }

        Ok(IntervalExchangeTransformation {
            lengths,
            top,
            bottom,
            swapped: false,
            degree,
            similarity: SimilarityTracker::default(),
        })
    }

    /// A transformation with identity top order whose bottom order is given
    /// by `permutation`, indexing into the tracked labels.
    pub fn from_permutation(lengths: Lengths<R>, permutation: &[usize]) -> Result<Self> {
        let top = lengths.labels();
        if permutation.len() != top.len() {
            return Err(Error::InvalidLengths(format!(
                "permutation must have {} entries, got {}",
                top.len(),
                permutation.len()
            )));
        }
        let mut used = vec![false; top.len()];
        let mut bottom = Vec::with_capacity(top.len());
        for &index in permutation {
            if index >= top.len() || used[index] {
                return Err(Error::InvalidLengths(format!(
                    "invalid permutation entry {index}"
                )));
            }
            used[index] = true;
            bottom.push(top[index]);
        }
        IntervalExchangeTransformation::new(lengths, top, bottom)
    }

    pub(crate) fn from_parts(
        lengths: Lengths<R>,
        top: Vec<Label>,
        bottom: Vec<Label>,
        swapped: bool,
    ) -> Result<Self> {
        let mut iet = IntervalExchangeTransformation::new(lengths, top, bottom)?;
        iet.swapped = swapped;
        Ok(iet)
    }

    pub fn size(&self) -> usize {
        self.top.len()
    }

    pub fn top(&self) -> &[Label] {
        &self.top
    }

    pub fn bottom(&self) -> &[Label] {
        &self.bottom
    }

    pub fn lengths(&self) -> &Lengths<R> {
        &self.lengths
    }

    /// Exchanges the roles of top and bottom.
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.top, &mut self.bottom);
        self.swapped = !self.swapped;
    }

    /// Whether [`swap`](Self::swap) has been called an odd number of times.
    pub fn swapped(&self) -> bool {
        self.swapped
    }

    /// Splits off the part of the transformation to the right of a
    /// separating connection.
    ///
    /// Searches for the first position at which the top and bottom prefixes
    /// consist of the same labels. When there is one before the final
    /// position, `self` shrinks to that prefix and the rest is returned as an
    /// independently owned transformation; otherwise nothing changes and
    /// `None` is returned.
    pub fn reduce(&mut self) -> Result<Option<Self>> {
        let mut seen: HashSet<Label> = HashSet::new();
        let mut top_ahead = 0i64;
        let mut bottom_ahead = 0i64;
        let mut split = self.top.len() - 1;

        for i in 0..self.top.len() {
            if seen.insert(self.top[i]) {
                top_ahead += 1;
            } else {
                bottom_ahead -= 1;
            }
            if seen.insert(self.bottom[i]) {
                bottom_ahead += 1;
            } else {
                top_ahead -= 1;
            }
            if top_ahead == 0 && bottom_ahead == 0 {
                split = i;
                break;
            }
        }

        if split == self.top.len() - 1 {
            return Ok(None);
        }

        let suffix_top = self.top.split_off(split + 1);
        let suffix_bottom = self.bottom.split_off(split + 1);
        let suffix_lengths = self.lengths.only(&suffix_top)?;
        self.lengths = self.lengths.only(&self.top)?;

        Ok(Some(IntervalExchangeTransformation::new(
            suffix_lengths,
            suffix_top,
            suffix_bottom,
        )?))
    }

    /// One step of accelerated (Zorich) induction on the first top interval.
    ///
    /// Performs as many Rauzy steps of the same kind as possible at once:
    /// walks the bottom sequence accumulating lengths, speeds through full
    /// Dehn twists with a floor division when the walk comes back to the
    /// first top label, and finally applies the remaining partial twist,
    /// moving the consumed bottom prefix in front of the twin of the first
    /// top interval.
    ///
    /// Returns whether a saddle connection was found, i.e., whether the
    /// first top and first bottom interval now have the same length or did
    /// share their label already.
    pub fn zorich_induction(&mut self) -> Result<bool> {
        let t0 = self.top[0];
        if self.bottom[0] == t0 {
            // The transformation starts with a cylinder.
            return Ok(true);
        }

        let twin = self.position_in_bottom(t0)?;

        let mut consumed = 0;
        let mut sum = R::zero();
        while consumed < twin {
            let candidate = sum.add(self.lengths.get(self.bottom[consumed])?)?;
            if candidate.cmp(self.lengths.get(t0)?)? != Ordering::Less {
                break;
            }
            sum = candidate;
            consumed += 1;
        }

        if consumed == twin {
            // The walk came back to the first top interval: perform the full
            // Dehn twists in one floor division and redo the walk on what
            // remains.
            self.lengths.subtract_value_repeated(t0, &sum)?;

            consumed = 0;
            sum = R::zero();
            while consumed < twin {
                let candidate = sum.add(self.lengths.get(self.bottom[consumed])?)?;
                if candidate.cmp(self.lengths.get(t0)?)? != Ordering::Less {
                    break;
                }
                sum = candidate;
                consumed += 1;
            }
        }

        if consumed > 0 {
            // Partial twist.
            self.lengths.subtract_value(t0, &sum)?;

            let prefix: Vec<Label> = self.bottom.drain(0..consumed).collect();
            let at = twin - consumed;
            self.bottom.splice(at..at, prefix);
        }

        Ok(self.lengths.cmp(self.top[0], self.bottom[0])? == Ordering::Equal)
    }

    /// Performs up to `limit` rounds of Zorich induction on both sides and
    /// reports what that revealed about the transformation.
    ///
    /// Cheap checks (an initial cylinder, a separating or non-separating
    /// connection, Boshernitzan's criterion) run even with a limit of zero.
    /// Repeated calls with a positive limit additionally watch for the
    /// induction returning to a scaled copy of an earlier state, which also
    /// rules out periodic trajectories.
    pub fn induce(&mut self, limit: usize) -> Result<InductionStep<R>> {
        if self.size() == 1 {
            return Ok(InductionStep::result(Induction::Cylinder));
        }

        if limit > 0
            && self
                .similarity
                .loop_detected(&self.lengths, &self.top, &self.bottom)?
        {
            return Ok(InductionStep::result(Induction::WithoutPeriodicTrajectory));
        }

        for _ in 0..limit {
            if self.zorich_induction()? {
                break;
            }
            self.swap();
            let found = self.zorich_induction()?;
            self.swap();
            if found {
                break;
            }
        }

        let first_top = self.top[0];
        let first_bottom = self.bottom[0];

        if let Some(additional) = self.reduce()? {
            return Ok(InductionStep {
                result: Induction::SeparatingConnection,
                connection: Some((
                    self.bottom[self.bottom.len() - 1],
                    self.top[self.top.len() - 1],
                )),
                additional: Some(additional),
            });
        }

        if self.lengths.cmp(first_top, first_bottom)? == Ordering::Equal {
            let connection = (self.bottom[0], self.top[0]);

            // Merge the equally long intervals at the left end by replacing
            // the top label with the bottom one.
            let twin = self.position_in_bottom(first_top)?;
            self.bottom.insert(twin, first_bottom);
            self.bottom.remove(0);
            let twin = self.position_in_bottom(first_top)?;
            self.bottom.remove(twin);
            self.top.remove(0);

            return Ok(InductionStep {
                result: Induction::NonSeparatingConnection,
                connection: Some(connection),
                additional: None,
            });
        }

        if self.boshernitzan_no_periodic_trajectory()? {
            return Ok(InductionStep::result(Induction::WithoutPeriodicTrajectory));
        }

        Ok(InductionStep::result(Induction::LimitReached))
    }

    /// Whether `self` and `rhs` exchange their intervals the same way,
    /// allowing for a consistent relabeling.
    pub fn equivalent(&self, rhs: &Self) -> bool {
        if self.size() != rhs.size() {
            return false;
        }
        if self.permutation_pattern() != rhs.permutation_pattern() {
            return false;
        }
        self.top
            .iter()
            .zip(rhs.top.iter())
            .all(
                |(&mine, &theirs)| match (self.lengths.get(mine), rhs.lengths.get(theirs)) {
                    (Ok(a), Ok(b)) => a == b,
                    _ => false,
                },
            )
    }

    /// The rational coordinates of the length of `label`, checked against the
    /// degree of the transformation.
    pub(crate) fn coefficients(&self, label: Label) -> Result<Vec<BigRational>> {
        let coefficients = self.lengths.get(label)?.coefficients();
        if coefficients.len() != self.degree {
            return Err(Error::RingMismatch(format!(
                "{:?} reports {} rational coefficients instead of {}",
                label,
                coefficients.len(),
                self.degree
            )));
        }
        Ok(coefficients)
    }

    /// The translation that the transformation applies to the interval of
    /// `label`, as rational coordinates over the ℚ-basis of the lengths.
    pub(crate) fn translation(&self, label: Label) -> Result<Vec<BigRational>> {
        let mut translation: Vec<BigRational> = vec![Zero::zero(); self.degree];
        for &j in &self.top {
            if j == label {
                break;
            }
            let coefficients = self.coefficients(j)?;
            for (t, c) in translation.iter_mut().zip(coefficients.iter()) {
                *t = &*t - c;
            }
        }
        for &j in &self.bottom {
            if j == label {
                break;
            }
            let coefficients = self.coefficients(j)?;
            for (t, c) in translation.iter_mut().zip(coefficients.iter()) {
                *t = &*t + c;
            }
        }
        Ok(translation)
    }

    fn position_in_bottom(&self, label: Label) -> Result<usize> {
        self.bottom
            .iter()
            .position(|&b| b == label)
            .ok_or(Error::UnknownLabel(label))
    }

    fn permutation_pattern(&self) -> Vec<usize> {
        self.bottom
            .iter()
            .map(|b| self.top.iter().position(|t| t == b).unwrap_or(usize::MAX))
            .collect()
    }
}

impl<R: Ring> PartialEq for IntervalExchangeTransformation<R> {
    fn eq(&self, rhs: &Self) -> bool {
        self.top == rhs.top
            && self.bottom == rhs.bottom
            && self.top.iter().all(|&label| {
                match (self.lengths.get(label), rhs.lengths.get(label)) {
                    (Ok(a), Ok(b)) => a == b,
                    _ => false,
                }
            })
    }
}

impl<R: Ring> fmt::Display for IntervalExchangeTransformation<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, &label) in self.top.iter().enumerate() {
            let name = self.lengths.render(label).map_err(|_| fmt::Error)?;
            let value = self.lengths.get(label).map_err(|_| fmt::Error)?;
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "[{name}: {value}]")?;
        }
        write!(f, " /")?;
        for &label in &self.bottom {
            let name = self.lengths.render(label).map_err(|_| fmt::Error)?;
            write!(f, " [{name}]")?;
        }
        Ok(())
    }
}
