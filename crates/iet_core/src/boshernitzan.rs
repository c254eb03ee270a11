use num_rational::BigRational;
use num_traits::Zero;

use crate::error::{Error, Result};
use crate::iet::IntervalExchangeTransformation;
use crate::label::Label;
use crate::linear::RationalLinearSubspace;
use crate::ring::Ring;

impl<R: Ring> IntervalExchangeTransformation<R> {
    /// The matrix of rational coefficients underlying Boshernitzan's
    /// criterion: one row per ℚ-basis dimension of the lengths, one column
    /// per top label, holding the translation of that label's interval.
    pub fn boshernitzan_equations(&self) -> Result<Vec<Vec<BigRational>>> {
        let mut equations = vec![Vec::with_capacity(self.size()); self.degree];
        for &label in &self.top {
            let translation = self.translation(label)?;
            for (row, value) in equations.iter_mut().zip(translation) {
                row.push(value);
            }
        }
        Ok(equations)
    }

    /// The inhomogeneous part of Boshernitzan's equations for a saddle
    /// connection going from the right end of the interval of `bottom` to
    /// the right end of the interval of `top`.
    ///
    /// Fails for labels that are not in their respective sequence or sit at
    /// its very end; the rightmost singularity bounds no such connection.
    pub fn boshernitzan_saddle_connection_values(
        &self,
        top: Label,
        bottom: Label,
    ) -> Result<Vec<BigRational>> {
        let top_at = self
            .top
            .iter()
            .position(|&label| label == top)
            .ok_or(Error::UnknownLabel(top))?;
        let bottom_at = self
            .bottom
            .iter()
            .position(|&label| label == bottom)
            .ok_or(Error::UnknownLabel(bottom))?;
        if top_at + 1 == self.top.len() {
            return Err(Error::UnknownLabel(top));
        }
        if bottom_at + 1 == self.bottom.len() {
            return Err(Error::UnknownLabel(bottom));
        }

        let mut values: Vec<BigRational> = vec![Zero::zero(); self.degree];
        for &label in &self.bottom[..=bottom_at] {
            let coefficients = self.coefficients(label)?;
            for (value, c) in values.iter_mut().zip(coefficients.iter()) {
                *value = &*value + c;
            }
        }
        for &label in &self.top[..=top_at] {
            let coefficients = self.coefficients(label)?;
            for (value, c) in values.iter_mut().zip(coefficients.iter()) {
                *value = &*value - c;
            }
        }
        Ok(values)
    }

    /// Whether Boshernitzan's criterion certifies that the transformation
    /// admits no periodic trajectory.
    ///
    /// This is a partial criterion: `false` means "could not certify", not
    /// "there is a periodic trajectory". In degree one the criterion never
    /// applies.
    pub fn boshernitzan_no_periodic_trajectory(&self) -> Result<bool> {
        if self.degree <= 1 {
            return Ok(false);
        }
        let equations = self.boshernitzan_equations()?;
        Ok(!RationalLinearSubspace::from_equations(equations).has_non_zero_non_negative_vector())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lengths::Lengths;
    use crate::sample::Quadratic;

    fn rational(n: i64) -> BigRational {
        BigRational::from_integer(n.into())
    }

    fn sqrt2_lengths(values: &[(i64, i64)]) -> Lengths<Quadratic> {
        Lengths::new(
            values
                .iter()
                .map(|&(a, b)| Quadratic::from_integers(2, a, b).expect("valid field"))
                .collect(),
        )
        .expect("positive lengths")
    }

    #[test]
    fn equations_of_a_torus() {
        let lengths = Lengths::new(vec![18i64, 3]).expect("positive lengths");
        let iet = IntervalExchangeTransformation::from_permutation(lengths, &[1, 0])
            .expect("valid transformation");
        assert_eq!(
            iet.boshernitzan_equations().expect("computable"),
            vec![vec![rational(3), rational(-18)]]
        );
    }

    #[test]
    fn saddle_connection_values_match_the_equations() {
        let lengths = Lengths::new(vec![18i64, 3]).expect("positive lengths");
        let iet = IntervalExchangeTransformation::from_permutation(lengths, &[1, 0])
            .expect("valid transformation");
        let labels = iet.lengths().labels();

        let values = iet
            .boshernitzan_saddle_connection_values(labels[0], labels[1])
            .expect("not terminal");
        assert_eq!(values.len(), iet.boshernitzan_equations().expect("computable").len());
        assert_eq!(values, vec![rational(-15)]);

        // The rightmost labels bound no saddle connection.
        assert!(iet
            .boshernitzan_saddle_connection_values(labels[1], labels[1])
            .is_err());
        assert!(iet
            .boshernitzan_saddle_connection_values(labels[0], labels[0])
            .is_err());
    }

    #[test]
    fn trivial_over_the_rationals() {
        let lengths = Lengths::new(vec![451i64, 3221, 451]).expect("positive lengths");
        let iet = IntervalExchangeTransformation::from_permutation(lengths, &[2, 1, 0])
            .expect("valid transformation");
        assert!(!iet
            .boshernitzan_no_periodic_trajectory()
            .expect("computable"));
    }

    #[test]
    fn certifies_over_the_field_of_sqrt_two() {
        let lengths = sqrt2_lengths(&[(0, 1), (1, 0), (1, 0), (1, 0)]);
        let labels = lengths.labels();

        let small = IntervalExchangeTransformation::new(
            lengths.only(&labels[..2]).expect("tracked"),
            vec![labels[1], labels[0]],
            vec![labels[0], labels[1]],
        )
        .expect("valid transformation");
        assert!(small
            .boshernitzan_no_periodic_trajectory()
            .expect("computable"));

        let large = IntervalExchangeTransformation::new(
            lengths,
            vec![labels[0], labels[1], labels[2], labels[3]],
            vec![labels[3], labels[1], labels[0], labels[2]],
        )
        .expect("valid transformation");
        assert!(large
            .boshernitzan_no_periodic_trajectory()
            .expect("computable"));
    }

    #[test]
    fn does_not_certify_a_cylinder() {
        // The translations are 7√2+7, -3√2-3 and -10√2-10, so the space of
        // relations contains non-negative vectors.
        let lengths = sqrt2_lengths(&[(8, 7), (2, 3), (5, 4)]);
        let iet = IntervalExchangeTransformation::from_permutation(lengths, &[2, 1, 0])
            .expect("valid transformation");
        assert!(!iet
            .boshernitzan_no_periodic_trajectory()
            .expect("computable"));
    }
}
