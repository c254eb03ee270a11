use num_rational::BigRational;
use num_traits::{One, Signed, Zero};

/// A linear subspace of ℚ^n.
///
/// Stored as a system of homogeneous equations; a subspace given by
/// generators is converted by computing the orthogonal complement of their
/// span. The sign queries are decided exactly with a phase-1 simplex over
/// `BigRational`, Bland's rule guaranteeing termination.
#[derive(Debug, Clone, PartialEq)]
pub struct RationalLinearSubspace {
    equations: Vec<Vec<BigRational>>,
    dimension: usize,
}

impl RationalLinearSubspace {
    /// The subspace cut out by `equations`, each row read as `Σ cᵢ·xᵢ = 0`.
    pub fn from_equations(equations: Vec<Vec<BigRational>>) -> Self {
        let dimension = equations.iter().map(Vec::len).max().unwrap_or(0);
        RationalLinearSubspace {
            equations: pad(equations, dimension),
            dimension,
        }
    }

    /// The linear span of `generators`.
    pub fn from_generators(generators: Vec<Vec<BigRational>>) -> Self {
        let dimension = generators.iter().map(Vec::len).max().unwrap_or(0);
        RationalLinearSubspace {
            equations: null_space(pad(generators, dimension), dimension),
            dimension,
        }
    }

    pub fn dimension(&self) -> usize {
        self.dimension
    }

    /// Whether the subspace meets the non-negative orthant outside the
    /// origin.
    pub fn has_non_zero_non_negative_vector(&self) -> bool {
        if self.dimension == 0 {
            return false;
        }
        // By homogeneity such a vector exists iff one exists with
        // coordinate sum one.
        let mut rows = self.equations.clone();
        let mut rhs = vec![BigRational::zero(); rows.len()];
        rows.push(vec![BigRational::one(); self.dimension]);
        rhs.push(BigRational::one());
        feasible(rows, rhs)
    }

    /// Whether the subspace contains a vector with all coordinates strictly
    /// positive.
    pub fn has_positive_vector(&self) -> bool {
        if self.dimension == 0 {
            return false;
        }
        // Substitute x = y + 1 with y ≥ 0; scaling makes x ≥ 1 as good as
        // x > 0.
        let rows = self.equations.clone();
        let rhs = rows
            .iter()
            .map(|row| -row.iter().fold(BigRational::zero(), |sum, c| sum + c))
            .collect();
        feasible(rows, rhs)
    }
}

fn pad(mut rows: Vec<Vec<BigRational>>, dimension: usize) -> Vec<Vec<BigRational>> {
    for row in &mut rows {
        row.resize(dimension, BigRational::zero());
    }
    rows
}

/// A basis of the null space of the matrix `rows`, i.e. the orthogonal
/// complement of its row span.
fn null_space(mut rows: Vec<Vec<BigRational>>, dimension: usize) -> Vec<Vec<BigRational>> {
    let mut pivot_columns = Vec::new();
    let mut rank = 0;
    for column in 0..dimension {
        let Some(pivot_row) = (rank..rows.len()).find(|&i| !rows[i][column].is_zero()) else {
            continue;
        };
        rows.swap(rank, pivot_row);
        let pivot = rows[rank][column].clone();
        for value in &mut rows[rank] {
            *value = &*value / &pivot;
        }
        for i in 0..rows.len() {
            if i != rank && !rows[i][column].is_zero() {
                let factor = rows[i][column].clone();
                for j in 0..dimension {
                    let delta = &factor * &rows[rank][j];
                    rows[i][j] = &rows[i][j] - &delta;
                }
            }
        }
        pivot_columns.push(column);
        rank += 1;
    }

    let mut basis = Vec::new();
    for free in (0..dimension).filter(|column| !pivot_columns.contains(column)) {
        let mut vector = vec![BigRational::zero(); dimension];
        vector[free] = BigRational::one();
        for (row, &column) in pivot_columns.iter().enumerate() {
            vector[column] = -rows[row][free].clone();
        }
        basis.push(vector);
    }
    basis
}

/// Whether `rows · x = rhs` admits a solution with `x ≥ 0`.
///
/// Phase-1 simplex: minimize the sum of one artificial variable per row,
/// entering and leaving variables chosen by Bland's rule.
fn feasible(mut rows: Vec<Vec<BigRational>>, mut rhs: Vec<BigRational>) -> bool {
    let constraints = rows.len();
    if constraints == 0 {
        return true;
    }
    let structural = rows[0].len();
    for i in 0..constraints {
        if rhs[i].is_negative() {
            for value in &mut rows[i] {
                *value = -value.clone();
            }
            rhs[i] = -rhs[i].clone();
        }
    }

    let columns = structural + constraints;
    let mut tableau = Vec::with_capacity(constraints);
    for (i, mut row) in rows.into_iter().enumerate() {
        row.resize(columns, BigRational::zero());
        row[structural + i] = BigRational::one();
        tableau.push(row);
    }
    let mut basis: Vec<usize> = (structural..columns).collect();

    // Reduced costs z_j - c_j for minimizing the artificial sum; the
    // artificial columns start at zero.
    let mut cost = vec![BigRational::zero(); columns];
    for j in 0..structural {
        for row in &tableau {
            cost[j] = &cost[j] + &row[j];
        }
    }
    let mut infeasibility = rhs.iter().fold(BigRational::zero(), |sum, b| sum + b);

    loop {
        let Some(entering) = (0..columns).find(|&j| cost[j].is_positive()) else {
            return infeasibility.is_zero();
        };

        let mut leaving: Option<usize> = None;
        for i in 0..constraints {
            if !tableau[i][entering].is_positive() {
                continue;
            }
            let better = match leaving {
                None => true,
                Some(l) => {
                    let candidate = &rhs[i] / &tableau[i][entering];
                    let current = &rhs[l] / &tableau[l][entering];
                    candidate < current || (candidate == current && basis[i] < basis[l])
                }
            };
            if better {
                leaving = Some(i);
            }
        }
        let Some(pivot_row) = leaving else {
            // The objective is bounded below by zero, so this cannot happen;
            // answer from the current value.
            return infeasibility.is_zero();
        };

        let pivot = tableau[pivot_row][entering].clone();
        for value in &mut tableau[pivot_row] {
            *value = &*value / &pivot;
        }
        rhs[pivot_row] = &rhs[pivot_row] / &pivot;

        for i in 0..constraints {
            if i == pivot_row || tableau[i][entering].is_zero() {
                continue;
            }
            let factor = tableau[i][entering].clone();
            for j in 0..columns {
                let delta = &factor * &tableau[pivot_row][j];
                tableau[i][j] = &tableau[i][j] - &delta;
            }
            let delta = &factor * &rhs[pivot_row];
            rhs[i] = &rhs[i] - &delta;
        }

        if !cost[entering].is_zero() {
            let factor = cost[entering].clone();
            for j in 0..columns {
                let delta = &factor * &tableau[pivot_row][j];
                cost[j] = &cost[j] - &delta;
            }
            let delta = &factor * &rhs[pivot_row];
            infeasibility = &infeasibility - &delta;
        }

        basis[pivot_row] = entering;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rows(data: &[&[i64]]) -> Vec<Vec<BigRational>> {
        data.iter()
            .map(|row| {
                row.iter()
                    .map(|&value| BigRational::from_integer(value.into()))
                    .collect()
            })
            .collect()
    }

    #[test]
    fn non_negative_vectors_from_equations() {
        assert!(!RationalLinearSubspace::from_equations(rows(&[]))
            .has_non_zero_non_negative_vector());
        assert!(!RationalLinearSubspace::from_equations(rows(&[&[]]))
            .has_non_zero_non_negative_vector());
        assert!(RationalLinearSubspace::from_equations(rows(&[&[1, 0]]))
            .has_non_zero_non_negative_vector());
        assert!(
            !RationalLinearSubspace::from_equations(rows(&[&[1, 0], &[0, 1]]))
                .has_non_zero_non_negative_vector()
        );
        assert!(RationalLinearSubspace::from_equations(rows(&[&[1, -1]]))
            .has_non_zero_non_negative_vector());
        assert!(!RationalLinearSubspace::from_equations(rows(&[&[1, 1]]))
            .has_non_zero_non_negative_vector());
    }

    #[test]
    fn non_negative_vectors_from_generators() {
        assert!(RationalLinearSubspace::from_generators(rows(&[&[0, 1]]))
            .has_non_zero_non_negative_vector());
        assert!(RationalLinearSubspace::from_generators(rows(&[&[0, -1]]))
            .has_non_zero_non_negative_vector());
        assert!(!RationalLinearSubspace::from_generators(rows(&[&[0, 0]]))
            .has_non_zero_non_negative_vector());
        assert!(!RationalLinearSubspace::from_generators(rows(&[&[1, -1]]))
            .has_non_zero_non_negative_vector());
    }

    #[test]
    fn positive_vectors_from_equations() {
        assert!(!RationalLinearSubspace::from_equations(rows(&[]))
            .has_positive_vector());
        assert!(RationalLinearSubspace::from_equations(rows(&[&[1, -1]]))
            .has_positive_vector());
        assert!(!RationalLinearSubspace::from_equations(rows(&[&[1, 0]]))
            .has_positive_vector());
        assert!(!RationalLinearSubspace::from_equations(rows(&[&[1, 1]]))
            .has_positive_vector());
    }

    #[test]
    fn positive_vectors_from_generators() {
        assert!(RationalLinearSubspace::from_generators(rows(&[&[1, 1]]))
            .has_positive_vector());
        assert!(!RationalLinearSubspace::from_generators(rows(&[&[0, 1]]))
            .has_positive_vector());
        assert!(!RationalLinearSubspace::from_generators(rows(&[&[1, -1]]))
            .has_positive_vector());
    }

    #[test]
    fn higher_dimensional_slice() {
        // x₁ = x₂ with x₃ free.
        let subspace = RationalLinearSubspace::from_equations(rows(&[&[1, -1, 0]]));
        assert!(subspace.has_non_zero_non_negative_vector());
        assert!(subspace.has_positive_vector());
        // x₁ = -x₃ forces a sign change except on the coordinate plane.
        let pinched = RationalLinearSubspace::from_equations(rows(&[&[1, 0, 1]]));
        assert!(pinched.has_non_zero_non_negative_vector());
        assert!(!pinched.has_positive_vector());
    }
}
