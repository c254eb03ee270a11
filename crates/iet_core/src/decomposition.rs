use crate::error::Result;
use crate::iet::{Induction, IntervalExchangeTransformation};
use crate::ring::Ring;

/// How many Zorich induction steps to spend before re-trying Boshernitzan's
/// criterion when the SAF invariant does not rule it out.
const BOSHERNITZAN_COST: usize = 64;

#[derive(Debug, Clone)]
struct ComponentState<R: Ring> {
    iet: IntervalExchangeTransformation<R>,
    cylinder: Option<bool>,
    without_periodic_trajectory: Option<bool>,
}

impl<R: Ring> ComponentState<R> {
    fn new(iet: IntervalExchangeTransformation<R>) -> Self {
        ComponentState {
            iet,
            cylinder: None,
            without_periodic_trajectory: None,
        }
    }

    fn determined(&self) -> bool {
        self.cylinder.is_some()
    }
}

/// A component of a dynamical decomposition.
///
/// Classification is monotonic: the flags start out undetermined and once a
/// component is recognized as a cylinder or as free of periodic trajectories
/// that verdict is final.
#[derive(Debug, Clone, Copy)]
pub struct Component<'a, R: Ring> {
    state: &'a ComponentState<R>,
}

impl<'a, R: Ring> Component<'a, R> {
    /// Whether this component is a cylinder, i.e., a single pair of
    /// intervals exchanged with each other; `None` while undetermined.
    pub fn cylinder(&self) -> Option<bool> {
        self.state.cylinder
    }

    /// Whether this component was certified to carry no periodic
    /// trajectory; `None` while undetermined.
    pub fn without_periodic_trajectory(&self) -> Option<bool> {
        self.state.without_periodic_trajectory
    }

    pub fn determined(&self) -> bool {
        self.state.determined()
    }

    /// The current state of this component's transformation.
    pub fn iet(&self) -> &'a IntervalExchangeTransformation<R> {
        &self.state.iet
    }
}

/// The decomposition of an interval exchange transformation into components
/// that are cylinders or without periodic trajectory.
///
/// Components split off by separating connections are appended to the list;
/// the order of existing components never changes.
#[derive(Debug, Clone)]
pub struct DynamicalDecomposition<R: Ring> {
    components: Vec<ComponentState<R>>,
}

impl<R: Ring> DynamicalDecomposition<R> {
    /// Wraps `iet` as the sole component of a new decomposition.
    pub fn new(iet: IntervalExchangeTransformation<R>) -> Self {
        DynamicalDecomposition {
            components: vec![ComponentState::new(iet)],
        }
    }

    pub fn components(&self) -> Vec<Component<'_, R>> {
        self.components
            .iter()
            .map(|state| Component { state })
            .collect()
    }

    /// Decomposes every component, growing the induction budget until each
    /// one is classified.
    ///
    /// Components are classified by finding connections, by Boshernitzan's
    /// criterion, or by detecting that the induction reached a scaled copy of
    /// an earlier state. A component admitting none of these keeps the call
    /// running; use
    /// [`decompose_with_limit`](Self::decompose_with_limit) to bound the
    /// work per step.
    pub fn decompose(&mut self) -> Result<bool> {
        self.run(None)
    }

    /// Decomposes every component, spending at most `limit` rounds of Zorich
    /// induction per decomposition step. Returns whether every component got
    /// classified.
    pub fn decompose_with_limit(&mut self, limit: usize) -> Result<bool> {
        self.run(Some(limit))
    }

    fn run(&mut self, limit: Option<usize>) -> Result<bool> {
        let mut complete = true;
        let mut index = 0;
        while index < self.components.len() {
            while !self.components[index].determined() {
                if self.step(index, limit)? == Induction::LimitReached {
                    complete = false;
                    break;
                }
            }
            index += 1;
        }
        Ok(complete)
    }

    fn step(&mut self, index: usize, limit: Option<usize>) -> Result<Induction> {
        let cost = self.boshernitzan_cost(index)?;
        match limit {
            Some(limit) => self.bounded_step(index, limit, cost),
            None => {
                let mut limit = 0;
                loop {
                    let result = self.bounded_step(index, limit, cost)?;
                    if result != Induction::LimitReached {
                        return Ok(result);
                    }
                    limit = cost.unwrap_or(2 * (limit + 1));
                }
            }
        }
    }

    fn bounded_step(
        &mut self,
        index: usize,
        mut limit: usize,
        cost: Option<usize>,
    ) -> Result<Induction> {
        loop {
            // Interleave induction with the Boshernitzan check where the
            // check is worth running.
            let rounds = match cost {
                Some(cost) if limit >= 2 * cost => cost,
                _ => limit,
            };
            limit -= rounds;

            let step = self.components[index].iet.induce(rounds)?;
            match step.result {
                Induction::LimitReached => {
                    if limit == 0 {
                        return Ok(Induction::LimitReached);
                    }
                }
                Induction::Cylinder => {
                    let component = &mut self.components[index];
                    component.cylinder = Some(true);
                    component.without_periodic_trajectory = Some(false);
                    return Ok(Induction::Cylinder);
                }
                Induction::SeparatingConnection => {
                    if let Some(additional) = step.additional {
                        self.components.push(ComponentState::new(additional));
                    }
                    return Ok(Induction::SeparatingConnection);
                }
                Induction::NonSeparatingConnection => {
                    return Ok(Induction::NonSeparatingConnection);
                }
                Induction::WithoutPeriodicTrajectory => {
                    let component = &mut self.components[index];
                    component.cylinder = Some(false);
                    component.without_periodic_trajectory = Some(true);
                    return Ok(Induction::WithoutPeriodicTrajectory);
                }
            }
        }
    }

    fn boshernitzan_cost(&self, index: usize) -> Result<Option<usize>> {
        // When SAF = 0 the Boshernitzan criterion never certifies anything.
        let saf = self.components[index].iet.saf_invariant()?;
        Ok(if saf.is_zero() {
            None
        } else {
            Some(BOSHERNITZAN_COST)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lengths::Lengths;
    use crate::sample::Quadratic;

    fn decomposition(
        values: &[i64],
        permutation: &[usize],
    ) -> DynamicalDecomposition<i64> {
        let lengths = Lengths::new(values.to_vec()).expect("positive lengths");
        let iet = IntervalExchangeTransformation::from_permutation(lengths, permutation)
            .expect("valid transformation");
        DynamicalDecomposition::new(iet)
    }

    #[test]
    fn identity_splits_into_cylinders() {
        let mut decomposition = decomposition(&[18, 3], &[0, 1]);
        assert!(decomposition.decompose().expect("terminates"));

        let components = decomposition.components();
        assert_eq!(components.len(), 2);
        for component in &components {
            assert_eq!(component.cylinder(), Some(true));
            assert_eq!(component.without_periodic_trajectory(), Some(false));
        }
        assert_eq!(components[0].iet().to_string(), "[a: 18] / [a]");
        assert_eq!(components[1].iet().to_string(), "[b: 3] / [b]");
    }

    #[test]
    fn rational_torus_is_a_cylinder() {
        let mut decomposition = decomposition(&[18, 3], &[1, 0]);
        assert!(decomposition.decompose().expect("terminates"));

        let components = decomposition.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].cylinder(), Some(true));
    }

    #[test]
    fn every_component_is_classified_one_way() {
        let mut decomposition = decomposition(&[4, 56, 23, 11, 21, 9, 65], &[1, 0, 4, 3, 2, 6, 5]);
        assert!(decomposition.decompose().expect("terminates"));

        let components = decomposition.components();
        let cylinders = components
            .iter()
            .filter(|c| c.cylinder() == Some(true))
            .count();
        let minimal = components
            .iter()
            .filter(|c| c.without_periodic_trajectory() == Some(true))
            .count();
        assert_eq!(cylinders + minimal, components.len());
    }

    #[test]
    fn boshernitzan_settles_an_irrational_rotation() {
        let lengths = Lengths::new(vec![
            Quadratic::sqrt(2).expect("valid field"),
            Quadratic::from_integers(2, 1, 0).expect("valid field"),
        ])
        .expect("positive lengths");
        let labels = lengths.labels();
        let iet = IntervalExchangeTransformation::new(
            lengths,
            vec![labels[1], labels[0]],
            vec![labels[0], labels[1]],
        )
        .expect("valid transformation");

        let mut decomposition = DynamicalDecomposition::new(iet);
        assert!(decomposition.decompose().expect("terminates"));

        let components = decomposition.components();
        assert_eq!(components.len(), 1);
        assert_eq!(components[0].cylinder(), Some(false));
        assert_eq!(components[0].without_periodic_trajectory(), Some(true));
    }

    #[test]
    fn limits_leave_components_undetermined() {
        let mut decomposition = decomposition(&[13, 5], &[1, 0]);
        assert!(!decomposition.decompose_with_limit(0).expect("no failure"));
        assert_eq!(decomposition.components()[0].cylinder(), None);

        // A generous limit settles the same transformation.
        assert!(decomposition.decompose_with_limit(16).expect("no failure"));
        let components = decomposition.components();
        assert!(components.iter().all(|c| c.determined()));
    }
}
