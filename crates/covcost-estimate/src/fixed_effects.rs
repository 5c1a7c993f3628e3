//! Absorption of province and quarter fixed effects.
//!
//! Both effect dimensions are removed by the method of alternating
//! projections: subtract province means, then quarter means, and repeat
//! until every group mean is below the tolerance. One sweep is exact for
//! balanced panels; unbalanced panels need a few more.

use tracing::warn;

use crate::error::{EstimateError, Result};

/// Convergence tolerance on the largest absolute group mean.
const TOLERANCE: f64 = 1e-10;

/// Iteration bound for the projection loop.
const MAX_ITERATIONS: usize = 10_000;

/// Two-way fixed-effects structure of a panel sample.
#[derive(Debug, Clone)]
pub struct FixedEffects {
    entity: Vec<usize>,
    time: Vec<usize>,
    /// Observation indices per group, entity dimension first.
    members: [Vec<Vec<usize>>; 2],
}

impl FixedEffects {
    /// `entity[i]` and `time[i]` are 0-based group levels of observation `i`.
    pub fn new(entity: Vec<usize>, time: Vec<usize>) -> Result<Self> {
        if entity.is_empty() {
            return Err(EstimateError::Validation("no observations".into()));
        }
        if entity.len() != time.len() {
            return Err(EstimateError::Validation(format!(
                "entity ids ({}) and time ids ({}) differ in length",
                entity.len(),
                time.len()
            )));
        }
        let members = [group_members(&entity), group_members(&time)];
        Ok(Self {
            entity,
            time,
            members,
        })
    }

    pub fn n_obs(&self) -> usize {
        self.entity.len()
    }

    /// Number of entity levels that have observations.
    pub fn n_entities(&self) -> usize {
        self.members[0].iter().filter(|g| !g.is_empty()).count()
    }

    /// Number of time levels that have observations.
    pub fn n_periods(&self) -> usize {
        self.members[1].iter().filter(|g| !g.is_empty()).count()
    }

    /// Removes both effect dimensions from `values`.
    pub fn absorb(&self, values: &[f64]) -> Result<Vec<f64>> {
        if values.len() != self.n_obs() {
            return Err(EstimateError::Validation(format!(
                "vector length ({}) != observations ({})",
                values.len(),
                self.n_obs()
            )));
        }
        let mut resid = values.to_vec();
        for _ in 0..MAX_ITERATIONS {
            for members in &self.members {
                demean(&mut resid, members);
            }
            if self.max_abs_group_mean(&resid) < TOLERANCE {
                return Ok(resid);
            }
        }
        warn!(
            iterations = MAX_ITERATIONS,
            residual_mean = self.max_abs_group_mean(&resid),
            "fixed-effect absorption did not converge"
        );
        Ok(resid)
    }

    /// Degrees of freedom used by the effects:
    /// `n_entities + n_periods - connected components`.
    pub fn absorbed_dof(&self) -> usize {
        (self.n_entities() + self.n_periods()).saturating_sub(self.connected_components())
    }

    /// Connected components of the bipartite entity/time graph.
    pub fn connected_components(&self) -> usize {
        let n_entity_levels = self.members[0].len();
        let total = n_entity_levels + self.members[1].len();
        let mut parent: Vec<usize> = (0..total).collect();
        let mut rank = vec![0u8; total];
        let mut used = vec![false; total];

        for (&e, &t) in self.entity.iter().zip(&self.time) {
            let b = n_entity_levels + t;
            union(&mut parent, &mut rank, e, b);
            used[e] = true;
            used[b] = true;
        }

        let mut roots: Vec<usize> = (0..total)
            .filter(|&node| used[node])
            .map(|node| find(&mut parent, node))
            .collect();
        roots.sort_unstable();
        roots.dedup();
        roots.len()
    }

    fn max_abs_group_mean(&self, values: &[f64]) -> f64 {
        self.members
            .iter()
            .flatten()
            .filter(|group| !group.is_empty())
            .map(|group| (group.iter().map(|&i| values[i]).sum::<f64>() / group.len() as f64).abs())
            .fold(0.0, f64::max)
    }
}

fn group_members(levels: &[usize]) -> Vec<Vec<usize>> {
    let n_levels = levels.iter().copied().max().map_or(0, |m| m + 1);
    let mut members = vec![Vec::new(); n_levels];
    for (i, &level) in levels.iter().enumerate() {
        members[level].push(i);
    }
    members
}

fn demean(values: &mut [f64], members: &[Vec<usize>]) {
    for group in members {
        if group.is_empty() {
            continue;
        }
        let mean = group.iter().map(|&i| values[i]).sum::<f64>() / group.len() as f64;
        for &i in group {
            values[i] -= mean;
        }
    }
}

fn find(parent: &mut [usize], mut x: usize) -> usize {
    while parent[x] != x {
        parent[x] = parent[parent[x]];
        x = parent[x];
    }
    x
}

fn union(parent: &mut [usize], rank: &mut [u8], a: usize, b: usize) {
    let ra = find(parent, a);
    let rb = find(parent, b);
    if ra == rb {
        return;
    }
    match rank[ra].cmp(&rank[rb]) {
        std::cmp::Ordering::Less => parent[ra] = rb,
        std::cmp::Ordering::Greater => parent[rb] = ra,
        std::cmp::Ordering::Equal => {
            parent[rb] = ra;
            rank[ra] += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn additive_effects_are_removed_exactly() {
        // y = entity effect (5, 10) + time effect (1, 2, 3)
        let fe = FixedEffects::new(vec![0, 0, 0, 1, 1, 1], vec![0, 1, 2, 0, 1, 2]).unwrap();
        let resid = fe.absorb(&[6.0, 7.0, 8.0, 11.0, 12.0, 13.0]).unwrap();

        for r in resid {
            assert!(r.abs() < 1e-10);
        }
        assert_eq!(fe.n_entities(), 2);
        assert_eq!(fe.n_periods(), 3);
        assert_eq!(fe.absorbed_dof(), 4);
    }

    #[test]
    fn unbalanced_panel_converges() {
        let fe = FixedEffects::new(vec![0, 0, 0, 1, 1], vec![0, 1, 2, 1, 2]).unwrap();
        let r = fe.absorb(&[10.0, 20.0, 30.0, 25.0, 35.0]).unwrap();

        assert!(((r[0] + r[1] + r[2]) / 3.0).abs() < 1e-9);
        assert!(((r[3] + r[4]) / 2.0).abs() < 1e-9);
        assert!(((r[1] + r[3]) / 2.0).abs() < 1e-9);
        assert!(((r[2] + r[4]) / 2.0).abs() < 1e-9);
        assert!(r[0].abs() < 1e-9);
    }

    #[test]
    fn disconnected_panels_count_components() {
        let fe = FixedEffects::new(vec![0, 0, 1, 1], vec![0, 1, 2, 3]).unwrap();

        assert_eq!(fe.connected_components(), 2);
        assert_eq!(fe.absorbed_dof(), 4);
    }

    #[test]
    fn rejects_inconsistent_input() {
        assert!(FixedEffects::new(vec![], vec![]).is_err());
        assert!(FixedEffects::new(vec![0, 1], vec![0]).is_err());

        let fe = FixedEffects::new(vec![0, 1], vec![0, 0]).unwrap();
        assert!(fe.absorb(&[1.0]).is_err());
    }
}
