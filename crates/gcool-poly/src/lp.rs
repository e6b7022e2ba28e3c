//! Dense two-phase simplex used for the Chebyshev ball.

use gcool_core::errors::{ErrorInfo, VolError};
use gcool_core::{InnerBall, Region};

use crate::polytope::HPolytope;

const EPS: f64 = 1e-9;
const MAX_PIVOTS: usize = 50_000;

/// Computes the largest ball inside the polytope.
///
/// Solves `max r` subject to `a_i·x + ‖a_i‖·r ≤ b_i`, `r ≥ 0`, with the free
/// centre split as `x = u - v`.
pub(crate) fn chebyshev_ball(polytope: &HPolytope) -> Result<InnerBall, VolError> {
    let n = polytope.dimension();
    let m = polytope.num_constraints();
    let norms = polytope.row_norms();
    let a = polytope.matrix();
    let b = polytope.offsets();

    let vars = 2 * n + 1 + m;
    let mut rows = Vec::with_capacity(m);
    let mut rhs = Vec::with_capacity(m);
    for i in 0..m {
        let mut row = vec![0.0; vars];
        for j in 0..n {
            row[j] = a[(i, j)];
            row[n + j] = -a[(i, j)];
        }
        row[2 * n] = norms[i];
        row[2 * n + 1 + i] = 1.0;
        rows.push(row);
        rhs.push(b[i]);
    }
    let mut objective = vec![0.0; vars];
    objective[2 * n] = 1.0;

    let solution = maximize(rows, rhs, &objective)?;
    let center: Vec<f64> = (0..n).map(|j| solution[j] - solution[n + j]).collect();
    let radius = solution[2 * n];
    InnerBall::new(center, radius)
}

/// Maximises `c·x` subject to `rows·x = rhs`, `x ≥ 0`.
fn maximize(mut rows: Vec<Vec<f64>>, mut rhs: Vec<f64>, c: &[f64]) -> Result<Vec<f64>, VolError> {
    let vars = c.len();
    let m = rows.len();
    for (row, b) in rows.iter_mut().zip(rhs.iter_mut()) {
        if *b < 0.0 {
            row.iter_mut().for_each(|v| *v = -*v);
            *b = -*b;
        }
    }

    // Every row starts with its own artificial variable in the basis.
    let width = vars + m + 1;
    let mut tableau = Tableau {
        rows: rows
            .into_iter()
            .zip(rhs)
            .enumerate()
            .map(|(i, (mut row, b))| {
                row.resize(width, 0.0);
                row[vars + i] = 1.0;
                row[width - 1] = b;
                row
            })
            .collect(),
        objective: vec![0.0; width],
        basis: (vars..vars + m).collect(),
    };

    let mut phase_one = vec![0.0; vars + m];
    phase_one[vars..].iter_mut().for_each(|v| *v = -1.0);
    tableau.set_objective(&phase_one);
    tableau.run(vars + m)?;
    if tableau.value() < -EPS * (1.0 + tableau.scale()) {
        return Err(VolError::DegenerateRegion(ErrorInfo::new(
            "lp-infeasible",
            "polytope constraints admit no common point",
        )));
    }
    tableau.drive_out_artificials(vars);

    let mut phase_two = c.to_vec();
    phase_two.resize(vars + m, 0.0);
    tableau.set_objective(&phase_two);
    tableau.run(vars)?;

    let mut solution = vec![0.0; vars];
    for (row, &var) in tableau.rows.iter().zip(tableau.basis.iter()) {
        if var < vars {
            solution[var] = row[width - 1];
        }
    }
    Ok(solution)
}

struct Tableau {
    rows: Vec<Vec<f64>>,
    objective: Vec<f64>,
    basis: Vec<usize>,
}

impl Tableau {
    fn rhs(&self) -> usize {
        self.objective.len() - 1
    }

    fn value(&self) -> f64 {
        self.objective[self.rhs()]
    }

    fn scale(&self) -> f64 {
        self.rows
            .iter()
            .map(|row| row[self.rhs()].abs())
            .fold(0.0, f64::max)
    }

    /// Loads `max c·x` as reduced costs, canonical with respect to the basis.
    fn set_objective(&mut self, c: &[f64]) {
        let rhs = self.rhs();
        self.objective.iter_mut().for_each(|v| *v = 0.0);
        for (j, &cost) in c.iter().enumerate() {
            self.objective[j] = -cost;
        }
        for (r, &var) in self.basis.iter().enumerate() {
            let factor = self.objective[var];
            if factor != 0.0 {
                for j in 0..=rhs {
                    self.objective[j] -= factor * self.rows[r][j];
                }
            }
        }
    }

    /// Bland's rule: smallest improving column, smallest basic index on ratio ties.
    fn run(&mut self, allowed: usize) -> Result<(), VolError> {
        let rhs = self.rhs();
        for _ in 0..MAX_PIVOTS {
            let Some(col) = (0..allowed).find(|&j| self.objective[j] < -EPS) else {
                return Ok(());
            };
            let mut leaving: Option<(usize, f64)> = None;
            for (r, row) in self.rows.iter().enumerate() {
                if row[col] <= EPS {
                    continue;
                }
                let ratio = row[rhs] / row[col];
                leaving = match leaving {
                    None => Some((r, ratio)),
                    Some((best, best_ratio)) => {
                        if ratio < best_ratio - EPS
                            || ((ratio - best_ratio).abs() <= EPS
                                && self.basis[r] < self.basis[best])
                        {
                            Some((r, ratio))
                        } else {
                            Some((best, best_ratio))
                        }
                    }
                };
            }
            let Some((row, _)) = leaving else {
                return Err(VolError::DegenerateRegion(
                    ErrorInfo::new("lp-unbounded", "polytope is unbounded")
                        .with_hint("add constraints bounding every direction"),
                ));
            };
            self.pivot(row, col);
        }
        Err(VolError::NumericInstability(
            ErrorInfo::new("lp-pivot-limit", "simplex did not terminate")
                .with_context("pivots", MAX_PIVOTS.to_string()),
        ))
    }

    fn pivot(&mut self, row: usize, col: usize) {
        let pivot = self.rows[row][col];
        self.rows[row].iter_mut().for_each(|v| *v /= pivot);
        let pivot_row = self.rows[row].clone();
        for (r, other) in self.rows.iter_mut().enumerate() {
            if r == row {
                continue;
            }
            let factor = other[col];
            if factor != 0.0 {
                for (v, p) in other.iter_mut().zip(pivot_row.iter()) {
                    *v -= factor * p;
                }
            }
        }
        let factor = self.objective[col];
        if factor != 0.0 {
            for (v, p) in self.objective.iter_mut().zip(pivot_row.iter()) {
                *v -= factor * p;
            }
        }
        self.basis[row] = col;
    }

    /// Pivots zero-level artificials out of the basis; rows where that is
    /// impossible are redundant and dropped.
    fn drive_out_artificials(&mut self, vars: usize) {
        let mut r = 0;
        while r < self.rows.len() {
            if self.basis[r] < vars {
                r += 1;
                continue;
            }
            match (0..vars).find(|&j| self.rows[r][j].abs() > EPS) {
                Some(col) => {
                    self.pivot(r, col);
                    r += 1;
                }
                None => {
                    self.rows.remove(r);
                    self.basis.remove(r);
                }
            }
        }
    }
}
