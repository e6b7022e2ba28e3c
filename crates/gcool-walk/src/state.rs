use gcool_core::errors::{ErrorInfo, VolError};
use gcool_core::Region;

/// Markov chain state carried across every annealing phase.
///
/// `previous` equals `point` except possibly at `last_coordinate`, and the
/// slack cache describes `previous`. The pending coordinate move is folded
/// into the cache by [`WalkState::sync`] at the start of the next step.
#[derive(Debug, Clone, PartialEq)]
pub struct WalkState {
    pub(crate) point: Vec<f64>,
    pub(crate) previous: Vec<f64>,
    pub(crate) last_coordinate: Option<usize>,
    pub(crate) slack: Vec<f64>,
}

impl WalkState {
    /// State sitting at the origin, which must be interior after centring.
    pub fn at_origin<R: Region>(region: &R) -> Self {
        let point = vec![0.0; region.dimension()];
        let slack = region.slack(&point);
        Self {
            previous: point.clone(),
            point,
            last_coordinate: None,
            slack,
        }
    }

    /// State sitting at an arbitrary point of the region.
    pub fn at_point<R: Region>(region: &R, point: Vec<f64>) -> Result<Self, VolError> {
        if point.len() != region.dimension() || !region.contains(&point) {
            return Err(VolError::DegenerateRegion(
                ErrorInfo::new("start-outside", "walk must start inside the region")
                    .with_context("dimension", point.len().to_string()),
            ));
        }
        let slack = region.slack(&point);
        Ok(Self {
            previous: point.clone(),
            point,
            last_coordinate: None,
            slack,
        })
    }

    /// Current sample point.
    pub fn point(&self) -> &[f64] {
        &self.point
    }

    /// Point before the most recent coordinate move.
    pub fn previous(&self) -> &[f64] {
        &self.previous
    }

    /// Coordinate used by the most recent hit-and-run move.
    pub fn last_coordinate(&self) -> Option<usize> {
        self.last_coordinate
    }

    /// Cached per-constraint slack of [`WalkState::previous`].
    pub fn slack(&self) -> &[f64] {
        &self.slack
    }

    /// Folds the pending coordinate move into the slack cache. Idempotent.
    pub fn sync<R: Region>(&mut self, region: &R) {
        if let Some(coordinate) = self.last_coordinate {
            let step = self.point[coordinate] - self.previous[coordinate];
            if step != 0.0 {
                region.advance_slack(&mut self.slack, coordinate, step);
                self.previous[coordinate] = self.point[coordinate];
            }
        }
    }

    /// Recomputes the slack cache from scratch, discarding accumulated drift.
    pub fn refresh<R: Region>(&mut self, region: &R) {
        self.previous.clone_from(&self.point);
        self.slack = region.slack(&self.point);
    }

    /// Moves the chain to `point`, whose slack has already been evaluated.
    pub(crate) fn adopt(&mut self, point: Vec<f64>, slack: Vec<f64>) {
        self.previous.clone_from(&point);
        self.point = point;
        self.last_coordinate = None;
        self.slack = slack;
    }

    /// Moves the chain to an interior point chosen by the caller.
    pub fn relocate<R: Region>(&mut self, region: &R, point: Vec<f64>) -> Result<(), VolError> {
        *self = Self::at_point(region, point)?;
        Ok(())
    }
}
