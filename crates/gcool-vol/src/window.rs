/// Minimum and maximum over the last `W` inserted values.
///
/// The buffer starts filled with zeros and the tracked extrema start at
/// `-f64::MAX` / `f64::MAX` in the last slot, so a constant stream reports
/// `min == max` only once the window has filled. An extremum is rescanned
/// only when its slot is overwritten by a value that does not replace it.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowedExtrema {
    buffer: Vec<f64>,
    position: usize,
    min: f64,
    min_position: usize,
    max: f64,
    max_position: usize,
    rescans: usize,
}

impl WindowedExtrema {
    /// Creates a tracker of width `width`, clamped to at least one slot.
    pub fn new(width: usize) -> Self {
        let width = width.max(1);
        Self {
            buffer: vec![0.0; width],
            position: 0,
            min: -f64::MAX,
            min_position: width - 1,
            max: f64::MAX,
            max_position: width - 1,
            rescans: 0,
        }
    }

    /// Window width.
    pub fn width(&self) -> usize {
        self.buffer.len()
    }

    /// Overwrites the oldest slot with `value`.
    pub fn insert(&mut self, value: f64) {
        let slot = self.position;
        self.buffer[slot] = value;

        if value <= self.min {
            self.min = value;
            self.min_position = slot;
        } else if self.min_position == slot {
            let (position, min) = self.scan(|candidate, best| candidate < best);
            self.min = min;
            self.min_position = position;
            self.rescans += 1;
        }

        if value >= self.max {
            self.max = value;
            self.max_position = slot;
        } else if self.max_position == slot {
            let (position, max) = self.scan(|candidate, best| candidate > best);
            self.max = max;
            self.max_position = position;
            self.rescans += 1;
        }

        self.position = (slot + 1) % self.buffer.len();
    }

    fn scan(&self, better: impl Fn(f64, f64) -> bool) -> (usize, f64) {
        let mut best_position = 0;
        let mut best = self.buffer[0];
        for (position, &candidate) in self.buffer.iter().enumerate().skip(1) {
            if better(candidate, best) {
                best = candidate;
                best_position = position;
            }
        }
        (best_position, best)
    }

    /// Tracked `(min, max)`.
    pub fn extrema(&self) -> (f64, f64) {
        (self.min, self.max)
    }

    /// Relative spread `(max - min) / max`.
    pub fn relative_spread(&self) -> f64 {
        (self.max - self.min) / self.max
    }

    /// Number of full-buffer rescans performed so far.
    pub fn rescans(&self) -> usize {
        self.rescans
    }
}
