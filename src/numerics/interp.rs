/// Piecewise-linear interpolation over a strictly increasing grid.
use crate::error::{JvError, Result};

/// Behaviour outside `[grid[0], grid[n-1]]`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Extrapolation {
    /// Extend the first/last segment's line.
    #[default]
    Linear,
    /// Hold the edge value.
    Flat,
}

/// Borrowed grid + values. Lives for one operator application.
#[derive(Clone, Copy, Debug)]
pub struct LinInterp<'a> {
    grid: &'a [f64],
    values: &'a [f64],
    extrapolation: Extrapolation,
}

impl<'a> LinInterp<'a> {
    pub fn new(grid: &'a [f64], values: &'a [f64]) -> Result<Self> {
        JvError::check_len("interpolant values", grid.len(), values.len())?;
        if grid.len() < 2 {
            return Err(JvError::param(
                "grid",
                "need at least two points to interpolate",
            ));
        }
        if grid.iter().any(|g| !g.is_finite()) {
            return Err(JvError::param("grid", "grid points must be finite"));
        }
        if let Some(i) = grid.windows(2).position(|w| w[1] <= w[0]) {
            return Err(JvError::NonIncreasingGrid { index: i + 1 });
        }
        Ok(Self {
            grid,
            values,
            extrapolation: Extrapolation::default(),
        })
    }

    pub fn with_extrapolation(mut self, extrapolation: Extrapolation) -> Self {
        self.extrapolation = extrapolation;
        self
    }

    pub fn grid(&self) -> &'a [f64] {
        self.grid
    }

    pub fn values(&self) -> &'a [f64] {
        self.values
    }

    /// Value at `x`. Binary search for the bracketing segment.
    #[inline]
    pub fn eval(&self, x: f64) -> f64 {
        let n = self.grid.len();
        let (lo, hi) = (self.grid[0], self.grid[n - 1]);
        if self.extrapolation == Extrapolation::Flat {
            if x <= lo {
                return self.values[0];
            }
            if x >= hi {
                return self.values[n - 1];
            }
        }
        // Index of the left end of the segment; edge segments cover the tails.
        let i = self.grid.partition_point(|&g| g <= x).clamp(1, n - 1) - 1;
        let (x0, x1) = (self.grid[i], self.grid[i + 1]);
        let (y0, y1) = (self.values[i], self.values[i + 1]);
        y0 + (y1 - y0) * (x - x0) / (x1 - x0)
    }
}
