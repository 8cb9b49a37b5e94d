use std::fmt;

use serde::Serialize;

use crate::error::{PipelineError, Result};

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Descriptive statistics over one sequence of values.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Summary {
    pub count: usize,
    pub mean: f64,
    /// NaN when no value is strictly positive.
    pub geometric_mean: f64,
    /// Sample standard deviation; exactly `0.0` for a single value.
    pub stdev: f64,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
    pub iqr: f64,
}

/// Summarize `values`. Order does not matter.
pub fn summarize(values: &[f64]) -> Result<Summary> {
    if values.is_empty() {
        return Err(PipelineError::EmptyInput);
    }

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    let q1 = quantile_sorted(&sorted, 0.25);
    let q3 = quantile_sorted(&sorted, 0.75);

    Ok(Summary {
        count: values.len(),
        mean: mean(values),
        geometric_mean: geometric_mean(values),
        stdev: sample_stdev(values),
        min: sorted[0],
        q1,
        median: quantile_sorted(&sorted, 0.5),
        q3,
        max: sorted[sorted.len() - 1],
        iqr: q3 - q1,
    })
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

/// `exp(mean(ln x))` over the strictly positive values only.
pub fn geometric_mean(values: &[f64]) -> f64 {
    let (log_sum, n) = values
        .iter()
        .filter(|&&v| v > 0.0)
        .fold((0.0, 0usize), |(sum, n), &v| (sum + v.ln(), n + 1));
    if n == 0 {
        return f64::NAN;
    }
    (log_sum / n as f64).exp()
}

/// Sample (N-1) standard deviation, `0.0` when there are fewer than two values.
pub fn sample_stdev(values: &[f64]) -> f64 {
    let n = values.len();
    if n <= 1 {
        return 0.0;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|&v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

/// Quantile of already sorted data, interpolating linearly between the two
/// closest ranks at position `p * (n - 1)`.
pub fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    debug_assert!(!sorted.is_empty());
    let pos = p.clamp(0.0, 1.0) * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "count:          {}", self.count)?;
        writeln!(f, "mean:           {:.4}", self.mean)?;
        if self.geometric_mean.is_nan() {
            writeln!(f, "geometric mean: undefined (no positive values)")?;
        } else {
            writeln!(f, "geometric mean: {:.4}", self.geometric_mean)?;
        }
        writeln!(f, "std:            {:.4}", self.stdev)?;
        writeln!(f, "min:            {:.4}", self.min)?;
        writeln!(f, "25%:            {:.4}", self.q1)?;
        writeln!(f, "50%:            {:.4}", self.median)?;
        writeln!(f, "75%:            {:.4}", self.q3)?;
        writeln!(f, "max:            {:.4}", self.max)?;
        writeln!(f, "IQR:            {:.4}", self.iqr)
    }
}

// ---------------------------------------------------------------------------
// Linear regression
// ---------------------------------------------------------------------------

/// First-degree least-squares fit `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegressionFit {
    pub slope: f64,
    pub intercept: f64,
}

impl RegressionFit {
    pub fn predict(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }
}

impl fmt::Display for RegressionFit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "regression:     y = {:.6} x + {:.6}", self.slope, self.intercept)
    }
}

pub fn fit_linear(xs: &[f64], ys: &[f64]) -> Result<RegressionFit> {
    if xs.len() != ys.len() {
        return Err(PipelineError::MismatchedLengths {
            xs: xs.len(),
            ys: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Err(PipelineError::InsufficientData { points: xs.len() });
    }

    // Checked on the inputs: rounding in the mean can leave a tiny nonzero sxx.
    if xs.iter().all(|&x| x == xs[0]) {
        return Err(PipelineError::DegenerateInput);
    }

    let x_mean = mean(xs);
    let y_mean = mean(ys);
    let (sxy, sxx) = xs
        .iter()
        .zip(ys)
        .fold((0.0, 0.0), |(sxy, sxx), (&x, &y)| {
            let dx = x - x_mean;
            (sxy + dx * (y - y_mean), sxx + dx * dx)
        });

    let slope = sxy / sxx;
    Ok(RegressionFit {
        slope,
        intercept: y_mean - slope * x_mean,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn empty_input_is_an_error() {
        assert!(matches!(summarize(&[]), Err(PipelineError::EmptyInput)));
    }

    #[test]
    fn single_value() {
        let s = summarize(&[5.0]).unwrap();
        assert_eq!(s.stdev, 0.0);
        assert_eq!(s.mean, 5.0);
        assert!(close(s.geometric_mean, 5.0));
        assert_eq!(s.iqr, 0.0);
    }

    #[test]
    fn quartiles_interpolate_linearly() {
        let s = summarize(&[4.0, 2.0, 1.0, 3.0]).unwrap();
        assert_eq!(s.mean, 2.5);
        assert!(close(s.q1, 1.75));
        assert!(close(s.q3, 3.25));
        assert!(close(s.iqr, 1.5));
        assert!(close(s.median, 2.5));
        assert_eq!((s.min, s.max), (1.0, 4.0));
    }

    #[test]
    fn sample_stdev_uses_n_minus_one() {
        let s = summarize(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]).unwrap();
        assert!(close(s.stdev, (32.0f64 / 7.0).sqrt()));
    }

    #[test]
    fn geometric_mean_ignores_non_positive() {
        assert!(close(geometric_mean(&[0.0, -3.0, 2.0, 8.0]), 4.0));
        assert!(geometric_mean(&[0.0, -1.0]).is_nan());

        let s = summarize(&[0.0, 0.0]).unwrap();
        assert!(s.geometric_mean.is_nan());
        assert!(s.to_string().contains("undefined"));
    }

    #[test]
    fn fits_exact_line() {
        let xs = [0.0, 1.0, 2.0, 3.0, 4.5];
        let ys: Vec<f64> = xs.iter().map(|x| 2.0 * x + 1.0).collect();
        let fit = fit_linear(&xs, &ys).unwrap();
        assert!(close(fit.slope, 2.0));
        assert!(close(fit.intercept, 1.0));
        assert!(close(fit.predict(10.0), 21.0));
    }

    #[test]
    fn regression_errors() {
        assert!(matches!(
            fit_linear(&[1.0], &[1.0]),
            Err(PipelineError::InsufficientData { points: 1 })
        ));
        assert!(matches!(
            fit_linear(&[3.0, 3.0, 3.0], &[1.0, 2.0, 3.0]),
            Err(PipelineError::DegenerateInput)
        ));
        assert!(matches!(
            fit_linear(&[0.1, 0.1, 0.1], &[1.0, 5.0, 2.0]),
            Err(PipelineError::DegenerateInput)
        ));
        assert!(matches!(
            fit_linear(&[1.0, 2.0], &[1.0]),
            Err(PipelineError::MismatchedLengths { xs: 2, ys: 1 })
        ));
    }
}
