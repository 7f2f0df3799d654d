//! Numeric primitives shared by the analysis pipeline.
//!
//! Small, allocation-light and deterministic: medians and quantiles use
//! linear interpolation on a sorted copy (matching the convention of the
//! tooling our analysts compare against), the regression is the closed-form
//! two-parameter least squares fit, and the softmax subtracts the maximum
//! before exponentiating so large strength scores cannot overflow.
//!
//! All functions treat an empty input as "no answer" (`None`), never as an
//! error.

/// Result of a two-parameter least-squares fit of `y = slope * x + intercept`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinearFit {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 0.0 when the data carries no variance.
    pub r_squared: f64,
}

/// Quantile with linear interpolation between order statistics.
///
/// `q` is clamped to `[0, 1]`. Returns `None` for an empty slice.
///
/// # Examples
///
/// ```
/// use gp_core::stats::quantile;
/// let v = [80.0, 80.5, 81.0, 83.0];
/// assert_eq!(quantile(&v, 0.75), Some(81.5));
/// ```
pub fn quantile(values: &[f64], q: f64) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    let mut sorted = values.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let q = q.clamp(0.0, 1.0);
    let h = (sorted.len() - 1) as f64 * q;
    let lo = h.floor() as usize;
    let hi = h.ceil() as usize;
    if lo == hi {
        return Some(sorted[lo]);
    }
    let frac = h - lo as f64;
    Some(sorted[lo] + (sorted[hi] - sorted[lo]) * frac)
}

/// Median (the 0.5 quantile): mean of the two middle values for even counts.
pub fn median(values: &[f64]) -> Option<f64> {
    quantile(values, 0.5)
}

/// Least-squares fit of `y = slope * x + intercept`.
///
/// Returns `None` for empty or mismatched inputs. Degenerate cases keep the
/// answer well-defined instead of failing: a single point fits a flat line
/// through it, and zero variance in `x` yields a flat line through the mean.
/// `r_squared` is `1 - ss_res / ss_tot`, defined as 0.0 when `ss_tot` is 0.
pub fn linear_fit(xs: &[f64], ys: &[f64]) -> Option<LinearFit> {
    if xs.is_empty() || xs.len() != ys.len() {
        return None;
    }
    let n = xs.len() as f64;
    let ym = ys.iter().sum::<f64>() / n;
    if xs.len() < 2 {
        return Some(LinearFit { slope: 0.0, intercept: ym, r_squared: 0.0 });
    }
    let xm = xs.iter().sum::<f64>() / n;
    let mut num = 0.0;
    let mut den = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        num += (x - xm) * (y - ym);
        den += (x - xm) * (x - xm);
    }
    if den <= 0.0 {
        return Some(LinearFit { slope: 0.0, intercept: ym, r_squared: 0.0 });
    }
    let slope = num / den;
    let intercept = ym - slope * xm;
    let mut ss_res = 0.0;
    let mut ss_tot = 0.0;
    for (x, y) in xs.iter().zip(ys) {
        let pred = slope * x + intercept;
        ss_res += (y - pred) * (y - pred);
        ss_tot += (y - ym) * (y - ym);
    }
    let r_squared = if ss_tot > 0.0 { 1.0 - ss_res / ss_tot } else { 0.0 };
    Some(LinearFit { slope, intercept, r_squared })
}

/// Numerically stable softmax.
///
/// Subtracts the maximum score before exponentiating. The output sums to
/// 1.0 for any non-empty input; NaN scores collapse to a uniform spread.
pub fn softmax(scores: &[f64]) -> Vec<f64> {
    if scores.is_empty() {
        return Vec::new();
    }
    let max = scores.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let exps: Vec<f64> = scores.iter().map(|s| (s - max).exp()).collect();
    let sum: f64 = exps.iter().sum();
    if !(sum > 0.0) {
        // NaN guard. Max-subtraction puts at least one exp(0) = 1 in the
        // sum for any finite input.
        let uniform = 1.0 / scores.len() as f64;
        return vec![uniform; scores.len()];
    }
    exps.iter().map(|e| e / sum).collect()
}
