use ndarray::{ArrayView1, Zip};
use std::fmt;
use std::str::FromStr;

/// Dissimilarity between a data point and a cluster centroid.
///
/// Implementations must be deterministic and return a finite, non-negative
/// value. They do not need to satisfy the triangle inequality.
/// Any `Fn(point, centroid, weights) -> f64` closure is a metric.
pub trait DistanceMetric: Send + Sync {
    fn distance(
        &self,
        point: ArrayView1<f64>,
        centroid: ArrayView1<f64>,
        weights: ArrayView1<f64>,
    ) -> f64;
}

impl<F> DistanceMetric for F
where
    F: Fn(ArrayView1<f64>, ArrayView1<f64>, ArrayView1<f64>) -> f64 + Send + Sync,
{
    #[inline]
    fn distance(
        &self,
        point: ArrayView1<f64>,
        centroid: ArrayView1<f64>,
        weights: ArrayView1<f64>,
    ) -> f64 {
        self(point, centroid, weights)
    }
}

/// Built-in weighted distance metrics
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Metric {
    /// Square root of the weighted sum of squared differences
    #[default]
    Euclidean,
    /// Weighted sum of absolute differences (city block)
    Manhattan,
    /// Largest weighted absolute difference
    Chebyshev,
    /// One minus the weighted Pearson correlation
    Pearson,
    /// One minus the weighted uncentered correlation (cosine similarity)
    Uncentered,
}

impl Metric {
    pub const ALL: [Metric; 5] = [
        Metric::Euclidean,
        Metric::Manhattan,
        Metric::Chebyshev,
        Metric::Pearson,
        Metric::Uncentered,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            Metric::Euclidean => "euclidean",
            Metric::Manhattan => "manhattan",
            Metric::Chebyshev => "chebyshev",
            Metric::Pearson => "pearson",
            Metric::Uncentered => "uncentered",
        }
    }
}

impl DistanceMetric for Metric {
    fn distance(
        &self,
        point: ArrayView1<f64>,
        centroid: ArrayView1<f64>,
        weights: ArrayView1<f64>,
    ) -> f64 {
        let d = match self {
            Metric::Euclidean => euclidean(point, centroid, weights),
            Metric::Manhattan => Zip::from(&point)
                .and(&centroid)
                .and(&weights)
                .fold(0.0_f64, |acc, &x, &c, &w| acc + w * (x - c).abs()),
            Metric::Chebyshev => Zip::from(&point)
                .and(&centroid)
                .and(&weights)
                .fold(0.0_f64, |acc, &x, &c, &w| acc.max(w * (x - c).abs())),
            Metric::Pearson => 1.0 - pearson(point, centroid, weights),
            Metric::Uncentered => 1.0 - uncentered(point, centroid, weights),
        };
        d.max(0.0)
    }
}

/// Weighted L2 distance, scaled by the largest coordinate gap so the squares
/// stay finite for large inputs.
fn euclidean(x: ArrayView1<f64>, y: ArrayView1<f64>, w: ArrayView1<f64>) -> f64 {
    let scale = Zip::from(&x)
        .and(&y)
        .fold(0.0_f64, |acc, &a, &b| acc.max((a - b).abs()));
    if scale == 0.0 || !scale.is_finite() {
        return scale;
    }
    let sum = Zip::from(&x).and(&y).and(&w).fold(0.0_f64, |acc, &a, &b, &w| {
        let t = (a - b) / scale;
        acc + w * t * t
    });
    scale * sum.sqrt()
}

/// Largest absolute value, or 1 for the zero vector.
fn magnitude(v: ArrayView1<f64>) -> f64 {
    let max = v.fold(0.0_f64, |acc, &a| acc.max(a.abs()));
    if max > 0.0 {
        max
    } else {
        1.0
    }
}

/// Weighted Pearson correlation, 0 when either side has no variance.
fn pearson(x: ArrayView1<f64>, y: ArrayView1<f64>, w: ArrayView1<f64>) -> f64 {
    let total = w.sum();
    if total <= 0.0 {
        return 0.0;
    }
    // Correlation is invariant under positive scaling of either side
    let (sx, sy) = (magnitude(x), magnitude(y));
    let mean_x = Zip::from(&x).and(&w).fold(0.0_f64, |acc, &a, &w| acc + w * (a / sx)) / total;
    let mean_y = Zip::from(&y).and(&w).fold(0.0_f64, |acc, &b, &w| acc + w * (b / sy)) / total;

    let (sxy, sxx, syy) = Zip::from(&x).and(&y).and(&w).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(sxy, sxx, syy), &a, &b, &w| {
            let dx = a / sx - mean_x;
            let dy = b / sy - mean_y;
            (sxy + w * dx * dy, sxx + w * dx * dx, syy + w * dy * dy)
        },
    );
    correlation(sxy, sxx, syy)
}

/// Weighted cosine similarity, 0 when either side is the zero vector.
fn uncentered(x: ArrayView1<f64>, y: ArrayView1<f64>, w: ArrayView1<f64>) -> f64 {
    let (sx, sy) = (magnitude(x), magnitude(y));
    let (sxy, sxx, syy) = Zip::from(&x).and(&y).and(&w).fold(
        (0.0_f64, 0.0_f64, 0.0_f64),
        |(sxy, sxx, syy), &a, &b, &w| {
            let (a, b) = (a / sx, b / sy);
            (sxy + w * a * b, sxx + w * a * a, syy + w * b * b)
        },
    );
    correlation(sxy, sxx, syy)
}

fn correlation(sxy: f64, sxx: f64, syy: f64) -> f64 {
    let denom = (sxx * syy).sqrt();
    if denom > 0.0 {
        (sxy / denom).clamp(-1.0, 1.0)
    } else {
        0.0
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "euclidean" => Ok(Metric::Euclidean),
            "manhattan" | "cityblock" | "city-block" => Ok(Metric::Manhattan),
            "chebyshev" => Ok(Metric::Chebyshev),
            "pearson" => Ok(Metric::Pearson),
            "uncentered" | "cosine" => Ok(Metric::Uncentered),
            other => Err(format!("unknown distance metric: {}", other)),
        }
    }
}
