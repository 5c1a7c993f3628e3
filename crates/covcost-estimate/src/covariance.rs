//! Entity-clustered sandwich covariance.

use nalgebra::{DMatrix, DVector};

/// Liang-Zeger covariance `(X'X)^-1 (sum_g X_g' e_g e_g' X_g) (X'X)^-1`.
///
/// `clusters[i]` is the 0-based cluster of row `i`. With `debiased` the
/// matrix is scaled by `G/(G-1) * (N-1)/(N-K)`.
pub fn clustered_covariance(
    x: &DMatrix<f64>,
    residuals: &DVector<f64>,
    xtx_inv: &DMatrix<f64>,
    clusters: &[usize],
    debiased: bool,
) -> DMatrix<f64> {
    let k = x.ncols();
    let n_clusters = clusters.iter().copied().max().map_or(0, |m| m + 1);

    let mut scores = vec![DVector::<f64>::zeros(k); n_clusters];
    for (i, &g) in clusters.iter().enumerate() {
        let e = residuals[i];
        for j in 0..k {
            scores[g][j] += x[(i, j)] * e;
        }
    }
    let mut meat = DMatrix::<f64>::zeros(k, k);
    for score in &scores {
        meat += score * score.transpose();
    }

    let covariance = xtx_inv * meat * xtx_inv;
    if debiased {
        covariance * small_sample_scale(n_clusters, x.nrows(), k)
    } else {
        covariance
    }
}

fn small_sample_scale(clusters: usize, n: usize, k: usize) -> f64 {
    let g = clusters as f64;
    let n = n as f64;
    let k = k as f64;
    if g > 1.0 && n > k {
        (g / (g - 1.0)) * ((n - 1.0) / (n - k))
    } else {
        1.0
    }
}
