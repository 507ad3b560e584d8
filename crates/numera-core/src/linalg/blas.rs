//! Dense BLAS-style kernels on row-major slices.
//!
//! These work on raw buffers with explicit extents and are generic over
//! [`Element`], so one loop serves real and complex arrays. Shape checks
//! belong to the callers in [`crate::linalg`].

use crate::dtype::Element;

// ======================================================================
// Level 1: vector operations, O(n)
// ======================================================================

/// Inner product `sum(x_i * y_i)` (no conjugation).
///
/// ```
/// # use numera_core::linalg::blas::dot;
/// assert_eq!(dot(&[1.0, 2.0, 3.0], &[4.0, 5.0, 6.0]), 32.0);
/// ```
pub fn dot<T: Element>(x: &[T], y: &[T]) -> T {
    x.iter()
        .zip(y.iter())
        .fold(T::zero(), |acc, (&a, &b)| acc + a * b)
}

/// Euclidean norm of a real vector.
pub fn nrm2(x: &[f64]) -> f64 {
    x.iter().map(|&v| v * v).sum::<f64>().sqrt()
}

// ======================================================================
// Level 2: matrix-vector, O(n^2)
// ======================================================================

/// `A @ x` for an `[m, n]` matrix `a` and a length-`n` vector.
#[allow(clippy::many_single_char_names)]
pub fn gemv<T: Element>(a: &[T], m: usize, n: usize, x: &[T]) -> Vec<T> {
    (0..m).map(|i| dot(&a[i * n..(i + 1) * n], x)).collect()
}

// ======================================================================
// Level 3: matrix-matrix, O(n^3)
// ======================================================================

/// `A @ B` for `[m, k]` and `[k, n]` matrices.
///
/// ```
/// # use numera_core::linalg::blas::gemm;
/// let c = gemm(&[1.0, 2.0, 3.0, 4.0], 2, 2, &[5.0, 6.0, 7.0, 8.0], 2);
/// assert_eq!(c, vec![19.0, 22.0, 43.0, 50.0]);
/// ```
#[allow(clippy::many_single_char_names)]
pub fn gemm<T: Element>(a: &[T], m: usize, k: usize, b: &[T], n: usize) -> Vec<T> {
    let mut c = vec![T::zero(); m * n];
    // ikj loop order keeps B and C accesses sequential
    for i in 0..m {
        let c_row = &mut c[i * n..(i + 1) * n];
        for p in 0..k {
            let a_ip = a[i * k + p];
            let b_row = &b[p * n..(p + 1) * n];
            for (cij, &bpj) in c_row.iter_mut().zip(b_row.iter()) {
                *cij += a_ip * bpj;
            }
        }
    }
    c
}
