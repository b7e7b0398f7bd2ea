//! Dimension-checked linear algebra kernel.
//!
//! Thin wrappers over `nalgebra` dynamic matrices that report shape
//! mismatches as [`EsError::DimensionMismatch`] instead of panicking.
//! Vectors are reported with shape `(len, 1)`.

use nalgebra::{DMatrix, DVector};

use crate::error::{EsError, Result};

pub type Matrix = DMatrix<f64>;
pub type Vector = DVector<f64>;

fn shape(m: &Matrix) -> (usize, usize) {
    (m.nrows(), m.ncols())
}

fn vshape(v: &Vector) -> (usize, usize) {
    (v.len(), 1)
}

fn mismatch(op: &'static str, lhs: (usize, usize), rhs: (usize, usize)) -> EsError {
    EsError::DimensionMismatch { op, lhs, rhs }
}

/// Element-wise `a + b`.
pub fn add_vectors(a: &Vector, b: &Vector) -> Result<Vector> {
    if a.len() != b.len() {
        return Err(mismatch("add_vectors", vshape(a), vshape(b)));
    }
    Ok(a + b)
}

/// Element-wise `a + b`.
pub fn add_matrices(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if shape(a) != shape(b) {
        return Err(mismatch("add_matrices", shape(a), shape(b)));
    }
    Ok(a + b)
}

/// Matrix product `a * b`.
pub fn multiply(a: &Matrix, b: &Matrix) -> Result<Matrix> {
    if a.ncols() != b.nrows() {
        return Err(mismatch("multiply", shape(a), shape(b)));
    }
    Ok(a * b)
}

/// Matrix-vector product `a * v`.
pub fn mat_vec(a: &Matrix, v: &Vector) -> Result<Vector> {
    if a.ncols() != v.len() {
        return Err(mismatch("mat_vec", shape(a), vshape(v)));
    }
    Ok(a * v)
}

pub fn dot(a: &Vector, b: &Vector) -> Result<f64> {
    if a.len() != b.len() {
        return Err(mismatch("dot", vshape(a), vshape(b)));
    }
    Ok(a.dot(b))
}

pub fn transpose(a: &Matrix) -> Matrix {
    a.transpose()
}

pub fn scale_vector(v: &Vector, s: f64) -> Vector {
    v * s
}

pub fn scale_matrix(a: &Matrix, s: f64) -> Matrix {
    a * s
}

/// Square matrix with `values` on the main diagonal.
pub fn diagonal(values: &[f64]) -> Matrix {
    Matrix::from_diagonal(&Vector::from_column_slice(values))
}

/// Builds a matrix from row-major nested rows; every row must have the same length.
pub fn matrix_from_rows(rows: &[Vec<f64>]) -> Result<Matrix> {
    let ncols = rows.first().map_or(0, Vec::len);
    if let Some(bad) = rows.iter().find(|row| row.len() != ncols) {
        return Err(mismatch("matrix_from_rows", (1, ncols), (1, bad.len())));
    }
    Ok(Matrix::from_fn(rows.len(), ncols, |i, j| rows[i][j]))
}

/// Checks the SISO state-space shape invariant `A: n×n`, `B, C: n`.
pub fn check_state_space(a: &Matrix, b: &Vector, c: &Vector) -> Result<usize> {
    if !a.is_square() {
        return Err(mismatch("state_space A", shape(a), (a.nrows(), a.nrows())));
    }
    let n = a.nrows();
    if b.len() != n {
        return Err(mismatch("state_space B", shape(a), vshape(b)));
    }
    if c.len() != n {
        return Err(mismatch("state_space C", shape(a), vshape(c)));
    }
    Ok(n)
}

/// `out = a * x + b * u` without allocating. Shapes must already be validated.
pub(crate) fn affine_step_into(out: &mut Vector, a: &Matrix, x: &Vector, b: &Vector, u: f64) {
    debug_assert_eq!(a.ncols(), x.len());
    debug_assert_eq!(out.len(), b.len());
    out.gemv(1.0, a, x, 0.0);
    out.axpy(u, b, 1.0);
}
