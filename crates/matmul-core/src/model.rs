//! Value types for matrices, calculations, tasks, and results.
//!
//! Field names on the wire are `PascalCase` (`Size`, `Data`, `A`, `B`, `X`,
//! `Y`, `Result`) so stored artifacts stay readable by the other platform
//! bindings sharing a bucket.

use std::fmt;

use serde::{Deserialize, Serialize, Serializer};

use crate::error::{MatMulError, Result};

/// Opaque identifier addressing every stored artifact of one calculation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CalculationId(String);

impl CalculationId {
    /// Mint a fresh, unguessable identifier.
    #[must_use]
    pub fn random() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CalculationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<String> for CalculationId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for CalculationId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for CalculationId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Square matrix of signed 64-bit cells.
///
/// Every row holds exactly `size` cells; this is checked on construction and
/// on deserialization, so code holding a `Matrix` can index freely.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(try_from = "RawMatrix")]
pub struct Matrix {
    size: usize,
    data: Vec<Vec<i64>>,
}

#[derive(Deserialize)]
struct RawMatrix {
    #[serde(rename = "Size")]
    size: usize,
    #[serde(rename = "Data")]
    data: Vec<Vec<i64>>,
}

#[derive(Serialize)]
struct MatrixRef<'a> {
    #[serde(rename = "Size")]
    size: usize,
    #[serde(rename = "Data")]
    data: &'a [Vec<i64>],
}

impl TryFrom<RawMatrix> for Matrix {
    type Error = MatMulError;

    fn try_from(raw: RawMatrix) -> Result<Self> {
        let matrix = Self::from_rows(raw.data)?;
        if matrix.size != raw.size {
            return Err(MatMulError::InvalidInput(format!(
                "declared size {} does not match {} rows",
                raw.size, matrix.size
            )));
        }
        Ok(matrix)
    }
}

impl Serialize for Matrix {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        MatrixRef {
            size: self.size,
            data: &self.data,
        }
        .serialize(serializer)
    }
}

impl Matrix {
    /// Create an `n×n` matrix filled with zeros.
    #[must_use]
    pub fn zeros(n: usize) -> Self {
        Self {
            size: n,
            data: vec![vec![0; n]; n],
        }
    }

    /// Build a matrix from rows, rejecting non-square input.
    pub fn from_rows(rows: Vec<Vec<i64>>) -> Result<Self> {
        let n = rows.len();
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != n) {
            return Err(MatMulError::InvalidInput(format!(
                "row {i} has {} cells, expected {n}",
                row.len()
            )));
        }
        Ok(Self { size: n, data: rows })
    }

    /// Matrix dimension.
    #[must_use]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Cell at row `x`, column `y`.
    #[must_use]
    pub fn get(&self, x: usize, y: usize) -> i64 {
        self.data[x][y]
    }

    /// Row-major view of the cells.
    #[must_use]
    pub fn rows(&self) -> &[Vec<i64>] {
        &self.data
    }

    /// Iterate all cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = i64> + '_ {
        self.data.iter().flatten().copied()
    }

    pub(crate) fn set(&mut self, x: usize, y: usize, value: i64) {
        self.data[x][y] = value;
    }
}

impl fmt::Display for Matrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{0}x{0} Matrix", self.size)?;
        for row in &self.data {
            for cell in row {
                write!(f, "{cell:010} ")?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// One multiplication request: `A × B`, both of the same size.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "RawCalculation")]
pub struct MatrixCalculation {
    #[serde(rename = "A")]
    a: Matrix,
    #[serde(rename = "B")]
    b: Matrix,
}

#[derive(Deserialize)]
struct RawCalculation {
    #[serde(rename = "A")]
    a: Matrix,
    #[serde(rename = "B")]
    b: Matrix,
}

impl TryFrom<RawCalculation> for MatrixCalculation {
    type Error = MatMulError;

    fn try_from(raw: RawCalculation) -> Result<Self> {
        Self::new(raw.a, raw.b)
    }
}

impl MatrixCalculation {
    /// Pair two matrices, rejecting mismatched sizes.
    pub fn new(a: Matrix, b: Matrix) -> Result<Self> {
        if a.size() != b.size() {
            return Err(MatMulError::InvalidInput(format!(
                "matrix sizes differ: A is {0}x{0}, B is {1}x{1}",
                a.size(),
                b.size()
            )));
        }
        Ok(Self { a, b })
    }

    /// Left operand.
    #[must_use]
    pub fn a(&self) -> &Matrix {
        &self.a
    }

    /// Right operand.
    #[must_use]
    pub fn b(&self) -> &Matrix {
        &self.b
    }

    /// Shared dimension of both operands.
    #[must_use]
    pub fn size(&self) -> usize {
        self.a.size()
    }

    /// Re-check the operand shapes.
    ///
    /// Values built through [`MatrixCalculation::new`] or deserialization
    /// always pass; the engine calls this before computing anyway.
    pub fn validate(&self) -> Result<()> {
        if self.a.size() != self.b.size() {
            return Err(MatMulError::InvalidInput(format!(
                "matrix sizes differ: {} vs {}",
                self.a.size(),
                self.b.size()
            )));
        }
        Ok(())
    }

    /// Inner product of row `x` of A with column `y` of B, wrapping on overflow.
    pub(crate) fn cell(&self, x: usize, y: usize) -> i64 {
        let mut acc = 0i64;
        for i in 0..self.size() {
            acc = acc.wrapping_add(self.a.get(x, i).wrapping_mul(self.b.get(i, y)));
        }
        acc
    }
}

/// A single output cell assigned to a worker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ComputationTask {
    /// Row index.
    #[serde(rename = "X")]
    pub x: usize,
    /// Column index.
    #[serde(rename = "Y")]
    pub y: usize,
}

impl ComputationTask {
    #[must_use]
    pub fn new(x: usize, y: usize) -> Self {
        Self { x, y }
    }
}

/// A computed output cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputationResult {
    /// Row index.
    #[serde(rename = "X")]
    pub x: usize,
    /// Column index.
    #[serde(rename = "Y")]
    pub y: usize,
    /// Cell value.
    #[serde(rename = "Result")]
    pub value: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[i64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn zeros_is_square() {
        let z = Matrix::zeros(3);
        assert_eq!(z.size(), 3);
        assert_eq!(z.rows().len(), 3);
        assert!(z.rows().iter().all(|r| r.len() == 3));
        assert!(z.cells().all(|c| c == 0));
    }

    #[test]
    fn from_rows_rejects_ragged() {
        let err = Matrix::from_rows(vec![vec![1, 2], vec![3]]).unwrap_err();
        assert!(matches!(err, MatMulError::InvalidInput(_)));
    }

    #[test]
    fn from_rows_rejects_non_square() {
        assert!(Matrix::from_rows(vec![vec![1, 2, 3], vec![4, 5, 6]]).is_err());
    }

    #[test]
    fn empty_matrix_is_allowed() {
        let e = Matrix::from_rows(Vec::new()).unwrap();
        assert_eq!(e.size(), 0);
        assert_eq!(e.cells().count(), 0);
    }

    #[test]
    fn calculation_rejects_mismatched_sizes() {
        let err = MatrixCalculation::new(Matrix::zeros(2), Matrix::zeros(3)).unwrap_err();
        assert!(matches!(err, MatMulError::InvalidInput(_)));
    }

    #[test]
    fn cell_is_inner_product() {
        let calc = MatrixCalculation::new(m(&[&[1, 2], &[3, 4]]), m(&[&[5, 6], &[7, 8]])).unwrap();
        assert_eq!(calc.cell(0, 0), 19);
        assert_eq!(calc.cell(0, 1), 22);
        assert_eq!(calc.cell(1, 0), 43);
        assert_eq!(calc.cell(1, 1), 50);
    }

    #[test]
    fn cell_wraps_instead_of_panicking() {
        let calc =
            MatrixCalculation::new(m(&[&[i64::MAX, 1], &[0, 0]]), m(&[&[2, 0], &[1, 0]])).unwrap();
        assert_eq!(calc.cell(0, 0), i64::MAX.wrapping_mul(2).wrapping_add(1));
    }

    #[test]
    fn matrix_wire_shape() {
        let json = serde_json::to_value(m(&[&[1, 2], &[3, 4]])).unwrap();
        assert_eq!(json, serde_json::json!({"Size": 2, "Data": [[1, 2], [3, 4]]}));
    }

    #[test]
    fn matrix_deserialize_checks_declared_size() {
        let bad = r#"{"Size": 3, "Data": [[1, 2], [3, 4]]}"#;
        assert!(serde_json::from_str::<Matrix>(bad).is_err());
        let ragged = r#"{"Size": 2, "Data": [[1, 2], [3]]}"#;
        assert!(serde_json::from_str::<Matrix>(ragged).is_err());
    }

    #[test]
    fn calculation_deserialize_checks_sizes() {
        let bad = r#"{"A": {"Size": 1, "Data": [[1]]}, "B": {"Size": 0, "Data": []}}"#;
        assert!(serde_json::from_str::<MatrixCalculation>(bad).is_err());
    }

    #[test]
    fn task_and_result_wire_names() {
        let t = serde_json::to_value(ComputationTask::new(1, 2)).unwrap();
        assert_eq!(t, serde_json::json!({"X": 1, "Y": 2}));
        let r = serde_json::to_value(ComputationResult { x: 1, y: 2, value: -7 }).unwrap();
        assert_eq!(r, serde_json::json!({"X": 1, "Y": 2, "Result": -7}));
    }

    #[test]
    fn display_pads_cells() {
        let s = m(&[&[1, 22], &[333, 4]]).to_string();
        assert!(s.starts_with("2x2 Matrix\n"));
        assert!(s.contains("0000000001 0000000022 \n"));
    }

    #[test]
    fn calculation_ids_are_unique() {
        let a = CalculationId::random();
        let b = CalculationId::random();
        assert_ne!(a, b);
        assert_eq!(a.as_str().len(), 36);
    }

    #[test]
    fn calculation_id_is_transparent_on_the_wire() {
        let id = CalculationId::from("abc");
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"abc\"");
        assert_eq!(id.to_string(), "abc");
    }
}
