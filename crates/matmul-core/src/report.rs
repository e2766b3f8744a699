//! Summary statistics and the final calculation report.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::Matrix;

/// Average, minimum, and maximum over every cell of a matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct MatrixInfo {
    /// Integer-truncated mean.
    pub average: i64,
    pub minimum: i64,
    pub maximum: i64,
}

impl MatrixInfo {
    /// Summarize a matrix. An empty matrix summarizes to all zeros.
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn of(matrix: &Matrix) -> Self {
        let mut count = 0i128;
        let mut sum = 0i128;
        let mut minimum = i64::MAX;
        let mut maximum = i64::MIN;

        for cell in matrix.cells() {
            count += 1;
            sum += i128::from(cell);
            minimum = minimum.min(cell);
            maximum = maximum.max(cell);
        }

        if count == 0 {
            return Self {
                average: 0,
                minimum: 0,
                maximum: 0,
            };
        }

        // The mean of i64 values always fits back into an i64.
        Self {
            average: (sum / count) as i64,
            minimum,
            maximum,
        }
    }
}

impl fmt::Display for MatrixInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MatrixInfo(Average = {}, Minimum = {}, Maximum = {})",
            self.average, self.minimum, self.maximum
        )
    }
}

/// Summary of a completed calculation.
///
/// The serialized field names are the contract callback consumers depend on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Report {
    pub size: usize,
    pub input_matrix_a: MatrixInfo,
    pub input_matrix_b: MatrixInfo,
    pub result_matrix: MatrixInfo,
    /// Epoch milliseconds.
    pub start_timestamp: i64,
    /// Epoch milliseconds.
    pub end_timestamp: i64,
}

impl Report {
    /// Wall-clock duration covered by the report, in milliseconds.
    #[must_use]
    pub fn elapsed_millis(&self) -> i64 {
        self.end_timestamp - self.start_timestamp
    }
}

impl fmt::Display for Report {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Report(Size = {}, InputMatrixA = {}, InputMatrixB = {}, ResultMatrix = {}, \
             StartTimestamp = {}, EndTimestamp = {})",
            self.size,
            self.input_matrix_a,
            self.input_matrix_b,
            self.result_matrix,
            self.start_timestamp,
            self.end_timestamp
        )
    }
}

/// Current time in epoch milliseconds.
#[must_use]
#[allow(clippy::cast_possible_truncation)]
pub fn now_millis() -> i64 {
    std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn m(rows: &[&[i64]]) -> Matrix {
        Matrix::from_rows(rows.iter().map(|r| r.to_vec()).collect()).unwrap()
    }

    #[test]
    fn info_basic() {
        let info = MatrixInfo::of(&m(&[&[1, 2], &[3, 5]]));
        assert_eq!(info.average, 2);
        assert_eq!(info.minimum, 1);
        assert_eq!(info.maximum, 5);
    }

    #[test]
    fn info_truncates_toward_zero() {
        let info = MatrixInfo::of(&m(&[&[-1, -2], &[0, 0]]));
        assert_eq!(info.average, 0);
        assert_eq!(info.minimum, -2);
        assert_eq!(info.maximum, 0);
    }

    #[test]
    fn info_does_not_overflow_on_large_cells() {
        let info = MatrixInfo::of(&m(&[&[i64::MAX, i64::MAX], &[i64::MAX, i64::MAX]]));
        assert_eq!(info.average, i64::MAX);
    }

    #[test]
    fn info_of_empty_matrix_is_zero() {
        let info = MatrixInfo::of(&Matrix::zeros(0));
        assert_eq!(
            info,
            MatrixInfo {
                average: 0,
                minimum: 0,
                maximum: 0
            }
        );
    }

    #[test]
    fn report_wire_shape() {
        let info = MatrixInfo {
            average: 1,
            minimum: 0,
            maximum: 2,
        };
        let report = Report {
            size: 3,
            input_matrix_a: info,
            input_matrix_b: info,
            result_matrix: info,
            start_timestamp: 10,
            end_timestamp: 25,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["Size"], 3);
        assert_eq!(json["InputMatrixA"]["Average"], 1);
        assert_eq!(json["InputMatrixB"]["Minimum"], 0);
        assert_eq!(json["ResultMatrix"]["Maximum"], 2);
        assert_eq!(json["StartTimestamp"], 10);
        assert_eq!(json["EndTimestamp"], 25);
        assert_eq!(report.elapsed_millis(), 15);
    }

    #[test]
    fn report_display() {
        let info = MatrixInfo {
            average: 0,
            minimum: 0,
            maximum: 0,
        };
        let report = Report {
            size: 1,
            input_matrix_a: info,
            input_matrix_b: info,
            result_matrix: info,
            start_timestamp: 1,
            end_timestamp: 2,
        };
        let s = report.to_string();
        assert!(s.starts_with("Report(Size = 1, InputMatrixA = MatrixInfo(Average = 0"));
        assert!(s.ends_with("StartTimestamp = 1, EndTimestamp = 2)"));
    }

    #[test]
    fn now_is_after_2020() {
        assert!(now_millis() > 1_577_836_800_000);
    }
}
