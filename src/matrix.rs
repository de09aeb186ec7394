use std::fmt::Display;

use crate::{error::EvalError, op::Operator, value::Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Shape {
    pub rows: usize,
    pub cols: usize,
}

impl Display for Shape {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.rows, self.cols)
    }
}

/// A rectangular grid of numbers, stored row-major.
///
/// The shape is fixed once built; every operation returns a new matrix.
#[derive(Debug, Clone, PartialEq)]
pub struct Matrix {
    shape: Shape,
    cells: Vec<Value>,
}

impl Matrix {
    /// Builds a matrix from rows of already evaluated elements.
    ///
    /// Fails with [`EvalError::MalformedMatrix`] when there are no rows, a row
    /// is empty, rows differ in length, or an element is itself a matrix.
    pub fn from_rows(rows: Vec<Vec<Value>>) -> Result<Self, EvalError> {
        let Some(first) = rows.first() else {
            return Err(EvalError::malformed_matrix("a matrix needs at least one row"));
        };
        let shape = Shape {
            rows: rows.len(),
            cols: first.len(),
        };
        if shape.cols == 0 {
            return Err(EvalError::malformed_matrix("rows need at least one element"));
        }

        let mut cells = Vec::with_capacity(shape.rows * shape.cols);
        for (n, row) in rows.into_iter().enumerate() {
            if row.len() != shape.cols {
                return Err(EvalError::malformed_matrix(format!(
                    "row {} has {} elements, row 1 has {}",
                    n + 1,
                    row.len(),
                    shape.cols
                )));
            }
            for value in row {
                if let Value::Matrix(_) = value {
                    return Err(EvalError::malformed_matrix(
                        "elements must be numbers, not matrices",
                    ));
                }
                cells.push(value);
            }
        }

        Ok(Matrix { shape, cells })
    }

    pub fn shape(&self) -> Shape {
        self.shape
    }

    pub fn rows(&self) -> std::slice::Chunks<'_, Value> {
        self.cells.chunks(self.shape.cols)
    }

    /// Combines two matrices of identical shape cell by cell.
    pub fn zip_with(
        &self,
        other: &Matrix,
        mut f: impl FnMut(&Value, &Value) -> Result<Value, EvalError>,
    ) -> Result<Matrix, EvalError> {
        if self.shape != other.shape {
            return Err(EvalError::DimensionMismatch {
                left: self.shape,
                right: other.shape,
                span: None,
            });
        }
        let cells = self
            .cells
            .iter()
            .zip(&other.cells)
            .map(|(lhs, rhs)| f(lhs, rhs))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Matrix {
            shape: self.shape,
            cells,
        })
    }
}

/// Elementwise sum; each pair goes through the same `+` as scalars do.
pub fn add(lhs: &Matrix, rhs: &Matrix) -> Result<Matrix, EvalError> {
    lhs.zip_with(rhs, |a, b| Operator::Add.apply(&[a.clone(), b.clone()]))
}

impl Display for Matrix {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (r, row) in self.rows().enumerate() {
            if r > 0 {
                write!(f, ";")?;
            }
            write!(f, "[")?;
            for (c, cell) in row.iter().enumerate() {
                if c > 0 {
                    write!(f, ",")?;
                }
                write!(f, "{cell}")?;
            }
            write!(f, "]")?;
        }
        write!(f, "]")
    }
}

/// Splits a literal such as `[[1,2];[a+1,4]]` into the source of each
/// element, row by row. The returned slices borrow from `literal`, so callers
/// can recover their byte offsets.
pub fn split_literal(literal: &str) -> Result<Vec<Vec<&str>>, EvalError> {
    let inner = literal
        .trim()
        .strip_prefix('[')
        .and_then(|rest| rest.strip_suffix(']'))
        .ok_or_else(|| EvalError::malformed_matrix("a matrix is wrapped in `[` and `]`"))?;

    split_top_level(inner, ';')
        .into_iter()
        .map(|row| {
            let row = row.trim();
            let cells = row
                .strip_prefix('[')
                .and_then(|rest| rest.strip_suffix(']'))
                .ok_or_else(|| {
                    EvalError::malformed_matrix(format!(
                        "row `{row}` must be wrapped in `[` and `]`"
                    ))
                })?;
            split_top_level(cells, ',')
                .into_iter()
                .map(|cell| {
                    let cell = cell.trim();
                    if cell.is_empty() {
                        Err(EvalError::malformed_matrix("empty element"))
                    } else {
                        Ok(cell)
                    }
                })
                .collect()
        })
        .collect()
}

fn split_top_level(s: &str, separator: char) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (i, c) in s.char_indices() {
        match c {
            '[' | '(' => depth += 1,
            ']' | ')' => depth = depth.saturating_sub(1),
            c if c == separator && depth == 0 => {
                parts.push(&s[start..i]);
                start = i + c.len_utf8();
            }
            _ => {}
        }
    }
    parts.push(&s[start..]);
    parts
}
