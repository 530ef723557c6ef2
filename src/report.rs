//! Fixed-precision text tables for labelled matrices and vectors

use std::fmt;

use crate::math::{Mat, Vec as FrameVec};

/// Decimal places used unless overridden
pub const DEFAULT_PRECISION: usize = 2;

/// A square matrix printed with DOF labels on both axes
pub struct MatrixTable<'a> {
    title: &'a str,
    labels: &'a [String],
    matrix: &'a Mat,
    precision: usize,
}

impl<'a> MatrixTable<'a> {
    pub fn new(title: &'a str, labels: &'a [String], matrix: &'a Mat) -> Self {
        Self {
            title,
            labels,
            matrix,
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl fmt::Display for MatrixTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .matrix
            .iter()
            .map(|v| format!("{:.*}", self.precision, v))
            .collect();
        let label_w = label_width(self.labels);
        let cell_w = cells
            .iter()
            .map(String::len)
            .chain(self.labels.iter().map(String::len))
            .max()
            .unwrap_or(0);

        writeln!(f, "{}", self.title)?;
        write!(f, "{:label_w$}", "")?;
        for c in 0..self.matrix.ncols() {
            write!(f, " {:>cell_w$}", label(self.labels, c))?;
        }
        writeln!(f)?;

        let nrows = self.matrix.nrows();
        for r in 0..nrows {
            write!(f, "{:<label_w$}", label(self.labels, r))?;
            for c in 0..self.matrix.ncols() {
                // nalgebra storage is column-major
                write!(f, " {:>cell_w$}", cells[c * nrows + r])?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

/// A column vector printed one labelled entry per line
pub struct VectorTable<'a> {
    title: &'a str,
    labels: &'a [String],
    vector: &'a FrameVec,
    precision: usize,
}

impl<'a> VectorTable<'a> {
    pub fn new(title: &'a str, labels: &'a [String], vector: &'a FrameVec) -> Self {
        Self {
            title,
            labels,
            vector,
            precision: DEFAULT_PRECISION,
        }
    }

    pub fn with_precision(mut self, precision: usize) -> Self {
        self.precision = precision;
        self
    }
}

impl fmt::Display for VectorTable<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let cells: Vec<String> = self
            .vector
            .iter()
            .map(|v| format!("{:.*}", self.precision, v))
            .collect();
        let label_w = label_width(self.labels);
        let cell_w = cells.iter().map(String::len).max().unwrap_or(0);

        writeln!(f, "{}", self.title)?;
        for (i, cell) in cells.iter().enumerate() {
            writeln!(f, "{:<label_w$} {:>cell_w$}", label(self.labels, i), cell)?;
        }
        Ok(())
    }
}

fn label_width(labels: &[String]) -> usize {
    labels.iter().map(String::len).max().unwrap_or(0)
}

fn label(labels: &[String], i: usize) -> &str {
    labels.get(i).map(String::as_str).unwrap_or("?")
}
