//! Common utility functions
use crate::types::{convert, Error, RealScalar, Result};
use itertools::izip;
use rlst::CsrMatrix;

pub(crate) fn equal_grids<TestGrid, TrialGrid>(
    test_grid: &TestGrid,
    trial_grid: &TrialGrid,
) -> bool {
    std::ptr::addr_of!(*test_grid) as usize == std::ptr::addr_of!(*trial_grid) as usize
}

/// Data for a sparse matrix
#[derive(Debug, Clone)]
pub struct SparseMatrixData<T: RealScalar> {
    /// Data
    pub data: Vec<T>,
    /// Rows
    pub rows: Vec<usize>,
    /// Columns
    pub cols: Vec<usize>,
    /// Shape of the matrix
    pub shape: [usize; 2],
}

impl<T: RealScalar> SparseMatrixData<T> {
    /// Create new sparse matrix
    pub fn new(shape: [usize; 2]) -> Self {
        Self {
            data: vec![],
            rows: vec![],
            cols: vec![],
            shape,
        }
    }
    /// Create new sparse matrix with a known size
    pub fn new_known_size(shape: [usize; 2], size: usize) -> Self {
        Self {
            data: Vec::with_capacity(size),
            rows: Vec::with_capacity(size),
            cols: Vec::with_capacity(size),
            shape,
        }
    }
    /// The number of stored entries, including duplicates
    pub fn len(&self) -> usize {
        self.data.len()
    }
    /// Is the matrix empty?
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
    /// Append a single entry
    pub fn push(&mut self, row: usize, col: usize, value: T) {
        debug_assert!(row < self.shape[0] && col < self.shape[1]);
        self.rows.push(row);
        self.cols.push(col);
        self.data.push(value);
    }
    /// Sort the entries by row then column and sum entries at the same position
    pub fn sum_duplicates(&mut self) {
        let mut order = (0..self.len()).collect::<Vec<_>>();
        order.sort_by_key(|i| (self.rows[*i], self.cols[*i]));

        let mut rows = Vec::<usize>::with_capacity(order.len());
        let mut cols = Vec::<usize>::with_capacity(order.len());
        let mut data = Vec::<T>::with_capacity(order.len());
        for i in order {
            let (row, col, value) = (self.rows[i], self.cols[i], self.data[i]);
            if rows.last() == Some(&row) && cols.last() == Some(&col) {
                if let Some(last) = data.last_mut() {
                    *last = *last + value;
                }
            } else {
                rows.push(row);
                cols.push(col);
                data.push(value);
            }
        }
        self.rows = rows;
        self.cols = cols;
        self.data = data;
    }
    /// Convert the values to another precision
    pub fn promote<U: RealScalar>(self) -> SparseMatrixData<U> {
        SparseMatrixData {
            data: self.data.into_iter().map(convert::<T, U>).collect(),
            rows: self.rows,
            cols: self.cols,
            shape: self.shape,
        }
    }
    /// Create a CSR matrix, summing duplicate entries
    pub fn to_csr(mut self) -> Result<CsrMatrix<T>> {
        self.sum_duplicates();
        if let Some((row, col)) = izip!(&self.rows, &self.cols)
            .find(|(row, col)| **row >= self.shape[0] || **col >= self.shape[1])
        {
            return Err(Error::SparseMatrix(format!(
                "entry ({row}, {col}) is outside a matrix of shape {:?}",
                self.shape
            )));
        }
        CsrMatrix::<T>::from_aij(self.shape, &self.rows, &self.cols, &self.data)
            .map_err(|e| Error::SparseMatrix(format!("{e:?}")))
    }
}
