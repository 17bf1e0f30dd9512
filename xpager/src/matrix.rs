//! Page assembly: coordinate triplets to compressed sparse matrices
//!
//! A page is first collected as a [`CooMatrix`] from its reindexed
//! triplets, then converted to a [`CompressedMatrix`] in the iteration's
//! output format. The offset array of the compressed form has one entry per
//! element of the major axis, which is why the reindexer always maps the
//! major axis to page-local positions before assembly.

use xpager_core::{
    validation::check_coordinate, CoreError, MatrixElement, MatrixFormat, MatrixOperations,
    ReindexedTriplet, SparseMatrix,
};

/// Sparse matrix in coordinate form
#[derive(Debug, Clone, PartialEq)]
pub struct CooMatrix<T> {
    shape: (usize, usize),
    values: Vec<T>,
    rows: Vec<usize>,
    cols: Vec<usize>,
}

impl<T: MatrixElement> CooMatrix<T> {
    /// Create a coordinate matrix, validating every coordinate against
    /// `shape`
    pub fn new(
        shape: (usize, usize),
        values: Vec<T>,
        rows: Vec<usize>,
        cols: Vec<usize>,
    ) -> Result<Self, CoreError> {
        if rows.len() != values.len() || cols.len() != values.len() {
            return Err(CoreError::LengthMismatch);
        }

        for (&row, &col) in rows.iter().zip(&cols) {
            check_coordinate(row, shape.0)?;
            check_coordinate(col, shape.1)?;
        }

        Ok(Self {
            shape,
            values,
            rows,
            cols,
        })
    }

    /// Build from a reindexed page triplet using its declared shape
    pub fn from_triplet(triplet: ReindexedTriplet<T>) -> Result<Self, CoreError> {
        Self::new(triplet.shape, triplet.values, triplet.rows, triplet.cols)
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn nnz(&self) -> usize {
        self.values.len()
    }

    /// Convert to a compressed layout
    ///
    /// Entries are grouped by major index with a counting sort, minor
    /// indices are sorted within each group, and entries sharing a
    /// coordinate are summed.
    pub fn to_compressed(&self, format: MatrixFormat) -> Result<CompressedMatrix<T>, CoreError> {
        let (major, minor, n_major) = match format {
            MatrixFormat::Csr => (&self.rows, &self.cols, self.shape.0),
            MatrixFormat::Csc => (&self.cols, &self.rows, self.shape.1),
            MatrixFormat::Coo => return Err(CoreError::InvalidFormat),
        };

        let mut offsets = vec![0usize; n_major + 1];
        for &m in major {
            offsets[m + 1] += 1;
        }
        for i in 0..n_major {
            offsets[i + 1] += offsets[i];
        }

        let mut entries: Vec<(usize, T)> = vec![(0, T::zero()); self.nnz()];
        let mut cursor = offsets.clone();
        for k in 0..self.nnz() {
            let slot = &mut cursor[major[k]];
            entries[*slot] = (minor[k], self.values[k]);
            *slot += 1;
        }

        let mut indptr = Vec::with_capacity(n_major + 1);
        let mut indices = Vec::with_capacity(self.nnz());
        let mut data = Vec::with_capacity(self.nnz());
        indptr.push(0);

        for m in 0..n_major {
            let group = &mut entries[offsets[m]..offsets[m + 1]];
            // Stable, so duplicates are summed in store order.
            group.sort_by_key(|&(index, _)| index);

            let group_start = indices.len();
            for &(index, value) in group.iter() {
                if indices.len() > group_start && indices.last() == Some(&index) {
                    if let Some(last) = data.last_mut() {
                        *last = *last + value;
                    }
                } else {
                    indices.push(index);
                    data.push(value);
                }
            }
            indptr.push(indices.len());
        }

        Ok(CompressedMatrix {
            format,
            shape: self.shape,
            indptr,
            indices,
            data,
        })
    }
}

/// Sparse matrix in CSR or CSC layout
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedMatrix<T> {
    format: MatrixFormat,
    shape: (usize, usize),
    indptr: Vec<usize>,
    indices: Vec<usize>,
    data: Vec<T>,
}

impl<T: MatrixElement> CompressedMatrix<T> {
    /// An all-zero matrix
    pub fn empty(format: MatrixFormat, shape: (usize, usize)) -> Result<Self, CoreError> {
        CooMatrix::new(shape, Vec::new(), Vec::new(), Vec::new())?.to_compressed(format)
    }

    pub fn format(&self) -> MatrixFormat {
        self.format
    }

    /// (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    /// Offsets into `indices`/`data`, one per major element plus one
    pub fn indptr(&self) -> &[usize] {
        &self.indptr
    }

    /// Minor-axis index of every stored entry
    pub fn indices(&self) -> &[usize] {
        &self.indices
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }

    /// Length of the major axis (rows for CSR, columns for CSC)
    pub fn major_dim(&self) -> usize {
        self.indptr.len() - 1
    }

    /// Length of the minor axis
    pub fn minor_dim(&self) -> usize {
        match self.format {
            MatrixFormat::Csc => self.shape.0,
            _ => self.shape.1,
        }
    }

    /// Stored (minor index, value) slices of one major element
    pub fn slot(&self, major: usize) -> (&[usize], &[T]) {
        if major >= self.major_dim() {
            return (&[], &[]);
        }
        let range = self.indptr[major]..self.indptr[major + 1];
        (&self.indices[range.clone()], &self.data[range])
    }

    /// Iterate over stored entries as (row, col, value), in storage order
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, T)> + '_ {
        let transpose = self.format == MatrixFormat::Csc;
        (0..self.major_dim()).flat_map(move |major| {
            let (indices, values) = self.slot(major);
            indices.iter().zip(values).map(move |(&minor, &value)| {
                if transpose {
                    (minor, major, value)
                } else {
                    (major, minor, value)
                }
            })
        })
    }

    /// Convert back to coordinate form
    pub fn to_coo(&self) -> CooMatrix<T> {
        let mut rows = Vec::with_capacity(self.data.len());
        let mut cols = Vec::with_capacity(self.data.len());
        let mut values = Vec::with_capacity(self.data.len());
        for (row, col, value) in self.iter() {
            rows.push(row);
            cols.push(col);
            values.push(value);
        }
        CooMatrix {
            shape: self.shape,
            values,
            rows,
            cols,
        }
    }

    fn find(&self, major: usize, minor: usize) -> Option<T> {
        let (indices, values) = self.slot(major);
        indices.binary_search(&minor).ok().map(|pos| values[pos])
    }

    /// Entries along one minor element, gathered across every major slot
    fn gather_minor(&self, minor: usize) -> Vec<(usize, T)> {
        (0..self.major_dim())
            .filter_map(|major| self.find(major, minor).map(|value| (major, value)))
            .collect()
    }

    fn major_entries(&self, major: usize) -> Vec<(usize, T)> {
        let (indices, values) = self.slot(major);
        indices.iter().copied().zip(values.iter().copied()).collect()
    }
}

impl<T: MatrixElement> SparseMatrix for CompressedMatrix<T> {
    type Element = T;

    fn get_element(&self, row: usize, col: usize) -> Option<T> {
        if row >= self.shape.0 || col >= self.shape.1 {
            return None;
        }
        match self.format {
            MatrixFormat::Csc => self.find(col, row),
            _ => self.find(row, col),
        }
    }

    fn dimensions(&self) -> (usize, usize) {
        self.shape
    }

    fn nnz(&self) -> usize {
        self.data.len()
    }
}

impl<T: MatrixElement> MatrixOperations for CompressedMatrix<T> {
    fn get_row(&self, row_index: usize) -> Vec<(usize, T)> {
        if row_index >= self.shape.0 {
            return Vec::new();
        }
        match self.format {
            MatrixFormat::Csc => self.gather_minor(row_index),
            _ => self.major_entries(row_index),
        }
    }

    fn get_col(&self, col_index: usize) -> Vec<(usize, T)> {
        if col_index >= self.shape.1 {
            return Vec::new();
        }
        match self.format {
            MatrixFormat::Csc => self.major_entries(col_index),
            _ => self.gather_minor(col_index),
        }
    }
}
