use super::DynMatrix;

impl<T> DynMatrix<T> {
    /// View the logical matrix as a flat slice in row-major order.
    ///
    /// Spare capacity left behind by [`reshape`](Self::reshape) is not included.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 2, &[1.0, 2.0, 3.0, 4.0]);
    /// assert_eq!(m.as_slice(), &[1.0, 2.0, 3.0, 4.0]);
    /// ```
    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.data[..self.nrows * self.ncols]
    }

    /// View the logical matrix as a mutable flat slice.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        let len = self.nrows * self.ncols;
        &mut self.data[..len]
    }

    /// View row `i` as a slice.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    /// assert_eq!(m.row_slice(0), &[1.0, 2.0, 3.0]);
    /// assert_eq!(m.row_slice(1), &[4.0, 5.0, 6.0]);
    /// ```
    #[inline]
    pub fn row_slice(&self, i: usize) -> &[T] {
        let start = i * self.ncols;
        &self.data[start..start + self.ncols]
    }

    /// View row `i` as a mutable slice.
    #[inline]
    pub fn row_slice_mut(&mut self, i: usize) -> &mut [T] {
        let start = i * self.ncols;
        let end = start + self.ncols;
        &mut self.data[start..end]
    }

    /// Mutable rows `i` and `j` at the same time. Requires `i < j`.
    #[inline]
    pub(crate) fn two_rows_mut(&mut self, i: usize, j: usize) -> (&mut [T], &mut [T]) {
        debug_assert!(i < j);
        let n = self.ncols;
        let (head, tail) = self.data.split_at_mut(j * n);
        (&mut head[i * n..(i + 1) * n], &mut tail[..n])
    }

    /// Iterate over all elements in row-major order.
    #[inline]
    pub fn iter(&self) -> core::slice::Iter<'_, T> {
        self.as_slice().iter()
    }

    /// Iterate mutably over all elements in row-major order.
    #[inline]
    pub fn iter_mut(&mut self) -> core::slice::IterMut<'_, T> {
        self.as_mut_slice().iter_mut()
    }

    /// Iterate over the inclusive sub-region `[r0..=r1] x [c0..=c1]`.
    ///
    /// With `row_order` the region is walked row by row, otherwise column
    /// by column.
    ///
    /// ```
    /// use numeris_linalg::DynMatrix;
    /// let m = DynMatrix::from_rows(2, 3, &[1, 2, 3, 4, 5, 6]);
    /// let by_row: Vec<i32> = m.iter_region(true, 0, 1, 1, 2).copied().collect();
    /// assert_eq!(by_row, vec![2, 3, 5, 6]);
    /// let by_col: Vec<i32> = m.iter_region(false, 0, 1, 1, 2).copied().collect();
    /// assert_eq!(by_col, vec![2, 5, 3, 6]);
    /// ```
    pub fn iter_region(
        &self,
        row_order: bool,
        r0: usize,
        c0: usize,
        r1: usize,
        c1: usize,
    ) -> RegionIter<'_, T> {
        assert!(
            r0 <= r1 && c0 <= c1 && r1 < self.nrows && c1 < self.ncols,
            "region [{r0}..={r1}] x [{c0}..={c1}] outside {}x{} matrix",
            self.nrows,
            self.ncols,
        );
        RegionIter {
            matrix: self,
            row_order,
            r0,
            c0,
            rows: r1 - r0 + 1,
            cols: c1 - c0 + 1,
            pos: 0,
        }
    }
}

/// Iterator over a rectangular block of a [`DynMatrix`].
///
/// Created by [`DynMatrix::iter_region`].
#[derive(Debug, Clone)]
pub struct RegionIter<'a, T> {
    matrix: &'a DynMatrix<T>,
    row_order: bool,
    r0: usize,
    c0: usize,
    rows: usize,
    cols: usize,
    pos: usize,
}

impl<'a, T> Iterator for RegionIter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        if self.pos >= self.rows * self.cols {
            return None;
        }
        let (i, j) = if self.row_order {
            (self.pos / self.cols, self.pos % self.cols)
        } else {
            (self.pos % self.rows, self.pos / self.rows)
        };
        self.pos += 1;
        let m = self.matrix;
        Some(&m.data[(self.r0 + i) * m.ncols + self.c0 + j])
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.rows * self.cols - self.pos;
        (left, Some(left))
    }
}

impl<T> ExactSizeIterator for RegionIter<'_, T> {}

impl<'a, T> IntoIterator for &'a DynMatrix<T> {
    type Item = &'a T;
    type IntoIter = core::slice::Iter<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<'a, T> IntoIterator for &'a mut DynMatrix<T> {
    type Item = &'a mut T;
    type IntoIter = core::slice::IterMut<'a, T>;

    #[inline]
    fn into_iter(self) -> Self::IntoIter {
        self.iter_mut()
    }
}
