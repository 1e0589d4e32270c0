use crate::cells::GridCoordinate;
use crate::units::{Height, Width};

#[inline]
pub(crate) fn row_major_coordinate(index: usize, width: Width) -> GridCoordinate {
    let Width(w) = width;
    GridCoordinate::new((index % w) as u32, (index / w) as u32)
}

/// Visits every coordinate of a grid row by row, west to east.
#[derive(Debug, Copy, Clone)]
pub struct CellIter {
    width: Width,
    current_cell_number: usize,
    cells_count: usize,
}

impl CellIter {
    pub(crate) fn new(width: Width, height: Height) -> CellIter {
        CellIter {
            width,
            current_cell_number: 0,
            cells_count: width.0 * height.0,
        }
    }
}

impl ExactSizeIterator for CellIter {} // default impl using size_hint()
impl Iterator for CellIter {
    type Item = GridCoordinate;
    fn next(&mut self) -> Option<Self::Item> {
        if self.current_cell_number < self.cells_count {
            let coord = row_major_coordinate(self.current_cell_number, self.width);
            self.current_cell_number += 1;
            Some(coord)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let lower_bound = self.cells_count - self.current_cell_number;
        let upper_bound = lower_bound;
        (lower_bound, Some(upper_bound))
    }
}

/// Yields one row of coordinates at a time, north to south.
#[derive(Debug, Copy, Clone)]
pub struct RowIter {
    width: Width,
    height: Height,
    current_row: usize,
}

impl RowIter {
    pub(crate) fn new(width: Width, height: Height) -> RowIter {
        RowIter {
            width,
            height,
            current_row: 0,
        }
    }
}

impl ExactSizeIterator for RowIter {}
impl Iterator for RowIter {
    type Item = Vec<GridCoordinate>;
    fn next(&mut self) -> Option<Self::Item> {
        let (Width(w), Height(h)) = (self.width, self.height);
        if self.current_row < h {
            let y = self.current_row as u32;
            let coords = (0..w).map(|x| GridCoordinate::new(x as u32, y)).collect();
            self.current_row += 1;
            Some(coords)
        } else {
            None
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let remaining = self.height.0 - self.current_row;
        (remaining, Some(remaining))
    }
}
