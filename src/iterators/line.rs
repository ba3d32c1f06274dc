use glam::IVec2;

/// Cells of the discrete line from `start` to `end`, both inclusive.
///
/// Integer Bresenham traversal: one step along the major axis per cell, with
/// a minor-axis step whenever the ideal line has drifted more than half a
/// cell. Consecutive cells are 8-connected, no cell repeats, and the sequence
/// holds exactly `chebyshev(start, end) + 1` cells.
///
/// When the ideal line passes exactly between two candidate cells, the
/// minor step is deferred, so the cell on the start side is chosen.
#[derive(Debug, Clone)]
pub struct LineCells {
    /// Next cell to emit.
    cell: IVec2,
    /// Per-axis direction, each -1, 0 or 1.
    step: IVec2,
    /// Absolute extent along the major and minor axes.
    major_len: i64,
    minor_len: i64,
    x_major: bool,
    /// Twice the minor-axis drift from the ideal line, in units of `major_len`.
    error: i64,
    remaining: u32,
}

impl LineCells {
    pub fn new(start: IVec2, end: IVec2) -> Self {
        let delta = end - start;
        let step = delta.signum();
        let abs = delta.abs();
        let x_major = abs.x >= abs.y;
        let (major_len, minor_len) = if x_major {
            (abs.x as i64, abs.y as i64)
        } else {
            (abs.y as i64, abs.x as i64)
        };

        Self {
            cell: start,
            step,
            major_len,
            minor_len,
            x_major,
            error: 0,
            remaining: major_len as u32 + 1,
        }
    }

    /// Chebyshev distance between two cells.
    #[inline]
    pub fn chebyshev(a: IVec2, b: IVec2) -> u32 {
        let d = (b - a).abs();
        d.x.max(d.y) as u32
    }

    fn advance(&mut self) {
        self.error += 2 * self.minor_len;
        let minor_step = self.error > self.major_len;
        if minor_step {
            self.error -= 2 * self.major_len;
        }

        if self.x_major {
            self.cell.x += self.step.x;
            if minor_step {
                self.cell.y += self.step.y;
            }
        } else {
            self.cell.y += self.step.y;
            if minor_step {
                self.cell.x += self.step.x;
            }
        }
    }
}

impl Iterator for LineCells {
    type Item = IVec2;

    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let cell = self.cell;
        self.remaining -= 1;
        if self.remaining > 0 {
            self.advance();
        }
        Some(cell)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining as usize, Some(self.remaining as usize))
    }
}

impl ExactSizeIterator for LineCells {}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;

    fn cells(start: (i32, i32), end: (i32, i32)) -> Vec<IVec2> {
        LineCells::new(IVec2::new(start.0, start.1), IVec2::new(end.0, end.1)).collect()
    }

    fn assert_valid_path(path: &[IVec2], start: IVec2, end: IVec2) {
        assert_eq!(path.first(), Some(&start));
        assert_eq!(path.last(), Some(&end));
        assert_eq!(path.len() as u32, LineCells::chebyshev(start, end) + 1);

        for pair in path.windows(2) {
            let d = (pair[1] - pair[0]).abs();
            assert!(d.x <= 1 && d.y <= 1, "gap between {:?} and {:?}", pair[0], pair[1]);
            assert_ne!(pair[0], pair[1]);
        }

        let unique: HashSet<_> = path.iter().map(|c| (c.x, c.y)).collect();
        assert_eq!(unique.len(), path.len(), "repeated cell in {path:?}");
    }

    #[test]
    fn horizontal() {
        let path = cells((0, 0), (5, 0));
        assert_eq!(path.len(), 6);
        assert!(path.iter().all(|c| c.y == 0));
        assert_eq!(path[3], IVec2::new(3, 0));
    }

    #[test]
    fn vertical_negative() {
        let path = cells((2, 4), (2, -1));
        assert_eq!(path.len(), 6);
        assert_eq!(path[0], IVec2::new(2, 4));
        assert_eq!(path[5], IVec2::new(2, -1));
        assert!(path.iter().all(|c| c.x == 2));
    }

    #[test]
    fn diagonal() {
        let path = cells((0, 0), (4, 4));
        let expected: Vec<_> = (0..=4).map(|i| IVec2::new(i, i)).collect();
        assert_eq!(path, expected);
    }

    #[test]
    fn single_cell() {
        assert_eq!(cells((3, 3), (3, 3)), vec![IVec2::new(3, 3)]);
    }

    #[test]
    fn ties_keep_the_start_side_cell() {
        // At x = 1 the ideal line sits at y = 0.5.
        assert_eq!(
            cells((0, 0), (2, 1)),
            vec![IVec2::new(0, 0), IVec2::new(1, 0), IVec2::new(2, 1)]
        );
        assert_eq!(
            cells((0, 0), (-2, -1)),
            vec![IVec2::new(0, 0), IVec2::new(-1, 0), IVec2::new(-2, -1)]
        );
    }

    #[test]
    fn shallow_line_stays_near_ideal() {
        let start = IVec2::new(0, 0);
        let end = IVec2::new(10, 3);
        let path = cells((0, 0), (10, 3));
        for c in &path {
            let ideal = c.x as f64 * 3.0 / 10.0;
            assert!((c.y as f64 - ideal).abs() <= 0.5, "{c:?} drifts from the line");
        }
        assert_valid_path(&path, start, end);
    }

    #[test]
    fn all_octants_are_connected_and_minimal() {
        let start = IVec2::new(0, 0);
        for x in -7..=7 {
            for y in -7..=7 {
                let end = IVec2::new(x, y);
                let path: Vec<_> = LineCells::new(start, end).collect();
                assert_valid_path(&path, start, end);
            }
        }
    }

    #[test]
    fn exact_size() {
        let iter = LineCells::new(IVec2::new(1, 1), IVec2::new(-6, 3));
        assert_eq!(iter.len(), 8);
    }
}
