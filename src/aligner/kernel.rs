use crate::BLOCK_SIZE;

use super::matrix::ScoreMatrix;

/// Coordinates of one tile in the tile grid, 1-based like the interior cells
/// the tile covers. Tile `(ti, tj)` spans matrix rows
/// `1 + (ti-1)*B ..= min(ti*B, n)` and the analogous columns; the final tile
/// in a row or column may be clipped when the sequence length is not a
/// multiple of the block size.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Tile {
    pub ti: usize,
    pub tj: usize,
}

impl Tile {
    #[inline]
    pub fn first_row(&self) -> usize {
        1 + (self.ti - 1) * BLOCK_SIZE
    }

    #[inline]
    pub fn first_col(&self) -> usize {
        1 + (self.tj - 1) * BLOCK_SIZE
    }
}

/// The block of interior scores one tile computation produced. Held in
/// tile-local storage until the whole diagonal batch has joined, then flushed
/// into the global matrix as the halo for the south/east neighbor tiles.
pub struct TileUpdate {
    tile: Tile,
    rows: usize,
    cols: usize,
    cells: Vec<i32>,
}

impl TileUpdate {
    /// Write the computed block back into the global matrix. Must only be
    /// called after the tile's diagonal batch has completed.
    pub fn apply(&self, matrix: &mut ScoreMatrix) {
        let row0 = self.tile.first_row();
        let col0 = self.tile.first_col();

        for r in 0..self.rows {
            for c in 0..self.cols {
                matrix.set(row0 + r, col0 + c, self.cells[r * self.cols + c]);
            }
        }
    }
}

/// Fill one tile's interior cells from its north/west/north-west halo.
///
/// The halo (one row above the tile, one column to its left, and the corner
/// cell) is copied into local working storage together with the tile's
/// substitution sub-block. The interior is then swept along its `2B - 1`
/// internal anti-diagonals; every cell on one internal diagonal depends only
/// on cells of the two previous diagonals, so a diagonal is complete before
/// the next one starts.
///
/// Calling this for a tile whose halo has not been filled yet is a contract
/// violation, not a runtime error.
pub fn compute_tile(matrix: &ScoreMatrix, tile: Tile) -> TileUpdate {
    debug_assert!(tile.ti >= 1 && tile.tj >= 1, "tile indices are 1-based");

    let n = matrix.interior();
    let row0 = tile.first_row();
    let col0 = tile.first_col();

    debug_assert!(row0 <= n && col0 <= n, "tile {tile:?} lies outside the matrix");

    // Ragged final tiles are clipped to the matrix interior.
    let rows = BLOCK_SIZE.min(n - row0 + 1);
    let cols = BLOCK_SIZE.min(n - col0 + 1);

    let mut temp = [[0i32; BLOCK_SIZE + 1]; BLOCK_SIZE + 1];
    let mut sub = [[0i32; BLOCK_SIZE]; BLOCK_SIZE];

    temp[0][0] = matrix.get(row0 - 1, col0 - 1);
    for c in 0..cols {
        temp[0][c + 1] = matrix.get(row0 - 1, col0 + c);
    }
    for r in 0..rows {
        temp[r + 1][0] = matrix.get(row0 + r, col0 - 1);
        for c in 0..cols {
            sub[r][c] = matrix.substitution_score(row0 + r, col0 + c);
        }
    }

    let penalty = matrix.penalty();

    for d in 0..rows + cols - 1 {
        let r_lo = d.saturating_sub(cols - 1);
        let r_hi = d.min(rows - 1);

        // All cells on this internal diagonal are mutually independent.
        for r in r_lo..=r_hi {
            let c = d - r;
            temp[r + 1][c + 1] = (temp[r][c] + sub[r][c])
                .max(temp[r + 1][c] - penalty)
                .max(temp[r][c + 1] - penalty);
        }
    }

    let mut cells = Vec::with_capacity(rows * cols);
    for r in 0..rows {
        cells.extend_from_slice(&temp[r + 1][1..=cols]);
    }

    TileUpdate {
        tile,
        rows,
        cols,
        cells,
    }
}
