use rayon::prelude::*;
use tracing::debug;

use crate::BLOCK_SIZE;

use super::kernel::{compute_tile, Tile, TileUpdate};
use super::matrix::ScoreMatrix;

/// Number of tiles along one side of the tile grid, counting a ragged final
/// tile as a full grid position.
pub fn tile_grid_width(interior: usize) -> usize {
    (interior + BLOCK_SIZE - 1) / BLOCK_SIZE
}

/// Fill the matrix interior with the blocked diagonal-wavefront schedule.
///
/// Tiles are processed in two sweeps over the anti-diagonals of the tile
/// grid: a growing sweep of diagonals `1..=W` starting at the top-left corner
/// tile, then a shrinking sweep of diagonals `W-1..=1` down to the
/// bottom-right corner. Tiles within a diagonal run as one parallel batch;
/// consecutive diagonals are separated by a full join, which is what makes a
/// tile's north/west/north-west halos complete before it reads them.
pub fn fill_wavefront(matrix: &mut ScoreMatrix) {
    let width = tile_grid_width(matrix.interior());

    if width == 1 {
        // Degenerate grid: compute the single (possibly clipped) tile
        // directly instead of scheduling diagonal batches.
        compute_tile(matrix, Tile { ti: 1, tj: 1 }).apply(matrix);
        return;
    }

    for d in 1..=width {
        run_batch(matrix, &growing_diagonal(d));
    }

    for d in (1..width).rev() {
        run_batch(matrix, &shrinking_diagonal(width, d));
    }
}

/// Straightforward single-threaded fill of the whole interior. Serves as the
/// equivalence baseline for [`fill_wavefront`]; both must produce identical
/// scores for every cell.
pub fn fill_reference(matrix: &mut ScoreMatrix) {
    let penalty = matrix.penalty();

    for i in 1..=matrix.interior() {
        for j in 1..=matrix.interior() {
            let score = (matrix.get(i - 1, j - 1) + matrix.substitution_score(i, j))
                .max(matrix.get(i, j - 1) - penalty)
                .max(matrix.get(i - 1, j) - penalty);
            matrix.set(i, j, score);
        }
    }
}

/// Tiles on diagonal `d` of the growing sweep: `ti + tj == d + 1`.
fn growing_diagonal(d: usize) -> Vec<Tile> {
    (1..=d).map(|ti| Tile { ti, tj: d + 1 - ti }).collect()
}

/// Tiles on diagonal `d` of the shrinking sweep: `ti + tj == 2W - d + 1`,
/// `d` tiles ending at the bottom-right corner for `d == 1`.
fn shrinking_diagonal(width: usize, d: usize) -> Vec<Tile> {
    (width - d + 1..=width)
        .map(|ti| Tile {
            ti,
            tj: 2 * width - d + 1 - ti,
        })
        .collect()
}

/// Compute one diagonal batch in parallel, then flush every tile's block into
/// the matrix. The flush happens strictly after the batch joins, so the next
/// diagonal only ever reads completed halos.
fn run_batch(matrix: &mut ScoreMatrix, tiles: &[Tile]) {
    debug!(tiles = tiles.len(), "running tile batch");

    let updates: Vec<TileUpdate> = {
        let matrix: &ScoreMatrix = matrix;
        tiles
            .par_iter()
            .map(|&tile| compute_tile(matrix, tile))
            .collect()
    };

    for update in &updates {
        update.apply(matrix);
    }
}
