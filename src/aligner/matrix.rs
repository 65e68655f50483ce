use crate::errors::WavealignError;

use super::scoring::SubstitutionTable;

/// The dense `(n+1) x (n+1)` alignment score matrix `M` together with the
/// substitution score matrix `S` for one alignment request.
///
/// Row and column 0 hold the linear-gap boundary (`M[i][0] = -i * penalty`,
/// `M[0][j] = -j * penalty`); interior cells are undefined until a tile
/// kernel writes them. `S` is filled once at construction and read-only
/// afterwards.
pub struct ScoreMatrix {
    dim: usize,
    scores: Vec<i32>,
    substitution: Vec<i32>,
    penalty: i32,
}

impl ScoreMatrix {
    /// Build the matrix pair for two encoded sequences. Rejects unequal
    /// lengths (the tiling scheme assumes a square matrix) and empty
    /// sequences before any other work happens.
    pub fn new(
        seq_a: &[usize],
        seq_b: &[usize],
        table: &SubstitutionTable,
        penalty: i32,
    ) -> Result<Self, WavealignError> {
        if seq_a.len() != seq_b.len() {
            return Err(WavealignError::NonSquare(seq_a.len(), seq_b.len()));
        }

        if seq_a.is_empty() {
            return Err(WavealignError::EmptySequence);
        }

        let dim = seq_a.len() + 1;
        let mut matrix = Self {
            dim,
            scores: vec![0; dim * dim],
            substitution: vec![0; dim * dim],
            penalty,
        };

        matrix.init_gap_boundary();
        matrix.fill_substitution(seq_a, seq_b, table);

        Ok(matrix)
    }

    /// Row 0 and column 0 carry the cost of an all-gap prefix.
    fn init_gap_boundary(&mut self) {
        for i in 1..self.dim {
            self.scores[i * self.dim] = -(i as i32) * self.penalty;
            self.scores[i] = -(i as i32) * self.penalty;
        }
    }

    /// `S[i][j] = table[seq_a[i-1]][seq_b[j-1]]` for all interior cells.
    fn fill_substitution(&mut self, seq_a: &[usize], seq_b: &[usize], table: &SubstitutionTable) {
        for i in 1..self.dim {
            for j in 1..self.dim {
                self.substitution[i * self.dim + j] = table.score(seq_a[i - 1], seq_b[j - 1]);
            }
        }
    }

    /// Full matrix dimension, i.e. sequence length plus the boundary row/column.
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Sequence length; interior cells have row/column indices `1..=interior()`.
    #[inline]
    pub fn interior(&self) -> usize {
        self.dim - 1
    }

    #[inline]
    pub fn penalty(&self) -> i32 {
        self.penalty
    }

    #[inline]
    pub fn get(&self, i: usize, j: usize) -> i32 {
        self.scores[i * self.dim + j]
    }

    #[inline]
    pub(crate) fn set(&mut self, i: usize, j: usize, value: i32) {
        self.scores[i * self.dim + j] = value;
    }

    #[inline]
    pub fn substitution_score(&self, i: usize, j: usize) -> i32 {
        self.substitution[i * self.dim + j]
    }
}
