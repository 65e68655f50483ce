pub mod scoring;
pub mod matrix;
pub mod kernel;
pub mod scheduler;
pub mod traceback;

use serde::Serialize;
use tracing::{debug, debug_span};

use crate::errors::WavealignError;

use self::matrix::ScoreMatrix;
use self::scoring::SubstitutionTable;
use self::traceback::TracebackStep;

/// Global pairwise aligner over a fixed substitution table and linear gap
/// penalty. One instance can serve any number of alignment requests; no state
/// is carried between requests.
pub struct GlobalAligner {
    table: SubstitutionTable,
    penalty: i32,
}

/// The outcome of one alignment request: the optimal global score, the
/// reconstructed path (in backward traversal order, end cell first), and the
/// filled score matrix it was read from.
#[derive(Serialize)]
pub struct AlignmentResult {
    pub score: i32,
    pub path: Vec<TracebackStep>,
    #[serde(skip)]
    pub matrix: ScoreMatrix,
}

impl GlobalAligner {
    pub fn new(table: SubstitutionTable, penalty: i32) -> Self {
        Self { table, penalty }
    }

    pub fn table(&self) -> &SubstitutionTable {
        &self.table
    }

    /// Align two residue sequences. All precondition checks (alphabet
    /// membership, equal non-zero lengths) happen before any tile batch is
    /// scheduled; on error no partial work is retained.
    pub fn align(&self, seq_a: &[u8], seq_b: &[u8]) -> Result<AlignmentResult, WavealignError> {
        let enc_a = self.table.encode(seq_a)?;
        let enc_b = self.table.encode(seq_b)?;

        self.align_encoded(&enc_a, &enc_b)
    }

    /// Align two sequences already encoded as substitution table indices.
    pub fn align_encoded(
        &self,
        seq_a: &[usize],
        seq_b: &[usize],
    ) -> Result<AlignmentResult, WavealignError> {
        let span = debug_span!("align", len = seq_a.len());
        let _enter = span.enter();

        debug_assert!(
            seq_a.iter().chain(seq_b).all(|&s| s < self.table.size()),
            "encoded symbol outside the substitution table"
        );

        let mut matrix = ScoreMatrix::new(seq_a, seq_b, &self.table, self.penalty)?;
        scheduler::fill_wavefront(&mut matrix);

        let path = traceback::traceback(&matrix);
        let score = matrix.get(matrix.interior(), matrix.interior());
        debug!(score, steps = path.len(), "alignment complete");

        Ok(AlignmentResult { score, path, matrix })
    }
}

#[cfg(test)]
mod tests {
    use super::traceback::Move;
    use super::scoring::SubstitutionTable;
    use super::GlobalAligner;

    #[test]
    fn test_known_four_symbol_alignment() {
        // Hand-computed scenario: match +1, mismatch -1, penalty 1.
        let table = SubstitutionTable::uniform("ACGT", 1, -1);
        let aligner = GlobalAligner::new(table, 1);

        let result = aligner.align(b"GATT", b"GATC").unwrap();

        let expected = [
            [0, -1, -2, -3, -4],
            [-1, 1, 0, -1, -2],
            [-2, 0, 2, 1, 0],
            [-3, -1, 1, 3, 2],
            [-4, -2, 0, 2, 2],
        ];
        for i in 0..5 {
            for j in 0..5 {
                assert_eq!(result.matrix.get(i, j), expected[i][j], "cell ({i}, {j})");
            }
        }

        assert_eq!(result.score, 2);
        assert_eq!(
            result
                .path
                .iter()
                .map(|step| (step.mov, step.score))
                .collect::<Vec<_>>(),
            vec![(Move::Diagonal, 3), (Move::Diagonal, 2), (Move::Diagonal, 1)]
        );
    }

    #[test]
    fn test_blosum62_self_alignment_is_all_diagonal() {
        let aligner = GlobalAligner::new(SubstitutionTable::blosum62(), 10);

        let seq = b"MKTAYIAKQRQISFVKSHFSRQLEERLGLIEVQ";
        let result = aligner.align(seq, seq).unwrap();

        assert!(result.path.iter().all(|step| step.mov == Move::Diagonal));
        assert_eq!(result.path.len(), seq.len() - 1);
    }

    #[test]
    fn test_rejects_unequal_lengths_before_fill() {
        let table = SubstitutionTable::uniform("ACGT", 1, -1);
        let aligner = GlobalAligner::new(table, 1);

        assert!(aligner.align(b"ACGT", b"ACG").is_err());
    }
}
