use itertools::Itertools;
use serde::Serialize;
use tracing::debug;

use super::matrix::ScoreMatrix;

/// One backward step of the reconstructed alignment path.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum Move {
    /// Consume one symbol of both sequences (match or mismatch)
    Diagonal,

    /// Consume one symbol of sequence B, gap in sequence A
    Left,

    /// Consume one symbol of sequence A, gap in sequence B
    Up,
}

impl Move {
    pub fn code(&self) -> char {
        match self {
            Move::Diagonal => 'D',
            Move::Left => 'L',
            Move::Up => 'U',
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct TracebackStep {
    pub mov: Move,
    pub score: i32,
}

/// Walk the completed matrix from cell `(n-1, n-1)` back to the origin,
/// emitting the best candidate score and the chosen move at every step.
///
/// When multiple candidates tie for the best score, diagonal takes precedence
/// over left, which takes precedence over up. This ordering decides which of
/// several optimal alignments is reported and is part of the contract.
///
/// The walk is a pure read of the matrix: re-running it yields the identical
/// move sequence, and its length is bounded by `2n` steps.
pub fn traceback(matrix: &ScoreMatrix) -> Vec<TracebackStep> {
    let n = matrix.interior();
    let penalty = matrix.penalty();

    // A length-1 problem has no second-to-last interior cell; the walk then
    // starts at the single interior cell instead.
    let start = if n == 1 { 1 } else { n - 1 };

    let mut i = start;
    let mut j = start;
    let mut path = Vec::with_capacity(2 * n);

    while i != 0 || j != 0 {
        // Only one predecessor is in bounds on the top and left edges, so the
        // move is forced there. A fixed sentinel score cannot stand in for the
        // missing candidates: an edge gap cost can fall below any such value.
        let (mov, best) = if i == 0 {
            (Move::Left, matrix.get(i, j - 1) - penalty)
        } else if j == 0 {
            (Move::Up, matrix.get(i - 1, j) - penalty)
        } else {
            let new_nw = matrix.get(i - 1, j - 1) + matrix.substitution_score(i, j);
            let new_w = matrix.get(i, j - 1) - penalty;
            let new_n = matrix.get(i - 1, j) - penalty;
            let best = new_nw.max(new_w).max(new_n);

            let mov = if best == new_nw {
                Move::Diagonal
            } else if best == new_w {
                Move::Left
            } else {
                Move::Up
            };
            (mov, best)
        };

        path.push(TracebackStep { mov, score: best });

        match mov {
            Move::Diagonal => {
                i -= 1;
                j -= 1;
            }
            Move::Left => j -= 1,
            Move::Up => i -= 1,
        }
    }

    debug!(steps = path.len(), "traceback complete");

    path
}

/// Compact run-length rendering of the path in forward (origin-first) order,
/// e.g. `"3D1L2D"`.
pub fn move_string(path: &[TracebackStep]) -> String {
    path.iter()
        .rev()
        .map(|step| step.mov.code())
        .dedup_with_count()
        .map(|(count, code)| format!("{count}{code}"))
        .join("")
}

/// Render the aligned sequences as three text rows: sequence A, a midline
/// marking matches (`|`) and mismatches (`.`), and sequence B.
pub fn render_alignment(path: &[TracebackStep], seq_a: &[u8], seq_b: &[u8]) -> String {
    let mut row_a = String::with_capacity(path.len());
    let mut midline = String::with_capacity(path.len());
    let mut row_b = String::with_capacity(path.len());

    let mut i = 0;
    let mut j = 0;

    for step in path.iter().rev() {
        match step.mov {
            Move::Diagonal => {
                let (a, b) = (seq_a[i], seq_b[j]);
                row_a.push(char::from(a));
                midline.push(if a.eq_ignore_ascii_case(&b) { '|' } else { '.' });
                row_b.push(char::from(b));
                i += 1;
                j += 1;
            }
            Move::Left => {
                row_a.push('-');
                midline.push(' ');
                row_b.push(char::from(seq_b[j]));
                j += 1;
            }
            Move::Up => {
                row_a.push(char::from(seq_a[i]));
                midline.push(' ');
                row_b.push('-');
                i += 1;
            }
        }
    }

    format!("{row_a}\n{midline}\n{row_b}")
}

#[cfg(test)]
mod tests {
    use super::{move_string, render_alignment, traceback, Move};
    use crate::aligner::matrix::ScoreMatrix;
    use crate::aligner::scheduler::fill_wavefront;
    use crate::aligner::scoring::SubstitutionTable;

    fn filled_matrix(seq_a: &[u8], seq_b: &[u8], penalty: i32) -> ScoreMatrix {
        let table = SubstitutionTable::uniform("ACGT", 1, -1);
        let enc_a = table.encode(seq_a).unwrap();
        let enc_b = table.encode(seq_b).unwrap();
        let mut matrix = ScoreMatrix::new(&enc_a, &enc_b, &table, penalty).unwrap();
        fill_wavefront(&mut matrix);
        matrix
    }

    #[test]
    fn test_three_way_tie_prefers_diagonal() {
        // A zero-score table with zero penalty makes every candidate equal at
        // every cell; the tie-break must always pick the diagonal move.
        let table = SubstitutionTable::uniform("ACGT", 0, 0);
        let seq_a = table.encode(b"ACGT").unwrap();
        let seq_b = table.encode(b"TGCA").unwrap();
        let mut matrix = ScoreMatrix::new(&seq_a, &seq_b, &table, 0).unwrap();
        fill_wavefront(&mut matrix);

        let path = traceback(&matrix);
        assert_eq!(path.len(), 3);
        assert!(path.iter().all(|step| step.mov == Move::Diagonal));
    }

    #[test]
    fn test_traceback_is_idempotent() {
        let matrix = filled_matrix(b"ACGTACGT", b"ACCTACGA", 1);

        let first = traceback(&matrix);
        let second = traceback(&matrix);
        assert_eq!(first, second);
    }

    #[test]
    fn test_path_is_bounded_and_reaches_origin() {
        let matrix = filled_matrix(b"ACGTACGTACGTACGTACGTA", b"AGGTACGTACGTACCTACGTA", 2);

        let path = traceback(&matrix);
        assert!(path.len() <= 2 * matrix.interior());

        // Replaying the moves from the start cell must land exactly on (0, 0).
        let (mut i, mut j) = (matrix.interior() - 1, matrix.interior() - 1);
        for step in &path {
            match step.mov {
                Move::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
                Move::Left => j -= 1,
                Move::Up => i -= 1,
            }
        }
        assert_eq!((i, j), (0, 0));
    }

    #[test]
    fn test_edge_hugging_path_reaches_origin() {
        // A mismatch score far below any gap cost makes the optimal path run
        // along the matrix edges. The walk must still follow the edges to the
        // origin once the edge gap cost falls below any plausible sentinel.
        let table = SubstitutionTable::uniform("AC", 1, -100_000);
        let seq_a = table.encode(&vec![b'A'; 202]).unwrap();
        let seq_b = table.encode(&vec![b'C'; 202]).unwrap();
        let mut matrix = ScoreMatrix::new(&seq_a, &seq_b, &table, 10).unwrap();
        fill_wavefront(&mut matrix);

        let path = traceback(&matrix);
        assert!(path.iter().all(|step| step.mov != Move::Diagonal));

        let (mut i, mut j) = (matrix.interior() - 1, matrix.interior() - 1);
        for step in &path {
            match step.mov {
                Move::Diagonal => {
                    i -= 1;
                    j -= 1;
                }
                Move::Left => j -= 1,
                Move::Up => i -= 1,
            }
        }
        assert_eq!((i, j), (0, 0));
    }

    #[test]
    fn test_degenerate_single_cell() {
        let matrix = filled_matrix(b"A", b"A", 1);

        let path = traceback(&matrix);
        assert_eq!(path.len(), 1);
        assert_eq!(path[0].mov, Move::Diagonal);
        assert_eq!(path[0].score, 1);
    }

    #[test]
    fn test_move_string_run_length() {
        let matrix = filled_matrix(b"ACGT", b"ACGT", 1);

        let path = traceback(&matrix);
        assert_eq!(move_string(&path), "3D");
    }

    #[test]
    fn test_render_alignment_rows() {
        let matrix = filled_matrix(b"ACGT", b"ACCT", 1);

        let path = traceback(&matrix);
        let rendered = render_alignment(&path, b"ACGT", b"ACCT");
        let rows: Vec<&str> = rendered.lines().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], "ACG");
        assert_eq!(rows[1], "||.");
        assert_eq!(rows[2], "ACC");
    }
}
