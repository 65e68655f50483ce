use std::io::Read;

use serde::{Deserialize, Serialize};

use crate::errors::WavealignError;

/// The 24-symbol amino acid alphabet indexing the rows and columns of BLOSUM62.
pub const AA_ALPHABET: &str = "ARNDCQEGHILKMFPSTWYVBZX*";

/// BLOSUM62 amino acid substitution scores, indexed by [`AA_ALPHABET`].
const BLOSUM62: [[i32; 24]; 24] = [
    [4, -1, -2, -2, 0, -1, -1, 0, -2, -1, -1, -1, -1, -2, -1, 1, 0, -3, -2, 0, -2, -1, 0, -4],
    [-1, 5, 0, -2, -3, 1, 0, -2, 0, -3, -2, 2, -1, -3, -2, -1, -1, -3, -2, -3, -1, 0, -1, -4],
    [-2, 0, 6, 1, -3, 0, 0, 0, 1, -3, -3, 0, -2, -3, -2, 1, 0, -4, -2, -3, 3, 0, -1, -4],
    [-2, -2, 1, 6, -3, 0, 2, -1, -1, -3, -4, -1, -3, -3, -1, 0, -1, -4, -3, -3, 4, 1, -1, -4],
    [0, -3, -3, -3, 9, -3, -4, -3, -3, -1, -1, -3, -1, -2, -3, -1, -1, -2, -2, -1, -3, -3, -2, -4],
    [-1, 1, 0, 0, -3, 5, 2, -2, 0, -3, -2, 1, 0, -3, -1, 0, -1, -2, -1, -2, 0, 3, -1, -4],
    [-1, 0, 0, 2, -4, 2, 5, -2, 0, -3, -3, 1, -2, -3, -1, 0, -1, -3, -2, -2, 1, 4, -1, -4],
    [0, -2, 0, -1, -3, -2, -2, 6, -2, -4, -4, -2, -3, -3, -2, 0, -2, -2, -3, -3, -1, -2, -1, -4],
    [-2, 0, 1, -1, -3, 0, 0, -2, 8, -3, -3, -1, -2, -1, -2, -1, -2, -2, 2, -3, 0, 0, -1, -4],
    [-1, -3, -3, -3, -1, -3, -3, -4, -3, 4, 2, -3, 1, 0, -3, -2, -1, -3, -1, 3, -3, -3, -1, -4],
    [-1, -2, -3, -4, -1, -2, -3, -4, -3, 2, 4, -2, 2, 0, -3, -2, -1, -2, -1, 1, -4, -3, -1, -4],
    [-1, 2, 0, -1, -3, 1, 1, -2, -1, -3, -2, 5, -1, -3, -1, 0, -1, -3, -2, -2, 0, 1, -1, -4],
    [-1, -1, -2, -3, -1, 0, -2, -3, -2, 1, 2, -1, 5, 0, -2, -1, -1, -1, -1, 1, -3, -1, -1, -4],
    [-2, -3, -3, -3, -2, -3, -3, -3, -1, 0, 0, -3, 0, 6, -4, -2, -2, 1, 3, -1, -3, -3, -1, -4],
    [-1, -2, -2, -1, -3, -1, -1, -2, -2, -3, -3, -1, -2, -4, 7, -1, -1, -4, -3, -2, -2, -1, -2, -4],
    [1, -1, 1, 0, -1, 0, 0, 0, -1, -2, -2, 0, -1, -2, -1, 4, 1, -3, -2, -2, 0, 0, 0, -4],
    [0, -1, 0, -1, -1, -1, -1, -2, -2, -1, -1, -1, -1, -2, -1, 1, 5, -2, -2, 0, -1, -1, 0, -4],
    [-3, -3, -4, -4, -2, -2, -3, -2, -2, -3, -2, -3, -1, 1, -4, -3, -2, 11, 2, -3, -4, -3, -2, -4],
    [-2, -2, -2, -3, -2, -1, -2, -3, 2, -1, -1, -2, -1, 3, -3, -2, -2, 2, 7, -1, -3, -2, -1, -4],
    [0, -3, -3, -3, -1, -2, -2, -3, -3, 3, 1, -2, 1, -1, -2, -2, 0, -3, -1, 4, -3, -2, -1, -4],
    [-2, -1, 3, 4, -3, 0, 1, -1, 0, -3, -4, 0, -3, -3, -2, 0, -1, -4, -3, -3, 4, 1, -1, -4],
    [-1, 0, 0, 1, -3, 3, 4, -2, 0, -3, -3, 1, -1, -3, -1, 0, -1, -3, -2, -2, 1, 4, -1, -4],
    [0, -1, -1, -1, -2, -1, -1, -1, -1, -1, -1, -1, -1, -1, -2, 0, 0, -2, -1, -1, -1, -1, -1, -4],
    [-4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, -4, 1],
];

/// A fixed, symmetric substitution score table together with the alphabet
/// indexing it. Treated as immutable configuration: it is validated once when
/// constructed and only read afterwards.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SubstitutionTable {
    alphabet: String,
    scores: Vec<Vec<i32>>,
}

impl SubstitutionTable {
    /// The standard BLOSUM62 table over the 24-symbol amino acid alphabet.
    pub fn blosum62() -> Self {
        Self {
            alphabet: AA_ALPHABET.to_string(),
            scores: BLOSUM62.iter().map(|row| row.to_vec()).collect(),
        }
    }

    /// A uniform match/mismatch table over the given alphabet.
    pub fn uniform(alphabet: &str, match_score: i32, mismatch_score: i32) -> Self {
        let size = alphabet.len();
        let scores = (0..size)
            .map(|i| {
                (0..size)
                    .map(|j| if i == j { match_score } else { mismatch_score })
                    .collect()
            })
            .collect();

        Self {
            alphabet: alphabet.to_string(),
            scores,
        }
    }

    /// Load a table from its JSON representation, e.g.
    /// `{"alphabet": "ACGT", "scores": [[1, -1, ...], ...]}`.
    pub fn from_json(reader: impl Read) -> Result<Self, WavealignError> {
        let table: Self = serde_json::from_reader(reader)?;
        table.validate()?;

        Ok(table)
    }

    fn validate(&self) -> Result<(), WavealignError> {
        let size = self.alphabet.len();
        if size == 0 {
            return Err(WavealignError::InvalidTable("empty alphabet".to_string()));
        }

        if self.scores.len() != size || self.scores.iter().any(|row| row.len() != size) {
            return Err(WavealignError::InvalidTable(format!(
                "score matrix shape does not match the {size}-symbol alphabet"
            )));
        }

        for i in 0..size {
            for j in i + 1..size {
                if self.scores[i][j] != self.scores[j][i] {
                    return Err(WavealignError::InvalidTable(format!(
                        "scores[{i}][{j}] != scores[{j}][{i}]"
                    )));
                }
            }
        }

        Ok(())
    }

    /// Number of symbols in the alphabet.
    pub fn size(&self) -> usize {
        self.alphabet.len()
    }

    #[inline]
    pub fn score(&self, a: usize, b: usize) -> i32 {
        self.scores[a][b]
    }

    /// Largest absolute substitution score, used for score-width sanity checks.
    pub fn max_abs_score(&self) -> i32 {
        self.scores
            .iter()
            .flatten()
            .map(|v| v.abs())
            .max()
            .unwrap_or(0)
    }

    /// Translate a residue sequence into table indices. Residues are matched
    /// case-insensitively against the alphabet.
    pub fn encode(&self, seq: &[u8]) -> Result<Vec<usize>, WavealignError> {
        seq.iter()
            .map(|&symbol| {
                self.alphabet
                    .bytes()
                    .position(|s| s.eq_ignore_ascii_case(&symbol))
                    .ok_or(WavealignError::UnknownSymbol(char::from(symbol)))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::SubstitutionTable;

    #[test]
    fn test_blosum62_is_symmetric() {
        let table = SubstitutionTable::blosum62();
        assert_eq!(table.size(), 24);

        for i in 0..table.size() {
            for j in 0..table.size() {
                assert_eq!(table.score(i, j), table.score(j, i));
            }
        }
    }

    #[test]
    fn test_blosum62_known_entries() {
        let table = SubstitutionTable::blosum62();

        // A-A on the main diagonal, W-W is the table maximum
        assert_eq!(table.score(0, 0), 4);
        assert_eq!(table.score(17, 17), 11);
        assert_eq!(table.max_abs_score(), 11);
    }

    #[test]
    fn test_encode_is_case_insensitive() {
        let table = SubstitutionTable::blosum62();

        assert_eq!(table.encode(b"ARN").unwrap(), vec![0, 1, 2]);
        assert_eq!(table.encode(b"arn").unwrap(), vec![0, 1, 2]);
    }

    #[test]
    fn test_encode_rejects_unknown_symbol() {
        let table = SubstitutionTable::uniform("ACGT", 1, -1);
        assert!(table.encode(b"ACGU").is_err());
    }

    #[test]
    fn test_uniform_table() {
        let table = SubstitutionTable::uniform("ACGT", 1, -1);

        assert_eq!(table.score(0, 0), 1);
        assert_eq!(table.score(0, 3), -1);
        assert_eq!(table.max_abs_score(), 1);
    }

    #[test]
    fn test_from_json_rejects_asymmetric_table() {
        let json = r#"{"alphabet": "AC", "scores": [[1, -1], [-2, 1]]}"#;
        assert!(SubstitutionTable::from_json(json.as_bytes()).is_err());
    }

    #[test]
    fn test_from_json_rejects_bad_shape() {
        let json = r#"{"alphabet": "ACG", "scores": [[1, -1], [-1, 1]]}"#;
        assert!(SubstitutionTable::from_json(json.as_bytes()).is_err());
    }

    #[test]
    fn test_from_json_accepts_valid_table() {
        let json = r#"{"alphabet": "AC", "scores": [[1, -1], [-1, 1]]}"#;
        let table = SubstitutionTable::from_json(json.as_bytes()).unwrap();

        assert_eq!(table.size(), 2);
        assert_eq!(table.score(0, 1), -1);
    }
}
