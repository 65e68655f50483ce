pub mod errors;
pub mod aligner;
pub mod io;

/// Edge length of one DP tile, fixed at build time. Tiles on the same
/// anti-diagonal of the tile grid are independent and form one parallel batch.
pub const BLOCK_SIZE: usize = 16;
