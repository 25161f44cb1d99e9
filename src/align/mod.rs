// Junction sequence alignment against the component database
//
// The search itself is delegated to an external aligner; this module owns
// the seam (`Aligner`) and the parsing of its tabular output.

pub mod blast;
pub mod hit;

pub use blast::BlastAligner;
pub use hit::{parse_tabular, AlignmentHit, SubjectStrand};

use crate::error::Error;

/// Aligns one junction sequence against the component database.
///
/// Hits are returned in the aligner's own order; the first relevant hit wins
/// downstream, so implementations must not reorder them.
pub trait Aligner: Sync {
    fn align(&self, query_name: &str, sequence: &str) -> Result<Vec<AlignmentHit>, Error>;
}
