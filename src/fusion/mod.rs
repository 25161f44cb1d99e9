// Fusion breakpoint location
//
// Translocations pair a 5' and a 3' partner gene with a junction sequence.
// Each partner is resolved independently from the junction's alignment hits:
// - pick the first hit on one of the gene's components
// - project it from the component frame onto the genome
// - choose the breakpoint end from the partner's role and strand

mod output;
mod resolve;
mod translocation;

pub use output::{report_lines, write_breakpoints, BreakpointTableWriter, TABLE_HEADER};
pub use resolve::{
    breakpoint_at_end, locate_breakpoints, resolve, select_hit, ComponentIndex, ResolvedAlignment,
};
pub use translocation::{read_translocations, JunctionRole, Partner, Translocation};
