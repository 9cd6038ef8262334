pub mod aig;
mod optimize;
pub mod rewrite;
pub mod sim;

// Re-exporting symbols and modules.
pub use aig::dfs;
pub use aig::stats::{self, Stats};
pub use aig::{Aig, AigError, AigNode, Lit, NodeId, ParserError, Result};
pub use rewrite::{REWRITE_ROUNDS, RewriteOptions};
pub use sim::MAX_EXHAUSTIVE_INPUTS;
