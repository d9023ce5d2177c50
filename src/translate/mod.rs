pub mod chain;
pub mod interface;
pub mod languages;
pub mod prompt;

pub use chain::*;
pub use interface::*;
pub use languages::*;
