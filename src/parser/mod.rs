pub mod parser;
pub mod tree;
pub mod types;

pub use parser::*;
pub use tree::*;
pub use types::*;
