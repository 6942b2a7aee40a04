pub mod errors;
pub mod grid;
pub mod predictor;
pub mod records;

pub use errors::*;
pub use grid::*;
pub use predictor::*;
pub use records::*;
