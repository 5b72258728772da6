pub mod errors;
pub mod pagination;
pub mod sorting;

pub use errors::*;
pub use pagination::*;
pub use sorting::*;
