pub mod analysis;
pub mod quote;
pub mod response;

pub use analysis::*;
pub use quote::*;
pub use response::*;
