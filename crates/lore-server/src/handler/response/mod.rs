//! Response types for HTTP handlers.

mod checkout;
mod errors;
mod gallery;
mod lore;
mod monitors;

pub use checkout::*;
pub use errors::*;
pub use gallery::*;
pub use lore::*;
pub use monitors::*;
