//! Request types for HTTP handlers.

mod cache;
mod checkout;
mod fulfill;
mod generate;

pub use cache::*;
pub use checkout::*;
pub use fulfill::*;
pub use generate::*;
