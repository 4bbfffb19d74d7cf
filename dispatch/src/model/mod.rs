//! Operation model
//!
//! Tree-shaped management commands and the helpers that describe them for
//! diagnostics.

pub mod address;
pub mod operation;
pub mod token;

pub use address::ResourceAddress;
pub use operation::Operation;
pub use token::token;
