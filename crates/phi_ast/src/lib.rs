pub mod display;
pub mod eq;
pub mod ordering;
pub mod term;
pub mod traversal;

pub use eq::{canonical, equal};
pub use term::{Attribute, Binding, Bytes, MetaId, Program, Term};
pub use traversal::{depth, size};
