pub mod contracts;
pub mod symbols;
