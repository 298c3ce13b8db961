pub mod archives;
pub mod symbols;
