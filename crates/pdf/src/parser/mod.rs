pub mod backend;
pub mod elements;
pub mod spans;
