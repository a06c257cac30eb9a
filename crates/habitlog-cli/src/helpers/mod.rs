pub mod input;
pub mod parsing;
