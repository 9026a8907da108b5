pub mod extract;
pub mod patterns;
pub mod transfer;
