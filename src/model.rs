pub mod dom;
pub mod fixture;
