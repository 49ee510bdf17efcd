pub mod identity;

pub mod target;
