pub mod component;
pub mod shared;
