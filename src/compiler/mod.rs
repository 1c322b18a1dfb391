pub mod rustc;

pub use rustc::Rustc;
