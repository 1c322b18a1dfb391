pub mod process;

pub use process::{ProcessOutput, ProcessRunner};
