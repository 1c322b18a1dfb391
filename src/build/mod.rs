pub mod directive;
pub mod orchestrator;

pub use directive::BuildDirective;
pub use orchestrator::Orchestrator;
