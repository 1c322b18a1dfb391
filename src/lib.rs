/// cargo-lite - a dirt simple package manager for Rust crates
///
/// Given a package's source location, cargo-lite recursively fetches the
/// package and its declared dependencies, builds each one (either by
/// invoking rustc directly or by delegating to a package-supplied build
/// command), and accumulates the resulting library artifacts in a shared
/// lib directory that later builds link against.
///
/// Main modules:
/// - build: build orchestration and the delegated build-command protocol
/// - cli: command-line interface parsing and execution
/// - commands: implementation of the install and build commands
/// - compiler: thin wrapper around the system rustc
/// - package: manifests, package sources, fetching, and installation
/// - result: error handling and result types
/// - store: the durable repository store and artifact cache
/// - utils: external process helpers
pub mod build;
pub mod cli;
pub mod commands;
pub mod compiler;
pub mod package;
pub mod result;
pub mod store;
pub mod utils;
