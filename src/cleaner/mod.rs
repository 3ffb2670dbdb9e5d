pub mod remover;

pub use remover::{PathRemover, RemovalFailure, RemovalMode, RemovalReport};
