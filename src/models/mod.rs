pub mod github;
pub mod go;
pub mod slack;
