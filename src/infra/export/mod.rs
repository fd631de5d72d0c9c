pub mod delimited;
pub mod file;
