//! Command implementations for svfind CLI

pub mod find;
