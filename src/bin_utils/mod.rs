//! Bootstrap pieces for the `tellerd` binary. They live in the library
//! rather than the binary so integration tests can drive the same code.

pub mod fixtures;
pub mod tcp;
