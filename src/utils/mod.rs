// Shared I/O and text helpers

pub mod encoding;
pub mod io;
