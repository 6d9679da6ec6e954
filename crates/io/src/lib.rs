// Transcript file I/O

pub mod json;
