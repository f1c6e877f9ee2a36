//! Test modules for footview-io
//!
//! Malformed-buffer coverage for the BMF decoder and path-based reading.
