//! Integration-test crate for the wgslc front end.
//!
//! The crate body is empty; the end-to-end scenarios live under `tests/`,
//! each file one theme: whole-shader parsing, entry-point gathering, dump
//! goldens and round-trips, and error reporting.
