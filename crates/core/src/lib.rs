//! Pure building blocks for the cachext Redis client.
//!
//! Nothing in this crate performs I/O. Key namespacing, glob patterns, value
//! codecs, command options and the server-side bulk-operation scripts live here
//! so they can be tested without a running store.

pub mod cache;
