//! API client library for marquee.
//!
//! Provides a client for the OMDb movie and series catalog.

/// OMDb API client.
pub mod omdb;
