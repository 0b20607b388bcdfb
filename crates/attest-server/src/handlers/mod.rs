//! HTTP request handlers

pub mod claims;
