//! HTTP middleware.
//!
//! Only the access log runs as `from_fn` middleware; CORS and body
//! limits are tower layers applied in the router.

pub mod audit;
