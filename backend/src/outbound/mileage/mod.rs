//! Outbound adapter for the third-party directions API.

mod dto;
mod http_source;

pub use http_source::MileageHttpSource;
