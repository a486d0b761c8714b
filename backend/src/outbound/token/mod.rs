//! Access token codecs.

mod jwt;

pub use jwt::JwtTokenCodec;
