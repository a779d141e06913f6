//! Helper functions for markup
//!
//! Everything interpolated into card or page markup from an untrusted source
//! goes through [`html_escape`].

mod html;

pub use html::*;
