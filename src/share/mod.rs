//! Sharing a calculation.
//!
//! A calculation input round-trips through a compact query string, so a
//! deep link recomputes the same result. The same module renders the
//! plain-text summary sent with the link.

mod link;
mod message;

pub use link::{decode_query, encode_query, share_link};
pub use message::share_message;
