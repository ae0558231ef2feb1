//! Auth-domain identifiers shared by the sign-in, callback, and loading flows.

pub mod id;

pub use id::*;
