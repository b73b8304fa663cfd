//! OS-level inputs of the queries: environmental variables and the user identity database.

pub mod env;
pub mod identity;
