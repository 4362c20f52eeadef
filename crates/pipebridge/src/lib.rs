//! Named-pipe client tools for LLM orchestrators.
//!
//! pipebridge lets an agent talk to local named-pipe servers: send a
//! message and read the reply, fire-and-forget writes, and namespace
//! queries. Every tool answers with a plain string.
//!
//! # Crate Structure
//!
//! - [`channel`]: Name resolution, one-shot pipe exchanges, namespace listing
//! - [`tools`]: String-returning tools and the JSON-RPC stdio server (behind `tools` feature)

/// Re-export channel types.
pub mod channel {
    pub use pipebridge_channel::*;
}

/// Re-export tool types (requires `tools` feature).
#[cfg(feature = "tools")]
pub mod tools {
    pub use pipebridge_tools::*;
}
