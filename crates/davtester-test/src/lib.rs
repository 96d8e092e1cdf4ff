//! DAV conformance harness - integration test support.
//!
//! Re-exports the workspace crates so integration tests can use
//! `davtester_test::` paths, and provides an in-memory DAV server plus a
//! [`Transport`](davtester_runner::transport::Transport) that reaches it
//! without opening a socket.

pub mod fake_dav;
pub mod salvo_transport;

pub mod component {
    pub use davtester_core::*;

    pub mod rfc {
        pub use davtester_rfc::rfc::*;
    }

    pub mod verify {
        pub use davtester_verify::*;
    }

    pub mod runner {
        pub use davtester_runner::*;
    }
}
