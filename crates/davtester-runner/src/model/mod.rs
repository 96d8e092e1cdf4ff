mod node;
mod request;
mod suite;
mod test_file;

pub use node::{DELIBERATELY_IGNORED, NodeOutcome, NodeState, TestNode};
pub use request::{BodySpec, EtagMap, RequestOutcome, RequestSpec, VerifySpec};
pub use suite::TestSuite;
pub use test_file::TestFile;
