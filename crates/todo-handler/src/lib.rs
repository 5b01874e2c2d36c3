pub mod handlers;
pub mod responses;
pub mod router;

pub use router::{route, Operation};
