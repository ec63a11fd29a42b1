#![deny(clippy::unwrap_used)]
#![allow(
    clippy::needless_for_each,
    clippy::cognitive_complexity,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod api_state;
mod routes;
mod server;
mod sweeper;

pub use routes::*;
pub use server::*;
pub use sweeper::*;
