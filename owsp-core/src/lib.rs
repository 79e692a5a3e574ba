#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![forbid(unsafe_code)]

pub mod entities;
pub mod framework;
pub mod mail;
pub mod processors;
pub mod store;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;
