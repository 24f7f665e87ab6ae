//! Package installation and post-install verification.

pub mod installer;
pub mod verify;

pub use installer::install;
pub use verify::{VerifiedPackage, VerifyReport};
