//! Host platform probing and install planning.
//!
//! [`probe`](probe::probe) derives an immutable [`HostProfile`](probe::HostProfile)
//! once per run; [`build_plan`](plan::build_plan) turns it into an
//! [`InstallPlan`](plan::InstallPlan) via a static lookup table with exactly
//! one row per OS family. Later stages consume these values instead of
//! re-detecting anything.

pub mod plan;
pub mod probe;

pub use plan::{build_plan, InstallPlan, PackageSpec, PACKAGES};
pub use probe::{probe, HostProfile, OsFamily, PrivilegeMode};
