//! Permission policy for the task history records.
//!
//! Task history rows are guarded collectively, not per row. Reading and
//! writing (cleanup) require the same scope:
//!
//! - advanced permissions enabled: the application monitoring capability;
//! - otherwise: the root capability `/` (superusers only).
//!
//! Capabilities are `/`-terminated paths. A held path covers every path it
//! is a prefix of, so `/` covers everything and `/application/` covers
//! `/application/monitoring/`.

use std::collections::BTreeSet;

/// Root (superuser) capability path.
pub const ROOT_PATH: &str = "/";

/// Application monitoring capability path.
pub const MONITORING_PATH: &str = "/application/monitoring/";

/// Role that always holds the root capability.
pub const ROLE_ADMIN: &str = "admin";

/// A set of capability paths held by an actor, or required by an operation.
pub type CapabilitySet = BTreeSet<String>;

/// What the caller intends to do with the task history records.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Read,
    Write,
}

/// Capability paths required to touch task history records.
///
/// Pure function of the advanced-permissions feature flag.
pub fn permission_scope(advanced_permissions: bool) -> CapabilitySet {
    let path = if advanced_permissions {
        MONITORING_PATH
    } else {
        ROOT_PATH
    };
    BTreeSet::from([path.to_string()])
}

/// Scope required for `operation`. Read and write share one scope.
pub fn required_scope(_operation: Operation, advanced_permissions: bool) -> CapabilitySet {
    permission_scope(advanced_permissions)
}

/// Whether a single held path grants a single required path.
fn path_covers(held: &str, required: &str) -> bool {
    if held.ends_with('/') {
        required.starts_with(held)
    } else {
        held == required
    }
}

/// Whether `held` covers every path in `required`.
pub fn covers(held: &CapabilitySet, required: &CapabilitySet) -> bool {
    required
        .iter()
        .all(|req| held.iter().any(|h| path_covers(h, req)))
}

/// Decide whether an actor holding `held` may perform `operation`.
pub fn is_allowed(held: &CapabilitySet, operation: Operation, advanced_permissions: bool) -> bool {
    covers(held, &required_scope(operation, advanced_permissions))
}

pub fn can_read(held: &CapabilitySet, advanced_permissions: bool) -> bool {
    is_allowed(held, Operation::Read, advanced_permissions)
}

pub fn can_write(held: &CapabilitySet, advanced_permissions: bool) -> bool {
    is_allowed(held, Operation::Write, advanced_permissions)
}

/// Resolve the capability set of an actor from its role and explicitly
/// granted paths. Admins always hold [`ROOT_PATH`].
pub fn capabilities_for(role: &str, granted: &[String]) -> CapabilitySet {
    let mut caps: CapabilitySet = granted.iter().cloned().collect();
    if role == ROLE_ADMIN {
        caps.insert(ROOT_PATH.to_string());
    }
    caps
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
