//! Scoped privilege window for device access.
//!
//! Opening `/dev/input/event*` nodes and creating a uinput device normally
//! requires membership in the `input` group. The daemon is expected to run
//! setgid-`input` (or with the group already present): the window raises
//! the effective gid to `input` for exactly the duration of the setup
//! closure and restores the previous effective gid on every exit path,
//! including when the closure fails.
//!
//! No thread may be running while the window is open; gid changes are
//! process-wide.

use std::ffi::CString;
use std::io;

use thiserror::Error;
use tracing::{debug, info};

/// Error type for privilege transitions. All variants are setup-fatal.
#[derive(Debug, Error)]
pub enum PrivilegeError {
    /// The `input` group does not exist on this system.
    #[error("group {0:?} not found")]
    GroupNotFound(String),

    /// Switching the effective gid failed.
    #[error("failed to switch effective group to {gid}: {source}")]
    SwitchFailed {
        gid: u32,
        #[source]
        source: io::Error,
    },

    /// Restoring the original effective gid failed.
    #[error("failed to restore effective group {gid}: {source}")]
    RestoreFailed {
        gid: u32,
        #[source]
        source: io::Error,
    },
}

/// Name of the group that owns the input device nodes.
const INPUT_GROUP: &str = "input";

/// Looks up a group id by name.
fn group_id(name: &str) -> Result<libc::gid_t, PrivilegeError> {
    let c_name = CString::new(name).expect("group name contains no NUL");
    // getgrnam is not reentrant, but the window opens before any thread
    // is spawned.
    let grp = unsafe { libc::getgrnam(c_name.as_ptr()) };
    if grp.is_null() {
        return Err(PrivilegeError::GroupNotFound(name.to_string()));
    }
    Ok(unsafe { (*grp).gr_gid })
}

/// Restores the saved effective gid when the window closes.
struct GroupGuard {
    saved_gid: libc::gid_t,
    restored: bool,
}

impl GroupGuard {
    fn switch_to(gid: libc::gid_t) -> Result<Self, PrivilegeError> {
        let saved_gid = unsafe { libc::getegid() };
        if saved_gid == gid {
            // Already in the target group; nothing to restore later.
            debug!(gid, "already in input group; privilege window is a no-op");
            return Ok(Self {
                saved_gid,
                restored: true,
            });
        }
        if unsafe { libc::setegid(gid) } != 0 {
            return Err(PrivilegeError::SwitchFailed {
                gid,
                source: io::Error::last_os_error(),
            });
        }
        debug!(from = saved_gid, to = gid, "raised effective group");
        Ok(Self {
            saved_gid,
            restored: false,
        })
    }

    fn restore(&mut self) -> Result<(), PrivilegeError> {
        if self.restored {
            return Ok(());
        }
        if unsafe { libc::setegid(self.saved_gid) } != 0 {
            return Err(PrivilegeError::RestoreFailed {
                gid: self.saved_gid,
                source: io::Error::last_os_error(),
            });
        }
        self.restored = true;
        debug!(gid = self.saved_gid, "restored effective group");
        Ok(())
    }
}

impl Drop for GroupGuard {
    fn drop(&mut self) {
        // Error-path restore; the success path restores explicitly so the
        // failure can be reported.
        let _ = self.restore();
    }
}

/// Runs `f` with the effective gid raised to the `input` group.
///
/// The original effective gid is restored before this returns, whether `f`
/// succeeds or fails.
///
/// # Errors
///
/// Returns [`PrivilegeError`] when the group lookup, the switch, or the
/// restore fails; otherwise propagates `f`'s own result.
pub fn with_input_group<T, E>(f: impl FnOnce() -> Result<T, E>) -> Result<Result<T, E>, PrivilegeError> {
    let gid = group_id(INPUT_GROUP)?;
    let mut guard = GroupGuard::switch_to(gid)?;
    info!(group = INPUT_GROUP, "privilege window open");

    let result = f();

    guard.restore()?;
    info!(group = INPUT_GROUP, "privilege window closed");
    Ok(result)
}
