//! Running-application lookup via `NSRunningApplication`
//!
//! No permissions are required. The lookup reads the workspace process
//! table, so it may run on any thread and never touches the event loop.

use objc2::rc::Retained;
use objc2_app_kit::NSRunningApplication;
use objc2_foundation::{NSString, NSURL};
use urlbridge_core::ProcessLookup;
use urlbridge_domain::ApplicationInfo;

/// [`ProcessLookup`] backed by `+[NSRunningApplication runningApplicationWithProcessIdentifier:]`
#[derive(Debug, Clone, Copy, Default)]
pub struct RunningApplicationLookup;

impl RunningApplicationLookup {
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl ProcessLookup for RunningApplicationLookup {
    fn lookup_process(&self, pid: i32) -> ApplicationInfo {
        // SAFETY: a read-only class method that accepts any pid and returns
        // nil when no application owns it.
        #[allow(unused_unsafe)]
        let app = unsafe { NSRunningApplication::runningApplicationWithProcessIdentifier(pid) };

        let Some(app) = app else {
            tracing::debug!(pid, found = false, "running application lookup");
            return ApplicationInfo::default();
        };

        // SAFETY: property getters on a live NSRunningApplication; each may
        // return nil, which maps to an empty field.
        #[allow(unused_unsafe)]
        let info = unsafe {
            ApplicationInfo {
                localized_name: ns_string(app.localizedName()),
                bundle_identifier: ns_string(app.bundleIdentifier()),
                bundle_url: url_string(app.bundleURL()),
                executable_url: url_string(app.executableURL()),
            }
        };

        tracing::debug!(
            pid,
            found = true,
            bundle_id = %info.bundle_identifier,
            "running application lookup"
        );
        info
    }
}

fn ns_string(value: Option<Retained<NSString>>) -> String {
    value.map(|s| s.to_string()).unwrap_or_default()
}

fn url_string(url: Option<Retained<NSURL>>) -> String {
    ns_string(url.and_then(|u| u.absoluteString()))
}
