//! Listen-once flow
//!
//! The bridge pumps events on the calling (main) thread while a worker
//! thread waits for the first URL on the channel and then stops the bridge.

use std::io::Write;
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use serde::Serialize;
use urlbridge_core::{url_channel, AppCriteria, StopHandle, UrlEventReceiver, UrlEventSource};
use urlbridge_domain::{ApplicationInfo, UrlEvent};
use urlbridge_infra::NativeUrlBridge;

use crate::args::ProbeArgs;
use crate::context::ProbeContext;

const STARTUP_POLL: Duration = Duration::from_millis(10);

/// One received URL together with what is known about its sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UrlReport {
    /// URL text as delivered.
    pub url: String,
    /// Pid attached to the event, 0 when absent.
    pub sender_pid: i32,
    /// Lookup result for `sender_pid`; empty when the sender has exited.
    pub sender: ApplicationInfo,
    /// `None` when no criteria were given.
    pub matched: Option<bool>,
}

impl UrlReport {
    /// Combine an event with its sender and the criteria verdict.
    #[must_use]
    pub fn new(event: UrlEvent, sender: ApplicationInfo, criteria: &AppCriteria) -> Self {
        let matched = (!criteria.is_empty()).then(|| criteria.matches(&sender));
        Self { url: event.url, sender_pid: event.sender_pid, sender, matched }
    }
}

#[derive(Serialize)]
struct PidInfo<'a> {
    pid: i32,
    #[serde(flatten)]
    info: &'a ApplicationInfo,
}

/// Run the probe to completion.
///
/// # Errors
/// Bridge construction or start failures, a wait timeout, or output errors.
pub fn run(ctx: &ProbeContext, args: &ProbeArgs, out: &mut impl Write) -> anyhow::Result<UrlReport> {
    if let Some(pid) = args.pid {
        let info = ctx.lookup().lookup_process(pid);
        write_app_info(out, pid, &info, args.json)?;
    }

    let event = listen_once(ctx)?;
    let sender = ctx.lookup().lookup_process(event.sender_pid);
    let report = UrlReport::new(event, sender, &ctx.criteria);
    write_report(out, &report, args.json)?;
    Ok(report)
}

/// Start the bridge on this thread and return the first URL it delivers.
///
/// # Errors
/// Start failure, timeout, or a worker that could not run.
pub fn listen_once(ctx: &ProbeContext) -> anyhow::Result<UrlEvent> {
    let (sender, receiver) = url_channel();
    let mut bridge = NativeUrlBridge::new(sender.into_callback(), ctx.config.poll_interval())
        .context("failed to create URL bridge")?;

    let timeout = ctx.wait_timeout();
    let stop = bridge.stop_handle();
    let worker = thread::Builder::new()
        .name("urlbridge-probe-wait".to_string())
        .spawn(move || wait_then_stop(receiver, &stop, timeout))
        .context("failed to spawn wait thread")?;

    tracing::info!(timeout_ms = ctx.config.wait_timeout_ms, "waiting for a URL event");
    let started = bridge.start();
    // Drops the channel sender, so a worker still waiting sees a closed channel.
    drop(bridge);
    started.context("URL bridge failed")?;

    worker.join().map_err(|_| anyhow::anyhow!("wait thread panicked"))?
}

fn wait_then_stop(
    mut receiver: UrlEventReceiver,
    stop: &StopHandle,
    timeout: Duration,
) -> anyhow::Result<UrlEvent> {
    // Stop before start is a no-op, so wait for the loop to run. Startup
    // and the URL wait share one deadline.
    let deadline = Instant::now() + timeout;
    while !stop.is_running() && Instant::now() < deadline {
        thread::sleep(STARTUP_POLL);
    }

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_time()
        .build()
        .context("failed to build wait runtime")?;
    let remaining = deadline.saturating_duration_since(Instant::now());
    let received = runtime.block_on(receiver.wait_for_url(remaining));
    stop.stop();
    Ok(received?)
}

/// Print the application behind `pid`.
///
/// # Errors
/// Write or serialization failures.
pub fn write_app_info(
    out: &mut impl Write,
    pid: i32,
    info: &ApplicationInfo,
    json: bool,
) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, &PidInfo { pid, info })?;
        writeln!(out)?;
        return Ok(());
    }

    if info.is_empty() {
        writeln!(out, "pid {pid}: no running application")?;
    } else {
        writeln!(out, "pid {pid}:")?;
        write_info_lines(out, info)?;
    }
    Ok(())
}

/// Print a received URL report.
///
/// # Errors
/// Write or serialization failures.
pub fn write_report(out: &mut impl Write, report: &UrlReport, json: bool) -> anyhow::Result<()> {
    if json {
        serde_json::to_writer(&mut *out, report)?;
        writeln!(out)?;
        return Ok(());
    }

    writeln!(out, "url: {}", report.url)?;
    writeln!(out, "sender pid: {}", report.sender_pid)?;
    if report.sender.is_empty() {
        writeln!(out, "  (sender not found)")?;
    } else {
        write_info_lines(out, &report.sender)?;
    }
    match report.matched {
        Some(true) => writeln!(out, "criteria: matched")?,
        Some(false) => writeln!(out, "criteria: not matched")?,
        None => {}
    }
    Ok(())
}

fn write_info_lines(out: &mut impl Write, info: &ApplicationInfo) -> std::io::Result<()> {
    writeln!(out, "  name:       {}", info.localized_name)?;
    writeln!(out, "  bundle id:  {}", info.bundle_identifier)?;
    writeln!(out, "  bundle:     {}", info.bundle_url)?;
    writeln!(out, "  executable: {}", info.executable_url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn safari() -> ApplicationInfo {
        ApplicationInfo {
            localized_name: "Safari".to_string(),
            bundle_identifier: "com.apple.Safari".to_string(),
            bundle_url: "file:///Applications/Safari.app/".to_string(),
            executable_url: "file:///Applications/Safari.app/Contents/MacOS/Safari".to_string(),
        }
    }

    #[test]
    fn test_report_without_criteria_has_no_verdict() {
        let report =
            UrlReport::new(UrlEvent::new("myapp://x", 42), safari(), &AppCriteria::default());
        assert_eq!(report.matched, None);
        assert_eq!(report.url, "myapp://x");
        assert_eq!(report.sender_pid, 42);
    }

    #[test]
    fn test_report_verdict() {
        let criteria = AppCriteria::from_pairs(["bundle_id=com.apple.Safari"]).unwrap();
        let report = UrlReport::new(UrlEvent::new("myapp://x", 42), safari(), &criteria);
        assert_eq!(report.matched, Some(true));

        let criteria = AppCriteria::from_pairs(["display_name=Chrome"]).unwrap();
        let report = UrlReport::new(UrlEvent::new("myapp://x", 42), safari(), &criteria);
        assert_eq!(report.matched, Some(false));
    }

    #[test]
    fn test_write_app_info_miss() {
        let mut out = Vec::new();
        write_app_info(&mut out, 999_999, &ApplicationInfo::default(), false).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "pid 999999: no running application\n");
    }

    #[test]
    fn test_write_app_info_json_flattens() {
        let mut out = Vec::new();
        write_app_info(&mut out, 7, &safari(), true).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["pid"], 7);
        assert_eq!(value["bundle_identifier"], "com.apple.Safari");
    }

    #[test]
    fn test_wait_never_exceeds_configured_timeout() {
        use std::sync::Arc;

        use urlbridge_core::BridgeLifecycle;
        use urlbridge_domain::BridgeError;

        // The bridge never starts, so the whole window is spent waiting
        let (_sender, receiver) = url_channel();
        let stop = StopHandle::new(Arc::new(BridgeLifecycle::new()));
        let timeout = Duration::from_millis(300);

        let started = Instant::now();
        let err = wait_then_stop(receiver, &stop, timeout).unwrap_err();
        let elapsed = started.elapsed();

        assert!(matches!(err.downcast_ref::<BridgeError>(), Some(BridgeError::Timeout(_))));
        assert!(elapsed >= timeout);
        assert!(elapsed < timeout + Duration::from_millis(250), "took {elapsed:?}");
    }
}
