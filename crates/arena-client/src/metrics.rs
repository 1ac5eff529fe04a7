//! Metrics for the Arena client.
//!
//! Uses the `metrics` crate for instrumentation and optionally exports
//! to Prometheus format.

use arena_protocol::MessageKind;
use metrics::counter;
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use tracing::info;

/// Metric names.
pub mod names {
    pub const FRAMES_TOTAL: &str = "arena_frames_total";
    pub const FRAMES_DROPPED: &str = "arena_frames_dropped_total";
    pub const COMMANDS_TOTAL: &str = "arena_commands_total";
    pub const COMMANDS_REJECTED: &str = "arena_commands_rejected_total";
    pub const DISCONNECTS_TOTAL: &str = "arena_disconnects_total";
    pub const LOOKUPS_TOTAL: &str = "arena_profile_lookups_total";
}

/// Describe all metrics.
pub fn init_metrics() {
    metrics::describe_counter!(names::FRAMES_TOTAL, "Inbound frames by message type");
    metrics::describe_counter!(names::FRAMES_DROPPED, "Inbound frames that failed to decode");
    metrics::describe_counter!(names::COMMANDS_TOTAL, "Commands sent by message type");
    metrics::describe_counter!(
        names::COMMANDS_REJECTED,
        "Commands not sent because a guard did not hold"
    );
    metrics::describe_counter!(names::DISCONNECTS_TOTAL, "Disconnects by reason");
    metrics::describe_counter!(names::LOOKUPS_TOTAL, "Profile lookups by outcome");
}

/// Start the Prometheus exporter.
///
/// # Errors
///
/// Returns an error if the exporter cannot be installed.
pub fn start_metrics_server(port: u16) -> Result<(), Box<dyn std::error::Error>> {
    let addr: SocketAddr = format!("127.0.0.1:{}", port).parse()?;

    PrometheusBuilder::new()
        .with_http_listener(addr)
        .install()?;

    info!("Metrics server listening on {}", addr);
    Ok(())
}

/// Record a routed inbound frame.
pub fn record_frame(kind: MessageKind) {
    counter!(names::FRAMES_TOTAL, "type" => kind.as_str()).increment(1);
}

/// Record a frame that failed to decode.
pub fn record_dropped() {
    counter!(names::FRAMES_DROPPED).increment(1);
}

/// Record a sent command.
pub fn record_command(kind: &'static str) {
    counter!(names::COMMANDS_TOTAL, "type" => kind).increment(1);
}

/// Record a command that was not sent.
pub fn record_rejected(intent: &'static str) {
    counter!(names::COMMANDS_REJECTED, "intent" => intent).increment(1);
}

/// Record a disconnect.
pub fn record_disconnect(reason: &'static str) {
    counter!(names::DISCONNECTS_TOTAL, "reason" => reason).increment(1);
}

/// Record a finished profile lookup.
pub fn record_lookup(ok: bool) {
    let outcome = if ok { "ok" } else { "error" };
    counter!(names::LOOKUPS_TOTAL, "outcome" => outcome).increment(1);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_recording_without_recorder() {
        // No recorder installed: every call is a no-op
        init_metrics();
        record_frame(MessageKind::Tournaments);
        record_dropped();
        record_command("subscribe");
        record_rejected("start");
        record_disconnect("invalid_token");
        record_lookup(false);
    }
}
