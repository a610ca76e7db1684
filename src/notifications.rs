/// Desktop notification support, best effort. macOS uses osascript,
/// Linux uses notify-send; anywhere else this is a no-op.
#[cfg(any(target_os = "macos", target_os = "linux"))]
use std::process::Command;

/// Announce a ringing alarm
pub fn notify_alarm(label: &str, time: &str) {
    let body = format!("{} - {}", label, time);
    send("Gridpad - Alarm", &body);
}

/// Announce a finished countdown
pub fn notify_timer_done() {
    send("Gridpad - Timer", "Countdown finished");
}

#[cfg(target_os = "macos")]
fn send(title: &str, body: &str) {
    let script = format!(
        r#"display notification "{}" with title "{}""#,
        body.replace('"', "\\\""),
        title.replace('"', "\\\"")
    );

    let _ = Command::new("osascript").arg("-e").arg(&script).output();
}

#[cfg(target_os = "linux")]
fn send(title: &str, body: &str) {
    let _ = Command::new("notify-send").arg(title).arg(body).output();
}

#[cfg(not(any(target_os = "macos", target_os = "linux")))]
fn send(_title: &str, _body: &str) {}
