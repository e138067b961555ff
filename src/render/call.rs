//! Missed call notifications.

use super::non_empty;

/// Render a missed call.
pub fn render(caller: &str, callee: &str, comment: Option<&str>) -> String {
    let mut out = format!("Missed call from {caller} to @{callee}.");

    if let Some(comment) = non_empty(comment) {
        out.push_str("\n<<Comment>>\n");
        out.push_str(comment);
    }

    out
}
