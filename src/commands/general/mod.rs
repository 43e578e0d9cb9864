//! Bot-level commands that do not touch voice.

pub(crate) mod guilds;
pub(crate) mod info;
pub(crate) mod ping;
pub(crate) mod uptime;

use std::time::Duration;

/// Format an uptime as `Xd Xh Xm Xs`.
pub fn format_uptime(uptime: Duration) -> String {
    let secs = uptime.as_secs();
    let (days, rest) = (secs / 86_400, secs % 86_400);
    let (hours, rest) = (rest / 3_600, rest % 3_600);
    let (minutes, seconds) = (rest / 60, rest % 60);
    format!("{}d {}h {}m {}s", days, hours, minutes, seconds)
}
