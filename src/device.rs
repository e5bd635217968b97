//! Device model and monitor-set selection.
//!
//! A `Device` is a transient view of one cloud-registered smart plug as of
//! the current cycle. The monitor set decides which of the registry's
//! devices get polled: either everything that reports electricity, or an
//! explicit list of names.

/// Reported connectivity of a device at the time the registry listed it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OnlineStatus {
    Online,
    Offline,
    Unknown,
}

impl std::fmt::Display for OnlineStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OnlineStatus::Online => write!(f, "online"),
            OnlineStatus::Offline => write!(f, "offline"),
            OnlineStatus::Unknown => write!(f, "unknown"),
        }
    }
}

/// One cloud-registered device as of the current cycle. Never persisted;
/// every cycle re-derives the list from the registry.
#[derive(Debug, Clone)]
pub struct Device {
    /// Stable device name, used as the time-series tag.
    pub name: String,
    pub online: OnlineStatus,
    /// Whether the device reports instantaneous electricity metrics.
    pub electricity: bool,
}

/// Which devices the operator wants polled. Built once at startup and
/// immutable for the process lifetime.
///
/// The `ALL` sentinel is an explicit variant rather than a string match,
/// so a device literally named "ALL-something" can never widen the set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MonitorSet {
    /// Poll every electricity-capable device.
    All,
    /// Poll only the named devices (case-sensitive exact match).
    Names(Vec<String>),
}

/// The configuration entry that selects every device.
pub const ALL_SENTINEL: &str = "ALL";

impl MonitorSet {
    /// Builds a monitor set from raw configuration entries.
    ///
    /// Entries are trimmed; empty entries are dropped. An entry equal to
    /// `ALL` makes the whole set the all-devices sentinel. Returns `None`
    /// when no usable entry remains, which the config validator treats as
    /// an error.
    pub fn parse(entries: &[String]) -> Option<MonitorSet> {
        let names: Vec<String> = entries
            .iter()
            .map(|e| e.trim())
            .filter(|e| !e.is_empty())
            .map(str::to_string)
            .collect();

        if names.is_empty() {
            return None;
        }
        if names.iter().any(|n| n == ALL_SENTINEL) {
            return Some(MonitorSet::All);
        }
        Some(MonitorSet::Names(names))
    }

    /// Whether a device name is a member of this set.
    pub fn matches(&self, name: &str) -> bool {
        match self {
            MonitorSet::All => true,
            MonitorSet::Names(names) => names.iter().any(|n| n == name),
        }
    }
}

impl std::fmt::Display for MonitorSet {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MonitorSet::All => write!(f, "ALL"),
            MonitorSet::Names(names) => write!(f, "{}", names.join(",")),
        }
    }
}

/// Resolves the monitor set against the live device list.
///
/// Only electricity-capable devices are eligible. Online status is not
/// consulted: an offline device still gets a refresh attempt and shows up
/// as a per-device failure instead of vanishing from the report. Input
/// ordering is preserved. Names in the monitor set with no matching
/// device are silently omitted. An empty result is a normal cycle
/// outcome, not an error.
pub fn select(all_devices: &[Device], monitor_set: &MonitorSet) -> Vec<Device> {
    all_devices
        .iter()
        .filter(|d| d.electricity && monitor_set.matches(&d.name))
        .cloned()
        .collect()
}
