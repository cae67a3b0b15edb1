use crate::constants::DEBUG_LOG_CAPACITY;
use std::collections::VecDeque;

/// Bounded on-screen diagnostics log. Oldest lines drop once full.
#[derive(Clone, Debug)]
pub struct DebugLog {
    lines: VecDeque<String>,
    capacity: usize,
}

impl Default for DebugLog {
    fn default() -> Self {
        Self::with_capacity(DEBUG_LOG_CAPACITY)
    }
}

impl DebugLog {
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            lines: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Append `msg` stamped with a wall-clock time given as seconds since
    /// local midnight.
    pub fn push(&mut self, seconds_of_day: u32, msg: impl AsRef<str>) {
        let msg = msg.as_ref();
        log::info!("{}", msg);
        self.lines
            .push_back(format!("[{}] {}", format_stamp(seconds_of_day), msg));
        while self.lines.len() > self.capacity {
            self.lines.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.lines.clear();
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.lines.iter().map(String::as_str)
    }

    /// Newline-joined text for the debug panel.
    pub fn render(&self) -> String {
        self.lines().collect::<Vec<_>>().join("\n")
    }
}

/// `HH:MM:SS`, wrapping at 24h.
pub fn format_stamp(seconds_of_day: u32) -> String {
    let s = seconds_of_day % 86_400;
    format!("{:02}:{:02}:{:02}", s / 3600, (s / 60) % 60, s % 60)
}
