use std::fmt;

/// Values accepted when none are configured.
pub const DEFAULT_STATUSES: [&str; 3] = ["pending", "in-progress", "done"];

/// The fixed list of values a todo's `status` may take.
/// Membership is the only rule enforced; there are no transition rules between values.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusSet {
    values: Vec<String>,
}

impl StatusSet {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut set: Vec<String> = Vec::new();
        for value in values {
            let value = value.into().trim().to_string();
            if !value.is_empty() && !set.contains(&value) {
                set.push(value);
            }
        }
        StatusSet { values: set }
    }

    /// Parse a comma-separated list such as `pending,in-progress,done`.
    pub fn parse(list: &str) -> Self {
        Self::new(list.split(','))
    }

    pub fn contains(&self, status: &str) -> bool {
        self.values.iter().any(|s| s == status)
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn values(&self) -> &[String] {
        &self.values
    }
}

impl Default for StatusSet {
    fn default() -> Self {
        Self::new(DEFAULT_STATUSES)
    }
}

impl fmt::Display for StatusSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.values.join(", "))
    }
}
