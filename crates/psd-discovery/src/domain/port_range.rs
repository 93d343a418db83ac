//! Port range scanned when a peer's diagnostics port is unknown.

use crate::domain::PortRangeError;
use std::fmt;
use std::str::FromStr;

/// Inclusive range of TCP ports, `1 <= start <= end <= 65535`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PortRange {
    start: u16,
    end: u16,
}

impl PortRange {
    /// Create a range, validating the bounds.
    pub fn new(start: u16, end: u16) -> Result<Self, PortRangeError> {
        if start == 0 {
            return Err(PortRangeError::OutOfBounds(0));
        }
        if start > end {
            return Err(PortRangeError::StartAfterEnd { start, end });
        }
        Ok(Self { start, end })
    }

    /// Build a range from bounds known at compile time.
    pub(crate) const fn from_static(start: u16, end: u16) -> Self {
        assert!(start != 0 && start <= end);
        Self { start, end }
    }

    pub fn start(&self) -> u16 {
        self.start
    }

    pub fn end(&self) -> u16 {
        self.end
    }

    /// Number of ports in the range.
    pub fn len(&self) -> usize {
        usize::from(self.end - self.start) + 1
    }

    /// Always false: a valid range holds at least one port.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Ports in ascending order.
    pub fn iter(&self) -> impl Iterator<Item = u16> {
        self.start..=self.end
    }

    /// True if `port` lies inside the range.
    pub fn contains(&self, port: u16) -> bool {
        (self.start..=self.end).contains(&port)
    }
}

impl FromStr for PortRange {
    type Err = PortRangeError;

    /// Parse a `start-end` string such as `9601-9621`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.trim().split('-').collect();
        if parts.len() != 2 {
            return Err(PortRangeError::InvalidFormat(s.to_string()));
        }

        let parse_bound = |raw: &str| -> Result<u16, PortRangeError> {
            let value: u32 = raw
                .trim()
                .parse()
                .map_err(|_| PortRangeError::InvalidNumber(raw.to_string()))?;
            match u16::try_from(value) {
                Ok(port) if port != 0 => Ok(port),
                _ => Err(PortRangeError::OutOfBounds(value)),
            }
        };

        Self::new(parse_bound(parts[0])?, parse_bound(parts[1])?)
    }
}

impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.start, self.end)
    }
}
