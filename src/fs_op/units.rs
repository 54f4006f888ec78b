use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// Binary size units, each 1024 times the previous one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, Serialize)]
pub enum SizeUnit {
    #[default]
    B,
    KB,
    MB,
    GB,
    TB,
    PB,
    EB,
    ZB,
    YB,
}

impl SizeUnit {
    pub const ALL: [SizeUnit; 9] = [
        SizeUnit::B,
        SizeUnit::KB,
        SizeUnit::MB,
        SizeUnit::GB,
        SizeUnit::TB,
        SizeUnit::PB,
        SizeUnit::EB,
        SizeUnit::ZB,
        SizeUnit::YB,
    ];

    pub fn symbol(self) -> &'static str {
        match self {
            SizeUnit::B => "B",
            SizeUnit::KB => "KB",
            SizeUnit::MB => "MB",
            SizeUnit::GB => "GB",
            SizeUnit::TB => "TB",
            SizeUnit::PB => "PB",
            SizeUnit::EB => "EB",
            SizeUnit::ZB => "ZB",
            SizeUnit::YB => "YB",
        }
    }

    /// Position in [`SizeUnit::ALL`], i.e. the power of 1024.
    pub fn index(self) -> u32 {
        self as u32
    }

    /// Number of bytes in one of this unit.
    pub fn bytes(self) -> u128 {
        1u128 << (10 * self.index())
    }

    fn next(self) -> Option<SizeUnit> {
        SizeUnit::ALL.get(self.index() as usize + 1).copied()
    }
}

impl fmt::Display for SizeUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

impl FromStr for SizeUnit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        SizeUnit::ALL
            .into_iter()
            .find(|u| u.symbol() == upper)
            .ok_or_else(|| format!("unknown size unit `{s}`"))
    }
}

/// Format `size`, expressed in `unit`, for humans.
///
/// With `raw` the value is converted to bytes and printed as `"<bytes> B"`.
/// Otherwise it is scaled down by 1024 until it drops below 1024 (or the
/// units run out at YB) and printed with at most two decimals.
pub fn format_size(size: u64, unit: SizeUnit, raw: bool) -> String {
    if raw {
        return match u128::from(size).checked_mul(unit.bytes()) {
            Some(bytes) => format!("{} {}", bytes, SizeUnit::B),
            None => format!("{} {}", size as f64 * unit.bytes() as f64, SizeUnit::B),
        };
    }

    let mut value = size as f64 * unit.bytes() as f64;
    let mut current = SizeUnit::B;
    while value >= 1024.0 {
        match current.next() {
            Some(next) => {
                value /= 1024.0;
                current = next;
            }
            None => break,
        }
    }

    let rounded = (value * 100.0).round() / 100.0;
    format!("{} {}", rounded, current)
}
