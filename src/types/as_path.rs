use std::str::FromStr;

use super::as_number::AsNumber;
use super::errors::ValueError;

//------------ AsPath --------------------------------------------------------

/// The AS path of a route.
///
/// Paths made up of plain AS numbers only are stored as a vector of
/// numbers. As soon as one hop is something else, e.g. an AS-set or a
/// confederation segment, the whole path is kept in its textual form,
/// hops separated by single spaces. In both cases `hop_count` is the
/// number of hops as counted by the decoder that produced the path.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum AsPath {
    Numeric(Vec<u32>),
    String { path: String, hop_count: usize },
    /// The path has been released.
    #[default]
    Unknown,
}

impl AsPath {
    pub fn numeric(hops: Vec<u32>) -> Self {
        AsPath::Numeric(hops)
    }

    /// A textual path. The hop count is taken as given, since segments in
    /// confederation notation may span several tokens.
    pub fn textual(path: String, hop_count: usize) -> Self {
        AsPath::String { path, hop_count }
    }

    pub fn hop_count(&self) -> usize {
        match self {
            AsPath::Numeric(hops) => hops.len(),
            AsPath::String { hop_count, .. } => *hop_count,
            AsPath::Unknown => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hop_count() == 0
    }

    pub fn numeric_hops(&self) -> Option<&[u32]> {
        match self {
            AsPath::Numeric(hops) => Some(hops),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            AsPath::String { path, .. } => Some(path),
            _ => None,
        }
    }

    /// The last hop of the path.
    ///
    /// For a textual path this is whatever follows the last space. An empty
    /// (or released) path has origin AS 0.
    pub fn origin_as(&self) -> AsNumber {
        if self.hop_count() == 0 {
            return AsNumber::Numeric(0);
        }
        match self {
            AsPath::Numeric(hops) => {
                AsNumber::Numeric(hops.last().copied().unwrap_or_default())
            }
            AsPath::String { path, .. } => AsNumber::String(
                path.rsplit(' ').next().unwrap_or_default().to_string(),
            ),
            AsPath::Unknown => AsNumber::Numeric(0),
        }
    }

    /// Drops the hops and marks the path `Unknown`. Releasing twice is a
    /// no-op.
    pub fn release(&mut self) {
        *self = AsPath::Unknown;
    }
}

impl std::fmt::Display for AsPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AsPath::Numeric(hops) => {
                let mut hops = hops.iter();
                if let Some(first) = hops.next() {
                    write!(f, "{}", first)?;
                }
                for hop in hops {
                    write!(f, " {}", hop)?;
                }
                Ok(())
            }
            AsPath::String { path, .. } => f.write_str(path),
            AsPath::Unknown => Ok(()),
        }
    }
}

impl From<Vec<u32>> for AsPath {
    fn from(value: Vec<u32>) -> Self {
        AsPath::Numeric(value)
    }
}

/// Parses a whitespace separated path. If every hop is a number the path
/// is numeric, otherwise it is kept as text, with one hop per token.
impl FromStr for AsPath {
    type Err = ValueError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let tokens: Vec<&str> = s.split_whitespace().collect();
        let numeric: Result<Vec<u32>, _> =
            tokens.iter().map(|t| u32::from_str(t)).collect();
        Ok(match numeric {
            Ok(hops) => AsPath::Numeric(hops),
            Err(_) => AsPath::String {
                path: tokens.join(" "),
                hop_count: tokens.len(),
            },
        })
    }
}
