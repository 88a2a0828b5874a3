//! Core domain types for tracefifo
//!
//! Source configuration is built once at startup and passed by reference into
//! the acquisition loop; nothing here is mutated after that point.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use super::errors::ConfigError;

/// Number of logical trace channels addressable by `-c` specs.
pub const NUM_CHANNELS: u8 = 32;

/// Bytes requested per read. Shared with the downstream decoder's framing
/// expectations, so it is a constant rather than a tunable.
pub const TRANSFER_SIZE: usize = 65536 * 4;

/// Default trace server host.
pub const DEFAULT_SERVER: &str = "localhost";

/// Default trace server port.
pub const DEFAULT_SERVER_PORT: u16 = 3443;

/// Which kind of byte-stream origin is active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Network,
    File,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SourceKind::Network => write!(f, "network"),
            SourceKind::File => write!(f, "file"),
        }
    }
}

/// The single active byte-stream origin. Exactly one target exists per
/// process; `terminate_on_exhaustion` is only meaningful for files.
#[derive(Debug, Clone)]
pub enum SourceTarget {
    Network { server: String, port: u16 },
    File { path: PathBuf, terminate_on_exhaustion: bool },
}

impl SourceTarget {
    #[must_use]
    pub fn kind(&self) -> SourceKind {
        match self {
            SourceTarget::Network { .. } => SourceKind::Network,
            SourceTarget::File { .. } => SourceKind::File,
        }
    }
}

/// Immutable run configuration for the acquisition loop.
#[derive(Debug, Clone)]
pub struct SourceConfig {
    pub target: SourceTarget,
    /// Upper bound on bytes delivered by a single read.
    pub chunk_size: usize,
}

/// Index of a logical trace channel, always below [`NUM_CHANNELS`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct ChannelId(pub u8);

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One `-c <index>,<name>[,<format>]` channel spec.
///
/// The channel subsystem consumes these; this crate only parses and validates
/// them. An omitted format means raw pass-through.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelSpec {
    pub id: ChannelId,
    pub name: String,
    pub format: Option<String>,
}

impl FromStr for ChannelSpec {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut parts = s.splitn(3, ',');

        let index_str = parts.next().unwrap_or_default();
        let index: u32 = index_str
            .parse()
            .map_err(|_| ConfigError::BadChannelIndex(s.to_string()))?;
        if index >= u32::from(NUM_CHANNELS) {
            return Err(ConfigError::ChannelIndexOutOfRange { index, max: NUM_CHANNELS });
        }
        #[allow(clippy::cast_possible_truncation)]
        let id = ChannelId(index as u8);

        let name = match parts.next() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => return Err(ConfigError::MissingChannelName(id)),
        };

        let format = parts.next().filter(|fmt| !fmt.is_empty()).map(unescape);

        Ok(ChannelSpec { id, name, format })
    }
}

/// Expand C-style backslash escapes in a channel format string.
///
/// Handles the common single-character escapes plus `\xHH`; an unrecognised
/// escape is passed through with the backslash dropped.
#[must_use]
pub fn unescape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut chars = s.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => out.push('\n'),
            Some('t') => out.push('\t'),
            Some('r') => out.push('\r'),
            Some('a') => out.push('\x07'),
            Some('b') => out.push('\x08'),
            Some('f') => out.push('\x0c'),
            Some('v') => out.push('\x0b'),
            Some('e') => out.push('\x1b'),
            Some('0') => out.push('\0'),
            Some('\\') => out.push('\\'),
            Some('x') => {
                let hex: String = chars.clone().take(2).collect();
                if hex.len() == 2 {
                    if let Ok(value) = u8::from_str_radix(&hex, 16) {
                        out.push(char::from(value));
                        chars.next();
                        chars.next();
                        continue;
                    }
                }
                out.push('x');
            }
            Some(other) => out.push(other),
            None => out.push('\\'),
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_channel_spec_with_format() {
        let spec: ChannelSpec = "1,swo,%c".parse().unwrap();
        assert_eq!(spec.id, ChannelId(1));
        assert_eq!(spec.name, "swo");
        assert_eq!(spec.format.as_deref(), Some("%c"));
    }

    #[test]
    fn test_channel_spec_without_format_is_raw() {
        let spec: ChannelSpec = "0,console".parse().unwrap();
        assert_eq!(spec.id, ChannelId(0));
        assert_eq!(spec.name, "console");
        assert!(spec.format.is_none());
    }

    #[test]
    fn test_channel_spec_format_escapes_expanded() {
        let spec: ChannelSpec = r"2,log,%02x\n".parse().unwrap();
        assert_eq!(spec.format.as_deref(), Some("%02x\n"));
    }

    #[test]
    fn test_channel_index_out_of_range() {
        let err = "32,too-high".parse::<ChannelSpec>().unwrap_err();
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_channel_index_not_numeric() {
        assert!("abc,name".parse::<ChannelSpec>().is_err());
    }

    #[test]
    fn test_channel_name_missing() {
        let err = "3".parse::<ChannelSpec>().unwrap_err();
        assert!(err.to_string().contains("no name"));
        assert!("3,".parse::<ChannelSpec>().is_err());
    }

    #[test]
    fn test_unescape_common_escapes() {
        assert_eq!(unescape(r"a\tb\nc"), "a\tb\nc");
        assert_eq!(unescape(r"\\x"), "\\x");
        assert_eq!(unescape(r"\x41\x20ok"), "A ok");
    }

    #[test]
    fn test_unescape_passthrough() {
        assert_eq!(unescape("plain %d text"), "plain %d text");
        // Unknown escape drops the backslash, trailing backslash survives
        assert_eq!(unescape(r"\q"), "q");
        assert_eq!(unescape("tail\\"), "tail\\");
    }
}
