//! Timestamp rendering and date facility resolution
//!
//! Timestamp templates use the GNU `date` dialect: on top of the usual
//! strftime directives it understands `%N` / `%3N` (fractional seconds) and
//! `%:z` / `%::z` / `%:::z` (colon-separated UTC offsets). Which dialect a
//! logger honors is decided once, from the host platform, when the
//! [`DateFacility`] is resolved.

use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use std::fmt::{self, Write as _};

/// Default template: milliseconds plus a colon-separated UTC offset
pub const DEFAULT_TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S.%3N%:z";

/// Default timezone name
pub const DEFAULT_TIMEZONE: &str = "UTC";

/// Host classification used to pick a date dialect
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostPlatform {
    /// GNU userland (Linux, Android)
    Gnu,
    /// BSD userland; `gnu_date` is set when a GNU `gdate` is installed
    Bsd { gnu_date: bool },
    /// Anything else
    Unknown { os: String },
}

impl HostPlatform {
    /// Classify the platform this process runs on
    pub fn detect() -> Self {
        match Self::from_os(std::env::consts::OS) {
            HostPlatform::Bsd { .. } => HostPlatform::Bsd {
                gnu_date: Self::has_gnu_date(),
            },
            other => other,
        }
    }

    /// Classify an OS name as reported by `std::env::consts::OS`
    pub fn from_os(os: &str) -> Self {
        match os {
            "linux" | "android" => HostPlatform::Gnu,
            "macos" | "ios" | "freebsd" | "openbsd" | "netbsd" | "dragonfly" => {
                HostPlatform::Bsd { gnu_date: false }
            }
            other => HostPlatform::Unknown {
                os: other.to_string(),
            },
        }
    }

    /// Whether a GNU `gdate` executable is reachable through `PATH`
    pub fn has_gnu_date() -> bool {
        std::env::var_os("PATH")
            .map(|paths| std::env::split_paths(&paths).any(|dir| dir.join("gdate").is_file()))
            .unwrap_or(false)
    }
}

/// Directive dialect a facility renders
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dialect {
    /// GNU `date`: fractional seconds and colon offsets are available
    Gnu,
    /// Plain strftime: GNU-only directives are emitted literally
    Posix,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Strftime(String),
    Fraction(usize),
    Offset(u8),
}

/// Resolved timestamp renderer, computed once per logger
#[derive(Debug, Clone)]
pub struct DateFacility {
    format: String,
    dialect: Option<Dialect>,
    segments: Vec<Segment>,
    fully_supported: bool,
}

impl DateFacility {
    /// Resolve the facility for this host
    pub fn resolve(format: &str) -> Self {
        Self::resolve_for(format, &HostPlatform::detect())
    }

    /// Resolve the facility for an explicit host classification
    ///
    /// BSD hosts without `gdate` are probed; a failing probe is reported on
    /// stderr but logging continues with the plain dialect.
    pub fn resolve_for(format: &str, host: &HostPlatform) -> Self {
        match host {
            HostPlatform::Gnu | HostPlatform::Bsd { gnu_date: true } => {
                Self::with_dialect(format, Dialect::Gnu)
            }
            HostPlatform::Bsd { gnu_date: false } => {
                let facility = Self::with_dialect(format, Dialect::Posix);
                if !facility.probe() {
                    eprintln!(
                        "[LOGGER ERROR] Timestamp format '{}' is not supported by the system \
                         date facility (GNU-only extensions?)",
                        format
                    );
                }
                facility
            }
            HostPlatform::Unknown { os } => {
                eprintln!(
                    "[LOGGER ERROR] Unsupported platform '{}' for timestamp resolution",
                    os
                );
                Self::unresolved(format)
            }
        }
    }

    /// Build a facility for a fixed dialect, skipping host detection
    pub fn with_dialect(format: &str, dialect: Dialect) -> Self {
        let (segments, fully_supported) = parse_template(format, dialect);
        Self {
            format: format.to_string(),
            dialect: Some(dialect),
            segments,
            fully_supported,
        }
    }

    /// A facility that renders every timestamp as an empty string
    pub fn unresolved(format: &str) -> Self {
        Self {
            format: format.to_string(),
            dialect: None,
            segments: Vec::new(),
            fully_supported: false,
        }
    }

    #[must_use]
    pub fn dialect(&self) -> Option<Dialect> {
        self.dialect
    }

    #[must_use]
    pub fn format_str(&self) -> &str {
        &self.format
    }

    /// Render the template once and check it yields a numeric-looking timestamp
    pub fn probe(&self) -> bool {
        if self.dialect.is_none() || !self.fully_supported {
            return false;
        }
        let sample = self.render(&Utc::now());
        !sample.is_empty() && sample.chars().any(|c| c.is_ascii_digit())
    }

    /// Render the current time in `tz`
    pub fn now(&self, tz: &Tz) -> String {
        self.render(&Utc::now().with_timezone(tz))
    }

    /// Render an arbitrary instant
    pub fn render<Z: TimeZone>(&self, datetime: &DateTime<Z>) -> String
    where
        Z::Offset: fmt::Display,
    {
        let mut out = String::with_capacity(self.format.len() + 16);
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Strftime(directive) => {
                    // Directives are validated at parse time; a failure here
                    // just leaves the segment out.
                    let _ = write!(out, "{}", datetime.format(directive));
                }
                Segment::Fraction(digits) => {
                    let nanos = datetime.timestamp_subsec_nanos().min(999_999_999);
                    let padded = format!("{:09}", nanos);
                    out.push_str(&padded[..*digits]);
                }
                Segment::Offset(colons) => {
                    let seconds = datetime.offset().fix().local_minus_utc();
                    push_offset(&mut out, seconds, *colons);
                }
            }
        }
        out
    }
}

/// Parse a timezone name, falling back to UTC with a warning
pub fn parse_timezone(name: &str) -> Tz {
    match name.parse::<Tz>() {
        Ok(tz) => tz,
        Err(_) => {
            eprintln!(
                "[LOGGER WARNING] Unknown timezone '{}', falling back to UTC",
                name
            );
            Tz::UTC
        }
    }
}

fn push_offset(out: &mut String, seconds: i32, colons: u8) {
    let sign = if seconds < 0 { '-' } else { '+' };
    let total = seconds.unsigned_abs();
    let (hours, minutes, secs) = (total / 3600, (total / 60) % 60, total % 60);

    let _ = match colons {
        1 => write!(out, "{}{:02}:{:02}", sign, hours, minutes),
        2 => write!(out, "{}{:02}:{:02}:{:02}", sign, hours, minutes, secs),
        _ => {
            let _ = write!(out, "{}{:02}", sign, hours);
            if minutes != 0 || secs != 0 {
                let _ = write!(out, ":{:02}", minutes);
            }
            if secs != 0 {
                let _ = write!(out, ":{:02}", secs);
            }
            Ok(())
        }
    };
}

fn chrono_accepts(directive: &str) -> bool {
    !StrftimeItems::new(directive).any(|item| matches!(item, Item::Error))
}

/// Split a template into renderable segments
///
/// Returns the segments and whether every directive could be honored.
fn parse_template(format: &str, dialect: Dialect) -> (Vec<Segment>, bool) {
    let mut segments = Vec::new();
    let mut literal = String::new();
    let mut supported = true;
    let mut chars = format.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '%' {
            literal.push(c);
            continue;
        }

        if chars.peek() == Some(&'%') {
            chars.next();
            literal.push('%');
            continue;
        }

        let mut raw = String::from('%');
        let mut flag = None;
        if let Some(&f) = chars.peek() {
            if "-_0^#".contains(f) {
                flag = Some(f);
                raw.push(f);
                chars.next();
            }
        }
        let mut width = String::new();
        while let Some(&d) = chars.peek() {
            if !d.is_ascii_digit() {
                break;
            }
            width.push(d);
            raw.push(d);
            chars.next();
        }
        let mut colons = 0u8;
        while chars.peek() == Some(&':') {
            colons += 1;
            raw.push(':');
            chars.next();
        }
        let Some(conversion) = chars.next() else {
            literal.push_str(&raw);
            supported = false;
            break;
        };
        raw.push(conversion);

        let segment = match (conversion, dialect) {
            ('N', Dialect::Gnu) if colons == 0 => {
                let digits = width.parse::<usize>().unwrap_or(9).clamp(1, 9);
                Some(Segment::Fraction(digits))
            }
            ('z', Dialect::Gnu) if (1..=3).contains(&colons) && flag.is_none() => {
                Some(Segment::Offset(colons))
            }
            ('N', Dialect::Posix) => None,
            ('z', Dialect::Posix) if colons > 0 => None,
            _ if width.is_empty() && colons == 0 && chrono_accepts(&raw) => {
                Some(Segment::Strftime(raw.clone()))
            }
            _ => None,
        };

        match segment {
            Some(segment) => {
                if !literal.is_empty() {
                    segments.push(Segment::Literal(std::mem::take(&mut literal)));
                }
                segments.push(segment);
            }
            None => {
                supported = false;
                literal.push_str(&raw);
            }
        }
    }

    if !literal.is_empty() {
        segments.push(Segment::Literal(literal));
    }
    (segments, supported)
}
