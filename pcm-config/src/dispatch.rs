//! `pcmdai` tag handling.
//!
//! Only `<pcmdai>` elements carry device IDs. The first attribute names the
//! link and its value is the PCM device ID:
//!
//! ```xml
//! <pcmdai playback_link="0"/>
//! <pcmdai bluetooth_capture_link="3"/>
//! ```
//!
//! A use-case link sets both directions. The two capture links then refine
//! a single capture slot.

use tracing::{debug, warn};

use crate::config::NumericPolicy;
use crate::error::ConfigurationFault;
use crate::table::DeviceTable;
use crate::usecase::{capture_override, Direction, UseCase};

/// Element name of PCM DAI link declarations.
pub const PCMDAI_TAG: &str = "pcmdai";

/// Apply one start tag to `table`.
///
/// Elements other than `pcmdai`, and `pcmdai` elements whose first attribute
/// is not a known link, leave the table untouched.
pub fn apply_start_tag(
    table: &mut DeviceTable,
    name: &str,
    attributes: &[(String, String)],
    policy: NumericPolicy,
) -> Result<(), ConfigurationFault> {
    if name != PCMDAI_TAG {
        return Ok(());
    }

    let Some((link, value)) = attributes.first() else {
        debug!("ignoring {PCMDAI_TAG} without attributes");
        return Ok(());
    };

    if let Some(usecase) = UseCase::from_link_name(link) {
        let id = parse_device_id(link, value, policy)?;
        debug!(%usecase, "found {link} = {id}");
        table.set_both(usecase, id);
    }

    if let Some(usecase) = capture_override(link) {
        let id = parse_device_id(link, value, policy)?;
        debug!(%usecase, "found {link} id = {id}");
        table.set_device_id(usecase, Direction::Capture, id);
    }

    Ok(())
}

fn parse_device_id(link: &str, value: &str, policy: NumericPolicy) -> Result<i32, ConfigurationFault> {
    match (policy, parse_strict(value)) {
        (_, Some(id)) => Ok(id),
        (NumericPolicy::Lenient, None) => {
            let id = parse_lenient(value);
            warn!("{link} value {value:?} is not a plain integer, using {id}");
            Ok(id)
        }
        (NumericPolicy::Strict, None) => Err(ConfigurationFault::InvalidDeviceId {
            link: link.to_string(),
            value: value.to_string(),
        }),
    }
}

/// A complete decimal `i32`, surrounding whitespace allowed.
pub fn parse_strict(value: &str) -> Option<i32> {
    value.trim().parse().ok()
}

/// `atoi`-style parse.
///
/// Skips leading C whitespace, takes an optional sign and then as many digits
/// as follow. No digits reads as 0; out-of-range values saturate.
pub fn parse_lenient(value: &str) -> i32 {
    let rest = value.trim_start_matches(|c: char| matches!(c, ' ' | '\t' | '\n' | '\x0B' | '\x0C' | '\r'));
    let (negative, digits) = match rest.as_bytes().first() {
        Some(b'-') => (true, &rest[1..]),
        Some(b'+') => (false, &rest[1..]),
        _ => (false, rest),
    };

    let limit = i64::from(i32::MAX) + 1;
    let magnitude = digits
        .bytes()
        .take_while(u8::is_ascii_digit)
        .fold(0i64, |acc, digit| (acc * 10 + i64::from(digit - b'0')).min(limit));

    let signed = if negative { -magnitude } else { magnitude };
    signed.clamp(i64::from(i32::MIN), i64::from(i32::MAX)) as i32
}
