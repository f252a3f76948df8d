use crate::container::{MetadataContainer, TagGroup};
use crate::error::AppError;
use crate::policy::{CorrectionPolicy, DeviceIdentity, SHIFT_HOURS};
use crate::timestamp::CapturedTimestamp;
use exif::{Rational, Value};

const MAKE: u16 = 0x010F;
const MODEL: u16 = 0x0110;
const DATE_TIME_ORIGINAL: u16 = 0x9003;
const DATE_TIME_DIGITIZED: u16 = 0x9004;
const GPS_TIME_STAMP: u16 = 0x0007;
const GPS_DATE_STAMP: u16 = 0x001D;

/// Applies `policy` to one image's metadata. The flag reports whether
/// anything was rewritten.
pub fn correct(
    mut container: MetadataContainer,
    policy: &CorrectionPolicy,
) -> Result<(MetadataContainer, bool), AppError> {
    let device = device_identity(&container)?;
    let mut original = read_timestamp(&container, DATE_TIME_ORIGINAL, "DateTimeOriginal")?;
    let mut digitized = read_timestamp(&container, DATE_TIME_DIGITIZED, "DateTimeDigitized")?;

    let decision = policy.decide(&device);
    log::debug!("Device {} under {}: {:?}", device, policy.name(), decision);
    if decision.is_noop() {
        return Ok((container, false));
    }
    let mut changed = false;

    if decision.apply_hour_shift {
        original = shift(original, SHIFT_HOURS, "DateTimeOriginal")?;
        digitized = shift(digitized, SHIFT_HOURS, "DateTimeDigitized")?;
        container.set_text(TagGroup::Capture, DATE_TIME_ORIGINAL, &original.format());
        container.set_text(TagGroup::Capture, DATE_TIME_DIGITIZED, &digitized.format());
        log::trace!("Shifted capture time to {} / {}", original, digitized);
        changed = true;
    }

    if let CorrectionPolicy::BulkShift {
        target_utc_offset_hours,
        gps_tolerance_seconds,
        ..
    } = policy
    {
        let to_reference = target_utc_offset_hours.checked_neg().ok_or_else(|| {
            AppError::format("target_utc_offset_hours", target_utc_offset_hours.to_string())
        })?;
        // Must see the shifted original, if a shift happened above.
        let expected = shift(original, to_reference, "GPSDateStamp")?;
        if !gps_matches(&container, expected, *gps_tolerance_seconds) {
            write_gps(&mut container, expected);
            log::trace!("Rewrote GPS date/time to {}", expected);
            changed = true;
        }
    }

    Ok((container, changed))
}

fn device_identity(container: &MetadataContainer) -> Result<DeviceIdentity, AppError> {
    let make = container
        .text(TagGroup::Image, MAKE)?
        .ok_or(AppError::MissingField("Make"))?;
    let model = container
        .text(TagGroup::Image, MODEL)?
        .ok_or(AppError::MissingField("Model"))?;
    Ok(DeviceIdentity::new(&make, &model))
}

fn read_timestamp(
    container: &MetadataContainer,
    number: u16,
    name: &'static str,
) -> Result<CapturedTimestamp, AppError> {
    let text = container
        .text(TagGroup::Capture, number)?
        .ok_or(AppError::MissingField(name))?;
    CapturedTimestamp::parse(&text).map_err(|_| AppError::format(name, text))
}

fn shift(
    ts: CapturedTimestamp,
    hours: i64,
    name: &'static str,
) -> Result<CapturedTimestamp, AppError> {
    ts.add_hours(hours)
        .ok_or_else(|| AppError::format(name, ts.format()))
}

/// True when both GPS fields decode and sit within `tolerance` seconds of
/// `expected`. Absent or undecodable fields never match.
fn gps_matches(
    container: &MetadataContainer,
    expected: CapturedTimestamp,
    tolerance: i64,
) -> bool {
    let date_text = match container.text(TagGroup::Gps, GPS_DATE_STAMP) {
        Ok(Some(text)) => text,
        Ok(None) => {
            log::trace!("GPS date stamp absent");
            return false;
        }
        Err(e) => {
            log::trace!("GPS date stamp unreadable: {}", e);
            return false;
        }
    };
    let Ok(date) = CapturedTimestamp::parse(&date_text) else {
        log::trace!("GPS date stamp malformed: {:?}", date_text);
        return false;
    };
    let Some([hour, minute, second]) = container.rationals(TagGroup::Gps, GPS_TIME_STAMP)
    else {
        log::trace!("GPS time stamp absent or not three rationals");
        return false;
    };
    // The time of day is read on the expected date.
    let Some(time) = expected.with_time_of_day(hour.num, minute.num, second.num) else {
        log::trace!("GPS time stamp out of range");
        return false;
    };

    let within = |actual: CapturedTimestamp| {
        CapturedTimestamp::difference_seconds(actual, expected).abs() <= tolerance
    };
    within(date) && within(time)
}

fn write_gps(container: &mut MetadataContainer, expected: CapturedTimestamp) {
    container.set_text(TagGroup::Gps, GPS_DATE_STAMP, &expected.format());
    let unit = |num| Rational { num, denom: 1 };
    container.set(
        TagGroup::Gps,
        GPS_TIME_STAMP,
        Value::Rational(vec![
            unit(expected.hour()),
            unit(expected.minute()),
            unit(expected.second()),
        ]),
    );
}
