use std::collections::HashSet;
use std::fmt;

/// Hours the affected cameras' clocks ran behind.
pub const SHIFT_HOURS: i64 = 1;
pub const DEFAULT_TARGET_UTC_OFFSET_HOURS: i64 = -7;
pub const DEFAULT_GPS_TOLERANCE_SECONDS: i64 = 120;

/// `"<make>/<model>"`, as matched against the configured device set.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DeviceIdentity(String);

impl DeviceIdentity {
    pub fn new(make: &str, model: &str) -> Self {
        DeviceIdentity(format!("{}/{}", make, model))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DeviceIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CorrectionDecision {
    pub apply_hour_shift: bool,
    /// Whether the GPS date/time must be checked against the capture time.
    pub reconcile_gps: bool,
}

impl CorrectionDecision {
    pub fn is_noop(&self) -> bool {
        !self.apply_hour_shift && !self.reconcile_gps
    }
}

/// How a run corrects files. Chosen once from configuration before any
/// file is touched.
#[derive(Debug, Clone, PartialEq)]
pub enum CorrectionPolicy {
    /// Shift every device except `excluded`, then reconcile GPS fields
    /// against the reference zone.
    BulkShift {
        excluded: HashSet<String>,
        target_utc_offset_hours: i64,
        gps_tolerance_seconds: i64,
    },
    /// Shift only `included` devices. GPS fields are left alone.
    TargetedShift { included: HashSet<String> },
}

impl CorrectionPolicy {
    pub fn bulk_shift<I, S>(
        excluded: I,
        target_utc_offset_hours: i64,
        gps_tolerance_seconds: i64,
    ) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CorrectionPolicy::BulkShift {
            excluded: excluded.into_iter().map(Into::into).collect(),
            target_utc_offset_hours,
            gps_tolerance_seconds,
        }
    }

    pub fn targeted_shift<I, S>(included: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        CorrectionPolicy::TargetedShift {
            included: included.into_iter().map(Into::into).collect(),
        }
    }

    pub fn decide(&self, device: &DeviceIdentity) -> CorrectionDecision {
        match self {
            CorrectionPolicy::BulkShift { excluded, .. } => CorrectionDecision {
                apply_hour_shift: !excluded.contains(device.as_str()),
                reconcile_gps: true,
            },
            CorrectionPolicy::TargetedShift { included } => CorrectionDecision {
                apply_hour_shift: included.contains(device.as_str()),
                reconcile_gps: false,
            },
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CorrectionPolicy::BulkShift { .. } => "bulk_shift",
            CorrectionPolicy::TargetedShift { .. } => "targeted_shift",
        }
    }
}
