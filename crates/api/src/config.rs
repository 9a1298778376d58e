// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Station-wide settings shared by the handlers.

use bus_station::ReportMode;
use bus_station_domain::{Tz, parse_timezone, station_now};
use time::PrimitiveDateTime;

use crate::error::{ApiError, translate_domain_error};

/// Name of the station's home city when none is configured.
pub const DEFAULT_ORIGIN_CITY: &str = "Ivanovo";

/// IANA zone used when none is configured.
pub const DEFAULT_TIMEZONE: &str = "Europe/Moscow";

/// Settings that shape titles, clocks, and reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StationConfig {
    /// The city every route departs from. Used in route titles.
    pub origin_city_name: String,
    /// The station's wall-clock zone.
    pub timezone: Tz,
    /// How ticket statuses are counted in reports.
    pub report_mode: ReportMode,
}

impl StationConfig {
    /// Builds a configuration, validating the timezone name.
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` if the origin is blank or the zone is unknown.
    pub fn new(
        origin_city_name: &str,
        timezone: &str,
        report_mode: ReportMode,
    ) -> Result<Self, ApiError> {
        let origin: &str = origin_city_name.trim();
        if origin.is_empty() {
            return Err(ApiError::invalid(
                "origin_city",
                "Origin city name cannot be empty",
            ));
        }
        let timezone: Tz = parse_timezone(timezone).map_err(translate_domain_error)?;
        Ok(Self {
            origin_city_name: origin.to_string(),
            timezone,
            report_mode,
        })
    }

    /// Returns the clock for this station's zone.
    #[must_use]
    pub const fn clock(&self) -> StationClock {
        StationClock::System(self.timezone)
    }
}

impl Default for StationConfig {
    fn default() -> Self {
        Self {
            origin_city_name: String::from(DEFAULT_ORIGIN_CITY),
            timezone: Tz::Europe__Moscow,
            report_mode: ReportMode::default(),
        }
    }
}

/// Source of the station's local "now".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StationClock {
    /// The system clock, converted into the given zone.
    System(Tz),
    /// A frozen instant.
    Fixed(PrimitiveDateTime),
}

impl StationClock {
    /// Returns the current station-local date and time.
    ///
    /// # Errors
    ///
    /// Returns `Internal` if the system time cannot be represented.
    pub fn now(&self) -> Result<PrimitiveDateTime, ApiError> {
        match self {
            Self::System(tz) => station_now(*tz).map_err(|e| ApiError::Internal {
                message: format!("Failed to read station clock: {e}"),
            }),
            Self::Fixed(at) => Ok(*at),
        }
    }
}
