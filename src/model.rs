use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AirportsResponse {
    #[serde(default)]
    pub pagination: PaginationMeta,
    #[serde(default)]
    pub data: Vec<Airport>,
}

#[derive(Clone, Copy, Debug, Default, Deserialize, Serialize)]
pub struct PaginationMeta {
    #[serde(default, deserialize_with = "de_opt_u64_from_any")]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64_from_any")]
    pub offset: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64_from_any")]
    pub count: Option<u64>,
    #[serde(default, deserialize_with = "de_opt_u64_from_any")]
    pub total: Option<u64>,
}

/// One airport record as returned by the upstream provider. Everything is
/// kept as optional text; the API mixes strings, numbers and nulls freely,
/// so the numeric-looking fields go through a lenient decoder.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct Airport {
    #[serde(default)]
    pub airport_name: Option<String>,
    #[serde(default)]
    pub iata_code: Option<String>,
    #[serde(default)]
    pub icao_code: Option<String>,
    #[serde(default)]
    pub country_name: Option<String>,
    #[serde(default)]
    pub country_iso2: Option<String>,
    #[serde(default)]
    pub city_iata_code: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_from_any")]
    pub latitude: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_from_any")]
    pub longitude: Option<String>,
    #[serde(default)]
    pub timezone: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_from_any")]
    pub gmt: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_from_any")]
    pub phone_number: Option<String>,
    #[serde(default, deserialize_with = "de_opt_string_from_any")]
    pub geoname_id: Option<String>,
}

impl Airport {
    /// Key used for history entries and detail routes: ICAO first, IATA as
    /// fallback, always uppercased. `None` when the record carries neither.
    pub fn code(&self) -> Option<String> {
        let raw = self
            .icao_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| {
                self.iata_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
            })?;
        Some(raw.to_uppercase())
    }

    /// Short code shown in lists and headers (IATA preferred).
    pub fn display_code(&self) -> String {
        self.iata_code
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .or_else(|| {
                self.icao_code
                    .as_deref()
                    .map(str::trim)
                    .filter(|c| !c.is_empty())
            })
            .map(|c| c.to_uppercase())
            .unwrap_or_else(|| "--".to_string())
    }

    /// True when the record carries an ICAO or IATA code equal to `code`
    /// (case-insensitive).
    pub fn has_code(&self, code: &str) -> bool {
        let wanted = code.trim();
        if wanted.is_empty() {
            return false;
        }
        [self.icao_code.as_deref(), self.iata_code.as_deref()]
            .into_iter()
            .flatten()
            .any(|c| c.trim().eq_ignore_ascii_case(wanted))
    }

    /// Local filter match over name, codes and country. `needle` must
    /// already be lowercased; an empty needle matches everything.
    pub fn matches(&self, needle: &str) -> bool {
        if needle.is_empty() {
            return true;
        }
        let haystack = [
            self.airport_name.as_deref(),
            self.iata_code.as_deref(),
            self.icao_code.as_deref(),
            self.country_name.as_deref(),
        ]
        .into_iter()
        .flatten()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
        haystack.contains(needle)
    }

    /// UTC offset in seconds derived from the provider's `gmt` field
    /// ("-5", "5.75", ...). Rejects offsets outside +/-14h.
    pub fn gmt_offset_secs(&self) -> Option<i32> {
        let hours: f64 = self.gmt.as_deref()?.trim().parse().ok()?;
        if !hours.is_finite() || hours.abs() > 14.0 {
            return None;
        }
        Some((hours * 3600.0).round() as i32)
    }

    pub fn latitude_f64(&self) -> Option<f64> {
        self.latitude.as_deref()?.trim().parse().ok()
    }

    pub fn longitude_f64(&self) -> Option<f64> {
        self.longitude.as_deref()?.trim().parse().ok()
    }
}

fn de_opt_string_from_any<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else {
                Ok(Some(trimmed.to_string()))
            }
        }
        Value::Number(number) => Ok(Some(number.to_string())),
        Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected string, number or null, got {other}"
        ))),
    }
}

fn de_opt_u64_from_any<'de, D>(deserializer: D) -> Result<Option<u64>, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::Number(number) => {
            if let Some(value) = number.as_u64() {
                Ok(Some(value))
            } else if let Some(value) = number.as_f64() {
                Ok(Some(value.max(0.0) as u64))
            } else {
                Ok(None)
            }
        }
        Value::String(text) => {
            let trimmed = text.trim();
            if trimmed.is_empty() {
                Ok(None)
            } else if let Ok(value) = trimmed.parse::<u64>() {
                Ok(Some(value))
            } else if let Ok(value) = trimmed.parse::<f64>() {
                Ok(Some(value.max(0.0) as u64))
            } else {
                Ok(None)
            }
        }
        Value::Null => Ok(None),
        other => Err(serde::de::Error::custom(format!(
            "expected number or null, got {other}"
        ))),
    }
}
