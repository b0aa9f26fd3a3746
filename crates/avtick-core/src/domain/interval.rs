use std::fmt::{Display, Formatter};
use std::str::FromStr;

use crate::error::ValidationError;

/// Sampling interval accepted by technical indicator endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndicatorInterval {
    Daily,
    #[default]
    Weekly,
    Monthly,
}

impl IndicatorInterval {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Daily => "daily",
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
        }
    }
}

impl Display for IndicatorInterval {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for IndicatorInterval {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "daily" => Ok(Self::Daily),
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            other => Err(ValidationError::InvalidInterval {
                value: other.to_owned(),
            }),
        }
    }
}

/// Price series an indicator is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SeriesType {
    #[default]
    Open,
    High,
    Low,
    Close,
}

impl SeriesType {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Open => "open",
            Self::High => "high",
            Self::Low => "low",
            Self::Close => "close",
        }
    }
}

impl Display for SeriesType {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SeriesType {
    type Err = ValidationError;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim() {
            "open" => Ok(Self::Open),
            "high" => Ok(Self::High),
            "low" => Ok(Self::Low),
            "close" => Ok(Self::Close),
            other => Err(ValidationError::InvalidSeriesType {
                value: other.to_owned(),
            }),
        }
    }
}
