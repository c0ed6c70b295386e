// Copyright 2026 Recycle Contributors
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Grace period configuration.

use serde::{Deserialize, Serialize};

/// Default account grace period: 30 days.
pub const DEFAULT_ACCOUNT_RECYCLED_SECONDS: u64 = 2_592_000;

/// Default object grace period: 7 days.
pub const DEFAULT_OBJECT_RECYCLED_SECONDS: u64 = 604_800;

/// Longest accepted grace period: 100 years.
pub const MAX_RECYCLED_SECONDS: u64 = 100 * 365 * 86_400;

/// How long marked entities stay recoverable.
///
/// Fixed at construction time; nothing reads grace periods from globals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GracePeriods {
    /// Seconds an account must stay marked before DELETE is allowed.
    pub account_recycled_seconds: u64,
    /// Seconds after marking when an object expires.
    pub object_recycled_seconds: u64,
}

impl GracePeriods {
    /// Creates a configuration from explicit periods.
    pub fn new(account_recycled_seconds: u64, object_recycled_seconds: u64) -> Self {
        Self {
            account_recycled_seconds,
            object_recycled_seconds,
        }
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if either period is zero or exceeds
    /// [`MAX_RECYCLED_SECONDS`].
    pub fn validate(&self) -> Result<(), GracePeriodError> {
        for (name, value) in [
            ("account_recycled_seconds", self.account_recycled_seconds),
            ("object_recycled_seconds", self.object_recycled_seconds),
        ] {
            if value == 0 {
                return Err(GracePeriodError::Zero { name });
            }
            if value > MAX_RECYCLED_SECONDS {
                return Err(GracePeriodError::TooLarge { name, value });
            }
        }
        Ok(())
    }
}

impl Default for GracePeriods {
    fn default() -> Self {
        Self {
            account_recycled_seconds: DEFAULT_ACCOUNT_RECYCLED_SECONDS,
            object_recycled_seconds: DEFAULT_OBJECT_RECYCLED_SECONDS,
        }
    }
}

/// Invalid grace period configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GracePeriodError {
    /// A grace period of zero would make marking equivalent to deleting.
    #[error("{name} must be greater than 0")]
    Zero {
        /// Setting name.
        name: &'static str,
    },

    /// Period is longer than [`MAX_RECYCLED_SECONDS`].
    #[error("{name} is too large: {value}")]
    TooLarge {
        /// Setting name.
        name: &'static str,
        /// Configured value.
        value: u64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let periods = GracePeriods::default();
        assert_eq!(periods.account_recycled_seconds, 30 * 24 * 3600);
        assert_eq!(periods.object_recycled_seconds, 7 * 24 * 3600);
        assert!(periods.validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_zero() {
        assert_eq!(
            GracePeriods::new(0, 10).validate(),
            Err(GracePeriodError::Zero {
                name: "account_recycled_seconds"
            })
        );
        assert_eq!(
            GracePeriods::new(10, 0).validate(),
            Err(GracePeriodError::Zero {
                name: "object_recycled_seconds"
            })
        );
    }

    #[test]
    fn test_validate_rejects_overflow() {
        assert!(GracePeriods::new(u64::MAX, 10).validate().is_err());
        assert_eq!(
            GracePeriods::new(30, i64::MAX as u64).validate(),
            Err(GracePeriodError::TooLarge {
                name: "object_recycled_seconds",
                value: i64::MAX as u64
            })
        );
        assert!(GracePeriods::new(MAX_RECYCLED_SECONDS, MAX_RECYCLED_SECONDS)
            .validate()
            .is_ok());
    }

    #[test]
    fn test_serialization() {
        let json = serde_json::to_string(&GracePeriods::new(30, 600)).unwrap();
        assert_eq!(
            json,
            r#"{"account_recycled_seconds":30,"object_recycled_seconds":600}"#
        );
    }
}
