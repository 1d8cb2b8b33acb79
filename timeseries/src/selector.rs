use serde::{Deserialize, Serialize};

use crate::period::{Granularity, MonthSelection};

/// What the dashboard is currently asking about.
///
/// Serializes as `{"mode": "range", "range": "monthly"}` or
/// `{"mode": "specific", "specific": {"year": 2024, "month": 8}}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "lowercase")]
pub enum TimeSelector {
    /// Every period of one granularity.
    Range { range: Granularity },
    /// One month plus a short trailing history.
    Specific { specific: MonthSelection },
}

impl TimeSelector {
    pub fn range(granularity: Granularity) -> Self {
        TimeSelector::Range { range: granularity }
    }

    pub fn specific(selection: MonthSelection) -> Self {
        TimeSelector::Specific {
            specific: selection,
        }
    }
}

impl Default for TimeSelector {
    fn default() -> Self {
        TimeSelector::range(Granularity::Monthly)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uses_mode_tag() {
        let selector: TimeSelector =
            serde_json::from_str(r#"{"mode":"range","range":"quarterly"}"#).unwrap();
        assert_eq!(selector, TimeSelector::range(Granularity::Quarterly));

        let selector: TimeSelector =
            serde_json::from_str(r#"{"mode":"specific","specific":{"year":2024,"month":8}}"#)
                .unwrap();
        assert_eq!(
            selector,
            TimeSelector::specific(MonthSelection::new(2024, 8).unwrap())
        );
    }

    #[test]
    fn rejects_invalid_month() {
        let result = serde_json::from_str::<TimeSelector>(
            r#"{"mode":"specific","specific":{"year":2024,"month":14}}"#,
        );
        assert!(result.is_err());
    }
}
