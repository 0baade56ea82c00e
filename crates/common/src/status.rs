//! 证书有效状态推导
//!
//! 状态只由到期日与“今天”的日历日比较得出，不落库。

use chrono::{DateTime, FixedOffset, NaiveDate, TimeZone, Utc};
use serde::Serialize;

/// 由到期日推导出的生命周期状态
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DerivedStatus {
    Active,
    Expired,
}

/// 徽章样式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BadgeStyle {
    Positive,
    Negative,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StatusBadge {
    pub status: DerivedStatus,
    pub label: &'static str,
    pub style: BadgeStyle,
}

impl DerivedStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Expired => "expired",
        }
    }

    pub fn badge(self) -> StatusBadge {
        match self {
            Self::Active => StatusBadge {
                status: self,
                label: "Active",
                style: BadgeStyle::Positive,
            },
            Self::Expired => StatusBadge {
                status: self,
                label: "Expired",
                style: BadgeStyle::Negative,
            },
        }
    }
}

/// 到期当天仍视为有效。
pub fn derive_status(expiry: NaiveDate, today: NaiveDate) -> DerivedStatus {
    if today <= expiry {
        DerivedStatus::Active
    } else {
        DerivedStatus::Expired
    }
}

/// 带时刻的版本：两侧都先截断到所在时区的日历日再比较。
pub fn derive_status_at<Tz: TimeZone>(expiry: NaiveDate, now: &DateTime<Tz>) -> DerivedStatus {
    derive_status(expiry, now.date_naive())
}

/// 按配置的时区偏移取得“今天”。
pub fn today_in(offset: FixedOffset) -> NaiveDate {
    Utc::now().with_timezone(&offset).date_naive()
}
