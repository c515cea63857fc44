use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Year range covered by the dataset and offered by the year selector.
pub const YEAR_MIN: i32 = 1980;
pub const YEAR_MAX: i32 = 2023;

#[derive(Debug, Deserialize)]
pub struct RawRow {
    #[serde(rename = "Date")]
    pub date: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "Month")]
    pub month: Option<String>,
    #[serde(rename = "Recession")]
    pub recession: Option<String>,
    #[serde(rename = "Vehicle_Type")]
    pub vehicle_type: Option<String>,
    #[serde(rename = "Automobile_Sales")]
    pub automobile_sales: Option<String>,
    #[serde(rename = "Advertising_Expenditure")]
    pub advertising_expenditure: Option<String>,
    #[serde(rename = "unemployment_rate")]
    pub unemployment_rate: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SalesRecord {
    pub year: i32,
    pub month: Month,
    pub recession: bool,
    pub vehicle_type: String,
    pub automobile_sales: f64,
    pub advertising_expenditure: f64,
    pub unemployment_rate: f64,
    pub date: Option<NaiveDate>,
}

/// Calendar month. Variant order doubles as the sort order, so grouped
/// monthly rows come out January-first without a separate ordinal column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Month {
    Jan,
    Feb,
    Mar,
    Apr,
    May,
    Jun,
    Jul,
    Aug,
    Sep,
    Oct,
    Nov,
    Dec,
}

impl Month {
    pub const ALL: [Month; 12] = [
        Month::Jan,
        Month::Feb,
        Month::Mar,
        Month::Apr,
        Month::May,
        Month::Jun,
        Month::Jul,
        Month::Aug,
        Month::Sep,
        Month::Oct,
        Month::Nov,
        Month::Dec,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Month::Jan => "Jan",
            Month::Feb => "Feb",
            Month::Mar => "Mar",
            Month::Apr => "Apr",
            Month::May => "May",
            Month::Jun => "Jun",
            Month::Jul => "Jul",
            Month::Aug => "Aug",
            Month::Sep => "Sep",
            Month::Oct => "Oct",
            Month::Nov => "Nov",
            Month::Dec => "Dec",
        }
    }

    /// Accepts the dataset's short names ("Jan"), full names ("January"),
    /// and numeric ordinals ("1".."12"), case-insensitively.
    pub fn parse(s: &str) -> Option<Month> {
        let s = s.trim();
        if s.is_empty() {
            return None;
        }
        if let Ok(n) = s.parse::<u32>() {
            let idx = n.checked_sub(1)? as usize;
            return Month::ALL.get(idx).copied();
        }
        let lower = s.to_lowercase();
        Month::ALL
            .iter()
            .find(|m| lower.starts_with(&m.label().to_lowercase()))
            .copied()
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The two report shapes the dashboard offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportType {
    Yearly,
    RecessionPeriod,
}

/// One selection state of the two input controls. `None` in either field is
/// the placeholder ("Select a report type" / "Select a Year") state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReportRequest {
    pub report_type: Option<ReportType>,
    pub year: Option<i32>,
}

/// Grouping key of one aggregate row. The compound variant carries both
/// components so downstream consumers keep the structure instead of a
/// pre-joined label.
#[derive(Debug, Clone, Serialize)]
pub enum GroupKey {
    Year(i32),
    Month(Month),
    VehicleType(String),
    VehicleTypeRate {
        vehicle_type: String,
        unemployment_rate: f64,
    },
}

// Rates in the dataset are finite, so bit-pattern hashing plus `total_cmp`
// ordering keeps Eq, Hash, and Ord mutually consistent for the f64 component.
impl PartialEq for GroupKey {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl Eq for GroupKey {}

impl Hash for GroupKey {
    fn hash<H: Hasher>(&self, state: &mut H) {
        match self {
            GroupKey::Year(y) => {
                0u8.hash(state);
                y.hash(state);
            }
            GroupKey::Month(m) => {
                1u8.hash(state);
                m.hash(state);
            }
            GroupKey::VehicleType(v) => {
                2u8.hash(state);
                v.hash(state);
            }
            GroupKey::VehicleTypeRate {
                vehicle_type,
                unemployment_rate,
            } => {
                3u8.hash(state);
                vehicle_type.hash(state);
                unemployment_rate.to_bits().hash(state);
            }
        }
    }
}

impl Ord for GroupKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self, other) {
            (GroupKey::Year(a), GroupKey::Year(b)) => a.cmp(b),
            (GroupKey::Month(a), GroupKey::Month(b)) => a.cmp(b),
            (GroupKey::VehicleType(a), GroupKey::VehicleType(b)) => a.cmp(b),
            (
                GroupKey::VehicleTypeRate {
                    vehicle_type: va,
                    unemployment_rate: ra,
                },
                GroupKey::VehicleTypeRate {
                    vehicle_type: vb,
                    unemployment_rate: rb,
                },
            ) => va.cmp(vb).then_with(|| ra.total_cmp(rb)),
            (a, b) => a.variant_rank().cmp(&b.variant_rank()),
        }
    }
}

impl PartialOrd for GroupKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl GroupKey {
    fn variant_rank(&self) -> u8 {
        match self {
            GroupKey::Year(_) => 0,
            GroupKey::Month(_) => 1,
            GroupKey::VehicleType(_) => 2,
            GroupKey::VehicleTypeRate { .. } => 3,
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GroupKey::Year(y) => write!(f, "{}", y),
            GroupKey::Month(m) => write!(f, "{}", m),
            GroupKey::VehicleType(v) => f.write_str(v),
            GroupKey::VehicleTypeRate {
                vehicle_type,
                unemployment_rate,
            } => write!(f, "{} / {}", vehicle_type, unemployment_rate),
        }
    }
}

/// Chart shape the renderer should use for a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
}

impl fmt::Display for ChartKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChartKind::Line => f.write_str("line"),
            ChartKind::Bar => f.write_str("bar"),
            ChartKind::Pie => f.write_str("pie"),
        }
    }
}

/// Semantic role of each table inside its bundle. Serialized as the
/// kebab-case tag (e.g. `trend-over-recession`).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TableRole {
    TrendOverRecession,
    AvgSalesByVehicleType,
    AdSpendShareByVehicleType,
    UnemploymentEffectByVehicleType,
    FullHistoryYearlyTrend,
    MonthlySalesForYear,
    AvgSalesByVehicleTypeForYear,
    AdSpendByVehicleTypeForYear,
}

impl TableRole {
    /// Stem used for per-table export file names.
    pub fn file_stem(&self) -> &'static str {
        match self {
            TableRole::TrendOverRecession => "trend_over_recession",
            TableRole::AvgSalesByVehicleType => "avg_sales_by_vehicle_type",
            TableRole::AdSpendShareByVehicleType => "ad_spend_share_by_vehicle_type",
            TableRole::UnemploymentEffectByVehicleType => "unemployment_effect_by_vehicle_type",
            TableRole::FullHistoryYearlyTrend => "full_history_yearly_trend",
            TableRole::MonthlySalesForYear => "monthly_sales_for_year",
            TableRole::AvgSalesByVehicleTypeForYear => "avg_sales_by_vehicle_type_for_year",
            TableRole::AdSpendByVehicleTypeForYear => "ad_spend_by_vehicle_type_for_year",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub key: GroupKey,
    pub value: f64,
}

/// One grouped/aggregated result plus everything a chart renderer needs to
/// bind it: role, title, chart kind, and the key/value field names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AggregateTable {
    pub role: TableRole,
    pub title: String,
    pub chart: ChartKind,
    pub key_field: &'static str,
    pub value_field: &'static str,
    pub rows: Vec<TableRow>,
}

/// The four tables of one report, in fixed display order.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportBundle {
    pub tables: [AggregateTable; 4],
}

/// User-facing "no data" states. Recoverable, rendered as plain text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoData {
    NoRecessionDataForYear,
    NoAggregateData,
}

impl NoData {
    pub fn message(&self) -> &'static str {
        match self {
            NoData::NoRecessionDataForYear => {
                "No data available for the selected year during recession periods."
            }
            NoData::NoAggregateData => "No aggregate data available for the selected year.",
        }
    }
}

/// Result of one report computation.
///
/// `NotReady` means the selectors are still on a placeholder; nothing is
/// rendered, which is distinct from `NoData` (a message, no charts).
#[derive(Debug, Clone, PartialEq)]
pub enum ReportOutcome {
    Bundle(ReportBundle),
    NoData(NoData),
    NotReady,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_parses_short_full_and_ordinal_forms() {
        assert_eq!(Month::parse("Jan"), Some(Month::Jan));
        assert_eq!(Month::parse("september"), Some(Month::Sep));
        assert_eq!(Month::parse(" December "), Some(Month::Dec));
        assert_eq!(Month::parse("3"), Some(Month::Mar));
        assert_eq!(Month::parse("13"), None);
        assert_eq!(Month::parse("0"), None);
        assert_eq!(Month::parse("notamonth"), None);
    }

    #[test]
    fn compound_key_orders_by_vehicle_type_then_rate() {
        let a = GroupKey::VehicleTypeRate {
            vehicle_type: "SUV".into(),
            unemployment_rate: 5.2,
        };
        let b = GroupKey::VehicleTypeRate {
            vehicle_type: "SUV".into(),
            unemployment_rate: 4.1,
        };
        let c = GroupKey::VehicleTypeRate {
            vehicle_type: "Sports".into(),
            unemployment_rate: 9.9,
        };
        let mut keys = vec![a.clone(), b.clone(), c.clone()];
        keys.sort();
        assert_eq!(keys, vec![b, a, c]);
    }

    #[test]
    fn no_data_messages_are_user_facing_text() {
        assert_eq!(
            NoData::NoRecessionDataForYear.message(),
            "No data available for the selected year during recession periods."
        );
        assert_eq!(
            NoData::NoAggregateData.message(),
            "No aggregate data available for the selected year."
        );
    }
}
