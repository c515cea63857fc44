use crate::types::{
    AggregateTable, ChartKind, GroupKey, NoData, ReportBundle, ReportOutcome, ReportRequest,
    ReportType, SalesRecord, TableRole, TableRow,
};
use crate::util::average;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy)]
enum Aggregate {
    Mean,
    Sum,
}

/// Group `rows` by the key closure and fold the measure within each group.
///
/// Output rows are sorted ascending by key; keys come only from rows that
/// are actually present, so a group is never emitted empty.
fn aggregate_by<'a, I, K, M>(rows: I, key: K, measure: M, agg: Aggregate) -> Vec<TableRow>
where
    I: IntoIterator<Item = &'a SalesRecord>,
    K: Fn(&SalesRecord) -> GroupKey,
    M: Fn(&SalesRecord) -> f64,
{
    let mut groups: HashMap<GroupKey, Vec<f64>> = HashMap::new();
    for r in rows {
        groups.entry(key(r)).or_default().push(measure(r));
    }
    let mut out: Vec<TableRow> = groups
        .into_iter()
        .map(|(key, values)| {
            let value = match agg {
                Aggregate::Mean => average(&values),
                Aggregate::Sum => values.iter().sum(),
            };
            TableRow { key, value }
        })
        .collect();
    out.sort_by(|a, b| a.key.cmp(&b.key));
    out
}

/// Compute the four-table bundle for one selector state.
///
/// Returns `NotReady` while either selector is still on its placeholder;
/// the recession branch can additionally come back as `NoData` when the
/// chosen year has no recession rows.
pub fn compute(data: &[SalesRecord], request: &ReportRequest) -> ReportOutcome {
    match (request.report_type, request.year) {
        (Some(ReportType::RecessionPeriod), Some(year)) => recession_report(data, year),
        (Some(ReportType::Yearly), Some(year)) => ReportOutcome::Bundle(yearly_report(data, year)),
        _ => ReportOutcome::NotReady,
    }
}

fn recession_report(data: &[SalesRecord], year: i32) -> ReportOutcome {
    let subset: Vec<&SalesRecord> = data
        .iter()
        .filter(|r| r.recession && r.year == year)
        .collect();
    if subset.is_empty() {
        return ReportOutcome::NoData(NoData::NoRecessionDataForYear);
    }

    // A real groupby even though the year filter currently leaves one key:
    // relaxing the filter to a multi-year recession window must keep working.
    let trend = aggregate_by(
        subset.iter().copied(),
        |r| GroupKey::Year(r.year),
        |r| r.automobile_sales,
        Aggregate::Mean,
    );
    if trend.is_empty() {
        return ReportOutcome::NoData(NoData::NoAggregateData);
    }

    let avg_sales = aggregate_by(
        subset.iter().copied(),
        |r| GroupKey::VehicleType(r.vehicle_type.clone()),
        |r| r.automobile_sales,
        Aggregate::Mean,
    );
    let ad_spend = aggregate_by(
        subset.iter().copied(),
        |r| GroupKey::VehicleType(r.vehicle_type.clone()),
        |r| r.advertising_expenditure,
        Aggregate::Sum,
    );
    let unemployment = aggregate_by(
        subset.iter().copied(),
        |r| GroupKey::VehicleTypeRate {
            vehicle_type: r.vehicle_type.clone(),
            unemployment_rate: r.unemployment_rate,
        },
        |r| r.automobile_sales,
        Aggregate::Sum,
    );

    ReportOutcome::Bundle(ReportBundle {
        tables: [
            AggregateTable {
                role: TableRole::TrendOverRecession,
                title: "Average Automobile Sales Fluctuation Over Recession Period".to_string(),
                chart: ChartKind::Line,
                key_field: "Year",
                value_field: "Automobile_Sales",
                rows: trend,
            },
            AggregateTable {
                role: TableRole::AvgSalesByVehicleType,
                title: "Average Number of Vehicles Sold by Vehicle Type During Recessions"
                    .to_string(),
                chart: ChartKind::Bar,
                key_field: "Vehicle_Type",
                value_field: "Automobile_Sales",
                rows: avg_sales,
            },
            AggregateTable {
                role: TableRole::AdSpendShareByVehicleType,
                title: "Total Advertising Expenditure Share by Vehicle Type During Recessions"
                    .to_string(),
                chart: ChartKind::Pie,
                key_field: "Vehicle_Type",
                value_field: "Advertising_Expenditure",
                rows: ad_spend,
            },
            AggregateTable {
                role: TableRole::UnemploymentEffectByVehicleType,
                title: "Effect of Unemployment Rate on Vehicle Type and Sales".to_string(),
                chart: ChartKind::Bar,
                key_field: "Vehicle_Type / unemployment_rate",
                value_field: "Automobile_Sales",
                rows: unemployment,
            },
        ],
    })
}

fn yearly_report(data: &[SalesRecord], year: i32) -> ReportBundle {
    let subset: Vec<&SalesRecord> = data.iter().filter(|r| r.year == year).collect();

    // Full-history trend over the unfiltered dataset; the other three tables
    // are scoped to the selected year. A year with no rows yields empty
    // tables here rather than a message, and the renderer shows its empty
    // state for them.
    let full_trend = aggregate_by(
        data.iter(),
        |r| GroupKey::Year(r.year),
        |r| r.automobile_sales,
        Aggregate::Mean,
    );
    let monthly = aggregate_by(
        subset.iter().copied(),
        |r| GroupKey::Month(r.month),
        |r| r.automobile_sales,
        Aggregate::Sum,
    );
    let avg_sales = aggregate_by(
        subset.iter().copied(),
        |r| GroupKey::VehicleType(r.vehicle_type.clone()),
        |r| r.automobile_sales,
        Aggregate::Mean,
    );
    let ad_spend = aggregate_by(
        subset.iter().copied(),
        |r| GroupKey::VehicleType(r.vehicle_type.clone()),
        |r| r.advertising_expenditure,
        Aggregate::Sum,
    );

    ReportBundle {
        tables: [
            AggregateTable {
                role: TableRole::FullHistoryYearlyTrend,
                title: "Yearly Automobile Sales".to_string(),
                chart: ChartKind::Line,
                key_field: "Year",
                value_field: "Automobile_Sales",
                rows: full_trend,
            },
            AggregateTable {
                role: TableRole::MonthlySalesForYear,
                title: format!("Monthly Automobile Sales in {}", year),
                chart: ChartKind::Line,
                key_field: "Month",
                value_field: "Automobile_Sales",
                rows: monthly,
            },
            AggregateTable {
                role: TableRole::AvgSalesByVehicleTypeForYear,
                title: format!("Average Vehicles Sold by Vehicle Type in the year {}", year),
                chart: ChartKind::Bar,
                key_field: "Vehicle_Type",
                value_field: "Automobile_Sales",
                rows: avg_sales,
            },
            AggregateTable {
                role: TableRole::AdSpendByVehicleTypeForYear,
                title: format!("Total Advertising Expenditure for Each Vehicle Type in {}", year),
                chart: ChartKind::Pie,
                key_field: "Vehicle_Type",
                value_field: "Advertising_Expenditure",
                rows: ad_spend,
            },
        ],
    }
}
