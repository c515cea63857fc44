use crate::types::{Month, RawRow, SalesRecord};
use crate::util::{parse_date_safe, parse_f64_safe, parse_flag_safe, parse_i32_safe};
use chrono::NaiveDate;
use csv::ReaderBuilder;
use std::error::Error;
use std::io::Read;

#[derive(Debug, Clone)]
pub struct LoadReport {
    pub total_rows: usize,
    pub loaded_rows: usize,
    pub parse_errors: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
}

/// Load the sales dataset from `path` and clean it into typed records.
///
/// Rows missing a Year, Month, Recession flag, Vehicle_Type, or any of the
/// three measures are skipped and counted as parse errors rather than
/// aborting the load. The `Date` column is optional and only feeds the
/// coverage range in the returned `LoadReport`.
pub fn load_and_clean(path: &str) -> Result<(Vec<SalesRecord>, LoadReport), Box<dyn Error>> {
    let rdr = ReaderBuilder::new().flexible(true).from_path(path)?;
    Ok(clean_rows(rdr))
}

fn clean_rows<R: Read>(mut rdr: csv::Reader<R>) -> (Vec<SalesRecord>, LoadReport) {
    let mut total_rows = 0usize;
    let mut parse_errors = 0usize;
    let mut records: Vec<SalesRecord> = Vec::new();
    let mut first_date: Option<NaiveDate> = None;
    let mut last_date: Option<NaiveDate> = None;

    for result in rdr.deserialize::<RawRow>() {
        total_rows += 1;
        let row = match result {
            Ok(r) => r,
            Err(_) => {
                parse_errors += 1;
                continue;
            }
        };

        let year = match parse_i32_safe(row.year.as_deref()) {
            Some(y) => y,
            None => {
                parse_errors += 1;
                continue;
            }
        };
        let month = match row.month.as_deref().and_then(Month::parse) {
            Some(m) => m,
            None => {
                parse_errors += 1;
                continue;
            }
        };
        let recession = match parse_flag_safe(row.recession.as_deref()) {
            Some(b) => b,
            None => {
                parse_errors += 1;
                continue;
            }
        };
        let vehicle_type = match row.vehicle_type.as_deref().map(str::trim) {
            Some(v) if !v.is_empty() => v.to_string(),
            _ => {
                parse_errors += 1;
                continue;
            }
        };
        let automobile_sales = match parse_f64_safe(row.automobile_sales.as_deref()) {
            Some(v) => v,
            None => {
                parse_errors += 1;
                continue;
            }
        };
        let advertising_expenditure =
            match parse_f64_safe(row.advertising_expenditure.as_deref()) {
                Some(v) => v,
                None => {
                    parse_errors += 1;
                    continue;
                }
            };
        let unemployment_rate = match parse_f64_safe(row.unemployment_rate.as_deref()) {
            Some(v) => v,
            None => {
                parse_errors += 1;
                continue;
            }
        };

        let date = parse_date_safe(row.date.as_deref());
        if let Some(d) = date {
            first_date = Some(first_date.map_or(d, |f| f.min(d)));
            last_date = Some(last_date.map_or(d, |l| l.max(d)));
        }

        records.push(SalesRecord {
            year,
            month,
            recession,
            vehicle_type,
            automobile_sales,
            advertising_expenditure,
            unemployment_rate,
            date,
        });
    }

    let report = LoadReport {
        total_rows,
        loaded_rows: records.len(),
        parse_errors,
        first_date,
        last_date,
    };
    (records, report)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(csv_text: &str) -> csv::Reader<&[u8]> {
        ReaderBuilder::new()
            .flexible(true)
            .from_reader(csv_text.as_bytes())
    }

    const HEADER: &str = "Date,Year,Month,Recession,Vehicle_Type,\
Automobile_Sales,Advertising_Expenditure,unemployment_rate\n";

    #[test]
    fn clean_rows_types_every_field() {
        let text = format!(
            "{}1980-01-31,1980,Jan,1,Supperminicar,551.2,1558.9,5.5\n",
            HEADER
        );
        let (records, report) = clean_rows(reader(&text));
        assert_eq!(report.total_rows, 1);
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(report.parse_errors, 0);
        let r = &records[0];
        assert_eq!(r.year, 1980);
        assert_eq!(r.month, Month::Jan);
        assert!(r.recession);
        assert_eq!(r.vehicle_type, "Supperminicar");
        assert_eq!(r.automobile_sales, 551.2);
        assert_eq!(r.advertising_expenditure, 1558.9);
        assert_eq!(r.unemployment_rate, 5.5);
        assert_eq!(r.date, NaiveDate::from_ymd_opt(1980, 1, 31));
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let text = format!(
            "{}\
,1981,Feb,0,Sports,100,50,4.0\n\
,not-a-year,Feb,0,Sports,100,50,4.0\n\
,1981,Smarch,0,Sports,100,50,4.0\n\
,1981,Feb,maybe,Sports,100,50,4.0\n\
,1981,Feb,0,,100,50,4.0\n\
,1981,Feb,0,Sports,n/a,50,4.0\n",
            HEADER
        );
        let (records, report) = clean_rows(reader(&text));
        assert_eq!(report.total_rows, 6);
        assert_eq!(report.loaded_rows, 1);
        assert_eq!(report.parse_errors, 5);
        assert_eq!(records[0].year, 1981);
        assert!(records[0].date.is_none());
    }

    #[test]
    fn date_range_spans_min_and_max() {
        let text = format!(
            "{}\
1982-06-30,1982,Jun,0,SUV,10,5,6.0\n\
1980-01-31,1980,Jan,1,SUV,10,5,6.0\n\
1981-03-31,1981,Mar,0,SUV,10,5,6.0\n",
            HEADER
        );
        let (_, report) = clean_rows(reader(&text));
        assert_eq!(report.first_date, NaiveDate::from_ymd_opt(1980, 1, 31));
        assert_eq!(report.last_date, NaiveDate::from_ymd_opt(1982, 6, 30));
    }
}
