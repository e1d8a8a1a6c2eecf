//! Reporting series built from the trip history.
//!
//! Each reduction folds the trips into an ordered map keyed by the bucket
//! (calendar month or ISO week) and then emits points in key order, so the
//! output is chronological no matter how the input was sorted.

use std::collections::BTreeMap;

use chrono::{Datelike, Duration, NaiveDate};
use serde::Serialize;

use crate::models::Trip;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyPoint {
    /// Display label, e.g. `Jan 2024`.
    pub label: String,
    /// Sortable bucket key, e.g. `2024-01`.
    pub period: String,
    pub net_revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WeeklyPoint {
    /// `MM-DD` of the Wednesday inside the ISO week.
    pub label: String,
    /// ISO week key, e.g. `2024-W03`.
    pub week: String,
    pub total_miles: f64,
    pub net_revenue: f64,
    /// Net revenue per mile; zero for a week with no miles.
    pub value: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct MileageTotals {
    pub deadhead: f64,
    pub loaded: f64,
}

/// Completed trips paired with their delivery date.
fn completed(trips: &[Trip]) -> impl Iterator<Item = (&Trip, NaiveDate)> {
    trips
        .iter()
        .filter_map(|t| t.date_delivered.map(|delivered| (t, delivered)))
}

/// Net revenue per calendar month of delivery.
pub fn monthly_net_revenue(trips: &[Trip]) -> Vec<MonthlyPoint> {
    let mut months: BTreeMap<(i32, u32), f64> = BTreeMap::new();
    for (trip, delivered) in completed(trips) {
        *months.entry((delivered.year(), delivered.month())).or_insert(0.0) += trip.projected_net;
    }

    months
        .into_iter()
        .map(|((year, month), net_revenue)| MonthlyPoint {
            label: month_label(year, month),
            period: format!("{year:04}-{month:02}"),
            net_revenue,
        })
        .collect()
}

fn month_label(year: i32, month: u32) -> String {
    NaiveDate::from_ymd_opt(year, month, 1)
        .map(|d| d.format("%b %Y").to_string())
        .unwrap_or_else(|| format!("{year:04}-{month:02}"))
}

#[derive(Debug)]
struct WeekTotals {
    wednesday: NaiveDate,
    total_miles: f64,
    net_revenue: f64,
}

/// Monday-start week containing `date`, shifted to its Wednesday.
fn wednesday_of_week(date: NaiveDate) -> NaiveDate {
    let monday = date - Duration::days(i64::from(date.weekday().num_days_from_monday()));
    monday + Duration::days(2)
}

/// Net revenue per mile for each ISO week of delivery.
pub fn weekly_revenue_per_mile(trips: &[Trip]) -> Vec<WeeklyPoint> {
    let mut weeks: BTreeMap<(i32, u32), WeekTotals> = BTreeMap::new();
    for (trip, delivered) in completed(trips) {
        let iso = delivered.iso_week();
        let totals = weeks.entry((iso.year(), iso.week())).or_insert_with(|| WeekTotals {
            wednesday: wednesday_of_week(delivered),
            total_miles: 0.0,
            net_revenue: 0.0,
        });
        totals.total_miles += trip.total_miles();
        totals.net_revenue += trip.projected_net;
    }

    weeks
        .into_iter()
        .map(|((year, week), totals)| WeeklyPoint {
            label: totals.wednesday.format("%m-%d").to_string(),
            week: format!("{year:04}-W{week:02}"),
            total_miles: totals.total_miles,
            net_revenue: totals.net_revenue,
            value: if totals.total_miles == 0.0 {
                0.0
            } else {
                totals.net_revenue / totals.total_miles
            },
        })
        .collect()
}

/// Deadhead and loaded miles over every trip, open or completed.
pub fn mileage_totals(trips: &[Trip]) -> MileageTotals {
    trips.iter().fold(MileageTotals::default(), |acc, t| MileageTotals {
        deadhead: acc.deadhead + t.deadhead_miles,
        loaded: acc.loaded + t.loaded_miles,
    })
}
