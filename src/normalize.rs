//! Turns classified sheets into snapshot records.
//!
//! Each sheet kind has a column table resolved once from the header row and a
//! row function returning `Option<record>`: `None` drops the row. Case counts
//! that fail to parse become 0; identifying fields (names, coordinates, dates)
//! that fail to parse drop the row.

use chrono::{NaiveDate, NaiveDateTime};
use once_cell::sync::Lazy;
use rand::Rng;
use std::collections::{BTreeMap, HashMap};

use crate::classify::{
    classify, find_column, first_matching, header_disease, ColumnFamily, ColumnMap, SheetKind,
};
use crate::derive;
use crate::loader::{Cell, Sheet};
use crate::types::{Alert, DashboardStats, LocationRecord, Priority, Snapshot, TrendPoint};
use crate::util::{cell_count, cell_count_or_zero, cell_date, cell_f64, cell_text};

/// Base coordinates used to place district rows on the map.
///
/// District tables carry no coordinates, so each district is drawn at its
/// province's base point plus a uniform jitter of up to [`JITTER_DEGREES`].
/// The resulting positions are an approximation for display, not a
/// measurement of where the district is.
static PROVINCE_BASES: Lazy<HashMap<&'static str, (f64, f64)>> = Lazy::new(|| {
    HashMap::from([
        ("Sindh", (25.8943, 68.5247)),
        ("Balochistan", (28.3917, 65.0456)),
        ("KP", (33.9425, 71.5197)),
    ])
});

const DEFAULT_BASE: (f64, f64) = (30.0, 70.0);

pub const JITTER_DEGREES: f64 = 2.0;

/// Series name used when a time-series sheet has no disease column.
pub const GENERAL_SERIES: &str = "general";

static EMPTY_CELL: Cell = Cell::Empty;

/// A data row addressed by column index; missing cells read as empty.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    cells: &'a [Cell],
}

impl<'a> Row<'a> {
    pub fn new(cells: &'a [Cell]) -> Self {
        Row { cells }
    }

    pub fn get(&self, idx: usize) -> &'a Cell {
        self.cells.get(idx).unwrap_or(&EMPTY_CELL)
    }

    pub fn opt(&self, idx: Option<usize>) -> &'a Cell {
        idx.map(|i| self.get(i)).unwrap_or(&EMPTY_CELL)
    }
}

pub fn province_base(province: &str) -> (f64, f64) {
    PROVINCE_BASES.get(province).copied().unwrap_or(DEFAULT_BASE)
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryColumns {
    pub disease: usize,
    pub total: usize,
}

impl SummaryColumns {
    pub fn resolve(map: &ColumnMap) -> Option<Self> {
        Some(SummaryColumns {
            disease: map.get(ColumnFamily::Disease)?,
            total: map
                .get(ColumnFamily::Total)
                .or_else(|| map.get(ColumnFamily::CaseCount))?,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DistrictColumns {
    pub district: usize,
    pub cases: Option<usize>,
    pub population: Option<usize>,
    pub vaccinated: Option<usize>,
}

impl DistrictColumns {
    pub fn resolve(headers: &[String], map: &ColumnMap) -> Option<Self> {
        Some(DistrictColumns {
            district: first_matching(headers, &["district"])
                .or_else(|| map.get(ColumnFamily::Location))?,
            cases: first_matching(headers, &["malaria"])
                .or_else(|| map.get(ColumnFamily::CaseCount)),
            population: map.get(ColumnFamily::Population),
            vaccinated: map.get(ColumnFamily::Vaccinated),
        })
    }
}

/// Where a series row's disease name comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeriesName {
    /// A column holding the disease name per row.
    Column(usize),
    /// One series for the whole sheet, e.g. from a "Malaria cases" header.
    Fixed(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeriesColumns {
    pub date: usize,
    pub cases: usize,
    pub name: SeriesName,
}

impl SeriesColumns {
    /// The case column never doubles as the disease column: a header such as
    /// "Malaria cases" names the series instead.
    pub fn resolve(headers: &[String], map: &ColumnMap) -> Option<Self> {
        let cases = map.get(ColumnFamily::CaseCount)?;
        let name = match find_column(headers, ColumnFamily::Disease, &[cases]) {
            Some(idx) => SeriesName::Column(idx),
            None => SeriesName::Fixed(
                headers
                    .get(cases)
                    .and_then(|h| header_disease(h))
                    .unwrap_or(GENERAL_SERIES)
                    .to_string(),
            ),
        };
        Some(SeriesColumns {
            date: map.get(ColumnFamily::Date)?,
            cases,
            name,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LocationColumns {
    pub location: usize,
    pub lat: usize,
    pub lng: usize,
    pub cases: usize,
    pub population: Option<usize>,
    pub vaccinated: Option<usize>,
    pub province: Option<usize>,
}

impl LocationColumns {
    pub fn resolve(headers: &[String], map: &ColumnMap) -> Option<Self> {
        let location = map.get(ColumnFamily::Location)?;
        let province = first_matching(headers, &["province"]).filter(|idx| *idx != location);
        Some(LocationColumns {
            location,
            lat: map.get(ColumnFamily::Latitude)?,
            lng: map.get(ColumnFamily::Longitude)?,
            cases: map.get(ColumnFamily::CaseCount)?,
            population: map.get(ColumnFamily::Population),
            vaccinated: map.get(ColumnFamily::Vaccinated),
            province,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlertColumns {
    pub message: usize,
    pub priority: Option<usize>,
    pub date: Option<usize>,
    pub location: Option<usize>,
    pub case_count: Option<usize>,
}

impl AlertColumns {
    pub fn resolve(map: &ColumnMap) -> Option<Self> {
        Some(AlertColumns {
            message: map.get(ColumnFamily::Message)?,
            priority: map.get(ColumnFamily::Priority),
            date: map.get(ColumnFamily::Date),
            location: map.get(ColumnFamily::Location),
            case_count: map.get(ColumnFamily::CaseCount),
        })
    }
}

/// `("malaria", 62096)` from a national summary row.
pub fn summary_row(row: Row, cols: &SummaryColumns) -> Option<(String, u64)> {
    let Some(disease) = cell_text(row.get(cols.disease)) else {
        log::debug!("Dropping summary row: no disease name");
        return None;
    };
    match cell_count(row.get(cols.total)) {
        Ok(total) => Some((disease.to_lowercase(), total)),
        Err(e) => {
            log::debug!("Dropping summary row for '{}': {}", disease, e);
            None
        }
    }
}

pub fn district_row<R: Rng + ?Sized>(
    row: Row,
    cols: &DistrictColumns,
    province: &str,
    rng: &mut R,
) -> Option<LocationRecord> {
    let Some(district) = cell_text(row.get(cols.district)) else {
        log::debug!("Dropping {} row: no district name", province);
        return None;
    };
    let (base_lat, base_lng) = province_base(province);
    Some(LocationRecord {
        location: format!("{}, {}", district, province),
        lat: base_lat + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
        lng: base_lng + rng.gen_range(-JITTER_DEGREES..=JITTER_DEGREES),
        cases: cell_count_or_zero(row.opt(cols.cases)),
        population: cell_count(row.opt(cols.population)).ok(),
        vaccinated: cell_count(row.opt(cols.vaccinated)).ok(),
        province: Some(province.to_string()),
    })
}

/// A dated point and, when the sheet has one, the lower-cased disease name.
pub fn series_row(row: Row, cols: &SeriesColumns) -> Option<(String, TrendPoint)> {
    let Some(date) = cell_date(row.get(cols.date)) else {
        log::debug!("Dropping series row: invalid date {:?}", row.get(cols.date));
        return None;
    };
    let disease = match &cols.name {
        SeriesName::Column(idx) => match cell_text(row.get(*idx)) {
            Some(name) => name.to_lowercase(),
            None => {
                log::debug!("Dropping series row dated {}: no disease name", date);
                return None;
            }
        },
        SeriesName::Fixed(name) => name.clone(),
    };
    Some((
        disease,
        TrendPoint {
            date,
            cases: cell_count_or_zero(row.get(cols.cases)),
        },
    ))
}

pub fn location_row(row: Row, cols: &LocationColumns) -> Option<LocationRecord> {
    let name = cell_text(row.get(cols.location));
    let coords = (cell_f64(row.get(cols.lat)), cell_f64(row.get(cols.lng)));
    let (location, lat, lng) = match (name, coords) {
        (Some(location), (Some(lat), Some(lng))) => (location, lat, lng),
        (name, _) => {
            log::debug!(
                "Dropping location row '{}': needs a name and both coordinates",
                name.as_deref().unwrap_or("")
            );
            return None;
        }
    };
    Some(LocationRecord {
        location,
        lat,
        lng,
        cases: cell_count_or_zero(row.get(cols.cases)),
        population: cell_count(row.opt(cols.population)).ok(),
        vaccinated: cell_count(row.opt(cols.vaccinated)).ok(),
        province: cell_text(row.opt(cols.province)),
    })
}

pub fn alert_row(row: Row, cols: &AlertColumns, today: NaiveDate) -> Option<Alert> {
    let Some(message) = cell_text(row.get(cols.message)) else {
        log::debug!("Dropping alert row: blank message");
        return None;
    };
    Some(Alert {
        message,
        priority: cell_text(row.opt(cols.priority))
            .map(|p| Priority::parse(&p))
            .unwrap_or(Priority::Medium),
        date: cell_text(row.opt(cols.date))
            .unwrap_or_else(|| today.format("%Y-%m-%d").to_string()),
        location: cell_text(row.opt(cols.location)),
        case_count: cell_count(row.opt(cols.case_count)).ok(),
    })
}

/// Accumulates records from every sheet of one refresh.
#[derive(Debug, Clone)]
pub struct SnapshotBuilder {
    created: NaiveDateTime,
    national_summary: BTreeMap<String, u64>,
    disease_trends: BTreeMap<String, Vec<TrendPoint>>,
    map_data: Vec<LocationRecord>,
    alerts: Vec<Alert>,
}

impl SnapshotBuilder {
    pub fn new(created: NaiveDateTime) -> Self {
        SnapshotBuilder {
            created,
            national_summary: BTreeMap::new(),
            disease_trends: BTreeMap::new(),
            map_data: Vec::new(),
            alerts: Vec::new(),
        }
    }

    /// Classify `sheet` and fold its rows in. Returns the kind it was read as.
    pub fn absorb<R: Rng + ?Sized>(&mut self, sheet: &Sheet, rng: &mut R) -> SheetKind {
        let kind = classify(&sheet.name, &sheet.headers);
        log::info!("Processing sheet '{}' as {:?}", sheet.name, kind);
        let before = self.record_count();
        let map = ColumnMap::resolve(&sheet.headers);
        let rows = sheet.rows.iter().map(|cells| Row::new(cells));
        match &kind {
            SheetKind::NationalSummary => match SummaryColumns::resolve(&map) {
                Some(cols) => {
                    for (disease, total) in rows.filter_map(|row| summary_row(row, &cols)) {
                        self.national_summary.insert(disease, total);
                    }
                }
                None => missing_columns(sheet, "disease name and total"),
            },
            SheetKind::ProvinceDistrictTable(province) => {
                match DistrictColumns::resolve(&sheet.headers, &map) {
                    Some(cols) => self.map_data.extend(
                        rows.filter_map(|row| district_row(row, &cols, province, &mut *rng)),
                    ),
                    None => missing_columns(sheet, "district"),
                }
            }
            SheetKind::ConfirmedCases => {
                log::info!(
                    "Sheet '{}' holds confirmed cases; its layout is not mapped yet",
                    sheet.name
                );
            }
            SheetKind::GenericDiseaseSeries => match SeriesColumns::resolve(&sheet.headers, &map) {
                Some(cols) => self.absorb_series(rows.filter_map(|row| series_row(row, &cols))),
                None => missing_columns(sheet, "date and case count"),
            },
            SheetKind::LocationTable => match LocationColumns::resolve(&sheet.headers, &map) {
                Some(cols) => self
                    .map_data
                    .extend(rows.filter_map(|row| location_row(row, &cols))),
                None => missing_columns(sheet, "location, coordinates and case count"),
            },
            SheetKind::AlertTable => match AlertColumns::resolve(&map) {
                Some(cols) => {
                    let today = self.created.date();
                    self.alerts
                        .extend(rows.filter_map(|row| alert_row(row, &cols, today)));
                }
                None => missing_columns(sheet, "message"),
            },
            SheetKind::Unrecognized => {
                log::warn!("Skipping unrecognized sheet '{}'", sheet.name);
            }
        }
        let added = self.record_count().saturating_sub(before);
        let dropped = sheet.rows.len().saturating_sub(added);
        if dropped > 0 && kind != SheetKind::Unrecognized && kind != SheetKind::ConfirmedCases {
            log::debug!("Sheet '{}': {} rows contributed nothing", sheet.name, dropped);
        }
        kind
    }

    fn absorb_series(&mut self, points: impl Iterator<Item = (String, TrendPoint)>) {
        let mut grouped: BTreeMap<String, Vec<TrendPoint>> = BTreeMap::new();
        for (disease, point) in points {
            grouped.entry(disease).or_default().push(point);
        }
        for (disease, mut series) in grouped {
            series.sort_by_key(|p| p.date);
            self.disease_trends.insert(disease, series);
        }
    }

    fn record_count(&self) -> usize {
        self.national_summary.len()
            + self.disease_trends.values().map(Vec::len).sum::<usize>()
            + self.map_data.len()
            + self.alerts.len()
    }

    /// Freeze the records and derive the dashboard numbers from them.
    pub fn finish(self) -> Snapshot {
        let mut snapshot = Snapshot {
            last_updated: self.created,
            national_summary: self.national_summary,
            disease_trends: self.disease_trends,
            map_data: self.map_data,
            alerts: self.alerts,
            dashboard_stats: DashboardStats::default(),
        };
        snapshot.dashboard_stats = derive::dashboard_stats(&snapshot);
        snapshot
    }
}

fn missing_columns(sheet: &Sheet, what: &str) {
    log::warn!(
        "Sheet '{}' has no {} column(s); it contributes nothing",
        sheet.name,
        what
    );
}
