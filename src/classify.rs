//! Sheet classification and column sniffing.
//!
//! Both heuristics are data: an ordered table of sheet-name keywords and a
//! table of header keyword families, evaluated by [`matches`]. Nothing here
//! touches cell values.

use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SheetKind {
    NationalSummary,
    ProvinceDistrictTable(String),
    ConfirmedCases,
    GenericDiseaseSeries,
    LocationTable,
    AlertTable,
    Unrecognized,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SheetTarget {
    National,
    Province(&'static str),
    Confirmed,
    Series,
    Locations,
    Alerts,
}

impl SheetTarget {
    fn kind(self) -> SheetKind {
        match self {
            SheetTarget::National => SheetKind::NationalSummary,
            SheetTarget::Province(p) => SheetKind::ProvinceDistrictTable(p.to_string()),
            SheetTarget::Confirmed => SheetKind::ConfirmedCases,
            SheetTarget::Series => SheetKind::GenericDiseaseSeries,
            SheetTarget::Locations => SheetKind::LocationTable,
            SheetTarget::Alerts => SheetKind::AlertTable,
        }
    }
}

/// Evaluated top to bottom; the first row with a matching keyword decides.
/// "kp" is too short to match inside words, so it must start a word.
const SHEET_RULES: &[(&[&str], MatchMode, SheetTarget)] = &[
    (&["pakistan"], MatchMode::Substring, SheetTarget::National),
    (&["sindh"], MatchMode::Substring, SheetTarget::Province("Sindh")),
    (&["balochistan"], MatchMode::Substring, SheetTarget::Province("Balochistan")),
    (&["kp"], MatchMode::TokenPrefix, SheetTarget::Province("KP")),
    (&["confirmed"], MatchMode::Substring, SheetTarget::Confirmed),
    (&["alert"], MatchMode::Substring, SheetTarget::Alerts),
    (
        &["location", "map", "coordinate"],
        MatchMode::Substring,
        SheetTarget::Locations,
    ),
    (
        &["trend", "series", "daily", "weekly", "disease"],
        MatchMode::Substring,
        SheetTarget::Series,
    ),
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ColumnFamily {
    Date,
    CaseCount,
    Total,
    Disease,
    Location,
    Latitude,
    Longitude,
    Population,
    Vaccinated,
    Message,
    Priority,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchMode {
    /// keyword appears anywhere in the lower-cased header
    Substring,
    /// some word of the header starts with the keyword
    TokenPrefix,
}

struct ColumnRule {
    family: ColumnFamily,
    keywords: &'static [&'static str],
    mode: MatchMode,
}

const COLUMN_RULES: &[ColumnRule] = &[
    ColumnRule {
        family: ColumnFamily::Date,
        keywords: &["date"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::CaseCount,
        keywords: &["case", "count", "number"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::Total,
        keywords: &["total"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::Disease,
        keywords: &["disease", "malaria", "dengue", "respiratory"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::Location,
        keywords: &["district", "city", "location", "province"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::Latitude,
        keywords: &["lat"],
        mode: MatchMode::TokenPrefix,
    },
    ColumnRule {
        family: ColumnFamily::Longitude,
        keywords: &["lon", "lng"],
        mode: MatchMode::TokenPrefix,
    },
    ColumnRule {
        family: ColumnFamily::Population,
        keywords: &["population"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::Vaccinated,
        keywords: &["vaccinated", "immunized", "immunised"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::Message,
        keywords: &["alert", "message", "description"],
        mode: MatchMode::Substring,
    },
    ColumnRule {
        family: ColumnFamily::Priority,
        keywords: &["priority", "level", "severity"],
        mode: MatchMode::Substring,
    },
];

/// Case-insensitive keyword test used by both tables.
pub fn matches(text: &str, keywords: &[&str], mode: MatchMode) -> bool {
    let lower = text.to_lowercase();
    match mode {
        MatchMode::Substring => keywords.iter().any(|k| lower.contains(k)),
        MatchMode::TokenPrefix => lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|token| !token.is_empty())
            .any(|token| keywords.iter().any(|k| token.starts_with(k))),
    }
}

/// Index of the first header (in declared order) containing any keyword.
pub fn first_matching(headers: &[String], keywords: &[&str]) -> Option<usize> {
    headers
        .iter()
        .position(|h| matches(h, keywords, MatchMode::Substring))
}

/// Disease names that can appear inside a header, e.g. "Malaria cases".
pub const DISEASE_TOKENS: &[&str] = &["malaria", "dengue", "respiratory"];

/// The disease a header names, lower-cased, if it names one.
pub fn header_disease(header: &str) -> Option<&'static str> {
    let lower = header.to_lowercase();
    DISEASE_TOKENS.iter().copied().find(|d| lower.contains(d))
}

/// First column of `family` in header order, skipping the `exclude` indices.
pub fn find_column(headers: &[String], family: ColumnFamily, exclude: &[usize]) -> Option<usize> {
    let rule = COLUMN_RULES.iter().find(|rule| rule.family == family)?;
    headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !exclude.contains(idx))
        .find(|(_, h)| matches(h, rule.keywords, rule.mode))
        .map(|(idx, _)| idx)
}

/// Resolved position of every column family present in a header row.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColumnMap {
    columns: BTreeMap<ColumnFamily, usize>,
}

impl ColumnMap {
    /// The first matching header wins for each family.
    pub fn resolve(headers: &[String]) -> Self {
        let columns = COLUMN_RULES
            .iter()
            .filter_map(|rule| {
                headers
                    .iter()
                    .position(|h| matches(h, rule.keywords, rule.mode))
                    .map(|idx| (rule.family, idx))
            })
            .collect();
        ColumnMap { columns }
    }

    pub fn get(&self, family: ColumnFamily) -> Option<usize> {
        self.columns.get(&family).copied()
    }

    pub fn has(&self, family: ColumnFamily) -> bool {
        self.columns.contains_key(&family)
    }
}

/// Classify by sheet name, then by the header row when the name says nothing.
pub fn classify(name: &str, headers: &[String]) -> SheetKind {
    if let Some((_, _, target)) = SHEET_RULES
        .iter()
        .find(|(keywords, mode, _)| matches(name, keywords, *mode))
    {
        return target.kind();
    }
    let columns = ColumnMap::resolve(headers);
    if columns.has(ColumnFamily::Latitude) && columns.has(ColumnFamily::Longitude) {
        SheetKind::LocationTable
    } else if columns.has(ColumnFamily::Message) {
        SheetKind::AlertTable
    } else if columns.has(ColumnFamily::Date) && columns.has(ColumnFamily::CaseCount) {
        SheetKind::GenericDiseaseSeries
    } else {
        SheetKind::Unrecognized
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn classify_by_sheet_name() {
        let none = headers(&[]);
        assert_eq!(classify("Pakistan 2024", &none), SheetKind::NationalSummary);
        assert_eq!(
            classify("SINDH week 32", &none),
            SheetKind::ProvinceDistrictTable("Sindh".into())
        );
        assert_eq!(
            classify("Balochistan", &none),
            SheetKind::ProvinceDistrictTable("Balochistan".into())
        );
        assert_eq!(classify("KP", &none), SheetKind::ProvinceDistrictTable("KP".into()));
        assert_eq!(classify("confirmed cases", &none), SheetKind::ConfirmedCases);
        assert_eq!(classify("Alerts", &none), SheetKind::AlertTable);
        assert_eq!(classify("Map data", &none), SheetKind::LocationTable);
        assert_eq!(classify("Daily trend", &none), SheetKind::GenericDiseaseSeries);
        assert_eq!(classify("Sheet1", &none), SheetKind::Unrecognized);
    }

    #[test]
    fn kp_must_start_a_word() {
        assert_eq!(classify("KP districts", &[]), SheetKind::ProvinceDistrictTable("KP".into()));
        assert_eq!(classify("kpk-2024", &[]), SheetKind::ProvinceDistrictTable("KP".into()));
        assert_eq!(classify("Stockpile", &[]), SheetKind::Unrecognized);
        assert_eq!(classify("Backpack", &[]), SheetKind::Unrecognized);
    }

    #[test]
    fn find_column_skips_excluded_indices() {
        let cols = headers(&["Date", "Malaria cases", "Disease"]);
        assert_eq!(find_column(&cols, ColumnFamily::Disease, &[]), Some(1));
        assert_eq!(find_column(&cols, ColumnFamily::Disease, &[1]), Some(2));
        assert_eq!(find_column(&cols[..2], ColumnFamily::Disease, &[1]), None);
        assert_eq!(header_disease("Malaria cases"), Some("malaria"));
        assert_eq!(header_disease("Cases"), None);
    }

    #[test]
    fn national_rule_precedes_province_rules() {
        assert_eq!(classify("Pakistan incl. Sindh", &[]), SheetKind::NationalSummary);
    }

    #[test]
    fn unnamed_sheet_falls_back_to_headers() {
        assert_eq!(
            classify("Sheet1", &headers(&["City", "Latitude", "Longitude", "Cases"])),
            SheetKind::LocationTable
        );
        assert_eq!(
            classify("Sheet2", &headers(&["Message", "Severity"])),
            SheetKind::AlertTable
        );
        assert_eq!(
            classify("Sheet3", &headers(&["Report Date", "Case count"])),
            SheetKind::GenericDiseaseSeries
        );
        assert_eq!(
            classify("Sheet4", &headers(&["Foo", "Bar"])),
            SheetKind::Unrecognized
        );
    }

    #[test]
    fn first_matching_header_wins() {
        let map = ColumnMap::resolve(&headers(&[
            "Reported date",
            "Confirmed cases",
            "Case count",
            "District",
        ]));
        assert_eq!(map.get(ColumnFamily::Date), Some(0));
        assert_eq!(map.get(ColumnFamily::CaseCount), Some(1));
        assert_eq!(map.get(ColumnFamily::Location), Some(3));
        assert_eq!(map.get(ColumnFamily::Message), None);
    }

    #[test]
    fn population_is_not_a_latitude() {
        let map = ColumnMap::resolve(&headers(&["Population", "Lat", "Long", "Cases"]));
        assert_eq!(map.get(ColumnFamily::Latitude), Some(1));
        assert_eq!(map.get(ColumnFamily::Longitude), Some(2));
        assert_eq!(map.get(ColumnFamily::Population), Some(0));
    }

    #[test]
    fn keyword_matching_is_case_insensitive() {
        assert!(matches("Diseases ", &["disease"], MatchMode::Substring));
        assert!(matches("GPS_LNG", &["lng"], MatchMode::TokenPrefix));
        assert!(!matches("Translation", &["lat"], MatchMode::TokenPrefix));
        assert_eq!(first_matching(&headers(&["Province", "Districts "]), &["district"]), Some(1));
    }
}
