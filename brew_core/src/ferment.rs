//! Fermentation schedule steps and their recipe XML form.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unknown temperature unit {0:?} (expected C or F)")]
pub struct UnknownUnit(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FermentKind {
    Primary,
    Secondary,
    Clearing,
    Ageing,
}

impl FermentKind {
    pub const ALL: [FermentKind; 4] = [
        FermentKind::Primary,
        FermentKind::Secondary,
        FermentKind::Clearing,
        FermentKind::Ageing,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            FermentKind::Primary => "Primary",
            FermentKind::Secondary => "Secondary",
            FermentKind::Clearing => "Clearing",
            FermentKind::Ageing => "Ageing",
        }
    }

    /// Position in the schedule order.
    pub fn index(self) -> usize {
        self as usize
    }

    /// Case-insensitive lookup. Unknown names fall back to `Primary`.
    pub fn from_name(name: &str) -> Self {
        Self::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(name))
            .unwrap_or(FermentKind::Primary)
    }
}

impl fmt::Display for FermentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TempUnit {
    Celsius,
    Fahrenheit,
}

impl TempUnit {
    pub fn symbol(self) -> &'static str {
        match self {
            TempUnit::Celsius => "C",
            TempUnit::Fahrenheit => "F",
        }
    }
}

impl FromStr for TempUnit {
    type Err = UnknownUnit;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("C") {
            Ok(TempUnit::Celsius)
        } else if s.eq_ignore_ascii_case("F") {
            Ok(TempUnit::Fahrenheit)
        } else {
            Err(UnknownUnit(s.to_string()))
        }
    }
}

#[inline]
pub fn c_to_f(c: f64) -> f64 {
    c * 9.0 / 5.0 + 32.0
}

#[inline]
pub fn f_to_c(f: f64) -> f64 {
    (f - 32.0) * 5.0 / 9.0
}

#[derive(Debug, Clone, PartialEq)]
pub struct FermentStep {
    pub kind: FermentKind,
    /// Duration in days.
    pub time_days: i32,
    pub temp: f64,
    pub unit: TempUnit,
}

impl FermentStep {
    pub fn new(kind: FermentKind, time_days: i32, temp: f64, unit: TempUnit) -> Self {
        Self {
            kind,
            time_days,
            temp,
            unit,
        }
    }

    /// Re-express the temperature in `unit`. No-op when already there.
    pub fn convert_to(&mut self, unit: TempUnit) {
        if self.unit == unit {
            return;
        }
        self.temp = match unit {
            TempUnit::Fahrenheit => c_to_f(self.temp),
            TempUnit::Celsius => f_to_c(self.temp),
        };
        self.unit = unit;
    }

    pub fn time_mins(&self) -> i64 {
        i64::from(self.time_days) * 24 * 60
    }

    /// Schedule order: by kind, then by duration.
    pub fn schedule_cmp(&self, other: &Self) -> Ordering {
        self.kind
            .index()
            .cmp(&other.kind.index())
            .then(self.time_days.cmp(&other.time_days))
    }

    /// One `<ITEM>` block of a BeerXML-style fermentation list.
    pub fn to_xml(&self) -> String {
        let mut out = String::from("      <ITEM>\n");
        out.push_str(&format!("          <TYPE>{}</TYPE>\n", self.kind));
        out.push_str(&format!("          <TIME>{}</TIME>\n", self.time_days));
        out.push_str(&format!("          <TEMP>{:?}</TEMP>\n", self.temp));
        out.push_str(&format!("          <TEMPU>{}</TEMPU>\n", self.unit.symbol()));
        out.push_str("      </ITEM>\n");
        out
    }
}

pub fn sort_schedule(steps: &mut [FermentStep]) {
    steps.sort_by(FermentStep::schedule_cmp);
}

/// The whole schedule wrapped in `<FERMENTATION_STEPS>`.
pub fn ferment_schedule_xml(steps: &[FermentStep]) -> String {
    let mut out = String::from("    <FERMENTATION_STEPS>\n");
    for s in steps {
        out.push_str(&s.to_xml());
    }
    out.push_str("    </FERMENTATION_STEPS>\n");
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kind_lookup_is_case_insensitive_with_fallback() {
        assert_eq!(FermentKind::from_name("secondary"), FermentKind::Secondary);
        assert_eq!(FermentKind::from_name("AGEING"), FermentKind::Ageing);
        assert_eq!(FermentKind::from_name("lagering"), FermentKind::Primary);
        assert_eq!(FermentKind::Clearing.index(), 2);
    }

    #[test]
    fn convert_round_trips_and_skips_same_unit() {
        let mut s = FermentStep::new(FermentKind::Primary, 7, 20.0, TempUnit::Celsius);
        s.convert_to(TempUnit::Celsius);
        assert_eq!(s.temp, 20.0);
        s.convert_to(TempUnit::Fahrenheit);
        assert_eq!(s.unit, TempUnit::Fahrenheit);
        assert!((s.temp - 68.0).abs() < 1e-9);
        s.convert_to(TempUnit::Celsius);
        assert!((s.temp - 20.0).abs() < 1e-9);
    }

    #[test]
    fn time_in_minutes() {
        let s = FermentStep::new(FermentKind::Secondary, 14, 18.0, TempUnit::Celsius);
        assert_eq!(s.time_mins(), 14 * 24 * 60);
    }

    #[test]
    fn xml_item_layout() {
        let s = FermentStep::new(FermentKind::Primary, 7, 18.0, TempUnit::Celsius);
        assert_eq!(
            s.to_xml(),
            "      <ITEM>\n          <TYPE>Primary</TYPE>\n          <TIME>7</TIME>\n          <TEMP>18.0</TEMP>\n          <TEMPU>C</TEMPU>\n      </ITEM>\n"
        );
    }

    #[test]
    fn schedule_sorts_by_kind_then_time() {
        let mut steps = vec![
            FermentStep::new(FermentKind::Ageing, 30, 2.0, TempUnit::Celsius),
            FermentStep::new(FermentKind::Primary, 10, 18.0, TempUnit::Celsius),
            FermentStep::new(FermentKind::Primary, 3, 20.0, TempUnit::Celsius),
        ];
        sort_schedule(&mut steps);
        let order: Vec<_> = steps.iter().map(|s| (s.kind, s.time_days)).collect();
        assert_eq!(
            order,
            vec![
                (FermentKind::Primary, 3),
                (FermentKind::Primary, 10),
                (FermentKind::Ageing, 30)
            ]
        );
        let xml = ferment_schedule_xml(&steps);
        assert!(xml.starts_with("    <FERMENTATION_STEPS>\n"));
        assert_eq!(xml.matches("<ITEM>").count(), 3);
    }

    #[test]
    fn unit_parse() {
        assert_eq!("f".parse::<TempUnit>(), Ok(TempUnit::Fahrenheit));
        assert!("K".parse::<TempUnit>().is_err());
    }
}
