//! Rebar labor norms by bar diameter.
//!
//! Finer bars take more hours per ton: there are more pieces to cut,
//! bend and tie for the same mass.

use serde::{Deserialize, Serialize};

/// One band of the diameter table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RebarNorm {
    /// Largest diameter covered by this band (mm).
    pub max_diameter_mm: u32,
    pub hours_per_t: f64,
}

/// Diameter bands sorted by `max_diameter_mm`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "RawBands")]
pub struct RebarNormTable {
    bands: Vec<RebarNorm>,
}

#[derive(Deserialize)]
struct RawBands {
    bands: Vec<RebarNorm>,
}

impl From<RawBands> for RebarNormTable {
    fn from(raw: RawBands) -> Self {
        Self::new(raw.bands)
    }
}

impl RebarNormTable {
    /// Builds a table; bands are sorted by diameter.
    pub fn new(mut bands: Vec<RebarNorm>) -> Self {
        bands.sort_by_key(|b| b.max_diameter_mm);
        Self { bands }
    }

    pub fn builtin() -> Self {
        Self::new(vec![
            RebarNorm { max_diameter_mm: 8, hours_per_t: 40.0 },
            RebarNorm { max_diameter_mm: 12, hours_per_t: 25.0 },
            RebarNorm { max_diameter_mm: 16, hours_per_t: 18.0 },
            RebarNorm { max_diameter_mm: 20, hours_per_t: 15.0 },
            RebarNorm { max_diameter_mm: 25, hours_per_t: 13.0 },
            RebarNorm { max_diameter_mm: 32, hours_per_t: 11.0 },
        ])
    }

    /// Hours per ton for a diameter: the first band that covers it, or the
    /// coarsest band for anything larger. 0 for an empty table.
    pub fn hours_per_t(&self, diameter_mm: u32) -> f64 {
        self.bands
            .iter()
            .find(|b| diameter_mm <= b.max_diameter_mm)
            .or_else(|| self.bands.last())
            .map(|b| b.hours_per_t)
            .unwrap_or(0.0)
    }

    pub fn bands(&self) -> &[RebarNorm] {
        &self.bands
    }
}

impl Default for RebarNormTable {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_band_lookup() {
        let t = RebarNormTable::builtin();
        assert!((t.hours_per_t(6) - 40.0).abs() < 1e-10);
        assert!((t.hours_per_t(8) - 40.0).abs() < 1e-10);
        assert!((t.hours_per_t(10) - 25.0).abs() < 1e-10);
        assert!((t.hours_per_t(32) - 11.0).abs() < 1e-10);
        assert!((t.hours_per_t(40) - 11.0).abs() < 1e-10);
    }

    #[test]
    fn test_finer_bars_cost_more() {
        let t = RebarNormTable::builtin();
        let mut prev = f64::INFINITY;
        for d in [6, 8, 10, 12, 14, 16, 20, 25, 28, 32] {
            let h = t.hours_per_t(d);
            assert!(h <= prev, "diameter {d}");
            prev = h;
        }
    }

    #[test]
    fn test_unsorted_input_is_sorted() {
        let t = RebarNormTable::new(vec![
            RebarNorm { max_diameter_mm: 20, hours_per_t: 15.0 },
            RebarNorm { max_diameter_mm: 10, hours_per_t: 30.0 },
        ]);
        assert!((t.hours_per_t(8) - 30.0).abs() < 1e-10);
        assert_eq!(t.bands()[0].max_diameter_mm, 10);
    }

    #[test]
    fn test_deserialized_bands_are_sorted() {
        let t: RebarNormTable = serde_json::from_str(
            r#"{"bands":[{"max_diameter_mm":20,"hours_per_t":15.0},{"max_diameter_mm":10,"hours_per_t":30.0}]}"#,
        )
        .unwrap();
        assert!((t.hours_per_t(8) - 30.0).abs() < 1e-10);
    }

    #[test]
    fn test_empty_table() {
        assert_eq!(RebarNormTable::new(Vec::new()).hours_per_t(12), 0.0);
    }
}
