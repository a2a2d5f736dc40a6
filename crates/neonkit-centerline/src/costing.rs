//! Cost estimates derived from measured lengths.

use serde::{Deserialize, Serialize};

use crate::measurement::TextMeasurement;

/// Pricing inputs for a sign job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostRates {
    /// Currency symbol or code shown next to amounts.
    pub currency: String,
    pub led_cost_per_meter: f64,
    pub fab_cost_per_mm: f64,
    /// Flat cost added once per job.
    pub setup_cost: f64,
}

impl Default for CostRates {
    fn default() -> Self {
        Self {
            currency: "R".to_string(),
            led_cost_per_meter: 120.0,
            fab_cost_per_mm: 0.15,
            setup_cost: 250.0,
        }
    }
}

impl CostRates {
    /// LED strip cost for a run of `length_mm`.
    pub fn led_cost(&self, length_mm: f64) -> f64 {
        length_mm / 1000.0 * self.led_cost_per_meter
    }

    pub fn fabrication_cost(&self, length_mm: f64) -> f64 {
        length_mm * self.fab_cost_per_mm
    }

    /// Amount with two decimals and the currency prefix.
    pub fn format(&self, amount: f64) -> String {
        format!("{} {:.2}", self.currency, amount)
    }
}

/// Cost of one character.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LetterCost {
    pub character: char,
    pub length_mm: f64,
    pub led_cost: f64,
    pub fabrication_cost: f64,
    pub total: f64,
}

/// Costs of a whole measured text.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CostEstimate {
    pub currency: String,
    pub letters: Vec<LetterCost>,
    pub length_mm: f64,
    pub word_total: f64,
    pub setup_cost: f64,
    pub job_total: f64,
}

impl CostEstimate {
    pub fn from_measurement(measurement: &TextMeasurement, rates: &CostRates) -> Self {
        let letters: Vec<LetterCost> = measurement
            .characters()
            .iter()
            .map(|c| {
                let led_cost = rates.led_cost(c.length_mm);
                let fabrication_cost = rates.fabrication_cost(c.length_mm);
                LetterCost {
                    character: c.character,
                    length_mm: c.length_mm,
                    led_cost,
                    fabrication_cost,
                    total: led_cost + fabrication_cost,
                }
            })
            .collect();

        let word_total = letters.iter().map(|l| l.total).sum::<f64>();
        Self {
            currency: rates.currency.clone(),
            letters,
            length_mm: measurement.total_mm(),
            word_total,
            setup_cost: rates.setup_cost,
            job_total: word_total + rates.setup_cost,
        }
    }
}
