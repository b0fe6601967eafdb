//! The simulation form outside the ticker field: defaults, amount
//! formatting and turning the filled-in form into a request.

pub mod defaults;
pub mod money;

use thiserror::Error;

use crate::api::types::SimulationRequest;

pub use defaults::FormDefaults;

/// Why the form cannot be submitted.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormError {
    #[error("Please select at least one simulation to run.")]
    NoSimulationSelected,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),
}

/// The free-text fields as currently typed.
#[derive(Debug, Clone, Copy)]
pub struct FormValues<'a> {
    pub start_date: &'a str,
    pub end_date: &'a str,
    pub initial_investment: &'a str,
    pub monthly_investment: &'a str,
}

impl FormValues<'_> {
    fn required(&self) -> [(&'static str, &str); 4] {
        [
            ("start_date", self.start_date),
            ("end_date", self.end_date),
            ("initial_investment", self.initial_investment),
            ("monthly_investment", self.monthly_investment),
        ]
    }
}

/// Validate the form and build the request.
///
/// The simulation selection is checked first, then the required fields in
/// form order. Amounts are sent without thousands separators.
pub fn build_request(
    values: &FormValues<'_>,
    simulations: Vec<String>,
    tickers: Vec<String>,
) -> Result<SimulationRequest, FormError> {
    if simulations.is_empty() {
        return Err(FormError::NoSimulationSelected);
    }

    if let Some((name, _)) = values
        .required()
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
    {
        return Err(FormError::MissingField(name));
    }

    Ok(SimulationRequest {
        start_date: values.start_date.trim().to_string(),
        end_date: values.end_date.trim().to_string(),
        initial_investment: money::strip_separators(values.initial_investment.trim()),
        monthly_investment: money::strip_separators(values.monthly_investment.trim()),
        simulations,
        tickers,
    })
}
