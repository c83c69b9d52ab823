//! CSV export of run trajectories.

use std::fmt::Write as _;
use std::path::Path;

use fw_sim::SampleSeries;

use crate::error::AppResult;

/// Render a series as CSV with a header row.
///
/// Columns are `time_s,omega,tau`, plus `omega_fuzzy,tau_fuzzy` for a
/// comparison run.
pub fn series_to_csv(series: &SampleSeries) -> String {
    let mut csv = match series.fuzzy {
        Some(_) => String::from("time_s,omega,tau,omega_fuzzy,tau_fuzzy\n"),
        None => String::from("time_s,omega,tau\n"),
    };
    for i in 0..series.len() {
        let _ = write!(
            csv,
            "{},{},{}",
            series.time[i], series.pid.omega[i], series.pid.tau[i]
        );
        if let Some(fuzzy) = &series.fuzzy {
            let _ = write!(csv, ",{},{}", fuzzy.omega[i], fuzzy.tau[i]);
        }
        csv.push('\n');
    }
    csv
}

pub fn write_csv(path: &Path, series: &SampleSeries) -> AppResult<()> {
    std::fs::write(path, series_to_csv(series))?;
    Ok(())
}
