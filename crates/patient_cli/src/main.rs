//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `patient_core` and `patient_api`
//!   linkage.
//! - Keep output deterministic apart from timestamps.
//!
//! Usage: `patient_cli [stats|export|sorted]` (default `stats`).

use patient_api::{ApiError, ApiSettings, PatientApi};

fn main() -> Result<(), ApiError> {
    println!("patient_core ping={}", patient_api::ping());
    println!("patient_core version={}", patient_api::core_version());

    // In-memory instance only; the snapshot file is never touched here.
    let api = PatientApi::new(ApiSettings::default())?;
    let loaded = api.sample_data_load();
    println!("{}", loaded.message);

    let command = std::env::args().nth(1).unwrap_or_else(|| "stats".to_string());
    let output = match command.as_str() {
        "export" => api.data_export().to_json()?,
        "sorted" => api.patients_sorted().to_json()?,
        _ => api.statistics().to_json()?,
    };
    println!("{output}");
    Ok(())
}
