//! Built-in demo records used by `PatientManager::load_sample_data`.

use crate::model::patient::{Gender, PatientFields};

/// Five fixed demo patients, in load order.
pub fn sample_patients() -> Vec<PatientFields> {
    [
        ("Ahmed Khan", 45, Gender::Male, "Diabetes", "03001234567", "2024-01-15", "Regular checkup"),
        ("Fatima Ali", 32, Gender::Female, "Migraine", "03009876543", "2024-01-16", "Recurring headaches"),
        ("Muhammad Hassan", 28, Gender::Male, "Flu", "03005551234", "2024-01-17", "Seasonal flu symptoms"),
        ("Ayesha Siddiqui", 55, Gender::Female, "Hypertension", "03007778899", "2024-01-18", "Blood pressure monitoring"),
        ("Omar Farooq", 40, Gender::Male, "Back Pain", "03003334455", "2024-01-19", "Lower back pain"),
    ]
    .into_iter()
    .map(|(name, age, gender, disease, contact, date, notes)| {
        PatientFields::new(name, age, gender, disease)
            .with_contact_number(contact)
            .with_appointment_date(date)
            .with_visit_notes(notes)
    })
    .collect()
}
