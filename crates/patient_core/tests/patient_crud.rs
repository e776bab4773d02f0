use patient_core::{ActivityKind, Gender, ManagerError, PatientFields, PatientManager};

fn fields(name: &str, age: u32) -> PatientFields {
    PatientFields::new(name, age, Gender::Female, "Migraine")
        .with_contact_number("03009876543")
        .with_appointment_date("2024-01-16")
        .with_visit_notes("Recurring headaches")
}

#[test]
fn search_returns_submitted_fields() {
    let mut manager = PatientManager::new();
    let submitted = fields("Fatima Ali", 32);
    let added = manager.add_patient(submitted.clone()).unwrap();

    let found = manager.search_patient(added.patient_id).unwrap();
    assert_eq!(found.patient_id, added.patient_id);
    assert_eq!(found.fields, submitted);
}

#[test]
fn end_to_end_scenario_matches_counter_and_queue_rules() {
    let mut manager = PatientManager::new();

    assert_eq!(manager.add_patient(fields("Ann", 30)).unwrap().patient_id, 1001);
    assert_eq!(manager.add_patient(fields("Ben", 31)).unwrap().patient_id, 1002);

    let explicit = manager.add_patient_with_id(1005, fields("Eve", 40)).unwrap();
    assert_eq!(explicit.patient_id, 1005);
    assert_eq!(manager.add_patient(fields("Fay", 41)).unwrap().patient_id, 1006);

    manager.delete_patient(1001).unwrap();
    assert_eq!(manager.search_patient(1001), Err(ManagerError::NotFound(1001)));

    manager.enqueue_for_schedule(1002).unwrap();
    manager.enqueue_for_schedule(1005).unwrap();
    let processed = manager.process_next().unwrap();
    assert_eq!(processed.patient_id, 1002);

    let waiting = manager.waiting_list();
    assert_eq!(waiting.len(), 1);
    assert_eq!(waiting[0].patient_id, 1005);
    assert_eq!(waiting[0].position, 1);
}

#[test]
fn add_with_existing_id_is_rejected_without_side_effects() {
    let mut manager = PatientManager::new();
    let first = manager.add_patient(fields("Ann", 30)).unwrap();
    let activity_before = manager.activity_count();

    let err = manager
        .add_patient_with_id(first.patient_id, fields("Imposter", 50))
        .unwrap_err();
    assert_eq!(err, ManagerError::DuplicateId(first.patient_id));
    assert_eq!(manager.activity_count(), activity_before);
    assert_eq!(manager.list_all().len(), 1);
    assert_eq!(manager.search_patient(first.patient_id).unwrap().name(), "Ann");
}

#[test]
fn delete_removes_from_both_listings() {
    let mut manager = PatientManager::new();
    let a = manager.add_patient(fields("Ann", 30)).unwrap();
    let b = manager.add_patient(fields("Ben", 31)).unwrap();

    let removed = manager.delete_patient(a.patient_id).unwrap();
    assert_eq!(removed.patient_id, a.patient_id);

    assert!(manager.list_all().iter().all(|p| p.patient_id != a.patient_id));
    assert!(manager.list_sorted().iter().all(|p| p.patient_id != a.patient_id));
    assert!(!manager.contains(a.patient_id));
    assert!(manager.contains(b.patient_id));
    assert_eq!(
        manager.delete_patient(a.patient_id),
        Err(ManagerError::NotFound(a.patient_id))
    );
    manager.verify_consistency().unwrap();
}

#[test]
fn update_replaces_fields_and_is_visible_through_both_paths() {
    let mut manager = PatientManager::new();
    let added = manager.add_patient(fields("Ann", 30)).unwrap();

    let replacement = PatientFields::new("Ann Lee", 31, Gender::Other, "Asthma");
    let updated = manager
        .update_patient(added.patient_id, replacement.clone())
        .unwrap();
    assert_eq!(updated.fields, replacement);

    let via_index = manager.patient(added.patient_id).unwrap();
    assert_eq!(via_index.fields, replacement);
    let via_scan = manager
        .list_all()
        .into_iter()
        .find(|p| p.patient_id == added.patient_id)
        .unwrap();
    assert_eq!(via_scan.fields, replacement);
}

#[test]
fn update_unknown_id_is_not_found() {
    let mut manager = PatientManager::new();
    assert_eq!(
        manager.update_patient(4242, fields("Ann", 30)),
        Err(ManagerError::NotFound(4242))
    );
    assert_eq!(manager.activity_count(), 0);
}

#[test]
fn list_all_is_newest_first_and_list_sorted_is_ascending() {
    let mut manager = PatientManager::new();
    manager.add_patient_with_id(30, fields("C", 1)).unwrap();
    manager.add_patient_with_id(10, fields("A", 1)).unwrap();
    manager.add_patient_with_id(20, fields("B", 1)).unwrap();

    let all: Vec<u32> = manager.list_all().iter().map(|p| p.patient_id).collect();
    let sorted: Vec<u32> = manager.list_sorted().iter().map(|p| p.patient_id).collect();
    assert_eq!(all, vec![20, 10, 30]);
    assert_eq!(sorted, vec![10, 20, 30]);
}

#[test]
fn search_by_name_is_case_insensitive_substring() {
    let mut manager = PatientManager::new();
    manager.add_patient(fields("Ahmed Khan", 45)).unwrap();
    manager.add_patient(fields("Omar Farooq", 40)).unwrap();
    manager.add_patient(fields("Fatima Khan", 32)).unwrap();
    let activity_before = manager.activity_count();

    let hits: Vec<String> = manager
        .search_by_name("KHAN")
        .into_iter()
        .map(|p| p.fields.name)
        .collect();
    assert_eq!(hits, vec!["Fatima Khan".to_string(), "Ahmed Khan".to_string()]);
    assert!(manager.search_by_name("   ").is_empty());
    assert_eq!(manager.activity_count(), activity_before);
}

#[test]
fn each_operation_logs_its_kind() {
    let mut manager = PatientManager::new();
    let added = manager.add_patient(fields("Ann", 30)).unwrap();
    manager.search_patient(added.patient_id).unwrap();
    manager.update_patient(added.patient_id, fields("Anna", 30)).unwrap();
    manager.enqueue_for_schedule(added.patient_id).unwrap();
    manager.process_next().unwrap();
    manager.delete_patient(added.patient_id).unwrap();

    let kinds: Vec<ActivityKind> = manager
        .all_activities()
        .iter()
        .map(|entry| entry.action())
        .collect();
    assert_eq!(
        kinds,
        vec![
            ActivityKind::Delete,
            ActivityKind::Process,
            ActivityKind::Queue,
            ActivityKind::Update,
            ActivityKind::View,
            ActivityKind::Add,
        ]
    );
    let activities = manager.all_activities();
    let delete = &activities[0];
    assert_eq!(delete.patient_name(), "Anna");
    assert_eq!(delete.details(), "Patient record deleted");
}

#[test]
fn statistics_reflect_all_structures() {
    let mut manager = PatientManager::new();
    manager
        .add_patient(PatientFields::new("Ann", 30, Gender::Female, "Flu"))
        .unwrap();
    manager
        .add_patient(PatientFields::new("Ben", 31, Gender::Male, "Flu"))
        .unwrap();
    let cal = manager
        .add_patient(PatientFields::new("Cal", 32, Gender::Other, "Flu"))
        .unwrap();
    manager.enqueue_for_schedule(cal.patient_id).unwrap();

    let stats = manager.statistics();
    assert_eq!(stats.total_patients, 3);
    assert_eq!(stats.queue_size, 1);
    assert_eq!(stats.activity_count, 4);
    assert_eq!(stats.index_height, 2);
    assert_eq!(stats.next_id, 1004);
    assert_eq!(stats.gender_distribution.male, 1);
    assert_eq!(stats.gender_distribution.female, 1);
    assert_eq!(stats.gender_distribution.other, 1);
}
