use patient_core::{
    ActivityKind, Gender, ManagerError, Patient, PatientFields, PatientManager, Snapshot,
    SnapshotError,
};

#[test]
fn sample_data_adds_five_patients_with_one_log_entry() {
    let mut manager = PatientManager::new();
    let added = manager.load_sample_data().unwrap();

    assert_eq!(added.len(), 5);
    assert_eq!(added[0].patient_id, 1001);
    assert_eq!(added[0].name(), "Ahmed Khan");
    assert_eq!(manager.next_id(), 1006);
    assert_eq!(manager.activity_count(), 1);

    let entry = manager.last_activity().unwrap();
    assert_eq!(entry.action(), ActivityKind::Sample);
    assert_eq!(entry.patient_id(), 0);
    assert_eq!(entry.patient_name(), "System");
    assert_eq!(entry.details(), "Loaded 5 sample patients");

    let stats = manager.statistics();
    assert_eq!(stats.gender_distribution.male, 3);
    assert_eq!(stats.gender_distribution.female, 2);
    manager.verify_consistency().unwrap();
}

#[test]
fn clear_resets_structures_and_counter_but_keeps_log() {
    let mut manager = PatientManager::new();
    manager.load_sample_data().unwrap();
    manager.enqueue_for_schedule(1001).unwrap();

    assert_eq!(manager.clear_all(), 5);
    assert!(manager.list_all().is_empty());
    assert!(manager.list_sorted().is_empty());
    assert_eq!(manager.queue_len(), 0);
    assert_eq!(manager.next_id(), 1001);
    assert_eq!(manager.statistics().index_height, 0);
    assert_eq!(
        manager.last_activity().map(|entry| entry.action()),
        Some(ActivityKind::Clear)
    );
    assert_eq!(manager.activity_count(), 3);

    assert_eq!(
        manager
            .add_patient(PatientFields::new("Ann", 30, Gender::Female, "Flu"))
            .unwrap()
            .patient_id,
        1001
    );
}

#[test]
fn snapshot_restore_rebuilds_store_and_index_in_listing_order() {
    let mut source = PatientManager::new();
    source.load_sample_data().unwrap();
    source
        .add_patient_with_id(2000, PatientFields::new("Late", 60, Gender::Other, "Gout"))
        .unwrap();
    source.delete_patient(1003).unwrap();
    let snapshot = source.snapshot();
    assert!(!snapshot.saved_at.is_empty());

    let mut target = PatientManager::new();
    target
        .add_patient(PatientFields::new("Temp", 20, Gender::Male, "Cold"))
        .unwrap();
    target.enqueue_for_schedule(1001).unwrap();

    let restored = target.restore_snapshot(snapshot).unwrap();
    assert_eq!(restored, 5);
    assert_eq!(target.list_all(), source.list_all());
    assert_eq!(target.list_sorted(), source.list_sorted());
    assert_eq!(target.next_id(), 2001);
    assert_eq!(target.queue_len(), 0);
    assert_eq!(
        target.last_activity().map(|entry| entry.action()),
        Some(ActivityKind::Load)
    );
    target.verify_consistency().unwrap();
}

#[test]
fn restore_fast_forwards_stale_counter() {
    let snapshot = Snapshot {
        patients: vec![Patient::new(
            1500,
            PatientFields::new("Ann", 30, Gender::Female, "Flu"),
        )],
        next_id: 1001,
        saved_at: String::new(),
    };

    let mut manager = PatientManager::new();
    manager.restore_snapshot(snapshot).unwrap();
    assert_eq!(manager.next_id(), 1501);
}

#[test]
fn invalid_snapshot_leaves_state_untouched() {
    let mut manager = PatientManager::new();
    manager.load_sample_data().unwrap();
    let before = manager.list_all();
    let activity_before = manager.activity_count();

    let duplicate = Patient::new(7, PatientFields::new("Ann", 30, Gender::Female, "Flu"));
    let snapshot = Snapshot {
        patients: vec![duplicate.clone(), duplicate],
        next_id: 8,
        saved_at: String::new(),
    };

    assert_eq!(
        manager.restore_snapshot(snapshot),
        Err(ManagerError::Snapshot(SnapshotError::DuplicateId(7)))
    );
    assert_eq!(manager.list_all(), before);
    assert_eq!(manager.activity_count(), activity_before);
}
