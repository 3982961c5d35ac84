#![forbid(unsafe_code)]
//! Dépôt JSON et imports/exports fichiers.

use std::fs;

use wardroster::{
    io::{export_matrix_csv, import_profiles_csv},
    matrix::{MatrixRow, RosterMatrix},
    model::{CycleConfig, Role, ShiftCode, ShiftType, StaffProfile},
    storage::{JsonProfileStore, ProfileStore},
    AnalyticsEntry,
};

fn profile(name: &str) -> StaffProfile {
    StaffProfile {
        name: name.into(),
        email: format!("{}@ward.example", name.to_lowercase()),
        role: Role::Rn,
        fte: 0.8,
        shift_pref: ShiftType::Am,
        max_nds: 2,
        soft_lock: None,
        hard_lock: Some("5 Nov".into()),
        flexible_work: false,
        swap_willing: true,
        overtime_opt_in: true,
        availability_notes: Some("prefers week one".into()),
        submitted_at: None,
    }
}

#[test]
fn json_store_roundtrip() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("profiles.json");
    let store = JsonProfileStore::open(&path).expect("open store");

    let profiles = vec![profile("Ada"), profile("Bea")];
    store.save(&profiles).expect("save");
    let loaded = store.load().expect("load");
    assert_eq!(loaded, profiles);

    // Le champ maxNDs garde son nom de contrat sur disque.
    let raw = fs::read_to_string(&path).expect("read raw json");
    assert!(raw.contains("\"maxNDs\": 2"));
    assert!(raw.contains("\"hardLock\": \"5 Nov\""));
}

#[test]
fn loading_a_missing_store_fails_with_context() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = JsonProfileStore::open(dir.path().join("absent.json")).expect("open store");
    let err = store.load().expect_err("missing file");
    assert!(err.to_string().contains("absent.json"));
}

#[test]
fn csv_import_parses_locks_and_flags() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("intake.csv");
    fs::write(
        &path,
        "name,email,role,fte,shiftPref,maxNDs,softLock,hardLock,flexibleWork,swapWilling,overtimeOptIn\n\
         Ada,ada@ward.example,ANUM,0.8,AM,2,,5 Nov,yes,no,1\n\
         Bea,bea@ward.example,rn,0.6,nd,3,12 Dec,,,,\n",
    )
    .expect("write csv");

    let profiles = import_profiles_csv(&path, &CycleConfig::default()).expect("import");
    assert_eq!(profiles.len(), 2);

    let ada = &profiles[0];
    assert_eq!(ada.role, Role::Anum);
    assert_eq!(ada.hard_lock.as_deref(), Some("5 Nov"));
    assert_eq!(ada.soft_lock, None);
    assert!(ada.flexible_work);
    assert!(!ada.swap_willing);
    assert!(ada.overtime_opt_in);
    assert!(ada.submitted_at.is_some());

    let bea = &profiles[1];
    assert_eq!(bea.role, Role::Rn);
    assert_eq!(bea.shift_pref, ShiftType::Nd);
    assert_eq!(bea.soft_lock.as_deref(), Some("12 Dec"));
    // Colonnes booléennes absentes : défauts du modèle.
    assert!(!bea.flexible_work);
    assert!(bea.swap_willing);
    assert!(!bea.overtime_opt_in);
}

#[test]
fn csv_import_rejects_invalid_rows() {
    let dir = tempfile::tempdir().expect("tempdir");
    let config = CycleConfig::default();

    let bad_fte = dir.path().join("bad_fte.csv");
    fs::write(
        &bad_fte,
        "name,email,role,fte,shiftPref,maxNDs\nAda,ada@ward.example,RN,0.5,AM,2\n",
    )
    .expect("write csv");
    let err = import_profiles_csv(&bad_fte, &config).expect_err("0.5 is not a valid FTE");
    assert!(err.to_string().contains("Ada"));

    let bad_pref = dir.path().join("bad_pref.csv");
    fs::write(
        &bad_pref,
        "name,email,role,fte,shiftPref,maxNDs\nAda,ada@ward.example,RN,0.8,NIGHTISH,2\n",
    )
    .expect("write csv");
    assert!(import_profiles_csv(&bad_pref, &config).is_err());

    let bad_lock = dir.path().join("bad_lock.csv");
    fs::write(
        &bad_lock,
        "name,email,role,fte,shiftPref,maxNDs,softLock\nAda,ada@ward.example,RN,0.8,AM,2,St Crispin\n",
    )
    .expect("write csv");
    assert!(import_profiles_csv(&bad_lock, &config).is_err());
}

#[test]
fn matrix_csv_export_joins_analytics() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("roster.csv");

    let matrix = RosterMatrix {
        rows: vec![MatrixRow {
            name: "Ada".into(),
            codes: vec![
                ShiftCode::D,
                ShiftCode::D,
                ShiftCode::Off,
                ShiftCode::N,
                ShiftCode::Off,
            ],
        }],
    };
    let analytics = vec![AnalyticsEntry {
        name: "Ada".into(),
        role: Role::Anum,
        shift_pref: ShiftType::Am,
        fte: 0.8,
        weekend_count: 0,
        max_consecutive: 2,
        longest_off_streak: 1,
        has_two_day_break: false,
        rest_breaches: vec![],
        fatigue_score: 2,
        flexible_work: false,
        swap_willing: true,
        overtime_opt_in: false,
        compliant: false,
        notes: vec!["Missing two consecutive days off".into()],
    }];

    export_matrix_csv(&path, &matrix, &analytics).expect("export");
    let raw = fs::read_to_string(&path).expect("read csv");
    let mut lines = raw.lines();
    assert_eq!(
        lines.next(),
        Some("role,name,compliance,fatigue,day1,day2,day3,day4,day5")
    );
    assert_eq!(
        lines.next(),
        Some("ANUM,Ada,Missing two consecutive days off,2,D,D,OFF,N,OFF")
    );
    assert_eq!(lines.next(), None);
}
