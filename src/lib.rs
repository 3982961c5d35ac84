#![forbid(unsafe_code)]
//! Wardroster — génération de roster clinique sur quinzaine.
//!
//! - Modèle de contraintes 0/1 par famille réglementaire (couverture,
//!   bande FTE, repos, verrous).
//! - Solveur exact branch-and-bound derrière un contrat substituable.
//! - Analytics de fatigue et verdict de conformité dérivés de la
//!   matrice publiée.
//! - Stockage fichiers (JSON/CSV), sans base de données.

pub mod analytics;
pub mod builder;
pub mod generate;
pub mod io;
pub mod matrix;
pub mod model;
pub mod solver;
pub mod storage;

pub use analytics::{
    compute_analytics, AnalyticsEntry, ComplianceSummary, ComplianceWarning, Overall, RestBreach,
};
pub use builder::{build_model, RosterModel};
pub use generate::{generate_roster, RosterError, RosterResult};
pub use matrix::{build_matrix, day_rosters, DayRoster, MatrixRow, RosterMatrix};
pub use model::{parse_lock_day, CycleConfig, Role, ShiftCode, ShiftType, StaffProfile};
pub use solver::{BinaryModel, BranchBoundSolver, Constraint, Sense, Solver, Verdict};
pub use storage::{JsonProfileStore, ProfileStore};
