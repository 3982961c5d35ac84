//! Pipeline de génération : profils → modèle → solveur → matrice →
//! analytics → résultat. Calcul synchrone et sans état ; toutes les
//! structures intermédiaires sont locales à l'appel.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::analytics::{compute_analytics, AnalyticsEntry, ComplianceSummary};
use crate::builder::build_model;
use crate::matrix::{build_matrix, day_rosters, DayRoster};
use crate::model::{CycleConfig, StaffProfile};
use crate::solver::{Solver, Verdict};

/// Erreurs d'usage, distinctes d'un modèle infaisable.
#[derive(Error, Debug)]
pub enum RosterError {
    /// Précondition : pas de modèle sans personnel.
    #[error("no staff profiles supplied for this cycle")]
    NoProfiles,
    /// Budget du solveur épuisé avant preuve — ni faisable ni infaisable.
    #[error("solver budget exhausted before reaching a verdict")]
    SolverBudget,
}

/// Résultat d'une génération. L'infaisabilité est un résultat de
/// premier ordre : l'appelant branche sur `status`, pas sur une erreur.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum RosterResult {
    Valid {
        roster: Vec<DayRoster>,
        analytics: Vec<AnalyticsEntry>,
        compliance: ComplianceSummary,
    },
    Infeasible {
        message: String,
    },
}

impl RosterResult {
    pub fn is_valid(&self) -> bool {
        matches!(self, RosterResult::Valid { .. })
    }
}

/// Génère un roster complet pour un cycle. Aucun retry : chaque issue
/// remonte immédiatement, jamais de résultat partiel.
pub fn generate_roster<S: Solver>(
    profiles: &[StaffProfile],
    config: &CycleConfig,
    solver: &S,
) -> Result<RosterResult, RosterError> {
    if profiles.is_empty() {
        return Err(RosterError::NoProfiles);
    }

    let model = build_model(profiles, config);
    match solver.solve(&model.program) {
        Verdict::Infeasible => Ok(RosterResult::Infeasible {
            message: "No feasible roster with current constraints".to_string(),
        }),
        Verdict::BudgetExhausted => Err(RosterError::SolverBudget),
        Verdict::Optimal { assignment, .. } => {
            let roster = day_rosters(&model, profiles, &assignment);
            let names: Vec<String> = profiles.iter().map(|p| p.name.clone()).collect();
            let matrix = build_matrix(&roster, &names, config.days);
            let (analytics, compliance) = compute_analytics(&matrix, profiles, config);
            Ok(RosterResult::Valid {
                roster,
                analytics,
                compliance,
            })
        }
    }
}
