//! Moteur d'analytics de conformité : métriques de risque par personne
//! dérivées de la matrice, puis verdict d'ensemble.
//!
//! Fonction pure de (matrice, profils, config) — deux passages sur les
//! mêmes entrées produisent exactement les mêmes entrées d'analytics.

use serde::{Deserialize, Serialize};

use crate::matrix::RosterMatrix;
use crate::model::{CycleConfig, Role, ShiftType, StaffProfile};

/// Transition de repos insuffisant entre deux jours travaillés.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RestBreach {
    /// Index (base 0) du premier jour de la paire.
    pub day: usize,
    /// Étiquette "code->code", ex. "N->D".
    pub transition: String,
}

/// Métriques d'une personne sur le cycle. Jamais mutées après calcul.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsEntry {
    pub name: String,
    pub role: Role,
    pub shift_pref: ShiftType,
    pub fte: f64,
    pub weekend_count: usize,
    pub max_consecutive: usize,
    pub longest_off_streak: usize,
    pub has_two_day_break: bool,
    pub rest_breaches: Vec<RestBreach>,
    pub fatigue_score: u32,
    pub flexible_work: bool,
    pub swap_willing: bool,
    pub overtime_opt_in: bool,
    pub compliant: bool,
    pub notes: Vec<String>,
}

/// Verdict global : pass ssi toutes les entrées sont conformes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Overall {
    Pass,
    Attention,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComplianceWarning {
    pub name: String,
    pub issues: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComplianceSummary {
    pub overall: Overall,
    pub warnings: Vec<ComplianceWarning>,
}

/// Balaye chaque ligne de la matrice de gauche à droite et dérive les
/// métriques de risque. Les lignes sans profil connu sont ignorées.
/// Les entrées sont triées par séniorité de rôle puis par nom ; les
/// avertissements restent dans l'ordre des lignes.
pub fn compute_analytics(
    matrix: &RosterMatrix,
    profiles: &[StaffProfile],
    config: &CycleConfig,
) -> (Vec<AnalyticsEntry>, ComplianceSummary) {
    let mut analytics = Vec::new();
    let mut warnings = Vec::new();
    let mut overall_ok = true;

    for row in &matrix.rows {
        let Some(profile) = profiles.iter().find(|p| p.name == row.name) else {
            continue;
        };

        let weekend_count = row
            .codes
            .iter()
            .enumerate()
            .filter(|(idx, code)| config.is_weekend(*idx) && code.is_working())
            .count();

        let mut max_consecutive = 0usize;
        let mut current_consecutive = 0usize;
        let mut longest_off = 0usize;
        let mut current_off = 0usize;
        let mut rest_breaches = Vec::new();

        for (idx, code) in row.codes.iter().enumerate() {
            if !code.is_working() {
                current_consecutive = 0;
                current_off += 1;
                longest_off = longest_off.max(current_off);
            } else {
                current_consecutive += 1;
                max_consecutive = max_consecutive.max(current_consecutive);
                current_off = 0;
                if idx + 1 < row.codes.len() {
                    let next = row.codes[idx + 1];
                    if next.is_working() && config.is_banned_pair(*code, next) {
                        rest_breaches.push(RestBreach {
                            day: idx,
                            transition: format!("{code}->{next}"),
                        });
                    }
                }
            }
        }

        let two_day_break = longest_off >= 2;
        let consecutive_ok = max_consecutive <= 6;
        let rest_ok = rest_breaches.is_empty();
        let mut fatigue_score = 0u32;
        let mut notes = Vec::new();

        if !consecutive_ok {
            fatigue_score += 2;
            notes.push("More than six consecutive shifts".to_string());
        }
        if !rest_ok {
            fatigue_score += rest_breaches.len() as u32;
            notes.push("Turnaround breach (<10h) detected".to_string());
        }
        if weekend_count > 4 && !profile.flexible_work {
            fatigue_score += (weekend_count - 4) as u32;
            notes.push("High weekend workload".to_string());
        }
        if profile.fte >= 0.8 && !two_day_break && !profile.flexible_work {
            fatigue_score += 2;
            notes.push("Missing two consecutive days off".to_string());
        }

        let compliant =
            consecutive_ok && rest_ok && (profile.fte < 0.8 || two_day_break || profile.flexible_work);

        if !compliant {
            overall_ok = false;
            warnings.push(ComplianceWarning {
                name: row.name.clone(),
                issues: notes.clone(),
            });
        }

        analytics.push(AnalyticsEntry {
            name: row.name.clone(),
            role: profile.role,
            shift_pref: profile.shift_pref,
            fte: profile.fte,
            weekend_count,
            max_consecutive,
            longest_off_streak: longest_off,
            has_two_day_break: two_day_break,
            rest_breaches,
            fatigue_score,
            flexible_work: profile.flexible_work,
            swap_willing: profile.swap_willing,
            overtime_opt_in: profile.overtime_opt_in,
            compliant,
            notes,
        });
    }

    analytics.sort_by(|a, b| {
        a.role
            .rank()
            .cmp(&b.role.rank())
            .then_with(|| a.name.cmp(&b.name))
    });

    let summary = ComplianceSummary {
        overall: if overall_ok {
            Overall::Pass
        } else {
            Overall::Attention
        },
        warnings,
    };
    (analytics, summary)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::matrix::{MatrixRow, RosterMatrix};
    use crate::model::ShiftCode;

    fn profile(name: &str, role: Role, fte: f64, flexible: bool) -> StaffProfile {
        StaffProfile {
            name: name.into(),
            email: format!("{}@ward.example", name.to_lowercase()),
            role,
            fte,
            shift_pref: ShiftType::Am,
            max_nds: 2,
            soft_lock: None,
            hard_lock: None,
            flexible_work: flexible,
            swap_willing: true,
            overtime_opt_in: false,
            availability_notes: None,
            submitted_at: None,
        }
    }

    fn row(name: &str, codes: Vec<ShiftCode>) -> MatrixRow {
        MatrixRow {
            name: name.into(),
            codes,
        }
    }

    use ShiftCode::{Off, D, E, N};

    #[test]
    fn breaches_and_runs_are_detected() {
        // N->D au jour 0, sept jours travaillés d'affilée.
        let codes = vec![N, D, D, D, D, D, D, Off, Off, D, D, D, D, Off];
        let matrix = RosterMatrix {
            rows: vec![row("Ada", codes)],
        };
        let profiles = vec![profile("Ada", Role::Rn, 0.6, false)];
        let (entries, summary) = compute_analytics(&matrix, &profiles, &CycleConfig::default());

        let e = &entries[0];
        assert_eq!(e.max_consecutive, 7);
        assert_eq!(e.longest_off_streak, 2);
        assert!(e.has_two_day_break);
        assert_eq!(
            e.rest_breaches,
            vec![RestBreach {
                day: 0,
                transition: "N->D".into()
            }]
        );
        // +2 run trop long, +1 par rupture de repos.
        assert_eq!(e.fatigue_score, 3);
        assert!(!e.compliant);
        assert_eq!(
            e.notes,
            vec![
                "More than six consecutive shifts".to_string(),
                "Turnaround breach (<10h) detected".to_string(),
            ]
        );
        assert_eq!(summary.overall, Overall::Attention);
        assert_eq!(summary.warnings.len(), 1);
        assert_eq!(summary.warnings[0].name, "Ada");
    }

    #[test]
    fn missing_two_day_break_penalizes_high_fte() {
        // Aucune paire de jours OFF consécutifs, runs courts, zéro rupture.
        let codes = vec![D, D, D, D, D, Off, D, D, D, D, D, Off, D, D];
        let matrix = RosterMatrix {
            rows: vec![row("Ada", codes)],
        };
        let profiles = vec![profile("Ada", Role::Rn, 1.0, false)];
        let (entries, summary) = compute_analytics(&matrix, &profiles, &CycleConfig::default());

        let e = &entries[0];
        assert_eq!(e.max_consecutive, 5);
        assert!(!e.has_two_day_break);
        assert!(e.rest_breaches.is_empty());
        assert!(!e.compliant);
        assert!(e.fatigue_score >= 2);
        assert_eq!(e.notes, vec!["Missing two consecutive days off".to_string()]);
        assert_eq!(summary.overall, Overall::Attention);
    }

    #[test]
    fn flexible_work_waives_break_and_weekend_penalties() {
        let codes = vec![D, D, D, D, D, Off, D, D, D, D, D, Off, D, D];
        let matrix = RosterMatrix {
            rows: vec![row("Ada", codes)],
        };
        let profiles = vec![profile("Ada", Role::Rn, 1.0, true)];
        let (entries, _) = compute_analytics(&matrix, &profiles, &CycleConfig::default());
        assert!(entries[0].compliant);
        assert_eq!(entries[0].fatigue_score, 0);
    }

    #[test]
    fn weekend_overload_counts_above_four() {
        // Travaille les 4 jours de week-end + en déborde... il faut > 4 :
        // avec les index par défaut {5,6,12,13}, 4 est le maximum, donc on
        // élargit la config pour exercer la pénalité.
        let config = CycleConfig {
            weekend_indexes: vec![0, 1, 5, 6, 12, 13],
            ..CycleConfig::default()
        };
        let codes = vec![D, D, D, D, Off, E, E, Off, Off, D, D, D, E, E];
        let matrix = RosterMatrix {
            rows: vec![row("Ada", codes)],
        };
        let profiles = vec![profile("Ada", Role::Rn, 0.6, false)];
        let (entries, _) = compute_analytics(&matrix, &profiles, &config);
        let e = &entries[0];
        assert_eq!(e.weekend_count, 6);
        assert_eq!(e.fatigue_score, 2);
        assert_eq!(e.notes, vec!["High weekend workload".to_string()]);
        // Week-end chargé pèse sur la fatigue mais pas sur la conformité.
        assert!(e.compliant);
    }

    #[test]
    fn entries_sorted_by_role_then_name_unknown_last() {
        let off_row = vec![Off; 14];
        let matrix = RosterMatrix {
            rows: vec![
                row("Zoe", off_row.clone()),
                row("Ada", off_row.clone()),
                row("Mia", off_row.clone()),
                row("Sam", off_row),
            ],
        };
        let profiles = vec![
            profile("Zoe", Role::Rn, 0.6, false),
            profile("Ada", Role::Rn, 0.6, false),
            profile("Mia", Role::Anum, 0.6, false),
            profile("Sam", Role::Unknown, 0.6, false),
        ];
        let (entries, _) = compute_analytics(&matrix, &profiles, &CycleConfig::default());
        let names: Vec<&str> = entries.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Mia", "Ada", "Zoe", "Sam"]);
    }

    #[test]
    fn rows_without_profile_are_skipped() {
        let matrix = RosterMatrix {
            rows: vec![row("Ghost", vec![Off; 14])],
        };
        let (entries, summary) = compute_analytics(&matrix, &[], &CycleConfig::default());
        assert!(entries.is_empty());
        assert_eq!(summary.overall, Overall::Pass);
    }

    #[test]
    fn analytics_is_idempotent() {
        let codes = vec![D, N, D, Off, E, E, N, Off, Off, D, D, D, D, Off];
        let matrix = RosterMatrix {
            rows: vec![row("Ada", codes)],
        };
        let profiles = vec![profile("Ada", Role::Rn, 0.8, false)];
        let config = CycleConfig::default();
        let first = compute_analytics(&matrix, &profiles, &config);
        let second = compute_analytics(&matrix, &profiles, &config);
        assert_eq!(first, second);
    }
}
