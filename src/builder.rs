//! Traduction des profils en programme binaire.
//!
//! Huit familles de contraintes, toutes linéaires, calquées sur le
//! règlement de quinzaine : un poste par jour, couverture minimale,
//! bande FTE, plafond de charge glissant, plafond de nuits, verrous
//! durs et souples, transitions interdites. L'objectif ne pénalise que
//! les postes hors préférence. Le builder ne lève jamais : un système
//! insatisfiable ne se découvre qu'au verdict du solveur.

use crate::model::{parse_lock_day, CycleConfig, ShiftType, StaffProfile, SHIFT_TYPES};
use crate::solver::{BinaryModel, Sense};

/// Programme construit plus l'indexation (staff, jour, poste) → variable.
#[derive(Debug, Clone)]
pub struct RosterModel {
    pub program: BinaryModel,
    pub staff_count: usize,
    pub days: usize,
}

impl RosterModel {
    /// Index de la variable binaire x\[staff]\[day]\[shift].
    pub fn var(&self, staff: usize, day: usize, shift: usize) -> usize {
        (staff * self.days + day) * SHIFT_TYPES.len() + shift
    }
}

/// Cible FTE : nombre de postes attendu sur le cycle, arrondi.
pub(crate) fn fte_target(fte: f64, days: usize) -> usize {
    (fte * days as f64).round() as usize
}

/// Construit le modèle déclaratif complet pour un cycle.
pub fn build_model(profiles: &[StaffProfile], config: &CycleConfig) -> RosterModel {
    let n = profiles.len();
    let days = config.days;
    let shifts = SHIFT_TYPES.len();
    let mut program = BinaryModel::new(n * days * shifts);
    let var = |i: usize, d: usize, k: usize| (i * days + d) * shifts + k;

    // Un poste par jour et par personne, au plus.
    for i in 0..n {
        for d in 0..days {
            program.add_constraint((0..shifts).map(|k| var(i, d, k)).collect(), Sense::Le, 1);
        }
    }

    // Couverture : chaque poste de chaque jour est tenu par au moins une personne.
    for d in 0..days {
        for k in 0..shifts {
            program.add_constraint((0..n).map(|i| var(i, d, k)).collect(), Sense::Ge, 1);
        }
    }

    // Bande FTE ±1 : la marge garde le modèle faisable sous la pression
    // de la couverture et du repos.
    for (i, profile) in profiles.iter().enumerate() {
        let target = fte_target(profile.fte, days);
        let all: Vec<usize> = (0..days)
            .flat_map(|d| (0..shifts).map(move |k| var(i, d, k)))
            .collect();
        program.add_constraint(all.clone(), Sense::Ge, target.saturating_sub(1));
        program.add_constraint(all, Sense::Le, target + 1);
    }

    for (i, profile) in profiles.iter().enumerate() {
        // Plafond de charge sur toute fenêtre glissante de `window_days`,
        // pas seulement les semaines calendaires.
        if days >= config.window_days {
            for start in 0..=(days - config.window_days) {
                let window: Vec<usize> = (start..start + config.window_days)
                    .flat_map(|d| (0..shifts).map(move |k| var(i, d, k)))
                    .collect();
                program.add_constraint(window, Sense::Le, config.window_cap as usize);
            }
        }

        // Plafond de nuits déclaré par la personne.
        let nd = ShiftType::Nd.index();
        program.add_constraint(
            (0..days).map(|d| var(i, d, nd)).collect(),
            Sense::Le,
            profile.max_nds as usize,
        );

        // Verrou dur : journée rendue indisponible sans condition.
        // Un verrou non parseable est ignoré en silence, la contrainte
        // n'est simplement pas ajoutée.
        if let Some(day) = profile
            .hard_lock
            .as_deref()
            .and_then(|raw| parse_lock_day(raw, days))
        {
            program.add_constraint((0..shifts).map(|k| var(i, day, k)).collect(), Sense::Eq, 0);
        }

        // Verrou souple : formulé en ≤ 0, donc en pratique aussi absolu
        // que le dur. Comportement littéral conservé, voir DESIGN.md.
        if let Some(day) = profile
            .soft_lock
            .as_deref()
            .and_then(|raw| parse_lock_day(raw, days))
        {
            program.add_constraint((0..shifts).map(|k| var(i, day, k)).collect(), Sense::Le, 0);
        }

        // Repos minimal entre types de postes : paires interdites sur
        // deux jours consécutifs.
        for d in 0..days.saturating_sub(1) {
            for s1 in SHIFT_TYPES {
                for s2 in SHIFT_TYPES {
                    if config.is_banned_pair(s1.code(), s2.code()) {
                        program.add_constraint(
                            vec![var(i, d, s1.index()), var(i, d + 1, s2.index())],
                            Sense::Le,
                            1,
                        );
                    }
                }
            }
        }
    }

    // Objectif secondaire : minimiser les postes hors préférence.
    for (i, profile) in profiles.iter().enumerate() {
        for d in 0..days {
            for (k, shift) in SHIFT_TYPES.iter().enumerate() {
                if *shift != profile.shift_pref {
                    program.set_cost(var(i, d, k), 1);
                }
            }
        }
    }

    RosterModel {
        program,
        staff_count: n,
        days,
    }
}
