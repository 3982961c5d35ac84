//! Assemblage du verdict solveur en roster par jour puis en matrice
//! par personne (14 codes D/E/N/OFF).

use serde::{Deserialize, Serialize};

use crate::builder::RosterModel;
use crate::model::{ShiftCode, StaffProfile, SHIFT_TYPES};

/// Affectations d'une journée, listes de noms par type de poste.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayRoster {
    /// Jour 1..=days (base 1 côté contrat de sortie).
    pub day: usize,
    #[serde(rename = "AM")]
    pub am: Vec<String>,
    #[serde(rename = "PM")]
    pub pm: Vec<String>,
    #[serde(rename = "ND")]
    pub nd: Vec<String>,
}

/// Ligne de matrice : une personne, un code par jour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MatrixRow {
    pub name: String,
    pub codes: Vec<ShiftCode>,
}

/// Vue dérivée du roster : ordre des lignes = noms fournis, puis noms
/// rencontrés dans l'assignation seulement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RosterMatrix {
    pub rows: Vec<MatrixRow>,
}

impl RosterMatrix {
    pub fn row(&self, name: &str) -> Option<&MatrixRow> {
        self.rows.iter().find(|r| r.name == name)
    }

    fn row_mut_or_default(&mut self, name: &str, days: usize) -> &mut MatrixRow {
        if let Some(pos) = self.rows.iter().position(|r| r.name == name) {
            return &mut self.rows[pos];
        }
        self.rows.push(MatrixRow {
            name: name.to_string(),
            codes: vec![ShiftCode::Off; days],
        });
        self.rows.last_mut().expect("row just pushed")
    }
}

/// Décode l'assignation binaire en listes de noms jour par jour.
pub fn day_rosters(
    model: &RosterModel,
    profiles: &[StaffProfile],
    assignment: &[bool],
) -> Vec<DayRoster> {
    let mut roster = Vec::with_capacity(model.days);
    for d in 0..model.days {
        let mut entry = DayRoster {
            day: d + 1,
            am: Vec::new(),
            pm: Vec::new(),
            nd: Vec::new(),
        };
        for (i, profile) in profiles.iter().enumerate() {
            for (k, _) in SHIFT_TYPES.iter().enumerate() {
                if assignment[model.var(i, d, k)] {
                    match k {
                        0 => entry.am.push(profile.name.clone()),
                        1 => entry.pm.push(profile.name.clone()),
                        _ => entry.nd.push(profile.name.clone()),
                    }
                }
            }
        }
        roster.push(entry);
    }
    roster
}

/// Construit la matrice : tout à OFF, puis chaque affectation écrit son
/// code. Un nom absent de la liste fournie est admis avec une ligne
/// par défaut — garde-fou contre les écarts d'index entre optimisation
/// et rendu.
pub fn build_matrix(roster: &[DayRoster], names: &[String], days: usize) -> RosterMatrix {
    let mut matrix = RosterMatrix::default();
    for name in names {
        matrix.row_mut_or_default(name, days);
    }
    for (day_index, entry) in roster.iter().enumerate() {
        for (list, code) in [
            (&entry.am, ShiftCode::D),
            (&entry.pm, ShiftCode::E),
            (&entry.nd, ShiftCode::N),
        ] {
            for name in list {
                matrix.row_mut_or_default(name, days).codes[day_index] = code;
            }
        }
    }
    matrix
}
