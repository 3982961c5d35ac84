use anyhow::{bail, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Rôle clinique, ordonné par séniorité (affichage et tri).
/// Les rôles inconnus trient en dernier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Anum,
    Cns,
    Rn,
    En,
    Gnp,
    #[serde(other)]
    Unknown,
}

impl Role {
    /// Rang de séniorité (0 = plus senior, inconnu en dernier).
    pub fn rank(self) -> usize {
        match self {
            Role::Anum => 0,
            Role::Cns => 1,
            Role::Rn => 2,
            Role::En => 3,
            Role::Gnp => 4,
            Role::Unknown => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Role::Anum => "ANUM",
            Role::Cns => "CNS",
            Role::Rn => "RN",
            Role::En => "EN",
            Role::Gnp => "GNP",
            Role::Unknown => "UNKNOWN",
        }
    }

    /// Parse tolérant (casse ignorée) ; tout le reste devient `Unknown`.
    pub fn parse(s: &str) -> Role {
        match s.trim().to_ascii_uppercase().as_str() {
            "ANUM" => Role::Anum,
            "CNS" => Role::Cns,
            "RN" => Role::Rn,
            "EN" => Role::En,
            "GNP" => Role::Gnp,
            _ => Role::Unknown,
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Les trois types de poste d'une journée.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum ShiftType {
    Am,
    Pm,
    Nd,
}

/// Ordre canonique AM, PM, ND — l'index sert d'identifiant de variable.
pub const SHIFT_TYPES: [ShiftType; 3] = [ShiftType::Am, ShiftType::Pm, ShiftType::Nd];

impl ShiftType {
    /// Code à une lettre utilisé dans la matrice publiée.
    pub fn code(self) -> ShiftCode {
        match self {
            ShiftType::Am => ShiftCode::D,
            ShiftType::Pm => ShiftCode::E,
            ShiftType::Nd => ShiftCode::N,
        }
    }

    pub fn index(self) -> usize {
        match self {
            ShiftType::Am => 0,
            ShiftType::Pm => 1,
            ShiftType::Nd => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ShiftType::Am => "AM",
            ShiftType::Pm => "PM",
            ShiftType::Nd => "ND",
        }
    }

    pub fn parse(s: &str) -> Option<ShiftType> {
        match s.trim().to_ascii_uppercase().as_str() {
            "AM" => Some(ShiftType::Am),
            "PM" => Some(ShiftType::Pm),
            "ND" => Some(ShiftType::Nd),
            _ => None,
        }
    }
}

impl std::fmt::Display for ShiftType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Code d'une cellule de la matrice : D/E/N ou OFF.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShiftCode {
    D,
    E,
    N,
    #[serde(rename = "OFF")]
    Off,
}

impl ShiftCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ShiftCode::D => "D",
            ShiftCode::E => "E",
            ShiftCode::N => "N",
            ShiftCode::Off => "OFF",
        }
    }

    pub fn is_working(self) -> bool {
        self != ShiftCode::Off
    }
}

impl std::fmt::Display for ShiftCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Profil d'un membre du personnel pour un cycle de roster.
/// Immuable le temps d'une génération ; la validation a lieu à l'ingestion,
/// jamais dans le builder ni dans les analytics.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StaffProfile {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub fte: f64,
    pub shift_pref: ShiftType,
    #[serde(rename = "maxNDs")]
    pub max_nds: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub soft_lock: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hard_lock: Option<String>,
    #[serde(default)]
    pub flexible_work: bool,
    #[serde(default = "default_true")]
    pub swap_willing: bool,
    #[serde(default)]
    pub overtime_opt_in: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub availability_notes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<DateTime<Utc>>,
}

fn default_true() -> bool {
    true
}

impl StaffProfile {
    /// Validation d'ingestion : le contrat de champs du stockage.
    /// Un verrou présent mais non parseable est refusé ici ; le builder, lui,
    /// reste tolérant (un verrou invalide y est simplement ignoré).
    pub fn validate(&self, config: &CycleConfig) -> Result<()> {
        if self.name.trim().is_empty() {
            bail!("name is required");
        }
        if self.email.len() < 5 || !self.email.contains('@') {
            bail!("valid email is required");
        }
        if self.role == Role::Unknown {
            bail!("role must be one of ANUM, CNS, RN, EN, GNP");
        }
        const VALID_FTES: [f64; 3] = [0.6, 0.8, 1.0];
        if !VALID_FTES.iter().any(|f| (f - self.fte).abs() < 1e-9) {
            bail!("FTE must be one of 0.6, 0.8, 1.0, got {}", self.fte);
        }
        if self.max_nds > 3 {
            bail!("max NDs must be 0-3, got {}", self.max_nds);
        }
        for (label, lock) in [("soft lock", &self.soft_lock), ("hard lock", &self.hard_lock)] {
            if let Some(raw) = lock {
                if !raw.trim().is_empty() && parse_lock_day(raw, config.days).is_none() {
                    bail!("{label} must start with a day number 1-{}", config.days);
                }
            }
        }
        Ok(())
    }
}

/// Constantes d'un cycle de roster, explicites pour rester testables
/// avec des longueurs alternatives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CycleConfig {
    /// Longueur du cycle en jours.
    pub days: usize,
    /// Indices (base 0) des samedis/dimanches du cycle.
    pub weekend_indexes: Vec<usize>,
    /// Paires (code, code suivant) interdites sur deux jours consécutifs.
    pub banned_pairs: Vec<(ShiftCode, ShiftCode)>,
    /// Taille de la fenêtre glissante de charge.
    pub window_days: usize,
    /// Nombre maximal de postes dans une fenêtre.
    pub window_cap: u32,
}

impl Default for CycleConfig {
    fn default() -> Self {
        Self {
            days: 14,
            weekend_indexes: vec![5, 6, 12, 13],
            banned_pairs: vec![
                (ShiftCode::E, ShiftCode::D),
                (ShiftCode::N, ShiftCode::D),
                (ShiftCode::N, ShiftCode::E),
                (ShiftCode::D, ShiftCode::N),
            ],
            window_days: 7,
            window_cap: 6,
        }
    }
}

impl CycleConfig {
    pub fn is_weekend(&self, day: usize) -> bool {
        self.weekend_indexes.contains(&day)
    }

    pub fn is_banned_pair(&self, a: ShiftCode, b: ShiftCode) -> bool {
        self.banned_pairs.contains(&(a, b))
    }
}

/// Extrait l'index (base 0) du jour d'un verrou "DD MMM".
/// Seul le numéral de tête compte ; tout format invalide ou hors
/// `1..=days` donne `None`, jamais une erreur.
pub fn parse_lock_day(raw: &str, days: usize) -> Option<usize> {
    let first = raw.trim().split_whitespace().next()?;
    let day: usize = first.parse().ok()?;
    if (1..=days).contains(&day) {
        Some(day - 1)
    } else {
        None
    }
}
