use crate::analytics::AnalyticsEntry;
use crate::generate::RosterResult;
use crate::matrix::RosterMatrix;
use crate::model::{CycleConfig, Role, ShiftType, StaffProfile};
use anyhow::{bail, Context};
use chrono::Utc;
use csv::{ReaderBuilder, WriterBuilder};
use std::fs;
use std::path::Path;

/// Import de profils depuis CSV, header :
/// `name,email,role,fte,shiftPref,maxNDs[,softLock][,hardLock][,flexibleWork][,swapWilling][,overtimeOptIn]`
/// Chaque ligne passe la validation d'ingestion ; `submitted_at` est
/// horodaté à l'import.
pub fn import_profiles_csv<P: AsRef<Path>>(
    path: P,
    config: &CycleConfig,
) -> anyhow::Result<Vec<StaffProfile>> {
    let mut rdr = ReaderBuilder::new().has_headers(true).from_path(path)?;
    let mut out = Vec::new();
    for rec in rdr.records() {
        let rec = rec?;
        let name = rec.get(0).context("missing name")?.trim();
        let email = rec.get(1).context("missing email")?.trim();
        let role = Role::parse(rec.get(2).context("missing role")?);
        let fte: f64 = rec
            .get(3)
            .context("missing fte")?
            .trim()
            .parse()
            .with_context(|| format!("invalid fte for {name}"))?;
        let pref_raw = rec.get(4).context("missing shiftPref")?;
        let Some(shift_pref) = ShiftType::parse(pref_raw) else {
            bail!("invalid shift preference '{pref_raw}' for {name}");
        };
        let max_nds: u8 = rec
            .get(5)
            .context("missing maxNDs")?
            .trim()
            .parse()
            .with_context(|| format!("invalid maxNDs for {name}"))?;

        let opt = |idx: usize| {
            rec.get(idx)
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
        };
        let flag = |idx: usize, default: bool| -> anyhow::Result<bool> {
            match rec.get(idx).map(str::trim) {
                None | Some("") => Ok(default),
                Some(raw) => parse_bool(raw)
                    .with_context(|| format!("invalid boolean '{raw}' for {name}")),
            }
        };

        let profile = StaffProfile {
            name: name.to_string(),
            email: email.to_string(),
            role,
            fte,
            shift_pref,
            max_nds,
            soft_lock: opt(6),
            hard_lock: opt(7),
            flexible_work: flag(8, false)?,
            swap_willing: flag(9, true)?,
            overtime_opt_in: flag(10, false)?,
            availability_notes: None,
            submitted_at: Some(Utc::now()),
        };
        profile
            .validate(config)
            .with_context(|| format!("invalid profile row for {name}"))?;
        out.push(profile);
    }
    Ok(out)
}

fn parse_bool(s: &str) -> anyhow::Result<bool> {
    match s.to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "oui" => Ok(true),
        "false" | "0" | "no" | "n" | "non" => Ok(false),
        _ => bail!("expected boolean"),
    }
}

/// Export JSON du résultat complet (statut, roster, analytics, conformité).
pub fn export_result_json<P: AsRef<Path>>(path: P, result: &RosterResult) -> anyhow::Result<()> {
    let s = serde_json::to_string_pretty(result)?;
    fs::write(path, s)?;
    Ok(())
}

/// Export CSV de la matrice jointe aux analytics, une ligne par
/// personne : `role,name,compliance,fatigue,day1..dayN`. Le rendu
/// tableur final appartient à la couche de présentation ; ici on ne
/// fournit que la donnée jointe par nom.
pub fn export_matrix_csv<P: AsRef<Path>>(
    path: P,
    matrix: &RosterMatrix,
    analytics: &[AnalyticsEntry],
) -> anyhow::Result<()> {
    let mut w = WriterBuilder::new().has_headers(true).from_path(path)?;
    let days = matrix.rows.first().map_or(0, |r| r.codes.len());
    let mut buf = itoa::Buffer::new();

    let mut header = vec![
        "role".to_string(),
        "name".to_string(),
        "compliance".to_string(),
        "fatigue".to_string(),
    ];
    for d in 0..days {
        header.push(format!("day{}", buf.format(d + 1)));
    }
    w.write_record(&header)?;

    // L'ordre des analytics (séniorité puis nom) pilote l'export.
    for entry in analytics {
        let Some(row) = matrix.row(&entry.name) else {
            continue;
        };
        let compliance = if entry.compliant {
            "Compliant".to_string()
        } else {
            entry.notes.join("; ")
        };
        let mut record = vec![
            entry.role.as_str().to_string(),
            entry.name.clone(),
            compliance,
            buf.format(entry.fatigue_score).to_string(),
        ];
        record.extend(row.codes.iter().map(|c| c.as_str().to_string()));
        w.write_record(&record)?;
    }
    w.flush()?;
    Ok(())
}
