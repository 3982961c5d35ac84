use crate::model::StaffProfile;
use anyhow::Context;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// Dépôt de profils : seule source de vérité pour un cycle.
/// Une lecture synchrone, aucune hypothèse sur la technologie dessous.
pub trait ProfileStore {
    /// Charge la liste des profils actifs du cycle.
    fn load(&self) -> anyhow::Result<Vec<StaffProfile>>;
    /// Sauvegarde de manière atomique.
    fn save(&self, profiles: &[StaffProfile]) -> anyhow::Result<()>;
}

pub struct JsonProfileStore {
    path: PathBuf,
}

impl JsonProfileStore {
    pub fn open<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        Ok(Self {
            path: path.as_ref().to_path_buf(),
        })
    }
}

impl ProfileStore for JsonProfileStore {
    fn load(&self) -> anyhow::Result<Vec<StaffProfile>> {
        let data =
            fs::read(&self.path).with_context(|| format!("reading {}", self.path.display()))?;
        let profiles: Vec<StaffProfile> =
            serde_json::from_slice(&data).with_context(|| "parsing profiles.json")?;
        Ok(profiles)
    }

    fn save(&self, profiles: &[StaffProfile]) -> anyhow::Result<()> {
        let json = serde_json::to_vec_pretty(profiles)?;
        let mut tmp =
            NamedTempFile::new_in(self.path.parent().unwrap_or_else(|| Path::new(".")))
                .with_context(|| "creating temp file")?;
        tmp.write_all(&json)?;
        tmp.flush()?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).with_context(|| "atomic rename")?;
        Ok(())
    }
}
