#![forbid(unsafe_code)]
use anyhow::{bail, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use wardroster::{
    build_matrix, generate_roster, io,
    model::CycleConfig,
    solver::BranchBoundSolver,
    storage::{JsonProfileStore, ProfileStore},
    Overall, RosterResult,
};
#[cfg(feature = "logging")]
use tracing_subscriber::{fmt::Subscriber, EnvFilter};

/// CLI de rostering de quinzaine (sans base de données)
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// Active les logs (feature `logging`)
    #[arg(long, global = true)]
    log: bool,

    /// Fichier JSON des profils du cycle
    #[arg(long, global = true, default_value = "profiles.json")]
    profiles: String,

    #[command(subcommand)]
    cmd: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Importer des profils depuis un CSV (validation à l'ingestion)
    ImportProfiles {
        #[arg(long)]
        csv: String,
    },

    /// Lister les profils du cycle
    List,

    /// Générer le roster et les analytics de conformité
    Generate {
        /// Export JSON du résultat complet
        #[arg(long)]
        out_json: Option<String>,
        /// Export CSV matrice + conformité
        #[arg(long)]
        out_csv: Option<String>,
        /// Budget de nœuds du solveur (défaut : exact, sans limite)
        #[arg(long)]
        node_limit: Option<u64>,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    #[cfg(feature = "logging")]
    if cli.log {
        let _ = Subscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .try_init();
    }

    let config = CycleConfig::default();
    let store = JsonProfileStore::open(&cli.profiles)?;

    let code = match cli.cmd {
        Commands::ImportProfiles { csv } => {
            let profiles = io::import_profiles_csv(csv, &config)?;
            store.save(&profiles)?;
            println!("Imported {} profile(s)", profiles.len());
            0
        }
        Commands::List => {
            let profiles = store.load()?;
            for p in &profiles {
                let submitted = p
                    .submitted_at
                    .map(|t| t.to_rfc3339())
                    .unwrap_or_else(|| "-".to_string());
                println!(
                    "{} | {} | fte {} | pref {} | maxNDs {} | {}",
                    p.role, p.name, p.fte, p.shift_pref, p.max_nds, submitted
                );
            }
            0
        }
        Commands::Generate {
            out_json,
            out_csv,
            node_limit,
        } => {
            let profiles = store.load()?;
            if profiles.is_empty() {
                bail!("no profiles in {}", cli.profiles);
            }
            let solver = BranchBoundSolver { node_limit };
            let result = generate_roster(&profiles, &config, &solver)?;

            if let Some(path) = &out_json {
                io::export_result_json(path, &result)?;
            }

            match &result {
                RosterResult::Infeasible { message } => {
                    eprintln!("infeasible: {message}");
                    1
                }
                RosterResult::Valid {
                    roster,
                    analytics,
                    compliance,
                } => {
                    let names: Vec<String> =
                        profiles.iter().map(|p| p.name.clone()).collect();
                    let matrix = build_matrix(roster, &names, config.days);
                    if let Some(path) = &out_csv {
                        io::export_matrix_csv(path, &matrix, analytics)?;
                    }

                    // Impression compacte, ordre séniorité puis nom.
                    println!("Generated: {}", Utc::now().to_rfc3339());
                    for entry in analytics {
                        let row = matrix
                            .row(&entry.name)
                            .map(|r| {
                                r.codes
                                    .iter()
                                    .map(|c| c.as_str())
                                    .collect::<Vec<_>>()
                                    .join(" ")
                            })
                            .unwrap_or_default();
                        let status = if entry.compliant {
                            "ok".to_string()
                        } else {
                            entry.notes.join("; ")
                        };
                        println!("{:5} {:20} {} | {}", entry.role, entry.name, row, status);
                    }
                    match compliance.overall {
                        Overall::Pass => {
                            println!("compliance: pass");
                            0
                        }
                        Overall::Attention => {
                            eprintln!(
                                "compliance: attention ({} warning(s))",
                                compliance.warnings.len()
                            );
                            // Code 2 = WARNING/INCOMPLETE
                            2
                        }
                    }
                }
            }
        }
    };

    std::process::exit(code);
}
