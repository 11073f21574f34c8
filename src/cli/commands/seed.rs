use std::collections::BTreeMap;
use std::path::PathBuf;

use anyhow::{bail, Context};
use clap::Args;
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

use crate::auth::hash_password_with_cost;
use crate::cli::utils::{output_success, output_table};
use crate::cli::OutputFormat;
use crate::config::{AppConfig, StoreBackend};
use crate::resources::collections;
use crate::store::{DocumentStore, MemoryStore, PgStore};
use crate::types::Document;

/// Collection name to documents, as read from a fixture file.
pub type Fixture = BTreeMap<String, Vec<Value>>;

#[derive(Args)]
pub struct SeedArgs {
    #[arg(long, help = "YAML fixture file", default_value = "fixtures/seed.yaml")]
    pub file: PathBuf,

    #[arg(long, help = "Keep existing documents instead of clearing each collection first")]
    pub append: bool,

    #[arg(long, help = "bcrypt cost for user passwords", default_value_t = bcrypt::DEFAULT_COST)]
    pub cost: u32,

    #[arg(long, help = "Validate the fixture against an in-memory store without touching the database")]
    pub dry_run: bool,
}

#[derive(Debug, Default, Serialize)]
pub struct SeedReport {
    /// Documents inserted per collection, in seeding order.
    pub inserted: Vec<(String, usize)>,
    pub cleared: u64,
}

impl SeedReport {
    pub fn total(&self) -> usize {
        self.inserted.iter().map(|(_, n)| n).sum()
    }
}

pub async fn handle(args: SeedArgs, output_format: OutputFormat) -> anyhow::Result<()> {
    let raw = std::fs::read_to_string(&args.file)
        .with_context(|| format!("reading fixture {}", args.file.display()))?;
    let fixture = parse_fixture(&raw)?;

    let report = if args.dry_run {
        let store = MemoryStore::new();
        seed(&store, &fixture, args.cost, args.append).await?
    } else {
        let config = AppConfig::from_env();
        if config.database.backend == StoreBackend::Memory {
            bail!("DATABASE_BACKEND is memory; nothing to seed (use --dry-run to validate a fixture)");
        }
        let store = PgStore::connect(&config.database).await?;
        store.migrate(collections::ALL).await?;
        seed(&store, &fixture, args.cost, args.append).await?
    };

    let rows: Vec<Vec<String>> = report
        .inserted
        .iter()
        .map(|(name, n)| vec![name.clone(), n.to_string()])
        .collect();
    if matches!(output_format, OutputFormat::Text) {
        output_table(&output_format, &["collection", "inserted"], &rows)?;
    }

    let verb = if args.dry_run { "Validated" } else { "Seeded" };
    output_success(
        &output_format,
        &format!("{} {} documents across {} collections", verb, report.total(), report.inserted.len()),
        Some(json!({ "collections": report.inserted, "cleared": report.cleared })),
    )
}

/// Parse a YAML fixture. Every top-level key must name a known collection.
pub fn parse_fixture(raw: &str) -> anyhow::Result<Fixture> {
    let fixture: Fixture = serde_yaml::from_str(raw).context("fixture is not a mapping of collection lists")?;

    for name in fixture.keys() {
        if collections::by_name(name).is_none() {
            bail!("unknown collection '{}' in fixture", name);
        }
    }
    Ok(fixture)
}

/// Load a fixture into `store` in dependency order. Each listed collection is
/// cleared first unless `append` is set. User `password` fields are replaced by
/// a bcrypt `passwordHash`.
pub async fn seed(store: &dyn DocumentStore, fixture: &Fixture, cost: u32, append: bool) -> anyhow::Result<SeedReport> {
    let mut report = SeedReport::default();

    for collection in collections::ALL {
        let Some(docs) = fixture.get(collection.name) else {
            continue;
        };

        if !append {
            report.cleared += store.clear(collection).await?;
        }

        for (index, value) in docs.iter().enumerate() {
            let Value::Object(doc) = value else {
                bail!("{}[{}] is not an object", collection.name, index);
            };
            let mut doc = doc.clone();
            if collection.name == collections::USERS.name {
                hash_user_password(&mut doc, cost)?;
            }
            store
                .insert(collection, doc)
                .await
                .with_context(|| format!("inserting {}[{}]", collection.name, index))?;
        }

        info!("Seeded {} ({})", collection.name, docs.len());
        report.inserted.push((collection.name.to_string(), docs.len()));
    }

    Ok(report)
}

fn hash_user_password(doc: &mut Document, cost: u32) -> anyhow::Result<()> {
    if let Some(Value::String(password)) = doc.remove("password") {
        let hash = hash_password_with_cost(&password, cost)?;
        doc.insert("passwordHash".to_string(), Value::String(hash));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::verify_password;
    use crate::filter::{Condition, Filter};

    const FIXTURE: &str = r#"
clients:
  - clientId: C001
    name: ARM Pension Managers Ltd
    type: Pension Fund Administrator
    aum: 18200000000
users:
  - userId: U001
    name: Adaeze Okonkwo
    email: a.okonkwo@valualliance.ng
    role: Portfolio Manager
    department: Investment Management
    password: secret-pass
"#;

    #[test]
    fn parse_rejects_unknown_collections() {
        let err = parse_fixture("widgets:\n  - id: 1\n").unwrap_err();
        assert!(err.to_string().contains("widgets"));
    }

    #[tokio::test]
    async fn seed_hashes_passwords_and_reports_counts() {
        let store = MemoryStore::new();
        let fixture = parse_fixture(FIXTURE).unwrap();

        let report = seed(&store, &fixture, 4, false).await.unwrap();
        // users come before clients in seeding order
        assert_eq!(report.inserted, vec![("users".to_string(), 1), ("clients".to_string(), 1)]);

        let user = store
            .find_one(&collections::USERS, &Filter::matching(Condition::eq("userId", "U001")))
            .await
            .unwrap()
            .unwrap();
        assert!(user.get("password").is_none());
        let hash = user["passwordHash"].as_str().unwrap();
        assert!(verify_password("secret-pass", hash));
    }

    #[tokio::test]
    async fn bundled_fixture_loads_every_collection() {
        let store = MemoryStore::new();
        let fixture = parse_fixture(include_str!("../../../fixtures/seed.yaml")).unwrap();

        let report = seed(&store, &fixture, 4, false).await.unwrap();
        assert_eq!(report.inserted.len(), collections::ALL.len());
        assert_eq!(store.count(&collections::NAV_HISTORY, &Filter::all()).await.unwrap(), 5);
    }

    #[tokio::test]
    async fn reseeding_clears_unless_appending() {
        let store = MemoryStore::new();
        let fixture = parse_fixture(FIXTURE).unwrap();

        seed(&store, &fixture, 4, false).await.unwrap();
        let report = seed(&store, &fixture, 4, false).await.unwrap();
        assert_eq!(report.cleared, 2);
        assert_eq!(store.count(&collections::CLIENTS, &Filter::all()).await.unwrap(), 1);

        // appending the same ids collides with the unique keys
        assert!(seed(&store, &fixture, 4, true).await.is_err());
    }
}
