use std::fs;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;

use cmdb_cli::{CliArgs, ModelDefinition, apply, export};
use cmdb_infra::{CascadingDeleteCoordinator, InMemoryPersistence};
use cmdb_model::ModelFactory;

fn main() -> anyhow::Result<()> {
    let args = CliArgs::parse();
    let config = args.load_config()?;
    cmdb_observability::init_with_filter(&config.log_filter);

    let path = &args.definition;
    let raw = fs::read_to_string(path)
        .with_context(|| format!("failed to read model definition {}", path.display()))?;
    let definition: ModelDefinition = serde_json::from_str(&raw)
        .with_context(|| format!("failed to parse model definition {}", path.display()))?;

    let store = Arc::new(InMemoryPersistence::new());
    let coordinator = Arc::new(CascadingDeleteCoordinator::new(store.clone()));
    let factory = ModelFactory::new(store, coordinator);
    let ctx = config.default_context();

    let summary = apply(&factory, &ctx, &definition)?;
    tracing::info!(
        created = summary.created,
        updated = summary.updated,
        request_id = %ctx.request_id(),
        "model definition applied"
    );

    println!("{}", serde_json::to_string_pretty(&export(&factory, &ctx)?)?);
    Ok(())
}
