use crate::config::Config;
use crate::domain::{LocationId, ResourceKind};
use crate::state::SharedState;
use anyhow::Context;

pub async fn cmd_fetch(config: Config, kind: ResourceKind, location_id: i32) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let location_id = LocationId::new(location_id);

    match state.resources.fetch(kind, location_id).await {
        Ok(rows) => {
            let body = serde_json::to_string_pretty(&rows).context("Failed to render rows")?;
            println!("{body}");
            println!("{} {kind} row(s) for location {location_id}", rows.len());
        }
        Err(e) => println!("Failed to fetch {kind} for location {location_id}: {e}"),
    }

    state.store.close().await?;
    Ok(())
}
