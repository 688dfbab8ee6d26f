use crate::config::Config;
use crate::domain::{LocationId, ResourceKind};
use crate::state::SharedState;

pub async fn cmd_purge(config: Config, kind: ResourceKind, location_id: i32) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;
    let location_id = LocationId::new(location_id);

    let result = state.resources.purge(kind, location_id).await;
    state.store.close().await?;
    let deleted = result?;

    if deleted == 0 {
        println!("No cached {kind} rows for location {location_id}");
    } else {
        println!("✓ Purged {deleted} {kind} row(s) for location {location_id}");
    }

    Ok(())
}
