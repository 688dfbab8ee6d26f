use crate::config::Config;
use crate::state::SharedState;

pub async fn cmd_locate(config: Config, query: &str) -> anyhow::Result<()> {
    let state = SharedState::new(config).await?;

    let result = state.locations.resolve(query).await;
    state.store.close().await?;

    let location = match result {
        Ok(location) => location,
        Err(e) => {
            println!("Could not resolve '{query}': {e}");
            return Ok(());
        }
    };

    println!("Location");
    println!("{:-<60}", "");
    println!("ID:        {}", location.id);
    println!("Query:     {}", location.search_query);
    println!("Address:   {}", location.formatted_query);
    println!("Latitude:  {}", location.latitude);
    println!("Longitude: {}", location.longitude);
    println!("Created:   {}", location.created_at.to_rfc3339());

    Ok(())
}
