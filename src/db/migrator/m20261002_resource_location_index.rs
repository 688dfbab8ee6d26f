use sea_orm_migration::prelude::*;

/// Every cache lookup filters a resource table by `location_id`.
const RESOURCE_TABLES: [&str; 5] = ["weathers", "yelps", "movies", "meetups", "trails"];

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for table in RESOURCE_TABLES {
            conn.execute_unprepared(&format!(
                "CREATE INDEX IF NOT EXISTS idx_{table}_location_id ON {table}(location_id)"
            ))
            .await?;
        }

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let conn = manager.get_connection();

        for table in RESOURCE_TABLES {
            conn.execute_unprepared(&format!("DROP INDEX IF EXISTS idx_{table}_location_id"))
                .await?;
        }

        Ok(())
    }
}
