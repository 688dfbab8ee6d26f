use crate::domain::{Location, LocationId, NewLocation};
use crate::entities::{locations, prelude::*};
use chrono::{DateTime, Utc};
use sea_orm::sea_query::OnConflict;
use sea_orm::{
    ColumnTrait, DatabaseConnection, DbErr, EntityTrait, PaginatorTrait, QueryFilter, Set,
};

pub struct LocationRepository {
    conn: DatabaseConnection,
}

impl LocationRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    fn map_model(m: locations::Model) -> Location {
        Location {
            id: LocationId::new(m.id),
            search_query: m.search_query,
            formatted_query: m.formatted_query,
            latitude: m.latitude,
            longitude: m.longitude,
            created_at: DateTime::from_timestamp_millis(m.created_at).unwrap_or_default(),
        }
    }

    pub async fn find_by_query(&self, query: &str) -> Result<Option<Location>, DbErr> {
        let row = Locations::find()
            .filter(locations::Column::SearchQuery.eq(query))
            .one(&self.conn)
            .await?;
        Ok(row.map(Self::map_model))
    }

    pub async fn get(&self, id: LocationId) -> Result<Option<Location>, DbErr> {
        let row = Locations::find_by_id(id.value()).one(&self.conn).await?;
        Ok(row.map(Self::map_model))
    }

    /// Inserts a location unless one already exists for `query`, then returns
    /// whichever row now holds that query.
    pub async fn insert_or_get(
        &self,
        query: &str,
        fields: &NewLocation,
        created_at: DateTime<Utc>,
    ) -> Result<Location, DbErr> {
        let active_model = locations::ActiveModel {
            search_query: Set(query.to_string()),
            formatted_query: Set(fields.formatted_query.clone()),
            latitude: Set(fields.latitude),
            longitude: Set(fields.longitude),
            created_at: Set(created_at.timestamp_millis()),
            ..Default::default()
        };

        Locations::insert(active_model)
            .on_conflict(
                OnConflict::column(locations::Column::SearchQuery)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.conn)
            .await?;

        self.find_by_query(query)
            .await?
            .ok_or_else(|| DbErr::RecordNotFound(format!("location for query '{query}'")))
    }

    pub async fn count(&self) -> Result<u64, DbErr> {
        Locations::find().count(&self.conn).await
    }
}
