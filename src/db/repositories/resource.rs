use crate::domain::{
    BusinessListing, LocationId, MeetupGroup, MovieSummary, ResourceKind, ResourceRecord,
    StoredRecord, Trail, WeatherRecord,
};
use crate::entities::{meetups, movies, prelude::*, trails, weathers, yelps};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};

/// Table-per-kind access to cached resource rows.
pub struct ResourceRepository {
    conn: DatabaseConnection,
}

impl ResourceRepository {
    #[must_use]
    pub const fn new(conn: DatabaseConnection) -> Self {
        Self { conn }
    }

    /// Rows of `kind` for a location, in insertion order.
    pub async fn find_by_location(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<Vec<StoredRecord>, DbErr> {
        let loc = location_id.value();
        let conn = &self.conn;

        let rows = match kind {
            ResourceKind::Weather => {
                find_rows::<Weathers>(conn, weathers::Column::LocationId, weathers::Column::Id, loc)
                    .await?
                    .into_iter()
                    .map(map_weather)
                    .collect()
            }
            ResourceKind::BusinessListing => {
                find_rows::<Yelps>(conn, yelps::Column::LocationId, yelps::Column::Id, loc)
                    .await?
                    .into_iter()
                    .map(map_business)
                    .collect()
            }
            ResourceKind::MovieSummary => {
                find_rows::<Movies>(conn, movies::Column::LocationId, movies::Column::Id, loc)
                    .await?
                    .into_iter()
                    .map(map_movie)
                    .collect()
            }
            ResourceKind::MeetupGroup => {
                find_rows::<Meetups>(conn, meetups::Column::LocationId, meetups::Column::Id, loc)
                    .await?
                    .into_iter()
                    .map(map_meetup)
                    .collect()
            }
            ResourceKind::Trail => {
                find_rows::<Trails>(conn, trails::Column::LocationId, trails::Column::Id, loc)
                    .await?
                    .into_iter()
                    .map(map_trail)
                    .collect()
            }
        };

        Ok(rows)
    }

    /// Removes every row of `kind` for a location. Zero matching rows is not
    /// an error.
    pub async fn delete_by_location(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
    ) -> Result<u64, DbErr> {
        let loc = location_id.value();
        let conn = &self.conn;

        match kind {
            ResourceKind::Weather => {
                delete_rows::<Weathers>(conn, weathers::Column::LocationId, loc).await
            }
            ResourceKind::BusinessListing => {
                delete_rows::<Yelps>(conn, yelps::Column::LocationId, loc).await
            }
            ResourceKind::MovieSummary => {
                delete_rows::<Movies>(conn, movies::Column::LocationId, loc).await
            }
            ResourceKind::MeetupGroup => {
                delete_rows::<Meetups>(conn, meetups::Column::LocationId, loc).await
            }
            ResourceKind::Trail => delete_rows::<Trails>(conn, trails::Column::LocationId, loc).await,
        }
    }

    /// Inserts `records` as one batch sharing `created_at`, inside a single
    /// transaction.
    pub async fn insert_batch(
        &self,
        kind: ResourceKind,
        location_id: LocationId,
        records: &[ResourceRecord],
        created_at: DateTime<Utc>,
    ) -> Result<Vec<StoredRecord>, DbErr> {
        if let Some(mismatch) = records.iter().find(|r| r.kind() != kind) {
            return Err(DbErr::Custom(format!(
                "cannot insert {} row into {} table",
                mismatch.kind(),
                kind.table_name()
            )));
        }

        let txn = self.conn.begin().await?;
        let mut stored = Vec::with_capacity(records.len());
        for record in records {
            stored.push(insert_one(&txn, location_id.value(), created_at, record).await?);
        }
        txn.commit().await?;

        Ok(stored)
    }
}

async fn find_rows<E>(
    conn: &DatabaseConnection,
    location_col: E::Column,
    id_col: E::Column,
    location_id: i32,
) -> Result<Vec<E::Model>, DbErr>
where
    E: EntityTrait,
{
    E::find()
        .filter(location_col.eq(location_id))
        .order_by_asc(id_col)
        .all(conn)
        .await
}

async fn delete_rows<E>(
    conn: &DatabaseConnection,
    location_col: E::Column,
    location_id: i32,
) -> Result<u64, DbErr>
where
    E: EntityTrait,
{
    let res = E::delete_many()
        .filter(location_col.eq(location_id))
        .exec(conn)
        .await?;
    Ok(res.rows_affected)
}

async fn insert_one<C>(
    conn: &C,
    location_id: i32,
    created_at: DateTime<Utc>,
    record: &ResourceRecord,
) -> Result<StoredRecord, DbErr>
where
    C: ConnectionTrait,
{
    let created_at = created_at.timestamp_millis();

    let stored = match record {
        ResourceRecord::Weather(r) => map_weather(
            weathers::ActiveModel {
                forecast: Set(r.forecast.clone()),
                time: Set(r.time.clone()),
                location_id: Set(location_id),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(conn)
            .await?,
        ),
        ResourceRecord::BusinessListing(r) => map_business(
            yelps::ActiveModel {
                name: Set(r.name.clone()),
                image_url: Set(r.image_url.clone()),
                price: Set(r.price.clone()),
                rating: Set(r.rating),
                url: Set(r.url.clone()),
                location_id: Set(location_id),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(conn)
            .await?,
        ),
        ResourceRecord::MovieSummary(r) => map_movie(
            movies::ActiveModel {
                title: Set(r.title.clone()),
                overview: Set(r.overview.clone()),
                average_votes: Set(r.average_votes),
                total_votes: Set(r.total_votes),
                image_url: Set(r.image_url.clone()),
                popularity: Set(r.popularity),
                released_on: Set(r.released_on.clone()),
                location_id: Set(location_id),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(conn)
            .await?,
        ),
        ResourceRecord::MeetupGroup(r) => map_meetup(
            meetups::ActiveModel {
                link: Set(r.link.clone()),
                name: Set(r.name.clone()),
                creation_date: Set(r.creation_date.clone()),
                host: Set(r.host.clone()),
                location_id: Set(location_id),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(conn)
            .await?,
        ),
        ResourceRecord::Trail(r) => map_trail(
            trails::ActiveModel {
                name: Set(r.name.clone()),
                location: Set(r.location.clone()),
                length: Set(r.length),
                stars: Set(r.stars),
                star_votes: Set(r.star_votes),
                summary: Set(r.summary.clone()),
                trail_url: Set(r.trail_url.clone()),
                conditions: Set(r.conditions.clone()),
                condition_date: Set(r.condition_date.clone()),
                condition_time: Set(r.condition_time.clone()),
                location_id: Set(location_id),
                created_at: Set(created_at),
                ..Default::default()
            }
            .insert(conn)
            .await?,
        ),
    };

    Ok(stored)
}

// ============================================================================
// Model Conversion Helpers
// ============================================================================

fn stored(id: i32, location_id: i32, created_at: i64, record: ResourceRecord) -> StoredRecord {
    StoredRecord {
        id,
        location_id: LocationId::new(location_id),
        created_at: DateTime::from_timestamp_millis(created_at).unwrap_or_default(),
        record,
    }
}

fn map_weather(m: weathers::Model) -> StoredRecord {
    let record = WeatherRecord {
        forecast: m.forecast,
        time: m.time,
    };
    stored(m.id, m.location_id, m.created_at, record.into())
}

fn map_business(m: yelps::Model) -> StoredRecord {
    let record = BusinessListing {
        name: m.name,
        image_url: m.image_url,
        price: m.price,
        rating: m.rating,
        url: m.url,
    };
    stored(m.id, m.location_id, m.created_at, record.into())
}

fn map_movie(m: movies::Model) -> StoredRecord {
    let record = MovieSummary {
        title: m.title,
        overview: m.overview,
        average_votes: m.average_votes,
        total_votes: m.total_votes,
        image_url: m.image_url,
        popularity: m.popularity,
        released_on: m.released_on,
    };
    stored(m.id, m.location_id, m.created_at, record.into())
}

fn map_meetup(m: meetups::Model) -> StoredRecord {
    let record = MeetupGroup {
        link: m.link,
        name: m.name,
        creation_date: m.creation_date,
        host: m.host,
    };
    stored(m.id, m.location_id, m.created_at, record.into())
}

fn map_trail(m: trails::Model) -> StoredRecord {
    let record = Trail {
        name: m.name,
        location: m.location,
        length: m.length,
        stars: m.stars,
        star_votes: m.star_votes,
        summary: m.summary,
        trail_url: m.trail_url,
        conditions: m.conditions,
        condition_date: m.condition_date,
        condition_time: m.condition_time,
    };
    stored(m.id, m.location_id, m.created_at, record.into())
}
