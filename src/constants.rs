pub mod cache {

    pub const WEATHER_TTL_SECS: i64 = 15;

    pub const BUSINESS_TTL_DAYS: i64 = 7;

    pub const MOVIE_TTL_HOURS: i64 = 24;

    pub const MEETUP_TTL_HOURS: i64 = 24;

    pub const TRAIL_TTL_HOURS: i64 = 1;
}

pub mod providers {

    pub const MOVIE_POSTER_BASE: &str = "http://image.tmdb.org/t/p/w200_and_h300_bestv2";

    pub const BUSINESS_SEARCH_TERM: &str = "restaurants";

    pub const MEETUP_PAGE_SIZE: u32 = 20;

    pub const TRAIL_MAX_DISTANCE_MILES: u32 = 10;
}

pub mod http {

    pub const GENERIC_FAILURE_MESSAGE: &str = "Sorry something went wrong!";
}
