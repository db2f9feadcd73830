use sea_query::{Expr, Func, Query, SqliteQueryBuilder};

use crate::entry::Entry;
use crate::schema::Entries;
use crate::store::CountFilter;

fn metadata_columns() -> [Entries; 10] {
    [
        Entries::Filename,
        Entries::SpeakerId,
        Entries::Text,
        Entries::Language,
        Entries::Environment,
        Entries::Intent,
        Entries::ObjectColor,
        Entries::TargetColor,
        Entries::Direction,
        Entries::Timestamp,
    ]
}

/// INSERT INTO entries (filename, speaker_id, text, language, environment,
/// intent, object_color, target_color, direction, timestamp, audio_b64)
/// VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
pub fn insert(entry: &Entry) -> String {
    Query::insert()
        .into_table(Entries::Table)
        .columns([
            Entries::Filename,
            Entries::SpeakerId,
            Entries::Text,
            Entries::Language,
            Entries::Environment,
            Entries::Intent,
            Entries::ObjectColor,
            Entries::TargetColor,
            Entries::Direction,
            Entries::Timestamp,
            Entries::AudioB64,
        ])
        .values_panic([
            entry.filename.as_str().into(),
            entry.speaker_id.as_str().into(),
            entry.text.as_str().into(),
            entry.language.as_str().into(),
            entry.environment.as_str().into(),
            entry.intent.as_str().into(),
            entry.object_color.as_str().into(),
            entry.target_color.as_str().into(),
            entry.direction.as_str().into(),
            entry.timestamp.as_str().into(),
            entry.audio_b64.clone().into(),
        ])
        .to_string(SqliteQueryBuilder)
}

/// SELECT <metadata columns>[, audio_b64] FROM entries LIMIT ?
pub fn select_all(exclude_audio: bool, limit: u64) -> String {
    let mut query = Query::select();
    query.columns(metadata_columns()).from(Entries::Table);
    if !exclude_audio {
        query.column(Entries::AudioB64);
    }
    query.limit(limit);
    query.to_string(SqliteQueryBuilder)
}

/// SELECT <metadata columns>, audio_b64 FROM entries WHERE filename = ?
pub fn select_by_filename(filename: &str) -> String {
    let mut query = Query::select();
    query
        .columns(metadata_columns())
        .column(Entries::AudioB64)
        .from(Entries::Table)
        .and_where(Expr::col(Entries::Filename).eq(filename));
    query.to_string(SqliteQueryBuilder)
}

/// SELECT COUNT(filename) FROM entries [WHERE language = ? AND ...]
pub fn count(filter: &CountFilter) -> String {
    let mut query = Query::select();
    query
        .expr(Func::count(Expr::col(Entries::Filename)))
        .from(Entries::Table);
    if let Some(language) = &filter.language {
        query.and_where(Expr::col(Entries::Language).eq(language.as_str()));
    }
    if let Some(environment) = &filter.environment {
        query.and_where(Expr::col(Entries::Environment).eq(environment.as_str()));
    }
    if let Some(intent) = &filter.intent {
        query.and_where(Expr::col(Entries::Intent).eq(intent.as_str()));
    }
    query.to_string(SqliteQueryBuilder)
}
