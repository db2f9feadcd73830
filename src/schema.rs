use sea_query::Iden;

/// Metadata table - key-value store for schema bookkeeping
#[derive(Iden)]
pub enum Metadata {
    Table,
    Key,
    Value,
}

/// Entries table - one row per recording, audio inline as base64 text
#[derive(Iden)]
pub enum Entries {
    Table,
    Filename,
    SpeakerId,
    Text,
    Language,
    Environment,
    Intent,
    ObjectColor,
    TargetColor,
    Direction,
    Timestamp,
    AudioB64,
}
