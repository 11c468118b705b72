//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `migrations/` exactly. Regenerate with
//! `diesel print-schema` when a migration changes a table.

diesel::table! {
    /// Application profiles linked to identity-provider subjects.
    user_profiles (id) {
        id -> Uuid,
        /// Provider subject; unique, null until the first authenticated visit.
        external_id -> Nullable<Varchar>,
        /// Lower-cased email; unique.
        email -> Varchar,
        full_name -> Varchar,
        role -> Varchar,
        is_active -> Bool,
        avatar_url -> Nullable<Text>,
        locale -> Nullable<Varchar>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Property listings.
    properties (id) {
        id -> Uuid,
        /// Canonical `ABC-234` code; unique.
        short_code -> Varchar,
        owner_id -> Uuid,
        title -> Varchar,
        status -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Append-only listing status audit log.
    property_status_transitions (id) {
        id -> Int8,
        property_id -> Uuid,
        /// Null for the creation record.
        from_status -> Nullable<Varchar>,
        to_status -> Varchar,
        actor_id -> Uuid,
        reason -> Varchar,
        occurred_at -> Timestamptz,
    }
}

diesel::joinable!(properties -> user_profiles (owner_id));
diesel::joinable!(property_status_transitions -> properties (property_id));

diesel::allow_tables_to_appear_in_same_query!(
    user_profiles,
    properties,
    property_status_transitions,
);
