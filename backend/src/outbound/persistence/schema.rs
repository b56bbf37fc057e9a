//! Diesel table definitions for the PostgreSQL schema.
//!
//! These must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts. `email` is unique.
    users (id) {
        id -> Uuid,
        name -> Varchar,
        email -> Varchar,
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Catalogue entries with their denormalised rating aggregates.
    books (id) {
        id -> Uuid,
        /// Byte-wise collation.
        title -> Varchar,
        /// Byte-wise collation.
        author -> Varchar,
        description -> Text,
        genre -> Varchar,
        year -> Int4,
        added_by -> Uuid,
        /// Mean rating in hundredths of a star.
        average_rating_centi -> Int4,
        review_count -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Reviews. `(book_id, user_id)` is unique.
    reviews (id) {
        id -> Uuid,
        book_id -> Uuid,
        user_id -> Uuid,
        rating -> Int2,
        review_text -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(books -> users (added_by));
diesel::joinable!(reviews -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(users, books, reviews);
