//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` when the migrations change.

diesel::table! {
    /// Developer accounts. `email` carries a unique index.
    developers (id) {
        id -> Uuid,
        email -> Varchar,
        name -> Varchar,
        company -> Nullable<Varchar>,
        /// Argon2id PHC string.
        password_hash -> Varchar,
        is_verified -> Bool,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Submitted apps.
    apps (id) {
        id -> Uuid,
        name -> Varchar,
        description -> Text,
        category -> Varchar,
        logo_url -> Text,
        download_url -> Text,
        /// Exactly four URLs, enforced by a check constraint.
        screenshots -> Array<Text>,
        developer_id -> Uuid,
        /// Owner name captured at submission time.
        developer_name -> Varchar,
        status -> Varchar,
        payment_status -> Varchar,
        /// Latest payment attempt.
        payment_id -> Nullable<Uuid>,
        rating -> Float8,
        downloads -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Listing-fee payment attempts.
    payments (id) {
        id -> Uuid,
        app_id -> Uuid,
        developer_id -> Uuid,
        amount -> Int4,
        currency -> Varchar,
        reference -> Varchar,
        paystack_reference -> Varchar,
        status -> Varchar,
        paid_at -> Nullable<Timestamptz>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::joinable!(apps -> developers (developer_id));
diesel::joinable!(payments -> apps (app_id));

diesel::allow_tables_to_appear_in_same_query!(developers, apps, payments);
