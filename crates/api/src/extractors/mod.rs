//! Custom axum extractors.

mod current_user;
