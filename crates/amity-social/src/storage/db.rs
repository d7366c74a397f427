//! SQLite database for the relationship service.

amity_core::define_database!(SocialDatabase, "social");
