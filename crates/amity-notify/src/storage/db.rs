//! SQLite database for the notification service.

amity_core::define_database!(NotificationDatabase, "notification");
