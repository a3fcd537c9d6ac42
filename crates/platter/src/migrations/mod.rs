//! Embedded schema migrations, one file per migration.
//!
//! Files are named after their version string; the runner applies them in
//! lexicographic version order.

mod m2026_07_02_114512_initial_schema;
mod m2026_07_15_091803_create_restaurants;
mod m2026_07_21_102341_add_restaurant_refs;
