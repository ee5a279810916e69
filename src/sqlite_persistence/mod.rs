mod schema;

pub use schema::{Column, Schema, SqlType, Table};
