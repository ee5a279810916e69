use anyhow::{bail, Context, Result};
use rusqlite::{params, Connection};

#[macro_export]
macro_rules! sqlite_column {
    ($name:expr, $sql_type:expr $(, $field:ident = $value:expr)*) => {
        {
            #[allow(unused_mut)]
            let mut column = $crate::sqlite_persistence::Column {
                name: $name,
                sql_type: $sql_type,
                is_primary_key: false,
                non_null: false,
            };
            $(
                column.$field = $value;
            )*
            column
        }
    };
}

#[derive(Debug, PartialEq, Eq)]
pub enum SqlType {
    Text,
    Integer,
    Blob,
}

impl SqlType {
    fn as_sql(&self) -> &'static str {
        match self {
            SqlType::Text => "TEXT",
            SqlType::Integer => "INTEGER",
            SqlType::Blob => "BLOB",
        }
    }

    /// Whether a column declared as `declared` in an existing database can
    /// hold values of this type.
    ///
    /// Follows SQLite's column affinity rules, so `BIGINT` or `VARCHAR(255)`
    /// are accepted. Undeclared columns accept anything.
    fn accepts(&self, declared: &str) -> bool {
        let declared = declared.to_ascii_uppercase();
        if declared.trim().is_empty() {
            return true;
        }
        let integer = declared.contains("INT");
        let text = !integer
            && (declared.contains("CHAR") || declared.contains("CLOB") || declared.contains("TEXT"));
        match self {
            SqlType::Integer => {
                integer
                    || !(text
                        || declared.contains("BLOB")
                        || declared.contains("REAL")
                        || declared.contains("FLOA")
                        || declared.contains("DOUB"))
            }
            SqlType::Text => text,
            SqlType::Blob => !integer && !text && declared.contains("BLOB"),
        }
    }
}

pub struct Column {
    pub name: &'static str,
    pub sql_type: &'static SqlType,
    pub is_primary_key: bool,
    pub non_null: bool,
}

pub struct Table {
    pub name: &'static str,
    pub columns: &'static [Column],
    pub indices: &'static [(&'static str, &'static str)],
}

impl Table {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        let mut create_sql = format!("CREATE TABLE {} (", self.name);
        for (column_index, column) in self.columns.iter().enumerate() {
            if column_index > 0 {
                create_sql.push_str(", ");
            }
            create_sql.push_str(&format!("{} {}", column.name, column.sql_type.as_sql()));
            if column.is_primary_key {
                create_sql.push_str(" PRIMARY KEY");
            }
            if column.non_null {
                create_sql.push_str(" NOT NULL");
            }
        }
        create_sql.push_str(");");
        conn.execute(&create_sql, params![])?;

        for (index_name, column_name) in self.indices {
            conn.execute(
                &format!(
                    "CREATE INDEX {} ON {}({});",
                    index_name, self.name, column_name
                ),
                params![],
            )?;
        }
        Ok(())
    }

    /// Checks that the table exists and carries every declared column.
    ///
    /// Extra columns are tolerated: the library database is produced by an
    /// external indexer that may store more than what is served.
    pub fn validate(&self, conn: &Connection) -> Result<()> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({});", self.name))?;
        let actual_columns: Vec<(String, String)> = stmt
            .query_map(params![], |row| Ok((row.get(1)?, row.get(2)?)))?
            .collect::<rusqlite::Result<_>>()?;

        if actual_columns.is_empty() {
            bail!("Table {} is missing", self.name);
        }

        for expected in self.columns {
            let actual = actual_columns
                .iter()
                .find(|(name, _)| name.eq_ignore_ascii_case(expected.name));
            match actual {
                None => bail!("Table {} has no column {}", self.name, expected.name),
                Some((_, sql_type)) if !expected.sql_type.accepts(sql_type) => {
                    bail!(
                        "Table {} Column {} type mismatch: expected {}, got {}",
                        self.name,
                        expected.name,
                        expected.sql_type.as_sql(),
                        sql_type
                    )
                }
                Some(_) => {}
            }
        }
        Ok(())
    }
}

pub struct Schema {
    pub tables: &'static [Table],
}

impl Schema {
    pub fn create(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table
                .create(conn)
                .with_context(|| format!("Failed to create table {}", table.name))?;
        }
        Ok(())
    }

    pub fn validate(&self, conn: &Connection) -> Result<()> {
        for table in self.tables {
            table.validate(conn)?;
        }
        Ok(())
    }
}
