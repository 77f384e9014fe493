//! CREATE / DROP statement generation
//!
//! Every creation statement carries `IF NOT EXISTS` and every drop carries
//! `IF EXISTS`, so both phases can be replayed against any prior state.

use crate::types::{Column, TableDef};
use sf_core::sql_utils::{quote_ident, quote_literal};
use sf_core::Dialect;

/// Name of the sequence backing an identity column on engines without
/// native IDENTITY support.
pub fn sequence_name(table: &TableDef, column: &Column) -> String {
    format!("{}_{}_seq", table.name.to_ascii_lowercase(), column.name)
}

/// Statements that create `table`, in execution order.
pub fn create_table(table: &TableDef, dialect: Dialect) -> Vec<String> {
    let mut statements = Vec::with_capacity(2);

    if dialect == Dialect::DuckDb {
        if let Some(column) = table.identity_column() {
            if let Some(identity) = column.identity {
                statements.push(format!(
                    "CREATE SEQUENCE IF NOT EXISTS {} INCREMENT BY {} MINVALUE {} START WITH {}",
                    quote_ident(&sequence_name(table, column)),
                    identity.step,
                    identity.seed,
                    identity.seed
                ));
            }
        }
    }

    let columns: Vec<String> = table
        .columns
        .iter()
        .map(|c| format!("    {}", column_definition(table, c, dialect)))
        .collect();

    let mut create = format!(
        "CREATE TABLE IF NOT EXISTS {} (\n{}\n)",
        quote_ident(table.name),
        columns.join(",\n")
    );
    if let Some(clause) = table.dist_style.clause(dialect) {
        create.push('\n');
        create.push_str(clause);
    }
    statements.push(create);

    statements
}

/// Statements that drop `table` and anything created alongside it.
pub fn drop_table(table: &TableDef, dialect: Dialect) -> Vec<String> {
    let mut statements = vec![format!("DROP TABLE IF EXISTS {}", quote_ident(table.name))];

    if dialect == Dialect::DuckDb {
        if let Some(column) = table.identity_column() {
            statements.push(format!(
                "DROP SEQUENCE IF EXISTS {}",
                quote_ident(&sequence_name(table, column))
            ));
        }
    }

    statements
}

fn column_definition(table: &TableDef, column: &Column, dialect: Dialect) -> String {
    let mut def = format!(
        "{} {}",
        quote_ident(column.name),
        column.ty.sql_type(dialect)
    );

    if let Some(identity) = column.identity {
        match dialect {
            Dialect::Redshift => {
                def.push_str(&format!(" IDENTITY({},{})", identity.seed, identity.step));
            }
            Dialect::DuckDb => {
                def.push_str(&format!(
                    " DEFAULT nextval({})",
                    quote_literal(&sequence_name(table, column))
                ));
            }
        }
    }

    if column.primary_key {
        def.push_str(" PRIMARY KEY");
    } else if !column.nullable {
        def.push_str(" NOT NULL");
    }

    def
}

#[cfg(test)]
#[path = "ddl_test.rs"]
mod tests;
