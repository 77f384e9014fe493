//! DDL lifecycle: drop and recreate every catalog table
//!
//! All drops run before any create. Creation relies on `IF NOT EXISTS`
//! rather than swallowing errors, so any failure here is real and aborts.

use crate::error::{PipelineError, PipelineResult};
use crate::report::{Phase, RunReport, StepResult};
use sf_core::Dialect;
use sf_db::Warehouse;
use sf_schema::ddl::{create_table, drop_table};
use sf_schema::{TableDef, ALL_TABLES};
use std::time::Instant;

/// Drop statements for every catalog table, grouped per table
pub fn drop_statements(dialect: Dialect) -> Vec<(&'static TableDef, Vec<String>)> {
    ALL_TABLES
        .iter()
        .map(|table| (*table, drop_table(table, dialect)))
        .collect()
}

/// Creation statements for every catalog table, grouped per table
pub fn create_statements(dialect: Dialect) -> Vec<(&'static TableDef, Vec<String>)> {
    ALL_TABLES
        .iter()
        .map(|table| (*table, create_table(table, dialect)))
        .collect()
}

/// Issues the schema phase against one warehouse
pub struct SchemaManager<'a> {
    warehouse: &'a dyn Warehouse,
}

impl<'a> SchemaManager<'a> {
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self { warehouse }
    }

    /// Drop every table; absent tables are a no-op
    pub async fn drop_all(&self, report: &mut RunReport) -> PipelineResult<()> {
        log::info!("Dropping {} tables", ALL_TABLES.len());
        let statements = drop_statements(self.warehouse.dialect());
        self.apply("drop", statements, report).await
    }

    /// Create every table; tables that already exist are left as they are
    pub async fn create_all(&self, report: &mut RunReport) -> PipelineResult<()> {
        log::info!("Creating {} tables", ALL_TABLES.len());
        let statements = create_statements(self.warehouse.dialect());
        self.apply("create", statements, report).await
    }

    /// `drop_all` then `create_all`
    pub async fn reset(&self, report: &mut RunReport) -> PipelineResult<()> {
        self.drop_all(report).await?;
        self.create_all(report).await
    }

    async fn apply(
        &self,
        step: &str,
        statements: Vec<(&'static TableDef, Vec<String>)>,
        report: &mut RunReport,
    ) -> PipelineResult<()> {
        for (table, sqls) in statements {
            let start = Instant::now();
            for sql in &sqls {
                if let Err(source) = self.warehouse.execute(sql).await {
                    let err = PipelineError::Schema {
                        table: table.name.to_string(),
                        source,
                    };
                    report.push(StepResult::error(
                        Phase::Schema,
                        step,
                        table.name,
                        &err,
                        start.elapsed(),
                    ));
                    return Err(err);
                }
            }
            log::debug!("{step} {} ok", table.name);
            report.push(StepResult::success(
                Phase::Schema,
                step,
                table.name,
                None,
                start.elapsed(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "lifecycle_test.rs"]
mod tests;
