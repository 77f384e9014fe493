//! Dry-run rendering of every statement a run would issue

use crate::error::PipelineResult;
use crate::lifecycle::{create_statements, drop_statements};
use crate::loader::LoadConfig;
use crate::report::Phase;
use serde::Serialize;
use sf_core::Dialect;
use sf_schema::Transform;
use std::fmt;

/// One rendered statement
#[derive(Debug, Clone, Serialize)]
pub struct PlannedStatement {
    pub phase: Phase,
    /// Step the statement belongs to
    pub step: String,
    pub table: String,
    pub sql: String,
}

/// Statements of a run, in execution order
#[derive(Debug, Clone, Serialize)]
pub struct Plan {
    pub dialect: Dialect,
    pub statements: Vec<PlannedStatement>,
}

impl Plan {
    pub fn in_phase(&self, phase: Phase) -> impl Iterator<Item = &PlannedStatement> {
        self.statements.iter().filter(move |s| s.phase == phase)
    }
}

impl fmt::Display for Plan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut current = None;
        for stmt in &self.statements {
            if current != Some(stmt.phase) {
                writeln!(f, "-- ==== {} phase ({}) ====", stmt.phase, self.dialect)?;
                current = Some(stmt.phase);
            }
            writeln!(f, "-- {} {}", stmt.step, stmt.table)?;
            writeln!(f, "{};\n", stmt.sql)?;
        }
        Ok(())
    }
}

/// Render the statements of `phases` for `dialect` without executing them.
///
/// Phases are emitted in run order regardless of the order given.
pub fn plan(dialect: Dialect, load_config: &LoadConfig, phases: &[Phase]) -> PipelineResult<Plan> {
    let mut statements = Vec::new();

    for phase in Phase::ALL {
        if !phases.contains(&phase) {
            continue;
        }
        match phase {
            Phase::Schema => {
                for (step, groups) in [
                    ("drop", drop_statements(dialect)),
                    ("create", create_statements(dialect)),
                ] {
                    for (table, sqls) in groups {
                        statements.extend(sqls.into_iter().map(|sql| PlannedStatement {
                            phase,
                            step: step.to_string(),
                            table: table.name.to_string(),
                            sql,
                        }));
                    }
                }
            }
            Phase::Load => {
                for job in [load_config.events_job(), load_config.songs_job()] {
                    statements.push(PlannedStatement {
                        phase,
                        step: "load".to_string(),
                        table: job.table.name.to_string(),
                        sql: job.render(dialect, &load_config.credential)?,
                    });
                }
            }
            Phase::Transform => {
                for transform in Transform::ALL {
                    let statement = transform.statement();
                    statement.validate()?;
                    statements.push(PlannedStatement {
                        phase,
                        step: transform.name().to_string(),
                        table: transform.target().name.to_string(),
                        sql: statement.to_sql(),
                    });
                }
            }
        }
    }

    Ok(Plan {
        dialect,
        statements,
    })
}

#[cfg(test)]
#[path = "plan_test.rs"]
mod tests;
