//! Transform engine: populate the star schema from staging

use crate::error::{PipelineError, PipelineResult};
use crate::report::{Phase, StepResult};
use futures::future::join_all;
use sf_db::Warehouse;
use sf_schema::Transform;
use std::time::Instant;

/// Runs population statements against one warehouse
pub struct TransformEngine<'a> {
    warehouse: &'a dyn Warehouse,
}

impl<'a> TransformEngine<'a> {
    pub fn new(warehouse: &'a dyn Warehouse) -> Self {
        Self { warehouse }
    }

    /// Validate and execute one population, returning the rows inserted
    pub async fn populate(&self, transform: Transform) -> PipelineResult<usize> {
        let statement = transform.statement();
        statement.validate()?;

        let rows = self
            .warehouse
            .execute(&statement.to_sql())
            .await
            .map_err(|source| PipelineError::Transform {
                step: transform.name().to_string(),
                source,
            })?;
        log::info!("{}: {} rows into {}", transform, rows, transform.target().name);
        Ok(rows)
    }

    pub async fn populate_users(&self) -> PipelineResult<usize> {
        self.populate(Transform::Users).await
    }

    pub async fn populate_songs(&self) -> PipelineResult<usize> {
        self.populate(Transform::Songs).await
    }

    pub async fn populate_artists(&self) -> PipelineResult<usize> {
        self.populate(Transform::Artists).await
    }

    pub async fn populate_time(&self) -> PipelineResult<usize> {
        self.populate(Transform::Time).await
    }

    pub async fn populate_songplays(&self) -> PipelineResult<usize> {
        self.populate(Transform::SongPlays).await
    }

    /// Run one population and record its outcome instead of returning early
    pub async fn run_step(&self, transform: Transform) -> StepResult {
        let start = Instant::now();
        let target = transform.target().name;
        match self.populate(transform).await {
            Ok(rows) => StepResult::success(
                Phase::Transform,
                transform.name(),
                target,
                Some(rows),
                start.elapsed(),
            ),
            Err(e) => {
                log::error!("{e}");
                StepResult::error(Phase::Transform, transform.name(), target, &e, start.elapsed())
            }
        }
    }

    /// The four dimension populations, issued concurrently. Results come
    /// back in `Transform::DIMENSIONS` order.
    pub async fn populate_dimensions(&self) -> Vec<StepResult> {
        join_all(Transform::DIMENSIONS.iter().map(|t| self.run_step(*t))).await
    }

    /// Every population: dimensions first, then the fact table. A failed
    /// dimension does not stop the fact population.
    pub async fn run_all(&self) -> Vec<StepResult> {
        let mut steps = self.populate_dimensions().await;
        steps.push(self.run_step(Transform::SongPlays).await);
        steps
    }
}

#[cfg(test)]
#[path = "transform_test.rs"]
mod tests;
