use chrono_tz::Tz;
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use tracing::{error, info};

use crate::{clone_into_closure, config::Config, error::PurgeError, purge::{PurgeReport, Purger}};

/// runs one purge, logging the failure before handing it back
pub async fn run_logged(purger: &Purger) -> Result<PurgeReport, PurgeError> {
    purger.run().await
        .inspect_err(|err| error!(error = %err, "error deleting old suggestions"))
}

pub fn purge_job(schedule: &str, timezone: Tz, purger: Purger) -> Result<Job, JobSchedulerError> {
    Job::new_async_tz(schedule, timezone, move |_, _| {
        clone_into_closure! {
            (purger)
            Box::pin(async move {
                // the next tick is the only retry
                let _ = run_logged(&purger).await;
            })
        }
    })
}

pub async fn start_task(purger: Purger, config: &Config) -> Result<JobScheduler, JobSchedulerError> {

    info!(schedule = %config.schedule, timezone = %config.timezone, "starting suggestion purge task");

    if config.purge_on_startup {
        let _ = run_logged(&purger).await;
    }

    let sched = JobScheduler::new().await?;

    sched.add(purge_job(&config.schedule, config.timezone, purger)?).await?;

    sched.start().await?;

    Ok(sched)
}
