use crate::commands::common::CliService;
use crate::error::CliError;

pub async fn run_pull(service: &CliService) -> Result<(), CliError> {
    let report = service.pull_from_mirror().await?;
    println!(
        "Pull completed: {} added, {} replaced, {} unchanged, {} local only",
        report.added, report.replaced, report.unchanged, report.local_only
    );
    Ok(())
}
