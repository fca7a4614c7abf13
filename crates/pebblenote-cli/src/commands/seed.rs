use crate::commands::common::CliService;
use crate::error::CliError;

pub async fn run_seed(service: &CliService) -> Result<(), CliError> {
    let created = service.seed_demo_notes().await?;
    if created.is_empty() {
        println!("Notes already exist; nothing seeded.");
    } else {
        for note in &created {
            println!("{}", note.id);
        }
    }
    Ok(())
}
