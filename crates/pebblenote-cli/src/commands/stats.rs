use pebblenote_core::catalog::format_price;

use crate::commands::common::CliService;
use crate::error::CliError;

pub async fn run_stats(as_json: bool, service: &CliService) -> Result<(), CliError> {
    let insights = service.insights().await?;

    if as_json {
        println!("{}", serde_json::to_string_pretty(&insights)?);
        return Ok(());
    }

    println!("Total notes:    {}", insights.total_notes);
    println!("Enabled notes:  {}", insights.enabled_notes);
    println!("Disabled notes: {}", insights.disabled_notes);
    println!("Total sales:    {}", insights.total_sales);
    println!("Revenue:        {}", format_price(insights.revenue));
    Ok(())
}
