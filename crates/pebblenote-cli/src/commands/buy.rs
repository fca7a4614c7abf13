use pebblenote_core::catalog::format_price;
use pebblenote_core::{Error, PaymentMethod};

use crate::commands::common::{
    format_purchase_lines, parse_note_id, purchase_to_item, CliService, PurchaseItem,
};
use crate::error::CliError;

pub async fn run_buy(
    id: &str,
    method: PaymentMethod,
    service: &CliService,
) -> Result<(), CliError> {
    let note_id = parse_note_id(id)?;
    let purchase = match service.purchase(note_id, method).await {
        Ok(purchase) => purchase,
        Err(Error::NotFound(_)) => return Err(CliError::NoteNotFound(note_id.to_string())),
        Err(error) => return Err(error.into()),
    };

    println!(
        "Purchased \"{}\" for {} via {}",
        purchase.title,
        format_price(purchase.price),
        purchase.method
    );
    Ok(())
}

pub async fn run_purchases(as_json: bool, service: &CliService) -> Result<(), CliError> {
    let purchases = service.list_purchases().await?;

    if as_json {
        let json_items = purchases
            .iter()
            .map(purchase_to_item)
            .collect::<Vec<PurchaseItem>>();
        println!("{}", serde_json::to_string_pretty(&json_items)?);
        return Ok(());
    }

    if purchases.is_empty() {
        println!("No purchases recorded.");
        return Ok(());
    }

    for line in format_purchase_lines(&purchases) {
        println!("{line}");
    }
    Ok(())
}
