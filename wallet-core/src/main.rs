use anyhow::Result;
use shared::{AddRecipientRequest, WalletConfig};
use tracing::{info, warn};

use wallet_core::backend::io::{HostSignal, SignalReceiver};
use wallet_core::{initialize_backend, logging};

const DEMO_CONFIG: &str = r#"
processing_delay_ms: 500
auto_dismiss_ms: 750
"#;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init_logging()?;

    let config = WalletConfig::from_yaml_str(DEMO_CONFIG)?;
    let backend = initialize_backend(config)?;
    let money = backend.top_up_service().money().clone();

    info!("Starting scripted transfer");
    let (mut transfer, mut transfer_signals) = backend.start_transfer();
    let groups = transfer.search_recipients("")?;
    info!("{} frequent and {} other contacts", groups.frequent.len(), groups.others.len());

    let ann = transfer.add_recipient(AddRecipientRequest {
        name: "Ann Lee".to_string(),
        phone: "+1 (555) 010-2030".to_string(),
        ..AddRecipientRequest::default()
    })?;
    info!("Sending to {} ({})", ann.display_name, ann.initials());

    let validation = transfer.set_amount_input("$42.50")?;
    if !validation.is_valid {
        warn!("Amount rejected: {:?}", money.first_error_message(&validation.errors));
    }
    transfer.set_note("Concert tickets")?;
    transfer.confirm_amount()?;

    let receipt = transfer.submit().await?;
    info!(
        "Sent {} to {} with reference {}",
        money.format_cents(receipt.amount_cents),
        receipt.recipient.handle,
        receipt.reference_id
    );
    drain_until_closed(&mut transfer_signals).await;

    info!("Starting scripted card entry");
    let (mut add_card, mut card_signals) = backend.start_add_card();
    add_card.input_number("3400 000000 00009")?;
    add_card.input_name("Ann Lee")?;
    add_card.input_expiry("0929")?;
    add_card.input_cvv("1234")?;
    add_card.set_default(true)?;
    let card = add_card.submit().await?;
    info!("Saved {} {}", card.network, card.masked_number());
    drain_until_closed(&mut card_signals).await;

    for card in backend.card_service().list_cards()? {
        info!(
            "Card {} {} added {}{}",
            card.id,
            card.masked_number(),
            card.added_date,
            if card.is_default { " (default)" } else { "" }
        );
    }

    let source = shared::FundingSource::Mobile;
    let amount_cents = backend.top_up_service().validate_top_up("25", &source)?;
    let top_up = backend.top_up_service().create_receipt(amount_cents, &source);
    info!(
        "Top-up {} via {}: total {}",
        top_up.reference_id,
        top_up.method,
        money.format_cents(top_up.total_cents)
    );

    Ok(())
}

async fn drain_until_closed(signals: &mut SignalReceiver) {
    while let Some(signal) = signals.recv().await {
        match signal {
            HostSignal::TransferCompleted { draft_id, receipt } => {
                info!("Host: transfer {} completed ({})", draft_id, receipt.reference_id);
            }
            HostSignal::CardAdded { session_id, card } => {
                info!("Host: session {} added card {}", session_id, card.id);
            }
            HostSignal::CloseRequested { session_id, reason } => {
                info!("Host: closing {} ({:?})", session_id, reason);
                break;
            }
        }
    }
}
