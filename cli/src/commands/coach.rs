use anyhow::Result;
use chrono::Local;

use crate::coach::{CoachClient, build_context};
use nosh_core::service::NoshService;

pub(crate) async fn cmd_coach(
    svc: &NoshService,
    client: &CoachClient,
    message: &str,
    json: bool,
) -> Result<()> {
    let today = Local::now().date_naive();
    let targets = svc.compute_goals()?;
    let totals = svc.totals(today)?;
    let streak = svc.streak()?;

    let context = build_context(&targets, &totals, &streak);
    let reply = client.advise(&context, message).await?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({ "reply": reply }))?
        );
    } else {
        println!("{reply}");
    }

    Ok(())
}
