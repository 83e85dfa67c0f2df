use anyhow::Result;
use chrono::Local;

use nosh_core::quota::DAILY_CALL_LIMIT;
use nosh_core::service::NoshService;

pub(crate) fn cmd_quota_show(svc: &NoshService, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let quota = svc.quota(today)?;
    let remaining = quota.remaining(today);

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "limit": DAILY_CALL_LIMIT,
                "remaining": remaining,
            }))?
        );
    } else {
        println!("Remote lookups remaining today: {remaining}/{DAILY_CALL_LIMIT}");
    }

    Ok(())
}

pub(crate) fn cmd_quota_reset(svc: &NoshService, json: bool) -> Result<()> {
    let today = Local::now().date_naive();
    let quota = svc.reset_quota(today)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&quota)?);
    } else {
        println!("Quota reset: {DAILY_CALL_LIMIT} lookups available");
    }

    Ok(())
}
