use anyhow::Result;
use std::process;

use crate::spoonacular::SpoonacularClient;
use nosh_core::error::LookupError;
use nosh_core::models::NutritionRecord;
use nosh_core::service::NoshService;

use super::helpers::{describe_record, json_error, parse_date};

fn report_logged(svc: &NoshService, record: &NutritionRecord, date: chrono::NaiveDate, json: bool) -> Result<()> {
    if json {
        let totals = svc.totals(date)?;
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "record": record,
                "totals": totals,
            }))?
        );
    } else {
        println!("{}", describe_record(record));
    }
    Ok(())
}

fn report_lookup_error(err: LookupError, json: bool) -> Result<()> {
    match err {
        LookupError::NoDataFound => {
            if json {
                println!("{}", json_error("No nutrition data found"));
            } else {
                eprintln!("No nutrition data found");
            }
            process::exit(2);
        }
        LookupError::QuotaExceeded => {
            if json {
                println!("{}", json_error("Daily lookup quota exhausted"));
            } else {
                eprintln!("Daily lookup quota exhausted. Try `nosh log --offline` or wait for the midnight reset.");
            }
            process::exit(3);
        }
        other => Err(other.into()),
    }
}

pub(crate) fn cmd_log(
    svc: &NoshService,
    client: Option<&SpoonacularClient>,
    query: &str,
    offline: bool,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;

    let result = if offline {
        svc.log_from_catalog(query, date)
    } else if let Some(client) = client {
        svc.log_from_search(client, query, date)
    } else {
        // No API key configured; the offline catalog still works
        svc.log_from_catalog(query, date)
    };

    match result {
        Ok(record) => report_logged(svc, &record, date, json),
        Err(err) => report_lookup_error(err, json),
    }
}

pub(crate) fn cmd_photo(
    svc: &NoshService,
    client: &SpoonacularClient,
    image: &str,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;

    match svc.log_from_image(client, image, date) {
        Ok(record) => report_logged(svc, &record, date, json),
        Err(err) => report_lookup_error(err, json),
    }
}

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_add(
    svc: &NoshService,
    title: &str,
    calories: f64,
    protein: f64,
    carbs: f64,
    fat: f64,
    date: Option<String>,
    json: bool,
) -> Result<()> {
    let date = parse_date(date)?;
    let record = NutritionRecord::new(title, calories, protein, carbs, fat);
    svc.log_meal(&record, date)?;
    report_logged(svc, &record, date, json)
}
