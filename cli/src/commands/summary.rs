use anyhow::Result;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use nosh_core::service::NoshService;

use super::helpers::parse_date;

pub(crate) fn cmd_summary(svc: &NoshService, date: Option<String>, json: bool) -> Result<()> {
    let date = parse_date(date)?;
    let totals = svc.totals(date)?;
    let targets = svc.compute_goals()?;
    let streak = svc.streak()?;

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "date": date.format("%Y-%m-%d").to_string(),
                "totals": totals,
                "targets": targets,
                "streak": streak.count,
            }))?
        );
        return Ok(());
    }

    #[derive(Tabled)]
    struct MacroRow {
        #[tabled(rename = "Macro")]
        name: &'static str,
        #[tabled(rename = "Eaten")]
        eaten: String,
        #[tabled(rename = "Target")]
        target: String,
        #[tabled(rename = "Left")]
        left: String,
    }

    #[allow(clippy::cast_precision_loss)]
    let row = |name: &'static str, eaten: f64, target: i64| MacroRow {
        name,
        eaten: format!("{eaten:.0}g"),
        target: format!("{target}g"),
        left: format!("{:.0}g", (target as f64 - eaten).max(0.0)),
    };

    let rows = vec![
        row("Protein", totals.protein_g, targets.protein_g),
        row("Carbs", totals.carbs_g, targets.carbs_g),
        row("Fat", totals.fat_g, targets.fat_g),
    ];

    println!("{}", date.format("%Y-%m-%d"));
    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(1..4)).with(Alignment::right()))
        .to_string();
    println!("{table}");
    println!("Calorie target: {} kcal. Streak: {} days.", targets.calories, streak.count);

    Ok(())
}

pub(crate) fn cmd_streak(svc: &NoshService, json: bool) -> Result<()> {
    let streak = svc.streak()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&streak)?);
    } else if streak.count == 0 {
        println!("No logging streak yet. Log a meal to start one.");
    } else {
        let days = streak.count;
        let plural = if days == 1 { "day" } else { "days" };
        println!("Current streak: {days} {plural}");
        if let Some(last) = streak.last_logged {
            println!("Last logged: {}", last.format("%Y-%m-%d"));
        }
        println!("Days logged in the last two weeks: {}", streak.recent_dates.len());
    }

    Ok(())
}
