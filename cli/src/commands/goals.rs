use anyhow::Result;

use nosh_core::goals::bmr;
use nosh_core::service::NoshService;

pub(crate) fn cmd_goals(svc: &NoshService, json: bool) -> Result<()> {
    let targets = svc.compute_goals()?;
    let profile = svc.profile()?.unwrap_or_default();
    let used_fallback = bmr(&profile).is_none();

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "targets": targets,
                "estimated": used_fallback,
            }))?
        );
        return Ok(());
    }

    println!("Daily targets:");
    println!("  Calories: {} kcal", targets.calories);
    println!("  Protein:  {}g", targets.protein_g);
    println!("  Carbs:    {}g", targets.carbs_g);
    println!("  Fat:      {}g", targets.fat_g);
    if used_fallback {
        println!("\nEstimated from goal and activity only.");
        println!("Set weight, height and age with `nosh profile set` for a personalised target.");
    }

    Ok(())
}
