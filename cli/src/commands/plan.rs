use anyhow::{Result, bail};

use nosh_core::models::{validate_activity, validate_goal, validate_pace, validate_restrictions};
use nosh_core::service::NoshService;

pub(crate) fn cmd_plan_set(
    svc: &NoshService,
    goal: Option<String>,
    activity: Option<String>,
    pace: Option<String>,
    restrictions: Vec<String>,
    json: bool,
) -> Result<()> {
    if goal.is_none() && activity.is_none() && pace.is_none() && restrictions.is_empty() {
        bail!("Nothing to update. Pass at least one of --goal/--activity/--pace/--restrict");
    }

    let mut prefs = svc.preferences()?.unwrap_or_default();

    if let Some(ref g) = goal {
        prefs.goal = validate_goal(g)?;
    }
    if let Some(ref a) = activity {
        prefs.activity = validate_activity(a)?;
    }
    if let Some(ref p) = pace {
        prefs.pace = validate_pace(p)?;
    }
    if !restrictions.is_empty() {
        prefs.restrictions = validate_restrictions(&restrictions)?;
    }

    svc.set_preferences(&prefs)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
    } else {
        println!("Diet plan updated");
    }

    Ok(())
}

pub(crate) fn cmd_plan_show(svc: &NoshService, json: bool) -> Result<()> {
    let prefs = svc.preferences()?.unwrap_or_default();

    if json {
        println!("{}", serde_json::to_string_pretty(&prefs)?);
    } else {
        println!("Goal: {:?}", prefs.goal);
        println!("Activity: {:?}", prefs.activity);
        println!("Pace: {:?}", prefs.pace);
        if prefs.restrictions.is_empty() {
            println!("Restrictions: none");
        } else {
            let names: Vec<String> = prefs.restrictions.iter().map(|r| format!("{r:?}")).collect();
            println!("Restrictions: {}", names.join(", "));
        }
    }

    Ok(())
}
