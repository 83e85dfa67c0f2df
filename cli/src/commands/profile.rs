use anyhow::{Result, bail};

use nosh_core::models::validate_sex;
use nosh_core::service::NoshService;

use super::helpers::parse_date;

#[allow(clippy::too_many_arguments)]
pub(crate) fn cmd_profile_set(
    svc: &NoshService,
    name: Option<String>,
    weight: Option<f64>,
    goal_weight: Option<f64>,
    height: Option<f64>,
    age: Option<u32>,
    sex: Option<String>,
    json: bool,
) -> Result<()> {
    if name.is_none()
        && weight.is_none()
        && goal_weight.is_none()
        && height.is_none()
        && age.is_none()
        && sex.is_none()
    {
        bail!("Nothing to update. Pass at least one of --name/--weight/--goal-weight/--height/--age/--sex");
    }

    let mut profile = svc.profile()?.unwrap_or_default();

    if let Some(name) = name {
        profile.display_name = name;
    }
    if let Some(goal_weight) = goal_weight {
        if goal_weight <= 0.0 {
            bail!("Goal weight must be greater than 0");
        }
        profile.goal_weight_kg = goal_weight;
    }
    if let Some(height) = height {
        if height <= 0.0 {
            bail!("Height must be greater than 0");
        }
        profile.height_cm = height;
    }
    if let Some(age) = age {
        profile.age = age;
    }
    if let Some(ref s) = sex {
        profile.sex = validate_sex(s)?;
    }

    svc.set_profile(&profile)?;

    // Weight goes through the history-consistent path
    if let Some(weight) = weight {
        if weight <= 0.0 {
            bail!("Weight must be greater than 0");
        }
        let today = parse_date(None)?;
        svc.set_weight(today, weight)?;
    }

    let profile = svc.profile()?.unwrap_or_default();
    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        println!("Profile updated");
    }

    Ok(())
}

pub(crate) fn cmd_profile_show(svc: &NoshService, json: bool) -> Result<()> {
    let Some(profile) = svc.profile()? else {
        if json {
            println!("{}", super::helpers::json_error("No profile set"));
        } else {
            eprintln!("No profile yet. Use `nosh profile set` to create one.");
        }
        return Ok(());
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&profile)?);
    } else {
        let name = if profile.display_name.is_empty() {
            "(unnamed)"
        } else {
            &profile.display_name
        };
        println!("{name}");
        println!("  Weight: {:.1} kg (goal {:.1} kg)", profile.weight_kg, profile.goal_weight_kg);
        println!("  Height: {:.0} cm", profile.height_cm);
        println!("  Age: {}", profile.age);
        println!("  Sex: {:?}", profile.sex);
    }

    Ok(())
}
