mod coach;
mod goals;
mod helpers;
mod log;
mod plan;
mod profile;
mod quota;
mod summary;
mod weight;

pub(crate) use coach::cmd_coach;
pub(crate) use goals::cmd_goals;
pub(crate) use log::{cmd_add, cmd_log, cmd_photo};
pub(crate) use plan::{cmd_plan_set, cmd_plan_show};
pub(crate) use profile::{cmd_profile_set, cmd_profile_show};
pub(crate) use quota::{cmd_quota_reset, cmd_quota_show};
pub(crate) use summary::{cmd_streak, cmd_summary};
pub(crate) use weight::{cmd_weight_history, cmd_weight_log, cmd_weight_show};
