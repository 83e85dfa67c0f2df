use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use nosh_core::ledger::DailyMacroTotals;
use nosh_core::models::MacroTargets;
use nosh_core::streak::StreakState;

const CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";
const MODEL: &str = "gpt-4o-mini";

/// Stateless text-in/text-out coaching client. Each message carries
/// the day's numbers as context; nothing it says feeds back into
/// stored state.
pub struct CoachClient {
    client: reqwest::Client,
    api_key: String,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: String,
}

impl CoachClient {
    pub fn new(api_key: String) -> Self {
        let client = reqwest::Client::builder()
            .user_agent(format!("nosh-cli/{} (macro tracker)", env!("CARGO_PKG_VERSION")))
            .timeout(std::time::Duration::from_secs(30))
            .connect_timeout(std::time::Duration::from_secs(5))
            .build()
            .expect("Failed to build HTTP client");
        Self { client, api_key }
    }

    pub async fn advise(&self, context: &str, message: &str) -> Result<String> {
        let request = ChatRequest {
            model: MODEL,
            messages: vec![
                ChatMessage {
                    role: "system",
                    content: context,
                },
                ChatMessage {
                    role: "user",
                    content: message,
                },
            ],
        };

        let resp = self
            .client
            .post(CHAT_URL)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .context("Failed to reach coach API")?;

        if !resp.status().is_success() {
            bail!("Coach API returned HTTP {}", resp.status());
        }

        let data: ChatResponse = resp
            .json()
            .await
            .context("Failed to parse coach response")?;

        data.choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .context("Coach response contained no choices")
    }
}

/// System prompt carrying today's numbers for the coach.
#[must_use]
pub fn build_context(
    targets: &MacroTargets,
    totals: &DailyMacroTotals,
    streak: &StreakState,
) -> String {
    format!(
        "You are a pragmatic nutrition coach. Keep answers short and concrete.\n\
         Daily targets: {} kcal, {}g protein, {}g carbs, {}g fat.\n\
         Eaten today: {:.0}g protein, {:.0}g carbs, {:.0}g fat.\n\
         Current logging streak: {} days.",
        targets.calories,
        targets.protein_g,
        targets.carbs_g,
        targets.fat_g,
        totals.protein_g,
        totals.carbs_g,
        totals.fat_g,
        streak.count,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_context_carries_numbers() {
        let targets = MacroTargets {
            calories: 1978,
            protein_g: 148,
            carbs_g: 197,
            fat_g: 65,
        };
        let totals = DailyMacroTotals {
            date: NaiveDate::from_ymd_opt(2025, 3, 10).unwrap(),
            protein_g: 52.0,
            carbs_g: 110.0,
            fat_g: 31.0,
        };
        let streak = StreakState {
            count: 6,
            last_logged: Some(NaiveDate::from_ymd_opt(2025, 3, 10).unwrap()),
            recent_dates: std::collections::BTreeSet::new(),
        };
        let context = build_context(&targets, &totals, &streak);
        assert!(context.contains("1978 kcal"));
        assert!(context.contains("148g protein"));
        assert!(context.contains("52g protein"));
        assert!(context.contains("6 days"));
    }
}
