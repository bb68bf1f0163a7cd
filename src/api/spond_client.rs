use crate::api::parsers;
use crate::api::source::RosterSource;
use crate::config::SourceSettings;
use crate::domain::{Event, Member, Roster};
use crate::http::RateLimitedClient;
use anyhow::{Context, Result, bail};
use chrono::{DateTime, Duration, Utc};
use log::info;
use serde_json::{Value, json};
use urlencoding::encode;

/// Spond API client
pub struct SpondClient {
    client: RateLimitedClient,
    settings: SourceSettings,
}

impl SpondClient {
    pub fn new(settings: SourceSettings) -> Result<Self> {
        if settings.username.is_empty() || settings.password.is_empty() {
            bail!("Spond credentials missing: set SPOND_USERNAME and SPOND_PASSWORD");
        }
        if settings.group_id.is_empty() {
            bail!("Spond group missing: set SPOND_GROUP_ID");
        }

        let client = RateLimitedClient::new(
            settings.user_agent,
            settings.timeout_secs,
            settings.rate_limit_ms,
        )?;
        Ok(Self { client, settings })
    }

    pub async fn login(&mut self) -> Result<()> {
        let url = format!("{}/login", self.settings.api_base_url);
        let body = json!({
            "email": self.settings.username,
            "password": self.settings.password,
        });

        let response = self.client.post_json(&url, &body).await?;
        if !response.status().is_success() {
            bail!("Spond login failed with status: {}", response.status());
        }

        let data: Value = response.json().await.context("Failed to read login response")?;
        let token = parsers::parse_login_token(&data).context("Spond login returned no token")?;
        self.client.set_bearer_token(token);

        info!("Logged in to Spond as {}", self.settings.username);
        Ok(())
    }

    /// Members of the configured group
    pub async fn fetch_members(&mut self) -> Result<Vec<Member>> {
        let url = format!("{}/groups/", self.settings.api_base_url);
        let data = self.get_json(&url).await?;

        let members = parsers::find_group_members(&data, &self.settings.group_id)
            .with_context(|| format!("Group {} not found in Spond account", self.settings.group_id))?;

        info!("Fetched {} members", members.len());
        Ok(members)
    }

    /// Events of the configured group that started in the last `days_back` days
    pub async fn fetch_events(&mut self, now: DateTime<Utc>) -> Result<Vec<Event>> {
        let url = self.build_events_url(now);
        let data = self.get_json(&url).await?;
        let events = parsers::parse_events(&data)?;

        info!("Fetched {} events", events.len());
        Ok(events)
    }

    // --- Helper Methods ---

    fn build_events_url(&self, now: DateTime<Utc>) -> String {
        let min_start = now - Duration::days(self.settings.days_back);
        format!(
            "{}/sponds/?groupId={}&minStartTimestamp={}&maxStartTimestamp={}&max={}&includeComments=false&order=asc",
            self.settings.api_base_url,
            encode(&self.settings.group_id),
            encode(&format_timestamp(min_start)),
            encode(&format_timestamp(now)),
            self.settings.max_events
        )
    }

    async fn get_json(&mut self, url: &str) -> Result<Value> {
        if !self.client.is_authenticated() {
            self.login().await?;
        }

        let response = self.client.get(url).await?;
        if !response.status().is_success() {
            bail!("Spond API returned status: {}", response.status());
        }
        response
            .json()
            .await
            .with_context(|| format!("Failed to parse JSON from {url}"))
    }
}

impl RosterSource for SpondClient {
    async fn fetch_roster(&mut self) -> Result<Roster> {
        self.client.reset_rate_limit();
        let members = self.fetch_members().await?;
        let events = self.fetch_events(Utc::now()).await?;
        Ok(Roster { events, members })
    }
}

fn format_timestamp(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
