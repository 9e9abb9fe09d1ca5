//! CLI runner - executes commands

use crate::cli::commands::{params_map, split_list, Cli, Commands};
use crate::client::Dhis2Client;
use crate::config::{ClientConfig, ConnectionProfile};
use crate::error::Result;
use crate::pagination::{IterateOptions, PageRequest};
use crate::types::{JsonValue, QueryParams, QueryValue};
use futures::{pin_mut, StreamExt};
use serde::Serialize;
use std::fs;
use std::path::Path;
use tracing::debug;

/// CLI runner
pub struct Runner {
    cli: Cli,
}

impl Runner {
    /// Create a new runner
    pub fn new(cli: Cli) -> Self {
        Self { cli }
    }

    /// Run the CLI command
    pub async fn run(&self) -> Result<()> {
        let client = Dhis2Client::new(self.client_config()?)?;
        let result = self.dispatch(&client).await;
        client.close();
        result
    }

    async fn dispatch(&self, client: &Dhis2Client) -> Result<()> {
        match &self.cli.command {
            Commands::List {
                resource,
                fields,
                page,
                page_size,
                total_pages,
                collection_key,
                params,
            } => {
                let mut request = PageRequest::new(resource)
                    .fields(split_list(fields))
                    .page_size(*page_size)
                    .total_pages(*total_pages)
                    .params(params_map(params));
                if let Some(page) = page {
                    request = request.page(*page);
                }
                if let Some(key) = collection_key {
                    request = request.collection_key(key);
                }
                let page = client.list(&request).await?;
                print_json(&page)
            }
            Commands::Iterate {
                resource,
                fields,
                page_size,
                start_page,
                max_pages,
                limit,
                collection_key,
                params,
            } => {
                let mut template = PageRequest::new(resource)
                    .fields(split_list(fields))
                    .page_size(*page_size)
                    .params(params_map(params));
                if let Some(key) = collection_key {
                    template = template.collection_key(key);
                }
                let mut options = IterateOptions::new().start_page(*start_page);
                if let Some(max) = max_pages {
                    options = options.max_pages(*max);
                }
                self.iterate(client, template, options, *limit).await
            }
            Commands::Get {
                resource,
                uid,
                fields,
                params,
            } => {
                let object = client
                    .get_metadata(resource, uid, &split_list(fields), &params_map(params))
                    .await?;
                print_json(&object)
            }
            Commands::Analytics {
                dimension,
                filter,
                params,
            } => {
                let query = analytics_query(dimension, filter.as_deref(), &params_map(params));
                let analytics = client.get_analytics(&query).await?;
                print_json(&analytics)
            }
            Commands::PullDvs {
                data_set,
                period,
                org_unit,
                out,
                params,
            } => {
                let mut query = params_map(params);
                for (key, value) in [("dataSet", data_set), ("period", period), ("orgUnit", org_unit)] {
                    if let Some(value) = value {
                        query.insert(key.to_string(), QueryValue::Str(value.clone()));
                    }
                }
                let data = client.pull_data_value_set(&query).await?;
                match out {
                    Some(path) => {
                        fs::write(path, serde_json::to_string_pretty(&data)?)?;
                        println!("Wrote {}", path.display());
                        Ok(())
                    }
                    None => print_json(&data),
                }
            }
            Commands::PushDvs { file } => {
                let payload = read_json_file(file)?;
                let response = client.push_data_value_set(&payload).await?;
                print_json(&response)
            }
            Commands::Demo => self.demo(client).await,
        }
    }

    /// Smoke test against a live server
    async fn demo(&self, client: &Dhis2Client) -> Result<()> {
        println!("=== DHIS2 Client Demo ===");
        let request = PageRequest::new("dataElements")
            .fields(["id", "displayName", "valueType"])
            .page_size(5)
            .total_pages(true);
        let page = client.list(&request).await?;
        for element in page.items("dataElements") {
            println!(
                "DataElement: {} | {} | {}",
                text(element, "id"),
                text(element, "displayName"),
                text(element, "valueType")
            );
        }

        println!("First 10 organisationUnits via iterator:");
        let template = PageRequest::new("organisationUnits")
            .fields(["id", "displayName", "level"])
            .page_size(5);
        let units = client
            .iterate(template, IterateOptions::new().max_pages(2))
            .take(10);
        pin_mut!(units);
        while let Some(unit) = units.next().await {
            let unit = unit?;
            let level = unit.get("level").map(ToString::to_string).unwrap_or_default();
            println!(
                "OU: {} | {} | L{}",
                text(&unit, "id"),
                text(&unit, "displayName"),
                level
            );
        }
        Ok(())
    }

    /// Stream items, one compact JSON document per line
    async fn iterate(
        &self,
        client: &Dhis2Client,
        template: PageRequest,
        options: IterateOptions,
        limit: Option<usize>,
    ) -> Result<()> {
        let items = client.iterate(template, options);
        pin_mut!(items);

        let mut count = 0usize;
        while limit.map_or(true, |limit| count < limit) {
            let Some(item) = items.next().await else {
                break;
            };
            println!("{}", serde_json::to_string(&item?)?);
            count += 1;
        }

        debug!("Printed {} items", count);
        Ok(())
    }

    /// Resolve connection settings: flag or environment first, then profile
    fn client_config(&self) -> Result<ClientConfig> {
        let profile = match &self.cli.config {
            Some(path) => ConnectionProfile::from_yaml_file(path)?,
            None => ConnectionProfile::default(),
        };
        overlay_profile(&self.cli, profile).into_config()
    }
}

/// Layer command-line values over a loaded profile
pub(crate) fn overlay_profile(cli: &Cli, profile: ConnectionProfile) -> ConnectionProfile {
    ConnectionProfile {
        base_url: cli.base_url.clone().or(profile.base_url),
        username: cli.user.clone().or(profile.username),
        password: cli.password.clone().or(profile.password),
        timeout_secs: cli.timeout.or(profile.timeout_secs),
        user_agent: profile.user_agent,
    }
}

/// Analytics query from repeated, possibly comma-separated `--dimension`s
pub(crate) fn analytics_query(
    dimensions: &[String],
    filter: Option<&str>,
    extra: &QueryParams,
) -> QueryParams {
    let mut query = QueryParams::new();
    let dimensions: Vec<String> = dimensions.iter().flat_map(|d| split_list(d)).collect();
    if !dimensions.is_empty() {
        query.insert("dimension".to_string(), QueryValue::List(dimensions));
    }
    if let Some(filter) = filter {
        query.insert("filter".to_string(), filter.into());
    }
    query.extend(extra.clone());
    query
}

fn text<'a>(item: &'a JsonValue, key: &str) -> &'a str {
    item.get(key).and_then(JsonValue::as_str).unwrap_or_default()
}

fn read_json_file(path: &Path) -> Result<JsonValue> {
    let contents = fs::read_to_string(path)?;
    Ok(serde_json::from_str(&contents)?)
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
