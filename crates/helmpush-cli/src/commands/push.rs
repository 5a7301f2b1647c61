//! Push command - package a chart and upload it to a ChartMuseum repository

use console::style;
use std::path::Path;

use crate::error::{CliError, Result};
use helmpush_core::{Chart, create_package};
use helmpush_repo::{
    ChartMuseumClient, ClientOptions, EnvSource, InvocationParameters, Repository,
    RepositoryConfig,
};

/// Prefix of the per-invocation packaging directory
const TEMP_PREFIX: &str = "helm-push-";

/// Package `params.chart_name` and push it to `params.repo_name`
///
/// The package is written to a fresh directory under `work_dir`, which is
/// removed again however this function returns.
pub async fn run(params: &InvocationParameters, env: &impl EnvSource, work_dir: &Path) -> Result<()> {
    let chart_name = non_empty(params.chart_name.as_deref())
        .ok_or_else(|| CliError::input("chart name must not be empty"))?;
    let repo_name = non_empty(params.repo_name.as_deref())
        .ok_or_else(|| CliError::input("repository name must not be empty"))?;

    let connection = params.resolve(env);

    let repo = match Repository::from_url(repo_name) {
        Some(repo) => repo,
        None => RepositoryConfig::load(env)?.require(repo_name)?.clone(),
    };

    let mut chart = Chart::load(chart_name)?;

    if let Some(version) = non_empty(params.chart_version.as_deref()) {
        tracing::debug!(from = chart.version(), to = version, "overriding chart version");
        chart.set_version(version);
    }

    // Explicit credentials win over the ones stored with the repository
    let username = if connection.username.is_empty() {
        repo.username.clone()
    } else {
        connection.username.clone()
    };
    let password = if connection.password.is_empty() {
        repo.password.clone()
    } else {
        connection.password.clone()
    };

    let client = ChartMuseumClient::new(ClientOptions {
        url: repo.url.clone(),
        username,
        password,
        access_token: connection.access_token,
        context_path: connection.context_path,
    })?;

    let tmp = tempfile::Builder::new()
        .prefix(TEMP_PREFIX)
        .tempdir_in(work_dir)?;

    let package = create_package(&chart, tmp.path())?;
    let package_name = package
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();

    println!(
        "{} {} to {}...",
        style("Pushing").cyan().bold(),
        package_name,
        repo_name
    );

    let response = client.upload_chart_package(&package).await?;
    response.interpret()?;

    println!("{}", style("Done.").green().bold());
    Ok(())
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.is_empty())
}
