//! Download command - Helm downloader for `cm://` URIs

use std::io::Write;

use crate::error::Result;
use helmpush_repo::{ChartMuseumClient, ClientOptions, DownloadTarget, EnvSource, InvocationParameters};

/// Fetch the file behind a `cm://` URI and copy its bytes to `out`
pub async fn run<W: Write>(
    uri: &str,
    params: &InvocationParameters,
    env: &impl EnvSource,
    out: &mut W,
) -> Result<()> {
    let connection = params.resolve(env);
    let target = DownloadTarget::parse(uri)?;
    let base_url = target.base_url(connection.use_http);

    tracing::debug!(%uri, %base_url, file = %target.file_path, "resolved download target");

    let client = ChartMuseumClient::new(ClientOptions {
        url: base_url,
        username: connection.username,
        password: connection.password,
        access_token: connection.access_token,
        context_path: connection.context_path,
    })?;

    let contents = client.download_file(&target.file_path).await?;

    out.write_all(&contents)?;
    out.flush()?;
    Ok(())
}
