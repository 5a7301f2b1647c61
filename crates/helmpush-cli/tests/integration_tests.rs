//! Integration tests for the helmpush binary

use std::path::{Path, PathBuf};
use std::process::Output;
use tempfile::TempDir;
use tokio::process::Command;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Helper to run the binary with a clean `HELM_REPO_*` environment
async fn helmpush(args: &[&str], env: &[(&str, &str)]) -> Output {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_helmpush"));
    cmd.args(args);
    for var in [
        "HELM_REPO_USERNAME",
        "HELM_REPO_PASSWORD",
        "HELM_REPO_ACCESS_TOKEN",
        "HELM_REPO_CONTEXT_PATH",
        "HELM_REPO_USE_HTTP",
        "HELM_REPOSITORY_CONFIG",
        "HELM_HOME",
        "CLICOLOR_FORCE",
        "RUST_LOG",
    ] {
        cmd.env_remove(var);
    }
    for (key, value) in env {
        cmd.env(key, value);
    }
    cmd.output().await.expect("Failed to execute helmpush")
}

struct Workspace {
    root: TempDir,
}

impl Workspace {
    fn new() -> Self {
        let root = TempDir::new().unwrap();
        std::fs::create_dir_all(root.path().join("tmp")).unwrap();
        Self { root }
    }

    fn tmp(&self) -> PathBuf {
        self.root.path().join("tmp")
    }

    fn chart_dir(&self) -> PathBuf {
        let dir = self.root.path().join("mychart");
        std::fs::create_dir_all(dir.join("templates")).unwrap();
        std::fs::write(
            dir.join("Chart.yaml"),
            "apiVersion: v2\nname: mychart\nversion: 0.1.0\n",
        )
        .unwrap();
        std::fs::write(dir.join("values.yaml"), "replicaCount: 1\n").unwrap();
        std::fs::write(dir.join("templates").join("svc.yaml"), "kind: Service\n").unwrap();
        dir
    }

    /// A chart archive as produced by `helm package`
    fn chart_archive(&self) -> PathBuf {
        let path = self.root.path().join("other-2.0.0.tgz");
        let file = std::fs::File::create(&path).unwrap();
        let encoder = flate2::write::GzEncoder::new(file, flate2::Compression::default());
        let mut builder = tar::Builder::new(encoder);
        for (name, content) in [
            ("other/Chart.yaml", "name: other\nversion: 2.0.0\n"),
            ("other/values.yaml", "{}\n"),
        ] {
            let mut header = tar::Header::new_gnu();
            header.set_size(content.len() as u64);
            header.set_mode(0o644);
            header.set_cksum();
            builder.append_data(&mut header, name, content.as_bytes()).unwrap();
        }
        builder.into_inner().unwrap().finish().unwrap();
        path
    }

    fn registry(&self, url: &str) -> PathBuf {
        let path = self.root.path().join("repositories.yaml");
        std::fs::write(
            &path,
            format!("apiVersion: v1\nrepositories:\n- name: museum\n  url: {}\n", url),
        )
        .unwrap();
        path
    }
}

fn str_path(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

fn is_empty_dir(path: &Path) -> bool {
    std::fs::read_dir(path).unwrap().next().is_none()
}

/// Whether an upload carrying `file_name` reached the server
async fn uploaded(server: &MockServer, file_name: &str) -> bool {
    let needle = format!("filename=\"{}\"", file_name);
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .iter()
        .any(|r| r.body.windows(needle.len()).any(|w| w == needle.as_bytes()))
}

mod push_command {
    use super::*;

    #[tokio::test]
    async fn test_push_directory() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/charts"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let ws = Workspace::new();
        let chart = str_path(&ws.chart_dir());
        let registry = str_path(&ws.registry(&server.uri()));
        let tmp = str_path(&ws.tmp());

        let output = helmpush(
            &[&chart, "museum"],
            &[("HELM_REPOSITORY_CONFIG", &registry), ("TMPDIR", &tmp)],
        )
        .await;

        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        assert!(stdout.contains("Pushing mychart-0.1.0.tgz to museum..."));
        assert!(stdout.contains("Done."));
        assert!(uploaded(&server, "mychart-0.1.0.tgz").await);
        assert!(is_empty_dir(&ws.tmp()));
    }

    #[tokio::test]
    async fn test_push_archive_with_version_flag() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/api/charts"))
            .respond_with(ResponseTemplate::new(201))
            .expect(1)
            .mount(&server)
            .await;

        let ws = Workspace::new();
        let chart = str_path(&ws.chart_archive());
        let registry = str_path(&ws.registry(&server.uri()));

        let output = helmpush(
            &[&chart, "museum", "--version", "2.1.0"],
            &[("HELM_REPOSITORY_CONFIG", &registry)],
        )
        .await;

        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        assert!(uploaded(&server, "other-2.1.0.tgz").await);
    }

    #[tokio::test]
    async fn test_push_rejected() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(409).set_body_string(r#"{"error":"conflict"}"#))
            .mount(&server)
            .await;

        let ws = Workspace::new();
        let chart = str_path(&ws.chart_dir());
        let registry = str_path(&ws.registry(&server.uri()));
        let tmp = str_path(&ws.tmp());

        let output = helmpush(
            &[&chart, "museum"],
            &[("HELM_REPOSITORY_CONFIG", &registry), ("TMPDIR", &tmp)],
        )
        .await;

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("409: conflict"));
        assert!(is_empty_dir(&ws.tmp()));
    }

    #[tokio::test]
    async fn test_unknown_repository() {
        let ws = Workspace::new();
        let chart = str_path(&ws.chart_dir());
        let registry = str_path(&ws.registry("http://localhost"));

        let output = helmpush(
            &[&chart, "missing"],
            &[("HELM_REPOSITORY_CONFIG", &registry)],
        )
        .await;

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("no repo named \"missing\" found"));
    }

    #[tokio::test]
    async fn test_wrong_argument_count() {
        let output = helmpush(&["only-one"], &[]).await;

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("This command needs 2 arguments"));
    }

    #[tokio::test]
    async fn test_unknown_flag_exits_with_error() {
        let output = helmpush(&["chart", "repo", "--bogus"], &[]).await;
        assert_eq!(output.status.code(), Some(1));

        let output = helmpush(&["chart", "repo", "--version"], &[]).await;
        assert_eq!(output.status.code(), Some(1));
    }

    #[tokio::test]
    async fn test_help_exits_cleanly() {
        let output = helmpush(&["--help"], &[]).await;

        assert_eq!(output.status.code(), Some(0));
        assert!(String::from_utf8_lossy(&output.stdout).contains("ChartMuseum"));
    }
}

mod download_command {
    use super::*;

    #[tokio::test]
    async fn test_download_to_stdout() {
        let server = MockServer::start().await;
        let payload: Vec<u8> = (0u8..=255).collect();
        Mock::given(method("GET"))
            .and(path("/team/charts/foo-1.0.0.tgz"))
            .respond_with(ResponseTemplate::new(200).set_body_bytes(payload.clone()))
            .expect(1)
            .mount(&server)
            .await;

        let address = server.address();
        let uri = format!(
            "cm://{}:{}/team/charts/foo-1.0.0.tgz",
            address.ip(),
            address.port()
        );

        let output = helmpush(&["", "", "", &uri], &[("HELM_REPO_USE_HTTP", "true")]).await;

        assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
        assert_eq!(output.stdout, payload);
    }

    #[tokio::test]
    async fn test_download_invalid_uri() {
        let output = helmpush(&["", "", "", "cm://host/foo.tgz"], &[]).await;

        assert_eq!(output.status.code(), Some(1));
        assert!(output.stdout.is_empty());
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("invalid file url"));
    }
}
