//! Integration tests for cachegate

mod cli_tests {
    use assert_cmd::{cargo::cargo_bin_cmd, Command};
    use predicates::prelude::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    /// Binary with a clean environment so pipeline variables of the host
    /// don't leak into the test.
    pub fn cachegate(clone_dir: &Path) -> Command {
        let mut cmd = cargo_bin_cmd!("cachegate");
        cmd.env_clear()
            .env("BITBUCKET_CLONE_DIR", clone_dir)
            .env("NO_COLOR", "1");
        cmd
    }

    #[test]
    fn help_displays() {
        let dir = TempDir::new().unwrap();
        cachegate(dir.path())
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains(
                "Bitbucket Pipelines step that clears build caches when tracked files change",
            ));
    }

    #[test]
    fn version_displays() {
        let dir = TempDir::new().unwrap();
        cachegate(dir.path())
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("cachegate"));
    }

    #[test]
    fn missing_credentials_fail_before_any_work() {
        let dir = TempDir::new().unwrap();
        cachegate(dir.path())
            .env("BITBUCKET_WORKSPACE", "acme")
            .env("BITBUCKET_REPO_SLUG", "widgets")
            .assert()
            .failure()
            .stderr(predicate::str::contains(
                "Missing required variable: BITBUCKET_USERNAME",
            ));

        assert!(!dir.path().join(".cache_checksum").exists());
    }

    #[test]
    fn empty_checksum_files_reaches_config_validation() {
        let dir = TempDir::new().unwrap();
        cachegate(dir.path())
            .env("BITBUCKET_WORKSPACE", "acme")
            .env("BITBUCKET_REPO_SLUG", "widgets")
            .env("CHECKSUM_FILES", "")
            .env("CACHES", "")
            .assert()
            .code(1)
            .stderr(predicate::str::contains(
                "Missing required variable: BITBUCKET_USERNAME",
            ));
    }

    #[test]
    fn traversal_in_checksum_files_rejected() {
        let dir = TempDir::new().unwrap();
        cachegate(dir.path())
            .env("BITBUCKET_USERNAME", "ci-bot")
            .env("BITBUCKET_APP_PASSWORD", "s3cret")
            .env("BITBUCKET_WORKSPACE", "acme")
            .env("BITBUCKET_REPO_SLUG", "widgets")
            .env("CHECKSUM_FILES", "../secrets.lock")
            .assert()
            .failure()
            .stderr(predicate::str::contains("Invalid path"));
    }

    #[test]
    fn unchanged_file_skips_without_network() {
        let dir = TempDir::new().unwrap();
        let lock = dir.path().join("build.lock");
        fs::write(&lock, "lock v1").unwrap();
        fs::create_dir(dir.path().join(".cache_checksum")).unwrap();
        fs::write(
            dir.path().join(".cache_checksum/build.lock"),
            ::cachegate::checksum::hash_file_contents(&lock).unwrap(),
        )
        .unwrap();

        // Port 9 (discard) is not listening; any request would fail the run.
        cachegate(dir.path())
            .env("BITBUCKET_USERNAME", "ci-bot")
            .env("BITBUCKET_APP_PASSWORD", "s3cret")
            .env("BITBUCKET_WORKSPACE", "acme")
            .env("BITBUCKET_REPO_SLUG", "widgets")
            .env("BITBUCKET_API_URL", "http://127.0.0.1:9")
            .env("CHECKSUM_FILES", "build.lock,")
            .assert()
            .success()
            .stdout(predicate::str::contains("File(s) not changed. Skipping..."));
    }
}

mod api_tests {
    use super::cli_tests::cachegate;
    use predicates::prelude::*;
    use serde_json::json;
    use std::fs;
    use tempfile::TempDir;
    use wiremock::matchers::{method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const CACHES_PATH: &str = "/acme/widgets/pipelines-config/caches/";

    async fn server_with_caches() -> MockServer {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHES_PATH))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "values": [
                    {"uuid": "u1", "name": "node"},
                    {"uuid": "u2", "name": "gradle"}
                ]
            })))
            .expect(1)
            .mount(&server)
            .await;
        server
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn clears_only_named_cache_and_stores_checksums() {
        let server = server_with_caches().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{}u2", CACHES_PATH)))
            .respond_with(ResponseTemplate::new(204))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{}u1", CACHES_PATH)))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("build.gradle"), "plugins {}").unwrap();
        let clone_dir = dir.path().to_path_buf();
        let api_url = server.uri();

        tokio::task::spawn_blocking(move || {
            cachegate(&clone_dir)
                .env("BITBUCKET_USERNAME", "ci-bot")
                .env("BITBUCKET_APP_PASSWORD", "s3cret")
                .env("WORKSPACE", "acme")
                .env("REPO_SLUG", "widgets")
                .env("BITBUCKET_API_URL", api_url)
                .env("CACHES", "")
                .env("CACHES_COUNT", "1")
                .env("CACHES_0", "gradle")
                .env("CHECKSUM_FILES", "build.gradle")
                .assert()
                .success()
                .stdout(predicate::str::contains("1 of 2 caches selected"))
                .stdout(predicate::str::contains("Successfully cleared cache gradle"))
                .stdout(predicate::str::contains("Finished clearing caches"));
        })
        .await
        .unwrap();

        assert!(dir.path().join(".cache_checksum/build.gradle").is_file());
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn unauthorized_list_fails_without_deletes() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path(CACHES_PATH))
            .respond_with(ResponseTemplate::new(401).set_body_string("Unauthorized"))
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let clone_dir = dir.path().to_path_buf();
        let api_url = server.uri();

        tokio::task::spawn_blocking(move || {
            cachegate(&clone_dir)
                .env("BITBUCKET_USERNAME", "ci-bot")
                .env("BITBUCKET_APP_PASSWORD", "wrong")
                .env("BITBUCKET_WORKSPACE", "acme")
                .env("BITBUCKET_REPO_SLUG", "widgets")
                .env("BITBUCKET_API_URL", api_url)
                .assert()
                .failure()
                .stderr(predicate::str::contains("Failed to retrieve caches: 401"));
        })
        .await
        .unwrap();
    }

    #[tokio::test(flavor = "multi_thread")]
    async fn failed_delete_aborts_run() {
        let server = server_with_caches().await;
        Mock::given(method("DELETE"))
            .and(path(format!("{}u1", CACHES_PATH)))
            .respond_with(ResponseTemplate::new(500).set_body_string("try later"))
            .expect(1)
            .mount(&server)
            .await;
        Mock::given(method("DELETE"))
            .and(path(format!("{}u2", CACHES_PATH)))
            .respond_with(ResponseTemplate::new(204))
            .expect(0)
            .mount(&server)
            .await;

        let dir = TempDir::new().unwrap();
        let clone_dir = dir.path().to_path_buf();
        let api_url = server.uri();

        tokio::task::spawn_blocking(move || {
            cachegate(&clone_dir)
                .env("BITBUCKET_USERNAME", "ci-bot")
                .env("BITBUCKET_APP_PASSWORD", "s3cret")
                .env("BITBUCKET_WORKSPACE", "acme")
                .env("BITBUCKET_REPO_SLUG", "widgets")
                .env("BITBUCKET_API_URL", api_url)
                .assert()
                .failure()
                .stderr(predicate::str::contains("Failed to clear cache node: try later"));
        })
        .await
        .unwrap();
    }
}
