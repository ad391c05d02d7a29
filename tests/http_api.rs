//! HTTP API tests: requests go through the full router via `oneshot`.

mod common;

use axum::body::{to_bytes, Body};
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use serde_json::Value;
use tower::ServiceExt;

use common::{Fixture, Remote, HELLO};
use mycro::core::config::DEFAULT_MAX_BODY_MIB;
use mycro::server::router;

const MIB: usize = 1024 * 1024;

struct Api {
    app: Router,
    remote: Remote,
    _workspace: tempfile::TempDir,
}

impl Api {
    fn new() -> Self {
        Self::with_body_limit(DEFAULT_MAX_BODY_MIB as usize * MIB)
    }

    fn with_body_limit(limit: usize) -> Self {
        let (service, remote, workspace) = Fixture::new().into_service();
        Self {
            app: router(service, None, limit),
            remote,
            _workspace: workspace,
        }
    }

    async fn send(
        &self,
        method: Method,
        uri: &str,
        body: impl Into<Vec<u8>>,
    ) -> (StatusCode, String, Vec<u8>) {
        let request = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::from(body.into()))
            .unwrap();
        let response = self.app.clone().oneshot(request).await.unwrap();

        let status = response.status();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .map(|v| v.to_str().unwrap().to_string())
            .unwrap_or_default();
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, content_type, bytes.to_vec())
    }

    async fn get(&self, uri: &str) -> (StatusCode, String, Vec<u8>) {
        self.send(Method::GET, uri, "").await
    }

    async fn json(
        &self,
        method: Method,
        uri: &str,
        body: impl Into<Vec<u8>>,
    ) -> (StatusCode, Value) {
        let (status, content_type, bytes) = self.send(method, uri, body).await;
        assert_eq!(content_type, "application/json");
        (status, serde_json::from_slice(&bytes).unwrap())
    }
}

mod sites {
    use super::*;

    #[tokio::test]
    async fn listing() {
        let api = Api::new();
        for uri in ["/sites", "/sites/"] {
            let (status, body) = api.json(Method::GET, uri, "").await;
            assert_eq!(status, StatusCode::OK);
            assert_eq!(body["success"], true);
            assert_eq!(body["data"][0]["name"], "blog");
            assert_eq!(body["data"][0]["base_dir"], "content");
            assert!(body.get("message").is_none());
        }
    }

    #[tokio::test]
    async fn listing_as_yaml() {
        let api = Api::new();
        let (status, content_type, bytes) = api.get("/sites/?f=yaml").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "application/yaml");

        let body: serde_yaml::Value = serde_yaml::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], serde_yaml::Value::Bool(true));
        assert_eq!(body["data"][0]["name"].as_str(), Some("blog"));
    }

    #[tokio::test]
    async fn unknown_format_is_reported_in_json() {
        let api = Api::new();
        let (status, body) = api.json(Method::GET, "/sites/?f=xml", "").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().unwrap().contains("xml"));
    }

    #[tokio::test]
    async fn status_of_fresh_site() {
        let api = Api::new();
        let (status, body) = api.json(Method::GET, "/sites/blog/status", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["clean"], true);
        assert_eq!(body["data"]["branch"], "main");
        assert_eq!(body["data"]["head"], api.remote.rev_parse("main"));
    }

    #[tokio::test]
    async fn unknown_site_is_404_envelope() {
        let api = Api::new();
        let (status, body) = api.json(Method::GET, "/sites/nope/status", "").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "site 'nope' not found");
        assert!(body.get("data").is_none());
    }

    #[tokio::test]
    async fn error_envelope_as_yaml() {
        let api = Api::new();
        let (status, content_type, bytes) = api.get("/sites/nope/files?f=yml").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(content_type, "application/yaml");
        let body: serde_yaml::Value = serde_yaml::from_slice(&bytes).unwrap();
        assert_eq!(body["success"], serde_yaml::Value::Bool(false));
    }
}

mod files {
    use super::*;

    #[tokio::test]
    async fn tree() {
        let api = Api::new();
        for uri in ["/sites/blog/files", "/sites/blog/files/"] {
            let (status, body) = api.json(Method::GET, uri, "").await;
            assert_eq!(status, StatusCode::OK);

            let root = &body["data"];
            assert_eq!(root["name"], "content");
            assert_eq!(root["is_dir"], true);
            assert_eq!(root["children"][0]["name"], "posts");
            assert_eq!(
                root["children"][0]["children"][0]["full_path"],
                "/posts/hello.md"
            );
            assert_eq!(root["children"].as_array().unwrap().len(), 1);
        }
    }

    #[tokio::test]
    async fn raw_read() {
        let api = Api::new();
        let (status, content_type, bytes) = api.get("/sites/blog/files/posts/hello.md").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(content_type, "text/plain; charset=utf-8");
        assert_eq!(bytes, HELLO.as_bytes());
    }

    #[tokio::test]
    async fn section_read() {
        let api = Api::new();
        let (status, _, bytes) = api.get("/sites/blog/files/posts/hello.md?o=fm").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"title: Hello\n");

        let (status, _, bytes) = api.get("/sites/blog/files/posts/hello.md?o=body").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"Hello world\n");
    }

    #[tokio::test]
    async fn unknown_section_is_400() {
        let api = Api::new();
        let (status, body) = api
            .json(Method::GET, "/sites/blog/files/posts/hello.md?o=bogus", "")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn missing_file_is_404() {
        let api = Api::new();
        let (status, body) = api
            .json(Method::GET, "/sites/blog/files/posts/missing.md", "")
            .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn encoded_traversal_is_400() {
        let api = Api::new();
        let (status, body) = api
            .json(Method::GET, "/sites/blog/files/%2E%2E/README.md", "")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }

    #[tokio::test]
    async fn write_then_read() {
        let api = Api::new();
        let (status, body) = api
            .json(Method::POST, "/sites/blog/files/posts/new.md", "---\n---\nnew\n")
            .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["success"], true);
        assert_eq!(body["data"]["result"], "saved");
        assert_eq!(
            body["data"]["message"],
            "content change for content/posts/new.md"
        );
        assert_eq!(body["data"]["revision"].as_str().unwrap().len(), 40);

        let (status, _, bytes) = api.get("/sites/blog/files/posts/new.md").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(bytes, b"---\n---\nnew\n");
    }

    #[tokio::test]
    async fn section_write() {
        let api = Api::new();
        let (status, _) = api
            .json(Method::POST, "/sites/blog/files/posts/hello.md?o=md", "Bye\n")
            .await;
        assert_eq!(status, StatusCode::OK);

        let (_, _, bytes) = api.get("/sites/blog/files/posts/hello.md").await;
        assert_eq!(bytes, b"---\ntitle: Hello\n---\nBye\n");
    }

    #[tokio::test]
    async fn upload_larger_than_two_mib_is_saved() {
        let api = Api::new();
        let big = vec![b'a'; 3 * MIB];
        let (status, body) = api
            .json(Method::POST, "/sites/blog/files/posts/big.md", big.clone())
            .await;
        assert_eq!(status, StatusCode::OK, "{body}");
        assert_eq!(body["data"]["result"], "saved");

        let (_, _, bytes) = api.get("/sites/blog/files/posts/big.md").await;
        assert_eq!(bytes.len(), big.len());
    }

    #[tokio::test]
    async fn oversized_upload_is_413_envelope() {
        let api = Api::with_body_limit(1024);
        let head = api.remote.rev_parse("main");
        let (status, body) = api
            .json(Method::POST, "/sites/blog/files/posts/big.md", vec![b'a'; 4096])
            .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(body["success"], false);
        assert!(body["message"].as_str().is_some());

        let (status, _, _) = api.get("/sites/blog/files/posts/big.md").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        let (_, status_body) = api.json(Method::GET, "/sites/blog/status", "").await;
        assert_eq!(status_body["data"]["head"], head);
    }

    #[tokio::test]
    async fn oversized_upload_error_follows_format() {
        let api = Api::with_body_limit(16);
        let (status, content_type, _) = api
            .send(Method::POST, "/sites/blog/files/posts/x.md?f=yaml", vec![b'a'; 64])
            .await;
        assert_eq!(status, StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(content_type, "application/yaml");
    }

    #[tokio::test]
    async fn malformed_query_is_400_envelope() {
        let api = Api::new();
        let (status, body) = api
            .json(Method::GET, "/sites/blog/files/posts/hello.md?o=fm&o=body", "")
            .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
    }
}

mod remote {
    use super::*;

    #[tokio::test]
    async fn update_reports_pulled() {
        let api = Api::new();
        let (status, body) = api.json(Method::PUT, "/sites/blog/update", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["result"], "pulled");
        assert_eq!(body["data"]["outcome"], "up_to_date");

        let edited = HELLO.replace("world", "there");
        let head = api.remote.push_change("content/posts/hello.md", &edited);
        let (_, body) = api.json(Method::PUT, "/sites/blog/update", "").await;
        assert_eq!(body["data"]["outcome"], "fast_forwarded");
        assert_eq!(body["data"]["to"], head);
    }

    #[tokio::test]
    async fn publish_reports_published() {
        let api = Api::new();
        api.json(Method::POST, "/sites/blog/files/posts/p.md", "p").await;

        let (status, body) = api.json(Method::PUT, "/sites/blog/publish", "").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["data"]["result"], "published");
        assert_eq!(body["data"]["branch"], "pushed");
        assert_eq!(body["data"]["tag"], "release");
        assert_eq!(body["data"]["revision"], api.remote.rev_parse("main"));
    }

    #[tokio::test]
    async fn get_on_update_is_not_allowed() {
        let api = Api::new();
        let (status, _, _) = api.get("/sites/blog/update").await;
        assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    }
}
