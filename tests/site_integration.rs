//! Integration tests for the site repository binding.
//!
//! Every test clones a real bare repository built with the git CLI.

mod common;

use common::{Fixture, HELLO};

use mycro::core::types::Section;

use mycro::git::{ChangeKind, GitError, PullOutcome, PushOutcome};
use mycro::site::SiteError;

mod clone {
    use super::*;

    #[tokio::test]
    async fn fresh_clone_is_clean_on_remote_head() {
        let fixture = Fixture::new();
        let status = fixture.site.status().await.unwrap();

        assert!(status.clean);
        assert_eq!(status.branch.as_deref(), Some("main"));
        assert_eq!(
            status.head.unwrap().as_str(),
            fixture.remote.rev_parse("main")
        );
        assert!(status.entries.is_empty());
    }

    #[test]
    fn existing_checkout_is_replaced() {
        let fixture = Fixture::new();
        let stale = fixture.workspace.path().join("other");
        std::fs::create_dir_all(stale.join("junk")).unwrap();

        let site = mycro::site::SiteRegistry::clone_site(
            fixture.workspace.path(),
            "other",
            common::site_config(&fixture.remote),
            common::settings(),
        )
        .unwrap();
        assert!(!site.work_dir().join("junk").exists());
        assert!(site.work_dir().join("content/posts/hello.md").exists());
    }

    #[test]
    fn second_binding_of_same_site_is_refused() {
        let fixture = Fixture::new();
        let result = mycro::site::SiteRegistry::clone_site(
            fixture.workspace.path(),
            "blog",
            common::site_config(&fixture.remote),
            common::settings(),
        );
        assert!(matches!(result, Err(SiteError::Lock(_))));
    }

    #[test]
    fn unreachable_remote_fails() {
        let workspace = tempfile::TempDir::new().unwrap();
        let mut config = common::site_config(&common::Remote::new());
        config.git = workspace.path().join("missing.git").display().to_string();

        let result = mycro::site::SiteRegistry::clone_site(
            workspace.path(),
            "blog",
            config,
            common::settings(),
        );
        assert!(matches!(result, Err(SiteError::Git(_))));
    }
}

mod write {
    use super::*;

    #[tokio::test]
    async fn write_then_read_and_clean_status() {
        let fixture = Fixture::new();
        let record = fixture
            .site
            .write_file(
                "content/posts/new.md".into(),
                Section::All,
                b"---\n---\nnew\n".to_vec(),
            )
            .await
            .unwrap();

        assert_eq!(record.message, "content change for content/posts/new.md");
        assert_eq!(record.name, "Test Bot");
        assert_eq!(record.email, "bot@example.com");
        assert_eq!(fixture.git(&["rev-parse", "HEAD"]), record.revision.as_str());

        let bytes = fixture.site.fs().read("content/posts/new.md").unwrap();
        assert_eq!(bytes, b"---\n---\nnew\n");

        let status = fixture.site.status().await.unwrap();
        assert!(status.clean, "unexpected entries: {:?}", status.entries);
    }

    #[tokio::test]
    async fn missing_parent_directories_are_created() {
        let fixture = Fixture::new();
        fixture
            .site
            .write_file("content/a/b/c.md".into(), Section::All, b"deep".to_vec())
            .await
            .unwrap();
        assert_eq!(fixture.git(&["show", "HEAD:content/a/b/c.md"]), "deep");
    }

    #[tokio::test]
    async fn partial_write_replaces_one_section() {
        let fixture = Fixture::new();
        fixture
            .site
            .write_file(
                "content/posts/hello.md".into(),
                Section::Body,
                b"Goodbye\n".to_vec(),
            )
            .await
            .unwrap();

        let bytes = fixture.site.fs().read("content/posts/hello.md").unwrap();
        assert_eq!(bytes, b"---\ntitle: Hello\n---\nGoodbye\n");
    }

    #[tokio::test]
    async fn partial_write_to_malformed_document_changes_nothing() {
        let fixture = Fixture::new();
        let before = fixture.git(&["rev-parse", "HEAD"]);

        let err = fixture
            .site
            .write_file("README.md".into(), Section::Frontmatter, b"x: 1\n".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, SiteError::Document(_)));

        assert_eq!(fixture.git(&["rev-parse", "HEAD"]), before);
        assert!(fixture.site.status().await.unwrap().clean);
    }

    #[tokio::test]
    async fn only_the_written_path_is_committed() {
        let fixture = Fixture::new();
        std::fs::write(fixture.site.work_dir().join("stray.md"), "stray").unwrap();

        fixture
            .site
            .write_file("content/posts/hello.md".into(), Section::All, HELLO.into())
            .await
            .unwrap();

        let status = fixture.site.status().await.unwrap();
        assert!(!status.clean);
        assert_eq!(status.untracked, 1);
        assert_eq!(status.entries[0].path, "stray.md");
        assert_eq!(status.entries[0].worktree, ChangeKind::Untracked);
    }

    #[tokio::test]
    async fn failed_commit_leaves_file_written_and_staged() {
        let fixture = Fixture::new();
        let before = fixture.git(&["rev-parse", "HEAD"]);
        // A held branch ref lock makes the commit fail after staging
        let ref_lock = fixture.site.work_dir().join(".git/refs/heads/main.lock");
        std::fs::write(&ref_lock, "").unwrap();

        let err = fixture
            .site
            .write_file("content/posts/stuck.md".into(), Section::All, b"stuck".to_vec())
            .await
            .unwrap_err();
        assert!(matches!(err, SiteError::Git(_)), "{err}");
        assert_eq!(fixture.git(&["rev-parse", "HEAD"]), before);

        let bytes = fixture.site.fs().read("content/posts/stuck.md").unwrap();
        assert_eq!(bytes, b"stuck");
        let status = fixture.site.status().await.unwrap();
        assert!(!status.clean);
        assert_eq!(status.staged, 1);
        assert_eq!(status.entries[0].path, "content/posts/stuck.md");
        assert_eq!(status.entries[0].staging, ChangeKind::Added);

        // Once the lock is gone the next write commits both files
        std::fs::remove_file(&ref_lock).unwrap();
        fixture
            .site
            .write_file("content/posts/next.md".into(), Section::All, b"next".to_vec())
            .await
            .unwrap();
        assert_eq!(fixture.git(&["show", "HEAD:content/posts/stuck.md"]), "stuck");
        assert!(fixture.site.status().await.unwrap().clean);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn concurrent_writes_become_sequential_commits() {
        let fixture = Fixture::new();
        let base = fixture.git(&["rev-parse", "HEAD"]);

        let (a, b) = tokio::join!(
            fixture
                .site
                .write_file("content/a.md".into(), Section::All, b"a".to_vec()),
            fixture
                .site
                .write_file("content/b.md".into(), Section::All, b"b".to_vec()),
        );
        let (a, b) = (a.unwrap(), b.unwrap());
        assert_ne!(a.revision, b.revision);

        // Linear history: base <- first <- second
        let history = fixture.git(&["rev-list", "--first-parent", "HEAD"]);
        let history: Vec<_> = history.lines().take(3).collect();
        assert_eq!(history[2], base);
        assert!(history[..2].contains(&a.revision.as_str()));
        assert!(history[..2].contains(&b.revision.as_str()));

        assert_eq!(fixture.git(&["show", "HEAD:content/a.md"]), "a");
        assert_eq!(fixture.git(&["show", "HEAD:content/b.md"]), "b");
        assert!(fixture.site.status().await.unwrap().clean);
    }
}

mod pull {
    use super::*;

    #[tokio::test]
    async fn pull_is_idempotent() {
        let fixture = Fixture::new();
        assert_eq!(fixture.site.pull().await.unwrap(), PullOutcome::UpToDate);
        assert_eq!(fixture.site.pull().await.unwrap(), PullOutcome::UpToDate);
    }

    #[tokio::test]
    async fn pull_fast_forwards_to_remote() {
        let fixture = Fixture::new();
        let remote_head = fixture
            .remote
            .push_change("content/posts/second.md", "---\n---\n2\n");

        match fixture.site.pull().await.unwrap() {
            PullOutcome::FastForwarded { to, from } => {
                assert_eq!(to.as_str(), remote_head);
                assert!(from.is_some());
            }
            other => panic!("expected fast-forward, got {other:?}"),
        }
        assert_eq!(
            fixture.site.fs().read("content/posts/second.md").unwrap(),
            b"---\n---\n2\n"
        );
        assert!(fixture.site.status().await.unwrap().clean);
        assert_eq!(fixture.site.pull().await.unwrap(), PullOutcome::UpToDate);
    }

    #[tokio::test]
    async fn diverged_history_is_refused() {
        let fixture = Fixture::new();
        fixture
            .site
            .write_file("content/local.md".into(), Section::All, b"local".to_vec())
            .await
            .unwrap();
        fixture.remote.push_change("content/remote.md", "remote");

        let err = fixture.site.pull().await.unwrap_err();
        assert!(
            matches!(err, SiteError::Git(GitError::NotFastForward { .. })),
            "unexpected error: {err}"
        );
    }

    #[tokio::test]
    async fn local_modification_blocks_overlapping_update() {
        let fixture = Fixture::new();
        fixture
            .remote
            .push_change("content/posts/hello.md", "---\n---\nremote edit\n");
        let before = fixture.git(&["rev-parse", "HEAD"]);
        std::fs::write(
            fixture.site.work_dir().join("content/posts/hello.md"),
            "local edit",
        )
        .unwrap();

        let err = fixture.site.pull().await.unwrap_err();
        assert!(matches!(err, SiteError::Git(_)), "unexpected error: {err}");

        assert_eq!(fixture.git(&["rev-parse", "HEAD"]), before);
        assert_eq!(
            fixture.site.fs().read("content/posts/hello.md").unwrap(),
            b"local edit"
        );
    }
}

mod publish {
    use super::*;

    #[tokio::test]
    async fn publish_pushes_commits_and_tag() {
        let fixture = Fixture::new();
        let record = fixture
            .site
            .write_file("content/posts/p.md".into(), Section::All, b"p".to_vec())
            .await
            .unwrap();

        let report = fixture.site.publish().await.unwrap();
        assert_eq!(report.revision, record.revision);
        assert_eq!(report.branch, PushOutcome::Pushed);
        assert_eq!(report.tag.as_ref().unwrap().as_str(), "release");

        assert_eq!(fixture.remote.rev_parse("main"), record.revision.as_str());
        assert_eq!(
            fixture.remote.rev_parse("release^{commit}"),
            record.revision.as_str()
        );
        assert_eq!(fixture.remote.object_type("release"), "tag");
        assert_eq!(
            fixture.remote.log()[0],
            "content change for content/posts/p.md"
        );
    }

    #[tokio::test]
    async fn publishing_twice_moves_the_tag() {
        let fixture = Fixture::new();
        fixture.site.publish().await.unwrap();
        let first = fixture.remote.rev_parse("release^{commit}");

        let record = fixture
            .site
            .write_file("content/posts/q.md".into(), Section::All, b"q".to_vec())
            .await
            .unwrap();
        fixture.site.publish().await.unwrap();

        let second = fixture.remote.rev_parse("release^{commit}");
        assert_ne!(first, second);
        assert_eq!(second, record.revision.as_str());
        assert_eq!(fixture.git(&["tag", "--list"]), "release");
    }

    #[tokio::test]
    async fn nothing_to_push_is_success() {
        let fixture = Fixture::new();
        let report = fixture.site.publish().await.unwrap();
        assert_eq!(report.branch, PushOutcome::UpToDate);

        let again = fixture.site.publish().await.unwrap();
        assert_eq!(again.branch, PushOutcome::UpToDate);
    }

    #[tokio::test]
    async fn publish_without_tag_only_pushes() {
        let fixture = Fixture::with_config(|c| c.tag = None);
        fixture
            .site
            .write_file("content/x.md".into(), Section::All, b"x".to_vec())
            .await
            .unwrap();

        let report = fixture.site.publish().await.unwrap();
        assert!(report.tag.is_none());
        assert_eq!(report.branch, PushOutcome::Pushed);
        assert_eq!(fixture.git(&["tag", "--list"]), "");
    }
}
