//! Integration tests for the mirror
//!
//! These tests use wiremock to create mock HTTP servers and run the full
//! fetch, extract, rewrite and save cycle end-to-end into a temporary directory.

use std::fs;
use std::path::Path;
use sumi_mirror::config::Config;
use sumi_mirror::crawler::{run_mirror, Coordinator};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a test configuration mirroring `site` into `dir`
fn create_test_config(site: &str, dir: &Path) -> Config {
    let mut config = Config::default();
    config.mirror.url = site.to_string();
    config.mirror.dir = dir.to_path_buf();
    config.mirror.parallel = true;
    config.mirror.max_concurrent_fetches = 4;
    config.http.timeout_secs = 5;
    config
}

/// `set_body_raw` keeps the MIME type; `set_body_string` would force text/plain
fn html(body: String) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body, "text/html; charset=UTF-8")
}

/// Mounts a GET mock that must be hit exactly once
async fn mount_once(server: &MockServer, route: &str, response: ResponseTemplate) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(response)
        .expect(1)
        .mount(server)
        .await;
}

async fn mount_head_ok(server: &MockServer) {
    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_full_mirror_rewrites_and_saves_tree() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;

    mount_once(
        &server,
        "/",
        html(format!(
            r##"<html><head>
            <title>Home</title>
            <link rel="stylesheet" href="/style.css">
            </head><body>
            <a href="{base}/about/">About</a>
            <a href="#top">Top</a>
            <a href="mailto:admin@example.com">Mail</a>
            <a href="https://external.example.org/">Elsewhere</a>
            <a href="/missing/">Broken</a>
            <img src="/img/logo.png" srcset="/img/logo.png 1x, /img/logo@2x.png 2x">
            </body></html>"##,
            base = base
        )),
    )
    .await;

    mount_once(
        &server,
        "/about/",
        html(format!(
            r#"<html><body><a href="/">Home</a><a href="{base}/about/#team">Team</a></body></html>"#,
            base = base
        )),
    )
    .await;

    mount_once(
        &server,
        "/style.css",
        ResponseTemplate::new(200).set_body_raw(
            format!("body {{ background: url('{}/img/bg.png'); }}", base),
            "text/css",
        ),
    )
    .await;

    for image in ["/img/logo.png", "/img/logo@2x.png", "/img/bg.png"] {
        mount_once(
            &server,
            image,
            ResponseTemplate::new(200).set_body_raw(vec![0x89, b'P', b'N', b'G'], "image/png"),
        )
        .await;
    }

    mount_once(
        &server,
        "/robots.txt",
        ResponseTemplate::new(200).set_body_raw(
            format!("User-agent: *\nSitemap: {}/sitemap.xml\n", base),
            "text/plain",
        ),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let dir = tmp.path().join("dump");
    let stats = run_mirror(create_test_config(&base, &dir)).await.unwrap();

    let index = fs::read_to_string(dir.join("index.html")).unwrap();
    assert!(!dir.join("index.txt").exists());
    assert!(index.contains(r#"<a href="/about/">About</a>"#));
    assert!(!index.contains(&base));

    let about = fs::read_to_string(dir.join("about/index.html")).unwrap();
    assert!(about.contains(r#"<a href="/about/#team">Team</a>"#));

    assert_eq!(
        fs::read_to_string(dir.join("style.css")).unwrap(),
        "body { background: url('/img/bg.png'); }"
    );

    for image in ["logo.png", "logo@2x.png", "bg.png"] {
        assert_eq!(
            fs::read(dir.join("img").join(image)).unwrap(),
            vec![0x89, b'P', b'N', b'G']
        );
    }

    assert_eq!(
        fs::read_to_string(dir.join("robots.txt")).unwrap(),
        "User-agent: *\nSitemap: /sitemap.xml\n"
    );

    // favicon.ico and /missing/ are 404s
    assert!(!dir.join("missing").exists());
    assert!(!dir.join("favicon.ico").exists());

    assert_eq!(stats.saved, 7);
    assert_eq!(stats.failed, 2);
}

#[tokio::test]
async fn test_failed_head_check_skips_download() {
    let server = MockServer::start().await;
    let base = server.uri();

    // Specific mocks first: wiremock uses the first matching mock
    Mock::given(method("HEAD"))
        .and(path("/gone/"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/gone/"))
        .respond_with(html("never served".to_string()))
        .expect(0)
        .mount(&server)
        .await;
    mount_head_ok(&server).await;

    mount_once(
        &server,
        "/",
        html(r#"<a href="/gone/">Gone</a><a href="/here/">Here</a>"#.to_string()),
    )
    .await;
    mount_once(&server, "/here/", html("<p>here</p>".to_string())).await;

    let tmp = TempDir::new().unwrap();
    let mut config = create_test_config(&base, tmp.path());
    config.mirror.bootstrap_probes.clear();

    let stats = run_mirror(config).await.unwrap();

    assert!(tmp.path().join("here/index.html").exists());
    assert!(!tmp.path().join("gone").exists());
    assert_eq!(stats.saved, 2);
    assert_eq!(stats.checked, 2);
    assert_eq!(stats.rejected, 1);
}

#[tokio::test]
async fn test_sequential_without_head_check() {
    let server = MockServer::start().await;
    let base = server.uri();

    Mock::given(method("HEAD"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    mount_once(&server, "/", html(r#"<a href="/a/">A</a>"#.to_string())).await;
    mount_once(&server, "/a/", html(r#"<a href="/b/">B</a>"#.to_string())).await;
    mount_once(&server, "/b/", html(r#"<a href="/">Home</a>"#.to_string())).await;

    let tmp = TempDir::new().unwrap();
    let mut config = create_test_config(&base, tmp.path());
    config.mirror.parallel = false;
    config.mirror.check_head = false;
    config.mirror.bootstrap_probes.clear();

    let mut coordinator = Coordinator::new(config).unwrap();
    let stats = coordinator.run().await.unwrap();

    assert_eq!(stats.saved, 3);
    assert_eq!(coordinator.pipeline().visited().len(), 3);
    assert!(tmp.path().join("b/index.html").exists());
}

#[tokio::test]
async fn test_replacement_url() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_once(
        &server,
        "/",
        html(format!(r#"<a href="{}/about/">About</a>"#, base)),
    )
    .await;
    mount_once(&server, "/about/", html("<p>about</p>".to_string())).await;

    let tmp = TempDir::new().unwrap();
    let mut config = create_test_config(&base, tmp.path());
    config.mirror.replace_url = Some("https://static.example.org".to_string());
    config.mirror.bootstrap_probes.clear();

    run_mirror(config).await.unwrap();

    assert_eq!(
        fs::read_to_string(tmp.path().join("index.html")).unwrap(),
        r#"<a href="https://static.example.org/about/">About</a>"#
    );
}

#[tokio::test]
async fn test_extra_pages_are_crawled() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_once(&server, "/", html("<p>no links</p>".to_string())).await;
    mount_once(
        &server,
        "/hidden/",
        html(r#"<a href="/hidden/child.html">child</a>"#.to_string()),
    )
    .await;
    mount_once(&server, "/hidden/child.html", html("<p>child</p>".to_string())).await;

    let tmp = TempDir::new().unwrap();
    let mut config = create_test_config(&base, tmp.path());
    config.mirror.bootstrap_probes.clear();
    config.mirror.extra_pages = vec![
        "/hidden/".to_string(),
        format!("{}/hidden/", base),
        "https://elsewhere.example.org/".to_string(),
    ];

    let stats = run_mirror(config).await.unwrap();

    assert_eq!(stats.saved, 3);
    assert!(tmp.path().join("hidden/index.html").exists());
    assert!(tmp.path().join("hidden/child.html").exists());
}

#[tokio::test]
async fn test_absolute_css_url_in_html_attribute_is_mirrored() {
    let server = MockServer::start().await;
    let base = server.uri();

    mount_head_ok(&server).await;
    mount_once(
        &server,
        "/",
        html(format!(
            r#"<div class="hero" data-bg="url({}/img/hero.jpg)"></div>"#,
            base
        )),
    )
    .await;
    mount_once(
        &server,
        "/img/hero.jpg",
        ResponseTemplate::new(200).set_body_raw(vec![0xff, 0xd8, 0xff], "image/jpeg"),
    )
    .await;

    let tmp = TempDir::new().unwrap();
    let mut config = create_test_config(&base, tmp.path());
    config.mirror.bootstrap_probes.clear();

    let stats = run_mirror(config).await.unwrap();

    assert_eq!(stats.saved, 2);
    assert_eq!(
        fs::read(tmp.path().join("img/hero.jpg")).unwrap(),
        vec![0xff, 0xd8, 0xff]
    );
    assert_eq!(
        fs::read_to_string(tmp.path().join("index.html")).unwrap(),
        r#"<div class="hero" data-bg="url(/img/hero.jpg)"></div>"#
    );
}

#[tokio::test]
async fn test_invalid_site_url_is_fatal() {
    let tmp = TempDir::new().unwrap();
    let config = create_test_config("not a url", tmp.path());

    assert!(run_mirror(config).await.is_err());
    assert!(fs::read_dir(tmp.path()).unwrap().next().is_none());
}
