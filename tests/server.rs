//! End-to-end tests of the HTTP server against a temporary collection.

use mip_search::config::Config;
use mip_search::server::run_server;
use serde_json::Value;
use std::fs;
use tempfile::TempDir;

fn test_config(tmp: &TempDir, port: u16) -> Config {
    let root = tmp.path();
    let texts = root.join("texts");
    let pdfs = root.join("pdfs");
    fs::create_dir_all(&texts).unwrap();
    fs::create_dir_all(&pdfs).unwrap();

    fs::write(
        texts.join("visa.txt"),
        "Ministry of Interior\nCivil Registry and Migration\n\nWork permits\nApplications for a work VISA require form MM1\n",
    )
    .unwrap();
    fs::write(texts.join("greek.txt"), "Αίτηση για Άδεια Εργασίας\n").unwrap();
    fs::write(pdfs.join("MM1_Work_Visa_Application.pdf"), vec![7u8; 153_600]).unwrap();
    fs::write(pdfs.join("Tax_Form.pdf"), b"%PDF-1.4").unwrap();

    let config_content = format!(
        r#"[corpus]
root = "{}"

[artifacts]
root = "{}"
url_prefix = "/static/mip_pdfs"

[server]
bind = "127.0.0.1:{}"
"#,
        texts.display(),
        pdfs.display(),
        port
    );
    mip_search::config::parse_config(&config_content).unwrap()
}

fn find_free_port() -> u16 {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    listener.local_addr().unwrap().port()
}

async fn wait_for_server(port: u16) {
    let client = reqwest::Client::new();
    let url = format!("http://127.0.0.1:{}/health", port);
    for _ in 0..50 {
        tokio::time::sleep(std::time::Duration::from_millis(100)).await;
        if let Ok(resp) = client.get(&url).send().await {
            if resp.status().is_success() {
                return;
            }
        }
    }
    panic!("Server did not become ready within 5 seconds");
}

async fn start_server() -> (TempDir, String, tokio::task::JoinHandle<()>) {
    let port = find_free_port();
    let tmp = TempDir::new().unwrap();
    let cfg = test_config(&tmp, port);

    let handle = tokio::spawn(async move {
        run_server(&cfg).await.ok();
    });
    wait_for_server(port).await;

    (tmp, format!("http://127.0.0.1:{}", port), handle)
}

#[tokio::test]
async fn test_api_search() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/search?q=visa", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["query"], "visa");
    let results = body["results"].as_array().unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(results[0]["file"], "visa.txt");
    assert_eq!(results[0]["matches"][0]["line"], 5);
    assert_eq!(
        results[0]["matches"][0]["snippet"],
        "... Applications for a work VISA require form MM1 ..."
    );

    // Accent- and case-folded query, percent-encoded.
    let resp = client
        .get(format!("{}/api/search?q=%CE%B1%CE%B4%CE%B5%CE%B9%CE%B1", base))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["results"][0]["file"], "greek.txt");

    handle.abort();
}

#[tokio::test]
async fn test_missing_query_is_rejected() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    for path in ["/api/search", "/api/search?q=", "/api/search?q=%20%20", "/api/get_pdf_link"] {
        let resp = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(resp.status(), 400, "path {}", path);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "bad_request");
    }

    let resp = client
        .get(format!("{}/search?q=", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 400);
    assert!(resp.text().await.unwrap().contains("Missing query parameter"));

    handle.abort();
}

#[tokio::test]
async fn test_search_page_negotiation() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/search?q=visa", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<strong>visa.txt</strong>"));
    assert!(html.contains("Line 5:"));

    let resp = client
        .get(format!("{}/search?q=visa", base))
        .header("Accept", "application/json")
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["results"][0]["file"], "visa.txt");

    let resp = client.get(format!("{}/", base)).send().await.unwrap();
    assert!(resp.text().await.unwrap().contains("action=\"/search\""));

    handle.abort();
}

#[tokio::test]
async fn test_get_pdf_link() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/api/get_pdf_link?q=work%20visa", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["query"], "work visa");
    assert_eq!(body["link"], "/static/mip_pdfs/MM1_Work_Visa_Application.pdf");

    let resp = client
        .get(format!("{}/api/get_pdf_link?q=xyzzyqqq", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert!(body["link"].is_null());
    assert_eq!(body["message"], "No matching PDF found.");

    handle.abort();
}

#[tokio::test]
async fn test_get_pdf_multi_term() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/get_pdf/visa%20application", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    let files = body["matched_files"].as_array().unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0]["filename"], "MM1_Work_Visa_Application.pdf");
    assert_eq!(files[0]["size"], "150.0 KB");

    let resp = client
        .get(format!("{}/get_pdf/xyzzyqqq", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["matched_files"].as_array().unwrap().len(), 0);
    assert_eq!(body["message"], "No matching PDF files found.");

    let resp = client
        .get(format!("{}/get_pdf/visa?format=html", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("pdf-card"));

    handle.abort();
}

#[tokio::test]
async fn test_pretty_pdf_defaults_to_html() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!("{}/pretty_pdf/visa", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let html = resp.text().await.unwrap();
    assert!(html.contains("<title>PDF Results</title>"));
    assert!(html.contains("pdf-card"));
    assert!(html.contains("MM1_Work_Visa_Application.pdf"));
    assert!(html.contains("Download PDF"));

    let resp = client
        .get(format!("{}/pretty_pdf/xyzzyqqq", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    assert!(resp.text().await.unwrap().contains("No results found."));

    let resp = client
        .get(format!("{}/pretty_pdf/visa?format=json", base))
        .send()
        .await
        .unwrap();
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["matched_files"][0]["filename"], "MM1_Work_Visa_Application.pdf");

    handle.abort();
}

#[tokio::test]
async fn test_empty_path_query_is_rejected() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    for path in ["/get_pdf/", "/pretty_pdf/", "/get_pdf/%20"] {
        let resp = client.get(format!("{}{}", base, path)).send().await.unwrap();
        assert_eq!(resp.status(), 400, "path {}", path);
        let body: Value = resp.json().await.unwrap();
        assert_eq!(body["error"]["code"], "bad_request");
    }

    handle.abort();
}

#[tokio::test]
async fn test_pdf_download() {
    let (_tmp, base, handle) = start_server().await;
    let client = reqwest::Client::new();

    let resp = client
        .get(format!(
            "{}/static/mip_pdfs/MM1_Work_Visa_Application.pdf",
            base
        ))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 200);
    let bytes = resp.bytes().await.unwrap();
    assert_eq!(bytes.len(), 153_600);

    let resp = client
        .get(format!("{}/static/mip_pdfs/missing.pdf", base))
        .send()
        .await
        .unwrap();
    assert_eq!(resp.status(), 404);

    handle.abort();
}

#[tokio::test]
async fn test_health() {
    let (_tmp, base, handle) = start_server().await;

    let resp = reqwest::get(format!("{}/health", base)).await.unwrap();
    assert_eq!(resp.status(), 200);
    let body: Value = resp.json().await.unwrap();
    assert_eq!(body["status"], "ok");
    assert_eq!(body["version"], env!("CARGO_PKG_VERSION"));

    handle.abort();
}
