use std::fs;
use std::path::Path;

use tracing::info;
use url::Url;

use crate::app::Result;
use crate::browser::{ChromeSession, WebDriverSession};
use crate::cli::Cli;
use crate::config::{BrowserBackend, Config};
use crate::domain::Article;
use crate::extractor::Extractor;
use crate::fetcher::PageFetcher;

/// Run the stages selected on the command line
pub async fn run(cli: &Cli, config: &Config) -> Result<()> {
    let stages = cli.stages();

    if stages.download {
        let backend = cli.browser.unwrap_or(config.browser.backend);
        download_html(config, backend, &cli.url, &cli.html_file).await?;
    }

    if stages.extract {
        let article = extract_from_file(&cli.html_file, &cli.url)?;
        write_output(&article, cli.output.as_deref())?;
    }

    Ok(())
}

/// Fetch the rendered article and save its markup to `html_path`
pub async fn download_html(
    config: &Config,
    backend: BrowserBackend,
    url: &str,
    html_path: &Path,
) -> Result<()> {
    Url::parse(url)?;
    let fetcher = PageFetcher::from_config(config);

    let html = match backend {
        BrowserBackend::Webdriver => {
            let mut session = WebDriverSession::connect(&config.browser).await?;
            fetcher.fetch(&mut session, url).await?
        }
        BrowserBackend::Chrome => {
            let mut session = ChromeSession::launch(&config.browser).await?;
            fetcher.fetch(&mut session, url).await?
        }
    };

    write_html(html_path, &html)
}

pub fn write_html(path: &Path, html: &str) -> Result<()> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(path, html)?;
    info!(path = %path.display(), bytes = html.len(), "Saved page markup");
    Ok(())
}

/// Extract the article from previously saved markup
pub fn extract_from_file(html_path: &Path, url: &str) -> Result<Article> {
    let html = fs::read_to_string(html_path)?;
    let article = Extractor::new()?.extract(&html, url);
    info!(
        paragraphs = article.body.len(),
        comments = article.comments.len(),
        "Extracted article"
    );
    Ok(article)
}

/// Write JSON to `output`, or print it to stdout
pub fn write_output(article: &Article, output: Option<&Path>) -> Result<()> {
    let json = article.to_pretty_json()?;

    match output {
        Some(path) => {
            fs::write(path, json)?;
            info!(path = %path.display(), "Saved JSON");
        }
        None => println!("{}", json),
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::HarvestError;
    use clap::Parser;

    const PAGE: &str = r#"<html><body>
        <article class="fck_detail"><h1 class="title-detail">Tiêu đề</h1><p>Đoạn một</p></article>
        <div class="comment_item"><span class="nickname">Lan</span><p class="full_content">Hay</p></div>
    </body></html>"#;

    #[test]
    fn test_write_html_creates_parent_dirs() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("page.html");

        write_html(&path, PAGE).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), PAGE);
    }

    #[test]
    fn test_extract_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("page.html");
        fs::write(&path, PAGE).unwrap();

        let article = extract_from_file(&path, "https://vnexpress.net/a-1.html").unwrap();
        assert_eq!(article.url, "https://vnexpress.net/a-1.html");
        assert_eq!(article.title, "Tiêu đề");
        assert_eq!(article.body, vec!["Đoạn một"]);
        assert_eq!(article.comments.len(), 1);
    }

    #[test]
    fn test_extract_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = extract_from_file(&dir.path().join("absent.html"), "u").unwrap_err();
        assert!(matches!(err, HarvestError::Io(_)));
    }

    #[test]
    fn test_output_file_is_stable_and_unescaped() {
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("page.html");
        let out_path = dir.path().join("article.json");
        fs::write(&html_path, PAGE).unwrap();

        let article = extract_from_file(&html_path, "u").unwrap();
        write_output(&article, Some(&out_path)).unwrap();
        let first = fs::read(&out_path).unwrap();

        let article = extract_from_file(&html_path, "u").unwrap();
        write_output(&article, Some(&out_path)).unwrap();
        let second = fs::read(&out_path).unwrap();

        assert_eq!(first, second);
        let text = String::from_utf8(first).unwrap();
        assert!(text.contains("Tiêu đề"));
        assert!(!text.ends_with('\n'));

        let parsed: Article = serde_json::from_str(&text).unwrap();
        assert_eq!(parsed, article);
    }

    #[tokio::test]
    async fn test_run_extract_only() {
        let dir = tempfile::tempdir().unwrap();
        let html_path = dir.path().join("page.html");
        let out_path = dir.path().join("out.json");
        fs::write(&html_path, PAGE).unwrap();

        let cli = Cli::try_parse_from([
            "harvester",
            "--extract",
            "--html-file",
            html_path.to_str().unwrap(),
            "--output",
            out_path.to_str().unwrap(),
        ])
        .unwrap();

        run(&cli, &Config::default()).await.unwrap();
        let json = fs::read_to_string(&out_path).unwrap();
        assert!(json.contains("\"author\": \"Lan\""));
    }

    #[tokio::test]
    async fn test_download_rejects_invalid_url() {
        let dir = tempfile::tempdir().unwrap();
        let err = download_html(
            &Config::default(),
            BrowserBackend::Webdriver,
            "not a url",
            &dir.path().join("page.html"),
        )
        .await
        .unwrap_err();
        assert!(matches!(err, HarvestError::InvalidUrl(_)));
    }
}
