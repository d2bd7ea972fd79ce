use clap::Parser;
use std::path::PathBuf;
use url::Url;

#[derive(Parser, Debug)]
#[command(name = "onboard-scan")]
#[command(about = "Simulates the website analysis step of the chatbot onboarding wizard")]
#[command(version)]
pub struct Args {
    /// Company website to analyze (e.g. https://www.example.com)
    #[arg(value_parser = parse_base_url)]
    pub base_url: String,

    /// JSON configuration file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Override the per-page delay in milliseconds
    #[arg(short, long)]
    pub delay_ms: Option<u64>,

    /// Mark each page as scraping while it is being analyzed
    #[arg(long)]
    pub announce_scraping: bool,

    /// Fetch the website's meta description before scanning
    #[arg(long)]
    pub describe: bool,
}

/// Accept only absolute http(s) URLs, keeping the text exactly as typed
fn parse_base_url(raw: &str) -> Result<String, String> {
    let url = Url::parse(raw).map_err(|e| format!("invalid URL {raw:?}: {e}"))?;
    match url.scheme() {
        "http" | "https" => Ok(raw.to_string()),
        other => Err(format!("unsupported scheme {other:?}, expected http or https")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_base_url() {
        assert_eq!(parse_base_url("https://acme.com").unwrap(), "https://acme.com");
        assert!(parse_base_url("acme.com").is_err());
        assert!(parse_base_url("ftp://acme.com").is_err());
    }

    #[test]
    fn test_args() {
        let args = Args::try_parse_from(["onboard-scan", "https://acme.com", "-d", "0", "--describe"]).unwrap();
        assert_eq!(args.base_url, "https://acme.com");
        assert_eq!(args.delay_ms, Some(0));
        assert!(args.describe);
        assert!(!args.announce_scraping);
        assert!(Args::try_parse_from(["onboard-scan", "not-a-url"]).is_err());
    }
}
