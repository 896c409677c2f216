//! CLI entry point
//!
//! Reads the birth input as JSON (file argument or stdin), pulls the
//! endpoint configuration from the environment, and prints the synthesized
//! destiny result as JSON on stdout. Logs go to stderr.

use anyhow::{bail, Context};
use life_kline::{BirthInput, GatewayConfig, SynthesisService};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Submission gate, flipped off when the upstream model quota is exhausted
const SERVICE_AVAILABLE: bool = true;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "life_kline=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    if !SERVICE_AVAILABLE {
        bail!("当前服务器繁忙，使用的用户过多导致API堵塞，请择时再来");
    }

    let input = read_input()?;

    let base_url = std::env::var("LIFEKLINE_API_BASE_URL")
        .unwrap_or_else(|_| "https://api.deepseek.com".to_string());
    let api_key = std::env::var("LIFEKLINE_API_KEY").context("请设置 LIFEKLINE_API_KEY")?;
    let model = std::env::var("LIFEKLINE_MODEL").unwrap_or_default();

    let config = GatewayConfig::new(&base_url, &api_key, &model)?;
    let result = SynthesisService::synthesize(config, &input).await?;

    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

/// Birth input from the first argument (a file path, `-` for stdin) or
/// from stdin when no argument is given.
fn read_input() -> anyhow::Result<BirthInput> {
    let args: Vec<String> = std::env::args().skip(1).collect();
    let raw = match args.first() {
        Some(path) if path != "-" => std::fs::read_to_string(path)
            .with_context(|| format!("无法读取输入文件 {}", path))?,
        _ => {
            let mut buf = String::new();
            std::io::Read::read_to_string(&mut std::io::stdin(), &mut buf)?;
            buf
        }
    };
    serde_json::from_str(&raw).context("输入JSON格式错误")
}
