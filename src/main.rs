use anyhow::Result;
use pdf_digest::utils::logging;
use pdf_digest::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::load()?;

    // 初始化日志
    logging::init(&config.output_log_file)?;

    // 运行应用
    App::new(config).run().await?;

    Ok(())
}
