use anyhow::{Context, Result};
use quiz_form::utils::logging;
use quiz_form::{App, Config};

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置
    let config = Config::try_from_env().context("环境变量配置无效")?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    let stats = App::initialize(config)?.run().await?;

    if stats.failed > 0 {
        std::process::exit(1);
    }

    Ok(())
}
