use std::process::ExitCode;

use tracing::{error, info, warn};

use auto_post_submit::utils::logging;
use auto_post_submit::{App, Config, Credentials, RunResult};

#[tokio::main]
async fn main() -> ExitCode {
    // 初始化日志
    logging::init();

    // 凭据缺失是致命配置错误，必须在获取任何浏览器资源之前报告
    let credentials = match Credentials::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("❌ 缺少登录凭据: {}", e);
            return ExitCode::from(2);
        }
    };

    // 加载配置并运行
    let config = Config::from_env();
    match App::new(config, credentials).run().await {
        RunResult::Posted(_) => {
            info!("✅ 本次运行完成");
            ExitCode::SUCCESS
        }
        RunResult::NoWorkAvailable => {
            warn!("⚠️ 队列为空，本次运行无事可做");
            ExitCode::SUCCESS
        }
        RunResult::Failed { error, artifact } => {
            if let Some(path) = artifact {
                error!("🚨 运行失败: {} (诊断截图: {})", error, path.display());
            } else {
                error!("🚨 运行失败: {}", error);
            }
            ExitCode::FAILURE
        }
    }
}
