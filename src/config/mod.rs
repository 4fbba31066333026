use anyhow::Context;
use config::{Config, FileFormat};
use serde::{Deserialize, Serialize};

/// 桌面浏览器 UA，搜索引擎对无 UA 的请求会返回精简页面
const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_11_5) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/50.0.2661.102 Safari/537.36";

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct AppConfig {
    /// 搜索入口，查询串以 `?q=` 拼接
    pub search_url: String,
    pub user_agent: String,
    pub request_timeout_secs: u64,
    /// 单条搜索结果容器的选择器
    pub result_selector: String,
    /// 结果总数文案所在区域的选择器
    pub result_stats_selector: String,
    /// 搜索引擎放宽查询时在结果里附加的 “缺少关键词” 标记
    pub missing_terms_marker: String,
    /// 否定题的词法标记
    pub negation_marker: String,
    /// 同时执行的抓取/打分任务数
    pub pool_size: usize,
    pub log_dir: String,
    pub quizzes_dir: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            search_url: "https://www.google.it/search".to_string(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            request_timeout_secs: 10,
            result_selector: "div.rc".to_string(),
            result_stats_selector: "div#result-stats".to_string(),
            missing_terms_marker: "Mancanti:".to_string(),
            negation_marker: "NON".to_string(),
            pool_size: 4,
            log_dir: "logs".to_string(),
            quizzes_dir: "Quizzes".to_string(),
        }
    }
}

impl AppConfig {
    /// 按 默认值 → 配置文件（可选）→ 环境变量 的顺序叠加
    pub fn load_from(file_name: &str) -> anyhow::Result<Self> {
        let defaults = Config::try_from(&AppConfig::default())
            .with_context(|| anyhow::anyhow!("Failed to build default config"))?;

        let mut config: AppConfig = Config::builder()
            .add_source(defaults)
            .add_source(
                config::File::with_name(file_name)
                    .format(FileFormat::Yaml)
                    .required(false),
            )
            .add_source(
                config::Environment::with_prefix("APP")
                    .try_parsing(true)
                    .separator("__"),
            )
            .build()
            .with_context(|| anyhow::anyhow!("Failed to load config"))?
            .try_deserialize()
            .with_context(|| anyhow::anyhow!("Failed to deserialize config"))?;

        if config.pool_size == 0 {
            config.pool_size = 1;
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_config_falls_back_to_defaults() {
        let config = AppConfig::load_from("does-not-exist").expect("Failed to load config");
        assert_eq!(config.result_selector, "div.rc");
        assert_eq!(config.negation_marker, "NON");
        assert!(config.pool_size >= 1);
    }

    #[test]
    fn test_load_config_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("custom.yaml");
        std::fs::write(&path, "pool_size: 0\nmissing_terms_marker: \"Missing:\"\n").unwrap();

        let name = dir.path().join("custom");
        let config = AppConfig::load_from(name.to_str().unwrap()).unwrap();
        assert_eq!(config.missing_terms_marker, "Missing:");
        assert_eq!(config.pool_size, 1);
        assert_eq!(config.search_url, "https://www.google.it/search");
    }
}
