//! Keyword-presence category classifier.
use opskb_core::{Category, QaRecord};

const KEYWORD_HIT: u32 = 2;
const LICENSE_BONUS: u32 = 3;

/// Category keyword table. Iteration order is the tie-break order.
pub const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Deployment, &["部署", "安装", "卸载", "升级", "降级", "打包", "war", "jar"]),
    (Category::StartStop, &["启动", "停止", "重启", "开机", "关机", "自启", "初始化"]),
    (Category::Configuration, &["配置", "参数", "设置", "修改", "调整", "jvm", "端口", "路径"]),
    (Category::Performance, &["性能", "慢", "卡顿", "延迟", "超时", "优化", "调优", "内存", "cpu"]),
    (Category::Network, &["网络", "连接", "端口", "访问", "通信", "socket", "tcp", "http"]),
    (Category::Database, &["数据库", "连接池", "sql", "jdbc", "mysql", "oracle", "达梦"]),
    (Category::Security, &["安全", "认证", "授权", "权限", "证书", "ssl", "tls", "加密"]),
    (Category::Logging, &["日志", "监控", "告警", "报警", "记录", "打印", "输出"]),
    (Category::Cluster, &["集群", "节点", "主从", "同步", "异步", "高可用", "负载均衡"]),
    (Category::License, &["许可证", "license", "授权", "过期", "到期", "无效", "激活"]),
    (Category::Compatibility, &["兼容", "冲突", "版本", "依赖", "jar包", "类冲突"]),
    (Category::Other, &[]),
];

/// Keywords that earn the license bonus wherever they match.
pub const LICENSE_TERMS: &[&str] = &["license", "许可证", "授权", "过期"];

#[derive(Debug, Default, Clone, Copy)]
pub struct Classifier;

impl Classifier {
    pub fn new() -> Self { Self }

    /// Per-category scores for the combined, lowercased text, in table order.
    pub fn scores(&self, problem: &str, description: &str) -> Vec<(Category, u32)> {
        let text = format!("{} {}", problem, description).to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .map(|(category, keywords)| {
                let score = keywords
                    .iter()
                    .filter(|kw| text.contains(&kw.to_lowercase()))
                    .map(|kw| if LICENSE_TERMS.contains(kw) { KEYWORD_HIT + LICENSE_BONUS } else { KEYWORD_HIT })
                    .sum::<u32>();
                (*category, score)
            })
            .collect()
    }

    /// Highest-scoring category; the first in table order wins ties and a zero best score yields `Other`.
    pub fn classify(&self, problem: &str, description: &str) -> Category {
        let mut best = (Category::Other, 0);
        for (category, score) in self.scores(problem, description) {
            if score > best.1 {
                best = (category, score);
            }
        }
        best.0
    }

    pub fn classify_record(&self, record: &QaRecord) -> Category {
        self.classify(&record.question, &record.answer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_keywords_is_other() {
        assert_eq!(Classifier::new().classify("天气不错", ""), Category::Other);
        assert_eq!(Classifier::new().classify("", ""), Category::Other);
    }

    #[test]
    fn database_pool_timeout() {
        // 数据库 + 连接池 = 4 beats 超时 (performance) = 2 and 连接 (network) = 2
        assert_eq!(Classifier::new().classify("数据库 连接池 超时", ""), Category::Database);
    }

    #[test]
    fn license_bonus_dominates() {
        assert_eq!(Classifier::new().classify("License 过期", "服务启动失败"), Category::License);
    }

    #[test]
    fn bonus_applies_per_keyword_in_every_category() {
        let scores = Classifier::new().scores("授权", "");
        let security = scores.iter().find(|(c, _)| *c == Category::Security).unwrap().1;
        let license = scores.iter().find(|(c, _)| *c == Category::License).unwrap().1;
        assert_eq!(security, 5);
        assert_eq!(license, 5);
        // tie resolved by table order
        assert_eq!(Classifier::new().classify("授权", ""), Category::Security);
    }

    #[test]
    fn matching_is_case_insensitive() {
        assert_eq!(Classifier::new().classify("JDBC driver", ""), Category::Database);
    }

    #[test]
    fn description_contributes() {
        assert_eq!(Classifier::new().classify("服务异常", "查看日志输出"), Category::Logging);
    }

    #[test]
    fn table_covers_every_category_once() {
        let cats: Vec<Category> = CATEGORY_KEYWORDS.iter().map(|(c, _)| *c).collect();
        assert_eq!(cats, Category::ALL.to_vec());
    }
}
