// ==========================================
// 酸奶产线排产系统 - 机组分配引擎
// ==========================================
// 职责: 根据品名/包装规格/覆写表为任务分配产线
// 输入: Job + ClassifierConfig
// 输出: MachineLine（全函数,未命中走兜底,不报错）
// 红线: 规则按顺序匹配,首个命中即返回（规则间存在重叠）
// ==========================================

use crate::config::ClassifierConfig;
use crate::domain::job::Job;
use crate::domain::types::MachineLine;
use std::fmt;

const SIZE_TOLERANCE_G: f64 = 1e-6;

// ==========================================
// ClassificationRule - 分配规则
// ==========================================
// 顺序即优先级
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClassificationRule {
    ExactOverride, // 精确品名覆写
    BucketSize,    // 桶装规格 → BUCKET_LINE
    GranolaLine,   // 燕麦脆/SS 前缀 → M3
    M2PotSize,     // 450g → M2
    M1PotSize,     // 150/170/175g → M1
    Fallback,      // 兜底
}

impl ClassificationRule {
    /// 参与匹配的有序规则链（兜底除外）
    pub const CHAIN: [ClassificationRule; 5] = [
        ClassificationRule::ExactOverride,
        ClassificationRule::BucketSize,
        ClassificationRule::GranolaLine,
        ClassificationRule::M2PotSize,
        ClassificationRule::M1PotSize,
    ];
}

impl fmt::Display for ClassificationRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ClassificationRule::ExactOverride => write!(f, "EXACT_OVERRIDE"),
            ClassificationRule::BucketSize => write!(f, "BUCKET_SIZE"),
            ClassificationRule::GranolaLine => write!(f, "GRANOLA_LINE"),
            ClassificationRule::M2PotSize => write!(f, "M2_POT_SIZE"),
            ClassificationRule::M1PotSize => write!(f, "M1_POT_SIZE"),
            ClassificationRule::Fallback => write!(f, "FALLBACK"),
        }
    }
}

/// 分配结果（含命中规则,便于解释）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub machine: MachineLine,
    pub rule: ClassificationRule,
}

// ==========================================
// MachineClassifier - 机组分配引擎
// ==========================================
pub struct MachineClassifier {
    config: ClassifierConfig,
}

impl MachineClassifier {
    /// 构造函数
    ///
    /// 名称类 token 统一转为小写,匹配时大小写不敏感
    pub fn new(config: &ClassifierConfig) -> Self {
        let mut config = config.clone();
        lowercase_all(&mut config.bucket_name_tokens);
        lowercase_all(&mut config.m2_name_tokens);
        lowercase_all(&mut config.m1_name_tokens);
        config.granola_token = config.granola_token.to_lowercase();
        config.granola_prefix = config.granola_prefix.to_lowercase();
        Self { config }
    }

    // ==========================================
    // 核心方法
    // ==========================================

    /// 计算任务所属产线
    pub fn classify(&self, job: &Job) -> MachineLine {
        self.explain(job).machine
    }

    /// 计算任务所属产线并返回命中规则
    pub fn explain(&self, job: &Job) -> Classification {
        let name_lower = job.product_name.to_lowercase();

        for rule in ClassificationRule::CHAIN {
            if let Some(machine) = self.evaluate(rule, job, &name_lower) {
                return Classification { machine, rule };
            }
        }

        Classification {
            machine: self.config.unmatched_machine,
            rule: ClassificationRule::Fallback,
        }
    }

    /// 分配产线（已预设 machine 的任务保持不变）
    pub fn assign(&self, mut job: Job) -> Job {
        if job.machine.is_none() {
            job.machine = Some(self.classify(&job));
        }
        job
    }

    // ==========================================
    // 规则判定
    // ==========================================

    fn evaluate(
        &self,
        rule: ClassificationRule,
        job: &Job,
        name_lower: &str,
    ) -> Option<MachineLine> {
        let cfg = &self.config;
        match rule {
            ClassificationRule::ExactOverride => cfg.overrides.get(&job.product_name).copied(),
            ClassificationRule::BucketSize => {
                (pack_matches(job.pack_size_g, &cfg.bucket_pack_sizes_g)
                    || contains_any(name_lower, &cfg.bucket_name_tokens))
                .then_some(MachineLine::BucketLine)
            }
            ClassificationRule::GranolaLine => {
                let by_token =
                    !cfg.granola_token.is_empty() && name_lower.contains(&cfg.granola_token);
                let by_prefix = !cfg.granola_prefix.is_empty()
                    && name_lower.trim_start().starts_with(&cfg.granola_prefix);
                (by_token || by_prefix).then_some(MachineLine::M3)
            }
            ClassificationRule::M2PotSize => {
                (pack_matches(job.pack_size_g, &cfg.m2_pack_sizes_g)
                    || contains_any(name_lower, &cfg.m2_name_tokens))
                .then_some(MachineLine::M2)
            }
            ClassificationRule::M1PotSize => {
                (pack_matches(job.pack_size_g, &cfg.m1_pack_sizes_g)
                    || contains_any(name_lower, &cfg.m1_name_tokens))
                .then_some(MachineLine::M1)
            }
            ClassificationRule::Fallback => Some(cfg.unmatched_machine),
        }
    }
}

// ==========================================
// 辅助函数
// ==========================================

fn pack_matches(pack_size_g: Option<f64>, sizes: &[f64]) -> bool {
    match pack_size_g {
        Some(p) => sizes.iter().any(|s| (p - s).abs() < SIZE_TOLERANCE_G),
        None => false,
    }
}

fn contains_any(haystack: &str, tokens: &[String]) -> bool {
    tokens.iter().any(|t| !t.is_empty() && haystack.contains(t.as_str()))
}

fn lowercase_all(tokens: &mut [String]) {
    for token in tokens.iter_mut() {
        *token = token.to_lowercase();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn job(name: &str, pack: Option<f64>) -> Job {
        Job {
            product_name: name.to_string(),
            pack_size_g: pack,
            ..Default::default()
        }
    }

    #[test]
    fn test_bucket_by_pack_and_token() {
        let classifier = MachineClassifier::new(&ClassifierConfig::default());
        assert_eq!(classifier.classify(&job("Greek Natural", Some(5000.0))), MachineLine::BucketLine);
        assert_eq!(classifier.classify(&job("Greek Natural 10KG", None)), MachineLine::BucketLine);
    }

    #[test]
    fn test_bucket_beats_granola() {
        let classifier = MachineClassifier::new(&ClassifierConfig::default());
        let c = classifier.explain(&job("Granola Topper 2kg", Some(2000.0)));
        assert_eq!(c.machine, MachineLine::BucketLine);
        assert_eq!(c.rule, ClassificationRule::BucketSize);
    }

    #[test]
    fn test_granola_and_ss_prefix() {
        let classifier = MachineClassifier::new(&ClassifierConfig::default());
        assert_eq!(classifier.classify(&job("Honey Granola 150g", Some(150.0))), MachineLine::M3);
        assert_eq!(classifier.classify(&job("SS Strawberry 170g", Some(170.0))), MachineLine::M3);
        // 仅前缀匹配,中间出现 "ss " 不算
        assert_eq!(classifier.classify(&job("Class Vanilla 150g", Some(150.0))), MachineLine::M1);
    }

    #[test]
    fn test_pot_sizes() {
        let classifier = MachineClassifier::new(&ClassifierConfig::default());
        assert_eq!(classifier.classify(&job("C.Vanilla 450g", None)), MachineLine::M2);
        assert_eq!(classifier.classify(&job("Vanilla", Some(450.0))), MachineLine::M2);
        assert_eq!(classifier.classify(&job("Mango", Some(175.0))), MachineLine::M1);
        assert_eq!(
            classifier.explain(&job("Mango 170g", None)).rule,
            ClassificationRule::M1PotSize
        );
    }

    #[test]
    fn test_override_precedence() {
        let config = ClassifierConfig::default().with_m2_override("C.SomeProduct 150g");
        let classifier = MachineClassifier::new(&config);
        let c = classifier.explain(&job("C.SomeProduct 150g", Some(150.0)));
        assert_eq!(c.machine, MachineLine::M2);
        assert_eq!(c.rule, ClassificationRule::ExactOverride);

        // 覆写为精确匹配
        assert_eq!(classifier.classify(&job("c.someproduct 150g", Some(150.0))), MachineLine::M1);
    }

    #[test]
    fn test_fallback_configurable() {
        let classifier = MachineClassifier::new(&ClassifierConfig::default());
        let c = classifier.explain(&job("Mystery Pot", Some(300.0)));
        assert_eq!(c.machine, MachineLine::M1);
        assert_eq!(c.rule, ClassificationRule::Fallback);

        let mut config = ClassifierConfig::default();
        config.unmatched_machine = MachineLine::Unknown;
        let classifier = MachineClassifier::new(&config);
        assert_eq!(classifier.classify(&job("Mystery Pot", None)), MachineLine::Unknown);
    }

    #[test]
    fn test_assign_keeps_presupplied_machine() {
        let classifier = MachineClassifier::new(&ClassifierConfig::default());
        let mut preset = job("Vanilla 450g", Some(450.0));
        preset.machine = Some(MachineLine::M1);
        assert_eq!(classifier.assign(preset).machine, Some(MachineLine::M1));

        let fresh = classifier.assign(job("Vanilla 450g", Some(450.0)));
        assert_eq!(fresh.machine, Some(MachineLine::M2));
    }
}
