// ==========================================
// 酸奶产线排产系统 - 派生字段计算
// ==========================================
// 职责: 从品名/口味名确定性地推导规格、口味标签与清洗特征
// 用途: 导入时对应列缺失或为空才使用
// ==========================================

use regex::Regex;
use std::sync::LazyLock;

static GRAMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*g\b").expect("GRAMS_PATTERN regex should compile")
});

static KILOGRAMS_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(\d+(?:\.\d+)?)\s*kg\b").expect("KILOGRAMS_PATTERN regex should compile")
});

static NUT_FREE_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\bnuts?[- ]?free\b").expect("NUT_FREE_PATTERN regex should compile")
});

static NUT_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\b(nuts?|almonds?|hazelnuts?|peanuts?|pecans?|walnuts?|cashews?|pistachios?|praline)\b",
    )
    .expect("NUT_PATTERN regex should compile")
});

/// 口味桶: (标签, 必须同时出现的关键词),按顺序首个命中
/// 原味不在其中: 仅当无任何风味词时才归为 plain
const FLAVOUR_BUCKETS: &[(&str, &[&str])] = &[
    ("vanilla", &["vanilla"]),
    ("honey", &["honey"]),
    ("strawberry", &["strawberry"]),
    ("blueberry", &["blueberry"]),
    ("raspberry", &["raspberry"]),
    ("mango", &["mango"]),
    ("mandarin_lime", &["mandarin", "lime"]),
    ("toffee", &["toffee"]),
    ("apple_cinnamon", &["apple", "cinnamon"]),
    ("apple_cinnamon", &["apple", "cinamon"]),
    ("white_choc", &["white choc"]),
    ("white_choc", &["whitechoc"]),
    ("granola", &["granola"]),
    ("tophat", &["tophat"]),
];

const PLAIN_KEYWORDS: &[&str] = &["plain", "natural", "greek"];

const FLAVOURED_KEYWORDS: &[&str] = &[
    "vanilla", "strawberry", "blueberry", "raspberry", "honey", "mango", "mandarin", "lime",
    "toffee", "choc", "granola", "tophat", "apple", "cinamon", "cinnamon",
];

/// 文本标准化: 去首尾空白、小写、合并连续空白
pub fn normalize_text(value: &str) -> String {
    value.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// 从品名提取包装规格（克）
///
/// - "150g" / "150 g" → 150
/// - "2kg" / "2 kg" → 2000
/// - 无法识别 → None
pub fn extract_pack_size_g(product_name: &str) -> Option<f64> {
    let text = normalize_text(product_name);

    if let Some(caps) = GRAMS_PATTERN.captures(&text) {
        return caps[1].parse::<f64>().ok();
    }
    if let Some(caps) = KILOGRAMS_PATTERN.captures(&text) {
        return caps[1].parse::<f64>().ok().map(|kg| kg * 1000.0);
    }
    None
}

/// 推断口味标签（未识别返回空串）
///
/// 风味桶优先; "Greek Honey" 归为 honey 而不是 plain
pub fn infer_flavour_label(product_name: &str, flavour_name: &str) -> String {
    let text = format!("{} {}", normalize_text(product_name), normalize_text(flavour_name));

    if let Some((label, _)) = FLAVOUR_BUCKETS
        .iter()
        .find(|(_, keys)| keys.iter().all(|k| text.contains(k)))
    {
        return label.to_string();
    }
    if plain_without_flavour(&text) {
        return "plain".to_string();
    }
    String::new()
}

fn plain_without_flavour(text: &str) -> bool {
    let plainish = PLAIN_KEYWORDS.iter().any(|k| text.contains(k));
    let flavoured = FLAVOURED_KEYWORDS.iter().any(|k| text.contains(k));
    plainish && !flavoured
}

/// 原味: 含 plain/natural/greek 且无明显风味词
pub fn is_plain(product_name: &str, flavour_label: &str) -> bool {
    let text = format!("{} {}", normalize_text(product_name), normalize_text(flavour_label));
    plain_without_flavour(&text)
}

pub fn is_granola(product_name: &str, flavour_label: &str) -> bool {
    let text = format!("{} {}", normalize_text(product_name), normalize_text(flavour_label));
    text.contains("granola")
}

pub fn has_chocolate(product_name: &str, flavour_label: &str) -> bool {
    let text = format!("{} {}", normalize_text(product_name), normalize_text(flavour_label));
    text.contains("choc")
}

pub fn has_nut_risk(product_name: &str, flavour_label: &str) -> bool {
    let text = format!("{} {}", normalize_text(product_name), normalize_text(flavour_label));
    // "nut free" 是声明而非风险
    let text = NUT_FREE_PATTERN.replace_all(&text, " ");
    NUT_PATTERN.is_match(&text)
}
