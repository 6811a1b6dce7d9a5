//! English and Chinese string tables for player-facing text.
//!
//! Templates use `{name}` placeholders filled by [`format_template`]. Lookups
//! fall back to English, then to the key itself.

use std::collections::BTreeMap;
use std::sync::LazyLock;

// =============================================================================
// Constants
// =============================================================================

/// Default locale used when no locale is explicitly requested.
pub const DEFAULT_LOCALE: &str = "en";

/// All supported locale codes.
pub const SUPPORTED_LOCALES: &[&str] = &["en", "zh"];

// =============================================================================
// String Table
// =============================================================================

/// Maps localization keys to translated text for a single locale.
pub type StringTable = BTreeMap<&'static str, &'static str>;

/// All string tables, keyed by locale code.
#[derive(Debug, Clone)]
pub struct Localization {
    tables: BTreeMap<&'static str, StringTable>,
}

impl Default for Localization {
    fn default() -> Self {
        let mut tables = BTreeMap::new();
        tables.insert("en", build_english_table());
        tables.insert("zh", build_chinese_table());
        Self { tables }
    }
}

static SHARED: LazyLock<Localization> = LazyLock::new(Localization::default);

impl Localization {
    /// The process-wide tables. They are built from code and never change.
    pub fn shared() -> &'static Localization {
        &SHARED
    }

    /// Look up `key` in `locale`, returning `None` if neither `locale` nor
    /// English has it.
    pub fn get(&self, locale: &str, key: &str) -> Option<&'static str> {
        self.tables
            .get(locale)
            .and_then(|table| table.get(key).copied())
            .or_else(|| {
                self.tables
                    .get(DEFAULT_LOCALE)
                    .and_then(|table| table.get(key).copied())
            })
    }

    /// Look up `key`, returning the key itself when it is missing everywhere.
    pub fn t<'a>(&self, locale: &str, key: &'a str) -> &'a str {
        match self.get(locale, key) {
            Some(text) => text,
            None => key,
        }
    }

    /// Look up `key` and substitute `{name}` placeholders.
    pub fn format(&self, locale: &str, key: &str, args: &[(&str, &str)]) -> String {
        format_template(self.t(locale, key), args)
    }

    /// Display label for a zone id, or the capitalized id for unknown zones.
    pub fn zone_label(&self, locale: &str, zone_id: &str) -> String {
        let key = format!("zone.{zone_id}");
        match self.get(locale, &key) {
            Some(label) => label.to_string(),
            None => capitalize(zone_id),
        }
    }

    pub fn is_supported(locale: &str) -> bool {
        SUPPORTED_LOCALES.contains(&locale)
    }
}

/// Replace every `{name}` in `template` with its value from `args`.
pub fn format_template(template: &str, args: &[(&str, &str)]) -> String {
    let mut out = template.to_string();
    for (name, value) in args {
        out = out.replace(&format!("{{{name}}}"), value);
    }
    out
}

/// `"lowland"` → `"Lowland"`.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

// =============================================================================
// Tables
// =============================================================================

fn build_english_table() -> StringTable {
    let entries: &[(&str, &str)] = &[
        // Zones
        ("zone.industrial", "Industrial"),
        ("zone.residential", "Residential"),
        ("zone.lowland", "Lowland"),
        // Advisory
        (
            "advisory.summary",
            "Optimizes CVaR (worst {tail}%) over the next {horizon} hours under rainfall uncertainty.",
        ),
        ("advisory.chosen_action", "Chosen: {action} {zone}"),
        ("advisory.risk_focus", "Main risk driver: {zone}"),
        ("advisory.budget_ok", "Action is affordable."),
        (
            "advisory.budget_debt",
            "If budget is insufficient, debt penalty will reduce trust.",
        ),
        // Events
        (
            "event.emergency_funding",
            "Emergency Funding: +${gain} (Penalty: -{penalty} Trust)",
        ),
        ("event.critical_flooding", "CRITICAL FLOODING in {zone}!"),
        (
            "event.council_grant",
            "City Council Grant: +${amount} (Trust: {trust}%)",
        ),
        ("event.commander_removed", "COMMANDER REMOVED!"),
        // Endings
        ("ending.lost_trust.title", "Lost Public Trust"),
        (
            "ending.lost_trust.description",
            "The public has lost all confidence in your response. Command has been revoked.",
        ),
        ("ending.model_commander.title", "Model Commander"),
        (
            "ending.model_commander.description",
            "Your excellent decisions minimized damage and earned high public trust.",
        ),
        ("ending.reliable_bureaucrat.title", "Reliable Bureaucrat"),
        (
            "ending.reliable_bureaucrat.description",
            "Despite some damage and costs, you successfully completed the disaster relief mission.",
        ),
        ("ending.poor_response.title", "Poor Response"),
        (
            "ending.poor_response.description",
            "Damage exceeded expectations. The road to recovery will be exceptionally long.",
        ),
    ];
    entries.iter().copied().collect()
}

fn build_chinese_table() -> StringTable {
    let entries: &[(&str, &str)] = &[
        ("zone.industrial", "工業區"),
        ("zone.residential", "住宅區"),
        ("zone.lowland", "低窪區"),
        (
            "advisory.summary",
            "以 CVaR(最差{tail}%) 評估未來 {horizon} 小時最壞情境，選擇能降低尾端損失的行動。",
        ),
        ("advisory.chosen_action", "建議：{action} {zone}"),
        ("advisory.risk_focus", "主要風險來源：{zone}"),
        ("advisory.budget_ok", "預算可負擔此行動。"),
        (
            "advisory.budget_debt",
            "若預算不足，行動會引發債務懲罰（信任度下降）。",
        ),
        (
            "event.emergency_funding",
            "緊急撥款：+${gain}（信任度 -{penalty}）",
        ),
        ("event.critical_flooding", "{zone} 嚴重淹水！"),
        ("event.council_grant", "市議會補助：+${amount}（信任度：{trust}%）"),
        ("event.commander_removed", "指揮官遭撤換！"),
        ("ending.lost_trust.title", "失去民心"),
        (
            "ending.lost_trust.description",
            "民眾對您的應變能力完全失去信心，指揮權已被收回。",
        ),
        ("ending.model_commander.title", "模範指揮官"),
        (
            "ending.model_commander.description",
            "您卓越的決策成功將損害降至最低，並贏得了民眾的高度信任。",
        ),
        ("ending.reliable_bureaucrat.title", "穩健決策者"),
        (
            "ending.reliable_bureaucrat.description",
            "雖然有一定的損害與支出，但您穩定地完成了救災任務。",
        ),
        ("ending.poor_response.title", "慘澹收場"),
        (
            "ending.poor_response.description",
            "損害超出了預期，災後的重建之路將異常漫長。",
        ),
    ];
    entries.iter().copied().collect()
}
