use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RedFlag {
    pub pattern: &'static str,
    pub alert: &'static str,
}

const RED_FLAG_PATTERNS: &[(&str, &str)] = &[
    (
        r"흉통|가슴\s*(통증|이\s*아프|이\s*조이)",
        "가슴 통증은 심혈관 응급일 수 있어요. 즉시 119 또는 응급실을 찾으세요.",
    ),
    (
        r"호흡\s*곤란|숨이\s*(차|막히|가빠)",
        "호흡곤란이 있으면 자가 치료하지 말고 즉시 진료를 받으세요.",
    ),
    (
        r"의식|기절|실신",
        "의식 변화나 실신은 응급 상황이에요. 즉시 119에 연락하세요.",
    ),
    (
        r"피를\s*토|토혈|혈변|검은\s*변",
        "토혈이나 혈변은 위장관 출혈 신호일 수 있어요. 즉시 진료를 받으세요.",
    ),
    (
        r"마비|말이\s*어눌|발음이\s*어눌",
        "마비나 언어 장애는 뇌졸중 신호일 수 있어요. 즉시 119에 연락하세요.",
    ),
    (
        r"(?:^|[^\d.])(39|4[0-2])(\.\d)?\s*(도|℃|°C?)",
        "39도 이상의 고열은 해열제만으로 버티지 말고 진료를 받으세요.",
    ),
];

fn compiled() -> &'static [(Regex, &'static str, &'static str)] {
    static COMPILED: OnceLock<Vec<(Regex, &'static str, &'static str)>> = OnceLock::new();
    COMPILED.get_or_init(|| {
        RED_FLAG_PATTERNS
            .iter()
            .map(|(pattern, alert)| {
                (Regex::new(pattern).expect("valid regex"), *pattern, *alert)
            })
            .collect()
    })
}

/// Each pattern fires at most once, in list order.
pub fn scan_red_flags(texts: &[&str]) -> Vec<RedFlag> {
    compiled()
        .iter()
        .filter(|(re, _, _)| texts.iter().any(|t| re.is_match(t)))
        .map(|(_, pattern, alert)| RedFlag {
            pattern: *pattern,
            alert: *alert,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_patterns_compile() {
        assert_eq!(compiled().len(), RED_FLAG_PATTERNS.len());
    }

    #[test]
    fn ordinary_symptoms_raise_nothing() {
        assert!(scan_red_flags(&["두통", "어제부터 기침이 나요"]).is_empty());
    }

    #[test]
    fn flags_come_out_in_list_order_once_each() {
        let flags = scan_red_flags(&["숨이 차고 열이 39.5도", "가슴 통증, 흉통"]);
        let alerts: Vec<&str> = flags.iter().map(|f| f.alert).collect();
        assert_eq!(alerts.len(), 3);
        assert!(alerts[0].contains("가슴 통증"));
        assert!(alerts[1].contains("호흡곤란"));
        assert!(alerts[2].contains("39도"));
    }

    #[test]
    fn mild_fever_is_not_a_red_flag() {
        assert!(scan_red_flags(&["열이 37.8도"]).is_empty());
    }

    #[test]
    fn fever_number_must_stand_alone() {
        assert!(scan_red_flags(&["체온 139도라고 잘못 적었어요"]).is_empty());
        assert!(scan_red_flags(&["온도계에 37.39도"]).is_empty());
    }

    #[test]
    fn fever_accepts_degree_sign_units() {
        let flags = scan_red_flags(&["열이 39.5°C 예요"]);
        assert_eq!(flags.len(), 1);
        assert!(flags[0].alert.contains("39도"));
        assert_eq!(scan_red_flags(&["40℃"]).len(), 1);
        assert_eq!(scan_red_flags(&["체온 41 °C"]).len(), 1);
    }
}
