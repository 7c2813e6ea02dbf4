use serde::Serialize;

use crate::entities::symptom::SymptomRecord;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ContextFlags {
    pub pregnant: bool,
    pub liver_disease: bool,
    pub kidney_disease: bool,
    pub anticoagulant: bool,
    pub maoi_ssri: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ContextFlag {
    Pregnant,
    LiverDisease,
    KidneyDisease,
    Anticoagulant,
    MaoiSsri,
}

impl ContextFlags {
    pub fn is_set(&self, flag: ContextFlag) -> bool {
        match flag {
            ContextFlag::Pregnant => self.pregnant,
            ContextFlag::LiverDisease => self.liver_disease,
            ContextFlag::KidneyDisease => self.kidney_disease,
            ContextFlag::Anticoagulant => self.anticoagulant,
            ContextFlag::MaoiSsri => self.maoi_ssri,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContextWarning {
    pub symptom: String,
    pub ingredients: Vec<String>,
    pub flag: ContextFlag,
    pub message: &'static str,
}

struct Rule {
    flag: ContextFlag,
    needles: &'static [&'static str],
    message: &'static str,
}

const RULES: &[Rule] = &[
    Rule {
        flag: ContextFlag::Pregnant,
        needles: &["이부프로펜", "아스피린", "NSAID"],
        message: "임신 중 NSAID 복용은 태아에 영향을 줄 수 있어요. 의사와 상담하세요.",
    },
    Rule {
        flag: ContextFlag::Pregnant,
        needles: &["항히스타민", "클로르페니라민"],
        message: "임신 중 항히스타민제는 의사와 상담 후 복용하세요.",
    },
    Rule {
        flag: ContextFlag::LiverDisease,
        needles: &["아세트아미노펜"],
        message: "간 질환이 있으면 아세트아미노펜 복용량을 줄이거나 피해야 해요.",
    },
    Rule {
        flag: ContextFlag::KidneyDisease,
        needles: &["이부프로펜", "NSAID", "아스피린"],
        message: "신장 질환이 있으면 NSAID는 신기능을 악화시킬 수 있어요.",
    },
    Rule {
        flag: ContextFlag::Anticoagulant,
        needles: &["아스피린", "이부프로펜", "NSAID"],
        message: "항응고제 복용 중에는 출혈 위험이 커져요.",
    },
    Rule {
        flag: ContextFlag::MaoiSsri,
        needles: &["덱스트로메토르판"],
        message: "MAOI/SSRI 복용 중 덱스트로메토르판은 세로토닌 증후군 위험이 있어요.",
    },
];

/// Independent checks in fixed rule order. A rule fires at most once per record and
/// lists every ingredient that triggered it.
pub fn context_warnings(record: &SymptomRecord, flags: &ContextFlags) -> Vec<ContextWarning> {
    RULES
        .iter()
        .filter(|r| flags.is_set(r.flag))
        .filter_map(|rule| {
            let hits: Vec<String> = record
                .ingredients
                .iter()
                .filter(|i| rule.needles.iter().any(|n| i.contains(n)))
                .cloned()
                .collect();
            (!hits.is_empty()).then(|| ContextWarning {
                symptom: record.symptom.clone(),
                ingredients: hits,
                flag: rule.flag,
                message: rule.message,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entities::symptom::record;

    fn fever() -> SymptomRecord {
        let mut r = record("발열", "아세트아미노펜", "아세트아미노펜");
        r.ingredients.push("이부프로펜(NSAID)".into());
        r
    }

    #[test]
    fn no_flags_no_warnings() {
        assert!(context_warnings(&fever(), &ContextFlags::default()).is_empty());
    }

    #[test]
    fn liver_flag_hits_acetaminophen_only() {
        let flags = ContextFlags {
            liver_disease: true,
            ..Default::default()
        };
        let warnings = context_warnings(&fever(), &flags);
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].ingredients, vec!["아세트아미노펜"]);
        assert_eq!(warnings[0].flag, ContextFlag::LiverDisease);
    }

    #[test]
    fn maoi_flag_hits_dextromethorphan() {
        let cough = record("기침", "덱스트로메토르판", "덱스트로메토르판");
        let flags = ContextFlags {
            maoi_ssri: true,
            ..Default::default()
        };
        let warnings = context_warnings(&cough, &flags);
        assert_eq!(warnings.len(), 1);
        assert!(warnings[0].message.contains("세로토닌"));
    }

    #[test]
    fn more_flags_never_remove_or_reorder_warnings() {
        let record = fever();
        let all = [
            ContextFlag::Pregnant,
            ContextFlag::LiverDisease,
            ContextFlag::KidneyDisease,
            ContextFlag::Anticoagulant,
            ContextFlag::MaoiSsri,
        ];
        let mut flags = ContextFlags::default();
        let mut previous: Vec<ContextWarning> = Vec::new();
        for flag in all {
            match flag {
                ContextFlag::Pregnant => flags.pregnant = true,
                ContextFlag::LiverDisease => flags.liver_disease = true,
                ContextFlag::KidneyDisease => flags.kidney_disease = true,
                ContextFlag::Anticoagulant => flags.anticoagulant = true,
                ContextFlag::MaoiSsri => flags.maoi_ssri = true,
            }
            let current = context_warnings(&record, &flags);
            let mut it = current.iter();
            for w in &previous {
                assert!(it.any(|c| c == w), "lost or reordered {w:?}");
            }
            previous = current;
        }
        assert_eq!(previous.len(), 4);
    }

    #[test]
    fn one_rule_fires_once_even_with_several_matching_ingredients() {
        let mut muscle = record("근육통", "이부프로펜", "이부프로펜(NSAID)");
        muscle.ingredients.push("케토프로펜(NSAID 외용)".into());
        let flags = ContextFlags {
            pregnant: true,
            ..Default::default()
        };
        let warnings = context_warnings(&muscle, &flags);
        assert_eq!(warnings.len(), 1);
        assert_eq!(
            warnings[0].ingredients,
            vec!["이부프로펜(NSAID)", "케토프로펜(NSAID 외용)"]
        );
    }
}
