//! Built-in rule tables shipped with the binary.

use indexmap::IndexMap;

use super::{Lexicon, RulerPattern, UrgencyTables};

fn weights(pairs: &[(&str, f64)]) -> IndexMap<String, f64> {
    pairs
        .iter()
        .map(|(key, weight)| ((*key).to_string(), *weight))
        .collect()
}

fn strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| (*s).to_string()).collect()
}

fn groups(pairs: &[(&str, &[&str])]) -> IndexMap<String, Vec<String>> {
    pairs
        .iter()
        .map(|(key, values)| ((*key).to_string(), strings(values)))
        .collect()
}

pub(super) fn symptom_weights() -> IndexMap<String, f64> {
    weights(&[
        ("headache", 0.6),
        ("headaches", 0.6),
        ("severe headache", 0.9),
        ("migraine", 0.4),
        ("nausea", 0.3),
        ("vomiting", 0.4),
        ("dizziness", 0.5),
        ("confusion", 0.8),
        ("memory loss", 0.9),
        ("seizure", 0.95),
        ("seizures", 0.95),
        ("blurred vision", 0.7),
        ("vision problems", 0.7),
        ("weakness", 0.6),
        ("numbness", 0.6),
        ("speech problems", 0.8),
        ("coordination problems", 0.7),
        ("personality changes", 0.8),
        ("behavioral changes", 0.7),
        ("fatigue", 0.2),
        ("balance issues", 0.6),
    ])
}

pub(super) fn duration_weights() -> IndexMap<String, f64> {
    weights(&[
        ("acute", 0.8),
        ("sudden", 0.9),
        ("recently", 0.7),
        ("chronic", 0.3),
        ("persistent", 0.6),
        ("intermittent", 0.4),
        ("constant", 0.7),
        ("recent", 0.7),
    ])
}

pub(super) fn severity_weights() -> IndexMap<String, f64> {
    weights(&[
        ("severe", 0.9),
        ("intense", 0.8),
        ("excruciating", 0.95),
        ("unbearable", 0.95),
        ("moderate", 0.5),
        ("mild", 0.2),
        ("worsening", 0.8),
        ("getting worse", 0.8),
        ("deteriorating", 0.8),
        ("improving", 0.1),
        ("getting better", 0.1),
    ])
}

pub(super) fn red_flag_combinations() -> Vec<Vec<String>> {
    vec![
        strings(&["headache", "confusion"]),
        strings(&["headache", "seizure"]),
        strings(&["headache", "vision problems"]),
        strings(&["headache", "weakness"]),
        strings(&["seizure", "memory loss"]),
        strings(&["confusion", "personality changes"]),
        // classic triad
        strings(&["headache", "nausea", "vomiting"]),
    ]
}

pub(super) fn urgent_keywords() -> Vec<String> {
    strings(&[
        "seizure",
        "seizures",
        "convulsion",
        "unconscious",
        "severe headache",
        "worst headache",
        "thunderclap",
        "confusion",
        "disorientation",
        "memory loss",
        "sudden weakness",
        "sudden numbness",
        "sudden speech",
    ])
}

pub(super) fn urgent_patterns() -> Vec<String> {
    strings(&[
        r"pain.*(?:9|10).*(?:out of|/)\s*10",
        r"(?:9|10).*(?:out of|/)\s*10.*pain",
        r"worst.*headache.*life",
        r"never.*felt.*pain.*like",
    ])
}

pub(super) fn abbreviations() -> IndexMap<String, String> {
    [
        ("mri", "magnetic resonance imaging"),
        ("ct", "computed tomography"),
        ("bp", "blood pressure"),
        ("hr", "heart rate"),
        ("rr", "respiratory rate"),
        ("temp", "temperature"),
        ("resp", "respiratory"),
        ("o2", "oxygen"),
        ("co2", "carbon dioxide"),
        ("bmi", "body mass index"),
        ("hx", "history"),
        ("sx", "symptoms"),
        ("dx", "diagnosis"),
        ("tx", "treatment"),
        ("rx", "prescription"),
        ("pt", "patient"),
        ("pts", "patients"),
        ("yo", "year old"),
        ("y/o", "year old"),
        ("yrs", "years"),
        ("mos", "months"),
        ("wks", "weeks"),
        ("q", "every"),
        ("qd", "once daily"),
        ("qh", "every hour"),
        ("bid", "twice daily"),
        ("tid", "three times daily"),
        ("qid", "four times daily"),
        ("prn", "as needed"),
        ("npo", "nothing by mouth"),
        ("sob", "shortness of breath"),
        ("loc", "loss of consciousness"),
        ("n/v", "nausea and vomiting"),
        ("ha", "headache"),
        ("c/o", "complains of"),
        ("w/", "with"),
        ("w/o", "without"),
        ("cns", "central nervous system"),
        ("pns", "peripheral nervous system"),
    ]
    .iter()
    .map(|(abbr, full)| ((*abbr).to_string(), (*full).to_string()))
    .collect()
}

pub(super) fn category_patterns() -> IndexMap<String, Vec<String>> {
    groups(&[
        (
            "symptoms",
            &[
                r"\b(?:headache|headaches|migraine|migraines)\b",
                r"\b(?:nausea|vomiting|dizziness|vertigo)\b",
                r"\b(?:confusion|disorientation|memory loss)\b",
                r"\b(?:seizure|seizures|convulsion|convulsions)\b",
                r"\b(?:blurred vision|vision problems|visual disturbance)\b",
                r"\b(?:weakness|numbness|tingling)\b",
                r"\b(?:speech problems|difficulty speaking|slurred speech)\b",
                r"\b(?:coordination problems|balance issues|unsteady)\b",
                r"\b(?:fatigue|tiredness|exhaustion)\b",
                r"\b(?:personality changes|behavioral changes)\b",
            ],
        ),
        (
            "duration",
            &[
                r"\b\d+\s*(?:day|days|week|weeks|month|months|year|years)\b",
                r"\b(?:since|for|over|about)\s*\d+\s*(?:day|days|week|weeks|month|months|year|years)\b",
                r"\b(?:recent|recently|sudden|suddenly|gradual|gradually)\b",
                r"\b(?:chronic|acute|persistent|intermittent|constant)\b",
            ],
        ),
        (
            "severity",
            &[
                r"\b(?:severe|intense|excruciating|unbearable)\b",
                r"\b(?:moderate|moderately|medium)\b",
                r"\b(?:mild|mildly|slight|slightly|minor)\b",
                r"\b(?:worsening|getting worse|deteriorating)\b",
                r"\b(?:improving|getting better|subsiding)\b",
                r"\b(?:constant|persistent|continuous|ongoing)\b",
                r"\b(?:intermittent|occasional|sporadic|episodic)\b",
            ],
        ),
        (
            "frequency",
            &[
                r"\b(?:daily|every day|everyday)\b",
                r"\b(?:weekly|every week)\b",
                r"\b(?:monthly|every month)\b",
                r"\b(?:frequently|often|regularly)\b",
                r"\b(?:rarely|seldom|occasionally)\b",
                r"\b\d+\s*times?\s*(?:per|a)\s*(?:day|week|month)\b",
            ],
        ),
    ])
}

pub(super) fn ruler() -> Vec<RulerPattern> {
    let table: &[(&str, &[&str])] = &[
        (
            "SYMPTOM",
            &[
                "headache",
                "headaches",
                "nausea",
                "vomiting",
                "dizziness",
                "confusion",
                "seizure",
                "seizures",
                "blurred vision",
                "vision problems",
                "memory loss",
                "weakness",
                "numbness",
                "speech problems",
                "coordination problems",
            ],
        ),
        (
            "DURATION",
            &["# days", "# weeks", "# months", "# years", "since #", "for #"],
        ),
        (
            "SEVERITY",
            &[
                "severe",
                "mild",
                "moderate",
                "intense",
                "excruciating",
                "persistent",
                "constant",
                "intermittent",
            ],
        ),
        (
            "TEST",
            &[
                "mri",
                "magnetic resonance imaging",
                "ct scan",
                "computed tomography",
                "x-ray",
                "blood test",
            ],
        ),
        ("ANATOMY", &["head", "brain", "skull", "neck"]),
    ];
    table
        .iter()
        .flat_map(|(label, phrases)| {
            phrases.iter().map(move |phrase| RulerPattern {
                label: (*label).to_string(),
                phrase: (*phrase).to_string(),
            })
        })
        .collect()
}

pub(super) fn urgency() -> UrgencyTables {
    UrgencyTables {
        high_urgency_symptoms: strings(&[
            "seizure",
            "seizures",
            "severe headache",
            "confusion",
            "memory loss",
            "vision problems",
            "speech problems",
        ]),
        severe_indicators: strings(&["severe", "intense", "excruciating", "unbearable"]),
        acute_onset_keywords: strings(&["sudden", "acute", "recent"]),
    }
}

pub(super) fn lexicon() -> Lexicon {
    Lexicon {
        symptom_categories: groups(&[
            (
                "headache",
                &[
                    "headache",
                    "headaches",
                    "head pain",
                    "head ache",
                    "cephalgia",
                    "migraine",
                    "migraines",
                    "tension headache",
                    "cluster headache",
                ],
            ),
            (
                "nausea",
                &["nausea", "nauseous", "queasy", "upset stomach", "feeling sick"],
            ),
            (
                "vomiting",
                &["vomiting", "vomit", "throwing up", "emesis", "retching"],
            ),
            (
                "dizziness",
                &[
                    "dizziness",
                    "dizzy",
                    "vertigo",
                    "lightheaded",
                    "light headed",
                    "spinning",
                    "off balance",
                ],
            ),
            (
                "confusion",
                &[
                    "confusion",
                    "confused",
                    "disoriented",
                    "disorientation",
                    "unclear thinking",
                    "mental fog",
                ],
            ),
            (
                "memory_loss",
                &[
                    "memory loss",
                    "memory problems",
                    "forgetful",
                    "forgetfulness",
                    "amnesia",
                    "memory impairment",
                    "memory issues",
                ],
            ),
            (
                "seizure",
                &[
                    "seizure",
                    "seizures",
                    "convulsion",
                    "convulsions",
                    "epileptic episode",
                    "spasm",
                    "tremor",
                    "shaking",
                ],
            ),
            (
                "vision_problems",
                &[
                    "blurred vision",
                    "vision problems",
                    "visual disturbance",
                    "sight problems",
                    "double vision",
                    "diplopia",
                    "visual impairment",
                    "vision changes",
                ],
            ),
            (
                "weakness",
                &[
                    "weakness",
                    "weak",
                    "fatigue",
                    "tired",
                    "exhausted",
                    "exhaustion",
                    "tiredness",
                    "muscle weakness",
                    "loss of strength",
                ],
            ),
            (
                "numbness",
                &[
                    "numbness",
                    "numb",
                    "tingling",
                    "pins and needles",
                    "loss of feeling",
                    "paresthesia",
                ],
            ),
            (
                "speech_problems",
                &[
                    "speech problems",
                    "difficulty speaking",
                    "slurred speech",
                    "dysarthria",
                    "aphasia",
                    "trouble speaking",
                ],
            ),
            (
                "coordination_problems",
                &[
                    "coordination problems",
                    "balance issues",
                    "unsteady",
                    "clumsiness",
                    "ataxia",
                    "loss of coordination",
                    "difficulty walking",
                ],
            ),
        ]),
        severity_levels: groups(&[
            (
                "severe",
                &[
                    "severe",
                    "severely",
                    "intense",
                    "intensely",
                    "excruciating",
                    "unbearable",
                    "agonizing",
                    "terrible",
                ],
            ),
            (
                "moderate",
                &["moderate", "moderately", "medium", "noticeable", "significant"],
            ),
            (
                "mild",
                &["mild", "mildly", "slight", "slightly", "minor", "minimal"],
            ),
            (
                "worsening",
                &[
                    "worsening",
                    "getting worse",
                    "deteriorating",
                    "declining",
                    "progressing",
                ],
            ),
            (
                "improving",
                &["improving", "getting better", "subsiding", "lessening"],
            ),
        ]),
        duration_types: groups(&[
            (
                "acute",
                &[
                    "sudden",
                    "suddenly",
                    "acute",
                    "abrupt",
                    "rapid",
                    "all of a sudden",
                ],
            ),
            (
                "chronic",
                &[
                    "chronic",
                    "long term",
                    "long-term",
                    "ongoing",
                    "persistent",
                    "continuous",
                    "constant",
                    "prolonged",
                ],
            ),
            (
                "recent",
                &[
                    "recent",
                    "recently",
                    "just started",
                    "first noticed",
                    "came on",
                ],
            ),
            (
                "intermittent",
                &[
                    "intermittent",
                    "occasional",
                    "comes and goes",
                    "on and off",
                    "episodic",
                    "sporadic",
                ],
            ),
        ]),
        frequency_types: groups(&[
            (
                "daily",
                &["daily", "every day", "everyday", "each day", "day to day"],
            ),
            (
                "weekly",
                &["weekly", "every week", "once a week", "per week"],
            ),
            (
                "monthly",
                &["monthly", "every month", "once a month", "per month"],
            ),
            (
                "frequent",
                &["frequently", "often", "regularly", "commonly", "repeatedly"],
            ),
            (
                "rare",
                &["rarely", "seldom", "infrequently", "occasionally", "hardly ever"],
            ),
        ]),
        symptom_urgency: weights(&[
            ("seizure", 0.95),
            ("severe headache", 0.9),
            ("confusion", 0.85),
            ("memory loss", 0.8),
            ("speech problems", 0.8),
            ("vision problems", 0.75),
            ("weakness", 0.7),
            ("coordination problems", 0.7),
            ("headache", 0.6),
            ("numbness", 0.6),
            ("dizziness", 0.5),
            ("nausea", 0.3),
            ("vomiting", 0.4),
        ]),
        red_flag_phrases: strings(&[
            "sudden severe headache",
            "worst headache of life",
            "thunderclap headache",
            "headache with fever",
            "headache with confusion",
            "headache with seizure",
            "headache with weakness",
            "headache with vision changes",
            "headache with speech problems",
            "new onset seizure",
            "status epilepticus",
            "focal neurological deficit",
            "acute confusion",
            "sudden memory loss",
            "acute weakness",
            "sudden numbness",
            "acute vision loss",
        ]),
        red_flag_patterns: strings(&[
            r"worst headache.*life",
            r"sudden.*severe.*headache",
            r"thunderclap.*headache",
            r"headache.*fever.*neck.*stiff",
            r"seizure.*first.*time",
            r"new.*onset.*seizure",
            r"confusion.*disorientation",
            r"sudden.*weakness",
            r"sudden.*numbness",
            r"acute.*vision.*loss",
            r"sudden.*speech.*problems",
            r"loss.*consciousness",
            r"severe.*head.*trauma",
            r"headache.*pregnancy",
            r"headache.*cancer.*history",
        ]),
    }
}
