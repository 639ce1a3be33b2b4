//! Records shared by the engine, writer and pipeline tests.

use crate::models::resume::{
    Education, Experience, PersonalInfo, Project, ResumeRecord, SkillGroup,
};

fn s(text: &str) -> String {
    text.to_string()
}

fn person() -> PersonalInfo {
    PersonalInfo {
        full_name: s("Jane Doe"),
        email: s("jane@example.com"),
        phone: s("+1 555 0100"),
        location: s("Berlin, DE"),
        summary: s("Backend engineer focused on payments infrastructure and developer tooling."),
        title: Some(s("Staff Engineer")),
        website: Some(s("janedoe.dev")),
    }
}

fn skills(categories: usize, items: usize) -> Vec<SkillGroup> {
    (0..categories)
        .map(|c| SkillGroup {
            category: format!("Category {c}"),
            items: (0..items).map(|i| format!("Skill{c}x{i}")).collect(),
        })
        .collect()
}

/// Two roles, one degree, one project, two skill groups. Fits any template at Base.
pub fn typical_record() -> ResumeRecord {
    ResumeRecord {
        personal_info: person(),
        experience: vec![
            Experience {
                title: s("Senior Engineer"),
                company: s("Acme"),
                location: s("Remote"),
                start_date: s("2021-01"),
                end_date: None,
                current: true,
                description: s("Owned the ledger service\nCut p99 latency by 40%"),
                highlights: vec![s("Led the migration to Postgres 15")],
            },
            Experience {
                title: s("Engineer"),
                company: s("Initech"),
                location: s("Austin, TX"),
                start_date: s("2018-06"),
                end_date: Some(s("2020-12")),
                current: false,
                description: s("Built internal reporting pipelines"),
                highlights: Vec::new(),
            },
        ],
        education: vec![Education {
            degree: s("BSc Computer Science"),
            school: s("MIT"),
            location: s("Cambridge, MA"),
            graduation_date: s("2017"),
            description: None,
            gpa: Some(s("3.8")),
        }],
        projects: vec![Project {
            name: s("onepage"),
            description: s("Single-page resume renderer"),
            technologies: vec![s("Rust"), s("axum")],
            link: Some(s("github.com/janedoe/onepage")),
            start_date: None,
            end_date: None,
        }],
        skills: vec![
            SkillGroup {
                category: s("Languages"),
                items: vec![s("Rust"), s("Go"), s("TypeScript")],
            },
            SkillGroup {
                category: s("Tools"),
                items: vec![s("Docker"), s("Postgres")],
            },
        ],
    }
}

/// Name and email only.
pub fn minimal_record() -> ResumeRecord {
    ResumeRecord {
        personal_info: PersonalInfo {
            full_name: s("Jane Doe"),
            email: s("jane@example.com"),
            ..Default::default()
        },
        ..Default::default()
    }
}

/// Fifty roles with 2000-character descriptions and everything else oversized too.
pub fn stress_record() -> ResumeRecord {
    let paragraph: String = "Designed, built and operated distributed systems at scale. "
        .repeat(40)
        .chars()
        .take(2000)
        .collect();
    ResumeRecord {
        personal_info: PersonalInfo {
            summary: paragraph.clone(),
            ..person()
        },
        experience: (0..50)
            .map(|i| Experience {
                title: format!("Principal Engineer {i}"),
                company: format!("Company {i}"),
                location: s("Somewhere"),
                start_date: format!("{}", 1970 + i),
                end_date: Some(format!("{}", 1971 + i)),
                current: false,
                description: paragraph.clone(),
                highlights: vec![paragraph.clone()],
            })
            .collect(),
        education: (0..10)
            .map(|i| Education {
                degree: format!("Degree {i}"),
                school: format!("University {i}"),
                graduation_date: format!("{}", 1960 + i),
                description: Some(paragraph.clone()),
                ..Default::default()
            })
            .collect(),
        projects: (0..10)
            .map(|i| Project {
                name: format!("Project {i}"),
                description: paragraph.clone(),
                technologies: (0..12).map(|t| format!("Tech{t}")).collect(),
                link: Some(format!("example.com/p{i}")),
                ..Default::default()
            })
            .collect(),
        skills: skills(12, 20),
    }
}

/// Four roles whose descriptions are 80 short lines each: Dense by line weight alone.
pub fn dense_record() -> ResumeRecord {
    let description = (1..=80)
        .map(|n| format!("Fixed bug {n:02}"))
        .collect::<Vec<_>>()
        .join("\n");
    ResumeRecord {
        personal_info: person(),
        experience: (1..=4)
            .map(|i| Experience {
                title: format!("Role {i}"),
                company: format!("Company {i}"),
                start_date: format!("{}", 2010 + i),
                end_date: Some(format!("{}", 2011 + i)),
                description: description.clone(),
                ..Default::default()
            })
            .collect(),
        education: vec![Education {
            degree: s("BSc Physics"),
            school: s("ETH"),
            graduation_date: s("2009"),
            ..Default::default()
        }],
        ..Default::default()
    }
}

/// Four roles and five skill categories, for the sidebar templates.
pub fn executive_record() -> ResumeRecord {
    let mut record = typical_record();
    record.experience = (1..=4)
        .map(|i| Experience {
            title: format!("Director {i}"),
            company: format!("Holding {i}"),
            start_date: format!("{}", 2000 + 4 * i),
            end_date: Some(format!("{}", 2003 + 4 * i)),
            description: s("Ran a 40-person organisation\nGrew revenue 3x\nHired the leadership team"),
            ..Default::default()
        })
        .collect();
    record.skills = skills(5, 6);
    record
}
