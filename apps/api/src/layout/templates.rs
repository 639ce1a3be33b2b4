//! The seven template descriptors.
//!
//! A template is pure data: region geometry, where each section goes, the header treatment,
//! colours, labels and limits. Both engines read descriptors generically and never branch on a
//! template id, so an eighth template is one more `static` here.

use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::font_metrics::Typeface;
use super::limits::{CharBudgets, ItemCaps, LimitPolicy, LineCaps, STANDARD};
use crate::render::draw::{
    Color, Stroke, BLUE_100, BLUE_600, EMERALD_500, EMERALD_700, GRAY_100, GRAY_200, GRAY_300,
    GRAY_500, GRAY_50, GRAY_700, GRAY_800, GRAY_900, INDIGO_100, INDIGO_600, PINK_100, PURPLE_100,
    PURPLE_600, WHITE,
};
use crate::render::RenderError;

// ────────────────────────────────────────────────────────────────────────────
// Identifiers
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TemplateId {
    Classic,
    Professional,
    Minimal,
    Modern,
    Creative,
    Executive,
    Technical,
}

impl TemplateId {
    pub const ALL: [TemplateId; 7] = [
        TemplateId::Classic,
        TemplateId::Professional,
        TemplateId::Minimal,
        TemplateId::Modern,
        TemplateId::Creative,
        TemplateId::Executive,
        TemplateId::Technical,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Classic => "classic",
            TemplateId::Professional => "professional",
            TemplateId::Minimal => "minimal",
            TemplateId::Modern => "modern",
            TemplateId::Creative => "creative",
            TemplateId::Executive => "executive",
            TemplateId::Technical => "technical",
        }
    }
}

impl FromStr for TemplateId {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_ascii_lowercase();
        TemplateId::ALL
            .into_iter()
            .find(|id| id.as_str() == wanted)
            .ok_or_else(|| RenderError::UnknownTemplate(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    Summary,
    Experience,
    Education,
    Projects,
    Skills,
}

// ────────────────────────────────────────────────────────────────────────────
// Descriptor types
// ────────────────────────────────────────────────────────────────────────────

/// Cosmetic fill behind a region, from the header band down to the page bottom.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RegionFill {
    pub x: f32,
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Region {
    pub id: &'static str,
    pub x_offset: f32,
    pub width: f32,
    /// `false` regions share the flow cursor; `true` regions fork their own.
    pub starts_new_cursor: bool,
    pub fill: Option<RegionFill>,
}

impl Region {
    pub fn right_edge(&self) -> f32 {
        self.x_offset + self.width
    }
}

/// One section painted into one region. Placements are listed in paint order.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub section: Section,
    pub region: &'static str,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Align {
    Left,
    Center,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum ContactLayout {
    /// All contact items on one line.
    Inline { separator: &'static str },
    /// One item per line, each prefixed.
    Stacked { prefix: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Band {
    pub height: f32,
    pub color: Color,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ornament {
    pub cx: f32,
    pub cy: f32,
    pub r: f32,
    pub color: Color,
}

/// Header treatment. `reserved` is a constant: the body always starts there, whatever the
/// header holds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct HeaderSpec {
    pub reserved: f32,
    /// Page y of the name line.
    pub padding_top: f32,
    pub align: Align,
    pub band: Option<Band>,
    pub name_color: Color,
    /// Points added to the tier's heading size for the name.
    pub name_boost: f32,
    pub uppercase_name: bool,
    pub title_color: Color,
    pub contact: ContactLayout,
    pub contact_color: Color,
    pub rule: Option<Stroke>,
    pub outline: Option<Stroke>,
    pub ornaments: &'static [Ornament],
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct SectionLabels {
    pub summary: &'static str,
    pub experience: &'static str,
    pub education: &'static str,
    pub projects: &'static str,
    pub skills: &'static str,
}

impl SectionLabels {
    pub fn get(&self, section: Section) -> &'static str {
        match section {
            Section::Summary => self.summary,
            Section::Experience => self.experience,
            Section::Education => self.education,
            Section::Projects => self.projects,
            Section::Skills => self.skills,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum TitleMarker {
    None,
    /// Short vertical bar left of the label.
    Bar(Color),
    /// Dot in the gutter left of the region.
    Dot(Color),
    /// Rounded highlight behind the label.
    Underlay(Color),
    /// Literal text before the label.
    Prefix(&'static str),
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TitleSpec {
    pub labels: SectionLabels,
    pub uppercase: bool,
    pub color: Color,
    pub marker: TitleMarker,
    /// Rule across the region under the label.
    pub rule: Option<Stroke>,
}

impl TitleSpec {
    pub fn label(&self, section: Section) -> String {
        let label = self.labels.get(section);
        let label = if self.uppercase {
            label.to_uppercase()
        } else {
            label.to_string()
        };
        match self.marker {
            TitleMarker::Prefix(prefix) => format!("{prefix}{label}"),
            _ => label,
        }
    }
}

/// Where an entry's date range goes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum DatePlacement {
    /// Right-aligned on the title line.
    TitleLine,
    /// Right-aligned on the organisation line.
    OrgLine,
    /// Own caption line under the organisation.
    OwnLine,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Card {
    pub fill: Color,
    pub stroke: Option<Stroke>,
    pub padding: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct EntrySpec {
    pub dates: DatePlacement,
    pub date_separator: &'static str,
    pub org_separator: &'static str,
    pub org_color: Color,
    pub date_color: Color,
    /// Prefix for each description line.
    pub bullet: &'static str,
    /// Dot left of each entry title.
    pub marker: Option<Color>,
    /// Background panel behind each experience entry.
    pub card: Option<Card>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub enum SkillsLayout {
    /// "Category: a, b, c" wrapped to the region.
    Labeled { separator: &'static str },
    /// Categories in a grid, label over a wrapped item list.
    Columns { count: usize, separator: &'static str },
    /// Category label over rounded pills that wrap across the region.
    Badges { fills: &'static [Color], text: Color },
    /// Category label over one item per line.
    Bullets { bullet: &'static str },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SummaryStyle {
    Plain,
    /// Wrapped in a `/** ... */` block.
    DocComment,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Palette {
    pub heading: Color,
    pub text: Color,
    pub muted: Color,
    pub accent: Color,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct TemplateDescriptor {
    pub id: TemplateId,
    pub name: &'static str,
    pub description: &'static str,
    pub typeface: Typeface,
    pub palette: Palette,
    pub header: HeaderSpec,
    pub regions: &'static [Region],
    pub placements: &'static [Placement],
    pub titles: TitleSpec,
    pub entries: EntrySpec,
    pub skills: SkillsLayout,
    pub summary: SummaryStyle,
    pub limits: LimitPolicy,
}

impl TemplateDescriptor {
    pub fn region(&self, id: &str) -> Option<&Region> {
        self.regions.iter().find(|r| r.id == id)
    }

    /// Side-by-side columns in the body: forked regions, or 1 for single-flow templates.
    pub fn column_count(&self) -> usize {
        self.regions.iter().filter(|r| r.starts_new_cursor).count().max(1)
    }

    pub fn body_top(&self) -> f32 {
        self.header.reserved
    }
}

pub fn descriptor(id: TemplateId) -> &'static TemplateDescriptor {
    match id {
        TemplateId::Classic => &CLASSIC,
        TemplateId::Professional => &PROFESSIONAL,
        TemplateId::Minimal => &MINIMAL,
        TemplateId::Modern => &MODERN,
        TemplateId::Creative => &CREATIVE,
        TemplateId::Executive => &EXECUTIVE,
        TemplateId::Technical => &TECHNICAL,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Shared pieces
// ────────────────────────────────────────────────────────────────────────────

const fn stroke(color: Color, width: f32) -> Stroke {
    Stroke { color, width }
}

const MAIN_FULL: Region = Region {
    id: "main",
    x_offset: 20.0,
    width: 170.0,
    starts_new_cursor: false,
    fill: None,
};

const MAIN_INSET: Region = Region {
    id: "main",
    x_offset: 25.0,
    width: 165.0,
    starts_new_cursor: false,
    fill: None,
};

const SINGLE_COLUMN: [Placement; 5] = [
    Placement { section: Section::Summary, region: "main" },
    Placement { section: Section::Experience, region: "main" },
    Placement { section: Section::Education, region: "main" },
    Placement { section: Section::Projects, region: "main" },
    Placement { section: Section::Skills, region: "main" },
];

const STANDARD_LABELS: SectionLabels = SectionLabels {
    summary: "Professional Summary",
    experience: "Experience",
    education: "Education",
    projects: "Projects",
    skills: "Skills",
};

const DEFAULT_PALETTE: Palette = Palette {
    heading: GRAY_800,
    text: GRAY_700,
    muted: GRAY_500,
    accent: BLUE_600,
};

// ────────────────────────────────────────────────────────────────────────────
// Single column, plain header
// ────────────────────────────────────────────────────────────────────────────

static CLASSIC: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Classic,
    name: "Classic",
    description: "Centered header, ruled section titles, one column",
    typeface: Typeface::Sans,
    palette: DEFAULT_PALETTE,
    header: HeaderSpec {
        reserved: 46.0,
        padding_top: 18.0,
        align: Align::Center,
        band: None,
        name_color: GRAY_900,
        name_boost: 6.0,
        uppercase_name: false,
        title_color: GRAY_700,
        contact: ContactLayout::Inline { separator: " | " },
        contact_color: GRAY_500,
        rule: Some(stroke(GRAY_300, 0.4)),
        outline: None,
        ornaments: &[],
    },
    regions: &[MAIN_FULL],
    placements: &SINGLE_COLUMN,
    titles: TitleSpec {
        labels: STANDARD_LABELS,
        uppercase: true,
        color: GRAY_800,
        marker: TitleMarker::None,
        rule: Some(stroke(GRAY_200, 0.3)),
    },
    entries: EntrySpec {
        dates: DatePlacement::TitleLine,
        date_separator: " - ",
        org_separator: " | ",
        org_color: GRAY_700,
        date_color: GRAY_500,
        bullet: "\u{2022} ",
        marker: None,
        card: None,
    },
    skills: SkillsLayout::Labeled { separator: ", " },
    summary: SummaryStyle::Plain,
    limits: STANDARD,
};

static PROFESSIONAL: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Professional,
    name: "Professional",
    description: "Centered header with an accent rule and accent-marked section titles",
    typeface: Typeface::Sans,
    palette: DEFAULT_PALETTE,
    header: HeaderSpec {
        reserved: 46.0,
        padding_top: 18.0,
        align: Align::Center,
        band: None,
        name_color: GRAY_800,
        name_boost: 6.0,
        uppercase_name: true,
        title_color: BLUE_600,
        contact: ContactLayout::Inline { separator: " \u{2022} " },
        contact_color: GRAY_500,
        rule: Some(stroke(BLUE_600, 0.8)),
        outline: None,
        ornaments: &[],
    },
    regions: &[MAIN_FULL],
    placements: &SINGLE_COLUMN,
    titles: TitleSpec {
        labels: STANDARD_LABELS,
        uppercase: true,
        color: BLUE_600,
        marker: TitleMarker::Bar(BLUE_600),
        rule: None,
    },
    entries: EntrySpec {
        dates: DatePlacement::OrgLine,
        date_separator: " - ",
        org_separator: ", ",
        org_color: BLUE_600,
        date_color: GRAY_500,
        bullet: "\u{2022} ",
        marker: None,
        card: None,
    },
    skills: SkillsLayout::Labeled { separator: " \u{2022} " },
    summary: SummaryStyle::Plain,
    limits: LimitPolicy {
        roomy: CharBudgets { summary: 400, experience: 250, education: 150, project: 200 },
        tight: CharBudgets { summary: 250, experience: 120, education: 100, project: 120 },
        caps: ItemCaps { skill_categories: 2, skills_per_category: 10, ..STANDARD.caps },
        ..STANDARD
    },
};

static MINIMAL: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Minimal,
    name: "Minimal",
    description: "Left-aligned, light rules, generous white space",
    typeface: Typeface::Sans,
    palette: Palette { accent: GRAY_800, ..DEFAULT_PALETTE },
    header: HeaderSpec {
        reserved: 44.0,
        padding_top: 18.0,
        align: Align::Left,
        band: None,
        name_color: GRAY_900,
        name_boost: 4.0,
        uppercase_name: false,
        title_color: GRAY_500,
        contact: ContactLayout::Inline { separator: "  |  " },
        contact_color: GRAY_500,
        rule: Some(stroke(GRAY_200, 0.2)),
        outline: None,
        ornaments: &[],
    },
    regions: &[MAIN_FULL],
    placements: &SINGLE_COLUMN,
    titles: TitleSpec {
        labels: SectionLabels { summary: "About", ..STANDARD_LABELS },
        uppercase: false,
        color: GRAY_900,
        marker: TitleMarker::None,
        rule: None,
    },
    entries: EntrySpec {
        dates: DatePlacement::TitleLine,
        date_separator: " - ",
        org_separator: ", ",
        org_color: GRAY_500,
        date_color: GRAY_500,
        bullet: "- ",
        marker: None,
        card: None,
    },
    skills: SkillsLayout::Labeled { separator: " \u{00B7} " },
    summary: SummaryStyle::Plain,
    limits: LimitPolicy {
        roomy: CharBudgets { summary: 400, experience: 200, education: 150, project: 200 },
        tight: CharBudgets { summary: 250, experience: 100, education: 100, project: 100 },
        caps: ItemCaps { skills_per_category: 10, ..STANDARD.caps },
        ..STANDARD
    },
};

// ────────────────────────────────────────────────────────────────────────────
// Single column, banner header
// ────────────────────────────────────────────────────────────────────────────

static MODERN: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Modern,
    name: "Modern",
    description: "Blue banner header, dot-marked section titles, two-column skills",
    typeface: Typeface::Sans,
    palette: DEFAULT_PALETTE,
    header: HeaderSpec {
        reserved: 52.0,
        padding_top: 12.0,
        align: Align::Left,
        band: Some(Band { height: 44.0, color: BLUE_600 }),
        name_color: WHITE,
        name_boost: 8.0,
        uppercase_name: false,
        title_color: BLUE_100,
        contact: ContactLayout::Inline { separator: "   " },
        contact_color: WHITE,
        rule: None,
        outline: None,
        ornaments: &[],
    },
    regions: &[MAIN_INSET],
    placements: &SINGLE_COLUMN,
    titles: TitleSpec {
        labels: SectionLabels { summary: "About Me", ..STANDARD_LABELS },
        uppercase: false,
        color: GRAY_800,
        marker: TitleMarker::Dot(BLUE_600),
        rule: None,
    },
    entries: EntrySpec {
        dates: DatePlacement::TitleLine,
        date_separator: " - ",
        org_separator: " \u{2022} ",
        org_color: BLUE_600,
        date_color: GRAY_500,
        bullet: "\u{2022} ",
        marker: None,
        card: None,
    },
    skills: SkillsLayout::Columns { count: 2, separator: ", " },
    summary: SummaryStyle::Plain,
    limits: LimitPolicy {
        roomy: CharBudgets { summary: 400, experience: 250, education: 150, project: 200 },
        tight: CharBudgets { summary: 250, experience: 120, education: 100, project: 120 },
        caps: ItemCaps { skill_categories: 2, skills_per_category: 6, ..STANDARD.caps },
        ..STANDARD
    },
};

static CREATIVE: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Creative,
    name: "Creative",
    description: "Tall indigo banner with ornaments, marked entries, skill badges",
    typeface: Typeface::Sans,
    palette: Palette { accent: INDIGO_600, ..DEFAULT_PALETTE },
    header: HeaderSpec {
        reserved: 66.0,
        padding_top: 14.0,
        align: Align::Left,
        band: Some(Band { height: 58.0, color: INDIGO_600 }),
        name_color: WHITE,
        name_boost: 10.0,
        uppercase_name: false,
        title_color: INDIGO_100,
        contact: ContactLayout::Stacked { prefix: "" },
        contact_color: WHITE,
        rule: None,
        outline: None,
        ornaments: &[
            Ornament { cx: 186.0, cy: 14.0, r: 24.0, color: PURPLE_600 },
            Ornament { cx: 160.0, cy: 50.0, r: 8.0, color: PURPLE_600 },
        ],
    },
    regions: &[MAIN_INSET],
    placements: &SINGLE_COLUMN,
    titles: TitleSpec {
        labels: SectionLabels {
            summary: "Hello!",
            experience: "Where I've Worked",
            education: "What I've Studied",
            projects: "Things I've Built",
            skills: "What I'm Good At",
        },
        uppercase: false,
        color: INDIGO_600,
        marker: TitleMarker::Underlay(INDIGO_100),
        rule: None,
    },
    entries: EntrySpec {
        dates: DatePlacement::TitleLine,
        date_separator: " - ",
        org_separator: " \u{00B7} ",
        org_color: PURPLE_600,
        date_color: GRAY_500,
        bullet: "\u{2022} ",
        marker: Some(INDIGO_600),
        card: None,
    },
    skills: SkillsLayout::Badges {
        fills: &[INDIGO_100, PURPLE_100, PINK_100, BLUE_100],
        text: GRAY_800,
    },
    summary: SummaryStyle::Plain,
    limits: LimitPolicy {
        roomy: CharBudgets { summary: 400, experience: 200, education: 150, project: 200 },
        tight: CharBudgets { summary: 250, experience: 100, education: 100, project: 100 },
        caps: ItemCaps { skill_categories: 2, skills_per_category: 9, ..STANDARD.caps },
        lines: LineCaps { base: 4, compact: 2, dense: 2 },
        ..STANDARD
    },
};

// ────────────────────────────────────────────────────────────────────────────
// Two independent columns
// ────────────────────────────────────────────────────────────────────────────

static EXECUTIVE: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Executive,
    name: "Executive",
    description: "Dark banner, shaded sidebar with profile, skills and education",
    typeface: Typeface::Sans,
    palette: Palette { accent: GRAY_800, ..DEFAULT_PALETTE },
    header: HeaderSpec {
        reserved: 48.0,
        padding_top: 10.0,
        align: Align::Left,
        band: Some(Band { height: 40.0, color: GRAY_800 }),
        name_color: WHITE,
        name_boost: 8.0,
        uppercase_name: true,
        title_color: GRAY_300,
        contact: ContactLayout::Inline { separator: "  |  " },
        contact_color: GRAY_200,
        rule: None,
        outline: None,
        ornaments: &[],
    },
    regions: &[
        Region {
            id: "sidebar",
            x_offset: 20.0,
            width: 50.0,
            starts_new_cursor: true,
            fill: Some(RegionFill { x: 0.0, width: 75.0, color: GRAY_100 }),
        },
        Region {
            id: "main",
            x_offset: 80.0,
            width: 110.0,
            starts_new_cursor: true,
            fill: None,
        },
    ],
    placements: &[
        Placement { section: Section::Summary, region: "sidebar" },
        Placement { section: Section::Skills, region: "sidebar" },
        Placement { section: Section::Education, region: "sidebar" },
        Placement { section: Section::Experience, region: "main" },
        Placement { section: Section::Projects, region: "main" },
    ],
    titles: TitleSpec {
        labels: SectionLabels {
            summary: "Profile",
            experience: "Professional Experience",
            ..STANDARD_LABELS
        },
        uppercase: true,
        color: GRAY_800,
        marker: TitleMarker::None,
        rule: Some(stroke(GRAY_800, 0.5)),
    },
    entries: EntrySpec {
        dates: DatePlacement::OwnLine,
        date_separator: " - ",
        org_separator: ", ",
        org_color: GRAY_700,
        date_color: GRAY_500,
        bullet: "\u{2022} ",
        marker: None,
        card: None,
    },
    skills: SkillsLayout::Bullets { bullet: "\u{2022} " },
    summary: SummaryStyle::Plain,
    limits: LimitPolicy {
        roomy: CharBudgets { summary: 200, experience: 200, education: 100, project: 150 },
        tight: CharBudgets { summary: 200, experience: 100, education: 80, project: 100 },
        caps: ItemCaps { skill_categories: 3, skills_per_category: 6, ..STANDARD.caps },
        lines: LineCaps { base: 4, compact: 2, dense: 2 },
    },
};

static TECHNICAL: TemplateDescriptor = TemplateDescriptor {
    id: TemplateId::Technical,
    name: "Technical",
    description: "Monospaced, code-styled labels, skills sidebar beside experience cards",
    typeface: Typeface::Mono,
    palette: Palette { accent: EMERALD_700, ..DEFAULT_PALETTE },
    header: HeaderSpec {
        reserved: 62.0,
        padding_top: 22.0,
        align: Align::Left,
        band: None,
        name_color: GRAY_900,
        name_boost: 4.0,
        uppercase_name: false,
        title_color: EMERALD_700,
        contact: ContactLayout::Stacked { prefix: "> " },
        contact_color: GRAY_700,
        rule: None,
        outline: Some(stroke(EMERALD_500, 0.6)),
        ornaments: &[],
    },
    regions: &[
        Region {
            id: "intro",
            x_offset: 20.0,
            width: 170.0,
            starts_new_cursor: false,
            fill: None,
        },
        Region {
            id: "sidebar",
            x_offset: 20.0,
            width: 60.0,
            starts_new_cursor: true,
            fill: None,
        },
        Region {
            id: "main",
            x_offset: 90.0,
            width: 100.0,
            starts_new_cursor: true,
            fill: None,
        },
    ],
    placements: &[
        Placement { section: Section::Summary, region: "intro" },
        Placement { section: Section::Skills, region: "sidebar" },
        Placement { section: Section::Education, region: "sidebar" },
        Placement { section: Section::Experience, region: "main" },
        Placement { section: Section::Projects, region: "main" },
    ],
    titles: TitleSpec {
        labels: SectionLabels {
            summary: "about",
            experience: "experience",
            education: "education",
            projects: "projects",
            skills: "skills",
        },
        uppercase: false,
        color: EMERALD_700,
        marker: TitleMarker::Prefix("// "),
        rule: None,
    },
    entries: EntrySpec {
        dates: DatePlacement::TitleLine,
        date_separator: " -> ",
        org_separator: " @ ",
        org_color: EMERALD_700,
        date_color: GRAY_500,
        bullet: "> ",
        marker: None,
        card: Some(Card {
            fill: GRAY_50,
            stroke: Some(stroke(GRAY_200, 0.3)),
            padding: 2.0,
        }),
    },
    skills: SkillsLayout::Bullets { bullet: "- " },
    summary: SummaryStyle::DocComment,
    limits: LimitPolicy {
        roomy: CharBudgets { summary: 300, experience: 150, education: 100, project: 150 },
        tight: CharBudgets { summary: 200, experience: 150, education: 80, project: 100 },
        caps: ItemCaps { skill_categories: 3, skills_per_category: 6, ..STANDARD.caps },
        lines: LineCaps { base: 3, compact: 3, dense: 3 },
    },
};

// ────────────────────────────────────────────────────────────────────────────
// Tests
// ────────────────────────────────────────────────────────────────────────────
