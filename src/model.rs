use serde::Deserialize;

pub const DESCRIPTION_PREVIEW_CHARS: usize = 300;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum DevelopmentStatus {
    Development,
    Alpha,
    Beta,
    Mvp,
    Scaling,
    Completed,
    Delivered,
}

impl DevelopmentStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Development => "Development",
            Self::Alpha => "Alpha",
            Self::Beta => "Beta",
            Self::Mvp => "MVP",
            Self::Scaling => "Scaling",
            Self::Completed => "Completed",
            Self::Delivered => "Delivered",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', " ").as_str() {
            "development" => Some(Self::Development),
            "alpha" => Some(Self::Alpha),
            "beta" => Some(Self::Beta),
            "mvp" => Some(Self::Mvp),
            "scaling" => Some(Self::Scaling),
            "completed" => Some(Self::Completed),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::Development => "🛠️",
            Self::Alpha => "🧪",
            Self::Beta => "🚧",
            Self::Mvp => "🚀",
            Self::Scaling => "📈",
            Self::Completed => "✅",
            Self::Delivered => "🎉",
        }
    }

    pub fn caption(self) -> &'static str {
        match self {
            Self::Development => "Active Development",
            Self::Alpha => "Early Prototype",
            Self::Beta => "Feature Testing",
            Self::Mvp => "Minimum Viable Product",
            Self::Scaling => "Growth Phase",
            Self::Completed => "Project Finished",
            Self::Delivered => "Deployed & Live",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::Development => "badge-development",
            Self::Alpha => "badge-alpha",
            Self::Beta => "badge-beta",
            Self::Mvp => "badge-mvp",
            Self::Scaling => "badge-scaling",
            Self::Completed => "badge-completed",
            Self::Delivered => "badge-delivered",
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum ProgressStatus {
    InProgress,
    OnHold,
    InRevision,
    Completed,
    Delivered,
}

impl ProgressStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::InProgress => "In Progress",
            Self::OnHold => "On Hold",
            Self::InRevision => "In Revision",
            Self::Completed => "Completed",
            Self::Delivered => "Delivered",
        }
    }

    pub fn from_str(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().replace('_', " ").as_str() {
            "in progress" => Some(Self::InProgress),
            "on hold" => Some(Self::OnHold),
            "in revision" => Some(Self::InRevision),
            "completed" => Some(Self::Completed),
            "delivered" => Some(Self::Delivered),
            _ => None,
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            Self::InProgress => "⚙️",
            Self::OnHold => "⏸️",
            Self::InRevision => "🔄",
            Self::Completed => "✅",
            Self::Delivered => "🎉",
        }
    }

    pub fn css_class(self) -> &'static str {
        match self {
            Self::InProgress => "badge-in-progress",
            Self::OnHold => "badge-on-hold",
            Self::InRevision => "badge-in-revision",
            Self::Completed => "badge-completed",
            Self::Delivered => "badge-delivered",
        }
    }
}

#[derive(Clone, PartialEq, Debug)]
pub struct Feature {
    pub icon: String,
    pub text: String,
}

#[derive(Clone, PartialEq, Debug)]
pub struct TechEntry {
    pub name: String,
    pub icon_url: Option<String>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct MediaAsset {
    pub src: String,
    pub alt: String,
}

#[derive(Clone, PartialEq, Debug, Default)]
pub struct ItemLinks {
    pub repository_url: Option<String>,
    pub live_url: Option<String>,
}

#[derive(Clone, PartialEq, Debug)]
pub struct DisplayItem {
    pub id: String,
    pub title: String,
    pub subtitle: String,
    pub description: String,
    pub category: Option<String>,
    pub features: Vec<Feature>,
    pub tech_stack: Vec<TechEntry>,
    pub media: Vec<MediaAsset>,
    pub links: ItemLinks,
    pub progress_percentage: u8,
    pub development_status: Option<DevelopmentStatus>,
    pub progress_status: Option<ProgressStatus>,
}

impl DisplayItem {
    // Badges render only when both statuses are known.
    pub fn has_status_badges(&self) -> bool {
        self.development_status.is_some() && self.progress_status.is_some()
    }

    pub fn description_is_truncated(&self) -> bool {
        self.description.chars().count() > DESCRIPTION_PREVIEW_CHARS
    }

    pub fn description_preview(&self) -> String {
        if !self.description_is_truncated() {
            return self.description.clone();
        }

        let mut preview = prefix_chars(&self.description, DESCRIPTION_PREVIEW_CHARS).to_string();
        preview.push_str("...");
        preview
    }
}

fn prefix_chars(text: &str, limit: usize) -> &str {
    match text.char_indices().nth(limit) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

#[derive(Clone, Debug, Deserialize)]
pub struct FeatureRecord {
    #[serde(default)]
    pub icon: Option<String>,
    pub text: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ImageRecord {
    pub src: String,
    #[serde(default)]
    pub alt: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct TechStackRecord {
    #[serde(default)]
    pub id: Option<String>,
    pub name: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_url: Option<String>,
    #[serde(default)]
    pub is_core_skill: bool,
}

#[derive(Clone, Debug, Deserialize)]
pub struct ProjectRecord {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub subtitle: Option<String>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub features: Vec<FeatureRecord>,
    #[serde(default)]
    pub tech_stack: Vec<TechStackRecord>,
    #[serde(default)]
    pub images: Vec<ImageRecord>,
    #[serde(default)]
    pub repository_url: Option<String>,
    #[serde(default)]
    pub live_url: Option<String>,
    #[serde(default)]
    pub progress_percentage: Option<i64>,
    #[serde(default)]
    pub development_status: Option<String>,
    #[serde(default)]
    pub progress_status: Option<String>,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct ExperienceTechRecord {
    pub tech_stack: TechStackRecord,
}

#[derive(Clone, PartialEq, Debug, Deserialize)]
pub struct ExperienceRecord {
    pub id: String,
    pub role: String,
    pub company: String,
    #[serde(default)]
    pub job_type: Option<String>,
    pub start_date: String,
    #[serde(default)]
    pub end_date: Option<String>,
    #[serde(default)]
    pub location: Option<String>,
    #[serde(default)]
    pub arrangement: Option<String>,
    #[serde(default)]
    pub work_description: String,
    #[serde(default)]
    pub impact: Vec<String>,
    #[serde(default)]
    pub experience_tech_stack: Vec<ExperienceTechRecord>,
}

impl From<TechStackRecord> for TechEntry {
    fn from(record: TechStackRecord) -> Self {
        Self {
            name: record.name,
            icon_url: record.image_url,
        }
    }
}

impl From<ProjectRecord> for DisplayItem {
    fn from(record: ProjectRecord) -> Self {
        let progress = record.progress_percentage.unwrap_or(0).clamp(0, 100) as u8;

        Self {
            id: record.id,
            title: record.title,
            subtitle: record.subtitle.unwrap_or_default(),
            description: record.description,
            category: record.category,
            features: record
                .features
                .into_iter()
                .map(|feature| Feature {
                    icon: feature.icon.unwrap_or_else(|| "•".to_string()),
                    text: feature.text,
                })
                .collect(),
            tech_stack: record.tech_stack.into_iter().map(TechEntry::from).collect(),
            media: record
                .images
                .into_iter()
                .map(|image| MediaAsset {
                    alt: image.alt.unwrap_or_else(|| image.src.clone()),
                    src: image.src,
                })
                .collect(),
            links: ItemLinks {
                repository_url: record.repository_url,
                live_url: record.live_url,
            },
            progress_percentage: progress,
            development_status: record
                .development_status
                .as_deref()
                .and_then(DevelopmentStatus::from_str),
            progress_status: record
                .progress_status
                .as_deref()
                .and_then(ProgressStatus::from_str),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn item_with_description(description: &str) -> DisplayItem {
        DisplayItem {
            id: "p-1".to_string(),
            title: "Title".to_string(),
            subtitle: "Subtitle".to_string(),
            description: description.to_string(),
            category: None,
            features: Vec::new(),
            tech_stack: Vec::new(),
            media: Vec::new(),
            links: ItemLinks::default(),
            progress_percentage: 0,
            development_status: None,
            progress_status: None,
        }
    }

    #[test]
    fn long_description_is_cut_to_the_preview_limit() {
        let item = item_with_description(&"a".repeat(400));

        assert!(item.description_is_truncated());
        let preview = item.description_preview();
        assert_eq!(preview.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
        assert!(preview.ends_with("..."));
    }

    #[test]
    fn short_description_is_shown_in_full() {
        let item = item_with_description(&"b".repeat(100));

        assert!(!item.description_is_truncated());
        assert_eq!(item.description_preview(), item.description);
    }

    #[test]
    fn truncation_respects_multibyte_characters() {
        let item = item_with_description(&"é".repeat(310));

        let preview = item.description_preview();
        assert_eq!(preview.chars().count(), DESCRIPTION_PREVIEW_CHARS + 3);
    }

    #[test]
    fn badges_require_both_statuses() {
        let mut item = item_with_description("short");
        assert!(!item.has_status_badges());

        item.development_status = Some(DevelopmentStatus::Beta);
        assert!(!item.has_status_badges());

        item.progress_status = Some(ProgressStatus::InProgress);
        assert!(item.has_status_badges());
    }

    #[test]
    fn statuses_parse_from_wire_spellings() {
        assert_eq!(DevelopmentStatus::from_str("MVP"), Some(DevelopmentStatus::Mvp));
        assert_eq!(DevelopmentStatus::from_str("scaling"), Some(DevelopmentStatus::Scaling));
        assert_eq!(ProgressStatus::from_str("In Progress"), Some(ProgressStatus::InProgress));
        assert_eq!(ProgressStatus::from_str("in_progress"), Some(ProgressStatus::InProgress));
        assert_eq!(ProgressStatus::from_str("unknown"), None);
    }

    #[test]
    fn project_record_adapts_into_a_display_item() {
        let record: ProjectRecord = serde_json::from_value(serde_json::json!({
            "id": "p-9",
            "title": "Atlas",
            "subtitle": "Mapping tool",
            "description": "A mapping tool.",
            "category": "Web",
            "features": [{"icon": "🗺️", "text": "Offline tiles"}, {"text": "Route search"}],
            "tech_stack": [{"name": "Rust", "image_url": "/icons/rust.svg", "is_core_skill": true}],
            "images": [{"src": "/shots/atlas.png"}],
            "repository_url": "https://example.com/atlas.git",
            "progress_percentage": 140,
            "development_status": "Beta",
            "progress_status": "In Revision"
        }))
        .expect("record should deserialize");

        let item = DisplayItem::from(record);
        assert_eq!(item.progress_percentage, 100);
        assert_eq!(item.features[1].icon, "•");
        assert_eq!(item.media[0].alt, "/shots/atlas.png");
        assert_eq!(item.development_status, Some(DevelopmentStatus::Beta));
        assert_eq!(item.progress_status, Some(ProgressStatus::InRevision));
        assert!(item.has_status_badges());
        assert_eq!(item.links.live_url, None);
    }
}
