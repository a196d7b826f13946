use serde::Deserialize;

/// Keyword lists and thresholds for [`super::ListingExtractor`]
///
/// The defaults describe the listing directory crawled out of the box. A
/// TOML file with the same (kebab-case) keys overrides any subset of them,
/// which lets a new listing site be added without code changes.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ExtractionRules {
    pub anchor: AnchorRules,
    pub container: ContainerRules,

    /// Title used when a link carries no text, title or image alt
    pub fallback_title: String,

    /// Titles with fewer characters than this are discarded
    pub min_title_chars: usize,

    /// Longer titles are cut to exactly this many characters
    pub max_title_chars: usize,

    /// The container strategy runs when the anchor strategy yields fewer records
    pub fallback_threshold: usize,

    /// Upper bound on records produced by one pass
    pub max_records: usize,
}

/// Anchor-pattern strategy settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct AnchorRules {
    /// Substrings identifying redirector hrefs
    pub href_patterns: Vec<String>,

    /// Description template; `{title}` is replaced by the record title
    pub description_template: String,

    pub premium: bool,
    pub rating: f64,
}

/// Container-pattern strategy settings
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "kebab-case", default)]
pub struct ContainerRules {
    /// Block-level elements considered as containers
    pub element_tags: Vec<String>,

    /// Keywords matched case-insensitively against the class attribute
    pub class_keywords: Vec<String>,

    /// Heading-like elements searched, in document order, for the title
    pub title_selectors: Vec<String>,

    pub description_template: String,
    pub premium: bool,
    pub rating: f64,
}

impl Default for ExtractionRules {
    fn default() -> Self {
        Self {
            anchor: AnchorRules::default(),
            container: ContainerRules::default(),
            fallback_title: "Cam Site".to_string(),
            min_title_chars: 3,
            max_title_chars: 100,
            fallback_threshold: 10,
            max_records: 100,
        }
    }
}

impl Default for AnchorRules {
    fn default() -> Self {
        Self {
            href_patterns: ["/go/", "/out/", "/visit/", "click.", "track.", "go.php", "out.php", "refer"]
                .into_iter()
                .map(String::from)
                .collect(),
            description_template: "Discover {title} - Premium live cam experience".to_string(),
            premium: true,
            rating: 4.5,
        }
    }
}

impl Default for ContainerRules {
    fn default() -> Self {
        Self {
            element_tags: ["div", "article", "li"].into_iter().map(String::from).collect(),
            class_keywords: ["site", "card", "item", "list"]
                .into_iter()
                .map(String::from)
                .collect(),
            title_selectors: ["h2", "h3", "h4", "strong"]
                .into_iter()
                .map(String::from)
                .collect(),
            description_template: "Visit {title} - Top rated adult entertainment".to_string(),
            premium: false,
            rating: 4.0,
        }
    }
}

impl AnchorRules {
    /// Checks whether an href looks like a redirector link
    pub fn matches(&self, href: &str) -> bool {
        self.href_patterns.iter().any(|p| href.contains(p.as_str()))
    }
}

impl ContainerRules {
    /// Checks whether a class attribute contains any container keyword
    pub fn matches_class(&self, class_attr: &str) -> bool {
        let lowered = class_attr.to_lowercase();
        self.class_keywords
            .iter()
            .any(|k| lowered.contains(&k.to_lowercase()))
    }
}

/// Fills a description template
pub(crate) fn render_template(template: &str, title: &str) -> String {
    template.replace("{title}", title)
}
