use crate::config::{ContentProbe, ExtractionConfig, PatternRule};
use crate::ConfigError;
use regex::{Regex, RegexBuilder};
use scraper::node::Element;

/// Compiles a rule pattern the way every extraction rule is matched:
/// case-insensitive, unanchored
pub fn compile_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    RegexBuilder::new(pattern).case_insensitive(true).build()
}

/// An attribute rule with its pattern compiled
#[derive(Debug, Clone)]
pub struct AttributeRule {
    pub attribute: String,
    pub pattern: Regex,
}

/// Accepts plain element names such as `nav` or `my-widget`
pub fn check_tag_name(tag: &str) -> Result<(), ConfigError> {
    if tag.is_empty() || !tag.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
        return Err(ConfigError::InvalidPattern(format!(
            "'{}' is not a valid tag name",
            tag
        )));
    }
    Ok(())
}

impl AttributeRule {
    fn compile(rule: &PatternRule) -> Result<Self, ConfigError> {
        if rule.attribute.trim().is_empty() {
            return Err(ConfigError::InvalidPattern(format!(
                "rule for pattern '{}' has no attribute",
                rule.pattern
            )));
        }
        let pattern = compile_pattern(&rule.pattern)
            .map_err(|e| ConfigError::InvalidPattern(format!("'{}': {}", rule.pattern, e)))?;
        Ok(Self {
            attribute: rule.attribute.to_ascii_lowercase(),
            pattern,
        })
    }

    /// Returns true if the element carries the attribute and its value matches
    pub fn matches(&self, element: &Element) -> bool {
        element
            .attr(&self.attribute)
            .map(|value| self.pattern.is_match(value))
            .unwrap_or(false)
    }
}

/// One compiled main-content probe
#[derive(Debug, Clone)]
pub enum ContainerProbe {
    /// First element with this tag name
    Tag(String),
    /// First element whose attribute matches the pattern
    Attribute(AttributeRule),
}

impl ContainerProbe {
    fn compile(probe: &ContentProbe) -> Result<Self, ConfigError> {
        match (&probe.tag, &probe.attribute, &probe.pattern) {
            (Some(tag), None, None) => {
                check_tag_name(tag)?;
                Ok(Self::Tag(tag.to_ascii_lowercase()))
            }
            (None, Some(attribute), Some(pattern)) => {
                AttributeRule::compile(&PatternRule::new(attribute, pattern)).map(Self::Attribute)
            }
            _ => Err(ConfigError::InvalidPattern(format!(
                "content probe must set either `tag` or `attribute` + `pattern`, got {:?}",
                probe
            ))),
        }
    }

    pub fn matches(&self, element: &Element) -> bool {
        match self {
            Self::Tag(tag) => element.name().eq_ignore_ascii_case(tag),
            Self::Attribute(rule) => rule.matches(element),
        }
    }
}

/// The compiled, ordered extraction policy
///
/// Built once per crawl from [`ExtractionConfig`] and shared by every page.
#[derive(Debug, Clone)]
pub struct ExtractionRules {
    /// Tags removed with their content before anything else
    pub strip_tags: Vec<String>,
    /// Page-wide attribute rules
    pub boilerplate: Vec<AttributeRule>,
    /// Container probes, tried in order
    pub probes: Vec<ContainerProbe>,
    /// Attribute rules applied inside the chosen container
    pub cleanup: Vec<AttributeRule>,
}

impl ExtractionRules {
    /// Compiles the extraction section of the configuration
    ///
    /// # Returns
    ///
    /// * `Ok(ExtractionRules)` - All patterns compiled
    /// * `Err(ConfigError::InvalidPattern)` - A tag, pattern or probe was malformed
    pub fn from_config(config: &ExtractionConfig) -> Result<Self, ConfigError> {
        for tag in &config.strip_tags {
            check_tag_name(tag)?;
        }

        let boilerplate = config
            .boilerplate
            .iter()
            .map(AttributeRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let probes = config
            .content_probes
            .iter()
            .map(ContainerProbe::compile)
            .collect::<Result<Vec<_>, _>>()?;

        let cleanup = config
            .cleanup
            .iter()
            .map(AttributeRule::compile)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            strip_tags: config
                .strip_tags
                .iter()
                .map(|t| t.to_ascii_lowercase())
                .collect(),
            boilerplate,
            probes,
            cleanup,
        })
    }

    pub fn is_stripped_tag(&self, element: &Element) -> bool {
        self.strip_tags
            .iter()
            .any(|tag| element.name().eq_ignore_ascii_case(tag))
    }

    pub fn is_boilerplate(&self, element: &Element) -> bool {
        self.boilerplate.iter().any(|rule| rule.matches(element))
    }

    pub fn is_cleanup_target(&self, element: &Element) -> bool {
        self.cleanup.iter().any(|rule| rule.matches(element))
    }
}

impl Default for ExtractionRules {
    #[allow(clippy::expect_used)]
    fn default() -> Self {
        // Built-in patterns are constants
        Self::from_config(&ExtractionConfig::default()).expect("built-in extraction rules compile")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn first_element(html: &str, selector: &str) -> Element {
        let document = Html::parse_fragment(html);
        let selector = Selector::parse(selector).unwrap();
        document.select(&selector).next().unwrap().value().clone()
    }

    #[test]
    fn test_default_rules_compile() {
        let rules = ExtractionRules::default();
        assert_eq!(rules.strip_tags.len(), 8);
        assert_eq!(rules.boilerplate.len(), 4);
        assert_eq!(rules.probes.len(), 6);
        assert_eq!(rules.cleanup.len(), 1);
    }

    #[test]
    fn test_attribute_rule_case_insensitive_substring() {
        let rules = ExtractionRules::default();

        let el = first_element(r#"<div class="Site-Header wide">x</div>"#, "div");
        assert!(rules.is_boilerplate(&el));

        let el = first_element(r#"<div id="cookieConsent">x</div>"#, "div");
        assert!(rules.is_boilerplate(&el));

        let el = first_element(r#"<section data-section="footer">x</section>"#, "section");
        assert!(rules.is_boilerplate(&el));

        let el = first_element(r#"<div class="content">x</div>"#, "div");
        assert!(!rules.is_boilerplate(&el));
    }

    #[test]
    fn test_stripped_tags() {
        let rules = ExtractionRules::default();
        assert!(rules.is_stripped_tag(&first_element("<nav>x</nav>", "nav")));
        assert!(!rules.is_stripped_tag(&first_element("<p>x</p>", "p")));
    }

    #[test]
    fn test_probe_matching() {
        let probe = ContainerProbe::Tag("main".to_string());
        assert!(probe.matches(&first_element("<main>x</main>", "main")));

        let probe = ContainerProbe::Attribute(
            AttributeRule::compile(&PatternRule::new("role", "^main$")).unwrap(),
        );
        assert!(probe.matches(&first_element(r#"<div role="main">x</div>"#, "div")));
        assert!(!probe.matches(&first_element(r#"<div role="mainly">x</div>"#, "div")));
    }

    #[test]
    fn test_invalid_pattern_is_config_error() {
        let mut config = ExtractionConfig::default();
        config.cleanup.push(PatternRule::new("class", "[broken"));
        assert!(matches!(
            ExtractionRules::from_config(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }

    #[test]
    fn test_malformed_probes_rejected() {
        let with_probe = |probe: ContentProbe| ExtractionConfig {
            content_probes: vec![probe],
            ..ExtractionConfig::default()
        };

        assert!(ExtractionRules::from_config(&with_probe(ContentProbe::tag("main"))).is_ok());
        assert!(ExtractionRules::from_config(&with_probe(ContentProbe::default())).is_err());
        assert!(ExtractionRules::from_config(&with_probe(ContentProbe {
            tag: Some("main".to_string()),
            attribute: Some("id".to_string()),
            pattern: None,
        }))
        .is_err());
        assert!(ExtractionRules::from_config(&with_probe(ContentProbe::tag("div > p"))).is_err());
    }

    #[test]
    fn test_check_tag_name() {
        assert!(check_tag_name("script").is_ok());
        assert!(check_tag_name("my-widget").is_ok());
        assert!(check_tag_name("").is_err());
        assert!(check_tag_name("div > p").is_err());
    }

    #[test]
    fn test_rule_without_attribute_rejected() {
        let config = ExtractionConfig {
            cleanup: vec![PatternRule::new(" ", "share")],
            ..ExtractionConfig::default()
        };
        assert!(matches!(
            ExtractionRules::from_config(&config),
            Err(ConfigError::InvalidPattern(_))
        ));
    }
}
