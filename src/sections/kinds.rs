// Per-kind field lists and first-touch default content.
//
// The layout defaults are JSON UI trees shipped under assets/sections and
// embedded at compile time; they are stored and returned verbatim.

use super::{Section, SectionFields, SectionKind};

macro_rules! asset {
    ($kind:literal, $field:literal) => {
        include_str!(concat!(
            env!("CARGO_MANIFEST_DIR"),
            "/assets/sections/",
            $kind,
            "/",
            $field,
            ".json"
        ))
    };
}

pub struct Hero;
pub struct Nav;
pub struct Footer;
pub struct Contact;
pub struct Detail;
pub struct Slider;

impl Section for Hero {
    const KIND: SectionKind = SectionKind::Hero;
    const FIELDS: &'static [&'static str] = &["split", "centered", "active"];

    fn default_content() -> SectionFields {
        SectionFields::new()
            .with("split", asset!("hero", "split"))
            .with("centered", asset!("hero", "centered"))
            .with("active", "Split")
    }
}

impl Section for Nav {
    const KIND: SectionKind = SectionKind::Nav;
    const FIELDS: &'static [&'static str] = &["basic", "centered", "active"];

    fn default_content() -> SectionFields {
        SectionFields::new()
            .with("basic", asset!("nav", "basic"))
            .with("centered", asset!("nav", "centered"))
            .with("active", "Basic")
    }
}

impl Section for Footer {
    const KIND: SectionKind = SectionKind::Footer;
    const FIELDS: &'static [&'static str] = &["basic", "centered", "active"];

    fn default_content() -> SectionFields {
        SectionFields::new()
            .with("basic", "footer")
            .with("centered", "Default Centered")
            .with("active", "Default Active")
    }
}

impl Section for Contact {
    const KIND: SectionKind = SectionKind::Contact;
    const FIELDS: &'static [&'static str] = &["tile", "centered", "active"];

    fn default_content() -> SectionFields {
        SectionFields::new()
            .with("tile", asset!("contact", "tile"))
            .with("centered", asset!("contact", "centered"))
            .with("active", "Centered")
    }
}

impl Section for Detail {
    const KIND: SectionKind = SectionKind::Detail;
    const FIELDS: &'static [&'static str] = &["split", "tile", "active"];

    fn default_content() -> SectionFields {
        SectionFields::new()
            .with("split", asset!("detail", "split"))
            .with("tile", asset!("detail", "tile"))
            .with("active", "Tile")
    }
}

impl Section for Slider {
    const KIND: SectionKind = SectionKind::Slider;
    const FIELDS: &'static [&'static str] = &["basic"];

    fn default_content() -> SectionFields {
        SectionFields::new().with("basic", asset!("slider", "basic"))
    }
}

/// Default content for a kind known only at runtime.
pub fn default_content(kind: SectionKind) -> SectionFields {
    match kind {
        SectionKind::Hero => Hero::default_content(),
        SectionKind::Nav => Nav::default_content(),
        SectionKind::Footer => Footer::default_content(),
        SectionKind::Contact => Contact::default_content(),
        SectionKind::Detail => Detail::default_content(),
        SectionKind::Slider => Slider::default_content(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_populate_every_field() {
        for kind in SectionKind::ALL {
            let defaults = default_content(kind);
            assert_eq!(defaults.len(), kind.fields().len(), "{kind} default has extra or missing fields");
            for field in kind.fields() {
                let value = defaults.get(field).unwrap_or_default();
                assert!(!value.is_empty(), "{kind}.{field} default is empty");
            }
        }
    }

    #[test]
    fn layout_defaults_are_valid_json() {
        let layouts = [
            (SectionKind::Hero, "split"),
            (SectionKind::Hero, "centered"),
            (SectionKind::Nav, "basic"),
            (SectionKind::Nav, "centered"),
            (SectionKind::Contact, "tile"),
            (SectionKind::Contact, "centered"),
            (SectionKind::Detail, "split"),
            (SectionKind::Detail, "tile"),
            (SectionKind::Slider, "basic"),
        ];

        for (kind, field) in layouts {
            let defaults = default_content(kind);
            let raw = defaults.get(field).unwrap();
            let parsed: serde_json::Value = serde_json::from_str(raw)
                .unwrap_or_else(|e| panic!("{kind}.{field} is not JSON: {e}"));
            assert!(parsed.get("type").is_some(), "{kind}.{field} has no root element type");
        }
    }

    #[test]
    fn active_defaults_match_layout_names() {
        assert_eq!(Hero::default_content().get("active"), Some("Split"));
        assert_eq!(Nav::default_content().get("active"), Some("Basic"));
        assert_eq!(Contact::default_content().get("active"), Some("Centered"));
        assert_eq!(Detail::default_content().get("active"), Some("Tile"));
        assert_eq!(Footer::default_content().get("basic"), Some("footer"));
    }
}
