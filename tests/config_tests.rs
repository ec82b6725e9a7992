use wpg_slideshow::MarkupConfig;

#[test]
fn empty_yaml_uses_wordpress_defaults() {
    let cfg = MarkupConfig::from_yaml_str("").unwrap();
    assert_eq!(cfg, MarkupConfig::default());
    assert_eq!(cfg.root_class, "wpg-slideshow");
    assert_eq!(cfg.container_class, "blocks-gallery-grid");
    assert_eq!(cfg.item_class, "blocks-gallery-item");
    assert_eq!(cfg.image_tag, "img");
    assert_eq!(cfg.item_margin_override, "margin-bottom: 0!important");
    assert_eq!(cfg.prev_glyph, "\u{276E}");
    assert_eq!(cfg.next_glyph, "\u{276F}");
}

#[test]
fn parse_kebab_case_overrides() {
    let yaml = r#"
root-class: gallery-show
item-margin-override: "margin: 0"
"#;
    let cfg = MarkupConfig::from_yaml_str(yaml).unwrap().validated().unwrap();
    assert_eq!(cfg.root_class, "gallery-show");
    assert_eq!(cfg.item_margin_override, "margin: 0");
    assert_eq!(cfg.container_class, "blocks-gallery-grid");
}

#[test]
fn unknown_keys_are_ignored() {
    let cfg = MarkupConfig::from_yaml_str("autoplay: true\n").unwrap();
    assert_eq!(cfg, MarkupConfig::default());
}

#[test]
fn blank_class_is_rejected() {
    let yaml = r#"
item-class: "  "
"#;
    let err = MarkupConfig::from_yaml_str(yaml)
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(err.to_string().contains("item-class"), "{err}");
}

#[test]
fn multi_token_class_is_rejected() {
    let yaml = r#"
root-class: "wpg slideshow"
"#;
    let err = MarkupConfig::from_yaml_str(yaml)
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(err.to_string().contains("single token"), "{err}");
}

#[test]
fn blank_glyph_is_rejected() {
    let yaml = r#"
next-glyph: ""
"#;
    let err = MarkupConfig::from_yaml_str(yaml)
        .unwrap()
        .validated()
        .unwrap_err();
    assert!(err.to_string().contains("next-glyph"), "{err}");
}

#[test]
fn wrong_type_fails_to_parse() {
    assert!(MarkupConfig::from_yaml_str("root-class: [a, b]\n").is_err());
}

#[test]
fn load_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("slideshow.yaml");
    std::fs::write(&path, "prev-glyph: \"&lt;\"\n").unwrap();
    let cfg = MarkupConfig::from_yaml_file(&path).unwrap();
    assert_eq!(cfg.prev_glyph, "&lt;");
    assert!(MarkupConfig::from_yaml_file(dir.path().join("missing.yaml")).is_err());
}
