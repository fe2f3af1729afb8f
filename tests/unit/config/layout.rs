use super::*;

#[test]
fn defaults_are_valid_and_match_card_design() {
    let cfg = LayoutConfig::default();
    cfg.validate().unwrap();

    let g = cfg.geometry();
    assert_eq!(g.right_x, 490.0);
    assert_eq!(g.right_width, 680.0);
    assert_eq!(g.right_text_width(), 640.0);
    assert_eq!(g.staff_text_width(), 620.0);
    assert_eq!(g.cover_size(), 390.0);
    assert_eq!(cfg.link_font_sizes.first(), Some(&20.0));
    assert_eq!(cfg.link_font_sizes.last(), Some(&12.0));
}

#[test]
fn left_panel_too_wide_is_rejected() {
    let cfg = LayoutConfig {
        left_panel_width: 1110,
        ..LayoutConfig::default()
    };
    let err = cfg.validate().unwrap_err();
    assert!(matches!(err, CardError::ConfigurationInvalid(_)));

    // Positive right width but no room for indented staff text.
    let cfg = LayoutConfig {
        left_panel_width: 1060,
        ..LayoutConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn link_sizes_must_descend() {
    let cfg = LayoutConfig {
        link_font_sizes: vec![12.0, 14.0],
        ..LayoutConfig::default()
    };
    assert!(cfg.validate().is_err());

    let cfg = LayoutConfig {
        link_font_sizes: vec![],
        ..LayoutConfig::default()
    };
    assert!(cfg.validate().is_err());
}

#[test]
fn non_positive_font_size_is_rejected() {
    let mut cfg = LayoutConfig::default();
    cfg.font_sizes.staff = 0.0;
    assert!(cfg.validate().is_err());
}

#[test]
fn partial_json_overrides_only_named_fields() {
    let cfg: LayoutConfig =
        serde_json::from_str(r#"{ "max_canvas_height": 900, "font_sizes": { "body": 24 } }"#)
            .unwrap();
    assert_eq!(cfg.max_canvas_height, 900);
    assert_eq!(cfg.canvas_width, 1200);
    assert_eq!(cfg.font_sizes.body, 24.0);
    assert_eq!(cfg.font_sizes.title, 34.0);
    assert_eq!(cfg.labels, CardLabels::default());
}
