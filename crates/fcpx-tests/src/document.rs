//! Document pipeline tests: parse, validate, detect cuts, convert.

use anyhow::Result;
use fcpx_core::RationalTime;
use fcpx_cuts::{detect, EditType, SourceRelationship};
use fcpx_document::{SchemaVersion, XmlDocument};
use fcpx_validate::{validate_document, ErrorKind};

// ── Fixture ────────────────────────────────────────────────────

const FIXTURE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE fcpxml>
<fcpxml version="1.14">
    <resources>
        <format id="r0" name="FFVideoFormat1080p30" frameDuration="100/3000s"/>
        <asset id="r1" name="Interview A" duration="60s"/>
        <asset id="r2" name="B-Roll" duration="30s"/>
    </resources>
    <import-options>
        <option key="copy assets" value="0"/>
    </import-options>
    <library location="file:///Library.fcpbundle/">
        <event name="Shoot Day 1">
            <project name="Rough Cut">
                <sequence format="r0" duration="900/60000s" tcStart="0s">
                    <spine>
                        <asset-clip ref="r1" offset="0s" duration="300/60000s" name="Interview A"/>
                        <transition name="Cross Dissolve" duration="60/60000s"/>
                        <asset-clip ref="r2" offset="300/60000s" duration="300/60000s" name="B-Roll"/>
                        <gap offset="600/60000s" duration="60/60000s"/>
                        <asset-clip ref="r2" offset="660/60000s" duration="240/60000s" name="B-Roll"/>
                    </spine>
                </sequence>
            </project>
        </event>
    </library>
</fcpxml>"#;

// ── Validation pipeline ────────────────────────────────────────

#[test]
fn fixture_is_valid_on_both_passes() -> Result<()> {
    let doc = XmlDocument::parse(FIXTURE)?;
    let report = validate_document(&doc);
    assert!(report.is_valid(), "{report:?}");
    Ok(())
}

#[test]
fn breaking_a_ref_fails_only_the_semantic_pass() -> Result<()> {
    let broken = FIXTURE.replace(r#"ref="r2""#, r#"ref="r9""#);
    let doc = XmlDocument::parse(&broken)?;
    let report = validate_document(&doc);
    assert!(!report.is_valid());
    assert!(report.schema.is_valid());
    assert!(report
        .semantic
        .errors
        .iter()
        .all(|e| e.kind == ErrorKind::MissingAssetReference));
    Ok(())
}

#[test]
fn serialize_then_reparse_validates_identically() -> Result<()> {
    let doc = XmlDocument::parse(FIXTURE)?;
    let reparsed = XmlDocument::parse(&doc.to_xml()?)?;
    assert_eq!(
        validate_document(&doc).is_valid(),
        validate_document(&reparsed).is_valid()
    );
    Ok(())
}

// ── Cut detection over the fixture ─────────────────────────────

#[test]
fn fixture_cut_classification() -> Result<()> {
    let doc = XmlDocument::parse(FIXTURE)?;
    let summary = detect(&doc);

    assert_eq!(summary.total(), 2);
    assert_eq!(
        summary.edit_points[0].edit_type,
        EditType::Transition {
            name: "Cross Dissolve".into()
        }
    );
    assert_eq!(
        summary.edit_points[0].source_relationship,
        SourceRelationship::DifferentClips
    );
    assert_eq!(summary.edit_points[1].edit_type, EditType::Gap);
    assert_eq!(
        summary.edit_points[1].source_relationship,
        SourceRelationship::SameClip
    );
    assert_eq!(
        summary.edit_points[1].position,
        RationalTime::new(660, 60000)
    );

    assert_eq!(
        summary.hard_cut_count + summary.transition_count + summary.gap_cut_count,
        summary.total()
    );
    assert_eq!(
        summary.same_clip_count + summary.different_clips_count,
        summary.total()
    );
    Ok(())
}

// ── Conversion round trips ─────────────────────────────────────

#[test]
fn downgrade_then_validate_at_target() -> Result<()> {
    let doc = XmlDocument::parse(FIXTURE)?;
    let out = fcpx_convert::convert(&doc, SchemaVersion::V1_9)?;

    let root = out.root().unwrap();
    assert_eq!(out.attribute(root, "version"), Some("1.9"));
    assert!(out.find_descendant(root, "import-options").is_none());

    let report = validate_document(&out);
    assert!(report.is_valid(), "{report:?}");
    Ok(())
}

#[test]
fn conversion_preserves_cut_structure() -> Result<()> {
    let doc = XmlDocument::parse(FIXTURE)?;
    let before = detect(&doc);
    let out = fcpx_convert::convert(&doc, SchemaVersion::V1_5)?;
    let after = detect(&out);
    assert_eq!(before, after);
    Ok(())
}

#[test]
fn downgrade_upgrade_round_trip_keeps_story_content() -> Result<()> {
    let doc = XmlDocument::parse(FIXTURE)?;
    let down = fcpx_convert::convert(&doc, SchemaVersion::V1_9)?;
    let up = fcpx_convert::convert(&down, SchemaVersion::V1_14)?;

    let root = up.root().unwrap();
    assert_eq!(up.attribute(root, "version"), Some("1.14"));
    // The gated import-options block is gone for good, the story is intact.
    assert!(up.find_descendant(root, "import-options").is_none());
    let spine = up.find_descendant(root, "spine").unwrap();
    assert_eq!(up.children(spine).len(), 5);
    Ok(())
}
