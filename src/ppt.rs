//! PPT Export Module
//! Writes the dashboard as a PowerPoint deck: one title slide, then one slide
//! per chart with its caption above the picture.
//!
//! The package is assembled directly as ZIP + OpenXML parts.

use std::fs::File;
use std::io::{self, Seek, Write};
use std::path::Path;
use thiserror::Error;
use tracing::info;
use zip::write::FileOptions;
use zip::ZipWriter;

const EMU_PER_INCH: i64 = 914_400;
/// 13.333 x 7.5 inches (16:9)
const SLIDE_WIDTH: i64 = 12_192_000;
const SLIDE_HEIGHT: i64 = 6_858_000;
const MARGIN: i64 = EMU_PER_INCH / 2;
const CAPTION_HEIGHT: i64 = EMU_PER_INCH * 3 / 4;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_TYPE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";
const XML_DECL: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#;
const EMPTY_GROUP: &str = r#"<p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>"#;

#[derive(Error, Debug)]
pub enum PptError {
    #[error("Failed to write deck: {0}")]
    Io(#[from] io::Error),
    #[error("Failed to build deck archive: {0}")]
    Zip(#[from] zip::result::ZipError),
}

/// One chart slide.
#[derive(Debug, Clone)]
pub struct DeckSlide {
    pub caption: String,
    pub png: Vec<u8>,
    /// Pixel size of `png`, used to keep the aspect ratio.
    pub size: (u32, u32),
}

pub struct PptGenerator;

impl PptGenerator {
    /// Write the deck to `output_path`.
    pub fn save_deck(
        output_path: &Path,
        title: &str,
        subtitle: &str,
        slides: &[DeckSlide],
    ) -> Result<(), PptError> {
        let file = File::create(output_path)?;
        Self::write_deck(file, title, subtitle, slides)?;
        info!(
            "Deck written: {} ({} slides)",
            output_path.display(),
            slides.len() + 1
        );
        Ok(())
    }

    /// Assemble the package into `writer` and hand it back once finished.
    pub fn write_deck<W: Write + Seek>(
        writer: W,
        title: &str,
        subtitle: &str,
        slides: &[DeckSlide],
    ) -> Result<W, PptError> {
        let slide_count = slides.len() + 1;
        let mut zip = ZipWriter::new(writer);

        let put = |zip: &mut ZipWriter<W>, name: String, body: &[u8]| -> Result<(), PptError> {
            zip.start_file(name, FileOptions::default())?;
            zip.write_all(body)?;
            Ok(())
        };

        put(&mut zip, "[Content_Types].xml".into(), content_types(slide_count).as_bytes())?;
        put(&mut zip, "_rels/.rels".into(), package_rels().as_bytes())?;
        put(&mut zip, "docProps/core.xml".into(), core_props(title).as_bytes())?;
        put(&mut zip, "docProps/app.xml".into(), app_props(slide_count).as_bytes())?;
        put(&mut zip, "ppt/presentation.xml".into(), presentation(slide_count).as_bytes())?;
        put(
            &mut zip,
            "ppt/_rels/presentation.xml.rels".into(),
            presentation_rels(slide_count).as_bytes(),
        )?;
        put(&mut zip, "ppt/slideMasters/slideMaster1.xml".into(), slide_master().as_bytes())?;
        put(
            &mut zip,
            "ppt/slideMasters/_rels/slideMaster1.xml.rels".into(),
            relationships(&[
                ("slideLayout", "../slideLayouts/slideLayout1.xml".into()),
                ("theme", "../theme/theme1.xml".into()),
            ])
            .as_bytes(),
        )?;
        put(&mut zip, "ppt/slideLayouts/slideLayout1.xml".into(), slide_layout().as_bytes())?;
        put(
            &mut zip,
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels".into(),
            relationships(&[("slideMaster", "../slideMasters/slideMaster1.xml".into())]).as_bytes(),
        )?;
        put(&mut zip, "ppt/theme/theme1.xml".into(), theme().as_bytes())?;

        let layout_rel = ("slideLayout", "../slideLayouts/slideLayout1.xml".to_string());

        put(&mut zip, "ppt/slides/slide1.xml".into(), title_slide(title, subtitle).as_bytes())?;
        put(
            &mut zip,
            "ppt/slides/_rels/slide1.xml.rels".into(),
            relationships(&[layout_rel.clone()]).as_bytes(),
        )?;

        for (i, slide) in slides.iter().enumerate() {
            let number = i + 2;
            let image = i + 1;
            put(&mut zip, format!("ppt/media/image{}.png", image), &slide.png)?;
            put(
                &mut zip,
                format!("ppt/slides/slide{}.xml", number),
                chart_slide(&slide.caption, slide.size).as_bytes(),
            )?;
            put(
                &mut zip,
                format!("ppt/slides/_rels/slide{}.xml.rels", number),
                relationships(&[layout_rel.clone(), ("image", format!("../media/image{}.png", image))])
                    .as_bytes(),
            )?;
        }

        Ok(zip.finish()?)
    }
}

pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

/// Largest box with the image's aspect ratio that fits below the caption,
/// centered horizontally. Returns (x, y, cx, cy).
fn picture_frame(size: (u32, u32)) -> (i64, i64, i64, i64) {
    let top = MARGIN + CAPTION_HEIGHT;
    let max_w = SLIDE_WIDTH - 2 * MARGIN;
    let max_h = SLIDE_HEIGHT - top - MARGIN;
    let (w, h) = (size.0.max(1) as f64, size.1.max(1) as f64);

    let (cx, cy) = if max_w as f64 / max_h as f64 > w / h {
        ((max_h as f64 * w / h) as i64, max_h)
    } else {
        (max_w, (max_w as f64 * h / w) as i64)
    };
    ((SLIDE_WIDTH - cx) / 2, top, cx, cy)
}

/// Relationship part; ids are assigned rId1.. in order.
fn relationships(targets: &[(&str, String)]) -> String {
    let mut xml = format!(r#"{}<Relationships xmlns="{}">"#, XML_DECL, REL_NS);
    for (i, (kind, target)) in targets.iter().enumerate() {
        xml.push_str(&format!(
            r#"<Relationship Id="rId{}" Type="{}/{}" Target="{}"/>"#,
            i + 1,
            REL_TYPE,
            kind,
            target
        ));
    }
    xml.push_str("</Relationships>");
    xml
}

fn text_box(id: u32, name: &str, frame: (i64, i64, i64, i64), text: &str, size: u32, bold: bool) -> String {
    let (x, y, cx, cy) = frame;
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="{id}" name="{name}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr><p:txBody><a:bodyPr wrap="square"/><a:lstStyle/><a:p><a:pPr algn="ctr"/><a:r><a:rPr lang="en-US" sz="{sz}" b="{b}"/><a:t>{text}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        sz = size * 100,
        b = u8::from(bold),
        text = escape_xml(text),
    )
}

fn slide_document(shapes: &str) -> String {
    format!(
        r#"{}<p:sld {}><p:cSld><p:spTree>{}{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sld>"#,
        XML_DECL, NS, EMPTY_GROUP, shapes
    )
}

fn title_slide(title: &str, subtitle: &str) -> String {
    let width = SLIDE_WIDTH - 2 * MARGIN;
    let mut shapes = text_box(2, "Title", (MARGIN, SLIDE_HEIGHT / 3, width, EMU_PER_INCH), title, 40, true);
    if !subtitle.is_empty() {
        shapes.push_str(&text_box(
            3,
            "Subtitle",
            (MARGIN, SLIDE_HEIGHT / 3 + EMU_PER_INCH * 5 / 4, width, EMU_PER_INCH * 3 / 4),
            subtitle,
            20,
            false,
        ));
    }
    slide_document(&shapes)
}

fn chart_slide(caption: &str, size: (u32, u32)) -> String {
    let (x, y, cx, cy) = picture_frame(size);
    let mut shapes = text_box(
        2,
        "Caption",
        (MARGIN, MARGIN, SLIDE_WIDTH - 2 * MARGIN, CAPTION_HEIGHT),
        caption,
        24,
        true,
    );
    shapes.push_str(&format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="3" name="Chart"/><p:cNvPicPr><a:picLocks noChangeAspect="1"/></p:cNvPicPr><p:nvPr/></p:nvPicPr><p:blipFill><a:blip r:embed="rId2"/><a:stretch><a:fillRect/></a:stretch></p:blipFill><p:spPr><a:xfrm><a:off x="{x}" y="{y}"/><a:ext cx="{cx}" cy="{cy}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr></p:pic>"#
    ));
    slide_document(&shapes)
}

fn content_types(slide_count: usize) -> String {
    const PML: &str = "application/vnd.openxmlformats-officedocument.presentationml";
    let mut xml = format!(
        r#"{}<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Default Extension="png" ContentType="image/png"/>"#,
        XML_DECL
    );
    let parts = [
        ("/ppt/presentation.xml", format!("{}.presentation.main+xml", PML)),
        ("/ppt/slideMasters/slideMaster1.xml", format!("{}.slideMaster+xml", PML)),
        ("/ppt/slideLayouts/slideLayout1.xml", format!("{}.slideLayout+xml", PML)),
        ("/ppt/theme/theme1.xml", "application/vnd.openxmlformats-officedocument.theme+xml".to_string()),
        ("/docProps/core.xml", "application/vnd.openxmlformats-package.core-properties+xml".to_string()),
        (
            "/docProps/app.xml",
            "application/vnd.openxmlformats-officedocument.extended-properties+xml".to_string(),
        ),
    ];
    for (part, kind) in parts {
        xml.push_str(&format!(r#"<Override PartName="{}" ContentType="{}"/>"#, part, kind));
    }
    for i in 1..=slide_count {
        xml.push_str(&format!(
            r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="{}.slide+xml"/>"#,
            i, PML
        ));
    }
    xml.push_str("</Types>");
    xml
}

fn package_rels() -> String {
    format!(
        r#"{}<Relationships xmlns="{}"><Relationship Id="rId1" Type="{}/officeDocument" Target="ppt/presentation.xml"/><Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/><Relationship Id="rId3" Type="{}/extended-properties" Target="docProps/app.xml"/></Relationships>"#,
        XML_DECL, REL_NS, REL_TYPE, REL_TYPE
    )
}

/// rId1 is the master, rId2 the theme, slides follow from rId3.
fn presentation_rels(slide_count: usize) -> String {
    let mut targets = vec![
        ("slideMaster", "slideMasters/slideMaster1.xml".to_string()),
        ("theme", "theme/theme1.xml".to_string()),
    ];
    targets.extend((1..=slide_count).map(|i| ("slide", format!("slides/slide{}.xml", i))));
    relationships(&targets)
}

fn presentation(slide_count: usize) -> String {
    let slide_ids: String = (1..=slide_count)
        .map(|i| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + i, i + 2))
        .collect();
    format!(
        r#"{}<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst><p:sldSz cx="{}" cy="{}"/><p:notesSz cx="{}" cy="{}"/></p:presentation>"#,
        XML_DECL, NS, slide_ids, SLIDE_WIDTH, SLIDE_HEIGHT, SLIDE_HEIGHT, SLIDE_WIDTH
    )
}

fn slide_master() -> String {
    format!(
        r#"{}<p:sldMaster {}><p:cSld><p:bg><p:bgPr><a:solidFill><a:srgbClr val="FFFFFF"/></a:solidFill><a:effectLst/></p:bgPr></p:bg><p:spTree>{}</p:spTree></p:cSld><p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/><p:sldLayoutIdLst><p:sldLayoutId id="2147483649" r:id="rId1"/></p:sldLayoutIdLst></p:sldMaster>"#,
        XML_DECL, NS, EMPTY_GROUP
    )
}

fn slide_layout() -> String {
    format!(
        r#"{}<p:sldLayout {} type="blank" preserve="1"><p:cSld name="Blank"><p:spTree>{}</p:spTree></p:cSld><p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr></p:sldLayout>"#,
        XML_DECL, NS, EMPTY_GROUP
    )
}

fn theme() -> String {
    let colors = [
        ("dk1", "0B2545"),
        ("lt1", "FFFFFF"),
        ("dk2", "13315C"),
        ("lt2", "EEF4ED"),
        ("accent1", "0088FE"),
        ("accent2", "00C49F"),
        ("accent3", "FFBB28"),
        ("accent4", "FF8042"),
        ("accent5", "8884D8"),
        ("accent6", "82CA9D"),
        ("hlink", "0563C1"),
        ("folHlink", "954F72"),
    ];
    let scheme: String = colors
        .iter()
        .map(|(slot, hex)| format!(r#"<a:{slot}><a:srgbClr val="{hex}"/></a:{slot}>"#))
        .collect();
    let solid = r#"<a:solidFill><a:schemeClr val="phClr"/></a:solidFill>"#;
    let line = format!(r#"<a:ln w="9525">{}</a:ln>"#, solid);
    let effect = "<a:effectStyle><a:effectLst/></a:effectStyle>";

    format!(
        r#"{decl}<a:theme xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" name="Ocean"><a:themeElements><a:clrScheme name="Ocean">{scheme}</a:clrScheme><a:fontScheme name="Ocean"><a:majorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:majorFont><a:minorFont><a:latin typeface="Calibri"/><a:ea typeface=""/><a:cs typeface=""/></a:minorFont></a:fontScheme><a:fmtScheme name="Ocean"><a:fillStyleLst>{solid}{solid}{solid}</a:fillStyleLst><a:lnStyleLst>{line}{line}{line}</a:lnStyleLst><a:effectStyleLst>{effect}{effect}{effect}</a:effectStyleLst><a:bgFillStyleLst>{solid}{solid}{solid}</a:bgFillStyleLst></a:fmtScheme></a:themeElements></a:theme>"#,
        decl = XML_DECL,
    )
}

fn core_props(title: &str) -> String {
    format!(
        r#"{}<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/"><dc:title>{}</dc:title><dc:creator>Sea The Truth</dc:creator><cp:revision>1</cp:revision></cp:coreProperties>"#,
        XML_DECL,
        escape_xml(title)
    )
}

fn app_props(slide_count: usize) -> String {
    format!(
        r#"{}<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties"><Application>Sea The Truth</Application><PresentationFormat>Widescreen</PresentationFormat><Slides>{}</Slides></Properties>"#,
        XML_DECL, slide_count
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::{Cursor, Read};
    use zip::ZipArchive;

    fn slide(caption: &str) -> DeckSlide {
        DeckSlide {
            caption: caption.to_string(),
            png: vec![0x89, b'P', b'N', b'G'],
            size: (1400, 1000),
        }
    }

    fn read_entry(archive: &mut ZipArchive<Cursor<Vec<u8>>>, name: &str) -> String {
        let mut text = String::new();
        archive.by_name(name).unwrap().read_to_string(&mut text).unwrap();
        text
    }

    #[test]
    fn test_deck_has_title_slide_and_one_slide_per_chart() {
        let slides = [slide("Monthly Trends"), slide("Future Predictions")];
        let cursor = PptGenerator::write_deck(Cursor::new(Vec::new()), "Report", "", &slides).unwrap();
        let mut archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();

        for name in [
            "ppt/slides/slide1.xml",
            "ppt/slides/slide2.xml",
            "ppt/slides/slide3.xml",
            "ppt/media/image1.png",
            "ppt/media/image2.png",
            "ppt/slides/_rels/slide3.xml.rels",
        ] {
            assert!(archive.by_name(name).is_ok(), "missing {}", name);
        }
        assert!(archive.by_name("ppt/slides/slide4.xml").is_err());

        let presentation = read_entry(&mut archive, "ppt/presentation.xml");
        assert_eq!(presentation.matches("<p:sldId ").count(), 3);
        let rels = read_entry(&mut archive, "ppt/slides/_rels/slide3.xml.rels");
        assert!(rels.contains("../media/image2.png"));
        let slide = read_entry(&mut archive, "ppt/slides/slide3.xml");
        assert!(slide.contains("Future Predictions"));
    }

    #[test]
    fn test_title_is_escaped() {
        let cursor =
            PptGenerator::write_deck(Cursor::new(Vec::new()), "Oceans & <Seas>", "mock data", &[])
                .unwrap();
        let mut archive = ZipArchive::new(Cursor::new(cursor.into_inner())).unwrap();
        let core = read_entry(&mut archive, "docProps/core.xml");
        assert!(core.contains("Oceans &amp; &lt;Seas&gt;"));
        let title = read_entry(&mut archive, "ppt/slides/slide1.xml");
        assert!(title.contains("mock data"));
    }

    #[test]
    fn test_picture_frame_keeps_aspect_and_fits() {
        let (x, y, cx, cy) = picture_frame((1400, 1000));
        assert!(x >= MARGIN && x + cx <= SLIDE_WIDTH - MARGIN);
        assert!(y + cy <= SLIDE_HEIGHT - MARGIN);
        let ratio = cx as f64 / cy as f64;
        assert!((ratio - 1.4).abs() < 0.01);
    }
}
