//! In-memory .pptx fixtures for conversion tests.

use quick_xml::escape::escape;
use std::io::{Cursor, Write};
use std::path::{Path, PathBuf};
use zip::write::FileOptions;
use zip::ZipWriter;

const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const REL_BASE: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Title placeholder on the layout; body placeholder geometry lives on the master.
const LAYOUT_TREE: &str = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="952500" y="95250"/><a:ext cx="9525000" cy="952500"/></a:xfrm></p:spPr></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Content Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph idx="1"/></p:nvPr></p:nvSpPr><p:spPr/></p:sp>"#;

const MASTER_TREE: &str = r#"<p:sp><p:nvSpPr><p:cNvPr id="2" name="Title Placeholder 1"/><p:cNvSpPr/><p:nvPr><p:ph type="title"/></p:nvPr></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="100" cy="100"/></a:xfrm></p:spPr></p:sp>
<p:sp><p:nvSpPr><p:cNvPr id="3" name="Text Placeholder 2"/><p:cNvSpPr/><p:nvPr><p:ph type="body" idx="1"/></p:nvPr></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="190500" y="1905000"/><a:ext cx="4762500" cy="2857500"/></a:xfrm></p:spPr></p:sp>"#;

/// Builds a minimal but well-formed .pptx package.
pub struct PptxBuilder {
    slide_size: Option<(i64, i64)>,
    slides: Vec<String>,
}

impl PptxBuilder {
    pub fn new() -> Self {
        Self {
            slide_size: Some((12_192_000, 6_858_000)),
            slides: Vec::new(),
        }
    }

    pub fn without_slide_size(mut self) -> Self {
        self.slide_size = None;
        self
    }

    /// Add a slide whose `p:spTree` holds the given shape elements.
    pub fn slide(mut self, shapes: &str) -> Self {
        self.slides.push(shapes.to_string());
        self
    }

    pub fn build(&self) -> Vec<u8> {
        let mut zip = ZipWriter::new(Cursor::new(Vec::new()));
        let mut add = |name: &str, content: &str| {
            zip.start_file(name, FileOptions::default()).unwrap();
            zip.write_all(content.as_bytes()).unwrap();
        };

        add("[Content_Types].xml", &self.content_types());
        add(
            "_rels/.rels",
            &rels(&[("rId1", "officeDocument", "ppt/presentation.xml")]),
        );
        add("ppt/presentation.xml", &self.presentation_xml());

        let mut presentation_rels = vec![(
            "rId1".to_string(),
            "slideMaster",
            "slideMasters/slideMaster1.xml".to_string(),
        )];
        for n in 1..=self.slides.len() {
            presentation_rels.push((
                format!("rId{}", n + 1),
                "slide",
                format!("slides/slide{}.xml", n),
            ));
        }
        let presentation_rels: Vec<(&str, &str, &str)> = presentation_rels
            .iter()
            .map(|(id, t, target)| (id.as_str(), *t, target.as_str()))
            .collect();
        add("ppt/_rels/presentation.xml.rels", &rels(&presentation_rels));

        for (n, shapes) in self.slides.iter().enumerate() {
            add(
                &format!("ppt/slides/slide{}.xml", n + 1),
                &part("p:sld", shapes),
            );
            add(
                &format!("ppt/slides/_rels/slide{}.xml.rels", n + 1),
                &rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
            );
        }

        add("ppt/slideLayouts/slideLayout1.xml", &part("p:sldLayout", LAYOUT_TREE));
        add(
            "ppt/slideLayouts/_rels/slideLayout1.xml.rels",
            &rels(&[("rId1", "slideMaster", "../slideMasters/slideMaster1.xml")]),
        );
        add("ppt/slideMasters/slideMaster1.xml", &part("p:sldMaster", MASTER_TREE));
        add(
            "ppt/slideMasters/_rels/slideMaster1.xml.rels",
            &rels(&[("rId1", "slideLayout", "../slideLayouts/slideLayout1.xml")]),
        );

        zip.finish().unwrap().into_inner()
    }

    /// Write the package to `dir/name`.
    pub fn write_to(&self, dir: &Path, name: &str) -> PathBuf {
        let path = dir.join(name);
        std::fs::write(&path, self.build()).unwrap();
        path
    }

    fn content_types(&self) -> String {
        let mut overrides = String::new();
        for n in 1..=self.slides.len() {
            overrides.push_str(&format!(
                r#"<Override PartName="/ppt/slides/slide{}.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slide+xml"/>"#,
                n
            ));
        }
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>{}</Types>"#,
            overrides
        )
    }

    fn presentation_xml(&self) -> String {
        let ids: String = (1..=self.slides.len())
            .map(|n| format!(r#"<p:sldId id="{}" r:id="rId{}"/>"#, 255 + n, n + 1))
            .collect();
        let size = self
            .slide_size
            .map(|(cx, cy)| format!(r#"<p:sldSz cx="{}" cy="{}"/>"#, cx, cy))
            .unwrap_or_default();
        format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation {}><p:sldMasterIdLst><p:sldMasterId id="2147483648" r:id="rId1"/></p:sldMasterIdLst><p:sldIdLst>{}</p:sldIdLst>{}<p:notesSz cx="6858000" cy="9144000"/></p:presentation>"#,
            NS, ids, size
        )
    }
}

fn part(root: &str, shapes: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<{root} {ns}><p:cSld><p:spTree><p:nvGrpSpPr><p:cNvPr id="1" name=""/><p:cNvGrpSpPr/><p:nvPr/></p:nvGrpSpPr><p:grpSpPr/>
{shapes}
</p:spTree></p:cSld></{root}>"#,
        root = root,
        ns = NS,
        shapes = shapes
    )
}

fn rels(entries: &[(&str, &str, &str)]) -> String {
    let body: String = entries
        .iter()
        .map(|(id, rel_type, target)| {
            format!(
                r#"<Relationship Id="{}" Type="{}/{}" Target="{}"/>"#,
                id, REL_BASE, rel_type, target
            )
        })
        .collect();
    format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">{}</Relationships>"#,
        REL_NS, body
    )
}

/// A text box with the given paragraphs of runs.
pub fn text_box(name: &str, (x, y, cx, cy): (i64, i64, i64, i64), paragraphs: &[&[&str]]) -> String {
    let paragraphs: String = paragraphs
        .iter()
        .map(|runs| {
            let runs: String = runs
                .iter()
                .map(|t| format!(r#"<a:r><a:rPr lang="en-US"/><a:t>{}</a:t></a:r>"#, escape(t)))
                .collect();
            format!("<a:p>{}</a:p>", runs)
        })
        .collect();
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="10" name="{}"/><p:cNvSpPr txBox="1"/><p:nvPr/></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></p:spPr>
<p:txBody><a:bodyPr/><a:lstStyle/>{}</p:txBody></p:sp>"#,
        name, x, y, cx, cy, paragraphs
    )
}

/// A placeholder with no transform of its own.
pub fn placeholder(ph: &str, text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="11" name="Placeholder"/><p:cNvSpPr/><p:nvPr>{}</p:nvPr></p:nvSpPr><p:spPr/>
<p:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        ph,
        escape(text)
    )
}

/// A placeholder that declares its offset but takes its extent from the layout.
pub fn placeholder_at(ph: &str, (x, y): (i64, i64), text: &str) -> String {
    format!(
        r#"<p:sp><p:nvSpPr><p:cNvPr id="11" name="Placeholder"/><p:cNvSpPr/><p:nvPr>{}</p:nvPr></p:nvSpPr>
<p:spPr><a:xfrm><a:off x="{}" y="{}"/></a:xfrm></p:spPr>
<p:txBody><a:bodyPr/><a:p><a:r><a:t>{}</a:t></a:r></a:p></p:txBody></p:sp>"#,
        ph,
        x,
        y,
        escape(text)
    )
}

/// A picture, which carries neither text nor a table.
pub fn picture((x, y, cx, cy): (i64, i64, i64, i64)) -> String {
    format!(
        r#"<p:pic><p:nvPicPr><p:cNvPr id="12" name="Picture"/><p:cNvPicPr/><p:nvPr/></p:nvPicPr>
<p:blipFill><a:blip r:embed="rId9"/></p:blipFill>
<p:spPr><a:xfrm><a:off x="{}" y="{}"/><a:ext cx="{}" cy="{}"/></a:xfrm></p:spPr></p:pic>"#,
        x, y, cx, cy
    )
}

/// A 2x2 table whose first cell spans both columns of the first row.
pub fn merged_table() -> String {
    r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="13" name="Table"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
<p:xfrm><a:off x="952500" y="1905000"/><a:ext cx="3810000" cy="1905000"/></p:xfrm>
<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl>
<a:tblPr firstRow="1"/><a:tblGrid><a:gridCol w="1905000"/><a:gridCol w="1905000"/></a:tblGrid>
<a:tr h="370840"><a:tc gridSpan="2"><a:txBody><a:bodyPr/><a:p><a:r><a:t>Q1 &amp; Q2</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc><a:tc hMerge="1"><a:txBody><a:bodyPr/><a:p/></a:txBody><a:tcPr/></a:tc></a:tr>
<a:tr h="370840"><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>north</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>south</a:t></a:r><a:r><a:t> east</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc></a:tr>
</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
        .to_string()
}

/// A 2x2 table whose first cell spans both rows of the first column.
pub fn row_merged_table() -> String {
    r#"<p:graphicFrame><p:nvGraphicFramePr><p:cNvPr id="14" name="Table"/><p:cNvGraphicFramePr/><p:nvPr/></p:nvGraphicFramePr>
<p:xfrm><a:off x="0" y="0"/><a:ext cx="3810000" cy="1905000"/></p:xfrm>
<a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/table"><a:tbl>
<a:tblGrid><a:gridCol w="1905000"/><a:gridCol w="1905000"/></a:tblGrid>
<a:tr h="370840"><a:tc rowSpan="2"><a:txBody><a:bodyPr/><a:p><a:r><a:t>Region</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>north</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc></a:tr>
<a:tr h="370840"><a:tc vMerge="true"/><a:tc><a:txBody><a:bodyPr/><a:p><a:r><a:t>south</a:t></a:r></a:p></a:txBody><a:tcPr/></a:tc></a:tr>
</a:tbl></a:graphicData></a:graphic></p:graphicFrame>"#
        .to_string()
}
